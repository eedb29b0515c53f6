//! Versioned JSON envelopes for persisted records.
//!
//! Every record written to disk is wrapped as
//! `{"schema": 1, "kind": "...", "data": {...}}` so a reader can refuse data
//! from a newer layout instead of misreading it.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::error::{RepositoryError, Result};

/// Layout version of every record this crate writes.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    schema: u32,
    kind: &'a str,
    data: &'a T,
}

#[derive(Deserialize)]
struct Header {
    schema: u32,
    kind: String,
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

/// Serialize `data` as a `kind` record.
pub fn encode<T: Serialize>(kind: &str, data: &T) -> Result<Vec<u8>> {
    let envelope = EnvelopeRef {
        schema: SCHEMA_VERSION,
        kind,
        data,
    };
    Ok(serde_json::to_vec_pretty(&envelope)?)
}

/// Parse a `kind` record, checking its schema version first.
pub fn decode<T: DeserializeOwned>(kind: &str, bytes: &[u8]) -> Result<T> {
    let header: Header = serde_json::from_slice(bytes)?;
    if header.schema != SCHEMA_VERSION {
        return Err(RepositoryError::SchemaMismatch {
            found: header.schema,
            expected: SCHEMA_VERSION,
        });
    }
    if header.kind != kind {
        return Err(RepositoryError::CorruptedData(format!(
            "expected a {kind} record, found {}",
            header.kind
        )));
    }
    let envelope: Envelope<T> = serde_json::from_slice(bytes)?;
    Ok(envelope.data)
}

#[cfg(test)]
mod tests {
    use game_core::{CharacterId, DungeonId, Run, RunId};

    use super::*;

    #[test]
    fn run_record_survives_encoding() {
        let mut run = Run::new(RunId(3), CharacterId(1), DungeonId(2));
        run.begin_processing("look around", 42);

        let bytes = encode("run", &run).unwrap();
        let decoded: Run = decode("run", &bytes).unwrap();
        assert_eq!(decoded, run);
    }

    #[test]
    fn newer_schema_is_refused() {
        let bytes = br#"{"schema": 2, "kind": "run", "data": {}}"#;
        let error = decode::<Run>("run", bytes).unwrap_err();
        assert!(matches!(
            error,
            RepositoryError::SchemaMismatch {
                found: 2,
                expected: 1
            }
        ));
    }

    #[test]
    fn wrong_kind_is_corrupted_data() {
        let bytes = encode("character", &7u32).unwrap();
        let error = decode::<u32>("run", &bytes).unwrap_err();
        assert!(matches!(error, RepositoryError::CorruptedData(_)));
    }
}
