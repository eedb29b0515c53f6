//! Repository layer for mutable game records.
//!
//! Repositories handle data that CHANGES during play:
//! - Characters and their inventories
//! - Runs, including the persisted turn lock
//! - The floor map of every run
//!
//! Static content (items, enemies, dungeons, loot) is served by the catalog,
//! not by repositories.

mod codec;
mod error;
mod file;
mod memory;
mod tables;
mod traits;

pub use codec::SCHEMA_VERSION;
pub use error::{RepositoryError, Result};
pub use file::FileStore;
pub use memory::InMemoryStore;
pub use traits::{GameStore, WriteBatch};
