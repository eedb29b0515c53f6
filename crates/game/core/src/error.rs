//! Common error infrastructure for game-core.
//!
//! This module provides shared types and traits used across all error types in game-core.
//! Domain-specific errors (e.g., `TurnError`, `OracleError`) are defined in their
//! respective modules alongside the operations they validate.
//!
//! # Design Principles
//!
//! - **Type Safety**: Each layer has its own error type with specific variants
//! - **Severity Classification**: Errors are categorized for recovery strategies
//! - **Stable Codes**: Every variant exposes a static code for logs and metrics

/// Severity level of an error, used for categorization and recovery strategies.
///
/// Errors are classified by their recoverability and expected handling:
/// - **Recoverable**: The request may succeed later without changes (e.g. the run is busy)
/// - **Validation**: Invalid input that should be rejected without retry
/// - **Internal**: Unexpected state inconsistencies or storage failures
/// - **Fatal**: Unrecoverable errors indicating corrupted game state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - the caller should wait and retry.
    ///
    /// Examples: run is currently processing another action
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: no active run, insufficient gold, locked room
    Validation,

    /// Internal error - unexpected state inconsistency or persistence failure.
    ///
    /// These abort the current turn and are rolled back by the caller.
    Internal,

    /// Fatal error - game state corrupted, cannot continue.
    ///
    /// Examples: referenced content missing from every oracle
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug or storage failure.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all game errors.
///
/// This trait provides a uniform interface for error classification across
/// all error types in the workspace.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
