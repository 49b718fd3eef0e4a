//! Error types for the sovereignty core.

use thiserror::Error;

/// Errors from the score rule engine.
#[derive(Error, Debug)]
pub enum ScoreError {
    /// The record names a path the registry does not know. Never defaulted.
    #[error("Unknown path: '{0}'")]
    UnknownPath(String),
}

/// Errors from the XP ledger.
///
/// A duplicate award is *not* an error; it surfaces as
/// [`crate::ledger::AwardOutcome::AlreadyApplied`]. Only genuine failures
/// land here.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Unknown XP source tag: '{0}'")]
    UnknownSource(String),

    #[error("Unknown challenge type: '{0}'")]
    UnknownChallengeType(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}
