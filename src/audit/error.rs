//! Failure taxonomy of the audit trail.
//!
//! None of these ever replaces the outcome of the mutation being audited.

use thiserror::Error;

use crate::models::UserId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuditError {
    /// Malformed or missing fields in a log request
    #[error("invalid change payload: {0}")]
    Validation(String),

    /// Entity or field could not be resolved while diffing
    #[error("lookup failed: {0}")]
    Lookup(String),

    /// Ledger append or query failure
    #[error("ledger storage failed: {0}")]
    Storage(String),

    /// The acting user does not exist
    #[error("unknown actor: user #{0}")]
    UnknownActor(UserId),
}
