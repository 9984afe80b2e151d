//! Session state, outcome and error types

use uuid::Uuid;

use crate::storage::StorageError;
use crate::transfer::{ThroughputReport, TransferError, TransferStats};

use super::parts::PartError;

/// Where the orchestrator is in its part loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for the next part
    AwaitingPart,
    /// Checking the token field
    ControlField,
    /// Draining a file part
    FileField,
    /// All parts consumed
    Done,
    /// Stopped on an authorization, parse, storage or transfer failure
    Rejected,
}

/// One object written during a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub name: String,
    pub stats: TransferStats,
}

/// Result of a session that reached `Done`
#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub id: Uuid,
    pub files: Vec<StoredFile>,
    pub totals: TransferStats,
    pub report: ThroughputReport,
}

/// Upload session failures. Every one of them ends the session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Parse(#[from] PartError),

    #[error("Failed authorization for file {0}")]
    Unauthorized(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Transfer(#[from] TransferError),
}
