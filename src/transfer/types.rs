//! Transfer counters and error types

use std::io;
use std::path::PathBuf;
use std::time::Duration;


// ============================================================================
// Counters
// ============================================================================

/// Bytes and chunks moved by one drain or serve call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransferStats {
    /// Total payload bytes written to the sink
    pub bytes: u64,

    /// Number of non-empty buffer fills written
    pub chunks: u64,
}

impl TransferStats {
    /// Count one non-empty chunk of `len` bytes
    pub fn record_chunk(&mut self, len: usize) {
        self.bytes += len as u64;
        self.chunks += 1;
    }

    /// Fold another transfer's counters into this one
    pub fn merge(&mut self, other: TransferStats) {
        self.bytes += other.bytes;
        self.chunks += other.chunks;
    }

    /// Average bytes per chunk, zero when nothing was written
    pub fn mean_chunk_size(&self) -> u64 {
        if self.chunks == 0 {
            0
        } else {
            self.bytes / self.chunks
        }
    }
}

/// Timing summary computed once at the end of a session or download
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThroughputReport {
    /// Elapsed milliseconds, plus one so the rate never divides by zero
    pub elapsed_ms: u64,
    pub bytes: u64,
    pub bytes_per_sec: u64,
    pub mean_chunk_size: u64,
}

impl ThroughputReport {
    pub fn new(stats: TransferStats, elapsed: Duration) -> Self {
        let elapsed_ms = elapsed.as_millis() as u64 + 1;
        Self {
            elapsed_ms,
            bytes: stats.bytes,
            bytes_per_sec: stats.bytes.saturating_mul(1000) / elapsed_ms,
            mean_chunk_size: stats.mean_chunk_size(),
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Failures of the drain and serve pipelines
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("Cannot create {}: {source}", .path.display())]
    Create { path: PathBuf, source: io::Error },

    #[error("Object not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Cannot open {}: {source}", .path.display())]
    Unreadable { path: PathBuf, source: io::Error },

    #[error("Error reading data: {0}")]
    Read(#[source] io::Error),

    #[error("Error writing data: {0}")]
    Write(#[source] io::Error),
}

// ============================================================================
// Tests
// ============================================================================
