//! Bounded transfer buffer
//!
//! The buffer is allocated once per operation and never resized. Its
//! capacity is the only bound on how much payload a pipeline stage holds.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use super::types::{TransferError, TransferStats};

/// Default buffer size: 8KB
pub const DEFAULT_BUFFER_SIZE: usize = 8 * 1024;

/// Fixed-capacity byte buffer reused for every read/write cycle
pub struct TransferBuffer {
    bytes: Box<[u8]>,
}

impl TransferBuffer {
    /// Allocate a buffer of exactly `capacity` bytes
    pub fn new(capacity: usize) -> Self {
        Self {
            bytes: vec![0u8; capacity].into_boxed_slice(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
}

impl Default for TransferBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER_SIZE)
    }
}

impl std::fmt::Debug for TransferBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransferBuffer")
            .field("capacity", &self.capacity())
            .finish()
    }
}

/// Copy `reader` into `writer` one buffer fill at a time until end-of-stream.
///
/// Each non-empty read is written in full before the next read is issued,
/// so byte order is preserved and at most `buffer.capacity()` bytes are in
/// flight. The writer is not flushed here; callers own the sink lifecycle.
pub async fn pump<R, W>(
    reader: &mut R,
    writer: &mut W,
    buffer: &mut TransferBuffer,
) -> Result<TransferStats, TransferError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut stats = TransferStats::default();

    loop {
        let read = reader
            .read(buffer.as_mut_slice())
            .await
            .map_err(TransferError::Read)?;

        if read == 0 {
            return Ok(stats);
        }

        writer
            .write_all(&buffer.as_slice()[..read])
            .await
            .map_err(TransferError::Write)?;

        stats.record_chunk(read);
    }
}

// ============================================================================
// Tests
// ============================================================================
