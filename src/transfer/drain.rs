//! Upload drain: one multipart part to one file

use std::path::Path;

use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use super::buffer::{pump, TransferBuffer};
use super::cipher::CipherKey;
use super::types::{TransferError, TransferStats};

/// Drain `part` into a freshly created (or truncated) file at `destination`.
///
/// When the file cannot be created the part is left unread. The file is
/// flushed and closed on every exit path, including read and write failures.
pub async fn drain<R>(
    part: &mut R,
    destination: &Path,
    buffer: &mut TransferBuffer,
    cipher: Option<&CipherKey>,
) -> Result<TransferStats, TransferError>
where
    R: AsyncRead + Unpin,
{
    let file = File::create(destination)
        .await
        .map_err(|source| TransferError::Create {
            path: destination.to_path_buf(),
            source,
        })?;

    match cipher {
        Some(key) => {
            let sink = key.writer(file, buffer.capacity());
            drain_into(part, sink, buffer).await
        }
        None => drain_into(part, file, buffer).await,
    }
}

async fn drain_into<R, W>(
    part: &mut R,
    mut sink: W,
    buffer: &mut TransferBuffer,
) -> Result<TransferStats, TransferError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let pumped = pump(part, &mut sink, buffer).await;
    let closed = sink.shutdown().await;

    let stats = pumped?;
    closed.map_err(TransferError::Write)?;
    Ok(stats)
}

// ============================================================================
// Tests
// ============================================================================
