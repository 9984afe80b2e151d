//! Download serve: one stored object to one response sink

use std::io;
use std::path::Path;

use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use super::buffer::{pump, TransferBuffer};
use super::cipher::CipherKey;
use super::types::{TransferError, TransferStats};

/// An opened stored object and its on-disk length
#[derive(Debug)]
pub struct StoredObject {
    pub file: File,
    pub len: u64,
}

/// Open a stored object for reading.
///
/// Missing paths and anything that is not a regular file are `NotFound`;
/// every other failure is `Unreadable`.
pub async fn open_object(path: &Path) -> Result<StoredObject, TransferError> {
    let unreadable = |source: io::Error| match source.kind() {
        io::ErrorKind::NotFound => TransferError::NotFound(path.to_path_buf()),
        _ => TransferError::Unreadable {
            path: path.to_path_buf(),
            source,
        },
    };

    let file = File::open(path).await.map_err(unreadable)?;
    let metadata = file.metadata().await.map_err(unreadable)?;

    if !metadata.is_file() {
        return Err(TransferError::NotFound(path.to_path_buf()));
    }

    Ok(StoredObject {
        file,
        len: metadata.len(),
    })
}

/// Stream `source` into `sink` one buffer at a time, decrypting on read
/// when a cipher is configured.
///
/// The source is dropped on every exit path. The sink is flushed on
/// success only; once a response has started, a failure here can only be
/// reported, not undone.
pub async fn serve<R, W>(
    source: R,
    sink: &mut W,
    buffer: &mut TransferBuffer,
    cipher: Option<&CipherKey>,
) -> Result<TransferStats, TransferError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let stats = match cipher {
        Some(key) => pump(&mut key.reader(source), sink, buffer).await?,
        None => {
            let mut source = source;
            pump(&mut source, sink, buffer).await?
        }
    };

    sink.flush().await.map_err(TransferError::Write)?;
    Ok(stats)
}

// ============================================================================
// Tests
// ============================================================================
