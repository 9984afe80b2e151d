//! Upload token check
//!
//! The token arrives as an ordinary multipart field, so an attacker controls
//! its length. It is read into the session's transfer buffer and nothing
//! else: a token longer than the buffer can never match.

use subtle::ConstantTimeEq;
use tokio::io::{AsyncRead, AsyncReadExt};

use super::buffer::TransferBuffer;

/// Read at most one buffer of `stream` and compare it with `expected`.
///
/// Returns `true` only when the stream held exactly `expected`: same length,
/// same bytes. Empty, truncated, oversized or unreadable input is `false`.
pub async fn verify_token<R>(stream: &mut R, expected: &[u8], buffer: &mut TransferBuffer) -> bool
where
    R: AsyncRead + Unpin,
{
    let buf = buffer.as_mut_slice();
    let mut total = 0;

    while total < buf.len() {
        match stream.read(&mut buf[total..]).await {
            Ok(0) => break,
            Ok(read) => total += read,
            Err(e) => {
                tracing::debug!(error = %e, "Token field read failed");
                return false;
            }
        }
    }

    // Lengths are compared in the clear; only the content comparison is
    // constant-time.
    buf[..total].ct_eq(expected).into()
}

// ============================================================================
// Tests
// ============================================================================
