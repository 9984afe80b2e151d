//! At-rest stream cipher
//!
//! AES-256 in CTR mode. The keystream depends only on the byte position, so
//! any chunking of the same byte sequence produces the same output, and
//! applying it twice is the identity. There is no authentication tag:
//! corrupted ciphertext decrypts to garbage of the same length.
//!
//! One (key, IV) pair is configured for the whole server. Every stored
//! object is encrypted with the keystream starting at position zero.

use std::fmt;
use std::io;
use std::pin::Pin;
use std::task::{ready, Context, Poll};

use aes::Aes256;
use ctr::cipher::{KeyIvInit, StreamCipher};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

type Aes256Ctr = ctr::Ctr128BE<Aes256>;

/// AES-256 key length in bytes
pub const KEY_LEN: usize = 32;

/// CTR initial counter block length in bytes
pub const IV_LEN: usize = 16;

// ============================================================================
// Key Material
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum CipherKeyError {
    #[error("Invalid hex in cipher {what}: {source}")]
    InvalidHex {
        what: &'static str,
        source: hex::FromHexError,
    },

    #[error("Cipher {what} must be {expected} bytes, got {actual}")]
    InvalidLength {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// Key and IV shared by the write path that stores an object and the read
/// path that serves it back
#[derive(Clone, PartialEq, Eq)]
pub struct CipherKey {
    key: [u8; KEY_LEN],
    iv: [u8; IV_LEN],
}

impl CipherKey {
    pub fn new(key: [u8; KEY_LEN], iv: [u8; IV_LEN]) -> Self {
        Self { key, iv }
    }

    /// Parse a 64-hex-char key and a 32-hex-char IV
    pub fn from_hex(key: &str, iv: &str) -> Result<Self, CipherKeyError> {
        Ok(Self {
            key: decode_fixed(key.trim(), "key")?,
            iv: decode_fixed(iv.trim(), "iv")?,
        })
    }

    /// A fresh keystream positioned at byte zero
    pub fn keystream(&self) -> Keystream {
        Keystream(Aes256Ctr::new(&self.key.into(), &self.iv.into()))
    }

    /// Decrypt-on-read decorator
    pub fn reader<R>(&self, inner: R) -> CipherReader<R> {
        CipherReader {
            inner,
            keystream: self.keystream(),
        }
    }

    /// Encrypt-on-write decorator holding at most `scratch_size` transformed
    /// bytes at a time
    pub fn writer<W>(&self, inner: W, scratch_size: usize) -> CipherWriter<W> {
        CipherWriter {
            inner,
            keystream: self.keystream(),
            scratch: vec![0u8; scratch_size.max(1)].into_boxed_slice(),
            pos: 0,
            end: 0,
        }
    }
}

impl fmt::Debug for CipherKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CipherKey")
            .field("key", &"<redacted>")
            .field("iv", &"<redacted>")
            .finish()
    }
}

fn decode_fixed<const N: usize>(value: &str, what: &'static str) -> Result<[u8; N], CipherKeyError> {
    let bytes = hex::decode(value).map_err(|source| CipherKeyError::InvalidHex { what, source })?;
    let actual = bytes.len();
    bytes
        .try_into()
        .map_err(|_| CipherKeyError::InvalidLength {
            what,
            expected: N,
            actual,
        })
}

/// Position-advancing XOR keystream
pub struct Keystream(Aes256Ctr);

impl Keystream {
    /// Transform `data` in place and advance by `data.len()` bytes
    pub fn apply(&mut self, data: &mut [u8]) {
        self.0.apply_keystream(data);
    }
}

// ============================================================================
// Reader
// ============================================================================

/// Applies the keystream to exactly the bytes each read delivers
pub struct CipherReader<R> {
    inner: R,
    keystream: Keystream,
}

impl<R: AsyncRead + Unpin> AsyncRead for CipherReader<R> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        let before = buf.filled().len();
        ready!(Pin::new(&mut this.inner).poll_read(cx, buf))?;
        this.keystream.apply(&mut buf.filled_mut()[before..]);
        Poll::Ready(Ok(()))
    }
}

// ============================================================================
// Writer
// ============================================================================

/// Copies each write into a scratch buffer, transforms the copy, and hands
/// it to the sink. The caller's bytes are never modified.
///
/// Transformed bytes already consumed from the keystream must reach the sink
/// before anything else is accepted; a sink that takes zero bytes fails the
/// write with `WriteZero`.
pub struct CipherWriter<W> {
    inner: W,
    keystream: Keystream,
    scratch: Box<[u8]>,
    pos: usize,
    end: usize,
}

impl<W> CipherWriter<W> {
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: AsyncWrite + Unpin> CipherWriter<W> {
    fn poll_pending(&mut self, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        while self.pos < self.end {
            let written =
                ready!(Pin::new(&mut self.inner).poll_write(cx, &self.scratch[self.pos..self.end]))?;
            if written == 0 {
                return Poll::Ready(Err(io::Error::new(
                    io::ErrorKind::WriteZero,
                    "sink accepted no ciphertext",
                )));
            }
            self.pos += written;
        }
        self.pos = 0;
        self.end = 0;
        Poll::Ready(Ok(()))
    }
}

impl<W: AsyncWrite + Unpin> AsyncWrite for CipherWriter<W> {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let this = self.get_mut();
        ready!(this.poll_pending(cx))?;

        if buf.is_empty() {
            return Poll::Ready(Ok(0));
        }

        let len = buf.len().min(this.scratch.len());
        this.scratch[..len].copy_from_slice(&buf[..len]);
        this.keystream.apply(&mut this.scratch[..len]);
        this.end = len;

        // Push what the sink takes now; the rest goes out on the next call.
        if let Poll::Ready(Err(e)) = this.poll_pending(cx) {
            return Poll::Ready(Err(e));
        }
        Poll::Ready(Ok(len))
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        ready!(this.poll_pending(cx))?;
        Pin::new(&mut this.inner).poll_flush(cx)
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        ready!(this.poll_pending(cx))?;
        Pin::new(&mut this.inner).poll_shutdown(cx)
    }
}

// ============================================================================
// Tests
// ============================================================================
