//! Reader/writer doubles that record how the pipelines touch their streams

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

/// Deterministic non-trivial payload
pub fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

/// Produces `total` pattern bytes, alternating short reads of at most
/// `stride` bytes with reads that fill whatever the caller offers.
/// Records the largest read the caller ever requested.
pub struct ProbeReader {
    remaining: u64,
    offset: usize,
    stride: usize,
    short: bool,
    pub max_request: usize,
    pub reads: u64,
}

impl ProbeReader {
    pub fn new(total: u64, stride: usize) -> Self {
        Self {
            remaining: total,
            offset: 0,
            stride,
            short: true,
            max_request: 0,
            reads: 0,
        }
    }
}

impl AsyncRead for ProbeReader {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        this.reads += 1;
        this.max_request = this.max_request.max(buf.remaining());

        let mut len = buf.remaining().min(this.remaining.min(usize::MAX as u64) as usize);
        if this.short {
            len = len.min(this.stride);
        }
        this.short = !this.short;

        let chunk: Vec<u8> = (0..len).map(|i| ((this.offset + i) % 251) as u8).collect();
        buf.put_slice(&chunk);
        this.offset += len;
        this.remaining -= len as u64;
        Poll::Ready(Ok(()))
    }
}

/// Yields `good` pattern bytes and then fails every read
pub struct FailingReader {
    good: usize,
    offset: usize,
}

impl FailingReader {
    pub fn after(good: usize) -> Self {
        Self { good, offset: 0 }
    }
}

impl AsyncRead for FailingReader {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        let left = this.good - this.offset;
        if left == 0 {
            return Poll::Ready(Err(io::Error::new(
                io::ErrorKind::ConnectionReset,
                "connection reset by peer",
            )));
        }
        let len = left.min(buf.remaining());
        let chunk: Vec<u8> = (0..len).map(|i| ((this.offset + i) % 251) as u8).collect();
        buf.put_slice(&chunk);
        this.offset += len;
        Poll::Ready(Ok(()))
    }
}

/// Sink that captures everything and records the largest single write.
/// With a limit set it accepts at most that many bytes per call.
#[derive(Default)]
pub struct ProbeWriter {
    pub captured: Vec<u8>,
    pub max_write: usize,
    pub total: u64,
    pub writes: u64,
    pub flushed: bool,
    pub shut_down: bool,
    limit: Option<usize>,
}

impl ProbeWriter {
    pub fn accepting(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }
}

impl AsyncWrite for ProbeWriter {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let this = self.get_mut();
        let len = match this.limit {
            Some(limit) => buf.len().min(limit),
            None => buf.len(),
        };
        this.max_write = this.max_write.max(len);
        this.total += len as u64;
        this.writes += 1;
        this.captured.extend_from_slice(&buf[..len]);
        Poll::Ready(Ok(len))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        self.get_mut().flushed = true;
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        this.flushed = true;
        this.shut_down = true;
        Poll::Ready(Ok(()))
    }
}

/// Sink that never accepts a byte
pub struct StalledWriter;

impl AsyncWrite for StalledWriter {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        _buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        Poll::Ready(Ok(0))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}
