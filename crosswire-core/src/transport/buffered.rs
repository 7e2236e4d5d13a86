//! # Buffered Transport
//!
//! A fixed-capacity write buffer in front of any [`Transport`]. Small
//! writes accumulate locally and reach the inner transport only when the
//! buffer would overflow or on an explicit flush.
use super::{Transport, TransportResult};
use async_trait::async_trait;
use bytes::{Bytes, BytesMut};

/// Default write-buffer capacity.
pub const DEFAULT_BUFFER_CAPACITY: usize = 8192;

/// Write-buffering wrapper around another transport.
#[derive(Debug)]
pub struct BufferedTransport<T> {
    inner: T,
    buf: BytesMut,
    capacity: usize,
}

impl<T: Transport> BufferedTransport<T> {
    /// Wraps `inner` with the default 8 KiB buffer.
    pub fn new(inner: T) -> Self {
        Self::with_capacity(inner, DEFAULT_BUFFER_CAPACITY)
    }

    /// Wraps `inner` with an explicit buffer capacity.
    pub fn with_capacity(inner: T, capacity: usize) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(capacity),
            capacity,
        }
    }

    /// Shared access to the wrapped transport.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Unwraps the inner transport, discarding any unflushed bytes.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

#[async_trait]
impl<T: Transport> Transport for BufferedTransport<T> {
    async fn write(&mut self, buf: &[u8]) -> TransportResult<()> {
        if self.buf.len() + buf.len() > self.capacity && !self.buf.is_empty() {
            let staged = self.buf.split();
            self.inner.write(&staged).await?;
        }
        if buf.len() >= self.capacity {
            self.inner.write(buf).await
        } else {
            self.buf.extend_from_slice(buf);
            Ok(())
        }
    }

    async fn flush(&mut self) -> TransportResult<()> {
        if !self.buf.is_empty() {
            let staged = self.buf.split();
            self.inner.write(&staged).await?;
        }
        self.inner.flush().await
    }

    async fn read_message(&mut self) -> TransportResult<Bytes> {
        // Inbound data is already message-framed; nothing to buffer.
        self.inner.read_message().await
    }

    async fn close(&mut self) -> TransportResult<()> {
        self.inner.close().await
    }
}
