//! # Transports
//!
//! Byte carriage between a client and its peer. A [`Transport`] moves
//! whole messages: `write` queues outbound bytes, `flush` completes one
//! outbound message, `read_message` yields the next complete inbound one.
//!
//! Three framings are provided:
//!
//! * [`http::HttpTransport`]: each flushed message is POSTed to a fixed
//!   URL and the response body becomes the next inbound message.
//! * [`tcp::TcpTransport`]: length-prefixed frames over a raw socket.
//! * [`buffered::BufferedTransport`]: a fixed-capacity write buffer in
//!   front of either of the above.
pub mod buffered;
pub mod http;
pub mod tcp;

use ::http::StatusCode;
use async_trait::async_trait;
use bytes::Bytes;

/// Result alias for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Errors surfaced by transport construction and I/O.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The assembled target URL did not parse.
    #[error("invalid target URL '{url}': '{source}'")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    /// The override's resolved address is not a usable socket address.
    #[error("invalid override address '{addr}': '{source}'")]
    InvalidOverrideAddr {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },
    /// The HTTP client could not be assembled.
    #[error("failed to build HTTP client: '{0}'")]
    HttpClientBuild(#[source] reqwest::Error),
    /// The network dial failed.
    #[error("failed to connect to '{addr}': '{source}'")]
    ConnectionFailed {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    /// An HTTP round trip failed after the request left the client.
    #[error("HTTP round trip to '{url}' failed: '{source}'")]
    HttpRequest {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// The peer answered with a non-success HTTP status.
    #[error("server replied with HTTP status {0}")]
    HttpStatus(StatusCode),
    /// An inbound frame announced a size above [`tcp::MAX_FRAME_LEN`].
    #[error("inbound frame of {0} bytes exceeds the frame ceiling")]
    FrameTooLarge(u32),
    /// Raw I/O failure on an established connection.
    #[error("transport I/O failed: '{0}'")]
    Io(#[from] std::io::Error),
    /// `read_message` was called with no flushed request outstanding.
    #[error("no response available to read; flush a request first")]
    NoPendingResponse,
    /// The peer closed the connection.
    #[error("connection closed by peer")]
    Closed,
}

/// A message-oriented byte transport.
///
/// Implementations are owned exclusively by one client; nothing here is
/// shared. Writes may be deferred until [`Transport::flush`], which marks
/// the end of one outbound message.
#[async_trait]
pub trait Transport: Send {
    /// Queues outbound bytes. They may not reach the peer until `flush`.
    async fn write(&mut self, buf: &[u8]) -> TransportResult<()>;

    /// Pushes all queued bytes to the peer, completing one message.
    async fn flush(&mut self) -> TransportResult<()>;

    /// Receives the next complete inbound message.
    async fn read_message(&mut self) -> TransportResult<Bytes>;

    /// Releases the underlying connection.
    async fn close(&mut self) -> TransportResult<()>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Box<T> {
    async fn write(&mut self, buf: &[u8]) -> TransportResult<()> {
        (**self).write(buf).await
    }

    async fn flush(&mut self) -> TransportResult<()> {
        (**self).flush().await
    }

    async fn read_message(&mut self) -> TransportResult<Bytes> {
        (**self).read_message().await
    }

    async fn close(&mut self) -> TransportResult<()> {
        (**self).close().await
    }
}
