//! # TCP Transport
//!
//! Raw socket path for clients that opt out of HTTP framing. Each flushed
//! message travels as one big-endian `u32` length prefix followed by the
//! payload. The host override is applied to the dial target before the
//! connection is opened.
use super::{Transport, TransportError, TransportResult};
use crate::options::HostOverride;
use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// Ceiling on a single inbound frame.
pub const MAX_FRAME_LEN: u32 = 64 * 1024 * 1024;

/// Length-prefix framed transport over a raw TCP connection.
#[derive(Debug)]
pub struct TcpTransport {
    stream: TcpStream,
    frame: BytesMut,
}

impl TcpTransport {
    /// Dials `host_port`, honoring the host override.
    ///
    /// The connection is opened eagerly; a refused or unreachable dial
    /// surfaces as [`TransportError::ConnectionFailed`].
    pub async fn connect(host_port: &str, host_override: &HostOverride) -> TransportResult<Self> {
        let dial_addr = host_override.resolve(host_port);
        let stream = TcpStream::connect(dial_addr).await.map_err(|source| {
            TransportError::ConnectionFailed {
                addr: dial_addr.to_string(),
                source,
            }
        })?;
        Ok(Self {
            stream,
            frame: BytesMut::new(),
        })
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn write(&mut self, buf: &[u8]) -> TransportResult<()> {
        self.frame.extend_from_slice(buf);
        Ok(())
    }

    async fn flush(&mut self) -> TransportResult<()> {
        if self.frame.is_empty() {
            return Ok(());
        }
        let body = self.frame.split();
        self.stream.write_u32(body.len() as u32).await?;
        self.stream.write_all(&body).await?;
        self.stream.flush().await?;
        Ok(())
    }

    async fn read_message(&mut self) -> TransportResult<Bytes> {
        let len = match self.stream.read_u32().await {
            Ok(len) => len,
            Err(err) if err.kind() == std::io::ErrorKind::UnexpectedEof => {
                return Err(TransportError::Closed);
            }
            Err(err) => return Err(err.into()),
        };
        if len > MAX_FRAME_LEN {
            return Err(TransportError::FrameTooLarge(len));
        }
        let mut payload = vec![0u8; len as usize];
        self.stream.read_exact(&mut payload).await?;
        Ok(Bytes::from(payload))
    }

    async fn close(&mut self) -> TransportResult<()> {
        self.stream.shutdown().await?;
        Ok(())
    }
}
