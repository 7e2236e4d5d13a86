//! # RPC Client
//!
//! Assembles a ready-to-use client from a target address and a set of
//! [`ClientOptions`]: transport first (HTTP-wrapped or raw, with the host
//! override applied at dial time), then the optional write buffer, then
//! the protocol reader/writer pair bound to the chosen wire format.
//!
//! ```rust,no_run
//! use crosswire_core::{ClientOptions, RpcClient};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let options = ClientOptions::default();
//! let mut client = RpcClient::connect("service.internal:9090", &options).await?;
//! let reply: String = client.call("Ping", "hello").await?;
//! # Ok(())
//! # }
//! ```
use crate::codec::WireFormat;
use crate::options::ClientOptions;
use crate::protocol::{CallError, MessageReader, MessageWriter};
use crate::transport::{
    Transport, TransportError, buffered::BufferedTransport, http::HttpTransport, tcp::TcpTransport,
};
use serde::{Serialize, de::DeserializeOwned};

/// Errors that can occur while assembling a client.
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    /// The target address was empty.
    #[error("empty target address")]
    EmptyTarget,
    /// The transport could not be constructed for the target.
    #[error("failed to set up transport for '{target}': '{source}'")]
    Transport {
        target: String,
        #[source]
        source: TransportError,
    },
}

/// A connected RPC client: a reader/writer protocol pair bound to one
/// owned transport.
///
/// The handle owns its transport exclusively; callers reach it through
/// [`RpcClient::transport_mut`] and release it with [`RpcClient::close`]
/// or [`RpcClient::into_transport`].
pub struct RpcClient {
    reader: MessageReader,
    writer: MessageWriter,
    transport: Box<dyn Transport>,
    format: WireFormat,
    seq: u32,
}

impl std::fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcClient")
            .field("reader", &self.reader)
            .field("writer", &self.writer)
            .field("format", &self.format)
            .field("seq", &self.seq)
            .finish()
    }
}

impl RpcClient {
    /// Connects to `host_port` with the given options.
    ///
    /// # Arguments
    ///
    /// * `host_port` - The nominal connection target (e.g.
    ///   `service.internal:9090`).
    /// * `options` - The declarative configuration to assemble from.
    ///
    /// # Errors
    ///
    /// * [`ConnectError::EmptyTarget`] when `host_port` is empty.
    /// * [`ConnectError::Transport`] when the transport cannot be
    ///   constructed (malformed URL, unusable override address, failed
    ///   dial). No partially usable client is returned.
    pub async fn connect(host_port: &str, options: &ClientOptions) -> Result<Self, ConnectError> {
        if host_port.is_empty() {
            return Err(ConnectError::EmptyTarget);
        }

        let mut transport: Box<dyn Transport> = if options.http_transport {
            let transport =
                HttpTransport::new(host_port, &options.http_path, &options.host_override).map_err(
                    |source| ConnectError::Transport {
                        target: host_port.to_string(),
                        source,
                    },
                )?;
            Box::new(transport)
        } else {
            let transport = TcpTransport::connect(host_port, &options.host_override)
                .await
                .map_err(|source| ConnectError::Transport {
                    target: host_port.to_string(),
                    source,
                })?;
            Box::new(transport)
        };
        if options.buffered {
            transport = Box::new(BufferedTransport::new(transport));
        }

        Ok(Self::from_transport(transport, options.protocol))
    }

    /// Binds a reader/writer pair for `format` to an existing transport.
    pub fn from_transport(transport: Box<dyn Transport>, format: WireFormat) -> Self {
        Self {
            reader: MessageReader::new(format),
            writer: MessageWriter::new(format),
            transport,
            format,
            seq: 0,
        }
    }

    /// Invokes `method` with `request` and waits for the matching reply.
    ///
    /// Each call gets the next sequence number; the reply must carry the
    /// same method name and sequence number or the call fails.
    pub async fn call<Req, Resp>(&mut self, method: &str, request: &Req) -> Result<Resp, CallError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        self.seq = self.seq.wrapping_add(1);
        self.writer
            .write_call(self.transport.as_mut(), method, self.seq, request)
            .await?;
        self.reader
            .read_return(self.transport.as_mut(), method, self.seq)
            .await
    }

    /// Wire format both halves of the protocol pair are bound to.
    pub fn wire_format(&self) -> WireFormat {
        self.format
    }

    /// Direct access to the live transport.
    pub fn transport_mut(&mut self) -> &mut dyn Transport {
        self.transport.as_mut()
    }

    /// Releases the underlying connection.
    pub async fn close(&mut self) -> Result<(), TransportError> {
        self.transport.close().await
    }

    /// Consumes the client, handing the transport back to the caller.
    pub fn into_transport(self) -> Box<dyn Transport> {
        self.transport
    }
}
