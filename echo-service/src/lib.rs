//! # Echo Service
//!
//! **INTERNAL USE ONLY**: This crate exists solely to provide echo
//! processors and listeners for integration testing `crosswire_core`.
//! It is not intended for production use.
use async_trait::async_trait;
use bytes::Bytes;
use crosswire_core::WireFormat;
use crosswire_core::protocol::{CallEnvelope, CallOutcome, Fault, ReturnEnvelope};
use crosswire_core::service::{ConfigureError, Processor, ServiceConfig};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Payload understood by the echo processor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EchoMessage {
    pub message: String,
}

/// Echoes `"Echo"` calls back, optionally prefixed; faults on anything
/// else.
#[derive(Debug, Clone, Default)]
pub struct EchoProcessor {
    prefix: String,
}

#[async_trait]
impl Processor for EchoProcessor {
    type Request = EchoMessage;
    type Response = EchoMessage;

    async fn process(&self, method: &str, request: EchoMessage) -> Result<EchoMessage, Fault> {
        match method {
            "Echo" => Ok(EchoMessage {
                message: format!("{}{}", self.prefix, request.message),
            }),
            other => Err(Fault::new(format!("unknown method '{other}'"))),
        }
    }
}

/// Service wrapper exposing the configuration surface.
#[derive(Debug, Clone, Default)]
pub struct EchoService {
    processor: EchoProcessor,
}

impl ServiceConfig for EchoService {
    type Processor = EchoProcessor;

    fn configure(&mut self, method: &str, settings: &str) -> Result<(), ConfigureError> {
        match method {
            "prefix" => {
                self.processor.prefix =
                    serde_json::from_str(settings).map_err(|source| {
                        ConfigureError::InvalidSettings {
                            method: method.to_string(),
                            source,
                        }
                    })?;
                Ok(())
            }
            other => Err(ConfigureError::UnknownMethod(other.to_string())),
        }
    }

    fn processor(&self) -> &EchoProcessor {
        &self.processor
    }
}

/// Decodes one call frame, runs the processor, encodes the reply frame.
pub async fn respond<P: Processor>(format: WireFormat, frame: &[u8], processor: &P) -> Vec<u8> {
    let call: CallEnvelope<P::Request> = format.decode(frame).expect("well-formed call frame");
    let outcome = match processor.process(&call.method, call.body).await {
        Ok(reply) => CallOutcome::Reply(reply),
        Err(fault) => CallOutcome::Fault(fault),
    };
    let reply = ReturnEnvelope {
        method: call.method,
        seq: call.seq,
        outcome,
    };
    format.encode(&reply).expect("encodable reply frame")
}

/// Serves length-prefixed echo frames on an ephemeral local port.
pub async fn spawn_tcp(format: WireFormat, processor: EchoProcessor) -> std::io::Result<SocketAddr> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            let processor = processor.clone();
            tokio::spawn(async move {
                let _ = serve_connection(format, stream, processor).await;
            });
        }
    });
    Ok(addr)
}

async fn serve_connection(
    format: WireFormat,
    mut stream: TcpStream,
    processor: EchoProcessor,
) -> std::io::Result<()> {
    loop {
        let len = match stream.read_u32().await {
            Ok(len) => len as usize,
            // Peer hung up between frames.
            Err(_) => return Ok(()),
        };
        let mut frame = vec![0u8; len];
        stream.read_exact(&mut frame).await?;
        let reply = respond(format, &frame, &processor).await;
        stream.write_u32(reply.len() as u32).await?;
        stream.write_all(&reply).await?;
        stream.flush().await?;
    }
}

/// Serves echo POSTs over HTTP on an ephemeral local port.
pub async fn spawn_http(
    format: WireFormat,
    path: &str,
    processor: EchoProcessor,
) -> std::io::Result<SocketAddr> {
    let route = if path.is_empty() { "/" } else { path };
    let app = axum::Router::new().route(
        route,
        axum::routing::post(move |body: Bytes| {
            let processor = processor.clone();
            async move { respond(format, &body, &processor).await }
        }),
    );
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(addr)
}

/// Serves POSTs that reflect the raw request body back unchanged.
///
/// Lets tests observe what a client put on the wire without any decoding
/// on the server side.
pub async fn spawn_http_raw(path: &str) -> std::io::Result<SocketAddr> {
    let route = if path.is_empty() { "/" } else { path };
    let app = axum::Router::new().route(
        route,
        axum::routing::post(|body: Bytes| async move { body.to_vec() }),
    );
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(addr)
}
