//! # HTTP Transport
//!
//! Wraps each outbound message in an HTTP POST to a fixed URL; the
//! response body becomes the next inbound message.
//!
//! ## Override-aware dialing
//!
//! When the client options carry an active [`HostOverride`], its mapping
//! is installed in the HTTP client's dial layer at construction time.
//! Every dial attempt for exactly that host then connects to the
//! pre-resolved address instead of consulting DNS; any other host dials
//! normally. The mapping is read-only after construction, so concurrent
//! dials share it safely, and cancelling a round trip simply drops the
//! in-flight future.
use super::{Transport, TransportError, TransportResult};
use crate::options::HostOverride;
use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use http::header::CONTENT_TYPE;
use std::collections::VecDeque;
use std::net::SocketAddr;
use url::Url;

/// HTTP-backed transport speaking one POST round trip per message.
#[derive(Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    url: Url,
    request: BytesMut,
    responses: VecDeque<Bytes>,
}

impl HttpTransport {
    /// Builds a transport POSTing to `http://{host_port}{path}`.
    ///
    /// No network I/O happens here; the first dial is deferred to the
    /// first flushed message.
    ///
    /// # Errors
    ///
    /// * [`TransportError::InvalidUrl`] when the assembled URL is
    ///   malformed.
    /// * [`TransportError::InvalidOverrideAddr`] when an active override
    ///   carries an address that is not `ip:port`.
    /// * [`TransportError::HttpClientBuild`] when the HTTP client itself
    ///   cannot be assembled.
    pub fn new(
        host_port: &str,
        path: &str,
        host_override: &HostOverride,
    ) -> TransportResult<Self> {
        let raw = format!("http://{host_port}{path}");
        let url =
            Url::parse(&raw).map_err(|source| TransportError::InvalidUrl { url: raw, source })?;

        let mut builder = reqwest::Client::builder();
        if host_override.is_active() {
            let addr: SocketAddr = host_override.resolved_addr.parse().map_err(|source| {
                TransportError::InvalidOverrideAddr {
                    addr: host_override.resolved_addr.clone(),
                    source,
                }
            })?;
            builder = builder.resolve(&host_override.fqdn, addr);
        }
        let client = builder.build().map_err(TransportError::HttpClientBuild)?;

        Ok(Self {
            client,
            url,
            request: BytesMut::new(),
            responses: VecDeque::new(),
        })
    }

    /// The URL each flushed message is POSTed to.
    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn write(&mut self, buf: &[u8]) -> TransportResult<()> {
        self.request.extend_from_slice(buf);
        Ok(())
    }

    async fn flush(&mut self) -> TransportResult<()> {
        if self.request.is_empty() {
            return Ok(());
        }
        let body = self.request.split().freeze();
        let response = self
            .client
            .post(self.url.clone())
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(body)
            .send()
            .await
            .map_err(|source| TransportError::HttpRequest {
                url: self.url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::HttpStatus(status));
        }
        let payload = response
            .bytes()
            .await
            .map_err(|source| TransportError::HttpRequest {
                url: self.url.to_string(),
                source,
            })?;
        self.responses.push_back(payload);
        Ok(())
    }

    async fn read_message(&mut self) -> TransportResult<Bytes> {
        self.responses
            .pop_front()
            .ok_or(TransportError::NoPendingResponse)
    }

    async fn close(&mut self) -> TransportResult<()> {
        self.request.clear();
        self.responses.clear();
        Ok(())
    }
}
