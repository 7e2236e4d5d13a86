//! # Client Options
//!
//! Declarative per-client configuration: wire encoding, transport framing,
//! HTTP wrapping and the static host override consulted at dial time.
//! Options are built once, never mutated afterwards, and may be shared by
//! reference across any number of concurrently constructed clients.
use crate::codec::WireFormat;

/// Address the default override resolves to until a caller sets a FQDN.
pub const DEFAULT_OVERRIDE_ADDR: &str = "127.0.0.1:80";

/// A static host-to-address mapping applied at dial time.
///
/// When a dial target's host portion equals `fqdn`, the connection goes to
/// `resolved_addr` instead, bypassing normal name resolution. An empty
/// `fqdn` or `resolved_addr` disables the mapping entirely, so the default
/// value is inert until a caller fills in the FQDN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostOverride {
    /// Logical hostname callers expect to connect to.
    pub fqdn: String,
    /// Literal `host:port` dialed instead when the target host matches.
    pub resolved_addr: String,
}

impl Default for HostOverride {
    fn default() -> Self {
        Self {
            fqdn: String::new(),
            resolved_addr: DEFAULT_OVERRIDE_ADDR.to_string(),
        }
    }
}

impl HostOverride {
    pub fn new(fqdn: impl Into<String>, resolved_addr: impl Into<String>) -> Self {
        Self {
            fqdn: fqdn.into(),
            resolved_addr: resolved_addr.into(),
        }
    }

    /// Whether the mapping applies at all. Both fields must be non-empty.
    pub fn is_active(&self) -> bool {
        !self.fqdn.is_empty() && !self.resolved_addr.is_empty()
    }

    /// Returns the address to dial for `target`.
    ///
    /// `target` may be a bare host or `host:port`; matching is exact and
    /// case-sensitive on the host portion only. This is a pure read of
    /// immutable fields and is safe to call from any number of
    /// simultaneous dial attempts.
    pub fn resolve<'a>(&'a self, target: &'a str) -> &'a str {
        if !self.is_active() {
            return target;
        }
        let host = match target.rsplit_once(':') {
            Some((host, _port)) => host,
            None => target,
        };
        if host == self.fqdn {
            self.resolved_addr.as_str()
        } else {
            target
        }
    }
}

/// Per-client connection configuration.
///
/// The defaults mirror the stack's historical behavior: binary encoding,
/// HTTP transport, an 8 KiB write buffer and an inert override carrying
/// the loopback address.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Wrap outbound bytes in HTTP request/response framing.
    pub http_transport: bool,
    /// URL path appended to the target when HTTP framing is used.
    pub http_path: String,
    /// Wire encoding spoken by the client.
    pub protocol: WireFormat,
    /// Wrap the transport in a fixed-capacity write buffer.
    pub buffered: bool,
    /// Static name-resolution override consulted on every dial.
    pub host_override: HostOverride,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            http_transport: true,
            http_path: String::new(),
            protocol: WireFormat::Binary,
            buffered: true,
            host_override: HostOverride::default(),
        }
    }
}
