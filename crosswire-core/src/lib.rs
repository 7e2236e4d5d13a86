//! # Crosswire Core
//!
//! `crosswire_core` is the client-side plumbing for a cross-language RPC
//! protocol. It turns a set of declarative connection options into a fully
//! assembled client pipeline: a wire encoding, a transport framing
//! (HTTP-wrapped or raw, optionally buffered) and a static host override
//! consulted at dial time.
//!
//! ## Key Components
//!
//! * **[`ClientOptions`] & [`HostOverride`]:** The declarative
//!   configuration a caller hands to the builder. Options are immutable
//!   once built and may be shared across concurrently created clients.
//! * **[`RpcClient`]:** The assembled handle: a reader/writer protocol
//!   pair bound to one owned transport.
//! * **[`WireFormat`]:** Selects which external serialization library
//!   frames messages on the wire.
//!
//! ## Layering
//!
//! The byte-level encodings and the HTTP mechanics are delegated to
//! external libraries; this crate only composes them. The service side is
//! represented by the [`service`] traits and stays out of this crate's
//! responsibility entirely.
//!
//! ## Re-exports
//!
//! This crate re-exports `bytes`, `serde` and `serde_json` to ensure that
//! consumers use compatible versions of these underlying dependencies.
pub mod client;
pub mod codec;
pub mod options;
pub mod protocol;
pub mod service;
pub mod transport;

// Re-exports
pub use bytes;
pub use serde;
pub use serde_json;

pub use client::{ConnectError, RpcClient};
pub use codec::WireFormat;
pub use options::{ClientOptions, HostOverride};

/// Boxed error used where unrelated library errors meet one `source` field.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;
