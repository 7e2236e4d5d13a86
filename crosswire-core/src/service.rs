//! # Service Configuration Surface
//!
//! The counterpart contract this crate expects from the service side: a
//! processor able to run named methods, and a configuration hook that
//! applies JSON settings payloads before handing the processor out. The
//! core never dispatches methods itself; servers implement these traits
//! and plug them into whatever listener they run.
use crate::protocol::Fault;
use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

/// Handles named RPC methods.
#[async_trait]
pub trait Processor: Send + Sync {
    /// Decoded request payload type.
    type Request: DeserializeOwned + Send;
    /// Response payload type.
    type Response: Serialize + Send;

    /// Runs `method` against `request`, or reports a fault.
    async fn process(&self, method: &str, request: Self::Request)
    -> Result<Self::Response, Fault>;
}

/// Errors raised while applying a configuration payload.
#[derive(Debug, thiserror::Error)]
pub enum ConfigureError {
    #[error("unknown configuration method '{0}'")]
    UnknownMethod(String),
    #[error("invalid settings payload for '{method}': '{source}'")]
    InvalidSettings {
        method: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Configuration surface a service exposes to its embedder: apply a named
/// JSON settings payload, then hand out the processor.
pub trait ServiceConfig {
    type Processor: Processor;

    /// Applies the JSON-encoded `settings` for `method`.
    fn configure(&mut self, method: &str, settings: &str) -> Result<(), ConfigureError>;

    /// The processor serving this configuration.
    fn processor(&self) -> &Self::Processor;
}
