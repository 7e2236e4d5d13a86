//! # Protocol Layer
//!
//! Message envelopes and the encoder/decoder pair a client binds to its
//! transport. A call travels as one [`CallEnvelope`]; the reply comes back
//! as one [`ReturnEnvelope`] whose outcome is either the payload or a
//! server-reported fault. [`MessageWriter`] and [`MessageReader`] are both
//! bound to the same wire format and push their frames through whatever
//! transport the client owns.
use crate::codec::{CodecError, WireFormat};
use crate::transport::{Transport, TransportError};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// One outbound call: method name, sequence number, request payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallEnvelope<T> {
    pub method: String,
    pub seq: u32,
    pub body: T,
}

/// One inbound reply matching a previously sent call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnEnvelope<T> {
    pub method: String,
    pub seq: u32,
    pub outcome: CallOutcome<T>,
}

/// Server-side result of a call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CallOutcome<T> {
    /// The method ran and produced a payload.
    Reply(T),
    /// The method failed; the server reported why.
    Fault(Fault),
}

/// A fault reported by the remote peer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct Fault {
    pub message: String,
}

impl Fault {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors raised during a single call round trip.
#[derive(Debug, thiserror::Error)]
pub enum CallError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("server fault for method '{method}': '{fault}'")]
    Fault { method: String, fault: Fault },
    #[error(
        "out-of-sequence reply: expected '{expected_method}' #{expected_seq}, \
         received '{received_method}' #{received_seq}"
    )]
    OutOfSequence {
        expected_method: String,
        expected_seq: u32,
        received_method: String,
        received_seq: u32,
    },
}

/// Encodes outbound calls with one fixed wire format.
#[derive(Debug, Clone, Copy)]
pub struct MessageWriter {
    format: WireFormat,
}

impl MessageWriter {
    pub fn new(format: WireFormat) -> Self {
        Self { format }
    }

    /// Encodes one call envelope and pushes it through the transport.
    pub async fn write_call<T>(
        &self,
        transport: &mut dyn Transport,
        method: &str,
        seq: u32,
        body: &T,
    ) -> Result<(), CallError>
    where
        T: Serialize + ?Sized,
    {
        let envelope = CallEnvelope {
            method: method.to_string(),
            seq,
            body,
        };
        let frame = self.format.encode(&envelope)?;
        transport.write(&frame).await?;
        transport.flush().await?;
        Ok(())
    }
}

/// Decodes inbound replies with one fixed wire format.
#[derive(Debug, Clone, Copy)]
pub struct MessageReader {
    format: WireFormat,
}

impl MessageReader {
    pub fn new(format: WireFormat) -> Self {
        Self { format }
    }

    /// Reads one reply and checks that it answers the expected call.
    ///
    /// Fault outcomes and replies carrying a different method or sequence
    /// number surface as errors.
    pub async fn read_return<T>(
        &self,
        transport: &mut dyn Transport,
        method: &str,
        seq: u32,
    ) -> Result<T, CallError>
    where
        T: DeserializeOwned,
    {
        let frame = transport.read_message().await?;
        let envelope: ReturnEnvelope<T> = self.format.decode(&frame)?;
        if envelope.method != method || envelope.seq != seq {
            return Err(CallError::OutOfSequence {
                expected_method: method.to_string(),
                expected_seq: seq,
                received_method: envelope.method,
                received_seq: envelope.seq,
            });
        }
        match envelope.outcome {
            CallOutcome::Reply(body) => Ok(body),
            CallOutcome::Fault(fault) => Err(CallError::Fault {
                method: envelope.method,
                fault,
            }),
        }
    }
}
