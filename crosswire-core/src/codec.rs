//! # Wire Encodings
//!
//! The pluggable serialization seam. Each [`WireFormat`] pairs an encoder
//! and a decoder from an external serde-family library; selection is plain
//! enum dispatch, so the lookup table is immutable by construction and
//! nothing is shared between clients.
//!
//! ## Formats
//!
//! * **Binary** (default): fixed-width binary via `bincode`.
//! * **Json**: compact JSON via `serde_json`.
//! * **SimpleJson**: human-readable JSON via `serde_json`'s pretty
//!   printer. Write-only: replies cannot be decoded with it.
//! * **Compact**: varint-compressed binary via `postcard`.
use crate::BoxError;
use serde::{Serialize, de::DeserializeOwned};
use std::fmt;
use std::str::FromStr;

/// Wire encoding used for every message a client sends or receives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum WireFormat {
    /// Fixed-width binary framing.
    #[default]
    Binary,
    /// Compact JSON framing.
    Json,
    /// Human-readable, write-only JSON framing.
    SimpleJson,
    /// Varint-compressed binary framing.
    Compact,
}

/// Errors raised while encoding or decoding a message.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("failed to encode {format} message: '{source}'")]
    Encode {
        format: WireFormat,
        #[source]
        source: BoxError,
    },
    #[error("failed to decode {format} message: '{source}'")]
    Decode {
        format: WireFormat,
        #[source]
        source: BoxError,
    },
    #[error("the {0} encoding is write-only and cannot decode replies")]
    WriteOnly(WireFormat),
}

impl WireFormat {
    /// Serializes `value` with this format's external encoder.
    pub fn encode<T>(&self, value: &T) -> Result<Vec<u8>, CodecError>
    where
        T: Serialize + ?Sized,
    {
        let format = *self;
        match self {
            WireFormat::Binary => bincode::serialize(value).map_err(|source| CodecError::Encode {
                format,
                source: source.into(),
            }),
            WireFormat::Json => serde_json::to_vec(value).map_err(|source| CodecError::Encode {
                format,
                source: source.into(),
            }),
            WireFormat::SimpleJson => {
                serde_json::to_vec_pretty(value).map_err(|source| CodecError::Encode {
                    format,
                    source: source.into(),
                })
            }
            WireFormat::Compact => {
                postcard::to_allocvec(value).map_err(|source| CodecError::Encode {
                    format,
                    source: source.into(),
                })
            }
        }
    }

    /// Deserializes one complete message previously produced by [`encode`].
    ///
    /// [`encode`]: WireFormat::encode
    pub fn decode<T>(&self, bytes: &[u8]) -> Result<T, CodecError>
    where
        T: DeserializeOwned,
    {
        let format = *self;
        match self {
            WireFormat::Binary => {
                bincode::deserialize(bytes).map_err(|source| CodecError::Decode {
                    format,
                    source: source.into(),
                })
            }
            WireFormat::Json => {
                serde_json::from_slice(bytes).map_err(|source| CodecError::Decode {
                    format,
                    source: source.into(),
                })
            }
            WireFormat::SimpleJson => Err(CodecError::WriteOnly(format)),
            WireFormat::Compact => {
                postcard::from_bytes(bytes).map_err(|source| CodecError::Decode {
                    format,
                    source: source.into(),
                })
            }
        }
    }
}

impl fmt::Display for WireFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WireFormat::Binary => "binary",
            WireFormat::Json => "json",
            WireFormat::SimpleJson => "simplejson",
            WireFormat::Compact => "compact",
        };
        f.write_str(name)
    }
}

/// Error returned when parsing an unknown wire format name.
#[derive(Debug, thiserror::Error)]
#[error("unknown wire format '{0}'")]
pub struct UnknownFormatError(String);

impl FromStr for WireFormat {
    type Err = UnknownFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "binary" => Ok(WireFormat::Binary),
            "json" => Ok(WireFormat::Json),
            "simplejson" => Ok(WireFormat::SimpleJson),
            "compact" => Ok(WireFormat::Compact),
            other => Err(UnknownFormatError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        value: u32,
    }

    fn sample() -> Sample {
        Sample {
            name: "ping".to_string(),
            value: 7,
        }
    }

    #[test]
    fn default_format_is_binary() {
        assert_eq!(WireFormat::default(), WireFormat::Binary);
    }

    #[test]
    fn each_format_matches_its_library() {
        let value = sample();
        assert_eq!(
            WireFormat::Binary.encode(&value).unwrap(),
            bincode::serialize(&value).unwrap()
        );
        assert_eq!(
            WireFormat::Json.encode(&value).unwrap(),
            serde_json::to_vec(&value).unwrap()
        );
        assert_eq!(
            WireFormat::SimpleJson.encode(&value).unwrap(),
            serde_json::to_vec_pretty(&value).unwrap()
        );
        assert_eq!(
            WireFormat::Compact.encode(&value).unwrap(),
            postcard::to_allocvec(&value).unwrap()
        );
    }

    #[test]
    fn encodings_are_pairwise_distinct() {
        let value = sample();
        let formats = [
            WireFormat::Binary,
            WireFormat::Json,
            WireFormat::SimpleJson,
            WireFormat::Compact,
        ];
        let encoded: Vec<Vec<u8>> = formats.iter().map(|f| f.encode(&value).unwrap()).collect();
        for i in 0..encoded.len() {
            for j in (i + 1)..encoded.len() {
                assert_ne!(encoded[i], encoded[j], "{} vs {}", formats[i], formats[j]);
            }
        }
    }

    #[test]
    fn binary_json_and_compact_round_trip() {
        let value = sample();
        for format in [WireFormat::Binary, WireFormat::Json, WireFormat::Compact] {
            let bytes = format.encode(&value).unwrap();
            let decoded: Sample = format.decode(&bytes).unwrap();
            assert_eq!(decoded, value, "{format}");
        }
    }

    #[test]
    fn simple_json_is_write_only() {
        let bytes = WireFormat::SimpleJson.encode(&sample()).unwrap();
        let err = WireFormat::SimpleJson.decode::<Sample>(&bytes).unwrap_err();
        assert!(matches!(err, CodecError::WriteOnly(WireFormat::SimpleJson)));
    }

    #[test]
    fn decode_rejects_garbage() {
        let garbage = [0xFFu8, 0xFF, 0xFF, 0xFF];
        for format in [WireFormat::Binary, WireFormat::Json, WireFormat::Compact] {
            let err = format.decode::<Sample>(&garbage).unwrap_err();
            assert!(matches!(err, CodecError::Decode { .. }), "{format}");
        }
    }

    #[test]
    fn format_names_round_trip() {
        for format in [
            WireFormat::Binary,
            WireFormat::Json,
            WireFormat::SimpleJson,
            WireFormat::Compact,
        ] {
            assert_eq!(format.to_string().parse::<WireFormat>().unwrap(), format);
        }
    }

    #[test]
    fn unknown_format_name_is_rejected() {
        assert!("protobuf".parse::<WireFormat>().is_err());
    }
}
