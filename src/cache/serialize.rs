//! Serialization Module
//!
//! Encodes values for storage and applies the size-based compression wrapper
//! decision. The wrapper marks bodies above the configured threshold without
//! transforming them; a real codec can be swapped in behind the same
//! two-variant shape.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::cache::FALLBACK_ENTRY_SIZE;
use crate::error::Result;

// == Payload ==
/// A stored payload: plain JSON text, or the compression-wrapped form used
/// for bodies above the threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "encoding", rename_all = "snake_case")]
pub enum Payload {
    Plain { body: String },
    Compressed { body: String },
}

impl Payload {
    /// The encoded value text, regardless of wrapping.
    pub fn body(&self) -> &str {
        match self {
            Payload::Plain { body } | Payload::Compressed { body } => body,
        }
    }

    /// Whether this payload carries the compression wrapper.
    pub fn is_compressed(&self) -> bool {
        matches!(self, Payload::Compressed { .. })
    }
}

// == Serializer ==
/// Encodes and decodes cache values.
#[derive(Debug, Clone)]
pub struct Serializer {
    /// Encoded-body size above which the compression wrapper is applied
    compression_threshold: usize,
}

impl Serializer {
    // == Constructor ==
    /// Creates a serializer with the given compression threshold in bytes.
    pub fn new(compression_threshold: usize) -> Self {
        Self {
            compression_threshold,
        }
    }

    // == Encode ==
    /// Encodes a value, wrapping the body when it exceeds the threshold.
    pub fn encode<T: Serialize>(&self, value: &T) -> Result<Payload> {
        let body = serde_json::to_string(value)?;

        if body.len() > self.compression_threshold {
            Ok(Payload::Compressed { body })
        } else {
            Ok(Payload::Plain { body })
        }
    }

    // == Decode ==
    /// Decodes a payload back into a value.
    pub fn decode<T: DeserializeOwned>(&self, payload: &Payload) -> Result<T> {
        Ok(serde_json::from_str(payload.body())?)
    }
}

// == Size Estimator ==
/// Approximates the stored byte size of a payload.
#[derive(Debug, Clone, Copy, Default)]
pub struct SizeEstimator;

impl SizeEstimator {
    /// Creates a new estimator.
    pub fn new() -> Self {
        Self
    }

    // == Estimate ==
    /// Byte size of the full payload envelope as it would land in the durable
    /// store. Falls back to a fixed default when the payload cannot be
    /// measured.
    pub fn estimate(&self, payload: &Payload) -> u64 {
        serde_json::to_vec(payload)
            .map(|encoded| encoded.len() as u64)
            .unwrap_or(FALLBACK_ENTRY_SIZE)
    }
}
