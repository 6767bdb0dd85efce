use thiserror::Error;

/// Errors returned while parsing, converting or re-serializing a JWS.
#[derive(Error, Debug)]
pub enum JwsError {
    /// Compact input did not split into exactly three dot-separated segments.
    #[error("invalid compact serialization: expected 3 segments, found {segments}")]
    InvalidCompactSerialization {
        /// Number of segments found after splitting on `.`.
        segments: usize,
    },
    /// JSON input was malformed or matched neither the General nor the Flattened shape.
    #[error("invalid JSON serialization: {0}")]
    InvalidJsonSerialization(#[source] serde_json::Error),
    /// A caller-supplied unprotected header could not be encoded as JSON.
    #[error("failed to encode unprotected header: {0}")]
    Encoding(#[source] serde_json::Error),
    /// A stored unprotected header could not be decoded into the requested type.
    #[error("failed to decode unprotected header: {0}")]
    Decoding(#[source] serde_json::Error),
    /// A single-signature form was requested for a multi-signature envelope.
    #[error("envelope with {signatures} signatures cannot be flattened")]
    NotFlattenable {
        /// Number of signatures carried by the envelope.
        signatures: usize,
    },
}

/// A serialization name other than `compact`, `flattened` or `general`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown serialization '{0}', expected compact, flattened or general")]
pub struct UnknownSerialization(pub String);
