//! Structural transcoding of JSON Web Signatures between their serializations.
//!
//! This crate provides:
//! - The signature model: [`Signature`], [`CompleteSignature`] and [`Envelope`],
//!   with the unprotected header kept verbatim as a [`RawHeader`]
//! - Parsing of Compact, Flattened JSON and General JSON input with form detection
//! - Serialization back into any of the three forms
//! - Compact <-> JSON conversion that injects or extracts the unprotected header
//!
//! Header, payload and signature strings are opaque: nothing is base64-decoded,
//! signed or verified here.
//!
//! ## Quick Start
//!
//! ```rust
//! use jwsutil::{convert_compact_to_json, parse, Serialization};
//! use serde_json::json;
//!
//! let compact = "eyJhbGciOiJIUzI1NiJ9.cGF5bG9hZA.c2ln";
//! let flattened = convert_compact_to_json(compact, Some(&json!({"kid": "1"})))?;
//! let envelope = parse(&flattened)?;
//! let header = envelope.signature().unprotected.expect("header was injected");
//! assert_eq!(header.get(), r#"{"kid":"1"}"#);
//! assert_eq!(envelope.serialize_as(Serialization::Compact)?, compact);
//! # Ok::<(), jwsutil::JwsError>(())
//! ```
//!
//! The serializations are defined in RFC 7515 §7.

#![deny(missing_docs)]

/// Compact <-> JSON conversion helpers.
pub mod converter;
/// Error types for parsing and conversion.
pub mod errors;
/// Parsing with serialization auto-detection.
pub mod parser;
/// Serialization into Compact, Flattened and General forms.
pub mod serializer;
/// Signature and envelope model.
pub mod signature;

pub use converter::{
    convert_compact_to_json, convert_json_to_compact, convert_json_to_compact_with_header,
};
pub use errors::{JwsError, UnknownSerialization};
pub use parser::{detect_serialization, parse, parse_compact, parse_json, parse_with_form};
pub use serializer::Serialization;
pub use signature::{CompleteSignature, Envelope, RawHeader, Signature};
