use std::collections::BTreeMap;

use serde::de::IgnoredAny;
use tracing::debug;

use crate::errors::JwsError;
use crate::serializer::Serialization;
use crate::signature::{CompleteSignature, Envelope, Signature};

/// Parses a serialized JWS in any form, detecting the form from its first character.
///
/// Input starting with `{` is parsed as JSON; anything else, including empty
/// input, is parsed as Compact.
pub fn parse(serialized: &str) -> Result<Envelope, JwsError> {
    parse_with_form(serialized).map(|(_, envelope)| envelope)
}

/// Like [`parse`], also reporting which serialization the input used.
pub fn parse_with_form(serialized: &str) -> Result<(Serialization, Envelope), JwsError> {
    let (form, envelope) = if serialized.starts_with('{') {
        decode_json(serialized)?
    } else {
        (Serialization::Compact, parse_compact(serialized)?.enclose())
    };
    debug!(%form, signatures = envelope.len(), "parsed JWS");
    Ok((form, envelope))
}

/// Reports the serialization of `serialized` without keeping the parsed envelope.
pub fn detect_serialization(serialized: &str) -> Result<Serialization, JwsError> {
    parse_with_form(serialized).map(|(form, _)| form)
}

/// Parses the compact serialized JWS.
///
/// Segments are kept as opaque strings in `[protected, payload, signature]` order.
/// See <https://www.rfc-editor.org/rfc/rfc7515#section-7.1>
pub fn parse_compact(serialized: &str) -> Result<CompleteSignature, JwsError> {
    let parts: Vec<&str> = serialized.split('.').collect();
    let [protected, payload, signature] = parts.as_slice() else {
        debug!(segments = parts.len(), "rejected compact serialization");
        return Err(JwsError::InvalidCompactSerialization {
            segments: parts.len(),
        });
    };
    Ok(CompleteSignature::new(
        *payload,
        Signature::new(*protected, *signature),
    ))
}

/// Parses the JSON serialized JWS, in either General or Flattened syntax.
///
/// A non-empty `signatures` array selects the General syntax and any top-level
/// signature fields are then ignored.
/// See <https://www.rfc-editor.org/rfc/rfc7515#section-7.2>
pub fn parse_json(serialized: &str) -> Result<Envelope, JwsError> {
    decode_json(serialized).map(|(_, envelope)| envelope)
}

fn decode_json(serialized: &str) -> Result<(Serialization, Envelope), JwsError> {
    // Rejects invalid JSON and anything that is not an object.
    serde_json::from_str::<BTreeMap<String, IgnoredAny>>(serialized).map_err(reject_json)?;

    // Both shapes must decode, so a mistyped field is an error whichever syntax wins.
    let general = decode_general(serialized)?;
    let flattened = decode_flattened(serialized)?;

    match general {
        Some(envelope) => Ok((Serialization::General, envelope)),
        None => Ok((Serialization::Flattened, flattened.enclose())),
    }
}

/// Decodes the General syntax; `None` when there is no non-empty `signatures` array.
fn decode_general(serialized: &str) -> Result<Option<Envelope>, JwsError> {
    let envelope: Envelope = serde_json::from_str(serialized).map_err(reject_json)?;
    Ok((!envelope.is_empty()).then_some(envelope))
}

fn decode_flattened(serialized: &str) -> Result<CompleteSignature, JwsError> {
    serde_json::from_str(serialized).map_err(reject_json)
}

fn reject_json(err: serde_json::Error) -> JwsError {
    debug!(error = %err, "rejected JSON serialization");
    JwsError::InvalidJsonSerialization(err)
}
