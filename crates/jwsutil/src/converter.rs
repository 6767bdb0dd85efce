use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::errors::JwsError;
use crate::parser::{parse_compact, parse_json};
use crate::signature::{CompleteSignature, Envelope, RawHeader};

/// Converts a Compact serialized JWS to Flattened JSON, adding an unprotected header.
///
/// `unprotected` is encoded as JSON and stored under `header`. Passing `None`
/// leaves the header out. A [`RawHeader`] is stored as its exact text.
///
/// # Errors
///
/// Returns [`JwsError::InvalidCompactSerialization`] for malformed input and
/// [`JwsError::Encoding`] if the header cannot be represented as JSON.
pub fn convert_compact_to_json<H>(
    serialized: &str,
    unprotected: Option<&H>,
) -> Result<String, JwsError>
where
    H: Serialize + ?Sized,
{
    let mut sig = parse_compact(serialized)?;
    if let Some(header) = unprotected {
        let header = RawHeader::encode(header).map_err(JwsError::Encoding)?;
        sig.signature.unprotected = Some(header);
    }
    debug!(
        with_header = sig.signature.unprotected.is_some(),
        "converted compact JWS to flattened JSON"
    );
    Ok(sig.serialize_flattened_json())
}

/// Converts a JSON serialized JWS (General or Flattened) to Compact form.
///
/// Only the first signature survives; its unprotected header is dropped.
///
/// # Errors
///
/// Returns [`JwsError::InvalidJsonSerialization`] if the input is not a JWS JSON object.
pub fn convert_json_to_compact(serialized: &str) -> Result<String, JwsError> {
    let sig = first_signature(serialized)?;
    Ok(sig.serialize_compact())
}

/// Converts a JSON serialized JWS to Compact form, extracting the unprotected header.
///
/// The first signature's header is decoded into `H`. A missing header decodes
/// from JSON `null`, so use `Option<_>` for `H` when the header is optional.
/// Use [`RawHeader`] for `H` to receive the header text unchanged.
///
/// # Errors
///
/// Returns [`JwsError::InvalidJsonSerialization`] if the input is not a JWS JSON
/// object and [`JwsError::Decoding`] if the header does not fit `H`.
pub fn convert_json_to_compact_with_header<H>(
    serialized: &str,
) -> Result<(String, H), JwsError>
where
    H: DeserializeOwned,
{
    let sig = first_signature(serialized)?;
    let header = match &sig.signature.unprotected {
        Some(raw) => raw.decode(),
        None => serde_json::from_str("null"),
    }
    .map_err(JwsError::Decoding)?;
    Ok((sig.serialize_compact(), header))
}

fn first_signature(serialized: &str) -> Result<CompleteSignature, JwsError> {
    let envelope: Envelope = parse_json(serialized)?;
    if !envelope.flattenable() {
        warn!(
            signatures = envelope.len(),
            "compact form keeps only the first signature"
        );
    }
    debug!("converted JSON JWS to compact");
    Ok(envelope.complete_signature())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::{json, Value};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct KeyHeader {
        kid: String,
    }

    #[test]
    fn compact_to_json_without_header() {
        assert_eq!(
            convert_compact_to_json::<Value>("h.p.s", None).unwrap(),
            r#"{"payload":"p","protected":"h","signature":"s"}"#
        );
    }

    #[test]
    fn compact_to_json_with_typed_header() {
        let header = KeyHeader { kid: "1".into() };
        let json = convert_compact_to_json("h.p.s", Some(&header)).unwrap();
        assert_eq!(
            json,
            r#"{"payload":"p","protected":"h","header":{"kid":"1"},"signature":"s"}"#
        );
    }

    #[test]
    fn compact_to_json_propagates_parse_error() {
        assert!(matches!(
            convert_compact_to_json("h.p", Some(&json!({}))),
            Err(JwsError::InvalidCompactSerialization { segments: 2 })
        ));
    }

    #[test]
    fn compact_to_json_reports_unencodable_header() {
        let mut header = std::collections::HashMap::new();
        header.insert(vec![1u8], "non-string key");
        assert!(matches!(
            convert_compact_to_json("h.p.s", Some(&header)),
            Err(JwsError::Encoding(_))
        ));
    }

    #[test]
    fn json_to_compact_extracts_header() {
        let (compact, header) = convert_json_to_compact_with_header::<KeyHeader>(
            r#"{"payload":"p","protected":"h","header":{"kid":"1"},"signature":"s"}"#,
        )
        .unwrap();
        assert_eq!(compact, "h.p.s");
        assert_eq!(header, KeyHeader { kid: "1".into() });
    }

    #[test]
    fn json_to_compact_extracts_exact_header_text() {
        let (compact, header) = convert_json_to_compact_with_header::<RawHeader>(
            r#"{"payload":"p","header":{"n":18446744073709551617,"e":1e3},"signature":"s"}"#,
        )
        .unwrap();
        assert_eq!(compact, ".p.s");
        assert_eq!(header.get(), r#"{"n":18446744073709551617,"e":1e3}"#);
    }

    #[test]
    fn compact_to_json_keeps_raw_header_text() {
        let header = RawHeader::from_json(r#"{"n":18446744073709551617,"e":1e3}"#).unwrap();
        assert_eq!(
            convert_compact_to_json("h.p.s", Some(&header)).unwrap(),
            r#"{"payload":"p","protected":"h","header":{"n":18446744073709551617,"e":1e3},"signature":"s"}"#
        );
    }

    #[test]
    fn json_to_compact_missing_header() {
        let input = r#"{"payload":"p","protected":"h","signature":"s"}"#;
        let (_, header) =
            convert_json_to_compact_with_header::<Option<KeyHeader>>(input).unwrap();
        assert!(header.is_none());
        assert!(matches!(
            convert_json_to_compact_with_header::<KeyHeader>(input),
            Err(JwsError::Decoding(_))
        ));
    }

    #[test]
    fn json_to_compact_rejects_mismatched_header() {
        assert!(matches!(
            convert_json_to_compact_with_header::<KeyHeader>(
                r#"{"payload":"p","header":{"kid":7},"signature":"s"}"#
            ),
            Err(JwsError::Decoding(_))
        ));
    }

    #[test]
    fn json_to_compact_keeps_first_signature() {
        let general = json!({
            "payload": "p",
            "signatures": [
                {"protected": "h1", "header": {"kid": "1"}, "signature": "s1"},
                {"protected": "h2", "signature": "s2"}
            ]
        })
        .to_string();
        let compact = convert_json_to_compact(&general).unwrap();
        assert_eq!(compact, "h1.p.s1");
        assert!(!compact.contains("s2"));
    }

    #[test]
    fn json_to_compact_propagates_parse_error() {
        assert!(matches!(
            convert_json_to_compact("not json"),
            Err(JwsError::InvalidJsonSerialization(_))
        ));
    }
}
