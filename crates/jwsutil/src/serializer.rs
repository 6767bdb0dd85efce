use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::errors::{JwsError, UnknownSerialization};
use crate::signature::{CompleteSignature, Envelope};

/// The three JWS serializations of RFC 7515 §7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Serialization {
    /// `protected.payload.signature`, single signature, no unprotected header.
    Compact,
    /// Single-signature JSON object with top-level signature fields.
    Flattened,
    /// JSON object with a `signatures` array.
    General,
}

impl Serialization {
    /// Stable lowercase name of the form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Serialization::Compact => "compact",
            Serialization::Flattened => "flattened",
            Serialization::General => "general",
        }
    }

    /// Whether the form can only hold one signature.
    pub fn is_single_signature(&self) -> bool {
        !matches!(self, Serialization::General)
    }
}

impl fmt::Display for Serialization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Serialization {
    type Err = UnknownSerialization;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "compact" => Ok(Serialization::Compact),
            "flattened" => Ok(Serialization::Flattened),
            "general" => Ok(Serialization::General),
            other => Err(UnknownSerialization(other.to_string())),
        }
    }
}

impl CompleteSignature {
    /// Serializes in JWS Compact Serialization.
    ///
    /// Empty fields become empty segments; the unprotected header is dropped.
    /// See <https://www.rfc-editor.org/rfc/rfc7515#section-7.1>
    pub fn serialize_compact(&self) -> String {
        format!(
            "{}.{}.{}",
            self.signature.protected, self.payload, self.signature.signature
        )
    }

    /// Serializes in JWS JSON Serialization, using the flattened syntax.
    /// See <https://www.rfc-editor.org/rfc/rfc7515#section-7.2>
    pub fn serialize_json(&self) -> String {
        self.serialize_flattened_json()
    }

    /// Serializes in General JWS JSON Serialization.
    /// See <https://www.rfc-editor.org/rfc/rfc7515#section-7.2.1>
    pub fn serialize_general_json(&self) -> String {
        self.clone().enclose().serialize_general_json()
    }

    /// Serializes in Flattened JWS JSON Serialization.
    /// See <https://www.rfc-editor.org/rfc/rfc7515#section-7.2.2>
    pub fn serialize_flattened_json(&self) -> String {
        to_json(self)
    }
}

impl Envelope {
    /// Serializes in General JWS JSON Serialization.
    /// See <https://www.rfc-editor.org/rfc/rfc7515#section-7.2.1>
    pub fn serialize_general_json(&self) -> String {
        to_json(self)
    }

    /// Serializes into the requested form.
    ///
    /// Single-signature forms require a flattenable envelope; no signature is
    /// ever dropped silently here. Compact output still omits the unprotected
    /// header, which that form cannot express.
    pub fn serialize_as(&self, form: Serialization) -> Result<String, JwsError> {
        match form {
            Serialization::Compact => Ok(self.flatten()?.serialize_compact()),
            Serialization::Flattened => Ok(self.flatten()?.serialize_flattened_json()),
            Serialization::General => Ok(self.serialize_general_json()),
        }
    }
}

// The model holds only strings and already-valid raw JSON, so failure here is a bug.
fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).expect("JWS model must serialize to JSON")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::{RawHeader, Signature};
    use serde_json::json;

    fn header(json: &str) -> RawHeader {
        RawHeader::from_json(json).unwrap()
    }

    fn complete(unprotected: Option<RawHeader>) -> CompleteSignature {
        CompleteSignature::new(
            "cGF5bG9hZA",
            Signature {
                protected: "eyJhbGciOiJFUzI1NiJ9".into(),
                unprotected,
                signature: "c2ln".into(),
            },
        )
    }

    #[test]
    fn compact_joins_three_segments() {
        assert_eq!(
            complete(None).serialize_compact(),
            "eyJhbGciOiJFUzI1NiJ9.cGF5bG9hZA.c2ln"
        );
    }

    #[test]
    fn compact_keeps_empty_segments() {
        assert_eq!(CompleteSignature::default().serialize_compact(), "..");
        let detached = CompleteSignature::new("", Signature::new("aA", "cw"));
        assert_eq!(detached.serialize_compact(), "aA..cw");
    }

    #[test]
    fn compact_drops_unprotected_header() {
        let sig = complete(Some(header(r#"{"kid":"1"}"#)));
        assert_eq!(sig.serialize_compact(), complete(None).serialize_compact());
    }

    #[test]
    fn flattened_orders_and_omits_fields() {
        assert_eq!(
            complete(Some(header(r#"{"kid":"1"}"#))).serialize_flattened_json(),
            r#"{"payload":"cGF5bG9hZA","protected":"eyJhbGciOiJFUzI1NiJ9","header":{"kid":"1"},"signature":"c2ln"}"#
        );
        assert_eq!(
            CompleteSignature::new("cA", Signature::new("", "cw")).serialize_flattened_json(),
            r#"{"payload":"cA","signature":"cw"}"#
        );
        assert_eq!(CompleteSignature::default().serialize_json(), "{}");
    }

    #[test]
    fn general_wraps_single_signature() {
        assert_eq!(
            complete(None).serialize_general_json(),
            r#"{"payload":"cGF5bG9hZA","signatures":[{"protected":"eyJhbGciOiJFUzI1NiJ9","signature":"c2ln"}]}"#
        );
    }

    #[test]
    fn general_serializes_every_signature() {
        let envelope = Envelope::new(
            "cA",
            vec![
                Signature::new("aDE", "czE").with_unprotected(header(r#"{"kid":"a"}"#)),
                Signature::new("", "czI"),
            ],
        );
        let value: serde_json::Value =
            serde_json::from_str(&envelope.serialize_general_json()).unwrap();
        assert_eq!(
            value,
            json!({
                "payload": "cA",
                "signatures": [
                    {"protected": "aDE", "header": {"kid": "a"}, "signature": "czE"},
                    {"signature": "czI"}
                ]
            })
        );
    }

    #[test]
    fn header_text_is_emitted_verbatim() {
        let sig = complete(Some(header(r#"{"n":18446744073709551617,"e":1e3}"#)));
        assert_eq!(
            sig.serialize_flattened_json(),
            r#"{"payload":"cGF5bG9hZA","protected":"eyJhbGciOiJFUzI1NiJ9","header":{"n":18446744073709551617,"e":1e3},"signature":"c2ln"}"#
        );
        let null_header =
            CompleteSignature::new("cA", Signature::new("", "cw").with_unprotected(header("null")));
        assert_eq!(
            null_header.serialize_flattened_json(),
            r#"{"payload":"cA","header":null,"signature":"cw"}"#
        );
    }

    #[test]
    fn empty_envelope_omits_signatures() {
        assert_eq!(Envelope::new("cA", vec![]).serialize_general_json(), r#"{"payload":"cA"}"#);
    }

    #[test]
    fn serialize_as_rejects_multi_signature_single_forms() {
        let envelope = Envelope::new("cA", vec![Signature::new("a", "b"), Signature::new("c", "d")]);
        assert!(envelope.serialize_as(Serialization::General).is_ok());
        for form in [Serialization::Compact, Serialization::Flattened] {
            assert!(matches!(
                envelope.serialize_as(form),
                Err(JwsError::NotFlattenable { signatures: 2 })
            ));
        }
    }

    #[test]
    fn serialize_as_single_signature() {
        let envelope = complete(None).enclose();
        assert_eq!(
            envelope.serialize_as(Serialization::Compact).unwrap(),
            "eyJhbGciOiJFUzI1NiJ9.cGF5bG9hZA.c2ln"
        );
        assert_eq!(
            envelope.serialize_as(Serialization::Flattened).unwrap(),
            complete(None).serialize_flattened_json()
        );
    }

    #[test]
    fn serialization_names() {
        for form in [
            Serialization::Compact,
            Serialization::Flattened,
            Serialization::General,
        ] {
            assert_eq!(form.to_string().parse::<Serialization>().unwrap(), form);
        }
        assert!("jwe".parse::<Serialization>().is_err());
        assert!(!Serialization::General.is_single_signature());
    }
}
