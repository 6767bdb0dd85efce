use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::value::RawValue;

use crate::errors::JwsError;

/// Unprotected header kept as the exact JSON text it was read from.
///
/// Number literals, member order and a literal `null` survive every
/// conversion. Equality compares the JSON text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawHeader(Box<RawValue>);

impl RawHeader {
    /// Wraps JSON text after checking that it is a single JSON value.
    pub fn from_json(json: impl Into<String>) -> Result<Self, serde_json::Error> {
        RawValue::from_string(json.into()).map(Self)
    }

    /// Encodes any serializable value as a header.
    pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::value::to_raw_value(value).map(Self)
    }

    /// Decodes the header into `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(self.0.get())
    }

    /// The header's JSON text.
    pub fn get(&self) -> &str {
        self.0.get()
    }

    /// Whether the header is a JSON object.
    pub fn is_object(&self) -> bool {
        self.get().starts_with('{')
    }
}

impl PartialEq for RawHeader {
    fn eq(&self, other: &Self) -> bool {
        self.get() == other.get()
    }
}

impl Eq for RawHeader {}

impl fmt::Display for RawHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.get())
    }
}

/// A detached signature: header material and signature bytes, without the payload.
///
/// All string fields are stored exactly as received (base64url text is never
/// decoded). Empty strings and a missing `unprotected` header are omitted when
/// serialized to JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    /// Base64url-encoded protected header, empty when there is none.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub protected: String,
    /// Unprotected header (`header` in JSON). Compact form cannot carry it.
    #[serde(
        rename = "header",
        default,
        deserialize_with = "present_header",
        skip_serializing_if = "Option::is_none"
    )]
    pub unprotected: Option<RawHeader>,
    /// Base64url-encoded signature bytes.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub signature: String,
}

impl Signature {
    /// Creates a signature without an unprotected header.
    pub fn new(protected: impl Into<String>, signature: impl Into<String>) -> Self {
        Self {
            protected: protected.into(),
            unprotected: None,
            signature: signature.into(),
        }
    }

    /// Returns the signature with the given unprotected header attached.
    pub fn with_unprotected(mut self, unprotected: RawHeader) -> Self {
        self.unprotected = Some(unprotected);
        self
    }
}

/// A signature paired with the payload it signs.
///
/// This is the unit of Compact and Flattened JSON serialization. In JSON the
/// signature fields sit next to `payload` at the top level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "FlattenedSignature", into = "FlattenedSignature")]
pub struct CompleteSignature {
    /// Base64url-encoded payload.
    pub payload: String,
    /// The signature over `payload`.
    pub signature: Signature,
}

/// Flattened JSON layout of [`CompleteSignature`].
///
/// Spelled out instead of `#[serde(flatten)]`, which buffers values and cannot
/// carry a [`RawHeader`].
#[derive(Serialize, Deserialize)]
struct FlattenedSignature {
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    payload: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    protected: String,
    #[serde(
        default,
        deserialize_with = "present_header",
        skip_serializing_if = "Option::is_none"
    )]
    header: Option<RawHeader>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    signature: String,
}

impl From<FlattenedSignature> for CompleteSignature {
    fn from(flat: FlattenedSignature) -> Self {
        Self {
            payload: flat.payload,
            signature: Signature {
                protected: flat.protected,
                unprotected: flat.header,
                signature: flat.signature,
            },
        }
    }
}

impl From<CompleteSignature> for FlattenedSignature {
    fn from(sig: CompleteSignature) -> Self {
        Self {
            payload: sig.payload,
            protected: sig.signature.protected,
            header: sig.signature.unprotected,
            signature: sig.signature.signature,
        }
    }
}

impl CompleteSignature {
    /// Creates a complete signature from a payload and a detached signature.
    pub fn new(payload: impl Into<String>, signature: Signature) -> Self {
        Self {
            payload: payload.into(),
            signature,
        }
    }

    /// Packs the signature into a single-signature envelope.
    pub fn enclose(self) -> Envelope {
        Envelope {
            payload: self.payload,
            signatures: vec![self.signature],
        }
    }
}

impl From<CompleteSignature> for Envelope {
    fn from(sig: CompleteSignature) -> Self {
        sig.enclose()
    }
}

/// A common payload signed by one or more signatures, in order.
///
/// This is the unit of General JSON serialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Base64url-encoded payload shared by every signature.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub payload: String,
    /// Signatures over `payload`; order is significant.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub signatures: Vec<Signature>,
}

impl Envelope {
    /// Creates an envelope from a payload and its signatures.
    pub fn new(payload: impl Into<String>, signatures: Vec<Signature>) -> Self {
        Self {
            payload: payload.into(),
            signatures,
        }
    }

    /// Returns the first signature, or an empty one if the envelope has none.
    pub fn signature(&self) -> Signature {
        self.signatures.first().cloned().unwrap_or_default()
    }

    /// Returns the first signature paired with the payload.
    ///
    /// Like [`Envelope::signature`], an envelope without signatures yields an
    /// empty signature rather than an error.
    pub fn complete_signature(&self) -> CompleteSignature {
        CompleteSignature {
            payload: self.payload.clone(),
            signature: self.signature(),
        }
    }

    /// Pairs every signature with the shared payload, preserving order.
    pub fn complete_signatures(&self) -> Vec<CompleteSignature> {
        self.signatures
            .iter()
            .map(|sig| CompleteSignature {
                payload: self.payload.clone(),
                signature: sig.clone(),
            })
            .collect()
    }

    /// Whether the envelope fits a single-signature form (fewer than two signatures).
    pub fn flattenable(&self) -> bool {
        self.signatures.len() < 2
    }

    /// Returns the single complete signature, failing for multi-signature envelopes.
    pub fn flatten(&self) -> Result<CompleteSignature, JwsError> {
        if !self.flattenable() {
            return Err(JwsError::NotFlattenable {
                signatures: self.signatures.len(),
            });
        }
        Ok(self.complete_signature())
    }

    /// Number of signatures in the envelope.
    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    /// Whether the envelope carries no signatures.
    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }
}

/// A present `header` key is kept even when its value is `null`.
fn present_header<'de, D>(deserializer: D) -> Result<Option<RawHeader>, D::Error>
where
    D: Deserializer<'de>,
{
    RawHeader::deserialize(deserializer).map(Some)
}

/// Reads JSON `null` as the type's default value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
