//! Convert command implementation.

use crate::input;
use crate::output;
use jwsutil::{
    convert_compact_to_json, convert_json_to_compact_with_header, parse_with_form,
    CompleteSignature, Envelope, JwsError, RawHeader, Serialization,
};
use tracing::warn;

pub fn run(
    input: Option<String>,
    to: Serialization,
    header: Option<String>,
    header_file: Option<String>,
    strict: bool,
    pretty: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let serialized = input::read_jws(input)?;

    let header_text = match (header, header_file) {
        (Some(text), _) => Some(text),
        (None, Some(path)) => Some(input::read_file(&path)?),
        (None, None) => None,
    };
    let unprotected = header_text.as_deref().map(parse_header).transpose()?;
    if unprotected.is_some() && to == Serialization::Compact {
        return Err("compact serialization cannot carry an unprotected header".into());
    }

    let (form, envelope) =
        parse_with_form(&serialized).map_err(|e| format!("Failed to parse JWS: {}", e))?;

    let converted = match to {
        Serialization::Compact => to_compact(form, &serialized, &envelope, strict)?,
        Serialization::Flattened if form == Serialization::Compact => {
            convert_compact_to_json(&serialized, unprotected.as_ref())?
        }
        Serialization::Flattened => {
            single_signature(&envelope, strict, unprotected)?.serialize_flattened_json()
        }
        Serialization::General => match unprotected {
            Some(value) => single_signature(&envelope, true, Some(value))
                .map_err(|e| format!("--header needs a single-signature input: {}", e))?
                .serialize_general_json(),
            None => envelope.serialize_general_json(),
        },
    };

    println!("{}", output::format_json(converted, pretty));
    Ok(())
}

fn parse_header(text: &str) -> Result<RawHeader, Box<dyn std::error::Error>> {
    let header = RawHeader::from_json(text.trim())
        .map_err(|e| format!("Invalid header JSON: {}", e))?;
    if !header.is_object() {
        return Err("unprotected header must be a JSON object".into());
    }
    Ok(header)
}

fn to_compact(
    form: Serialization,
    serialized: &str,
    envelope: &Envelope,
    strict: bool,
) -> Result<String, JwsError> {
    if strict {
        return envelope.serialize_as(Serialization::Compact);
    }
    if form == Serialization::Compact {
        return Ok(envelope.complete_signature().serialize_compact());
    }
    let (compact, dropped) = convert_json_to_compact_with_header::<Option<RawHeader>>(serialized)?;
    if let Some(header) = dropped {
        warn!(%header, "dropped unprotected header");
    }
    Ok(compact)
}

fn single_signature(
    envelope: &Envelope,
    strict: bool,
    unprotected: Option<RawHeader>,
) -> Result<CompleteSignature, JwsError> {
    let mut sig = if strict {
        envelope.flatten()?
    } else {
        if !envelope.flattenable() {
            warn!(
                signatures = envelope.len(),
                "keeping only the first signature"
            );
        }
        envelope.complete_signature()
    };
    if unprotected.is_some() {
        sig.signature.unprotected = unprotected;
    }
    Ok(sig)
}
