//! Inspect command implementation.

use crate::input;
use crate::output;
use jwsutil::parse_with_form;
use serde_json::json;

pub fn run(input: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let serialized = input::read_jws(input)?;

    let (form, envelope) =
        parse_with_form(&serialized).map_err(|e| format!("Failed to parse JWS: {}", e))?;

    let report = json!({
        "form": form.as_str(),
        "payload": envelope.payload,
        "signature_count": envelope.len(),
        "flattenable": envelope.flattenable(),
        "signatures": envelope.signatures.iter().map(|sig| json!({
            "protected": sig.protected,
            "protected_decoded": output::decode_protected(&sig.protected),
            "header": sig.unprotected,
            "signature": sig.signature,
        })).collect::<Vec<_>>(),
    });

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
