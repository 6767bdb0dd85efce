//! Input helpers shared by commands.

use std::io::{self, Read};

/// Reads a serialized JWS from a file or stdin, stripping surrounding whitespace.
pub fn read_jws(input: Option<String>) -> Result<String, Box<dyn std::error::Error>> {
    let raw = match input {
        Some(path) => read_file(&path)?,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    Ok(raw.trim().to_string())
}

/// Reads a whole file as UTF-8.
pub fn read_file(path: &str) -> Result<String, Box<dyn std::error::Error>> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read file {}: {}", path, e))?;
    Ok(contents)
}
