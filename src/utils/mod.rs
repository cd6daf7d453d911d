//! Utility functions for collection schema resolution

use anyhow::{anyhow, Result};
use std::path::PathBuf;

/// Get the XDG config directory for collection-schema
pub fn get_config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| anyhow!("Could not determine config directory"))?
        .join("collection-schema");

    Ok(config_dir)
}

/// Cache key for one resolution.
///
/// Each input is length-prefixed so that moving text between inputs
/// changes the key.
pub fn cache_key(collection: &str, schema_json: Option<&str>, source: &str) -> String {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    for part in [Some(collection), schema_json, Some(source)] {
        match part {
            Some(text) => {
                hasher.update((text.len() as u64).to_le_bytes());
                hasher.update(text.as_bytes());
            }
            None => hasher.update([0xff; 8]),
        }
    }
    hex::encode(hasher.finalize())
}

/// Convert a collection name to a valid filename
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
