use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;

pub fn read_json_file<P: AsRef<Path>>(path: P) -> Result<serde_json::Value> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
    let v: serde_json::Value = serde_json::from_str(&raw)
        .map_err(|e| anyhow!("invalid json in {}: {e}", path.display()))?;
    Ok(v)
}

/// Read a JSON file straight into a typed value.
pub fn read_typed<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let path = path.as_ref();
    let v = read_json_file(path)?;
    serde_json::from_value(v).map_err(|e| anyhow!("unexpected shape in {}: {e}", path.display()))
}
