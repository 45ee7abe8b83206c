//! `--config` override serialization.
//!
//! Client-level config overrides are given as a nested JSON object and
//! passed to the CLI as repeated `--config key=value` arguments. Nested
//! objects flatten to dotted paths and leaf values render as TOML
//! literals, matching the syntax the CLI's config parser accepts.

use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Flatten a nested override object into `path=value` CLI arguments.
///
/// The top level must be a plain JSON object. `null` members are skipped.
/// An empty nested object renders as `path={}`.
pub fn serialize_overrides(overrides: &Value) -> Result<Vec<String>> {
    let Value::Object(map) = overrides else {
        return Err(Error::InvalidConfig(
            "config overrides must be a plain object".to_string(),
        ));
    };

    let mut out = Vec::new();
    flatten_object(map, "", &mut out)?;
    Ok(out)
}

fn flatten_object(map: &Map<String, Value>, prefix: &str, out: &mut Vec<String>) -> Result<()> {
    if map.is_empty() && !prefix.is_empty() {
        out.push(format!("{prefix}={{}}"));
        return Ok(());
    }

    for (key, child) in map {
        if key.is_empty() {
            return Err(Error::InvalidConfig(
                "config override keys must be non-empty strings".to_string(),
            ));
        }
        if child.is_null() {
            continue;
        }
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match child {
            Value::Object(nested) => flatten_object(nested, &path, out)?,
            _ => out.push(format!("{path}={}", toml_value(child, &path)?)),
        }
    }
    Ok(())
}

/// Render a leaf value as a TOML literal.
fn toml_value(value: &Value, path: &str) -> Result<String> {
    match value {
        // JSON string escaping is a compatible subset of TOML basic strings
        Value::String(s) => serde_json::to_string(s)
            .map_err(|e| Error::InvalidConfig(format!("config override at {path}: {e}"))),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => {
            if let Some(f) = n.as_f64() {
                if !f.is_finite() {
                    return Err(Error::InvalidConfig(format!(
                        "config override at {path} must be a finite number"
                    )));
                }
            }
            Ok(n.to_string())
        }
        Value::Array(items) => {
            let mut rendered = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                rendered.push(toml_value(item, &format!("{path}[{i}]"))?);
            }
            Ok(format!("[{}]", rendered.join(", ")))
        }
        Value::Object(map) => {
            let mut parts = Vec::with_capacity(map.len());
            for (key, child) in map {
                if key.is_empty() {
                    return Err(Error::InvalidConfig(
                        "config override keys must be non-empty strings".to_string(),
                    ));
                }
                if child.is_null() {
                    continue;
                }
                parts.push(format!(
                    "{} = {}",
                    toml_key(key),
                    toml_value(child, &format!("{path}.{key}"))?
                ));
            }
            Ok(format!("{{{}}}", parts.join(", ")))
        }
        Value::Null => Err(Error::InvalidConfig(format!(
            "config override at {path} cannot be null"
        ))),
    }
}

/// Format a key for TOML syntax, quoting unless it is a bare key.
fn toml_key(key: &str) -> String {
    let bare = key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if bare {
        key.to_string()
    } else {
        serde_json::to_string(key).unwrap_or_else(|_| format!("\"{key}\""))
    }
}
