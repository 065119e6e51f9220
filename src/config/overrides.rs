//! `key=value` overrides applied on top of a loaded document.

use crate::config::ConfigDocument;
use crate::error::{Error, Result};
use serde_yaml::Value;

/// Parse a `key=value` override.
///
/// The value is read as YAML, so `zdims=30` yields an integer and
/// `video_sets=[a, b]` a sequence. An empty value (`beta=`) means unset.
pub fn parse_override(input: &str) -> Result<(String, Value)> {
    let invalid = |reason: &str| Error::InvalidOverride {
        input: input.to_string(),
        reason: reason.to_string(),
    };

    let (key, raw) = input
        .split_once('=')
        .ok_or_else(|| invalid("expected key=value"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(invalid("key is empty"));
    }

    let raw = raw.trim();
    if raw.is_empty() {
        return Ok((key.to_string(), Value::Null));
    }

    let value: Value =
        serde_yaml::from_str(raw).map_err(|e| invalid(&format!("value is not valid YAML: {e}")))?;
    if matches!(value, Value::Tagged(_)) {
        return Err(invalid("tagged values are not supported"));
    }
    Ok((key.to_string(), value))
}

/// Apply overrides in order. Unset values remove the key.
pub fn apply_overrides(
    doc: &mut ConfigDocument,
    overrides: impl IntoIterator<Item = (String, Value)>,
) {
    for (key, value) in overrides {
        if value.is_null() {
            doc.remove(&key);
        } else {
            doc.insert(key, value);
        }
    }
}
