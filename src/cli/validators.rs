//! CLI argument validators.

use crate::config::parse_override;
use serde_yaml::Value;

/// Parse a `key=value` argument.
pub fn parse_key_value(s: &str) -> Result<(String, Value), String> {
    parse_override(s).map_err(|e| e.to_string())
}
