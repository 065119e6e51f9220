//! Configuration reader with legacy-format recovery.
//!
//! Reading happens in two phases. The canonical phase accepts exactly what
//! the writer produces: a top-level mapping with string keys and untagged
//! values. Anything else it can still make sense of is reported as an
//! [`Incompatibility`], and the permissive phase extracts the key/value pairs
//! by dropping tags and stringifying scalar keys. A file recovered that way
//! is written back in canonical form so the next read takes the fast path.
//!
//! Tags are detected on the parser's event stream rather than on the value
//! tree, since `serde_yaml` resolves `!!`-prefixed tags such as
//! `!!python/tuple` without reporting them.

use crate::config::ConfigDocument;
use crate::config::template::build_template;
use crate::config::writer::write_config;
use crate::error::{Error, Result};
use saphyr_parser::{Event, Parser, ScanError, Tag};
use serde::Serialize;
use serde_yaml::{Mapping, Value};
use std::fmt;
use std::path::Path;
use tracing::{debug, info, warn};

/// Construct that the canonical format cannot represent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Incompatibility {
    /// A value carries an application-specific tag, e.g. a serialized tuple.
    ForeignTag {
        /// Top-level key holding the tagged value.
        key: String,
        /// The tag as written in the file.
        tag: String,
    },
    /// A top-level key is not a string.
    NonStringKey {
        /// Textual form of the key.
        key: String,
    },
    /// The whole document is wrapped in a tag.
    TaggedDocument {
        /// The tag as written in the file.
        tag: String,
    },
}

impl fmt::Display for Incompatibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ForeignTag { key, tag } => write!(f, "tag {tag} on key '{key}'"),
            Self::NonStringKey { key } => write!(f, "non-string key {key}"),
            Self::TaggedDocument { tag } => write!(f, "document tagged {tag}"),
        }
    }
}

/// Options for [`read_config_with`].
#[derive(Debug, Clone, Copy)]
pub struct ReadOptions {
    /// Rewrite a recovered legacy file in canonical form.
    pub rewrite_legacy: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            rewrite_legacy: true,
        }
    }
}

/// How a document was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReadOutcome {
    /// The file was already canonical.
    Canonical,
    /// The file was recovered and rewritten in canonical form.
    Migrated {
        /// What triggered the recovery.
        reason: Incompatibility,
    },
    /// The file was recovered but left untouched on disk.
    LegacyLeftInPlace {
        /// What triggered the recovery.
        reason: Incompatibility,
    },
}

/// Result of [`read_config_with`].
#[derive(Debug, Clone)]
pub struct ReadReport {
    /// Keys and values found in the file. Unset template keys are omitted;
    /// unset keys outside the template are kept as nulls.
    pub document: ConfigDocument,
    /// Which path the read took.
    pub outcome: ReadOutcome,
}

enum CanonicalParse {
    Document(ConfigDocument),
    Incompatible(Incompatibility),
}

/// Read the configuration at `path`, migrating legacy files in place.
pub fn read_config(path: &Path) -> Result<ConfigDocument> {
    read_config_with(path, ReadOptions::default()).map(|report| report.document)
}

/// Read the configuration at `path` with explicit options.
pub fn read_config_with(path: &Path, options: ReadOptions) -> Result<ReadReport> {
    if !path.is_file() {
        return Err(Error::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }

    // The handle is closed before any rewrite below
    let raw = std::fs::read_to_string(path).map_err(|e| Error::ConfigRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    match parse_canonical(&raw, path)? {
        CanonicalParse::Document(document) => {
            debug!(path = %path.display(), keys = document.len(), "loaded config");
            Ok(ReadReport {
                document,
                outcome: ReadOutcome::Canonical,
            })
        }
        CanonicalParse::Incompatible(reason) => {
            let document = parse_permissive(&raw, path)?;
            let outcome = if options.rewrite_legacy {
                info!(
                    path = %path.display(),
                    construct = %reason,
                    "migrating config to canonical format"
                );
                write_config(path, &document)?;
                ReadOutcome::Migrated { reason }
            } else {
                warn!(
                    path = %path.display(),
                    construct = %reason,
                    "config uses a legacy construct, leaving file unchanged"
                );
                ReadOutcome::LegacyLeftInPlace { reason }
            };
            Ok(ReadReport { document, outcome })
        }
    }
}

fn parse_value(raw: &str, path: &Path) -> Result<Value> {
    let has_content = raw.lines().any(|line| {
        let line = line.trim();
        !line.is_empty() && !line.starts_with('#')
    });
    if !has_content {
        return Ok(Value::Null);
    }

    serde_yaml::from_str(raw).map_err(|e| Error::ConfigParse {
        path: path.to_path_buf(),
        source: e,
    })
}

fn parse_canonical(raw: &str, path: &Path) -> Result<CanonicalParse> {
    let mapping = match parse_value(raw, path)? {
        Value::Null => return Ok(CanonicalParse::Document(ConfigDocument::new())),
        Value::Mapping(mapping) => mapping,
        Value::Tagged(tagged) => {
            return Ok(CanonicalParse::Incompatible(
                Incompatibility::TaggedDocument {
                    tag: tagged.tag.to_string(),
                },
            ));
        }
        other => return Err(not_a_mapping(path, &other)),
    };

    if let Some(reason) = non_string_key(&mapping) {
        return Ok(CanonicalParse::Incompatible(reason));
    }
    match find_foreign_tag(raw) {
        Ok(Some(reason)) => return Ok(CanonicalParse::Incompatible(reason)),
        Ok(None) => {}
        Err(e) => {
            debug!(path = %path.display(), error = %e, "tag scan stopped early");
        }
    }

    let document = mapping
        .into_iter()
        .filter_map(|(key, value)| match key {
            Value::String(key) => Some((key, value)),
            _ => None,
        })
        .filter(|(key, value)| keep_value(key, value))
        .collect();
    Ok(CanonicalParse::Document(document))
}

fn parse_permissive(raw: &str, path: &Path) -> Result<ConfigDocument> {
    let mapping = match strip_tags(parse_value(raw, path)?) {
        Value::Null => return Ok(ConfigDocument::new()),
        Value::Mapping(mapping) => mapping,
        other => return Err(not_a_mapping(path, &other)),
    };

    let mut document = ConfigDocument::new();
    for (key, value) in mapping {
        let key = match key {
            Value::String(key) => key,
            Value::Bool(key) => key.to_string(),
            Value::Number(key) => key.to_string(),
            other => {
                return Err(Error::ConfigInvalid {
                    path: path.to_path_buf(),
                    reason: format!("unsupported key of type {}", type_name(&other)),
                });
            }
        };
        if keep_value(&key, &value) {
            document.insert(key, value);
        }
    }
    Ok(document)
}

/// Null template keys are unset and dropped; anything else is kept so
/// unrecognized keys survive a read-then-write cycle.
fn keep_value(key: &str, value: &Value) -> bool {
    !value.is_null() || !build_template().contains(key)
}

fn non_string_key(mapping: &Mapping) -> Option<Incompatibility> {
    mapping.keys().find(|key| !key.is_string()).map(|key| {
        let key = serde_yaml::to_string(key)
            .map(|text| text.trim_end().to_string())
            .unwrap_or_else(|_| type_name(key).to_string());
        Incompatibility::NonStringKey { key }
    })
}

/// Core schema tags the writer may legitimately emit or that plain YAML
/// resolves implicitly.
const CORE_TAGS: &[&str] = &["str", "int", "float", "bool", "null", "seq", "map"];

fn is_foreign(tag: &Tag) -> bool {
    if tag.is_yaml_core_schema() {
        return !CORE_TAGS.contains(&tag.suffix.as_str());
    }
    // `!` alone is the non-specific tag
    !(tag.handle.is_empty() && tag.suffix == "!")
}

fn tag_text(tag: &Tag) -> String {
    match tag.handle.as_str() {
        "tag:yaml.org,2002:" => format!("!!{}", tag.suffix),
        "!" => format!("!{}", tag.suffix),
        handle => format!("{handle}{}", tag.suffix),
    }
}

/// Walk the event stream of the first document and report the first
/// non-core tag, attributed to the top-level key it sits under.
fn find_foreign_tag(raw: &str) -> std::result::Result<Option<Incompatibility>, ScanError> {
    let mut depth = 0usize;
    let mut expecting_key = true;
    let mut current_key = String::new();

    for event in Parser::new_from_str(raw) {
        let (event, _span) = event?;
        let (tag, opens, closes) = match &event {
            Event::Scalar(value, _, _, tag) => {
                if depth == 1 && expecting_key {
                    current_key = value.to_string();
                }
                (tag.as_ref(), false, false)
            }
            Event::SequenceStart(_, tag) | Event::MappingStart(_, tag) => {
                if depth == 1 && expecting_key {
                    current_key.clear();
                }
                (tag.as_ref(), true, false)
            }
            Event::SequenceEnd | Event::MappingEnd => (None, false, true),
            Event::Alias(_) => (None, false, false),
            Event::DocumentEnd => break,
            _ => continue,
        };

        if let Some(tag) = tag.map(|tag| &**tag).filter(|tag| is_foreign(tag)) {
            let tag = tag_text(tag);
            return Ok(Some(if depth == 0 {
                Incompatibility::TaggedDocument { tag }
            } else {
                Incompatibility::ForeignTag {
                    key: current_key,
                    tag,
                }
            }));
        }

        if opens {
            depth += 1;
            continue;
        }
        if closes {
            depth = depth.saturating_sub(1);
        }
        // A node directly under the root mapping completes a key or a value
        if depth == 1 {
            expecting_key = !expecting_key;
        }
    }
    Ok(None)
}

fn strip_tags(value: Value) -> Value {
    match value {
        Value::Tagged(tagged) => strip_tags(tagged.value),
        Value::Sequence(items) => Value::Sequence(items.into_iter().map(strip_tags).collect()),
        Value::Mapping(mapping) => Value::Mapping(
            mapping
                .into_iter()
                .map(|(key, value)| (strip_tags(key), strip_tags(value)))
                .collect(),
        ),
        other => other,
    }
}

fn not_a_mapping(path: &Path, value: &Value) -> Error {
    Error::ConfigInvalid {
        path: path.to_path_buf(),
        reason: format!("expected a mapping at the top level, found {}", type_name(value)),
    }
}

const fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}
