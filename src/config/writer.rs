//! Canonical configuration writer.

use crate::config::template::{ConfigTemplate, build_template};
use crate::config::ConfigDocument;
use crate::constants::UNRECOGNIZED_SECTION_LABEL;
use crate::error::{Error, Result};
use serde_yaml::{Mapping, Value};
use std::io::Write;
use std::path::Path;
use tracing::{debug, warn};

/// Render `values` into the canonical layout of `template`.
///
/// Template keys come first, section by section, each with its value from
/// `values` or unset. Keys the template does not know are appended after the
/// last section in their original order.
pub fn render_config(template: &ConfigTemplate, values: &ConfigDocument) -> Result<String> {
    let mut out = String::new();

    for (position, section) in template.sections().iter().enumerate() {
        if position > 0 {
            out.push('\n');
        }
        if let Some(preamble) = section.preamble {
            push_comment(&mut out, preamble);
        }
        push_comment(&mut out, section.label);
        for def in section.keys {
            if let Some(comment) = def.comment {
                push_comment(&mut out, comment);
            }
            push_entry(&mut out, def.name, values.get(def.name))?;
        }
    }

    let unknown = template.unknown_keys(values);
    if !unknown.is_empty() {
        if !out.is_empty() {
            out.push('\n');
        }
        push_comment(&mut out, UNRECOGNIZED_SECTION_LABEL);
        for key in unknown {
            push_entry(&mut out, key, values.get(key))?;
        }
    }

    Ok(out)
}

/// Write `values` to `path` using the built-in template.
pub fn write_config(path: &Path, values: &ConfigDocument) -> Result<()> {
    write_config_with_template(path, values, build_template())
}

/// Write `values` to `path` using `template`.
///
/// The file is replaced atomically: content goes to a temporary file in the
/// destination directory which is then renamed over `path`.
pub fn write_config_with_template(
    path: &Path,
    values: &ConfigDocument,
    template: &ConfigTemplate,
) -> Result<()> {
    let unknown = template.unknown_keys(values);
    if !unknown.is_empty() {
        warn!(
            path = %path.display(),
            keys = ?unknown,
            "config has keys outside the template, keeping them as-is"
        );
    }

    let contents = render_config(template, values)?;
    persist_atomically(path, contents.as_bytes())?;

    debug!(path = %path.display(), keys = values.len(), "saved config");
    Ok(())
}

fn persist_atomically(path: &Path, contents: &[u8]) -> Result<()> {
    let write_err = |source: std::io::Error| Error::ConfigWrite {
        path: path.to_path_buf(),
        source,
    };

    // Create parent directories if they don't exist
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(write_err)?;

    let mut file = tempfile::NamedTempFile::new_in(parent).map_err(write_err)?;
    file.write_all(contents).map_err(write_err)?;
    file.as_file().sync_all().map_err(write_err)?;
    file.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}

fn push_comment(out: &mut String, text: &str) {
    out.push_str("# ");
    out.push_str(text);
    out.push('\n');
}

fn push_entry(out: &mut String, key: &str, value: Option<&Value>) -> Result<()> {
    let serialize_err = |source: serde_yaml::Error| Error::ConfigSerialize {
        key: key.to_string(),
        source,
    };

    match value {
        None | Some(Value::Null) => {
            // Unset placeholder: the key alone, with YAML quoting if needed
            let rendered =
                serde_yaml::to_string(&Value::String(key.to_string())).map_err(serialize_err)?;
            out.push_str(rendered.trim_end());
            out.push_str(":\n");
        }
        Some(value) => {
            let mut single = Mapping::new();
            single.insert(Value::String(key.to_string()), value.clone());
            let rendered = serde_yaml::to_string(&single).map_err(serialize_err)?;
            out.push_str(&rendered);
        }
    }
    Ok(())
}
