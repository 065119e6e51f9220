//! Project configuration: template, reader and writer.
//!
//! A project config is a YAML file whose layout is fixed by the template.
//! [`read_config`] loads it (recovering legacy files), [`write_config`]
//! re-renders any set of values into the canonical layout.

mod document;
mod overrides;
mod reader;
mod template;
mod writer;

pub use document::ConfigDocument;
pub use overrides::{apply_overrides, parse_override};
pub use reader::{
    Incompatibility, ReadOptions, ReadOutcome, ReadReport, read_config, read_config_with,
};
pub use template::{
    ConfigTemplate, KeyDef, SectionDef, TemplateEntry, VAME_SECTIONS, build_template,
};
pub use writer::{render_config, write_config, write_config_with_template};
