//! Canonical configuration template.
//!
//! The template fixes which keys a project config knows about, the order in
//! which they are written, and the comment headers that document them. Every
//! key is an unset placeholder; values only ever come from the caller.

use crate::config::ConfigDocument;
use crate::error::{Error, Result};
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

/// Static definition of one template key.
#[derive(Debug, Clone, Copy)]
pub struct KeyDef {
    /// Key name as it appears in the file.
    pub name: &'static str,
    /// Comment line written directly above the key.
    pub comment: Option<&'static str>,
}

/// Static definition of one template section.
#[derive(Debug, Clone, Copy)]
pub struct SectionDef {
    /// Header comment for the section.
    pub label: &'static str,
    /// Banner comment written above the header.
    pub preamble: Option<&'static str>,
    /// Keys in canonical order.
    pub keys: &'static [KeyDef],
}

const fn key(name: &'static str) -> KeyDef {
    KeyDef {
        name,
        comment: None,
    }
}

const fn section(label: &'static str, keys: &'static [KeyDef]) -> SectionDef {
    SectionDef {
        label,
        preamble: None,
        keys,
    }
}

/// Sections of a VAME project config, in file order.
pub const VAME_SECTIONS: &[SectionDef] = &[
    section("Project name", &[key("Project")]),
    section(
        "Project path and videos",
        &[key("project_path"), key("video_sets")],
    ),
    section("Data", &[key("all_data")]),
    section(
        "Creation of train set:",
        &[
            key("savgol_filter"),
            key("savgol_length"),
            key("savgol_order"),
            key("test_fraction"),
        ],
    ),
    section(
        "RNN model general hyperparameter:",
        &[
            key("num_features"),
            key("batch_size"),
            key("max_epochs"),
            key("model_snapshot"),
            key("model_convergence"),
            key("transition_function"),
            key("beta"),
            key("zdims"),
            key("learning_rate"),
            key("step_size"),
            key("gamma"),
            key("time_window"),
            key("prediction_decoder"),
            key("prediction_steps"),
        ],
    ),
    section(
        "Segmentation:",
        &[
            key("load_data"),
            key("snapshot"),
            key("snapshot_epoch"),
            key("median_filter"),
        ],
    ),
    section("Video writer:", &[key("lenght_of_motif_video")]),
    SectionDef {
        label: "RNN encoder hyperparameter:",
        preamble: Some("ONLY CHANGE ANYTHING BELOW IF YOU ARE FAMILIAR WITH RNN MODELS"),
        keys: &[
            key("hidden_size_layer_1"),
            key("hidden_size_layer_2"),
            key("dropout_encoder"),
        ],
    },
    section(
        "RNN reconstruction hyperparameter:",
        &[key("hidden_size_rec"), key("dropout_rec")],
    ),
    section(
        "RNN prediction hyperparameter:",
        &[key("hidden_size_pred"), key("dropout_pred")],
    ),
    section(
        "RNN loss hyperparameter:",
        &[
            key("mse_reconstruction_reduction"),
            key("mse_prediction_reduction"),
            key("kmeans_loss"),
            key("kmeans_lambda"),
            key("anneal_function"),
            key("kl_start"),
            key("annealtime"),
            KeyDef {
                name: "scheduler",
                comment: Some(
                    "set scheduler to 0 for manual learning rate descent (decrease lr by factor of gamma after step_size epochs without new best_loss).",
                ),
            },
        ],
    ),
];

/// One key of the template, resolved against its section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateEntry {
    /// Key name.
    pub key: &'static str,
    /// Label of the section the key belongs to.
    pub section: &'static str,
    /// Comment written above the key.
    pub comment: Option<&'static str>,
}

/// Canonical, ordered configuration schema.
#[derive(Debug)]
pub struct ConfigTemplate {
    sections: &'static [SectionDef],
    entries: Vec<TemplateEntry>,
    index: HashMap<&'static str, usize>,
}

impl ConfigTemplate {
    /// Build a template from static section definitions.
    ///
    /// Fails if any key appears more than once.
    pub fn from_sections(sections: &'static [SectionDef]) -> Result<Self> {
        let template = Self::index_sections(sections);
        if template.index.len() != template.entries.len() {
            let mut seen = HashSet::new();
            for entry in &template.entries {
                if !seen.insert(entry.key) {
                    return Err(Error::DuplicateTemplateKey {
                        key: entry.key.to_string(),
                    });
                }
            }
        }
        Ok(template)
    }

    fn index_sections(sections: &'static [SectionDef]) -> Self {
        let entries: Vec<TemplateEntry> = sections
            .iter()
            .flat_map(|section| {
                section.keys.iter().map(move |def| TemplateEntry {
                    key: def.name,
                    section: section.label,
                    comment: def.comment,
                })
            })
            .collect();

        let mut index = HashMap::with_capacity(entries.len());
        for (position, entry) in entries.iter().enumerate() {
            index.entry(entry.key).or_insert(position);
        }

        Self {
            sections,
            entries,
            index,
        }
    }

    /// Iterate entries in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = &TemplateEntry> {
        self.entries.iter()
    }

    /// Section definitions in canonical order.
    pub fn sections(&self) -> &'static [SectionDef] {
        self.sections
    }

    /// Number of keys in the template.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the template declares no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a key.
    pub fn entry(&self, key: &str) -> Option<&TemplateEntry> {
        self.index.get(key).map(|&position| &self.entries[position])
    }

    /// Returns true if the template declares `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Canonical position of `key`.
    pub fn position(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    /// Label of the section declaring `key`.
    pub fn section_of(&self, key: &str) -> Option<&'static str> {
        self.entry(key).map(|entry| entry.section)
    }

    /// Keys of `doc` that the template does not declare, in document order.
    pub fn unknown_keys<'a>(&self, doc: &'a ConfigDocument) -> Vec<&'a str> {
        doc.keys().filter(|key| !self.contains(key)).collect()
    }
}

/// The built-in VAME template.
///
/// Built on first use and shared for the rest of the process.
pub fn build_template() -> &'static ConfigTemplate {
    static TEMPLATE: OnceLock<ConfigTemplate> = OnceLock::new();
    TEMPLATE.get_or_init(|| ConfigTemplate::index_sections(VAME_SECTIONS))
}
