//! Typed model settings extracted from a project config.

use crate::config::ConfigDocument;
use crate::error::{Error, Result};
use serde::Serialize;
use std::path::PathBuf;

/// Hyperparameters and identifiers an evaluation run needs.
///
/// Only presence and type are checked; numeric ranges are the model's
/// business.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationSettings {
    /// Project name (`Project`).
    pub project: String,
    /// Project root directory (`project_path`).
    pub project_path: PathBuf,
    /// Number of input features per frame.
    pub num_features: usize,
    /// Latent dimension count.
    pub zdims: usize,
    /// Half of the temporal window, in frames.
    pub time_window: usize,
    /// Whether the model has a future-prediction decoder.
    pub prediction_decoder: bool,
    /// Prediction horizon, in frames.
    pub prediction_steps: usize,
    /// Encoder layer sizes.
    pub hidden_size_layer_1: usize,
    /// Second encoder layer size.
    pub hidden_size_layer_2: usize,
    /// Reconstruction decoder size.
    pub hidden_size_rec: usize,
    /// Prediction decoder size.
    pub hidden_size_pred: usize,
    /// Encoder dropout rate.
    pub dropout_encoder: f64,
    /// Reconstruction decoder dropout rate.
    pub dropout_rec: f64,
    /// Prediction decoder dropout rate.
    pub dropout_pred: f64,
}

impl EvaluationSettings {
    /// Extract settings from `doc`.
    pub fn from_document(doc: &ConfigDocument) -> Result<Self> {
        Ok(Self {
            project: require_str(doc, "Project")?.to_string(),
            project_path: PathBuf::from(require_str(doc, "project_path")?),
            num_features: require_usize(doc, "num_features")?,
            zdims: require_usize(doc, "zdims")?,
            time_window: require_usize(doc, "time_window")?,
            prediction_decoder: require_flag(doc, "prediction_decoder")?,
            prediction_steps: require_usize(doc, "prediction_steps")?,
            hidden_size_layer_1: require_usize(doc, "hidden_size_layer_1")?,
            hidden_size_layer_2: require_usize(doc, "hidden_size_layer_2")?,
            hidden_size_rec: require_usize(doc, "hidden_size_rec")?,
            hidden_size_pred: require_usize(doc, "hidden_size_pred")?,
            dropout_encoder: require_f64(doc, "dropout_encoder")?,
            dropout_rec: require_f64(doc, "dropout_rec")?,
            dropout_pred: require_f64(doc, "dropout_pred")?,
        })
    }

    /// Full input window seen by the model (twice `time_window`).
    pub const fn temporal_window(&self) -> usize {
        self.time_window * 2
    }

    /// Length of the reconstructed half of the window.
    pub const fn seq_len_half(&self) -> usize {
        self.time_window
    }
}

fn require<'a>(doc: &'a ConfigDocument, key: &str) -> Result<&'a serde_yaml::Value> {
    doc.get(key)
        .filter(|value| !value.is_null())
        .ok_or_else(|| Error::MissingConfigKey {
            key: key.to_string(),
        })
}

fn invalid(key: &str, expected: &'static str) -> Error {
    Error::InvalidConfigValue {
        key: key.to_string(),
        expected,
    }
}

fn require_str<'a>(doc: &'a ConfigDocument, key: &str) -> Result<&'a str> {
    require(doc, key)?
        .as_str()
        .ok_or_else(|| invalid(key, "a string"))
}

fn require_usize(doc: &ConfigDocument, key: &str) -> Result<usize> {
    require(doc, key)?
        .as_u64()
        .and_then(|value| usize::try_from(value).ok())
        .ok_or_else(|| invalid(key, "a non-negative integer"))
}

fn require_f64(doc: &ConfigDocument, key: &str) -> Result<f64> {
    require(doc, key)?
        .as_f64()
        .ok_or_else(|| invalid(key, "a number"))
}

// Older projects store flags as booleans or as 0/1
fn require_flag(doc: &ConfigDocument, key: &str) -> Result<bool> {
    let value = require(doc, key)?;
    value
        .as_bool()
        .or_else(|| match value.as_u64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        })
        .ok_or_else(|| invalid(key, "a boolean"))
}
