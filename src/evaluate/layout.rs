//! Artifact paths inside a project directory.

use crate::constants::layout;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Loss curves saved during training.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LossKind {
    /// Total training loss.
    Train,
    /// Total test loss.
    Test,
    /// Reconstruction MSE on the training set.
    MseTrain,
    /// Reconstruction MSE on the test set.
    MseTest,
    /// K-means regularization loss.
    KMeans,
    /// KL divergence.
    Kl,
    /// Future-prediction loss.
    Future,
}

impl LossKind {
    /// All kinds, in plotting order.
    pub const ALL: [Self; 7] = [
        Self::Train,
        Self::Test,
        Self::MseTrain,
        Self::MseTest,
        Self::KMeans,
        Self::Kl,
        Self::Future,
    ];

    /// File name prefix used by the trainer.
    pub const fn file_prefix(self) -> &'static str {
        match self {
            Self::Train => "train",
            Self::Test => "test",
            Self::MseTrain => "mse_train",
            Self::MseTest => "mse_test",
            Self::KMeans => "kmeans",
            Self::Kl => "kl",
            Self::Future => "fut",
        }
    }

    /// Legend label for plots.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Train => "Train-Loss",
            Self::Test => "Test-Loss",
            Self::MseTrain => "MSE-Train-Loss",
            Self::MseTest => "MSE-Test-Loss",
            Self::KMeans => "KMeans-Loss",
            Self::Kl => "KL-Loss",
            Self::Future => "Prediction-Loss",
        }
    }
}

/// Resolves artifact locations under a project root.
#[derive(Debug, Clone)]
pub struct EvaluationLayout {
    project_path: PathBuf,
}

impl EvaluationLayout {
    /// Layout rooted at `project_path`.
    pub fn new(project_path: impl Into<PathBuf>) -> Self {
        Self {
            project_path: project_path.into(),
        }
    }

    /// Project root.
    pub fn project_path(&self) -> &Path {
        &self.project_path
    }

    /// `model/` under the project.
    pub fn model_dir(&self) -> PathBuf {
        self.project_path.join(layout::MODEL_DIR)
    }

    /// Directory receiving evaluation plots.
    pub fn evaluate_dir(&self) -> PathBuf {
        self.model_dir().join(layout::EVALUATE_DIR)
    }

    /// Best checkpoint for `model_name` in project `project`.
    pub fn checkpoint_path(&self, model_name: &str, project: &str) -> PathBuf {
        self.model_dir().join(layout::BEST_MODEL_DIR).join(format!(
            "{model_name}_{project}.{}",
            layout::CHECKPOINT_EXTENSION
        ))
    }

    /// Held-out test sequences.
    pub fn test_data_path(&self) -> PathBuf {
        self.project_path
            .join(layout::TRAIN_DATA_DIR)
            .join(layout::TEST_SEQUENCES_FILE)
    }

    /// Saved loss curve of `kind` for `model_name`.
    pub fn loss_path(&self, kind: LossKind, model_name: &str) -> PathBuf {
        self.model_dir().join(layout::MODEL_LOSSES_DIR).join(format!(
            "{}_losses_{model_name}.{}",
            kind.file_prefix(),
            layout::LOSS_EXTENSION
        ))
    }

    /// Output path of the reconstruction plot.
    ///
    /// The suffix only applies to models with a prediction decoder.
    pub fn reconstruction_plot_path(
        &self,
        model_name: &str,
        future: bool,
        suffix: Option<&str>,
    ) -> PathBuf {
        let file_name = match (future, suffix) {
            (true, Some(suffix)) => format!("Future_Reconstruction{model_name}_{suffix}.png"),
            (true, None) => format!("Future_Reconstruction{model_name}.png"),
            (false, _) => format!("Reconstruction_{model_name}.png"),
        };
        self.evaluate_dir().join(file_name)
    }

    /// Output path of the loss plot.
    pub fn loss_plot_path(&self, model_name: &str) -> PathBuf {
        self.evaluate_dir()
            .join(format!("MSE-and-KL-Loss{model_name}.png"))
    }
}
