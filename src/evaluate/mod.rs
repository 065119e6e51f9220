//! Evaluation of a trained model against a project config.
//!
//! This module owns the orchestration only: it reads the config, resolves
//! hyperparameters and artifact paths, prepares the output directory and
//! hands two jobs to an [`EvaluationBackend`]. Loading the model, sampling
//! the test set and drawing plots are the backend's concern.

mod layout;
mod plan;
mod settings;

pub use layout::{EvaluationLayout, LossKind};
pub use plan::EvaluationPlan;
pub use settings::EvaluationSettings;

use crate::config::read_config;
use crate::constants::evaluation;
use crate::error::{Error, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Reconstruction plot request.
#[derive(Debug, Clone, Serialize)]
pub struct ReconstructionJob {
    /// Model hyperparameters.
    pub settings: EvaluationSettings,
    /// Trained model identifier.
    pub model_name: String,
    /// Checkpoint to load.
    pub checkpoint: PathBuf,
    /// Test sequences to sample from.
    pub test_data: PathBuf,
    /// Random seed for the run.
    pub seed: u64,
    /// Batch size for sampling the test set.
    pub batch_size: usize,
    /// Where to save the plot.
    pub output: PathBuf,
}

/// One loss curve to plot.
#[derive(Debug, Clone, Serialize)]
pub struct LossSeries {
    /// Which loss this is.
    pub kind: LossKind,
    /// Legend label.
    pub label: &'static str,
    /// Saved curve.
    pub path: PathBuf,
}

/// Loss plot request.
#[derive(Debug, Clone, Serialize)]
pub struct LossJob {
    /// Trained model identifier.
    pub model_name: String,
    /// Curves in plotting order.
    pub series: Vec<LossSeries>,
    /// Where to save the plot.
    pub output: PathBuf,
}

/// Numeric side of an evaluation run.
pub trait EvaluationBackend {
    /// Reconstruct a test batch and save the comparison plot.
    fn plot_reconstruction(&mut self, job: &ReconstructionJob) -> Result<()>;

    /// Plot the training loss curves.
    fn plot_loss(&mut self, job: &LossJob) -> Result<()>;
}

/// Artifacts produced by [`evaluate_model`].
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    /// Directory holding the plots.
    pub output_dir: PathBuf,
    /// Plot files, reconstruction first.
    pub artifacts: Vec<PathBuf>,
}

/// Evaluate `model_name` using the project config at `config_path`.
pub fn evaluate_model<B: EvaluationBackend + ?Sized>(
    config_path: &Path,
    model_name: &str,
    suffix: Option<&str>,
    backend: &mut B,
) -> Result<EvaluationReport> {
    let doc = read_config(config_path)?;
    let settings = EvaluationSettings::from_document(&doc)?;
    let layout = EvaluationLayout::new(&settings.project_path);

    let checkpoint = layout.checkpoint_path(model_name, &settings.project);
    if !checkpoint.is_file() {
        return Err(Error::ModelArtifactNotFound { path: checkpoint });
    }

    let output_dir = layout.evaluate_dir();
    std::fs::create_dir_all(&output_dir)?;

    info!(
        model = model_name,
        project = %settings.project,
        future = settings.prediction_decoder,
        "evaluating model"
    );

    let reconstruction = ReconstructionJob {
        model_name: model_name.to_string(),
        checkpoint,
        test_data: layout.test_data_path(),
        seed: evaluation::SEED,
        batch_size: evaluation::TEST_BATCH_SIZE,
        output: layout.reconstruction_plot_path(model_name, settings.prediction_decoder, suffix),
        settings,
    };
    backend.plot_reconstruction(&reconstruction)?;

    let loss = LossJob {
        model_name: model_name.to_string(),
        series: LossKind::ALL
            .iter()
            .map(|&kind| LossSeries {
                kind,
                label: kind.label(),
                path: layout.loss_path(kind, model_name),
            })
            .collect(),
        output: layout.loss_plot_path(model_name),
    };
    backend.plot_loss(&loss)?;

    info!(output = %output_dir.display(), "evaluation results written");

    Ok(EvaluationReport {
        output_dir,
        artifacts: vec![reconstruction.output, loss.output],
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::write_config;

    #[derive(Default)]
    struct RecordingBackend {
        reconstructions: Vec<ReconstructionJob>,
        losses: Vec<LossJob>,
        fail: bool,
    }

    impl EvaluationBackend for RecordingBackend {
        fn plot_reconstruction(&mut self, job: &ReconstructionJob) -> Result<()> {
            if self.fail {
                return Err(Error::Evaluation {
                    reason: "no device".to_string(),
                });
            }
            self.reconstructions.push(job.clone());
            Ok(())
        }

        fn plot_loss(&mut self, job: &LossJob) -> Result<()> {
            self.losses.push(job.clone());
            Ok(())
        }
    }

    fn project() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let doc = super::settings::tests::sample_document(dir.path().to_str().unwrap());
        let config = dir.path().join("config.yaml");
        write_config(&config, &doc).unwrap();
        (dir, config)
    }

    fn add_checkpoint(dir: &Path) {
        let best = dir.join("model").join("best_model");
        std::fs::create_dir_all(&best).unwrap();
        std::fs::write(best.join("VAME_mouse1.pkl"), b"weights").unwrap();
    }

    #[test]
    fn test_dispatches_both_jobs() {
        let (dir, config) = project();
        add_checkpoint(dir.path());

        let mut backend = RecordingBackend::default();
        let report = evaluate_model(&config, "VAME", Some("run2"), &mut backend).unwrap();

        assert!(dir.path().join("model").join("evaluate").is_dir());
        assert_eq!(report.artifacts.len(), 2);

        let job = &backend.reconstructions[0];
        assert_eq!(job.seed, 19);
        assert_eq!(job.batch_size, 64);
        assert_eq!(job.settings.temporal_window(), 60);
        assert!(job.output.ends_with("Future_ReconstructionVAME_run2.png"));

        let loss = &backend.losses[0];
        assert_eq!(loss.series.len(), 7);
        assert_eq!(loss.series[0].kind, LossKind::Train);
        assert_eq!(loss.series[6].label, "Prediction-Loss");
        assert!(loss.output.ends_with("MSE-and-KL-LossVAME.png"));
    }

    #[test]
    fn test_missing_checkpoint() {
        let (_dir, config) = project();
        let mut backend = RecordingBackend::default();

        let err = evaluate_model(&config, "VAME", None, &mut backend).unwrap_err();
        assert!(matches!(err, Error::ModelArtifactNotFound { .. }));
        assert!(backend.reconstructions.is_empty());
    }

    #[test]
    fn test_backend_failure_propagates() {
        let (dir, config) = project();
        add_checkpoint(dir.path());
        let mut backend = RecordingBackend {
            fail: true,
            ..Default::default()
        };

        let err = evaluate_model(&config, "VAME", None, &mut backend).unwrap_err();
        assert!(matches!(err, Error::Evaluation { .. }));
        assert!(backend.losses.is_empty());
    }

    #[test]
    fn test_does_not_modify_config() {
        let (dir, config) = project();
        add_checkpoint(dir.path());
        let before = std::fs::read_to_string(&config).unwrap();

        let mut backend = RecordingBackend::default();
        evaluate_model(&config, "VAME", None, &mut backend).unwrap();

        assert_eq!(std::fs::read_to_string(&config).unwrap(), before);
    }
}
