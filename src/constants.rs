//! Application-wide constants.
//!
//! File names, project layout and evaluation defaults live here so the
//! reader, writer and evaluation code agree on them.

/// Application name used in user-facing messages.
pub const APP_NAME: &str = "vame";

/// Name of the configuration file inside a project directory.
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Header written above keys that are not part of the template.
pub const UNRECOGNIZED_SECTION_LABEL: &str = "Unrecognized keys";

/// Project directory layout, relative to `project_path`.
pub mod layout {
    /// Directory holding model checkpoints, losses and evaluation output.
    pub const MODEL_DIR: &str = "model";

    /// Directory with the best checkpoint per model name.
    pub const BEST_MODEL_DIR: &str = "best_model";

    /// Directory with per-epoch loss arrays.
    pub const MODEL_LOSSES_DIR: &str = "model_losses";

    /// Directory that receives evaluation plots.
    pub const EVALUATE_DIR: &str = "evaluate";

    /// Directory with the prepared train/test sequences.
    pub const TRAIN_DATA_DIR: &str = "data/train";

    /// File name of the held-out test sequences.
    pub const TEST_SEQUENCES_FILE: &str = "test_seq.npy";

    /// Extension of saved model checkpoints.
    pub const CHECKPOINT_EXTENSION: &str = "pkl";

    /// Extension of saved loss arrays.
    pub const LOSS_EXTENSION: &str = "npy";

    /// Subdirectories created for a new project.
    pub const PROJECT_SUBDIRS: &[&str] = &["data", "model", "results", "videos"];
}

/// Evaluation run defaults.
pub mod evaluation {
    /// Seed used for the evaluation run.
    pub const SEED: u64 = 19;

    /// Batch size used when sampling the test set.
    pub const TEST_BATCH_SIZE: usize = 64;
}
