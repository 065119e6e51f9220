//! Error types for vame.

use std::path::PathBuf;

/// Result type alias for vame operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for vame.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file does not exist.
    #[error(
        "config file '{path}' not found; make sure the file exists and the path has no stray spaces"
    )]
    ConfigNotFound {
        /// Path that was requested.
        path: PathBuf,
    },

    /// Failed to read configuration file.
    #[error("failed to read config file '{path}'")]
    ConfigRead {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}'")]
    ConfigParse {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_yaml::Error,
    },

    /// Configuration file parsed but is not a usable key-value document.
    #[error("config file '{path}' is not a key-value document: {reason}")]
    ConfigInvalid {
        /// Path to the config file.
        path: PathBuf,
        /// What was wrong with the document.
        reason: String,
    },

    /// Failed to write configuration file.
    #[error("failed to write config file '{path}'")]
    ConfigWrite {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize a configuration value.
    #[error("failed to serialize config key '{key}'")]
    ConfigSerialize {
        /// Key whose value could not be serialized.
        key: String,
        /// Underlying serialization error.
        #[source]
        source: serde_yaml::Error,
    },

    /// Failed to serialize command output as JSON.
    #[error("failed to serialize output")]
    JsonSerialize {
        /// Underlying serialization error.
        #[source]
        source: serde_json::Error,
    },

    /// A template definition lists the same key twice.
    #[error("template key '{key}' is declared more than once")]
    DuplicateTemplateKey {
        /// The duplicated key.
        key: String,
    },

    /// A key required by an operation is missing or unset.
    #[error("config key '{key}' is missing or unset")]
    MissingConfigKey {
        /// Name of the missing key.
        key: String,
    },

    /// A config value has the wrong type.
    #[error("config key '{key}' must be {expected}")]
    InvalidConfigValue {
        /// Name of the offending key.
        key: String,
        /// Human-readable description of the expected type.
        expected: &'static str,
    },

    /// A `key=value` override could not be parsed.
    #[error("invalid override '{input}': {reason}")]
    InvalidOverride {
        /// The raw override text.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Trained model checkpoint does not exist.
    #[error("trained model checkpoint does not exist: {path}")]
    ModelArtifactNotFound {
        /// Expected checkpoint path.
        path: PathBuf,
    },

    /// Evaluation backend failed.
    #[error("evaluation failed: {reason}")]
    Evaluation {
        /// Description of the failure.
        reason: String,
    },

    /// Project directory already exists.
    #[error("project directory already exists: {path}")]
    ProjectExists {
        /// Path of the existing directory.
        path: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_contains_path() {
        let err = Error::ConfigNotFound {
            path: PathBuf::from("/projects/mouse1/config.yaml"),
        };
        assert!(err.to_string().contains("/projects/mouse1/config.yaml"));
    }

    #[test]
    fn test_write_error_exposes_source() {
        use std::error::Error as _;

        let err = Error::ConfigWrite {
            path: PathBuf::from("config.yaml"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.source().is_some());
        assert!(err.to_string().contains("config.yaml"));
    }

    #[test]
    fn test_missing_key_message() {
        let err = Error::MissingConfigKey {
            key: "zdims".to_string(),
        };
        assert_eq!(err.to_string(), "config key 'zdims' is missing or unset");
    }
}
