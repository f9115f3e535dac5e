//! Error types for Planvoice.

use thiserror::Error;

/// Main error type for Planvoice operations.
#[derive(Error, Debug)]
pub enum PlanvoiceError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// Errors at the classifier/recognizer boundary.
///
/// These are fatal: the models are local, already-validated artifacts, so a
/// failure here indicates a setup defect rather than a transient condition.
/// There is no retry policy.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Context classifier returned out-of-range label {0} (expected 0..=6)")]
    UnknownContextLabel(i64),

    #[error("Action classifier returned out-of-range label {0} (expected 0 or 1)")]
    UnknownActionLabel(i64),

    #[error("Model invocation failed: {0}")]
    Inference(String),
}

/// Result type alias for Planvoice operations.
pub type Result<T> = std::result::Result<T, PlanvoiceError>;
