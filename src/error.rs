//! Error types for the wildfire planner

use thiserror::Error;

/// Result type alias for planner operations
pub type Result<T> = std::result::Result<T, PlannerError>;

/// Main error type for the planner
#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Data error: {0}")]
    DataError(String),

    #[error("Dataset not found, probed: {}", .probed.join(", "))]
    DataNotFound { probed: Vec<String> },

    #[error("Preprocessing error: {0}")]
    PreprocessingError(String),

    #[error("Clustering error: {0}")]
    ClusteringError(String),

    #[error("Optimization error: {0}")]
    OptimizationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Feature not found: {0}")]
    FeatureNotFound(String),

    #[error("Model not fitted")]
    ModelNotFitted,

    #[error("Invalid parameter: {name} = {value}, {reason}")]
    InvalidParameter {
        name: String,
        value: String,
        reason: String,
    },
}

impl From<polars::error::PolarsError> for PlannerError {
    fn from(err: polars::error::PolarsError) -> Self {
        PlannerError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for PlannerError {
    fn from(err: serde_json::Error) -> Self {
        PlannerError::SerializationError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for PlannerError {
    fn from(err: ndarray::ShapeError) -> Self {
        PlannerError::ShapeError {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}
