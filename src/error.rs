//! Error types for the benchmark driver.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Matrix(#[from] matrix_mul::Error),

    #[error("compute task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("invalid value range: min {min} must be below max {max}")]
    InvalidRange { min: f32, max: f32 },
}
