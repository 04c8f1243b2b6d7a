//! Error types for matrix-mul operations.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("truncated matrix data: expected {expected} bytes, found {actual}")]
    TruncatedData { expected: usize, actual: usize },

    #[error("matrix dimension mismatch: A is {0}x{1}, B is {2}x{3}")]
    DimensionMismatch(usize, usize, usize, usize),

    #[error("out of memory allocating {bytes} bytes")]
    OutOfMemory { bytes: usize },

    #[error("invalid matrix dimensions {rows}x{cols}")]
    InvalidDimensions { rows: i64, cols: i64 },

    #[error("worker count must be at least 1, got {0}")]
    InvalidWorkerCount(usize),

    #[error("failed to spawn worker thread: {0}")]
    WorkerSpawn(std::io::Error),

    #[error("worker {0} panicked")]
    WorkerPanicked(usize),
}
