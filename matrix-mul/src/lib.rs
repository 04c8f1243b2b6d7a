//! Row-partitioned parallel matrix multiplication.
//!
//! `matrix-mul` computes `C = A × B` for dense `f32` matrices by splitting
//! the rows of `C` into contiguous blocks and running one worker thread per
//! block. Matrices are exchanged with other tools through a small binary
//! format handled by the [`codec`] module.
//!
//! # Partitioning
//!
//! With `m` output rows and `w` workers (clamped to at most `m`), every
//! worker gets `m / w` rows and the last one also takes the remainder:
//!
//! - 10 rows, 3 workers: `0..3`, `3..6`, `6..10`
//! - 3 rows, 8 workers: clamped to 3 workers of one row each
//!
//! # Example
//!
//! ```no_run
//! use matrix_mul::{codec, multiply};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), matrix_mul::Error> {
//!     let a = codec::load("a.bin").await?;
//!     let b = codec::load("b.bin").await?;
//!     codec::ensure_compatible(&a, &b)?;
//!
//!     let c = multiply(&a, &b, 4)?;
//!     codec::store("c.bin", &c).await?;
//!     Ok(())
//! }
//! ```

pub mod codec;
mod error;
pub mod kernel;
mod matrix;
mod multiplier;
pub mod partition;

pub use error::Error;
pub use matrix::Matrix;
pub use multiplier::{ParallelMultiplier, multiply};
