//! Benchmark driver for `matrix-mul`.
//!
//! Loads two matrices, multiplies them on a fixed number of worker threads
//! and writes the product, timing each of the three phases separately. The
//! timings come back as a [`RunReport`](models::RunReport) instead of being
//! accumulated in global state.

pub mod config;
pub mod error;
pub mod models;
pub mod runner;
