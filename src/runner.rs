//! Phase-scoped execution of a multiplication run.

use std::future::Future;
use std::time::{Duration, Instant};

use chrono::Utc;
use matrix_mul::partition::effective_workers;
use matrix_mul::{Matrix, ParallelMultiplier, codec};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::config::{GenerateArgs, MultiplyArgs};
use crate::error::RunError;
use crate::models::{PhaseTimings, RunReport};

/// Awaits `fut` and returns its output with the time it took.
pub async fn timed<F, T>(fut: F) -> (T, Duration)
where
    F: Future<Output = T>,
{
    let start = Instant::now();
    let output = fut.await;
    (output, start.elapsed())
}

/// Loads both inputs, multiplies them and stores the product.
///
/// Any failure aborts the run; nothing is written unless the product was
/// computed in full.
pub async fn run_multiply(args: &MultiplyArgs) -> Result<RunReport, RunError> {
    let started_at = Utc::now().timestamp_millis();
    let multiplier = ParallelMultiplier::new(args.workers)?;

    let (loaded, load) = timed(async {
        let (a, b) = tokio::try_join!(
            codec::load(&args.matrix_a),
            codec::load(&args.matrix_b)
        )?;
        codec::ensure_compatible(&a, &b)?;
        Ok::<_, matrix_mul::Error>((a, b))
    })
    .await;
    let (a, b) = loaded?;
    let rows = a.rows();
    let active_workers = effective_workers(rows, multiplier.num_workers());
    info!(
        a = %format!("{}x{}", a.rows(), a.cols()),
        b = %format!("{}x{}", b.rows(), b.cols()),
        elapsed_ms = load.as_secs_f64() * 1000.0,
        "inputs loaded"
    );

    let (product, compute) = timed(tokio::task::spawn_blocking(move || {
        multiplier.multiply(&a, &b)
    }))
    .await;
    let product = product??;

    let (stored, write) = timed(codec::store(&args.output, &product)).await;
    stored?;
    info!(
        path = %args.output.display(),
        elapsed_ms = write.as_secs_f64() * 1000.0,
        "product written"
    );

    Ok(RunReport {
        rows,
        workers: args.workers,
        active_workers,
        timings: PhaseTimings {
            load,
            compute,
            write,
        },
        started_at,
    })
}

/// Builds a `rows x cols` matrix of values drawn uniformly from `min..max`.
pub fn generate_matrix(
    rows: usize,
    cols: usize,
    seed: u64,
    min: f32,
    max: f32,
) -> Result<Matrix, RunError> {
    // gen_range also needs the width itself to be finite
    if !min.is_finite() || !max.is_finite() || min >= max || !(max - min).is_finite() {
        return Err(RunError::InvalidRange { min, max });
    }

    let mut rng = StdRng::seed_from_u64(seed);
    Ok(Matrix::from_fn(rows, cols, |_, _| rng.gen_range(min..max))?)
}

/// Generates a random matrix and writes it to `args.output`.
pub async fn run_generate(args: &GenerateArgs) -> Result<Matrix, RunError> {
    let matrix = generate_matrix(args.rows, args.cols, args.seed, args.min, args.max)?;
    codec::store(&args.output, &matrix).await?;
    info!(
        path = %args.output.display(),
        rows = args.rows,
        cols = args.cols,
        seed = args.seed,
        "matrix generated"
    );
    Ok(matrix)
}
