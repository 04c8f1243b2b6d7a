//! Fork-join orchestration of the row-partitioned multiply.

use std::thread;
use std::time::Instant;

use tracing::{debug, info};

use crate::codec::ensure_compatible;
use crate::partition::{MultiplicationTask, TaskState, build_tasks, partition_rows};
use crate::{Error, Matrix};

/// Multiplies matrices by splitting the output rows across worker threads.
///
/// Each call partitions the rows of the result into contiguous blocks, spawns
/// one thread per block and joins them all before returning. Inputs are
/// shared read-only; every worker writes only its own rows of the result.
///
/// # Example
///
/// ```
/// use matrix_mul::{Matrix, ParallelMultiplier};
///
/// let a = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]])?;
/// let b = Matrix::from_rows(&[vec![5.0, 6.0], vec![7.0, 8.0]])?;
///
/// let c = ParallelMultiplier::new(2)?.multiply(&a, &b)?;
/// assert_eq!(c.to_rows(), vec![vec![19.0, 22.0], vec![43.0, 50.0]]);
/// # Ok::<(), matrix_mul::Error>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ParallelMultiplier {
    num_workers: usize,
}

impl ParallelMultiplier {
    /// Creates a multiplier that uses up to `num_workers` threads.
    pub fn new(num_workers: usize) -> Result<Self, Error> {
        if num_workers == 0 {
            return Err(Error::InvalidWorkerCount(num_workers));
        }
        Ok(Self { num_workers })
    }

    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    /// Computes `a * b`.
    ///
    /// Fails with [`Error::DimensionMismatch`] before allocating anything if
    /// `a.cols() != b.rows()`, and with [`Error::OutOfMemory`] if the result
    /// cannot be allocated. No worker is started in either case.
    pub fn multiply(&self, a: &Matrix, b: &Matrix) -> Result<Matrix, Error> {
        ensure_compatible(a, b)?;

        let mut result = Matrix::zeros(a.rows(), b.cols())?;
        let ranges = partition_rows(a.rows(), self.num_workers);
        if ranges.len() < self.num_workers {
            debug!(
                requested = self.num_workers,
                used = ranges.len(),
                rows = a.rows(),
                "more workers than rows, clamping"
            );
        }

        let start = Instant::now();
        let workers = ranges.len();
        let tasks = build_tasks(a, b, result.as_mut_slice(), ranges);
        run_tasks(tasks)?;

        info!(
            rows = a.rows(),
            inner = a.cols(),
            cols = b.cols(),
            workers,
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "multiplication finished"
        );
        Ok(result)
    }
}

/// Computes `a * b` using up to `num_workers` threads.
pub fn multiply(a: &Matrix, b: &Matrix, num_workers: usize) -> Result<Matrix, Error> {
    ParallelMultiplier::new(num_workers)?.multiply(a, b)
}

/// Spawns one scoped thread per task and waits for all of them.
fn run_tasks(tasks: Vec<MultiplicationTask<'_>>) -> Result<(), Error> {
    thread::scope(|s| {
        let mut handles = Vec::with_capacity(tasks.len());
        let mut spawn_error = None;

        for mut task in tasks {
            let worker = task.worker();
            let spawned = thread::Builder::new()
                .name(format!("matmul-worker-{worker}"))
                .spawn_scoped(s, move || {
                    let rows = task.rows();
                    let start = Instant::now();
                    task.run();
                    debug!(
                        worker,
                        start_row = rows.start,
                        end_row = rows.end,
                        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
                        "worker done"
                    );
                    task.state()
                });

            match spawned {
                Ok(handle) => handles.push((worker, handle)),
                Err(e) => {
                    spawn_error = Some(e);
                    break;
                }
            }
        }

        // Join everything that was started, even after a spawn failure.
        let mut panicked = None;
        for (worker, handle) in handles {
            match handle.join() {
                Ok(state) => debug_assert_eq!(state, TaskState::Completed),
                Err(_) => {
                    panicked.get_or_insert(worker);
                }
            }
        }

        if let Some(e) = spawn_error {
            return Err(Error::WorkerSpawn(e));
        }
        if let Some(worker) = panicked {
            return Err(Error::WorkerPanicked(worker));
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(rows: usize, cols: usize, seed: usize) -> Matrix {
        let data = (0..rows * cols)
            .map(|i| ((i * 7 + seed) % 11) as f32 - 5.0)
            .collect();
        Matrix::from_vec(rows, cols, data).unwrap()
    }

    #[test]
    fn test_zero_workers_rejected() {
        assert!(matches!(
            ParallelMultiplier::new(0),
            Err(Error::InvalidWorkerCount(0))
        ));
        let a = sample(2, 2, 0);
        assert!(matches!(multiply(&a, &a, 0), Err(Error::InvalidWorkerCount(0))));
    }

    #[test]
    fn test_dimension_mismatch() {
        let a = sample(2, 3, 0);
        let b = sample(2, 3, 1);
        assert!(matches!(
            multiply(&a, &b, 2),
            Err(Error::DimensionMismatch(2, 3, 2, 3))
        ));
    }

    #[test]
    fn test_scenario_2x2() {
        let a = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let b = Matrix::from_rows(&[vec![5.0, 6.0], vec![7.0, 8.0]]).unwrap();
        for workers in [1, 2] {
            let c = multiply(&a, &b, workers).unwrap();
            assert_eq!(c.to_rows(), vec![vec![19.0, 22.0], vec![43.0, 50.0]]);
        }
    }

    #[test]
    fn test_excess_workers_match_single_worker() {
        let a = sample(3, 4, 2);
        let b = sample(4, 5, 3);
        let expected = multiply(&a, &b, 1).unwrap();
        assert_eq!(multiply(&a, &b, 16).unwrap(), expected);
    }

    #[test]
    fn test_result_shape() {
        let c = multiply(&sample(4, 3, 0), &sample(3, 6, 1), 3).unwrap();
        assert_eq!((c.rows(), c.cols()), (4, 6));
    }
}
