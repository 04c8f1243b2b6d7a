//! Row partitioning and per-worker task descriptors.

use std::ops::Range;

use crate::Matrix;
use crate::kernel::multiply_rows;

/// Number of workers that actually receive rows.
///
/// Requests for more workers than there are rows are clamped to the row
/// count, so no worker is handed an empty range.
pub fn effective_workers(rows: usize, num_workers: usize) -> usize {
    num_workers.min(rows)
}

/// Splits `rows` output rows into contiguous ranges, one per worker.
///
/// Every worker gets `rows / workers` rows, except the last one which also
/// takes the remainder. The ranges cover `0..rows` exactly once, in order.
pub fn partition_rows(rows: usize, num_workers: usize) -> Vec<Range<usize>> {
    let workers = effective_workers(rows, num_workers);
    if workers == 0 {
        return Vec::new();
    }

    let base = rows / workers;
    (0..workers)
        .map(|worker| {
            let start = worker * base;
            let end = if worker == workers - 1 { rows } else { start + base };
            start..end
        })
        .collect()
}

/// Lifecycle of a [`MultiplicationTask`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Running,
    Completed,
}

/// One worker's share of a multiplication.
///
/// The task borrows both inputs read-only and owns the mutable slice of the
/// result that covers its rows and nothing else.
#[derive(Debug)]
pub struct MultiplicationTask<'a> {
    worker: usize,
    rows: Range<usize>,
    a: &'a Matrix,
    b: &'a Matrix,
    out: &'a mut [f32],
    state: TaskState,
}

impl MultiplicationTask<'_> {
    pub fn worker(&self) -> usize {
        self.worker
    }

    pub fn rows(&self) -> Range<usize> {
        self.rows.clone()
    }

    pub fn state(&self) -> TaskState {
        self.state
    }

    /// Runs the kernel over the task's rows.
    pub fn run(&mut self) {
        debug_assert_eq!(self.state, TaskState::Pending);
        self.state = TaskState::Running;
        multiply_rows(self.a, self.b, self.rows.clone(), self.out);
        self.state = TaskState::Completed;
    }
}

/// Builds one task per range, carving `out` into disjoint row slices.
///
/// `out` is the full row-major result buffer of `a.rows() x b.cols()`
/// elements and `ranges` must come from [`partition_rows`].
pub fn build_tasks<'a>(
    a: &'a Matrix,
    b: &'a Matrix,
    out: &'a mut [f32],
    ranges: Vec<Range<usize>>,
) -> Vec<MultiplicationTask<'a>> {
    let n = b.cols();
    let mut rest = out;
    let mut tasks = Vec::with_capacity(ranges.len());

    for (worker, rows) in ranges.into_iter().enumerate() {
        let (chunk, tail) = std::mem::take(&mut rest).split_at_mut(rows.len() * n);
        rest = tail;
        tasks.push(MultiplicationTask {
            worker,
            rows,
            a,
            b,
            out: chunk,
            state: TaskState::Pending,
        });
    }

    debug_assert!(rest.is_empty());
    tasks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_covers(ranges: &[Range<usize>], rows: usize) {
        let mut next = 0;
        for range in ranges {
            assert_eq!(range.start, next, "gap or overlap at {:?}", range);
            assert!(range.end > range.start, "empty range {:?}", range);
            next = range.end;
        }
        assert_eq!(next, rows);
    }

    #[test]
    fn test_even_split() {
        assert_eq!(partition_rows(8, 4), vec![0..2, 2..4, 4..6, 6..8]);
    }

    #[test]
    fn test_last_worker_takes_remainder() {
        let ranges = partition_rows(10, 3);
        assert_eq!(ranges, vec![0..3, 3..6, 6..10]);
        assert_eq!(ranges[2].len(), 10 / 3 + 10 % 3);
    }

    #[test]
    fn test_single_worker() {
        assert_eq!(partition_rows(7, 1), vec![0..7]);
    }

    #[test]
    fn test_more_workers_than_rows_is_clamped() {
        assert_eq!(effective_workers(3, 8), 3);
        assert_eq!(partition_rows(3, 8), vec![0..1, 1..2, 2..3]);
    }

    #[test]
    fn test_disjoint_cover_for_all_counts() {
        for rows in 1..40 {
            for workers in 1..50 {
                let ranges = partition_rows(rows, workers);
                assert_eq!(ranges.len(), workers.min(rows));
                assert_covers(&ranges, rows);

                let w = ranges.len();
                let base = rows / w;
                for range in &ranges[..w - 1] {
                    assert_eq!(range.len(), base);
                }
                assert_eq!(ranges[w - 1].len(), base + rows - base * w);
            }
        }
    }

    #[test]
    fn test_tasks_get_disjoint_slices() {
        let a = Matrix::zeros(5, 2).unwrap();
        let b = Matrix::zeros(2, 3).unwrap();
        let mut out = vec![0.0; 15];

        let tasks = build_tasks(&a, &b, &mut out, partition_rows(5, 2));
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].rows(), 0..2);
        assert_eq!(tasks[0].out.len(), 6);
        assert_eq!(tasks[1].rows(), 2..5);
        assert_eq!(tasks[1].out.len(), 9);
        assert!(tasks.iter().all(|t| t.state() == TaskState::Pending));
    }

    #[test]
    fn test_run_completes_task() {
        let a = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let b = Matrix::from_rows(&[vec![5.0, 6.0], vec![7.0, 8.0]]).unwrap();
        let mut out = vec![0.0; 4];

        for mut task in build_tasks(&a, &b, &mut out, partition_rows(2, 2)) {
            task.run();
            assert_eq!(task.state(), TaskState::Completed);
        }
        assert_eq!(out, vec![19.0, 22.0, 43.0, 50.0]);
    }
}
