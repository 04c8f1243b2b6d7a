//! Per-worker multiply kernel.

use std::ops::Range;

use crate::Matrix;

/// Computes rows `rows` of `a * b` into `out`.
///
/// `out` holds exactly the result rows in `rows`, so its length is
/// `rows.len() * b.cols()`. This is the textbook i-j-k loop with a plain
/// `f32` accumulator; callers must have checked `a.cols() == b.rows()`.
pub fn multiply_rows(a: &Matrix, b: &Matrix, rows: Range<usize>, out: &mut [f32]) {
    let k = a.cols();
    let n = b.cols();
    let lhs = a.as_slice();
    let rhs = b.as_slice();
    debug_assert_eq!(out.len(), rows.len() * n);

    for (local, i) in rows.enumerate() {
        for j in 0..n {
            let mut sum = 0.0f32;
            for p in 0..k {
                sum += lhs[i * k + p] * rhs[p * n + j];
            }
            out[local * n + j] = sum;
        }
    }
}
