//! Dense row-major matrix of `f32` values.

use crate::Error;

/// A dense, row-major matrix of single-precision floats.
///
/// Both dimensions are always positive and `data.len() == rows * cols`.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl Matrix {
    /// Builds a matrix from row-major data, validating its shape.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f32>) -> Result<Self, Error> {
        let len = element_count(rows, cols)?;
        if data.len() != len {
            return Err(Error::InvalidDimensions {
                rows: rows as i64,
                cols: cols as i64,
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Builds a matrix from nested rows.
    ///
    /// Every row must have the same, non-zero length.
    pub fn from_rows(rows: &[Vec<f32>]) -> Result<Self, Error> {
        let cols = rows.first().map_or(0, |row| row.len());
        if rows.iter().any(|row| row.len() != cols) {
            return Err(Error::InvalidDimensions {
                rows: rows.len() as i64,
                cols: cols as i64,
            });
        }
        Self::from_vec(rows.len(), cols, rows.concat())
    }

    /// Allocates a zero-filled matrix.
    ///
    /// Fails with [`Error::OutOfMemory`] instead of aborting when the
    /// allocator cannot satisfy the request.
    pub fn zeros(rows: usize, cols: usize) -> Result<Self, Error> {
        let len = element_count(rows, cols)?;
        let mut data = alloc_buffer::<f32>(len)?;
        data.resize(len, 0.0);
        Ok(Self { rows, cols, data })
    }

    /// Builds a matrix by evaluating `f(i, j)` for every cell in row-major
    /// order.
    pub fn from_fn(
        rows: usize,
        cols: usize,
        mut f: impl FnMut(usize, usize) -> f32,
    ) -> Result<Self, Error> {
        let len = element_count(rows, cols)?;
        let mut data = alloc_buffer::<f32>(len)?;
        for i in 0..rows {
            data.extend((0..cols).map(|j| f(i, j)));
        }
        Ok(Self { rows, cols, data })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns the element at row `i`, column `j`.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of bounds.
    pub fn get(&self, i: usize, j: usize) -> f32 {
        assert!(i < self.rows && j < self.cols, "index ({i}, {j}) out of bounds");
        self.data[i * self.cols + j]
    }

    /// Returns row `i` as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.rows()`.
    pub fn row(&self, i: usize) -> &[f32] {
        assert!(i < self.rows, "row {i} out of bounds");
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Converts into nested rows, mostly useful for printing and tests.
    pub fn to_rows(&self) -> Vec<Vec<f32>> {
        self.data.chunks(self.cols).map(<[f32]>::to_vec).collect()
    }
}

/// Number of elements in a `rows x cols` matrix, rejecting empty shapes.
pub(crate) fn element_count(rows: usize, cols: usize) -> Result<usize, Error> {
    if rows == 0 || cols == 0 {
        return Err(Error::InvalidDimensions {
            rows: rows as i64,
            cols: cols as i64,
        });
    }
    rows.checked_mul(cols).ok_or(Error::OutOfMemory { bytes: usize::MAX })
}

/// Reserves an empty buffer able to hold `len` elements.
pub(crate) fn alloc_buffer<T>(len: usize) -> Result<Vec<T>, Error> {
    let bytes = len.saturating_mul(std::mem::size_of::<T>());
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| Error::OutOfMemory { bytes })?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_vec_checks_length() {
        let err = Matrix::from_vec(2, 2, vec![1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(err, Error::InvalidDimensions { rows: 2, cols: 2 }));
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        assert!(matches!(
            Matrix::zeros(0, 3),
            Err(Error::InvalidDimensions { rows: 0, cols: 3 })
        ));
        assert!(Matrix::from_vec(3, 0, Vec::new()).is_err());
    }

    #[test]
    fn test_from_rows_ragged() {
        let rows = vec![vec![1.0, 2.0], vec![3.0]];
        assert!(Matrix::from_rows(&rows).is_err());
    }

    #[test]
    fn test_accessors() {
        let m = Matrix::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        assert_eq!(m.rows(), 2);
        assert_eq!(m.cols(), 3);
        assert_eq!(m.get(1, 2), 6.0);
        assert_eq!(m.row(1), &[4.0, 5.0, 6.0]);
        assert_eq!(m.to_rows(), vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
    }

    #[test]
    #[should_panic(expected = "row 2 out of bounds")]
    fn test_row_out_of_bounds_panics() {
        let m = Matrix::zeros(2, 3).unwrap();
        let _ = m.row(2);
    }

    #[test]
    fn test_from_fn_is_row_major() {
        let m = Matrix::from_fn(2, 3, |i, j| (i * 10 + j) as f32).unwrap();
        assert_eq!(m.as_slice(), &[0.0, 1.0, 2.0, 10.0, 11.0, 12.0]);
    }

    #[test]
    fn test_zeros_absurd_size_is_out_of_memory() {
        let err = Matrix::zeros(usize::MAX / 8, 2).unwrap_err();
        assert!(matches!(err, Error::OutOfMemory { .. }));
    }
}
