//! Binary matrix encoding.
//!
//! A matrix file is laid out as:
//!
//! ```text
//! int32              rows
//! int32              cols
//! float32[rows*cols] values, row-major
//! ```
//!
//! Every field uses the platform's native byte order. The format is an
//! exchange format between tools on the same machine, not a portable wire
//! format.

use std::io::{Read, Write};
use std::path::Path;

use tracing::debug;

use crate::Error;
use crate::matrix::{Matrix, alloc_buffer};

/// Size of the `rows, cols` header in bytes.
pub const HEADER_LEN: usize = 8;

const ELEMENT_LEN: usize = std::mem::size_of::<f32>();

// Multiple of ELEMENT_LEN, so every full chunk holds whole elements.
const CHUNK_LEN: usize = 64 * 1024;

/// Returns the encoded size of a `rows x cols` matrix in bytes.
pub fn encoded_len(rows: usize, cols: usize) -> usize {
    HEADER_LEN + rows * cols * ELEMENT_LEN
}

/// Decodes a matrix from an in-memory encoding.
///
/// The length of `bytes` is checked against the declared dimensions before
/// anything is allocated, so a short input always fails with
/// [`Error::TruncatedData`]. Bytes following the payload are ignored.
pub fn decode(bytes: &[u8]) -> Result<Matrix, Error> {
    if bytes.len() < HEADER_LEN {
        return Err(Error::TruncatedData {
            expected: HEADER_LEN,
            actual: bytes.len(),
        });
    }

    let (rows, cols) = parse_header(&bytes[..HEADER_LEN])?;
    let expected = payload_len(rows, cols)
        .and_then(|len| len.checked_add(HEADER_LEN))
        .unwrap_or(usize::MAX);
    if bytes.len() < expected {
        return Err(Error::TruncatedData {
            expected,
            actual: bytes.len(),
        });
    }

    let mut data = alloc_buffer::<f32>(rows * cols)?;
    data.extend(
        bytes[HEADER_LEN..expected]
            .chunks_exact(ELEMENT_LEN)
            .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]])),
    );

    Matrix::from_vec(rows, cols, data)
}

/// Decodes a matrix from `reader`.
///
/// The payload is read in fixed-size chunks and the result grows with the
/// bytes actually received, so a stream that ends early fails with
/// [`Error::TruncatedData`] however large its declared dimensions are.
/// Bytes following the payload are left unread.
pub fn read_from<R: Read>(mut reader: R) -> Result<Matrix, Error> {
    let mut header = Vec::with_capacity(HEADER_LEN);
    reader
        .by_ref()
        .take(HEADER_LEN as u64)
        .read_to_end(&mut header)?;
    if header.len() < HEADER_LEN {
        return Err(Error::TruncatedData {
            expected: HEADER_LEN,
            actual: header.len(),
        });
    }

    let (rows, cols) = parse_header(&header)?;
    let total = payload_len(rows, cols).unwrap_or(usize::MAX);

    let mut data: Vec<f32> = Vec::new();
    let mut chunk = Vec::with_capacity(CHUNK_LEN.min(total));
    let mut read = 0;
    while read < total {
        let want = (total - read).min(CHUNK_LEN);
        chunk.clear();
        reader.by_ref().take(want as u64).read_to_end(&mut chunk)?;
        if chunk.len() < want {
            return Err(Error::TruncatedData {
                expected: HEADER_LEN.saturating_add(total),
                actual: HEADER_LEN + read + chunk.len(),
            });
        }

        let count = want / ELEMENT_LEN;
        data.try_reserve(count).map_err(|_| Error::OutOfMemory {
            bytes: (data.len() + count) * ELEMENT_LEN,
        })?;
        data.extend(
            chunk
                .chunks_exact(ELEMENT_LEN)
                .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]])),
        );
        read += want;
    }

    Matrix::from_vec(rows, cols, data)
}

/// Encodes `matrix` into `writer`, payload in chunks.
pub fn write_to<W: Write>(mut writer: W, matrix: &Matrix) -> Result<(), Error> {
    let invalid = || Error::InvalidDimensions {
        rows: matrix.rows() as i64,
        cols: matrix.cols() as i64,
    };
    let rows = i32::try_from(matrix.rows()).map_err(|_| invalid())?;
    let cols = i32::try_from(matrix.cols()).map_err(|_| invalid())?;

    writer.write_all(&rows.to_ne_bytes())?;
    writer.write_all(&cols.to_ne_bytes())?;

    let mut chunk = Vec::with_capacity(CHUNK_LEN);
    for values in matrix.as_slice().chunks(CHUNK_LEN / ELEMENT_LEN) {
        chunk.clear();
        for value in values {
            chunk.extend_from_slice(&value.to_ne_bytes());
        }
        writer.write_all(&chunk)?;
    }
    writer.flush()?;
    Ok(())
}

/// Loads a matrix from the file at `path`.
pub async fn load(path: impl AsRef<Path>) -> Result<Matrix, Error> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await?;
    let matrix = decode(&bytes)?;
    debug!(
        path = %path.display(),
        rows = matrix.rows(),
        cols = matrix.cols(),
        "loaded matrix"
    );
    Ok(matrix)
}

/// Stores `matrix` into the file at `path`, replacing any existing content.
pub async fn store(path: impl AsRef<Path>, matrix: &Matrix) -> Result<(), Error> {
    let path = path.as_ref();
    let mut buf = alloc_buffer::<u8>(encoded_len(matrix.rows(), matrix.cols()))?;
    write_to(&mut buf, matrix)?;
    tokio::fs::write(path, buf).await?;
    debug!(
        path = %path.display(),
        rows = matrix.rows(),
        cols = matrix.cols(),
        "stored matrix"
    );
    Ok(())
}

/// Checks that `a x b` is defined, i.e. `a.cols == b.rows`.
pub fn ensure_compatible(a: &Matrix, b: &Matrix) -> Result<(), Error> {
    if a.cols() != b.rows() {
        return Err(Error::DimensionMismatch(
            a.rows(),
            a.cols(),
            b.rows(),
            b.cols(),
        ));
    }
    Ok(())
}

/// Parses and validates the `rows, cols` header.
fn parse_header(header: &[u8]) -> Result<(usize, usize), Error> {
    let rows = i32::from_ne_bytes([header[0], header[1], header[2], header[3]]);
    let cols = i32::from_ne_bytes([header[4], header[5], header[6], header[7]]);
    if rows <= 0 || cols <= 0 {
        return Err(Error::InvalidDimensions {
            rows: rows.into(),
            cols: cols.into(),
        });
    }
    Ok((rows as usize, cols as usize))
}

/// Payload size in bytes, `None` if it does not fit in `usize`.
fn payload_len(rows: usize, cols: usize) -> Option<usize> {
    rows.checked_mul(cols)?.checked_mul(ELEMENT_LEN)
}
