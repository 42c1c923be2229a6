//! Row-major line matrix
//!
//! One row per scan line, one column per sample (or depth bin). The buffer
//! is flat and row-major like every 2D array handed across the crate
//! boundary, so `as_slice()` can go straight into a numpy reshape.
//!
//! License: MIT

use crate::error::{OctError, OctResult};

/// A `rows x cols` row-major array
#[derive(Debug, Clone, PartialEq)]
pub struct LineMatrix<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T> LineMatrix<T> {
    /// Assemble a matrix from individual rows.
    ///
    /// Fails with `OctError::Shape` naming the first row whose length
    /// differs from row 0.
    pub fn from_rows(rows: Vec<Vec<T>>) -> OctResult<Self> {
        let n_rows = rows.len();
        let cols = rows.first().map_or(0, Vec::len);

        if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != cols) {
            return Err(OctError::Shape {
                row,
                expected: cols,
                actual: r.len(),
            });
        }

        let data: Vec<T> = rows.into_iter().flatten().collect();
        Ok(Self { rows: n_rows, cols, data })
    }

    /// Wrap a flat row-major buffer.
    pub fn from_flat(rows: usize, cols: usize, data: Vec<T>) -> OctResult<Self> {
        if data.len() != rows * cols {
            return Err(OctError::Shape {
                row: 0,
                expected: rows * cols,
                actual: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Borrow row `i`. Panics if `i >= rows`.
    pub fn row(&self, i: usize) -> &[T] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        (0..self.rows).map(move |i| self.row(i))
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Apply `f` to every row, producing a new matrix with rows of
    /// whatever (common) length `f` returns.
    pub fn map_rows<U, F>(&self, mut f: F) -> OctResult<LineMatrix<U>>
    where
        F: FnMut(&[T]) -> Vec<U>,
    {
        LineMatrix::from_rows(self.iter_rows().map(|r| f(r)).collect())
    }
}

impl<T: Copy> LineMatrix<T> {
    /// Element-wise map preserving shape
    pub fn map<U, F>(&self, f: F) -> LineMatrix<U>
    where
        F: Fn(T) -> U,
    {
        LineMatrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_layout() {
        let m = LineMatrix::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6]]).unwrap();
        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m.row(1), &[4, 5, 6]);
        assert_eq!(m.as_slice(), &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = LineMatrix::from_rows(vec![vec![0u8; 4], vec![0u8; 4], vec![0u8; 3]]).unwrap_err();
        assert_eq!(err, OctError::Shape { row: 2, expected: 4, actual: 3 });
    }

    #[test]
    fn test_from_flat_checks_length() {
        assert!(LineMatrix::from_flat(2, 2, vec![0.0; 4]).is_ok());
        assert!(matches!(
            LineMatrix::from_flat(2, 2, vec![0.0; 5]),
            Err(OctError::Shape { .. })
        ));
    }

    #[test]
    fn test_map_keeps_shape() {
        let m = LineMatrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let doubled = m.map(|v: f64| v * 2.0);
        assert_eq!(doubled.shape(), (2, 2));
        assert_eq!(doubled.row(1), &[6.0, 8.0]);
    }
}
