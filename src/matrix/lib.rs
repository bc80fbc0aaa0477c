/* ************************************************************************ **
** This file is part of numlab, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                      **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Dense matrix data model shared by the numlab pipelines.
//!
//! The physical layout travels with the value as an explicit tag, so that
//! code which hands raw buffers to BLAS/LAPACK can check it instead of
//! trusting caller discipline.

use std::ops::Index;

/// Physical ordering of a 2-D array in linear memory.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Layout {
    /// Element (i, j) lives at `i * cols + j`.
    RowMajor,
    /// Element (i, j) lives at `j * rows + i`.
    ColumnMajor,
}

impl Layout {
    /// Stride between consecutive rows (row-major) or columns (column-major).
    pub fn leading_dimension(self, rows: usize, cols: usize) -> usize {
        match self {
            Layout::RowMajor => cols,
            Layout::ColumnMajor => rows,
        }
    }
}

/// Owned dense matrix of doubles.
///
/// Immutable once constructed; every derived matrix gets a fresh buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix {
    // invariant: rows > 0, cols > 0
    // invariant: rows * cols == data.len()
    data: Vec<f64>,
    rows: usize,
    cols: usize,
    layout: Layout,
}

impl DenseMatrix {
    pub fn from_row_major(rows: usize, cols: usize, data: Vec<f64>) -> Self {
        Self::from_parts(rows, cols, Layout::RowMajor, data)
    }

    pub fn from_column_major(rows: usize, cols: usize, data: Vec<f64>) -> Self {
        Self::from_parts(rows, cols, Layout::ColumnMajor, data)
    }

    fn from_parts(rows: usize, cols: usize, layout: Layout, data: Vec<f64>) -> Self {
        assert!(rows > 0 && cols > 0, "degenerate matrix shape {}x{}", rows, cols);
        assert_eq!(data.len(), rows * cols, "storage does not match {}x{}", rows, cols);
        DenseMatrix { data, rows, cols, layout }
    }

    pub fn zeros(rows: usize, cols: usize, layout: Layout) -> Self {
        Self::from_parts(rows, cols, layout, vec![0.0; rows * cols])
    }

    pub fn rows(&self) -> usize { self.rows }
    pub fn cols(&self) -> usize { self.cols }
    pub fn layout(&self) -> Layout { self.layout }

    pub fn leading_dimension(&self) -> usize {
        self.layout.leading_dimension(self.rows, self.cols)
    }

    pub fn data(&self) -> &[f64] { &self.data }
    pub fn data_mut(&mut self) -> &mut [f64] { &mut self.data }
    pub fn into_data(self) -> Vec<f64> { self.data }

    /// Copy into a freshly allocated column-major value.
    ///
    /// Values are moved verbatim (no arithmetic), so the conversion is
    /// invertible bit-for-bit.
    pub fn to_column_major(&self) -> DenseMatrix {
        match self.layout {
            Layout::ColumnMajor => self.clone(),
            Layout::RowMajor => {
                let mut data = vec![0.0; self.data.len()];
                for i in 0..self.rows {
                    for j in 0..self.cols {
                        data[j * self.rows + i] = self.data[i * self.cols + j];
                    }
                }
                DenseMatrix { data, rows: self.rows, cols: self.cols, layout: Layout::ColumnMajor }
            },
        }
    }

    /// Inverse of [`DenseMatrix::to_column_major`].
    pub fn to_row_major(&self) -> DenseMatrix {
        match self.layout {
            Layout::RowMajor => self.clone(),
            Layout::ColumnMajor => {
                let mut data = vec![0.0; self.data.len()];
                for i in 0..self.rows {
                    for j in 0..self.cols {
                        data[i * self.cols + j] = self.data[j * self.rows + i];
                    }
                }
                DenseMatrix { data, rows: self.rows, cols: self.cols, layout: Layout::RowMajor }
            },
        }
    }
}

impl Index<(usize, usize)> for DenseMatrix {
    type Output = f64;

    #[inline(always)] // inlining should often remove bounds checks
    fn index(&self, (r, c): (usize, usize)) -> &f64 {
        assert!(r < self.rows && c < self.cols,
            "index ({}, {}) out of bounds for {}x{}", r, c, self.rows, self.cols);
        match self.layout {
            Layout::RowMajor => &self.data[r * self.cols + c],
            Layout::ColumnMajor => &self.data[c * self.rows + r],
        }
    }
}
