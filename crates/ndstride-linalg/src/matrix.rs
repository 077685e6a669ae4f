//! Working Matrices - Dense f64 Buffers for Factorizations
//!
//! Decompositions copy their input into a row-major f64 `WorkMatrix`,
//! whatever the element type and layout of the source array, and convert
//! their outputs back to the caller's element type.
//!
//! @version 0.1.0
//! @author `ndstride` Development Team

use ndstride_core::error::{Error, Result};
use ndstride_core::{Numeric, Order};
use ndstride_narray::{NArray, Shape};

// =============================================================================
// Preconditions
// =============================================================================

/// Rejects element types without real division.
pub(crate) fn require_float<T: Numeric>(operation: &'static str) -> Result<()> {
    if T::DTYPE.is_float() {
        Ok(())
    } else {
        Err(Error::UnsupportedDType {
            dtype: T::DTYPE,
            operation,
        })
    }
}

/// Rejects arrays that are not rank-2.
pub(crate) fn require_matrix<T: Numeric>(a: &NArray<T>, operation: &str) -> Result<()> {
    if a.is_matrix() {
        Ok(())
    } else {
        Err(Error::invalid_shape(format!(
            "{operation} needs a matrix, got {}",
            a.shape()
        )))
    }
}

// =============================================================================
// WorkMatrix
// =============================================================================

/// Row-major f64 matrix.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct WorkMatrix {
    pub rows: usize,
    pub cols: usize,
    data: Vec<f64>,
}

impl WorkMatrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.set(i, i, 1.0);
        }
        m
    }

    /// Copies a matrix, or a vector as a single column.
    pub fn from_narray<T: Numeric>(a: &NArray<T>) -> Self {
        let (rows, cols) = match a.rank() {
            1 => (a.dim(0), 1),
            _ => (a.dim(0), a.dim(1)),
        };
        Self {
            rows,
            cols,
            data: a.to_vec(Order::C).into_iter().map(Numeric::to_f64).collect(),
        }
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.cols + j]
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        self.data[i * self.cols + j] = value;
    }

    #[inline]
    pub fn add(&mut self, i: usize, j: usize, value: f64) {
        self.data[i * self.cols + j] += value;
    }

    /// Converts the top-left `rows x cols` block to an array of `T`.
    pub fn to_narray<T: Numeric>(&self, rows: usize, cols: usize) -> Result<NArray<T>> {
        let mut values = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                values.push(T::from_f64(self.get(i, j)));
            }
        }
        NArray::wrap(&Shape::of(&[rows, cols])?, values, Order::C)
    }

    /// Converts column 0 to a vector of `T`.
    pub fn column_to_narray<T: Numeric>(&self, rows: usize) -> Result<NArray<T>> {
        let values = (0..rows).map(|i| T::from_f64(self.get(i, 0))).collect();
        NArray::wrap(&Shape::of(&[rows])?, values, Order::C)
    }
}

/// Right-hand side of a solve, remembering whether it was a vector.
pub(crate) struct Rhs {
    pub matrix: WorkMatrix,
    pub vector: bool,
}

impl Rhs {
    /// Accepts a vector or matrix with `rows` leading extent.
    pub fn new<T: Numeric>(b: &NArray<T>, rows: usize) -> Result<Self> {
        if b.rank() != 1 && b.rank() != 2 {
            return Err(Error::invalid_shape(format!(
                "right-hand side must be a vector or a matrix, got {}",
                b.shape()
            )));
        }
        if b.dim(0) != rows {
            return Err(Error::dimension_mismatch(&[rows], &[b.dim(0)]));
        }
        Ok(Self {
            matrix: WorkMatrix::from_narray(b),
            vector: b.rank() == 1,
        })
    }

    /// Converts the first `rows` rows of the solution back to `T`.
    pub fn finish<T: Numeric>(self, rows: usize) -> Result<NArray<T>> {
        if self.vector {
            self.matrix.column_to_narray(rows)
        } else {
            self.matrix.to_narray(rows, self.matrix.cols)
        }
    }
}
