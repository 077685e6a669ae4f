//! Cholesky Decomposition - Symmetric Positive Definite Factorization
//!
//! Factors a square matrix as `A = L Lᵗ` (left side, lower triangular `L`)
//! or `A = Rᵗ R` (right side, upper triangular `R`). Symmetry and positive
//! definiteness are checked while the factor is built, not up front; when
//! either fails the partial factor is kept and `is_spd` reports false.
//!
//! # Key Features
//! - One decomposition type for both triangle sides
//! - Row-oriented (left) and column-oriented (right) accumulation
//! - Forward and backward substitution for `solve` and `inv`
//!
//! @version 0.1.0
//! @author `ndstride` Development Team

use core::fmt;
use core::marker::PhantomData;

use ndstride_core::error::{Error, Result};
use ndstride_core::Numeric;
use ndstride_narray::NArray;

use crate::matrix::{require_float, require_matrix, Rhs, WorkMatrix};

// =============================================================================
// TriangleSide
// =============================================================================

/// Which triangular factor a Cholesky decomposition builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TriangleSide {
    /// `A = L Lᵗ` with `L` lower triangular.
    #[default]
    Left,
    /// `A = Rᵗ R` with `R` upper triangular.
    Right,
}

impl fmt::Display for TriangleSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
        }
    }
}

// =============================================================================
// Cholesky Struct
// =============================================================================

/// Cholesky factorization of a square matrix.
#[derive(Debug, Clone)]
pub struct Cholesky<T: Numeric> {
    side: TriangleSide,
    factor: WorkMatrix,
    spd: bool,
    _marker: PhantomData<T>,
}

impl<T: Numeric> Cholesky<T> {
    /// Factors `a` on the given side.
    ///
    /// # Returns
    /// The factorization, `InvalidShape` when `a` is not a square matrix,
    /// and `UnsupportedDType` for integer element types.
    pub fn new(a: &NArray<T>, side: TriangleSide) -> Result<Self> {
        require_float::<T>("Cholesky decomposition")?;
        require_matrix(a, "Cholesky decomposition")?;
        if a.dim(0) != a.dim(1) {
            return Err(Error::invalid_shape(format!(
                "Cholesky decomposition needs a square matrix, got {}",
                a.shape()
            )));
        }

        let a = WorkMatrix::from_narray(a);
        let (factor, spd) = match side {
            TriangleSide::Left => factor_left(&a),
            TriangleSide::Right => factor_right(&a),
        };
        if !spd {
            tracing::debug!(n = a.rows, %side, "matrix is not symmetric positive definite");
        }
        Ok(Self {
            side,
            factor,
            spd,
            _marker: PhantomData,
        })
    }

    /// The side this decomposition was built on.
    #[must_use]
    pub fn side(&self) -> TriangleSide {
        self.side
    }

    /// True when the source matrix is symmetric positive definite.
    #[must_use]
    pub fn is_spd(&self) -> bool {
        self.spd
    }

    fn n(&self) -> usize {
        self.factor.rows
    }

    /// Entry `(i, j)` of the lower factor `L`, whichever side was built.
    fn lower(&self, i: usize, j: usize) -> f64 {
        match self.side {
            TriangleSide::Left => self.factor.get(i, j),
            TriangleSide::Right => self.factor.get(j, i),
        }
    }

    /// The lower triangular factor `L` with `A = L Lᵗ`.
    pub fn l(&self) -> Result<NArray<T>> {
        self.triangle(true)
    }

    /// The upper triangular factor `R = Lᵗ` with `A = Rᵗ R`.
    pub fn r(&self) -> Result<NArray<T>> {
        self.triangle(false)
    }

    fn triangle(&self, lower: bool) -> Result<NArray<T>> {
        let n = self.n();
        let mut out = WorkMatrix::zeros(n, n);
        for i in 0..n {
            for j in 0..=i {
                if lower {
                    out.set(i, j, self.lower(i, j));
                } else {
                    out.set(j, i, self.lower(i, j));
                }
            }
        }
        out.to_narray(n, n)
    }

    /// Solves `A X = B` by forward then backward substitution.
    ///
    /// # Arguments
    /// * `b` - Matrix with `n` rows, or vector of length `n`
    ///
    /// # Returns
    /// `X` shaped like `b`; `NotSpd` when the factorization failed and
    /// `DimensionMismatch` for a wrong `b`.
    pub fn solve(&self, b: &NArray<T>) -> Result<NArray<T>> {
        let n = self.n();
        let mut rhs = Rhs::new(b, n)?;
        if !self.spd {
            return Err(Error::NotSpd);
        }
        let x = &mut rhs.matrix;
        let nx = x.cols;

        // L Y = B
        for k in 0..n {
            for j in 0..nx {
                let mut s = x.get(k, j);
                for i in 0..k {
                    s -= x.get(i, j) * self.lower(k, i);
                }
                x.set(k, j, s / self.lower(k, k));
            }
        }

        // Lᵗ X = Y
        for k in (0..n).rev() {
            for j in 0..nx {
                let mut s = x.get(k, j);
                for i in k + 1..n {
                    s -= x.get(i, j) * self.lower(i, k);
                }
                x.set(k, j, s / self.lower(k, k));
            }
        }

        rhs.finish(n)
    }

    /// Inverse of the source matrix.
    pub fn inv(&self) -> Result<NArray<T>> {
        let n = self.n();
        let identity = WorkMatrix::identity(n).to_narray::<T>(n, n)?;
        self.solve(&identity)
    }
}

// =============================================================================
// Factorization Kernels
// =============================================================================

/// Row by row: `L[j][k]` from the dot product of rows `j` and `k`.
fn factor_left(a: &WorkMatrix) -> (WorkMatrix, bool) {
    let n = a.rows;
    let mut l = WorkMatrix::zeros(n, n);
    let mut spd = true;

    for j in 0..n {
        let mut d = 0.0;
        for k in 0..j {
            let mut s = 0.0;
            for i in 0..k {
                s += l.get(k, i) * l.get(j, i);
            }
            s = (a.get(j, k) - s) / l.get(k, k);
            l.set(j, k, s);
            d += s * s;
            spd &= a.get(k, j) == a.get(j, k);
        }
        d = a.get(j, j) - d;
        spd &= d > 0.0;
        l.set(j, j, d.max(0.0).sqrt());
    }
    (l, spd)
}

/// Column by column: `R[k][j]` from the dot product of columns `k` and `j`.
fn factor_right(a: &WorkMatrix) -> (WorkMatrix, bool) {
    let n = a.rows;
    let mut r = WorkMatrix::zeros(n, n);
    let mut spd = true;

    for j in 0..n {
        let mut d = 0.0;
        for k in 0..j {
            let mut s = a.get(k, j);
            for i in 0..k {
                s -= r.get(i, k) * r.get(i, j);
            }
            s /= r.get(k, k);
            r.set(k, j, s);
            d += s * s;
            spd &= a.get(k, j) == a.get(j, k);
        }
        d = a.get(j, j) - d;
        spd &= d > 0.0;
        r.set(j, j, d.max(0.0).sqrt());
    }
    (r, spd)
}

// =============================================================================
// Tests
// =============================================================================
