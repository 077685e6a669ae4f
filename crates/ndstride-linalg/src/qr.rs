//! QR Decomposition - Householder Reflections
//!
//! Factors an `m x n` matrix with `m >= n` as `A = Q R`, where `Q` has
//! orthonormal columns and `R` is upper triangular. The Householder
//! vectors are kept packed below the diagonal of a working copy and the
//! diagonal of `R` is kept apart, so `Q` is only formed on request.
//!
//! # Key Features
//! - Overflow-safe column norms through `hypot` accumulation
//! - Least-squares `solve` for matrix or vector right-hand sides
//! - Inverse (or left pseudo-inverse) through `solve` of the identity
//!
//! @version 0.1.0
//! @author `ndstride` Development Team

use core::marker::PhantomData;

use ndstride_core::error::{Error, Result};
use ndstride_core::Numeric;
use ndstride_narray::NArray;

use crate::matrix::{require_float, require_matrix, Rhs, WorkMatrix};

// =============================================================================
// QrDecomposition Struct
// =============================================================================

/// Householder QR factorization of a matrix.
#[derive(Debug, Clone)]
pub struct QrDecomposition<T: Numeric> {
    qr: WorkMatrix,
    rdiag: Vec<f64>,
    _marker: PhantomData<T>,
}

impl<T: Numeric> QrDecomposition<T> {
    /// Factors `a`.
    ///
    /// # Arguments
    /// * `a` - An `m x n` float matrix with `m >= n`, in any layout
    ///
    /// # Returns
    /// The factorization, `InvalidShape` for non-matrices or `m < n`, and
    /// `UnsupportedDType` for integer element types.
    pub fn new(a: &NArray<T>) -> Result<Self> {
        require_float::<T>("QR decomposition")?;
        require_matrix(a, "QR decomposition")?;
        let (m, n) = (a.dim(0), a.dim(1));
        if m < n {
            return Err(Error::invalid_shape(format!(
                "QR decomposition needs at least as many rows as columns, got {}",
                a.shape()
            )));
        }

        let mut qr = WorkMatrix::from_narray(a);
        let mut rdiag = vec![0.0; n];

        for k in 0..n {
            let mut nrm = 0.0_f64;
            for i in k..m {
                nrm = nrm.hypot(qr.get(i, k));
            }

            if nrm != 0.0 {
                if qr.get(k, k) < 0.0 {
                    nrm = -nrm;
                }
                for i in k..m {
                    qr.set(i, k, qr.get(i, k) / nrm);
                }
                qr.add(k, k, 1.0);

                for j in k + 1..n {
                    let mut s = 0.0;
                    for i in k..m {
                        s += qr.get(i, k) * qr.get(i, j);
                    }
                    s = -s / qr.get(k, k);
                    for i in k..m {
                        qr.add(i, j, s * qr.get(i, k));
                    }
                }
            }
            rdiag[k] = -nrm;
        }

        let decomposition = Self {
            qr,
            rdiag,
            _marker: PhantomData,
        };
        if !decomposition.is_full_rank() {
            tracing::debug!(rows = m, cols = n, "QR factor is rank deficient");
        }
        Ok(decomposition)
    }

    fn rows(&self) -> usize {
        self.qr.rows
    }

    fn cols(&self) -> usize {
        self.qr.cols
    }

    /// True when every diagonal entry of `R` is non-zero.
    #[must_use]
    pub fn is_full_rank(&self) -> bool {
        self.rdiag.iter().all(|&d| d != 0.0)
    }

    /// The `m x n` lower trapezoidal matrix of Householder vectors.
    pub fn h(&self) -> Result<NArray<T>> {
        let (m, n) = (self.rows(), self.cols());
        let mut h = WorkMatrix::zeros(m, n);
        for i in 0..m {
            for j in 0..=i.min(n - 1) {
                h.set(i, j, self.qr.get(i, j));
            }
        }
        h.to_narray(m, n)
    }

    /// The `n x n` upper triangular factor.
    pub fn r(&self) -> Result<NArray<T>> {
        let n = self.cols();
        let mut r = WorkMatrix::zeros(n, n);
        for i in 0..n {
            r.set(i, i, self.rdiag[i]);
            for j in i + 1..n {
                r.set(i, j, self.qr.get(i, j));
            }
        }
        r.to_narray(n, n)
    }

    /// The `m x n` factor with orthonormal columns.
    pub fn q(&self) -> Result<NArray<T>> {
        let (m, n) = (self.rows(), self.cols());
        let mut q = WorkMatrix::zeros(m, n);
        for k in (0..n).rev() {
            q.set(k, k, 1.0);
            let pivot = self.qr.get(k, k);
            if pivot == 0.0 {
                continue;
            }
            for j in k..n {
                let mut s = 0.0;
                for i in k..m {
                    s += self.qr.get(i, k) * q.get(i, j);
                }
                s = -s / pivot;
                for i in k..m {
                    q.add(i, j, s * self.qr.get(i, k));
                }
            }
        }
        q.to_narray(m, n)
    }

    /// Least-squares solution `X` of `A X = B`.
    ///
    /// # Arguments
    /// * `b` - Matrix with `m` rows, or vector of length `m`
    ///
    /// # Returns
    /// `X` with `n` rows, a vector when `b` is one; `RankDeficient` when
    /// `A` is not of full rank and `DimensionMismatch` for a wrong `b`.
    pub fn solve(&self, b: &NArray<T>) -> Result<NArray<T>> {
        let (m, n) = (self.rows(), self.cols());
        let mut rhs = Rhs::new(b, m)?;
        if !self.is_full_rank() {
            return Err(Error::RankDeficient);
        }
        let x = &mut rhs.matrix;
        let nx = x.cols;

        // apply Q^T
        for k in 0..n {
            let pivot = self.qr.get(k, k);
            for j in 0..nx {
                let mut s = 0.0;
                for i in k..m {
                    s += self.qr.get(i, k) * x.get(i, j);
                }
                s = -s / pivot;
                for i in k..m {
                    x.add(i, j, s * self.qr.get(i, k));
                }
            }
        }

        // back substitution against R
        for k in (0..n).rev() {
            for j in 0..nx {
                x.set(k, j, x.get(k, j) / self.rdiag[k]);
            }
            for i in 0..k {
                let factor = self.qr.get(i, k);
                for j in 0..nx {
                    x.add(i, j, -x.get(k, j) * factor);
                }
            }
        }

        rhs.finish(n)
    }

    /// `solve` of the `m x m` identity: the inverse of a square matrix,
    /// the left pseudo-inverse of a tall one.
    pub fn inv(&self) -> Result<NArray<T>> {
        let m = self.rows();
        let identity = WorkMatrix::identity(m).to_narray::<T>(m, m)?;
        self.solve(&identity)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndstride_core::Order;
    use ndstride_narray::Shape;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn matrix(rows: usize, cols: usize, values: Vec<f64>) -> NArray<f64> {
        NArray::wrap(&Shape::of(&[rows, cols]).unwrap(), values, Order::C).unwrap()
    }

    fn assert_close(a: &NArray<f64>, b: &NArray<f64>, tol: f64) {
        assert_eq!(a.dims(), b.dims());
        for (x, y) in a.to_vec(Order::C).into_iter().zip(b.to_vec(Order::C)) {
            assert_abs_diff_eq!(x, y, epsilon = tol);
        }
    }

    #[test]
    fn test_classic_example() {
        let a = matrix(3, 3, vec![12.0, -51.0, 4.0, 6.0, 167.0, -68.0, -4.0, 24.0, -41.0]);
        let qr = QrDecomposition::new(&a).unwrap();
        assert!(qr.is_full_rank());

        let r = qr.r().unwrap();
        assert_abs_diff_eq!(r.get(&[0, 0]).unwrap().abs(), 14.0, epsilon = 1e-10);
        assert_abs_diff_eq!(r.get(&[1, 0]).unwrap(), 0.0);

        let q = qr.q().unwrap();
        assert_close(&q.mm(&r).unwrap(), &a, 1e-10);
        assert_close(&q.t().mm(&q).unwrap(), &NArray::eye(3, Order::C).unwrap(), 1e-12);
    }

    #[test]
    fn test_tall_random_matrix() {
        let mut rng = StdRng::seed_from_u64(42);
        let a = NArray::<f64>::random(&Shape::of(&[7, 4]).unwrap(), &mut rng, Order::F);
        let qr = QrDecomposition::new(&a).unwrap();
        let q = qr.q().unwrap();
        let r = qr.r().unwrap();
        assert_eq!(q.dims(), &[7, 4]);
        assert_eq!(r.dims(), &[4, 4]);
        assert_close(&q.mm(&r).unwrap(), &a, 1e-10);
        assert_close(&q.t().mm(&q).unwrap(), &NArray::eye(4, Order::C).unwrap(), 1e-10);

        let h = qr.h().unwrap();
        assert_eq!(h.dims(), &[7, 4]);
        assert_eq!(h.get(&[0, 3]).unwrap(), 0.0);
    }

    #[test]
    fn test_solve_recovers_solution() {
        let mut rng = StdRng::seed_from_u64(3);
        let a = NArray::<f64>::random(&Shape::of(&[6, 3]).unwrap(), &mut rng, Order::C);
        let x = NArray::<f64>::random(&Shape::of(&[3]).unwrap(), &mut rng, Order::C);
        let b = a.mv(&x).unwrap();

        let solved = QrDecomposition::new(&a).unwrap().solve(&b).unwrap();
        assert_eq!(solved.dims(), &[3]);
        assert_close(&solved, &x, 1e-10);
    }

    #[test]
    fn test_inverse() {
        let a = matrix(2, 2, vec![4.0, 7.0, 2.0, 6.0]);
        let inv = QrDecomposition::new(&a).unwrap().inv().unwrap();
        assert_close(&inv, &matrix(2, 2, vec![0.6, -0.7, -0.2, 0.4]), 1e-12);
        assert_close(&a.mm(&inv).unwrap(), &NArray::eye(2, Order::C).unwrap(), 1e-12);
    }

    #[test]
    fn test_rank_deficient() {
        let a = matrix(3, 2, vec![1.0, 0.0, 2.0, 0.0, 3.0, 0.0]);
        let qr = QrDecomposition::new(&a).unwrap();
        assert!(!qr.is_full_rank());
        let b = NArray::<f64>::zeros(&Shape::of(&[3]).unwrap(), Order::C);
        assert_eq!(qr.solve(&b).unwrap_err(), Error::RankDeficient);
        assert_eq!(qr.inv().unwrap_err(), Error::RankDeficient);
    }

    #[test]
    fn test_rejected_inputs() {
        let ints = NArray::<i32>::eye(3, Order::C).unwrap();
        assert!(matches!(
            QrDecomposition::new(&ints),
            Err(Error::UnsupportedDType { .. })
        ));
        let wide = matrix(2, 3, vec![0.0; 6]);
        assert!(matches!(QrDecomposition::new(&wide), Err(Error::InvalidShape { .. })));

        let qr = QrDecomposition::new(&NArray::<f64>::eye(3, Order::C).unwrap()).unwrap();
        let b = NArray::<f64>::zeros(&Shape::of(&[4, 1]).unwrap(), Order::C);
        assert!(matches!(qr.solve(&b), Err(Error::DimensionMismatch { .. })));
    }

    #[test]
    fn test_f32_input() {
        let a = NArray::<f32>::wrap(&Shape::of(&[2, 2]).unwrap(), vec![2.0, 0.0, 0.0, 4.0], Order::C)
            .unwrap();
        let x = QrDecomposition::new(&a)
            .unwrap()
            .solve(&NArray::wrap(&Shape::of(&[2]).unwrap(), vec![2.0, 2.0], Order::C).unwrap())
            .unwrap();
        assert!((x.get(&[0]).unwrap() - 1.0).abs() < 1e-6);
        assert!((x.get(&[1]).unwrap() - 0.5).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn prop_qr_reconstructs(
            (rows, cols) in (1usize..7).prop_flat_map(|n| (n..n + 5, Just(n))),
            seed in any::<u64>(),
            f_order in any::<bool>(),
        ) {
            let mut rng = StdRng::seed_from_u64(seed);
            let order = if f_order { Order::F } else { Order::C };
            let a = NArray::<f64>::random(&Shape::of(&[rows, cols]).unwrap(), &mut rng, order);
            let qr = QrDecomposition::new(&a).unwrap();
            let q = qr.q().unwrap();
            let r = qr.r().unwrap();

            prop_assert!(q.mm(&r).unwrap().approx_eq(&a, 1e-9));
            let eye = NArray::<f64>::eye(cols, Order::C).unwrap();
            prop_assert!(q.t().mm(&q).unwrap().approx_eq(&eye, 1e-9));
            for i in 0..cols {
                for j in 0..i {
                    prop_assert_eq!(r.get(&[i, j]).unwrap(), 0.0);
                }
            }
        }
    }
}
