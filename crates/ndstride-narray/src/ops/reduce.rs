//! Whole-array reductions.
//!
//! Plain reductions propagate NaN; the `nan_*` family skips NaN values.
//! Integer sums and products wrap on overflow.

use ndstride_core::error::{Error, Result};
use ndstride_core::{Numeric, Order};

use super::kernel::{fold, fold_with};
use crate::narray::NArray;

impl<T: Numeric> NArray<T> {
    /// Sum of all elements.
    #[must_use]
    pub fn sum(&self) -> T {
        fold(self, T::ZERO, |a, b| a.wrapping_add(b))
    }

    /// Product of all elements.
    #[must_use]
    pub fn prod(&self) -> T {
        fold(self, T::ONE, |a, b| a.wrapping_mul(b))
    }

    /// Smallest element, or NaN if any element is NaN.
    #[must_use]
    pub fn min(&self) -> T {
        fold(self, T::max_value(), |a, b| {
            if a.is_nan() {
                a
            } else if b.is_nan() || b < a {
                b
            } else {
                a
            }
        })
    }

    /// Largest element, or NaN if any element is NaN.
    #[must_use]
    pub fn max(&self) -> T {
        fold(self, T::min_value(), |a, b| {
            if a.is_nan() {
                a
            } else if b.is_nan() || b > a {
                b
            } else {
                a
            }
        })
    }

    /// Arithmetic mean, accumulated in f64 so integer arrays do not overflow.
    #[must_use]
    pub fn mean(&self) -> f64 {
        let total: f64 = self.to_vec(Order::S).into_iter().map(Numeric::to_f64).sum();
        total / self.size() as f64
    }

    // =========================================================================
    // NaN-skipping Reductions
    // =========================================================================

    /// Sum of the non-NaN elements.
    #[must_use]
    pub fn nan_sum(&self) -> T {
        fold_with(
            self,
            T::ZERO,
            |a, x| if x.is_nan() { a } else { a.wrapping_add(x) },
            |a, b| a.wrapping_add(b),
        )
    }

    /// Product of the non-NaN elements.
    #[must_use]
    pub fn nan_prod(&self) -> T {
        fold_with(
            self,
            T::ONE,
            |a, x| if x.is_nan() { a } else { a.wrapping_mul(x) },
            |a, b| a.wrapping_mul(b),
        )
    }

    /// Smallest non-NaN element. An array of only NaN values yields NaN.
    #[must_use]
    pub fn nan_min(&self) -> T {
        self.nan_extreme(|x, best| x < best)
    }

    /// Largest non-NaN element. An array of only NaN values yields NaN.
    #[must_use]
    pub fn nan_max(&self) -> T {
        self.nan_extreme(|x, best| x > best)
    }

    fn nan_extreme(&self, better: impl Fn(T, T) -> bool) -> T {
        let step = |(best, found): (T, bool), x: T| {
            if x.is_nan() {
                (best, found)
            } else if !found || better(x, best) {
                (x, true)
            } else {
                (best, true)
            }
        };
        let (best, found) = fold_with(self, (T::ZERO, false), &step, |a, b: (T, bool)| {
            if b.1 {
                step(a, b.0)
            } else {
                a
            }
        });
        if found {
            best
        } else {
            // every element is NaN
            self.ptr_get(self.layout.offset())
        }
    }

    /// Mean of the non-NaN elements in f64; NaN when there are none.
    #[must_use]
    pub fn nan_mean(&self) -> f64 {
        let (total, count) = fold_with(
            self,
            (0.0_f64, 0_usize),
            |(s, n), x: T| {
                if x.is_nan() {
                    (s, n)
                } else {
                    (s + Numeric::to_f64(x), n + 1)
                }
            },
            |a, b| (a.0 + b.0, a.1 + b.1),
        );
        total / count as f64
    }

    // =========================================================================
    // Dispersion
    // =========================================================================

    /// Variance with `ddof` delta degrees of freedom, using the corrected
    /// two-pass sum `(Σc² - (Σc)²/n) / (n - ddof)` with `c = x - mean`.
    ///
    /// Only float arrays are supported.
    pub fn varc(&self, ddof: usize) -> Result<T> {
        if !T::DTYPE.is_float() {
            return Err(Error::UnsupportedDType {
                dtype: T::DTYPE,
                operation: "varc",
            });
        }
        let n = self.size();
        if ddof >= n {
            return Err(Error::invalid_operation(format!(
                "ddof {ddof} leaves no degrees of freedom for {n} elements"
            )));
        }
        let mean = self.mean();
        let (sum2, sum1) = fold_with(
            self,
            (0.0_f64, 0.0_f64),
            |(s2, s1), x: T| {
                let c = Numeric::to_f64(x) - mean;
                (s2 + c * c, s1 + c)
            },
            |a, b| (a.0 + b.0, a.1 + b.1),
        );
        let dof = (n - ddof) as f64;
        Ok(T::from_f64((sum2 - sum1 * sum1 / n as f64) / dof))
    }

    /// Standard deviation, the square root of [`NArray::varc`].
    pub fn std(&self, ddof: usize) -> Result<T> {
        let var = self.varc(ddof)?;
        Ok(T::from_f64(Numeric::to_f64(var).sqrt()))
    }
}
