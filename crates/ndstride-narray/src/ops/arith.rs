//! Element-wise arithmetic on arrays.

use ndstride_core::error::{Error, Result};
use ndstride_core::{Numeric, Order};

use super::kernel::{map_inplace, zip_inplace};
use crate::narray::NArray;

impl<T: Numeric> NArray<T> {
    /// Order used when pairing this array with another one element-wise.
    fn pairing_order(&self) -> Order {
        Order::auto_fc(self.layout.storage_fast_order())
    }

    /// Applies `f` to `other` read in the pairing order of `self`.
    ///
    /// A single-element `other` acts as a scalar. `other` is read before
    /// any write, so it may alias `self`.
    fn zip_with_(&self, other: &Self, f: impl Fn(T, T) -> T) -> Result<&Self> {
        if other.size() == 1 {
            let value = other.to_vec(Order::C)[0];
            map_inplace(self, |x| f(x, value));
            return Ok(self);
        }
        if self.shape() != other.shape() {
            return Err(Error::dimension_mismatch(self.dims(), other.dims()));
        }
        let order = self.pairing_order();
        let values = other.to_vec(order);
        zip_inplace(self, order, &values, f);
        Ok(self)
    }

    // =========================================================================
    // In-place Operations
    // =========================================================================

    /// Sets every element to `value`.
    pub fn fill_(&self, value: T) -> &Self {
        if self.layout.is_dense() {
            let (lo, _) = self.layout.pointer_bounds();
            if self.storage.fill(value, lo as usize, self.size()).is_ok() {
                return self;
            }
        }
        map_inplace(self, |_| value);
        self
    }

    /// Replaces every element `x` with `f(x)`.
    pub fn apply_(&self, f: impl Fn(T) -> T) -> &Self {
        map_inplace(self, f);
        self
    }

    /// Adds `other` element-wise.
    pub fn add_(&self, other: &Self) -> Result<&Self> {
        self.zip_with_(other, |a, b| a.wrapping_add(b))
    }

    /// Subtracts `other` element-wise.
    pub fn sub_(&self, other: &Self) -> Result<&Self> {
        self.zip_with_(other, |a, b| a.wrapping_sub(b))
    }

    /// Multiplies by `other` element-wise.
    pub fn mul_(&self, other: &Self) -> Result<&Self> {
        self.zip_with_(other, |a, b| a.wrapping_mul(b))
    }

    /// Divides by `other` element-wise.
    ///
    /// # Panics
    /// Panics on integer division by zero.
    pub fn div_(&self, other: &Self) -> Result<&Self> {
        self.zip_with_(other, |a, b| a.wrapping_div(b))
    }

    /// Computes `self += a * other`.
    pub fn fma_(&self, a: T, other: &Self) -> Result<&Self> {
        self.zip_with_(other, |x, y| x.wrapping_add(a.wrapping_mul(y)))
    }

    /// Adds a scalar to every element.
    pub fn add_scalar_(&self, value: T) -> &Self {
        map_inplace(self, |x| x.wrapping_add(value));
        self
    }

    /// Subtracts a scalar from every element.
    pub fn sub_scalar_(&self, value: T) -> &Self {
        map_inplace(self, |x| x.wrapping_sub(value));
        self
    }

    /// Multiplies every element by a scalar.
    pub fn mul_scalar_(&self, value: T) -> &Self {
        map_inplace(self, |x| x.wrapping_mul(value));
        self
    }

    /// Divides every element by a scalar.
    ///
    /// # Panics
    /// Panics on integer division by zero.
    pub fn div_scalar_(&self, value: T) -> &Self {
        map_inplace(self, |x| x.wrapping_div(value));
        self
    }

    /// Replaces every element with its absolute value.
    pub fn abs_(&self) -> &Self {
        map_inplace(self, T::wrapping_abs);
        self
    }

    /// Negates every element.
    pub fn neg_(&self) -> &Self {
        map_inplace(self, T::wrapping_neg);
        self
    }

    /// Limits every element to `[min, max]`. NaN values are kept.
    pub fn clamp_(&self, min: T, max: T) -> Result<&Self> {
        if min > max {
            return Err(Error::invalid_operation(format!(
                "clamp range [{min}, {max}] is empty"
            )));
        }
        map_inplace(self, |x| {
            if x < min {
                min
            } else if x > max {
                max
            } else {
                x
            }
        });
        Ok(self)
    }

    // =========================================================================
    // Copying Operations
    // =========================================================================

    /// Element-wise sum in a new array.
    pub fn add(&self, other: &Self) -> Result<Self> {
        let out = self.copy(Order::S);
        out.add_(other)?;
        Ok(out)
    }

    /// Element-wise difference in a new array.
    pub fn sub(&self, other: &Self) -> Result<Self> {
        let out = self.copy(Order::S);
        out.sub_(other)?;
        Ok(out)
    }

    /// Element-wise product in a new array.
    pub fn mul(&self, other: &Self) -> Result<Self> {
        let out = self.copy(Order::S);
        out.mul_(other)?;
        Ok(out)
    }

    /// Element-wise quotient in a new array.
    pub fn div(&self, other: &Self) -> Result<Self> {
        let out = self.copy(Order::S);
        out.div_(other)?;
        Ok(out)
    }

    /// Absolute values in a new array.
    #[must_use]
    pub fn abs(&self) -> Self {
        let out = self.copy(Order::S);
        out.abs_();
        out
    }

    /// Negated values in a new array.
    #[must_use]
    pub fn neg(&self) -> Self {
        let out = self.copy(Order::S);
        out.neg_();
        out
    }

    /// Clamped values in a new array.
    pub fn clamp(&self, min: T, max: T) -> Result<Self> {
        let out = self.copy(Order::S);
        out.clamp_(min, max)?;
        Ok(out)
    }

    /// Scalar product in a new array.
    #[must_use]
    pub fn mul_scalar(&self, value: T) -> Self {
        let out = self.copy(Order::S);
        out.mul_scalar_(value);
        out
    }
}
