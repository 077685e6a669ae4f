//! Vector and matrix products.
//!
//! Operands are snapshotted in row-major order before the product is
//! formed, so any layout is accepted. Results are dense `C` arrays.

use ndstride_core::error::{Error, Result};
use ndstride_core::{Numeric, Order};

use crate::narray::NArray;
use crate::shape::Shape;

impl<T: Numeric> NArray<T> {
    /// Dot product of two vectors of equal length.
    pub fn inner(&self, other: &Self) -> Result<T> {
        if !self.is_vector() || !other.is_vector() {
            return Err(Error::invalid_operation(format!(
                "inner product needs two vectors, got {} and {}",
                self.shape(),
                other.shape()
            )));
        }
        if self.size() != other.size() {
            return Err(Error::dimension_mismatch(self.dims(), other.dims()));
        }
        let a = self.to_vec(Order::C);
        let b = other.to_vec(Order::C);
        Ok(a.into_iter()
            .zip(b)
            .fold(T::ZERO, |acc, (x, y)| acc.wrapping_add(x.wrapping_mul(y))))
    }

    /// Matrix-vector product.
    pub fn mv(&self, v: &Self) -> Result<Self> {
        if !self.is_matrix() || !v.is_vector() {
            return Err(Error::invalid_operation(format!(
                "matrix-vector product needs a matrix and a vector, got {} and {}",
                self.shape(),
                v.shape()
            )));
        }
        let (m, n) = (self.dim(0), self.dim(1));
        if v.size() != n {
            return Err(Error::dimension_mismatch(&[n], v.dims()));
        }
        let a = self.to_vec(Order::C);
        let x = v.to_vec(Order::C);
        let out: Vec<T> = a
            .chunks(n)
            .map(|row| row.iter().zip(&x).fold(T::ZERO, |acc, (&p, &q)| acc.wrapping_add(p.wrapping_mul(q))))
            .collect();
        NArray::wrap(&Shape::from_dims(&[m]), out, Order::C)
    }

    /// Matrix-matrix product.
    pub fn mm(&self, other: &Self) -> Result<Self> {
        if !self.is_matrix() || !other.is_matrix() {
            return Err(Error::invalid_operation(format!(
                "matrix product needs two matrices, got {} and {}",
                self.shape(),
                other.shape()
            )));
        }
        let (m, k) = (self.dim(0), self.dim(1));
        let n = other.dim(1);
        if other.dim(0) != k {
            return Err(Error::dimension_mismatch(&[k, n], other.dims()));
        }
        let a = self.to_vec(Order::C);
        let b = other.to_vec(Order::C);
        let mut out = vec![T::ZERO; m * n];
        for i in 0..m {
            for p in 0..k {
                let aip = a[i * k + p];
                let row = &b[p * n..(p + 1) * n];
                for (o, &bv) in out[i * n..(i + 1) * n].iter_mut().zip(row) {
                    *o = o.wrapping_add(aip.wrapping_mul(bv));
                }
            }
        }
        NArray::wrap(&Shape::from_dims(&[m, n]), out, Order::C)
    }
}
