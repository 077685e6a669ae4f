//! Array Creation Functions
//!
//! Factory functions for new arrays: constant fills, sequences, identity
//! matrices, random values and wrapping of existing buffers. Every factory
//! takes the order of the dense layout it allocates; `S` falls back to the
//! configured default order.
//!
//! # Key Features
//! - Zero, constant and identity initialization
//! - Sequences in `C` or `F` order
//! - Uniform and standard-normal random arrays from any `Rng`
//! - Checked construction from foreign primitive buffers
//!
//! @version 0.1.0
//! @author `ndstride` Development Team

use rand::distributions::{Distribution, Standard};
use rand::Rng;
use rand_distr::StandardNormal;

use ndstride_core::error::{Error, Result};
use ndstride_core::{Numeric, Order, Storage};

use crate::narray::NArray;
use crate::shape::Shape;

// =============================================================================
// Constant Initialization
// =============================================================================

/// Creates an array filled with zeros.
///
/// # Example
/// ```rust
/// use ndstride_narray::{zeros, Shape};
/// use ndstride_core::Order;
///
/// let a = zeros::<f64>(&Shape::of(&[2, 3]).unwrap(), Order::C);
/// assert_eq!(a.size(), 6);
/// ```
#[must_use]
pub fn zeros<T: Numeric>(shape: &Shape, order: Order) -> NArray<T> {
    full(shape, T::ZERO, order)
}

/// Creates an array with every element set to `value`.
#[must_use]
pub fn full<T: Numeric>(shape: &Shape, value: T, order: Order) -> NArray<T> {
    dense(shape, order, Storage::full(shape.size(), value))
}

/// Creates a rank-0 array holding one value.
#[must_use]
pub fn scalar<T: Numeric>(value: T) -> NArray<T> {
    dense(&Shape::scalar(), Order::C, Storage::from_vec(vec![value]))
}

/// Creates the `n x n` identity matrix. An `n` of zero is an invalid shape.
pub fn eye<T: Numeric>(n: usize, order: Order) -> Result<NArray<T>> {
    let shape = Shape::of(&[n, n])?;
    let a = zeros(&shape, order);
    for i in 0..n {
        a.mat_set(i, i, T::ONE);
    }
    Ok(a)
}

// =============================================================================
// Sequences
// =============================================================================

/// Creates an array holding `0, 1, 2, ...` laid out in `order`.
///
/// Element `k` in `order` traversal has value `k`; integer types saturate.
#[must_use]
pub fn seq<T: Numeric>(shape: &Shape, order: Order) -> NArray<T> {
    dense(shape, order, Storage::seq(shape.size()))
}

// =============================================================================
// Random Initialization
// =============================================================================

/// Creates an array of values from the standard distribution of `T`
/// (uniform `[0, 1)` for floats).
pub fn random<T, R>(shape: &Shape, rng: &mut R, order: Order) -> NArray<T>
where
    T: Numeric,
    R: Rng + ?Sized,
    Standard: Distribution<T>,
{
    dense(shape, order, Storage::random(shape.size(), rng))
}

/// Creates an array of standard normal values.
pub fn random_normal<T, R>(shape: &Shape, rng: &mut R, order: Order) -> NArray<T>
where
    T: Numeric,
    R: Rng + ?Sized,
    StandardNormal: Distribution<T>,
{
    let data: Vec<T> = (0..shape.size()).map(|_| StandardNormal.sample(rng)).collect();
    dense(shape, order, Storage::from_vec(data))
}

// =============================================================================
// Wrapping Buffers
// =============================================================================

/// Wraps a buffer whose elements are laid out densely in `order`.
pub fn wrap<T: Numeric>(shape: &Shape, data: Vec<T>, order: Order) -> Result<NArray<T>> {
    if data.len() != shape.size() {
        return Err(Error::dimension_mismatch(&[shape.size()], &[data.len()]));
    }
    Ok(dense(shape, order, Storage::from_vec(data)))
}

/// Builds an array from foreign f64 values with checked conversion.
pub fn from_f64s<T: Numeric>(shape: &Shape, values: &[f64], order: Order) -> Result<NArray<T>> {
    wrap_storage(shape, Storage::from_f64s(values)?, order)
}

/// Builds an array from foreign f32 values with checked conversion.
pub fn from_f32s<T: Numeric>(shape: &Shape, values: &[f32], order: Order) -> Result<NArray<T>> {
    wrap_storage(shape, Storage::from_f32s(values)?, order)
}

/// Builds an array from foreign i32 values with checked conversion.
pub fn from_i32s<T: Numeric>(shape: &Shape, values: &[i32], order: Order) -> Result<NArray<T>> {
    wrap_storage(shape, Storage::from_i32s(values)?, order)
}

/// Builds an array from foreign i8 values with checked conversion.
pub fn from_i8s<T: Numeric>(shape: &Shape, values: &[i8], order: Order) -> Result<NArray<T>> {
    wrap_storage(shape, Storage::from_i8s(values)?, order)
}

fn wrap_storage<T: Numeric>(shape: &Shape, storage: Storage<T>, order: Order) -> Result<NArray<T>> {
    if storage.len() != shape.size() {
        return Err(Error::dimension_mismatch(&[shape.size()], &[storage.len()]));
    }
    Ok(dense(shape, order, storage))
}

fn dense<T: Numeric>(shape: &Shape, order: Order, storage: Storage<T>) -> NArray<T> {
    // storage is sized from the shape, so the layout always fits
    match NArray::dense(shape.clone(), order, storage) {
        Ok(array) => array,
        Err(e) => unreachable!("dense layout over exactly sized storage: {e}"),
    }
}

// =============================================================================
// Associated Constructors
// =============================================================================

impl<T: Numeric> NArray<T> {
    /// Creates an array filled with zeros.
    #[must_use]
    pub fn zeros(shape: &Shape, order: Order) -> Self {
        zeros(shape, order)
    }

    /// Creates an array with every element set to `value`.
    #[must_use]
    pub fn full(shape: &Shape, value: T, order: Order) -> Self {
        full(shape, value, order)
    }

    /// Creates a rank-0 array.
    #[must_use]
    pub fn scalar(value: T) -> Self {
        scalar(value)
    }

    /// Creates the `n x n` identity matrix.
    pub fn eye(n: usize, order: Order) -> Result<Self> {
        eye(n, order)
    }

    /// Creates an array holding `0, 1, 2, ...` in `order`.
    #[must_use]
    pub fn seq(shape: &Shape, order: Order) -> Self {
        seq(shape, order)
    }

    /// Creates a random array.
    pub fn random<R: Rng + ?Sized>(shape: &Shape, rng: &mut R, order: Order) -> Self
    where
        Standard: Distribution<T>,
    {
        random(shape, rng, order)
    }

    /// Wraps a dense buffer.
    pub fn wrap(shape: &Shape, data: Vec<T>, order: Order) -> Result<Self> {
        wrap(shape, data, order)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn shape(dims: &[usize]) -> Shape {
        Shape::of(dims).unwrap()
    }

    #[test]
    fn test_zeros_full() {
        let a = zeros::<f32>(&shape(&[2, 3]), Order::C);
        assert!(a.to_vec(Order::C).iter().all(|&v| v == 0.0));
        let b = full(&shape(&[4]), 7_i8, Order::F);
        assert_eq!(b.to_vec(Order::C), vec![7; 4]);
    }

    #[test]
    fn test_storage_order_falls_back() {
        let a = zeros::<f64>(&shape(&[2, 3]), Order::S);
        assert!(a.layout().is_dense());
    }

    #[test]
    fn test_eye() {
        let i = eye::<f64>(3, Order::C).unwrap();
        for r in 0..3 {
            for c in 0..3 {
                let expected = if r == c { 1.0 } else { 0.0 };
                assert_eq!(i.get(&[r, c]).unwrap(), expected);
            }
        }
        assert!(matches!(eye::<f64>(0, Order::C), Err(Error::InvalidShape { .. })));
    }

    #[test]
    fn test_seq_in_order() {
        let f = seq::<i32>(&shape(&[2, 3]), Order::F);
        assert_eq!(f.get(&[1, 0]).unwrap(), 1);
        assert_eq!(f.get(&[0, 1]).unwrap(), 2);
        assert_eq!(f.to_vec(Order::F), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_random_reproducible() {
        let mut rng1 = StdRng::seed_from_u64(7);
        let mut rng2 = StdRng::seed_from_u64(7);
        let a = random::<f64, _>(&shape(&[3, 3]), &mut rng1, Order::C);
        let b = random::<f64, _>(&shape(&[3, 3]), &mut rng2, Order::C);
        assert_eq!(a, b);

        let n = random_normal::<f64, _>(&shape(&[1000]), &mut rng1, Order::C);
        let mean = n.to_vec(Order::C).iter().sum::<f64>() / 1000.0;
        assert!(mean.abs() < 0.2);
    }

    #[test]
    fn test_wrap() {
        let a = wrap(&shape(&[2, 2]), vec![1, 2, 3, 4], Order::F).unwrap();
        assert_eq!(a.get(&[0, 1]).unwrap(), 3);
        assert!(wrap(&shape(&[2, 2]), vec![1, 2, 3], Order::C).is_err());
    }

    #[test]
    fn test_foreign_buffers() {
        let a = from_i32s::<i8>(&shape(&[3]), &[1, 2, 3], Order::C).unwrap();
        assert_eq!(a.to_vec(Order::C), vec![1, 2, 3]);
        assert!(from_i32s::<i8>(&shape(&[1]), &[512], Order::C).is_err());
        assert!(from_f64s::<f64>(&shape(&[2]), &[1.0], Order::C).is_err());

        let b = from_i8s::<f32>(&shape(&[2]), &[-1, 1], Order::C).unwrap();
        assert_eq!(b.to_vec(Order::C), vec![-1.0, 1.0]);
        let c = from_f32s::<f64>(&shape(&[1]), &[0.25], Order::C).unwrap();
        assert_eq!(c.get(&[0]).unwrap(), 0.25);
    }
}
