//! Shape - Array Dimension Management
//!
//! A `Shape` is the immutable, value-equal description of an array's rank
//! and extents. Besides validation it owns the canonical linearization of
//! its index space: converting a multi-index to a position under row-major
//! (`C`) or column-major (`F`) order and back.
//!
//! # Key Features
//! - Small-vector storage for shapes up to rank 6
//! - Validation of dimensions (every extent must be at least one)
//! - Position/index conversion under `C` and `F` orders
//! - Dense stride computation for either order
//!
//! @version 0.1.0
//! @author `ndstride` Development Team

use core::fmt;

use smallvec::SmallVec;

use ndstride_core::error::{Error, Result};
use ndstride_core::Order;

// =============================================================================
// Type Aliases
// =============================================================================

/// Dimensions of an array, stack allocated up to rank 6.
pub type Dims = SmallVec<[usize; 6]>;

/// Strides of an array, stack allocated up to rank 6.
pub type Strides = SmallVec<[isize; 6]>;

// =============================================================================
// Shape Struct
// =============================================================================

/// Immutable description of an array's dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Shape {
    dims: Dims,
}

impl Shape {
    /// Creates a shape after checking that every dimension is positive.
    ///
    /// # Arguments
    /// * `dims` - Extent of each dimension; an empty slice is a scalar
    ///
    /// # Returns
    /// The shape, or `InvalidShape` if any extent is zero.
    pub fn of(dims: &[usize]) -> Result<Self> {
        if dims.iter().any(|&d| d == 0) {
            return Err(Error::invalid_shape(format!(
                "Invalid shape dimensions: {dims:?}"
            )));
        }
        Ok(Self {
            dims: Dims::from_slice(dims),
        })
    }

    /// Creates a shape from signed extents, rejecting non-positive ones.
    pub fn from_signed(dims: &[i64]) -> Result<Self> {
        if dims.iter().any(|&d| d <= 0) {
            return Err(Error::invalid_shape(format!(
                "Invalid shape dimensions: {dims:?}"
            )));
        }
        Ok(Self {
            dims: dims.iter().map(|&d| d as usize).collect(),
        })
    }

    /// Builds a shape from extents already known to be positive.
    pub(crate) fn from_dims(dims: &[usize]) -> Self {
        debug_assert!(dims.iter().all(|&d| d > 0));
        Self {
            dims: Dims::from_slice(dims),
        }
    }

    /// The rank-0 shape of a scalar.
    #[must_use]
    pub fn scalar() -> Self {
        Self { dims: Dims::new() }
    }

    /// Number of dimensions.
    #[must_use]
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Extent of dimension `i`.
    ///
    /// # Panics
    /// Panics if `i >= rank()`.
    #[must_use]
    pub fn dim(&self, i: usize) -> usize {
        self.dims[i]
    }

    /// All extents.
    #[must_use]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Number of elements; 1 for a scalar.
    #[must_use]
    pub fn size(&self) -> usize {
        self.dims.iter().product()
    }

    /// Number of dimensions with extent 1.
    #[must_use]
    pub fn unit_dim_count(&self) -> usize {
        self.dims.iter().filter(|&&d| d == 1).count()
    }

    /// Dense strides of this shape in the given order.
    ///
    /// `S` has no canonical strides and is rejected.
    pub fn strides(&self, order: Order) -> Result<Strides> {
        match order {
            Order::C => Ok(c_strides(&self.dims)),
            Order::F => Ok(f_strides(&self.dims)),
            Order::S => Err(Error::UnsupportedOrder {
                order,
                operation: "Shape::strides",
            }),
        }
    }

    /// Converts a multi-index into its linear position under `order`.
    ///
    /// # Arguments
    /// * `order` - `C` or `F`
    /// * `index` - One coordinate per dimension
    pub fn position(&self, order: Order, index: &[usize]) -> Result<usize> {
        order.require_canonical("Shape::position")?;
        self.check_index(index)?;

        let mut pos = 0;
        match order {
            Order::C => {
                for (&i, &d) in index.iter().zip(self.dims.iter()) {
                    pos = pos * d + i;
                }
            }
            _ => {
                for (&i, &d) in index.iter().zip(self.dims.iter()).rev() {
                    pos = pos * d + i;
                }
            }
        }
        Ok(pos)
    }

    /// Converts a linear position into its multi-index under `order`.
    pub fn index(&self, order: Order, pos: usize) -> Result<Vec<usize>> {
        order.require_canonical("Shape::index")?;
        let size = self.size();
        if pos >= size {
            return Err(Error::IndexOutOfBounds { index: pos, size });
        }

        let mut index = vec![0; self.rank()];
        let mut rest = pos;
        match order {
            Order::C => {
                for i in (0..self.rank()).rev() {
                    index[i] = rest % self.dims[i];
                    rest /= self.dims[i];
                }
            }
            _ => {
                for i in 0..self.rank() {
                    index[i] = rest % self.dims[i];
                    rest /= self.dims[i];
                }
            }
        }
        Ok(index)
    }

    /// Checks that `index` has one in-range coordinate per dimension.
    pub fn check_index(&self, index: &[usize]) -> Result<()> {
        if index.len() != self.rank() {
            return Err(Error::dimension_mismatch(&[self.rank()], &[index.len()]));
        }
        for (&i, &d) in index.iter().zip(self.dims.iter()) {
            if i >= d {
                return Err(Error::IndexOutOfBounds { index: i, size: d });
            }
        }
        Ok(())
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shape: [")?;
        for (i, d) in self.dims.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{d}")?;
        }
        write!(f, "]")
    }
}

// =============================================================================
// Stride Utilities
// =============================================================================

/// Computes row-major (C-order) strides for a shape.
#[must_use]
pub fn c_strides(dims: &[usize]) -> Strides {
    let mut strides = Strides::from_elem(0, dims.len());
    let mut stride = 1isize;
    for i in (0..dims.len()).rev() {
        strides[i] = stride;
        stride *= dims[i] as isize;
    }
    strides
}

/// Computes column-major (F-order) strides for a shape.
#[must_use]
pub fn f_strides(dims: &[usize]) -> Strides {
    let mut strides = Strides::from_elem(0, dims.len());
    let mut stride = 1isize;
    for i in 0..dims.len() {
        strides[i] = stride;
        stride *= dims[i] as isize;
    }
    strides
}

/// Resolves a possibly negative axis against a rank.
pub fn normalize_axis(axis: isize, rank: usize) -> Result<usize> {
    let resolved = if axis < 0 { axis + rank as isize } else { axis };
    if resolved < 0 || resolved as usize >= rank {
        return Err(Error::InvalidAxis { axis, rank });
    }
    Ok(resolved as usize)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_shape_basics() {
        let shape = Shape::of(&[2, 4, 10, 8]).unwrap();
        assert_eq!(shape.rank(), 4);
        assert_eq!(shape.size(), 640);
        assert_eq!(shape.dim(2), 10);
        assert_eq!(shape.to_string(), "Shape: [2,4,10,8]");
    }

    #[test]
    fn test_scalar_shape() {
        let shape = Shape::of(&[]).unwrap();
        assert_eq!(shape, Shape::scalar());
        assert_eq!(shape.rank(), 0);
        assert_eq!(shape.size(), 1);
        assert_eq!(shape.position(Order::C, &[]).unwrap(), 0);
        assert!(shape.index(Order::F, 0).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_shapes() {
        assert!(matches!(
            Shape::from_signed(&[1, 2, -3, 0]),
            Err(Error::InvalidShape { .. })
        ));
        assert!(matches!(Shape::of(&[0, 0]), Err(Error::InvalidShape { .. })));
        assert!(matches!(Shape::of(&[3, 0]), Err(Error::InvalidShape { .. })));
    }

    #[test]
    fn test_position_orders() {
        let shape = Shape::of(&[2, 3]).unwrap();
        assert_eq!(shape.position(Order::C, &[1, 2]).unwrap(), 5);
        assert_eq!(shape.position(Order::F, &[1, 2]).unwrap(), 5);
        assert_eq!(shape.position(Order::C, &[0, 1]).unwrap(), 1);
        assert_eq!(shape.position(Order::F, &[0, 1]).unwrap(), 2);
        assert_eq!(shape.index(Order::C, 4).unwrap(), vec![1, 1]);
        assert_eq!(shape.index(Order::F, 3).unwrap(), vec![1, 1]);
    }

    #[test]
    fn test_storage_order_rejected() {
        let shape = Shape::of(&[2, 3]).unwrap();
        assert!(matches!(
            shape.position(Order::S, &[0, 0]),
            Err(Error::UnsupportedOrder { order: Order::S, .. })
        ));
        assert!(matches!(
            shape.index(Order::S, 0),
            Err(Error::UnsupportedOrder { order: Order::S, .. })
        ));
        assert!(shape.strides(Order::S).is_err());
    }

    #[test]
    fn test_bad_index() {
        let shape = Shape::of(&[2, 3]).unwrap();
        assert!(shape.position(Order::C, &[2, 0]).is_err());
        assert!(shape.position(Order::C, &[0]).is_err());
        assert!(shape.index(Order::C, 6).is_err());
    }

    #[test]
    fn test_dense_strides() {
        assert_eq!(c_strides(&[2, 3, 4]).as_slice(), &[12, 4, 1]);
        assert_eq!(f_strides(&[2, 3, 4]).as_slice(), &[1, 2, 6]);
        assert!(c_strides(&[]).is_empty());
    }

    #[test]
    fn test_normalize_axis() {
        assert_eq!(normalize_axis(-1, 3).unwrap(), 2);
        assert_eq!(normalize_axis(0, 3).unwrap(), 0);
        assert!(normalize_axis(3, 3).is_err());
        assert!(normalize_axis(-4, 3).is_err());
    }

    #[test]
    fn test_shape_as_map_key() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(Shape::of(&[2, 3]).unwrap(), "a");
        assert_eq!(map.get(&Shape::of(&[2, 3]).unwrap()), Some(&"a"));
        assert_eq!(map.get(&Shape::of(&[3, 2]).unwrap()), None);
    }

    proptest! {
        #[test]
        fn prop_position_index_round_trip(
            dims in prop::collection::vec(1usize..5, 0..5),
            seed in any::<usize>(),
            f_order in any::<bool>(),
        ) {
            let shape = Shape::of(&dims).unwrap();
            let order = if f_order { Order::F } else { Order::C };
            let pos = seed % shape.size();
            let index = shape.index(order, pos).unwrap();
            prop_assert_eq!(shape.position(order, &index).unwrap(), pos);
        }
    }
}
