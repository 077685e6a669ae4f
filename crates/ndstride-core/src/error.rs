//! Error Types - ndstride Error Handling
//!
//! Provides the error type shared by every crate of the array engine:
//! shape validation, iteration orders, element types and the failure
//! modes of the matrix decompositions.
//!
//! # Key Features
//! - Unified error type for all ndstride operations
//! - Structured variants carrying the offending values
//! - Integration with `std::error::Error`
//!
//! @version 0.1.0
//! @author `ndstride` Development Team

use thiserror::Error;

use crate::dtype::DType;
use crate::order::Order;

// =============================================================================
// Error Types
// =============================================================================

/// The main error type for ndstride operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Invalid shape dimensions or rank.
    #[error("Invalid shape: {message}")]
    InvalidShape {
        /// Description of why the shape is invalid.
        message: String,
    },

    /// Order that has no canonical meaning for the operation.
    #[error("Unsupported order {order} for {operation}")]
    UnsupportedOrder {
        /// The rejected order.
        order: Order,
        /// The operation that rejected it.
        operation: &'static str,
    },

    /// Element type that cannot support the operation.
    #[error("Unsupported dtype {dtype} for {operation}")]
    UnsupportedDType {
        /// The rejected element type.
        dtype: DType,
        /// The operation that rejected it.
        operation: &'static str,
    },

    /// QR solve on a matrix whose R factor has a zero on the diagonal.
    #[error("Matrix is rank deficient")]
    RankDeficient,

    /// Cholesky solve on a matrix that is not symmetric positive definite.
    #[error("Matrix is not symmetric positive definite")]
    NotSpd,

    /// Argument shapes incompatible with the operation.
    #[error("Dimension mismatch: expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        /// The expected dimensions.
        expected: Vec<usize>,
        /// The actual dimensions.
        actual: Vec<usize>,
    },

    /// Axis outside the rank of an array.
    #[error("Invalid axis: {axis} for array of rank {rank}")]
    InvalidAxis {
        /// The invalid axis.
        axis: isize,
        /// Rank of the array.
        rank: usize,
    },

    /// Index out of bounds.
    #[error("Index out of bounds: index {index} for dimension of size {size}")]
    IndexOutOfBounds {
        /// The invalid index.
        index: usize,
        /// The size of the dimension.
        size: usize,
    },

    /// Strides do not match the rank of a shape.
    #[error("Stride length mismatch: shape of rank {rank} with {strides} strides")]
    StrideLengthMismatch {
        /// Rank of the shape.
        rank: usize,
        /// Number of strides supplied.
        strides: usize,
    },

    /// Foreign value not representable in the target element type.
    #[error("Cannot convert value {value} to {dtype}")]
    ElementConversion {
        /// Textual form of the value.
        value: String,
        /// Target element type.
        dtype: DType,
    },

    /// Invalid operation for the given array.
    #[error("Invalid operation: {message}")]
    InvalidOperation {
        /// Description of why the operation is invalid.
        message: String,
    },

    /// Invalid engine configuration.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },
}

// =============================================================================
// Result Type
// =============================================================================

/// A specialized Result type for ndstride operations.
pub type Result<T> = core::result::Result<T, Error>;

// =============================================================================
// Helper Functions
// =============================================================================

impl Error {
    /// Creates a new invalid shape error.
    #[must_use]
    pub fn invalid_shape(message: impl Into<String>) -> Self {
        Self::InvalidShape {
            message: message.into(),
        }
    }

    /// Creates a new dimension mismatch error.
    #[must_use]
    pub fn dimension_mismatch(expected: &[usize], actual: &[usize]) -> Self {
        Self::DimensionMismatch {
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        }
    }

    /// Creates a new invalid operation error.
    #[must_use]
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }

    /// Creates a new configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
