//! Data Types - ndstride Element Type System
//!
//! Defines the closed set of element types an array can hold and the traits
//! that storage, arrays and decompositions are generic over. Four primitive
//! kinds are supported: f64, f32, i32 and i8.
//!
//! # Key Features
//! - Runtime dtype information via the `DType` enum
//! - `Scalar` trait for plain-old-data storage elements
//! - `Numeric` trait for arithmetic, conversions and SIMD lane width
//! - Wrapping integer arithmetic; floats use the plain operators
//!
//! @version 0.1.0
//! @author `ndstride` Development Team

use bytemuck::{Pod, Zeroable};
use num_traits::{Num, NumCast, One, Zero};

use core::fmt::{Debug, Display};

use crate::config;

// =============================================================================
// DType Enum
// =============================================================================

/// Runtime representation of array element types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    /// 64-bit floating point (double precision).
    F64,
    /// 32-bit floating point (single precision).
    F32,
    /// 32-bit signed integer.
    I32,
    /// 8-bit signed integer.
    I8,
}

impl DType {
    /// Returns the size in bytes of this data type.
    #[must_use]
    pub const fn size_of(self) -> usize {
        match self {
            Self::I8 => 1,
            Self::F32 | Self::I32 => 4,
            Self::F64 => 8,
        }
    }

    /// Returns true if this is a floating point type.
    #[must_use]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }

    /// Returns true if this is an integer type.
    #[must_use]
    pub const fn is_integer(self) -> bool {
        matches!(self, Self::I32 | Self::I8)
    }

    /// Returns the name of this data type as a string.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::F64 => "f64",
            Self::F32 => "f32",
            Self::I32 => "i32",
            Self::I8 => "i8",
        }
    }

    /// Returns the number of elements of this type that fit in one SIMD
    /// register of the currently configured width.
    #[must_use]
    pub fn lanes(self) -> usize {
        config::current().lanes_for(self.size_of())
    }
}

impl Default for DType {
    fn default() -> Self {
        Self::F64
    }
}

impl core::fmt::Display for DType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// =============================================================================
// Scalar Trait
// =============================================================================

/// Trait for all element types that can be held in a `Storage`.
pub trait Scalar:
    Copy + Clone + Debug + Display + Default + Send + Sync + Pod + Zeroable + 'static
{
    /// The runtime dtype for this scalar type.
    const DTYPE: DType;

    /// Returns the dtype for this type.
    #[must_use]
    fn dtype() -> DType {
        Self::DTYPE
    }
}

// =============================================================================
// Numeric Trait
// =============================================================================

/// Trait for element types that support arithmetic and the typed
/// f64 / i32 access paths of arrays.
pub trait Numeric: Scalar + Num + NumCast + PartialOrd + Zero + One {
    /// The zero value for this type.
    const ZERO: Self;

    /// The one value for this type.
    const ONE: Self;

    /// Returns the minimum value for this type.
    fn min_value() -> Self;

    /// Returns the maximum value for this type.
    fn max_value() -> Self;

    /// Widens this value to f64.
    fn to_f64(self) -> f64;

    /// Converts from f64 with `as` semantics (truncating, saturating).
    fn from_f64(value: f64) -> Self;

    /// Converts this value to i32 with `as` semantics.
    fn to_i32(self) -> i32;

    /// Converts from i32 with `as` semantics.
    fn from_i32(value: i32) -> Self;

    /// Addition that wraps around on integer overflow.
    fn wrapping_add(self, rhs: Self) -> Self;

    /// Subtraction that wraps around on integer overflow.
    fn wrapping_sub(self, rhs: Self) -> Self;

    /// Multiplication that wraps around on integer overflow.
    fn wrapping_mul(self, rhs: Self) -> Self;

    /// Division; `MIN / -1` of an integer type wraps to `MIN`.
    ///
    /// # Panics
    /// Panics on integer division by zero.
    fn wrapping_div(self, rhs: Self) -> Self;

    /// Negation; `MIN` of an integer type maps to itself.
    fn wrapping_neg(self) -> Self;

    /// Absolute value; `MIN` of an integer type maps to itself.
    fn wrapping_abs(self) -> Self;

    /// True for float NaN values, always false for integers.
    fn is_nan(self) -> bool;

    /// Number of lanes of this type in one configured SIMD register.
    #[must_use]
    fn lanes() -> usize {
        Self::DTYPE.lanes()
    }
}

// =============================================================================
// Implementations
// =============================================================================

macro_rules! impl_numeric {
    ($ty:ty, $dtype:expr, $zero:expr, $one:expr, { $($arith:tt)* }) => {
        impl Scalar for $ty {
            const DTYPE: DType = $dtype;
        }

        impl Numeric for $ty {
            const ZERO: Self = $zero;
            const ONE: Self = $one;

            fn min_value() -> Self {
                <$ty>::MIN
            }

            fn max_value() -> Self {
                <$ty>::MAX
            }

            fn to_f64(self) -> f64 {
                self as f64
            }

            fn from_f64(value: f64) -> Self {
                value as $ty
            }

            fn to_i32(self) -> i32 {
                self as i32
            }

            fn from_i32(value: i32) -> Self {
                value as $ty
            }

            $($arith)*
        }
    };
}

macro_rules! impl_float {
    ($ty:ty, $dtype:expr) => {
        impl_numeric!($ty, $dtype, 0.0, 1.0, {
            fn wrapping_add(self, rhs: Self) -> Self {
                self + rhs
            }

            fn wrapping_sub(self, rhs: Self) -> Self {
                self - rhs
            }

            fn wrapping_mul(self, rhs: Self) -> Self {
                self * rhs
            }

            fn wrapping_div(self, rhs: Self) -> Self {
                self / rhs
            }

            fn wrapping_neg(self) -> Self {
                -self
            }

            fn wrapping_abs(self) -> Self {
                <$ty>::abs(self)
            }

            fn is_nan(self) -> bool {
                <$ty>::is_nan(self)
            }
        });
    };
}

macro_rules! impl_int {
    ($ty:ty, $dtype:expr) => {
        impl_numeric!($ty, $dtype, 0, 1, {
            fn wrapping_add(self, rhs: Self) -> Self {
                <$ty>::wrapping_add(self, rhs)
            }

            fn wrapping_sub(self, rhs: Self) -> Self {
                <$ty>::wrapping_sub(self, rhs)
            }

            fn wrapping_mul(self, rhs: Self) -> Self {
                <$ty>::wrapping_mul(self, rhs)
            }

            fn wrapping_div(self, rhs: Self) -> Self {
                <$ty>::wrapping_div(self, rhs)
            }

            fn wrapping_neg(self) -> Self {
                <$ty>::wrapping_neg(self)
            }

            fn wrapping_abs(self) -> Self {
                <$ty>::wrapping_abs(self)
            }

            fn is_nan(self) -> bool {
                false
            }
        });
    };
}

impl_float!(f64, DType::F64);
impl_float!(f32, DType::F32);
impl_int!(i32, DType::I32);
impl_int!(i8, DType::I8);

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dtype_size() {
        assert_eq!(DType::F64.size_of(), 8);
        assert_eq!(DType::F32.size_of(), 4);
        assert_eq!(DType::I32.size_of(), 4);
        assert_eq!(DType::I8.size_of(), 1);
    }

    #[test]
    fn test_dtype_kind() {
        assert!(DType::F64.is_float());
        assert!(!DType::F64.is_integer());
        assert!(DType::I8.is_integer());
        assert!(!DType::I32.is_float());
    }

    #[test]
    fn test_scalar_dtype() {
        assert_eq!(f64::DTYPE, DType::F64);
        assert_eq!(f32::dtype(), DType::F32);
        assert_eq!(i32::DTYPE, DType::I32);
        assert_eq!(i8::DTYPE, DType::I8);
    }

    #[test]
    fn test_conversions() {
        assert_eq!(i32::from_f64(3.9), 3);
        assert_eq!(i8::from_f64(1000.0), i8::MAX);
        assert_eq!(f32::from_i32(-4), -4.0);
        assert_eq!(2.5_f64.to_i32(), 2);
        assert!((7_i8.to_f64() - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_wrapping_arithmetic() {
        assert_eq!(Numeric::wrapping_add(i8::MAX, 1), i8::MIN);
        assert_eq!(Numeric::wrapping_sub(i32::MIN, 1), i32::MAX);
        assert_eq!(Numeric::wrapping_mul(100_i8, 100), 16);
        assert_eq!(Numeric::wrapping_div(i8::MIN, -1), i8::MIN);
        assert_eq!(Numeric::wrapping_neg(i8::MIN), i8::MIN);
        assert_eq!(Numeric::wrapping_abs(-5_i32), 5);
        assert_eq!(Numeric::wrapping_add(0.5_f64, 0.25), 0.75);
        assert_eq!(Numeric::wrapping_abs(-2.0_f32), 2.0);
    }

    #[test]
    fn test_is_nan() {
        assert!(Numeric::is_nan(f64::NAN));
        assert!(!Numeric::is_nan(1.0_f32));
        assert!(!Numeric::is_nan(0_i8));
    }

    #[test]
    fn test_display() {
        assert_eq!(DType::F32.to_string(), "f32");
        assert_eq!(format!("{}", DType::I8), "i8");
    }
}
