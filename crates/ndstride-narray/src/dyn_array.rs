//! Runtime-typed arrays.
//!
//! `DynArray` holds one `NArray` of any supported element type and picks
//! the variant from a `DType` at construction time. Typed access goes
//! through f64 or i32 whatever the stored type.

use core::fmt;

use ndstride_core::error::Result;
use ndstride_core::{DType, Order};

use crate::narray::NArray;
use crate::shape::Shape;

/// An array whose element type is chosen at runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum DynArray {
    /// 64-bit floats.
    F64(NArray<f64>),
    /// 32-bit floats.
    F32(NArray<f32>),
    /// 32-bit integers.
    I32(NArray<i32>),
    /// 8-bit integers.
    I8(NArray<i8>),
}

macro_rules! dispatch {
    ($self:expr, $a:ident => $body:expr) => {
        match $self {
            DynArray::F64($a) => $body,
            DynArray::F32($a) => $body,
            DynArray::I32($a) => $body,
            DynArray::I8($a) => $body,
        }
    };
}

impl DynArray {
    /// Zero-filled array of the given element type.
    #[must_use]
    pub fn zeros(dtype: DType, shape: &Shape, order: Order) -> Self {
        match dtype {
            DType::F64 => Self::F64(NArray::zeros(shape, order)),
            DType::F32 => Self::F32(NArray::zeros(shape, order)),
            DType::I32 => Self::I32(NArray::zeros(shape, order)),
            DType::I8 => Self::I8(NArray::zeros(shape, order)),
        }
    }

    /// `0, 1, 2, ...` in `order` with the given element type.
    #[must_use]
    pub fn seq(dtype: DType, shape: &Shape, order: Order) -> Self {
        match dtype {
            DType::F64 => Self::F64(NArray::seq(shape, order)),
            DType::F32 => Self::F32(NArray::seq(shape, order)),
            DType::I32 => Self::I32(NArray::seq(shape, order)),
            DType::I8 => Self::I8(NArray::seq(shape, order)),
        }
    }

    /// Element type of the held array.
    #[must_use]
    pub fn dtype(&self) -> DType {
        dispatch!(self, a => a.dtype())
    }

    /// Shape of the held array.
    #[must_use]
    pub fn shape(&self) -> &Shape {
        dispatch!(self, a => a.shape())
    }

    /// Reads an element as f64.
    pub fn get_f64(&self, index: &[usize]) -> Result<f64> {
        dispatch!(self, a => a.get_f64(index))
    }

    /// Writes an element from f64.
    pub fn set_f64(&self, index: &[usize], value: f64) -> Result<()> {
        dispatch!(self, a => a.set_f64(index, value))
    }

    /// Adds an f64 to an element.
    pub fn inc_f64(&self, index: &[usize], value: f64) -> Result<()> {
        dispatch!(self, a => a.inc_f64(index, value))
    }

    /// Reads an element as i32.
    pub fn get_i32(&self, index: &[usize]) -> Result<i32> {
        dispatch!(self, a => a.get_i32(index))
    }

    /// Writes an element from i32.
    pub fn set_i32(&self, index: &[usize], value: i32) -> Result<()> {
        dispatch!(self, a => a.set_i32(index, value))
    }

    /// Adds an i32 to an element.
    pub fn inc_i32(&self, index: &[usize], value: i32) -> Result<()> {
        dispatch!(self, a => a.inc_i32(index, value))
    }

    /// Converts to an f64 array.
    #[must_use]
    pub fn to_f64(&self) -> NArray<f64> {
        dispatch!(self, a => a.cast())
    }
}

impl fmt::Display for DynArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        dispatch!(self, a => write!(f, "{a}"))
    }
}

macro_rules! impl_from {
    ($ty:ty, $variant:ident) => {
        impl From<NArray<$ty>> for DynArray {
            fn from(a: NArray<$ty>) -> Self {
                Self::$variant(a)
            }
        }
    };
}

impl_from!(f64, F64);
impl_from!(f32, F32);
impl_from!(i32, I32);
impl_from!(i8, I8);
