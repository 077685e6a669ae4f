//! ndstride NArray - Strided N-Dimensional Arrays
//!
//! This crate provides the `NArray` type together with the machinery that
//! makes strided arrays cheap to iterate: shapes, stride layouts with
//! compaction, index and pointer iterators, and precomputed loop plans.
//! Views share storage with their source; writes through any view are
//! visible through every alias.
//!
//! # Key Features
//! - Shapes with `C`/`F` position and index conversion
//! - Stride layouts with compaction and no-copy reshape
//! - Loop descriptors splitting work into lane-sized runs and scalar tails
//! - Zero-copy views: transpose, narrow, split, squeeze, stretch, expand, permute
//! - In-place element-wise arithmetic, wrapping for integer element types
//! - Whole-array reductions, with NaN-skipping variants and variance
//!
//! # Example
//! ```rust
//! use ndstride_narray::{seq, Shape};
//! use ndstride_core::Order;
//!
//! let a = seq::<f64>(&Shape::of(&[2, 3]).unwrap(), Order::C);
//! let t = a.t();
//! t.mul_scalar_(2.0);
//! assert_eq!(a.get(&[1, 2]).unwrap(), 10.0);
//! assert_eq!(a.sum(), 30.0);
//! ```
//!
//! @version 0.1.0
//! @author `ndstride` Development Team

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Numeric-engine allowances
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::needless_range_loop)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::should_implement_trait)]
#![allow(clippy::match_same_arms)]

// =============================================================================
// Modules
// =============================================================================

pub mod creation;
pub mod dyn_array;
pub mod iter;
pub mod layout;
pub mod loop_desc;
pub mod narray;
mod ops;
pub mod shape;
pub mod view;

// =============================================================================
// Re-exports
// =============================================================================

pub use creation::*;
pub use dyn_array::DynArray;
pub use iter::{IndexIterator, PointerIterator};
pub use layout::StrideLayout;
pub use loop_desc::StrideLoopDescriptor;
pub use narray::NArray;
pub use ndstride_core::{DType, Error, Numeric, Order, Result, Storage};
pub use shape::{Dims, Shape, Strides};

// =============================================================================
// Prelude
// =============================================================================

/// Convenient imports for common usage.
pub mod prelude {
    pub use crate::dyn_array::DynArray;
    pub use crate::iter::{IndexIterator, PointerIterator};
    pub use crate::layout::StrideLayout;
    pub use crate::loop_desc::StrideLoopDescriptor;
    pub use crate::narray::NArray;
    pub use crate::shape::Shape;
    pub use crate::{eye, full, random, random_normal, scalar, seq, wrap, zeros};
    pub use ndstride_core::{DType, Error, Numeric, Order, Result, Storage};
}
