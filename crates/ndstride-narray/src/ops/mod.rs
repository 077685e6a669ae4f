//! Array Operations - Loop-Driven Kernels
//!
//! Element-wise arithmetic, reductions and small matrix products over
//! `NArray`. Kernels never walk multi-indices: each one asks the array for
//! a `StrideLoopDescriptor` and processes full lanes of every contiguous or
//! strided run before a scalar tail.
//!
//! # Categories
//!
//! ## Element-wise (in place, `_` suffix)
//! - `fill_`, `apply_`
//! - `add_`, `sub_`, `mul_`, `div_` with arrays or scalars
//! - `fma_` - fused `self += a * other`
//!
//! ## Reductions
//! - `sum`, `prod`, `min`, `max`, `mean`
//!
//! ## Matrix Products
//! - `inner`, `mv`, `mm`
//!
//! @version 0.1.0
//! @author `ndstride` Development Team

mod arith;
pub(crate) mod kernel;
mod matrix;
mod reduce;
