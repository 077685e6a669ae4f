//! ndstride Linalg - Matrix Decompositions
//!
//! Householder QR and Cholesky factorizations over `NArray` matrices of
//! any layout. Factorizations work on an f64 copy of their input and hand
//! results back in the input's element type; integer element types are
//! rejected.
//!
//! # Example
//! ```rust
//! use ndstride_core::Order;
//! use ndstride_linalg::{Cholesky, TriangleSide};
//! use ndstride_narray::{wrap, Shape};
//!
//! let a = wrap(&Shape::of(&[2, 2]).unwrap(), vec![4.0, 2.0, 2.0, 3.0], Order::C).unwrap();
//! let chol = Cholesky::new(&a, TriangleSide::Left).unwrap();
//! assert!(chol.is_spd());
//! assert_eq!(chol.l().unwrap().get(&[0, 0]).unwrap(), 2.0);
//! ```
//!
//! @version 0.1.0
//! @author `ndstride` Development Team

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Numeric-engine allowances
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::needless_range_loop)]
#![allow(clippy::float_cmp)]

// =============================================================================
// Modules
// =============================================================================

pub mod cholesky;
mod matrix;
pub mod qr;

// =============================================================================
// Re-exports
// =============================================================================

pub use cholesky::{Cholesky, TriangleSide};
pub use qr::QrDecomposition;

// =============================================================================
// Prelude
// =============================================================================

/// Convenient imports for common usage.
pub mod prelude {
    pub use crate::cholesky::{Cholesky, TriangleSide};
    pub use crate::qr::QrDecomposition;
}
