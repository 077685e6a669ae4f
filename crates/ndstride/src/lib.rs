//! # ndstride - Strided N-Dimensional Array Engine
//!
//! ndstride is an array engine built around explicit stride layouts. An
//! array is a shape, an offset and one stride per dimension over a shared
//! flat storage, so transposes, slices and most reshapes are free views.
//! Element-wise kernels never walk multi-indices: they ask for a loop
//! descriptor that compacts the layout into long runs, processed in
//! lane-sized groups with a scalar tail.
//!
//! ## Core Features
//!
//! - **Shapes and layouts**: `C`/`F` linearization, dense detection, compaction
//! - **Views**: reshape, transpose, permute, narrow, squeeze, stretch, expand
//! - **Kernels**: in-place arithmetic and reductions driven by loop descriptors
//! - **Linear algebra**: Householder QR and left/right Cholesky with `solve`/`inv`
//! - **Configuration**: default order and SIMD register width from TOML or the environment
//!
//! # Quick Start
//!
//! ```rust
//! use ndstride::prelude::*;
//!
//! let a = NArray::<f64>::seq(&Shape::of(&[3, 4]).unwrap(), Order::C);
//! let col = a.narrow(1, false, 1, 2).unwrap();
//! col.fill_(0.0);
//! assert_eq!(a.get(&[2, 1]).unwrap(), 0.0);
//!
//! let spd = a.mm(&a.t()).unwrap();
//! spd.add_(&NArray::eye(3, Order::C).unwrap()).unwrap();
//! let chol = spd.cholesky(TriangleSide::Left).unwrap();
//! assert!(chol.is_spd());
//! ```
//!
//! @version 0.1.0
//! @author `ndstride` Development Team

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]

// =============================================================================
// Crate Re-exports
// =============================================================================

pub use ndstride_core as core;

pub use ndstride_narray as narray;

#[cfg(feature = "linalg")]
pub use ndstride_linalg as linalg;

pub use ndstride_core::{DType, EngineConfig, Error, Numeric, Order, Result, Storage};
pub use ndstride_narray::{
    DynArray, IndexIterator, NArray, PointerIterator, Shape, StrideLayout, StrideLoopDescriptor,
};

#[cfg(feature = "linalg")]
pub use ndstride_linalg::{Cholesky, QrDecomposition, TriangleSide};

// =============================================================================
// Decomposition Entry Points
// =============================================================================

/// Matrix decompositions as methods on `NArray`.
#[cfg(feature = "linalg")]
pub trait LinAlg<T: Numeric> {
    /// Householder QR decomposition.
    fn qr(&self) -> Result<QrDecomposition<T>>;

    /// Cholesky decomposition on the given triangle side.
    fn cholesky(&self, side: TriangleSide) -> Result<Cholesky<T>>;
}

#[cfg(feature = "linalg")]
impl<T: Numeric> LinAlg<T> for NArray<T> {
    fn qr(&self) -> Result<QrDecomposition<T>> {
        tracing::trace!(shape = %self.shape(), "qr");
        QrDecomposition::new(self)
    }

    fn cholesky(&self, side: TriangleSide) -> Result<Cholesky<T>> {
        tracing::trace!(shape = %self.shape(), %side, "cholesky");
        Cholesky::new(self, side)
    }
}

// =============================================================================
// Prelude
// =============================================================================

/// Common imports for ndstride users.
///
/// ```rust
/// use ndstride::prelude::*;
/// ```
pub mod prelude {
    pub use ndstride_core::config::EngineConfig;
    pub use ndstride_core::{DType, Error, Numeric, Order, Result, Storage};
    pub use ndstride_narray::prelude::*;

    #[cfg(feature = "linalg")]
    pub use crate::LinAlg;
    #[cfg(feature = "linalg")]
    pub use ndstride_linalg::prelude::*;
}

// =============================================================================
// Version Information
// =============================================================================

/// Returns the version of the ndstride engine.
#[must_use]
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Returns a string describing the enabled features.
#[must_use]
pub fn features() -> String {
    let mut features = vec!["core", "narray"];

    #[cfg(feature = "linalg")]
    features.push("linalg");

    features.join(", ")
}

// =============================================================================
// Tests
// =============================================================================
