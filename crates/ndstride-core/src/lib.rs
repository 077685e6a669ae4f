//! ndstride Core - Foundation Layer for the ndstride Array Engine
//!
//! This crate provides the abstractions every other ndstride crate builds
//! on: the closed set of element types, flat reference-counted storage,
//! iteration orders, engine configuration and the shared error type.
//!
//! # Key Features
//! - Type-safe element system (f64, f32, i32, i8)
//! - Reference-counted storage with scalar and lane-width access
//! - Row-major, column-major and storage iteration orders
//! - TOML and environment driven engine configuration
//!
//! # Example
//! ```rust
//! use ndstride_core::{DType, Storage};
//!
//! let storage = Storage::<f64>::zeros(1024);
//! assert_eq!(storage.len(), 1024);
//! assert_eq!(DType::F64.size_of(), 8);
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

// =============================================================================
// Modules
// =============================================================================

pub mod config;
pub mod dtype;
pub mod error;
pub mod order;
pub mod storage;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::EngineConfig;
pub use dtype::{DType, Numeric, Scalar};
pub use error::{Error, Result};
pub use order::Order;
pub use storage::Storage;

// =============================================================================
// Prelude
// =============================================================================

/// Convenient imports for common usage.
pub mod prelude {
    pub use crate::config::EngineConfig;
    pub use crate::dtype::{DType, Numeric, Scalar};
    pub use crate::error::{Error, Result};
    pub use crate::order::Order;
    pub use crate::storage::Storage;
}
