//! Storage - Flat Typed Buffers for Arrays
//!
//! Provides the flat, typed, mutable buffer that every array layout points
//! into. Storage is reference-counted so that views built by reshaping,
//! transposing or slicing share the same elements: a write through one view
//! is visible through every other view of the same storage.
//!
//! # Key Features
//! - Reference-counted buffers shared between views
//! - Scalar get/set/increment at a storage pointer
//! - Bulk fill, swap and reverse
//! - Lane-width vector loads/stores, contiguous or gathered by offsets
//! - Checked construction from foreign primitive arrays
//!
//! # Example
//! ```rust
//! use ndstride_core::Storage;
//!
//! let storage = Storage::<f64>::zeros(100);
//! storage.set(3, 2.5);
//! storage.inc(3, 1.0);
//! assert_eq!(storage.get(3), 3.5);
//! ```
//!
//! @version 0.1.0
//! @author `ndstride` Development Team

use core::ops::{Deref, DerefMut};
use std::sync::Arc;

use num_traits::NumCast;
use parking_lot::RwLock;
use rand::distributions::{Distribution, Standard};
use rand::Rng;

use crate::config;
use crate::dtype::{Numeric, Scalar};
use crate::error::{Error, Result};

// =============================================================================
// Storage Struct
// =============================================================================

/// Flat typed buffer holding the raw elements of one or more arrays.
///
/// Cloning a `Storage` clones the handle, not the elements; use
/// [`Storage::deep_copy`] for an independent buffer.
#[derive(Debug)]
pub struct Storage<T: Scalar> {
    inner: Arc<RwLock<Vec<T>>>,
    len: usize,
}

impl<T: Scalar> Storage<T> {
    /// Creates new storage with the given size, initialized to zero.
    ///
    /// # Arguments
    /// * `len` - Number of elements to allocate
    #[must_use]
    pub fn zeros(len: usize) -> Self {
        Self::from_vec(vec![T::zeroed(); len])
    }

    /// Creates new storage with every element set to `value`.
    #[must_use]
    pub fn full(len: usize, value: T) -> Self {
        Self::from_vec(vec![value; len])
    }

    /// Creates storage that takes ownership of an existing vector.
    #[must_use]
    pub fn from_vec(data: Vec<T>) -> Self {
        let len = data.len();
        Self {
            inner: Arc::new(RwLock::new(data)),
            len,
        }
    }

    /// Creates storage from a slice by copying the data.
    #[must_use]
    pub fn from_slice(data: &[T]) -> Self {
        Self::from_vec(data.to_vec())
    }

    /// Creates storage filled with values drawn from the standard
    /// distribution of `T` (uniform `[0, 1)` for floats).
    pub fn random<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Self
    where
        Standard: Distribution<T>,
    {
        let data = (0..len).map(|_| rng.gen::<T>()).collect();
        Self::from_vec(data)
    }

    /// Number of elements in this storage.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the storage has no elements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Size in bytes of the buffer.
    #[must_use]
    pub fn size_bytes(&self) -> usize {
        self.len * core::mem::size_of::<T>()
    }

    /// Returns true if no other handle shares this buffer.
    #[must_use]
    pub fn is_unique(&self) -> bool {
        Arc::strong_count(&self.inner) == 1
    }

    /// Returns true if both handles point to the same buffer.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Whether vector loads and stores are served for this element type
    /// under the current configuration.
    #[must_use]
    pub fn supports_vectorization(&self) -> bool {
        let config = config::current();
        config.vectorize && config.lanes_for(core::mem::size_of::<T>()) > 1
    }

    /// Returns a read guard over the elements.
    #[must_use]
    pub fn as_slice(&self) -> StorageReadGuard<'_, T> {
        StorageReadGuard {
            guard: self.inner.read(),
        }
    }

    /// Returns a write guard over the elements.
    #[must_use]
    pub fn as_slice_mut(&self) -> StorageWriteGuard<'_, T> {
        StorageWriteGuard {
            guard: self.inner.write(),
        }
    }

    /// Copies the elements into a new vector.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.as_slice().to_vec()
    }

    /// Copies the raw bytes of the buffer.
    #[must_use]
    pub fn as_bytes(&self) -> Vec<u8> {
        let data = self.as_slice();
        bytemuck::cast_slice::<T, u8>(&data).to_vec()
    }

    // =========================================================================
    // Scalar Access
    // =========================================================================

    /// Reads the element at `ptr`.
    ///
    /// # Panics
    /// Panics if `ptr` is outside the storage.
    #[must_use]
    pub fn get(&self, ptr: usize) -> T {
        self.inner.read()[ptr]
    }

    /// Writes `value` at `ptr`.
    ///
    /// # Panics
    /// Panics if `ptr` is outside the storage.
    pub fn set(&self, ptr: usize, value: T) {
        self.inner.write()[ptr] = value;
    }

    /// Sets `len` elements starting at `start` to `value`.
    pub fn fill(&self, value: T, start: usize, len: usize) -> Result<()> {
        self.check_range(start, len)?;
        self.as_slice_mut()[start..start + len].fill(value);
        Ok(())
    }

    /// Swaps the elements at two pointers.
    pub fn swap(&self, a: usize, b: usize) -> Result<()> {
        self.check_range(a, 1)?;
        self.check_range(b, 1)?;
        self.as_slice_mut().swap(a, b);
        Ok(())
    }

    /// Reverses `len` elements starting at `start`.
    pub fn reverse(&self, start: usize, len: usize) -> Result<()> {
        self.check_range(start, len)?;
        self.as_slice_mut()[start..start + len].reverse();
        Ok(())
    }

    // =========================================================================
    // Vector Access
    // =========================================================================

    /// Loads `out.len()` contiguous elements starting at `ptr`.
    ///
    /// # Panics
    /// Panics if the run leaves the storage.
    pub fn get_vector(&self, ptr: usize, out: &mut [T]) {
        let data = self.as_slice();
        out.copy_from_slice(&data[ptr..ptr + out.len()]);
    }

    /// Gathers one element per lane from `ptr + offsets[i]`.
    ///
    /// # Panics
    /// Panics if a lane address leaves the storage or `out` is shorter
    /// than `offsets`.
    pub fn get_vector_gather(&self, ptr: usize, offsets: &[isize], out: &mut [T]) {
        let data = self.as_slice();
        for (slot, &off) in out.iter_mut().zip(offsets) {
            *slot = data[lane_address(ptr, off)];
        }
    }

    /// Stores `values` contiguously starting at `ptr`.
    ///
    /// # Panics
    /// Panics if the run leaves the storage.
    pub fn set_vector(&self, ptr: usize, values: &[T]) {
        let mut data = self.as_slice_mut();
        data[ptr..ptr + values.len()].copy_from_slice(values);
    }

    /// Scatters one element per lane to `ptr + offsets[i]`.
    ///
    /// # Panics
    /// Panics if a lane address leaves the storage.
    pub fn set_vector_scatter(&self, ptr: usize, offsets: &[isize], values: &[T]) {
        let mut data = self.as_slice_mut();
        for (&value, &off) in values.iter().zip(offsets) {
            data[lane_address(ptr, off)] = value;
        }
    }

    // =========================================================================
    // Copies
    // =========================================================================

    /// Copies every element of `other` into this storage.
    pub fn copy_from(&self, other: &Self) -> Result<()> {
        if self.len != other.len {
            return Err(Error::dimension_mismatch(&[self.len], &[other.len]));
        }
        if self.ptr_eq(other) {
            return Ok(());
        }
        let src = other.as_slice();
        let mut dst = self.as_slice_mut();
        dst.copy_from_slice(&src);
        Ok(())
    }

    /// Makes a deep copy of this storage.
    #[must_use]
    pub fn deep_copy(&self) -> Self {
        Self::from_vec(self.to_vec())
    }

    fn check_range(&self, start: usize, len: usize) -> Result<()> {
        if start + len > self.len {
            return Err(Error::IndexOutOfBounds {
                index: start + len,
                size: self.len,
            });
        }
        Ok(())
    }
}

impl<T: Numeric> Storage<T> {
    /// Creates storage holding `0, 1, ..., len - 1` converted to `T`.
    ///
    /// Values beyond the range of `T` saturate.
    #[must_use]
    pub fn seq(len: usize) -> Self {
        Self::from_vec((0..len).map(|i| T::from_f64(i as f64)).collect())
    }

    /// Adds `value` to the element at `ptr`, wrapping on integer overflow.
    ///
    /// # Panics
    /// Panics if `ptr` is outside the storage.
    pub fn inc(&self, ptr: usize, value: T) {
        let mut data = self.inner.write();
        data[ptr] = data[ptr].wrapping_add(value);
    }

    /// Builds storage from foreign f64 values with checked conversion.
    pub fn from_f64s(values: &[f64]) -> Result<Self> {
        Self::from_foreign(values)
    }

    /// Builds storage from foreign f32 values with checked conversion.
    pub fn from_f32s(values: &[f32]) -> Result<Self> {
        Self::from_foreign(values)
    }

    /// Builds storage from foreign i32 values with checked conversion.
    pub fn from_i32s(values: &[i32]) -> Result<Self> {
        Self::from_foreign(values)
    }

    /// Builds storage from foreign i8 values with checked conversion.
    pub fn from_i8s(values: &[i8]) -> Result<Self> {
        Self::from_foreign(values)
    }

    fn from_foreign<S>(values: &[S]) -> Result<Self>
    where
        S: NumCast + Copy + core::fmt::Display,
    {
        let data = values
            .iter()
            .map(|&v| {
                <T as NumCast>::from(v).ok_or_else(|| Error::ElementConversion {
                    value: v.to_string(),
                    dtype: T::DTYPE,
                })
            })
            .collect::<Result<Vec<T>>>()?;
        Ok(Self::from_vec(data))
    }
}

impl<T: Scalar> Clone for Storage<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            len: self.len,
        }
    }
}

fn lane_address(ptr: usize, off: isize) -> usize {
    (ptr as isize + off) as usize
}

// =============================================================================
// Guard Types for Safe Access
// =============================================================================

/// Read guard for storage data.
pub struct StorageReadGuard<'a, T: Scalar> {
    guard: parking_lot::RwLockReadGuard<'a, Vec<T>>,
}

impl<T: Scalar> Deref for StorageReadGuard<'_, T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

/// Write guard for storage data.
pub struct StorageWriteGuard<'a, T: Scalar> {
    guard: parking_lot::RwLockWriteGuard<'a, Vec<T>>,
}

impl<T: Scalar> Deref for StorageWriteGuard<'_, T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

impl<T: Scalar> DerefMut for StorageWriteGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.guard
    }
}

// =============================================================================
// Tests
// =============================================================================
