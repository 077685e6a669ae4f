//! NArray - Strided N-Dimensional Array
//!
//! `NArray` couples a `StrideLayout` with a reference-counted `Storage`.
//! Cloning an array or deriving a view shares the storage, so writes are
//! visible through every alias; [`NArray::copy`] gives an isolated array.
//! Equality is structural: two arrays are equal when their shapes and
//! logical contents match, whatever their physical layouts.
//!
//! # Key Features
//! - Generic over the element types f64, f32, i32 and i8
//! - Checked element access by multi-index, typed f64/i32 access
//! - Unchecked pointer and matrix access for inner loops
//! - Ordered traversal through loop descriptors
//!
//! @version 0.1.0
//! @author `ndstride` Development Team

use core::fmt;

use ndstride_core::error::{Error, Result};
use ndstride_core::{DType, Numeric, Order, Storage};

use crate::iter::{IndexIterator, PointerIterator};
use crate::layout::StrideLayout;
use crate::loop_desc::StrideLoopDescriptor;
use crate::shape::Shape;

// =============================================================================
// NArray Struct
// =============================================================================

/// A strided N-dimensional array over shared typed storage.
#[derive(Clone)]
pub struct NArray<T: Numeric> {
    pub(crate) layout: StrideLayout,
    pub(crate) storage: Storage<T>,
}

impl<T: Numeric> NArray<T> {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Creates an array from a layout and the storage it points into.
    ///
    /// Fails if any pointer reachable through the layout is outside the
    /// storage.
    pub fn from_parts(layout: StrideLayout, storage: Storage<T>) -> Result<Self> {
        let (lo, hi) = layout.pointer_bounds();
        if lo < 0 || hi as usize >= storage.len() {
            return Err(Error::IndexOutOfBounds {
                index: if lo < 0 { 0 } else { hi as usize },
                size: storage.len(),
            });
        }
        Ok(Self { layout, storage })
    }

    /// Creates a view over existing storage with explicit strides.
    ///
    /// # Arguments
    /// * `shape` - Logical shape of the view
    /// * `offset` - Storage pointer of the first element
    /// * `strides` - One stride per dimension
    /// * `storage` - Storage shared with other arrays
    pub fn stride(shape: Shape, offset: usize, strides: &[isize], storage: Storage<T>) -> Result<Self> {
        let layout = StrideLayout::of(shape, offset, strides)?;
        Self::from_parts(layout, storage)
    }

    pub(crate) fn dense(shape: Shape, order: Order, storage: Storage<T>) -> Result<Self> {
        let layout = StrideLayout::of_dense(shape, 0, Order::auto_fc(order))?;
        Self::from_parts(layout, storage)
    }

    // =========================================================================
    // Properties
    // =========================================================================

    /// The layout of this array.
    #[must_use]
    pub fn layout(&self) -> &StrideLayout {
        &self.layout
    }

    /// The storage this array points into.
    #[must_use]
    pub fn storage(&self) -> &Storage<T> {
        &self.storage
    }

    /// The logical shape.
    #[must_use]
    pub fn shape(&self) -> &Shape {
        self.layout.shape()
    }

    /// All extents.
    #[must_use]
    pub fn dims(&self) -> &[usize] {
        self.layout.dims()
    }

    /// Number of dimensions.
    #[must_use]
    pub fn rank(&self) -> usize {
        self.layout.rank()
    }

    /// Extent of dimension `i`.
    #[must_use]
    pub fn dim(&self, i: usize) -> usize {
        self.layout.dim(i)
    }

    /// Number of logical elements.
    #[must_use]
    pub fn size(&self) -> usize {
        self.layout.size()
    }

    /// Element type tag.
    #[must_use]
    pub fn dtype(&self) -> DType {
        T::DTYPE
    }

    /// True for rank 0.
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        self.rank() == 0
    }

    /// True for rank 1.
    #[must_use]
    pub fn is_vector(&self) -> bool {
        self.rank() == 1
    }

    /// True for rank 2.
    #[must_use]
    pub fn is_matrix(&self) -> bool {
        self.rank() == 2
    }

    /// True if both arrays point into the same storage.
    #[must_use]
    pub fn shares_storage(&self, other: &Self) -> bool {
        self.storage.ptr_eq(&other.storage)
    }

    // =========================================================================
    // Element Access
    // =========================================================================

    /// Reads the element at a multi-index.
    pub fn get(&self, index: &[usize]) -> Result<T> {
        self.shape().check_index(index)?;
        Ok(self.storage.get(self.layout.pointer(index)))
    }

    /// Writes the element at a multi-index.
    pub fn set(&self, index: &[usize], value: T) -> Result<()> {
        self.shape().check_index(index)?;
        self.storage.set(self.layout.pointer(index), value);
        Ok(())
    }

    /// Adds to the element at a multi-index.
    pub fn inc(&self, index: &[usize], value: T) -> Result<()> {
        self.shape().check_index(index)?;
        self.storage.inc(self.layout.pointer(index), value);
        Ok(())
    }

    /// Reads an element widened to f64.
    pub fn get_f64(&self, index: &[usize]) -> Result<f64> {
        self.get(index).map(Numeric::to_f64)
    }

    /// Writes an element given as f64.
    pub fn set_f64(&self, index: &[usize], value: f64) -> Result<()> {
        self.set(index, T::from_f64(value))
    }

    /// Adds an f64 amount to an element.
    pub fn inc_f64(&self, index: &[usize], value: f64) -> Result<()> {
        self.inc(index, T::from_f64(value))
    }

    /// Reads an element converted to i32.
    pub fn get_i32(&self, index: &[usize]) -> Result<i32> {
        self.get(index).map(Numeric::to_i32)
    }

    /// Writes an element given as i32.
    pub fn set_i32(&self, index: &[usize], value: i32) -> Result<()> {
        self.set(index, T::from_i32(value))
    }

    /// Adds an i32 amount to an element.
    pub fn inc_i32(&self, index: &[usize], value: i32) -> Result<()> {
        self.inc(index, T::from_i32(value))
    }

    /// Reads the element at a storage pointer.
    #[must_use]
    pub fn ptr_get(&self, ptr: usize) -> T {
        self.storage.get(ptr)
    }

    /// Writes the element at a storage pointer.
    pub fn ptr_set(&self, ptr: usize, value: T) {
        self.storage.set(ptr, value);
    }

    /// Adds to the element at a storage pointer.
    pub fn ptr_inc(&self, ptr: usize, value: T) {
        self.storage.inc(ptr, value);
    }

    #[inline]
    fn mat_ptr(&self, i: usize, j: usize) -> usize {
        debug_assert!(self.is_matrix());
        let s = self.layout.strides();
        (self.layout.offset() as isize + i as isize * s[0] + j as isize * s[1]) as usize
    }

    /// Reads element `(i, j)` of a matrix without range checks.
    ///
    /// # Panics
    /// Panics if the array is not a matrix or the pointer leaves storage.
    #[must_use]
    pub fn mat_get(&self, i: usize, j: usize) -> T {
        self.storage.get(self.mat_ptr(i, j))
    }

    /// Writes element `(i, j)` of a matrix without range checks.
    pub fn mat_set(&self, i: usize, j: usize, value: T) {
        self.storage.set(self.mat_ptr(i, j), value);
    }

    /// Adds to element `(i, j)` of a matrix without range checks.
    pub fn mat_inc(&self, i: usize, j: usize, value: T) {
        self.storage.inc(self.mat_ptr(i, j), value);
    }

    // =========================================================================
    // Traversal
    // =========================================================================

    /// Loop plan over this array in `order`, sized for `T` lanes.
    #[must_use]
    pub fn loop_descriptor(&self, order: Order) -> StrideLoopDescriptor {
        StrideLoopDescriptor::of::<T>(&self.layout, order)
    }

    /// Iterator over multi-indices in `C` or `F` order.
    pub fn iter_index(&self, order: Order) -> Result<IndexIterator> {
        IndexIterator::new(self.shape(), order)
    }

    /// Iterator over storage pointers; `S` follows storage order.
    #[must_use]
    pub fn iter_ptr(&self, order: Order) -> PointerIterator {
        PointerIterator::new(&self.layout, order)
    }

    /// Elements in the requested order.
    #[must_use]
    pub fn to_vec(&self, order: Order) -> Vec<T> {
        let plan = StrideLoopDescriptor::new(&self.layout, order, 1);
        let data = self.storage.as_slice();
        let mut out = Vec::with_capacity(plan.total());
        for &base in &plan.offsets {
            for i in 0..plan.size {
                out.push(data[plan.pointer(base, i)]);
            }
        }
        out
    }

    /// Element-wise comparison within an absolute tolerance.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, tol: f64) -> bool {
        if self.shape() != other.shape() {
            return false;
        }
        self.to_vec(Order::C)
            .into_iter()
            .zip(other.to_vec(Order::C))
            .all(|(a, b)| (a.to_f64() - b.to_f64()).abs() <= tol)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

impl<T: Numeric> PartialEq for NArray<T> {
    fn eq(&self, other: &Self) -> bool {
        self.shape() == other.shape() && self.to_vec(Order::C) == other.to_vec(Order::C)
    }
}

impl<T: Numeric> fmt::Debug for NArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NArray")
            .field("dtype", &T::DTYPE)
            .field("layout", &self.layout.to_string())
            .field("data", &self.to_vec(Order::C))
            .finish()
    }
}

impl<T: Numeric> fmt::Display for NArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "NArray<{}> {}", T::DTYPE, self.shape())?;
        let data = self.to_vec(Order::C);
        if self.is_scalar() {
            return write!(f, "{}", data[0]);
        }
        write_nested(f, self.dims(), &data)
    }
}

fn write_nested<T: fmt::Display>(f: &mut fmt::Formatter<'_>, dims: &[usize], data: &[T]) -> fmt::Result {
    write!(f, "[")?;
    if dims.len() == 1 {
        for (i, v) in data.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{v}")?;
        }
    } else {
        let chunk = data.len() / dims[0];
        for (i, part) in data.chunks(chunk).enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write_nested(f, &dims[1..], part)?;
        }
    }
    write!(f, "]")
}

// =============================================================================
// Tests
// =============================================================================
