//! Stride Layout - Logical Index to Storage Pointer Mapping
//!
//! A `StrideLayout` is an offset plus one stride per dimension. It is the
//! only place where a logical multi-index is turned into a physical storage
//! pointer, and every structural view (transpose, slice, squeeze, reshape)
//! is just a new layout over the same storage.
//!
//! # Key Features
//! - Dense `C`/`F` detection and storage-fast order
//! - Compaction of contiguous dimensions for fast iteration
//! - No-copy reshape when the strides allow it
//! - View derivations: squeeze, stretch, expand, permute, narrow, revert
//!
//! @version 0.1.0
//! @author `ndstride` Development Team

use core::fmt;

use ndstride_core::error::{Error, Result};
use ndstride_core::Order;

use crate::shape::{c_strides, f_strides, normalize_axis, Dims, Shape, Strides};

const C_DENSE: u8 = 1;
const F_DENSE: u8 = 2;

// =============================================================================
// StrideLayout Struct
// =============================================================================

/// Offset and strides mapping a shape onto a flat storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StrideLayout {
    shape: Shape,
    offset: usize,
    strides: Strides,
    flags: u8,
}

impl StrideLayout {
    /// Creates a layout from explicit strides.
    ///
    /// # Arguments
    /// * `shape` - Logical shape
    /// * `offset` - Storage pointer of the first element
    /// * `strides` - One stride per dimension, in storage slots
    pub fn of(shape: Shape, offset: usize, strides: &[isize]) -> Result<Self> {
        if shape.rank() != strides.len() {
            return Err(Error::StrideLengthMismatch {
                rank: shape.rank(),
                strides: strides.len(),
            });
        }
        Ok(Self::build(shape, offset, Strides::from_slice(strides)))
    }

    /// Creates a dense layout in `C` or `F` order.
    pub fn of_dense(shape: Shape, offset: usize, order: Order) -> Result<Self> {
        let strides = shape.strides(order)?;
        Ok(Self::build(shape, offset, strides))
    }

    /// Dense layout at offset 0; `S` is treated as `F`.
    pub(crate) fn dense_unchecked(shape: &Shape, order: Order) -> Self {
        let strides = match order {
            Order::C => c_strides(shape.dims()),
            _ => f_strides(shape.dims()),
        };
        Self::build(shape.clone(), 0, strides)
    }

    fn build(shape: Shape, offset: usize, strides: Strides) -> Self {
        let mut layout = Self {
            shape,
            offset,
            strides,
            flags: 0,
        };
        layout.update_flags();
        layout
    }

    fn from_parts(dims: &[usize], offset: usize, strides: Strides) -> Self {
        Self::build(Shape::from_dims(dims), offset, strides)
    }

    fn update_flags(&mut self) {
        if self.rank() < 2 {
            self.flags = C_DENSE | F_DENSE;
            return;
        }
        if self.valid_c_order() {
            self.flags |= C_DENSE;
        }
        if self.valid_f_order() {
            self.flags |= F_DENSE;
        }
    }

    fn valid_c_order(&self) -> bool {
        (0..self.rank() - 1)
            .rev()
            .all(|i| self.strides[i] == self.strides[i + 1] * self.shape.dim(i + 1) as isize)
    }

    fn valid_f_order(&self) -> bool {
        (1..self.rank())
            .all(|i| self.strides[i] == self.strides[i - 1] * self.shape.dim(i - 1) as isize)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The logical shape.
    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Storage pointer of the first element.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// All strides.
    #[must_use]
    pub fn strides(&self) -> &[isize] {
        &self.strides
    }

    /// Stride of dimension `i`; negative values count from the end.
    /// A scalar layout reports stride 1.
    #[must_use]
    pub fn stride(&self, i: isize) -> isize {
        if self.strides.is_empty() {
            return 1;
        }
        let i = if i < 0 { i + self.rank() as isize } else { i };
        self.strides[i as usize]
    }

    /// Number of dimensions.
    #[must_use]
    pub fn rank(&self) -> usize {
        self.shape.rank()
    }

    /// Extent of dimension `i`.
    #[must_use]
    pub fn dim(&self, i: usize) -> usize {
        self.shape.dim(i)
    }

    /// All extents.
    #[must_use]
    pub fn dims(&self) -> &[usize] {
        self.shape.dims()
    }

    /// Number of logical elements.
    #[must_use]
    pub fn size(&self) -> usize {
        self.shape.size()
    }

    /// True when strides nest in row-major fashion.
    #[must_use]
    pub const fn is_c_ordered(&self) -> bool {
        self.flags & C_DENSE == C_DENSE
    }

    /// True when strides nest in column-major fashion.
    #[must_use]
    pub const fn is_f_ordered(&self) -> bool {
        self.flags & F_DENSE == F_DENSE
    }

    /// True when the layout covers one gap-free block.
    #[must_use]
    pub fn is_dense(&self) -> bool {
        (self.is_c_ordered() && self.stride(-1) == 1) || (self.is_f_ordered() && self.stride(0) == 1)
    }

    /// The canonical order matching the physical layout, or `S` if none.
    #[must_use]
    pub fn storage_fast_order(&self) -> Order {
        if self.rank() < 2 {
            return Order::default_order();
        }
        if self.is_f_ordered() {
            Order::F
        } else if self.is_c_ordered() {
            Order::C
        } else {
            Order::S
        }
    }

    /// Smallest and largest storage pointer reachable through this layout.
    #[must_use]
    pub fn pointer_bounds(&self) -> (isize, isize) {
        let mut lo = self.offset as isize;
        let mut hi = self.offset as isize;
        for (&d, &s) in self.dims().iter().zip(self.strides.iter()) {
            let span = (d as isize - 1) * s;
            if span < 0 {
                lo += span;
            } else {
                hi += span;
            }
        }
        (lo, hi)
    }

    // =========================================================================
    // Pointer Arithmetic
    // =========================================================================

    /// Storage pointer of a multi-index. Coordinates are not range checked.
    #[must_use]
    pub fn pointer(&self, index: &[usize]) -> usize {
        let mut pointer = self.offset as isize;
        for (&i, &s) in index.iter().zip(self.strides.iter()) {
            pointer += i as isize * s;
        }
        pointer as usize
    }

    /// Recovers the multi-index of a storage pointer.
    ///
    /// Works for layouts with positive, non-overlapping strides.
    pub fn index(&self, pointer: usize) -> Result<Vec<usize>> {
        let mut order: Vec<usize> = (0..self.rank()).collect();
        order.sort_by(|&a, &b| {
            (self.strides[b], self.dim(b)).cmp(&(self.strides[a], self.dim(a)))
        });

        let mut rest = pointer as isize - self.offset as isize;
        let mut index = vec![0; self.rank()];
        for j in order {
            let stride = self.strides[j];
            if stride <= 0 {
                continue;
            }
            let p = rest / stride;
            if p < 0 || p as usize >= self.dim(j) {
                return Err(Error::invalid_operation(format!(
                    "pointer {pointer} is not reachable from {self}"
                )));
            }
            index[j] = p as usize;
            rest -= p * stride;
        }
        if rest != 0 {
            return Err(Error::invalid_operation(format!(
                "pointer {pointer} is not reachable from {self}"
            )));
        }
        Ok(index)
    }

    // =========================================================================
    // Compaction
    // =========================================================================

    /// Rearranges dimensions so that the fastest varying one comes first.
    ///
    /// For `F` the dimensions are kept, for `C` they are reversed and for
    /// `S` they are sorted by increasing stride (zero strides last). With
    /// `compact` set, unit dimensions are dropped and neighbours whose
    /// strides nest are merged into a single dimension.
    #[must_use]
    pub fn compute_f_layout(&self, order: Order, compact: bool) -> Self {
        let rank = self.rank();
        let mut dims: Dims = Dims::from_slice(self.dims());
        let mut strides = self.strides.clone();

        match order {
            Order::F => {}
            Order::C => {
                dims.reverse();
                strides.reverse();
            }
            Order::S => {
                let mut perm: Vec<usize> = (0..rank).collect();
                perm.sort_by(|&i, &j| {
                    let (si, sj) = (self.strides[i], self.strides[j]);
                    match (si == 0, sj == 0) {
                        (true, true) => self.dim(i).cmp(&self.dim(j)),
                        (true, false) => core::cmp::Ordering::Greater,
                        (false, true) => core::cmp::Ordering::Less,
                        (false, false) => si
                            .unsigned_abs()
                            .cmp(&sj.unsigned_abs())
                            .then(self.dim(i).cmp(&self.dim(j))),
                    }
                });
                dims = perm.iter().map(|&p| self.dim(p)).collect();
                strides = perm.iter().map(|&p| self.strides[p]).collect();
            }
        }

        if !compact || rank < 2 {
            return Self::from_parts(&dims, self.offset, strides);
        }

        let (dims, strides) = compact_f_dims(&dims, &strides);
        Self::from_parts(&dims, self.offset, strides)
    }

    /// Same as [`compute_f_layout`](Self::compute_f_layout) with the
    /// fastest varying dimension last.
    #[must_use]
    pub fn compute_c_layout(&self, order: Order, compact: bool) -> Self {
        self.compute_f_layout(order, compact).revert()
    }

    // =========================================================================
    // Reshape
    // =========================================================================

    /// Tries to express `shape` over the same storage without copying.
    ///
    /// `order` is the order in which elements are read from this layout
    /// and written into the new shape. Returns `None` when the strides do
    /// not allow a view.
    pub fn attempt_reshape(&self, shape: &Shape, order: Order) -> Result<Option<Self>> {
        order.require_canonical("StrideLayout::attempt_reshape")?;
        if shape.size() != self.size() {
            return Err(Error::dimension_mismatch(shape.dims(), self.dims()));
        }

        let (old_dims, old_strides): (Vec<usize>, Vec<isize>) = self
            .dims()
            .iter()
            .zip(self.strides.iter())
            .filter(|(&d, _)| d != 1)
            .map(|(&d, &s)| (d, s))
            .unzip();
        let new_dims = shape.dims();
        let new_rank = new_dims.len();
        let old_rank = old_dims.len();

        if old_rank == 0 {
            let strides = Shape::strides(shape, order)?;
            return Ok(Some(Self::build(shape.clone(), self.offset, strides)));
        }

        let mut new_strides = Strides::from_elem(0, new_rank);
        let (mut oi, mut oj, mut ni, mut nj) = (0, 1, 0, 1);

        while ni < new_rank && oi < old_rank {
            let mut np = new_dims[ni];
            let mut op = old_dims[oi];

            while np != op {
                if np < op {
                    np *= new_dims[nj];
                    nj += 1;
                } else {
                    op *= old_dims[oj];
                    oj += 1;
                }
            }

            for ok in oi..oj - 1 {
                let nested = match order {
                    Order::C => old_strides[ok] == old_dims[ok + 1] as isize * old_strides[ok + 1],
                    _ => old_strides[ok + 1] == old_dims[ok] as isize * old_strides[ok],
                };
                if !nested {
                    return Ok(None);
                }
            }

            match order {
                Order::C => {
                    new_strides[nj - 1] = old_strides[oj - 1];
                    for nk in (ni + 1..nj).rev() {
                        new_strides[nk - 1] = new_strides[nk] * new_dims[nk] as isize;
                    }
                }
                _ => {
                    new_strides[ni] = old_strides[oi];
                    for nk in ni + 1..nj {
                        new_strides[nk] = new_strides[nk - 1] * new_dims[nk - 1] as isize;
                    }
                }
            }

            ni = nj;
            nj += 1;
            oi = oj;
            oj += 1;
        }

        let last = if ni >= 1 {
            match order {
                Order::C => new_strides[ni - 1],
                _ => new_strides[ni - 1] * new_dims[ni - 1] as isize,
            }
        } else {
            1
        };
        for nk in ni..new_rank {
            new_strides[nk] = last;
        }

        Ok(Some(Self::build(shape.clone(), self.offset, new_strides)))
    }

    // =========================================================================
    // View Derivations
    // =========================================================================

    /// Drops every dimension of extent 1.
    #[must_use]
    pub fn squeeze(&self) -> Self {
        if self.shape.unit_dim_count() == 0 {
            return self.clone();
        }
        let (dims, strides): (Vec<usize>, Strides) = self
            .dims()
            .iter()
            .zip(self.strides.iter())
            .filter(|(&d, _)| d != 1)
            .map(|(&d, &s)| (d, s))
            .unzip();
        Self::from_parts(&dims, self.offset, strides)
    }

    /// Drops the listed axes when their extent is 1; others are kept.
    pub fn squeeze_axes(&self, axes: &[usize]) -> Result<Self> {
        if axes.is_empty() {
            return Ok(self.clone());
        }
        check_axes(axes, self.rank())?;
        let (dims, strides): (Vec<usize>, Strides) = (0..self.rank())
            .filter(|i| !axes.contains(i) || self.dim(*i) > 1)
            .map(|i| (self.dim(i), self.strides[i]))
            .unzip();
        Ok(Self::from_parts(&dims, self.offset, strides))
    }

    /// Inserts unit dimensions at the listed positions of the result.
    pub fn stretch(&self, axes: &[usize]) -> Result<Self> {
        if axes.is_empty() {
            return Ok(self.clone());
        }
        let len = self.rank() + axes.len();
        check_axes(axes, len)?;

        let mut dims = vec![1; len];
        let mut strides = Strides::from_elem(0, len);
        let mut src = 0;
        for i in 0..len {
            if !axes.contains(&i) {
                dims[i] = self.dim(src);
                strides[i] = self.strides[src];
                src += 1;
            }
        }
        Ok(Self::from_parts(&dims, self.offset, strides))
    }

    /// Repeats a unit dimension `size` times using a zero stride.
    pub fn expand(&self, axis: usize, size: usize) -> Result<Self> {
        if axis >= self.rank() {
            return Err(Error::InvalidAxis {
                axis: axis as isize,
                rank: self.rank(),
            });
        }
        if self.dim(axis) != 1 {
            return Err(Error::invalid_operation(format!(
                "dimension {axis} must have size 1, but has size {}",
                self.dim(axis)
            )));
        }
        let mut dims = self.dims().to_vec();
        let mut strides = self.strides.clone();
        dims[axis] = size;
        strides[axis] = 0;
        let shape = Shape::of(&dims)?;
        Ok(Self::build(shape, self.offset, strides))
    }

    /// Reverses the order of the dimensions.
    #[must_use]
    pub fn revert(&self) -> Self {
        let mut dims = self.dims().to_vec();
        let mut strides = self.strides.clone();
        dims.reverse();
        strides.reverse();
        Self::from_parts(&dims, self.offset, strides)
    }

    /// Moves axis `src` to position `dst`, shifting the ones in between.
    pub fn move_axis(&self, src: usize, dst: usize) -> Result<Self> {
        self.check_axis(src)?;
        self.check_axis(dst)?;
        if src == dst {
            return Ok(self.clone());
        }
        let mut perm: Vec<usize> = (0..self.rank()).collect();
        let moved = perm.remove(src);
        perm.insert(dst, moved);
        self.permute(&perm)
    }

    /// Exchanges two axes.
    pub fn swap_axis(&self, a: usize, b: usize) -> Result<Self> {
        self.check_axis(a)?;
        self.check_axis(b)?;
        if a == b {
            return Ok(self.clone());
        }
        let mut dims = self.dims().to_vec();
        let mut strides = self.strides.clone();
        dims.swap(a, b);
        strides.swap(a, b);
        Ok(Self::from_parts(&dims, self.offset, strides))
    }

    /// Keeps `[start, end)` of one axis. Without `keepdim` a resulting unit
    /// axis is dropped.
    pub fn narrow(&self, axis: usize, keepdim: bool, start: usize, end: usize) -> Result<Self> {
        self.check_axis(axis)?;
        if start >= end || end > self.dim(axis) {
            return Err(Error::invalid_operation(format!(
                "invalid range [{start}, {end}) for axis {axis} of size {}",
                self.dim(axis)
            )));
        }
        let mut dims = self.dims().to_vec();
        dims[axis] = end - start;
        let offset = (self.offset as isize + start as isize * self.strides[axis]) as usize;
        let result = Self::from_parts(&dims, offset, self.strides.clone());
        if keepdim {
            Ok(result)
        } else {
            result.squeeze_axes(&[axis])
        }
    }

    /// Keeps `[starts[i], ends[i])` of every axis.
    pub fn narrow_all(&self, keepdim: bool, starts: &[usize], ends: &[usize]) -> Result<Self> {
        if starts.len() != self.rank() || ends.len() != self.rank() {
            return Err(Error::dimension_mismatch(
                &[self.rank(), self.rank()],
                &[starts.len(), ends.len()],
            ));
        }
        let mut dims = self.dims().to_vec();
        let mut offset = self.offset as isize;
        for i in 0..self.rank() {
            if starts[i] >= ends[i] || ends[i] > self.dim(i) {
                return Err(Error::invalid_operation(format!(
                    "invalid range [{}, {}) for axis {i} of size {}",
                    starts[i],
                    ends[i],
                    self.dim(i)
                )));
            }
            dims[i] = ends[i] - starts[i];
            offset += starts[i] as isize * self.strides[i];
        }
        let result = Self::from_parts(&dims, offset as usize, self.strides.clone());
        if keepdim {
            return Ok(result);
        }
        let unit: Vec<usize> = (0..self.rank()).filter(|&i| dims[i] == 1).collect();
        result.squeeze_axes(&unit)
    }

    /// Reorders the axes: axis `i` of the result is axis `perm[i]` here.
    pub fn permute(&self, perm: &[usize]) -> Result<Self> {
        if perm.len() != self.rank() {
            return Err(Error::dimension_mismatch(&[self.rank()], &[perm.len()]));
        }
        let mut seen = vec![false; self.rank()];
        for &p in perm {
            if p >= self.rank() || seen[p] {
                return Err(Error::invalid_operation(format!(
                    "invalid permutation {perm:?}"
                )));
            }
            seen[p] = true;
        }
        let dims: Vec<usize> = perm.iter().map(|&p| self.dim(p)).collect();
        let strides: Strides = perm.iter().map(|&p| self.strides[p]).collect();
        Ok(Self::from_parts(&dims, self.offset, strides))
    }

    fn check_axis(&self, axis: usize) -> Result<()> {
        normalize_axis(axis as isize, self.rank()).map(|_| ())
    }
}

impl fmt::Display for StrideLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |v: Vec<String>| v.join(",");
        write!(
            f,
            "StrideLayout([{}],{},[{}])",
            join(self.dims().iter().map(ToString::to_string).collect()),
            self.offset,
            join(self.strides.iter().map(ToString::to_string).collect())
        )
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Merges nested neighbours of an F-arranged (fastest first) layout.
fn compact_f_dims(dims: &[usize], strides: &[isize]) -> (Vec<usize>, Strides) {
    let mut out_dims: Vec<usize> = Vec::with_capacity(dims.len());
    let mut out_strides = Strides::new();

    for (&d, &s) in dims.iter().zip(strides.iter()) {
        if d == 1 {
            continue;
        }
        if let (Some(last_d), Some(&last_s)) = (out_dims.last_mut(), out_strides.last()) {
            if *last_d as isize * last_s == s {
                *last_d *= d;
                continue;
            }
        }
        out_dims.push(d);
        out_strides.push(s);
    }

    if out_dims.is_empty() {
        out_dims.push(1);
        out_strides.push(strides.first().copied().unwrap_or(1));
    }
    (out_dims, out_strides)
}

fn check_axes(axes: &[usize], rank: usize) -> Result<()> {
    let mut seen = vec![false; rank];
    for &axis in axes {
        if axis >= rank {
            return Err(Error::InvalidAxis {
                axis: axis as isize,
                rank,
            });
        }
        if seen[axis] {
            return Err(Error::invalid_operation(format!(
                "duplicate axis {axis} in {axes:?}"
            )));
        }
        seen[axis] = true;
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(dims: &[usize]) -> Shape {
        Shape::of(dims).unwrap()
    }

    #[test]
    fn test_dense_flags() {
        let c = StrideLayout::of_dense(shape(&[2, 3, 4]), 0, Order::C).unwrap();
        assert_eq!(c.strides(), &[12, 4, 1]);
        assert!(c.is_c_ordered());
        assert!(!c.is_f_ordered());
        assert!(c.is_dense());
        assert_eq!(c.storage_fast_order(), Order::C);

        let f = StrideLayout::of_dense(shape(&[2, 3, 4]), 5, Order::F).unwrap();
        assert_eq!(f.strides(), &[1, 2, 6]);
        assert!(f.is_f_ordered());
        assert_eq!(f.storage_fast_order(), Order::F);
        assert!(StrideLayout::of_dense(shape(&[2]), 0, Order::S).is_err());
    }

    #[test]
    fn test_stride_length_mismatch() {
        let err = StrideLayout::of(shape(&[2, 3]), 0, &[1]).unwrap_err();
        assert!(matches!(err, Error::StrideLengthMismatch { rank: 2, strides: 1 }));
    }

    #[test]
    fn test_scalar_layout() {
        let layout = StrideLayout::of(Shape::scalar(), 7, &[]).unwrap();
        assert_eq!(layout.rank(), 0);
        assert_eq!(layout.stride(0), 1);
        assert_eq!(layout.pointer(&[]), 7);
        assert!(layout.is_dense());
    }

    #[test]
    fn test_pointer_and_index() {
        let layout = StrideLayout::of_dense(shape(&[3, 4]), 2, Order::C).unwrap();
        assert_eq!(layout.pointer(&[1, 2]), 8);
        assert_eq!(layout.index(8).unwrap(), vec![1, 2]);

        let t = layout.revert();
        assert_eq!(t.pointer(&[2, 1]), 8);
        assert_eq!(t.index(8).unwrap(), vec![2, 1]);
    }

    #[test]
    fn test_non_dense_order() {
        let layout = StrideLayout::of(shape(&[2, 3]), 0, &[10, 2]).unwrap();
        assert!(!layout.is_c_ordered());
        assert!(!layout.is_f_ordered());
        assert!(!layout.is_dense());
        assert_eq!(layout.storage_fast_order(), Order::S);
    }

    #[test]
    fn test_compaction_merges_dense() {
        let layout = StrideLayout::of_dense(shape(&[2, 3, 4]), 0, Order::C).unwrap();
        let compact = layout.compute_f_layout(Order::C, true);
        assert_eq!(compact.dims(), &[24]);
        assert_eq!(compact.strides(), &[1]);

        let f = layout.compute_f_layout(Order::F, true);
        assert_eq!(f.dims(), &[2, 3, 4]);
        assert_eq!(f.strides(), &[12, 4, 1]);

        let s = layout.compute_f_layout(Order::S, true);
        assert_eq!(s.dims(), &[24]);
    }

    #[test]
    fn test_compaction_partial() {
        // every other column of a 4x8 C matrix
        let layout = StrideLayout::of(shape(&[4, 3]), 1, &[8, 2]).unwrap();
        let compact = layout.compute_f_layout(Order::C, true);
        assert_eq!(compact.dims(), &[3, 4]);
        assert_eq!(compact.strides(), &[2, 8]);
        assert_eq!(compact.offset(), 1);

        // every other column of a 4x6 C matrix is one run of step 2
        let layout = StrideLayout::of(shape(&[4, 3]), 1, &[6, 2]).unwrap();
        let compact = layout.compute_f_layout(Order::C, true);
        assert_eq!(compact.dims(), &[12]);
        assert_eq!(compact.strides(), &[2]);
    }

    #[test]
    fn test_compaction_drops_unit_dims() {
        let layout = StrideLayout::of(shape(&[1, 5, 1]), 0, &[100, 1, 7]).unwrap();
        let compact = layout.compute_f_layout(Order::C, true);
        assert_eq!(compact.dims(), &[5]);
        assert_eq!(compact.strides(), &[1]);

        let single = StrideLayout::of(shape(&[1, 1]), 3, &[4, 9]).unwrap();
        let compact = single.compute_f_layout(Order::C, true);
        assert_eq!(compact.dims(), &[1]);
        assert_eq!(compact.offset(), 3);
    }

    #[test]
    fn test_compute_c_layout() {
        let layout = StrideLayout::of_dense(shape(&[2, 3]), 0, Order::F).unwrap();
        let c = layout.compute_c_layout(Order::C, false);
        assert_eq!(c.dims(), &[2, 3]);
        assert_eq!(c.strides(), &[1, 2]);
    }

    #[test]
    fn test_reshape_no_copy() {
        let layout = StrideLayout::of_dense(shape(&[2, 3, 4]), 0, Order::C).unwrap();
        let r = layout.attempt_reshape(&shape(&[6, 4]), Order::C).unwrap().unwrap();
        assert_eq!(r.strides(), &[4, 1]);

        let r = layout.attempt_reshape(&shape(&[24, 1]), Order::C).unwrap().unwrap();
        assert_eq!(r.dims(), &[24, 1]);
        assert_eq!(r.strides(), &[1, 1]);

        let f = StrideLayout::of_dense(shape(&[2, 3, 4]), 0, Order::F).unwrap();
        let r = f.attempt_reshape(&shape(&[6, 4]), Order::F).unwrap().unwrap();
        assert_eq!(r.strides(), &[1, 6]);
    }

    #[test]
    fn test_reshape_needs_copy() {
        let layout = StrideLayout::of_dense(shape(&[2, 3]), 0, Order::C).unwrap();
        let t = layout.revert();
        assert!(t.attempt_reshape(&shape(&[6]), Order::C).unwrap().is_none());
        assert!(t.attempt_reshape(&shape(&[6]), Order::F).unwrap().is_some());
        assert!(layout.attempt_reshape(&shape(&[5]), Order::C).is_err());
        assert!(layout.attempt_reshape(&shape(&[6]), Order::S).is_err());
    }

    #[test]
    fn test_squeeze_stretch() {
        let layout = StrideLayout::of(shape(&[1, 3, 1, 2]), 0, &[6, 2, 2, 1]).unwrap();
        let squeezed = layout.squeeze();
        assert_eq!(squeezed.dims(), &[3, 2]);
        assert_eq!(squeezed.strides(), &[2, 1]);

        let partial = layout.squeeze_axes(&[0, 1]).unwrap();
        assert_eq!(partial.dims(), &[3, 1, 2]);

        let stretched = squeezed.stretch(&[0, 2]).unwrap();
        assert_eq!(stretched.dims(), &[1, 3, 1, 2]);
        assert_eq!(stretched.strides(), &[0, 2, 0, 1]);
        assert!(squeezed.stretch(&[5]).is_err());
        assert!(squeezed.stretch(&[1, 1]).is_err());
    }

    #[test]
    fn test_expand() {
        let layout = StrideLayout::of_dense(shape(&[1, 3]), 0, Order::C).unwrap();
        let expanded = layout.expand(0, 4).unwrap();
        assert_eq!(expanded.dims(), &[4, 3]);
        assert_eq!(expanded.strides(), &[0, 1]);
        assert!(layout.expand(1, 4).is_err());
    }

    #[test]
    fn test_axis_moves() {
        let layout = StrideLayout::of_dense(shape(&[2, 3, 4]), 0, Order::C).unwrap();

        let moved = layout.move_axis(0, 2).unwrap();
        assert_eq!(moved.dims(), &[3, 4, 2]);
        assert_eq!(moved.strides(), &[4, 1, 12]);

        let swapped = layout.swap_axis(0, 2).unwrap();
        assert_eq!(swapped.dims(), &[4, 3, 2]);
        assert_eq!(swapped.strides(), &[1, 4, 12]);

        let permuted = layout.permute(&[1, 2, 0]).unwrap();
        assert_eq!(permuted, moved);
        assert!(layout.permute(&[0, 0, 1]).is_err());
        assert!(layout.move_axis(3, 0).is_err());
    }

    #[test]
    fn test_narrow() {
        let layout = StrideLayout::of_dense(shape(&[4, 5]), 0, Order::C).unwrap();
        let rows = layout.narrow(0, true, 1, 3).unwrap();
        assert_eq!(rows.dims(), &[2, 5]);
        assert_eq!(rows.offset(), 5);

        let row = layout.narrow(0, false, 2, 3).unwrap();
        assert_eq!(row.dims(), &[5]);
        assert_eq!(row.offset(), 10);

        let block = layout.narrow_all(true, &[1, 2], &[3, 4]).unwrap();
        assert_eq!(block.dims(), &[2, 2]);
        assert_eq!(block.offset(), 7);
        assert_eq!(block.pointer(&[1, 1]), 13);

        let cell = layout.narrow_all(false, &[1, 2], &[2, 4]).unwrap();
        assert_eq!(cell.dims(), &[2]);

        assert!(layout.narrow(0, true, 3, 3).is_err());
        assert!(layout.narrow(1, true, 0, 6).is_err());
    }

    #[test]
    fn test_display() {
        let layout = StrideLayout::of(shape(&[2, 3]), 1, &[3, 1]).unwrap();
        assert_eq!(layout.to_string(), "StrideLayout([2,3],1,[3,1])");
    }

    #[test]
    fn test_pointer_bounds() {
        let layout = StrideLayout::of(shape(&[3, 2]), 5, &[-2, 1]).unwrap();
        assert_eq!(layout.pointer_bounds(), (1, 6));
    }
}
