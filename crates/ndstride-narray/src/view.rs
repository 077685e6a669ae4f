//! Views - Layout Derivations Over Shared Storage
//!
//! Every operation here except `copy`, `flatten` and `cast` returns an array
//! over the same `Storage` as `self`, so writes through the result are
//! visible through the source. `reshape` and `ravel` fall back to a copy
//! only when the strides cannot express the requested shape.
//!
//! # Key Features
//! - No-copy reshape with copy fallback
//! - Transpose, permutation, axis moves and swaps
//! - Narrowing of one or all axes, splitting and chunking along an axis
//! - Insertion, removal and zero-stride expansion of unit axes
//!
//! @version 0.1.0
//! @author `ndstride` Development Team

use ndstride_core::error::{Error, Result};
use ndstride_core::{Numeric, Order, Storage};

use crate::layout::StrideLayout;
use crate::narray::NArray;
use crate::shape::{normalize_axis, Shape};

impl<T: Numeric> NArray<T> {
    fn with_layout(&self, layout: StrideLayout) -> Self {
        Self {
            layout,
            storage: self.storage.clone(),
        }
    }

    /// Resolves `S` to the canonical order closest to the physical layout.
    fn resolve_order(&self, order: Order) -> Order {
        match order {
            Order::S => Order::auto_fc(self.layout.storage_fast_order()),
            other => other,
        }
    }

    // =========================================================================
    // Reshaping
    // =========================================================================

    /// Gives this array a new shape with the same number of elements.
    ///
    /// Elements are read from `self` and written into the result in
    /// `order`; `S` picks the order of the physical layout. The result is
    /// a view when the strides allow it, otherwise a copy.
    ///
    /// # Arguments
    /// * `shape` - Target shape, with `size()` equal to this array's size
    /// * `order` - Traversal order shared by source and result
    pub fn reshape(&self, shape: &Shape, order: Order) -> Result<Self> {
        let order = self.resolve_order(order);
        if let Some(layout) = self.layout.attempt_reshape(shape, order)? {
            return Ok(self.with_layout(layout));
        }
        tracing::debug!(from = %self.layout, to = %shape, %order, "reshape requires a copy");
        let values = self.to_vec(order);
        Self::dense(shape.clone(), order, Storage::from_vec(values))
    }

    /// One-dimensional view in `order`, copying only when needed.
    pub fn ravel(&self, order: Order) -> Result<Self> {
        self.reshape(&Shape::from_dims(&[self.size()]), order)
    }

    /// One-dimensional copy in `order`.
    #[must_use]
    pub fn flatten(&self, order: Order) -> Self {
        let order = self.resolve_order(order);
        let values = self.to_vec(order);
        self.fresh(&Shape::from_dims(&[self.size()]), Order::C, values)
    }

    /// Dense copy laid out in `order`; `S` keeps the physical order.
    #[must_use]
    pub fn copy(&self, order: Order) -> Self {
        let order = self.resolve_order(order);
        let values = self.to_vec(order);
        self.fresh(self.shape(), order, values)
    }

    /// Copy converted element-wise to another type.
    ///
    /// Floats are truncated toward zero and integers saturate.
    #[must_use]
    pub fn cast<U: Numeric>(&self) -> NArray<U> {
        let order = self.resolve_order(Order::S);
        let values: Vec<U> = self
            .to_vec(order)
            .into_iter()
            .map(|v| U::from_f64(Numeric::to_f64(v)))
            .collect();
        let layout = StrideLayout::dense_unchecked(self.shape(), order);
        NArray {
            layout,
            storage: Storage::from_vec(values),
        }
    }

    fn fresh(&self, shape: &Shape, order: Order, values: Vec<T>) -> Self {
        Self {
            layout: StrideLayout::dense_unchecked(shape, order),
            storage: Storage::from_vec(values),
        }
    }

    // =========================================================================
    // Axis Reordering
    // =========================================================================

    /// Transposed view: every axis reversed.
    #[must_use]
    pub fn t(&self) -> Self {
        self.with_layout(self.layout.revert())
    }

    /// View with axis `i` of the result taken from axis `perm[i]`.
    pub fn permute(&self, perm: &[usize]) -> Result<Self> {
        Ok(self.with_layout(self.layout.permute(perm)?))
    }

    /// View with axis `src` moved to position `dst`.
    pub fn move_axis(&self, src: usize, dst: usize) -> Result<Self> {
        Ok(self.with_layout(self.layout.move_axis(src, dst)?))
    }

    /// View with two axes exchanged.
    pub fn swap_axis(&self, a: usize, b: usize) -> Result<Self> {
        Ok(self.with_layout(self.layout.swap_axis(a, b)?))
    }

    // =========================================================================
    // Narrowing
    // =========================================================================

    /// View of `[start, end)` along `axis`.
    pub fn narrow(&self, axis: usize, keepdim: bool, start: usize, end: usize) -> Result<Self> {
        Ok(self.with_layout(self.layout.narrow(axis, keepdim, start, end)?))
    }

    /// View of `[starts[i], ends[i])` along every axis.
    pub fn narrow_all(&self, keepdim: bool, starts: &[usize], ends: &[usize]) -> Result<Self> {
        Ok(self.with_layout(self.layout.narrow_all(keepdim, starts, ends)?))
    }

    /// Views over consecutive ranges of `axis`. Range `i` starts at
    /// `starts[i]` and ends at `starts[i + 1]`, the last one at the end of
    /// the axis. Starts must be strictly increasing.
    pub fn split(&self, axis: usize, keepdim: bool, starts: &[usize]) -> Result<Vec<Self>> {
        normalize_axis(axis as isize, self.rank())?;
        if starts.is_empty() {
            return Err(Error::invalid_operation("split needs at least one start index"));
        }
        let dim = self.dim(axis);
        starts
            .iter()
            .enumerate()
            .map(|(i, &start)| {
                let end = starts.get(i + 1).copied().unwrap_or(dim);
                self.narrow(axis, keepdim, start, end)
            })
            .collect()
    }

    /// Views of `step` consecutive entries of `axis`; the last one is
    /// shorter when `step` does not divide the axis.
    pub fn chunk(&self, axis: usize, keepdim: bool, step: usize) -> Result<Vec<Self>> {
        normalize_axis(axis as isize, self.rank())?;
        if step == 0 {
            return Err(Error::invalid_operation("chunk step must be positive"));
        }
        let starts: Vec<usize> = (0..self.dim(axis)).step_by(step).collect();
        self.split(axis, keepdim, &starts)
    }

    /// One view per entry of `axis`.
    pub fn unbind(&self, axis: usize, keepdim: bool) -> Result<Vec<Self>> {
        self.chunk(axis, keepdim, 1)
    }

    // =========================================================================
    // Unit Axes
    // =========================================================================

    /// View without unit axes.
    #[must_use]
    pub fn squeeze(&self) -> Self {
        self.with_layout(self.layout.squeeze())
    }

    /// View without the listed unit axes.
    pub fn squeeze_axes(&self, axes: &[usize]) -> Result<Self> {
        Ok(self.with_layout(self.layout.squeeze_axes(axes)?))
    }

    /// View with unit axes inserted at the listed positions.
    pub fn stretch(&self, axes: &[usize]) -> Result<Self> {
        Ok(self.with_layout(self.layout.stretch(axes)?))
    }

    /// View repeating unit axis `axis` `size` times without copying.
    pub fn expand(&self, axis: usize, size: usize) -> Result<Self> {
        Ok(self.with_layout(self.layout.expand(axis, size)?))
    }
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
    fn test_reshape_is_view_when_dense() {
        let a = NArray::<f64>::seq(&shape(&[2, 6]), Order::C);
        let b = a.reshape(&shape(&[3, 4]), Order::C).unwrap();
        assert!(b.shares_storage(&a));
        assert_eq!(b.get(&[1, 0]).unwrap(), 4.0);
        b.set(&[2, 3], -1.0).unwrap();
        assert_eq!(a.get(&[1, 5]).unwrap(), -1.0);
    }

    #[test]
    fn test_reshape_copies_when_strides_disagree() {
        let a = NArray::<i32>::seq(&shape(&[3, 4]), Order::C);
        let t = a.t();
        let r = t.reshape(&shape(&[12]), Order::C).unwrap();
        assert!(!r.shares_storage(&a));
        assert_eq!(r.to_vec(Order::C), vec![0, 4, 8, 1, 5, 9, 2, 6, 10, 3, 7, 11]);

        let f = t.reshape(&shape(&[12]), Order::F).unwrap();
        assert!(f.shares_storage(&a));
        assert_eq!(f.to_vec(Order::C), (0..12).collect::<Vec<_>>());
    }

    #[test]
    fn test_reshape_storage_order() {
        let a = NArray::<f32>::seq(&shape(&[4, 3]), Order::F);
        let r = a.reshape(&shape(&[2, 6]), Order::S).unwrap();
        assert!(r.shares_storage(&a));
        assert_eq!(r.to_vec(Order::F), a.to_vec(Order::F));
        assert!(a.reshape(&shape(&[5]), Order::C).is_err());
    }

    #[test]
    fn test_ravel_and_flatten() {
        let a = NArray::<f64>::seq(&shape(&[2, 3]), Order::C);
        let r = a.ravel(Order::C).unwrap();
        assert!(r.shares_storage(&a));
        let f = a.flatten(Order::F);
        assert!(!f.shares_storage(&a));
        assert_eq!(f.to_vec(Order::C), vec![0.0, 3.0, 1.0, 4.0, 2.0, 5.0]);
    }

    #[test]
    fn test_copy_isolates() {
        let a = NArray::<i8>::seq(&shape(&[2, 2]), Order::C);
        let c = a.copy(Order::F);
        assert!(c.layout().is_f_ordered());
        c.set(&[0, 0], 9).unwrap();
        assert_eq!(a.get(&[0, 0]).unwrap(), 0);
        assert_eq!(a.copy(Order::S).layout(), a.layout());
    }

    #[test]
    fn test_cast() {
        let a = NArray::<f64>::wrap(&shape(&[3]), vec![1.7, -2.2, 300.0], Order::C).unwrap();
        let b: NArray<i8> = a.cast();
        assert_eq!(b.to_vec(Order::C), vec![1, -2, 127]);
        let c: NArray<f32> = NArray::<i32>::seq(&shape(&[2, 2]), Order::F).cast();
        assert_eq!(c.get(&[0, 1]).unwrap(), 2.0);
    }

    #[test]
    fn test_transpose_views() {
        let a = NArray::<f64>::seq(&shape(&[2, 3, 4]), Order::C);
        let t = a.t();
        assert_eq!(t.dims(), &[4, 3, 2]);
        assert_eq!(t.get(&[3, 2, 1]).unwrap(), a.get(&[1, 2, 3]).unwrap());
        let p = a.permute(&[1, 0, 2]).unwrap();
        assert_eq!(p.get(&[2, 1, 0]).unwrap(), a.get(&[1, 2, 0]).unwrap());
        let m = a.move_axis(2, 0).unwrap();
        assert_eq!(m.dims(), &[4, 2, 3]);
        let s = a.swap_axis(0, 2).unwrap();
        assert_eq!(s.dims(), &[4, 3, 2]);
        assert!(a.permute(&[0, 0, 1]).is_err());
    }

    #[test]
    fn test_narrow_shares_storage() {
        let a = NArray::<i32>::seq(&shape(&[4, 5]), Order::C);
        let row = a.narrow(0, false, 2, 3).unwrap();
        assert_eq!(row.dims(), &[5]);
        assert_eq!(row.to_vec(Order::C), vec![10, 11, 12, 13, 14]);
        let kept = a.narrow(0, true, 2, 3).unwrap();
        assert_eq!(kept.dims(), &[1, 5]);
        row.set(&[0], 100).unwrap();
        assert_eq!(a.get(&[2, 0]).unwrap(), 100);
        assert!(a.narrow(1, true, 3, 3).is_err());
    }

    #[test]
    fn test_unit_axes() {
        let a = NArray::<f64>::seq(&shape(&[3]), Order::C);
        let s = a.stretch(&[0, 2]).unwrap();
        assert_eq!(s.dims(), &[1, 3, 1]);
        assert_eq!(s.squeeze().dims(), &[3]);
        assert_eq!(s.squeeze_axes(&[2]).unwrap().dims(), &[1, 3]);

        let e = s.expand(0, 4).unwrap();
        assert_eq!(e.dims(), &[4, 3, 1]);
        assert_eq!(e.get(&[3, 2, 0]).unwrap(), 2.0);
        assert_eq!(e.sum(), 12.0);
        assert!(s.expand(1, 2).is_err());
    }

    #[test]
    fn test_split_views() {
        let a = NArray::<i32>::seq(&shape(&[3, 7]), Order::C);
        let parts = a.split(1, true, &[0, 2, 5]).unwrap();
        let widths: Vec<usize> = parts.iter().map(|p| p.dim(1)).collect();
        assert_eq!(widths, vec![2, 3, 2]);
        assert_eq!(parts[2].to_vec(Order::C), vec![5, 6, 12, 13, 19, 20]);
        parts[1].fill_(-1);
        assert_eq!(a.get(&[2, 4]).unwrap(), -1);

        let tail = a.split(0, false, &[2]).unwrap();
        assert_eq!(tail.len(), 1);
        assert_eq!(tail[0].dims(), &[7]);

        assert!(a.split(1, true, &[]).is_err());
        assert!(a.split(1, true, &[3, 3]).is_err());
        assert!(a.split(2, true, &[0]).is_err());
    }

    #[test]
    fn test_chunk_and_unbind() {
        let a = NArray::<f64>::seq(&shape(&[10, 2]), Order::F);
        let chunks = a.chunk(0, true, 4).unwrap();
        let rows: Vec<usize> = chunks.iter().map(|c| c.dim(0)).collect();
        assert_eq!(rows, vec![4, 4, 2]);
        assert_eq!(chunks[2].get(&[1, 1]).unwrap(), a.get(&[9, 1]).unwrap());
        assert_eq!(a.chunk(0, true, 20).unwrap().len(), 1);
        assert!(a.chunk(0, true, 0).is_err());

        let columns = a.unbind(1, false).unwrap();
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[1].dims(), &[10]);
        assert_eq!(columns[1].sum(), (10..20).sum::<i32>() as f64);
    }
}
