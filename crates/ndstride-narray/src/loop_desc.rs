//! Stride Loop Descriptor - Precomputed Iteration Plans
//!
//! Elementwise and reduction kernels do not walk multi-indices. They ask a
//! `StrideLoopDescriptor` for a plan: one innermost run of `size` elements
//! separated by `step` slots, repeated from each of `count` outer offsets.
//! The run is as long as compaction of the layout allows, and is split at
//! `simd_bound` into full lanes and a scalar tail.
//!
//! # Key Features
//! - Layout compaction before planning
//! - Outer offsets built by an incremental odometer in `O(size)` work
//! - Lane-aligned bound and lazily cached per-lane offsets
//!
//! @version 0.1.0
//! @author `ndstride` Development Team

use std::cell::OnceCell;

use ndstride_core::{Numeric, Order};

use crate::layout::StrideLayout;

// =============================================================================
// StrideLoopDescriptor Struct
// =============================================================================

/// Loop plan over a layout in a requested order.
///
/// Visiting `offsets[k] + i * step` for every outer `k` and every
/// `i < size` yields each slot of the layout once, in the requested order.
#[derive(Debug, Clone)]
pub struct StrideLoopDescriptor {
    /// Length of the innermost run.
    pub size: usize,
    /// Displacement between consecutive elements of a run.
    pub step: isize,
    /// Number of runs.
    pub count: usize,
    /// Starting pointer of every run.
    pub offsets: Vec<usize>,
    /// Largest multiple of `lanes` not above `size`.
    pub simd_bound: usize,
    /// Lane width the plan was built for.
    pub lanes: usize,
    simd_offsets: OnceCell<Vec<isize>>,
}

impl StrideLoopDescriptor {
    /// Builds the plan for `layout` iterated in `order`.
    ///
    /// # Arguments
    /// * `layout` - Layout to iterate
    /// * `order` - `C`, `F`, or `S` for the storage-fast order
    /// * `lanes` - SIMD lane width, at least 1
    #[must_use]
    pub fn new(layout: &StrideLayout, order: Order, lanes: usize) -> Self {
        let lanes = lanes.max(1);

        if layout.rank() == 0 {
            return Self {
                size: 1,
                step: 1,
                count: 1,
                offsets: vec![layout.offset()],
                simd_bound: 1 - 1 % lanes,
                lanes,
                simd_offsets: OnceCell::new(),
            };
        }

        let compact = layout.compute_f_layout(order, true);
        let size = compact.dim(0);
        let step = compact.stride(0);
        let count = compact.size() / size;

        let mut offsets = vec![0isize; count];
        offsets[0] = compact.offset() as isize;
        let mut inner = 1;
        for d in 1..compact.rank() {
            let dim = compact.dim(d);
            let stride = compact.stride(d as isize);
            for j in 1..dim {
                let shift = j as isize * stride;
                for k in 0..inner {
                    offsets[j * inner + k] = offsets[k] + shift;
                }
            }
            inner *= dim;
        }

        tracing::trace!(size, step, count, lanes, layout = %layout, "loop descriptor");

        Self {
            size,
            step,
            count,
            offsets: offsets.into_iter().map(|p| p as usize).collect(),
            simd_bound: size - size % lanes,
            lanes,
            simd_offsets: OnceCell::new(),
        }
    }

    /// Builds the plan using the lane width of element type `T`.
    #[must_use]
    pub fn of<T: Numeric>(layout: &StrideLayout, order: Order) -> Self {
        Self::new(layout, order, T::lanes())
    }

    /// Per-lane displacements `i * step` for `i < lanes`, computed once.
    pub fn simd_offsets(&self) -> &[isize] {
        self.simd_offsets
            .get_or_init(|| (0..self.lanes as isize).map(|i| i * self.step).collect())
    }

    /// Pointer of element `i` of the run starting at `base`.
    #[must_use]
    pub fn pointer(&self, base: usize, i: usize) -> usize {
        (base as isize + i as isize * self.step) as usize
    }

    /// True when runs are contiguous in storage.
    #[must_use]
    pub fn is_unit_step(&self) -> bool {
        self.step == 1
    }

    /// Total number of visited slots.
    #[must_use]
    pub fn total(&self) -> usize {
        self.size * self.count
    }

    /// Every visited pointer, in plan order.
    pub fn pointers(&self) -> impl Iterator<Item = usize> + '_ {
        self.offsets
            .iter()
            .flat_map(move |&base| (0..self.size).map(move |i| self.pointer(base, i)))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iter::IndexIterator;
    use crate::shape::Shape;
    use proptest::prelude::*;

    fn layout(dims: &[usize], offset: usize, strides: &[isize]) -> StrideLayout {
        StrideLayout::of(Shape::of(dims).unwrap(), offset, strides).unwrap()
    }

    #[test]
    fn test_scalar_plan() {
        let plan = StrideLoopDescriptor::new(&layout(&[], 4, &[]), Order::C, 4);
        assert_eq!(plan.size, 1);
        assert_eq!(plan.step, 1);
        assert_eq!(plan.count, 1);
        assert_eq!(plan.offsets, vec![4]);
        assert_eq!(plan.simd_bound, 0);
    }

    #[test]
    fn test_dense_plan_is_one_run() {
        let dense = StrideLayout::of_dense(Shape::of(&[3, 5, 2]).unwrap(), 0, Order::C).unwrap();
        let plan = StrideLoopDescriptor::new(&dense, Order::C, 4);
        assert_eq!(plan.size, 30);
        assert_eq!(plan.step, 1);
        assert_eq!(plan.count, 1);
        assert_eq!(plan.simd_bound, 28);
        assert!(plan.is_unit_step());
    }

    #[test]
    fn test_dense_plan_against_order() {
        let dense = StrideLayout::of_dense(Shape::of(&[3, 4]).unwrap(), 0, Order::C).unwrap();
        let plan = StrideLoopDescriptor::new(&dense, Order::F, 2);
        assert_eq!(plan.size, 3);
        assert_eq!(plan.step, 4);
        assert_eq!(plan.offsets, vec![0, 1, 2, 3]);
        assert_eq!(plan.simd_bound, 2);
        assert_eq!(plan.simd_offsets(), &[0, 4]);
    }

    #[test]
    fn test_strided_plan_offsets() {
        // columns 1..4 of a 3x6 C matrix
        let view = layout(&[3, 3], 1, &[6, 1]);
        let plan = StrideLoopDescriptor::new(&view, Order::C, 8);
        assert_eq!(plan.size, 3);
        assert_eq!(plan.step, 1);
        assert_eq!(plan.offsets, vec![1, 7, 13]);
        assert_eq!(plan.simd_bound, 0);
        let visited: Vec<usize> = plan.pointers().collect();
        assert_eq!(visited, vec![1, 2, 3, 7, 8, 9, 13, 14, 15]);
    }

    #[test]
    fn test_odometer_rank3() {
        let view = layout(&[2, 2, 3], 0, &[100, 10, 2]);
        let plan = StrideLoopDescriptor::new(&view, Order::C, 1);
        assert_eq!(plan.size, 3);
        assert_eq!(plan.step, 2);
        assert_eq!(plan.offsets, vec![0, 10, 100, 110]);
    }

    #[test]
    fn test_storage_order_sorts_strides() {
        let view = layout(&[4, 3], 0, &[1, 4]);
        let plan = StrideLoopDescriptor::new(&view, Order::S, 4);
        assert_eq!(plan.size, 12);
        assert_eq!(plan.step, 1);
        assert_eq!(plan.count, 1);
    }

    #[test]
    fn test_zero_stride_revisits() {
        let base = StrideLayout::of_dense(Shape::of(&[1, 3]).unwrap(), 0, Order::C).unwrap();
        let expanded = base.expand(0, 2).unwrap();
        let plan = StrideLoopDescriptor::new(&expanded, Order::C, 1);
        let visited: Vec<usize> = plan.pointers().collect();
        assert_eq!(visited, vec![0, 1, 2, 0, 1, 2]);
    }

    #[test]
    fn test_negative_stride() {
        let view = layout(&[4], 3, &[-1]);
        let plan = StrideLoopDescriptor::new(&view, Order::C, 2);
        let visited: Vec<usize> = plan.pointers().collect();
        assert_eq!(visited, vec![3, 2, 1, 0]);
        assert_eq!(plan.simd_offsets(), &[0, -1]);
    }

    fn arb_layout() -> impl Strategy<Value = StrideLayout> {
        (
            prop::collection::vec((1usize..4, 1isize..4), 1..5),
            any::<usize>(),
            0usize..3,
            any::<bool>(),
        )
            .prop_map(|(parts, rotation, offset, flip)| {
                // each dimension jumps past the span of the previous ones, so slots never overlap
                let mut dims = Vec::new();
                let mut strides = Vec::new();
                let mut span = 1isize;
                for (d, gap) in parts {
                    let stride = span * gap;
                    dims.push(d);
                    strides.push(stride);
                    span = stride * d as isize;
                }
                let r = rotation % dims.len();
                dims.rotate_left(r);
                strides.rotate_left(r);
                if flip {
                    dims.reverse();
                    strides.reverse();
                }
                StrideLayout::of(Shape::of(&dims).unwrap(), offset, &strides).unwrap()
            })
    }

    proptest! {
        #[test]
        fn prop_plan_matches_index_enumeration(
            layout in arb_layout(),
            f_order in any::<bool>(),
            lanes in 1usize..9,
        ) {
            let order = if f_order { Order::F } else { Order::C };
            let plan = StrideLoopDescriptor::new(&layout, order, lanes);
            let from_plan: Vec<usize> = plan.pointers().collect();
            let from_index: Vec<usize> = IndexIterator::new(layout.shape(), order)
                .unwrap()
                .map(|idx| layout.pointer(&idx))
                .collect();
            prop_assert_eq!(plan.total(), layout.size());
            prop_assert_eq!(from_plan, from_index);
            prop_assert!(plan.simd_bound <= plan.size);
            prop_assert_eq!(plan.simd_bound % lanes, 0);
        }

        #[test]
        fn prop_storage_order_visits_each_slot_once(layout in arb_layout()) {
            let plan = StrideLoopDescriptor::new(&layout, Order::S, 4);
            let mut from_plan: Vec<usize> = plan.pointers().collect();
            let mut from_index: Vec<usize> = IndexIterator::new(layout.shape(), Order::C)
                .unwrap()
                .map(|idx| layout.pointer(&idx))
                .collect();
            from_plan.sort_unstable();
            from_index.sort_unstable();
            prop_assert_eq!(from_plan, from_index);
        }
    }
}
