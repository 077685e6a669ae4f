//! Iterators - Index and Pointer Enumeration
//!
//! `IndexIterator` walks every multi-index of a shape in `C` or `F` order,
//! keeping the running linear position of the emitted index. It is finite
//! and not restartable: a fresh walk needs a new iterator.
//! `PointerIterator` walks the storage pointers of a layout, driven by a
//! loop descriptor.
//!
//! @version 0.1.0
//! @author `ndstride` Development Team

use ndstride_core::error::Result;
use ndstride_core::Order;

use crate::layout::StrideLayout;
use crate::loop_desc::StrideLoopDescriptor;
use crate::shape::{Dims, Shape};

// =============================================================================
// IndexIterator
// =============================================================================

/// Lazy enumeration of the multi-indices of a shape.
#[derive(Debug, Clone)]
pub struct IndexIterator {
    dims: Dims,
    order: Order,
    current: Vec<usize>,
    emitted: usize,
    size: usize,
}

impl IndexIterator {
    /// Creates an iterator over `shape` in `order` (`C` or `F`).
    pub fn new(shape: &Shape, order: Order) -> Result<Self> {
        let order = order.require_canonical("IndexIterator")?;
        Ok(Self {
            dims: Dims::from_slice(shape.dims()),
            order,
            current: vec![0; shape.rank()],
            emitted: 0,
            size: shape.size(),
        })
    }

    /// True while indices remain.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.emitted < self.size
    }

    /// Linear position of the most recently emitted index (0 before the
    /// first call to `next`).
    #[must_use]
    pub fn pos(&self) -> usize {
        self.emitted.saturating_sub(1)
    }

    fn advance(&mut self) {
        let rank = self.dims.len();
        match self.order {
            Order::C => {
                for i in (0..rank).rev() {
                    self.current[i] += 1;
                    if self.current[i] < self.dims[i] {
                        return;
                    }
                    self.current[i] = 0;
                }
            }
            _ => {
                for i in 0..rank {
                    self.current[i] += 1;
                    if self.current[i] < self.dims[i] {
                        return;
                    }
                    self.current[i] = 0;
                }
            }
        }
    }
}

impl Iterator for IndexIterator {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.has_next() {
            return None;
        }
        let index = self.current.clone();
        self.emitted += 1;
        self.advance();
        Some(index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest = self.size - self.emitted;
        (rest, Some(rest))
    }
}

impl ExactSizeIterator for IndexIterator {}

// =============================================================================
// PointerIterator
// =============================================================================

/// Storage pointers of a layout in a requested order.
#[derive(Debug, Clone)]
pub struct PointerIterator {
    plan: StrideLoopDescriptor,
    outer: usize,
    inner: usize,
    emitted: usize,
}

impl PointerIterator {
    /// Creates an iterator over `layout`; `S` follows storage order.
    #[must_use]
    pub fn new(layout: &StrideLayout, order: Order) -> Self {
        Self {
            plan: StrideLoopDescriptor::new(layout, order, 1),
            outer: 0,
            inner: 0,
            emitted: 0,
        }
    }

    /// Number of pointers already emitted.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.emitted
    }
}

impl Iterator for PointerIterator {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.outer >= self.plan.count {
            return None;
        }
        let ptr = self.plan.pointer(self.plan.offsets[self.outer], self.inner);
        self.inner += 1;
        if self.inner == self.plan.size {
            self.inner = 0;
            self.outer += 1;
        }
        self.emitted += 1;
        Some(ptr)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest = self.plan.total() - self.emitted;
        (rest, Some(rest))
    }
}

impl ExactSizeIterator for PointerIterator {}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use ndstride_core::Error;

    #[test]
    fn test_c_order() {
        let shape = Shape::of(&[2, 3]).unwrap();
        let all: Vec<Vec<usize>> = IndexIterator::new(&shape, Order::C).unwrap().collect();
        assert_eq!(
            all,
            vec![
                vec![0, 0],
                vec![0, 1],
                vec![0, 2],
                vec![1, 0],
                vec![1, 1],
                vec![1, 2]
            ]
        );
    }

    #[test]
    fn test_f_order() {
        let shape = Shape::of(&[2, 3]).unwrap();
        let all: Vec<Vec<usize>> = IndexIterator::new(&shape, Order::F).unwrap().collect();
        assert_eq!(all[1], vec![1, 0]);
        assert_eq!(all[2], vec![0, 1]);
        assert_eq!(all.len(), 6);
    }

    #[test]
    fn test_pos_tracks_position() {
        let shape = Shape::of(&[3, 2, 4]).unwrap();
        for order in [Order::C, Order::F] {
            let mut it = IndexIterator::new(&shape, order).unwrap();
            assert_eq!(it.len(), 24);
            while it.has_next() {
                let index = it.next().unwrap();
                assert_eq!(shape.position(order, &index).unwrap(), it.pos());
            }
            assert!(it.next().is_none());
        }
    }

    #[test]
    fn test_scalar_iterates_once() {
        let mut it = IndexIterator::new(&Shape::scalar(), Order::C).unwrap();
        assert_eq!(it.next(), Some(vec![]));
        assert_eq!(it.next(), None);
    }

    #[test]
    fn test_storage_order_rejected() {
        let shape = Shape::of(&[2]).unwrap();
        assert!(matches!(
            IndexIterator::new(&shape, Order::S),
            Err(Error::UnsupportedOrder { .. })
        ));
    }

    #[test]
    fn test_pointer_iterator() {
        let layout = StrideLayout::of_dense(Shape::of(&[2, 3]).unwrap(), 0, Order::C).unwrap();
        let c: Vec<usize> = PointerIterator::new(&layout, Order::C).collect();
        assert_eq!(c, vec![0, 1, 2, 3, 4, 5]);
        let f: Vec<usize> = PointerIterator::new(&layout, Order::F).collect();
        assert_eq!(f, vec![0, 3, 1, 4, 2, 5]);

        let t = layout.revert();
        let s: Vec<usize> = PointerIterator::new(&t, Order::S).collect();
        assert_eq!(s, vec![0, 1, 2, 3, 4, 5]);
    }
}
