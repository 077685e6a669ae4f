//! Kernel drivers shared by the element-wise and reduction operations.

use ndstride_core::{Numeric, Order};

use crate::narray::NArray;

/// Rewrites every slot of `array` with `f(old)`, in storage order.
pub(crate) fn map_inplace<T, F>(array: &NArray<T>, f: F)
where
    T: Numeric,
    F: Fn(T) -> T,
{
    let plan = array.loop_descriptor(Order::S);
    let storage = array.storage();
    let vectorize = storage.supports_vectorization() && plan.lanes > 1;
    let mut lane = vec![T::ZERO; plan.lanes];

    for &base in &plan.offsets {
        let mut i = 0;
        if vectorize {
            if plan.is_unit_step() {
                while i < plan.simd_bound {
                    let p = base + i;
                    storage.get_vector(p, &mut lane);
                    lane.iter_mut().for_each(|v| *v = f(*v));
                    storage.set_vector(p, &lane);
                    i += plan.lanes;
                }
            } else {
                let offsets = plan.simd_offsets();
                while i < plan.simd_bound {
                    let p = plan.pointer(base, i);
                    storage.get_vector_gather(p, offsets, &mut lane);
                    lane.iter_mut().for_each(|v| *v = f(*v));
                    storage.set_vector_scatter(p, offsets, &lane);
                    i += plan.lanes;
                }
            }
        }
        for i in i..plan.size {
            let p = plan.pointer(base, i);
            storage.set(p, f(storage.get(p)));
        }
    }
}

/// Rewrites every slot of `array` with `f(old, values[k])`, where `k` is
/// the position of the slot when `array` is traversed in `order`.
pub(crate) fn zip_inplace<T, F>(array: &NArray<T>, order: Order, values: &[T], f: F)
where
    T: Numeric,
    F: Fn(T, T) -> T,
{
    debug_assert_eq!(values.len(), array.size());
    let plan = array.loop_descriptor(order);
    let storage = array.storage();
    let vectorize = storage.supports_vectorization() && plan.lanes > 1;
    let mut lane = vec![T::ZERO; plan.lanes];
    let mut k = 0;

    for &base in &plan.offsets {
        let mut i = 0;
        if vectorize {
            let offsets = plan.simd_offsets();
            while i < plan.simd_bound {
                let p = plan.pointer(base, i);
                if plan.is_unit_step() {
                    storage.get_vector(p, &mut lane);
                } else {
                    storage.get_vector_gather(p, offsets, &mut lane);
                }
                for (v, &w) in lane.iter_mut().zip(&values[k..k + plan.lanes]) {
                    *v = f(*v, w);
                }
                if plan.is_unit_step() {
                    storage.set_vector(p, &lane);
                } else {
                    storage.set_vector_scatter(p, offsets, &lane);
                }
                i += plan.lanes;
                k += plan.lanes;
            }
        }
        for i in i..plan.size {
            let p = plan.pointer(base, i);
            storage.set(p, f(storage.get(p), values[k]));
            k += 1;
        }
    }
}

/// Folds every slot of `array` with `f`, keeping one accumulator per lane
/// on vectorized runs.
pub(crate) fn fold<T, F>(array: &NArray<T>, init: T, f: F) -> T
where
    T: Numeric,
    F: Fn(T, T) -> T,
{
    fold_with(array, init, &f, &f)
}

/// Folds every slot of `array` into an accumulator with `step`. Vectorized
/// runs keep one accumulator per lane; lane accumulators are joined into
/// the scalar one with `merge` at the end.
pub(crate) fn fold_with<T, A, F, G>(array: &NArray<T>, init: A, step: F, merge: G) -> A
where
    T: Numeric,
    A: Copy,
    F: Fn(A, T) -> A,
    G: Fn(A, A) -> A,
{
    let plan = array.loop_descriptor(Order::S);
    let storage = array.storage();
    let vectorize = storage.supports_vectorization() && plan.lanes > 1;
    let data = storage.as_slice();
    let mut lanes = vec![init; plan.lanes];
    let mut acc = init;

    for &base in &plan.offsets {
        let mut i = 0;
        if vectorize {
            while i < plan.simd_bound {
                for (j, slot) in lanes.iter_mut().enumerate() {
                    *slot = step(*slot, data[plan.pointer(base, i + j)]);
                }
                i += plan.lanes;
            }
        }
        for i in i..plan.size {
            acc = step(acc, data[plan.pointer(base, i)]);
        }
    }
    if !vectorize {
        return acc;
    }
    lanes.into_iter().fold(acc, merge)
}
