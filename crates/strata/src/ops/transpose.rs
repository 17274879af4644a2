use crate::view::Baseline;
use crate::{Closure, Enforcer, Expression, Layout, StridedView, TransposeError};

/// How thoroughly [`transpose_with`] validates a permutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckPolicy {
    /// Length and axis range only. Repeated axes are accepted.
    #[default]
    None,
    /// Additionally rejects repeated axes.
    Full,
}

/// Layout of a view whose axes are `permutation` of a source laid out as `layout`.
pub fn permuted_layout(layout: Layout, permutation: &[usize]) -> Layout {
    if permutation.windows(2).all(|w| w[0] <= w[1]) {
        layout
    } else if permutation.windows(2).all(|w| w[0] >= w[1]) {
        layout.transposed()
    } else {
        Layout::Dynamic
    }
}

/// Reverses the axes of `e`.
///
/// ```
/// # use strata::prelude::*;
/// let a = Array::from_data([1, 2, 3, 4, 5, 6], shape![2, 3]).unwrap();
/// let t = transpose(&a);
/// assert_eq!(t.shape(), &shape![3, 2]);
/// assert_eq!(t.layout(), Layout::ColumnMajor);
/// ```
pub fn transpose<'a, E: Expression>(e: impl Into<Closure<'a, E>>) -> StridedView<'a, E> {
    let e = e.into();
    let shape = e.shape().reversed();
    let Baseline {
        handle,
        strides,
        offset,
        layout,
    } = Baseline::of(e);
    let layout = layout.transposed();
    log::debug!("transpose: {:?} -> layout {}", shape, layout);
    StridedView::new_unchecked(handle, shape, strides.reversed(), offset, layout)
}

/// Reorders the axes of `e`: axis `i` of the result is axis `permutation[i]` of `e`.
///
/// The permutation must name every axis of `e` exactly once. With [`CheckPolicy::None`]
/// repeated axes are not detected and produce a view that reads some elements more than once.
pub fn transpose_with<'a, E: Expression>(
    e: impl Into<Closure<'a, E>>,
    permutation: &[usize],
    policy: CheckPolicy,
) -> Result<StridedView<'a, E>, TransposeError> {
    let e = e.into();
    Enforcer::check_permutation(e.dimension(), permutation, policy)?;
    let shape = e.shape().permuted(permutation);
    let Baseline {
        handle,
        strides,
        offset,
        layout,
    } = Baseline::of(e);
    let layout = permuted_layout(layout, permutation);
    log::debug!(
        "transpose {:?}: {:?} -> layout {}",
        permutation,
        shape,
        layout
    );
    Ok(StridedView::new_unchecked(
        handle,
        shape,
        strides.permuted(permutation),
        offset,
        layout,
    ))
}
