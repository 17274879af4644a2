use crate::{Layout, RVec, Shape, Strides};

/// Linear storage offset of `index` relative to the origin described by `strides`.
///
/// No bounds checking is performed. If `index` holds more entries than there are strides,
/// the extra leading entries are ignored, so a lower rank operand can be addressed with the
/// index of a broadcast iteration.
#[inline]
pub fn element_offset(strides: &[isize], index: &[usize]) -> isize {
    let skip = index.len().saturating_sub(strides.len());
    strides
        .iter()
        .zip(&index[skip..])
        .map(|(&stride, &i)| stride * i as isize)
        .sum()
}

/// Number of elements described by `shape`; the empty shape holds one element.
#[inline]
pub fn compute_size(shape: &Shape) -> usize {
    shape.numel()
}

/// Canonical contiguous strides for `shape` laid out as `layout`.
pub fn compute_strides(shape: &Shape, layout: Layout) -> Strides {
    Strides::contiguous(shape, layout)
}

/// Splits a flat index into a multi-index using positive contiguous strides.
///
/// Axes with a stride of 0 (only produced for empty shapes) map to coordinate 0.
pub fn unravel_index(mut flat: usize, strides: &Strides) -> RVec<usize> {
    strides
        .iter()
        .map(|&stride| {
            if stride <= 0 {
                return 0;
            }
            let stride = stride as usize;
            let coord = flat / stride;
            flat %= stride;
            coord
        })
        .collect()
}
