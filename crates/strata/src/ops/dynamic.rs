use crate::view::Baseline;
use crate::{
    resolve_range, Closure, Expression, Layout, Shape, SliceError, SliceSpec, StridedView, Strides,
    ViewError,
};

/// Builds a view of `e` from a list of per-axis slice descriptors.
///
/// Descriptors are matched to source axes from the left; [`SliceSpec::NewAxis`] inserts an
/// axis without consuming one and axes left unmentioned at the end are kept whole. The
/// resulting layout is always [`Layout::Dynamic`].
///
/// ```
/// # use strata::prelude::*;
/// let a = Array::from_data([1, 2, 3, 4, 5, 6], shape![2, 3]).unwrap();
/// let v = dynamic_view(&a, &s![NewAxis, 1, range(..).step(-1)]).unwrap();
/// assert_eq!(v.shape(), &shape![1, 3]);
/// assert_eq!(v.to_vec(), vec![6, 5, 4]);
/// ```
pub fn dynamic_view<'a, E: Expression>(
    e: impl Into<Closure<'a, E>>,
    slices: &[SliceSpec],
) -> Result<StridedView<'a, E>, ViewError> {
    let e = e.into();
    let old_shape = e.shape().clone();
    let rank = old_shape.rank();

    let new_axes = slices
        .iter()
        .filter(|s| matches!(s, SliceSpec::NewAxis))
        .count();
    let indices = slices
        .iter()
        .filter(|s| matches!(s, SliceSpec::Index(_)))
        .count();
    let consumed = slices.len() - new_axes;
    if consumed > rank {
        return Err(SliceError::TooManySlices {
            given: consumed,
            rank,
        })?;
    }
    let dimension = rank + new_axes - indices;

    let Baseline {
        handle,
        strides: old_strides,
        offset: base_offset,
        ..
    } = Baseline::of(e);

    let mut shape = Shape::new(Default::default());
    let mut strides = Strides::new(Default::default());
    let mut offset = base_offset as isize;
    let mut newaxis_skip = 0;
    for (i, slice) in slices.iter().enumerate() {
        let axis = i - newaxis_skip;
        match *slice {
            SliceSpec::NewAxis => {
                newaxis_skip += 1;
                shape.push(1);
                strides.push(0);
            }
            SliceSpec::Index(index) => {
                let size = old_shape[axis];
                let resolved = if index < 0 {
                    index + size as isize
                } else {
                    index
                };
                if resolved < 0 || resolved >= size as isize {
                    return Err(SliceError::IndexOutOfRange { index, axis, size })?;
                }
                offset += resolved * old_strides[axis];
            }
            SliceSpec::All => {
                shape.push(old_shape[axis]);
                strides.push(old_strides[axis]);
            }
            SliceSpec::Range(range) => {
                let resolved =
                    resolve_range(&range, old_shape[axis]).ok_or(SliceError::ZeroStep { axis })?;
                offset += resolved.start as isize * old_strides[axis];
                shape.push(resolved.len);
                strides.push(resolved.step * old_strides[axis]);
            }
        }
    }
    for axis in consumed..rank {
        shape.push(old_shape[axis]);
        strides.push(old_strides[axis]);
    }
    debug_assert_eq!(shape.rank(), dimension);

    let offset = usize::try_from(offset).map_err(|_| ViewError::OutOfBounds {
        min: offset,
        max: offset,
        len: handle.len(),
    })?;
    log::trace!(
        "dynamic_view {:?} on {:?}: shape={:?} strides={:?} offset={}",
        slices,
        old_shape,
        shape,
        strides,
        offset
    );
    Ok(StridedView::new_unchecked(
        handle,
        shape,
        strides,
        offset,
        Layout::Dynamic,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{range, s, shape, Array, Generator, NewAxis};

    fn array() -> Array<i32> {
        Array::from_data([1, 2, 3, 4, 5, 6], shape![2, 3]).unwrap()
    }

    #[test]
    fn test_ranges() {
        let a = array();
        let v = dynamic_view(&a, &s![range(0..1), range(0..3).step(2)]).unwrap();
        assert_eq!(v.shape(), &shape![1, 2]);
        assert_eq!(v.strides().to_vec(), vec![3, 2]);
        assert_eq!(v.layout(), Layout::Dynamic);
        assert_eq!(v.element(&[0, 1]), 3);
        assert_eq!(v.to_vec(), vec![1, 3]);
    }

    #[test]
    fn test_index_drops_axis() {
        let a = array();
        let v = dynamic_view(&a, &s![1]).unwrap();
        assert_eq!(v.shape(), &shape![3]);
        assert_eq!(v.offset(), 3);
        assert_eq!(v.to_vec(), vec![4, 5, 6]);

        let last = dynamic_view(&a, &s![.., -1]).unwrap();
        assert_eq!(last.to_vec(), vec![3, 6]);

        let scalar = dynamic_view(&a, &s![1, 2]).unwrap();
        assert_eq!(scalar.dimension(), 0);
        assert_eq!(scalar.element(&[]), 6);
    }

    #[test]
    fn test_new_axis() {
        let a = array();
        let v = dynamic_view(&a, &s![.., NewAxis]).unwrap();
        assert_eq!(v.shape(), &shape![2, 1, 3]);
        assert_eq!(v.strides().to_vec(), vec![3, 0, 1]);
        for i in 0..2 {
            for j in 0..3 {
                assert_eq!(v.element(&[i, 0, j]), a.element(&[i, j]));
            }
        }
    }

    #[test]
    fn test_negative_step_and_empty() {
        let a = array();
        let v = dynamic_view(&a, &s![range(..).step(-1), range(1..).step(-1)]).unwrap();
        assert_eq!(v.shape(), &shape![2, 2]);
        assert_eq!(v.to_vec(), vec![5, 4, 2, 1]);

        let empty = dynamic_view(&a, &s![range(2..1)]).unwrap();
        assert_eq!(empty.shape(), &shape![0, 3]);
        assert_eq!(empty.offset(), 0);
        assert!(empty.to_vec().is_empty());
    }

    #[test]
    fn test_inclusive_ranges() {
        let a = Array::<i32>::arange(shape![4]);
        let reversed = dynamic_view(&a, &s![range(3..=0).step(-1)]).unwrap();
        assert_eq!(reversed.to_vec(), vec![3, 2, 1, 0]);

        let whole = dynamic_view(&a, &s![0..=-1]).unwrap();
        assert_eq!(whole.to_vec(), vec![0, 1, 2, 3]);

        let stepped = dynamic_view(&a, &s![range(0..=2).step(2)]).unwrap();
        assert_eq!(stepped.to_vec(), vec![0, 2]);

        let tail = dynamic_view(&a, &s![range(-1..=1).step(-2)]).unwrap();
        assert_eq!(tail.to_vec(), vec![3, 1]);
    }

    #[test]
    fn test_slice_errors() {
        let a = array();
        assert_eq!(
            dynamic_view(&a, &s![0, 0, 0]).unwrap_err(),
            ViewError::Slice(SliceError::TooManySlices { given: 3, rank: 2 })
        );
        assert!(dynamic_view(&a, &s![NewAxis, 0, NewAxis, 0, NewAxis]).is_ok());
        assert_eq!(
            dynamic_view(&a, &s![.., range(..).step(0)]).unwrap_err(),
            ViewError::Slice(SliceError::ZeroStep { axis: 1 })
        );
        assert_eq!(
            dynamic_view(&a, &s![-3]).unwrap_err(),
            ViewError::Slice(SliceError::IndexOutOfRange {
                index: -3,
                axis: 0,
                size: 2
            })
        );
    }

    #[test]
    fn test_view_of_view() {
        let a = Array::<u32>::arange(shape![4, 4]);
        let inner = dynamic_view(&a, &s![1..3, 1..3]).unwrap();
        let corner = dynamic_view(&inner, &s![1, range(..).step(-1)]).unwrap();
        assert_eq!(corner.offset(), 10);
        assert_eq!(corner.to_vec(), vec![10, 9]);
    }

    #[test]
    fn test_generator_source() {
        let g = Generator::new(shape![3, 4], |idx: &[usize]| (idx[0] * 4 + idx[1]) as f32);
        let v = dynamic_view(&g, &s![range(..).step(2), 3]).unwrap();
        assert!(!v.data_handle().is_buffer());
        assert_eq!(v.to_vec(), vec![3.0, 11.0]);
    }
}
