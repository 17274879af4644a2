use std::iter::FusedIterator;

use parking_lot::RwLockReadGuard;

use crate::{rvec, DataHandle, Expression, Layout, RVec, Shape, StridedView};

/// A cursor into the data of a [`StridedView`].
///
/// The stepper moves along the axes of an iteration shape which may have more leading axes
/// than the view. Steps along those leading axes, and along view axes of extent 1, do not
/// move the cursor.
pub struct Stepper<'v, 'a, E: Expression> {
    view: &'v StridedView<'a, E>,
    position: isize,
    offset: usize,
}

impl<'v, 'a, E: Expression> Stepper<'v, 'a, E> {
    pub(crate) fn new(view: &'v StridedView<'a, E>, position: isize, offset: usize) -> Self {
        Self {
            view,
            position,
            offset,
        }
    }

    /// View axis driven by iteration axis `dim`, if any.
    #[inline]
    fn axis(&self, dim: usize) -> Option<usize> {
        dim.checked_sub(self.offset)
    }

    #[inline]
    fn stride(&self, dim: usize) -> isize {
        match self.axis(dim) {
            Some(axis) if self.view.shape()[axis] != 1 => self.view.strides()[axis],
            _ => 0,
        }
    }

    #[inline]
    fn backstride(&self, dim: usize) -> isize {
        self.axis(dim).map_or(0, |axis| self.view.backstrides()[axis])
    }

    pub fn step(&mut self, dim: usize) {
        self.position += self.stride(dim);
    }

    pub fn step_back(&mut self, dim: usize) {
        self.position -= self.stride(dim);
    }

    pub fn step_by(&mut self, dim: usize, n: usize) {
        self.position += self.stride(dim) * n as isize;
    }

    /// Rewinds axis `dim` from its last index to its first.
    pub fn reset(&mut self, dim: usize) {
        self.position -= self.backstride(dim);
    }

    /// Moves axis `dim` from its first index to its last.
    pub fn reset_back(&mut self, dim: usize) {
        self.position += self.backstride(dim);
    }

    pub fn to_begin(&mut self) {
        self.position = self.view.offset() as isize;
    }

    pub fn to_end(&mut self, layout: Layout) {
        self.position = self.view.data_end(layout);
    }

    pub fn position(&self) -> isize {
        self.position
    }

    /// Element under the cursor.
    pub fn value(&self) -> E::Elem {
        self.view.data_at(self.position as usize)
    }
}

impl<'v, 'a, E: Expression> PartialEq for Stepper<'v, 'a, E> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.view, other.view) && self.position == other.position
    }
}

impl<'v, 'a, E: Expression> std::fmt::Debug for Stepper<'v, 'a, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stepper")
            .field("position", &self.position)
            .field("offset", &self.offset)
            .finish()
    }
}

/// Row-major walk over the data positions of a [`StridedView`], possibly broadcast to a
/// larger shape. Takes no lock on the underlying buffer.
pub(crate) struct Positions<'v, 'a, E: Expression> {
    stepper: Stepper<'v, 'a, E>,
    shape: Shape,
    index: RVec<usize>,
    remaining: usize,
}

impl<'v, 'a, E: Expression> Positions<'v, 'a, E> {
    pub(crate) fn new(stepper: Stepper<'v, 'a, E>, shape: Shape) -> Self {
        let index = rvec![0; shape.rank()];
        let remaining = shape.numel();
        Self {
            stepper,
            shape,
            index,
            remaining,
        }
    }

    /// Multi-index of the next position.
    pub(crate) fn index(&self) -> &[usize] {
        &self.index
    }

    fn advance(&mut self) {
        for dim in (0..self.shape.rank()).rev() {
            if self.index[dim] + 1 < self.shape[dim] {
                self.index[dim] += 1;
                self.stepper.step(dim);
                return;
            }
            self.index[dim] = 0;
            self.stepper.reset(dim);
        }
    }
}

impl<'v, 'a, E: Expression> Iterator for Positions<'v, 'a, E> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        let position = self.stepper.position() as usize;
        self.remaining -= 1;
        if self.remaining > 0 {
            self.advance();
        }
        Some(position)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'v, 'a, E: Expression> ExactSizeIterator for Positions<'v, 'a, E> {}

/// Row-major iterator over a [`StridedView`], possibly broadcast to a larger shape.
///
/// For a buffer-backed view the iterator holds a read lock on the buffer until it is
/// dropped. Writing to the same buffer meanwhile blocks.
pub struct Iter<'v, 'a, E: Expression> {
    positions: Positions<'v, 'a, E>,
    data: Option<RwLockReadGuard<'v, Vec<E::Elem>>>,
}

impl<'v, 'a, E: Expression> Iter<'v, 'a, E> {
    pub(crate) fn new(positions: Positions<'v, 'a, E>) -> Self {
        let view = positions.stepper.view;
        let data = match view.data_handle() {
            DataHandle::Buffer { storage, .. } => Some(storage.read()),
            DataHandle::Adaptor(_) => None,
        };
        Self { positions, data }
    }

    /// Multi-index of the next element.
    pub fn index(&self) -> &[usize] {
        self.positions.index()
    }
}

impl<'v, 'a, E: Expression> Iterator for Iter<'v, 'a, E> {
    type Item = E::Elem;

    fn next(&mut self) -> Option<E::Elem> {
        let position = self.positions.next()?;
        Some(match &self.data {
            Some(data) => data[position],
            None => self.positions.stepper.view.data_at(position),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.positions.size_hint()
    }
}

impl<'v, 'a, E: Expression> ExactSizeIterator for Iter<'v, 'a, E> {}

impl<'v, 'a, E: Expression> FusedIterator for Iter<'v, 'a, E> {}

#[cfg(test)]
mod tests {
    use crate::{
        dynamic_view, s, shape, strided_view, transpose, Array, Generator, Layout, Strides,
    };

    #[test]
    fn test_step_and_reset() {
        let a = Array::<i32>::arange(shape![2, 3]);
        let v = strided_view(&a, shape![2, 3], Strides::from([3, 1]), 0, Layout::RowMajor).unwrap();
        let mut s = v.stepper_begin(v.shape());
        s.step(1);
        s.step(1);
        assert_eq!(s.value(), 2);
        s.reset(1);
        assert_eq!(s.position(), 0);
        s.step(0);
        s.reset_back(1);
        assert_eq!(s.value(), 5);
        s.step_back(1);
        assert_eq!(s.value(), 4);
        s.to_begin();
        s.step_by(1, 2);
        assert_eq!(s.value(), 2);
    }

    #[test]
    fn test_leading_axes_do_not_move() {
        let a = Array::<i32>::arange(shape![3]);
        let v = strided_view(&a, shape![3], Strides::from([1]), 0, Layout::RowMajor).unwrap();
        let mut s = v.stepper_begin(&shape![4, 2, 3]);
        s.step(0);
        s.step(1);
        s.reset(0);
        assert_eq!(s.position(), 0);
        s.step(2);
        assert_eq!(s.value(), 1);
    }

    #[test]
    fn test_end() {
        let a = Array::<i32>::arange(shape![2, 3]);
        let v = strided_view(&a, shape![3, 2], Strides::from([1, 3]), 0, Layout::ColumnMajor)
            .unwrap();
        let end = v.stepper_end(v.shape(), Layout::ColumnMajor);
        assert_eq!(end.position(), 6);
        let mut s = v.stepper_begin(v.shape());
        s.to_end(Layout::ColumnMajor);
        assert!(s == end);
        let row_end = v.stepper_end(v.shape(), Layout::RowMajor);
        assert_eq!(row_end.position(), 2 + 3 + 3);
    }

    #[test]
    fn test_iter_broadcast() {
        let a = Array::from_data([1, 2, 3], shape![1, 3]).unwrap();
        let v = strided_view(&a, shape![1, 3], Strides::from([3, 1]), 0, Layout::RowMajor).unwrap();
        let it = v.iter_broadcast(&shape![2, 2, 3]).unwrap();
        assert_eq!(it.len(), 12);
        assert_eq!(
            it.collect::<Vec<_>>(),
            vec![1, 2, 3, 1, 2, 3, 1, 2, 3, 1, 2, 3]
        );
        assert!(v.iter_broadcast(&shape![2, 2]).is_err());
    }

    #[test]
    fn test_iter_empty_and_scalar() {
        let a = Array::<u32>::arange(shape![4]);
        let empty = strided_view(&a, shape![0, 2], Strides::from([2, 1]), 0, Layout::RowMajor)
            .unwrap();
        assert_eq!(empty.iter().count(), 0);
        let scalar = strided_view(&a, shape![], Strides::from([]), 3, Layout::RowMajor).unwrap();
        assert_eq!(scalar.to_vec(), vec![3]);
    }

    #[test]
    fn test_iter_index_tracks_elements() {
        let a = Array::<i32>::arange(shape![2, 3]);
        let t = transpose(&a);
        let mut it = t.iter();
        assert_eq!(it.index(), &[0, 0]);
        assert_eq!(it.next(), Some(0));
        assert_eq!(it.index(), &[0, 1]);
        assert_eq!(it.next(), Some(3));
        assert_eq!(it.index(), &[1, 0]);
        assert_eq!(it.len(), 4);
    }

    #[test]
    fn test_positions_take_no_lock() {
        let a = Array::<i32>::arange(shape![2, 3]);
        let v = dynamic_view(&a, &s![.., 1..]).unwrap();
        let positions = v.positions(v.shape()).collect::<Vec<_>>();
        assert_eq!(positions, vec![1, 2, 4, 5]);
        let mut positions = v.positions(v.shape());
        positions.next();
        a.set(&[0, 0], 10).unwrap();
        assert_eq!(positions.next(), Some(2));
    }

    #[test]
    fn test_iter_holds_one_read_lock() {
        let a = Array::<i32>::arange(shape![2, 3]);
        let t = transpose(&a);
        let it = t.iter();
        assert!(a.storage().is_locked());
        drop(it);
        assert!(!a.storage().is_locked());

        let g = Generator::new(shape![2, 2], |idx: &[usize]| (idx[0] * 2 + idx[1]) as i32);
        assert_eq!(transpose(&g).iter().collect::<Vec<_>>(), vec![0, 2, 1, 3]);
    }
}
