//! Strided views.
mod assign;
mod stepper;

pub(crate) use stepper::Positions;
pub use stepper::{Iter, Stepper};

use crate::{
    compute_size, element_offset, unravel_index, Array, Closure, Enforcer, Expression,
    ExpressionAdaptor, Layout, RVec, RawData, Shape, Storage, Strides, ViewError,
};

/// Where a view reads its elements from.
pub enum DataHandle<'a, E: Expression> {
    /// The source's own buffer, aliased.
    Buffer {
        source: Closure<'a, E>,
        storage: Storage<E::Elem>,
    },
    /// A flat adaptor over a source without a raw buffer.
    Adaptor(ExpressionAdaptor<'a, E>),
}

impl<'a, E: Expression> DataHandle<'a, E> {
    pub fn expression(&self) -> &E {
        match self {
            DataHandle::Buffer { source, .. } => &**source,
            DataHandle::Adaptor(adaptor) => adaptor.expression(),
        }
    }

    /// Number of addressable positions.
    pub fn len(&self) -> usize {
        match self {
            DataHandle::Buffer { storage, .. } => storage.len(),
            DataHandle::Adaptor(adaptor) => adaptor.size(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_buffer(&self) -> bool {
        matches!(self, DataHandle::Buffer { .. })
    }

    #[inline]
    fn get(&self, position: usize) -> E::Elem {
        match self {
            DataHandle::Buffer { storage, .. } => storage.get(position),
            DataHandle::Adaptor(adaptor) => adaptor.at_flat(position),
        }
    }
}

/// A data handle for `source`, together with the strides, offset and layout that address the
/// source's elements through it.
pub(crate) struct Baseline<'a, E: Expression> {
    pub(crate) handle: DataHandle<'a, E>,
    pub(crate) strides: Strides,
    pub(crate) offset: usize,
    pub(crate) layout: Layout,
}

impl<'a, E: Expression> Baseline<'a, E> {
    pub(crate) fn of(source: Closure<'a, E>) -> Self {
        let raw = source
            .raw_data()
            .map(|raw| (raw.storage().clone(), raw.strides().clone(), raw.offset()));
        match raw {
            Some((storage, strides, offset)) => {
                let layout = source.layout();
                Self {
                    handle: DataHandle::Buffer { source, storage },
                    strides,
                    offset,
                    layout,
                }
            }
            None => {
                log::debug!(
                    "Source of shape {:?} has no raw buffer, reading through an adaptor",
                    source.shape()
                );
                let adaptor = ExpressionAdaptor::new(source);
                let strides = adaptor.strides().clone();
                Self {
                    handle: DataHandle::Adaptor(adaptor),
                    strides,
                    offset: 0,
                    layout: Layout::RowMajor,
                }
            }
        }
    }
}

/// A view of an expression through its own shape, strides and offset.
///
/// The view never copies elements: reads and writes go to the source's buffer, or through an
/// [`ExpressionAdaptor`] for sources without one. Its geometry is fixed at construction.
///
/// See [`strided_view`], [`transpose`](crate::transpose) and
/// [`dynamic_view`](crate::dynamic_view) for the ways to build one.
pub struct StridedView<'a, E: Expression> {
    handle: DataHandle<'a, E>,
    shape: Shape,
    strides: Strides,
    backstrides: Strides,
    offset: usize,
    layout: Layout,
}

impl<'a, E: Expression> StridedView<'a, E> {
    /// Creates a view over `handle`, checking that every addressed position exists.
    pub fn new(
        handle: DataHandle<'a, E>,
        shape: Shape,
        strides: Strides,
        offset: usize,
        layout: Layout,
    ) -> Result<Self, ViewError> {
        Enforcer::check_bounds(handle.len(), &shape, &strides, offset)?;
        Ok(Self::new_unchecked(handle, shape, strides, offset, layout))
    }

    pub(crate) fn new_unchecked(
        handle: DataHandle<'a, E>,
        shape: Shape,
        strides: Strides,
        offset: usize,
        layout: Layout,
    ) -> Self {
        debug_assert_eq!(shape.rank(), strides.rank());
        let backstrides = strides.backstrides(&shape);
        log::trace!(
            "View shape={:?} strides={:?} offset={} layout={}",
            shape,
            strides,
            offset,
            layout
        );
        Self {
            handle,
            shape,
            strides,
            backstrides,
            offset,
            layout,
        }
    }

    pub fn size(&self) -> usize {
        compute_size(&self.shape)
    }

    pub fn dimension(&self) -> usize {
        self.shape.rank()
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn strides(&self) -> &Strides {
        &self.strides
    }

    pub fn backstrides(&self) -> &Strides {
        &self.backstrides
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Position of the view origin in its data handle.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn data_handle(&self) -> &DataHandle<'a, E> {
        &self.handle
    }

    /// The expression this view was built from.
    pub fn expression(&self) -> &E {
        self.handle.expression()
    }

    #[inline]
    pub(crate) fn data_at(&self, position: usize) -> E::Elem {
        self.handle.get(position)
    }

    #[inline]
    fn position_of(&self, index: &[usize]) -> usize {
        (self.offset as isize + element_offset(self.strides.as_ref(), index)) as usize
    }

    /// Element at `index` without bounds checking.
    ///
    /// At least `dimension()` indices must be given; extra leading ones are ignored. Indices
    /// are only validated in debug builds. An out of range index reads an unrelated element
    /// of the source or panics, it never reads outside the source's buffer.
    #[inline]
    pub fn element(&self, index: &[usize]) -> E::Elem {
        debug_assert!(
            Enforcer::check_index(&self.shape, index).is_ok(),
            "index {:?} out of range for shape {:?}",
            index,
            self.shape
        );
        self.data_at(self.position_of(index))
    }

    /// Element at `index` after checking it against the shape.
    pub fn at(&self, index: &[usize]) -> Result<E::Elem, ViewError> {
        Enforcer::check_index(&self.shape, index)?;
        Ok(self.data_at(self.position_of(index)))
    }

    /// Element at the view origin.
    pub fn first(&self) -> E::Elem {
        self.data_at(self.offset)
    }

    /// The `i`-th element in row-major order.
    pub fn flat(&self, i: usize) -> E::Elem {
        let row_major = Strides::contiguous(&self.shape, Layout::RowMajor);
        self.element(&unravel_index(i, &row_major))
    }

    /// Element at the index produced by `index`.
    pub fn element_from<I: IntoIterator<Item = usize>>(&self, index: I) -> E::Elem {
        let index: RVec<usize> = index.into_iter().collect();
        self.element(&index)
    }

    /// Broadcasts the view's shape into `shape`.
    ///
    /// Returns whether the broadcast is trivial, i.e. `shape` already equals the view's shape.
    pub fn broadcast_shape(&self, shape: &mut Shape) -> Result<bool, ViewError> {
        let merged = Shape::multi_broadcast(&[&self.shape, &*shape]).ok_or_else(|| {
            ViewError::ShapeMismatch {
                src: self.shape.clone(),
                dst: shape.clone(),
            }
        })?;
        let trivial = merged == self.shape && *shape == self.shape;
        *shape = merged;
        Ok(trivial)
    }

    /// Whether `strides` match the view's strides, so that the view can be traversed in
    /// lockstep with an operand using them.
    pub fn is_trivial_broadcast(&self, strides: impl AsRef<[isize]>) -> bool {
        strides.as_ref() == self.strides.as_ref()
    }

    /// One past the last position reached when traversing the view in `layout` order.
    pub fn data_end(&self, layout: Layout) -> isize {
        let offset = self.offset as isize;
        if self.dimension() == 0 {
            return offset + 1;
        }
        if self.layout.is_contiguous() && self.layout == layout {
            return offset + self.size() as isize;
        }
        let fastest = match layout {
            Layout::ColumnMajor => self.strides[0],
            Layout::RowMajor | Layout::Dynamic => self.strides[self.dimension() - 1],
        };
        offset + self.backstrides.iter().sum::<isize>() + fastest
    }

    /// Stepper at the view origin for iteration over `shape`.
    ///
    /// `shape` may have more axes than the view; the leading ones are treated as broadcast.
    pub fn stepper_begin(&self, shape: &Shape) -> Stepper<'_, 'a, E> {
        let offset = shape.rank().saturating_sub(self.dimension());
        Stepper::new(self, self.offset as isize, offset)
    }

    /// Stepper one past the end of a `layout` traversal over `shape`.
    pub fn stepper_end(&self, shape: &Shape, layout: Layout) -> Stepper<'_, 'a, E> {
        let offset = shape.rank().saturating_sub(self.dimension());
        Stepper::new(self, self.data_end(layout), offset)
    }

    /// Row-major iterator over the elements of the view.
    pub fn iter(&self) -> Iter<'_, 'a, E> {
        Iter::new(self.positions(&self.shape))
    }

    /// Row-major iterator over the view broadcast to `shape`.
    pub fn iter_broadcast(&self, shape: &Shape) -> Result<Iter<'_, 'a, E>, ViewError> {
        Enforcer::check_broadcast(&self.shape, shape)?;
        Ok(Iter::new(self.positions(shape)))
    }

    /// Data positions of the view broadcast to `shape`, in row-major order. `shape` must
    /// already be checked against the view's shape.
    pub(crate) fn positions(&self, shape: &Shape) -> Positions<'_, 'a, E> {
        Positions::new(self.stepper_begin(shape), shape.clone())
    }

    pub fn to_vec(&self) -> Vec<E::Elem> {
        self.iter().collect()
    }

    /// Copies the view into a new row-major array.
    pub fn to_array(&self) -> Array<E::Elem> {
        Array::new_unchecked(self.to_vec(), self.shape.clone(), Layout::RowMajor)
    }

    #[cfg(feature = "testing")]
    pub fn to_ndarray(&self) -> anyhow::Result<ndarray::ArrayD<E::Elem>> {
        self.to_array().to_ndarray()
    }
}

impl<'a, E: Expression> Expression for StridedView<'a, E> {
    type Elem = E::Elem;

    fn shape(&self) -> &Shape {
        &self.shape
    }

    #[inline]
    fn element(&self, index: &[usize]) -> E::Elem {
        StridedView::element(self, index)
    }

    fn layout(&self) -> Layout {
        self.layout
    }

    fn raw_data(&self) -> Option<RawData<'_, E::Elem>> {
        match &self.handle {
            DataHandle::Buffer { storage, .. } => {
                Some(RawData::new(storage, &self.strides, self.offset))
            }
            DataHandle::Adaptor(_) => None,
        }
    }
}

impl<'a, E: Expression> std::fmt::Debug for StridedView<'a, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let data = if self.handle.is_buffer() {
            "buffer"
        } else {
            "adaptor"
        };
        f.debug_struct("StridedView")
            .field("data", &data)
            .field("shape", &self.shape)
            .field("strides", &self.strides)
            .field("offset", &self.offset)
            .field("layout", &self.layout)
            .finish()
    }
}

/// Creates a view of `e` with the given geometry.
///
/// For sources with a raw buffer, `strides` and `offset` address that buffer directly. Other
/// sources are addressed through their row-major flat order. Fails if the shape and strides
/// disagree in rank or if any addressed position lies outside the data.
pub fn strided_view<'a, E: Expression>(
    e: impl Into<Closure<'a, E>>,
    shape: Shape,
    strides: Strides,
    offset: usize,
    layout: Layout,
) -> Result<StridedView<'a, E>, ViewError> {
    let Baseline { handle, .. } = Baseline::of(e.into());
    StridedView::new(handle, shape, strides, offset, layout)
}
