use std::ops::Deref;
use std::sync::Arc;

use crate::{Element, Layout, Shape, Storage, Strides};

/// An N-dimensional source of elements that views can be built over.
///
/// Every expression can be read element by element through [`Expression::element`].
/// Expressions backed by a strided buffer additionally expose it through
/// [`Expression::raw_data`], which lets views alias the buffer instead of going through an
/// [`ExpressionAdaptor`](crate::ExpressionAdaptor).
pub trait Expression {
    type Elem: Element;

    fn shape(&self) -> &Shape;

    /// Element at `index`.
    ///
    /// `index` must hold at least `dimension()` valid coordinates; extra leading coordinates
    /// are ignored.
    fn element(&self, index: &[usize]) -> Self::Elem;

    fn layout(&self) -> Layout {
        Layout::Dynamic
    }

    /// The raw buffer behind this expression, if there is one.
    fn raw_data(&self) -> Option<RawData<'_, Self::Elem>> {
        None
    }

    fn dimension(&self) -> usize {
        self.shape().rank()
    }

    fn size(&self) -> usize {
        self.shape().numel()
    }
}

/// Raw buffer access of an [`Expression`]: the storage, the strides the expression uses to
/// address it, and the position of its first element.
#[derive(derive_new::new, Debug)]
pub struct RawData<'s, T> {
    storage: &'s Storage<T>,
    strides: &'s Strides,
    offset: usize,
}

impl<'s, T> RawData<'s, T> {
    pub fn storage(&self) -> &'s Storage<T> {
        self.storage
    }

    pub fn strides(&self) -> &'s Strides {
        self.strides
    }

    pub fn offset(&self) -> usize {
        self.offset
    }
}

/// How a view holds on to the expression it was built from.
///
/// A view that borrows its source cannot outlive it. Views built from temporaries must take
/// ownership (`Closure::Owned`) or share it (`Closure::Shared`).
///
/// `&E` and `Arc<E>` convert into a `Closure` implicitly, so builders can be called as
/// `transpose(&a)` or `transpose(Arc::new(a))`.
pub enum Closure<'a, E> {
    Borrowed(&'a E),
    Owned(E),
    Shared(Arc<E>),
}

impl<'a, E> Deref for Closure<'a, E> {
    type Target = E;

    fn deref(&self) -> &Self::Target {
        match self {
            Closure::Borrowed(e) => *e,
            Closure::Owned(e) => e,
            Closure::Shared(e) => e.as_ref(),
        }
    }
}

impl<'a, E> From<&'a E> for Closure<'a, E> {
    fn from(e: &'a E) -> Self {
        Closure::Borrowed(e)
    }
}

impl<'a, E> From<Arc<E>> for Closure<'a, E> {
    fn from(e: Arc<E>) -> Self {
        Closure::Shared(e)
    }
}

impl<'a, E: Clone> Clone for Closure<'a, E> {
    fn clone(&self) -> Self {
        match self {
            Closure::Borrowed(e) => Closure::Borrowed(*e),
            Closure::Owned(e) => Closure::Owned(e.clone()),
            Closure::Shared(e) => Closure::Shared(e.clone()),
        }
    }
}

impl<'a, E: std::fmt::Debug> std::fmt::Debug for Closure<'a, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Closure::Borrowed(e) => f.debug_tuple("Borrowed").field(e).finish(),
            Closure::Owned(e) => f.debug_tuple("Owned").field(e).finish(),
            Closure::Shared(e) => f.debug_tuple("Shared").field(e).finish(),
        }
    }
}
