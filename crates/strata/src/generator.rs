use std::marker::PhantomData;

use crate::{Closure, Element, Enforcer, Expression, RVec, Shape, ViewError};

/// An expression whose elements are computed from their index on every access.
///
/// It has no buffer, so views over it read through an
/// [`ExpressionAdaptor`](crate::ExpressionAdaptor) and cannot be assigned to.
pub struct Generator<T, F> {
    shape: Shape,
    f: F,
    _marker: PhantomData<T>,
}

impl<T, F> Generator<T, F>
where
    T: Element,
    F: Fn(&[usize]) -> T,
{
    pub fn new(shape: Shape, f: F) -> Self {
        Self {
            shape,
            f,
            _marker: PhantomData,
        }
    }
}

impl<T, F> Expression for Generator<T, F>
where
    T: Element,
    F: Fn(&[usize]) -> T,
{
    type Elem = T;

    fn shape(&self) -> &Shape {
        &self.shape
    }

    fn element(&self, index: &[usize]) -> T {
        let skip = index.len().saturating_sub(self.shape.rank());
        (self.f)(&index[skip..])
    }
}

impl<T, F> std::fmt::Debug for Generator<T, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Generator")
            .field("shape", &self.shape)
            .finish()
    }
}

/// Lazily broadcasts an expression to a larger shape.
///
/// Leading axes are added and axes of extent 1 are repeated, following the usual
/// broadcasting rules. No element is copied.
pub struct Broadcast<'e, E: Expression> {
    src: Closure<'e, E>,
    shape: Shape,
}

impl<'e, E: Expression> Broadcast<'e, E> {
    pub fn new(src: impl Into<Closure<'e, E>>, to: Shape) -> Result<Self, ViewError> {
        let src = src.into();
        Enforcer::check_broadcast(src.shape(), &to)?;
        Ok(Self { src, shape: to })
    }
}

impl<'e, E: Expression> std::fmt::Debug for Broadcast<'e, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Broadcast")
            .field("src", self.src.shape())
            .field("shape", &self.shape)
            .finish()
    }
}

impl<'e, E: Expression> Expression for Broadcast<'e, E> {
    type Elem = E::Elem;

    fn shape(&self) -> &Shape {
        &self.shape
    }

    fn element(&self, index: &[usize]) -> E::Elem {
        let src_shape = self.src.shape();
        let skip = index.len().saturating_sub(src_shape.rank());
        let src_index: RVec<usize> = index[skip..]
            .iter()
            .zip(src_shape.iter())
            .map(|(&i, &dim)| if dim == 1 { 0 } else { i })
            .collect();
        self.src.element(&src_index)
    }
}
