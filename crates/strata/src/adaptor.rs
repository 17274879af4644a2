use crate::{compute_size, compute_strides, unravel_index, Closure, Expression, Layout, Strides};

/// Flat, indexable access to an expression that has no raw buffer.
///
/// Flat positions follow the row-major order of the wrapped expression; each access is turned
/// back into a multi-index and forwarded to [`Expression::element`].
pub struct ExpressionAdaptor<'a, E: Expression> {
    expr: Closure<'a, E>,
    strides: Strides,
    size: usize,
}

impl<'a, E: Expression> ExpressionAdaptor<'a, E> {
    pub fn new(expr: impl Into<Closure<'a, E>>) -> Self {
        let expr = expr.into();
        let strides = compute_strides(expr.shape(), Layout::RowMajor);
        let size = compute_size(expr.shape());
        Self {
            expr,
            strides,
            size,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn strides(&self) -> &Strides {
        &self.strides
    }

    pub fn expression(&self) -> &E {
        &self.expr
    }

    /// Element at flat position `i`, `0 <= i < size()`.
    ///
    /// Positions past the end are not checked in release builds.
    #[inline]
    pub fn at_flat(&self, i: usize) -> E::Elem {
        debug_assert!(i < self.size, "flat index {} out of {}", i, self.size);
        let index = unravel_index(i, &self.strides);
        self.expr.element(&index)
    }
}

impl<'a, E: Expression> std::fmt::Debug for ExpressionAdaptor<'a, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpressionAdaptor")
            .field("shape", self.expr.shape())
            .field("strides", &self.strides)
            .field("size", &self.size)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::ExpressionAdaptor;
    use crate::{shape, Generator};

    #[test]
    fn test_at_flat_row_major() {
        let g = Generator::new(shape![2, 3, 4], |idx: &[usize]| {
            (idx[0] * 100 + idx[1] * 10 + idx[2]) as i32
        });
        let adaptor = ExpressionAdaptor::new(&g);
        assert_eq!(adaptor.size(), 24);
        assert_eq!(adaptor.strides().to_vec(), vec![12, 4, 1]);
        assert_eq!(adaptor.at_flat(0), 0);
        assert_eq!(adaptor.at_flat(5), 11);
        assert_eq!(adaptor.at_flat(23), 123);
    }

    #[test]
    fn test_scalar_expression() {
        let g = Generator::new(shape![], |_: &[usize]| 7u32);
        let adaptor = ExpressionAdaptor::new(&g);
        assert_eq!(adaptor.size(), 1);
        assert_eq!(adaptor.at_flat(0), 7);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic]
    fn test_past_the_end_asserts_in_debug() {
        let g = Generator::new(shape![2], |idx: &[usize]| idx[0] as f32);
        let adaptor = ExpressionAdaptor::new(&g);
        adaptor.at_flat(2);
    }
}
