use crate::{shape, RVec};

#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Shape(RVec<usize>);

impl Shape {
    pub fn new(shape: RVec<usize>) -> Self {
        Self(shape)
    }

    /// Number of elements. The empty (rank 0) shape describes a single element.
    pub fn numel(&self) -> usize {
        self.0.iter().product()
    }

    pub fn to_vec(&self) -> Vec<usize> {
        self.0.to_vec()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &usize> + ExactSizeIterator {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn rank(&self) -> usize {
        self.len()
    }

    pub fn push(&mut self, dim: usize) {
        self.0.push(dim);
    }

    /// Reversed axis order.
    pub fn reversed(&self) -> Self {
        Shape(self.0.iter().rev().copied().collect())
    }

    /// Shape obtained by taking axis `permutation[i]` as axis `i`.
    ///
    /// Every entry of `permutation` must be a valid axis.
    pub fn permuted(&self, permutation: &[usize]) -> Self {
        Shape(permutation.iter().map(|&p| self.0[p]).collect())
    }

    /// Whether `self` can be broadcast to `target` without changing `target`.
    pub fn broadcasts_to(&self, target: &Shape) -> bool {
        Shape::multi_broadcast(&[self, target]).as_ref() == Some(target)
    }

    pub fn multi_broadcast(shapes: &[&Shape]) -> Option<Shape> {
        let max_rank = shapes.iter().map(|shape| shape.rank()).max()?;
        let mut shape: Shape = shape![];
        for i in 0..max_rank {
            let mut current_dim_size = 1;
            for shape in shapes {
                let len = shape.rank();
                let dim = if i < len { &shape[len - i - 1] } else { &1 };
                if dim != &1 {
                    if current_dim_size != 1 && dim != &current_dim_size {
                        return None;
                    }
                    current_dim_size = *dim;
                }
            }
            shape.0.insert(0, current_dim_size)
        }
        Some(shape)
    }
}

impl std::fmt::Debug for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut shape = format!("[{}", self.0.first().unwrap_or(&0));
        for dim in self.0.iter().skip(1) {
            shape.push_str(&format!("x{}", dim));
        }
        write!(f, "{}]", shape)
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl AsRef<[usize]> for Shape {
    fn as_ref(&self) -> &[usize] {
        &self.0
    }
}

impl std::ops::Index<usize> for Shape {
    type Output = usize;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl From<Vec<usize>> for Shape {
    fn from(shape: Vec<usize>) -> Self {
        Self(shape.into())
    }
}

impl From<&[usize]> for Shape {
    fn from(slice: &[usize]) -> Self {
        Shape(slice.into())
    }
}

impl<const N: usize> From<[usize; N]> for Shape {
    fn from(shape: [usize; N]) -> Self {
        Shape(shape.iter().copied().collect())
    }
}

impl FromIterator<usize> for Shape {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Shape(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use crate::{shape, Shape};
    use proptest::prelude::*;
    use proptest::strategy::{BoxedStrategy, Strategy};
    use std::ops::RangeInclusive;

    impl Arbitrary for Shape {
        type Parameters = Vec<RangeInclusive<usize>>;
        type Strategy = BoxedStrategy<Self>;

        fn arbitrary_with(args: Self::Parameters) -> Self::Strategy {
            args.prop_map(Into::<Shape>::into).boxed()
        }
    }

    #[test]
    fn test_multi_broadcast() {
        let a = shape![4, 1, 3];
        let b = shape![5, 1];
        assert_eq!(Shape::multi_broadcast(&[&a, &b]), Some(shape![4, 5, 3]));
        assert_eq!(Shape::multi_broadcast(&[&a, &shape![2]]), None);
    }

    #[test]
    fn test_broadcasts_to() {
        assert!(shape![3].broadcasts_to(&shape![2, 3]));
        assert!(shape![1, 3].broadcasts_to(&shape![2, 3]));
        assert!(shape![].broadcasts_to(&shape![2, 3]));
        assert!(!shape![2, 3].broadcasts_to(&shape![3]));
        assert!(!shape![2, 1].broadcasts_to(&shape![2, 3, 4]));
    }

    #[test]
    fn test_permuted() {
        let shape = shape![2, 3, 4];
        assert_eq!(shape.permuted(&[2, 0, 1]), shape![4, 2, 3]);
        assert_eq!(shape.reversed(), shape![4, 3, 2]);
    }

    #[test]
    fn test_scalar_numel() {
        assert_eq!(shape![].numel(), 1);
        assert_eq!(shape![2, 0, 3].numel(), 0);
    }

    proptest! {
        #[test]
        fn test_arbitrary_shape_rank(shape in Shape::arbitrary_with(vec![1..=4, 1..=4, 1..=8])) {
            prop_assert_eq!(shape.rank(), 3);
            prop_assert!(shape.numel() >= 1);
        }
    }
}
