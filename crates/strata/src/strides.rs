use crate::{Layout, RVec, Shape};

/// Signed per-axis element steps.
///
/// A stride of 0 is valid and repeats the same element along an axis (broadcast and new axes).
#[derive(Clone, PartialEq, Eq, Default, Hash)]
pub struct Strides(RVec<isize>);

impl Strides {
    pub fn new(strides: RVec<isize>) -> Self {
        Self(strides)
    }

    pub fn to_vec(&self) -> Vec<isize> {
        self.0.to_vec()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &isize> + ExactSizeIterator {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn rank(&self) -> usize {
        self.len()
    }

    pub fn push(&mut self, stride: isize) {
        self.0.push(stride);
    }

    pub fn reversed(&self) -> Self {
        Self(self.0.iter().rev().copied().collect())
    }

    pub fn permuted(&self, permutation: &[usize]) -> Self {
        Self(permutation.iter().map(|&p| self.0[p]).collect())
    }

    /// Canonical contiguous strides of `shape` for `layout`.
    ///
    /// `Layout::Dynamic` carries no stride order of its own and yields row-major strides.
    pub fn contiguous(shape: &Shape, layout: Layout) -> Self {
        let mut strides: RVec<isize> = smallvec::smallvec![0; shape.rank()];
        let mut stride = 1isize;
        match layout {
            Layout::ColumnMajor => {
                for (i, &size) in shape.iter().enumerate() {
                    strides[i] = stride;
                    stride *= size as isize;
                }
            }
            Layout::RowMajor | Layout::Dynamic => {
                for (i, &size) in shape.iter().enumerate().rev() {
                    strides[i] = stride;
                    stride *= size as isize;
                }
            }
        }
        Self(strides)
    }

    /// `strides[i] * (shape[i] - 1)` per axis, 0 for empty axes.
    pub fn backstrides(&self, shape: &Shape) -> Strides {
        debug_assert_eq!(self.rank(), shape.rank());
        self.0
            .iter()
            .zip(shape.iter())
            .map(|(&stride, &size)| stride * size.saturating_sub(1) as isize)
            .collect()
    }
}

impl std::fmt::Debug for Strides {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut shape = format!("[{}", self.0.first().unwrap_or(&0));
        for dim in self.0.iter().skip(1) {
            shape.push_str(&format!("x{}", dim));
        }
        write!(f, "{}]", shape)
    }
}

impl AsRef<[isize]> for Strides {
    fn as_ref(&self) -> &[isize] {
        &self.0
    }
}

impl std::ops::Index<usize> for Strides {
    type Output = isize;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl From<Vec<isize>> for Strides {
    fn from(strides: Vec<isize>) -> Self {
        Self(strides.into())
    }
}

impl<const N: usize> From<[isize; N]> for Strides {
    fn from(strides: [isize; N]) -> Self {
        Self(strides.iter().copied().collect())
    }
}

impl FromIterator<isize> for Strides {
    fn from_iter<I: IntoIterator<Item = isize>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
