use crate::Shape;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransposeError {
    #[error("Permutation does not have the same size as shape, {actual} != {expected}.")]
    SizeMismatch { expected: usize, actual: usize },
    #[error("Permutation contains wrong axis {axis} for rank {rank}.")]
    InvalidAxis { axis: usize, rank: usize },
    #[error("Permutation contains axis {0} more than once.")]
    DuplicateAxis(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SliceError {
    #[error("{given} slices address more axes than the source rank {rank}.")]
    TooManySlices { given: usize, rank: usize },
    #[error("Index {index} is out of range for axis {axis} of size {size}.")]
    IndexOutOfRange { index: isize, axis: usize, size: usize },
    #[error("Slice step cannot be zero (axis {axis}).")]
    ZeroStep { axis: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViewError {
    #[error("Index {index:?} is out of range for shape {shape:?}.")]
    OutOfRange { index: Vec<usize>, shape: Shape },
    #[error("Cannot broadcast shape {src:?} to {dst:?}.")]
    ShapeMismatch { src: Shape, dst: Shape },
    #[error("Rank mismatch, shape has {shape} axes but strides have {strides}.")]
    RankMismatch { shape: usize, strides: usize },
    #[error("View addresses [{min}, {max}] outside of a buffer of {len} elements.")]
    OutOfBounds { min: isize, max: isize, len: usize },
    #[error("View is backed by an expression without a writable buffer.")]
    ReadOnly,
    #[error(transparent)]
    Transpose(#[from] TransposeError),
    #[error(transparent)]
    Slice(#[from] SliceError),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArrayError {
    #[error("Cannot construct array with shape {shape:?} from {actual} elements.")]
    ElementCount { shape: Shape, actual: usize },
    #[error("Cannot reinterpret {0} bytes as whole elements.")]
    ByteCount(usize),
}
