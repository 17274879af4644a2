use crate::{CheckPolicy, Shape, Strides, TransposeError, ViewError};

/// # Enforcer
///
/// Enforcer enforces common invariants on view geometry.
pub struct Enforcer;

impl Enforcer {
    pub fn check_rank(shape: &Shape, strides: &Strides) -> Result<(), ViewError> {
        if shape.rank() != strides.rank() {
            return Err(ViewError::RankMismatch {
                shape: shape.rank(),
                strides: strides.rank(),
            });
        }
        Ok(())
    }

    /// Every index must be inside its axis and at least `shape.rank()` indices must be given.
    /// Extra leading indices are accepted and ignored.
    pub fn check_index(shape: &Shape, index: &[usize]) -> Result<(), ViewError> {
        let out_of_range = || ViewError::OutOfRange {
            index: index.to_vec(),
            shape: shape.clone(),
        };
        if index.len() < shape.rank() {
            return Err(out_of_range());
        }
        let skip = index.len() - shape.rank();
        if index[skip..].iter().zip(shape.iter()).any(|(i, dim)| i >= dim) {
            return Err(out_of_range());
        }
        Ok(())
    }

    /// All positions reachable from `offset` must fall inside a buffer of `len` elements.
    pub fn check_bounds(
        len: usize,
        shape: &Shape,
        strides: &Strides,
        offset: usize,
    ) -> Result<(), ViewError> {
        Self::check_rank(shape, strides)?;
        if shape.numel() == 0 {
            return Ok(());
        }
        let (mut min, mut max) = (offset as isize, offset as isize);
        for (&stride, &dim) in strides.iter().zip(shape.iter()) {
            let end = stride * (dim as isize - 1);
            if end >= 0 {
                max += end;
            } else {
                min += end;
            }
        }
        if min < 0 || max >= len as isize {
            return Err(ViewError::OutOfBounds { min, max, len });
        }
        Ok(())
    }

    pub fn check_broadcast(src: &Shape, dst: &Shape) -> Result<(), ViewError> {
        if !src.broadcasts_to(dst) {
            return Err(ViewError::ShapeMismatch {
                src: src.clone(),
                dst: dst.clone(),
            });
        }
        Ok(())
    }

    pub fn check_permutation(
        rank: usize,
        permutation: &[usize],
        policy: CheckPolicy,
    ) -> Result<(), TransposeError> {
        if permutation.len() != rank {
            return Err(TransposeError::SizeMismatch {
                expected: rank,
                actual: permutation.len(),
            });
        }
        if let Some(&axis) = permutation.iter().find(|&&axis| axis >= rank) {
            return Err(TransposeError::InvalidAxis { axis, rank });
        }
        if policy == CheckPolicy::Full {
            let mut seen = vec![false; rank];
            for &axis in permutation {
                if seen[axis] {
                    return Err(TransposeError::DuplicateAxis(axis));
                }
                seen[axis] = true;
            }
        }
        Ok(())
    }
}
