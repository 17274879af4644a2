use std::ops::{Range, RangeFrom, RangeFull, RangeInclusive, RangeTo};

use crate::RVec;

/// Keeps an axis whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct All;

/// Inserts an axis of extent 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NewAxis;

/// A range with an optional step.
///
/// Bounds follow the Python conventions: negative values count from the end of the axis,
/// out-of-range bounds are clamped and a missing bound means "from the start" (or the end,
/// for negative steps). An `inclusive` range also selects the position `stop` resolves to,
/// whichever direction the step walks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SliceRange {
    pub start: Option<isize>,
    pub stop: Option<isize>,
    pub step: Option<isize>,
    pub inclusive: bool,
}

impl SliceRange {
    pub fn new(start: Option<isize>, stop: Option<isize>, step: Option<isize>) -> Self {
        Self {
            start,
            stop,
            step,
            inclusive: false,
        }
    }

    pub fn step(mut self, step: isize) -> Self {
        self.step = Some(step);
        self
    }
}

/// Starts a [`SliceRange`] from a Rust range, e.g. `range(1..).step(-1)`.
pub fn range(r: impl Into<SliceRange>) -> SliceRange {
    r.into()
}

/// One per-axis slice descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceSpec {
    /// Selects a single position and drops the axis.
    Index(isize),
    Range(SliceRange),
    All,
    NewAxis,
}

pub type SliceVec = RVec<SliceSpec>;

/// A range resolved against an axis: `len` positions starting at `start`, `step` apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedRange {
    pub start: usize,
    pub len: usize,
    pub step: isize,
}

/// Resolves `range` against an axis of `size` elements.
///
/// Returns `None` for a step of 0. Empty selections resolve to `start == 0, len == 0`.
pub fn resolve_range(range: &SliceRange, size: usize) -> Option<ResolvedRange> {
    let step = range.step.unwrap_or(1);
    if step == 0 {
        return None;
    }
    let size = size as isize;
    let normalize = |bound: isize| if bound < 0 { bound + size } else { bound };
    // one past the resolved stop, in the direction of the step
    let extra = range.inclusive as isize;
    let (start, stop) = if step > 0 {
        (
            range.start.map_or(0, |b| normalize(b).clamp(0, size)),
            range
                .stop
                .map_or(size, |b| (normalize(b) + extra).clamp(0, size)),
        )
    } else {
        (
            range
                .start
                .map_or(size - 1, |b| normalize(b).clamp(-1, size - 1)),
            range
                .stop
                .map_or(-1, |b| (normalize(b) - extra).clamp(-1, size - 1)),
        )
    };
    let len = if step > 0 && stop > start {
        (stop - start - 1) / step + 1
    } else if step < 0 && stop < start {
        (start - stop - 1) / -step + 1
    } else {
        0
    };
    if len == 0 {
        return Some(ResolvedRange {
            start: 0,
            len: 0,
            step,
        });
    }
    Some(ResolvedRange {
        start: start as usize,
        len: len as usize,
        step,
    })
}

impl From<All> for SliceSpec {
    fn from(_: All) -> Self {
        SliceSpec::All
    }
}

impl From<RangeFull> for SliceSpec {
    fn from(_: RangeFull) -> Self {
        SliceSpec::All
    }
}

impl From<NewAxis> for SliceSpec {
    fn from(_: NewAxis) -> Self {
        SliceSpec::NewAxis
    }
}

impl From<SliceRange> for SliceSpec {
    fn from(r: SliceRange) -> Self {
        SliceSpec::Range(r)
    }
}

impl From<RangeFull> for SliceRange {
    fn from(_: RangeFull) -> Self {
        SliceRange::default()
    }
}

macro_rules! impl_slice_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for SliceSpec {
                fn from(i: $t) -> Self {
                    SliceSpec::Index(i as isize)
                }
            }

            impl From<Range<$t>> for SliceRange {
                fn from(r: Range<$t>) -> Self {
                    SliceRange::new(Some(r.start as isize), Some(r.end as isize), None)
                }
            }

            impl From<RangeFrom<$t>> for SliceRange {
                fn from(r: RangeFrom<$t>) -> Self {
                    SliceRange::new(Some(r.start as isize), None, None)
                }
            }

            impl From<RangeTo<$t>> for SliceRange {
                fn from(r: RangeTo<$t>) -> Self {
                    SliceRange::new(None, Some(r.end as isize), None)
                }
            }

            impl From<RangeInclusive<$t>> for SliceRange {
                fn from(r: RangeInclusive<$t>) -> Self {
                    let (start, end) = r.into_inner();
                    SliceRange {
                        start: Some(start as isize),
                        stop: Some(end as isize),
                        step: None,
                        inclusive: true,
                    }
                }
            }

            impl From<Range<$t>> for SliceSpec {
                fn from(r: Range<$t>) -> Self {
                    SliceSpec::Range(r.into())
                }
            }

            impl From<RangeFrom<$t>> for SliceSpec {
                fn from(r: RangeFrom<$t>) -> Self {
                    SliceSpec::Range(r.into())
                }
            }

            impl From<RangeTo<$t>> for SliceSpec {
                fn from(r: RangeTo<$t>) -> Self {
                    SliceSpec::Range(r.into())
                }
            }

            impl From<RangeInclusive<$t>> for SliceSpec {
                fn from(r: RangeInclusive<$t>) -> Self {
                    SliceSpec::Range(r.into())
                }
            }
        )*
    };
}

impl_slice_from_int!(i32, i64, isize, usize);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::s;

    fn resolved(start: usize, len: usize, step: isize) -> Option<ResolvedRange> {
        Some(ResolvedRange { start, len, step })
    }

    #[test]
    fn test_resolve_forward() {
        assert_eq!(resolve_range(&range(0..3).step(2), 3), resolved(0, 2, 2));
        assert_eq!(resolve_range(&range(1..), 5), resolved(1, 4, 1));
        assert_eq!(resolve_range(&range(..10), 5), resolved(0, 5, 1));
        assert_eq!(resolve_range(&range(-2..), 5), resolved(3, 2, 1));
        assert_eq!(resolve_range(&range(1..=3), 5), resolved(1, 3, 1));
    }

    #[test]
    fn test_resolve_backward() {
        assert_eq!(resolve_range(&range(..).step(-1), 4), resolved(3, 4, -1));
        assert_eq!(resolve_range(&range(3..0).step(-2), 5), resolved(3, 2, -2));
        assert_eq!(resolve_range(&range(10..).step(-3), 5), resolved(4, 2, -3));
    }

    #[test]
    fn test_resolve_inclusive() {
        assert_eq!(resolve_range(&range(0..=-1), 4), resolved(0, 4, 1));
        assert_eq!(resolve_range(&range(0..=10), 4), resolved(0, 4, 1));
        assert_eq!(resolve_range(&range(3..=0).step(-1), 4), resolved(3, 4, -1));
        assert_eq!(resolve_range(&range(3..=1).step(-1), 4), resolved(3, 3, -1));
        assert_eq!(resolve_range(&range(-1..=0).step(-2), 5), resolved(4, 3, -2));
        assert_eq!(resolve_range(&range(0..=4).step(2), 5), resolved(0, 3, 2));
        assert_eq!(resolve_range(&range(2..=2), 4), resolved(2, 1, 1));
        assert_eq!(resolve_range(&range(2..=1), 4), resolved(0, 0, 1));
    }

    #[test]
    fn test_resolve_empty() {
        assert_eq!(resolve_range(&range(3..1), 5), resolved(0, 0, 1));
        assert_eq!(resolve_range(&range(0..), 0), resolved(0, 0, 1));
        assert_eq!(resolve_range(&range(1..3).step(-1), 5), resolved(0, 0, -1));
        assert_eq!(resolve_range(&range(..).step(0), 5), None);
    }

    #[test]
    fn test_s_macro() {
        let slices = s![1, .., 2..4, NewAxis, All, range(..).step(-1)];
        assert_eq!(
            slices.to_vec(),
            vec![
                SliceSpec::Index(1),
                SliceSpec::All,
                SliceSpec::Range(SliceRange::new(Some(2), Some(4), None)),
                SliceSpec::NewAxis,
                SliceSpec::All,
                SliceSpec::Range(SliceRange::new(None, None, Some(-1))),
            ]
        );
    }
}
