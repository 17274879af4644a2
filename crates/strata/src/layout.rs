/// Storage order guarantee of an array or view.
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Default,
    strum_macros::Display,
    strum_macros::EnumIter,
)]
pub enum Layout {
    /// Last axis varies fastest in storage.
    #[default]
    #[strum(serialize = "row_major")]
    RowMajor,
    /// First axis varies fastest in storage.
    #[strum(serialize = "column_major")]
    ColumnMajor,
    /// No uniform stride order; traversal has to follow the per-axis strides.
    #[strum(serialize = "dynamic")]
    Dynamic,
}

impl Layout {
    /// Layout of the axis-reversed arrangement.
    pub fn transposed(self) -> Self {
        match self {
            Layout::RowMajor => Layout::ColumnMajor,
            Layout::ColumnMajor => Layout::RowMajor,
            Layout::Dynamic => Layout::Dynamic,
        }
    }

    pub fn is_contiguous(self) -> bool {
        !matches!(self, Layout::Dynamic)
    }
}
