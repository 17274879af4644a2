//! Strided views over N-dimensional arrays.
//!
//! A [`StridedView`] reinterprets the storage of an [`Expression`] through its own shape,
//! signed strides and offset without copying elements. [`transpose`] and [`dynamic_view`]
//! build views from existing arrays or views; sources without a raw buffer are read through
//! an [`ExpressionAdaptor`].
//!
//! ```
//! use strata::prelude::*;
//!
//! let a = Array::from_data([1, 2, 3, 4, 5, 6], shape![2, 3]).unwrap();
//! let t = transpose(&a);
//! assert_eq!(t.shape(), &shape![3, 2]);
//! assert_eq!(t.element(&[0, 1]), 4);
//!
//! let v = dynamic_view(&a, &s![0..1, range(0..3).step(2)]).unwrap();
//! assert_eq!(v.to_array().to_vec(), vec![1, 3]);
//! ```
mod adaptor;
mod arith;
mod array;
mod dtype;
mod enforcer;
mod error;
mod expression;
mod generator;
mod layout;
mod ops;
mod shape;
mod storage;
mod strides;
mod view;

pub use adaptor::*;
pub use arith::*;
pub use array::*;
pub use dtype::*;
pub use enforcer::*;
pub use error::*;
pub use expression::*;
pub use generator::*;
pub use layout::*;
pub use ops::*;
pub use shape::*;
pub use storage::*;
pub use strides::*;
pub use view::*;

use smallvec::SmallVec;
pub type RVec<T> = SmallVec<[T; 4]>;

//https://github.com/sonos/tract/blob/main/data/src/macros.rs#L2
#[macro_export]
macro_rules! rvec {
    (@one $x:expr) => (1usize);
    ($elem:expr; $n:expr) => ({
        $crate::RVec::from_elem($elem, $n)
    });
    ($($x:expr),*$(,)*) => ({
        let count = 0usize $(+ rvec![@one $x])*;
        #[allow(unused_mut)]
        let mut vec = $crate::RVec::new();
        if count <= vec.inline_size() {
            $(vec.push($x);)*
            vec
        } else {
            $crate::RVec::from_vec(vec![$($x,)*])
        }
    });
}

#[macro_export]
macro_rules! shape {
    ($($x:expr),*$(,)*) => ({
        use $crate::rvec;
        $crate::Shape::new(rvec![$($x,)*])
    });
}

/// Builds a [`SliceVec`] from a comma separated list of slice descriptors.
///
/// Each entry is anything convertible into a [`SliceSpec`]: an integer index, a Rust range
/// (`1..3`, `..`, `2..`), a stepped range (`range(0..6).step(2)`), or the [`All`] /
/// [`NewAxis`] markers.
#[macro_export]
macro_rules! s {
    ($($x:expr),*$(,)*) => ({
        #[allow(unused_mut)]
        let mut slices = $crate::SliceVec::new();
        $(slices.push($crate::SliceSpec::from($x));)*
        slices
    });
}

pub mod prelude {
    pub use crate::{
        dynamic_view, range, rvec, s, shape, strided_view, transpose, transpose_with, All, Array,
        CheckPolicy, Closure, Expression, Layout, NewAxis, Shape, SliceSpec, StridedView, Strides,
    };
}
