use half::{bf16, f16};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Hash, strum_macros::Display)]
pub enum DType {
    F16,
    BF16,
    #[default]
    F32,
    F64,
    I32,
    U32,
}

/// Element types that can be stored in an [`Array`](crate::Array) and read through views.
pub trait Element:
    Copy + std::fmt::Debug + PartialEq + 'static + num_traits::Zero + Send + Sync + bytemuck::Pod
{
    fn dt() -> DType;

    /// Lossy conversion used to build test data and arange sequences.
    fn from_usize(value: usize) -> Self;

    fn to_f64(self) -> f64;
}

macro_rules! map_type {
    ($t:ty, $v:ident) => {
        impl Element for $t {
            fn dt() -> DType {
                DType::$v
            }

            fn from_usize(value: usize) -> Self {
                value as Self
            }

            fn to_f64(self) -> f64 {
                self as f64
            }
        }
    };
}

macro_rules! map_half_type {
    ($t:ty, $v:ident) => {
        impl Element for $t {
            fn dt() -> DType {
                DType::$v
            }

            fn from_usize(value: usize) -> Self {
                Self::from_f64(value as f64)
            }

            fn to_f64(self) -> f64 {
                <$t>::to_f64(self)
            }
        }
    };
}

map_type!(f32, F32);
map_type!(f64, F64);
map_type!(i32, I32);
map_type!(u32, U32);
map_half_type!(f16, F16);
map_half_type!(bf16, BF16);
