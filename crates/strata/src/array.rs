use crate::{
    element_offset, ArrayError, DType, Element, Enforcer, Expression, Layout, RawData, Shape,
    Storage, Strides, ViewError,
};

#[cfg(feature = "rand")]
use {rand::prelude::*, rand_distr::StandardNormal};

#[cfg(feature = "testing")]
use ndarray::{ArrayD, IxDyn};

/// A contiguous N-dimensional array.
///
/// Arrays own their [`Storage`] through a shared handle: cloning an `Array` aliases the same
/// elements, as does every view built from it. Use [`Array::deep_clone`] for an independent
/// copy.
#[derive(Clone)]
pub struct Array<T: Element> {
    storage: Storage<T>,
    shape: Shape,
    strides: Strides,
    layout: Layout,
}

impl<T: Element> Array<T> {
    pub(crate) fn new_unchecked(data: Vec<T>, shape: Shape, layout: Layout) -> Self {
        let strides = Strides::contiguous(&shape, layout);
        Self {
            storage: Storage::new(data),
            shape,
            strides,
            layout,
        }
    }

    /// Creates a row-major array from a chunk of data.
    pub fn from_data<U: AsRef<[T]>>(data: U, shape: Shape) -> Result<Self, ArrayError> {
        Self::from_data_with_layout(data, shape, Layout::RowMajor)
    }

    /// Creates an array whose data is stored in `layout` order.
    ///
    /// `Layout::Dynamic` has no storage order of its own and is stored row-major.
    pub fn from_data_with_layout<U: AsRef<[T]>>(
        data: U,
        shape: Shape,
        layout: Layout,
    ) -> Result<Self, ArrayError> {
        let data = data.as_ref();
        if data.len() != shape.numel() {
            return Err(ArrayError::ElementCount {
                shape,
                actual: data.len(),
            });
        }
        let layout = match layout {
            Layout::Dynamic => Layout::RowMajor,
            l => l,
        };
        Ok(Self::new_unchecked(data.to_vec(), shape, layout))
    }

    pub fn full(value: T, shape: Shape) -> Self {
        Self::new_unchecked(vec![value; shape.numel()], shape, Layout::RowMajor)
    }

    pub fn zeros(shape: Shape) -> Self {
        Self::full(T::zero(), shape)
    }

    /// Row-major array holding `0, 1, 2, ...`.
    pub fn arange(shape: Shape) -> Self {
        let data = (0..shape.numel()).map(T::from_usize).collect();
        Self::new_unchecked(data, shape, Layout::RowMajor)
    }

    #[cfg(feature = "rand")]
    pub fn randn(shape: Shape) -> Self
    where
        T: num_traits::Float,
    {
        let mut rng = rand::thread_rng();
        let data = (0..shape.numel())
            .map(|_| {
                let sample: f32 = StandardNormal.sample(&mut rng);
                <T as num_traits::NumCast>::from(sample).unwrap_or_else(T::zero)
            })
            .collect::<Vec<_>>();
        Self::new_unchecked(data, shape, Layout::RowMajor)
    }

    /// Reinterprets little-endian element bytes as a row-major array.
    pub fn from_bytes(bytes: &[u8], shape: Shape) -> Result<Self, ArrayError> {
        let data: Vec<T> = bytemuck::try_cast_slice::<u8, T>(bytes)
            .map(|s| s.to_vec())
            .or_else(|_| {
                if bytes.len() % std::mem::size_of::<T>() != 0 {
                    return Err(ArrayError::ByteCount(bytes.len()));
                }
                Ok(bytemuck::pod_collect_to_vec::<u8, T>(bytes))
            })?;
        Self::from_data(data, shape)
    }

    /// Element bytes in row-major order.
    pub fn to_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice::<T, u8>(&self.to_vec()).to_vec()
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn strides(&self) -> &Strides {
        &self.strides
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn storage(&self) -> &Storage<T> {
        &self.storage
    }

    pub fn dt(&self) -> DType {
        T::dt()
    }

    pub fn rank(&self) -> usize {
        self.shape.rank()
    }

    pub fn numel(&self) -> usize {
        self.shape.numel()
    }

    /// Checked read. Extra leading indices are ignored, as in [`Expression::element`].
    pub fn get(&self, index: &[usize]) -> Option<T> {
        Enforcer::check_index(&self.shape, index).ok()?;
        Some(self.element(index))
    }

    pub fn set(&self, index: &[usize], value: T) -> Result<(), ViewError> {
        Enforcer::check_index(&self.shape, index)?;
        let position = element_offset(self.strides.as_ref(), index) as usize;
        self.storage.set(position, value);
        Ok(())
    }

    /// Elements in row-major logical order, whatever the storage layout.
    pub fn to_vec(&self) -> Vec<T> {
        match self.layout {
            Layout::RowMajor => self.storage.to_vec(),
            _ => {
                let data = self.storage.read();
                let row_major = Strides::contiguous(&self.shape, Layout::RowMajor);
                (0..self.numel())
                    .map(|flat| {
                        let index = crate::unravel_index(flat, &row_major);
                        data[element_offset(self.strides.as_ref(), &index) as usize]
                    })
                    .collect()
            }
        }
    }

    /// Copy with its own storage.
    pub fn deep_clone(&self) -> Self {
        Self {
            storage: Storage::new(self.storage.to_vec()),
            shape: self.shape.clone(),
            strides: self.strides.clone(),
            layout: self.layout,
        }
    }

    pub fn all_close(&self, other: &Self, atol: f64, rtol: f64) -> anyhow::Result<()> {
        if self.shape() != other.shape() {
            anyhow::bail!("Shape mismatch {:?} != {:?}", self.shape(), other.shape())
        }
        let (lhs, rhs) = (self.to_vec(), other.to_vec());
        let mut fail_count = 0;
        let mut max_abs_error = 0f64;
        for (a, b) in lhs.iter().zip(rhs.iter()) {
            let (a, b) = (a.to_f64(), b.to_f64());
            let abs_error = (a - b).abs();
            max_abs_error = max_abs_error.max(abs_error);
            if abs_error > atol + rtol * b.abs() {
                fail_count += 1;
            }
        }
        if fail_count > 0 {
            anyhow::bail!("{} samples not close - MAE={}", fail_count, max_abs_error);
        }
        Ok(())
    }

    #[cfg(feature = "testing")]
    pub fn from_ndarray(array: &ArrayD<T>) -> Self {
        let shape = Shape::from(array.shape());
        Self::new_unchecked(array.iter().copied().collect(), shape, Layout::RowMajor)
    }

    #[cfg(feature = "testing")]
    pub fn to_ndarray(&self) -> anyhow::Result<ArrayD<T>> {
        Ok(ArrayD::from_shape_vec(
            IxDyn(&self.shape.to_vec()),
            self.to_vec(),
        )?)
    }
}

impl<T: Element> Expression for Array<T> {
    type Elem = T;

    fn shape(&self) -> &Shape {
        &self.shape
    }

    #[inline]
    fn element(&self, index: &[usize]) -> T {
        self.storage.get(element_offset(self.strides.as_ref(), index) as usize)
    }

    fn layout(&self) -> Layout {
        self.layout
    }

    fn raw_data(&self) -> Option<RawData<'_, T>> {
        Some(RawData::new(&self.storage, &self.strides, 0))
    }
}

impl<T: Element> std::fmt::Debug for Array<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let data = self.storage.read();
        let length = data.len().min(64);
        f.debug_struct("Array")
            .field("dt", &T::dt())
            .field("shape", &self.shape)
            .field("strides", &self.strides)
            .field("layout", &self.layout)
            .field("data", &&data[..length])
            .finish()
    }
}
