use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;

use crate::Element;

/// Shared element buffer.
///
/// Cloning a `Storage` aliases the same buffer; this is how views share the memory of the
/// array they were built from. Reads take a shared lock and writes an exclusive one, so
/// overlapping views never race at the memory level. Ordering of writes through different
/// views remains the caller's concern.
#[derive(Debug)]
pub struct Storage<T> {
    inner: Arc<RwLock<Vec<T>>>,
}

impl<T> Clone for Storage<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Element> Storage<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(data)),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn read(&self) -> RwLockReadGuard<'_, Vec<T>> {
        self.inner.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, Vec<T>> {
        self.inner.write()
    }

    /// Element at linear position `index`.
    ///
    /// # Panics
    /// If `index` is outside the buffer.
    #[inline]
    pub fn get(&self, index: usize) -> T {
        self.inner.read()[index]
    }

    #[inline]
    pub fn set(&self, index: usize, value: T) {
        self.inner.write()[index] = value;
    }

    /// Copy of the whole buffer.
    pub fn to_vec(&self) -> Vec<T> {
        self.inner.read().clone()
    }

    #[cfg(test)]
    pub(crate) fn is_locked(&self) -> bool {
        self.inner.is_locked()
    }
}

#[cfg(test)]
mod tests {
    use super::Storage;

    #[test]
    fn test_clone_aliases() {
        let a = Storage::new(vec![1i32, 2, 3]);
        let b = a.clone();
        b.set(1, 7);
        assert_eq!(a.get(1), 7);
        assert_eq!(a.to_vec(), vec![1, 7, 3]);
        assert_eq!(b.read().len(), 3);
    }
}
