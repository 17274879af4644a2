use crate::{Broadcast, Closure, DataHandle, Expression, StridedView, ViewError};

impl<'a, E: Expression> StridedView<'a, E> {
    /// Writes `rhs`, broadcast to the view's shape, through the view.
    ///
    /// All of `rhs` is evaluated before the first write, so `rhs` may read the very elements
    /// being overwritten (e.g. another view of the same buffer).
    pub fn assign<R>(&self, rhs: &R) -> Result<(), ViewError>
    where
        R: Expression<Elem = E::Elem>,
    {
        let storage = match self.data_handle() {
            DataHandle::Buffer { storage, .. } => storage,
            DataHandle::Adaptor(_) => return Err(ViewError::ReadOnly),
        };
        let rhs = Broadcast::new(Closure::Borrowed(rhs), self.shape().clone())?;

        let mut positions = Vec::with_capacity(self.size());
        let mut values = Vec::with_capacity(self.size());
        let mut walk = self.positions(self.shape());
        while walk.len() > 0 {
            let value = rhs.element(walk.index());
            let Some(position) = walk.next() else {
                break;
            };
            positions.push(position);
            values.push(value);
        }
        log::trace!("Assigning {} elements through {:?}", values.len(), self);

        let mut data = storage.write();
        for (position, value) in positions.into_iter().zip(values) {
            data[position] = value;
        }
        Ok(())
    }

    /// Sets every element of the view to `value`.
    pub fn fill(&self, value: E::Elem) -> Result<(), ViewError> {
        let storage = match self.data_handle() {
            DataHandle::Buffer { storage, .. } => storage,
            DataHandle::Adaptor(_) => return Err(ViewError::ReadOnly),
        };
        let positions = self.positions(self.shape()).collect::<Vec<_>>();
        let mut data = storage.write();
        for position in positions {
            data[position] = value;
        }
        Ok(())
    }
}
