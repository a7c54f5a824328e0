//! Owned-or-shared storage backing arrays and lists

use std::sync::Arc;

/// Element storage that is either exclusively owned or a shared view.
///
/// Only `Owned` storage may be mutated. `Shared` storage is a reference to a
/// buffer that may be visible through other values; writing to it requires
/// an explicit copy into a fresh `Owned` buffer first.
#[derive(Debug)]
pub enum Buffer<T> {
    /// Exclusively owned, mutable in place
    Owned(Vec<T>),

    /// Reference view, read-only
    Shared(Arc<Vec<T>>),
}

impl<T> Buffer<T> {
    /// Whether this is a reference view
    pub fn is_ref(&self) -> bool {
        matches!(self, Buffer::Shared(_))
    }

    /// Read access to the elements
    pub fn as_slice(&self) -> &[T] {
        match self {
            Buffer::Owned(v) => v.as_slice(),
            Buffer::Shared(v) => v.as_slice(),
        }
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Whether there are no elements
    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    /// Mutable access, only for owned storage.
    pub fn owned_mut(&mut self) -> Option<&mut Vec<T>> {
        match self {
            Buffer::Owned(v) => Some(v),
            Buffer::Shared(_) => None,
        }
    }

    /// Turn owned storage into a shared view without copying.
    pub fn into_shared(self) -> Self {
        match self {
            Buffer::Owned(v) => Buffer::Shared(Arc::new(v)),
            shared => shared,
        }
    }

    /// Whether two buffers are views of the same allocation.
    pub fn shares_storage_with(&self, other: &Buffer<T>) -> bool {
        match (self, other) {
            (Buffer::Shared(a), Buffer::Shared(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl<T: Clone> Buffer<T> {
    /// Another reference view of the same elements.
    ///
    /// Shared storage hands out a new reference; owned storage has to be
    /// copied, since the owner keeps its right to mutate.
    pub fn share(&self) -> Self {
        match self {
            Buffer::Owned(v) => Buffer::Shared(Arc::new(v.clone())),
            Buffer::Shared(v) => Buffer::Shared(Arc::clone(v)),
        }
    }

    /// Take the elements out: moves owned storage, copies shared storage.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Buffer::Owned(v) => v,
            Buffer::Shared(v) => v.as_ref().clone(),
        }
    }
}

impl<T: Clone> Clone for Buffer<T> {
    fn clone(&self) -> Self {
        match self {
            Buffer::Owned(v) => Buffer::Owned(v.clone()),
            Buffer::Shared(v) => Buffer::Shared(Arc::clone(v)),
        }
    }
}
