use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

/// Shared owning reference to a live entity.
///
/// The identity cache and the rendering layer each hold a `Handle`; the entity
/// is released when the last one is dropped. Clones point at the same entity.
pub struct Handle<T>(Arc<RwLock<T>>);

impl<T> Handle<T> {
    pub fn new(value: T) -> Self {
        Handle(Arc::new(RwLock::new(value)))
    }

    /// A writer that panicked leaves the entity in whatever state it reached;
    /// the guard is returned anyway.
    pub fn read(&self) -> RwLockReadGuard<'_, T> {
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, T> {
        self.0.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// True if both handles refer to the same entity.
    pub fn ptr_eq(&self, other: &Handle<T>) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Number of live handles to this entity, this one included.
    pub fn holders(&self) -> usize {
        Arc::strong_count(&self.0)
    }

    pub fn downgrade(&self) -> WeakHandle<T> {
        WeakHandle(Arc::downgrade(&self.0))
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Handle(Arc::clone(&self.0))
    }
}

impl<T: fmt::Debug> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handle").field(&*self.read()).finish()
    }
}

/// Non-owning reference; does not keep the entity alive.
pub struct WeakHandle<T>(Weak<RwLock<T>>);

impl<T> WeakHandle<T> {
    pub fn upgrade(&self) -> Option<Handle<T>> {
        self.0.upgrade().map(Handle)
    }

    pub fn is_released(&self) -> bool {
        self.0.strong_count() == 0
    }
}

impl<T> Clone for WeakHandle<T> {
    fn clone(&self) -> Self {
        WeakHandle(Weak::clone(&self.0))
    }
}
