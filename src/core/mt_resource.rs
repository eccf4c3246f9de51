//! Shared, lock-guarded state handles.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A thread-safe, reference-counted resource container with read-write locking.
///
/// `MtResource` provides synchronized access to a value of type `T` that can be shared
/// across threads. It uses an `Arc<RwLock<T>>` internally to manage concurrent access.
/// Shape queries from render or collision threads take read guards, while the
/// region's mutation thread takes the write guard for invalidation.
///
/// # Type Parameters
/// - `T`: The type of the contained resource, must be `Send + Sync`
///
/// # Examples
///
/// ```
/// use std::thread;
/// use wire_engine::core::MtResource;
///
/// let counter = MtResource::new(0);
/// let counter_clone = counter.clone();
///
/// let handle = thread::spawn(move || {
///     *counter_clone.get_mut() += 1;
/// });
///
/// handle.join().unwrap();
/// assert_eq!(*counter.get(), 1);
/// ```
///
/// # Poisoning
/// A panic while a guard is held does not make the resource unusable. The guard is
/// recovered from the poison error; every writer in this crate leaves the value
/// consistent between statements, so the recovered value is always valid.
pub struct MtResource<T: Send + Sync> {
    /// The shared value behind its lock.
    pub resource: Arc<RwLock<T>>,
}

impl<T: Send + Sync + 'static> MtResource<T> {
    /// Creates a new `MtResource` containing the given value.
    pub fn new(resource: T) -> Self {
        Self {
            resource: Arc::new(RwLock::new(resource)),
        }
    }

    /// Returns a read-only guard that allows reading the contained value.
    ///
    /// Multiple readers may hold guards at the same time.
    pub fn get(&self) -> RwLockReadGuard<'_, T> {
        self.resource.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a mutable guard that allows modifying the contained value.
    ///
    /// Blocks until all outstanding read guards are released.
    pub fn get_mut(&self) -> RwLockWriteGuard<'_, T> {
        self.resource.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Send + Sync> Clone for MtResource<T> {
    fn clone(&self) -> Self {
        Self {
            resource: self.resource.clone(),
        }
    }
}

impl<T: Send + Sync + Default + 'static> Default for MtResource<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
