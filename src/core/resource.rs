//! Consumable, position-tracked buffers.
//!
//! A [`Resource`] hands out its items in order, a bounded slice at a time,
//! until it is exhausted. The bounds check, the slice copy-out and the
//! position advance run inside one `parking_lot::Mutex` critical section, so
//! any number of threads may drain the same resource concurrently without an
//! item being returned twice or skipped.

use std::collections::VecDeque;
use std::fmt;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Lifecycle of a resource (and of the event that owns it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceState {
    /// Buffer not yet materialized; nothing has been taken.
    Full,
    /// Materialized and partially consumed.
    NotEmpty,
    /// Every item has been taken. Terminal.
    Exhausted,
}

/// Zero-argument supplier that materializes a lazy buffer on first `take`.
pub type Supplier<T> = Box<dyn FnOnce() -> Vec<T> + Send>;

struct ResourceInner<T> {
    /// Capacity; `None` until a deferred buffer is materialized.
    size: Option<usize>,
    position: usize,
    /// Items not yet handed out, front is the item at `position`.
    buffer: VecDeque<T>,
    supplier: Option<Supplier<T>>,
    state: ResourceState,
}

impl<T> ResourceInner<T> {
    fn materialize(&mut self) {
        if let Some(supplier) = self.supplier.take() {
            let items = supplier();
            let size = match self.size {
                Some(declared) if declared != items.len() => {
                    tracing::warn!(
                        declared,
                        supplied = items.len(),
                        "supplier returned a buffer that disagrees with the declared size"
                    );
                    declared.min(items.len())
                }
                Some(declared) => declared,
                None => items.len(),
            };
            self.buffer = items.into_iter().take(size).collect();
            self.size = Some(size);
        }
        self.state = ResourceState::NotEmpty;
    }

    fn take(&mut self, limit: usize) -> Vec<T> {
        if self.state == ResourceState::Full {
            self.materialize();
        }

        let size = self.size.unwrap_or(0);
        let end = self.position.saturating_add(limit).min(size);
        let count = end - self.position;
        let slice: Vec<T> = self.buffer.drain(..count).collect();
        self.position = end;

        if self.position >= size {
            self.state = ResourceState::Exhausted;
        }
        slice
    }
}

/// Thread-safe consumable buffer.
///
/// ```
/// use cart_track::core::{Resource, ResourceState};
///
/// let resource = Resource::from_vec(vec![1, 2, 3]);
/// assert_eq!(resource.take(2), vec![1, 2]);
/// assert_eq!(resource.take(2), vec![3]);
/// assert_eq!(resource.state(), ResourceState::Exhausted);
/// assert!(resource.take(2).is_empty());
/// ```
pub struct Resource<T> {
    inner: Mutex<ResourceInner<T>>,
}

impl<T> Resource<T> {
    /// Create an eager resource over a fixed item sequence.
    pub fn from_vec(items: Vec<T>) -> Self {
        let size = items.len();
        Self::with_parts(Some(size), items.into(), None)
    }

    /// Create a resource from a single item.
    pub fn single(item: T) -> Self {
        Self::from_vec(vec![item])
    }

    /// Create a lazy resource with a declared size; `supplier` runs on the
    /// first `take`. A declared size of zero is exhausted immediately and the
    /// supplier is never called.
    pub fn lazy<F>(size: usize, supplier: F) -> Self
    where
        F: FnOnce() -> Vec<T> + Send + 'static,
    {
        Self::with_parts(Some(size), VecDeque::new(), Some(Box::new(supplier)))
    }

    /// Create a lazy resource whose size is unknown until the supplier runs.
    pub fn deferred<F>(supplier: F) -> Self
    where
        F: FnOnce() -> Vec<T> + Send + 'static,
    {
        Self::with_parts(None, VecDeque::new(), Some(Box::new(supplier)))
    }

    fn with_parts(size: Option<usize>, buffer: VecDeque<T>, supplier: Option<Supplier<T>>) -> Self {
        let state = if size == Some(0) {
            ResourceState::Exhausted
        } else {
            ResourceState::Full
        };
        Self {
            inner: Mutex::new(ResourceInner {
                size,
                position: 0,
                buffer,
                supplier,
                state,
            }),
        }
    }

    /// Take up to `limit` items from the current position and advance past
    /// them. Returns an empty vector once the resource is exhausted.
    pub fn take(&self, limit: usize) -> Vec<T> {
        self.inner.lock().take(limit)
    }

    /// Current state.
    pub fn state(&self) -> ResourceState {
        self.inner.lock().state
    }

    /// Whether every item has been taken.
    pub fn is_exhausted(&self) -> bool {
        self.state() == ResourceState::Exhausted
    }

    /// Number of items taken so far.
    pub fn position(&self) -> usize {
        self.inner.lock().position
    }

    /// Capacity, if known.
    pub fn size(&self) -> Option<usize> {
        self.inner.lock().size
    }

    /// Items left to take, if the size is known.
    pub fn remaining(&self) -> Option<usize> {
        let inner = self.inner.lock();
        inner.size.map(|size| size - inner.position)
    }

    /// Copy of the items not yet taken. Does not materialize a lazy buffer.
    pub fn snapshot(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.inner.lock().buffer.iter().cloned().collect()
    }
}

impl<T> fmt::Debug for Resource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("Resource")
            .field("size", &inner.size)
            .field("position", &inner.position)
            .field("buffered", &inner.buffer.len())
            .field("state", &inner.state)
            .finish()
    }
}

impl<T> From<Vec<T>> for Resource<T> {
    fn from(items: Vec<T>) -> Self {
        Self::from_vec(items)
    }
}
