//! Resources that grow on demand from a repository.
//!
//! An [`ExpandingResource`] behaves like an unbounded [`Resource`](super::Resource)
//! indexed by integer position. When a `take` reaches past the materialized
//! window, the missing indices are looked up in the repository and, on a miss,
//! default-constructed by the factory. Growth and consumption share one
//! critical section, and consumed items are evicted immediately, so memory is
//! bounded by the window that has been materialized but not yet taken.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::core::{ResourceState, StreamingRepository, TrackError};

/// Default-constructs the item for an index absent from storage.
pub type Factory<T> = Arc<dyn Fn(u64) -> T + Send + Sync>;

struct ExpandingInner<T> {
    size: u64,
    position: u64,
    window: VecDeque<T>,
    state: ResourceState,
}

/// Lazily growing resource backed by a [`StreamingRepository`].
pub struct ExpandingResource<T, R> {
    inner: Mutex<ExpandingInner<T>>,
    factory: Factory<T>,
    repository: Arc<R>,
}

impl<T, R> ExpandingResource<T, R>
where
    R: StreamingRepository<T>,
{
    /// Create an expanding resource with an empty window.
    pub fn new<F>(factory: F, repository: Arc<R>) -> Self
    where
        F: Fn(u64) -> T + Send + Sync + 'static,
    {
        Self::with_initial(Vec::new(), factory, repository)
    }

    /// Create an expanding resource whose window is pre-seeded with `initial`,
    /// occupying indices `0..initial.len()`.
    pub fn with_initial<F>(initial: Vec<T>, factory: F, repository: Arc<R>) -> Self
    where
        F: Fn(u64) -> T + Send + Sync + 'static,
    {
        let size = initial.len() as u64;
        Self {
            inner: Mutex::new(ExpandingInner {
                size,
                position: 0,
                window: initial.into(),
                state: if size == 0 {
                    ResourceState::Exhausted
                } else {
                    ResourceState::Full
                },
            }),
            factory: Arc::new(factory),
            repository,
        }
    }

    /// Take `limit` items starting at the current position, growing the
    /// window first if it is too short.
    ///
    /// On a repository failure the window is left untouched and nothing is
    /// consumed.
    pub fn take(&self, limit: usize) -> Result<Vec<T>, TrackError> {
        let mut inner = self.inner.lock();
        let wanted = inner.position.saturating_add(limit as u64);
        let overflow = wanted.saturating_sub(inner.size);

        if overflow > 0 {
            let start = inner.size;
            let mut grown = Vec::with_capacity(usize::try_from(overflow).unwrap_or(0));
            for index in start..start + overflow {
                let item = match self.repository.get_by_id(index)? {
                    Some(stored) => stored,
                    None => (self.factory)(index),
                };
                grown.push(item);
            }
            tracing::debug!(from = start, count = overflow, "expanded resource window");
            inner.window.extend(grown);
            inner.size += overflow;
        }

        let end = wanted.min(inner.size);
        let count = usize::try_from(end - inner.position).unwrap_or(usize::MAX);
        let slice: Vec<T> = inner.window.drain(..count).collect();
        inner.position = end;
        inner.state = if inner.position == inner.size {
            ResourceState::Exhausted
        } else {
            ResourceState::NotEmpty
        };
        Ok(slice)
    }

    /// Number of items taken so far; also the index of the next item.
    pub fn position(&self) -> u64 {
        self.inner.lock().position
    }

    /// Number of indices materialized so far.
    pub fn size(&self) -> u64 {
        self.inner.lock().size
    }

    /// Number of materialized items not yet taken.
    pub fn window_len(&self) -> usize {
        self.inner.lock().window.len()
    }

    /// `Exhausted` whenever the materialized window has been fully taken.
    /// Unlike a plain resource this is not terminal: the next `take` grows.
    pub fn state(&self) -> ResourceState {
        self.inner.lock().state
    }

    /// Backing repository.
    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// Factory used to default-construct missing items.
    pub fn factory(&self) -> &Factory<T> {
        &self.factory
    }
}

impl<T, R> fmt::Debug for ExpandingResource<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("ExpandingResource")
            .field("size", &inner.size)
            .field("position", &inner.position)
            .field("window", &inner.window.len())
            .field("state", &inner.state)
            .finish_non_exhaustive()
    }
}
