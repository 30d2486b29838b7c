//! In-memory bucket repository.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::core::{Cart, CartId, ScheduledEvent, StreamingRepository, TrackError};

/// Bucket store keyed by cart id, for development, tests and simulations.
///
/// Identities are assigned from a sequential counter starting at 1; events
/// that already carry an id keep it.
pub struct InMemoryRepository<T> {
    carts: RwLock<HashMap<CartId, Arc<Cart<T>>>>,
    next_event_id: AtomicU64,
}

impl<T> InMemoryRepository<T> {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self {
            carts: RwLock::new(HashMap::new()),
            next_event_id: AtomicU64::new(1),
        }
    }

    /// Number of stored buckets.
    pub fn len(&self) -> usize {
        self.carts.read().len()
    }

    /// Ids of the stored buckets, ascending.
    pub fn bucket_ids(&self) -> Vec<CartId> {
        let mut ids: Vec<CartId> = self.carts.read().keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

impl<T> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for InMemoryRepository<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryRepository")
            .field("buckets", &self.len())
            .finish_non_exhaustive()
    }
}

impl<T> StreamingRepository<Arc<Cart<T>>> for InMemoryRepository<T>
where
    T: Send,
{
    type Commitment = ScheduledEvent<T>;

    fn get_by_id(&self, id: CartId) -> Result<Option<Arc<Cart<T>>>, TrackError> {
        Ok(self.carts.read().get(&id).cloned())
    }

    fn save(&self, item: Arc<Cart<T>>) -> Result<(), TrackError> {
        self.carts.write().insert(item.id(), item);
        Ok(())
    }

    fn save_commitment(&self, commitment: &mut ScheduledEvent<T>) -> Result<(), TrackError> {
        if commitment.id().is_none() {
            commitment.set_id(self.next_event_id.fetch_add(1, Ordering::Relaxed));
        }
        Ok(())
    }

    fn remove(&self, id: CartId) -> Result<(), TrackError> {
        self.carts.write().remove(&id);
        Ok(())
    }

    fn is_empty(&self) -> bool {
        self.carts.read().is_empty()
    }
}
