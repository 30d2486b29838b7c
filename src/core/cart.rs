//! Time buckets.
//!
//! A [`Cart`] holds every [`ScheduledEvent`] committed to one position on a
//! track, in commit order. Delivering a cart drains one frame-width slice from
//! each event's resource, so it has side effects: a second delivery returns
//! what is left, not the same items again.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::core::{CartId, EventId, ScheduledEvent};

/// Default number of items drained from each event per frame.
pub const DEFAULT_FRAME_WIDTH: usize = 1;

/// Bucket holding the commitments for a single track position.
pub struct Cart<T> {
    id: CartId,
    events: Mutex<Vec<ScheduledEvent<T>>>,
}

impl<T> Cart<T> {
    /// Create an empty cart for bucket `id`.
    pub fn new(id: CartId) -> Self {
        Self {
            id,
            events: Mutex::new(Vec::new()),
        }
    }

    /// Create an empty shared cart; usable directly as a timeline factory.
    pub fn shared(id: CartId) -> Arc<Self> {
        Arc::new(Self::new(id))
    }

    /// Bucket index.
    pub fn id(&self) -> CartId {
        self.id
    }

    /// Append an event. No capacity limit applies.
    pub fn commit(&self, event: ScheduledEvent<T>) {
        self.events.lock().push(event);
    }

    /// Withdraw the most recently committed event.
    ///
    /// The track uses this to undo a commit whose bucket could not be saved.
    /// Only sound while the caller is the cart's single writer.
    pub(crate) fn retract_last(&self) -> Option<ScheduledEvent<T>> {
        self.events.lock().pop()
    }

    /// Number of committed events.
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Whether nothing is committed.
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Ids of the committed events, in commit order.
    pub fn event_ids(&self) -> Vec<Option<EventId>> {
        self.events.lock().iter().map(ScheduledEvent::id).collect()
    }

    /// One slice per event, in commit order, using the default frame width.
    pub fn deliver(&self) -> Vec<Vec<T>> {
        self.deliver_per_event(DEFAULT_FRAME_WIDTH)
    }

    /// One slice of up to `width` items per event, in commit order.
    pub fn deliver_per_event(&self, width: usize) -> Vec<Vec<T>> {
        self.events
            .lock()
            .iter()
            .map(|event| event.resource().take(width))
            .collect()
    }

    /// Concatenated slices using the default frame width.
    pub fn deliver_flat(&self) -> Vec<T> {
        self.deliver_with(DEFAULT_FRAME_WIDTH)
    }

    /// Concatenated slices of up to `width` items per event, in commit order.
    pub fn deliver_with(&self, width: usize) -> Vec<T> {
        self.events
            .lock()
            .iter()
            .flat_map(|event| event.resource().take(width))
            .collect()
    }

    /// Move every committed event out of the cart, leaving it empty.
    ///
    /// Rollover works on this owned snapshot, never on the live list, so
    /// re-committing an event cannot disturb the iteration.
    pub fn take_events(&self) -> Vec<ScheduledEvent<T>> {
        std::mem::take(&mut *self.events.lock())
    }
}

impl<T> fmt::Debug for Cart<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cart")
            .field("id", &self.id)
            .field("events", &self.len())
            .finish()
    }
}
