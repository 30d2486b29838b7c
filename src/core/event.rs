//! Delivery commitments.

use std::fmt;

use crate::core::{CartId, Resource, ResourceState};

/// Identity assigned to a commitment.
pub type EventId = u64;

/// Context handed to a reschedule callback when an event rolls over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rollover {
    /// Event identity, if one has been assigned.
    pub event_id: Option<EventId>,
    /// Bucket that was just drained.
    pub position: CartId,
    /// Bucket the event was delivered from.
    pub delivery_time: CartId,
    /// Items left in the event's resource.
    pub remaining: Option<usize>,
}

/// Computes the next delivery bucket for an event that is not yet exhausted.
pub type RescheduleFn = Box<dyn FnMut(&Rollover) -> CartId + Send>;

/// Reschedule policy that delivers again `step` buckets after the drained one.
pub fn every(step: u64) -> RescheduleFn {
    Box::new(move |rollover| rollover.position.saturating_add(step.max(1)))
}

/// Commitment of a resource to a delivery bucket on a track.
///
/// An event starts `Full`, becomes `NotEmpty` once it has been delivered from
/// at least once, and ends `Exhausted` when its resource is drained. A track
/// retires exhausted events and never reschedules them.
pub struct ScheduledEvent<T> {
    id: Option<EventId>,
    delivery_time: CartId,
    resource: Resource<T>,
    state: ResourceState,
    on_reschedule: Option<RescheduleFn>,
}

impl<T> ScheduledEvent<T> {
    /// Commit `resource` for delivery at bucket `delivery_time`.
    pub fn new(delivery_time: CartId, resource: Resource<T>) -> Self {
        Self {
            id: None,
            delivery_time,
            resource,
            state: ResourceState::Full,
            on_reschedule: None,
        }
    }

    /// Set an explicit identity.
    #[must_use]
    pub fn with_id(mut self, id: EventId) -> Self {
        self.id = Some(id);
        self
    }

    /// Install a callback that picks the next delivery bucket on rollover.
    #[must_use]
    pub fn with_reschedule<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&Rollover) -> CartId + Send + 'static,
    {
        self.on_reschedule = Some(Box::new(callback));
        self
    }

    /// Install a boxed reschedule policy such as [`every`].
    #[must_use]
    pub fn with_policy(mut self, policy: RescheduleFn) -> Self {
        self.on_reschedule = Some(policy);
        self
    }

    /// Identity, if assigned.
    pub fn id(&self) -> Option<EventId> {
        self.id
    }

    /// Assign an identity. Used by repositories in `save_commitment`.
    pub fn set_id(&mut self, id: EventId) {
        self.id = Some(id);
    }

    /// Target bucket.
    pub fn delivery_time(&self) -> CartId {
        self.delivery_time
    }

    /// Retarget the event.
    pub fn set_delivery_time(&mut self, delivery_time: CartId) {
        self.delivery_time = delivery_time;
    }

    /// Resource delivered by this event.
    pub fn resource(&self) -> &Resource<T> {
        &self.resource
    }

    /// Lifecycle state.
    pub fn state(&self) -> ResourceState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: ResourceState) {
        self.state = state;
    }

    /// Whether a custom reschedule callback is installed.
    pub fn has_reschedule(&self) -> bool {
        self.on_reschedule.is_some()
    }

    /// Compute the bucket this event should move to after `position` was
    /// drained: the callback's answer if one is installed, otherwise
    /// `position + default_increment`.
    pub(crate) fn next_delivery_time(&mut self, position: CartId, default_increment: u64) -> CartId {
        let rollover = Rollover {
            event_id: self.id,
            position,
            delivery_time: self.delivery_time,
            remaining: self.resource.remaining(),
        };
        match self.on_reschedule.as_mut() {
            Some(callback) => callback(&rollover),
            None => position.saturating_add(default_increment),
        }
    }
}

impl<T> fmt::Debug for ScheduledEvent<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScheduledEvent")
            .field("id", &self.id)
            .field("delivery_time", &self.delivery_time)
            .field("resource", &self.resource)
            .field("state", &self.state)
            .field("on_reschedule", &self.on_reschedule.is_some())
            .finish()
    }
}
