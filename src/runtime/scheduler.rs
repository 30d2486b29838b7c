//! Explicitly owned scheduler handle.
//!
//! Workflows that submit commitments receive a `&mut Scheduler` (or own one)
//! instead of reaching for shared global state.

use std::sync::Arc;

use crate::core::{
    Cart, CartId, EventId, Resource, ScheduledEvent, StreamingRepository, Track, TrackError,
};
use crate::runtime::{drive_until_empty, DriveReport, FrameHandler};
use crate::util::ids::random_event_id;

/// Owns one track and exposes the submit/tick surface used by workflows.
#[derive(Debug)]
pub struct Scheduler<T, R> {
    track: Track<T, R>,
}

impl<T, R> Scheduler<T, R>
where
    R: StreamingRepository<Arc<Cart<T>>, Commitment = ScheduledEvent<T>>,
{
    /// Wrap a track.
    pub fn new(track: Track<T, R>) -> Self {
        Self { track }
    }

    /// Schedule an event on the owned track.
    pub fn submit(&mut self, event: ScheduledEvent<T>) -> Result<(), TrackError> {
        self.track.schedule(event)
    }

    /// Schedule `item` for a single delivery `delay` buckets from now under a
    /// fresh random identity, returning that identity.
    pub fn submit_after(&mut self, delay: u64, item: T) -> Result<EventId, TrackError> {
        let id = random_event_id();
        let bucket = self.track.position().saturating_add(delay);
        let event = ScheduledEvent::new(bucket, Resource::single(item)).with_id(id);
        self.track.schedule(event)?;
        Ok(id)
    }

    /// Advance the owned track by one bucket.
    pub fn tick(&mut self) -> Result<Option<Vec<T>>, TrackError> {
        self.track.next_frame()
    }

    /// Drive the owned track until it is empty.
    pub fn run<H>(&mut self, handler: &mut H) -> Result<DriveReport, TrackError>
    where
        H: FrameHandler<T> + ?Sized,
    {
        drive_until_empty(&mut self.track, handler, None)
    }

    /// Current track position.
    pub fn position(&self) -> CartId {
        self.track.position()
    }

    /// Borrow the owned track.
    pub fn track(&self) -> &Track<T, R> {
        &self.track
    }

    /// Give the track back.
    pub fn into_track(self) -> Track<T, R> {
        self.track
    }
}
