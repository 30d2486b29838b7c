//! The scheduling engine.
//!
//! A [`Track`] owns a logical clock (`position`), the number of commitments
//! still in flight, and a timeline of [`Cart`]s materialized lazily through an
//! [`ExpandingResource`]. Each call to [`Track::next_frame`] drains exactly the
//! bucket at the current position, retires exhausted events, rolls the rest
//! into a later bucket, removes the drained bucket from storage and advances
//! the clock by one.
//!
//! A track is single-writer: `schedule` and `next_frame` take `&mut self`, so
//! one driving loop owns it. Share it across tasks behind a mutex if needed.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::audit::{build_audit_event, AuditAction};
use crate::core::{
    AuditSink, Cart, CartId, EventId, ExpandingResource, ResourceState, ScheduledEvent,
    StreamingRepository, TrackError, DEFAULT_FRAME_WIDTH,
};

/// Timeline of buckets backing a track.
pub type Timeline<T, R> = ExpandingResource<Arc<Cart<T>>, R>;

/// Point-in-time counters for a track.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackStats {
    /// Next bucket to drain.
    pub position: CartId,
    /// Commitments scheduled and not yet exhausted.
    pub pending: usize,
    /// Furthest bucket any commitment has targeted.
    pub horizon: CartId,
    /// Ticks that drained a bucket.
    pub frames: u64,
    /// Items handed out across all frames.
    pub delivered_items: u64,
    /// First-time submissions.
    pub scheduled: u64,
    /// Re-commits of unfinished events.
    pub rollovers: u64,
    /// Rollover commits the repository rejected.
    pub rollover_failures: u64,
    /// Events waiting for their rollover to be retried.
    pub stranded: usize,
    /// Events retired after exhaustion.
    pub retired: u64,
}

/// Discrete-time delivery engine over a bucket repository.
pub struct Track<T, R> {
    name: String,
    timeline: Timeline<T, R>,
    position: CartId,
    horizon: CartId,
    pending: usize,
    frame_width: usize,
    reschedule_increment: u64,
    stats: TrackStats,
    stranded: Vec<ScheduledEvent<T>>,
    stale_buckets: Vec<CartId>,
    audit: Option<Box<dyn AuditSink>>,
}

/// A failed commit and the event it was for, if it could be recovered.
type CommitFailure<T> = (TrackError, Option<ScheduledEvent<T>>);

impl<T, R> Track<T, R>
where
    R: StreamingRepository<Arc<Cart<T>>, Commitment = ScheduledEvent<T>>,
{
    /// Create a track over an existing timeline.
    pub fn new(timeline: Timeline<T, R>) -> Self {
        Self {
            name: "track".into(),
            timeline,
            position: 0,
            horizon: 0,
            pending: 0,
            frame_width: DEFAULT_FRAME_WIDTH,
            reschedule_increment: 1,
            stats: TrackStats::default(),
            stranded: Vec::new(),
            stale_buckets: Vec::new(),
            audit: None,
        }
    }

    /// Create a track whose empty buckets are built with [`Cart::shared`].
    pub fn with_repository(repository: Arc<R>) -> Self
    where
        T: 'static,
    {
        Self::new(ExpandingResource::new(Cart::shared, repository))
    }

    /// Name used in logs and audit events.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Items drained from each event per frame (at least one).
    #[must_use]
    pub fn with_frame_width(mut self, frame_width: usize) -> Self {
        self.frame_width = frame_width.max(1);
        self
    }

    /// Default rollover step for events without a reschedule callback.
    #[must_use]
    pub fn with_reschedule_increment(mut self, increment: u64) -> Self {
        self.reschedule_increment = increment.max(1);
        self
    }

    /// Attach an audit sink.
    #[must_use]
    pub fn with_audit(mut self, audit: Box<dyn AuditSink>) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Commit an event to its delivery bucket.
    ///
    /// A fresh (`Full`) event is counted as pending and, if it targets the
    /// current bucket or an earlier one, is moved to `position + 1`. The bucket
    /// is fetched from the repository or built by the timeline factory, the
    /// event is passed through `save_commitment` for identity assignment, and
    /// the bucket is saved back. Submitting the same event twice commits it
    /// twice.
    ///
    /// On a repository failure nothing is committed and the pending count is
    /// unchanged.
    pub fn schedule(&mut self, mut event: ScheduledEvent<T>) -> Result<(), TrackError> {
        match event.state() {
            ResourceState::Full => {
                if event.delivery_time() <= self.position {
                    tracing::debug!(
                        track = %self.name,
                        requested = event.delivery_time(),
                        position = self.position,
                        "delivery time not in the future, clamping"
                    );
                    event.set_delivery_time(self.position.saturating_add(1));
                }
            }
            ResourceState::NotEmpty => {}
            ResourceState::Exhausted => {
                return Err(TrackError::InvalidState(format!(
                    "event {:?} is exhausted and cannot be scheduled",
                    event.id()
                )));
            }
        }
        self.place(event).map_err(|(e, _)| e)
    }

    fn place(&mut self, event: ScheduledEvent<T>) -> Result<(), CommitFailure<T>> {
        let first_time = event.state() == ResourceState::Full;
        let bucket = event.delivery_time();
        let event_id = self.commit(event)?;

        let action = if first_time {
            self.pending += 1;
            self.stats.scheduled += 1;
            tracing::info!(track = %self.name, ?event_id, bucket, "event scheduled");
            AuditAction::Schedule
        } else {
            self.stats.rollovers += 1;
            tracing::debug!(track = %self.name, ?event_id, bucket, "event rolled over");
            AuditAction::Rollover
        };
        self.horizon = self.horizon.max(bucket);
        self.record(action, event_id, bucket, None);
        Ok(())
    }

    /// Commit into the target bucket and save it. On failure the event is
    /// handed back, withdrawn from the bucket if it had already been added.
    fn commit(&self, mut event: ScheduledEvent<T>) -> Result<Option<EventId>, CommitFailure<T>> {
        let bucket = event.delivery_time();
        let repository = self.timeline.repository();
        let cart = match repository.get_by_id(bucket) {
            Ok(Some(cart)) => cart,
            Ok(None) => (self.timeline.factory())(bucket),
            Err(e) => return Err((e, Some(event))),
        };
        if let Err(e) = repository.save_commitment(&mut event) {
            return Err((e, Some(event)));
        }

        let event_id = event.id();
        cart.commit(event);
        if let Err(e) = repository.save(Arc::clone(&cart)) {
            return Err((e, cart.retract_last()));
        }
        Ok(event_id)
    }

    /// Advance the clock by one bucket.
    ///
    /// Returns `Ok(None)` without touching anything when no commitment is
    /// pending. Otherwise drains the bucket at the current position, one
    /// frame-width slice per event in commit order, and returns the
    /// concatenated items (possibly empty). Exhausted events are retired; the
    /// rest are re-committed to the bucket chosen by their reschedule callback
    /// (default `position + increment`), never earlier than `position + 1`.
    ///
    /// Drained items are always returned once taken. A rollover the
    /// repository rejects is held on the track, still counted as pending, and
    /// committed again at the start of the next tick; a bucket that could not
    /// be removed is retried the same way. Only a failure to fetch the bucket
    /// itself is returned as an error, and then nothing has been consumed.
    pub fn next_frame(&mut self) -> Result<Option<Vec<T>>, TrackError> {
        self.retry_deferred();
        if self.pending == 0 {
            return Ok(None);
        }

        let position = self.position;
        let cart = self
            .timeline
            .take(1)?
            .pop()
            .ok_or_else(|| TrackError::Backend("timeline yielded no bucket".into()))?;
        if cart.id() != position {
            tracing::warn!(
                track = %self.name,
                bucket = cart.id(),
                position,
                "timeline bucket does not match track position"
            );
        }

        let frame = cart.deliver_with(self.frame_width);
        for mut event in cart.take_events() {
            if event.resource().is_exhausted() {
                event.set_state(ResourceState::Exhausted);
                self.pending = self.pending.saturating_sub(1);
                self.stats.retired += 1;
                tracing::info!(track = %self.name, event_id = ?event.id(), position, "event retired");
                self.record(AuditAction::Retire, event.id(), position, None);
                continue;
            }

            event.set_state(ResourceState::NotEmpty);
            let mut next = event.next_delivery_time(position, self.reschedule_increment);
            if next <= position {
                tracing::warn!(
                    track = %self.name,
                    event_id = ?event.id(),
                    requested = next,
                    position,
                    "reschedule target already drained, clamping"
                );
                next = position.saturating_add(1);
            }
            event.set_delivery_time(next);
            self.roll_over(event);
        }

        self.remove_bucket(cart.id());
        self.position += 1;
        self.stats.frames += 1;
        self.stats.delivered_items += frame.len() as u64;
        self.record(
            AuditAction::Drain,
            None,
            position,
            Some(format!("items={}", frame.len())),
        );
        tracing::debug!(track = %self.name, position, items = frame.len(), "frame delivered");
        Ok(Some(frame))
    }

    fn roll_over(&mut self, event: ScheduledEvent<T>) {
        let Err((e, event)) = self.place(event) else {
            return;
        };
        self.stats.rollover_failures += 1;
        match event {
            Some(event) => {
                tracing::error!(
                    track = %self.name,
                    event_id = ?event.id(),
                    bucket = event.delivery_time(),
                    "failed to roll over event, holding it for retry: {}",
                    e
                );
                self.stranded.push(event);
            }
            None => {
                tracing::error!(
                    track = %self.name,
                    "failed to roll over event and could not withdraw it: {}",
                    e
                );
                self.pending = self.pending.saturating_sub(1);
            }
        }
    }

    fn remove_bucket(&mut self, bucket: CartId) {
        if let Err(e) = self.timeline.repository().remove(bucket) {
            tracing::error!(track = %self.name, bucket, "failed to remove drained bucket: {}", e);
            self.stale_buckets.push(bucket);
        }
    }

    fn retry_deferred(&mut self) {
        for bucket in std::mem::take(&mut self.stale_buckets) {
            self.remove_bucket(bucket);
        }
        for mut event in std::mem::take(&mut self.stranded) {
            // The bucket at `position` has not been drained yet.
            if event.delivery_time() < self.position {
                event.set_delivery_time(self.position);
            }
            self.roll_over(event);
        }
    }

    /// Whether the repository holds no buckets. This is a storage-level
    /// signal and can disagree with [`pending`](Self::pending) for a moment.
    pub fn is_empty(&self) -> bool {
        self.timeline.repository().is_empty()
    }

    /// Whether a rejected rollover or bucket removal is waiting to be retried
    /// by the next [`next_frame`](Self::next_frame). Driving loops keep ticking
    /// while this is true, even if storage looks empty.
    pub fn has_deferred_work(&self) -> bool {
        !self.stranded.is_empty() || !self.stale_buckets.is_empty()
    }

    /// Backing repository.
    pub fn repository(&self) -> &Arc<R> {
        self.timeline.repository()
    }
}

impl<T, R> Track<T, R> {
    /// Next bucket to drain.
    pub fn position(&self) -> CartId {
        self.position
    }

    /// Commitments scheduled and not yet exhausted.
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Furthest bucket any commitment has targeted.
    pub fn horizon(&self) -> CartId {
        self.horizon
    }

    /// Track name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Items drained from each event per frame.
    pub fn frame_width(&self) -> usize {
        self.frame_width
    }

    /// Default rollover step.
    pub fn reschedule_increment(&self) -> u64 {
        self.reschedule_increment
    }

    /// Underlying bucket timeline.
    pub fn timeline(&self) -> &Timeline<T, R> {
        &self.timeline
    }

    /// Snapshot of the track counters.
    pub fn stats(&self) -> TrackStats {
        TrackStats {
            position: self.position,
            pending: self.pending,
            horizon: self.horizon,
            stranded: self.stranded.len(),
            ..self.stats.clone()
        }
    }

    fn record(
        &mut self,
        action: AuditAction,
        event_id: Option<EventId>,
        bucket: CartId,
        payload: Option<String>,
    ) {
        if let Some(sink) = self.audit.as_mut() {
            sink.record(build_audit_event(
                self.name.clone(),
                action,
                event_id,
                bucket,
                self.position,
                payload,
            ));
        }
    }
}

impl<T, R> fmt::Debug for Track<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Track")
            .field("name", &self.name)
            .field("position", &self.position)
            .field("pending", &self.pending)
            .field("horizon", &self.horizon)
            .field("stranded", &self.stranded.len())
            .field("frame_width", &self.frame_width)
            .field("timeline", &self.timeline)
            .finish_non_exhaustive()
    }
}
