//! Audit sink implementations.
//!
//! A track records one audit event per lifecycle transition of a commitment
//! (schedule, rollover, retire) and one per drained bucket.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::core::{CartId, EventId};
use crate::util::clock::now_ms;

/// Action recorded by a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// First-time submission committed to a bucket.
    Schedule,
    /// Unfinished event re-committed to a later bucket.
    Rollover,
    /// Exhausted event dropped from the track.
    Retire,
    /// Bucket drained and removed.
    Drain,
}

/// Audit event structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Track name.
    pub track: String,
    /// Action taken.
    pub action: AuditAction,
    /// Related commitment, absent for bucket-level actions.
    pub event_id: Option<EventId>,
    /// Bucket the action applies to.
    pub bucket: CartId,
    /// Track position when the action was recorded.
    pub position: CartId,
    /// Timestamp milliseconds.
    pub created_at_ms: u128,
    /// Additional context.
    pub payload: Option<String>,
}

/// Audit sink abstraction.
pub trait AuditSink: Send {
    /// Record an audit event.
    fn record(&mut self, event: AuditEvent);
}

/// In-memory audit sink for testing and dev.
pub struct InMemoryAuditSink {
    events: VecDeque<AuditEvent>,
    max_events: usize,
}

impl InMemoryAuditSink {
    /// Create a new in-memory sink with a bounded buffer.
    pub fn new(max_events: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(max_events.min(1024)),
            max_events,
        }
    }

    /// Retrieve a snapshot of stored events.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.iter().cloned().collect()
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&mut self, event: AuditEvent) {
        if self.max_events == 0 {
            return;
        }
        if self.events.len() >= self.max_events {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }
}

/// Sink that forwards every event into a shared in-memory buffer, so callers
/// can keep a handle and inspect what a track recorded.
#[derive(Clone)]
pub struct SharedAuditSink {
    inner: std::sync::Arc<parking_lot::Mutex<InMemoryAuditSink>>,
}

impl SharedAuditSink {
    /// Create a shared sink with a bounded buffer.
    pub fn new(max_events: usize) -> Self {
        Self {
            inner: std::sync::Arc::new(parking_lot::Mutex::new(InMemoryAuditSink::new(max_events))),
        }
    }

    /// Retrieve a snapshot of stored events.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.inner.lock().events()
    }
}

impl AuditSink for SharedAuditSink {
    fn record(&mut self, event: AuditEvent) {
        self.inner.lock().record(event);
    }
}

/// Helper to build an audit event from context.
pub fn build_audit_event(
    track: impl Into<String>,
    action: AuditAction,
    event_id: Option<EventId>,
    bucket: CartId,
    position: CartId,
    payload: Option<String>,
) -> AuditEvent {
    AuditEvent {
        track: track.into(),
        action,
        event_id,
        bucket,
        position,
        created_at_ms: now_ms(),
        payload,
    }
}
