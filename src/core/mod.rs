//! Core scheduling abstractions: resources, buckets, commitments and the track.

pub mod audit;
pub mod cart;
pub mod error;
pub mod event;
pub mod expanding;
pub mod repository;
pub mod resource;
pub mod track;

pub use audit::{
    build_audit_event, AuditAction, AuditEvent, AuditSink, InMemoryAuditSink, SharedAuditSink,
};
pub use cart::{Cart, DEFAULT_FRAME_WIDTH};
pub use error::{AppResult, TrackError};
pub use event::{every, EventId, RescheduleFn, Rollover, ScheduledEvent};
pub use expanding::{ExpandingResource, Factory};
pub use repository::{CartId, StreamingRepository};
pub use resource::{Resource, ResourceState, Supplier};
pub use track::{Timeline, Track, TrackStats};
