//! # Cart Track
//!
//! A discrete-time scheduling engine that delivers variable-length resources a
//! bounded slice at a time, one logical tick after another.
//!
//! Time is an unbounded sequence of equally sized buckets ("carts"). Callers
//! commit a [`Resource`](core::Resource) to a future bucket through a
//! [`ScheduledEvent`](core::ScheduledEvent); every call to
//! [`Track::next_frame`](core::Track::next_frame) drains the bucket at the
//! current position, hands out one frame-width slice of each committed
//! resource, and rolls every unfinished commitment over into a later bucket.
//! Buckets are materialized lazily from a pluggable
//! [`StreamingRepository`](core::StreamingRepository) and discarded as soon as
//! they are drained.
//!
//! ## Key Features
//!
//! - **Concurrent resources**: `take` is one critical section, so many threads
//!   can drain the same resource without duplicates or gaps
//! - **Lazy timeline**: buckets are fetched or default-built only when reached
//! - **Rollover**: unfinished commitments move forward automatically, with
//!   per-event reschedule callbacks
//! - **Pluggable storage**: any backend implementing the repository contract
//! - **Failure isolation**: driver loops hand items out one by one and keep
//!   going when a handler fails
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use cart_track::core::{Resource, ScheduledEvent, Track};
//! use cart_track::infra::InMemoryRepository;
//!
//! let mut track = Track::with_repository(Arc::new(InMemoryRepository::<&str>::new()));
//! track.schedule(ScheduledEvent::new(2, Resource::from_vec(vec!["a", "b"]))).unwrap();
//!
//! let mut delivered = Vec::new();
//! while !track.is_empty() {
//!     if let Some(frame) = track.next_frame().unwrap() {
//!         delivered.extend(frame);
//!     }
//! }
//! assert_eq!(delivered, vec!["a", "b"]);
//! assert_eq!(track.position(), 4);
//! ```
//!
//! For complete scenarios, see `tests/track_test.rs`.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core scheduling abstractions: resources, buckets, commitments and the track.
pub mod core;
/// Configuration models for tracks and storage backends.
pub mod config;
/// Builders to construct tracks from configuration.
pub mod builders;
/// Infrastructure adapters for bucket storage.
pub mod infra;
/// Driving loops and the scheduler handle.
pub mod runtime;
/// Shared utilities.
pub mod util;
