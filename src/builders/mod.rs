//! Builders to construct tracks from configuration.

pub mod track_builder;

pub use track_builder::{build_tracks, TrackBuilder};
