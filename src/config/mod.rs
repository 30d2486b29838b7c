//! Configuration models for tracks and their storage backends.

pub mod track;

pub use track::{
    RepositoryBackendConfig, SchedulerConfig, TrackConfig, ENV_AUDIT_CAPACITY, ENV_FRAME_WIDTH,
    ENV_RESCHEDULE_INCREMENT,
};
