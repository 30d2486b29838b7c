//! Builders to construct tracks from configuration.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::{SchedulerConfig, TrackConfig};
use crate::core::{
    Cart, ScheduledEvent, SharedAuditSink, StreamingRepository, Track, TrackError,
};

/// Builds a single named track from its configuration.
#[derive(Debug, Clone)]
pub struct TrackBuilder {
    name: String,
    config: TrackConfig,
}

impl TrackBuilder {
    /// Create a builder for track `name`.
    pub fn new(name: impl Into<String>, config: TrackConfig) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }

    /// Track name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Track configuration.
    pub fn config(&self) -> &TrackConfig {
        &self.config
    }

    /// Build a track over `repository`, with empty buckets built by
    /// [`Cart::shared`].
    pub fn build<T, R>(&self, repository: Arc<R>) -> Result<Track<T, R>, TrackError>
    where
        T: 'static,
        R: StreamingRepository<Arc<Cart<T>>, Commitment = ScheduledEvent<T>>,
    {
        self.build_with_audit(repository).map(|(track, _)| track)
    }

    /// Like [`build`](Self::build), also returning a handle to the audit
    /// buffer when `audit_capacity` is set.
    pub fn build_with_audit<T, R>(
        &self,
        repository: Arc<R>,
    ) -> Result<(Track<T, R>, Option<SharedAuditSink>), TrackError>
    where
        T: 'static,
        R: StreamingRepository<Arc<Cart<T>>, Commitment = ScheduledEvent<T>>,
    {
        self.config.validate().map_err(|e| {
            TrackError::InvalidConfig(format!("track `{}` invalid: {e}", self.name))
        })?;

        let mut track = Track::with_repository(repository)
            .with_name(self.name.clone())
            .with_frame_width(self.config.frame_width)
            .with_reschedule_increment(self.config.reschedule_increment);
        let audit = self.config.audit_capacity.map(SharedAuditSink::new);
        if let Some(sink) = &audit {
            track = track.with_audit(Box::new(sink.clone()));
        }
        tracing::debug!(track = %self.name, config = ?self.config, "track built");
        Ok((track, audit))
    }
}

/// Build every track in the scheduler configuration, each over the repository
/// returned by `repository_factory`.
pub fn build_tracks<T, R, FR>(
    cfg: &SchedulerConfig,
    mut repository_factory: FR,
) -> Result<HashMap<String, Track<T, R>>, TrackError>
where
    T: 'static,
    R: StreamingRepository<Arc<Cart<T>>, Commitment = ScheduledEvent<T>>,
    FR: FnMut(&str, &TrackConfig) -> Result<Arc<R>, TrackError>,
{
    cfg.validate().map_err(TrackError::InvalidConfig)?;

    let mut tracks = HashMap::new();
    for (name, track_cfg) in &cfg.tracks {
        let repository = repository_factory(name, track_cfg)?;
        let track = TrackBuilder::new(name.clone(), track_cfg.clone()).build(repository)?;
        tracks.insert(name.clone(), track);
    }

    Ok(tracks)
}
