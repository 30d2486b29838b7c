//! Track and scheduler configuration structures.

use std::collections::HashMap;
use std::env;

use serde::{Deserialize, Serialize};

use crate::core::{TrackError, DEFAULT_FRAME_WIDTH};

/// Environment variable overriding [`TrackConfig::frame_width`].
pub const ENV_FRAME_WIDTH: &str = "CART_TRACK_FRAME_WIDTH";
/// Environment variable overriding [`TrackConfig::reschedule_increment`].
pub const ENV_RESCHEDULE_INCREMENT: &str = "CART_TRACK_RESCHEDULE_INCREMENT";
/// Environment variable overriding [`TrackConfig::audit_capacity`].
pub const ENV_AUDIT_CAPACITY: &str = "CART_TRACK_AUDIT_CAPACITY";

/// Repository backend selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepositoryBackendConfig {
    /// In-memory bucket store.
    #[default]
    InMemory,
}

/// Track configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackConfig {
    /// Items drained from each event per frame.
    pub frame_width: usize,
    /// Default rollover step for events without a reschedule callback.
    pub reschedule_increment: u64,
    /// Bounded audit buffer size; no audit sink when absent.
    pub audit_capacity: Option<usize>,
    /// Repository backend selection.
    pub repository: RepositoryBackendConfig,
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            frame_width: DEFAULT_FRAME_WIDTH,
            reschedule_increment: 1,
            audit_capacity: None,
            repository: RepositoryBackendConfig::InMemory,
        }
    }
}

impl TrackConfig {
    /// Validate track configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.frame_width == 0 {
            return Err("frame_width must be greater than 0".into());
        }
        if self.reschedule_increment == 0 {
            return Err("reschedule_increment must be greater than 0".into());
        }
        if self.audit_capacity == Some(0) {
            return Err("audit_capacity must be greater than 0 when set".into());
        }
        Ok(())
    }

    /// Build a configuration from the process environment, loading a `.env`
    /// file first if one exists. Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, TrackError> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                return Err(TrackError::InvalidConfig(format!(".env load failed: {e}")));
            }
        }

        let mut cfg = Self::default();
        if let Some(width) = parse_var(ENV_FRAME_WIDTH)? {
            cfg.frame_width = width;
        }
        if let Some(increment) = parse_var(ENV_RESCHEDULE_INCREMENT)? {
            cfg.reschedule_increment = increment;
        }
        cfg.audit_capacity = parse_var(ENV_AUDIT_CAPACITY)?.or(cfg.audit_capacity);
        cfg.validate().map_err(TrackError::InvalidConfig)?;
        Ok(cfg)
    }
}

fn parse_var<N: std::str::FromStr>(name: &str) -> Result<Option<N>, TrackError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| TrackError::InvalidConfig(format!("{name}: cannot parse `{raw}`"))),
        Err(_) => Ok(None),
    }
}

/// Root scheduler configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Map of track name to configuration.
    pub tracks: HashMap<String, TrackConfig>,
}

impl SchedulerConfig {
    /// Validate all tracks and ensure at least one track exists.
    pub fn validate(&self) -> Result<(), String> {
        if self.tracks.is_empty() {
            return Err("at least one track must be defined".into());
        }
        for (name, track) in &self.tracks {
            track
                .validate()
                .map_err(|e| format!("track `{name}` invalid: {e}"))?;
        }
        Ok(())
    }

    /// Parse scheduler configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: SchedulerConfig =
            serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }
}
