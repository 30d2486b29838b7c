//! Tests for configuration validation

use cart_track::config::{RepositoryBackendConfig, SchedulerConfig, TrackConfig};

#[test]
fn test_track_config_defaults() {
    let cfg = TrackConfig::default();
    assert_eq!(cfg.frame_width, 1);
    assert_eq!(cfg.reschedule_increment, 1);
    assert_eq!(cfg.audit_capacity, None);
    assert_eq!(cfg.repository, RepositoryBackendConfig::InMemory);
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_track_config_invalid_frame_width() {
    let invalid = TrackConfig {
        frame_width: 0,
        ..TrackConfig::default()
    };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_track_config_invalid_increment() {
    let invalid = TrackConfig {
        reschedule_increment: 0,
        ..TrackConfig::default()
    };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_track_config_invalid_audit_capacity() {
    let invalid = TrackConfig {
        audit_capacity: Some(0),
        ..TrackConfig::default()
    };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_scheduler_config_empty_tracks() {
    let config = SchedulerConfig {
        tracks: std::collections::HashMap::new(),
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_scheduler_config_from_json() {
    let json = r#"{
        "tracks": {
            "deliveries": {
                "frame_width": 2,
                "reschedule_increment": 3,
                "audit_capacity": 100,
                "repository": "in_memory"
            },
            "drivers": {}
        }
    }"#;

    let config = SchedulerConfig::from_json_str(json).expect("valid config");
    assert_eq!(config.tracks["deliveries"].frame_width, 2);
    assert_eq!(config.tracks["deliveries"].reschedule_increment, 3);
    assert_eq!(config.tracks["deliveries"].audit_capacity, Some(100));
    assert_eq!(config.tracks["drivers"], TrackConfig::default());
}

#[test]
fn test_scheduler_config_rejects_invalid_track() {
    let json = r#"{ "tracks": { "bad": { "frame_width": 0 } } }"#;
    let err = SchedulerConfig::from_json_str(json).unwrap_err();
    assert!(err.contains("bad"));
}

#[test]
fn test_track_config_from_env() {
    use cart_track::config::{ENV_AUDIT_CAPACITY, ENV_FRAME_WIDTH, ENV_RESCHEDULE_INCREMENT};

    std::env::set_var(ENV_FRAME_WIDTH, "4");
    std::env::set_var(ENV_RESCHEDULE_INCREMENT, " 2 ");
    std::env::set_var(ENV_AUDIT_CAPACITY, "16");
    let cfg = TrackConfig::from_env().expect("env config");
    assert_eq!(cfg.frame_width, 4);
    assert_eq!(cfg.reschedule_increment, 2);
    assert_eq!(cfg.audit_capacity, Some(16));

    std::env::set_var(ENV_FRAME_WIDTH, "wide");
    assert!(TrackConfig::from_env().is_err());
    std::env::set_var(ENV_FRAME_WIDTH, "0");
    assert!(TrackConfig::from_env().is_err());

    std::env::remove_var(ENV_FRAME_WIDTH);
    std::env::remove_var(ENV_RESCHEDULE_INCREMENT);
    std::env::remove_var(ENV_AUDIT_CAPACITY);
}
