//! Tests for builder modules

use std::sync::Arc;

use cart_track::builders::{build_tracks, TrackBuilder};
use cart_track::config::{SchedulerConfig, TrackConfig};
use cart_track::core::{AuditAction, Resource, ScheduledEvent, Track, TrackError};
use cart_track::infra::InMemoryRepository;

#[test]
fn test_track_builder_applies_config() {
    let config = TrackConfig {
        frame_width: 3,
        reschedule_increment: 2,
        ..TrackConfig::default()
    };

    let builder = TrackBuilder::new("deliveries", config);
    assert_eq!(builder.name(), "deliveries");
    assert_eq!(builder.config().frame_width, 3);

    let track: Track<u32, _> = builder
        .build(Arc::new(InMemoryRepository::<u32>::new()))
        .unwrap();
    assert_eq!(track.name(), "deliveries");
    assert_eq!(track.frame_width(), 3);
    assert_eq!(track.reschedule_increment(), 2);
}

#[test]
fn test_track_builder_rejects_invalid_config() {
    let config = TrackConfig {
        frame_width: 0,
        ..TrackConfig::default()
    };
    let result = TrackBuilder::new("bad", config)
        .build::<u32, _>(Arc::new(InMemoryRepository::<u32>::new()));
    assert!(matches!(result, Err(TrackError::InvalidConfig(_))));
}

#[test]
fn test_track_builder_wires_audit() {
    let config = TrackConfig {
        audit_capacity: Some(16),
        ..TrackConfig::default()
    };
    let (mut track, audit) = TrackBuilder::new("audited", config)
        .build_with_audit::<u32, _>(Arc::new(InMemoryRepository::<u32>::new()))
        .unwrap();
    let audit = audit.expect("audit sink");

    track.schedule(ScheduledEvent::new(1, Resource::single(5))).unwrap();
    track.next_frame().unwrap();
    track.next_frame().unwrap();

    let actions: Vec<AuditAction> = audit.events().iter().map(|e| e.action).collect();
    assert_eq!(
        actions,
        vec![
            AuditAction::Schedule,
            AuditAction::Drain,
            AuditAction::Retire,
            AuditAction::Drain
        ]
    );
    assert!(audit.events().iter().all(|e| e.track == "audited"));
}

#[test]
fn test_build_tracks_from_config() {
    let json = r#"{ "tracks": { "a": {}, "b": { "frame_width": 4 } } }"#;
    let cfg = SchedulerConfig::from_json_str(json).unwrap();

    let tracks = build_tracks::<u32, _, _>(&cfg, |_, _| {
        Ok(Arc::new(InMemoryRepository::<u32>::new()))
    })
    .unwrap();
    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks["a"].frame_width(), 1);
    assert_eq!(tracks["b"].frame_width(), 4);
    assert_eq!(tracks["b"].name(), "b");
}

#[test]
fn test_build_tracks_propagates_factory_error() {
    let json = r#"{ "tracks": { "a": {} } }"#;
    let cfg = SchedulerConfig::from_json_str(json).unwrap();

    let result = build_tracks::<u32, InMemoryRepository<u32>, _>(&cfg, |name, _| {
        Err(TrackError::Backend(format!("no storage for {name}")))
    });
    assert!(matches!(result, Err(TrackError::Backend(_))));
}
