//! Tests for audit sinks

use cart_track::core::{
    build_audit_event, AuditAction, AuditSink, InMemoryAuditSink, SharedAuditSink,
};

#[test]
fn test_in_memory_audit_sink() {
    let mut sink = InMemoryAuditSink::new(10);

    let event = build_audit_event("main", AuditAction::Schedule, Some(1), 5, 0, None);
    sink.record(event);
    assert_eq!(sink.events().len(), 1);

    let events = sink.events();
    assert_eq!(events[0].track, "main");
    assert_eq!(events[0].event_id, Some(1));
    assert_eq!(events[0].bucket, 5);
    assert_eq!(events[0].action, AuditAction::Schedule);
}

#[test]
fn test_audit_sink_overflow() {
    let mut sink = InMemoryAuditSink::new(2);

    sink.record(build_audit_event("main", AuditAction::Schedule, Some(1), 1, 0, None));
    sink.record(build_audit_event("main", AuditAction::Schedule, Some(2), 1, 0, None));
    sink.record(build_audit_event("main", AuditAction::Retire, Some(1), 1, 1, None));

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].event_id, Some(2)); // First one popped
    assert_eq!(events[1].action, AuditAction::Retire);
}

#[test]
fn test_shared_sink_clones_see_same_buffer() {
    let sink = SharedAuditSink::new(4);
    let mut writer = sink.clone();
    writer.record(build_audit_event("main", AuditAction::Drain, None, 3, 3, Some("items=2".into())));

    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].payload.as_deref(), Some("items=2"));
    assert!(events[0].created_at_ms > 0);
}

#[test]
fn test_audit_action_serializes_snake_case() {
    let json = serde_json::to_string(&AuditAction::Rollover).unwrap();
    assert_eq!(json, "\"rollover\"");
}
