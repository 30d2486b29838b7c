//! Tests for utility functions

use cart_track::util::{init_tracing, now_ms, random_event_id};

#[test]
fn test_now_ms_is_monotonic_enough() {
    let a = now_ms();
    let b = now_ms();
    assert!(a > 0);
    assert!(b >= a);
}

#[test]
fn test_random_event_ids_are_distinct() {
    let ids: std::collections::HashSet<u64> = (0..100).map(|_| random_event_id()).collect();
    assert_eq!(ids.len(), 100);
}

#[test]
fn test_init_tracing_is_idempotent() {
    init_tracing();
    init_tracing();
}
