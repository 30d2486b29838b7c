//! Tests for error types

use cart_track::core::TrackError;

#[test]
fn test_invalid_state_error() {
    let err = TrackError::InvalidState("event exhausted".to_string());
    assert_eq!(format!("{}", err), "invalid state: event exhausted");
}

#[test]
fn test_backend_error() {
    let err = TrackError::Backend("connection failed".to_string());
    assert_eq!(format!("{}", err), "backend error: connection failed");
}

#[test]
fn test_invalid_config_error() {
    let err = TrackError::InvalidConfig("frame_width must be greater than 0".to_string());
    assert_eq!(
        format!("{}", err),
        "invalid configuration: frame_width must be greater than 0"
    );
}

#[test]
fn test_converts_into_anyhow() {
    let result: cart_track::core::AppResult<()> = Err(TrackError::Backend("down".into()).into());
    let err = result.unwrap_err();
    assert!(err.downcast_ref::<TrackError>().is_some());
}
