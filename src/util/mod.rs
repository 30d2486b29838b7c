//! Shared utilities.

pub mod clock;
pub mod ids;
pub mod telemetry;

pub use clock::now_ms;
pub use ids::random_event_id;
pub use telemetry::{init_tracing, init_tracing_with};
