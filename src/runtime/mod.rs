//! Driving loops that advance tracks and hand frames to callers.

pub mod driver;
pub mod scheduler;
#[cfg(feature = "tokio-runtime")]
pub mod ticker;

pub use driver::{dispatch_frame, drive_until_empty, DriveReport, FrameHandler};
pub use scheduler::Scheduler;
#[cfg(feature = "tokio-runtime")]
pub use ticker::{AsyncFrameHandler, Ticker};
