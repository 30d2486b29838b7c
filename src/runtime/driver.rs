//! Synchronous frame driver.
//!
//! Items of a frame are handed to the handler one at a time. A failing item
//! is logged and counted; the rest of the frame is still delivered.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::{AppResult, Cart, CartId, ScheduledEvent, StreamingRepository, Track, TrackError};

/// Consumer of delivered items.
pub trait FrameHandler<T> {
    /// Handle one item delivered from `bucket`.
    fn handle(&mut self, bucket: CartId, item: T) -> AppResult<()>;
}

impl<T, F> FrameHandler<T> for F
where
    F: FnMut(CartId, T) -> AppResult<()>,
{
    fn handle(&mut self, bucket: CartId, item: T) -> AppResult<()> {
        self(bucket, item)
    }
}

/// Outcome of a driving loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveReport {
    /// Frames produced.
    pub frames: u64,
    /// Items handled successfully.
    pub delivered: u64,
    /// Items whose handler returned an error.
    pub failed: u64,
}

impl DriveReport {
    /// Count the outcome of handing one item from `bucket` to a handler. A
    /// failure is logged and counted; it never stops the frame.
    pub fn record_item(&mut self, bucket: CartId, outcome: AppResult<()>) {
        match outcome {
            Ok(()) => self.delivered += 1,
            Err(e) => {
                self.failed += 1;
                tracing::warn!(bucket, "frame item handler failed: {:#}", e);
            }
        }
    }
}

/// Whether a driving loop should tick `track` again.
pub(crate) fn has_work<T, R>(track: &Track<T, R>) -> bool
where
    R: StreamingRepository<Arc<Cart<T>>, Commitment = ScheduledEvent<T>>,
{
    !track.is_empty() || track.has_deferred_work()
}

/// Hand every item of `frame` to `handler`, isolating failures per item.
pub fn dispatch_frame<T, H>(bucket: CartId, frame: Vec<T>, handler: &mut H, report: &mut DriveReport)
where
    H: FrameHandler<T> + ?Sized,
{
    report.frames += 1;
    for item in frame {
        report.record_item(bucket, handler.handle(bucket, item));
    }
}

/// Tick `track` until its repository is empty with no deferred work,
/// nothing is pending, or `max_frames` frames have been produced.
pub fn drive_until_empty<T, R, H>(
    track: &mut Track<T, R>,
    handler: &mut H,
    max_frames: Option<u64>,
) -> Result<DriveReport, TrackError>
where
    R: StreamingRepository<Arc<Cart<T>>, Commitment = ScheduledEvent<T>>,
    H: FrameHandler<T> + ?Sized,
{
    let mut report = DriveReport::default();
    while has_work(track) {
        if max_frames.is_some_and(|max| report.frames >= max) {
            tracing::debug!(track = %track.name(), frames = report.frames, "frame cap reached");
            break;
        }
        let bucket = track.position();
        match track.next_frame()? {
            Some(frame) => dispatch_frame(bucket, frame, handler, &mut report),
            None => {
                tracing::debug!(track = %track.name(), "no pending commitments, stopping");
                break;
            }
        }
    }
    tracing::info!(
        track = %track.name(),
        frames = report.frames,
        delivered = report.delivered,
        failed = report.failed,
        "drive finished"
    );
    Ok(report)
}
