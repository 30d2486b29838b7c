//! Interval-driven track ticker on a tokio runtime.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::MissedTickBehavior;

use crate::core::{AppResult, Cart, CartId, ScheduledEvent, StreamingRepository, Track, TrackError};
use crate::runtime::driver::has_work;
use crate::runtime::DriveReport;

/// Asynchronous consumer of delivered items.
#[async_trait]
pub trait AsyncFrameHandler<T>: Send
where
    T: Send + 'static,
{
    /// Handle one item delivered from `bucket`.
    async fn handle(&mut self, bucket: CartId, item: T) -> AppResult<()>;
}

/// Advances a track by one bucket per interval tick.
#[derive(Debug, Clone, Copy)]
pub struct Ticker {
    period: Duration,
    max_frames: Option<u64>,
}

impl Ticker {
    /// Create a ticker that fires every `period`.
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            max_frames: None,
        }
    }

    /// Stop after `max_frames` frames even if the track is not empty.
    #[must_use]
    pub fn with_max_frames(mut self, max_frames: u64) -> Self {
        self.max_frames = Some(max_frames);
        self
    }

    /// Tick period.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Drive `track` until its repository is empty with no deferred work,
    /// nothing is pending, or the frame cap is reached. Failing items are logged and counted without
    /// aborting the rest of their frame.
    pub async fn run<T, R, H>(
        &self,
        track: &mut Track<T, R>,
        handler: &mut H,
    ) -> Result<DriveReport, TrackError>
    where
        T: Send + 'static,
        R: StreamingRepository<Arc<Cart<T>>, Commitment = ScheduledEvent<T>>,
        H: AsyncFrameHandler<T> + ?Sized,
    {
        let mut interval = tokio::time::interval(self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut report = DriveReport::default();

        while has_work(track) {
            if self.max_frames.is_some_and(|max| report.frames >= max) {
                break;
            }
            interval.tick().await;

            let bucket = track.position();
            let Some(frame) = track.next_frame()? else {
                break;
            };
            report.frames += 1;
            for item in frame {
                report.record_item(bucket, handler.handle(bucket, item).await);
            }
        }
        tracing::info!(
            track = %track.name(),
            frames = report.frames,
            delivered = report.delivered,
            failed = report.failed,
            "ticker finished"
        );
        Ok(report)
    }
}
