//! The playback-time poll timer.
//!
//! A tracker is a background task that feeds [`ControllerInput::Tick`] into
//! the controller's inbox at a fixed period. Cancellation is signalled by
//! closing a channel, so the task notices it without polling a flag.

use crate::ControllerInput;
use async_channel::{Receiver, Sender};
use std::time::Duration;
use tokio::time::MissedTickBehavior;

/// Owned handle of a running poll timer.
///
/// The timer stops when the handle is dropped or [`cancel`](Self::cancel)
/// is called.
#[derive(Debug)]
pub struct PlaybackTracker {
    cancel: Sender<()>,
    cancelled: TrackerCancellation,
    period: Duration,
}

impl PlaybackTracker {
    /// Spawn a timer that sends a tick to `inbox` every `period`.
    ///
    /// The first tick arrives one full period after spawning. Must be called
    /// from within a Tokio runtime.
    pub(crate) fn spawn(period: Duration, inbox: Sender<ControllerInput>) -> Self {
        let (cancel, receiver) = async_channel::bounded(1);
        let cancelled = TrackerCancellation { receiver };
        let watch = cancelled.clone();

        tokio::spawn(async move {
            let mut ticks = tokio::time::interval(period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // interval() completes its first tick immediately
            ticks.tick().await;
            loop {
                tokio::select! {
                    () = watch.wait() => break,
                    _ = ticks.tick() => {
                        if inbox.send(ControllerInput::Tick).await.is_err() {
                            break;
                        }
                    }
                }
            }
            log::debug!("playback tracker stopped");
        });

        Self {
            cancel,
            cancelled,
            period,
        }
    }

    /// Period between ticks.
    #[must_use]
    pub const fn period(&self) -> Duration {
        self.period
    }

    /// Watcher that observes when this timer is cancelled.
    #[must_use]
    pub fn cancellation(&self) -> TrackerCancellation {
        self.cancelled.clone()
    }

    /// Stop the timer.
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for PlaybackTracker {
    fn drop(&mut self) {
        self.cancel.close();
    }
}

/// Observes the cancellation of one [`PlaybackTracker`].
#[derive(Debug, Clone)]
pub struct TrackerCancellation {
    receiver: Receiver<()>,
}

impl TrackerCancellation {
    /// Check if the timer was cancelled (non-blocking).
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.receiver.is_closed()
    }

    /// Wait until the timer is cancelled.
    pub async fn wait(&self) {
        // recv only errors once the sender side is closed
        let _ = self.receiver.recv().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ticks_until_cancelled() {
        let (inbox, inputs) = async_channel::unbounded();
        let tracker = PlaybackTracker::spawn(Duration::from_millis(5), inbox);
        let cancellation = tracker.cancellation();

        let first = tokio::time::timeout(Duration::from_secs(2), inputs.recv())
            .await
            .expect("tick within timeout")
            .unwrap();
        assert!(matches!(first, ControllerInput::Tick));
        assert!(!cancellation.is_cancelled());

        tracker.cancel();
        assert!(cancellation.is_cancelled());
        tokio::time::timeout(Duration::from_secs(2), cancellation.wait())
            .await
            .expect("wait returns after cancel");
    }

    async fn wait_for_exit(inputs: &async_channel::Receiver<ControllerInput>) {
        // the task owns the only sender, so the count drops when it returns
        tokio::time::timeout(Duration::from_secs(2), async {
            while inputs.sender_count() > 0 {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("tracker task exited");
    }

    #[tokio::test]
    async fn task_exits_after_cancel() {
        let (inbox, inputs) = async_channel::unbounded();
        let tracker = PlaybackTracker::spawn(Duration::from_millis(5), inbox);
        assert_eq!(inputs.sender_count(), 1);

        tracker.cancel();
        wait_for_exit(&inputs).await;
    }

    #[tokio::test]
    async fn task_exits_when_inbox_closes() {
        let (inbox, inputs) = async_channel::unbounded();
        let tracker = PlaybackTracker::spawn(Duration::from_millis(5), inbox);
        let cancellation = tracker.cancellation();
        inputs.close();

        wait_for_exit(&inputs).await;
        assert!(!cancellation.is_cancelled());
        drop(tracker);
    }
}
