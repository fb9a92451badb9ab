// SPDX-License-Identifier: MPL-2.0
//! Cancellable timers and background tasks.
//!
//! Every task spawned through a [`Scheduler`] races against a child of the
//! scheduler's root [`CancellationToken`]. Cancelling a single
//! [`ScheduledTask`] stops that task; [`Scheduler::shutdown`] stops all of
//! them, including tasks scheduled after the shutdown (they start cancelled).
//! Cancellation is idempotent at both levels.
//!
//! Tasks are spawned with [`tokio::spawn`], so a runtime must be running.

use std::future::Future;
use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Stand-in deadline for delays too large to add to the current instant.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Handle to a task started by a [`Scheduler`].
///
/// Dropping the handle does not cancel the task.
#[derive(Debug, Clone)]
pub struct ScheduledTask {
    token: CancellationToken,
}

impl ScheduledTask {
    /// Cancels the task. Calling this more than once is a no-op.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Spawns one-shot timers, interval loops and long-running listeners that
/// share a single teardown switch.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    root: CancellationToken,
}

impl Scheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `future` until it completes or the task is cancelled.
    pub fn spawn<F>(&self, future: F) -> ScheduledTask
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let token = self.root.child_token();
        let task_token = token.clone();
        tokio::spawn(async move {
            tokio::select! {
                biased;
                () = task_token.cancelled() => {}
                () = future => {}
            }
        });
        ScheduledTask { token }
    }

    /// Runs `future` once `delay` has elapsed, unless cancelled first.
    ///
    /// The deadline is fixed when this is called, not when the task is first polled.
    /// Delays that overflow the clock are capped at roughly thirty years.
    pub fn after<F>(&self, delay: Duration, future: F) -> ScheduledTask
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let now = Instant::now();
        let deadline = now
            .checked_add(delay)
            .unwrap_or_else(|| now + FAR_FUTURE);
        self.spawn(async move {
            tokio::time::sleep_until(deadline).await;
            future.await;
        })
    }

    /// Calls `tick` immediately and then once every `period`.
    ///
    /// A tick that overruns the period delays the next one instead of
    /// triggering a burst of catch-up calls.
    pub fn every<F, Fut>(&self, period: Duration, mut tick: F) -> ScheduledTask
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let period = period.max(Duration::from_millis(1));
        self.spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                tick().await;
            }
        })
    }

    /// Cancels every task spawned by this scheduler or its clones.
    pub fn shutdown(&self) {
        self.root.cancel();
    }

    #[must_use]
    pub fn is_shut_down(&self) -> bool {
        self.root.is_cancelled()
    }
}
