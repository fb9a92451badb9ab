// SPDX-License-Identifier: MPL-2.0
//! Background refresh driver.
//!
//! Refreshes the store once on start, then on a fixed interval, and again
//! whenever the host UI comes back to the foreground.

use super::visibility::Visibility;
use crate::application::scheduler::{ScheduledTask, Scheduler};
use crate::application::store::NotificationStore;
use std::time::Duration;
use tokio::sync::watch;

/// Handles to the two polling tasks.
#[derive(Debug)]
pub struct Poller {
    interval: ScheduledTask,
    visibility: ScheduledTask,
}

impl Poller {
    /// Starts polling `store` every `period` and on every hidden→visible transition.
    pub fn start(
        store: NotificationStore,
        scheduler: &Scheduler,
        period: Duration,
        mut visibility: watch::Receiver<Visibility>,
    ) -> Self {
        let ticking = store.clone();
        let interval = scheduler.every(period, move || {
            let store = ticking.clone();
            async move { store.refresh().await }
        });

        let visibility = scheduler.spawn(async move {
            let mut last = *visibility.borrow_and_update();
            while visibility.changed().await.is_ok() {
                let current = *visibility.borrow_and_update();
                let regained = current.is_visible() && !last.is_visible();
                last = current;
                if regained {
                    tracing::debug!("ui visible again, refreshing notifications");
                    store.refresh().await;
                }
            }
        });

        tracing::info!(interval_secs = period.as_secs(), "notification polling started");
        Self {
            interval,
            visibility,
        }
    }

    /// Stops both the interval and the visibility listener. Idempotent.
    pub fn stop(&self) {
        self.interval.cancel();
        self.visibility.cancel();
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.interval.is_cancelled() && self.visibility.is_cancelled()
    }
}
