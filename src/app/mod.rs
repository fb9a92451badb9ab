// SPDX-License-Identifier: MPL-2.0
//! Composition root.
//!
//! `App` owns the one scheduler, toast queue and notification store of a UI
//! session, wires the store's arrival detection to the toast bridge, and
//! starts the poller. The host UI receives the `App` (or clones of its
//! handles) explicitly instead of reaching for a global.
//!
//! Dropping the `App`, or calling [`App::shutdown`], cancels the poll
//! interval, the visibility listener, pending arrival checks and toast timers.

mod poller;
mod visibility;

pub use poller::Poller;
pub use visibility::Visibility;

use crate::application::clock::Clock;
use crate::application::port::NotificationApi;
use crate::application::scheduler::Scheduler;
use crate::application::store::{NotificationStore, StoreSettings};
use crate::config::{Config, DEFAULT_POLL_INTERVAL_SECS};
use crate::ui::notifications::{ToastBridge, ToastQueue};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Timing configuration for an [`App`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppSettings {
    pub poll_interval: Duration,
    pub store: StoreSettings,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            store: StoreSettings::default(),
        }
    }
}

impl AppSettings {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            poll_interval: config.poll_interval(),
            ..Self::default()
        }
    }
}

/// The notification services of one UI session.
pub struct App {
    scheduler: Scheduler,
    toasts: ToastQueue,
    store: NotificationStore,
    poller: Poller,
    visibility: watch::Sender<Visibility>,
}

impl App {
    /// Builds the services and starts polling. Must be called inside a tokio runtime.
    pub fn start(api: Arc<dyn NotificationApi>, clock: Arc<dyn Clock>, settings: AppSettings) -> Self {
        let scheduler = Scheduler::new();
        let toasts = ToastQueue::new(scheduler.clone());
        let bridge = Arc::new(ToastBridge::new(toasts.clone()));
        let store = NotificationStore::with_listener(
            api,
            clock,
            scheduler.clone(),
            settings.store,
            bridge,
        );
        let (visibility, visibility_rx) = watch::channel(Visibility::Visible);
        let poller = Poller::start(
            store.clone(),
            &scheduler,
            settings.poll_interval,
            visibility_rx,
        );

        Self {
            scheduler,
            toasts,
            store,
            poller,
            visibility,
        }
    }

    #[must_use]
    pub fn store(&self) -> &NotificationStore {
        &self.store
    }

    #[must_use]
    pub fn toasts(&self) -> &ToastQueue {
        &self.toasts
    }

    /// Reports a foreground/background change from the host UI.
    pub fn set_visibility(&self, visibility: Visibility) {
        self.visibility.send_replace(visibility);
    }

    /// Cancels every background task and clears the toast stack. Safe to call more than once.
    pub fn shutdown(&self) {
        if !self.scheduler.is_shut_down() {
            tracing::info!("notification services shutting down");
        }
        self.poller.stop();
        self.scheduler.shutdown();
        self.toasts.clear();
    }

    #[must_use]
    pub fn is_shut_down(&self) -> bool {
        self.scheduler.is_shut_down()
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("store", &self.store)
            .field("toasts", &self.toasts.len())
            .field("shut_down", &self.is_shut_down())
            .finish()
    }
}
