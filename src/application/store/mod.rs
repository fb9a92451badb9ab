// SPDX-License-Identifier: MPL-2.0
//! Notification store.
//!
//! Holds the unread count and notification list, keeps them in sync with the
//! backend, and tells an [`ArrivalListener`] when a genuinely new notification
//! shows up.
//!
//! Consistency model: mutations are applied optimistically and rolled back if
//! the server rejects them; refreshes replace the whole list and count. Two
//! concurrent refreshes resolve last-write-wins. Backend failures are logged
//! and never reach the caller as errors.

mod detection;

pub use detection::ArrivalDetector;

use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;

use crate::application::clock::Clock;
use crate::application::port::{ApiError, NotificationApi};
use crate::application::scheduler::Scheduler;
use crate::config::defaults;
use crate::domain::notification::{
    dedup_by_id, NotificationId, NotificationRecord, UnreadCount,
};

/// Receives the notification chosen by one detection cycle.
pub trait ArrivalListener: Send + Sync {
    fn on_arrival(&self, record: &NotificationRecord);
}

/// Timing knobs for the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreSettings {
    /// Delay between spotting a count increase and fetching the list to inspect it.
    pub settle_delay: Duration,
    /// Minimum time between two arrival toasts.
    pub rate_limit: Duration,
    /// How old a notification may be and still count as a new arrival.
    pub brand_new_window: Duration,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_millis(defaults::DEFAULT_SETTLE_DELAY_MS),
            rate_limit: Duration::from_secs(defaults::DEFAULT_TOAST_RATE_LIMIT_SECS),
            brand_new_window: Duration::from_secs(defaults::DEFAULT_BRAND_NEW_WINDOW_SECS),
        }
    }
}

/// Read-only view of the store handed to consumers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationState {
    pub unread_count: u32,
    pub notifications: Vec<NotificationRecord>,
    pub loading: bool,
}

#[derive(Debug)]
struct StoreState {
    unread: UnreadCount,
    notifications: Vec<NotificationRecord>,
    refreshes_in_flight: usize,
    detector: ArrivalDetector,
}

impl StoreState {
    fn view(&self) -> NotificationState {
        NotificationState {
            unread_count: self.unread.value(),
            notifications: self.notifications.clone(),
            loading: self.refreshes_in_flight > 0,
        }
    }

    fn find_mut(&mut self, id: NotificationId) -> Option<&mut NotificationRecord> {
        self.notifications.iter_mut().find(|record| record.id == id)
    }

    fn set_unread(&mut self, unread: UnreadCount) {
        self.unread = unread;
        self.detector.rebase(unread);
    }
}

struct StoreInner {
    api: Arc<dyn NotificationApi>,
    clock: Arc<dyn Clock>,
    scheduler: Scheduler,
    listener: Option<Arc<dyn ArrivalListener>>,
    settings: StoreSettings,
    state: Mutex<StoreState>,
    changes: watch::Sender<NotificationState>,
}

/// Shared handle to the notification store. Clones share state.
#[derive(Clone)]
pub struct NotificationStore {
    inner: Arc<StoreInner>,
}

impl std::fmt::Debug for NotificationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationStore")
            .field("state", &*self.inner.state.lock())
            .field("settings", &self.inner.settings)
            .finish_non_exhaustive()
    }
}

impl NotificationStore {
    /// Creates an empty store. Nothing is fetched until [`Self::refresh`] runs.
    pub fn new(
        api: Arc<dyn NotificationApi>,
        clock: Arc<dyn Clock>,
        scheduler: Scheduler,
        settings: StoreSettings,
    ) -> Self {
        Self::build(api, clock, scheduler, settings, None)
    }

    /// Creates a store that reports arrivals to `listener`.
    pub fn with_listener(
        api: Arc<dyn NotificationApi>,
        clock: Arc<dyn Clock>,
        scheduler: Scheduler,
        settings: StoreSettings,
        listener: Arc<dyn ArrivalListener>,
    ) -> Self {
        Self::build(api, clock, scheduler, settings, Some(listener))
    }

    fn build(
        api: Arc<dyn NotificationApi>,
        clock: Arc<dyn Clock>,
        scheduler: Scheduler,
        settings: StoreSettings,
        listener: Option<Arc<dyn ArrivalListener>>,
    ) -> Self {
        let detector = ArrivalDetector::new(
            to_chrono(settings.rate_limit),
            to_chrono(settings.brand_new_window),
        );
        let (changes, _) = watch::channel(NotificationState::default());
        Self {
            inner: Arc::new(StoreInner {
                api,
                clock,
                scheduler,
                listener,
                settings,
                state: Mutex::new(StoreState {
                    unread: UnreadCount::default(),
                    notifications: Vec::new(),
                    refreshes_in_flight: 0,
                    detector,
                }),
                changes,
            }),
        }
    }

    /// Returns a copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> NotificationState {
        self.inner.state.lock().view()
    }

    /// Subscribes to state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<NotificationState> {
        self.inner.changes.subscribe()
    }

    #[must_use]
    pub fn unread_count(&self) -> u32 {
        self.inner.state.lock().unread.value()
    }

    #[must_use]
    pub fn notifications(&self) -> Vec<NotificationRecord> {
        self.inner.state.lock().notifications.clone()
    }

    /// Returns only the unread notifications, in list order.
    #[must_use]
    pub fn unread(&self) -> Vec<NotificationRecord> {
        self.inner
            .state
            .lock()
            .notifications
            .iter()
            .filter(|record| !record.is_read)
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.inner.state.lock().refreshes_in_flight > 0
    }

    /// Fetches the unread count and the list concurrently and applies whichever succeeded.
    ///
    /// A failed fetch leaves its part of the state untouched. A count increase
    /// may schedule an arrival check after the settle delay.
    pub async fn refresh(&self) {
        let _in_flight = RefreshGuard::enter(self);

        let (count, list) = tokio::join!(self.inner.api.unread_count(), self.inner.api.list());

        let schedule_check = self.update(|state| {
            match list {
                Ok(records) => state.notifications = dedup_by_id(records),
                Err(err) => log_failure("list", &err),
            }

            match count {
                Ok(count) => {
                    let count = UnreadCount::new(count);
                    state.unread = count;
                    state.detector.observe_count(count, self.inner.clock.now())
                }
                Err(err) => {
                    log_failure("unread_count", &err);
                    false
                }
            }
        });

        if schedule_check {
            self.schedule_arrival_check();
        }
    }

    /// Marks one notification read.
    ///
    /// The local record flips and the count drops by one before the server
    /// answers; both are restored if the server rejects the call. A record
    /// that is already read is left alone and no request is sent.
    pub async fn mark_as_read(&self, id: NotificationId) -> bool {
        let flipped = {
            let mut state = self.inner.state.lock();
            match state.find_mut(id) {
                Some(record) if record.is_read => return true,
                Some(record) => {
                    record.is_read = true;
                    let unread = state.unread.decremented();
                    state.set_unread(unread);
                    true
                }
                None => false,
            }
        };
        self.publish();

        match self.inner.api.mark_read(id).await {
            Ok(()) => true,
            Err(err) => {
                log_failure("mark_read", &err);
                if flipped {
                    self.update(|state| {
                        if let Some(record) = state.find_mut(id) {
                            if record.is_read {
                                record.is_read = false;
                                let unread = state.unread.incremented();
                                state.set_unread(unread);
                            }
                        }
                    });
                }
                false
            }
        }
    }

    /// Marks every notification read and zeroes the count, restoring both on failure.
    pub async fn mark_all_as_read(&self) -> bool {
        let (previous_unread, flipped) = self.update(|state| {
            let flipped: Vec<NotificationId> = state
                .notifications
                .iter_mut()
                .filter(|record| !record.is_read)
                .map(|record| {
                    record.is_read = true;
                    record.id
                })
                .collect();
            let previous = state.unread;
            state.set_unread(UnreadCount::default());
            (previous, flipped)
        });

        match self.inner.api.mark_all_read().await {
            Ok(()) => true,
            Err(err) => {
                log_failure("mark_all_read", &err);
                self.update(|state| {
                    for id in &flipped {
                        if let Some(record) = state.find_mut(*id) {
                            record.is_read = false;
                        }
                    }
                    if state.unread.is_zero() {
                        state.set_unread(previous_unread);
                    }
                });
                false
            }
        }
    }

    /// Deletes a notification once the server confirms it.
    ///
    /// Nothing changes locally until then. Deleting an unread record lowers
    /// the count by one.
    pub async fn delete_notification(&self, id: NotificationId) -> bool {
        match self.inner.api.delete(id).await {
            Ok(()) => {
                self.update(|state| {
                    if let Some(position) = state.notifications.iter().position(|r| r.id == id) {
                        let removed = state.notifications.remove(position);
                        if !removed.is_read {
                            let unread = state.unread.decremented();
                            state.set_unread(unread);
                        }
                    }
                });
                true
            }
            Err(err) => {
                log_failure("delete", &err);
                false
            }
        }
    }

    fn schedule_arrival_check(&self) {
        let store = Arc::downgrade(&self.inner);
        tracing::debug!(
            delay_ms = self.inner.settings.settle_delay.as_millis() as u64,
            "scheduling arrival check"
        );
        self.inner
            .scheduler
            .after(self.inner.settings.settle_delay, async move {
                if let Some(inner) = Weak::upgrade(&store) {
                    NotificationStore { inner }.check_arrivals().await;
                }
            });
    }

    async fn check_arrivals(&self) {
        let records = match self.inner.api.list().await {
            Ok(records) => records,
            Err(err) => {
                log_failure("arrival_check", &err);
                self.inner.state.lock().detector.abandon();
                return;
            }
        };

        let now = self.inner.clock.now();
        let chosen = self.inner.state.lock().detector.select(&records, now);

        match (chosen, &self.inner.listener) {
            (Some(record), Some(listener)) => {
                tracing::info!(id = %record.id, kind = ?record.kind, "new notification arrived");
                listener.on_arrival(&record);
            }
            (Some(record), None) => {
                tracing::debug!(id = %record.id, "new notification arrived, no listener attached");
            }
            (None, _) => tracing::debug!("count increased without a toast-worthy arrival"),
        }
    }

    /// Applies `f` under the lock, then notifies subscribers.
    fn update<R>(&self, f: impl FnOnce(&mut StoreState) -> R) -> R {
        let (result, view) = {
            let mut state = self.inner.state.lock();
            let result = f(&mut state);
            (result, state.view())
        };
        self.inner.changes.send_replace(view);
        result
    }

    fn publish(&self) {
        let view = self.inner.state.lock().view();
        self.inner.changes.send_replace(view);
    }
}

/// Counts one refresh as in flight until dropped, even if the refresh future is cancelled.
struct RefreshGuard<'a> {
    store: &'a NotificationStore,
}

impl<'a> RefreshGuard<'a> {
    fn enter(store: &'a NotificationStore) -> Self {
        store.update(|state| state.refreshes_in_flight += 1);
        Self { store }
    }
}

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        self.store.update(|state| {
            state.refreshes_in_flight = state.refreshes_in_flight.saturating_sub(1);
        });
    }
}

fn log_failure(operation: &'static str, err: &ApiError) {
    tracing::warn!(operation, error.kind = err.kind(), %err, "notification request failed");
}

fn to_chrono(duration: Duration) -> chrono::Duration {
    chrono::Duration::from_std(duration).unwrap_or(chrono::Duration::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::clock::ManualClock;
    use crate::application::port::ApiResult;
    use crate::domain::notification::NotificationKind;
    use futures_util::future::{self, BoxFuture};
    use futures_util::FutureExt;
    use crate::test_utils::{record, Endpoint, FakeApi, RecordingListener};

    struct Harness {
        api: Arc<FakeApi>,
        clock: Arc<ManualClock>,
        listener: Arc<RecordingListener>,
        store: NotificationStore,
    }

    fn harness() -> Harness {
        let api = Arc::new(FakeApi::new());
        let clock = Arc::new(ManualClock::default());
        let listener = Arc::new(RecordingListener::default());
        let store = NotificationStore::with_listener(
            api.clone(),
            clock.clone(),
            Scheduler::new(),
            StoreSettings::default(),
            listener.clone(),
        );
        Harness {
            api,
            clock,
            listener,
            store,
        }
    }

    #[tokio::test]
    async fn refresh_replaces_list_and_count() {
        let h = harness();
        let now = h.clock.now();
        let a = record(1, NotificationKind::System, now);
        let b = record(2, NotificationKind::System, now);

        h.api.set_records(vec![a.clone(), b]);
        h.store.refresh().await;
        assert_eq!(h.store.notifications().len(), 2);
        assert_eq!(h.store.unread_count(), 2);

        h.api.set_records(vec![a.clone()]);
        h.store.refresh().await;
        assert_eq!(h.store.notifications(), vec![a]);
        assert_eq!(h.store.unread_count(), 1);
        assert!(!h.store.is_loading());
    }

    #[tokio::test]
    async fn refresh_failure_keeps_last_known_state() {
        let h = harness();
        let now = h.clock.now();
        h.api.set_records(vec![record(1, NotificationKind::System, now)]);
        h.store.refresh().await;

        h.api.fail(Endpoint::List, ApiError::Server { status: 500 });
        h.api.fail(Endpoint::UnreadCount, ApiError::Network("refused".into()));
        h.api.set_records(Vec::new());
        h.store.refresh().await;

        assert_eq!(h.store.notifications().len(), 1);
        assert_eq!(h.store.unread_count(), 1);
        assert!(!h.store.is_loading());
    }

    #[tokio::test]
    async fn refresh_applies_the_half_that_succeeded() {
        let h = harness();
        let now = h.clock.now();
        h.api.set_records(vec![record(1, NotificationKind::System, now)]);
        h.api.fail(Endpoint::List, ApiError::Parse("truncated".into()));
        h.store.refresh().await;

        assert!(h.store.notifications().is_empty());
        assert_eq!(h.store.unread_count(), 1);
    }

    #[tokio::test]
    async fn refresh_drops_duplicate_ids() {
        let h = harness();
        let now = h.clock.now();
        let a = record(1, NotificationKind::System, now);
        h.api.set_records(vec![a.clone(), a.clone(), record(2, NotificationKind::System, now)]);
        h.store.refresh().await;

        let ids: Vec<u64> = h.store.notifications().iter().map(|r| r.id.value()).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn mark_as_read_is_optimistic() {
        let h = harness();
        let now = h.clock.now();
        h.api.set_records(vec![
            record(1, NotificationKind::System, now),
            record(2, NotificationKind::System, now),
        ]);
        h.store.refresh().await;

        assert!(h.store.mark_as_read(NotificationId::new(1)).await);
        assert_eq!(h.store.unread_count(), 1);
        assert_eq!(h.store.unread().len(), 1);
        assert_eq!(h.api.calls(Endpoint::MarkRead), 1);
    }

    #[tokio::test]
    async fn mark_as_read_on_read_record_sends_nothing() {
        let h = harness();
        let now = h.clock.now();
        let mut read = record(5, NotificationKind::System, now);
        read.is_read = true;
        h.api.set_records(vec![read, record(6, NotificationKind::System, now)]);
        h.store.refresh().await;
        assert_eq!(h.store.unread_count(), 1);

        assert!(h.store.mark_as_read(NotificationId::new(5)).await);
        assert_eq!(h.store.unread_count(), 1);
        assert_eq!(h.api.calls(Endpoint::MarkRead), 0);
    }

    #[tokio::test]
    async fn mark_as_read_rolls_back_on_failure() {
        let h = harness();
        let now = h.clock.now();
        h.api.set_records(vec![record(1, NotificationKind::System, now)]);
        h.store.refresh().await;

        h.api.fail(Endpoint::MarkRead, ApiError::Server { status: 403 });
        assert!(!h.store.mark_as_read(NotificationId::new(1)).await);
        assert_eq!(h.store.unread_count(), 1);
        assert!(!h.store.notifications()[0].is_read);
    }

    #[tokio::test]
    async fn mark_all_as_read_zeroes_and_rolls_back() {
        let h = harness();
        let now = h.clock.now();
        h.api.set_records(vec![
            record(1, NotificationKind::System, now),
            record(2, NotificationKind::System, now),
        ]);
        h.store.refresh().await;

        h.api.fail(Endpoint::MarkAllRead, ApiError::Network("timeout".into()));
        assert!(!h.store.mark_all_as_read().await);
        assert_eq!(h.store.unread_count(), 2);
        assert_eq!(h.store.unread().len(), 2);

        h.api.recover(Endpoint::MarkAllRead);
        assert!(h.store.mark_all_as_read().await);
        assert_eq!(h.store.unread_count(), 0);
        assert!(h.store.unread().is_empty());
    }

    #[tokio::test]
    async fn delete_waits_for_server_confirmation() {
        let h = harness();
        let now = h.clock.now();
        let mut read = record(2, NotificationKind::System, now);
        read.is_read = true;
        h.api.set_records(vec![record(1, NotificationKind::System, now), read]);
        h.store.refresh().await;

        h.api.fail(Endpoint::Delete, ApiError::Server { status: 500 });
        assert!(!h.store.delete_notification(NotificationId::new(1)).await);
        assert_eq!(h.store.notifications().len(), 2);

        h.api.recover(Endpoint::Delete);
        assert!(h.store.delete_notification(NotificationId::new(2)).await);
        assert_eq!(h.store.unread_count(), 1);
        assert!(h.store.delete_notification(NotificationId::new(1)).await);
        assert_eq!(h.store.unread_count(), 0);
        assert!(h.store.notifications().is_empty());
    }

    #[tokio::test]
    async fn unread_count_never_goes_negative() {
        let h = harness();
        let now = h.clock.now();
        h.api.set_records(vec![record(1, NotificationKind::System, now)]);
        h.api.set_unread_override(Some(0));
        h.store.refresh().await;
        assert_eq!(h.store.unread_count(), 0);

        h.store.mark_as_read(NotificationId::new(1)).await;
        h.store.mark_all_as_read().await;
        h.store.delete_notification(NotificationId::new(1)).await;
        h.store.mark_as_read(NotificationId::new(99)).await;
        assert_eq!(h.store.unread_count(), 0);
    }

    #[derive(Debug, Clone, Copy)]
    enum Op {
        Read(u64),
        ReadAll,
        Delete(u64),
    }

    #[tokio::test]
    async fn unread_count_tracks_the_list_across_operation_orders() {
        let ops = [
            Op::Read(1),
            Op::ReadAll,
            Op::Delete(2),
            Op::Read(3),
            Op::Delete(1),
            Op::Read(99),
            Op::Delete(99),
        ];
        let failing = [Endpoint::MarkRead, Endpoint::MarkAllRead, Endpoint::Delete];

        for rotation in 0..ops.len() {
            for reversed in [false, true] {
                for fail_every in [0, 1, 2, 3] {
                    let h = harness();
                    let now = h.clock.now();
                    h.api.set_records((1..=3).map(|id| record(id, NotificationKind::System, now)).collect());
                    h.store.refresh().await;

                    let mut sequence = ops.to_vec();
                    sequence.rotate_left(rotation);
                    if reversed {
                        sequence.reverse();
                    }

                    for (step, op) in sequence.into_iter().enumerate() {
                        let fail = fail_every != 0 && step % fail_every == 0;
                        for endpoint in failing {
                            if fail {
                                h.api.fail(endpoint, ApiError::Server { status: 500 });
                            } else {
                                h.api.recover(endpoint);
                            }
                        }

                        match op {
                            Op::Read(id) => {
                                h.store.mark_as_read(NotificationId::new(id)).await;
                            }
                            Op::ReadAll => {
                                h.store.mark_all_as_read().await;
                            }
                            Op::Delete(id) => {
                                h.store.delete_notification(NotificationId::new(id)).await;
                            }
                        }

                        let state = h.store.snapshot();
                        let unread_in_list =
                            state.notifications.iter().filter(|r| !r.is_read).count() as u32;
                        assert_eq!(
                            state.unread_count, unread_in_list,
                            "rotation {rotation}, reversed {reversed}, fail_every {fail_every}, step {step}, {op:?}"
                        );
                        assert!(state.unread_count <= 3);
                    }
                }
            }
        }
    }

    /// Backend whose calls never complete.
    struct StalledApi;

    impl NotificationApi for StalledApi {
        fn unread_count(&self) -> BoxFuture<'_, ApiResult<u32>> {
            future::pending().boxed()
        }

        fn list(&self) -> BoxFuture<'_, ApiResult<Vec<NotificationRecord>>> {
            future::pending().boxed()
        }

        fn mark_read(&self, _id: NotificationId) -> BoxFuture<'_, ApiResult<()>> {
            future::pending().boxed()
        }

        fn mark_all_read(&self) -> BoxFuture<'_, ApiResult<()>> {
            future::pending().boxed()
        }

        fn delete(&self, _id: NotificationId) -> BoxFuture<'_, ApiResult<()>> {
            future::pending().boxed()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn abandoned_refresh_stops_loading() {
        let store = NotificationStore::new(
            Arc::new(StalledApi),
            Arc::new(ManualClock::default()),
            Scheduler::new(),
            StoreSettings::default(),
        );
        let changes = store.subscribe();

        let outcome = tokio::time::timeout(Duration::from_secs(1), store.refresh()).await;
        assert!(outcome.is_err());
        assert!(!store.is_loading());
        assert!(!changes.borrow().loading);
    }

    #[tokio::test(start_paused = true)]
    async fn count_increase_announces_newest_arrival_after_settle_delay() {
        let h = harness();
        let now = h.clock.now();
        h.api.set_records(vec![record(1, NotificationKind::MaintenanceDue, now)]);
        h.store.refresh().await;
        assert!(h.listener.announced().is_empty());

        tokio::time::sleep(StoreSettings::default().settle_delay + Duration::from_millis(1)).await;
        let announced = h.listener.announced();
        assert_eq!(announced.len(), 1);
        assert_eq!(announced[0].id, NotificationId::new(1));
    }

    #[tokio::test(start_paused = true)]
    async fn subscribers_see_refreshed_state() {
        let h = harness();
        let mut changes = h.store.subscribe();
        h.api.set_records(vec![record(1, NotificationKind::System, h.clock.now())]);
        h.store.refresh().await;

        assert!(changes.has_changed().unwrap());
        let state = changes.borrow_and_update().clone();
        assert_eq!(state.unread_count, 1);
        assert!(!state.loading);
    }
}
