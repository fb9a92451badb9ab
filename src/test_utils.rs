// SPDX-License-Identifier: MPL-2.0
//! Test doubles for the notification ports.
//!
//! [`FakeApi`] behaves like a tiny in-memory backend: it owns a list of
//! records, derives the unread count from it (unless overridden), applies
//! mutations, counts calls per endpoint, and can be told to fail any endpoint.

use crate::application::port::{ApiError, ApiResult, NotificationApi};
use crate::application::store::ArrivalListener;
use crate::domain::notification::{NotificationId, NotificationKind, NotificationRecord};
use chrono::{DateTime, Utc};
use futures_util::future::{self, BoxFuture};
use futures_util::FutureExt;
use parking_lot::Mutex;
use std::collections::HashMap;

pub use crate::application::clock::ManualClock;

/// Backend endpoints, for failure injection and call counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    UnreadCount,
    List,
    MarkRead,
    MarkAllRead,
    Delete,
}

#[derive(Debug, Default)]
struct FakeState {
    records: Vec<NotificationRecord>,
    unread_override: Option<u32>,
    failures: HashMap<Endpoint, ApiError>,
    calls: HashMap<Endpoint, usize>,
}

impl FakeState {
    fn enter(&mut self, endpoint: Endpoint) -> ApiResult<()> {
        *self.calls.entry(endpoint).or_default() += 1;
        match self.failures.get(&endpoint) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn unread(&self) -> u32 {
        self.unread_override.unwrap_or_else(|| {
            let unread = self.records.iter().filter(|r| !r.is_read).count();
            u32::try_from(unread).unwrap_or(u32::MAX)
        })
    }
}

/// In-memory [`NotificationApi`].
#[derive(Debug, Default)]
pub struct FakeApi {
    state: Mutex<FakeState>,
}

impl FakeApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the server-side records.
    pub fn set_records(&self, records: Vec<NotificationRecord>) {
        self.state.lock().records = records;
    }

    pub fn push_record(&self, record: NotificationRecord) {
        self.state.lock().records.push(record);
    }

    /// Forces the unread count instead of deriving it from the records.
    pub fn set_unread_override(&self, count: Option<u32>) {
        self.state.lock().unread_override = count;
    }

    /// Makes every call to `endpoint` fail with `error` until [`Self::recover`].
    pub fn fail(&self, endpoint: Endpoint, error: ApiError) {
        self.state.lock().failures.insert(endpoint, error);
    }

    pub fn recover(&self, endpoint: Endpoint) {
        self.state.lock().failures.remove(&endpoint);
    }

    /// Number of calls made to `endpoint`, failed ones included.
    #[must_use]
    pub fn calls(&self, endpoint: Endpoint) -> usize {
        self.state.lock().calls.get(&endpoint).copied().unwrap_or(0)
    }

    fn respond<T: Send + 'static>(
        &self,
        endpoint: Endpoint,
        f: impl FnOnce(&mut FakeState) -> T,
    ) -> BoxFuture<'_, ApiResult<T>> {
        let result = {
            let mut state = self.state.lock();
            state.enter(endpoint).map(|()| f(&mut *state))
        };
        future::ready(result).boxed()
    }
}

impl NotificationApi for FakeApi {
    fn unread_count(&self) -> BoxFuture<'_, ApiResult<u32>> {
        self.respond(Endpoint::UnreadCount, |state| state.unread())
    }

    fn list(&self) -> BoxFuture<'_, ApiResult<Vec<NotificationRecord>>> {
        self.respond(Endpoint::List, |state| state.records.clone())
    }

    fn mark_read(&self, id: NotificationId) -> BoxFuture<'_, ApiResult<()>> {
        self.respond(Endpoint::MarkRead, |state| {
            if let Some(record) = state.records.iter_mut().find(|r| r.id == id) {
                record.is_read = true;
            }
        })
    }

    fn mark_all_read(&self) -> BoxFuture<'_, ApiResult<()>> {
        self.respond(Endpoint::MarkAllRead, |state| {
            for record in &mut state.records {
                record.is_read = true;
            }
        })
    }

    fn delete(&self, id: NotificationId) -> BoxFuture<'_, ApiResult<()>> {
        self.respond(Endpoint::Delete, |state| {
            state.records.retain(|r| r.id != id);
        })
    }
}

/// Records every arrival it is told about.
#[derive(Debug, Default)]
pub struct RecordingListener {
    announced: Mutex<Vec<NotificationRecord>>,
}

impl RecordingListener {
    #[must_use]
    pub fn announced(&self) -> Vec<NotificationRecord> {
        self.announced.lock().clone()
    }
}

impl ArrivalListener for RecordingListener {
    fn on_arrival(&self, record: &NotificationRecord) {
        self.announced.lock().push(record.clone());
    }
}

/// Builds an unread record titled `n{id}`.
#[must_use]
pub fn record(id: u64, kind: NotificationKind, created_at: DateTime<Utc>) -> NotificationRecord {
    NotificationRecord {
        id: NotificationId::new(id),
        title: format!("n{id}"),
        message: format!("notification {id}"),
        kind,
        is_read: false,
        created_at,
    }
}
