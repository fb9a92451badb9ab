// SPDX-License-Identifier: MPL-2.0
//! New-arrival detection.
//!
//! Decides, from successive unread counts, when the store should look for a
//! freshly arrived notification, and which one to announce. Pure state: the
//! store owns the timers and network calls.

use crate::domain::notification::{NotificationRecord, UnreadCount};
use chrono::{DateTime, Duration, Utc};

/// Detection state carried between polls.
#[derive(Debug, Clone)]
pub struct ArrivalDetector {
    /// Last count the detector knows about (from a poll or a local mutation).
    baseline: UnreadCount,
    /// When the last toast was raised. `None` means never.
    last_toast_at: Option<DateTime<Utc>>,
    /// A secondary fetch is scheduled and has not resolved yet.
    check_pending: bool,
    rate_limit: Duration,
    brand_new_window: Duration,
}

impl ArrivalDetector {
    #[must_use]
    pub fn new(rate_limit: Duration, brand_new_window: Duration) -> Self {
        Self {
            baseline: UnreadCount::default(),
            last_toast_at: None,
            check_pending: false,
            rate_limit,
            brand_new_window,
        }
    }

    /// Records a polled count.
    ///
    /// Returns `true` when the count went up, the rate-limit window has
    /// passed and no check is already pending: the caller should then
    /// schedule a secondary fetch and feed its result to [`Self::select`].
    pub fn observe_count(&mut self, count: UnreadCount, now: DateTime<Utc>) -> bool {
        let increased = count.increased_since(self.baseline);
        self.baseline = count;
        if !increased {
            return false;
        }
        if self.check_pending {
            tracing::debug!(count = count.value(), "arrival check already pending");
            return false;
        }
        if let Some(last) = self.last_toast_at {
            if now.signed_duration_since(last) < self.rate_limit {
                tracing::debug!(count = count.value(), "arrival toast rate limited");
                return false;
            }
        }
        self.check_pending = true;
        true
    }

    /// Re-bases the detector after a local mutation changed the count
    /// (mark-read, delete, rollback) so the change is not mistaken for an arrival.
    pub fn rebase(&mut self, count: UnreadCount) {
        self.baseline = count;
    }

    /// Picks the record to announce from a freshly fetched list.
    ///
    /// Candidates are unread, brand new and toast-worthy; the most recent one
    /// wins. A hit starts a new rate-limit window. No candidate is a normal
    /// outcome: the count may have moved for another reason.
    pub fn select(
        &mut self,
        records: &[NotificationRecord],
        now: DateTime<Utc>,
    ) -> Option<NotificationRecord> {
        self.check_pending = false;
        let chosen = records
            .iter()
            .filter(|record| {
                !record.is_read
                    && record.kind.is_toast_worthy()
                    && record.is_brand_new(now, self.brand_new_window)
            })
            .max_by_key(|record| record.created_at)
            .cloned();
        if chosen.is_some() {
            self.last_toast_at = Some(now);
        }
        chosen
    }

    /// Drops a pending check whose fetch failed.
    pub fn abandon(&mut self) {
        self.check_pending = false;
    }

    #[must_use]
    pub fn last_toast_at(&self) -> Option<DateTime<Utc>> {
        self.last_toast_at
    }

    #[must_use]
    pub fn baseline(&self) -> UnreadCount {
        self.baseline
    }
}
