// SPDX-License-Identifier: MPL-2.0
//! Turns newly arrived notifications into toasts.

use super::queue::ToastQueue;
use super::toast::{Severity, Toast, ToastId};
use crate::application::store::ArrivalListener;
use crate::config::{CREATED_TOAST_DURATION_MS, DUE_TOAST_DURATION_MS};
use crate::domain::notification::{KindCategory, NotificationKind, NotificationRecord};
use std::time::Duration;

/// How an arrival of a given kind is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrivalStyle {
    pub severity: Severity,
    pub duration: Duration,
}

/// Maps notification kinds to toast styles and pushes one toast per arrival.
///
/// Holds nothing but the queue it writes to.
#[derive(Debug, Clone)]
pub struct ToastBridge {
    queue: ToastQueue,
}

impl ToastBridge {
    #[must_use]
    pub fn new(queue: ToastQueue) -> Self {
        Self { queue }
    }

    /// Returns the style for `kind`, or `None` if the kind is never toasted.
    #[must_use]
    pub fn style_for(kind: NotificationKind) -> Option<ArrivalStyle> {
        match kind.category() {
            KindCategory::Due => Some(ArrivalStyle {
                severity: Severity::Warning,
                duration: Duration::from_millis(DUE_TOAST_DURATION_MS),
            }),
            KindCategory::Created => Some(ArrivalStyle {
                severity: Severity::Info,
                duration: Duration::from_millis(CREATED_TOAST_DURATION_MS),
            }),
            KindCategory::Informational => None,
        }
    }

    /// Pushes a toast for `record`, titled with the record's title.
    pub fn announce(&self, record: &NotificationRecord) -> Option<ToastId> {
        let style = Self::style_for(record.kind)?;
        let toast = Toast::new(style.severity, record.message.clone())
            .with_title(record.title.clone())
            .with_duration(style.duration);
        Some(self.queue.push(toast))
    }
}

impl ArrivalListener for ToastBridge {
    fn on_arrival(&self, record: &NotificationRecord) {
        if self.announce(record).is_none() {
            tracing::debug!(id = %record.id, kind = ?record.kind, "arrival kind is not toasted");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::scheduler::Scheduler;
    use crate::domain::notification::NotificationId;
    use chrono::Utc;

    fn record(kind: NotificationKind) -> NotificationRecord {
        NotificationRecord {
            id: NotificationId::new(1),
            title: "Boiler service due".into(),
            message: "Room 204".into(),
            kind,
            is_read: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn due_kinds_map_to_warnings() {
        let style = ToastBridge::style_for(NotificationKind::MaintenanceDue).unwrap();
        assert_eq!(style.severity, Severity::Warning);
        assert_eq!(style.duration, Duration::from_millis(DUE_TOAST_DURATION_MS));
    }

    #[test]
    fn created_kinds_map_to_info() {
        let style = ToastBridge::style_for(NotificationKind::InvoiceCreated).unwrap();
        assert_eq!(style.severity, Severity::Info);
        assert_eq!(style.duration, Duration::from_millis(CREATED_TOAST_DURATION_MS));
    }

    #[test]
    fn arrival_durations_differ_from_default() {
        let default = Toast::info("").duration();
        for kind in [NotificationKind::InvoiceDue, NotificationKind::MaintenanceCreated] {
            assert_ne!(ToastBridge::style_for(kind).unwrap().duration, default);
        }
    }

    #[test]
    fn informational_kinds_are_skipped() {
        assert!(ToastBridge::style_for(NotificationKind::PaymentReceived).is_none());
        assert!(ToastBridge::style_for(NotificationKind::Other).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn announce_pushes_one_titled_toast() {
        let queue = ToastQueue::new(Scheduler::new());
        let bridge = ToastBridge::new(queue.clone());

        bridge.on_arrival(&record(NotificationKind::MaintenanceDue));

        let visible = queue.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].severity(), Severity::Warning);
        assert_eq!(visible[0].title(), Some("Boiler service due"));
        assert_eq!(visible[0].message(), "Room 204");
    }

    #[tokio::test(start_paused = true)]
    async fn announce_ignores_untoasted_kinds() {
        let queue = ToastQueue::new(Scheduler::new());
        let bridge = ToastBridge::new(queue.clone());

        assert!(bridge.announce(&record(NotificationKind::System)).is_none());
        assert!(queue.is_empty());
    }
}
