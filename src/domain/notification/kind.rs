// SPDX-License-Identifier: MPL-2.0
//! Notification categories.

use serde::{Deserialize, Serialize};

/// Category tag attached to every notification by the backend.
///
/// Unknown tags deserialize to [`NotificationKind::Other`] so that one new
/// category on the server does not break parsing of the whole list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    InvoiceCreated,
    InvoiceDue,
    MaintenanceCreated,
    MaintenanceDue,
    ContractExpiring,
    PaymentReceived,
    System,
    #[serde(other)]
    Other,
}

/// Coarse grouping of kinds, used to decide whether a notification deserves a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindCategory {
    /// Something is due or about to lapse.
    Due,
    /// A new entity was created for the user.
    Created,
    /// Everything else; shown in the list, never toasted.
    Informational,
}

impl NotificationKind {
    /// Returns the category this kind belongs to.
    #[must_use]
    pub fn category(self) -> KindCategory {
        match self {
            NotificationKind::InvoiceDue
            | NotificationKind::MaintenanceDue
            | NotificationKind::ContractExpiring => KindCategory::Due,
            NotificationKind::InvoiceCreated | NotificationKind::MaintenanceCreated => {
                KindCategory::Created
            }
            NotificationKind::PaymentReceived | NotificationKind::System | NotificationKind::Other => {
                KindCategory::Informational
            }
        }
    }

    /// Returns whether a freshly arrived notification of this kind may raise a toast.
    #[must_use]
    pub fn is_toast_worthy(self) -> bool {
        self.category() != KindCategory::Informational
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_screaming_snake_case_tags() {
        let kind: NotificationKind = serde_json::from_str("\"MAINTENANCE_DUE\"").unwrap();
        assert_eq!(kind, NotificationKind::MaintenanceDue);

        let kind: NotificationKind = serde_json::from_str("\"INVOICE_CREATED\"").unwrap();
        assert_eq!(kind, NotificationKind::InvoiceCreated);
    }

    #[test]
    fn unknown_tag_falls_back_to_other() {
        let kind: NotificationKind = serde_json::from_str("\"ROOM_PAINTED\"").unwrap();
        assert_eq!(kind, NotificationKind::Other);
    }

    #[test]
    fn due_and_created_kinds_are_toast_worthy() {
        assert!(NotificationKind::InvoiceDue.is_toast_worthy());
        assert!(NotificationKind::MaintenanceDue.is_toast_worthy());
        assert!(NotificationKind::ContractExpiring.is_toast_worthy());
        assert!(NotificationKind::InvoiceCreated.is_toast_worthy());
        assert!(NotificationKind::MaintenanceCreated.is_toast_worthy());
    }

    #[test]
    fn informational_kinds_are_not_toast_worthy() {
        assert!(!NotificationKind::PaymentReceived.is_toast_worthy());
        assert!(!NotificationKind::System.is_toast_worthy());
        assert!(!NotificationKind::Other.is_toast_worthy());
    }
}
