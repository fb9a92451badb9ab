// SPDX-License-Identifier: MPL-2.0
//! Notification domain types.
//!
//! - [`NotificationRecord`]: a server-side notification as fetched by the store
//! - [`NotificationKind`]: category tag that drives toast eligibility and styling
//! - [`UnreadCount`]: unread counter that can never go below zero

mod kind;
mod record;
mod unread;

pub use kind::{KindCategory, NotificationKind};
pub use record::{dedup_by_id, NotificationId, NotificationRecord};
pub use unread::UnreadCount;
