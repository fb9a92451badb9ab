// SPDX-License-Identifier: MPL-2.0
//! Domain layer - notification value types and their rules.
//!
//! Everything here is plain data plus the invariants that belong to it
//! (clamped counters, id uniqueness, recency). Only `serde` and `chrono`
//! are used, for the wire shape and timestamps.
//!
//! # Modules
//!
//! - [`notification`]: [`NotificationRecord`](notification::NotificationRecord),
//!   [`NotificationKind`](notification::NotificationKind),
//!   [`UnreadCount`](notification::UnreadCount)

pub mod notification;
