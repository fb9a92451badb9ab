// SPDX-License-Identifier: MPL-2.0
//! Toast notification system for user feedback.
//!
//! Toasts are short-lived messages (save succeeded, request failed, a new
//! invoice is due) shown without blocking interaction.
//!
//! # Components
//!
//! - [`toast`] - Core `Toast` struct with severity levels
//! - [`queue`] - `ToastQueue` for ordering, auto-expiry and dismissal
//! - [`bridge`] - `ToastBridge`, which toasts newly arrived notifications
//!
//! # Usage
//!
//! ```no_run
//! # async fn demo() {
//! use property_notifications::application::scheduler::Scheduler;
//! use property_notifications::ui::notifications::{Severity, ToastQueue};
//! use std::time::Duration;
//!
//! let toasts = ToastQueue::new(Scheduler::new());
//! toasts.show("Tenant saved", Severity::Success, Duration::from_secs(3));
//! for toast in toasts.visible() {
//!     println!("[{}] {}", toast.severity(), toast.message());
//! }
//! # }
//! ```
//!
//! # Design Considerations
//!
//! - Default duration: 3s; arrival toasts use 8s (due) and 5s (created)
//! - Display order: creation order, no priority reordering
//! - Duration is fixed at creation (no hover-to-extend)

pub mod bridge;
pub mod queue;
pub mod toast;

pub use bridge::{ArrivalStyle, ToastBridge};
pub use queue::ToastQueue;
pub use toast::{Severity, Toast, ToastId};
