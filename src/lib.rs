// SPDX-License-Identifier: MPL-2.0
//! `property_notifications` keeps a property-management UI's notification bell
//! and toast stack in sync with the backend.
//!
//! It polls the REST API for the unread count and notification list, spots
//! newly arrived notifications, and raises at most one toast per arrival
//! (rate limited). Toasts expire on their own or when dismissed.
//!
//! Start with [`app::App`], which wires everything together.

pub mod app;
pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod logging;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
pub mod ui;
