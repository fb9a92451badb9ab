// SPDX-License-Identifier: MPL-2.0
//! Infrastructure layer adapters.
//!
//! Concrete implementations of the port traits defined in
//! `application::port`.
//!
//! # Available Adapters
//!
//! - [`http_api`]: REST backend via `reqwest` (implements [`NotificationApi`])
//!
//! [`NotificationApi`]: crate::application::port::NotificationApi

pub mod http_api;

pub use http_api::HttpNotificationApi;
