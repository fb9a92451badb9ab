// SPDX-License-Identifier: MPL-2.0
//! Port definitions (traits) for dependency inversion.
//!
//! The store talks to the backend only through [`NotificationApi`]; the
//! reqwest adapter in `infrastructure` implements it for production and
//! `test_utils::FakeApi` (behind the `test-utils` feature) implements it for tests.
//!
//! # Design Notes
//!
//! - Methods return boxed futures so the trait stays object safe
//!   (`Arc<dyn NotificationApi>` is what the store holds)
//! - All failures are reported as [`ApiError`]; callers decide whether to log
//!   or surface them

pub mod notification_api;

pub use notification_api::{ApiError, ApiResult, NotificationApi};
