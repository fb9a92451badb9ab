// SPDX-License-Identifier: MPL-2.0
//! Application layer - services and orchestration.
//!
//! - [`port`]: the backend trait the store depends on
//! - [`clock`]: wall-clock abstraction for recency and rate limiting
//! - [`scheduler`]: cancellable timers shared by the store, the poller and the toast queue
//! - [`store`]: the notification store and its new-arrival detection
//!
//! # Dependency Rule
//!
//! - Application layer depends on the domain layer
//! - Infrastructure implements application ports
//! - The `ui` and `app` layers use application services

pub mod clock;
pub mod port;
pub mod scheduler;
pub mod store;
