// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! # Categories
//!
//! - **Backend**: base URL and request timeout
//! - **Polling**: refresh cadence
//! - **Arrival detection**: settle delay, rate limit, brand-new window
//! - **Toasts**: display durations

// ==========================================================================
// Backend Defaults
// ==========================================================================

/// API base URL used when neither the config file nor the environment sets one.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";

/// Environment variable that overrides the configured API base URL.
pub const API_URL_ENV_VAR: &str = "PROPERTY_NOTIFICATIONS_API_URL";

/// Per-request timeout (in seconds).
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Minimum request timeout (in seconds).
pub const MIN_REQUEST_TIMEOUT_SECS: u64 = 1;

/// Maximum request timeout (in seconds).
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 120;

// ==========================================================================
// Polling Defaults
// ==========================================================================

/// Interval between background refreshes (in seconds).
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 120;

/// Minimum poll interval (in seconds).
pub const MIN_POLL_INTERVAL_SECS: u64 = 5;

/// Maximum poll interval (in seconds).
pub const MAX_POLL_INTERVAL_SECS: u64 = 3600;

// ==========================================================================
// Arrival Detection Defaults
// ==========================================================================

/// Wait between seeing the unread count rise and fetching the list (in milliseconds).
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 1000;

/// Minimum time between two arrival toasts (in seconds).
pub const DEFAULT_TOAST_RATE_LIMIT_SECS: u64 = 60;

/// Maximum age of a notification that still counts as newly arrived (in seconds).
pub const DEFAULT_BRAND_NEW_WINDOW_SECS: u64 = 30;

// ==========================================================================
// Toast Defaults
// ==========================================================================

/// Display duration of a toast when none is given (in milliseconds).
pub const DEFAULT_TOAST_DURATION_MS: u64 = 3000;

/// Display duration of an arrival toast for something due (in milliseconds).
pub const DUE_TOAST_DURATION_MS: u64 = 8000;

/// Display duration of an arrival toast for something created (in milliseconds).
pub const CREATED_TOAST_DURATION_MS: u64 = 5000;

// ==========================================================================
// Logging Defaults
// ==========================================================================

/// Log filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_LEVEL: &str = "info";
