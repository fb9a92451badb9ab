// SPDX-License-Identifier: MPL-2.0
//! Notification backend port.
//!
//! Mirrors the REST contract:
//!
//! | Method | Path | Result |
//! |--------|------|--------|
//! | `GET` | `/notifications/count/unread` | `{ "result": number }` |
//! | `GET` | `/notifications` | `{ "result": NotificationRecord[] }` |
//! | `PUT` | `/notifications/{id}/read` | 2xx |
//! | `PUT` | `/notifications/read-all` | 2xx |
//! | `DELETE` | `/notifications/{id}` | 2xx |

use crate::domain::notification::{NotificationId, NotificationRecord};
use futures_util::future::BoxFuture;
use thiserror::Error;

// =============================================================================
// ApiError
// =============================================================================

/// Errors reported by a [`NotificationApi`] implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, timeout, ...).
    #[error("network failure: {0}")]
    Network(String),

    /// The server answered with a non-2xx status.
    #[error("server returned status {status}")]
    Server { status: u16 },

    /// The response body was not the expected JSON shape.
    #[error("parse failure: {0}")]
    Parse(String),
}

impl ApiError {
    /// Short tag used as a structured log field.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Network(_) => "network",
            ApiError::Server { .. } => "server",
            ApiError::Parse(_) => "parse",
        }
    }
}

/// Result type for backend calls.
pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// NotificationApi
// =============================================================================

/// Backend operations the notification store depends on.
pub trait NotificationApi: Send + Sync {
    /// Fetches the number of unread notifications.
    fn unread_count(&self) -> BoxFuture<'_, ApiResult<u32>>;

    /// Fetches the full notification list.
    fn list(&self) -> BoxFuture<'_, ApiResult<Vec<NotificationRecord>>>;

    /// Marks one notification as read.
    fn mark_read(&self, id: NotificationId) -> BoxFuture<'_, ApiResult<()>>;

    /// Marks every notification as read.
    fn mark_all_read(&self) -> BoxFuture<'_, ApiResult<()>>;

    /// Deletes one notification.
    fn delete(&self, id: NotificationId) -> BoxFuture<'_, ApiResult<()>>;
}
