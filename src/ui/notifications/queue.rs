// SPDX-License-Identifier: MPL-2.0
//! Toast lifecycle management.
//!
//! The `ToastQueue` keeps live toasts in creation order and removes each one
//! when its duration elapses or when the user dismisses it, whichever comes
//! first. Both removal paths are idempotent: removing a toast that is already
//! gone is a no-op.

use super::toast::{Severity, Toast, ToastId};
use crate::application::scheduler::{ScheduledTask, Scheduler};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Removal {
    Expired,
    Dismissed,
}

#[derive(Debug, Default)]
struct QueueState {
    /// Live toasts, oldest first.
    toasts: Vec<Toast>,
    /// Pending auto-removal timers, one per live toast.
    timers: HashMap<ToastId, ScheduledTask>,
}

#[derive(Debug)]
struct QueueInner {
    scheduler: Scheduler,
    state: Mutex<QueueState>,
    changes: watch::Sender<Vec<Toast>>,
}

/// Shared handle to the toast queue. Clones share the same toasts.
#[derive(Debug, Clone)]
pub struct ToastQueue {
    inner: Arc<QueueInner>,
}

impl ToastQueue {
    /// Creates an empty queue whose timers run on `scheduler`.
    #[must_use]
    pub fn new(scheduler: Scheduler) -> Self {
        let (changes, _) = watch::channel(Vec::new());
        Self {
            inner: Arc::new(QueueInner {
                scheduler,
                state: Mutex::new(QueueState::default()),
                changes,
            }),
        }
    }

    /// Appends a toast and schedules its automatic removal.
    ///
    /// Once the scheduler has shut down no timer could remove the toast, so
    /// it is dropped instead and the returned id never becomes visible.
    pub fn push(&self, toast: Toast) -> ToastId {
        let id = toast.id();
        if self.inner.scheduler.is_shut_down() {
            tracing::debug!(%id, "toast dropped after shutdown");
            return id;
        }
        let weak = Arc::downgrade(&self.inner);
        {
            let mut state = self.inner.state.lock();
            let timer = self.inner.scheduler.after(toast.duration(), async move {
                if let Some(inner) = Weak::upgrade(&weak) {
                    ToastQueue { inner }.remove(id, Removal::Expired);
                }
            });
            tracing::debug!(
                %id,
                severity = %toast.severity(),
                duration_ms = toast.duration().as_millis() as u64,
                "toast shown"
            );
            state.toasts.push(toast);
            state.timers.insert(id, timer);
        }
        self.publish();
        id
    }

    /// Shows `message` with the given severity for `duration`.
    pub fn show(&self, message: impl Into<String>, severity: Severity, duration: Duration) -> ToastId {
        self.push(Toast::new(severity, message).with_duration(duration))
    }

    pub fn success(&self, message: impl Into<String>) -> ToastId {
        self.push(Toast::success(message))
    }

    pub fn error(&self, message: impl Into<String>) -> ToastId {
        self.push(Toast::error(message))
    }

    pub fn warning(&self, message: impl Into<String>) -> ToastId {
        self.push(Toast::warning(message))
    }

    pub fn info(&self, message: impl Into<String>) -> ToastId {
        self.push(Toast::info(message))
    }

    /// Removes a toast now and cancels its timer.
    ///
    /// Returns `true` if the toast was still live.
    pub fn dismiss(&self, id: ToastId) -> bool {
        self.remove(id, Removal::Dismissed)
    }

    /// Removes every toast and cancels all pending timers.
    pub fn clear(&self) {
        {
            let mut state = self.inner.state.lock();
            state.toasts.clear();
            for (_, timer) in state.timers.drain() {
                timer.cancel();
            }
        }
        self.publish();
    }

    /// Returns the live toasts in creation order.
    #[must_use]
    pub fn visible(&self) -> Vec<Toast> {
        self.inner.state.lock().toasts.clone()
    }

    #[must_use]
    pub fn contains(&self, id: ToastId) -> bool {
        self.inner.state.lock().toasts.iter().any(|t| t.id() == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.state.lock().toasts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.state.lock().toasts.is_empty()
    }

    /// Subscribes to changes of the live toast list.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<Toast>> {
        self.inner.changes.subscribe()
    }

    fn remove(&self, id: ToastId, reason: Removal) -> bool {
        let removed = {
            let mut state = self.inner.state.lock();
            let timer = state.timers.remove(&id);
            if reason == Removal::Dismissed {
                if let Some(timer) = timer {
                    timer.cancel();
                }
            }
            match state.toasts.iter().position(|t| t.id() == id) {
                Some(position) => {
                    state.toasts.remove(position);
                    true
                }
                None => false,
            }
        };
        if removed {
            tracing::debug!(%id, ?reason, "toast removed");
            self.publish();
        }
        removed
    }

    fn publish(&self) {
        let toasts = self.inner.state.lock().toasts.clone();
        self.inner.changes.send_replace(toasts);
    }
}
