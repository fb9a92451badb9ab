// SPDX-License-Identifier: MPL-2.0
//! Presentation-side state: the toast stack and its notification bridge.

pub mod notifications;
