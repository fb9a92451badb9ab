// SPDX-License-Identifier: MPL-2.0
//! Foreground/background state of the host UI.

/// Whether the UI hosting the store is currently in the foreground.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
}

impl Visibility {
    #[must_use]
    pub fn is_visible(self) -> bool {
        self == Visibility::Visible
    }
}
