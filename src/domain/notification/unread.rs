// SPDX-License-Identifier: MPL-2.0
//! Unread counter newtype.

/// Number of unread notifications.
///
/// The counter is unsigned and every decrement saturates, so it can never
/// go below zero whatever sequence of mark-read and delete calls happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct UnreadCount(u32);

impl UnreadCount {
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the raw count.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Returns the count reduced by one, stopping at zero.
    #[must_use]
    pub fn decremented(self) -> Self {
        Self(self.0.saturating_sub(1))
    }

    /// Returns the count increased by one.
    #[must_use]
    pub fn incremented(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns whether `self` is strictly greater than `previous`.
    #[must_use]
    pub fn increased_since(self, previous: Self) -> bool {
        self.0 > previous.0
    }
}

impl From<u32> for UnreadCount {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decrement_saturates_at_zero() {
        let count = UnreadCount::new(1).decremented().decremented().decremented();
        assert_eq!(count.value(), 0);
        assert!(count.is_zero());
    }

    #[test]
    fn increment_and_decrement_are_symmetric_above_zero() {
        let count = UnreadCount::new(4);
        assert_eq!(count.decremented().incremented(), count);
    }

    #[test]
    fn increased_since_is_strict() {
        assert!(UnreadCount::new(3).increased_since(UnreadCount::new(0)));
        assert!(!UnreadCount::new(3).increased_since(UnreadCount::new(3)));
        assert!(!UnreadCount::new(2).increased_since(UnreadCount::new(5)));
    }
}
