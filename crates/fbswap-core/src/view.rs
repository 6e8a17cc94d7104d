// Fbswap View Switching
// Target index and the switch capability injected into a session

use std::fmt;
use std::sync::Arc;

use crate::Key;

/// Number of addressable views, one per digit key.
pub const VIEW_COUNT: u8 = 10;

/// A validated view index in `0..=9`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewIndex(u8);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("view index {0} out of range (0..={max})", max = VIEW_COUNT - 1)]
pub struct ViewIndexError(pub u32);

impl ViewIndex {
    pub fn new(index: u8) -> Result<Self, ViewIndexError> {
        if index < VIEW_COUNT {
            Ok(Self(index))
        } else {
            Err(ViewIndexError(index as u32))
        }
    }

    /// The view selected by a digit-row key
    pub fn from_digit_key(key: Key) -> Option<Self> {
        key.digit_index().map(Self)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u32> for ViewIndex {
    type Error = ViewIndexError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .map_err(|_| ViewIndexError(value))
            .and_then(Self::new)
    }
}

impl fmt::Display for ViewIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Capability that performs the actual view switch.
///
/// Implementations own whatever device handle they need and serialize access
/// to it themselves; callers treat the request as fire-and-forget.
pub trait ViewSwitcher {
    type Error: std::error::Error;

    fn switch_view(&self, target: ViewIndex) -> Result<(), Self::Error>;
}

impl<T: ViewSwitcher + ?Sized> ViewSwitcher for Arc<T> {
    type Error = T::Error;

    fn switch_view(&self, target: ViewIndex) -> Result<(), Self::Error> {
        (**self).switch_view(target)
    }
}

impl<T: ViewSwitcher + ?Sized> ViewSwitcher for &T {
    type Error = T::Error;

    fn switch_view(&self, target: ViewIndex) -> Result<(), Self::Error> {
        (**self).switch_view(target)
    }
}

/// Switcher that only logs requests (dry-run mode)
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSwitcher;

impl ViewSwitcher for LogSwitcher {
    type Error = std::convert::Infallible;

    fn switch_view(&self, target: ViewIndex) -> Result<(), Self::Error> {
        log::info!("dry run: would switch to view {}", target);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::{KEY_0, KEY_1};

    #[test]
    fn test_view_index_bounds() {
        assert_eq!(ViewIndex::new(0).map(ViewIndex::get), Ok(0));
        assert_eq!(ViewIndex::new(9).map(ViewIndex::get), Ok(9));
        assert_eq!(ViewIndex::new(10), Err(ViewIndexError(10)));
    }

    #[test]
    fn test_view_index_try_from_u32() {
        assert!(ViewIndex::try_from(3u32).is_ok());
        assert_eq!(ViewIndex::try_from(300u32), Err(ViewIndexError(300)));
    }

    #[test]
    fn test_view_index_from_digit_key() {
        assert_eq!(ViewIndex::from_digit_key(KEY_1).map(ViewIndex::get), Some(0));
        assert_eq!(ViewIndex::from_digit_key(KEY_0).map(ViewIndex::get), Some(9));
        assert_eq!(ViewIndex::from_digit_key(Key::from(16)), None);
    }

    #[test]
    fn test_view_index_error_message() {
        assert_eq!(
            ViewIndexError(12).to_string(),
            "view index 12 out of range (0..=9)"
        );
    }

    #[test]
    fn test_log_switcher_never_fails() {
        let switcher = LogSwitcher;
        assert!(switcher.switch_view(ViewIndex::new(4).unwrap()).is_ok());
    }
}
