// Fbswap Key Type
// Scan codes from Linux input-event-codes.h and the fixed chord keys

use std::fmt;
use std::str::FromStr;

include!(concat!(env!("OUT_DIR"), "/key_codes.rs"));

pub const LEFT_CTRL: Key = Key(29);
pub const RIGHT_CTRL: Key = Key(97);
pub const LEFT_ALT: Key = Key(56);
pub const RIGHT_ALT: Key = Key(100);

/// First key of the digit row ("1").
pub const KEY_1: Key = Key(2);
/// Last key of the digit row ("0").
pub const KEY_0: Key = Key(11);

/// Look up a key code by its display name (case-insensitive, `KEY_` prefix optional)
pub fn key_from_name(name: &str) -> Option<Key> {
    let upper = name.trim().to_ascii_uppercase();
    let bare = upper.strip_prefix("KEY_").unwrap_or(&upper);

    KEY_NAMES
        .iter()
        .find(|(_, known)| {
            *known == upper
                || *known == bare
                || known.strip_prefix("KEY_") == Some(bare)
        })
        .map(|&(code, _)| Key(code))
}

impl Key {
    /// Whether this is one of the two Control keys
    pub fn is_ctrl(self) -> bool {
        self == LEFT_CTRL || self == RIGHT_CTRL
    }

    /// Whether this is one of the two Alt keys
    pub fn is_alt(self) -> bool {
        self == LEFT_ALT || self == RIGHT_ALT
    }

    /// Target index of a digit-row key.
    ///
    /// "1" maps to 0 through "9" to 8, and "0" maps to 9, following the
    /// physical order of the row. Returns `None` for any other key.
    pub fn digit_index(self) -> Option<u8> {
        if (KEY_1.0..=KEY_0.0).contains(&self.0) {
            Some((self.0 - KEY_1.0) as u8)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chord_key_names() {
        assert_eq!(LEFT_CTRL.name(), "LEFT_CTRL");
        assert_eq!(RIGHT_CTRL.name(), "RIGHT_CTRL");
        assert_eq!(LEFT_ALT.name(), "LEFT_ALT");
        assert_eq!(RIGHT_ALT.name(), "RIGHT_ALT");
        assert_eq!(KEY_1.name(), "KEY_1");
        assert_eq!(KEY_0.name(), "KEY_0");
    }

    #[test]
    fn test_name_table_in_code_order() {
        assert!(KEY_NAMES.windows(2).all(|w| w[0].0 < w[1].0));
        for &(code, name) in KEY_NAMES {
            assert_eq!(key_name(code), name);
        }
        assert_eq!(key_name(84), "UNKNOWN");
    }

    #[test]
    fn test_display_unknown_key() {
        assert_eq!(Key(16).to_string(), "Q");
        assert_eq!(Key(0x2ff).to_string(), "KEY(767)");
    }

    #[test]
    fn test_digit_index_row_order() {
        assert_eq!(KEY_1.digit_index(), Some(0));
        assert_eq!(Key(10).digit_index(), Some(8)); // "9"
        assert_eq!(KEY_0.digit_index(), Some(9));
        assert_eq!(Key(1).digit_index(), None); // ESC
        assert_eq!(Key(12).digit_index(), None); // MINUS
        assert_eq!(Key(82).digit_index(), None); // KP0 is not a digit-row key
    }

    #[test]
    fn test_modifier_predicates() {
        assert!(LEFT_CTRL.is_ctrl());
        assert!(RIGHT_CTRL.is_ctrl());
        assert!(!LEFT_CTRL.is_alt());
        assert!(LEFT_ALT.is_alt());
        assert!(RIGHT_ALT.is_alt());
        assert!(!Key(42).is_ctrl()); // LEFT_SHIFT
    }

    #[test]
    fn test_key_from_name() {
        assert_eq!(key_from_name("LEFT_CTRL"), Some(LEFT_CTRL));
        assert_eq!(key_from_name("right_alt"), Some(RIGHT_ALT));
        assert_eq!(key_from_name("1"), Some(KEY_1));
        assert_eq!(key_from_name("KEY_PAUSE"), Some(Key(119)));
        assert_eq!(key_from_name("no_such_key"), None);
        assert_eq!("q".parse::<Key>(), Ok(Key(16)));
        assert!("".parse::<Key>().is_err());
    }
}
