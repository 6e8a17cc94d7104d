// Fbswap Modifier Keys
// The four modifier keys that can open a chord

use std::fmt;

use crate::key::{LEFT_ALT, LEFT_CTRL, RIGHT_ALT, RIGHT_CTRL};
use crate::Key;

/// Modifier family. A chord needs one key from each family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModifierGroup {
    Ctrl,
    Alt,
}

impl ModifierGroup {
    /// The family that completes a chord started with this one
    pub fn complement(self) -> Self {
        match self {
            ModifierGroup::Ctrl => ModifierGroup::Alt,
            ModifierGroup::Alt => ModifierGroup::Ctrl,
        }
    }
}

/// A specific chord modifier key, left or right
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    LeftCtrl,
    RightCtrl,
    LeftAlt,
    RightAlt,
}

impl Modifier {
    pub const ALL: [Modifier; 4] = [
        Modifier::LeftCtrl,
        Modifier::RightCtrl,
        Modifier::LeftAlt,
        Modifier::RightAlt,
    ];

    /// Get the modifier for a key code, if it is one
    pub fn from_key(key: Key) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.key() == key)
    }

    /// The scan code of this modifier
    pub fn key(self) -> Key {
        match self {
            Modifier::LeftCtrl => LEFT_CTRL,
            Modifier::RightCtrl => RIGHT_CTRL,
            Modifier::LeftAlt => LEFT_ALT,
            Modifier::RightAlt => RIGHT_ALT,
        }
    }

    pub fn group(self) -> ModifierGroup {
        match self {
            Modifier::LeftCtrl | Modifier::RightCtrl => ModifierGroup::Ctrl,
            Modifier::LeftAlt | Modifier::RightAlt => ModifierGroup::Alt,
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Modifier::LeftCtrl => "LCtrl",
            Modifier::RightCtrl => "RCtrl",
            Modifier::LeftAlt => "LAlt",
            Modifier::RightAlt => "RAlt",
        };
        f.write_str(name)
    }
}

impl fmt::Display for ModifierGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModifierGroup::Ctrl => f.write_str("Ctrl"),
            ModifierGroup::Alt => f.write_str("Alt"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_from_key() {
        assert_eq!(Modifier::from_key(Key::from(29)), Some(Modifier::LeftCtrl));
        assert_eq!(Modifier::from_key(Key::from(97)), Some(Modifier::RightCtrl));
        assert_eq!(Modifier::from_key(Key::from(56)), Some(Modifier::LeftAlt));
        assert_eq!(Modifier::from_key(Key::from(100)), Some(Modifier::RightAlt));
        assert_eq!(Modifier::from_key(Key::from(42)), None); // LEFT_SHIFT
        assert_eq!(Modifier::from_key(Key::from(125)), None); // LEFT_META
    }

    #[test]
    fn test_modifier_groups() {
        assert_eq!(Modifier::LeftCtrl.group(), ModifierGroup::Ctrl);
        assert_eq!(Modifier::RightCtrl.group(), ModifierGroup::Ctrl);
        assert_eq!(Modifier::LeftAlt.group(), ModifierGroup::Alt);
        assert_eq!(Modifier::RightAlt.group(), ModifierGroup::Alt);
        assert_eq!(ModifierGroup::Ctrl.complement(), ModifierGroup::Alt);
        assert_eq!(ModifierGroup::Alt.complement(), ModifierGroup::Ctrl);
    }

    #[test]
    fn test_key_round_trip() {
        for modifier in Modifier::ALL {
            assert_eq!(Modifier::from_key(modifier.key()), Some(modifier));
        }
    }
}
