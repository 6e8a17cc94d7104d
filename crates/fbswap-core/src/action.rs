use std::fmt;

/// Direction of a key transition, using the evdev `value` encoding:
///   0 == released
///   1 == pressed
///   2 == autorepeat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Action {
    Release = 0,
    Press = 1,
    Repeat = 2,
}

impl Action {
    /// Whether the key is down after this transition (PRESS or REPEAT)
    pub fn is_down(self) -> bool {
        matches!(self, Action::Press | Action::Repeat)
    }

    /// Returns true if this is a RELEASE event
    pub fn is_released(self) -> bool {
        matches!(self, Action::Release)
    }

    /// Create Action from the evdev event value
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(Action::Release),
            1 => Some(Action::Press),
            2 => Some(Action::Repeat),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Release => write!(f, "released"),
            Action::Press => write!(f, "pressed"),
            Action::Repeat => write!(f, "repeated"),
        }
    }
}
