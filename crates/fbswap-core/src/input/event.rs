// Fbswap Input Layer - Notifier Events
// Raw events delivered by the keyboard notifier and the signals returned for them

use std::fmt;

use crate::{Action, Key};

/// EV_KEY event type code from linux/input-event-codes.h
pub const EV_KEY: u16 = 0x01;

/// Check if an event type is a key event.
pub fn is_key_event(event_type: u16) -> bool {
    event_type == EV_KEY
}

/// Payload type of a notifier event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// A keyboard scan code (EV_KEY)
    Keycode,
    /// Any other event type (EV_SYN, EV_MSC, EV_LED, ...)
    Other(u16),
}

impl EventKind {
    pub fn from_event_type(event_type: u16) -> Self {
        if is_key_event(event_type) {
            EventKind::Keycode
        } else {
            EventKind::Other(event_type)
        }
    }
}

/// One event as delivered by a keyboard notifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotifierEvent {
    pub kind: EventKind,
    pub code: u16,
    pub value: i32,
}

impl NotifierEvent {
    pub fn new(kind: EventKind, code: u16, value: i32) -> Self {
        Self { kind, code, value }
    }

    /// A key press (`value == 1`)
    pub fn press(key: Key) -> Self {
        Self::new(EventKind::Keycode, key.code(), Action::Press as i32)
    }

    /// A key release (`value == 0`)
    pub fn release(key: Key) -> Self {
        Self::new(EventKind::Keycode, key.code(), Action::Release as i32)
    }

    /// An autorepeat of a held key (`value == 2`)
    pub fn repeat(key: Key) -> Self {
        Self::new(EventKind::Keycode, key.code(), Action::Repeat as i32)
    }

    /// The key transition carried by this event.
    ///
    /// Returns `None` for anything that is not a scan-code event with a
    /// known value.
    pub fn key_transition(&self) -> Option<(Key, Action)> {
        match self.kind {
            EventKind::Keycode => Action::from_i32(self.value).map(|a| (Key::from(self.code), a)),
            EventKind::Other(_) => None,
        }
    }
}

#[cfg(feature = "runtime")]
impl From<evdev::InputEvent> for NotifierEvent {
    fn from(event: evdev::InputEvent) -> Self {
        Self::new(
            EventKind::from_event_type(event.event_type().0),
            event.code(),
            event.value(),
        )
    }
}

/// Signal handed back to the dispatch chain for each event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifySignal {
    /// Event consumed by the chord logic
    Handled,
    /// Event not relevant, propagate normally
    Ignored,
    /// A broken chord was fully released; halt further notification
    StopPropagation,
}

impl fmt::Display for NotifySignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotifySignal::Handled => write!(f, "handled"),
            NotifySignal::Ignored => write!(f, "ignored"),
            NotifySignal::StopPropagation => write!(f, "stop"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_key_event_with_ev_key() {
        assert!(is_key_event(EV_KEY));
    }

    #[test]
    fn test_is_key_event_with_other_event() {
        assert!(!is_key_event(0x00)); // EV_SYN
        assert!(!is_key_event(0x04)); // EV_MSC
        assert!(!is_key_event(0x11)); // EV_LED
    }

    #[test]
    fn test_event_kind_from_event_type() {
        assert_eq!(EventKind::from_event_type(0x01), EventKind::Keycode);
        assert_eq!(EventKind::from_event_type(0x04), EventKind::Other(0x04));
    }

    #[test]
    fn test_key_transition() {
        let key = Key::from(29);
        assert_eq!(NotifierEvent::press(key).key_transition(), Some((key, Action::Press)));
        assert_eq!(
            NotifierEvent::release(key).key_transition(),
            Some((key, Action::Release))
        );
        assert_eq!(NotifierEvent::repeat(key).key_transition(), Some((key, Action::Repeat)));
    }

    #[test]
    fn test_key_transition_rejects_non_keycode() {
        // MSC_SCAN carries the raw scan code as its value
        let event = NotifierEvent::new(EventKind::Other(0x04), 4, 0x7001e);
        assert_eq!(event.key_transition(), None);
    }

    #[test]
    fn test_key_transition_rejects_unknown_value() {
        let event = NotifierEvent::new(EventKind::Keycode, 30, 7);
        assert_eq!(event.key_transition(), None);
    }
}
