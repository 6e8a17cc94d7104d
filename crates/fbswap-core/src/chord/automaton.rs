// Fbswap Chord Automaton
// Recognizes Ctrl+Alt+[digit] and fires once per chord

use std::fmt;

use crate::view::ViewIndex;
use crate::{Action, Key, Modifier};

/// States of the chord automaton
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChordState {
    /// No chord in progress, nothing held
    #[default]
    Idle,
    /// One modifier down, tagged with the one that came first
    ModifierHeld(Modifier),
    /// A Ctrl and an Alt are both down, waiting for a digit
    BothHeld,
    /// The chord fired; waiting for every key to be released
    Fired,
    /// An unexpected key broke the chord; waiting for every key to be released
    Resetting,
}

impl ChordState {
    /// Number of keys that must be held while in this state.
    ///
    /// Only the chord-building states pin the count; `Fired` and
    /// `Resetting` accept any number of held keys.
    fn held_while_in(self) -> Option<usize> {
        match self {
            ChordState::Idle => Some(0),
            ChordState::ModifierHeld(_) => Some(1),
            ChordState::BothHeld => Some(2),
            ChordState::Fired | ChordState::Resetting => None,
        }
    }

    /// Whether this state waits for a full release before re-arming
    pub fn is_waiting_for_release(self) -> bool {
        matches!(self, ChordState::Fired | ChordState::Resetting)
    }
}

impl fmt::Display for ChordState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChordState::Idle => write!(f, "idle"),
            ChordState::ModifierHeld(m) => write!(f, "{} held", m),
            ChordState::BothHeld => write!(f, "ctrl+alt held"),
            ChordState::Fired => write!(f, "fired"),
            ChordState::Resetting => write!(f, "resetting"),
        }
    }
}

/// Outcome of feeding one key transition to the automaton
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub from: ChordState,
    pub to: ChordState,
    /// View to switch to, set only on the transition into `Fired`
    pub fire: Option<ViewIndex>,
    /// A chord broken by an invalid key or a fault finished resetting to
    /// `Idle` on this event
    pub reset_complete: bool,
}

/// Chord-recognition state machine.
///
/// Driven by presses: Ctrl then Alt (or Alt then Ctrl, either side) then a
/// digit fires once. Any other key sends it to `Resetting`. Both `Fired` and
/// `Resetting` only return to `Idle` once the held-key count reaches zero, so
/// a held chord never fires twice.
#[derive(Debug, Clone, Default)]
pub struct ChordAutomaton {
    state: ChordState,
    // Set while `Resetting` was entered by an invalid key or a fault rather
    // than by letting go of a partial chord
    broken: bool,
}

impl ChordAutomaton {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ChordState {
        self.state
    }

    /// Return to `Idle` unconditionally
    pub fn reset(&mut self) {
        self.state = ChordState::Idle;
        self.broken = false;
    }

    /// Advance by one key transition.
    ///
    /// `held` is the held-key count after the transition has been applied to
    /// the held-key set.
    pub fn advance(&mut self, key: Key, action: Action, held: usize) -> Step {
        let from = self.state;
        let mut fire = None;
        let faulted = self.is_inconsistent(action, held);

        let next = if faulted {
            log::error!(
                "chord automaton fault: {} with {} key(s) held after {} {}",
                from,
                held,
                key,
                action
            );
            log::error!("reset initiated");
            ChordState::Resetting
        } else if action.is_released() {
            match from {
                ChordState::Fired | ChordState::Resetting => from,
                _ => {
                    log::debug!("{} released mid-chord, reset initiated", key);
                    ChordState::Resetting
                }
            }
        } else {
            match from {
                ChordState::Idle => match Modifier::from_key(key) {
                    Some(modifier) => {
                        log::debug!("{} pressed first", modifier.group());
                        ChordState::ModifierHeld(modifier)
                    }
                    None => Self::invalid(key),
                },
                ChordState::ModifierHeld(first) => match Modifier::from_key(key) {
                    Some(second) if second.group() == first.group().complement() => {
                        log::debug!("{} + {} pressed", first.group(), second.group());
                        ChordState::BothHeld
                    }
                    _ => Self::invalid(key),
                },
                ChordState::BothHeld => match ViewIndex::from_digit_key(key) {
                    Some(target) => {
                        log::info!("ctrl+alt+{} pressed, switching to view {}", key, target);
                        fire = Some(target);
                        ChordState::Fired
                    }
                    None => Self::invalid(key),
                },
                ChordState::Fired | ChordState::Resetting => from,
            }
        };

        if next == ChordState::Resetting && from != ChordState::Resetting {
            self.broken = faulted || action.is_down();
        }

        let mut reset_complete = false;
        let to = if next.is_waiting_for_release() && held == 0 {
            if next == ChordState::Fired {
                log::debug!("chord released, re-armed");
            } else if self.broken {
                log::debug!("reset complete");
                reset_complete = true;
            } else {
                log::debug!("chord abandoned, re-armed");
            }
            self.broken = false;
            ChordState::Idle
        } else {
            if next.is_waiting_for_release() && next == from {
                log::debug!("{} - total pressed: {}", next, held);
            }
            next
        };

        self.state = to;
        Step {
            from,
            to,
            fire,
            reset_complete,
        }
    }

    fn invalid(key: Key) -> ChordState {
        log::debug!("invalid key {} pressed, reset initiated", key);
        ChordState::Resetting
    }

    // The chord-building states pin how many keys were held before this
    // transition. Anything else means the caller's held-key set and this
    // automaton have drifted apart.
    fn is_inconsistent(&self, action: Action, held: usize) -> bool {
        let Some(expected) = self.state.held_while_in() else {
            return false;
        };
        let before = if action.is_down() {
            held.checked_sub(1)
        } else {
            held.checked_add(1)
        };
        before != Some(expected)
    }
}
