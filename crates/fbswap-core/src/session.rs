// Fbswap Session
// Owns the held-key set and the chord automaton for one listening session

use crate::chord::{ChordAutomaton, ChordState};
use crate::input::{NotifierEvent, NotifySignal};
use crate::state::{HeldKeys, PressOutcome, ReleaseOutcome};
use crate::view::{ViewIndex, ViewSwitcher};
use crate::{Action, Key};

/// Event-handling state for one listening session.
///
/// Each event is handled to completion before the next one: the held-key set
/// is updated, the automaton advanced, and the switcher called at most once.
pub struct Session<S: ViewSwitcher> {
    held: HeldKeys,
    chord: ChordAutomaton,
    switcher: S,
    fired: u64,
}

impl<S: ViewSwitcher> Session<S> {
    pub fn new(switcher: S) -> Self {
        Self {
            held: HeldKeys::new(),
            chord: ChordAutomaton::new(),
            switcher,
            fired: 0,
        }
    }

    /// Handle one notifier event
    pub fn handle_event(&mut self, event: &NotifierEvent) -> NotifySignal {
        match event.key_transition() {
            Some((key, action)) => self.handle_key(key, action),
            None => NotifySignal::Ignored,
        }
    }

    /// Handle one key transition
    pub fn handle_key(&mut self, key: Key, action: Action) -> NotifySignal {
        if action.is_released() {
            if self.held.is_empty() {
                return NotifySignal::Ignored;
            }
            if self.held.release(key) == ReleaseOutcome::NotHeld {
                log::warn!("release of {} which is not held, ignoring", key);
                return NotifySignal::Ignored;
            }
        } else {
            match self.held.press(key) {
                PressOutcome::New => {}
                PressOutcome::Duplicate | PressOutcome::Full => return NotifySignal::Ignored,
            }
        }
        log::debug!("{} {} ({} held)", key, action, self.held.count());

        let step = self.chord.advance(key, action, self.held.count());
        if let Some(target) = step.fire {
            self.fire(target);
        }

        if step.reset_complete {
            NotifySignal::StopPropagation
        } else {
            NotifySignal::Handled
        }
    }

    // Fire-and-forget: a failed switch does not change the automaton.
    fn fire(&mut self, target: ViewIndex) {
        self.fired += 1;
        match self.switcher.switch_view(target) {
            Ok(()) => log::info!("switch to view {} complete", target),
            Err(e) => log::warn!("switch to view {} failed: {}", target, e),
        }
    }

    /// Return to the initial state: nothing held, automaton idle
    pub fn reset(&mut self) {
        self.held.clear();
        self.chord.reset();
    }

    pub fn state(&self) -> ChordState {
        self.chord.state()
    }

    pub fn held_keys(&self) -> &HeldKeys {
        &self.held
    }

    /// Number of chords that fired during this session
    pub fn fired_count(&self) -> u64 {
        self.fired
    }

    pub fn switcher(&self) -> &S {
        &self.switcher
    }

    /// Consume the session, handing the switcher back to its owner
    pub fn into_switcher(self) -> S {
        self.switcher
    }
}
