// Fbswap Held-Key Set
// Ordered set of the keys currently held down, in press order

use smallvec::SmallVec;

use crate::Key;

/// Maximum number of distinct keys tracked at once.
pub const HELD_KEYS_CAPACITY: usize = 256;

/// Result of recording a press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressOutcome {
    /// The key was not held and has been appended
    New,
    /// The key was already held; nothing changed
    Duplicate,
    /// The set is full; the key was not recorded
    Full,
}

/// Result of recording a release
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// The key was held and has been removed
    Removed,
    /// The key was not held; nothing changed
    NotHeld,
}

/// Keys currently held down, in the order they were pressed.
///
/// No key appears twice. Releasing a key that is not held leaves the set
/// untouched, so a missed press can never drive the count out of step with
/// the keys actually recorded.
#[derive(Debug, Clone, Default)]
pub struct HeldKeys {
    // Chords rarely exceed a handful of keys
    keys: SmallVec<[Key; 8]>,
}

impl HeldKeys {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press
    pub fn press(&mut self, key: Key) -> PressOutcome {
        if self.contains(key) {
            return PressOutcome::Duplicate;
        }
        if self.keys.len() >= HELD_KEYS_CAPACITY {
            log::warn!("held-key set full, dropping press of {}", key);
            return PressOutcome::Full;
        }
        self.keys.push(key);
        PressOutcome::New
    }

    /// Record a key release, preserving the order of the remaining keys
    pub fn release(&mut self, key: Key) -> ReleaseOutcome {
        match self.keys.iter().position(|&held| held == key) {
            Some(index) => {
                self.keys.remove(index);
                ReleaseOutcome::Removed
            }
            None => ReleaseOutcome::NotHeld,
        }
    }

    /// Number of keys currently held
    pub fn count(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn contains(&self, key: Key) -> bool {
        self.keys.contains(&key)
    }

    /// Iterate held keys in press order
    pub fn iter(&self) -> impl Iterator<Item = Key> + '_ {
        self.keys.iter().copied()
    }

    /// Forget every held key
    pub fn clear(&mut self) {
        self.keys.clear();
    }
}
