// Fbswap Key State
// Tracking of keys that are physically down

mod held_keys;

pub use held_keys::{HeldKeys, PressOutcome, ReleaseOutcome, HELD_KEYS_CAPACITY};
