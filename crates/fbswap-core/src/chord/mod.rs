// Fbswap Chord Recognition
// State machine for Ctrl+Alt+[digit]

mod automaton;

pub use automaton::{ChordAutomaton, ChordState, Step};
