// Fbswap Core Library
// Ctrl+Alt+[digit] chord recognition for switching framebuffer views

pub mod action;
pub mod chord;
pub mod config;
pub mod event;
pub mod input;
pub mod key;
pub mod modifier;
pub mod output;
pub mod session;
pub mod state;
pub mod view;

pub use action::Action;
pub use chord::{ChordAutomaton, ChordState, Step};
pub use event::{KeyboardNotifier, Listener, NotifierError, NotifierResult};
pub use input::{EventKind, NotifierEvent, NotifySignal};
pub use key::Key;
pub use modifier::{Modifier, ModifierGroup};
pub use output::{Framebuffer, FramebufferError, FramebufferInfo};
pub use session::Session;
pub use state::{HeldKeys, PressOutcome, ReleaseOutcome};
pub use view::{LogSwitcher, ViewIndex, ViewIndexError, ViewSwitcher};

#[cfg(feature = "runtime")]
pub use config::{Config, ConfigError};
#[cfg(feature = "runtime")]
pub use event::EventLoop;
