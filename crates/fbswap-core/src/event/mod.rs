// Fbswap Event Handling
// Keyboard notifier capability, evdev implementation and listener lifecycle

pub mod listener;
#[cfg(feature = "runtime")]
pub mod r#loop;
pub mod notifier;

pub use listener::Listener;
pub use notifier::{KeyboardNotifier, NotifierError, NotifierResult};
#[cfg(feature = "runtime")]
pub use r#loop::{DeviceInfo, EventLoop};
