// Fbswap Keyboard Notifier
// Capability the listener subscribes to for key events

use crate::input::NotifierEvent;

/// Result type for notifier operations
pub type NotifierResult<T> = Result<T, NotifierError>;

/// Errors that can occur while talking to the input subsystem
#[derive(Debug, thiserror::Error)]
pub enum NotifierError {
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("All keyboard devices disconnected, last was {0}")]
    Disconnected(String),

    #[error("Notifier not subscribed")]
    NotSubscribed,
}

/// Source of keyboard events.
///
/// `subscribe` starts delivery, `poll` waits up to `timeout_ms` (0 = do not
/// wait, -1 = wait forever) and returns whatever arrived, `unsubscribe` stops
/// delivery and releases the devices.
pub trait KeyboardNotifier {
    fn subscribe(&mut self) -> NotifierResult<()>;

    fn unsubscribe(&mut self) -> NotifierResult<()>;

    fn poll(&mut self, timeout_ms: i32) -> NotifierResult<Vec<NotifierEvent>>;
}
