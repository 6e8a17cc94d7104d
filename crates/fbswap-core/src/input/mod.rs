// Fbswap Input Layer
// Notifier events, dispatch signals and device selection

mod device;
mod event;
mod filter;

pub use device::{is_keyboard, DeviceCapabilities};
pub use event::{is_key_event, EventKind, NotifierEvent, NotifySignal, EV_KEY};
pub use filter::matches_device_filter;
