// Fbswap Input Layer - Device Detection
// Decides whether an input device looks like a keyboard

use std::collections::HashSet;

/// Device capabilities extracted from evdev
#[derive(Debug, Clone)]
pub struct DeviceCapabilities {
    /// Whether the device supports EV_KEY events
    pub has_ev_key: bool,
    /// Supported key codes
    pub supported_keys: HashSet<u16>,
}

impl DeviceCapabilities {
    pub fn new(has_ev_key: bool, supported_keys: impl IntoIterator<Item = u16>) -> Self {
        Self {
            has_ev_key,
            supported_keys: supported_keys.into_iter().collect(),
        }
    }

    pub fn supports_key(&self, key_code: u16) -> bool {
        self.supported_keys.contains(&key_code)
    }

    #[cfg(feature = "runtime")]
    pub fn from_device(device: &evdev::Device) -> Self {
        let has_ev_key = device.supported_events().contains(evdev::EventType::KEY);
        let keys = device
            .supported_keys()
            .map(|keys| keys.iter().map(|k| k.code()).collect::<Vec<_>>())
            .unwrap_or_default();
        Self::new(has_ev_key, keys)
    }
}

// QWERTY row key codes: Q, W, E, R, T, Y
const QWERTY_CODES: &[u16] = &[16, 17, 18, 19, 20, 21];

// SPACE, A, Z
const A_Z_SPACE_CODES: &[u16] = &[57, 30, 44];

/// A device is a keyboard when it reports EV_KEY along with the whole QWERTY
/// row, A, Z and SPACE. Mice, power buttons and media remotes fail this.
pub fn is_keyboard(capabilities: &DeviceCapabilities) -> bool {
    if !capabilities.has_ev_key {
        return false;
    }

    QWERTY_CODES
        .iter()
        .chain(A_Z_SPACE_CODES)
        .all(|&code| capabilities.supports_key(code))
}
