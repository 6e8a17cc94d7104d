// Fbswap evdev Notifier
// Reads key events straight from /dev/input/event* devices

use std::io::ErrorKind;
use std::os::unix::io::AsRawFd;

use evdev::Device;

use crate::event::notifier::{KeyboardNotifier, NotifierError, NotifierResult};
use crate::input::{is_keyboard, matches_device_filter, DeviceCapabilities, NotifierEvent};

/// Device information for listing devices
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    /// Device index
    pub index: usize,
    /// Device name
    pub name: String,
    /// Device path (if available)
    pub path: Option<String>,
}

/// Keyboard notifier backed by evdev devices.
///
/// Devices are opened on `subscribe` and closed on `unsubscribe`. By default
/// they are only observed; with `grab` other readers stop receiving their
/// events while fbswap is subscribed.
pub struct EventLoop {
    filter: Vec<String>,
    grab: bool,
    devices: Vec<Device>,
    poll_fds: Vec<libc::pollfd>,
    grabbed: bool,
}

impl EventLoop {
    /// Create an unsubscribed notifier for the given device filter
    pub fn new(filter: Vec<String>, grab: bool) -> Self {
        Self {
            filter,
            grab,
            devices: Vec::new(),
            poll_fds: Vec::new(),
            grabbed: false,
        }
    }

    /// List all available keyboard devices
    ///
    /// This is used by the --list-devices CLI flag.
    pub fn list_devices() -> NotifierResult<Vec<DeviceInfo>> {
        let devices_info: Vec<DeviceInfo> = evdev::enumerate()
            .filter(|(_, device)| is_keyboard(&DeviceCapabilities::from_device(device)))
            .enumerate()
            .map(|(index, (path, device))| DeviceInfo {
                index,
                name: device.name().unwrap_or("Unknown").to_string(),
                path: path.to_str().map(|s| s.to_string()),
            })
            .collect();

        if devices_info.is_empty() {
            return Err(NotifierError::DeviceNotFound(
                "No keyboard devices found".to_string(),
            ));
        }

        Ok(devices_info)
    }

    /// Find keyboard devices honoring explicit filter names/paths.
    fn find_keyboards(filter_names: &[String]) -> NotifierResult<Vec<Device>> {
        let mut keyboards = Vec::new();

        for (path, device) in evdev::enumerate() {
            let device_name = device.name().unwrap_or("Unknown");
            let device_path = path.to_str().unwrap_or_default();
            let keyboard = is_keyboard(&DeviceCapabilities::from_device(&device));

            if matches_device_filter(device_name, device_path, filter_names, keyboard) {
                log::info!("listening to {} ({})", device_name, device_path);
                keyboards.push(device);
            }
        }

        if keyboards.is_empty() {
            let reason = if filter_names.is_empty() {
                "No keyboard devices found".to_string()
            } else {
                format!("No device matches {:?}", filter_names)
            };
            return Err(NotifierError::DeviceNotFound(reason));
        }

        Ok(keyboards)
    }

    /// Create poll file descriptors from devices
    fn create_poll_fds(devices: &[Device]) -> Vec<libc::pollfd> {
        devices
            .iter()
            .map(|d| libc::pollfd {
                fd: d.as_raw_fd(),
                events: libc::POLLIN,
                revents: 0,
            })
            .collect()
    }

    // Drop devices whose fd reported a hang-up and return their names
    fn drop_hung_up(&mut self) -> Vec<String> {
        let dead = take_hung_up(&mut self.devices, &mut self.poll_fds);
        dead.iter()
            .map(|d| d.name().unwrap_or("Unknown").to_string())
            .collect()
    }

    fn ungrab_all(&mut self) {
        if self.grabbed {
            for device in &mut self.devices {
                if let Err(e) = device.ungrab() {
                    log::warn!(
                        "failed to ungrab {}: {}",
                        device.name().unwrap_or("Unknown"),
                        e
                    );
                }
            }
            self.grabbed = false;
        }
    }

    /// Get the names of all subscribed devices
    pub fn device_names(&self) -> Vec<String> {
        self.devices
            .iter()
            .map(|d| d.name().unwrap_or("Unknown").to_string())
            .collect()
    }

    /// Get number of subscribed devices
    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    pub fn is_subscribed(&self) -> bool {
        !self.devices.is_empty()
    }
}

impl KeyboardNotifier for EventLoop {
    fn subscribe(&mut self) -> NotifierResult<()> {
        if self.is_subscribed() {
            return Ok(());
        }
        let mut devices = Self::find_keyboards(&self.filter)?;

        if self.grab {
            // A crashed previous instance may have left a grab behind
            for device in &mut devices {
                let _ = device.ungrab();
            }
            for device in &mut devices {
                device.grab()?;
            }
            self.grabbed = true;
        }

        self.poll_fds = Self::create_poll_fds(&devices);
        self.devices = devices;
        Ok(())
    }

    fn unsubscribe(&mut self) -> NotifierResult<()> {
        self.ungrab_all();
        self.poll_fds.clear();
        self.devices.clear();
        Ok(())
    }

    /// Wait for events on all subscribed devices.
    ///
    /// A timeout or an interrupted poll (EINTR, e.g. on Ctrl+C) yields an
    /// empty batch so the caller can check its shutdown flag.
    fn poll(&mut self, timeout_ms: i32) -> NotifierResult<Vec<NotifierEvent>> {
        if !self.is_subscribed() {
            return Err(NotifierError::NotSubscribed);
        }
        let mut events = Vec::new();

        let poll_result = unsafe {
            libc::poll(
                self.poll_fds.as_mut_ptr(),
                self.poll_fds.len() as libc::nfds_t,
                timeout_ms,
            )
        };

        if poll_result < 0 {
            let err = std::io::Error::last_os_error();
            if err.kind() == ErrorKind::Interrupted {
                return Ok(events);
            }
            return Err(NotifierError::Io(err));
        }

        if poll_result == 0 {
            return Ok(events);
        }

        for (i, device) in self.devices.iter_mut().enumerate() {
            if self.poll_fds[i].revents & libc::POLLIN == 0 {
                continue;
            }
            let device_name = device.name().unwrap_or("Unknown").to_string();
            match device.fetch_events() {
                Ok(device_events) => events.extend(device_events.map(NotifierEvent::from)),
                Err(e) if e.kind() == ErrorKind::WouldBlock => {}
                Err(e) if e.raw_os_error() == Some(libc::ENODEV) => {
                    // Unplugged between poll and read; the next poll reports POLLHUP
                    self.poll_fds[i].revents |= libc::POLLHUP;
                }
                Err(e) => log::warn!("failed to read from {}: {}", device_name, e),
            }
        }

        // An unplugged node stays readable-with-POLLHUP forever, so it has to
        // leave the poll set or every later poll returns at once.
        let gone = self.drop_hung_up();
        for name in &gone {
            log::warn!("{} disconnected, no longer listening to it", name);
        }
        if let Some(last) = gone.into_iter().last().filter(|_| self.devices.is_empty()) {
            self.grabbed = false;
            return Err(NotifierError::Disconnected(last));
        }

        Ok(events)
    }
}

/// Whether poll reported the fd as gone rather than readable
fn is_hung_up(revents: libc::c_short) -> bool {
    revents & (libc::POLLHUP | libc::POLLERR | libc::POLLNVAL) != 0
}

/// Remove every entry whose pollfd hung up, keeping the two lists aligned
fn take_hung_up<T>(devices: &mut Vec<T>, poll_fds: &mut Vec<libc::pollfd>) -> Vec<T> {
    let mut dead = Vec::new();
    let mut i = 0;
    while i < poll_fds.len() {
        if is_hung_up(poll_fds[i].revents) {
            poll_fds.remove(i);
            dead.push(devices.remove(i));
        } else {
            i += 1;
        }
    }
    dead
}

/// Devices MUST be ungrabbed when the notifier goes away, otherwise the
/// keyboard stays unusable for everything else. Drop also runs on panic.
impl Drop for EventLoop {
    fn drop(&mut self) {
        self.ungrab_all();
    }
}
