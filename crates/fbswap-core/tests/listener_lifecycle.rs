// Fbswap Listener Lifecycle Tests
//
// Drives a Listener with a scripted notifier instead of real devices.
//
// Run with: cargo test --test listener_lifecycle

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use fbswap_core::key::{KEY_1, LEFT_ALT, LEFT_CTRL};
use fbswap_core::{
    ChordState, KeyboardNotifier, Listener, LogSwitcher, NotifierError, NotifierEvent,
    NotifierResult, NotifySignal, ViewIndex, ViewSwitcher,
};
use parking_lot::Mutex;

/// Notifier that replays pre-recorded batches, one per poll
struct ScriptedNotifier {
    batches: VecDeque<Vec<NotifierEvent>>,
    subscribed: bool,
    subscribe_calls: usize,
    // Cleared when the script runs out, stopping `Listener::run`
    running: Option<Arc<AtomicBool>>,
}

impl ScriptedNotifier {
    fn new(batches: Vec<Vec<NotifierEvent>>) -> Self {
        Self {
            batches: batches.into(),
            subscribed: false,
            subscribe_calls: 0,
            running: None,
        }
    }
}

impl KeyboardNotifier for ScriptedNotifier {
    fn subscribe(&mut self) -> NotifierResult<()> {
        self.subscribe_calls += 1;
        self.subscribed = true;
        Ok(())
    }

    fn unsubscribe(&mut self) -> NotifierResult<()> {
        self.subscribed = false;
        Ok(())
    }

    fn poll(&mut self, _timeout_ms: i32) -> NotifierResult<Vec<NotifierEvent>> {
        if !self.subscribed {
            return Err(NotifierError::NotSubscribed);
        }
        let batch = self.batches.pop_front().unwrap_or_default();
        if self.batches.is_empty() {
            if let Some(running) = &self.running {
                running.store(false, Ordering::SeqCst);
            }
        }
        Ok(batch)
    }
}

/// Notifier whose subscription always fails, as when no keyboard exists
struct NoDevices;

impl KeyboardNotifier for NoDevices {
    fn subscribe(&mut self) -> NotifierResult<()> {
        Err(NotifierError::DeviceNotFound("No keyboard devices found".to_string()))
    }

    fn unsubscribe(&mut self) -> NotifierResult<()> {
        Ok(())
    }

    fn poll(&mut self, _timeout_ms: i32) -> NotifierResult<Vec<NotifierEvent>> {
        Err(NotifierError::NotSubscribed)
    }
}

/// Notifier whose device disappears after subscription
struct BrokenPoll {
    calls: Arc<Mutex<Vec<&'static str>>>,
}

impl KeyboardNotifier for BrokenPoll {
    fn subscribe(&mut self) -> NotifierResult<()> {
        self.calls.lock().push("subscribe");
        Ok(())
    }

    fn unsubscribe(&mut self) -> NotifierResult<()> {
        self.calls.lock().push("unsubscribe");
        Ok(())
    }

    fn poll(&mut self, _timeout_ms: i32) -> NotifierResult<Vec<NotifierEvent>> {
        // The only keyboard was unplugged
        self.calls.lock().push("poll");
        Err(NotifierError::Disconnected("AT Translated Set 2 keyboard".to_string()))
    }
}

#[derive(Default)]
struct SharedRecorder {
    targets: Mutex<Vec<u8>>,
}

impl ViewSwitcher for SharedRecorder {
    type Error = std::convert::Infallible;

    fn switch_view(&self, target: ViewIndex) -> Result<(), Self::Error> {
        self.targets.lock().push(target.get());
        Ok(())
    }
}

fn chord_batch() -> Vec<NotifierEvent> {
    vec![
        NotifierEvent::press(LEFT_CTRL),
        NotifierEvent::press(LEFT_ALT),
        NotifierEvent::press(KEY_1),
    ]
}

#[test]
fn test_start_subscribes() {
    let listener = Listener::start(ScriptedNotifier::new(vec![]), LogSwitcher).unwrap();
    assert_eq!(listener.notifier().subscribe_calls, 1);
    assert_eq!(listener.session().state(), ChordState::Idle);
}

#[test]
fn test_start_propagates_subscribe_failure() {
    let result = Listener::start(NoDevices, LogSwitcher);
    assert!(matches!(result, Err(NotifierError::DeviceNotFound(_))));
}

#[test]
fn test_pump_dispatches_batch() {
    let recorder = Arc::new(SharedRecorder::default());
    let notifier = ScriptedNotifier::new(vec![chord_batch()]);
    let mut listener = Listener::start(notifier, Arc::clone(&recorder)).unwrap();

    let signals = listener.pump(0).unwrap();

    assert_eq!(signals, vec![NotifySignal::Handled; 3]);
    assert_eq!(*recorder.targets.lock(), vec![0]);
}

#[test]
fn test_run_until_flag_cleared() {
    let recorder = Arc::new(SharedRecorder::default());
    let running = Arc::new(AtomicBool::new(true));

    let mut notifier = ScriptedNotifier::new(vec![
        chord_batch(),
        vec![
            NotifierEvent::release(KEY_1),
            NotifierEvent::release(LEFT_ALT),
            NotifierEvent::release(LEFT_CTRL),
        ],
        chord_batch(),
    ]);
    notifier.running = Some(Arc::clone(&running));

    let mut listener = Listener::start(notifier, Arc::clone(&recorder)).unwrap();
    listener.run(&running, 10).unwrap();

    assert_eq!(*recorder.targets.lock(), vec![0, 0]);
    assert_eq!(listener.session().fired_count(), 2);
}

#[test]
fn test_stop_hands_back_switcher() {
    let recorder = Arc::new(SharedRecorder::default());
    let notifier = ScriptedNotifier::new(vec![vec![
        NotifierEvent::press(LEFT_CTRL),
        NotifierEvent::press(LEFT_ALT),
    ]]);
    let mut listener = Listener::start(notifier, Arc::clone(&recorder)).unwrap();
    listener.pump(0).unwrap();
    assert_eq!(listener.session().state(), ChordState::BothHeld);

    let switcher = listener.stop().unwrap();

    // The switcher comes back to its owner untouched
    assert!(Arc::ptr_eq(&switcher, &recorder));
    assert!(recorder.targets.lock().is_empty());
}

#[test]
fn test_poll_error_propagates_and_stop_still_unsubscribes() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let notifier = BrokenPoll {
        calls: Arc::clone(&calls),
    };
    let mut listener = Listener::start(notifier, LogSwitcher).unwrap();

    assert!(matches!(listener.pump(0), Err(NotifierError::Disconnected(_))));

    listener.stop().unwrap();
    assert_eq!(*calls.lock(), vec!["subscribe", "poll", "unsubscribe"]);
}

#[test]
fn test_run_ends_when_devices_disconnect() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let notifier = BrokenPoll {
        calls: Arc::clone(&calls),
    };
    let running = AtomicBool::new(true);
    let mut listener = Listener::start(notifier, LogSwitcher).unwrap();

    // Returns on the first failed poll instead of polling again
    let result = listener.run(&running, 10);

    assert!(matches!(result, Err(NotifierError::Disconnected(_))));
    assert!(running.load(Ordering::SeqCst));
    assert_eq!(*calls.lock(), vec!["subscribe", "poll"]);
}

#[test]
fn test_shutdown_leaves_session_idle_and_empty() {
    let notifier = ScriptedNotifier::new(vec![chord_batch()]);
    let mut listener = Listener::start(notifier, LogSwitcher).unwrap();
    listener.pump(0).unwrap();
    assert_eq!(listener.session().state(), ChordState::Fired);
    assert_eq!(listener.session().held_keys().count(), 3);

    listener.shutdown().unwrap();

    assert_eq!(listener.session().state(), ChordState::Idle);
    assert!(listener.session().held_keys().is_empty());
    assert!(!listener.notifier().subscribed);
}
