// Fbswap Listener
// Ties a keyboard notifier to a session for the lifetime of a listening run

use std::sync::atomic::{AtomicBool, Ordering};

use crate::event::notifier::{KeyboardNotifier, NotifierResult};
use crate::input::{NotifierEvent, NotifySignal};
use crate::session::Session;
use crate::view::ViewSwitcher;

/// A subscribed notifier pumping events into a session.
///
/// `start` subscribes; `stop` resets the session before unsubscribing and
/// hands back the switcher so its owner can release the device afterwards.
pub struct Listener<N: KeyboardNotifier, S: ViewSwitcher> {
    notifier: N,
    session: Session<S>,
}

impl<N: KeyboardNotifier, S: ViewSwitcher> Listener<N, S> {
    pub fn start(mut notifier: N, switcher: S) -> NotifierResult<Self> {
        notifier.subscribe()?;
        log::info!("listener started");
        Ok(Self {
            notifier,
            session: Session::new(switcher),
        })
    }

    /// Handle one event through the session
    pub fn dispatch(&mut self, event: &NotifierEvent) -> NotifySignal {
        let signal = self.session.handle_event(event);
        if signal != NotifySignal::Ignored {
            log::trace!("{:?} -> {}", event, signal);
        }
        signal
    }

    /// Poll once and dispatch everything that arrived
    pub fn pump(&mut self, timeout_ms: i32) -> NotifierResult<Vec<NotifySignal>> {
        let events = self.notifier.poll(timeout_ms)?;
        Ok(events.iter().map(|event| self.dispatch(event)).collect())
    }

    /// Pump events until `running` is cleared
    pub fn run(&mut self, running: &AtomicBool, timeout_ms: i32) -> NotifierResult<()> {
        while running.load(Ordering::SeqCst) {
            self.pump(timeout_ms)?;
        }
        Ok(())
    }

    pub fn session(&self) -> &Session<S> {
        &self.session
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Reset the session and unsubscribe, keeping the listener around.
    ///
    /// The session is left idle with nothing held even if unsubscribing fails.
    pub fn shutdown(&mut self) -> NotifierResult<()> {
        self.session.reset();
        self.notifier.unsubscribe()?;
        log::info!(
            "listener stopped after {} chord(s)",
            self.session.fired_count()
        );
        Ok(())
    }

    /// Shut down and return the switcher
    pub fn stop(mut self) -> NotifierResult<S> {
        self.shutdown()?;
        Ok(self.session.into_switcher())
    }
}
