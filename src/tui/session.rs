//! Resources owned by an open calendar.
//!
//! Opening acquires an [`OpenSession`]: the focus poll, the deferred close
//! after a selection and the calendar size observer. Dropping it releases all
//! of them, whichever way the calendar was closed.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, trace};

use crate::config::Config;

use super::action::Action;
use super::state::SessionId;

/// Answers whether the host frame currently has input focus
pub trait FocusProbe: Send + Sync {
    fn has_focus(&self) -> bool;
}

/// Focus flag fed by the terminal's focus-change events
#[derive(Debug)]
pub struct TerminalFocus {
    focused: AtomicBool,
}

impl TerminalFocus {
    pub fn new() -> Self {
        Self {
            focused: AtomicBool::new(true),
        }
    }

    pub fn set_focused(&self, focused: bool) {
        self.focused.store(focused, Ordering::SeqCst);
    }
}

impl Default for TerminalFocus {
    fn default() -> Self {
        Self::new()
    }
}

impl FocusProbe for TerminalFocus {
    fn has_focus(&self) -> bool {
        self.focused.load(Ordering::SeqCst)
    }
}

/// Probe that counts how often it was asked
#[derive(Debug, Default)]
pub struct CountingProbe {
    focused: TerminalFocus,
    calls: AtomicUsize,
}

impl CountingProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_focused(&self, focused: bool) {
        self.focused.set_focused(focused);
    }
}

impl FocusProbe for CountingProbe {
    fn has_focus(&self) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.focused.has_focus()
    }
}

/// Timing of the session-owned tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTimings {
    pub focus_poll_interval: Duration,
    pub select_close_delay: Duration,
}

impl SessionTimings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            focus_poll_interval: config.focus_poll_interval(),
            select_close_delay: config.select_close_delay(),
        }
    }
}

impl Default for SessionTimings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Disposer for everything acquired while the calendar is open
pub struct OpenSession {
    id: SessionId,
    action_tx: mpsc::UnboundedSender<Action>,
    timings: SessionTimings,
    focus_poll: JoinHandle<()>,
    close_timer: Option<JoinHandle<()>>,
    observed_calendar: Option<(u16, u16)>,
}

impl OpenSession {
    /// Start the focus poll for session `id`
    ///
    /// Must be called from within a tokio runtime.
    pub fn acquire(
        id: SessionId,
        probe: Arc<dyn FocusProbe>,
        action_tx: mpsc::UnboundedSender<Action>,
        timings: SessionTimings,
    ) -> Self {
        debug!("SESSION: {} acquired", id);
        let focus_poll = tokio::spawn(poll_focus(id, probe, action_tx.clone(), timings.focus_poll_interval));
        Self {
            id,
            action_tx,
            timings,
            focus_poll,
            close_timer: None,
            observed_calendar: None,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Close after the selection delay; a second call restarts the delay
    pub fn schedule_close(&mut self) {
        if let Some(previous) = self.close_timer.take() {
            previous.abort();
        }
        let id = self.id;
        let delay = self.timings.select_close_delay;
        let action_tx = self.action_tx.clone();
        trace!("SESSION: {} closing in {:?}", id, delay);
        self.close_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = action_tx.send(Action::CloseTimerElapsed(id));
        }));
    }

    /// Size observer for the calendar; returns the session id when the size changed
    pub fn observe_calendar(&mut self, size: Option<(u16, u16)>) -> Option<SessionId> {
        if size.is_none() || size == self.observed_calendar {
            return None;
        }
        trace!("SESSION: {} calendar size {:?}", self.id, size);
        self.observed_calendar = size;
        Some(self.id)
    }
}

impl Drop for OpenSession {
    fn drop(&mut self) {
        self.focus_poll.abort();
        if let Some(timer) = self.close_timer.take() {
            timer.abort();
        }
        debug!("SESSION: {} released", self.id);
    }
}

async fn poll_focus(
    id: SessionId,
    probe: Arc<dyn FocusProbe>,
    action_tx: mpsc::UnboundedSender<Action>,
    period: Duration,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately
    ticker.tick().await;
    loop {
        ticker.tick().await;
        if !probe.has_focus() {
            debug!("SESSION: {} lost focus", id);
            let _ = action_tx.send(Action::HostFocusLost(Some(id)));
            return;
        }
    }
}
