use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

use super::action::Action;
use super::component::{Component, Effect, Element};
use super::components::App;
use super::reducer::reduce;
use super::regions::MountedRegions;
use super::session::{FocusProbe, OpenSession, SessionTimings};
use super::state::AppState;
use crate::bridge::HostBridge;

/// Component runtime - manages action processing and effect execution
///
/// The Runtime is responsible for:
/// - Managing the application state
/// - Dispatching actions through the reducer
/// - Executing effects: host messages and session resources
/// - Building the virtual component tree
/// - Feeding the regions of each draw back into the layout engine
pub struct Runtime {
    /// Current application state
    state: AppState,

    /// Outbound host channel
    bridge: Arc<dyn HostBridge>,

    /// Focus source handed to each open session
    probe: Arc<dyn FocusProbe>,

    /// Resources of the open calendar; dropping releases them
    session: Option<OpenSession>,

    /// Channel for dispatching actions
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl Runtime {
    /// Create a new runtime with initial state, host bridge and focus source
    pub fn new(initial_state: AppState, bridge: Arc<dyn HostBridge>, probe: Arc<dyn FocusProbe>) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        Self {
            state: initial_state,
            bridge,
            probe,
            session: None,
            action_tx,
            action_rx,
        }
    }

    /// Get a reference to the current state
    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn into_state(self) -> AppState {
        self.state
    }

    /// Whether an open calendar currently holds session resources
    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    /// Dispatch an action to be processed by the reducer
    ///
    /// Uses mem::take to avoid cloning AppState.
    pub fn dispatch(&mut self, action: Action) {
        trace!("ACTION: Dispatching {:?}", action);

        let state = std::mem::take(&mut self.state);
        let (new_state, effect) = reduce(state, action);
        self.state = new_state;

        self.execute_effect(effect);
    }

    /// Execute an effect
    fn execute_effect(&mut self, effect: Effect) {
        match effect {
            Effect::None => {}
            Effect::Batch(effects) => {
                for effect in effects {
                    self.execute_effect(effect);
                }
            }
            Effect::Host(message) => {
                debug!("EFFECT: Sending {:?} to host", message);
                if let Err(e) = self.bridge.send(message) {
                    warn!("EFFECT: Host bridge failed: {}", e);
                    let _ = self.action_tx.send(Action::SetStatusMessage {
                        message: format!("Host bridge failed: {}", e),
                        is_error: true,
                    });
                }
            }
            Effect::AcquireSession(id) => {
                let timings = SessionTimings::from_config(&self.state.system.settings);
                // Replacing a previous session drops it first
                self.session = Some(OpenSession::acquire(
                    id,
                    self.probe.clone(),
                    self.action_tx.clone(),
                    timings,
                ));
            }
            Effect::ReleaseSession => {
                self.session = None;
            }
            Effect::ScheduleClose(id) => match self.session.as_mut() {
                Some(session) if session.id() == id => session.schedule_close(),
                _ => trace!("EFFECT: No session {} to close", id),
            },
        }
    }

    /// Process all pending actions from the queue
    ///
    /// Returns the number of actions processed.
    pub fn process_actions(&mut self) -> usize {
        let mut count = 0;
        while let Ok(action) = self.action_rx.try_recv() {
            self.dispatch(action);
            count += 1;
        }
        count
    }

    /// Build the virtual component tree for the current state
    pub fn build(&self) -> Element {
        App.view(&self.state, &())
    }

    /// Report the regions of a finished draw
    ///
    /// Changed geometry is measured by the layout engine; the open session's
    /// size observer additionally reports calendar resizes. Returns true when
    /// anything was dispatched, so the caller should draw again.
    pub fn after_layout(&mut self, regions: MountedRegions) -> bool {
        let mut dispatched = false;
        if regions != self.state.layout.mounted {
            self.dispatch(Action::LayoutReported(regions));
            dispatched = true;
        }
        let resized = self
            .session
            .as_mut()
            .and_then(|session| session.observe_calendar(regions.calendar_size()));
        if let Some(id) = resized {
            self.dispatch(Action::CalendarResized(id));
            dispatched = true;
        }
        dispatched
    }

    /// Get a sender for dispatching actions from other tasks
    pub fn action_sender(&self) -> mpsc::UnboundedSender<Action> {
        self.action_tx.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::{BridgeError, HostMessage, RecordingBridge};
    use crate::config::DisplayConfig;
    use crate::tui::action::DismissReason;
    use crate::tui::keys::mouse_to_action;
    use crate::tui::renderer::Renderer;
    use crate::tui::session::CountingProbe;
    use crate::tui::testing::{date, test_state};
    use crate::types::Configuration;
    use crossterm::event::{KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
    use ratatui::{buffer::Buffer, layout::Rect};
    use std::time::Duration;

    struct Harness {
        runtime: Runtime,
        bridge: Arc<RecordingBridge>,
        probe: Arc<CountingProbe>,
        renderer: Renderer,
    }

    impl Harness {
        fn new(args: Configuration) -> Self {
            let bridge = Arc::new(RecordingBridge::new());
            let probe = Arc::new(CountingProbe::new());
            let runtime = Runtime::new(test_state(args), bridge.clone(), probe.clone());
            Self {
                runtime,
                bridge,
                probe,
                renderer: Renderer::new(),
            }
        }

        /// One iteration of the terminal loop without the terminal
        fn draw(&mut self) -> MountedRegions {
            self.runtime.process_actions();
            let area = Rect::new(0, 0, 80, 40);
            let mut buf = Buffer::empty(area);
            let element = self.runtime.build();
            let regions = self
                .renderer
                .render(&element, area, &mut buf, &DisplayConfig::default());
            self.runtime.after_layout(regions);
            regions
        }
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_outside_press_releases_session() {
        let mut h = Harness::new(Configuration::default());
        h.runtime.dispatch(Action::Mount);
        h.draw();

        h.runtime.dispatch(Action::OpenCalendar);
        assert!(h.runtime.has_session());
        let regions = h.draw();
        assert!(regions.popup.is_some());
        assert!(h.runtime.state().open_session().unwrap().listeners_attached);

        let action = mouse_to_action(click(70, 30), h.runtime.state());
        assert_eq!(action, Some(Action::Dismiss(DismissReason::OutsidePointer)));
        h.runtime.dispatch(action.unwrap());
        assert!(!h.runtime.state().is_open());
        assert!(!h.runtime.has_session());

        // Full-scale estimate before the calendar is measured, then the 3-row
        // field, 12 popup rows (gap, calendar, shadow) and 20px
        assert_eq!(h.bridge.frame_heights(), vec![80, 440, 320, 80]);

        // Nothing keeps polling once released
        let calls = h.probe.calls();
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(h.probe.calls(), calls);
    }

    #[tokio::test(start_paused = true)]
    async fn test_selection_closes_after_delay() {
        let mut h = Harness::new(Configuration::default());
        h.runtime.dispatch(Action::Mount);
        h.runtime.dispatch(Action::OpenCalendar);
        h.draw();

        h.runtime.dispatch(Action::SelectDate(date(2024, 3, 2)));
        assert_eq!(h.bridge.component_values(), vec![Some("2024-03-02".to_string())]);
        assert!(h.runtime.state().is_open());

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(h.runtime.process_actions(), 1);
        assert!(!h.runtime.state().is_open());
        assert!(!h.runtime.has_session());
        assert_eq!(h.bridge.frame_heights().last(), Some(&80));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_timer_does_not_close_new_session() {
        let mut h = Harness::new(Configuration::default());
        h.runtime.dispatch(Action::OpenCalendar);
        h.runtime.dispatch(Action::SelectDate(date(2024, 1, 5)));
        h.runtime.dispatch(Action::Dismiss(DismissReason::CalendarClosed));
        h.runtime.dispatch(Action::OpenCalendar);

        tokio::time::sleep(Duration::from_millis(500)).await;
        h.runtime.process_actions();
        assert!(h.runtime.state().is_open());
        assert!(h.runtime.has_session());
    }

    #[tokio::test(start_paused = true)]
    async fn test_focus_loss_closes() {
        let mut h = Harness::new(Configuration::default());
        h.runtime.dispatch(Action::OpenCalendar);
        h.draw();

        h.probe.set_focused(false);
        tokio::time::sleep(Duration::from_millis(150)).await;
        h.runtime.process_actions();

        assert!(!h.runtime.state().is_open());
        assert!(!h.runtime.has_session());
        assert!(h.bridge.component_values().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_redraw_without_changes_is_quiet() {
        let mut h = Harness::new(Configuration::default());
        h.runtime.dispatch(Action::Mount);
        h.runtime.dispatch(Action::OpenCalendar);
        h.draw();
        h.draw();
        let sent = h.bridge.messages().len();

        h.draw();
        let regions = h.renderer.regions();
        assert!(!h.runtime.after_layout(regions));
        assert_eq!(h.bridge.messages().len(), sent);
    }

    #[tokio::test(start_paused = true)]
    async fn test_measured_frame_holds_popup_shadow() {
        let mut h = Harness::new(Configuration::default());
        h.runtime.dispatch(Action::Mount);
        h.runtime.dispatch(Action::OpenCalendar);
        h.draw();
        h.draw();

        let regions = h.draw();
        let frame = regions.frame.unwrap();
        let popup = regions.popup.unwrap();
        assert_eq!(h.bridge.frame_heights().last(), Some(&320));
        assert!(popup.bottom() <= frame.bottom());
    }

    #[tokio::test]
    async fn test_bridge_failure_surfaces_in_status() {
        struct BrokenBridge;

        impl HostBridge for BrokenBridge {
            fn send(&self, _message: HostMessage) -> Result<(), BridgeError> {
                Err(BridgeError::Poisoned)
            }
        }

        let mut runtime = Runtime::new(
            test_state(Configuration::default()),
            Arc::new(BrokenBridge),
            Arc::new(CountingProbe::new()),
        );
        runtime.dispatch(Action::Mount);
        runtime.process_actions();
        assert!(runtime.state().system.status_is_error);
    }

    #[tokio::test]
    async fn test_action_sender_feeds_queue() {
        let mut h = Harness::new(Configuration::default());
        h.runtime.action_sender().send(Action::Quit).unwrap();
        assert_eq!(h.runtime.process_actions(), 1);
        assert!(h.runtime.state().system.should_quit);
    }
}
