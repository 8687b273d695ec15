use tracing::{debug, trace};

use crate::tui::action::{Action, DismissReason};
use crate::tui::component::Effect;
use crate::tui::state::{AppState, OpenSessionState, Visibility};

use super::layout::{collapse_frame, relayout};

/// Handle open/close transitions of the calendar
pub fn reduce_visibility(state: AppState, action: &Action) -> Result<(AppState, Effect), AppState> {
    match action {
        Action::OpenCalendar => Ok(open(state)),
        Action::ToggleCalendar => {
            if state.is_open() {
                Ok(close(state, DismissReason::CalendarClosed))
            } else {
                Ok(open(state))
            }
        }
        Action::Dismiss(reason) => Ok(close(state, *reason)),
        Action::HostFocusLost(_) => Ok(close(state, DismissReason::FocusLost)),
        Action::CloseTimerElapsed(_) => Ok(close_timer_elapsed(state)),
        _ => Err(state),
    }
}

/// Closed → Open, unless disabled or already open
pub fn open(state: AppState) -> (AppState, Effect) {
    if state.args.disabled {
        debug!("PICKER: Ignoring open, control is disabled");
        return (state, Effect::None);
    }
    if state.is_open() {
        return (state, Effect::None);
    }

    let mut new_state = state;
    let id = new_state.picker.allocate_session();
    new_state.picker.visibility = Visibility::Open(OpenSessionState::new(id));

    let start = new_state
        .picker
        .selected
        .unwrap_or(new_state.system.today);
    new_state.picker.cursor = new_state.args.bounds().clamp(start);
    new_state.system.reset_status_message();
    debug!("PICKER: Opened session {}", id);

    let frame = relayout(&mut new_state);
    (new_state, Effect::batch(vec![Effect::AcquireSession(id), frame]))
}

/// Open → Closed; releases the session and collapses the frame
pub fn close(state: AppState, reason: DismissReason) -> (AppState, Effect) {
    let Some(session) = state.open_session().copied() else {
        trace!("PICKER: Ignoring {:?} dismissal, already closed", reason);
        return (state, Effect::None);
    };

    let mut new_state = state;
    new_state.picker.visibility = Visibility::Closed;
    if reason != DismissReason::Selection {
        new_state.system.reset_status_message();
    }
    debug!("PICKER: Closed session {} ({:?})", session.id, reason);

    let frame = collapse_frame(&mut new_state);
    (new_state, Effect::batch(vec![Effect::ReleaseSession, frame]))
}

/// Stale timers never get here; the session must still have a pending selection
fn close_timer_elapsed(state: AppState) -> (AppState, Effect) {
    let Some(session) = state.open_session().copied() else {
        return (state, Effect::None);
    };
    if !session.closing {
        trace!("SESSION: Ignoring close timer of session {}", session.id);
        return (state, Effect::None);
    }
    close(state, DismissReason::Selection)
}
