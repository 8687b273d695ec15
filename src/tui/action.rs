use chrono::NaiveDate;

use crate::types::Configuration;

use super::regions::MountedRegions;
use super::state::SessionId;

/// Why the calendar is being closed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissReason {
    /// A date was committed and the close delay elapsed
    Selection,
    /// The host frame lost input focus
    FocusLost,
    /// Pointer pressed outside every widget region
    OutsidePointer,
    /// The calendar closed itself (Escape, toggle, disabled by the host)
    CalendarClosed,
}

/// Global actions - like Redux actions
///
/// All state changes happen through actions. They are dispatched from:
/// - User input (key, mouse and focus events)
/// - The host bridge (configuration delivery)
/// - The open session's timers and size observer
/// - The renderer's post-layout report
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Component mounted in the host frame
    Mount,
    /// Host delivered a (possibly unchanged) configuration
    ConfigurationReceived(Configuration),

    // Visibility
    OpenCalendar,
    ToggleCalendar,
    Dismiss(DismissReason),
    /// Focus left the frame; `None` for a native event, the session id for a poll
    HostFocusLost(Option<SessionId>),
    /// Deferred close after a selection
    CloseTimerElapsed(SessionId),

    // Calendar navigation and selection
    MoveCursor(i64),
    ShiftMonth(i32),
    ShiftYear(i32),
    SelectCursor,
    SelectDate(NaiveDate),
    ClearSelection,

    // Layout signals
    /// Post-layout report from the renderer
    LayoutReported(MountedRegions),
    /// Size observer fired for the calendar of this session
    CalendarResized(SessionId),
    /// Terminal resized, in columns and rows
    ViewportResized { width: u16, height: u16 },

    SetStatusMessage { message: String, is_error: bool },
    Quit,
}

impl Action {
    /// Actions fired by session-owned timers, which carry a session id
    pub fn session_id(&self) -> Option<SessionId> {
        match self {
            Action::HostFocusLost(id) => *id,
            Action::CloseTimerElapsed(id) | Action::CalendarResized(id) => Some(*id),
            _ => None,
        }
    }
}
