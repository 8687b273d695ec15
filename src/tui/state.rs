use std::fmt;

use chrono::NaiveDate;

use crate::config::Config;
use crate::types::Configuration;

use super::layout::{LayoutSnapshot, PixelMetrics, SizeClass};
use super::regions::MountedRegions;

/// Root application state - single source of truth
///
/// All state changes happen through the reducer. Components receive slices
/// of this state as props.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Last configuration delivered by the host
    pub args: Configuration,

    /// Selection, cursor and open/closed state
    pub picker: PickerState,

    /// Layout engine output and the geometry it was computed from
    pub layout: LayoutState,

    /// What the host has been told so far
    pub host: HostState,

    pub system: SystemState,
}

impl AppState {
    pub fn new(args: Configuration, settings: Config, today: NaiveDate) -> Self {
        let selected = args.selected_date();
        let metrics = PixelMetrics::new(settings.cell_width_px, settings.cell_height_px);
        Self {
            picker: PickerState {
                selected,
                cursor: selected.unwrap_or(today),
                ..Default::default()
            },
            layout: LayoutState {
                metrics,
                ..Default::default()
            },
            system: SystemState {
                settings,
                today,
                ..Default::default()
            },
            args,
            host: HostState::default(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.picker.visibility.is_open()
    }

    /// Session id of the open calendar, if any
    pub fn open_session(&self) -> Option<&OpenSessionState> {
        self.picker.visibility.session()
    }

    pub fn size_class(&self) -> SizeClass {
        self.layout.snapshot.size_class()
    }
}

/// Identifies one open period of the calendar
///
/// Work scheduled by a session carries its id so that the reducer can drop
/// anything that fires after the session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Bookkeeping for an open calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenSessionState {
    pub id: SessionId,
    /// Outside-pointer dismissal is armed once the popup has been laid out
    pub listeners_attached: bool,
    /// A date was committed and the deferred close is pending
    pub closing: bool,
}

impl OpenSessionState {
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            listeners_attached: false,
            closing: false,
        }
    }
}

/// Closed carries no session, so nothing can be armed while closed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Closed,
    Open(OpenSessionState),
}

impl Visibility {
    pub fn is_open(&self) -> bool {
        matches!(self, Visibility::Open(_))
    }

    pub fn session(&self) -> Option<&OpenSessionState> {
        match self {
            Visibility::Open(session) => Some(session),
            Visibility::Closed => None,
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut OpenSessionState> {
        match self {
            Visibility::Open(session) => Some(session),
            Visibility::Closed => None,
        }
    }

    /// The open session, only if its id matches
    pub fn session_for(&mut self, id: SessionId) -> Option<&mut OpenSessionState> {
        self.session_mut().filter(|session| session.id == id)
    }
}

#[derive(Debug, Clone, Default)]
pub struct PickerState {
    pub selected: Option<NaiveDate>,
    /// Focused day; its month is the one the calendar shows
    pub cursor: NaiveDate,
    pub visibility: Visibility,
    pub next_session: u64,
}

impl PickerState {
    pub fn allocate_session(&mut self) -> SessionId {
        self.next_session += 1;
        SessionId(self.next_session)
    }
}

#[derive(Debug, Clone, Default)]
pub struct LayoutState {
    pub snapshot: LayoutSnapshot,
    /// Region rectangles from the last draw
    pub mounted: MountedRegions,
    pub metrics: PixelMetrics,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostState {
    /// Last frame height sent, `None` before mount
    pub frame_height_px: Option<u32>,
}

/// Default help message shown in the status bar
pub const DEFAULT_STATUS_MESSAGE: &str = "Enter: open | Del: clear | q: quit";

/// Help message while the calendar is open
pub const OPEN_STATUS_MESSAGE: &str =
    "←→↑↓: day | PgUp/PgDn: month | </>: year | Enter: select | Esc: close";

#[derive(Debug, Clone, Default)]
pub struct SystemState {
    pub settings: Config,
    pub status_message: Option<String>,
    pub status_is_error: bool,
    pub today: NaiveDate,
    pub should_quit: bool,
    /// Width of the emulated host frame, `None` for the whole terminal
    pub frame_columns: Option<u16>,
}

impl SystemState {
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some(message);
        self.status_is_error = false;
    }

    pub fn set_status_error_message(&mut self, message: String) {
        self.status_message = Some(message);
        self.status_is_error = true;
    }

    pub fn reset_status_message(&mut self) {
        self.status_message = None;
        self.status_is_error = false;
    }

    /// Message to show, falling back to the help text for the current state
    pub fn status_text(&self, open: bool) -> &str {
        match &self.status_message {
            Some(message) => message,
            None if open => OPEN_STATUS_MESSAGE,
            None => DEFAULT_STATUS_MESSAGE,
        }
    }
}
