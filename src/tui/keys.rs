/// Keyboard and mouse event to action mapping
///
/// Closed, the field behaves like a button: Enter, Space or Down opens the
/// calendar and Delete clears the value. Open, the arrows move the cursor by
/// day and week, PageUp/PageDown page through months and `<`/`>` through
/// years.
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use tracing::{debug, trace};

use super::action::{Action, DismissReason};
use super::regions::RegionId;
use super::state::AppState;
use super::widgets::{Calendar, CalendarHit};

/// Map a key press to an action for the current state
pub fn key_to_action(key: KeyEvent, state: &AppState) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    if state.is_open() {
        handle_open_keys(key)
    } else {
        handle_closed_keys(key, state)
    }
}

fn handle_closed_keys(key: KeyEvent, state: &AppState) -> Option<Action> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Down if !state.args.disabled => {
            Some(Action::OpenCalendar)
        }
        KeyCode::Delete | KeyCode::Backspace if !state.args.disabled => Some(Action::ClearSelection),
        _ => {
            trace!("KEY: Unhandled {:?} while closed", key.code);
            None
        }
    }
}

fn handle_open_keys(key: KeyEvent) -> Option<Action> {
    let action = match key.code {
        KeyCode::Left => Action::MoveCursor(-1),
        KeyCode::Right => Action::MoveCursor(1),
        KeyCode::Up => Action::MoveCursor(-7),
        KeyCode::Down => Action::MoveCursor(7),
        KeyCode::PageUp => Action::ShiftMonth(-1),
        KeyCode::PageDown => Action::ShiftMonth(1),
        KeyCode::Char('<') => Action::ShiftYear(-1),
        KeyCode::Char('>') => Action::ShiftYear(1),
        KeyCode::Enter | KeyCode::Char(' ') => Action::SelectCursor,
        KeyCode::Esc => {
            debug!("KEY: ESC pressed with calendar open - closing");
            Action::Dismiss(DismissReason::CalendarClosed)
        }
        _ => return None,
    };
    Some(action)
}

/// Map a mouse event to an action, using the regions of the last draw
pub fn mouse_to_action(mouse: MouseEvent, state: &AppState) -> Option<Action> {
    let (column, row) = (mouse.column, mouse.row);
    let regions = &state.layout.mounted;

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {}
        MouseEventKind::ScrollUp if state.is_open() && regions.is_inside(RegionId::CalendarWrapper, column, row) => {
            return Some(Action::ShiftMonth(-1));
        }
        MouseEventKind::ScrollDown if state.is_open() && regions.is_inside(RegionId::CalendarWrapper, column, row) => {
            return Some(Action::ShiftMonth(1));
        }
        _ => return None,
    }

    let Some(session) = state.open_session() else {
        if regions.is_inside(RegionId::InputField, column, row) && !state.args.disabled {
            return Some(Action::OpenCalendar);
        }
        return None;
    };

    if let Some(area) = regions.calendar {
        let calendar = Calendar::new(
            state.picker.cursor,
            state.picker.selected,
            state.system.today,
            state.args.bounds(),
            state.layout.snapshot.scale,
        );
        if let Some(hit) = calendar.hit_test(area, column, row) {
            return match hit {
                CalendarHit::PreviousMonth => Some(Action::ShiftMonth(-1)),
                CalendarHit::NextMonth => Some(Action::ShiftMonth(1)),
                CalendarHit::Day(date) => Some(Action::SelectDate(date)),
                CalendarHit::Chrome => None,
            };
        }
    }

    if regions.is_inside(RegionId::InputField, column, row) {
        return Some(Action::ToggleCalendar);
    }
    if regions.is_inside_widget(column, row) {
        return None;
    }
    if !session.listeners_attached {
        trace!("MOUSE: Outside press before listeners were attached");
        return None;
    }
    debug!("MOUSE: Press outside the widget at ({}, {})", column, row);
    Some(Action::Dismiss(DismissReason::OutsidePointer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::reducer::reduce;
    use crate::tui::regions::MountedRegions;
    use crate::tui::testing::{date, test_state};
    use crate::types::Configuration;
    use crossterm::event::KeyEventKind;
    use ratatui::layout::Rect;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn regions(open: bool) -> MountedRegions {
        MountedRegions {
            frame: Some(Rect::new(0, 0, 40, 16)),
            container: Some(Rect::new(0, 0, 40, 3)),
            input: Some(Rect::new(0, 0, 40, 3)),
            popup: open.then(|| Rect::new(0, 4, 31, 11)),
            calendar: open.then(|| Rect::new(0, 4, 30, 10)),
        }
    }

    fn open_state(attached: bool) -> AppState {
        let (state, _) = reduce(test_state(Configuration::default()), Action::OpenCalendar);
        let regions = if attached {
            regions(true)
        } else {
            MountedRegions {
                popup: None,
                ..regions(true)
            }
        };
        let (state, _) = reduce(state, Action::LayoutReported(regions));
        state
    }

    #[test]
    fn test_closed_keys() {
        let state = test_state(Configuration::default());
        assert_eq!(key_to_action(key(KeyCode::Enter), &state), Some(Action::OpenCalendar));
        assert_eq!(key_to_action(key(KeyCode::Down), &state), Some(Action::OpenCalendar));
        assert_eq!(key_to_action(key(KeyCode::Delete), &state), Some(Action::ClearSelection));
        assert_eq!(key_to_action(key(KeyCode::Char('q')), &state), Some(Action::Quit));
        assert_eq!(key_to_action(key(KeyCode::Left), &state), None);
    }

    #[test]
    fn test_disabled_field_only_quits() {
        let state = test_state(Configuration {
            disabled: true,
            ..Default::default()
        });
        assert_eq!(key_to_action(key(KeyCode::Enter), &state), None);
        assert_eq!(key_to_action(key(KeyCode::Delete), &state), None);
        assert_eq!(key_to_action(key(KeyCode::Esc), &state), Some(Action::Quit));
    }

    #[test]
    fn test_open_keys() {
        let state = open_state(true);
        assert_eq!(key_to_action(key(KeyCode::Left), &state), Some(Action::MoveCursor(-1)));
        assert_eq!(key_to_action(key(KeyCode::Down), &state), Some(Action::MoveCursor(7)));
        assert_eq!(key_to_action(key(KeyCode::PageDown), &state), Some(Action::ShiftMonth(1)));
        assert_eq!(key_to_action(key(KeyCode::Char('<')), &state), Some(Action::ShiftYear(-1)));
        assert_eq!(key_to_action(key(KeyCode::Enter), &state), Some(Action::SelectCursor));
        assert_eq!(
            key_to_action(key(KeyCode::Esc), &state),
            Some(Action::Dismiss(DismissReason::CalendarClosed))
        );
        // q is not a quit key while the calendar has the keyboard
        assert_eq!(key_to_action(key(KeyCode::Char('q')), &state), None);
    }

    #[test]
    fn test_ctrl_c_always_quits() {
        let event = KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: crossterm::event::KeyEventState::NONE,
        };
        assert_eq!(key_to_action(event, &open_state(true)), Some(Action::Quit));
    }

    #[test]
    fn test_click_on_field_opens() {
        let mut state = test_state(Configuration::default());
        state.layout.mounted = regions(false);
        assert_eq!(mouse_to_action(click(5, 1), &state), Some(Action::OpenCalendar));
        assert_eq!(mouse_to_action(click(5, 10), &state), None);
    }

    #[test]
    fn test_click_on_day_selects() {
        let state = open_state(true);
        // Calendar at (0, 4): week 2 is row 9, Monday is columns 5-8
        assert_eq!(
            mouse_to_action(click(6, 9), &state),
            Some(Action::SelectDate(date(2024, 1, 15)))
        );
        assert_eq!(mouse_to_action(click(1, 5), &state), Some(Action::ShiftMonth(-1)));
        assert_eq!(mouse_to_action(click(28, 5), &state), Some(Action::ShiftMonth(1)));
        // Weekday header
        assert_eq!(mouse_to_action(click(6, 6), &state), None);
    }

    #[test]
    fn test_click_outside_dismisses_once_attached() {
        let state = open_state(true);
        assert_eq!(
            mouse_to_action(click(35, 12), &state),
            Some(Action::Dismiss(DismissReason::OutsidePointer))
        );
        // Shadow column of the popup belongs to the widget
        assert_eq!(mouse_to_action(click(30, 10), &state), None);
        // The field toggles the calendar closed
        assert_eq!(mouse_to_action(click(35, 1), &state), Some(Action::ToggleCalendar));
    }

    #[test]
    fn test_click_outside_ignored_before_attach() {
        let state = open_state(false);
        assert!(!state.open_session().unwrap().listeners_attached);
        assert_eq!(mouse_to_action(click(35, 12), &state), None);
    }

    #[test]
    fn test_scroll_over_calendar_pages_months() {
        let state = open_state(true);
        let scroll = MouseEvent {
            kind: MouseEventKind::ScrollDown,
            ..click(10, 10)
        };
        assert_eq!(mouse_to_action(scroll, &state), Some(Action::ShiftMonth(1)));
    }
}
