use chrono::{Days, Months, NaiveDate};
use tracing::{debug, trace};

use crate::bridge::HostMessage;
use crate::formatting::to_canonical;
use crate::tui::action::Action;
use crate::tui::component::Effect;
use crate::tui::state::AppState;

/// Handle cursor movement, date commits and clearing
pub fn reduce_selection(state: AppState, action: &Action) -> Result<(AppState, Effect), AppState> {
    match action {
        Action::MoveCursor(days) => Ok(move_cursor(state, *days)),
        Action::ShiftMonth(months) => Ok(shift_months(state, *months)),
        Action::ShiftYear(years) => Ok(shift_months(state, years.saturating_mul(12))),
        Action::SelectCursor => {
            let cursor = state.picker.cursor;
            Ok(select_date(state, cursor))
        }
        Action::SelectDate(date) => Ok(select_date(state, *date)),
        Action::ClearSelection => Ok(clear_selection(state)),
        _ => Err(state),
    }
}

fn move_cursor(state: AppState, days: i64) -> (AppState, Effect) {
    let mut new_state = state;
    let cursor = new_state.picker.cursor;
    let step = Days::new(days.unsigned_abs());
    let moved = if days >= 0 {
        cursor.checked_add_days(step)
    } else {
        cursor.checked_sub_days(step)
    };
    if let Some(date) = moved {
        new_state.picker.cursor = date;
    }
    (new_state, Effect::None)
}

fn shift_months(state: AppState, months: i32) -> (AppState, Effect) {
    let mut new_state = state;
    let cursor = new_state.picker.cursor;
    let step = Months::new(months.unsigned_abs());
    let shifted = if months >= 0 {
        cursor.checked_add_months(step)
    } else {
        cursor.checked_sub_months(step)
    };
    if let Some(date) = shifted {
        trace!("PICKER: Showing {}", date.format("%Y-%m"));
        new_state.picker.cursor = date;
    }
    (new_state, Effect::None)
}

/// Commit a date picked in the open calendar
///
/// The value is emitted on every commit; the calendar then closes after the
/// selection delay so the highlighted day is visible first.
pub fn select_date(state: AppState, date: NaiveDate) -> (AppState, Effect) {
    let Some(id) = state.open_session().map(|session| session.id) else {
        trace!("PICKER: Ignoring selection of {} while closed", date);
        return (state, Effect::None);
    };

    let mut new_state = state;
    if !new_state.args.bounds().contains(date) {
        debug!("PICKER: Rejected {} outside of the selectable range", date);
        new_state
            .system
            .set_status_error_message(format!("{} is outside the selectable range", to_canonical(date)));
        return (new_state, Effect::None);
    }

    if let Some(session) = new_state.picker.visibility.session_for(id) {
        session.closing = true;
    }
    new_state.picker.selected = Some(date);
    new_state.picker.cursor = date;
    new_state.system.reset_status_message();

    let value = to_canonical(date);
    debug!("PICKER: Selected {}", value);
    let emit = emit_value(Some(value));
    (new_state, Effect::batch(vec![emit, Effect::ScheduleClose(id)]))
}

fn clear_selection(state: AppState) -> (AppState, Effect) {
    if state.args.disabled || state.picker.selected.is_none() {
        return (state, Effect::None);
    }
    let mut new_state = state;
    new_state.picker.selected = None;
    debug!("PICKER: Selection cleared");
    let emit = emit_value(None);
    (new_state, emit)
}

fn emit_value(value: Option<String>) -> Effect {
    Effect::Host(HostMessage::SetComponentValue { value })
}
