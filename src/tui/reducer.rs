use tracing::{debug, trace};

use super::action::{Action, DismissReason};
use super::component::Effect;
use super::state::AppState;
use crate::types::Configuration;

use crate::tui::reducers::layout::{recompute_snapshot, relayout, send_frame_height};
use crate::tui::reducers::visibility::close;
use crate::tui::reducers::{reduce_layout, reduce_selection, reduce_visibility};
use crate::layout_constants::DEFAULT_FRAME_HEIGHT;

/// Pure state reducer - like Redux reducer
///
/// Takes current state and an action, returns new state and an effect.
/// No I/O happens here; host messages, timers and session resources are
/// all described by the returned `Effect` and executed by the runtime.
///
/// Actions carrying the id of a session that is no longer open are dropped
/// before any sub-reducer sees them.
///
/// Ownership is passed through the sub-reducer chain to avoid cloning:
/// - Each sub-reducer returns Ok((state, effect)) if it handled the action
/// - Or Err(state) to pass ownership back for the next reducer to try
pub fn reduce(state: AppState, action: Action) -> (AppState, Effect) {
    if let Some(id) = action.session_id() {
        if state.open_session().map(|session| session.id) != Some(id) {
            trace!("SESSION: Dropping {:?} from stale session {}", action, id);
            return (state, Effect::None);
        }
    }

    let state = match reduce_visibility(state, &action) {
        Ok(result) => return result,
        Err(state) => state,
    };

    let state = match reduce_selection(state, &action) {
        Ok(result) => return result,
        Err(state) => state,
    };

    let state = match reduce_layout(state, &action) {
        Ok(result) => return result,
        Err(state) => state,
    };

    match action {
        Action::Mount => {
            debug!("HOST: Mounted");
            let mut new_state = state;
            recompute_snapshot(&mut new_state);
            let effect = send_frame_height(&mut new_state, DEFAULT_FRAME_HEIGHT);
            (new_state, effect)
        }

        Action::ConfigurationReceived(args) => receive_configuration(state, args),

        Action::SetStatusMessage { message, is_error } => {
            let mut new_state = state;
            if is_error {
                new_state.system.set_status_error_message(message);
            } else {
                new_state.system.set_status_message(message);
            }
            (new_state, Effect::None)
        }

        Action::Quit => {
            let mut new_state = state;
            new_state.system.should_quit = true;
            (new_state, Effect::None)
        }

        _ => (state, Effect::None),
    }
}

/// Apply a host re-render
///
/// A changed `value` replaces the selection without echoing it back. Being
/// disabled while open closes the calendar.
fn receive_configuration(state: AppState, args: Configuration) -> (AppState, Effect) {
    if state.args == args {
        trace!("HOST: Configuration unchanged");
        return (state, Effect::None);
    }

    let mut new_state = state;
    let value_changed = new_state.args.value != args.value;
    new_state.args = args;

    if value_changed {
        new_state.picker.selected = new_state.args.selected_date();
        debug!("HOST: Selection replaced by {:?}", new_state.picker.selected);
        if !new_state.is_open() {
            new_state.picker.cursor = new_state.picker.selected.unwrap_or(new_state.system.today);
        }
    }

    if new_state.args.disabled && new_state.is_open() {
        return close(new_state, DismissReason::CalendarClosed);
    }

    let effect = relayout(&mut new_state);
    (new_state, effect)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::HostMessage;
    use crate::formatting::{format_display, parse_canonical, to_canonical, DateFormat};
    use crate::tui::state::SessionId;
    use crate::tui::testing::{date, test_state};

    fn run(state: AppState, actions: Vec<Action>) -> (AppState, Vec<Effect>) {
        let mut effects = Vec::new();
        let state = actions.into_iter().fold(state, |state, action| {
            let (state, effect) = reduce(state, action);
            effects.extend(effect.flatten());
            state
        });
        (state, effects)
    }

    fn component_values(effects: &[Effect]) -> Vec<Option<String>> {
        effects
            .iter()
            .filter_map(|effect| match effect {
                Effect::Host(HostMessage::SetComponentValue { value }) => Some(value.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_mount_requests_default_height() {
        let (state, effect) = reduce(test_state(Configuration::default()), Action::Mount);
        assert_eq!(effect, Effect::Host(HostMessage::SetFrameHeight { height: 80 }));
        assert_eq!(state.host.frame_height_px, Some(80));
    }

    #[test]
    fn test_round_trip_of_initial_value() {
        for value in ["2024-01-15", "2000-02-29", "1999-12-31", "2024-03-02"] {
            let args = Configuration {
                value: Some(value.to_string()),
                ..Default::default()
            };
            let (_, effects) = run(
                test_state(args),
                vec![Action::OpenCalendar, Action::SelectCursor],
            );
            assert_eq!(component_values(&effects), vec![Some(value.to_string())]);
        }
    }

    #[test]
    fn test_scenario_format_and_select() {
        let args = Configuration {
            value: Some("2024-01-15".to_string()),
            format: DateFormat::from_identifier_or_default("YYYY-MM-DD"),
            ..Default::default()
        };
        let state = test_state(args);
        let shown = state
            .picker
            .selected
            .map(|d| format_display(d, state.args.format));
        assert_eq!(shown.as_deref(), Some("2024-01-15"));

        let (state, effects) = run(
            state,
            vec![Action::OpenCalendar, Action::SelectDate(date(2024, 3, 2))],
        );
        assert_eq!(component_values(&effects), vec![Some("2024-03-02".to_string())]);

        let id = state.open_session().unwrap().id;
        let (state, _) = reduce(state, Action::CloseTimerElapsed(id));
        assert!(!state.is_open());
    }

    #[test]
    fn test_scenario_bounds() {
        let args = Configuration {
            value: None,
            min_value: Some("2024-01-01".to_string()),
            max_value: Some("2024-01-10".to_string()),
            ..Default::default()
        };
        let (state, effects) = run(
            test_state(args),
            vec![Action::OpenCalendar, Action::SelectDate(date(2024, 1, 15))],
        );
        assert!(component_values(&effects).is_empty());
        assert_eq!(state.picker.selected, None);

        let (state, effects) = run(state, vec![Action::SelectDate(date(2024, 1, 5))]);
        assert_eq!(component_values(&effects), vec![Some("2024-01-05".to_string())]);
        assert_eq!(state.picker.selected, Some(date(2024, 1, 5)));
    }

    #[test]
    fn test_emitted_value_decodes_to_selection() {
        let (state, effects) = run(
            test_state(Configuration::default()),
            vec![Action::OpenCalendar, Action::SelectDate(date(2024, 12, 31))],
        );
        let emitted = component_values(&effects).remove(0);
        assert_eq!(emitted.as_deref().and_then(parse_canonical), state.picker.selected);
        assert_eq!(emitted, state.picker.selected.map(to_canonical));
    }

    #[test]
    fn test_host_value_change_replaces_selection_silently() {
        let state = test_state(Configuration {
            value: Some("2024-01-15".to_string()),
            ..Default::default()
        });
        let (state, effect) = reduce(
            state,
            Action::ConfigurationReceived(Configuration {
                value: Some("2024-02-01".to_string()),
                ..Default::default()
            }),
        );
        assert_eq!(state.picker.selected, Some(date(2024, 2, 1)));
        assert_eq!(state.picker.cursor, date(2024, 2, 1));
        assert!(component_values(&effect.flatten()).is_empty());
    }

    #[test]
    fn test_unchanged_configuration_is_noop() {
        let args = Configuration {
            label: Some("日付".to_string()),
            ..Default::default()
        };
        let mut state = test_state(args.clone());
        state.picker.cursor = date(2030, 1, 1);
        let (state, effect) = reduce(state, Action::ConfigurationReceived(args));
        assert_eq!(effect, Effect::None);
        assert_eq!(state.picker.cursor, date(2030, 1, 1));
    }

    #[test]
    fn test_disabling_while_open_closes() {
        let (state, _) = run(test_state(Configuration::default()), vec![Action::OpenCalendar]);
        let (state, effect) = reduce(
            state,
            Action::ConfigurationReceived(Configuration {
                disabled: true,
                ..Default::default()
            }),
        );
        assert!(!state.is_open());
        assert!(effect.flatten().contains(&Effect::ReleaseSession));
    }

    #[test]
    fn test_sidebar_change_recomputes_scale() {
        let mut state = test_state(Configuration::default());
        state.layout.mounted.container = Some(ratatui::layout::Rect::new(0, 0, 20, 4));
        state.layout.mounted.frame = Some(ratatui::layout::Rect::new(0, 0, 20, 4));

        let (state, _) = reduce(state, Action::ViewportResized { width: 20, height: 20 });
        assert_eq!(state.layout.snapshot.scale.value(), 0.75);

        let (state, _) = reduce(
            state,
            Action::ConfigurationReceived(Configuration {
                sidebar_mode: true,
                ..Default::default()
            }),
        );
        assert_eq!(state.layout.snapshot.scale.value(), 0.95);
    }

    #[test]
    fn test_stale_session_actions_are_dropped() {
        let (state, _) = run(
            test_state(Configuration::default()),
            vec![Action::OpenCalendar, Action::SelectDate(date(2024, 1, 5))],
        );
        let old = state.open_session().unwrap().id;
        let (state, _) = run(
            state,
            vec![Action::Dismiss(DismissReason::CalendarClosed), Action::OpenCalendar],
        );
        let current = state.open_session().unwrap().id;
        assert_ne!(old, current);

        for action in [
            Action::CloseTimerElapsed(old),
            Action::HostFocusLost(Some(old)),
            Action::CalendarResized(old),
        ] {
            let (next, effect) = reduce(state.clone(), action);
            assert_eq!(effect, Effect::None);
            assert_eq!(next.open_session().map(|session| session.id), Some(current));
        }

        let (state, _) = reduce(state, Action::HostFocusLost(Some(current)));
        assert!(!state.is_open());
    }

    #[test]
    fn test_session_actions_while_closed_are_dropped() {
        let state = test_state(Configuration::default());
        let (state, effect) = reduce(state, Action::CalendarResized(SessionId(1)));
        assert_eq!(effect, Effect::None);
        assert_eq!(state.host.frame_height_px, None);
    }

    #[test]
    fn test_quit_sets_flag() {
        let (state, effect) = reduce(test_state(Configuration::default()), Action::Quit);
        assert!(state.system.should_quit);
        assert_eq!(effect, Effect::None);
    }

    #[test]
    fn test_status_message() {
        let (state, _) = reduce(
            test_state(Configuration::default()),
            Action::SetStatusMessage {
                message: "bridge unavailable".to_string(),
                is_error: true,
            },
        );
        assert_eq!(state.system.status_message.as_deref(), Some("bridge unavailable"));
        assert!(state.system.status_is_error);
    }
}
