use crate::layout_constants::DEFAULT_FRAME_HEIGHT;
use crate::tui::component::{horizontal, region, vertical, Component, Constraint, Element};
use crate::tui::regions::RegionId;
use crate::tui::state::AppState;
use crate::tui::widgets::FrameRule;

use super::{DateInput, DateInputProps, StatusBar, StatusBarProps};

/// Root App component
///
/// Emulates the host page: the widget lives in a frame whose height is the
/// last height sent to the host, followed by a rule marking the frame's
/// bottom edge and the status bar.
pub struct App;

impl Component for App {
    type Props = AppState;
    type State = ();

    fn view(&self, props: &Self::Props, _state: &Self::State) -> Element {
        let height_px = props.host.frame_height_px.unwrap_or(DEFAULT_FRAME_HEIGHT);
        let frame_rows = props.layout.metrics.px_to_rows(height_px);
        let frame_width = match props.system.frame_columns {
            Some(columns) => Constraint::Length(columns),
            None => Constraint::Percentage(100),
        };

        vertical(
            [
                Constraint::Length(frame_rows), // Host frame
                Constraint::Length(1),          // Frame edge
                Constraint::Min(0),             // Rest of the host page
                Constraint::Length(2),          // StatusBar (2 lines: separator + content)
            ],
            vec![
                horizontal(
                    [frame_width, Constraint::Min(0)],
                    vec![
                        region(
                            RegionId::Frame,
                            DateInput.view(&DateInputProps::from_state(props), &()),
                        ),
                        Element::None,
                    ],
                ),
                horizontal(
                    [frame_width, Constraint::Min(0)],
                    vec![Element::Widget(Box::new(FrameRule { height_px })), Element::None],
                ),
                Element::None,
                StatusBar.view(&self.status_props(props), &()),
            ],
        )
    }
}

impl App {
    fn status_props(&self, state: &AppState) -> StatusBarProps {
        let snapshot = state.layout.snapshot;
        let mut layout_text = format!("scale {:.2}", snapshot.scale.value());
        let size_class = snapshot.size_class().as_str();
        if !size_class.is_empty() {
            layout_text.push(' ');
            layout_text.push_str(size_class);
        }
        if state.is_open() {
            layout_text.push(' ');
            layout_text.push_str(snapshot.placement().as_str());
        }

        StatusBarProps {
            message: state.system.status_text(state.is_open()).to_string(),
            is_error: state.system.status_is_error,
            layout_text,
        }
    }
}
