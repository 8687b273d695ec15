use crate::formatting::format_display;
use crate::layout_constants::{INPUT_FIELD_HEIGHT, LABEL_HEIGHT};
use crate::tui::component::{horizontal, region, vertical, Component, Constraint, Element};
use crate::tui::layout::{Placement, SizeClass};
use crate::tui::regions::RegionId;
use crate::tui::state::AppState;
use crate::tui::widgets::{Calendar, InputField, Label, Shadow};
use crate::types::WidthSpec;

#[derive(Debug, Clone, PartialEq)]
pub struct DateInputProps {
    pub label: Option<String>,
    /// Selected date in the display format
    pub text: Option<String>,
    pub disabled: bool,
    /// Container width cap in columns, `None` to stretch
    pub width_columns: Option<u16>,
    pub sidebar_mode: bool,
    pub size_class: SizeClass,
    pub placement: Placement,
    /// Present while the calendar is open
    pub calendar: Option<Calendar>,
}

impl DateInputProps {
    pub fn from_state(state: &AppState) -> Self {
        let args = &state.args;
        let metrics = state.layout.metrics;
        let snapshot = state.layout.snapshot;
        let calendar = state.is_open().then(|| {
            Calendar::new(
                state.picker.cursor,
                state.picker.selected,
                state.system.today,
                args.bounds(),
                snapshot.scale,
            )
        });

        Self {
            label: args.label().map(str::to_string),
            text: state.picker.selected.map(|date| format_display(date, args.format)),
            disabled: args.disabled,
            width_columns: match args.width {
                WidthSpec::Stretch => None,
                WidthSpec::Pixels(px) => Some(metrics.px_to_columns(px)),
            },
            sidebar_mode: args.sidebar_mode,
            size_class: snapshot.size_class(),
            placement: snapshot.placement(),
            calendar,
        }
    }

    /// Rows of the label and input field
    pub fn container_rows(&self) -> u16 {
        let label = if self.label.is_some() { LABEL_HEIGHT } else { 0 };
        label + INPUT_FIELD_HEIGHT
    }
}

/// DateInput component - label, read-only field and the calendar popup
///
/// The container (label + field) is reported as [`RegionId::Container`]; the
/// popup is anchored to the field and the calendar inside it is reported as
/// [`RegionId::CalendarWrapper`].
pub struct DateInput;

impl Component for DateInput {
    type Props = DateInputProps;
    type State = ();

    fn view(&self, props: &Self::Props, _state: &Self::State) -> Element {
        let width = match props.width_columns {
            Some(columns) => Constraint::Length(columns),
            None => Constraint::Percentage(100),
        };

        horizontal(
            [width, Constraint::Min(0)],
            vec![
                vertical(
                    [Constraint::Length(props.container_rows()), Constraint::Min(0)],
                    vec![self.render_container(props), self.render_popup(props)],
                ),
                Element::None,
            ],
        )
    }
}

impl DateInput {
    fn render_container(&self, props: &DateInputProps) -> Element {
        let field = region(
            RegionId::InputField,
            Element::Widget(Box::new(InputField {
                text: props.text.clone(),
                open: props.calendar.is_some(),
                disabled: props.disabled,
            })),
        );

        let content = match &props.label {
            Some(text) => vertical(
                [Constraint::Length(LABEL_HEIGHT), Constraint::Length(INPUT_FIELD_HEIGHT)],
                vec![
                    Element::Widget(Box::new(Label {
                        text: text.clone(),
                        disabled: props.disabled,
                    })),
                    field,
                ],
            ),
            None => field,
        };
        region(RegionId::Container, content)
    }

    fn render_popup(&self, props: &DateInputProps) -> Element {
        let Some(calendar) = &props.calendar else {
            return Element::None;
        };
        let width = calendar.width();
        let height = calendar.height();

        // Calendar with a one-cell shadow to the right and below
        let child = vertical(
            [Constraint::Length(height), Constraint::Length(1)],
            vec![
                horizontal(
                    [Constraint::Length(width), Constraint::Length(1)],
                    vec![
                        region(RegionId::CalendarWrapper, Element::Widget(Box::new(calendar.clone()))),
                        vertical(
                            [Constraint::Length(1), Constraint::Min(0)],
                            vec![Element::None, Element::Widget(Box::new(Shadow))],
                        ),
                    ],
                ),
                horizontal(
                    [Constraint::Length(1), Constraint::Min(0)],
                    vec![Element::None, Element::Widget(Box::new(Shadow))],
                ),
            ],
        );

        Element::Popup {
            anchor: RegionId::InputField,
            clamp: if props.sidebar_mode {
                RegionId::Container
            } else {
                RegionId::Frame
            },
            placement: props.placement,
            gap: props.size_class.popup_gap(),
            width: width + 1,
            height: height + 1,
            child: Box::new(child),
        }
    }
}
