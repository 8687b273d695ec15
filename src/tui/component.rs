use ratatui::{buffer::Buffer, layout::Rect};

use super::layout::Placement;
use super::regions::RegionId;
use super::state::SessionId;
use crate::bridge::HostMessage;
use crate::config::DisplayConfig;

/// Core component trait - like React.Component
///
/// Components are the building blocks of the UI. Each component:
/// - Has Props (input data, like React props)
/// - Has State (local render state, `()` when everything lives in the store)
/// - Renders to an Element tree (virtual DOM)
pub trait Component: Send {
    /// Props type for this component
    type Props: Clone;

    /// Local state type (if any)
    type State: Default + Clone + Send + Sync + 'static;

    /// Render component given props and state (pure function)
    fn view(&self, props: &Self::Props, state: &Self::State) -> Element;
}

/// Element in virtual component tree
#[derive(Clone)]
pub enum Element {
    /// A widget that can be directly rendered to ratatui buffer
    Widget(Box<dyn ElementWidget>),

    /// A container with layout and children
    Container {
        children: Vec<Element>,
        layout: ContainerLayout,
    },

    /// A fragment (just groups children, no layout)
    Fragment(Vec<Element>),

    /// Child whose area is reported back after the draw
    Region { id: RegionId, child: Box<Element> },

    /// Floating element positioned against a previously laid out region
    ///
    /// Rendered after the main tree, on top of it. The popup is kept inside
    /// `clamp` horizontally and flips vertically to fit the frame; whatever
    /// still overflows the frame is clipped.
    Popup {
        anchor: RegionId,
        clamp: RegionId,
        placement: Placement,
        gap: u16,
        width: u16,
        height: u16,
        child: Box<Element>,
    },

    /// Nothing to render
    None,
}

/// Layout for container elements
#[derive(Clone, Debug, PartialEq)]
pub enum ContainerLayout {
    Vertical(Vec<Constraint>),
    Horizontal(Vec<Constraint>),
}

/// Constraint for layout
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Constraint {
    Length(u16),
    Min(u16),
    Max(u16),
    Percentage(u16),
    Ratio(u32, u32),
}

/// Side effects produced by the reducer, executed by the runtime
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Batch(Vec<Effect>),
    /// Outbound host bridge message
    Host(HostMessage),
    /// Start the timers and observers of a newly opened calendar
    AcquireSession(SessionId),
    /// Drop whatever the open calendar acquired
    ReleaseSession,
    /// Close the calendar after the selection delay
    ScheduleClose(SessionId),
}

impl Effect {
    /// Batch of the non-empty effects, collapsed when there is zero or one
    pub fn batch(effects: Vec<Effect>) -> Effect {
        let mut effects: Vec<Effect> = effects
            .into_iter()
            .filter(|effect| !matches!(effect, Effect::None))
            .collect();
        match effects.len() {
            0 => Effect::None,
            1 => effects.remove(0),
            _ => Effect::Batch(effects),
        }
    }

    /// Flatten nested batches, in execution order
    pub fn flatten(self) -> Vec<Effect> {
        match self {
            Effect::None => Vec::new(),
            Effect::Batch(effects) => effects.into_iter().flat_map(Effect::flatten).collect(),
            other => vec![other],
        }
    }
}

/// Trait for widgets that can be wrapped in the Element tree
pub trait ElementWidget: Send + Sync {
    /// Render this widget into the provided buffer
    fn render(&self, area: Rect, buf: &mut Buffer, config: &DisplayConfig);

    /// Clone this widget into a boxed trait object
    fn clone_box(&self) -> Box<dyn ElementWidget>;
}

impl Clone for Box<dyn ElementWidget> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Helper to create a container with vertical layout
pub fn vertical<const N: usize>(constraints: [Constraint; N], children: Vec<Element>) -> Element {
    Element::Container {
        children,
        layout: ContainerLayout::Vertical(constraints.to_vec()),
    }
}

/// Helper to create a container with horizontal layout
pub fn horizontal<const N: usize>(constraints: [Constraint; N], children: Vec<Element>) -> Element {
    Element::Container {
        children,
        layout: ContainerLayout::Horizontal(constraints.to_vec()),
    }
}

/// Helper to wrap an element in a reported region
pub fn region(id: RegionId, child: Element) -> Element {
    Element::Region {
        id,
        child: Box::new(child),
    }
}
