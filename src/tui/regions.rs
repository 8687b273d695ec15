use ratatui::layout::{Position, Rect};

/// Named areas the renderer reports back after each draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionId {
    /// Emulated host frame
    Frame,
    /// Widget container (label + input field)
    Container,
    InputField,
    /// Positioned popup, including its shadow
    Popup,
    /// Calendar box inside the popup
    CalendarWrapper,
}

/// Rectangles of the mounted regions from the last draw
///
/// A region is `None` while it is not mounted. Rects are the unclipped
/// geometry, so a popup that overflows the frame still reports its full size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MountedRegions {
    pub frame: Option<Rect>,
    pub container: Option<Rect>,
    pub input: Option<Rect>,
    pub popup: Option<Rect>,
    pub calendar: Option<Rect>,
}

impl MountedRegions {
    pub fn record(&mut self, id: RegionId, rect: Rect) {
        let slot = match id {
            RegionId::Frame => &mut self.frame,
            RegionId::Container => &mut self.container,
            RegionId::InputField => &mut self.input,
            RegionId::Popup => &mut self.popup,
            RegionId::CalendarWrapper => &mut self.calendar,
        };
        *slot = Some(rect);
    }

    pub fn get(&self, id: RegionId) -> Option<Rect> {
        match id {
            RegionId::Frame => self.frame,
            RegionId::Container => self.container,
            RegionId::InputField => self.input,
            RegionId::Popup => self.popup,
            RegionId::CalendarWrapper => self.calendar,
        }
    }

    fn hit(&self, id: RegionId, column: u16, row: u16) -> bool {
        self.get(id)
            .is_some_and(|rect| rect.contains(Position::new(column, row)))
    }

    /// True when the cell belongs to the widget: its container, the popup
    /// or the calendar wrapper
    pub fn is_inside_widget(&self, column: u16, row: u16) -> bool {
        [RegionId::Container, RegionId::Popup, RegionId::CalendarWrapper]
            .into_iter()
            .any(|id| self.hit(id, column, row))
    }

    pub fn is_inside(&self, id: RegionId, column: u16, row: u16) -> bool {
        self.hit(id, column, row)
    }

    /// Calendar size as (columns, rows), observed by the open session
    pub fn calendar_size(&self) -> Option<(u16, u16)> {
        self.calendar.map(|rect| (rect.width, rect.height))
    }
}
