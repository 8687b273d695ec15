use ratatui::{
    buffer::Buffer,
    layout::{Constraint as RatatuiConstraint, Direction, Layout as RatatuiLayout, Rect},
};
use tracing::trace;

use super::component::{Constraint, ContainerLayout, Element};
use super::layout::Placement;
use super::regions::{MountedRegions, RegionId};
use crate::config::DisplayConfig;

/// Renders virtual element tree to ratatui buffer
///
/// The Renderer takes a virtual Element tree produced by components and
/// renders it in two passes: the main tree first, then every popup on top of
/// it, positioned against the regions recorded during the first pass.
///
/// The rectangles of all `Element::Region`s and popups are collected into a
/// [`MountedRegions`], which is what the layout engine measures.
#[derive(Debug, Default)]
pub struct Renderer {
    /// Regions recorded by the last render
    regions: MountedRegions,
}

impl Renderer {
    /// Create a new renderer
    pub fn new() -> Self {
        Self::default()
    }

    /// Regions recorded by the last render
    pub fn regions(&self) -> MountedRegions {
        self.regions
    }

    /// Render an element tree to the given area in the buffer
    ///
    /// Returns the regions that were mounted by this render.
    pub fn render(
        &mut self,
        element: &Element,
        area: Rect,
        buf: &mut Buffer,
        config: &DisplayConfig,
    ) -> MountedRegions {
        let mut regions = MountedRegions::default();
        let mut popups = Vec::new();
        self.render_element(element, area, buf, config, &mut regions, &mut popups);

        // Popups may contain popups; those render after their parent
        let mut next = 0;
        while next < popups.len() {
            let popup = popups[next];
            next += 1;
            self.render_popup(popup, buf, config, &mut regions, &mut popups);
        }

        self.regions = regions;
        regions
    }

    /// Calculate layout constraints and split the area
    fn calculate_layout(&self, layout: &ContainerLayout, area: Rect) -> Vec<Rect> {
        let (direction, constraints) = match layout {
            ContainerLayout::Vertical(constraints) => (Direction::Vertical, constraints),
            ContainerLayout::Horizontal(constraints) => (Direction::Horizontal, constraints),
        };
        let ratatui_constraints = constraints
            .iter()
            .map(|c| self.convert_constraint(*c))
            .collect::<Vec<_>>();

        RatatuiLayout::default()
            .direction(direction)
            .constraints(ratatui_constraints)
            .split(area)
            .to_vec()
    }

    /// Convert our Constraint type to ratatui's Constraint
    fn convert_constraint(&self, constraint: Constraint) -> RatatuiConstraint {
        match constraint {
            Constraint::Length(n) => RatatuiConstraint::Length(n),
            Constraint::Min(n) => RatatuiConstraint::Min(n),
            Constraint::Max(n) => RatatuiConstraint::Max(n),
            Constraint::Percentage(n) => RatatuiConstraint::Percentage(n),
            Constraint::Ratio(a, b) => RatatuiConstraint::Ratio(a, b),
        }
    }

    fn render_element<'a>(
        &self,
        element: &'a Element,
        area: Rect,
        buf: &mut Buffer,
        config: &DisplayConfig,
        regions: &mut MountedRegions,
        popups: &mut Vec<&'a Element>,
    ) {
        match element {
            Element::Widget(widget) => {
                // Widgets always render (they're leaf nodes)
                widget.render(area, buf, config);
            }

            Element::Container { children, layout } => {
                let chunks = self.calculate_layout(layout, area);
                for (child, chunk) in children.iter().zip(chunks) {
                    self.render_element(child, chunk, buf, config, regions, popups);
                }
            }

            Element::Fragment(children) => {
                for child in children {
                    self.render_element(child, area, buf, config, regions, popups);
                }
            }

            Element::Region { id, child } => {
                regions.record(*id, area);
                self.render_element(child, area, buf, config, regions, popups);
            }

            Element::Popup { .. } => popups.push(element),

            Element::None => {}
        }
    }

    fn render_popup<'a>(
        &self,
        popup: &'a Element,
        buf: &mut Buffer,
        config: &DisplayConfig,
        regions: &mut MountedRegions,
        popups: &mut Vec<&'a Element>,
    ) {
        let Element::Popup {
            anchor,
            clamp,
            placement,
            gap,
            width,
            height,
            child,
        } = popup
        else {
            return;
        };
        let Some(anchor_rect) = regions.get(*anchor) else {
            trace!("RENDER: Popup anchor {:?} not mounted", anchor);
            return;
        };
        let frame = regions.get(RegionId::Frame).unwrap_or(buf.area);
        let clamp_rect = regions.get(*clamp).unwrap_or(frame);
        let rect = place_popup(anchor_rect, clamp_rect, frame, *placement, *gap, *width, *height);

        regions.record(RegionId::Popup, rect);

        // Draw unclipped, then copy what is visible inside the frame
        let mut scratch = Buffer::empty(rect);
        self.render_element(child, rect, &mut scratch, config, regions, popups);
        let visible = rect.intersection(frame).intersection(buf.area);
        for y in visible.top()..visible.bottom() {
            for x in visible.left()..visible.right() {
                buf[(x, y)] = scratch[(x, y)].clone();
            }
        }
    }
}

/// Position a `width` x `height` popup against `anchor`
///
/// `BottomStart` opens below the anchor and flips above only when that is
/// the side with room. `TopStart` prefers above. Horizontally the popup
/// starts at the anchor's left edge, shifted left to stay within `clamp`.
pub fn place_popup(
    anchor: Rect,
    clamp: Rect,
    frame: Rect,
    placement: Placement,
    gap: u16,
    width: u16,
    height: u16,
) -> Rect {
    let below = anchor.bottom().saturating_add(gap);
    let above = anchor.y.checked_sub(gap.saturating_add(height));
    let fits_below = below.saturating_add(height) <= frame.bottom();
    let fits_above = above.is_some_and(|y| y >= frame.y);

    let y = match (placement, above) {
        (Placement::BottomStart, Some(above)) if !fits_below && fits_above => above,
        (Placement::TopStart, Some(above)) if fits_above => above,
        _ => below,
    };

    let mut x = anchor.x;
    if x.saturating_add(width) > clamp.right() {
        x = clamp.right().saturating_sub(width);
    }
    x = x.max(clamp.x);

    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::component::{region, vertical, ElementWidget};
    use crate::tui::testing::{buffer_lines, RENDER_WIDTH};
    use ratatui::style::Style;

    #[derive(Clone)]
    struct TextWidget(&'static str);

    impl ElementWidget for TextWidget {
        fn render(&self, area: Rect, buf: &mut Buffer, _config: &DisplayConfig) {
            for y in area.top()..area.bottom() {
                buf.set_stringn(area.x, y, self.0, usize::from(area.width), Style::default());
            }
        }

        fn clone_box(&self) -> Box<dyn ElementWidget> {
            Box::new(self.clone())
        }
    }

    fn text(s: &'static str) -> Element {
        Element::Widget(Box::new(TextWidget(s)))
    }

    fn popup(clamp: RegionId, placement: Placement, child: Element) -> Element {
        Element::Popup {
            anchor: RegionId::InputField,
            clamp,
            placement,
            gap: 0,
            width: 4,
            height: 2,
            child: Box::new(child),
        }
    }

    #[test]
    fn test_render_none() {
        let mut renderer = Renderer::new();
        let area = Rect::new(0, 0, 10, 5);
        let mut buffer = Buffer::empty(area);
        let regions = renderer.render(&Element::None, area, &mut buffer, &DisplayConfig::default());

        assert_eq!(regions, MountedRegions::default());
        for line in buffer_lines(&buffer) {
            assert_eq!(line, " ".repeat(10));
        }
    }

    #[test]
    fn test_render_container_vertical() {
        let mut renderer = Renderer::new();
        let area = Rect::new(0, 0, RENDER_WIDTH, 4);
        let mut buffer = Buffer::empty(area);
        let element = vertical(
            [Constraint::Length(1), Constraint::Min(0)],
            vec![text("TOP"), text("BOTTOM")],
        );
        renderer.render(&element, area, &mut buffer, &DisplayConfig::default());

        let lines = buffer_lines(&buffer);
        assert!(lines[0].starts_with("TOP"));
        assert!(lines[1].starts_with("BOTTOM"));
        assert!(lines[3].starts_with("BOTTOM"));
    }

    #[test]
    fn test_constraint_conversion() {
        let renderer = Renderer::new();
        assert_eq!(renderer.convert_constraint(Constraint::Length(10)), RatatuiConstraint::Length(10));
        assert_eq!(renderer.convert_constraint(Constraint::Max(3)), RatatuiConstraint::Max(3));
        assert_eq!(renderer.convert_constraint(Constraint::Ratio(1, 3)), RatatuiConstraint::Ratio(1, 3));
    }

    #[test]
    fn test_regions_are_recorded() {
        let mut renderer = Renderer::new();
        let area = Rect::new(0, 0, 20, 6);
        let mut buffer = Buffer::empty(area);
        let element = region(
            RegionId::Frame,
            vertical(
                [Constraint::Length(4), Constraint::Min(0)],
                vec![
                    region(
                        RegionId::Container,
                        vertical(
                            [Constraint::Length(1), Constraint::Length(3)],
                            vec![text("label"), region(RegionId::InputField, text("input"))],
                        ),
                    ),
                    Element::None,
                ],
            ),
        );
        let regions = renderer.render(&element, area, &mut buffer, &DisplayConfig::default());

        assert_eq!(regions.frame, Some(area));
        assert_eq!(regions.container, Some(Rect::new(0, 0, 20, 4)));
        assert_eq!(regions.input, Some(Rect::new(0, 1, 20, 3)));
        assert_eq!(regions.popup, None);
        assert_eq!(renderer.regions(), regions);
    }

    #[test]
    fn test_popup_renders_on_top_and_is_clipped_to_frame() {
        let mut renderer = Renderer::new();
        let area = Rect::new(0, 0, 10, 6);
        let mut buffer = Buffer::empty(area);
        // Frame is 4 rows; the popup below the 3-row input overflows it
        let element = vertical(
            [Constraint::Length(4), Constraint::Min(0)],
            vec![
                region(
                    RegionId::Frame,
                    vertical(
                        [Constraint::Length(3), Constraint::Min(0)],
                        vec![
                            region(RegionId::InputField, text("in")),
                            popup(
                                RegionId::Frame,
                                Placement::BottomStart,
                                region(RegionId::CalendarWrapper, text("CAL")),
                            ),
                        ],
                    ),
                ),
                text("page"),
            ],
        );
        let regions = renderer.render(&element, area, &mut buffer, &DisplayConfig::default());

        // Recorded unclipped, below the input: no room above it either
        assert_eq!(regions.popup, Some(Rect::new(0, 3, 4, 2)));
        assert_eq!(regions.calendar, Some(Rect::new(0, 3, 4, 2)));

        let lines = buffer_lines(&buffer);
        assert!(lines[3].starts_with("CAL"));
        // Row 4 is outside the frame and keeps the page content
        assert!(lines[4].starts_with("page"));
    }

    #[test]
    fn test_popup_without_anchor_is_skipped() {
        let mut renderer = Renderer::new();
        let area = Rect::new(0, 0, 10, 4);
        let mut buffer = Buffer::empty(area);
        let element = popup(RegionId::Frame, Placement::BottomStart, text("CAL"));
        let regions = renderer.render(&element, area, &mut buffer, &DisplayConfig::default());

        assert_eq!(regions.popup, None);
        assert!(buffer_lines(&buffer)[0].trim().is_empty());
    }

    #[test]
    fn test_place_popup_below() {
        let frame = Rect::new(0, 0, 40, 20);
        let anchor = Rect::new(0, 1, 30, 3);
        let rect = place_popup(anchor, frame, frame, Placement::BottomStart, 1, 31, 11);
        assert_eq!(rect, Rect::new(0, 5, 31, 11));
    }

    #[test]
    fn test_place_popup_flips_above_when_only_above_fits() {
        let frame = Rect::new(0, 0, 40, 20);
        let anchor = Rect::new(0, 15, 30, 3);
        let rect = place_popup(anchor, frame, frame, Placement::BottomStart, 0, 31, 11);
        assert_eq!(rect, Rect::new(0, 4, 31, 11));
    }

    #[test]
    fn test_place_popup_stays_below_when_neither_fits() {
        let frame = Rect::new(0, 0, 40, 8);
        let anchor = Rect::new(0, 1, 30, 3);
        let rect = place_popup(anchor, frame, frame, Placement::BottomStart, 0, 31, 11);
        assert_eq!(rect.y, 4);
    }

    #[test]
    fn test_place_popup_top_start() {
        let frame = Rect::new(0, 0, 40, 30);
        let anchor = Rect::new(0, 14, 30, 3);
        let rect = place_popup(anchor, frame, frame, Placement::TopStart, 0, 31, 11);
        assert_eq!(rect.y, 3);

        // Not enough room above: falls back to below
        let anchor = Rect::new(0, 1, 30, 3);
        let rect = place_popup(anchor, frame, frame, Placement::TopStart, 0, 31, 11);
        assert_eq!(rect.y, 4);
    }

    #[test]
    fn test_place_popup_is_clamped_horizontally() {
        let frame = Rect::new(0, 0, 60, 20);
        let clamp = Rect::new(5, 0, 25, 4);
        let anchor = Rect::new(5, 1, 25, 3);
        let rect = place_popup(anchor, clamp, frame, Placement::BottomStart, 0, 31, 11);
        // Wider than the clamp region: pinned to its left edge
        assert_eq!(rect.x, 5);

        let anchor = Rect::new(20, 1, 10, 3);
        let clamp = Rect::new(0, 0, 40, 4);
        let rect = place_popup(anchor, clamp, frame, Placement::BottomStart, 0, 31, 11);
        assert_eq!(rect.x, 9);
    }
}
