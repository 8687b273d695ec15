use tracing::{debug, trace};

use crate::bridge::HostMessage;
use crate::layout_constants::DEFAULT_FRAME_HEIGHT;
use crate::tui::action::Action;
use crate::tui::component::Effect;
use crate::tui::layout::{self, CalendarMeasurement, LayoutInputs};
use crate::tui::regions::MountedRegions;
use crate::tui::state::AppState;

/// Handle post-layout reports, size observer callbacks and viewport resizes
pub fn reduce_layout(state: AppState, action: &Action) -> Result<(AppState, Effect), AppState> {
    match action {
        Action::LayoutReported(regions) => Ok(layout_reported(state, *regions)),
        Action::CalendarResized(_) => Ok(calendar_resized(state)),
        Action::ViewportResized { width, height } => {
            trace!("LAYOUT: Viewport resized to {}x{}", width, height);
            let mut new_state = state;
            let effect = relayout(&mut new_state);
            Ok((new_state, effect))
        }
        _ => Err(state),
    }
}

/// Recompute the full layout snapshot and request the frame height if it changed
pub fn relayout(state: &mut AppState) -> Effect {
    let height = recompute_snapshot(state);
    request_frame_height(state, height)
}

/// Overwrite the layout snapshot from the current signals, returning the
/// frame height it calls for
pub fn recompute_snapshot(state: &mut AppState) -> u32 {
    let open = state.is_open();
    let inputs = LayoutInputs::from_regions(
        &state.layout.mounted,
        state.layout.metrics,
        state.args.sidebar_mode,
    );
    let measurement = if open {
        CalendarMeasurement::from_regions(&state.layout.mounted, state.layout.metrics)
    } else {
        None
    };

    let snapshot = layout::recompute(&inputs, open, measurement);
    if snapshot != state.layout.snapshot {
        debug!(
            "LAYOUT: scale {:.3} class {:?} frame {}px (measured: {})",
            snapshot.scale.value(),
            snapshot.size_class().as_str(),
            snapshot.frame_height_px,
            measurement.is_some()
        );
    }
    state.layout.snapshot = snapshot;
    snapshot.frame_height_px
}

/// Collapse to the default height, always sending the request
pub fn collapse_frame(state: &mut AppState) -> Effect {
    state.layout.mounted.popup = None;
    state.layout.mounted.calendar = None;
    recompute_snapshot(state);
    send_frame_height(state, DEFAULT_FRAME_HEIGHT)
}

fn request_frame_height(state: &mut AppState, height: u32) -> Effect {
    if state.host.frame_height_px == Some(height) {
        return Effect::None;
    }
    send_frame_height(state, height)
}

pub(crate) fn send_frame_height(state: &mut AppState, height: u32) -> Effect {
    state.host.frame_height_px = Some(height);
    Effect::Host(HostMessage::SetFrameHeight { height })
}

fn layout_reported(state: AppState, regions: MountedRegions) -> (AppState, Effect) {
    let mut new_state = state;
    new_state.layout.mounted = regions;

    // The popup being laid out is the "calendar mounted" signal; the click
    // that opened it has already been handled by the time this arrives
    if let Some(session) = new_state.picker.visibility.session_mut() {
        if !session.listeners_attached && regions.popup.is_some() {
            session.listeners_attached = true;
            debug!("SESSION: {} outside-pointer dismissal armed", session.id);
        }
    }

    let effect = relayout(&mut new_state);
    (new_state, effect)
}

fn calendar_resized(state: AppState) -> (AppState, Effect) {
    let mut new_state = state;
    let effect = relayout(&mut new_state);
    (new_state, effect)
}
