use crate::commands::{CmdMessage, CmdResult};
use crate::geo::format_distance;
use crate::model::{AppState, Trail};

pub const MSG_STARTED: &str = "Recording started";
pub const MSG_SAVED: &str = "Trail saved";
pub const MSG_TOO_SHORT: &str = "Trail too short to measure a distance";

pub fn started(trail: &Trail) -> CmdResult {
    let mut result = CmdResult::default();
    let detail = match trail.points.len() {
        0 => "waiting for a first fix".to_string(),
        n => format!("{} point{}", n, if n == 1 { "" } else { "s" }),
    };
    result.add_message(CmdMessage::success(format!("{} ({})", MSG_STARTED, detail)));
    result
}

/// Store a finalized trail. Trails with fewer than two points are still kept
/// (at zero distance) but flagged to the user.
pub fn finish(state: &mut AppState, trail: Trail) -> CmdResult {
    let mut result = CmdResult::default();

    if !trail.is_measurable() {
        result.add_message(CmdMessage::warning(MSG_TOO_SHORT));
    }
    result.add_message(CmdMessage::success(format!(
        "{}: {} points, {}",
        MSG_SAVED,
        trail.points.len(),
        format_distance(trail.distance_or_zero(), state.prefs.unit)
    )));

    state.trails.insert(0, trail.clone());
    result.listed_trails.push(trail);
    result.mark_changed();
    result
}
