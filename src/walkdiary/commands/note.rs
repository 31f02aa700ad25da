use crate::commands::{CmdMessage, CmdResult};
use crate::geo::GeoSampler;
use crate::model::{now_millis, AppState, Entry, Location};
use crate::photo;
use std::path::PathBuf;
use tracing::warn;

pub const MSG_SAVED: &str = "Note saved";
pub const MSG_PHOTO_FAILED: &str = "Note not saved: the photo could not be processed";
pub const MSG_NO_LOCATION: &str = "Saved without a location";

/// What the user typed before pressing save.
#[derive(Debug, Clone, Default)]
pub struct NoteDraft {
    pub text: String,
    pub photo: Option<PathBuf>,
    /// Skip sampling altogether.
    pub without_location: bool,
}

impl NoteDraft {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

/// Save a new entry. A photo that cannot be transcoded aborts the save and
/// leaves the state untouched; a missing location only downgrades the entry.
pub async fn run(state: &mut AppState, sampler: &GeoSampler, draft: NoteDraft) -> CmdResult {
    let mut result = CmdResult::default();
    let ts = now_millis();

    let photo = match &draft.photo {
        Some(path) => match photo::transcode_file(path, state.prefs.photo_max_px).await {
            Ok(encoded) => Some(encoded),
            Err(e) => {
                warn!(error = %e, path = %path.display(), "photo transcoding failed");
                result.add_message(CmdMessage::error(MSG_PHOTO_FAILED));
                return result;
            }
        },
        None => None,
    };

    let loc = if draft.without_location {
        None
    } else {
        sampler.sample().await.map(Location::from)
    };

    let entry = Entry {
        ts,
        ..Entry::new(draft.text, photo, loc)
    };
    state.entries.insert(0, entry.clone());
    result.mark_changed();

    if entry.loc.is_none() && !draft.without_location {
        result.add_message(CmdMessage::info(MSG_NO_LOCATION));
    }
    result.add_message(CmdMessage::success(MSG_SAVED));
    result.affected_entries.push(entry);
    result
}
