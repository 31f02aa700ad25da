use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::AppState;
use crate::store::{PersistenceStore, StorageBackend};
use tracing::info;

/// Drop every entry, trail and preference, both in memory and on disk.
pub async fn run<B: StorageBackend>(state: &mut AppState, store: &PersistenceStore<B>) -> Result<CmdResult> {
    let entries = state.entries.len();
    let trails = state.trails.len();

    store.clear().await?;
    *state = AppState::default();
    info!(entries, trails, "state cleared");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Cleared {} entries and {} trails",
        entries, trails
    )));
    Ok(result)
}
