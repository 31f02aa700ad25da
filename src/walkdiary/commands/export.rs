use crate::commands::{CmdMessage, CmdResult};
use crate::error::{DiaryError, Result};
use crate::model::AppState;
use crate::store::{export_document, export_filename};
use chrono::Utc;
use std::fs;
use std::path::Path;

/// Write the full state as a pretty-printed JSON file into `dir`.
pub fn run(state: &AppState, dir: &Path) -> Result<CmdResult> {
    let document = export_document(state)?;

    if !dir.exists() {
        fs::create_dir_all(dir).map_err(DiaryError::Io)?;
    }
    let path = dir.join(export_filename(Utc::now()));
    fs::write(&path, document).map_err(DiaryError::Io)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Exported {} entries and {} trails to {}",
        state.entries.len(),
        state.trails.len(),
        path.display()
    )));
    Ok(result.with_export_path(path))
}
