use crate::commands::{CmdMessage, CmdResult};
use crate::model::AppState;
use crate::store::import_document;
use std::fs;
use std::path::Path;
use tracing::warn;

pub const MSG_IMPORT_FAILED: &str = "Could not import the file";

/// Replace the whole state with an import document. An invalid document
/// leaves the state exactly as it was.
pub fn run(state: &mut AppState, raw: &str) -> CmdResult {
    let mut result = CmdResult::default();
    match import_document(raw) {
        Ok(imported) => {
            *state = imported;
            result.mark_changed();
            result.add_message(CmdMessage::success(format!(
                "Imported {} entries and {} trails",
                state.entries.len(),
                state.trails.len()
            )));
        }
        Err(e) => {
            warn!(error = %e, "import rejected");
            result.add_message(CmdMessage::error(format!("{}: {}", MSG_IMPORT_FAILED, e)));
        }
    }
    result
}

pub fn run_file(state: &mut AppState, path: &Path) -> CmdResult {
    match fs::read_to_string(path) {
        Ok(raw) => run(state, &raw),
        Err(e) => {
            let mut result = CmdResult::default();
            result.add_message(CmdMessage::error(format!(
                "{}: {}: {}",
                MSG_IMPORT_FAILED,
                path.display(),
                e
            )));
            result
        }
    }
}
