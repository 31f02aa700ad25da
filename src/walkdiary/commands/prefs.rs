use crate::commands::{CmdMessage, CmdResult};
use crate::model::{AppState, Preferences, Unit};

pub const KEYS: [&str; 2] = ["unit", "photo-max-px"];

#[derive(Debug, Clone)]
pub enum PrefsAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

fn get(prefs: &Preferences, key: &str) -> Option<String> {
    match key {
        "unit" => Some(prefs.unit.to_string()),
        "photo-max-px" | "photoMaxPx" => Some(prefs.photo_max_px.to_string()),
        _ => None,
    }
}

fn set(prefs: &mut Preferences, key: &str, value: &str) -> Result<(), String> {
    match key {
        "unit" => {
            prefs.unit = value.parse::<Unit>()?;
            Ok(())
        }
        "photo-max-px" | "photoMaxPx" => match value.trim().parse::<u32>() {
            Ok(px) if px >= 1 => {
                prefs.photo_max_px = px;
                Ok(())
            }
            _ => Err(format!(
                "Invalid photo-max-px '{}' (expected a whole number of pixels, at least 1)",
                value
            )),
        },
        other => Err(format!(
            "Unknown preference: {} (known: {})",
            other,
            KEYS.join(", ")
        )),
    }
}

pub fn run(state: &mut AppState, action: PrefsAction) -> CmdResult {
    match action {
        PrefsAction::ShowAll => CmdResult::default().with_prefs(state.prefs),
        PrefsAction::ShowKey(key) => {
            let mut result = CmdResult::default();
            match get(&state.prefs, &key) {
                Some(val) => result.add_message(CmdMessage::info(val)),
                None => {
                    result.add_message(CmdMessage::error(format!("Unknown preference: {}", key)))
                }
            }
            result
        }
        PrefsAction::Set(key, value) => {
            let mut prefs = state.prefs;
            if let Err(e) = set(&mut prefs, &key, &value) {
                let mut res = CmdResult::default();
                res.add_message(CmdMessage::error(e));
                return res;
            }
            state.prefs = prefs;

            let mut result = CmdResult::default().with_prefs(prefs);
            let display_val = get(&prefs, &key).unwrap_or(value);
            result.add_message(CmdMessage::success(format!("{} set to {}", key, display_val)));
            result.mark_changed();
            result
        }
    }
}
