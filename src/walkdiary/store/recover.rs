//! Field-by-field recovery of a stored state record.
//!
//! A record that fails to parse, or that is not an object, yields the default
//! state. Otherwise each top-level field is recovered on its own: a bad
//! `prefs.photoMaxPx` does not cost the entries, and one malformed trail does
//! not cost its siblings.

use crate::model::{AppState, Entry, Preferences, Trail, Unit};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

pub fn recover_state(raw: &str) -> AppState {
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "stored state is not valid JSON, starting from defaults");
            return AppState::default();
        }
    };
    let Value::Object(map) = value else {
        warn!("stored state is not an object, starting from defaults");
        return AppState::default();
    };

    AppState {
        entries: recover_list::<Entry>(map.get("entries"), "entries"),
        trails: recover_list::<Trail>(map.get("trails"), "trails"),
        prefs: recover_prefs(map.get("prefs")),
    }
}

/// Parse every element of a stored list on its own, skipping the ones that
/// do not fit. A missing or non-list field gives an empty list.
pub(crate) fn recover_list<T: DeserializeOwned>(value: Option<&Value>, field: &str) -> Vec<T> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .filter_map(|(i, item)| match T::deserialize(item) {
                Ok(parsed) => Some(parsed),
                Err(e) => {
                    warn!(field, index = i, error = %e, "skipping malformed stored item");
                    None
                }
            })
            .collect(),
        Some(_) => {
            warn!(field, "stored field is not a list, using an empty one");
            Vec::new()
        }
    }
}

/// Each preference falls back to its default on its own.
pub(crate) fn recover_prefs(value: Option<&Value>) -> Preferences {
    let defaults = Preferences::default();
    let Some(Value::Object(prefs)) = value else {
        return defaults;
    };

    let unit = prefs
        .get("unit")
        .and_then(|v| Unit::deserialize(v).ok())
        .unwrap_or(defaults.unit);
    let photo_max_px = prefs
        .get("photoMaxPx")
        .and_then(|v| u32::deserialize(v).ok())
        .filter(|px| *px > 0)
        .unwrap_or(defaults.photo_max_px);

    Preferences { unit, photo_max_px }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DEFAULT_PHOTO_MAX_PX;

    #[test]
    fn test_garbage_gives_defaults() {
        assert_eq!(recover_state("{not json"), AppState::default());
        assert_eq!(recover_state("[1, 2, 3]"), AppState::default());
        assert_eq!(recover_state("null"), AppState::default());
    }

    #[test]
    fn test_missing_photo_max_px_is_filled() {
        let raw = r#"{
            "entries": [{"id": "e1", "ts": 10, "text": "bench by the river"}],
            "trails": [{"id": "t1", "startedAt": 1, "endedAt": 2, "points": [], "distanceM": 0}],
            "prefs": {"unit": "imperial"}
        }"#;
        let state = recover_state(raw);
        assert_eq!(state.entries.len(), 1);
        assert_eq!(state.entries[0].text, "bench by the river");
        assert_eq!(state.trails.len(), 1);
        assert_eq!(state.trails[0].ended_at, Some(2));
        assert_eq!(state.prefs.unit, Unit::Imperial);
        assert_eq!(state.prefs.photo_max_px, DEFAULT_PHOTO_MAX_PX);
    }

    #[test]
    fn test_missing_fields_default_independently() {
        let state = recover_state(r#"{"trails": []}"#);
        assert!(state.entries.is_empty());
        assert_eq!(state.prefs, Preferences::default());
    }

    #[test]
    fn test_bad_prefs_values_fall_back() {
        let state = recover_state(r#"{"prefs": {"unit": "parsecs", "photoMaxPx": 0}}"#);
        assert_eq!(state.prefs, Preferences::default());

        let state = recover_state(r#"{"prefs": {"unit": "imperial", "photoMaxPx": "big"}}"#);
        assert_eq!(state.prefs.unit, Unit::Imperial);
        assert_eq!(state.prefs.photo_max_px, DEFAULT_PHOTO_MAX_PX);
    }

    #[test]
    fn test_malformed_items_are_skipped() {
        let raw = r#"{
            "entries": [{"id": "ok", "ts": 1, "text": "kept"}, {"id": 7}],
            "trails": "nope"
        }"#;
        let state = recover_state(raw);
        assert_eq!(state.entries.len(), 1);
        assert_eq!(state.entries[0].id, "ok");
        assert!(state.trails.is_empty());
    }
}
