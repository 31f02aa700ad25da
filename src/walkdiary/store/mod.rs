//! # Storage Layer
//!
//! The whole application state is one record: a JSON serialization of
//! [`AppState`] kept under a single key, [`STATE_KEY`]. The raw key-value I/O
//! sits behind the [`StorageBackend`] trait so the rest of the crate never
//! cares where bytes land.
//!
//! ## Implementations
//!
//! - [`fs_backend::FsBackend`]: Production file-based storage
//!   - `<data dir>/walking-diary-state-v1.json`
//!   - Written to a temp file and renamed into place
//!
//! - [`mem_backend::MemBackend`]: In-memory storage for testing
//!   - No persistence
//!   - Can simulate read and write failures
//!
//! ## Contract
//!
//! [`PersistenceStore`] is tolerant in both directions:
//! - `load` never fails. A missing or unreadable record gives the defaults;
//!   a partial one is recovered field by field (see [`recover`]).
//! - `save` never fails either. Write errors are logged and the caller's
//!   in-memory state stays the source of truth for the session. Writes run
//!   off the async runtime's thread, so a save never stalls a recording.
//!
//! The portable export document is the same JSON, pretty-printed. Importing
//! checks more than `load` does: the document must be JSON and must carry
//! `entries`, `trails` and `prefs`, or nothing is replaced. Inside those
//! fields the same per-element and per-preference recovery as `load` applies,
//! so backups written by older versions still come in.

use crate::error::{DiaryError, Result};
use crate::model::AppState;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use tracing::{debug, error, warn};

pub mod backend;
pub mod fs_backend;
pub mod mem_backend;
pub mod recover;

pub use backend::StorageBackend;

pub const STATE_KEY: &str = "walking-diary-state-v1";

const REQUIRED_FIELDS: [&str; 3] = ["entries", "trails", "prefs"];

pub struct PersistenceStore<B: StorageBackend> {
    backend: B,
}

impl<B: StorageBackend> PersistenceStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn load(&self) -> AppState {
        match self.backend.read(STATE_KEY) {
            Ok(Some(raw)) => recover::recover_state(&raw),
            Ok(None) => {
                debug!("no stored state, starting from defaults");
                AppState::default()
            }
            Err(e) => {
                let e = DiaryError::StorageReadFailed(e.to_string());
                warn!(error = %e, "starting from defaults");
                AppState::default()
            }
        }
    }

    /// Persist the full state. Failures are logged, never raised.
    /// Returns whether the write went through.
    pub async fn save(&self, state: &AppState) -> bool {
        match self.try_save(state).await {
            Ok(()) => true,
            Err(e) => {
                error!(error = %e, "state was not saved");
                false
            }
        }
    }

    async fn try_save(&self, state: &AppState) -> Result<()> {
        let raw = serde_json::to_string(state)?;
        self.backend
            .write(STATE_KEY, raw)
            .await
            .map_err(|e| DiaryError::StorageWriteFailed(e.to_string()))
    }

    /// Forget the stored record entirely.
    pub async fn clear(&self) -> Result<()> {
        self.backend.remove(STATE_KEY).await
    }
}

/// Export file name for a given instant: `walking-diary-<ISO 8601>.json`.
pub fn export_filename(now: DateTime<Utc>) -> String {
    format!(
        "walking-diary-{}.json",
        now.to_rfc3339_opts(SecondsFormat::Millis, true)
    )
}

/// The portable export document.
pub fn export_document(state: &AppState) -> Result<String> {
    serde_json::to_string_pretty(state).map_err(DiaryError::Serialization)
}

/// Parse and validate an export document. The document must be a JSON
/// object carrying `entries`, `trails` and `prefs`; their contents are
/// recovered the way a stored record is.
pub fn import_document(raw: &str) -> Result<AppState> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| DiaryError::ImportValidationFailed(format!("not valid JSON: {}", e)))?;

    let Value::Object(map) = &value else {
        return Err(DiaryError::ImportValidationFailed(
            "expected a JSON object".to_string(),
        ));
    };
    let missing: Vec<&str> = REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| map.get(*field).map_or(true, Value::is_null))
        .collect();
    if !missing.is_empty() {
        return Err(DiaryError::ImportValidationFailed(format!(
            "missing {}",
            missing.join(", ")
        )));
    }

    for field in ["entries", "trails"] {
        if !map.get(field).is_some_and(Value::is_array) {
            return Err(DiaryError::ImportValidationFailed(format!(
                "{} is not a list",
                field
            )));
        }
    }
    if !map.get("prefs").is_some_and(Value::is_object) {
        return Err(DiaryError::ImportValidationFailed(
            "prefs is not an object".to_string(),
        ));
    }

    Ok(AppState {
        entries: recover::recover_list(map.get("entries"), "entries"),
        trails: recover::recover_list(map.get("trails"), "trails"),
        prefs: recover::recover_prefs(map.get("prefs")),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Entry, Location, Preferences, Trail, TrailPoint, Unit};
    use crate::store::fs_backend::FsBackend;
    use crate::store::mem_backend::MemBackend;
    use crate::test_utils::TestEnv;
    use chrono::TimeZone;

    fn sample_state() -> AppState {
        let mut trail = Trail::new(1_700_000_000_000);
        trail.push_point(TrailPoint {
            lat: 35.6586,
            lng: 139.7454,
            ts: 1_700_000_000_500,
        });
        trail.push_point(TrailPoint {
            lat: 35.6601,
            lng: 139.7499,
            ts: 1_700_000_020_500,
        });
        trail.finalize(1_700_000_040_000);

        AppState {
            entries: vec![
                Entry::new(
                    "cherry blossoms by the canal".into(),
                    None,
                    Some(Location {
                        lat: 35.69,
                        lng: 139.74,
                        acc: Some(12.5),
                    }),
                ),
                Entry::new("no fix here".into(), None, None),
            ],
            trails: vec![trail],
            prefs: Preferences {
                unit: Unit::Imperial,
                photo_max_px: 1024,
            },
        }
    }

    #[test]
    fn test_load_missing_record_gives_defaults() {
        let store = PersistenceStore::new(MemBackend::new());
        assert_eq!(store.load(), AppState::default());
    }

    #[test]
    fn test_load_corrupted_record_gives_defaults() {
        let store = PersistenceStore::new(MemBackend::with_value(STATE_KEY, "{\"entries\": ["));
        assert_eq!(store.load(), AppState::default());
    }

    #[test]
    fn test_load_read_error_gives_defaults() {
        let backend = MemBackend::new();
        backend.set_simulate_read_error(true);
        let store = PersistenceStore::new(backend);
        assert_eq!(store.load(), AppState::default());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let store = PersistenceStore::new(MemBackend::new());
        let state = sample_state();
        assert!(store.save(&state).await);
        assert_eq!(store.load(), state);
    }

    #[tokio::test]
    async fn test_save_to_disk_alongside_other_tasks() {
        let env = TestEnv::new();
        let store = PersistenceStore::new(FsBackend::new(env.root.clone()));
        let state = sample_state();

        let other = async {
            tokio::task::yield_now().await;
            true
        };
        let (saved, other_ran) = tokio::join!(store.save(&state), other);

        assert!(saved);
        assert!(other_ran);
        assert_eq!(store.load(), state);
        assert!(env.root.join(format!("{}.json", STATE_KEY)).exists());
    }

    #[tokio::test]
    async fn test_save_failure_is_swallowed() {
        let store = PersistenceStore::new(MemBackend::new());
        store.backend().set_simulate_write_error(true);
        assert!(!store.save(&sample_state()).await);
        assert!(store.backend().raw(STATE_KEY).is_none());
    }

    #[tokio::test]
    async fn test_clear_removes_record() {
        let store = PersistenceStore::new(MemBackend::new());
        store.save(&sample_state()).await;
        store.clear().await.unwrap();
        assert_eq!(store.load(), AppState::default());
    }

    #[test]
    fn test_export_import_round_trip() {
        let state = sample_state();
        let doc = export_document(&state).unwrap();
        assert!(doc.contains('\n'), "export should be pretty-printed");
        assert_eq!(import_document(&doc).unwrap(), state);
    }

    #[test]
    fn test_import_requires_every_field() {
        let err = import_document(r#"{"entries": [], "prefs": {"unit": "metric", "photoMaxPx": 800}}"#)
            .unwrap_err();
        match err {
            DiaryError::ImportValidationFailed(msg) => assert!(msg.contains("trails")),
            other => panic!("unexpected error: {:?}", other),
        }

        assert!(import_document(r#"{"entries": [], "trails": [], "prefs": null}"#).is_err());
        assert!(import_document("[]").is_err());
        assert!(import_document("not json").is_err());
    }

    #[test]
    fn test_import_fills_missing_preferences() {
        let state = import_document(r#"{"entries":[],"trails":[],"prefs":{"unit":"imperial"}}"#)
            .unwrap();
        assert_eq!(state.prefs.unit, Unit::Imperial);
        assert_eq!(state.prefs.photo_max_px, 800);

        let state = import_document(
            r#"{"entries":[{"id":"a","ts":1,"text":"x"}],"trails":[],"prefs":{"unit":"imperial","photoMaxPx":0}}"#,
        )
        .unwrap();
        assert_eq!(state.entries.len(), 1);
        assert_eq!(state.prefs.photo_max_px, 800);
    }

    #[test]
    fn test_import_skips_malformed_items() {
        let raw = r#"{"entries": [{"id": 1}, {"id": "ok", "ts": 2, "text": "kept"}], "trails": [], "prefs": {}}"#;
        let state = import_document(raw).unwrap();
        assert_eq!(state.entries.len(), 1);
        assert_eq!(state.entries[0].id, "ok");
        assert_eq!(state.prefs, Preferences::default());
    }

    #[test]
    fn test_import_rejects_wrong_field_types() {
        for raw in [
            r#"{"entries": "nope", "trails": [], "prefs": {}}"#,
            r#"{"entries": [], "trails": {}, "prefs": {}}"#,
            r#"{"entries": [], "trails": [], "prefs": "metric"}"#,
        ] {
            assert!(matches!(
                import_document(raw),
                Err(DiaryError::ImportValidationFailed(_))
            ));
        }
    }

    #[test]
    fn test_export_filename() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 5).unwrap();
        assert_eq!(
            export_filename(now),
            "walking-diary-2026-10-19T08:30:05.000Z.json"
        );
    }
}
