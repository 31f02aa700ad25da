//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single
//! entry point for every diary operation, whatever the UI.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Owns the state**: the one [`AppState`] of the session lives here, next
//!   to the store it is loaded from and the recorder of the active trail
//! - **Dispatches** to the appropriate command function
//! - **Persists** after every command that reports a state change
//! - **Returns structured types** (`CmdResult`)
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: That belongs in `commands/*.rs` and `recorder.rs`
//! - **Presentation concerns**: No stdout, no formatting
//!
//! ## Generic Over StorageBackend
//!
//! `DiaryApi<B: StorageBackend>` is generic over where the record lands:
//! - Production: `DiaryApi<FsBackend>`
//! - Testing: `DiaryApi<MemBackend>`
//!
//! ## Recording
//!
//! A recording spans many calls. The caller starts it, then loops on
//! [`DiaryApi::next_sample`] / [`DiaryApi::apply_sample`] until it decides to
//! stop. The active trail is held by the recorder and only reaches the
//! persisted state once it is stopped.

use crate::commands;
use crate::error::{DiaryError, Result};
use crate::geo::sampler::NoSource;
use crate::geo::GeoSampler;
use crate::model::{AppState, Trail};
use crate::notify::Silent;
use crate::recorder::{Sample, TrailRecorder};
use crate::store::{PersistenceStore, StorageBackend};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

pub struct DiaryApi<B: StorageBackend> {
    store: PersistenceStore<B>,
    state: AppState,
    sampler: GeoSampler,
    recorder: TrailRecorder,
}

impl<B: StorageBackend> DiaryApi<B> {
    /// Load the stored state. Starts without a position source; use
    /// [`DiaryApi::with_sampler`] to attach one.
    pub fn load(backend: B) -> Self {
        let store = PersistenceStore::new(backend);
        let state = store.load();
        debug!(
            entries = state.entries.len(),
            trails = state.trails.len(),
            "state loaded"
        );
        Self {
            store,
            state,
            sampler: GeoSampler::new(Arc::new(NoSource), Arc::new(Silent)),
            recorder: TrailRecorder::new(),
        }
    }

    pub fn with_sampler(mut self, sampler: GeoSampler) -> Self {
        self.sampler = sampler;
        self
    }

    pub fn with_recorder(mut self, recorder: TrailRecorder) -> Self {
        self.recorder = recorder;
        self
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn store(&self) -> &PersistenceStore<B> {
        &self.store
    }

    async fn persist(&self, result: CmdResult) -> CmdResult {
        if result.state_changed {
            self.store.save(&self.state).await;
        }
        result
    }

    pub async fn add_entry(&mut self, draft: commands::note::NoteDraft) -> CmdResult {
        let result = commands::note::run(&mut self.state, &self.sampler, draft).await;
        self.persist(result).await
    }

    pub fn list_entries(&self) -> CmdResult {
        commands::list::entries(&self.state)
    }

    pub fn list_trails(&self) -> CmdResult {
        commands::list::trails(&self.state)
    }

    pub async fn start_trail(&mut self) -> Result<CmdResult> {
        let trail = self.recorder.start(&self.sampler).await?;
        Ok(commands::trail::started(trail))
    }

    pub fn is_recording(&self) -> bool {
        self.recorder.is_recording()
    }

    pub fn active_trail(&self) -> Option<&Trail> {
        self.recorder.active_trail()
    }

    /// Wait for the next sample of the active recording. `None` when idle.
    pub async fn next_sample(&mut self) -> Option<Sample> {
        self.recorder.next_sample().await
    }

    pub fn apply_sample(&mut self, sample: Sample) -> bool {
        self.recorder.apply(sample)
    }

    pub async fn stop_trail(&mut self) -> Result<CmdResult> {
        let trail = self
            .recorder
            .stop()
            .ok_or_else(|| DiaryError::Api("No trail is being recorded".into()))?;
        let result = commands::trail::finish(&mut self.state, trail);
        Ok(self.persist(result).await)
    }

    pub fn export(&self, dir: &Path) -> Result<CmdResult> {
        commands::export::run(&self.state, dir)
    }

    pub async fn import(&mut self, raw: &str) -> CmdResult {
        let result = commands::import::run(&mut self.state, raw);
        self.persist(result).await
    }

    pub async fn import_file(&mut self, path: &Path) -> CmdResult {
        let result = commands::import::run_file(&mut self.state, path);
        self.persist(result).await
    }

    pub async fn prefs(&mut self, action: PrefsAction) -> CmdResult {
        let result = commands::prefs::run(&mut self.state, action);
        self.persist(result).await
    }

    pub fn nudge(&self) -> CmdResult {
        commands::nudge::run(&mut rand::thread_rng())
    }

    /// Clear everything. An active recording is abandoned first.
    pub async fn reset(&mut self) -> Result<CmdResult> {
        self.recorder.abandon();
        commands::reset::run(&mut self.state, &self.store).await
    }
}

pub use crate::commands::note::NoteDraft;
pub use crate::commands::prefs::PrefsAction;
pub use crate::commands::{CmdMessage, CmdResult, MessageLevel};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::trail::MSG_TOO_SHORT;
    use crate::geo::Position;
    use crate::model::Unit;
    use crate::store::mem_backend::MemBackend;
    use crate::store::STATE_KEY;
    use crate::test_utils::{mem_api, sampler_with_script};
    use std::time::Duration;

    fn pos(lat: f64, lng: f64) -> Position {
        Position {
            lat,
            lng,
            acc: Some(4.0),
        }
    }

    fn reload(api: &DiaryApi<MemBackend>) -> AppState {
        api.store().load()
    }

    #[tokio::test]
    async fn test_add_entry_persists() {
        let mut api = mem_api();
        let res = api.add_entry(NoteDraft::text("moss on the wall")).await;

        assert!(res.state_changed);
        let stored = reload(&api);
        assert_eq!(stored.entries.len(), 1);
        assert_eq!(stored.entries[0].text, "moss on the wall");
        // No position source attached.
        assert!(stored.entries[0].loc.is_none());
    }

    #[test]
    fn test_load_existing_record() {
        let raw = r#"{"entries":[{"id":"a","ts":1,"text":"old"}],"trails":[],"prefs":{"unit":"imperial"}}"#;
        let api = DiaryApi::load(MemBackend::with_value(STATE_KEY, raw));

        assert_eq!(api.state().entries.len(), 1);
        assert_eq!(api.state().prefs.unit, Unit::Imperial);
        assert_eq!(api.state().prefs.photo_max_px, 800);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_before_first_tick_saves_short_trail() {
        let (sampler, _source, _log) = sampler_with_script(vec![Ok(pos(35.0, 139.0))]);
        let mut api = mem_api().with_sampler(sampler);

        let started = api.start_trail().await.unwrap();
        assert!(started.contains_message(commands::trail::MSG_STARTED));
        assert!(api.is_recording());
        assert!(reload(&api).trails.is_empty());

        let res = api.stop_trail().await.unwrap();

        assert!(res.contains_message(MSG_TOO_SHORT));
        let stored = reload(&api);
        assert_eq!(stored.trails.len(), 1);
        assert_eq!(stored.trails[0].points.len(), 1);
        assert_eq!(stored.trails[0].distance_m, Some(0.0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_recording_loop_appends_samples() {
        let (sampler, _source, _log) = sampler_with_script(vec![
            Ok(pos(35.0, 139.0)),
            Ok(pos(35.001, 139.0)),
            Ok(pos(35.002, 139.0)),
        ]);
        let mut api = mem_api()
            .with_sampler(sampler)
            .with_recorder(TrailRecorder::with_period(Duration::from_secs(20)));

        api.start_trail().await.unwrap();
        for _ in 0..2 {
            let sample = api.next_sample().await.unwrap();
            assert!(api.apply_sample(sample));
        }
        assert_eq!(api.active_trail().unwrap().points.len(), 3);

        let res = api.stop_trail().await.unwrap();
        assert!(!res.contains_message(MSG_TOO_SHORT));
        assert_eq!(reload(&api).trails[0].points.len(), 3);
    }

    #[tokio::test]
    async fn test_stop_when_idle_is_an_error() {
        let mut api = mem_api();
        assert!(api.stop_trail().await.is_err());
    }

    #[tokio::test]
    async fn test_import_missing_trails_leaves_state_unchanged() {
        let mut api = mem_api();
        api.add_entry(NoteDraft::text("keep")).await;
        let before = api.state().clone();

        let res = api
            .import(r#"{"entries":[],"prefs":{"unit":"metric","photoMaxPx":800}}"#)
            .await;

        assert!(res.has_errors());
        assert_eq!(api.state(), &before);
        assert_eq!(reload(&api), before);
    }

    #[tokio::test]
    async fn test_import_backup_without_photo_size() {
        let mut api = mem_api();
        let res = api
            .import(r#"{"entries":[{"id":"a","ts":1,"text":"x"}],"trails":[],"prefs":{"unit":"imperial"}}"#)
            .await;

        assert!(!res.has_errors());
        let stored = reload(&api);
        assert_eq!(stored.entries.len(), 1);
        assert_eq!(stored.prefs.unit, Unit::Imperial);
        assert_eq!(stored.prefs.photo_max_px, 800);
    }

    #[tokio::test]
    async fn test_write_failure_keeps_memory_state() {
        let backend = MemBackend::new();
        backend.set_simulate_write_error(true);
        let mut api = DiaryApi::load(backend);

        let res = api
            .prefs(PrefsAction::Set("unit".into(), "imperial".into()))
            .await;

        assert!(!res.has_errors());
        assert_eq!(api.state().prefs.unit, Unit::Imperial);
        assert!(api.store().backend().raw(STATE_KEY).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_abandons_recording() {
        let (sampler, _source, _log) = sampler_with_script(vec![Ok(pos(35.0, 139.0))]);
        let mut api = mem_api().with_sampler(sampler);
        api.start_trail().await.unwrap();

        api.reset().await.unwrap();

        assert!(!api.is_recording());
        assert_eq!(api.state(), &AppState::default());
    }

    #[test]
    fn test_nudge() {
        let res = mem_api().nudge();
        assert_eq!(res.messages.len(), 1);
    }
}
