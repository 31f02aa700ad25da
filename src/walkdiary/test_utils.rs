use crate::api::DiaryApi;
use crate::error::{DiaryError, Result};
use crate::geo::sampler::{GeoSampler, Position, PositionSource, SampleOptions};
use crate::notify::MessageLog;
use crate::store::fs_backend::FsBackend;
use crate::store::mem_backend::MemBackend;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Answers position requests from a fixed script, in order. Once the script
/// runs out every request fails.
pub struct ScriptedSource {
    script: Mutex<VecDeque<Result<Position>>>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(script: Vec<Result<Position>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PositionSource for ScriptedSource {
    async fn current_position(&self, _options: &SampleOptions) -> Result<Position> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Err(DiaryError::GeolocationFailed("script exhausted".into())))
    }
}

pub fn sampler_with_script(
    script: Vec<Result<Position>>,
) -> (GeoSampler, Arc<ScriptedSource>, Arc<MessageLog>) {
    let source = Arc::new(ScriptedSource::new(script));
    let log = Arc::new(MessageLog::new());
    let sampler = GeoSampler::new(source.clone(), log.clone());
    (sampler, source, log)
}

pub fn mem_api() -> DiaryApi<MemBackend> {
    DiaryApi::load(MemBackend::new())
}

pub struct TestEnv {
    // We keep _temp_dir to ensure the directory is not dropped until the test is done
    pub _temp_dir: TempDir,
    pub backend: FsBackend,
    pub root: PathBuf,
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
        let root = temp_dir.path().to_path_buf();
        let backend = FsBackend::new(root.clone());
        Self {
            _temp_dir: temp_dir,
            backend,
            root,
        }
    }
}
