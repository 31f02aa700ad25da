use crate::api::DiaryApi;
use crate::config::DiaryConfig;
use crate::error::{DiaryError, Result};
use crate::store::fs_backend::FsBackend;
use directories::ProjectDirs;
use std::env;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Overrides the platform data directory.
pub const HOME_ENV: &str = "WALKDIARY_HOME";

pub struct DiaryContext {
    pub api: DiaryApi<FsBackend>,
    pub config: DiaryConfig,
    pub data_dir: PathBuf,
}

/// `$WALKDIARY_HOME` when set and non-empty, the platform data directory otherwise.
pub fn data_dir() -> Result<PathBuf> {
    resolve_data_dir(env::var_os(HOME_ENV).map(PathBuf::from))
}

fn resolve_data_dir(override_dir: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = override_dir.filter(|d| !d.as_os_str().is_empty()) {
        return Ok(dir);
    }
    ProjectDirs::from("com", "walkdiary", "walkdiary")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| DiaryError::Api("Could not determine the data directory".into()))
}

/// Load config and state from `data_dir`. The returned API has no position
/// source yet; the caller attaches one that matches its environment.
pub fn initialize(data_dir: &Path) -> DiaryContext {
    let config = DiaryConfig::load(data_dir).unwrap_or_else(|e| {
        warn!(error = %e, "ignoring unreadable config.json");
        DiaryConfig::default()
    });
    let api = DiaryApi::load(FsBackend::new(data_dir.to_path_buf()));

    DiaryContext {
        api,
        config,
        data_dir: data_dir.to_path_buf(),
    }
}
