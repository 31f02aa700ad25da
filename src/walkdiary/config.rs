use crate::error::{DiaryError, Result};
use crate::geo::gpsd::{DEFAULT_GPSD_HOST, DEFAULT_GPSD_PORT};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";

/// Runtime configuration, stored in `<data dir>/config.json`.
///
/// User preferences (unit, photo size) are not here; they travel with the
/// diary state so that exports carry them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiaryConfig {
    /// Host of the gpsd daemon used for location samples
    #[serde(default = "default_gpsd_host")]
    pub gpsd_host: String,

    #[serde(default = "default_gpsd_port")]
    pub gpsd_port: u16,

    /// Where `export` writes its files (current directory when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,
}

fn default_gpsd_host() -> String {
    DEFAULT_GPSD_HOST.to_string()
}

fn default_gpsd_port() -> u16 {
    DEFAULT_GPSD_PORT
}

impl Default for DiaryConfig {
    fn default() -> Self {
        Self {
            gpsd_host: default_gpsd_host(),
            gpsd_port: default_gpsd_port(),
            export_dir: None,
        }
    }
}

impl DiaryConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(DiaryError::Io)?;
        let config: DiaryConfig =
            serde_json::from_str(&content).map_err(DiaryError::Serialization)?;
        Ok(config)
    }

    /// Export directory, falling back to `cwd`.
    pub fn export_dir_or(&self, cwd: &Path) -> PathBuf {
        self.export_dir
            .clone()
            .unwrap_or_else(|| cwd.to_path_buf())
    }
}
