use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use log::{LevelFilter, debug, info, trace};
use serde::Deserialize;

const DEFAULT_DATA_FILE: &str = "data/falcon.txt";
const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_file: PathBuf,
    pub log_file: Option<PathBuf>,
    pub log_level: LevelFilter,
}

/// Values given on the command line; they beat every other source.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub data_file: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub log_level: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    data_file: Option<String>,
    log_file: Option<String>,
    log_level: Option<String>,
}

impl AppConfig {
    pub fn load(overrides: Overrides) -> Result<Self> {
        trace!("Reading file config");
        let file_cfg = match config_file_path() {
            Some(path) => read_file_config(&path)?,
            None => {
                debug!("No config directory on this platform, using defaults");
                FileConfig::default()
            }
        };
        let config = Self::from_sources(overrides, file_cfg, env_value)?;
        info!("Data file: {}", config.data_file.display());
        Ok(config)
    }

    fn from_sources(
        overrides: Overrides,
        file_cfg: FileConfig,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let data_file = overrides
            .data_file
            .or_else(|| env("FALCON_DATA_FILE").map(PathBuf::from))
            .or_else(|| file_cfg.data_file.map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE));

        let log_file = overrides
            .log_file
            .or_else(|| env("FALCON_LOG_FILE").map(PathBuf::from))
            .or_else(|| file_cfg.log_file.map(PathBuf::from))
            .or_else(default_log_file);

        let log_level = match overrides
            .log_level
            .or_else(|| env("FALCON_LOG_LEVEL"))
            .or(file_cfg.log_level)
        {
            Some(raw) => LevelFilter::from_str(raw.trim()).map_err(|_| {
                anyhow!("unknown log level '{raw}' (try error, warn, info, debug or trace)")
            })?,
            None => DEFAULT_LOG_LEVEL,
        };

        Ok(Self {
            data_file,
            log_file,
            log_level,
        })
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig> {
    if !path.exists() {
        debug!(
            "Config file does not exist: {}, using defaults",
            path.display()
        );
        return Ok(FileConfig::default());
    }

    info!("Reading config file: {}", path.display());
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed reading config file {}", path.display()))?;
    toml::from_str(&data).with_context(|| {
        format!(
            "invalid TOML in {} (make sure string values are quoted)",
            path.display()
        )
    })
}

fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("falcon").join("config.toml"))
}

fn default_log_file() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join("falcon").join("falcon.log"))
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
