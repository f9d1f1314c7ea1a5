//! `log` sink writing one line per record to the configured file. Warnings
//! and errors also go to stderr, since stdout belongs to the prompt.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use log::{Level, LevelFilter, Log, Metadata, Record};

use crate::config::AppConfig;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Installs a [`FileLogger`] for `config.log_file` at `config.log_level`.
/// Without a log file nothing is installed and the facade stays silent.
pub fn init(config: &AppConfig) -> Result<()> {
    let Some(path) = &config.log_file else {
        return Ok(());
    };
    let logger = FileLogger::open(path, config.log_level)?;
    log::set_boxed_logger(Box::new(logger)).context("a logger is already installed")?;
    log::set_max_level(config.log_level);
    Ok(())
}

pub struct FileLogger {
    file: Mutex<File>,
    level: LevelFilter,
}

impl FileLogger {
    /// Opens `path` for appending, creating missing directories first.
    pub fn open(path: &Path, level: LevelFilter) -> Result<Self> {
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed creating log directory {}", dir.display()))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("failed opening log file {}", path.display()))?;
        Ok(Self {
            file: Mutex::new(file),
            level,
        })
    }
}

fn format_line(record: &Record, now: DateTime<Local>) -> String {
    format!(
        "[{}] {:<5} [{}:{}] {}\n",
        now.format(TIMESTAMP_FORMAT),
        record.level().as_str(),
        record.module_path().unwrap_or("?"),
        record.line().unwrap_or(0),
        record.args()
    )
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(record, Local::now());
        if let Ok(mut file) = self.file.lock() {
            let _ = file.write_all(line.as_bytes());
        }
        if record.level() <= Level::Warn {
            eprintln!("{}", record.args());
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}
