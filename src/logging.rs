use std::{
    fs,
    path::{Path, PathBuf},
};

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

use anyhow::{Context, Result};
use env_logger::Target;
use log::LevelFilter;

use crate::common::project_data_dir;

/// `env_logger` setup for the binary.
///
/// Prompts own stdout, so a log file is the normal target; without one the
/// logger writes to stderr.
pub struct Logging {
    file_name: Option<PathBuf>,
    level: LevelFilter,
}

impl Default for Logging {
    fn default() -> Self {
        Self::new()
    }
}

impl Logging {
    #[must_use]
    pub fn new() -> Self {
        Self {
            file_name: None,
            level: LevelFilter::Info,
        }
    }

    /// Log to `file_name` inside the project data directory.
    #[must_use]
    pub fn with_file<P>(mut self, file_name: P) -> Self
    where
        P: Into<PathBuf>,
    {
        self.file_name = Some(file_name.into());
        self
    }

    #[must_use]
    pub fn with_level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    /// Shorthand for `Debug` level.
    #[must_use]
    pub fn with_debug_mode(self, enable: bool) -> Self {
        if enable {
            self.with_level(LevelFilter::Debug)
        } else {
            self
        }
    }

    pub fn start(&self) -> Result<()> {
        let mut b = env_logger::builder();
        b.filter_level(self.level);

        if let Some(file_name) = &self.file_name {
            let log_file = log_file_path(&project_data_dir()?, file_name);
            let fd = open_log_file(&log_file)?;
            b.target(Target::Pipe(Box::new(fd)));
        }

        b.try_init().context("Logger already initialized")?;

        Ok(())
    }
}

fn log_file_path(data_dir: &Path, file_name: &Path) -> PathBuf {
    data_dir.join(file_name)
}

/// Truncates any previous log. Owner read/write only on Unix.
fn open_log_file(log_file: &Path) -> Result<fs::File> {
    let mut options = fs::OpenOptions::new();
    options.create(true).write(true).truncate(true);

    #[cfg(unix)]
    options.mode(0o600);

    options
        .open(log_file)
        .with_context(|| format!("Unable to open {} for writing", log_file.display()))
}
