use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use bon::Builder;
use log::{LevelFilter, info, warn};
use serde::{Deserialize, Serialize};
use tabled::{
    Table, Tabled,
    settings::{Margin, Rotate, Style},
};

use crate::common::{print_header, project_config_dir};

const CONFIG_FILE_NAME: &str = "config.json";

#[derive(clap::Args)]
pub struct ConfigureArgs {
    /// Draw prompts with unicode symbols instead of ASCII
    #[arg(long)]
    unicode: Option<bool>,

    /// Colorize prompt output
    #[arg(long)]
    color: Option<bool>,

    /// Log level written to the log file (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
pub struct Config {
    /// Use unicode box-drawing symbols (default: true)
    #[serde(default = "default_true")]
    #[builder(default = true)]
    pub unicode: bool,
    /// Colorize output; `NO_COLOR` still wins (default: true)
    #[serde(default = "default_true")]
    #[builder(default = true)]
    pub color: bool,
    #[serde(default = "default_log_level")]
    #[builder(default = default_log_level(), into)]
    pub log_level: String,
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[derive(Tabled)]
struct ConfigDisplay<'a> {
    unicode: bool,
    color: bool,
    log_level: &'a str,
    config_file: String,
}

impl Config {
    pub(crate) fn load_existing(config_file: &Path) -> Result<Self> {
        let config_string = fs::read_to_string(config_file)
            .with_context(|| format!("Unable to read {}", config_file.display()))?;

        let config: Config = serde_json::from_str(&config_string)
            .context("Unable to deserialize configuration data")?;

        Ok(config)
    }

    /// Loads `config.json` from `config_dir`, falling back to defaults.
    pub fn load_from(config_dir: &Path) -> Result<Self> {
        let config_file = config_dir.join(CONFIG_FILE_NAME);

        if config_file.exists() {
            Config::load_existing(&config_file)
        } else {
            info!("no configuration at {}, using defaults", config_file.display());
            Ok(Config::default())
        }
    }

    pub fn load() -> Result<Self> {
        Config::load_from(&project_config_dir()?)
    }

    pub fn save_to(&self, config_dir: &Path) -> Result<PathBuf> {
        let config_string =
            serde_json::to_string_pretty(self).context("Unable to serialize configuration data")?;

        let config_file = config_dir.join(CONFIG_FILE_NAME);

        let mut fd = fs::OpenOptions::new()
            .write(true)
            .truncate(true)
            .create(true)
            .open(&config_file)
            .with_context(|| format!("Unable to write {}", config_file.display()))?;

        fd.write_all(config_string.as_bytes()).with_context(|| {
            format!("Failed to write configuration to {}", config_file.display())
        })?;

        Ok(config_file)
    }

    pub fn save(&self) -> Result<PathBuf> {
        self.save_to(&project_config_dir()?)
    }

    /// The configured log level; unknown names fall back to `Info`.
    #[must_use]
    pub fn level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or_else(|_| {
            warn!("unknown log level {:?}, using info", self.log_level);
            LevelFilter::Info
        })
    }
}

fn display_configuration(config: &Config, config_file: &Path) {
    let display = ConfigDisplay {
        unicode: config.unicode,
        color: config.color,
        log_level: &config.log_level,
        config_file: config_file.display().to_string(),
    };
    let mut table = Table::new([display]);
    table
        .with(Rotate::Left)
        .with(Style::modern())
        .with(Margin::new(4, 0, 0, 0));

    print_header();
    println!("{table}");
}

////////////////////////////////////////////////////////////////////////////////
// PUBLIC
////////////////////////////////////////////////////////////////////////////////

pub fn show_configuration() -> Result<()> {
    let config_dir = project_config_dir()?;
    let config = Config::load_from(&config_dir)?;

    display_configuration(&config, &config_dir.join(CONFIG_FILE_NAME));

    Ok(())
}

pub fn configure(args: &ConfigureArgs) -> Result<()> {
    let mut config = Config::load()?;

    // Update only the fields that were explicitly provided
    if let Some(unicode) = args.unicode {
        config.unicode = unicode;
    }
    if let Some(color) = args.color {
        config.color = color;
    }
    if let Some(log_level) = &args.log_level {
        log_level
            .parse::<LevelFilter>()
            .with_context(|| format!("Invalid log level: {log_level}"))?;
        config.log_level.clone_from(log_level);
    }

    let config_file = config.save()?;

    display_configuration(&config, &config_file);

    Ok(())
}
