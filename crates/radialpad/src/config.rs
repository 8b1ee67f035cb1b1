use std::{
    fs, io,
    path::{Path, PathBuf},
};

use log::{info, warn};
use radialpad_core::{
    dispatch,
    monitor::{Monitor, MonitorLayout, Rect},
};
use serde::{Deserialize, Serialize};

use crate::log::Level;

pub type Result<T> = std::result::Result<T, Error>;

pub const DIR_NAME: &str = "radialpad";
pub const FILE_NAME: &str = "radialpad.toml";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: Level,
    /// Flip both sticks' Y axes for controllers that report up as negative.
    pub invert_y: bool,
    pub dispatch: dispatch::Config,
    pub display: DisplayConfig,
}

/// Screen geometry handed to the coordinate mapper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Where the reference circle is drawn. Defaults to the primary monitor.
    pub reference_window: Option<Rect>,
    pub monitors: MonitorLayout,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            reference_window: None,
            monitors: MonitorLayout::new([Monitor::new(Rect::new(0, 0, 1920, 1080), true)]),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] io::Error),
    #[error("parse: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("serialize: {0}")]
    Serialize(#[from] toml::ser::Error),
}

pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(DIR_NAME).join(FILE_NAME))
}

/// Reads the config at `path`, writing the defaults there first if no file
/// exists. An unreadable file yields the defaults.
pub fn load_or_create(path: impl AsRef<Path>) -> Config {
    let path = path.as_ref();

    if path.exists() {
        match load(path) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("Failed to load config file, using defaults: {}", e);
                Config::default()
            }
        }
    } else {
        let config = Config::default();
        match write(&config, path) {
            Ok(()) => info!("Wrote default config to {}", path.display()),
            Err(e) => warn!("Failed to write default config: {}", e),
        }
        config
    }
}

pub fn load(path: impl AsRef<Path>) -> Result<Config> {
    let s = fs::read_to_string(path)?;
    Ok(toml::from_str(&s)?)
}

pub fn write(config: &Config, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, toml::to_string(config)?)?;
    Ok(())
}
