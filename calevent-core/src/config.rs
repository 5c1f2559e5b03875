//! Global calevent configuration.

use std::path::{Path, PathBuf};

use config::{Config, File};
use serde::{Deserialize, Serialize};

use crate::error::{CalEventError, CalEventResult};

static DEFAULT_STORE_PATH: &str = "~/calendar/events.json";
static DEFAULT_USERS_PATH: &str = "~/calendar/users.toml";

fn default_store_path() -> PathBuf {
    PathBuf::from(DEFAULT_STORE_PATH)
}

fn default_users_path() -> PathBuf {
    PathBuf::from(DEFAULT_USERS_PATH)
}

/// Global configuration at ~/.config/calevent/config.toml
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CaleventConfig {
    /// JSON file holding calendars and events
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,

    /// TOML file holding the user directory used for organizer lookups
    #[serde(default = "default_users_path")]
    pub users_path: PathBuf,
}

impl Default for CaleventConfig {
    fn default() -> Self {
        CaleventConfig {
            store_path: default_store_path(),
            users_path: default_users_path(),
        }
    }
}

impl CaleventConfig {
    pub fn config_path() -> CalEventResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CalEventError::Config("Could not determine config directory".into()))?
            .join("calevent");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the global config, creating a commented default file first if
    /// there is none.
    pub fn load() -> CalEventResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> CalEventResult<Self> {
        Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .build()
            .map_err(|e| CalEventError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CalEventError::Config(e.to_string()))
    }

    /// Store path with `~` expanded.
    pub fn store_path(&self) -> PathBuf {
        expand(&self.store_path)
    }

    /// Users path with `~` expanded.
    pub fn users_path(&self) -> PathBuf {
        expand(&self.users_path)
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> CalEventResult<()> {
        let contents = format!(
            "\
# calevent configuration

# Where calendars and events are stored:
# store_path = \"{}\"

# User directory for organizer lookups:
# users_path = \"{}\"
",
            DEFAULT_STORE_PATH, DEFAULT_USERS_PATH
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CalEventError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| CalEventError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

fn expand(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}
