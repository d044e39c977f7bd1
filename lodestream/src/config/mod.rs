//! Configuration file support.
//!
//! Lodestream reads an optional INI file for settings that outlive a single
//! invocation:
//!
//! ```ini
//! [server]
//! host = 0.0.0.0
//! port = 10110
//! ```
//!
//! CLI flags always take precedence over the file; the file takes precedence
//! over the built-in defaults.

use std::path::{Path, PathBuf};

use ini::Ini;

/// Default listen host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default listen port - the conventional NMEA-0183-over-TCP port.
pub const DEFAULT_PORT: u16 = 10110;

/// Errors that can occur while loading a config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read or parsed as INI.
    #[error("failed to load config file {}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: ini::Error,
    },

    /// A setting holds a value of the wrong shape.
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

/// Parsed configuration file contents.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfigFile {
    pub server: ServerSection,
}

/// `[server]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSection {
    /// Interface to listen on.
    pub host: String,
    /// TCP port to listen on.
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ConfigFile {
    /// The per-user default config location
    /// (e.g. `~/.config/lodestream/config.ini`).
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("lodestream").join("config.ini"))
    }

    /// Load settings from an INI file. Missing sections and keys fall back
    /// to the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_file(path).map_err(|source| ConfigError::Load {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config = ConfigFile::default();
        if let Some(section) = ini.section(Some("server")) {
            if let Some(host) = section.get("host") {
                config.server.host = host.to_string();
            }
            if let Some(port) = section.get("port") {
                config.server.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                    key: "server.port",
                    value: port.to_string(),
                })?;
            }
        }
        Ok(config)
    }

    /// Load an explicit path, or the default location if it exists, or the
    /// built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load(&path),
                _ => Ok(Self::default()),
            },
        }
    }
}
