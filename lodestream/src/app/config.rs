//! Application configuration.
//!
//! `AppConfig` combines everything needed to bootstrap the application:
//! which route to replay and where to serve it. It provides a unified
//! configuration surface so the CLI, the config file, and the defaults are
//! resolved in one place.

use crate::config::{ConfigFile, DEFAULT_HOST, DEFAULT_PORT};
use crate::generator::RouteFormat;

/// Top-level configuration passed to [`App::start`](super::App::start).
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Route source configuration.
    pub route: RouteConfig,

    /// Broadcast server configuration.
    pub server: ServerConfig,
}

/// Which route to load and how.
#[derive(Clone, Debug)]
pub struct RouteConfig {
    /// Route file format.
    pub format: RouteFormat,

    /// Generator construction arguments: the route file path plus any
    /// `key=value` overrides.
    pub args: Vec<String>,
}

impl RouteConfig {
    /// Describe a route by format and file path, with no overrides.
    pub fn new(format: RouteFormat, path: impl Into<String>) -> Self {
        Self {
            format,
            args: vec![path.into()],
        }
    }

    /// Append a `key=value` override argument.
    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }
}

/// Broadcast server settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to listen on.
    pub host: String,

    /// TCP port to listen on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    /// The bind address in `host:port` form.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl AppConfig {
    /// Create an application config with default server settings.
    pub fn new(route: RouteConfig) -> Self {
        Self {
            route,
            server: ServerConfig::default(),
        }
    }

    /// Create an application config from a loaded config file.
    ///
    /// Keeps the configuration translation logic in one place rather than
    /// scattered through CLI code.
    pub fn from_config_file(config: &ConfigFile, route: RouteConfig) -> Self {
        Self {
            route,
            server: ServerConfig {
                host: config.server.host.clone(),
                port: config.server.port,
            },
        }
    }

    /// Set the listen host.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.server.host = host.into();
        self
    }

    /// Set the listen port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.server.port = port;
        self
    }
}
