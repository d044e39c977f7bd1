//! Application error types.

use std::fmt;

use crate::broadcast::BroadcastError;
use crate::config::ConfigError;
use crate::generator::GeneratorError;

/// Errors that can occur during application lifecycle.
#[derive(Debug)]
pub enum AppError {
    /// Failed to construct the route generator.
    RouteCreation(GeneratorError),

    /// Failed to start the broadcast server.
    ServerStart(BroadcastError),

    /// Configuration error.
    Config(ConfigError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::RouteCreation(e) => {
                write!(f, "Failed to construct route generator: {}", e)
            }
            AppError::ServerStart(e) => {
                write!(f, "Failed to start broadcast server: {}", e)
            }
            AppError::Config(e) => {
                write!(f, "Configuration error: {}", e)
            }
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::RouteCreation(e) => Some(e),
            AppError::ServerStart(e) => Some(e),
            AppError::Config(e) => Some(e),
        }
    }
}

impl From<GeneratorError> for AppError {
    fn from(e: GeneratorError) -> Self {
        AppError::RouteCreation(e)
    }
}

impl From<BroadcastError> for AppError {
    fn from(e: BroadcastError) -> Self {
        AppError::ServerStart(e)
    }
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::Config(e)
    }
}
