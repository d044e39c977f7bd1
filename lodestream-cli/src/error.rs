//! CLI error types.

use lodestream::app::AppError;
use lodestream::config::ConfigError;

/// Errors surfaced to the terminal user.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    App(#[from] AppError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to initialize logging: {0}")]
    Logging(std::io::Error),

    #[error("failed to create async runtime: {0}")]
    RuntimeCreation(std::io::Error),

    #[error("failed to install signal handler: {0}")]
    SignalHandler(ctrlc::Error),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
