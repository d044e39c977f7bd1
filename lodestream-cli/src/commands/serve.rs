//! Serve command - replay a route file over TCP.

use std::path::PathBuf;

use clap::Args;
use tokio_util::sync::CancellationToken;
use tracing::info;

use lodestream::app::{App, AppConfig, RouteConfig};
use lodestream::config::ConfigFile;
use lodestream::generator::RouteFormat;
use lodestream::logging;

use crate::error::CliError;

/// Arguments for the serve command.
#[derive(Args)]
pub struct ServeArgs {
    /// Route file format
    #[arg(long, value_parser = parse_format)]
    pub format: RouteFormat,

    /// Route file path
    pub route: PathBuf,

    /// Force every point's dwell duration, in seconds
    #[arg(long)]
    pub duration: Option<f64>,

    /// Renumber points contiguously from this start index
    #[arg(long)]
    pub index: Option<u32>,

    /// Interface to listen on (overrides the config file)
    #[arg(long)]
    pub host: Option<String>,

    /// TCP port to listen on (overrides the config file)
    #[arg(long, short)]
    pub port: Option<u16>,

    /// Config file path (defaults to the per-user location)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

fn parse_format(s: &str) -> Result<RouteFormat, String> {
    s.parse().map_err(|e| {
        format!(
            "{e} (expected one of: {})",
            RouteFormat::ALL.map(|f| f.name()).join(", ")
        )
    })
}

/// Run the serve command.
pub fn run(args: ServeArgs) -> Result<(), CliError> {
    let _guard = logging::init_logging(logging::default_log_dir(), logging::default_log_file())
        .map_err(CliError::Logging)?;

    let config_file = ConfigFile::load_or_default(args.config.as_deref())?;

    // Resolve settings: CLI > config file > defaults
    let mut route = RouteConfig::new(args.format, args.route.to_string_lossy());
    if let Some(duration) = args.duration {
        route = route.with_arg(format!("duration={duration}"));
    }
    if let Some(index) = args.index {
        route = route.with_arg(format!("index={index}"));
    }

    let mut config = AppConfig::from_config_file(&config_file, route);
    if let Some(host) = args.host {
        config = config.with_host(host);
    }
    if let Some(port) = args.port {
        config = config.with_port(port);
    }

    println!("Lodestream v{}", lodestream::VERSION);
    println!();
    println!("Route:  {} ({})", args.route.display(), args.format);
    println!("Listen: {}", config.server.addr());
    println!();

    // Graceful shutdown on Ctrl-C
    let shutdown = CancellationToken::new();
    let handler_token = shutdown.clone();
    ctrlc::set_handler(move || {
        println!();
        println!("Received shutdown signal, stopping...");
        handler_token.cancel();
    })
    .map_err(CliError::SignalHandler)?;

    let runtime = tokio::runtime::Runtime::new().map_err(CliError::RuntimeCreation)?;
    runtime.block_on(async move {
        let mut app = App::start(config).await?;
        println!("Serving NMEA sentence pairs on {}", app.local_addr());
        println!("Press Ctrl+C to stop");

        tokio::select! {
            published = app.wait_route() => {
                info!(published, "route complete");
                println!("Route complete: {published} positions published.");
            }
            _ = shutdown.cancelled() => {}
        }

        app.stop().await;
        Ok::<(), CliError>(())
    })?;

    println!("Stopped.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_format_known_names() {
        assert_eq!(parse_format("csv").unwrap(), RouteFormat::Csv);
        assert_eq!(parse_format("geojson").unwrap(), RouteFormat::GeoJson);
        assert_eq!(parse_format("nmea").unwrap(), RouteFormat::Nmea);
    }

    #[test]
    fn test_parse_format_lists_alternatives_on_error() {
        let message = parse_format("kml").unwrap_err();
        assert!(message.contains("csv, geojson, nmea"));
    }
}
