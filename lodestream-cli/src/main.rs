//! Lodestream CLI - command-line interface
//!
//! This binary provides a command-line interface to the lodestream library.

mod commands;
mod error;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "lodestream",
    version = lodestream::VERSION,
    about = "Simulated GPS receiver: replays route files as NMEA 0183 over TCP"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a route file as NMEA sentence pairs over TCP
    Serve(commands::serve::ServeArgs),
    /// Decode a raw NMEA capture and print the recovered positions
    Inspect(commands::inspect::InspectArgs),
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve(args) => commands::serve::run(args),
        Commands::Inspect(args) => commands::inspect::run(args),
    };

    if let Err(err) = result {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
