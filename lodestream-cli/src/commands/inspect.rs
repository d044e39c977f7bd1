//! Inspect command - decode a raw NMEA capture and print the track.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use clap::Args;

use lodestream::nmea;

use crate::error::CliError;

/// Arguments for the inspect command.
#[derive(Args)]
pub struct InspectArgs {
    /// NMEA capture file, one sentence per line
    pub file: PathBuf,

    /// Also print the lines that failed to decode
    #[arg(long)]
    pub show_skipped: bool,
}

/// Run the inspect command.
pub fn run(args: InspectArgs) -> Result<(), CliError> {
    let open_error = |source| CliError::Io {
        path: args.file.display().to_string(),
        source,
    };
    let file = File::open(&args.file).map_err(open_error)?;
    let reader = BufReader::new(file);

    println!("{:>5}  {:>11}  {:>12}  {:>10}  {:>9}  time (UTC)", "#", "lat", "lon", "km/h", "elev m");

    let mut decoded = 0usize;
    let mut skipped = 0usize;
    for (lineno, line) in reader.lines().enumerate() {
        let line = line.map_err(open_error)?;
        let sentence = line.trim();
        if sentence.is_empty() {
            continue;
        }

        match nmea::decode(sentence) {
            Ok(position) => {
                decoded += 1;
                println!(
                    "{:>5}  {:>11.6}  {:>12.6}  {:>10.1}  {:>9.1}  {}",
                    decoded,
                    position.lat,
                    position.lon,
                    position.speed,
                    position.elevation,
                    position.time.format("%H:%M:%S%.3f"),
                );
            }
            Err(err) => {
                skipped += 1;
                if args.show_skipped {
                    eprintln!("line {}: {} ({})", lineno + 1, err, sentence);
                }
            }
        }
    }

    println!();
    println!("{decoded} positions decoded, {skipped} lines skipped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_run_tolerates_undecodable_lines() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            b"$GPRMC,120000,A,5956.058000,N,03020.106000,E,5.4,0.0,010624,,,A\n\
              $GPXXX,not,a,position*00\n",
        )
        .unwrap();
        file.flush().unwrap();

        let args = InspectArgs {
            file: file.path().to_path_buf(),
            show_skipped: false,
        };
        assert!(run(args).is_ok());
    }

    #[test]
    fn test_run_fails_on_missing_file() {
        let args = InspectArgs {
            file: "/nonexistent/capture.nmea".into(),
            show_skipped: false,
        };
        assert!(matches!(run(args), Err(CliError::Io { .. })));
    }
}
