//! Raw NMEA capture loader.
//!
//! Reads one sentence per line through the decoder. Captured files routinely
//! contain sentence types the codec does not model, so undecodable lines are
//! skipped with a logged warning instead of failing the load; only a file
//! with zero usable lines is rejected.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, warn};

use crate::nmea;
use crate::position::Position;

use super::{validate, GeneratorError};

/// Dwell applied to every decoded point; captures carry no duration.
const DEFAULT_DURATION_SECS: f64 = 1.0;

pub(crate) fn load(path: &Path) -> Result<Vec<Position>, GeneratorError> {
    let file = File::open(path).map_err(|source| GeneratorError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);

    let mut positions: Vec<Position> = Vec::new();
    let mut skipped = 0usize;

    for (lineno, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| GeneratorError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let sentence = line.trim();
        if sentence.is_empty() {
            continue;
        }

        match nmea::decode(sentence) {
            Ok(mut position) => {
                if let Err(reason) = validate(&position) {
                    warn!(line = lineno + 1, %reason, "skipping out-of-range sentence");
                    skipped += 1;
                    continue;
                }
                position.index = positions.len() as u32 + 1;
                position.duration = DEFAULT_DURATION_SECS;
                positions.push(position);
            }
            Err(err) => {
                warn!(line = lineno + 1, error = %err, "skipping undecodable line");
                skipped += 1;
            }
        }
    }

    if positions.is_empty() {
        return Err(GeneratorError::EmptyRoute {
            path: path.to_path_buf(),
        });
    }

    debug!(
        points = positions.len(),
        skipped,
        path = %path.display(),
        "loaded NMEA capture"
    );
    Ok(positions)
}
