//! CSV route loader.
//!
//! Expected column order:
//!
//! ```text
//! point_number,latitude,longitude,speed,elevation[,duration,transition,description]
//! ```
//!
//! Lines starting with `#` and blank lines are skipped. Points are numbered
//! sequentially from 1 in file order; the first column is carried by the
//! file for the operator's benefit but the loader does not trust it.

use std::fs::File;
use std::path::Path;

use chrono::{DateTime, Utc};
use csv::{ReaderBuilder, StringRecord};

use crate::position::Position;

use super::{validate, GeneratorError};

pub(crate) fn load(path: &Path) -> Result<Vec<Position>, GeneratorError> {
    let file = File::open(path).map_err(|source| GeneratorError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .from_reader(file);

    let invalid = |reason: String| GeneratorError::InvalidRoute {
        path: path.to_path_buf(),
        reason,
    };

    let mut positions = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(|e| invalid(e.to_string()))?;
        if record.len() < 5 {
            return Err(invalid(format!(
                "row {} has {} columns, need at least 5",
                row + 1,
                record.len()
            )));
        }

        let index = positions.len() as u32 + 1;
        let position = parse_row(&record, index).map_err(|reason| {
            invalid(format!("row {}: {}", row + 1, reason))
        })?;
        validate(&position).map_err(|reason| invalid(format!("row {}: {}", row + 1, reason)))?;
        positions.push(position);
    }

    if positions.is_empty() {
        return Err(GeneratorError::EmptyRoute {
            path: path.to_path_buf(),
        });
    }
    Ok(positions)
}

fn parse_row(record: &StringRecord, index: u32) -> Result<Position, String> {
    let number = |column: usize, name: &str| -> Result<f64, String> {
        record[column]
            .parse()
            .map_err(|_| format!("bad {name} {:?}", &record[column]))
    };

    let lat = number(1, "latitude")?;
    let lon = number(2, "longitude")?;
    let speed = number(3, "speed")?;
    let elevation = number(4, "elevation")?;

    let duration = match record.get(5) {
        Some(field) if !field.is_empty() => field
            .parse()
            .map_err(|_| format!("bad duration {field:?}"))?,
        _ => 0.0,
    };
    let transition = match record.get(6) {
        Some(field) if !field.is_empty() => field
            .parse()
            .map_err(|_| format!("bad transition {field:?}"))?,
        _ => Default::default(),
    };
    let description = record.get(7).unwrap_or("").to_string();

    // Placeholder time - the generator stamps the real one on emission
    Ok(
        Position::new(index, lat, lon, speed, elevation, DateTime::<Utc>::UNIX_EPOCH)
            .with_duration(duration)
            .with_transition(transition)
            .with_description(description),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Transition;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn route_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_full_row() {
        let file = route_file("1,59.9343,30.3351,10.0,5.5,2.0,manual,\"Start\"\n");
        let positions = load(file.path()).unwrap();

        assert_eq!(positions.len(), 1);
        let p = &positions[0];
        assert_eq!(p.index, 1);
        assert_eq!(p.lat, 59.9343);
        assert_eq!(p.lon, 30.3351);
        assert_eq!(p.speed, 10.0);
        assert_eq!(p.elevation, 5.5);
        assert_eq!(p.duration, 2.0);
        assert_eq!(p.transition, Transition::Manual);
        assert_eq!(p.description, "Start");
    }

    #[test]
    fn test_load_minimal_row_uses_defaults() {
        let file = route_file("1,55.7522,37.6156,10.0,120.5\n");
        let positions = load(file.path()).unwrap();

        let p = &positions[0];
        assert_eq!(p.duration, 0.0);
        assert_eq!(p.transition, Transition::Auto);
        assert_eq!(p.description, "");
    }

    #[test]
    fn test_skips_comments_and_blank_lines() {
        let file = route_file(
            "# route: test\n\
             1,10.0,20.0,5.0,0.0\n\
             \n\
             2,11.0,21.0,5.0,0.0\n",
        );
        let positions = load(file.path()).unwrap();

        assert_eq!(positions.len(), 2);
        assert_eq!(positions[0].index, 1);
        assert_eq!(positions[1].index, 2);
    }

    #[test]
    fn test_numbers_sequentially_ignoring_first_column() {
        let file = route_file("42,10.0,20.0,5.0,0.0\n99,11.0,21.0,5.0,0.0\n");
        let positions = load(file.path()).unwrap();

        assert_eq!(positions[0].index, 1);
        assert_eq!(positions[1].index, 2);
    }

    #[test]
    fn test_rejects_short_row() {
        let file = route_file("1,10.0,20.0\n");
        assert!(matches!(
            load(file.path()),
            Err(GeneratorError::InvalidRoute { .. })
        ));
    }

    #[test]
    fn test_rejects_unparsable_field() {
        let file = route_file("1,north,20.0,5.0,0.0\n");
        let err = load(file.path()).unwrap_err();
        assert!(err.to_string().contains("latitude"));
    }

    #[test]
    fn test_rejects_unknown_transition() {
        let file = route_file("1,10.0,20.0,5.0,0.0,1.0,teleport\n");
        assert!(load(file.path()).is_err());
    }

    #[test]
    fn test_rejects_out_of_range_latitude() {
        let file = route_file("1,95.0,20.0,5.0,0.0\n");
        assert!(matches!(
            load(file.path()),
            Err(GeneratorError::InvalidRoute { .. })
        ));
    }

    #[test]
    fn test_rejects_empty_file() {
        let file = route_file("# only a comment\n");
        assert!(matches!(
            load(file.path()),
            Err(GeneratorError::EmptyRoute { .. })
        ));
    }

    #[test]
    fn test_rejects_missing_file() {
        assert!(matches!(
            load(Path::new("/nonexistent/route.csv")),
            Err(GeneratorError::Io { .. })
        ));
    }
}
