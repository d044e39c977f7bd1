//! Common override parameters shared by every file-backed generator.

use crate::position::Position;

use super::GeneratorError;

/// Overrides layered uniformly on top of whatever a loader parsed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommonParams {
    /// Forces every emitted position's dwell duration, in seconds.
    pub duration_override: Option<f64>,
    /// Renumbers emitted positions contiguously from this start index.
    pub index_override: Option<u32>,
}

impl CommonParams {
    /// Split `key=value` override arguments from a construction argument
    /// list.
    ///
    /// Returns the parsed overrides and the remaining arguments in their
    /// original order, for the concrete loader to interpret. An override
    /// with an unparsable value fails the whole construction.
    pub fn parse(args: &[String]) -> Result<(Self, Vec<String>), GeneratorError> {
        let mut params = CommonParams::default();
        let mut remaining = Vec::new();

        for arg in args {
            if let Some(value) = arg.strip_prefix("duration=") {
                let duration = value
                    .parse::<f64>()
                    .ok()
                    .filter(|d| *d >= 0.0 && d.is_finite())
                    .ok_or_else(|| GeneratorError::InvalidOverride {
                        name: "duration",
                        value: value.to_string(),
                    })?;
                params.duration_override = Some(duration);
            } else if let Some(value) = arg.strip_prefix("index=") {
                let index =
                    value
                        .parse::<u32>()
                        .map_err(|_| GeneratorError::InvalidOverride {
                            name: "index",
                            value: value.to_string(),
                        })?;
                params.index_override = Some(index);
            } else {
                remaining.push(arg.clone());
            }
        }

        Ok((params, remaining))
    }

    /// Apply the overrides to one loaded position.
    ///
    /// `original_index` is the point's 1-based position within its file, so
    /// an `index=<start>` override produces `start, start + 1, ...`
    /// regardless of what the loader assigned.
    pub fn apply(&self, position: &mut Position, original_index: u32) {
        if let Some(duration) = self.duration_override {
            position.duration = duration;
        }
        if let Some(start) = self.index_override {
            position.index = start + (original_index - 1);
        }
    }
}
