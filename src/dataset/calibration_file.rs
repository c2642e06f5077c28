//! Parser for `key = value` camera calibration files.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::CalibrationSource;
use crate::{Error, Result};

/// A calibration file of one `key = value` float per line, as shipped with
/// the TownCentre dataset (`TownCentre-calibration.ci`).
#[derive(Debug, Clone)]
pub struct CalibrationFile {
    path: String,
    parameters: HashMap<String, f64>,
}

impl CalibrationFile {
    /// Read and parse a calibration file.
    ///
    /// Blank lines are ignored; a line without `=` or with a non-numeric
    /// value is a configuration error naming the offender.
    pub fn load<P: AsRef<Path>>(file_path: P) -> Result<Self> {
        let path = file_path.as_ref().to_string_lossy().to_string();
        let file = File::open(&file_path).map_err(|e| {
            Error::IoError(std::io::Error::new(
                e.kind(),
                format!("failed to open calibration file '{}': {}", path, e),
            ))
        })?;

        let reader = BufReader::new(file);
        let mut parameters = HashMap::new();

        for line_result in reader.lines() {
            let line = line_result.map_err(Error::IoError)?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let (key, value) = line.split_once('=').ok_or_else(|| {
                Error::Configuration(format!(
                    "malformed calibration line '{}' in {}",
                    line, path
                ))
            })?;
            let key = key.trim();
            let value: f64 = value.trim().parse().map_err(|_| {
                Error::Configuration(format!(
                    "calibration value for '{}' in {} is not a number",
                    key, path
                ))
            })?;

            parameters.insert(key.to_string(), value);
        }

        Ok(Self { path, parameters })
    }

    /// The parsed parameter mapping.
    pub fn parameters(&self) -> &HashMap<String, f64> {
        &self.parameters
    }

    /// The file this mapping was loaded from.
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl CalibrationSource for CalibrationFile {
    fn camera_parameters(&self) -> Result<HashMap<String, f64>> {
        Ok(self.parameters.clone())
    }
}
