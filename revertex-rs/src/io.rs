//! Spectrum input files

use crate::error::{Error, Result};
use std::{fs, path::Path};

/// Parse a two-column spectrum (energy, phase space).
///
/// Columns are separated by commas, whitespace or both. Blank lines and
/// lines starting with `#` are skipped.
pub fn parse_beta_csv(text: &str) -> Result<(Vec<f64>, Vec<f64>)> {
    let mut energies = Vec::new();
    let mut phase_space = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|f| !f.is_empty())
            .collect();
        if fields.len() != 2 {
            return Err(Error::Parse {
                line: idx + 1,
                message: format!("expected 2 columns, found {}", fields.len()),
            });
        }
        let parse = |field: &str| {
            field.parse::<f64>().map_err(|e| Error::Parse {
                line: idx + 1,
                message: format!("'{}': {}", field, e),
            })
        };
        energies.push(parse(fields[0])?);
        phase_space.push(parse(fields[1])?);
    }
    Ok((energies, phase_space))
}

/// Read a two-column spectrum file, see [`parse_beta_csv`].
pub fn read_input_beta_csv(path: impl AsRef<Path>) -> Result<(Vec<f64>, Vec<f64>)> {
    parse_beta_csv(&fs::read_to_string(path)?)
}
