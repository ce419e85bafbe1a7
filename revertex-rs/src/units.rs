use crate::error::{Error, Result};

/// Multiplicative factor taking an energy in `unit` to keV
pub fn energy_factor(unit: &str) -> Result<f64> {
    match unit {
        "eV" => Ok(1e-3),
        "keV" => Ok(1.0),
        "MeV" => Ok(1e3),
        "GeV" => Ok(1e6),
        _ => Err(Error::UnknownUnit(unit.to_string())),
    }
}

/// Multiplicative factor taking a length in `unit` to mm
pub fn length_factor(unit: &str) -> Result<f64> {
    match unit {
        "um" => Ok(1e-3),
        "mm" => Ok(1.0),
        "cm" => Ok(10.0),
        "m" => Ok(1e3),
        _ => Err(Error::UnknownUnit(unit.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_units() {
        assert_eq!(energy_factor("MeV").unwrap(), 1000.0);
        assert_eq!(energy_factor("keV").unwrap(), 1.0);
        assert_eq!(length_factor("cm").unwrap(), 10.0);
    }

    #[test]
    fn unknown_units_are_rejected() {
        assert!(matches!(energy_factor("kev"), Err(Error::UnknownUnit(u)) if u == "kev"));
        assert!(matches!(length_factor("inch"), Err(Error::UnknownUnit(_))));
    }
}
