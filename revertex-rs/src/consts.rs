use std::f64::consts::PI;

pub const TWO_PI: f64 = 2.0 * PI;

/// Electron rest mass in the internal energy unit (keV).
pub const ELECTRON_MASS: f64 = 511.0;
/// PDG code written to the particle tag column for betas.
pub const ELECTRON_PID: i64 = 11;

/// Internal energy unit; every energy is converted to this on entry.
pub const INTERNAL_EUNIT: &str = "keV";
pub const DEFAULT_LUNIT: &str = "mm";

/// Multiplier of the seed step between rejection attempts and output chunks.
pub const SEED_PERTURBATION: u64 = 7;

/// Largest batch kept in memory by the save drivers.
pub const MAX_CHUNK: usize = 1_000_000;

pub const DEFAULT_MAX_ATTEMPTS: usize = 10_000;

pub const POS_KEY: &str = "vtx/pos";
pub const KIN_KEY: &str = "vtx/kin";
