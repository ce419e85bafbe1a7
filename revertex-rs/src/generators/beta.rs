//! Beta-decay primary kinematics from a tabulated spectrum

use crate::{
    consts::{ELECTRON_MASS, ELECTRON_PID, INTERNAL_EUNIT, KIN_KEY, MAX_CHUNK},
    error::{Error, Result},
    histogram::{Histogram, sample_histogram},
    output::{OutputMode, convert_output},
    sink::{TableSink, write_chunked},
    types::{Kinematics, Vec3},
    units::energy_factor,
    utils::{resolve_seed, seeded_rng},
};
use isaac_rs::Isaac;
use std::str::FromStr;
use tracing::{debug, info};

/// How tabulated energies map onto histogram bins
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BinMode {
    /// `e_i` is the lower edge of bin `i`; the last weight is dropped
    #[default]
    Left,
    /// `e_i` is the upper edge of bin `i - 1`; the first weight is dropped
    Right,
    /// `e_i` is the bin centre; outer edges are extrapolated by half a
    /// spacing and the lower one clamped at zero
    Center,
}

impl FromStr for BinMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "left" => Ok(BinMode::Left),
            "right" => Ok(BinMode::Right),
            "center" => Ok(BinMode::Center),
            _ => Err(Error::invalid(format!(
                "unknown bin mode '{}', expected left, right or center",
                s
            ))),
        }
    }
}

/// Histogram of the spectrum in keV
fn spectrum_histogram(energies: &[f64], phase_space: &[f64], eunit: &str, mode: BinMode) -> Result<Histogram> {
    if energies.len() != phase_space.len() {
        return Err(Error::LengthMismatch {
            what: "phase space",
            expected: energies.len(),
            found: phase_space.len(),
        });
    }
    if energies.len() < 2 {
        return Err(Error::invalid("a spectrum needs at least two points"));
    }

    let factor = energy_factor(eunit)?;
    let kev: Vec<f64> = energies.iter().map(|e| e * factor).collect();
    let n = kev.len();

    let (edges, weights) = match mode {
        BinMode::Left => (kev, phase_space[..n - 1].to_vec()),
        BinMode::Right => (kev, phase_space[1..].to_vec()),
        BinMode::Center => {
            let mut edges = Vec::with_capacity(n + 1);
            edges.push((kev[0] - 0.5 * (kev[1] - kev[0])).max(0.0));
            edges.extend(kev.windows(2).map(|w| 0.5 * (w[0] + w[1])));
            edges.push(kev[n - 1] + 0.5 * (kev[n - 1] - kev[n - 2]));
            (edges, phase_space.to_vec())
        }
    };
    Histogram::from_edges(edges, weights)
}

/// Rotate the +z axis by a uniformly random unit quaternion.
///
/// Four normal variates normalized to unit length give a rotation drawn
/// uniformly from SO(3).
fn random_direction(rng: &mut Isaac) -> Result<Vec3> {
    let q: [f64; 4] = std::array::from_fn(|_| rng.normal());
    let norm = q.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm == 0.0 {
        return Err(Error::invalid("degenerate rotation quaternion"));
    }
    let [w, x, y, z] = q.map(|v| v / norm);

    // third column of the rotation matrix
    Ok([
        2.0 * (x * z + w * y),
        2.0 * (y * z - w * x),
        1.0 - 2.0 * (x * x + y * y),
    ])
}

/// Sample beta kinematics from a spectrum given as left bin edges.
///
/// See [`generate_beta_spectrum_binned`].
pub fn generate_beta_spectrum(
    energies: &[f64],
    phase_space: &[f64],
    size: usize,
    seed: Option<u64>,
    eunit: &str,
) -> Result<Kinematics> {
    generate_beta_spectrum_binned(energies, phase_space, size, seed, eunit, BinMode::Left)
}

/// Sample `size` electrons from a tabulated beta spectrum.
///
/// Energies in `eunit` are converted to keV and sampled as a histogram
/// weighted by `phase_space`. Each electron gets the momentum
/// `sqrt(E^2 + 2 m E)` along +z; a single random rotation is then applied
/// to the whole batch, so all electrons of one call share a direction.
pub fn generate_beta_spectrum_binned(
    energies: &[f64],
    phase_space: &[f64],
    size: usize,
    seed: Option<u64>,
    eunit: &str,
    mode: BinMode,
) -> Result<Kinematics> {
    let histo = spectrum_histogram(energies, phase_space, eunit, mode)?;
    let mut rng = seeded_rng(seed);

    let ekin = sample_histogram(&histo, size, &mut rng)?.swap_remove(0);
    let [dx, dy, dz] = random_direction(&mut rng)?;
    debug!(size, direction = ?[dx, dy, dz], "sampled beta energies");

    let mut kin = Kinematics {
        px: Vec::with_capacity(size),
        py: Vec::with_capacity(size),
        pz: Vec::with_capacity(size),
        ekin,
        pid: vec![ELECTRON_PID; size],
    };
    for &e in &kin.ekin {
        let p = (e * e + 2.0 * ELECTRON_MASS * e).sqrt();
        kin.px.push(p * dx);
        kin.py.push(p * dy);
        kin.pz.push(p * dz);
    }
    Ok(kin)
}

/// Generate `size` beta primaries and stream them to `sink` under `vtx/kin`.
///
/// Energies are written in keV.
pub fn save_beta_spectrum<S: TableSink + ?Sized>(
    size: usize,
    energies: &[f64],
    phase_space: &[f64],
    eunit: &str,
    seed: Option<u64>,
    sink: &mut S,
) -> Result<()> {
    // fail before touching the sink
    spectrum_histogram(energies, phase_space, eunit, BinMode::Left)?;

    let seed = resolve_seed(seed);
    info!(size, seed, eunit, "generating beta kinematics");

    write_chunked(size, MAX_CHUNK, seed, sink, KIN_KEY, |chunk, seed| {
        let kin = generate_beta_spectrum(energies, phase_space, chunk, Some(seed), eunit)?;
        convert_output(&kin.to_table()?, OutputMode::Kin, "mm", INTERNAL_EUNIT)
    })
}
