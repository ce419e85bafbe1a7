//! Rejection sampling inside a bounding cylinder
//!
//! Candidates are drawn uniformly in a cylindrical shell and kept when an
//! exact membership test accepts them. Every attempt reseeds a fresh
//! generator from the perturbed seed so the whole call depends only on
//! the initial seed.

use crate::{
    consts::{DEFAULT_MAX_ATTEMPTS, TWO_PI},
    error::{Error, Result},
    types::{Positions, Vec3},
    utils::perturb_seed,
};
use isaac_rs::Isaac;
use rand::Rng;
use tracing::{debug, trace};

/// Axis-aligned cylindrical shell `r_min <= r <= r_max`, `z_min <= z <= z_max`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingCylinder {
    pub r_min: f64,
    pub r_max: f64,
    pub z_min: f64,
    pub z_max: f64,
}

impl BoundingCylinder {
    pub fn new(r_min: f64, r_max: f64, z_min: f64, z_max: f64) -> Result<Self> {
        let bounds = Self { r_min, r_max, z_min, z_max };
        bounds.validate()?;
        Ok(bounds)
    }

    fn validate(&self) -> Result<()> {
        let finite = [self.r_min, self.r_max, self.z_min, self.z_max]
            .iter()
            .all(|v| v.is_finite());
        if !finite || self.r_min < 0.0 || self.r_min > self.r_max || self.z_min > self.z_max {
            return Err(Error::invalid(format!("invalid bounding cylinder {:?}", self)));
        }
        Ok(())
    }
}

/// Stop condition for [`sample_region`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RejectionConfig {
    pub max_attempts: usize,
}

impl Default for RejectionConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Uniform points in the volume of `bounds`.
///
/// The radius is drawn uniform in r² so the areal density in (r, phi) is flat.
pub fn sample_cylinder<R: Rng + ?Sized>(
    bounds: &BoundingCylinder,
    size: usize,
    rng: &mut R,
) -> Positions {
    let r2_lo = bounds.r_min * bounds.r_min;
    let r2_hi = bounds.r_max * bounds.r_max;
    let mut out = Positions::with_capacity(size);
    for _ in 0..size {
        let r = (r2_lo + rng.random::<f64>() * (r2_hi - r2_lo)).sqrt();
        let z = bounds.z_min + rng.random::<f64>() * (bounds.z_max - bounds.z_min);
        let phi = rng.random::<f64>() * TWO_PI;
        out.push([r * phi.cos(), r * phi.sin(), z]);
    }
    out
}

/// Draw exactly `size` points of `bounds` that satisfy `accept`.
///
/// Each attempt proposes `size` candidates from a generator seeded with
/// the seed stepped by [`perturb_seed`] (`7 * seed + 1`). Fails with
/// [`Error::SamplingExhausted`] after `cfg.max_attempts` attempts.
pub fn sample_region<F>(
    bounds: &BoundingCylinder,
    mut accept: F,
    size: usize,
    seed: u64,
    cfg: &RejectionConfig,
) -> Result<Positions>
where
    F: FnMut(&Vec3) -> bool,
{
    bounds.validate()?;
    if size == 0 {
        return Ok(Positions::default());
    }

    let mut kept = Positions::with_capacity(size);
    let mut seed = seed;
    let mut attempts = 0;

    while kept.len() < size {
        if attempts == cfg.max_attempts {
            return Err(Error::SamplingExhausted {
                requested: size,
                accepted: kept.len(),
                attempts,
            });
        }
        seed = perturb_seed(seed);
        attempts += 1;

        let mut rng = Isaac::new(seed);
        let batch = sample_cylinder(bounds, size, &mut rng).retain(&mut accept);
        trace!(attempt = attempts, accepted = batch.len(), "rejection batch");
        kept.extend_from(&batch);
    }

    kept.truncate(size);
    debug!(size, attempts, "region sampling converged");
    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cylinder_points_stay_in_bounds() {
        let bounds = BoundingCylinder::new(1.0, 2.0, -1.0, 3.0).unwrap();
        let pts = sample_cylinder(&bounds, 2000, &mut Isaac::new(8));
        assert_eq!(pts.len(), 2000);
        for [x, y, z] in pts.iter() {
            let r = x.hypot(y);
            assert!((1.0..=2.0).contains(&r));
            assert!((-1.0..=3.0).contains(&z));
        }
    }

    #[test]
    fn uniform_in_area() {
        // half the area of a disc of radius 1 lies inside r = 1/sqrt(2)
        let bounds = BoundingCylinder::new(0.0, 1.0, 0.0, 1.0).unwrap();
        let pts = sample_cylinder(&bounds, 20_000, &mut Isaac::new(2));
        let inner = pts
            .iter()
            .filter(|p| p[0].hypot(p[1]) < std::f64::consts::FRAC_1_SQRT_2)
            .count();
        let frac = inner as f64 / 20_000.0;
        assert!((frac - 0.5).abs() < 0.02, "{}", frac);
    }

    #[test]
    fn exact_count_and_reproducible() {
        let bounds = BoundingCylinder::new(0.0, 10.0, 0.0, 10.0).unwrap();
        let accept = |p: &Vec3| p[2] < 1.0;
        let cfg = RejectionConfig::default();

        let a = sample_region(&bounds, accept, 500, 99, &cfg).unwrap();
        let b = sample_region(&bounds, accept, 500, 99, &cfg).unwrap();
        assert_eq!(a.len(), 500);
        assert_eq!(a, b);
        assert!(a.iter().all(|p| p[2] < 1.0));
    }

    #[test]
    fn seed_zero_retries_draw_fresh_points() {
        // low acceptance forces many attempts
        let bounds = BoundingCylinder::new(0.0, 10.0, 0.0, 10.0).unwrap();
        let cfg = RejectionConfig::default();
        let pts = sample_region(&bounds, |p| p[0].hypot(p[1]) < 1.0, 1000, 0, &cfg).unwrap();
        assert_eq!(pts.len(), 1000);

        let mut xs: Vec<u64> = pts.x.iter().map(|x| x.to_bits()).collect();
        xs.sort_unstable();
        xs.dedup();
        assert_eq!(xs.len(), 1000);
    }

    #[test]
    fn zero_acceptance_is_bounded() {
        let bounds = BoundingCylinder::new(0.0, 1.0, 0.0, 1.0).unwrap();
        let cfg = RejectionConfig { max_attempts: 5 };
        let res = sample_region(&bounds, |_| false, 10, 1, &cfg);
        assert!(matches!(
            res,
            Err(Error::SamplingExhausted { requested: 10, accepted: 0, attempts: 5 })
        ));
    }

    #[test]
    fn empty_request_and_bad_bounds() {
        let bounds = BoundingCylinder::new(0.0, 1.0, 0.0, 1.0).unwrap();
        let cfg = RejectionConfig::default();
        assert!(sample_region(&bounds, |_| false, 0, 1, &cfg).unwrap().is_empty());

        assert!(BoundingCylinder::new(2.0, 1.0, 0.0, 1.0).is_err());
        assert!(BoundingCylinder::new(0.0, 1.0, 0.0, f64::NAN).is_err());
    }
}
