//! Vertices inside the borehole cavity of a detector

use super::save_positions;
use crate::{
    allocate::{Weighting, allocate_and_generate, weights},
    collection::DetectorCollection,
    error::Result,
    geometry::Solid,
    region::{BoundingCylinder, RejectionConfig, sample_region},
    sink::TableSink,
    types::Positions,
    utils::{resolve_seed, seeded_rng},
};
use rand::Rng;
use tracing::info;

/// Draw `n` points uniformly in the borehole of `solid`, in its local frame.
///
/// Candidates fill the detector's bounding cylinder and are kept when
/// they fall into the cavity.
pub fn generate_hpge_borehole(
    n: usize,
    solid: &dyn Solid,
    seed: Option<u64>,
    cfg: &RejectionConfig,
) -> Result<Positions> {
    let (z_min, z_max) = solid.z_range();
    let bounds = BoundingCylinder::new(0.0, solid.max_radius(), z_min, z_max)?;
    sample_region(
        &bounds,
        |p| solid.is_inside_borehole(p),
        n,
        resolve_seed(seed),
        cfg,
    )
}

/// Borehole vertices over a collection, shared out by cavity volume.
///
/// Each detector's rejection loop is seeded from the shared generator.
pub fn generate_hpge_borehole_points(
    total: usize,
    collection: &DetectorCollection,
    seed: Option<u64>,
    cfg: &RejectionConfig,
) -> Result<Positions> {
    let w = weights(collection, Weighting::BoreholeVolume)?;
    let mut rng = seeded_rng(seed);
    allocate_and_generate(total, collection, &w, &mut rng, |entry, n, rng| {
        generate_hpge_borehole(n, entry.solid.as_ref(), Some(rng.random()), cfg)
    })
}

/// Generate `size` borehole vertices and stream them to `sink` under `vtx/pos`.
pub fn save_borehole_points<S: TableSink + ?Sized>(
    size: usize,
    collection: &DetectorCollection,
    lunit: &str,
    seed: Option<u64>,
    cfg: &RejectionConfig,
    sink: &mut S,
) -> Result<()> {
    info!(detectors = ?collection.names(), "borehole vertices");
    save_positions("borehole", size, lunit, seed, sink, |chunk, seed| {
        generate_hpge_borehole_points(chunk, collection, Some(seed), cfg)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::Error, geometry::Bege};

    #[test]
    fn solid_without_cavity_exhausts() {
        let det = Bege::new(35.0, 30.0, 7.5, None).unwrap();
        let cfg = RejectionConfig { max_attempts: 3 };
        let res = generate_hpge_borehole(10, &det, Some(1), &cfg);
        assert!(matches!(res, Err(Error::SamplingExhausted { attempts: 3, .. })));
    }

    #[test]
    fn same_seed_same_points() {
        let det = crate::geometry::SemiCoax::new(38.0, 70.0, 6.0, 60.0).unwrap();
        let cfg = RejectionConfig::default();
        let a = generate_hpge_borehole(200, &det, Some(4), &cfg).unwrap();
        let b = generate_hpge_borehole(200, &det, Some(4), &cfg).unwrap();
        assert_eq!(a, b);
        assert!(a.iter().all(|p| det.is_inside_borehole(&p)));
    }
}
