//! Vertices in a thin layer just outside detector surfaces

use super::save_positions;
use crate::{
    allocate::{Weighting, allocate_and_generate, weights},
    collection::DetectorCollection,
    error::{Error, Result},
    geometry::{Solid, SurfaceType},
    region::{BoundingCylinder, RejectionConfig, sample_region},
    sink::TableSink,
    types::Positions,
    utils::{resolve_seed, seeded_rng},
};
use rand::Rng;
use tracing::info;

/// Draw `n` points outside `solid` within `distance` of its surfaces
/// tagged `surface_type` (all for `None`), in the local frame.
///
/// Points are accepted when their signed distance lies in `(-distance, 0)`.
pub fn generate_hpge_shell(
    n: usize,
    solid: &dyn Solid,
    surface_type: Option<SurfaceType>,
    distance: f64,
    seed: Option<u64>,
    cfg: &RejectionConfig,
) -> Result<Positions> {
    if !(distance.is_finite() && distance > 0.0) {
        return Err(Error::invalid(format!("shell distance must be positive, got {}", distance)));
    }
    let ids = solid.surface_indices(surface_type);
    if ids.is_empty() {
        return Err(Error::invalid("no surface segments selected for the shell"));
    }

    let (z_min, z_max) = solid.z_range();
    let bounds = BoundingCylinder::new(
        0.0,
        solid.max_radius() + distance,
        z_min - distance,
        z_max + distance,
    )?;

    sample_region(
        &bounds,
        |p| {
            let d = solid.distance_to_surface(p, &ids);
            -distance < d && d < 0.0
        },
        n,
        resolve_seed(seed),
        cfg,
    )
}

/// Shell vertices over a collection, shared out by the selected surface area.
pub fn generate_hpge_shell_points(
    total: usize,
    collection: &DetectorCollection,
    surface_type: Option<SurfaceType>,
    distance: f64,
    seed: Option<u64>,
    cfg: &RejectionConfig,
) -> Result<Positions> {
    let w = weights(collection, Weighting::SurfaceArea(surface_type))?;
    let mut rng = seeded_rng(seed);
    allocate_and_generate(total, collection, &w, &mut rng, |entry, n, rng| {
        generate_hpge_shell(
            n,
            entry.solid.as_ref(),
            surface_type,
            distance,
            Some(rng.random()),
            cfg,
        )
    })
}

/// Generate `size` shell vertices and stream them to `sink` under `vtx/pos`.
#[allow(clippy::too_many_arguments)]
pub fn save_shell_points<S: TableSink + ?Sized>(
    size: usize,
    collection: &DetectorCollection,
    surface_type: Option<SurfaceType>,
    distance: f64,
    lunit: &str,
    seed: Option<u64>,
    cfg: &RejectionConfig,
    sink: &mut S,
) -> Result<()> {
    info!(detectors = ?collection.names(), surface = ?surface_type, distance, "shell vertices");
    save_positions("shell", size, lunit, seed, sink, |chunk, seed| {
        generate_hpge_shell_points(chunk, collection, surface_type, distance, Some(seed), cfg)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Bege;

    #[test]
    fn band_outside_the_nplus_surface() {
        let det = Bege::new(35.0, 30.0, 7.5, None).unwrap();
        let ids = det.surface_indices(Some(SurfaceType::NPlus));
        let pts = generate_hpge_shell(
            300,
            &det,
            Some(SurfaceType::NPlus),
            2.0,
            Some(3),
            &RejectionConfig::default(),
        )
        .unwrap();
        assert_eq!(pts.len(), 300);
        for p in pts.iter() {
            assert!(!det.is_inside(&p));
            let d = det.distance_to_surface(&p, &ids);
            assert!(d > -2.0 && d < 0.0);
        }
    }

    #[test]
    fn non_positive_distance_is_rejected() {
        let det = Bege::new(35.0, 30.0, 7.5, None).unwrap();
        let cfg = RejectionConfig::default();
        assert!(generate_hpge_shell(1, &det, None, 0.0, Some(1), &cfg).is_err());
        assert!(generate_hpge_shell(1, &det, None, f64::NAN, Some(1), &cfg).is_err());
    }
}
