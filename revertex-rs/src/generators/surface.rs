//! Vertices on detector surfaces

use super::save_positions;
use crate::{
    allocate::{Weighting, allocate_and_generate, weights},
    categorical::Categorical,
    collection::DetectorCollection,
    consts::TWO_PI,
    error::{Error, Result},
    geometry::{Solid, SurfaceType},
    histogram::Histogram,
    radial::proportional_fraction,
    sink::TableSink,
    types::Positions,
    utils::seeded_rng,
};
use rand::Rng;
use tracing::info;

/// Draw `n` points uniformly by area on the surfaces of `solid` tagged
/// `surface_type` (all surfaces for `None`), in the local frame.
///
/// A segment is picked with probability proportional to its swept area,
/// the position along it follows the radius, and the azimuth is uniform.
/// Depth profiles below the surface are not supported.
pub fn generate_hpge_surface<R: Rng + ?Sized>(
    n: usize,
    solid: &dyn Solid,
    surface_type: Option<SurfaceType>,
    depth: Option<&Histogram>,
    rng: &mut R,
) -> Result<Positions> {
    if depth.is_some() {
        return Err(Error::Unsupported("depth profile for surface vertices".into()));
    }
    let ids = solid.surface_indices(surface_type);
    if ids.is_empty() {
        return Err(Error::invalid(format!(
            "detector has no {} surface",
            surface_type.map_or_else(|| "any".to_string(), |t| t.to_string())
        )));
    }
    let sides = Categorical::new(&solid.surface_area(&ids))?;

    let mut out = Positions::with_capacity(n);
    for _ in 0..n {
        let ([r1, z1], [r2, z2]) = solid.segment(ids[sides.sample(rng)]);
        let t = proportional_fraction(r1, r2, rng.random::<f64>());
        let r = r1 + t * (r2 - r1);
        let z = z1 + t * (z2 - z1);
        let phi = rng.random::<f64>() * TWO_PI;
        out.push([r * phi.cos(), r * phi.sin(), z]);
    }
    Ok(out)
}

/// Surface vertices over a collection, shared out by the selected area.
pub fn generate_many_hpge_surface(
    total: usize,
    collection: &DetectorCollection,
    surface_type: Option<SurfaceType>,
    seed: Option<u64>,
) -> Result<Positions> {
    let w = weights(collection, Weighting::SurfaceArea(surface_type))?;
    let mut rng = seeded_rng(seed);
    allocate_and_generate(total, collection, &w, &mut rng, |entry, n, rng| {
        generate_hpge_surface(n, entry.solid.as_ref(), surface_type, None, rng)
    })
}

/// Generate `size` surface vertices and stream them to `sink` under `vtx/pos`.
pub fn save_surface_points<S: TableSink + ?Sized>(
    size: usize,
    collection: &DetectorCollection,
    surface_type: Option<SurfaceType>,
    lunit: &str,
    seed: Option<u64>,
    sink: &mut S,
) -> Result<()> {
    info!(detectors = ?collection.names(), surface = ?surface_type, "surface vertices");
    save_positions("surface", size, lunit, seed, sink, |chunk, seed| {
        generate_many_hpge_surface(chunk, collection, surface_type, Some(seed))
    })
}
