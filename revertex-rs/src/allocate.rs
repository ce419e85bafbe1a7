//! Splitting one sample budget over several detectors

use crate::{
    categorical::{Categorical, bincount},
    collection::{DetectorCollection, DetectorEntry},
    error::{Error, Result},
    geometry::SurfaceType,
    simd::sum_slice,
    types::Positions,
};
use rand::Rng;
use tracing::debug;

/// Per-detector weight used to share out the samples
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Weighting {
    /// Total area of the segments with this tag (all segments when `None`)
    SurfaceArea(Option<SurfaceType>),
    Volume,
    BoreholeVolume,
}

/// Unnormalized weight of each detector in collection order.
pub fn weights(collection: &DetectorCollection, weighting: Weighting) -> Result<Vec<f64>> {
    if collection.is_empty() {
        return Err(Error::invalid("empty detector collection"));
    }
    Ok(collection
        .entries()
        .iter()
        .map(|entry| {
            let solid = entry.solid.as_ref();
            match weighting {
                Weighting::SurfaceArea(surface_type) => {
                    let ids = solid.surface_indices(surface_type);
                    sum_slice(&solid.surface_area(&ids))
                }
                Weighting::Volume => solid.volume(),
                Weighting::BoreholeVolume => solid.borehole_volume(),
            }
        })
        .collect())
}

/// Draw `total` points spread over the detectors of `collection`.
///
/// One categorical draw assigns every sample to a detector, then
/// `sampler(entry, count, rng)` produces that many local points which are
/// moved into the global frame. Detectors assigned nothing are skipped.
pub fn allocate_and_generate<R, F>(
    total: usize,
    collection: &DetectorCollection,
    weights: &[f64],
    rng: &mut R,
    mut sampler: F,
) -> Result<Positions>
where
    R: Rng + ?Sized,
    F: FnMut(&DetectorEntry, usize, &mut R) -> Result<Positions>,
{
    if weights.len() != collection.len() {
        return Err(Error::LengthMismatch {
            what: "detector weights",
            expected: collection.len(),
            found: weights.len(),
        });
    }

    let choice = Categorical::new(weights)?;
    let counts = bincount(&choice.sample_n(total, rng), collection.len());

    let mut out = Positions::with_capacity(total);
    for (entry, &count) in collection.entries().iter().zip(&counts) {
        if count == 0 {
            continue;
        }
        debug!(detector = %entry.name, count, "generating");

        let mut local = sampler(entry, count, rng)?;
        if local.len() != count {
            return Err(Error::LengthMismatch {
                what: "per-detector sample",
                expected: count,
                found: local.len(),
            });
        }
        local.translate(entry.offset);
        out.extend_from(&local);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Bege;
    use isaac_rs::Isaac;

    fn pair() -> DetectorCollection {
        let mut c = DetectorCollection::default();
        c.push("a".into(), Box::new(Bege::new(10.0, 10.0, 2.0, None).unwrap()), [0.0; 3])
            .unwrap();
        c.push("b".into(), Box::new(Bege::new(20.0, 10.0, 2.0, None).unwrap()), [0.0, 0.0, 500.0])
            .unwrap();
        c
    }

    #[test]
    fn volume_weights_follow_the_shapes() {
        let c = pair();
        let w = weights(&c, Weighting::Volume).unwrap();
        assert!((w[1] / w[0] - 4.0).abs() < 1e-12);
        // no cavity in a BEGe
        assert_eq!(weights(&c, Weighting::BoreholeVolume).unwrap(), vec![0.0, 0.0]);
    }

    #[test]
    fn zero_weight_detector_is_never_sampled() {
        let c = pair();
        let mut calls = Vec::new();
        let out = allocate_and_generate(50, &c, &[0.0, 1.0], &mut Isaac::new(3), |e, n, _| {
            calls.push(e.name.clone());
            Ok(std::iter::repeat_n([0.0; 3], n).collect())
        })
        .unwrap();
        assert_eq!(calls, vec!["b".to_string()]);
        assert_eq!(out.len(), 50);
        assert!(out.iter().all(|p| p[2] == 500.0));
    }

    #[test]
    fn short_sampler_output_is_an_error() {
        let c = pair();
        let res = allocate_and_generate(10, &c, &[1.0, 1.0], &mut Isaac::new(3), |_, n, _| {
            Ok(std::iter::repeat_n([0.0; 3], n - 1).collect())
        });
        assert!(matches!(res, Err(Error::LengthMismatch { .. })));
    }

    #[test]
    fn all_zero_weights_are_degenerate() {
        let c = pair();
        let res = allocate_and_generate(10, &c, &[0.0, 0.0], &mut Isaac::new(3), |_, _, _| {
            Ok(Positions::default())
        });
        assert!(matches!(res, Err(Error::DegenerateWeights(_))));
    }
}
