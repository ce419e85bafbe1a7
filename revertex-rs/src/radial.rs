//! Sampling along a line whose density grows linearly with radius
//!
//! Sweeping a segment between radii `r0` and `r1` around the axis gives a
//! frustum (or annulus); points on it are uniform by area when their
//! position along the segment is drawn with density proportional to `r`.

use crate::error::{Error, Result};
use rand::Rng;

/// Fraction along each `r0 -> r1` segment, distributed proportionally to radius.
///
/// The returned `t` is measured from the original `r0` end, so callers
/// interpolate `p = p0 + t * (p1 - p0)` regardless of which radius is larger.
pub fn sample_proportional_radius<R: Rng + ?Sized>(
    r0: &[f64],
    r1: &[f64],
    size: usize,
    rng: &mut R,
) -> Result<Vec<f64>> {
    if r0.len() != size {
        return Err(Error::LengthMismatch {
            what: "r0",
            expected: size,
            found: r0.len(),
        });
    }
    if r1.len() != size {
        return Err(Error::LengthMismatch {
            what: "r1",
            expected: size,
            found: r1.len(),
        });
    }

    Ok(r0
        .iter()
        .zip(r1)
        .map(|(&start, &end)| {
            let u = rng.random::<f64>();
            proportional_fraction(start, end, u)
        })
        .collect())
}

/// Invert the linear-in-r CDF on one segment for a uniform variate `u`.
#[inline]
pub fn proportional_fraction(r0: f64, r1: f64, u: f64) -> f64 {
    let (a, b) = if r0 <= r1 { (r0, r1) } else { (r1, r0) };
    let t = if a == b {
        u
    } else {
        ((u * (b * b - a * a) + a * a).sqrt() - a) / (b - a)
    };
    if r1 < r0 { 1.0 - t } else { t }
}
