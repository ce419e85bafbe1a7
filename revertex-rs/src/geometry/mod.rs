//! Detector shapes as solids of revolution
//!
//! Every detector is described by an open (r, z) polyline running from the
//! symmetry axis, around the crystal, back to the axis. Rotating the
//! polyline about z gives the boundary; the closing stretch along the axis
//! is not a physical surface. Each polyline segment carries a
//! [`SurfaceType`] and is addressed by its index in the profile.

mod bege;
mod coax;
mod icpc;
mod metadata;

pub use bege::{Bege, Groove};
pub use coax::SemiCoax;
pub use icpc::{InvertedCoax, Taper};
pub use metadata::DetectorMetadata;

use crate::{
    error::{Error, Result},
    types::Vec3,
};
use serde::{Deserialize, Serialize};
use std::{f64::consts::PI, fmt, str::FromStr};

/// (r, z) vertex of a profile
pub type RzPoint = [f64; 2];

/// Physical role of a boundary segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceType {
    /// Lithium-diffused outer electrode
    NPlus,
    /// Boron-implanted point contact
    PPlus,
    /// Passivated surface between the electrodes
    Passive,
}

impl FromStr for SurfaceType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "nplus" => Ok(SurfaceType::NPlus),
            "pplus" => Ok(SurfaceType::PPlus),
            "passive" => Ok(SurfaceType::Passive),
            _ => Err(Error::invalid(format!(
                "unknown surface type '{}', expected nplus, pplus or passive",
                s
            ))),
        }
    }
}

impl fmt::Display for SurfaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SurfaceType::NPlus => "nplus",
            SurfaceType::PPlus => "pplus",
            SurfaceType::Passive => "passive",
        };
        f.write_str(name)
    }
}

/// Capabilities the generators need from a detector shape
///
/// Shape families provide the profile, the per-segment surface tags and
/// their borehole; areas, volume, containment and distances follow from
/// the profile.
pub trait Solid: fmt::Debug {
    /// Open (r, z) polyline from the axis around the crystal back to the axis
    fn profile(&self) -> &[RzPoint];

    /// Surface tag of each profile segment (`profile().len() - 1` entries)
    fn surfaces(&self) -> &[SurfaceType];

    /// Whether `p` lies in the cavity bored into the crystal
    fn is_inside_borehole(&self, p: &Vec3) -> bool;

    /// Volume of the borehole cavity; zero without one
    fn borehole_volume(&self) -> f64;

    /// Segment `i` as its two end points
    #[inline]
    fn segment(&self, i: usize) -> (RzPoint, RzPoint) {
        let profile = self.profile();
        (profile[i], profile[i + 1])
    }

    /// Indices of the segments with the given tag, or of all segments
    fn surface_indices(&self, surface_type: Option<SurfaceType>) -> Vec<usize> {
        self.surfaces()
            .iter()
            .enumerate()
            .filter(|(_, s)| surface_type.is_none_or(|t| **s == t))
            .map(|(i, _)| i)
            .collect()
    }

    /// Area swept by each requested segment
    fn surface_area(&self, ids: &[usize]) -> Vec<f64> {
        ids.iter()
            .map(|&i| {
                let ([r1, z1], [r2, z2]) = self.segment(i);
                PI * (r1 + r2) * (r2 - r1).hypot(z2 - z1)
            })
            .collect()
    }

    /// Enclosed volume (Pappus over the closed profile)
    fn volume(&self) -> f64 {
        let profile = self.profile();
        let sum: f64 = profile
            .windows(2)
            .map(|w| {
                let ([r1, z1], [r2, z2]) = (w[0], w[1]);
                (z2 - z1) * (r1 * r1 + r1 * r2 + r2 * r2)
            })
            .sum();
        (PI * sum / 3.0).abs()
    }

    /// Largest radius of the profile
    fn max_radius(&self) -> f64 {
        self.profile().iter().map(|p| p[0]).fold(0.0, f64::max)
    }

    /// Lowest and highest z of the profile
    fn z_range(&self) -> (f64, f64) {
        self.profile()
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p[1]), hi.max(p[1]))
            })
    }

    /// Whether `p` lies inside the crystal
    fn is_inside(&self, p: &Vec3) -> bool {
        point_in_profile(self.profile(), to_rz(p))
    }

    /// Distance from `p` to the requested segments, positive inside the
    /// crystal and negative outside
    fn distance_to_surface(&self, p: &Vec3, ids: &[usize]) -> f64 {
        let rz = to_rz(p);
        let d = ids
            .iter()
            .map(|&i| {
                let (a, b) = self.segment(i);
                segment_distance(rz, a, b)
            })
            .fold(f64::INFINITY, f64::min);
        if self.is_inside(p) { d } else { -d }
    }
}

#[inline]
pub fn to_rz(p: &Vec3) -> RzPoint {
    [p[0].hypot(p[1]), p[2]]
}

/// Euclidean distance from `p` to the segment `a`-`b` in the (r, z) plane
pub fn segment_distance(p: RzPoint, a: RzPoint, b: RzPoint) -> f64 {
    let (dr, dz) = (b[0] - a[0], b[1] - a[1]);
    let len2 = dr * dr + dz * dz;
    let t = if len2 > 0.0 {
        (((p[0] - a[0]) * dr + (p[1] - a[1]) * dz) / len2).clamp(0.0, 1.0)
    } else {
        0.0
    };
    (p[0] - (a[0] + t * dr)).hypot(p[1] - (a[1] + t * dz))
}

/// Even-odd test against the profile closed along the axis
fn point_in_profile(profile: &[RzPoint], p: RzPoint) -> bool {
    let n = profile.len();
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (profile[i], profile[j]);
        if (a[1] > p[1]) != (b[1] > p[1]) {
            let r_cross = a[0] + (p[1] - a[1]) / (b[1] - a[1]) * (b[0] - a[0]);
            if p[0] < r_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Check the structural invariants shared by every shape family.
pub(crate) fn validate_profile(profile: &[RzPoint], surfaces: &[SurfaceType]) -> Result<()> {
    if profile.len() < 3 {
        return Err(Error::invalid("a profile needs at least three points"));
    }
    if surfaces.len() != profile.len() - 1 {
        return Err(Error::LengthMismatch {
            what: "surface tags",
            expected: profile.len() - 1,
            found: surfaces.len(),
        });
    }
    if profile.iter().any(|p| !p[0].is_finite() || !p[1].is_finite() || p[0] < 0.0) {
        return Err(Error::invalid("profile points must be finite with r >= 0"));
    }
    if profile[0][0] != 0.0 || profile[profile.len() - 1][0] != 0.0 {
        return Err(Error::invalid("a profile must start and end on the axis"));
    }
    if profile.windows(2).any(|w| w[0] == w[1]) {
        return Err(Error::invalid("profile has a zero-length segment"));
    }
    Ok(())
}

/// Require strictly positive, finite dimensions.
pub(crate) fn require_positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::invalid(format!("{} must be positive, got {}", name, value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn icpc() -> InvertedCoax {
        InvertedCoax::new(40.0, 80.0, 5.0, 5.0, 50.0, None).unwrap()
    }

    #[test]
    fn analytic_area_and_volume() {
        let det = icpc();
        let all = det.surface_indices(None);
        let area: f64 = det.surface_area(&all).iter().sum();
        let expected = PI * 40.0 * 40.0          // bottom
            + 2.0 * PI * 40.0 * 80.0             // outer wall
            + PI * (40.0 * 40.0 - 5.0 * 5.0)     // top ring
            + 2.0 * PI * 5.0 * 50.0              // bore wall
            + PI * 5.0 * 5.0; // bore bottom
        assert_relative_eq!(area, expected, max_relative = 1e-12);
        assert_relative_eq!(
            det.volume(),
            PI * 40.0 * 40.0 * 80.0 - PI * 25.0 * 50.0,
            max_relative = 1e-12
        );
        assert_relative_eq!(det.borehole_volume(), PI * 25.0 * 50.0, max_relative = 1e-12);
    }

    #[test]
    fn surface_selection() {
        let det = icpc();
        let pplus = det.surface_indices(Some(SurfaceType::PPlus));
        assert_eq!(pplus, vec![0]);
        let area = det.surface_area(&pplus)[0];
        assert_relative_eq!(area, PI * 25.0, max_relative = 1e-12);
        assert_eq!(
            det.surface_indices(None).len(),
            det.profile().len() - 1
        );
    }

    #[test]
    fn containment_and_signed_distance() {
        let det = icpc();
        let all = det.surface_indices(None);

        let bulk = [20.0, 0.0, 40.0];
        assert!(det.is_inside(&bulk));
        assert_relative_eq!(det.distance_to_surface(&bulk, &all), 15.0, max_relative = 1e-12);

        let bore = [0.0, 2.0, 70.0];
        assert!(!det.is_inside(&bore));
        assert!(det.is_inside_borehole(&bore));
        assert_relative_eq!(det.distance_to_surface(&bore, &all), -3.0, max_relative = 1e-12);

        let outside = [0.0, 43.0, 40.0];
        assert!(!det.is_inside(&outside));
        assert!(!det.is_inside_borehole(&outside));
        assert_relative_eq!(det.distance_to_surface(&outside, &all), -3.0, max_relative = 1e-12);
    }

    #[test]
    fn segment_distance_clamps_to_end_points() {
        assert_eq!(segment_distance([0.0, 0.0], [1.0, 0.0], [2.0, 0.0]), 1.0);
        assert_eq!(segment_distance([1.5, 2.0], [1.0, 0.0], [2.0, 0.0]), 2.0);
        assert_eq!(segment_distance([3.0, 0.0], [1.0, 0.0], [1.0, 0.0]), 2.0);
    }

    #[test]
    fn surface_type_parsing() {
        assert_eq!("nplus".parse::<SurfaceType>().unwrap(), SurfaceType::NPlus);
        assert_eq!(SurfaceType::Passive.to_string(), "passive");
        assert!("n+".parse::<SurfaceType>().is_err());
    }

    #[test]
    fn profile_validation() {
        let ok = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        let tags = [SurfaceType::PPlus, SurfaceType::NPlus, SurfaceType::NPlus];
        assert!(validate_profile(&ok, &tags).is_ok());
        assert!(validate_profile(&ok, &tags[..2]).is_err());
        let off_axis = [[0.5, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        assert!(validate_profile(&off_axis, &tags).is_err());
    }
}
