use super::{RzPoint, Solid, SurfaceType, require_positive, validate_profile};
use crate::{
    error::{Error, Result},
    types::Vec3,
};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Conical cut of the top outer edge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Taper {
    /// Radial extent of the cut
    pub radius: f64,
    /// Vertical extent of the cut
    pub height: f64,
}

/// Inverted-coaxial point contact detector
///
/// Point contact at the bottom centre, borehole opened from the top face.
#[derive(Debug, Clone)]
pub struct InvertedCoax {
    pub radius: f64,
    pub height: f64,
    pub borehole_radius: f64,
    pub borehole_depth: f64,
    profile: Vec<RzPoint>,
    surfaces: Vec<SurfaceType>,
}

impl InvertedCoax {
    pub fn new(
        radius: f64,
        height: f64,
        pplus_radius: f64,
        borehole_radius: f64,
        borehole_depth: f64,
        taper: Option<Taper>,
    ) -> Result<Self> {
        require_positive("radius", radius)?;
        require_positive("height", height)?;
        require_positive("pplus_radius", pplus_radius)?;
        require_positive("borehole_radius", borehole_radius)?;
        require_positive("borehole_depth", borehole_depth)?;
        let (taper_r, taper_h) = match taper {
            Some(t) => {
                require_positive("taper radius", t.radius)?;
                require_positive("taper height", t.height)?;
                (t.radius, t.height)
            }
            None => (0.0, 0.0),
        };

        if pplus_radius >= radius {
            return Err(Error::invalid("point contact must be smaller than the crystal"));
        }
        if borehole_radius >= radius - taper_r {
            return Err(Error::invalid("borehole must fit inside the top face"));
        }
        if borehole_depth >= height || taper_h >= height {
            return Err(Error::invalid("borehole and taper must be shallower than the crystal"));
        }

        use SurfaceType::*;
        let bore_bottom = height - borehole_depth;
        let mut profile = vec![[0.0, 0.0], [pplus_radius, 0.0], [radius, 0.0]];
        let mut surfaces = vec![PPlus, Passive];
        if taper.is_some() {
            profile.push([radius, height - taper_h]);
            surfaces.push(NPlus);
        }
        profile.extend_from_slice(&[
            [radius - taper_r, height],
            [borehole_radius, height],
            [borehole_radius, bore_bottom],
            [0.0, bore_bottom],
        ]);
        surfaces.extend_from_slice(&[NPlus, NPlus, NPlus, NPlus]);

        validate_profile(&profile, &surfaces)?;
        Ok(Self {
            radius,
            height,
            borehole_radius,
            borehole_depth,
            profile,
            surfaces,
        })
    }
}

impl Solid for InvertedCoax {
    fn profile(&self) -> &[RzPoint] {
        &self.profile
    }

    fn surfaces(&self) -> &[SurfaceType] {
        &self.surfaces
    }

    fn is_inside_borehole(&self, p: &Vec3) -> bool {
        let r = p[0].hypot(p[1]);
        r < self.borehole_radius && p[2] > self.height - self.borehole_depth && p[2] < self.height
    }

    fn borehole_volume(&self) -> f64 {
        PI * self.borehole_radius * self.borehole_radius * self.borehole_depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn tapered_profile() {
        let det = InvertedCoax::new(
            40.0,
            80.0,
            5.0,
            5.0,
            50.0,
            Some(Taper {
                radius: 10.0,
                height: 20.0,
            }),
        )
        .unwrap();
        assert_eq!(det.profile().len(), 8);
        assert_eq!(det.surfaces().len(), 7);
        assert_eq!(det.segment(3), ([40.0, 60.0], [30.0, 80.0]));

        // taper removes a cone ring from the full cylinder
        let ring = PI * 20.0 / 3.0 * (40.0 * 40.0 + 40.0 * 30.0 + 30.0 * 30.0);
        let expected = PI * 1600.0 * 80.0 - PI * 25.0 * 50.0 - (PI * 1600.0 * 20.0 - ring);
        assert_relative_eq!(det.volume(), expected, max_relative = 1e-12);
    }

    #[test]
    fn invalid_dimensions() {
        assert!(InvertedCoax::new(40.0, 80.0, 50.0, 5.0, 50.0, None).is_err());
        assert!(InvertedCoax::new(40.0, 80.0, 5.0, 45.0, 50.0, None).is_err());
        assert!(InvertedCoax::new(40.0, 80.0, 5.0, 5.0, 90.0, None).is_err());
        assert!(InvertedCoax::new(-1.0, 80.0, 5.0, 5.0, 50.0, None).is_err());
    }
}
