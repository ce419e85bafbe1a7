use super::{RzPoint, Solid, SurfaceType, require_positive, validate_profile};
use crate::{
    error::{Error, Result},
    types::Vec3,
};
use std::f64::consts::PI;

/// Semi-coaxial detector with the p+ contact lining a bore opened from the bottom
#[derive(Debug, Clone)]
pub struct SemiCoax {
    pub radius: f64,
    pub height: f64,
    pub borehole_radius: f64,
    pub borehole_depth: f64,
    profile: Vec<RzPoint>,
    surfaces: Vec<SurfaceType>,
}

impl SemiCoax {
    pub fn new(radius: f64, height: f64, borehole_radius: f64, borehole_depth: f64) -> Result<Self> {
        require_positive("radius", radius)?;
        require_positive("height", height)?;
        require_positive("borehole_radius", borehole_radius)?;
        require_positive("borehole_depth", borehole_depth)?;
        if borehole_radius >= radius || borehole_depth >= height {
            return Err(Error::invalid("borehole must fit inside the crystal"));
        }

        use SurfaceType::*;
        let profile = vec![
            [0.0, borehole_depth],
            [borehole_radius, borehole_depth],
            [borehole_radius, 0.0],
            [radius, 0.0],
            [radius, height],
            [0.0, height],
        ];
        let surfaces = vec![PPlus, PPlus, Passive, NPlus, NPlus];

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

impl Solid for SemiCoax {
    fn profile(&self) -> &[RzPoint] {
        &self.profile
    }

    fn surfaces(&self) -> &[SurfaceType] {
        &self.surfaces
    }

    fn is_inside_borehole(&self, p: &Vec3) -> bool {
        let r = p[0].hypot(p[1]);
        r < self.borehole_radius && p[2] > 0.0 && p[2] < self.borehole_depth
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
    fn bore_from_below() {
        let det = SemiCoax::new(38.0, 70.0, 6.0, 55.0).unwrap();
        assert_relative_eq!(
            det.volume(),
            PI * 38.0 * 38.0 * 70.0 - det.borehole_volume(),
            max_relative = 1e-12
        );
        assert_eq!(det.z_range(), (0.0, 70.0));
        assert!(det.is_inside_borehole(&[1.0, 1.0, 10.0]));
        assert!(!det.is_inside(&[1.0, 1.0, 10.0]));
        assert!(det.is_inside(&[1.0, 1.0, 60.0]));
    }
}
