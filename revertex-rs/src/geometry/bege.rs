use super::{RzPoint, Solid, SurfaceType, require_positive, validate_profile};
use crate::{
    error::{Error, Result},
    types::Vec3,
};
use serde::{Deserialize, Serialize};

/// Annular groove around the point contact
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Groove {
    pub depth: f64,
    pub outer_radius: f64,
}

/// Broad-energy detector: a plain cylinder with a small bottom contact
#[derive(Debug, Clone)]
pub struct Bege {
    pub radius: f64,
    pub height: f64,
    profile: Vec<RzPoint>,
    surfaces: Vec<SurfaceType>,
}

impl Bege {
    pub fn new(radius: f64, height: f64, pplus_radius: f64, groove: Option<Groove>) -> Result<Self> {
        require_positive("radius", radius)?;
        require_positive("height", height)?;
        require_positive("pplus_radius", pplus_radius)?;
        if pplus_radius >= radius {
            return Err(Error::invalid("point contact must be smaller than the crystal"));
        }

        use SurfaceType::*;
        let mut profile = vec![[0.0, 0.0], [pplus_radius, 0.0]];
        let mut surfaces = vec![PPlus];
        match groove {
            Some(g) => {
                require_positive("groove depth", g.depth)?;
                if !(g.outer_radius > pplus_radius && g.outer_radius < radius) || g.depth >= height {
                    return Err(Error::invalid(
                        "groove must sit between the contact and the crystal edge",
                    ));
                }
                profile.extend_from_slice(&[
                    [pplus_radius, g.depth],
                    [g.outer_radius, g.depth],
                    [g.outer_radius, 0.0],
                    [radius, 0.0],
                ]);
                surfaces.extend_from_slice(&[Passive, Passive, Passive, NPlus]);
            }
            None => {
                profile.push([radius, 0.0]);
                surfaces.push(Passive);
            }
        }
        profile.extend_from_slice(&[[radius, height], [0.0, height]]);
        surfaces.extend_from_slice(&[NPlus, NPlus]);

        validate_profile(&profile, &surfaces)?;
        Ok(Self {
            radius,
            height,
            profile,
            surfaces,
        })
    }
}

impl Solid for Bege {
    fn profile(&self) -> &[RzPoint] {
        &self.profile
    }

    fn surfaces(&self) -> &[SurfaceType] {
        &self.surfaces
    }

    fn is_inside_borehole(&self, _p: &Vec3) -> bool {
        false
    }

    fn borehole_volume(&self) -> f64 {
        0.0
    }
}
