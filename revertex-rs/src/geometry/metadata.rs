use super::{Bege, Groove, InvertedCoax, SemiCoax, Solid, Taper};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Serialized description of one detector crystal (lengths in mm)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DetectorMetadata {
    Bege {
        radius: f64,
        height: f64,
        pplus_radius: f64,
        #[serde(default)]
        groove: Option<Groove>,
    },
    Icpc {
        radius: f64,
        height: f64,
        pplus_radius: f64,
        borehole_radius: f64,
        borehole_depth: f64,
        #[serde(default)]
        taper: Option<Taper>,
    },
    Coax {
        radius: f64,
        height: f64,
        borehole_radius: f64,
        borehole_depth: f64,
    },
}

impl DetectorMetadata {
    /// Validate the dimensions and build the solid
    pub fn build(&self) -> Result<Box<dyn Solid>> {
        Ok(match *self {
            DetectorMetadata::Bege {
                radius,
                height,
                pplus_radius,
                groove,
            } => Box::new(Bege::new(radius, height, pplus_radius, groove)?),
            DetectorMetadata::Icpc {
                radius,
                height,
                pplus_radius,
                borehole_radius,
                borehole_depth,
                taper,
            } => Box::new(InvertedCoax::new(
                radius,
                height,
                pplus_radius,
                borehole_radius,
                borehole_depth,
                taper,
            )?),
            DetectorMetadata::Coax {
                radius,
                height,
                borehole_radius,
                borehole_depth,
            } => Box::new(SemiCoax::new(radius, height, borehole_radius, borehole_depth)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_tagged_metadata() {
        let json = r#"{"type": "icpc", "radius": 40, "height": 80, "pplus_radius": 5,
                       "borehole_radius": 5, "borehole_depth": 50,
                       "taper": {"radius": 5, "height": 10}}"#;
        let meta: DetectorMetadata = serde_json::from_str(json).unwrap();
        let solid = meta.build().unwrap();
        assert_eq!(solid.max_radius(), 40.0);
        assert!(solid.borehole_volume() > 0.0);

        let bege: DetectorMetadata =
            serde_json::from_str(r#"{"type": "bege", "radius": 35, "height": 30, "pplus_radius": 7.5}"#)
                .unwrap();
        assert_eq!(bege.build().unwrap().borehole_volume(), 0.0);
    }

    #[test]
    fn invalid_metadata_fails_to_build() {
        let meta = DetectorMetadata::Coax {
            radius: 10.0,
            height: 10.0,
            borehole_radius: 20.0,
            borehole_depth: 5.0,
        };
        assert!(meta.build().is_err());
        assert!(serde_json::from_str::<DetectorMetadata>(r#"{"type": "cube"}"#).is_err());
    }
}
