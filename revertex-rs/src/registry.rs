//! Geometry registry: detector placements loaded from a JSON file

use crate::{
    collection::DetectorCollection,
    error::{Error, Result},
    geometry::DetectorMetadata,
    types::Vec3,
};
use glob::Pattern;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedDetector {
    pub name: String,
    /// Origin of the detector's local frame in global coordinates (mm)
    #[serde(default)]
    pub position: Vec3,
    pub metadata: DetectorMetadata,
}

/// All detectors known to a setup
///
/// ```json
/// { "detectors": [ { "name": "V00", "position": [0, 0, 0],
///                    "metadata": { "type": "icpc", ... } } ] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Registry {
    pub detectors: Vec<PlacedDetector>,
}

impl Registry {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let registry = Self::from_json(&fs::read_to_string(path)?)?;
        info!(path = %path.display(), detectors = registry.detectors.len(), "loaded geometry");
        Ok(registry)
    }

    pub fn names(&self) -> Vec<String> {
        self.detectors.iter().map(|d| d.name.clone()).collect()
    }

    /// Build the collection of detectors matching any of `patterns`.
    pub fn collection(&self, patterns: &[String]) -> Result<DetectorCollection> {
        let selected = expand_patterns(&self.names(), patterns)?;
        let mut collection = DetectorCollection::default();
        for name in selected {
            let placed = self
                .detectors
                .iter()
                .find(|d| d.name == name)
                .ok_or_else(|| Error::NoMatch(name.clone()))?;
            debug!(detector = %name, position = ?placed.position, "selected detector");
            collection.push(name, placed.metadata.build()?, placed.position)?;
        }
        Ok(collection)
    }
}

/// Compile a name pattern where only `*` and `?` are special.
///
/// Brackets are matched literally, so `V[1]` names a detector rather
/// than a character class.
fn name_pattern(pat: &str) -> Result<Pattern> {
    let mut escaped = String::with_capacity(pat.len());
    for c in pat.chars() {
        match c {
            '[' => escaped.push_str("[[]"),
            ']' => escaped.push_str("[]]"),
            _ => escaped.push(c),
        }
    }
    Ok(Pattern::new(&escaped)?)
}

/// Resolve wildcard patterns (`*`, `?`) against `names`.
///
/// Each pattern must match a whole name. Matches keep the order of
/// `names` per pattern, patterns are applied in order and duplicates are
/// dropped. A pattern matching nothing is an error.
pub fn expand_patterns(names: &[String], patterns: &[String]) -> Result<Vec<String>> {
    let mut out: Vec<String> = Vec::new();
    for pat in patterns {
        let compiled = name_pattern(pat)?;
        let mut matched = false;
        for name in names.iter().filter(|n| compiled.matches(n)) {
            matched = true;
            if !out.contains(name) {
                out.push(name.clone());
            }
        }
        if !matched {
            return Err(Error::NoMatch(pat.clone()));
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn wildcard_expansion() {
        let names = strings(&["B0", "V0", "V1", "V10"]);
        assert_eq!(expand_patterns(&names, &strings(&["B*"])).unwrap(), strings(&["B0"]));
        assert_eq!(
            expand_patterns(&names, &strings(&["V?"])).unwrap(),
            strings(&["V0", "V1"])
        );
        assert_eq!(
            expand_patterns(&names, &strings(&["V1*", "V?", "B0"])).unwrap(),
            strings(&["V1", "V10", "V0", "B0"])
        );
        // whole-name matching
        assert!(matches!(
            expand_patterns(&names, &strings(&["V"])),
            Err(Error::NoMatch(_))
        ));
    }

    #[test]
    fn brackets_are_literal() {
        let names = strings(&["V[1]", "V1", "Vx]"]);
        assert_eq!(expand_patterns(&names, &strings(&["V[1]"])).unwrap(), strings(&["V[1]"]));
        assert_eq!(
            expand_patterns(&names, &strings(&["V?]"])).unwrap(),
            strings(&["Vx]"])
        );
        assert_eq!(
            expand_patterns(&names, &strings(&["V[*"])).unwrap(),
            strings(&["V[1]"])
        );
    }

    #[test]
    fn collection_from_json() {
        let json = r#"{ "detectors": [
            { "name": "BEGe", "position": [0, 0, 100],
              "metadata": { "type": "bege", "radius": 35, "height": 30, "pplus_radius": 7.5 } },
            { "name": "ICPC", "position": [0, 120, 0],
              "metadata": { "type": "icpc", "radius": 40, "height": 80, "pplus_radius": 5,
                            "borehole_radius": 5, "borehole_depth": 50 } }
        ] }"#;
        let reg = Registry::from_json(json).unwrap();
        let all = reg.collection(&strings(&["*"])).unwrap();
        assert_eq!(all.names(), vec!["BEGe", "ICPC"]);
        assert_eq!(all.get("ICPC").unwrap().offset, [0.0, 120.0, 0.0]);

        let begs = reg.collection(&strings(&["B*"])).unwrap();
        assert_eq!(begs.len(), 1);
    }
}
