//! Named detectors with their placement in the global frame

use crate::{
    error::{Error, Result},
    geometry::Solid,
    types::Vec3,
};
use std::collections::BTreeMap;

#[derive(Debug)]
pub struct DetectorEntry {
    pub name: String,
    pub solid: Box<dyn Solid>,
    /// Local-to-global translation
    pub offset: Vec3,
}

/// Ordered set of detectors, each with exactly one offset
#[derive(Debug, Default)]
pub struct DetectorCollection {
    entries: Vec<DetectorEntry>,
}

impl DetectorCollection {
    /// Pair solids with offsets by name.
    ///
    /// Fails unless both inputs name exactly the same detectors. The order
    /// of `solids` is kept.
    pub fn new(solids: Vec<(String, Box<dyn Solid>)>, offsets: &BTreeMap<String, Vec3>) -> Result<Self> {
        if solids.len() != offsets.len() {
            return Err(Error::KeyMismatch(format!(
                "{} detectors but {} offsets",
                solids.len(),
                offsets.len()
            )));
        }
        let mut collection = Self::default();
        for (name, solid) in solids {
            let offset = *offsets
                .get(&name)
                .ok_or_else(|| Error::KeyMismatch(format!("no offset for detector '{}'", name)))?;
            collection.push(name, solid, offset)?;
        }
        Ok(collection)
    }

    /// Collection holding a single detector
    pub fn single(name: &str, solid: Box<dyn Solid>, offset: Vec3) -> Self {
        Self {
            entries: vec![DetectorEntry {
                name: name.to_string(),
                solid,
                offset,
            }],
        }
    }

    pub fn push(&mut self, name: String, solid: Box<dyn Solid>, offset: Vec3) -> Result<()> {
        if self.entries.iter().any(|e| e.name == name) {
            return Err(Error::KeyMismatch(format!("duplicate detector '{}'", name)));
        }
        self.entries.push(DetectorEntry { name, solid, offset });
        Ok(())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[DetectorEntry] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&DetectorEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }
}
