use crate::{
    error::Result,
    output::{Column, Table},
    simd::{offset_slice, scale_slice},
};

pub type Vec3 = [f64; 3];

/// Structure-of-arrays batch of vertex positions
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Positions {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
}

impl Positions {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            x: Vec::with_capacity(n),
            y: Vec::with_capacity(n),
            z: Vec::with_capacity(n),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    #[inline]
    pub fn get(&self, i: usize) -> Vec3 {
        [self.x[i], self.y[i], self.z[i]]
    }

    #[inline]
    pub fn push(&mut self, p: Vec3) {
        self.x.push(p[0]);
        self.y.push(p[1]);
        self.z.push(p[2]);
    }

    pub fn extend_from(&mut self, other: &Positions) {
        self.x.extend_from_slice(&other.x);
        self.y.extend_from_slice(&other.y);
        self.z.extend_from_slice(&other.z);
    }

    pub fn truncate(&mut self, n: usize) {
        self.x.truncate(n);
        self.y.truncate(n);
        self.z.truncate(n);
    }

    /// Move every point by `offset` (local to global frame)
    pub fn translate(&mut self, offset: Vec3) {
        offset_slice(&mut self.x, offset[0]);
        offset_slice(&mut self.y, offset[1]);
        offset_slice(&mut self.z, offset[2]);
    }

    pub fn scale(&mut self, factor: f64) {
        scale_slice(&mut self.x, factor);
        scale_slice(&mut self.y, factor);
        scale_slice(&mut self.z, factor);
    }

    pub fn iter(&self) -> impl Iterator<Item = Vec3> + '_ {
        (0..self.len()).map(|i| self.get(i))
    }

    /// Keep only the points for which `keep` holds
    pub fn retain(&self, mut keep: impl FnMut(&Vec3) -> bool) -> Positions {
        let mut out = Positions::default();
        for p in self.iter() {
            if keep(&p) {
                out.push(p);
            }
        }
        out
    }

    /// Unitless `xloc, yloc, zloc` table
    pub fn to_table(&self) -> Result<Table> {
        Table::from_columns(vec![
            Column::f64("xloc", self.x.clone()),
            Column::f64("yloc", self.y.clone()),
            Column::f64("zloc", self.z.clone()),
        ])
    }
}

impl FromIterator<Vec3> for Positions {
    fn from_iter<I: IntoIterator<Item = Vec3>>(iter: I) -> Self {
        let mut out = Positions::default();
        for p in iter {
            out.push(p);
        }
        out
    }
}

/// Structure-of-arrays batch of primary particle kinematics
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Kinematics {
    pub px: Vec<f64>,
    pub py: Vec<f64>,
    pub pz: Vec<f64>,
    pub ekin: Vec<f64>,
    pub pid: Vec<i64>,
}

impl Kinematics {
    #[inline]
    pub fn len(&self) -> usize {
        self.ekin.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ekin.is_empty()
    }

    #[inline]
    pub fn momentum(&self, i: usize) -> Vec3 {
        [self.px[i], self.py[i], self.pz[i]]
    }

    /// Unitless `px, py, pz, ekin, g4_pid` table
    pub fn to_table(&self) -> Result<Table> {
        Table::from_columns(vec![
            Column::f64("px", self.px.clone()),
            Column::f64("py", self.py.clone()),
            Column::f64("pz", self.pz.clone()),
            Column::f64("ekin", self.ekin.clone()),
            Column::i64("g4_pid", self.pid.clone()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translate_and_truncate() {
        let mut p: Positions = vec![[0.0, 0.0, 0.0], [1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]
            .into_iter()
            .collect();
        p.translate([10.0, 20.0, 30.0]);
        assert_eq!(p.get(1), [11.0, 22.0, 33.0]);
        p.truncate(2);
        assert_eq!(p.len(), 2);
        assert_eq!(p.to_table().unwrap().rows(), 2);
    }

    #[test]
    fn retain_filters_points() {
        let p: Positions = (0..10).map(|i| [i as f64, 0.0, 0.0]).collect();
        let even = p.retain(|q| q[0] as i64 % 2 == 0);
        assert_eq!(even.len(), 5);
        assert_eq!(even.get(4), [8.0, 0.0, 0.0]);
    }
}
