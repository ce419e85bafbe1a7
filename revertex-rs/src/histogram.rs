//! Piecewise-uniform sampling from binned densities
//!
//! A [`Histogram`] is treated as a probability density that is constant
//! inside each bin. Sampling first picks a bin with probability
//! proportional to its weight and then places the value uniformly within
//! the bin along every axis.

use crate::{
    categorical::Categorical,
    error::{Error, Result},
};
use rand::Rng;
use tracing::trace;

/// N-dimensional histogram with explicit bin edges and row-major weights
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    axes: Vec<Vec<f64>>,
    weights: Vec<f64>,
}

impl Histogram {
    /// Build a histogram from per-axis edges and flat row-major weights.
    ///
    /// Every axis needs at least two strictly increasing finite edges and
    /// `weights.len()` must equal the product of the per-axis bin counts.
    pub fn new(axes: Vec<Vec<f64>>, weights: Vec<f64>) -> Result<Self> {
        for (i, edges) in axes.iter().enumerate() {
            if edges.len() < 2 {
                return Err(Error::invalid(format!(
                    "axis {} needs at least two bin edges, got {}",
                    i,
                    edges.len()
                )));
            }
            if edges.iter().any(|e| !e.is_finite()) {
                return Err(Error::invalid(format!("axis {} has non-finite edges", i)));
            }
            if edges.windows(2).any(|w| w[1] <= w[0]) {
                return Err(Error::invalid(format!(
                    "axis {} edges must be strictly increasing",
                    i
                )));
            }
        }

        let nbins: usize = axes.iter().map(|e| e.len() - 1).product();
        if weights.len() != nbins {
            return Err(Error::LengthMismatch {
                what: "histogram weights",
                expected: nbins,
                found: weights.len(),
            });
        }
        if let Some(w) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(Error::invalid(format!(
                "histogram weights must be finite and non-negative, found {}",
                w
            )));
        }

        Ok(Self { axes, weights })
    }

    /// One-dimensional histogram from edges and per-bin weights
    pub fn from_edges(edges: Vec<f64>, weights: Vec<f64>) -> Result<Self> {
        Self::new(vec![edges], weights)
    }

    /// Empty 1D histogram with `bins` equal bins over `[lo, hi)`
    pub fn regular(bins: usize, lo: f64, hi: f64) -> Result<Self> {
        Self::new(vec![regular_edges(bins, lo, hi)?], vec![0.0; bins])
    }

    /// Empty 2D histogram with equal bins along both axes
    pub fn regular_2d(
        xbins: usize,
        xlo: f64,
        xhi: f64,
        ybins: usize,
        ylo: f64,
        yhi: f64,
    ) -> Result<Self> {
        Self::new(
            vec![regular_edges(xbins, xlo, xhi)?, regular_edges(ybins, ylo, yhi)?],
            vec![0.0; xbins * ybins],
        )
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        self.axes.len()
    }

    #[inline]
    pub fn edges(&self, axis: usize) -> &[f64] {
        &self.axes[axis]
    }

    #[inline]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Number of bins along each axis
    pub fn shape(&self) -> Vec<usize> {
        self.axes.iter().map(|e| e.len() - 1).collect()
    }

    pub fn total(&self) -> f64 {
        self.weights.iter().sum()
    }

    /// Add one unit of weight per value; values outside the edges are dropped.
    pub fn fill(&mut self, values: &[f64]) -> Result<()> {
        if self.ndim() != 1 {
            return Err(Error::invalid(format!(
                "fill needs a 1D histogram, this one is {}D",
                self.ndim()
            )));
        }
        for &v in values {
            if let Some(i) = bin_index(&self.axes[0], v) {
                self.weights[i] += 1.0;
            }
        }
        Ok(())
    }

    /// Add one unit of weight per (x, y) pair; pairs outside the edges are dropped.
    pub fn fill_2d(&mut self, xs: &[f64], ys: &[f64]) -> Result<()> {
        if self.ndim() != 2 {
            return Err(Error::invalid(format!(
                "fill_2d needs a 2D histogram, this one is {}D",
                self.ndim()
            )));
        }
        if xs.len() != ys.len() {
            return Err(Error::LengthMismatch {
                what: "fill_2d coordinates",
                expected: xs.len(),
                found: ys.len(),
            });
        }
        let ncols = self.axes[1].len() - 1;
        for (&x, &y) in xs.iter().zip(ys) {
            if let (Some(row), Some(col)) = (bin_index(&self.axes[0], x), bin_index(&self.axes[1], y)) {
                self.weights[row * ncols + col] += 1.0;
            }
        }
        Ok(())
    }
}

fn regular_edges(bins: usize, lo: f64, hi: f64) -> Result<Vec<f64>> {
    if bins == 0 || !(hi > lo) {
        return Err(Error::invalid(format!(
            "need at least one bin and lo < hi, got {} bins over [{}, {})",
            bins, lo, hi
        )));
    }
    let width = (hi - lo) / bins as f64;
    let mut edges: Vec<f64> = (0..bins).map(|i| lo + i as f64 * width).collect();
    edges.push(hi);
    Ok(edges)
}

/// Bin containing `v` under half-open `[lo, hi)` bins
fn bin_index(edges: &[f64], v: f64) -> Option<usize> {
    if !(v >= edges[0] && v < edges[edges.len() - 1]) {
        return None;
    }
    Some(edges.partition_point(|&e| e <= v) - 1)
}

/// Draw `size` samples from a 1D or 2D histogram.
///
/// Returns one column per axis, each of length `size`.
pub fn sample_histogram<R: Rng + ?Sized>(
    histo: &Histogram,
    size: usize,
    rng: &mut R,
) -> Result<Vec<Vec<f64>>> {
    let ndim = histo.ndim();
    if !(1..=2).contains(&ndim) {
        return Err(Error::UnsupportedDimension(ndim));
    }
    trace!(ndim, size, "sampling histogram");

    let bins = Categorical::new(histo.weights())?;
    let flat = bins.sample_n(size, rng);

    let columns = match ndim {
        1 => {
            let edges = histo.edges(0);
            vec![flat.iter().map(|&i| jitter(edges, i, rng)).collect()]
        }
        _ => {
            let ncols = histo.edges(1).len() - 1;
            let mut xs = Vec::with_capacity(size);
            let mut ys = Vec::with_capacity(size);
            for &idx in &flat {
                xs.push(jitter(histo.edges(0), idx / ncols, rng));
                ys.push(jitter(histo.edges(1), idx % ncols, rng));
            }
            vec![xs, ys]
        }
    };

    Ok(columns)
}

/// Seeded convenience wrapper around [`sample_histogram`]
pub fn sample_histogram_seeded(
    histo: &Histogram,
    size: usize,
    seed: Option<u64>,
) -> Result<Vec<Vec<f64>>> {
    let mut rng = crate::utils::seeded_rng(seed);
    sample_histogram(histo, size, &mut rng)
}

#[inline]
fn jitter<R: Rng + ?Sized>(edges: &[f64], bin: usize, rng: &mut R) -> f64 {
    let lo = edges[bin];
    let width = edges[bin + 1] - lo;
    lo + rng.random::<f64>() * width
}
