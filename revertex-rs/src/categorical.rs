use crate::{
    error::{Error, Result},
    simd::{build_prefix_sum, find_sample_index},
};
use rand::Rng;

/// Categorical distribution over `0..weights.len()`
///
/// Draws by inverting the cumulative weights: one uniform variate scaled
/// to the total, then a binary search over the prefix sum.
#[derive(Debug, Clone)]
pub struct Categorical {
    cumsum: Vec<f64>,
    total: f64,
    last_nonzero: usize,
}

impl Categorical {
    pub fn new(weights: &[f64]) -> Result<Self> {
        if weights.is_empty() {
            return Err(Error::DegenerateWeights("no categories to choose from".into()));
        }
        if let Some(bad) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(Error::DegenerateWeights(format!(
                "weights must be finite and non-negative, found {}",
                bad
            )));
        }

        let mut cumsum = vec![0.0; weights.len()];
        build_prefix_sum(weights, &mut cumsum);
        let total = cumsum[cumsum.len() - 1];
        if total <= 0.0 {
            return Err(Error::DegenerateWeights("weights sum to zero".into()));
        }

        // a target rounding up to `total` must not land in a trailing empty bin
        let last_nonzero = weights.iter().rposition(|&w| w > 0.0).unwrap_or(0);

        Ok(Self {
            cumsum,
            total,
            last_nonzero,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cumsum.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cumsum.is_empty()
    }

    /// Normalized probability of each category
    pub fn probabilities(&self) -> Vec<f64> {
        let inv_total = 1.0 / self.total;
        let mut prev = 0.0;
        self.cumsum
            .iter()
            .map(|&c| {
                let p = (c - prev) * inv_total;
                prev = c;
                p
            })
            .collect()
    }

    #[inline]
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let target = rng.random::<f64>() * self.total;
        find_sample_index(&self.cumsum, target).min(self.last_nonzero)
    }

    pub fn sample_n<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<usize> {
        (0..n).map(|_| self.sample(rng)).collect()
    }
}

/// Number of draws that landed on each of `k` categories
pub fn bincount(indices: &[usize], k: usize) -> Vec<usize> {
    let mut counts = vec![0usize; k];
    for &i in indices {
        counts[i] += 1;
    }
    counts
}
