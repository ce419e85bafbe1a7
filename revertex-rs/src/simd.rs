//! Slice kernels with runtime CPU feature dispatch
//!
//! Uses `multiversion` for runtime dispatch and relies on compiler
//! auto-vectorization of the plain loops below.

use multiversion::multiversion;
use std::cmp::Ordering;

/// Sum all elements
#[multiversion(targets = "simd")]
pub fn sum_slice(values: &[f64]) -> f64 {
    values.iter().sum()
}

/// Scale all elements in place: values[i] *= scale
#[multiversion(targets = "simd")]
pub fn scale_slice(values: &mut [f64], scale: f64) {
    for v in values.iter_mut() {
        *v *= scale;
    }
}

/// Shift all elements in place: values[i] += offset
#[multiversion(targets = "simd")]
pub fn offset_slice(values: &mut [f64], offset: f64) {
    for v in values.iter_mut() {
        *v += offset;
    }
}

/// Build the inclusive prefix sum of `weights` into `cumsum`
#[multiversion(targets = "simd")]
pub fn build_prefix_sum(weights: &[f64], cumsum: &mut [f64]) {
    debug_assert_eq!(weights.len(), cumsum.len());
    let mut sum = 0.0;
    for (w, c) in weights.iter().zip(cumsum.iter_mut()) {
        sum += w;
        *c = sum;
    }
}

/// Index of the first prefix-sum entry strictly greater than `target`
///
/// Zero-width bins are never selected since their cumulative value equals
/// the previous one. Targets past the end clamp to the last index.
#[inline]
pub fn find_sample_index(cumsum: &[f64], target: f64) -> usize {
    let idx = cumsum.partition_point(|&x| {
        x.partial_cmp(&target).unwrap_or(Ordering::Less) != Ordering::Greater
    });
    idx.min(cumsum.len().saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_sum_accumulates() {
        let w = [1.0, 0.0, 2.0, 3.0];
        let mut c = [0.0; 4];
        build_prefix_sum(&w, &mut c);
        assert_eq!(c, [1.0, 1.0, 3.0, 6.0]);
    }

    #[test]
    fn index_search_skips_empty_bins() {
        let cumsum = [1.0, 1.0, 3.0, 6.0];
        assert_eq!(find_sample_index(&cumsum, 0.0), 0);
        assert_eq!(find_sample_index(&cumsum, 0.999), 0);
        assert_eq!(find_sample_index(&cumsum, 1.0), 2);
        assert_eq!(find_sample_index(&cumsum, 5.9), 3);
        assert_eq!(find_sample_index(&cumsum, 6.0), 3);
    }

    #[test]
    fn scale_and_offset() {
        let mut v = vec![1.0, 2.0, 3.0];
        scale_slice(&mut v, 2.0);
        offset_slice(&mut v, -1.0);
        assert_eq!(v, vec![1.0, 3.0, 5.0]);
        assert_eq!(sum_slice(&v), 9.0);
    }
}
