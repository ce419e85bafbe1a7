use crate::consts::SEED_PERTURBATION;
use isaac_rs::Isaac;
use rand::Rng;

/// Use the caller's seed or draw a fresh one from the thread generator.
///
/// Resolving once up front keeps every later perturbation reproducible
/// from the value that ends up in the log.
#[inline]
pub fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| rand::rng().random())
}

/// Next seed in a derived sequence: `7 * seed + 1` (wrapping).
///
/// The map has no fixed point and no cycle shorter than 2^62, so seed 0
/// moves on like any other.
#[inline]
pub fn perturb_seed(seed: u64) -> u64 {
    seed.wrapping_mul(SEED_PERTURBATION).wrapping_add(1)
}

pub fn seeded_rng(seed: Option<u64>) -> Isaac {
    Isaac::new(resolve_seed(seed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perturbation_is_deterministic() {
        assert_eq!(perturb_seed(3), 22);
        assert_eq!(perturb_seed(perturb_seed(3)), 155);
        assert_eq!(perturb_seed(0), 1);
        assert_ne!(perturb_seed(perturb_seed(0)), 0);
        // wraps instead of overflowing
        let _ = perturb_seed(u64::MAX);
    }

    #[test]
    fn explicit_seed_is_kept() {
        assert_eq!(resolve_seed(Some(12)), 12);
    }
}
