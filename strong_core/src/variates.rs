//! Distribution-shaped values on top of any uniform generator.
//!
//! These are the everyday helpers callers reach for once they hold a
//! strong source: bounded integers, unit floats, exponential and normal
//! variates, coin flips and permutations. Bounded integers use `rand`'s
//! rejection sampling, never modulo reduction.

use rand::Rng;
use rand::distributions::Standard;
use rand::seq::SliceRandom;
use rand_distr::{Distribution, Exp1, StandardNormal};

use crate::error::VariateError;

/// Uniform integer in `[0, n)`.
pub fn intn<R: Rng + ?Sized>(rng: &mut R, n: u64) -> Result<u64, VariateError> {
    if n == 0 {
        return Err(VariateError::EmptyRange { bound: 0 });
    }
    Ok(rng.gen_range(0..n))
}

/// Uniform non-negative integer in `[0, n)`.
pub fn int63n<R: Rng + ?Sized>(rng: &mut R, n: i64) -> Result<i64, VariateError> {
    if n <= 0 {
        return Err(VariateError::EmptyRange { bound: n.into() });
    }
    Ok(rng.gen_range(0..n))
}

/// Uniform float in `[0, 1)`.
pub fn float64<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.sample(Standard)
}

/// Exponentially distributed with rate 1.
///
/// Scale by `1 / lambda` for another rate.
pub fn exp_float64<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    Exp1.sample(rng)
}

/// Normally distributed with mean 0 and standard deviation 1.
pub fn norm_float64<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    StandardNormal.sample(rng)
}

/// `true` with probability `p`.
///
/// Out-of-range probabilities saturate and NaN is never true.
pub fn bernoulli<R: Rng + ?Sized>(rng: &mut R, p: f64) -> bool {
    float64(rng) < p
}

/// A uniformly random permutation of `0..n`.
pub fn perm<R: Rng + ?Sized>(rng: &mut R, n: usize) -> Vec<usize> {
    let mut items: Vec<usize> = (0..n).collect();
    items.shuffle(rng);
    items
}

pub fn shuffle<R: Rng + ?Sized, T>(rng: &mut R, items: &mut [T]) {
    items.shuffle(rng);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::new_source;
    use proptest::prelude::*;

    #[test]
    fn empty_ranges_are_rejected() {
        let mut rng = new_source();
        assert_eq!(
            intn(&mut rng, 0),
            Err(VariateError::EmptyRange { bound: 0 })
        );
        assert_eq!(
            int63n(&mut rng, -5),
            Err(VariateError::EmptyRange { bound: -5 })
        );
        assert!(int63n(&mut rng, 0).is_err());
    }

    #[test]
    fn unit_bound_always_yields_zero() {
        let mut rng = new_source();
        for _ in 0..32 {
            assert_eq!(intn(&mut rng, 1).unwrap(), 0);
            assert_eq!(int63n(&mut rng, 1).unwrap(), 0);
        }
    }

    #[test]
    fn floats_stay_in_unit_interval() {
        let mut rng = new_source();
        for _ in 0..1000 {
            let x = float64(&mut rng);
            assert!((0.0..1.0).contains(&x), "{x} out of range");
        }
    }

    #[test]
    fn exp_and_norm_are_finite() {
        let mut rng = new_source();
        for _ in 0..1000 {
            let e = exp_float64(&mut rng);
            assert!(e.is_finite() && e >= 0.0, "{e} is not a valid Exp(1) draw");
            assert!(norm_float64(&mut rng).is_finite());
        }
    }

    #[test]
    fn bernoulli_saturates_at_the_edges() {
        let mut rng = new_source();
        for _ in 0..256 {
            assert!(!bernoulli(&mut rng, 0.0));
            assert!(!bernoulli(&mut rng, -1.0));
            assert!(!bernoulli(&mut rng, f64::NAN));
            assert!(bernoulli(&mut rng, 1.0));
            assert!(bernoulli(&mut rng, 2.0));
        }
    }

    #[test]
    fn perm_is_a_permutation() {
        let mut rng = new_source();
        let mut p = perm(&mut rng, 100);
        p.sort_unstable();
        assert_eq!(p, (0..100).collect::<Vec<_>>());
        assert!(perm(&mut rng, 0).is_empty());
    }

    #[test]
    fn shuffle_keeps_elements() {
        let mut rng = new_source();
        let mut items = vec!['a', 'b', 'c', 'd', 'e'];
        shuffle(&mut rng, &mut items);
        items.sort_unstable();
        assert_eq!(items, vec!['a', 'b', 'c', 'd', 'e']);
    }

    proptest! {
        #[test]
        fn bounded_draws_stay_below_bound(n in 1u64..=u64::MAX, m in 1i64..=i64::MAX) {
            let mut rng = new_source();
            prop_assert!(intn(&mut rng, n).unwrap() < n);
            let v = int63n(&mut rng, m).unwrap();
            prop_assert!((0..m).contains(&v));
        }
    }
}
