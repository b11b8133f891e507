//! Integer search used to pick a line-wrap threshold
//!
//! The search brackets the target by doubling (or halving) the initial
//! guess and then binary-searches inside the bracket.

use crate::types::{CardError, Result};
use log::debug;
use std::cmp::Ordering;

/// Upper bound on the number of doublings while bracketing upward
pub const MAX_EXPANSIONS: u32 = 64;

/// Outcome of probing one candidate value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assessment {
    /// `Less` means the value undershoots the target, `Greater` overshoots,
    /// `Equal` is an exact hit.
    pub direction: Ordering,
    /// Whether the value can be used if no exact hit is found
    pub acceptable: bool,
}

impl Assessment {
    pub fn new(direction: Ordering, acceptable: bool) -> Self {
        Self {
            direction,
            acceptable,
        }
    }
}

/// Search the positive integers for a value the assessment accepts.
///
/// Returns the first exact hit, otherwise the most recently probed acceptable
/// value, otherwise `NotFound`.
pub fn optimise<F>(initial_guess: u64, mut assess: F) -> Result<u64>
where
    F: FnMut(u64) -> Assessment,
{
    let mut best: Option<u64> = None;
    let mut probe = |value: u64, best: &mut Option<u64>| {
        let a = assess(value);
        if a.acceptable {
            *best = Some(value);
        }
        a.direction
    };

    let guess = initial_guess.max(1);
    let (mut lo, mut hi) = match probe(guess, &mut best) {
        Ordering::Equal => return Ok(guess),
        Ordering::Less => {
            let mut hi = guess.saturating_mul(2).max(1);
            let mut expansions = 0;
            loop {
                match probe(hi, &mut best) {
                    Ordering::Equal => return Ok(hi),
                    Ordering::Greater => break,
                    Ordering::Less => {}
                }
                expansions += 1;
                if expansions >= MAX_EXPANSIONS || hi == u64::MAX {
                    break;
                }
                hi = hi.saturating_mul(2);
            }
            (guess, hi)
        }
        Ordering::Greater => {
            let mut lo = (guess / 2).max(1);
            loop {
                match probe(lo, &mut best) {
                    Ordering::Equal => return Ok(lo),
                    Ordering::Less => break,
                    Ordering::Greater => {}
                }
                if lo == 1 {
                    break;
                }
                lo = (lo / 2).max(1);
            }
            (lo, guess)
        }
    };
    debug!("optimise: bracketed between {} and {}", lo, hi);

    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        match probe(mid, &mut best) {
            Ordering::Equal => return Ok(mid),
            Ordering::Less => lo = mid + 1,
            Ordering::Greater => hi = mid.saturating_sub(1).max(1),
        }
        if hi < lo {
            break;
        }
    }

    if probe(lo, &mut best) == Ordering::Equal {
        return Ok(lo);
    }

    best.ok_or_else(|| CardError::NotFound("Could not find an acceptable value".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exact(target: u64) -> impl FnMut(u64) -> Assessment {
        move |v| Assessment::new(v.cmp(&target), v == target)
    }

    #[test]
    fn test_initial_guess_exact() {
        let mut calls = 0;
        let result = optimise(42, |v| {
            calls += 1;
            Assessment::new(v.cmp(&42), v == 42)
        });
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_converges_from_below_and_above() {
        assert_eq!(optimise(5, exact(42)).unwrap(), 42);
        assert_eq!(optimise(100, exact(42)).unwrap(), 42);
        assert_eq!(optimise(1, exact(1)).unwrap(), 1);
        assert_eq!(optimise(1000, exact(3)).unwrap(), 3);
    }

    #[test]
    fn test_acceptable_range_without_exact_hit() {
        // Values 10..=15 are acceptable, larger is overshoot, smaller undershoot
        let assess = |v: u64| {
            let direction = if v < 10 {
                Ordering::Less
            } else if v > 15 {
                Ordering::Greater
            } else {
                Ordering::Less
            };
            Assessment::new(direction, (10..=15).contains(&v))
        };
        let found = optimise(3, assess).unwrap();
        assert!((10..=15).contains(&found), "found {}", found);
        let found = optimise(200, assess).unwrap();
        assert!((10..=15).contains(&found), "found {}", found);
    }

    #[test]
    fn test_nothing_acceptable() {
        // Everything is too large
        let result = optimise(20, |_| Assessment::new(Ordering::Greater, false));
        assert!(matches!(result, Err(CardError::NotFound(_))));
    }

    #[test]
    fn test_zero_guess_is_clamped() {
        assert_eq!(optimise(0, exact(7)).unwrap(), 7);
    }
}
