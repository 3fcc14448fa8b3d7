//! Log-odds arithmetic for occupancy estimates
//!
//! Occupancy is stored as log-odds `l = ln(p / (1 - p))` so that independent
//! measurements integrate by addition.

/// Convert a probability in (0, 1) to log-odds.
#[inline]
pub fn logodds(probability: f64) -> f32 {
    (probability / (1.0 - probability)).ln() as f32
}

/// Convert log-odds back to a probability.
#[inline]
pub fn probability(logodds: f32) -> f64 {
    1.0 - 1.0 / (1.0 + (logodds as f64).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn even_odds_is_zero() {
        assert_eq!(logodds(0.5), 0.0);
        assert!((probability(0.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn conversion_is_monotonic() {
        let mut previous = f32::NEG_INFINITY;
        for p in [0.05, 0.2, 0.4, 0.6, 0.8, 0.95] {
            let l = logodds(p);
            assert!(l > previous, "logodds({}) = {} should exceed {}", p, l, previous);
            assert!((probability(l) - p).abs() < 1e-6);
            previous = l;
        }
    }
}
