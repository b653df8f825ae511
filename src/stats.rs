//! Order statistics and variance over pixel value sets.
//!
//! These are pure functions shared by the spatial and temporal filters.

/// Median of a value set, using the upper-middle element for even lengths
/// (index `len / 2` of the sorted values, no interpolation).
///
/// Returns 0 for an empty set; callers guard non-empty input.
pub fn median(values: &[u8]) -> u8 {
    if values.is_empty() {
        return 0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    sorted[sorted.len() / 2]
}

/// Arithmetic mean, 0.0 for an empty set.
pub fn mean(values: &[u8]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sum: u64 = values.iter().map(|&v| v as u64).sum();
    sum as f64 / values.len() as f64
}

/// Population variance `E[V^2] - E[V]^2`; 0 for empty or singleton sets.
pub fn variance(values: &[u8]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let n = values.len() as f64;
    let sum: f64 = values.iter().map(|&v| v as f64).sum();
    let sum_sq: f64 = values.iter().map(|&v| (v as f64) * (v as f64)).sum();
    let mean = sum / n;
    sum_sq / n - mean * mean
}

/// Fraction of values within `tolerance` of `center`.
///
/// Returns 0.0 for an empty set; callers with no neighbors skip the
/// similarity test entirely.
pub fn similarity_ratio(center: u8, values: &[u8], tolerance: u8) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let similar = values
        .iter()
        .filter(|&&v| (v as i16 - center as i16).unsigned_abs() <= tolerance as u16)
        .count();
    similar as f64 / values.len() as f64
}

/// Fraction of unordered value pairs that differ by at most `threshold`.
///
/// A ratio near 1.0 means the set is internally consistent and can serve as
/// a baseline for outlier tests. Returns 0.0 when fewer than two values.
pub fn pair_stability(values: &[u8], threshold: u8) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let mut similar = 0usize;
    for i in 0..n {
        for j in (i + 1)..n {
            if (values[i] as i16 - values[j] as i16).unsigned_abs() <= threshold as u16 {
                similar += 1;
            }
        }
    }
    let total_pairs = n * (n - 1) / 2;
    similar as f64 / total_pairs as f64
}

/// Alpha blend `alpha * reference + (1 - alpha) * current`, clamped to
/// [0, 255] and truncated toward zero.
///
/// Truncation (not rounding) matches the reference implementation exactly;
/// any rounding change here is a behavioral deviation.
pub fn blend(reference: f64, current: u8, alpha: f64) -> u8 {
    let result = alpha * reference + (1.0 - alpha) * current as f64;
    result.clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_odd_length() {
        assert_eq!(median(&[1, 3, 5, 7, 9]), 5);
        assert_eq!(median(&[9, 1, 5, 3, 7]), 5);
    }

    #[test]
    fn test_median_even_length_upper_middle() {
        assert_eq!(median(&[2, 4, 6, 8]), 6);
        assert_eq!(median(&[150, 140, 160, 145]), 150);
    }

    #[test]
    fn test_median_single_and_empty() {
        assert_eq!(median(&[42]), 42);
        assert_eq!(median(&[]), 0);
    }

    #[test]
    fn test_median_does_not_mutate_input() {
        let values = vec![9, 1, 5];
        let copy = values.clone();
        median(&values);
        assert_eq!(values, copy);
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[1, 2, 3, 4]), 2.5);
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn test_variance_constant_set_is_zero() {
        assert_eq!(variance(&[100, 100, 100, 100]), 0.0);
    }

    #[test]
    fn test_variance_empty_and_singleton() {
        assert_eq!(variance(&[]), 0.0);
        assert_eq!(variance(&[100]), 0.0);
    }

    #[test]
    fn test_variance_known_values() {
        assert!((variance(&[1, 2, 3, 4, 5]) - 2.0).abs() < 0.01);
        assert!((variance(&[0, 255, 0, 255]) - 16256.25).abs() < 0.01);
    }

    #[test]
    fn test_variance_order_invariant() {
        let a = variance(&[10, 200, 30, 90]);
        let b = variance(&[90, 30, 200, 10]);
        assert!((a - b).abs() < 1e-9);
    }

    #[test]
    fn test_similarity_ratio() {
        // All eight neighbors far from the 255 spike.
        assert_eq!(similarity_ratio(255, &[100; 8], 15), 0.0);
        // All neighbors within tolerance.
        assert_eq!(similarity_ratio(100, &[100, 105, 98, 102], 15), 1.0);
        // Half within tolerance.
        assert_eq!(similarity_ratio(100, &[100, 110, 200, 250], 15), 0.5);
    }

    #[test]
    fn test_pair_stability() {
        // Range 98..102 with threshold 4: every pair similar.
        assert_eq!(pair_stability(&[100, 102, 98, 101, 99], 4), 1.0);
        // Spread-out history: no similar pairs.
        assert_eq!(pair_stability(&[0, 50, 100, 150, 200], 4), 0.0);
        // Too few values to form a pair.
        assert_eq!(pair_stability(&[100], 4), 0.0);
    }

    #[test]
    fn test_blend_truncates_toward_zero() {
        // 0.6 * 11 + 0.4 * 0 = 6.6 truncates to 6.
        assert_eq!(blend(11.0, 0, 0.6), 6);
        // 0.6 * 100 + 0.4 * 150 = 120 exactly.
        assert_eq!(blend(100.0, 150, 0.6), 120);
    }

    #[test]
    fn test_blend_stays_in_range() {
        for &current in &[0u8, 1, 127, 254, 255] {
            for &reference in &[0.0, 127.5, 255.0] {
                for &alpha in &[0.0, 0.05, 0.1, 0.3, 0.7, 0.95, 1.0] {
                    let out = blend(reference, current, alpha);
                    // u8 output is the range guarantee; also check no wrap
                    // by recomputing in floating point.
                    let raw = alpha * reference + (1.0 - alpha) * current as f64;
                    assert!(raw.clamp(0.0, 255.0) as u8 == out);
                }
            }
        }
    }
}
