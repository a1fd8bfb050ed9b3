//! Small statistics helpers shared by the matching and reporting stages.

/// Median of a sample set. Even-length inputs average the two middle values.
///
/// Returns 0.0 for an empty slice; callers are expected to pass at least one
/// sample.
pub fn median(values: &mut [f64]) -> f64 {
    if values.is_empty() {
        debug_assert!(false, "median of an empty sample set");
        return 0.0;
    }

    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let n = values.len();
    if n % 2 == 1 {
        values[n / 2]
    } else {
        0.5 * (values[n / 2 - 1] + values[n / 2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn odd_count_returns_middle_element() {
        let mut values = vec![5.0, 1.0, 3.0];
        assert_eq!(median(&mut values), 3.0);
    }

    #[test]
    fn even_count_averages_middle_pair() {
        let mut values = vec![4.0, 1.0, 3.0, 2.0];
        assert_eq!(median(&mut values), 2.5);
    }

    #[test]
    fn single_sample_is_its_own_median() {
        let mut values = vec![7.5];
        assert_eq!(median(&mut values), 7.5);
    }
}
