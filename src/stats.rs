//! Summary statistics for the diagnostic report.
//!
//! All helpers take `f64` slices; integer series (sequence lengths) are
//! converted by the caller.

/// Sum with Kahan's compensation, to keep long low-magnitude tails from
/// being swallowed by a large running total.
pub fn kahan_sum(xs: &[f64]) -> f64 {
    let mut sum = 0.0;
    let mut c = 0.0;
    for &x in xs {
        let y = x - c;
        let t = sum + y;
        c = (t - sum) - y;
        sum = t;
    }
    sum
}

pub fn mean(xs: &[f64]) -> f64 {
    kahan_sum(xs) / xs.len() as f64
}

/// Median of the values. For odd lengths this is the middle element of the
/// sorted data; for even lengths, the mean of the two middle elements.
pub fn median(xs: &[f64]) -> f64 {
    let mut tmp = xs.to_vec();
    tmp.sort_by(|a, b| a.partial_cmp(b).expect("median of NaN-free data"));

    let n = tmp.len();
    if n % 2 == 0 {
        (tmp[n / 2 - 1] + tmp[n / 2]) / 2.0
    } else {
        tmp[n / 2]
    }
}

/// Variance via the shifted-data formula (first element as shift constant).
/// `sample` selects the n-1 denominator. Returns 0 for fewer than 2 values.
pub fn variance(xs: &[f64], sample: bool) -> f64 {
    if xs.len() < 2 {
        return 0.0;
    }

    let k = xs[0];
    let mut ex = 0.0;
    let mut ex2 = 0.0;
    for &x in xs {
        ex += x - k;
        ex2 += (x - k).powi(2);
    }

    let n = xs.len() as f64;
    let denom = if sample { n - 1.0 } else { n };
    (ex2 - ex.powi(2) / n) / denom
}

pub fn minimum(xs: &[f64]) -> f64 {
    xs.iter().copied().fold(f64::INFINITY, f64::min)
}

pub fn maximum(xs: &[f64]) -> f64 {
    xs.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_kahan_sum_compensates() {
        // 1 followed by many tiny values that naive summation can drop
        let mut xs = vec![1.0];
        xs.extend(std::iter::repeat(1e-16).take(10_000));
        assert_abs_diff_eq!(kahan_sum(&xs), 1.0 + 1e-12, epsilon = 1e-15);
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[1.0, 2.0, 3.0, 4.0]), 2.5);
    }

    #[test]
    fn test_median_odd() {
        assert_eq!(median(&[5.0, 1.0, 3.0]), 3.0);
        assert_eq!(median(&[7.0]), 7.0);
    }

    #[test]
    fn test_median_even() {
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
        assert_eq!(median(&[1.0, 2.0]), 1.5);
    }

    #[test]
    fn test_variance() {
        let xs = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_abs_diff_eq!(variance(&xs, false), 4.0, epsilon = 1e-12);
        assert_abs_diff_eq!(variance(&xs, true), 32.0 / 7.0, epsilon = 1e-12);
        assert_eq!(variance(&[1.0], false), 0.0);
    }

    #[test]
    fn test_extremes() {
        let xs = [3.0, -1.0, 7.5, 0.0];
        assert_eq!(minimum(&xs), -1.0);
        assert_eq!(maximum(&xs), 7.5);
    }
}
