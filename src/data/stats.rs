//! Summary statistics used by the figure builder
//!
//! - Pearson correlation for the upper-triangle annotations
//! - Gaussian kernel density estimate (Scott bandwidth) for the diagonal
//! - Evenly spaced tick positions and their labels

/// Arithmetic mean (NaN for an empty slice)
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation with one delta degree of freedom
///
/// Returns NaN for fewer than two values.
pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    (ss / (values.len() - 1) as f64).sqrt()
}

/// Pearson correlation coefficient of two equally long series
///
/// Returns NaN when the lengths differ, fewer than two values are given,
/// or either series has zero variance.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.len() < 2 {
        return f64::NAN;
    }

    let mx = mean(x);
    let my = mean(y);

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (a, b) in x.iter().zip(y) {
        let dx = a - mx;
        let dy = b - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    let denom = (sxx * syy).sqrt();
    if denom == 0.0 {
        return f64::NAN;
    }
    (sxy / denom).clamp(-1.0, 1.0)
}

/// Scott's rule bandwidth: `std * n^(-1/5)`
pub fn scott_bandwidth(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    sample_std(values) * n.powf(-0.2)
}

/// `n` evenly spaced values from `lo` to `hi` inclusive
pub fn linspace(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![lo],
        _ => {
            let step = (hi - lo) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { hi } else { lo + step * i as f64 })
                .collect()
        }
    }
}

/// Evaluated Gaussian kernel density estimate
#[derive(Debug, Clone, PartialEq)]
pub struct DensityCurve {
    /// Evaluation points
    pub xs: Vec<f64>,
    /// Density at each evaluation point
    pub densities: Vec<f64>,
    /// Bandwidth used (Scott bandwidth times the adjustment)
    pub bandwidth: f64,
}

impl DensityCurve {
    pub fn support(&self) -> Option<(f64, f64)> {
        Some((*self.xs.first()?, *self.xs.last()?))
    }

    pub fn max_density(&self) -> f64 {
        self.densities.iter().copied().fold(0.0, f64::max)
    }

    pub fn points(&self) -> Vec<(f64, f64)> {
        self.xs
            .iter()
            .copied()
            .zip(self.densities.iter().copied())
            .collect()
    }
}

/// Gaussian KDE evaluated on `grid_size` points spanning
/// `[min - cut * bw, max + cut * bw]`
///
/// Returns None when the bandwidth is degenerate (fewer than two values or
/// constant data), in which case no curve can be drawn.
pub fn gaussian_kde(
    values: &[f64],
    grid_size: usize,
    cut: f64,
    bw_adjust: f64,
) -> Option<DensityCurve> {
    let bandwidth = scott_bandwidth(values) * bw_adjust;
    if !bandwidth.is_finite() || bandwidth <= 0.0 || grid_size < 2 {
        return None;
    }

    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let xs = linspace(lo - cut * bandwidth, hi + cut * bandwidth, grid_size);
    let norm = 1.0 / (values.len() as f64 * bandwidth * (2.0 * std::f64::consts::PI).sqrt());

    let densities = xs
        .iter()
        .map(|&x| {
            let sum: f64 = values
                .iter()
                .map(|&v| {
                    let z = (x - v) / bandwidth;
                    (-0.5 * z * z).exp()
                })
                .sum();
            sum * norm
        })
        .collect();

    Some(DensityCurve {
        xs,
        densities,
        bandwidth,
    })
}

/// Format tick values with the smallest common number of decimals that
/// represents every value exactly (up to 6 decimals)
pub fn format_tick_labels(values: &[f64]) -> Vec<String> {
    let decimals = (0..=6)
        .find(|&d| {
            let scale = 10f64.powi(d);
            values
                .iter()
                .all(|v| ((v * scale).round() / scale - v).abs() < 1e-9)
        })
        .unwrap_or(6) as usize;

    values.iter().map(|v| format!("{:.*}", decimals, v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn test_mean_and_std() {
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!(close(mean(&v), 5.0, 1e-12));
        // ddof = 1
        assert!(close(sample_std(&v), 2.138089935299395, 1e-12));
        assert!(sample_std(&[1.0]).is_nan());
        assert!(mean(&[]).is_nan());
    }

    #[test]
    fn test_pearson_perfect_and_symmetric() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 4.0, 6.0, 8.0, 10.0];
        let z = [5.0, 4.0, 3.0, 2.0, 1.0];

        assert!(close(pearson(&x, &y), 1.0, 1e-12));
        assert!(close(pearson(&x, &z), -1.0, 1e-12));

        let a = [0.1, 0.7, 0.3, 0.9, 0.2];
        let b = [0.5, 0.4, 0.8, 0.1, 0.6];
        assert_eq!(pearson(&a, &b), pearson(&b, &a));
    }

    #[test]
    fn test_pearson_known_value() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [1.0, 3.0, 2.0, 4.0];
        assert!(close(pearson(&x, &y), 0.8, 1e-12));
    }

    #[test]
    fn test_pearson_degenerate() {
        assert!(pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]).is_nan());
        assert!(pearson(&[1.0, 2.0], &[1.0]).is_nan());
        assert!(pearson(&[1.0], &[1.0]).is_nan());
    }

    #[test]
    fn test_linspace() {
        assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(linspace(3.0, 4.0, 1), vec![3.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn test_kde_integrates_to_one() {
        let values: Vec<f64> = (0..50).map(|i| (i as f64 * 0.37).sin() * 0.5 + 0.5).collect();
        let curve = gaussian_kde(&values, 400, 3.0, 1.0).unwrap();

        assert_eq!(curve.xs.len(), 400);
        let dx = curve.xs[1] - curve.xs[0];
        let area: f64 = curve.densities.iter().sum::<f64>() * dx;
        assert!(close(area, 1.0, 0.01), "area = {}", area);

        let (lo, hi) = curve.support().unwrap();
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        assert!(close(lo, min - 3.0 * curve.bandwidth, 1e-12));
        assert!(close(hi, max + 3.0 * curve.bandwidth, 1e-12));
    }

    #[test]
    fn test_kde_bandwidth_adjust() {
        let values = [0.1, 0.4, 0.35, 0.8, 0.95, 0.5];
        let base = gaussian_kde(&values, 50, 3.0, 1.0).unwrap();
        let wide = gaussian_kde(&values, 50, 3.0, 2.0).unwrap();
        assert!(close(wide.bandwidth, 2.0 * base.bandwidth, 1e-12));
        assert!(close(base.bandwidth, scott_bandwidth(&values), 1e-12));
    }

    #[test]
    fn test_kde_degenerate_input() {
        assert!(gaussian_kde(&[0.5, 0.5, 0.5], 100, 3.0, 1.0).is_none());
        assert!(gaussian_kde(&[0.5], 100, 3.0, 1.0).is_none());
    }

    #[test]
    fn test_format_tick_labels() {
        assert_eq!(
            format_tick_labels(&linspace(0.0, 1.0, 5)),
            vec!["0.00", "0.25", "0.50", "0.75", "1.00"]
        );
        assert_eq!(format_tick_labels(&[0.0, 1.0, 2.0]), vec!["0", "1", "2"]);
        assert_eq!(format_tick_labels(&[0.0, 0.5]), vec!["0.0", "0.5"]);
    }
}
