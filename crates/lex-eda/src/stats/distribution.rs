//! Distribution helpers backing the chart builders: histogram binning,
//! Gaussian kernel density and least-squares lines.

/// Linear-interpolated quantile of already sorted values.
pub fn quantile_sorted(values: &[f64], quantile: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let pos = quantile.clamp(0.0, 1.0) * (values.len() as f64 - 1.0);
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    if lower == upper {
        return values[lower];
    }
    let weight = pos - lower as f64;
    values[lower] + (values[upper] - values[lower]) * weight
}

/// Histogram bin edges following numpy's `auto` estimator.
///
/// Picks the narrower of the Sturges and Freedman-Diaconis bin widths,
/// capped at `max_bins` bins. A constant sample gets a single bin of
/// width one centered on the value. Returns an empty vector for no data.
pub fn histogram_edges(values: &[f64], max_bins: usize) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return Vec::new();
    }
    sorted.sort_by(|a, b| a.total_cmp(b));

    let min = sorted[0];
    let max = sorted[sorted.len() - 1];
    let range = max - min;
    if range <= 0.0 {
        return vec![min - 0.5, max + 0.5];
    }

    let n = sorted.len() as f64;
    let sturges_width = range / (n.log2() + 1.0);
    let iqr = quantile_sorted(&sorted, 0.75) - quantile_sorted(&sorted, 0.25);
    let fd_width = 2.0 * iqr * n.powf(-1.0 / 3.0);

    let width = if fd_width > 0.0 {
        fd_width.min(sturges_width)
    } else {
        sturges_width
    };

    let bins = ((range / width).ceil() as usize).clamp(1, max_bins.max(1));
    let step = range / bins as f64;
    let mut edges: Vec<f64> = (0..=bins).map(|i| min + step * i as f64).collect();
    edges[bins] = max;
    edges
}

/// Count values per bin. The last bin is closed on the right.
pub fn bin_counts(values: &[f64], edges: &[f64]) -> Vec<usize> {
    if edges.len() < 2 {
        return Vec::new();
    }

    let bins = edges.len() - 1;
    let min = edges[0];
    let max = edges[bins];
    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];

    for &value in values {
        if !value.is_finite() || value < min || value > max {
            continue;
        }
        let mut index = ((value - min) / width) as usize;
        if index >= bins {
            index = bins - 1;
        }
        counts[index] += 1;
    }

    counts
}

/// Scott's rule bandwidth: `std * n^(-1/5)`.
///
/// Returns `None` when the sample is too small or does not vary.
pub fn scott_bandwidth(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n as f64 - 1.0);
    let std_dev = variance.sqrt();
    if std_dev <= 0.0 || !std_dev.is_finite() {
        return None;
    }
    Some(std_dev * (n as f64).powf(-0.2))
}

/// Gaussian kernel density estimate evaluated on `points` evenly spaced
/// positions spanning `[lo, hi]`.
///
/// Returns `(x, density)` pairs, or `None` if no bandwidth can be derived.
pub fn gaussian_kde(values: &[f64], lo: f64, hi: f64, points: usize) -> Option<Vec<(f64, f64)>> {
    let bandwidth = scott_bandwidth(values)?;
    let points = points.max(2);
    let n = values.len() as f64;
    let norm = 1.0 / (n * bandwidth * (2.0 * std::f64::consts::PI).sqrt());
    let step = (hi - lo) / (points - 1) as f64;

    let curve = (0..points)
        .map(|i| {
            let x = lo + step * i as f64;
            let density: f64 = values
                .iter()
                .map(|xi| {
                    let u = (x - xi) / bandwidth;
                    (-0.5 * u * u).exp()
                })
                .sum::<f64>()
                * norm;
            (x, density)
        })
        .collect();

    Some(curve)
}

/// Ordinary least-squares fit `y = slope * x + intercept`.
///
/// Returns `None` for fewer than two points or a constant `x`.
pub fn linear_fit(points: &[(f64, f64)]) -> Option<(f64, f64)> {
    let n = points.len();
    if n < 2 {
        return None;
    }
    let n_f = n as f64;
    let mean_x = points.iter().map(|p| p.0).sum::<f64>() / n_f;
    let mean_y = points.iter().map(|p| p.1).sum::<f64>() / n_f;

    let sxx: f64 = points.iter().map(|p| (p.0 - mean_x).powi(2)).sum();
    if sxx <= 0.0 {
        return None;
    }
    let sxy: f64 = points
        .iter()
        .map(|p| (p.0 - mean_x) * (p.1 - mean_y))
        .sum();

    let slope = sxy / sxx;
    Some((slope, mean_y - slope * mean_x))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantile_sorted() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile_sorted(&values, 0.0), 1.0);
        assert_eq!(quantile_sorted(&values, 1.0), 4.0);
        assert!((quantile_sorted(&values, 0.5) - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_edges_cover_range() {
        let values: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let edges = histogram_edges(&values, 50);
        assert!(edges.len() >= 2);
        assert_eq!(edges[0], 0.0);
        assert!((edges[edges.len() - 1] - 99.0).abs() < 1e-9);
    }

    #[test]
    fn test_edges_respect_max_bins() {
        let values: Vec<f64> = (0..10_000).map(|i| (i as f64).sqrt()).collect();
        let edges = histogram_edges(&values, 8);
        assert_eq!(edges.len(), 9);
    }

    #[test]
    fn test_edges_constant_sample() {
        let edges = histogram_edges(&[3.0, 3.0, 3.0], 50);
        assert_eq!(edges, vec![2.5, 3.5]);
        assert_eq!(bin_counts(&[3.0, 3.0, 3.0], &edges), vec![3]);
    }

    #[test]
    fn test_edges_empty() {
        assert!(histogram_edges(&[], 10).is_empty());
        assert!(bin_counts(&[1.0], &[]).is_empty());
    }

    #[test]
    fn test_bin_counts_total() {
        let values: Vec<f64> = (0..37).map(|i| i as f64 * 0.7).collect();
        let edges = histogram_edges(&values, 50);
        let counts = bin_counts(&values, &edges);
        assert_eq!(counts.iter().sum::<usize>(), values.len());
    }

    #[test]
    fn test_bin_counts_includes_right_edge() {
        let counts = bin_counts(&[0.0, 1.0, 2.0], &[0.0, 1.0, 2.0]);
        assert_eq!(counts, vec![1, 2]);
    }

    #[test]
    fn test_kde_integrates_to_one() {
        let values = [1.0, 2.0, 2.5, 3.0, 4.0, 4.5, 6.0];
        let bandwidth = scott_bandwidth(&values).unwrap();
        let lo = 1.0 - 4.0 * bandwidth;
        let hi = 6.0 + 4.0 * bandwidth;
        let curve = gaussian_kde(&values, lo, hi, 512).unwrap();

        let step = curve[1].0 - curve[0].0;
        let area: f64 = curve.iter().map(|(_, y)| y * step).sum();
        assert!((area - 1.0).abs() < 0.02, "area was {}", area);
    }

    #[test]
    fn test_kde_requires_variation() {
        assert!(gaussian_kde(&[2.0, 2.0], 0.0, 4.0, 10).is_none());
        assert!(gaussian_kde(&[2.0], 0.0, 4.0, 10).is_none());
    }

    #[test]
    fn test_linear_fit_exact_line() {
        let points = [(0.0, 1.0), (1.0, 3.0), (2.0, 5.0)];
        let (slope, intercept) = linear_fit(&points).unwrap();
        assert!((slope - 2.0).abs() < 1e-12);
        assert!((intercept - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_linear_fit_vertical_is_none() {
        assert!(linear_fit(&[(1.0, 1.0), (1.0, 2.0)]).is_none());
    }
}
