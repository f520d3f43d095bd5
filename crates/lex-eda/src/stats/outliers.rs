//! Outlier detection and removal on a single numeric column.
//!
//! Detection uses the z-score of each value against the column mean and
//! sample standard deviation. Removal keeps rows strictly inside caller
//! supplied bounds.

use crate::error::{EdaError, Result};
use crate::utils::numeric_values;
use polars::prelude::*;
use tracing::debug;

/// Mean and sample standard deviation (ddof = 1) of a column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnMoments {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
}

impl ColumnMoments {
    /// Compute moments over the non-null, non-`NaN` values of a column.
    ///
    /// `std_dev` is `NaN` when fewer than two values are present.
    pub fn from_values(values: &[Option<f64>]) -> Option<Self> {
        let present: Vec<f64> = values
            .iter()
            .flatten()
            .copied()
            .filter(|v| !v.is_nan())
            .collect();
        if present.is_empty() {
            return None;
        }

        let count = present.len();
        let mean = present.iter().sum::<f64>() / count as f64;
        let std_dev = if count > 1 {
            let variance = present.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
                / (count as f64 - 1.0);
            variance.sqrt()
        } else {
            f64::NAN
        };

        Some(Self {
            count,
            mean,
            std_dev,
        })
    }

    /// Z-score of a value against these moments.
    pub fn z_score(&self, value: f64) -> f64 {
        (value - self.mean) / self.std_dev
    }
}

/// Return the values of `column` whose absolute z-score exceeds `threshold`.
///
/// Values are returned in row order; nulls are never flagged.
///
/// # Errors
///
/// - [`EdaError::ColumnNotFound`] / [`EdaError::NotNumeric`] for a bad column
/// - [`EdaError::NoValidValues`] if every value is null
/// - [`EdaError::ZeroStandardDeviation`] if the column does not vary
pub fn detect_zscore_outliers(df: &DataFrame, column: &str, threshold: f64) -> Result<Vec<f64>> {
    let values = numeric_values(df, column)?;
    let moments = ColumnMoments::from_values(&values)
        .ok_or_else(|| EdaError::NoValidValues(column.to_string()))?;

    if !moments.std_dev.is_finite() || moments.std_dev == 0.0 {
        return Err(EdaError::ZeroStandardDeviation(column.to_string()));
    }

    let outliers: Vec<f64> = values
        .into_iter()
        .flatten()
        .filter(|value| moments.z_score(*value).abs() > threshold)
        .collect();

    debug!(
        "Column '{}': mean={:.4}, std={:.4}, {} outliers beyond |z| > {}",
        column,
        moments.mean,
        moments.std_dev,
        outliers.len(),
        threshold
    );

    Ok(outliers)
}

/// Keep only rows where `lower < df[column] < upper`.
///
/// Null values fail the comparison and are dropped. `lower >= upper`
/// yields an empty frame with the original schema.
pub fn filter_between(df: &DataFrame, column: &str, lower: f64, upper: f64) -> Result<DataFrame> {
    let values = numeric_values(df, column)?;

    let mask_values: Vec<bool> = values
        .iter()
        .map(|value| value.is_some_and(|v| v > lower && v < upper))
        .collect();

    let mask = BooleanChunked::from_slice("mask".into(), &mask_values);
    let filtered = df.filter(&mask)?;

    debug!(
        "Filtered '{}' to ({}, {}): {} -> {} rows",
        column,
        lower,
        upper,
        df.height(),
        filtered.height()
    );

    Ok(filtered)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wide_age_frame() -> DataFrame {
        // Twenty typical ages around 30 plus one extreme value.
        let mut ages: Vec<f64> = (0..20).map(|i| 25.0 + (i % 10) as f64).collect();
        ages.push(400.0);
        df!("age" => ages).unwrap()
    }

    #[test]
    fn test_moments_sample_std() {
        let values = vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(5.0)];
        let moments = ColumnMoments::from_values(&values).unwrap();
        assert_eq!(moments.count, 5);
        assert!((moments.mean - 3.0).abs() < 1e-12);
        assert!((moments.std_dev - 2.5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_moments_skip_nulls() {
        let values = vec![Some(2.0), None, Some(4.0)];
        let moments = ColumnMoments::from_values(&values).unwrap();
        assert_eq!(moments.count, 2);
        assert!((moments.mean - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_moments_skip_nan() {
        let values = vec![Some(2.0), Some(f64::NAN), Some(4.0)];
        let moments = ColumnMoments::from_values(&values).unwrap();
        assert_eq!(moments.count, 2);
        assert!((moments.mean - 3.0).abs() < 1e-12);
        assert!(moments.std_dev.is_finite());
    }

    #[test]
    fn test_detects_extreme_value_despite_nan() {
        let mut ages: Vec<f64> = (0..20).map(|i| 25.0 + (i % 10) as f64).collect();
        ages.push(400.0);
        ages.push(f64::NAN);
        let df = df!("age" => ages).unwrap();
        let outliers = detect_zscore_outliers(&df, "age", 3.0).unwrap();
        assert_eq!(outliers, vec![400.0]);
    }

    #[test]
    fn test_filter_between_drops_nan() {
        let df = df!("age" => [10.0, f64::NAN, 20.0]).unwrap();
        let filtered = filter_between(&df, "age", 0.0, 100.0).unwrap();
        assert_eq!(filtered.height(), 2);
    }

    #[test]
    fn test_moments_single_value_has_undefined_std() {
        let moments = ColumnMoments::from_values(&[Some(7.0)]).unwrap();
        assert!(moments.std_dev.is_nan());
    }

    #[test]
    fn test_detects_extreme_value() {
        let df = wide_age_frame();
        let outliers = detect_zscore_outliers(&df, "age", 3.0).unwrap();
        assert_eq!(outliers, vec![400.0]);
    }

    #[test]
    fn test_small_sample_with_lower_threshold() {
        // With five rows the largest reachable |z| is (n-1)/sqrt(n) ~= 1.79.
        let df = df!("age" => [10.0, 12.0, 11.0, 13.0, 1000.0]).unwrap();
        assert!(detect_zscore_outliers(&df, "age", 3.0).unwrap().is_empty());
        assert_eq!(
            detect_zscore_outliers(&df, "age", 1.5).unwrap(),
            vec![1000.0]
        );
    }

    #[test]
    fn test_constant_column_is_a_data_error() {
        let df = df!("age" => [5.0, 5.0, 5.0]).unwrap();
        let err = detect_zscore_outliers(&df, "age", 3.0).unwrap_err();
        assert!(matches!(err, EdaError::ZeroStandardDeviation(_)));
    }

    #[test]
    fn test_all_null_column() {
        let df = df!("age" => [None::<f64>, None]).unwrap();
        let err = detect_zscore_outliers(&df, "age", 3.0).unwrap_err();
        assert!(matches!(err, EdaError::NoValidValues(_)));
    }

    #[test]
    fn test_filter_between_is_strict() {
        let df = df!("age" => [0.0, 10.0, 50.0, 100.0, 1000.0]).unwrap();
        let filtered = filter_between(&df, "age", 0.0, 100.0).unwrap();
        let kept = numeric_values(&filtered, "age").unwrap();
        assert_eq!(kept, vec![Some(10.0), Some(50.0)]);
    }

    #[test]
    fn test_filter_between_drops_nulls() {
        let df = df!("age" => [Some(10.0), None, Some(20.0)]).unwrap();
        let filtered = filter_between(&df, "age", 0.0, 100.0).unwrap();
        assert_eq!(filtered.height(), 2);
    }

    #[test]
    fn test_filter_between_inverted_bounds_is_empty() {
        let df = df!("age" => [1.0, 2.0, 3.0], "name" => ["a", "b", "c"]).unwrap();
        let filtered = filter_between(&df, "age", 5.0, 5.0).unwrap();
        assert_eq!(filtered.height(), 0);
        assert_eq!(filtered.width(), 2);
    }
}
