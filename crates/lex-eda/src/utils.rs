//! Shared column helpers.
//!
//! Column lookup, dtype classification and value extraction used by the
//! statistics and plotting modules.

use crate::error::{EdaError, Result};
use polars::prelude::*;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Category of a data type for EDA purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DtypeCategory {
    /// Integer or floating point numbers
    Numeric,
    /// Date or datetime types
    Datetime,
    /// Boolean type
    Boolean,
    /// String/text or categorical type
    String,
    /// Other/unknown types
    Other,
}

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Check if a DataType is a datetime type.
#[inline]
pub fn is_datetime_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Datetime(_, _) | DataType::Date | DataType::Time
    )
}

/// Get the category of a DataType.
pub fn get_dtype_category(dtype: &DataType) -> DtypeCategory {
    if is_numeric_dtype(dtype) {
        DtypeCategory::Numeric
    } else if is_datetime_dtype(dtype) {
        DtypeCategory::Datetime
    } else if matches!(dtype, DataType::Boolean) {
        DtypeCategory::Boolean
    } else if matches!(
        dtype,
        DataType::String | DataType::Categorical(_, _) | DataType::Enum(_, _)
    ) {
        DtypeCategory::String
    } else {
        DtypeCategory::Other
    }
}

// =============================================================================
// Column Access
// =============================================================================

/// Look up a column by name, mapping a miss to [`EdaError::ColumnNotFound`].
pub fn lookup_series<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series> {
    df.column(name)
        .map(|col| col.as_materialized_series())
        .map_err(|_| EdaError::ColumnNotFound(name.to_string()))
}

/// Extract a numeric column as `f64` values, preserving nulls and row order.
///
/// Float `NaN` is returned as `None`, the same as null. Booleans are not
/// accepted here; only integer and float dtypes count as numeric.
pub fn numeric_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let series = lookup_series(df, name)?;
    if !is_numeric_dtype(series.dtype()) {
        return Err(EdaError::NotNumeric {
            column: name.to_string(),
            dtype: series.dtype().to_string(),
        });
    }

    let casted = series.cast(&DataType::Float64)?;
    Ok(casted
        .f64()?
        .into_iter()
        .map(|value| value.filter(|v| !v.is_nan()))
        .collect())
}

/// Number of missing entries in a column: nulls, plus `NaN` for floats.
pub fn missing_count(col: &Column) -> usize {
    let series = col.as_materialized_series();
    let nan_count = match series.dtype() {
        DataType::Float32 => series
            .f32()
            .map(|ca| ca.into_iter().flatten().filter(|v| v.is_nan()).count())
            .unwrap_or(0),
        DataType::Float64 => series
            .f64()
            .map(|ca| ca.into_iter().flatten().filter(|v| v.is_nan()).count())
            .unwrap_or(0),
        _ => 0,
    };
    col.null_count() + nan_count
}

/// Extract a column as display labels, preserving nulls and row order.
///
/// Any dtype that polars can cast to `String` is accepted, so numeric
/// targets can still be used to split charts.
pub fn label_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let series = lookup_series(df, name)?;
    let casted = series.cast(&DataType::String)?;
    Ok(casted
        .str()?
        .into_iter()
        .map(|value| value.map(|s| s.to_string()))
        .collect())
}

/// Names of all numeric columns, in table order.
pub fn numeric_column_names(df: &DataFrame) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|col| is_numeric_dtype(col.dtype()))
        .map(|col| col.name().to_string())
        .collect()
}

/// Sorted, de-duplicated non-null labels.
///
/// Labels that all parse as numbers are ordered numerically so that
/// `"2"` sorts before `"10"`.
pub fn sorted_levels(labels: &[Option<String>]) -> Vec<String> {
    let mut levels: Vec<String> = labels.iter().flatten().cloned().collect();
    levels.sort();
    levels.dedup();

    let parsed: Option<Vec<f64>> = levels.iter().map(|l| l.parse::<f64>().ok()).collect();
    if let Some(numbers) = parsed {
        let mut pairs: Vec<(f64, String)> = numbers.into_iter().zip(levels).collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
        return pairs.into_iter().map(|(_, label)| label).collect();
    }

    levels
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_numeric_dtype() {
        assert!(is_numeric_dtype(&DataType::Int64));
        assert!(is_numeric_dtype(&DataType::Float64));
        assert!(!is_numeric_dtype(&DataType::String));
        assert!(!is_numeric_dtype(&DataType::Boolean));
    }

    #[test]
    fn test_dtype_category() {
        assert_eq!(get_dtype_category(&DataType::Int32), DtypeCategory::Numeric);
        assert_eq!(get_dtype_category(&DataType::Date), DtypeCategory::Datetime);
        assert_eq!(
            get_dtype_category(&DataType::Boolean),
            DtypeCategory::Boolean
        );
        assert_eq!(get_dtype_category(&DataType::String), DtypeCategory::String);
    }

    #[test]
    fn test_numeric_values_preserves_nulls() {
        let df = df!("age" => [Some(1i64), None, Some(3)]).unwrap();
        let values = numeric_values(&df, "age").unwrap();
        assert_eq!(values, vec![Some(1.0), None, Some(3.0)]);
    }

    #[test]
    fn test_numeric_values_treats_nan_as_missing() {
        let df = df!("age" => [Some(1.0), Some(f64::NAN), None]).unwrap();
        let values = numeric_values(&df, "age").unwrap();
        assert_eq!(values, vec![Some(1.0), None, None]);
    }

    #[test]
    fn test_missing_count_includes_nan() {
        let df = df!(
            "fare" => [Some(1.0), Some(f64::NAN), None],
            "rank" => [Some(1.0f32), Some(f32::NAN), Some(3.0)],
            "pclass" => [Some(1i64), None, Some(3)]
        )
        .unwrap();
        let counts: Vec<usize> = df.get_columns().iter().map(missing_count).collect();
        assert_eq!(counts, vec![2, 1, 1]);
    }

    #[test]
    fn test_numeric_values_rejects_strings() {
        let df = df!("sex" => ["m", "f"]).unwrap();
        let err = numeric_values(&df, "sex").unwrap_err();
        assert_eq!(err.error_code(), "NOT_NUMERIC");
    }

    #[test]
    fn test_lookup_missing_column() {
        let df = df!("a" => [1, 2]).unwrap();
        let err = lookup_series(&df, "b").unwrap_err();
        assert!(matches!(err, EdaError::ColumnNotFound(name) if name == "b"));
    }

    #[test]
    fn test_label_values_from_numbers() {
        let df = df!("survived" => [Some(0i32), Some(1), None]).unwrap();
        let labels = label_values(&df, "survived").unwrap();
        assert_eq!(
            labels,
            vec![Some("0".to_string()), Some("1".to_string()), None]
        );
    }

    #[test]
    fn test_sorted_levels_numeric_order() {
        let labels = vec![
            Some("10".to_string()),
            Some("2".to_string()),
            None,
            Some("2".to_string()),
        ];
        assert_eq!(sorted_levels(&labels), vec!["2", "10"]);
    }

    #[test]
    fn test_sorted_levels_nan_label_sorts_last() {
        let labels = vec![
            Some("NaN".to_string()),
            Some("2".to_string()),
            Some("1".to_string()),
            Some("-3".to_string()),
        ];
        assert_eq!(sorted_levels(&labels), vec!["-3", "1", "2", "NaN"]);
    }

    #[test]
    fn test_sorted_levels_lexical_order() {
        let labels = vec![Some("b".to_string()), Some("a".to_string())];
        assert_eq!(sorted_levels(&labels), vec!["a", "b"]);
    }

    #[test]
    fn test_numeric_column_names() {
        let df = df!("a" => [1.0, 2.0], "b" => ["x", "y"], "c" => [1i32, 2]).unwrap();
        assert_eq!(numeric_column_names(&df), vec!["a", "c"]);
    }
}
