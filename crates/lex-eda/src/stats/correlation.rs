//! One-hot encoding and pairwise Pearson correlation for the heatmap.

use crate::error::Result;
use crate::utils::{DtypeCategory, get_dtype_category, label_values, sorted_levels};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A numeric column produced by [`one_hot_encode`].
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedColumn {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// Square correlation matrix with row/column labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub labels: Vec<String>,
    /// Row-major values; `NaN` where a coefficient is undefined.
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Look up the coefficient between two labels.
    pub fn get(&self, row: &str, col: &str) -> Option<f64> {
        let i = self.labels.iter().position(|l| l == row)?;
        let j = self.labels.iter().position(|l| l == col)?;
        Some(self.values[i][j])
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Convert a table into numeric columns suitable for correlation.
///
/// - numeric columns are cast to `f64` as-is
/// - boolean columns become 0/1
/// - string and categorical columns are expanded into `{column}_{level}`
///   indicator columns over their sorted levels, dropping the first level;
///   rows where the source value is null get 0 in every indicator
/// - other dtypes (dates, lists, ...) are skipped
pub fn one_hot_encode(df: &DataFrame) -> Result<Vec<EncodedColumn>> {
    let mut encoded = Vec::new();

    for col in df.get_columns() {
        let name = col.name().to_string();
        match get_dtype_category(col.dtype()) {
            DtypeCategory::Numeric | DtypeCategory::Boolean => {
                let casted = col.as_materialized_series().cast(&DataType::Float64)?;
                encoded.push(EncodedColumn {
                    name,
                    values: casted.f64()?.into_iter().collect(),
                });
            }
            DtypeCategory::String => {
                let labels = label_values(df, &name)?;
                let levels = sorted_levels(&labels);
                for level in levels.iter().skip(1) {
                    let values = labels
                        .iter()
                        .map(|label| {
                            Some(if label.as_deref() == Some(level.as_str()) {
                                1.0
                            } else {
                                0.0
                            })
                        })
                        .collect();
                    encoded.push(EncodedColumn {
                        name: format!("{}_{}", name, level),
                        values,
                    });
                }
                debug!(
                    "Encoded '{}' into {} indicator columns",
                    name,
                    levels.len().saturating_sub(1)
                );
            }
            DtypeCategory::Datetime | DtypeCategory::Other => {
                warn!(
                    "Skipping column '{}' with dtype {} in correlation",
                    name,
                    col.dtype()
                );
            }
        }
    }

    Ok(encoded)
}

/// Pearson correlation over rows where both values are present.
///
/// Returns `NaN` when fewer than two complete pairs exist or either side is
/// constant.
pub fn pearson(x: &[Option<f64>], y: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y.iter())
        .filter_map(|(a, b)| match (a, b) {
            (Some(a), Some(b)) if a.is_finite() && b.is_finite() => Some((*a, *b)),
            _ => None,
        })
        .collect();

    if pairs.len() < 2 {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (a, b) in &pairs {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx <= 0.0 || syy <= 0.0 {
        return f64::NAN;
    }

    (sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0)
}

/// Pairwise-complete Pearson correlation matrix over encoded columns.
pub fn correlation_matrix(columns: &[EncodedColumn]) -> CorrelationMatrix {
    let size = columns.len();
    let mut values = vec![vec![f64::NAN; size]; size];

    for i in 0..size {
        for j in i..size {
            let r = pearson(&columns[i].values, &columns[j].values);
            let r = if i == j && r.is_finite() { 1.0 } else { r };
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    CorrelationMatrix {
        labels: columns.iter().map(|c| c.name.clone()).collect(),
        values,
    }
}
