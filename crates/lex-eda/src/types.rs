use crate::utils::missing_count;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of absent values in one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingValueCount {
    pub column: String,
    pub null_count: usize,
    /// Share of rows that are null, as a percentage (0.0 - 100.0).
    pub null_percentage: f64,
}

/// Per-column entry of a [`DatasetInfo`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    pub dtype: String,
    pub non_null_count: usize,
    pub null_count: usize,
}

/// Structural summary of a dataset: shape, dtypes, non-null counts, memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetInfo {
    pub rows: usize,
    pub columns: usize,
    pub estimated_size_bytes: usize,
    pub column_info: Vec<ColumnInfo>,
}

impl DatasetInfo {
    /// Collect the summary from a DataFrame.
    pub fn from_dataframe(df: &DataFrame) -> Self {
        let rows = df.height();
        let column_info = df
            .get_columns()
            .iter()
            .map(|col| {
                let null_count = missing_count(col);
                ColumnInfo {
                    name: col.name().to_string(),
                    dtype: col.dtype().to_string(),
                    non_null_count: rows.saturating_sub(null_count),
                    null_count,
                }
            })
            .collect();

        Self {
            rows,
            columns: df.width(),
            estimated_size_bytes: df.estimated_size(),
            column_info,
        }
    }

    /// Count columns per dtype, sorted by dtype name.
    pub fn dtype_counts(&self) -> Vec<(String, usize)> {
        let mut counts: Vec<(String, usize)> = Vec::new();
        for col in &self.column_info {
            match counts.iter_mut().find(|(dtype, _)| *dtype == col.dtype) {
                Some((_, count)) => *count += 1,
                None => counts.push((col.dtype.clone(), 1)),
            }
        }
        counts.sort_by(|a, b| a.0.cmp(&b.0));
        counts
    }
}

impl fmt::Display for DatasetInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "RangeIndex: {} entries", self.rows)?;
        writeln!(f, "Data columns (total {} columns):", self.columns)?;
        writeln!(f, " #   {:<24} {:<16} {}", "Column", "Non-Null Count", "Dtype")?;
        writeln!(f, "---  {:<24} {:<16} {}", "------", "--------------", "-----")?;
        for (idx, col) in self.column_info.iter().enumerate() {
            writeln!(
                f,
                " {:<3} {:<24} {:<16} {}",
                idx,
                col.name,
                format!("{} non-null", col.non_null_count),
                col.dtype
            )?;
        }

        let dtypes: Vec<String> = self
            .dtype_counts()
            .into_iter()
            .map(|(dtype, count)| format!("{}({})", dtype, count))
            .collect();
        writeln!(f, "dtypes: {}", dtypes.join(", "))?;
        write!(f, "memory usage: {}", format_bytes(self.estimated_size_bytes))
    }
}

fn format_bytes(bytes: usize) -> String {
    const UNITS: [&str; 4] = ["bytes", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}
