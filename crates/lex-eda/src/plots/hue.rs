//! Splitting rows by the target column ("hue").

use crate::error::Result;
use crate::utils::{label_values, sorted_levels};
use polars::prelude::*;

/// Target value of every row, plus the sorted distinct values.
#[derive(Debug, Clone)]
pub(crate) struct HueGroups {
    labels: Vec<Option<String>>,
    levels: Vec<String>,
}

impl HueGroups {
    pub(crate) fn from_column(df: &DataFrame, column: &str) -> Result<Self> {
        let labels = label_values(df, column)?;
        let levels = sorted_levels(&labels);
        Ok(Self { labels, levels })
    }

    pub(crate) fn levels(&self) -> &[String] {
        &self.levels
    }

    /// Row indices whose target equals `level`. Rows with a null target
    /// belong to no level.
    pub(crate) fn rows_of<'a>(&'a self, level: &'a str) -> impl Iterator<Item = usize> + 'a {
        self.labels
            .iter()
            .enumerate()
            .filter(move |(_, label)| label.as_deref() == Some(level))
            .map(|(idx, _)| idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_skip_null_targets() {
        let df = df!("survived" => [Some("yes"), None, Some("no"), Some("yes")]).unwrap();
        let hue = HueGroups::from_column(&df, "survived").unwrap();

        assert_eq!(hue.levels(), &["no".to_string(), "yes".to_string()]);
        assert_eq!(hue.rows_of("yes").collect::<Vec<_>>(), vec![0, 3]);
        assert_eq!(hue.rows_of("no").collect::<Vec<_>>(), vec![2]);
    }
}
