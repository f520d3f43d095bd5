//! Count plots for categorical columns.

use super::figure::{CountPanel, CountSeries, Figure, FigureKind, Panel};
use super::hue::HueGroups;
use crate::config::EdaConfig;
use crate::error::Result;
use crate::utils::{label_values, sorted_levels};
use polars::prelude::*;
use tracing::debug;

/// Build one count panel per column, laid out in `config.grid_columns`
/// columns. With `hue`, each panel's counts are split by that column.
pub fn build_count_plots(
    df: &DataFrame,
    columns: &[String],
    hue: Option<&str>,
    config: &EdaConfig,
) -> Result<Figure> {
    let hue_groups = hue.map(|h| HueGroups::from_column(df, h)).transpose()?;

    let panels = columns
        .iter()
        .map(|column| count_panel(df, column, hue_groups.as_ref()).map(Panel::Count))
        .collect::<Result<Vec<_>>>()?;

    debug!("Built {} count panels (split: {})", panels.len(), hue.is_some());

    Ok(Figure::with_grid(
        FigureKind::CountPlots,
        panels,
        config.grid_columns,
        config.figure_width,
        config.figure_height,
    ))
}

fn count_panel(df: &DataFrame, column: &str, hue: Option<&HueGroups>) -> Result<CountPanel> {
    let labels = label_values(df, column)?;
    let categories = sorted_levels(&labels);

    let tally = |rows: &mut dyn Iterator<Item = usize>| -> Vec<usize> {
        let mut counts = vec![0usize; categories.len()];
        for row in rows {
            if let Some(Some(value)) = labels.get(row)
                && let Some(idx) = categories.iter().position(|c| c == value)
            {
                counts[idx] += 1;
            }
        }
        counts
    };

    let series = match hue {
        None => vec![CountSeries {
            label: None,
            counts: tally(&mut (0..labels.len())),
        }],
        Some(groups) => groups
            .levels()
            .iter()
            .map(|level| CountSeries {
                label: Some(level.clone()),
                counts: tally(&mut groups.rows_of(level)),
            })
            .collect(),
    };

    Ok(CountPanel {
        column: column.to_string(),
        categories,
        series,
    })
}
