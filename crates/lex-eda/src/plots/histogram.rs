//! Histograms for numerical columns, with optional density overlay.

use super::figure::{Figure, FigureKind, HistogramPanel, HistogramSeries, Panel};
use super::hue::HueGroups;
use crate::config::EdaConfig;
use crate::error::Result;
use crate::stats::distribution::{bin_counts, gaussian_kde, histogram_edges};
use crate::utils::numeric_values;
use polars::prelude::*;
use tracing::debug;

/// Build one histogram panel per column, laid out in `config.grid_columns`
/// columns.
///
/// With `kde`, each series carries a Gaussian density curve scaled to the
/// series' counts. With `hue`, each panel holds one series per target value
/// over shared bin edges.
pub fn build_histograms(
    df: &DataFrame,
    columns: &[String],
    kde: bool,
    hue: Option<&str>,
    config: &EdaConfig,
) -> Result<Figure> {
    let hue_groups = hue.map(|h| HueGroups::from_column(df, h)).transpose()?;

    let panels = columns
        .iter()
        .map(|column| {
            histogram_panel(df, column, kde, hue_groups.as_ref(), config).map(Panel::Histogram)
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(
        "Built {} histogram panels (kde: {}, split: {})",
        panels.len(),
        kde,
        hue.is_some()
    );

    Ok(Figure::with_grid(
        FigureKind::Histograms,
        panels,
        config.grid_columns,
        config.figure_width,
        config.figure_height,
    ))
}

fn histogram_panel(
    df: &DataFrame,
    column: &str,
    kde: bool,
    hue: Option<&HueGroups>,
    config: &EdaConfig,
) -> Result<HistogramPanel> {
    let values = numeric_values(df, column)?;
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    let edges = histogram_edges(&present, config.max_histogram_bins);

    let make_series = |label: Option<String>, sample: Vec<f64>| -> HistogramSeries {
        let counts = bin_counts(&sample, &edges);
        let curve = if kde {
            scaled_kde(&sample, &edges, config.kde_points)
        } else {
            None
        };
        HistogramSeries {
            label,
            counts,
            kde: curve,
        }
    };

    let series = match hue {
        None => vec![make_series(None, present.clone())],
        Some(groups) => groups
            .levels()
            .iter()
            .map(|level| {
                let sample: Vec<f64> = groups
                    .rows_of(level)
                    .filter_map(|row| values.get(row).copied().flatten())
                    .collect();
                make_series(Some(level.clone()), sample)
            })
            .collect(),
    };

    Ok(HistogramPanel {
        column: column.to_string(),
        edges,
        series,
    })
}

/// Density curve over the histogram's span, scaled so its area matches the
/// bars (`density * n * bin_width`).
fn scaled_kde(sample: &[f64], edges: &[f64], points: usize) -> Option<Vec<(f64, f64)>> {
    if edges.len() < 2 {
        return None;
    }
    let lo = edges[0];
    let hi = edges[edges.len() - 1];
    let bin_width = (hi - lo) / (edges.len() - 1) as f64;
    let scale = sample.len() as f64 * bin_width;

    gaussian_kde(sample, lo, hi, points)
        .map(|curve| curve.into_iter().map(|(x, y)| (x, y * scale)).collect())
}
