//! Pairwise relationships between numerical columns, colored by target.

use super::figure::{
    DensityCurve, DensityPanel, Figure, FigureKind, Panel, RegressionLine, ScatterGroup,
    ScatterPanel,
};
use super::hue::HueGroups;
use crate::config::EdaConfig;
use crate::error::Result;
use crate::stats::distribution::{gaussian_kde, linear_fit, scott_bandwidth};
use crate::utils::{numeric_column_names, numeric_values};
use polars::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::index::sample;
use tracing::{debug, info};

/// Seed for row sampling so repeated runs draw the same points.
const SAMPLE_SEED: u64 = 42;

/// Kernel density curves extend this many bandwidths past the data.
const KDE_CUT: f64 = 3.0;

/// Build an n x n grid over every numeric column except `hue`.
///
/// Diagonal cells hold per-target density curves; off-diagonal cells hold
/// scatter points with a least-squares line per target value. Tables longer
/// than `config.max_pair_points` rows are sampled down first.
pub fn build_pair_plot(df: &DataFrame, hue: &str, config: &EdaConfig) -> Result<Figure> {
    let groups = HueGroups::from_column(df, hue)?;

    let variables: Vec<String> = numeric_column_names(df)
        .into_iter()
        .filter(|name| name != hue)
        .collect();

    let selected = sample_rows(df.height(), config.max_pair_points);

    let columns = variables
        .iter()
        .map(|name| numeric_values(df, name))
        .collect::<Result<Vec<_>>>()?;

    let mut panels = Vec::with_capacity(variables.len() * variables.len());
    for (row, y_name) in variables.iter().enumerate() {
        for (col, x_name) in variables.iter().enumerate() {
            let panel = if row == col {
                Panel::Density(density_panel(
                    x_name,
                    &columns[col],
                    &groups,
                    &selected,
                    config.kde_points,
                ))
            } else {
                Panel::Scatter(scatter_panel(
                    x_name,
                    y_name,
                    &columns[col],
                    &columns[row],
                    &groups,
                    &selected,
                ))
            };
            panels.push(panel);
        }
    }

    debug!(
        "Built pair plot over {} columns with hue '{}'",
        variables.len(),
        hue
    );

    Ok(Figure::with_grid(
        FigureKind::PairPlot,
        panels,
        variables.len(),
        config.figure_width,
        config.figure_width,
    ))
}

/// Mask of rows to draw. Keeps every row when the table is small enough,
/// otherwise a seeded random subset of `limit` rows.
fn sample_rows(height: usize, limit: usize) -> Vec<bool> {
    if height <= limit {
        return vec![true; height];
    }

    info!("Sampling {} of {} rows for pair plot", limit, height);
    let mut rng = StdRng::seed_from_u64(SAMPLE_SEED);
    let mut mask = vec![false; height];
    for idx in sample(&mut rng, height, limit).into_iter() {
        mask[idx] = true;
    }
    mask
}

/// Present values of `values` in the given rows.
fn values_in(
    values: &[Option<f64>],
    rows: impl Iterator<Item = usize>,
    selected: &[bool],
) -> Vec<f64> {
    rows.filter(|&row| selected.get(row).copied().unwrap_or(false))
        .filter_map(|row| values.get(row).copied().flatten())
        .filter(|v| v.is_finite())
        .collect()
}

fn density_panel(
    column: &str,
    values: &[Option<f64>],
    groups: &HueGroups,
    selected: &[bool],
    points: usize,
) -> DensityPanel {
    let samples: Vec<(String, Vec<f64>)> = groups
        .levels()
        .iter()
        .map(|level| (level.clone(), values_in(values, groups.rows_of(level), selected)))
        .collect();
    let total: usize = samples.iter().map(|(_, s)| s.len()).sum();

    // Curves share one normalization so their areas reflect group sizes.
    let curves = samples
        .into_iter()
        .filter_map(|(label, group_values)| {
            let bandwidth = scott_bandwidth(&group_values)?;
            let (lo, hi) = group_values
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                    (lo.min(*v), hi.max(*v))
                });
            let weight = group_values.len() as f64 / total as f64;
            let curve = gaussian_kde(
                &group_values,
                lo - KDE_CUT * bandwidth,
                hi + KDE_CUT * bandwidth,
                points,
            )?;
            Some(DensityCurve {
                label: Some(label),
                points: curve.into_iter().map(|(x, y)| (x, y * weight)).collect(),
            })
        })
        .collect();

    DensityPanel {
        column: column.to_string(),
        curves,
    }
}

fn scatter_panel(
    x_name: &str,
    y_name: &str,
    x_values: &[Option<f64>],
    y_values: &[Option<f64>],
    groups: &HueGroups,
    selected: &[bool],
) -> ScatterPanel {
    let scatter_groups = groups
        .levels()
        .iter()
        .map(|level| {
            let points: Vec<(f64, f64)> = groups
                .rows_of(level)
                .filter(|&row| selected.get(row).copied().unwrap_or(false))
                .filter_map(|row| match (x_values.get(row), y_values.get(row)) {
                    (Some(Some(x)), Some(Some(y))) if x.is_finite() && y.is_finite() => {
                        Some((*x, *y))
                    }
                    _ => None,
                })
                .collect();

            let fit = linear_fit(&points).map(|(slope, intercept)| {
                let (x_min, x_max) = points
                    .iter()
                    .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                        (lo.min(p.0), hi.max(p.0))
                    });
                RegressionLine {
                    slope,
                    intercept,
                    x_min,
                    x_max,
                }
            });

            ScatterGroup {
                label: Some(level.clone()),
                points,
                fit,
            }
        })
        .collect();

    ScatterPanel {
        x_column: x_name.to_string(),
        y_column: y_name.to_string(),
        groups: scatter_groups,
    }
}
