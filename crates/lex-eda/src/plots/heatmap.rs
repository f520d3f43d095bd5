//! Correlation heatmap.

use super::figure::{Figure, FigureKind, HeatmapPanel, Panel};
use crate::config::EdaConfig;
use crate::stats::CorrelationMatrix;

/// Wrap a correlation matrix as a single annotated heatmap panel on a square
/// canvas of `config.heatmap_size` pixels.
pub fn build_correlation_heatmap(matrix: &CorrelationMatrix, config: &EdaConfig) -> Figure {
    let panel = HeatmapPanel {
        labels: matrix.labels.clone(),
        values: matrix.values.clone(),
        decimals: config.heatmap_decimals,
    };

    Figure::with_grid(
        FigureKind::CorrelationHeatmap,
        vec![Panel::Heatmap(panel)],
        1,
        config.heatmap_size,
        config.heatmap_size,
    )
}
