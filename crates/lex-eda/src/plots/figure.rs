//! Backend-neutral chart descriptions.
//!
//! A [`Figure`] is a grid of [`Panel`]s holding precomputed chart data
//! (bar counts, histogram bins, points, density curves, matrix cells).
//! Figures serialize to JSON so a frontend can draw them itself; the
//! [`render_svg`](super::render_svg) function draws them with plotters.

use serde::{Deserialize, Serialize};

/// Which chart builder produced a figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FigureKind {
    CountPlots,
    Histograms,
    PairPlot,
    CorrelationHeatmap,
}

impl FigureKind {
    /// Returns a human-readable name for the figure.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::CountPlots => "Categorical Counts",
            Self::Histograms => "Numerical Distributions",
            Self::PairPlot => "Pair Plots",
            Self::CorrelationHeatmap => "Correlation Coefficient",
        }
    }

    /// File stem used when the figure is written to disk.
    pub fn file_stem(&self) -> &'static str {
        match self {
            Self::CountPlots => "count_plots",
            Self::Histograms => "histograms",
            Self::PairPlot => "pair_plot",
            Self::CorrelationHeatmap => "correlation_heatmap",
        }
    }
}

/// A grid of chart panels.
///
/// Panels fill the grid row-major; cells past the last panel stay blank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    pub kind: FigureKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub width: u32,
    pub height: u32,
    pub rows: usize,
    pub cols: usize,
    pub panels: Vec<Panel>,
}

impl Figure {
    /// Create a figure whose grid has `cols` columns and just enough rows
    /// for its panels.
    pub fn with_grid(
        kind: FigureKind,
        panels: Vec<Panel>,
        cols: usize,
        width: u32,
        height: u32,
    ) -> Self {
        let (rows, cols) = grid_shape(panels.len(), cols);
        Self {
            kind,
            title: None,
            width,
            height,
            rows,
            cols,
            panels,
        }
    }

    /// Set the figure title.
    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Panel drawn in the given grid cell, if any.
    pub fn panel_at(&self, row: usize, col: usize) -> Option<&Panel> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.panels.get(row * self.cols + col)
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }
}

/// Rows and columns needed to lay out `panels` panels in `cols` columns.
///
/// An empty figure has no rows but keeps its column count.
pub fn grid_shape(panels: usize, cols: usize) -> (usize, usize) {
    let cols = cols.max(1);
    (panels.div_ceil(cols), cols)
}

/// One chart inside a figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Panel {
    Count(CountPanel),
    Histogram(HistogramPanel),
    Scatter(ScatterPanel),
    Density(DensityPanel),
    Heatmap(HeatmapPanel),
}

impl Panel {
    /// Column names the panel describes.
    pub fn columns(&self) -> Vec<&str> {
        match self {
            Panel::Count(p) => vec![p.column.as_str()],
            Panel::Histogram(p) => vec![p.column.as_str()],
            Panel::Scatter(p) => vec![p.x_column.as_str(), p.y_column.as_str()],
            Panel::Density(p) => vec![p.column.as_str()],
            Panel::Heatmap(p) => p.labels.iter().map(String::as_str).collect(),
        }
    }
}

/// Bar counts per category, optionally split by target value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountPanel {
    pub column: String,
    pub categories: Vec<String>,
    pub series: Vec<CountSeries>,
}

/// Counts aligned with [`CountPanel::categories`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountSeries {
    /// Target value for split charts, `None` for a single series.
    pub label: Option<String>,
    pub counts: Vec<usize>,
}

impl CountPanel {
    /// Highest bar in the panel.
    pub fn max_count(&self) -> usize {
        self.series
            .iter()
            .flat_map(|s| s.counts.iter().copied())
            .max()
            .unwrap_or(0)
    }
}

/// Histogram over shared bin edges, optionally split by target value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramPanel {
    pub column: String,
    pub edges: Vec<f64>,
    pub series: Vec<HistogramSeries>,
}

/// Bin counts aligned with [`HistogramPanel::edges`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramSeries {
    pub label: Option<String>,
    pub counts: Vec<usize>,
    /// Kernel density curve scaled to counts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kde: Option<Vec<(f64, f64)>>,
}

impl HistogramPanel {
    /// Largest y value reached by any bar or density curve.
    pub fn max_height(&self) -> f64 {
        self.series
            .iter()
            .map(|s| {
                let bars = s.counts.iter().copied().max().unwrap_or(0) as f64;
                let curve = s
                    .kde
                    .as_ref()
                    .map(|c| c.iter().map(|p| p.1).fold(0.0, f64::max))
                    .unwrap_or(0.0);
                bars.max(curve)
            })
            .fold(0.0, f64::max)
    }

    pub fn total_count(&self) -> usize {
        self.series.iter().flat_map(|s| s.counts.iter()).sum()
    }
}

/// Scatter points with per-group regression lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPanel {
    pub x_column: String,
    pub y_column: String,
    pub groups: Vec<ScatterGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterGroup {
    pub label: Option<String>,
    pub points: Vec<(f64, f64)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fit: Option<RegressionLine>,
}

/// Least-squares line drawn across the group's x range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionLine {
    pub slope: f64,
    pub intercept: f64,
    pub x_min: f64,
    pub x_max: f64,
}

impl RegressionLine {
    pub fn at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Kernel density curves of one column, one per target value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensityPanel {
    pub column: String,
    pub curves: Vec<DensityCurve>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensityCurve {
    pub label: Option<String>,
    pub points: Vec<(f64, f64)>,
}

/// Annotated square matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapPanel {
    pub labels: Vec<String>,
    pub values: Vec<Vec<f64>>,
    pub decimals: usize,
}

impl HeatmapPanel {
    /// Cell value, or `NaN` when the matrix has no such cell.
    pub fn value(&self, row: usize, col: usize) -> f64 {
        self.values
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(f64::NAN)
    }

    /// Cell annotation text; undefined coefficients are left blank.
    pub fn annotation(&self, row: usize, col: usize) -> String {
        let value = self.value(row, col);
        if value.is_finite() {
            format!("{:.*}", self.decimals, value)
        } else {
            String::new()
        }
    }
}

/// Bounding box `(x_min, x_max, y_min, y_max)` of the finite points.
pub(crate) fn point_bounds<'a>(
    points: impl Iterator<Item = &'a (f64, f64)>,
) -> Option<(f64, f64, f64, f64)> {
    let mut bounds: Option<(f64, f64, f64, f64)> = None;
    for &(x, y) in points {
        if !x.is_finite() || !y.is_finite() {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, x, y, y),
            Some((x0, x1, y0, y1)) => (x0.min(x), x1.max(x), y0.min(y), y1.max(y)),
        });
    }
    bounds
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_panel(column: &str) -> Panel {
        Panel::Count(CountPanel {
            column: column.to_string(),
            categories: vec!["a".to_string()],
            series: vec![CountSeries {
                label: None,
                counts: vec![1],
            }],
        })
    }

    #[test]
    fn test_grid_shape() {
        assert_eq!(grid_shape(0, 2), (0, 2));
        assert_eq!(grid_shape(1, 2), (1, 2));
        assert_eq!(grid_shape(2, 2), (1, 2));
        assert_eq!(grid_shape(3, 2), (2, 2));
        assert_eq!(grid_shape(5, 2), (3, 2));
    }

    #[test]
    fn test_panel_at_row_major() {
        let figure = Figure::with_grid(
            FigureKind::CountPlots,
            vec![count_panel("a"), count_panel("b"), count_panel("c")],
            2,
            800,
            800,
        );

        assert_eq!(figure.panel_at(0, 1).unwrap().columns(), vec!["b"]);
        assert_eq!(figure.panel_at(1, 0).unwrap().columns(), vec!["c"]);
        assert!(figure.panel_at(1, 1).is_none());
        assert!(figure.panel_at(2, 0).is_none());
    }

    #[test]
    fn test_heatmap_annotation() {
        let panel = HeatmapPanel {
            labels: vec!["a".to_string(), "b".to_string()],
            values: vec![vec![1.0, -0.456], vec![-0.456, f64::NAN]],
            decimals: 2,
        };
        assert_eq!(panel.annotation(0, 0), "1.00");
        assert_eq!(panel.annotation(0, 1), "-0.46");
        assert_eq!(panel.annotation(1, 1), "");
    }

    #[test]
    fn test_figure_serializes_with_panel_tags() {
        let figure = Figure::with_grid(FigureKind::CountPlots, vec![count_panel("sex")], 2, 10, 10)
            .titled("Counts");
        let json = serde_json::to_string(&figure).unwrap();
        assert!(json.contains("\"kind\":\"count_plots\""));
        assert!(json.contains("\"type\":\"count\""));

        let back: Figure = serde_json::from_str(&json).unwrap();
        assert_eq!(back.rows, 1);
        assert_eq!(back.title.as_deref(), Some("Counts"));
    }

    #[test]
    fn test_point_bounds_skips_non_finite() {
        let points = [(1.0, 2.0), (f64::NAN, 5.0), (-1.0, 4.0)];
        assert_eq!(point_bounds(points.iter()), Some((-1.0, 1.0, 2.0, 4.0)));
    }
}
