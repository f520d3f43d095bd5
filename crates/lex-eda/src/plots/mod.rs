//! Chart builders, figure data model, rendering and display sinks.
//!
//! Builders turn a DataFrame into a [`Figure`] of precomputed panels. A
//! figure can be serialized, drawn to SVG with [`render_svg`], or handed to a
//! [`FigureDisplay`].

mod count;
mod display;
mod figure;
mod heatmap;
mod histogram;
mod hue;
mod pair;
mod render;

pub use count::build_count_plots;
pub use display::{ClosureDisplay, FigureDisplay, NoopDisplay, SvgFileDisplay};
pub use figure::{
    CountPanel, CountSeries, DensityCurve, DensityPanel, Figure, FigureKind, HeatmapPanel,
    HistogramPanel, HistogramSeries, Panel, RegressionLine, ScatterGroup, ScatterPanel,
    grid_shape,
};
pub use heatmap::build_correlation_heatmap;
pub use histogram::build_histograms;
pub use pair::build_pair_plot;
pub use render::render_svg;
