//! Exploratory Data Analysis Helpers
//!
//! Quick, repeatable looks at a tabular dataset built on Polars.
//!
//! # Overview
//!
//! An [`EdaFrame`] wraps a DataFrame together with its target column and
//! the columns you declare as categorical or numerical. It provides:
//!
//! - **Missing values**: null counts per column
//! - **Outliers**: z-score detection and bound-based removal
//! - **Count plots**: one bar chart per categorical column, optionally split by target
//! - **Histograms**: one per numerical column, with optional density curves
//! - **Pair plots**: scatter and regression grid over numeric columns, colored by target
//! - **Correlation heatmap**: Pearson coefficients of the one-hot encoded table
//! - **Full report**: all of the above as a tabbed HTML page or JSON
//!
//! Charts are returned as [`Figure`] values holding precomputed panel data.
//! They serialize to JSON and render to SVG with [`render_svg`].
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use lex_eda::EdaFrame;
//! use polars::prelude::*;
//!
//! let df = CsvReadOptions::default()
//!     .with_has_header(true)
//!     .try_into_reader_with_file_path(Some("titanic.csv".into()))?
//!     .finish()?;
//!
//! let mut eda = EdaFrame::new(df, "Survived");
//! eda.set_categorical(vec!["Sex".into(), "Pclass".into(), "Embarked".into()]);
//! eda.set_numerical(vec!["Age".into(), "Fare".into()]);
//!
//! for entry in eda.missing_values() {
//!     println!("{}: {}", entry.column, entry.null_count);
//! }
//!
//! let outliers = eda.detect_outliers("Fare")?;
//! eda.remove_outliers("Fare", 0.0, 300.0)?;
//!
//! // Figures built with show = true are written as SVG files
//! eda.count_plots(true, true)?;
//! eda.hist_plots(true, false, true)?;
//!
//! let report = eda.full_eda()?;
//! report.write_to_dir("eda_output", "titanic")?;
//! ```
//!
//! # Configuration
//!
//! Use [`EdaConfig`] to tune thresholds and figure sizes:
//!
//! ```rust,ignore
//! use lex_eda::{EdaConfig, EdaFrame, NoopDisplay};
//! use std::sync::Arc;
//!
//! let config = EdaConfig::builder()
//!     .z_score_threshold(2.5)      // Flag |z| > 2.5
//!     .grid_columns(3)             // Three charts per row
//!     .max_pair_points(5_000)      // Sample larger tables for pair plots
//!     .build()?;
//!
//! let eda = EdaFrame::builder(df, "Survived")
//!     .config(config)
//!     .display(Arc::new(NoopDisplay))
//!     .build()?;
//! ```

pub mod config;
pub mod error;
pub mod frame;
pub mod plots;
pub mod reporting;
pub mod stats;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use config::{ConfigValidationError, EdaConfig, EdaConfigBuilder};
pub use error::{EdaError, Result, ResultExt};
pub use frame::{EdaFrame, EdaFrameBuilder};
pub use plots::{
    ClosureDisplay, Figure, FigureDisplay, FigureKind, NoopDisplay, Panel, SvgFileDisplay,
    render_svg,
};
pub use reporting::{EdaReport, ReportTab, TabContent};
pub use stats::CorrelationMatrix;
pub use types::{ColumnInfo, DatasetInfo, MissingValueCount};
pub use utils::{DtypeCategory, get_dtype_category, is_numeric_dtype};
