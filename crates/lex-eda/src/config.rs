//! Configuration types for the EDA helpers.
//!
//! This module provides configuration options using the builder pattern.
//! Configurations are serde-serializable so they can be loaded from a JSON
//! file (see [`EdaConfig::from_json_file`]).

use crate::error::{EdaError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for an [`EdaFrame`](crate::EdaFrame).
///
/// Use [`EdaConfig::builder()`] to create a new configuration with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use lex_eda::EdaConfig;
///
/// let config = EdaConfig::builder()
///     .z_score_threshold(2.5)
///     .max_histogram_bins(30)
///     .output_dir("figures")
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdaConfig {
    /// Absolute z-score above which a value counts as an outlier.
    /// Default: 3.0
    pub z_score_threshold: f64,

    /// Number of grid columns for count plots and histograms.
    /// Default: 2
    pub grid_columns: usize,

    /// Upper bound on the number of histogram bins.
    /// Default: 50
    pub max_histogram_bins: usize,

    /// Number of evaluation points for kernel density curves.
    /// Default: 128
    pub kde_points: usize,

    /// Width in pixels of count plot, histogram and pair plot figures.
    /// Default: 800
    pub figure_width: u32,

    /// Height in pixels of count plot, histogram and pair plot figures.
    /// Default: 800
    pub figure_height: u32,

    /// Side length in pixels of the square correlation heatmap.
    /// Default: 1400
    pub heatmap_size: u32,

    /// Decimal places used to annotate heatmap cells.
    /// Default: 2
    pub heatmap_decimals: usize,

    /// Maximum number of rows drawn in each pair plot cell.
    /// Larger tables are down-sampled with a fixed seed.
    /// Default: 2000
    pub max_pair_points: usize,

    /// Directory where the default display writes rendered figures.
    /// Default: "eda_output"
    pub output_dir: PathBuf,
}

impl Default for EdaConfig {
    fn default() -> Self {
        Self {
            z_score_threshold: 3.0,
            grid_columns: 2,
            max_histogram_bins: 50,
            kde_points: 128,
            figure_width: 800,
            figure_height: 800,
            heatmap_size: 1400,
            heatmap_decimals: 2,
            max_pair_points: 2000,
            output_dir: PathBuf::from("eda_output"),
        }
    }
}

impl EdaConfig {
    /// Create a new configuration builder.
    pub fn builder() -> EdaConfigBuilder {
        EdaConfigBuilder::default()
    }

    /// Load a configuration from a JSON file.
    ///
    /// Missing fields take their default values.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: EdaConfig = serde_json::from_str(&content)?;
        config
            .validate()
            .map_err(|e| EdaError::InvalidConfig(e.to_string()))?;
        Ok(config)
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> std::result::Result<(), ConfigValidationError> {
        if !self.z_score_threshold.is_finite() || self.z_score_threshold <= 0.0 {
            return Err(ConfigValidationError::InvalidZScoreThreshold(
                self.z_score_threshold,
            ));
        }

        if self.grid_columns == 0 {
            return Err(ConfigValidationError::MustBePositive {
                field: "grid_columns".to_string(),
            });
        }

        if self.max_histogram_bins == 0 {
            return Err(ConfigValidationError::MustBePositive {
                field: "max_histogram_bins".to_string(),
            });
        }

        if self.kde_points < 2 {
            return Err(ConfigValidationError::TooFewKdePoints(self.kde_points));
        }

        if self.figure_width == 0 || self.figure_height == 0 || self.heatmap_size == 0 {
            return Err(ConfigValidationError::MustBePositive {
                field: "figure size".to_string(),
            });
        }

        if self.max_pair_points == 0 {
            return Err(ConfigValidationError::MustBePositive {
                field: "max_pair_points".to_string(),
            });
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid z-score threshold: {0} (must be a positive finite number)")]
    InvalidZScoreThreshold(f64),

    #[error("Invalid value for '{field}' (must be at least 1)")]
    MustBePositive { field: String },

    #[error("Invalid KDE point count: {0} (must be at least 2)")]
    TooFewKdePoints(usize),
}

impl From<ConfigValidationError> for EdaError {
    fn from(err: ConfigValidationError) -> Self {
        EdaError::InvalidConfig(err.to_string())
    }
}

/// Builder for [`EdaConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct EdaConfigBuilder {
    z_score_threshold: Option<f64>,
    grid_columns: Option<usize>,
    max_histogram_bins: Option<usize>,
    kde_points: Option<usize>,
    figure_width: Option<u32>,
    figure_height: Option<u32>,
    heatmap_size: Option<u32>,
    heatmap_decimals: Option<usize>,
    max_pair_points: Option<usize>,
    output_dir: Option<PathBuf>,
}

impl EdaConfigBuilder {
    /// Set the absolute z-score above which values are reported as outliers.
    pub fn z_score_threshold(mut self, threshold: f64) -> Self {
        self.z_score_threshold = Some(threshold);
        self
    }

    /// Set the number of grid columns for count plots and histograms.
    pub fn grid_columns(mut self, columns: usize) -> Self {
        self.grid_columns = Some(columns);
        self
    }

    /// Set the upper bound on histogram bins.
    pub fn max_histogram_bins(mut self, bins: usize) -> Self {
        self.max_histogram_bins = Some(bins);
        self
    }

    /// Set the number of points sampled along each density curve.
    pub fn kde_points(mut self, points: usize) -> Self {
        self.kde_points = Some(points);
        self
    }

    /// Set the pixel size of grid figures.
    pub fn figure_size(mut self, width: u32, height: u32) -> Self {
        self.figure_width = Some(width);
        self.figure_height = Some(height);
        self
    }

    /// Set the pixel side length of the correlation heatmap.
    pub fn heatmap_size(mut self, size: u32) -> Self {
        self.heatmap_size = Some(size);
        self
    }

    /// Set the number of decimals used for heatmap annotations.
    pub fn heatmap_decimals(mut self, decimals: usize) -> Self {
        self.heatmap_decimals = Some(decimals);
        self
    }

    /// Set the maximum number of rows drawn per pair plot cell.
    pub fn max_pair_points(mut self, points: usize) -> Self {
        self.max_pair_points = Some(points);
        self
    }

    /// Set the directory the default display writes figures into.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `EdaConfig` or an error if validation fails.
    pub fn build(self) -> std::result::Result<EdaConfig, ConfigValidationError> {
        let defaults = EdaConfig::default();
        let config = EdaConfig {
            z_score_threshold: self.z_score_threshold.unwrap_or(defaults.z_score_threshold),
            grid_columns: self.grid_columns.unwrap_or(defaults.grid_columns),
            max_histogram_bins: self.max_histogram_bins.unwrap_or(defaults.max_histogram_bins),
            kde_points: self.kde_points.unwrap_or(defaults.kde_points),
            figure_width: self.figure_width.unwrap_or(defaults.figure_width),
            figure_height: self.figure_height.unwrap_or(defaults.figure_height),
            heatmap_size: self.heatmap_size.unwrap_or(defaults.heatmap_size),
            heatmap_decimals: self.heatmap_decimals.unwrap_or(defaults.heatmap_decimals),
            max_pair_points: self.max_pair_points.unwrap_or(defaults.max_pair_points),
            output_dir: self.output_dir.unwrap_or(defaults.output_dir),
        };

        config.validate()?;
        Ok(config)
    }
}
