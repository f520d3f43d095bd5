//! Statistics behind the EDA operations.
//!
//! - [`outliers`]: z-score detection and bound filtering on one column
//! - [`distribution`]: histogram bins, kernel density, regression lines
//! - [`correlation`]: one-hot encoding and Pearson correlation

pub mod correlation;
pub mod distribution;
pub mod outliers;

pub use correlation::{CorrelationMatrix, EncodedColumn, correlation_matrix, one_hot_encode};
pub use outliers::{ColumnMoments, detect_zscore_outliers, filter_between};
