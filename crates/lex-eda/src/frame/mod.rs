//! The analysis context: a dataset, its target column, and the declared
//! categorical and numerical columns.

mod builder;

pub use builder::EdaFrameBuilder;

use crate::config::EdaConfig;
use crate::error::{Result, ResultExt};
use crate::plots::{
    Figure, FigureDisplay, FigureKind, SvgFileDisplay, build_correlation_heatmap, build_count_plots,
    build_histograms, build_pair_plot,
};
use crate::reporting::{EdaReport, ReportTab};
use crate::stats::{
    CorrelationMatrix, correlation_matrix, detect_zscore_outliers, filter_between, one_hot_encode,
};
use crate::types::{DatasetInfo, MissingValueCount};
use crate::utils::{DtypeCategory, get_dtype_category, missing_count};
use polars::prelude::*;
use std::sync::Arc;
use tracing::{debug, info};

/// Exploratory analysis over one table.
///
/// The declared column lists are not checked when set; an operation that
/// touches a name missing from the table fails with
/// [`EdaError::ColumnNotFound`](crate::EdaError::ColumnNotFound).
///
/// # Example
///
/// ```rust,ignore
/// use lex_eda::EdaFrame;
///
/// let mut eda = EdaFrame::new(df, "Survived");
/// eda.set_categorical(vec!["Sex".into(), "Pclass".into()]);
/// eda.set_numerical(vec!["Age".into(), "Fare".into()]);
///
/// let outliers = eda.detect_outliers("Fare")?;
/// eda.remove_outliers("Fare", 0.0, 300.0)?;
/// let report = eda.full_eda()?;
/// ```
pub struct EdaFrame {
    data: DataFrame,
    target: String,
    categorical: Vec<String>,
    numerical: Vec<String>,
    config: EdaConfig,
    display: Arc<dyn FigureDisplay>,
}

// Frames may be handed to a worker thread by callers.
static_assertions::assert_impl_all!(EdaFrame: Send, Sync);

impl EdaFrame {
    /// Create a frame with the default configuration. Shown figures are
    /// written as SVG files into the configured output directory.
    pub fn new(data: DataFrame, target: impl Into<String>) -> Self {
        let config = EdaConfig::default();
        let display = Arc::new(SvgFileDisplay::new(config.output_dir.clone()));
        Self {
            data,
            target: target.into(),
            categorical: Vec::new(),
            numerical: Vec::new(),
            config,
            display,
        }
    }

    pub fn builder(data: DataFrame, target: impl Into<String>) -> EdaFrameBuilder {
        EdaFrameBuilder::new(data, target)
    }

    /// Shape, dtypes, non-null counts and memory of the current table.
    pub fn info(&self) -> DatasetInfo {
        DatasetInfo::from_dataframe(&self.data)
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn categorical(&self) -> &[String] {
        &self.categorical
    }

    pub fn numerical(&self) -> &[String] {
        &self.numerical
    }

    pub fn config(&self) -> &EdaConfig {
        &self.config
    }

    /// The current table, including any rows removed by
    /// [`remove_outliers`](Self::remove_outliers).
    pub fn data(&self) -> &DataFrame {
        &self.data
    }

    pub fn into_inner(self) -> DataFrame {
        self.data
    }

    pub fn set_categorical(&mut self, columns: Vec<String>) {
        self.categorical = columns;
    }

    pub fn set_numerical(&mut self, columns: Vec<String>) {
        self.numerical = columns;
    }

    /// Fill both column lists from dtypes, skipping the target.
    ///
    /// Numeric columns become numerical; string, categorical and boolean
    /// columns become categorical. Dates and nested types are left out.
    pub fn infer_column_kinds(&mut self) {
        let mut categorical = Vec::new();
        let mut numerical = Vec::new();

        for col in self.data.get_columns() {
            let name = col.name().to_string();
            if name == self.target {
                continue;
            }
            match get_dtype_category(col.dtype()) {
                DtypeCategory::Numeric => numerical.push(name),
                DtypeCategory::String | DtypeCategory::Boolean => categorical.push(name),
                DtypeCategory::Datetime | DtypeCategory::Other => {}
            }
        }

        debug!(
            "Inferred {} categorical and {} numerical columns",
            categorical.len(),
            numerical.len()
        );
        self.categorical = categorical;
        self.numerical = numerical;
    }

    /// Missing count of every column, in column order. Float `NaN` counts
    /// as missing.
    pub fn missing_values(&self) -> Vec<MissingValueCount> {
        let rows = self.data.height();
        self.data
            .get_columns()
            .iter()
            .map(|col| {
                let null_count = missing_count(col);
                let null_percentage = if rows > 0 {
                    null_count as f64 / rows as f64 * 100.0
                } else {
                    0.0
                };
                MissingValueCount {
                    column: col.name().to_string(),
                    null_count,
                    null_percentage,
                }
            })
            .collect()
    }

    /// Values of `column` whose z-score magnitude exceeds
    /// `config.z_score_threshold`, in row order.
    pub fn detect_outliers(&self, column: &str) -> Result<Vec<f64>> {
        detect_zscore_outliers(&self.data, column, self.config.z_score_threshold)
            .context(format!("While detecting outliers in '{}'", column))
    }

    /// Keep only rows with `lower < value < upper` in `column`, replacing the
    /// held table. Rows with a null value are dropped.
    pub fn remove_outliers(&mut self, column: &str, lower: f64, upper: f64) -> Result<&DataFrame> {
        let before = self.data.height();
        let filtered = filter_between(&self.data, column, lower, upper)
            .context(format!("While removing outliers from '{}'", column))?;

        info!(
            "Removed {} rows outside ({}, {}) in '{}'",
            before - filtered.height(),
            lower,
            upper,
            column
        );
        self.data = filtered;
        Ok(&self.data)
    }

    /// Count plots of the categorical columns, optionally split by target.
    pub fn count_plots(&self, split_target: bool, show: bool) -> Result<Figure> {
        let hue = split_target.then_some(self.target.as_str());
        let figure = build_count_plots(&self.data, &self.categorical, hue, &self.config)?
            .titled(FigureKind::CountPlots.display_name());
        self.maybe_show(figure, show)
    }

    /// Histograms of the numerical columns, optionally with density curves
    /// and split by target.
    pub fn hist_plots(&self, kde: bool, split_target: bool, show: bool) -> Result<Figure> {
        let hue = split_target.then_some(self.target.as_str());
        let figure = build_histograms(&self.data, &self.numerical, kde, hue, &self.config)?
            .titled(FigureKind::Histograms.display_name());
        self.maybe_show(figure, show)
    }

    /// Scatter and density grid over every numeric column, colored by target.
    pub fn pair_plots(&self, show: bool) -> Result<Figure> {
        let figure = build_pair_plot(&self.data, &self.target, &self.config)?
            .titled(FigureKind::PairPlot.display_name());
        self.maybe_show(figure, show)
    }

    /// Pearson correlation of the one-hot encoded table.
    pub fn correlation_matrix(&self) -> Result<CorrelationMatrix> {
        let encoded = one_hot_encode(&self.data)?;
        Ok(correlation_matrix(&encoded))
    }

    /// Annotated heatmap of [`correlation_matrix`](Self::correlation_matrix).
    pub fn corr_coefficient(&self, show: bool) -> Result<Figure> {
        let matrix = self.correlation_matrix()?;
        let figure = build_correlation_heatmap(&matrix, &self.config);
        self.maybe_show(figure, show)
    }

    /// Build every view into one tabbed report and hand it to the display.
    ///
    /// Tabs, in order: Info, Categorical (counts split by target),
    /// Numerical (histograms with density), Pair Plots, Correlation
    /// Coefficient.
    pub fn full_eda(&self) -> Result<EdaReport> {
        info!("Building full EDA report for target '{}'", self.target);

        let tabs = vec![
            ReportTab::info("Info", self.info()),
            ReportTab::figure("Categorical", self.count_plots(true, false)?),
            ReportTab::figure("Numerical", self.hist_plots(true, false, false)?),
            ReportTab::figure("Pair Plots", self.pair_plots(false)?),
            ReportTab::figure("Correlation Coefficient", self.corr_coefficient(false)?),
        ];

        let report = EdaReport::new(self.target.clone(), self.data.shape(), tabs);
        self.display.show_report(&report)?;
        Ok(report)
    }

    fn maybe_show(&self, figure: Figure, show: bool) -> Result<Figure> {
        if show {
            self.display.show_figure(figure.kind.file_stem(), &figure)?;
        }
        Ok(figure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EdaError;
    use crate::plots::{ClosureDisplay, NoopDisplay};
    use std::sync::Mutex;

    fn passengers() -> DataFrame {
        df!(
            "age" => [Some(22.0), Some(38.0), Some(26.0), None, Some(35.0), Some(54.0)],
            "fare" => [7.25, 71.28, 7.92, 53.1, 8.05, 51.86],
            "sex" => ["m", "f", "f", "f", "m", "m"],
            "survived" => [0i32, 1, 1, 1, 0, 0]
        )
        .unwrap()
    }

    fn quiet_frame() -> EdaFrame {
        EdaFrame::builder(passengers(), "survived")
            .display(Arc::new(NoopDisplay))
            .build()
            .unwrap()
    }

    #[test]
    fn test_missing_values_per_column() {
        let eda = quiet_frame();
        let missing = eda.missing_values();

        assert_eq!(missing.len(), 4);
        assert_eq!(missing[0].column, "age");
        assert_eq!(missing[0].null_count, 1);
        assert!(missing[1..].iter().all(|m| m.null_count == 0));
    }

    #[test]
    fn test_remove_outliers_replaces_table() {
        let mut eda = quiet_frame();
        let rows = eda.remove_outliers("fare", 0.0, 60.0).unwrap().height();
        assert_eq!(rows, 5);
        assert_eq!(eda.data().height(), 5);

        // A second pass works on the narrowed table.
        eda.remove_outliers("age", 20.0, 30.0).unwrap();
        assert_eq!(eda.into_inner().height(), 2);
    }

    #[test]
    fn test_detect_outliers_error_keeps_code() {
        let eda = quiet_frame();
        let err = eda.detect_outliers("sex").unwrap_err();
        assert_eq!(err.error_code(), "NOT_NUMERIC");
        assert!(err.to_string().contains("While detecting outliers in 'sex'"));
    }

    #[test]
    fn test_infer_column_kinds_skips_target() {
        let mut eda = quiet_frame();
        eda.infer_column_kinds();
        assert_eq!(eda.categorical(), &["sex".to_string()]);
        assert_eq!(eda.numerical(), &["age".to_string(), "fare".to_string()]);
    }

    #[test]
    fn test_undeclared_lists_fail_lazily() {
        let mut eda = quiet_frame();
        eda.set_categorical(vec!["deck".to_string()]);
        assert!(matches!(
            eda.count_plots(false, false),
            Err(EdaError::ColumnNotFound(name)) if name == "deck"
        ));
    }

    #[test]
    fn test_show_hands_figure_to_display() {
        let shown = Arc::new(Mutex::new(Vec::new()));
        let sink = shown.clone();
        let eda = EdaFrame::builder(passengers(), "survived")
            .categorical(vec!["sex".to_string()])
            .on_figure(move |name, _figure| sink.lock().unwrap().push(name.to_string()))
            .build()
            .unwrap();

        eda.count_plots(true, true).unwrap();
        eda.count_plots(true, false).unwrap();
        assert_eq!(*shown.lock().unwrap(), vec!["count_plots".to_string()]);
    }

    #[test]
    fn test_full_eda_tab_order() {
        let mut eda = quiet_frame();
        eda.infer_column_kinds();
        let report = eda.full_eda().unwrap();

        assert_eq!(
            report.tab_titles(),
            vec![
                "Info",
                "Categorical",
                "Numerical",
                "Pair Plots",
                "Correlation Coefficient"
            ]
        );
        assert_eq!(report.shape, (6, 4));
        let kinds: Vec<FigureKind> = report
            .tabs
            .iter()
            .filter_map(|t| t.as_figure())
            .map(|f| f.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                FigureKind::CountPlots,
                FigureKind::Histograms,
                FigureKind::PairPlot,
                FigureKind::CorrelationHeatmap
            ]
        );
    }

    #[test]
    fn test_closure_display_type_is_accepted() {
        let display: Arc<dyn FigureDisplay> = Arc::new(ClosureDisplay::new(|_: &str, _: &Figure| {}));
        let eda = EdaFrame::builder(passengers(), "survived")
            .display(display)
            .build()
            .unwrap();
        assert!(eda.corr_coefficient(true).is_ok());
    }
}
