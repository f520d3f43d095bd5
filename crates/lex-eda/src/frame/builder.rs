use super::EdaFrame;
use crate::config::{ConfigValidationError, EdaConfig};
use crate::plots::{ClosureDisplay, Figure, FigureDisplay, SvgFileDisplay};
use polars::prelude::DataFrame;
use std::sync::Arc;

/// Builder for [`EdaFrame`].
///
/// # Example
///
/// ```rust,ignore
/// use lex_eda::{EdaConfig, EdaFrame};
///
/// let eda = EdaFrame::builder(df, "Survived")
///     .config(EdaConfig::builder().z_score_threshold(2.5).build()?)
///     .categorical(vec!["Sex".into(), "Embarked".into()])
///     .numerical(vec!["Age".into(), "Fare".into()])
///     .on_figure(|name, figure| println!("{}: {} panels", name, figure.panels.len()))
///     .build()?;
/// ```
pub struct EdaFrameBuilder {
    data: DataFrame,
    target: String,
    categorical: Vec<String>,
    numerical: Vec<String>,
    config: Option<EdaConfig>,
    display: Option<Arc<dyn FigureDisplay>>,
}

static_assertions::assert_impl_all!(EdaFrameBuilder: Send);

impl EdaFrameBuilder {
    pub(super) fn new(data: DataFrame, target: impl Into<String>) -> Self {
        Self {
            data,
            target: target.into(),
            categorical: Vec::new(),
            numerical: Vec::new(),
            config: None,
            display: None,
        }
    }

    pub fn config(mut self, config: EdaConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn categorical(mut self, columns: Vec<String>) -> Self {
        self.categorical = columns;
        self
    }

    pub fn numerical(mut self, columns: Vec<String>) -> Self {
        self.numerical = columns;
        self
    }

    /// Set where shown figures and reports go.
    ///
    /// Defaults to an [`SvgFileDisplay`] over `config.output_dir`.
    pub fn display(mut self, display: Arc<dyn FigureDisplay>) -> Self {
        self.display = Some(display);
        self
    }

    /// Forward shown figures to a closure.
    pub fn on_figure<F>(mut self, callback: F) -> Self
    where
        F: Fn(&str, &Figure) + Send + Sync + 'static,
    {
        self.display = Some(Arc::new(ClosureDisplay::new(callback)));
        self
    }

    /// Build the frame.
    ///
    /// Returns an error if the configuration is invalid. Column lists are
    /// not checked against the table here.
    pub fn build(self) -> Result<EdaFrame, ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let display = match self.display {
            Some(display) => display,
            None => Arc::new(SvgFileDisplay::new(config.output_dir.clone())),
        };

        Ok(EdaFrame {
            data: self.data,
            target: self.target,
            categorical: self.categorical,
            numerical: self.numerical,
            config,
            display,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    #[test]
    fn test_builder_defaults() {
        let df = df!("x" => [1.0, 2.0]).unwrap();
        let eda = EdaFrame::builder(df, "x").build().unwrap();
        assert_eq!(eda.target(), "x");
        assert!(eda.categorical().is_empty());
        assert_eq!(eda.config(), &EdaConfig::default());
    }

    #[test]
    fn test_builder_rejects_invalid_config() {
        let df = df!("x" => [1.0, 2.0]).unwrap();
        let config = EdaConfig {
            grid_columns: 0,
            ..EdaConfig::default()
        };
        let result = EdaFrame::builder(df, "x").config(config).build();
        assert!(matches!(
            result,
            Err(ConfigValidationError::MustBePositive { .. })
        ));
    }

    #[test]
    fn test_builder_sets_lists() {
        let df = df!("a" => ["u", "v"], "b" => [1.0, 2.0], "t" => [0, 1]).unwrap();
        let eda = EdaFrame::builder(df, "t")
            .categorical(vec!["a".to_string()])
            .numerical(vec!["b".to_string()])
            .build()
            .unwrap();
        assert_eq!(eda.categorical(), &["a".to_string()]);
        assert_eq!(eda.numerical(), &["b".to_string()]);
    }
}
