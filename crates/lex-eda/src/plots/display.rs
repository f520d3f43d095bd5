//! Where figures go when a builder is asked to show them.

use super::figure::Figure;
use super::render::render_svg;
use crate::error::{Result, ResultExt};
use crate::reporting::EdaReport;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Trait for receiving figures and reports produced by an
/// [`EdaFrame`](crate::EdaFrame).
///
/// Implementations must be `Send + Sync` so a frame can be moved to a
/// worker thread.
///
/// # Example
///
/// ```rust,ignore
/// use lex_eda::{Figure, FigureDisplay};
///
/// struct ChannelDisplay {
///     tx: std::sync::mpsc::SyncSender<Figure>,
/// }
///
/// impl FigureDisplay for ChannelDisplay {
///     fn show_figure(&self, _name: &str, figure: &Figure) -> lex_eda::Result<()> {
///         self.tx.send(figure.clone()).ok();
///         Ok(())
///     }
/// }
/// ```
pub trait FigureDisplay: Send + Sync {
    /// Called with every figure built with `show = true`.
    fn show_figure(&self, name: &str, figure: &Figure) -> Result<()>;

    /// Called with the finished full report. Ignored by default.
    fn show_report(&self, _report: &EdaReport) -> Result<()> {
        Ok(())
    }
}

/// Writes figures as `<name>.svg` and the full report as `eda_report.html`
/// into a directory.
#[derive(Debug, Clone)]
pub struct SvgFileDisplay {
    output_dir: PathBuf,
}

impl SvgFileDisplay {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.output_dir).context(format!(
            "Failed to create output directory {}",
            self.output_dir.display()
        ))
    }
}

impl FigureDisplay for SvgFileDisplay {
    fn show_figure(&self, name: &str, figure: &Figure) -> Result<()> {
        self.ensure_dir()?;
        let path = self.output_dir.join(format!("{}.svg", name));
        fs::write(&path, render_svg(figure)?)
            .context(format!("Failed to write {}", path.display()))?;
        info!("Figure saved: {}", path.display());
        Ok(())
    }

    fn show_report(&self, report: &EdaReport) -> Result<()> {
        self.ensure_dir()?;
        let path = self.output_dir.join("eda_report.html");
        fs::write(&path, report.to_html()?)
            .context(format!("Failed to write {}", path.display()))?;
        info!("Report saved: {}", path.display());
        Ok(())
    }
}

/// Wrapper that implements [`FigureDisplay`] using a closure.
///
/// Reports are ignored; each figure is passed to the closure along with its
/// name.
pub struct ClosureDisplay<F>
where
    F: Fn(&str, &Figure) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureDisplay<F>
where
    F: Fn(&str, &Figure) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> FigureDisplay for ClosureDisplay<F>
where
    F: Fn(&str, &Figure) + Send + Sync,
{
    fn show_figure(&self, name: &str, figure: &Figure) -> Result<()> {
        (self.callback)(name, figure);
        Ok(())
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDisplay;

impl FigureDisplay for NoopDisplay {
    fn show_figure(&self, _name: &str, _figure: &Figure) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plots::FigureKind;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn empty_figure() -> Figure {
        Figure::with_grid(FigureKind::Histograms, Vec::new(), 2, 200, 200)
    }

    #[test]
    fn test_closure_display_forwards_name() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let display = ClosureDisplay::new(move |name: &str, figure: &Figure| {
            assert_eq!(name, "histograms");
            assert!(figure.is_empty());
            seen.fetch_add(1, Ordering::SeqCst);
        });

        display.show_figure("histograms", &empty_figure()).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_svg_file_display_writes_file() {
        let dir = std::env::temp_dir().join(format!("lex_eda_display_{}", std::process::id()));
        let display = SvgFileDisplay::new(&dir);

        display.show_figure("histograms", &empty_figure()).unwrap();
        let svg = fs::read_to_string(dir.join("histograms.svg")).unwrap();
        assert!(svg.contains("<svg"));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_noop_display() {
        assert!(NoopDisplay.show_figure("x", &empty_figure()).is_ok());
    }
}
