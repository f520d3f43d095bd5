use crate::error::{Result, ResultExt};
use crate::plots::Figure;
use crate::types::DatasetInfo;
use chrono::Local;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Tabbed exploratory report over one dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdaReport {
    /// Timestamp when the report was generated (RFC 3339, local time)
    pub generated_at: String,
    /// Column used to color and split charts
    pub target: String,
    /// `(rows, columns)` of the analyzed table
    pub shape: (usize, usize),
    pub tabs: Vec<ReportTab>,
}

/// One tab of the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportTab {
    pub title: String,
    pub content: TabContent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum TabContent {
    Info(DatasetInfo),
    Figure(Figure),
}

impl ReportTab {
    pub fn info(title: impl Into<String>, info: DatasetInfo) -> Self {
        Self {
            title: title.into(),
            content: TabContent::Info(info),
        }
    }

    pub fn figure(title: impl Into<String>, figure: Figure) -> Self {
        Self {
            title: title.into(),
            content: TabContent::Figure(figure),
        }
    }

    /// The tab's figure, if it holds one.
    pub fn as_figure(&self) -> Option<&Figure> {
        match &self.content {
            TabContent::Figure(figure) => Some(figure),
            TabContent::Info(_) => None,
        }
    }
}

impl EdaReport {
    /// Create a report stamped with the current local time.
    pub fn new(target: impl Into<String>, shape: (usize, usize), tabs: Vec<ReportTab>) -> Self {
        Self {
            generated_at: Local::now().to_rfc3339(),
            target: target.into(),
            shape,
            tabs,
        }
    }

    pub fn tab_titles(&self) -> Vec<&str> {
        self.tabs.iter().map(|t| t.title.as_str()).collect()
    }

    /// Look up a tab by title.
    pub fn tab(&self, title: &str) -> Option<&ReportTab> {
        self.tabs.iter().find(|t| t.title == title)
    }

    /// Pretty-printed JSON. Undefined coefficients serialize as `null`.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Self-contained HTML page with CSS-only tabs.
    pub fn to_html(&self) -> Result<String> {
        super::html::render_report(self)
    }

    /// Write `<stem>_eda.html` and `<stem>_eda.json` into `dir`, creating it
    /// if needed. Returns the two paths.
    pub fn write_to_dir(&self, dir: impl AsRef<Path>, stem: &str) -> Result<(PathBuf, PathBuf)> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .context(format!("Failed to create output directory {}", dir.display()))?;

        let html_path = dir.join(format!("{}_eda.html", stem));
        let mut file = File::create(&html_path)?;
        file.write_all(self.to_html()?.as_bytes())?;

        let json_path = dir.join(format!("{}_eda.json", stem));
        let mut file = File::create(&json_path)?;
        file.write_all(self.to_json()?.as_bytes())?;

        info!(
            "Report saved: {} and {}",
            html_path.display(),
            json_path.display()
        );

        Ok((html_path, json_path))
    }
}
