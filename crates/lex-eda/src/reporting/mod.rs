//! Full-report output.
//!
//! An [`EdaReport`] is the tabbed result of
//! [`EdaFrame::full_eda`](crate::EdaFrame::full_eda). It can be:
//! - serialized to JSON for a frontend that draws the figures itself
//! - rendered to a self-contained HTML page with one SVG per figure tab
//! - written to an output directory as both
//!
//! # Example
//!
//! ```rust,ignore
//! use lex_eda::EdaFrame;
//!
//! let eda = EdaFrame::new(df, "Survived");
//! let report = eda.full_eda()?;
//!
//! println!("{}", report.to_json()?);
//! let (html, json) = report.write_to_dir("eda_output", "titanic")?;
//! ```

mod html;
mod report;

pub use report::{EdaReport, ReportTab, TabContent};
