//! HTML rendering of an [`EdaReport`].

use super::report::{EdaReport, TabContent};
use crate::error::{Result, ResultExt};
use crate::plots::render_svg;
use crate::types::DatasetInfo;

const STYLE: &str = r#"
body { font-family: sans-serif; margin: 24px; color: #222; }
h1 { font-size: 22px; margin-bottom: 4px; }
.meta { color: #666; margin-top: 0; }
.tabs > input { display: none; }
.tabs > label { display: inline-block; padding: 8px 16px; border: 1px solid #ccc;
  border-bottom: none; background: #f4f4f4; cursor: pointer; margin-right: 2px; }
.tabs > input:checked + label { background: #fff; font-weight: bold; }
.tabs > .panel { display: none; border: 1px solid #ccc; padding: 16px; }
.tabs svg { max-width: 100%; height: auto; }
table { border-collapse: collapse; }
th, td { border: 1px solid #ddd; padding: 4px 10px; text-align: left; }
th { background: #f4f4f4; }
"#;

pub(super) fn render_report(report: &EdaReport) -> Result<String> {
    let mut html = String::new();
    let (rows, cols) = report.shape;

    let mut style = String::from(STYLE);
    for idx in 0..report.tabs.len() {
        style.push_str(&format!(
            "#tab-{idx}:checked ~ #panel-{idx} {{ display: block; }}\n"
        ));
    }

    html.push_str(&format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>EDA: {target}</title>\n<style>{style}</style>\n</head>\n<body>\n\
         <h1>Exploratory data analysis</h1>\n\
         <p class=\"meta\">Target: {target} &middot; {rows} rows &times; {cols} columns \
         &middot; generated {generated}</p>\n<div class=\"tabs\">\n",
        target = escape(&report.target),
        generated = escape(&report.generated_at),
    ));

    for (idx, tab) in report.tabs.iter().enumerate() {
        let checked = if idx == 0 { " checked" } else { "" };
        html.push_str(&format!(
            "<input type=\"radio\" name=\"tabs\" id=\"tab-{idx}\"{checked}>\
             <label for=\"tab-{idx}\">{}</label>\n",
            escape(&tab.title)
        ));
    }

    for (idx, tab) in report.tabs.iter().enumerate() {
        let body = match &tab.content {
            TabContent::Info(info) => info_table(info),
            TabContent::Figure(figure) => {
                render_svg(figure).context(format!("Failed to render tab '{}'", tab.title))?
            }
        };
        html.push_str(&format!(
            "<div class=\"panel\" id=\"panel-{idx}\">\n{body}\n</div>\n"
        ));
    }

    html.push_str("</div>\n</body>\n</html>\n");
    Ok(html)
}

fn info_table(info: &DatasetInfo) -> String {
    let mut out = format!(
        "<p>{} entries, {} columns</p>\n<table>\n\
         <tr><th>#</th><th>Column</th><th>Non-Null Count</th><th>Null Count</th><th>Dtype</th></tr>\n",
        info.rows, info.columns
    );
    for (idx, col) in info.column_info.iter().enumerate() {
        out.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            idx,
            escape(&col.name),
            col.non_null_count,
            col.null_count,
            escape(&col.dtype)
        ));
    }
    out.push_str("</table>\n");

    let dtypes: Vec<String> = info
        .dtype_counts()
        .into_iter()
        .map(|(dtype, count)| format!("{}({})", escape(&dtype), count))
        .collect();
    out.push_str(&format!(
        "<p>dtypes: {}</p>\n<p>memory usage: {} bytes</p>",
        dtypes.join(", "),
        info.estimated_size_bytes
    ));
    out
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
