//! SVG rendering of [`Figure`]s with plotters.

use super::figure::{
    CountPanel, DensityPanel, Figure, HeatmapPanel, HistogramPanel, Panel, ScatterPanel,
    point_bounds,
};
use crate::error::{EdaError, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::debug;

type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;

/// Categorical palette for target values (matplotlib's tab10).
const PALETTE: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

const FONT: &str = "sans-serif";

fn render_err<E: std::fmt::Display>(err: E) -> EdaError {
    EdaError::Render(err.to_string())
}

fn series_color(idx: usize) -> RGBColor {
    PALETTE[idx % PALETTE.len()]
}

/// Draw a figure into an SVG document.
pub fn render_svg(figure: &Figure) -> Result<String> {
    let mut buf = String::new();
    {
        let root = SVGBackend::with_string(&mut buf, (figure.width, figure.height))
            .into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let root = match &figure.title {
            Some(title) => root.titled(title, (FONT, 22)).map_err(render_err)?,
            None => root,
        };

        if figure.is_empty() {
            let (w, h) = root.dim_in_pixel();
            let style = (FONT, 16)
                .into_font()
                .color(&BLACK)
                .pos(Pos::new(HPos::Center, VPos::Center));
            root.draw_text("No columns to plot", &style, (w as i32 / 2, h as i32 / 2))
                .map_err(render_err)?;
        } else {
            let areas = root.split_evenly((figure.rows, figure.cols));
            for (panel, area) in figure.panels.iter().zip(areas.iter()) {
                draw_panel(area, panel)?;
            }
        }

        root.present().map_err(render_err)?;
    }

    debug!(
        "Rendered {} figure ({} panels, {} bytes)",
        figure.kind.display_name(),
        figure.panels.len(),
        buf.len()
    );
    Ok(buf)
}

fn draw_panel(area: &Area<'_>, panel: &Panel) -> Result<()> {
    match panel {
        Panel::Count(p) => draw_count(area, p),
        Panel::Histogram(p) => draw_histogram(area, p),
        Panel::Scatter(p) => draw_scatter(area, p),
        Panel::Density(p) => draw_density(area, p),
        Panel::Heatmap(p) => draw_heatmap(area, p),
    }
}

/// Label for an integer tick on a categorical axis; blank between ticks.
fn category_label(categories: &[String], position: f64) -> String {
    let rounded = position.round();
    if (position - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    categories
        .get(rounded as usize)
        .cloned()
        .unwrap_or_default()
}

/// Widen a degenerate range so plotters has something to scale.
fn padded(lo: f64, hi: f64, fraction: f64) -> (f64, f64) {
    if hi - lo <= f64::EPSILON {
        return (lo - 0.5, hi + 0.5);
    }
    let pad = (hi - lo) * fraction;
    (lo - pad, hi + pad)
}

fn draw_count(area: &Area<'_>, panel: &CountPanel) -> Result<()> {
    let k = panel.categories.len();
    if k == 0 {
        return Ok(());
    }
    let y_max = (panel.max_count() as f64 * 1.1).max(1.0);

    let mut chart = ChartBuilder::on(area)
        .caption(&panel.column, (FONT, 16))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(45)
        .build_cartesian_2d(-0.5..(k as f64 - 0.5), 0.0..y_max)
        .map_err(render_err)?;

    let x_fmt = |x: &f64| category_label(&panel.categories, *x);
    let y_fmt = |y: &f64| format!("{:.0}", y);
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(k)
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&y_fmt)
        .y_desc("count")
        .draw()
        .map_err(render_err)?;

    let groups = panel.series.len().max(1);
    let width = 0.8 / groups as f64;

    for (j, series) in panel.series.iter().enumerate() {
        let color = series_color(j);
        let bars = series.counts.iter().enumerate().map(|(i, count)| {
            let x0 = i as f64 - 0.4 + j as f64 * width;
            Rectangle::new([(x0, 0.0), (x0 + width, *count as f64)], color.filled())
        });
        let anno = chart.draw_series(bars).map_err(render_err)?;
        if let Some(label) = &series.label {
            anno.label(label.as_str()).legend(move |(x, y)| {
                Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
            });
        }
    }

    if panel.series.iter().any(|s| s.label.is_some()) {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(render_err)?;
    }
    Ok(())
}

fn draw_histogram(area: &Area<'_>, panel: &HistogramPanel) -> Result<()> {
    if panel.edges.len() < 2 {
        return Ok(());
    }
    let (x0, x1) = (panel.edges[0], panel.edges[panel.edges.len() - 1]);
    let y_max = (panel.max_height() * 1.05).max(1.0);
    let split = panel.series.iter().any(|s| s.label.is_some());

    let mut chart = ChartBuilder::on(area)
        .caption(&panel.column, (FONT, 16))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(45)
        .build_cartesian_2d(x0..x1, 0.0..y_max)
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .y_desc("count")
        .draw()
        .map_err(render_err)?;

    for (j, series) in panel.series.iter().enumerate() {
        let color = series_color(j);
        // Overlaid series stay translucent so each remains visible.
        let fill = if split { color.mix(0.45) } else { color.mix(0.75) };
        let bars = series
            .counts
            .iter()
            .zip(panel.edges.windows(2))
            .map(|(count, edge)| {
                Rectangle::new([(edge[0], 0.0), (edge[1], *count as f64)], fill.filled())
            });
        let anno = chart.draw_series(bars).map_err(render_err)?;
        if let Some(label) = &series.label {
            anno.label(label.as_str()).legend(move |(x, y)| {
                Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
            });
        }

        if let Some(curve) = &series.kde {
            chart
                .draw_series(LineSeries::new(
                    curve.iter().copied(),
                    color.stroke_width(2),
                ))
                .map_err(render_err)?;
        }
    }

    if split {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(render_err)?;
    }
    Ok(())
}

fn draw_scatter(area: &Area<'_>, panel: &ScatterPanel) -> Result<()> {
    let Some((x0, x1, y0, y1)) = point_bounds(panel.groups.iter().flat_map(|g| g.points.iter()))
    else {
        return Ok(());
    };
    let (x0, x1) = padded(x0, x1, 0.05);
    let (y0, y1) = padded(y0, y1, 0.05);

    let mut chart = ChartBuilder::on(area)
        .margin(8)
        .x_label_area_size(30)
        .y_label_area_size(45)
        .build_cartesian_2d(x0..x1, y0..y1)
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .x_desc(panel.x_column.as_str())
        .y_desc(panel.y_column.as_str())
        .draw()
        .map_err(render_err)?;

    for (j, group) in panel.groups.iter().enumerate() {
        let color = series_color(j);
        chart
            .draw_series(
                group
                    .points
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), 3, color.mix(0.6).filled())),
            )
            .map_err(render_err)?;

        if let Some(fit) = &group.fit {
            chart
                .draw_series(LineSeries::new(
                    [(fit.x_min, fit.at(fit.x_min)), (fit.x_max, fit.at(fit.x_max))],
                    color.stroke_width(2),
                ))
                .map_err(render_err)?;
        }
    }
    Ok(())
}

fn draw_density(area: &Area<'_>, panel: &DensityPanel) -> Result<()> {
    let Some((x0, x1, _, y1)) = point_bounds(panel.curves.iter().flat_map(|c| c.points.iter()))
    else {
        return Ok(());
    };
    let (x0, x1) = padded(x0, x1, 0.0);
    let y_max = if y1 > 0.0 { y1 * 1.05 } else { 1.0 };

    let mut chart = ChartBuilder::on(area)
        .margin(8)
        .x_label_area_size(30)
        .y_label_area_size(45)
        .build_cartesian_2d(x0..x1, 0.0..y_max)
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .x_desc(panel.column.as_str())
        .y_desc("density")
        .draw()
        .map_err(render_err)?;

    for (j, curve) in panel.curves.iter().enumerate() {
        let color = series_color(j);
        let anno = chart
            .draw_series(LineSeries::new(
                curve.points.iter().copied(),
                color.stroke_width(2),
            ))
            .map_err(render_err)?;
        if let Some(label) = &curve.label {
            anno.label(label.as_str())
                .legend(move |(x, y)| PathElement::new([(x, y), (x + 14, y)], color.stroke_width(2)));
        }
    }

    if panel.curves.iter().any(|c| c.label.is_some()) {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(render_err)?;
    }
    Ok(())
}

/// Diverging blue-white-red scale for coefficients in `[-1, 1]`.
fn coolwarm(value: f64) -> RGBColor {
    const COOL: (f64, f64, f64) = (59.0, 76.0, 192.0);
    const MID: (f64, f64, f64) = (221.0, 221.0, 221.0);
    const WARM: (f64, f64, f64) = (180.0, 4.0, 38.0);

    if !value.is_finite() {
        return RGBColor(245, 245, 245);
    }
    let t = ((value + 1.0) / 2.0).clamp(0.0, 1.0);
    let (from, to, s) = if t < 0.5 {
        (COOL, MID, t * 2.0)
    } else {
        (MID, WARM, (t - 0.5) * 2.0)
    };
    let lerp = |a: f64, b: f64| (a + (b - a) * s).round() as u8;
    RGBColor(lerp(from.0, to.0), lerp(from.1, to.1), lerp(from.2, to.2))
}

fn draw_heatmap(area: &Area<'_>, panel: &HeatmapPanel) -> Result<()> {
    let n = panel.labels.len();
    if n == 0 {
        return Ok(());
    }
    let extent = n as f64 - 0.5;
    // Row 0 is drawn at the top, so y positions count down from n - 1.
    let row_labels: Vec<String> = panel.labels.iter().rev().cloned().collect();

    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .x_label_area_size(140)
        .y_label_area_size(140)
        .build_cartesian_2d(-0.5..extent, -0.5..extent)
        .map_err(render_err)?;

    let x_fmt = |x: &f64| category_label(&panel.labels, *x);
    let y_fmt = |y: &f64| category_label(&row_labels, *y);
    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(n)
        .y_labels(n)
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&y_fmt)
        .x_label_style((FONT, 12).into_font().transform(FontTransform::Rotate90))
        .y_label_style((FONT, 12))
        .draw()
        .map_err(render_err)?;

    let cells = (0..n).flat_map(|row| (0..n).map(move |col| (row, col)));
    chart
        .draw_series(cells.clone().map(|(row, col)| {
            let value = panel.value(row, col);
            let y = (n - 1 - row) as f64;
            let x = col as f64;
            Rectangle::new(
                [(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)],
                coolwarm(value).filled(),
            )
        }))
        .map_err(render_err)?;

    let font_size = if n > 20 { 9 } else { 12 };
    chart
        .draw_series(cells.map(|(row, col)| {
            let value = panel.value(row, col);
            let color = if value.is_finite() && value.abs() > 0.6 {
                &WHITE
            } else {
                &BLACK
            };
            let style = (FONT, font_size)
                .into_font()
                .color(color)
                .pos(Pos::new(HPos::Center, VPos::Center));
            Text::new(
                panel.annotation(row, col),
                (col as f64, (n - 1 - row) as f64),
                style,
            )
        }))
        .map_err(render_err)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plots::figure::{
        CountSeries, DensityCurve, FigureKind, HistogramSeries, RegressionLine, ScatterGroup,
    };

    fn count_figure() -> Figure {
        let panel = CountPanel {
            column: "embarked".to_string(),
            categories: vec!["C".to_string(), "Q".to_string(), "S".to_string()],
            series: vec![
                CountSeries {
                    label: Some("0".to_string()),
                    counts: vec![3, 1, 7],
                },
                CountSeries {
                    label: Some("1".to_string()),
                    counts: vec![4, 2, 5],
                },
            ],
        };
        Figure::with_grid(FigureKind::CountPlots, vec![Panel::Count(panel)], 2, 640, 320)
    }

    #[test]
    fn test_render_count_figure() {
        let svg = render_svg(&count_figure().titled("Counts")).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("embarked"));
        assert!(svg.contains("Counts"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_render_histogram_and_density() {
        let histogram = HistogramPanel {
            column: "fare".to_string(),
            edges: vec![0.0, 10.0, 20.0, 30.0],
            series: vec![HistogramSeries {
                label: None,
                counts: vec![5, 3, 1],
                kde: Some(vec![(0.0, 4.0), (15.0, 3.0), (30.0, 0.5)]),
            }],
        };
        let density = DensityPanel {
            column: "fare".to_string(),
            curves: vec![DensityCurve {
                label: Some("1".to_string()),
                points: vec![(0.0, 0.01), (10.0, 0.04), (20.0, 0.02)],
            }],
        };
        let figure = Figure::with_grid(
            FigureKind::Histograms,
            vec![Panel::Histogram(histogram), Panel::Density(density)],
            2,
            640,
            320,
        );
        let svg = render_svg(&figure).unwrap();
        assert!(svg.contains("fare"));
        assert!(svg.contains("<polyline"));
    }

    #[test]
    fn test_render_scatter_with_fit() {
        let panel = ScatterPanel {
            x_column: "age".to_string(),
            y_column: "fare".to_string(),
            groups: vec![ScatterGroup {
                label: Some("0".to_string()),
                points: vec![(1.0, 2.0), (2.0, 4.1), (3.0, 5.9)],
                fit: Some(RegressionLine {
                    slope: 2.0,
                    intercept: 0.0,
                    x_min: 1.0,
                    x_max: 3.0,
                }),
            }],
        };
        let figure = Figure::with_grid(FigureKind::PairPlot, vec![Panel::Scatter(panel)], 1, 300, 300);
        let svg = render_svg(&figure).unwrap();
        assert!(svg.contains("<circle"));
    }

    #[test]
    fn test_render_heatmap_annotations() {
        let panel = HeatmapPanel {
            labels: vec!["age".to_string(), "fare".to_string()],
            values: vec![vec![1.0, -0.31], vec![-0.31, 1.0]],
            decimals: 2,
        };
        let figure = Figure::with_grid(
            FigureKind::CorrelationHeatmap,
            vec![Panel::Heatmap(panel)],
            1,
            600,
            600,
        );
        let svg = render_svg(&figure).unwrap();
        assert!(svg.contains("-0.31"));
        assert!(svg.contains("1.00"));
    }

    #[test]
    fn test_render_ragged_heatmap_leaves_missing_cells_blank() {
        let panel = HeatmapPanel {
            labels: vec!["age".to_string(), "fare".to_string()],
            values: vec![vec![1.0, 0.25]],
            decimals: 2,
        };
        assert!(panel.value(1, 0).is_nan());
        assert_eq!(panel.annotation(1, 1), "");

        let figure = Figure::with_grid(
            FigureKind::CorrelationHeatmap,
            vec![Panel::Heatmap(panel)],
            1,
            400,
            400,
        );
        let svg = render_svg(&figure).unwrap();
        assert!(svg.contains("0.25"));
    }

    #[test]
    fn test_render_empty_figure() {
        let figure = Figure::with_grid(FigureKind::Histograms, Vec::new(), 2, 200, 200);
        let svg = render_svg(&figure).unwrap();
        assert!(svg.contains("No columns to plot"));
    }

    #[test]
    fn test_coolwarm_endpoints() {
        assert_eq!(coolwarm(-1.0), RGBColor(59, 76, 192));
        assert_eq!(coolwarm(0.0), RGBColor(221, 221, 221));
        assert_eq!(coolwarm(1.0), RGBColor(180, 4, 38));
    }

    #[test]
    fn test_category_label_only_on_integer_ticks() {
        let cats = vec!["a".to_string(), "b".to_string()];
        assert_eq!(category_label(&cats, 1.0), "b");
        assert_eq!(category_label(&cats, 0.5), "");
        assert_eq!(category_label(&cats, 2.0), "");
        assert_eq!(category_label(&cats, -1.0), "");
    }
}
