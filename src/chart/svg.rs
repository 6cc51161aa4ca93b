//! Static backend: standalone SVG markup.

use crate::chart::backend::RenderBackend;
use crate::chart::error::RenderError;
use crate::chart::palette;
use crate::constants::MAX_LABELED_CATEGORIES;
use crate::types::{ChartConfig, ChartData, ChartType};
use std::f64::consts::TAU;
use std::fmt::Write;

const NAME: &str = "static";

const MARGIN_LEFT: f64 = 60.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 50.0;

const AXIS_COLOR: &str = "#444444";
const EMPTY_COLOR: &str = "#cccccc";

#[derive(Clone, Copy, Debug, Default)]
pub struct SvgBackend;

impl RenderBackend for SvgBackend {
    fn name(&self) -> &'static str {
        NAME
    }

    fn render(
        &self,
        data: &ChartData,
        config: &ChartConfig,
        chart_type: ChartType,
    ) -> Result<String, RenderError> {
        draw(data, config, chart_type).map_err(|e| RenderError::backend(NAME, e.to_string()))
    }
}

/// Plot area inside the margins
#[derive(Clone, Copy)]
struct Plot {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

impl Plot {
    fn new(config: &ChartConfig) -> Self {
        Self {
            left: MARGIN_LEFT,
            top: MARGIN_TOP,
            width: (config.width as f64 - MARGIN_LEFT - MARGIN_RIGHT).max(1.0),
            height: (config.height as f64 - MARGIN_TOP - MARGIN_BOTTOM).max(1.0),
        }
    }

    fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Map a y value in `[lo, hi]` to a pixel row
    fn y(&self, value: f64, (lo, hi): (f64, f64)) -> f64 {
        self.bottom() - (value - lo) / (hi - lo) * self.height
    }
}

fn draw(data: &ChartData, config: &ChartConfig, chart_type: ChartType) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    let (w, h) = (config.width, config.height);

    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" data-chart-type="{}">"#,
        chart_type.as_str()
    )?;
    writeln!(out, r#"<rect width="100%" height="100%" fill="white"/>"#)?;
    if !config.title.is_empty() {
        writeln!(
            out,
            r#"<text x="{}" y="24" text-anchor="middle" font-size="16">{}</text>"#,
            w as f64 / 2.0,
            escape(&config.title)
        )?;
    }

    let plot = Plot::new(config);
    match chart_type {
        ChartType::Bar => draw_bars(&mut out, data, config, plot)?,
        ChartType::Line => {
            let xs = (0..data.len()).map(|i| Some(index_x(plot, i, data.len()))).collect();
            draw_axes(&mut out, config, plot)?;
            draw_series(&mut out, data, config, plot, xs)?;
        }
        ChartType::TimeSeries => {
            draw_axes(&mut out, config, plot)?;
            draw_series(&mut out, data, config, plot, time_xs(data, plot))?;
        }
        ChartType::Pie => draw_pie(&mut out, data, config, plot)?,
    }

    out.push_str("</svg>\n");
    Ok(out)
}

fn draw_axes(out: &mut String, config: &ChartConfig, plot: Plot) -> std::fmt::Result {
    writeln!(
        out,
        r#"<path d="M{l},{t} V{b} H{r}" stroke="{AXIS_COLOR}" fill="none"/>"#,
        l = plot.left,
        t = plot.top,
        b = plot.bottom(),
        r = plot.left + plot.width
    )?;
    if !config.x_label.is_empty() {
        writeln!(
            out,
            r#"<text x="{}" y="{}" text-anchor="middle" font-size="12">{}</text>"#,
            plot.left + plot.width / 2.0,
            plot.bottom() + 40.0,
            escape(&config.x_label)
        )?;
    }
    if !config.y_label.is_empty() {
        let (x, y) = (16.0, plot.top + plot.height / 2.0);
        writeln!(
            out,
            r#"<text x="{x}" y="{y}" text-anchor="middle" font-size="12" transform="rotate(-90 {x} {y})">{}</text>"#,
            escape(&config.y_label)
        )?;
    }
    Ok(())
}

/// Y range always including zero, never degenerate
fn value_range(data: &ChartData) -> (f64, f64) {
    let (lo, hi) = data.y_range().unwrap_or((0.0, 1.0));
    let (lo, hi) = (lo.min(0.0), hi.max(0.0));
    if hi > lo { (lo, hi) } else { (lo, lo + 1.0) }
}

fn index_x(plot: Plot, i: usize, n: usize) -> f64 {
    plot.left + plot.width * (i as f64 + 0.5) / n.max(1) as f64
}

fn time_xs(data: &ChartData, plot: Plot) -> Vec<Option<f64>> {
    let stamps: Vec<Option<i64>> = data
        .x_values()
        .iter()
        .map(|x| x.as_instant().map(|t| t.and_utc().timestamp_millis()))
        .collect();
    let lo = stamps.iter().flatten().min().copied().unwrap_or(0);
    let hi = stamps.iter().flatten().max().copied().unwrap_or(0);
    let span = (hi - lo).max(1) as f64;
    stamps
        .into_iter()
        .map(|s| s.map(|s| plot.left + (s - lo) as f64 / span * plot.width))
        .collect()
}

fn draw_bars(out: &mut String, data: &ChartData, config: &ChartConfig, plot: Plot) -> std::fmt::Result {
    draw_axes(out, config, plot)?;
    let range = value_range(data);
    let n = data.len().max(1);
    let slot = plot.width / n as f64;
    let bar_width = slot * 0.8;
    let zero = plot.y(0.0, range);

    for (i, (x, y)) in data.points().enumerate() {
        let center = index_x(plot, i, n);
        if y.is_finite() {
            let top = plot.y(y, range).min(zero);
            let height = (plot.y(y, range) - zero).abs();
            writeln!(
                out,
                r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}"/>"#,
                center - bar_width / 2.0,
                top,
                bar_width,
                height,
                palette::color_at(&config.color_scheme, i)
            )?;
        }
        if data.len() <= MAX_LABELED_CATEGORIES {
            writeln!(
                out,
                r#"<text x="{:.2}" y="{:.2}" text-anchor="middle" font-size="10">{}</text>"#,
                center,
                plot.bottom() + 14.0,
                escape(&x.to_string())
            )?;
        }
    }
    Ok(())
}

/// Polylines through the finite points; a missing x or y breaks the line
fn draw_series(
    out: &mut String,
    data: &ChartData,
    config: &ChartConfig,
    plot: Plot,
    xs: Vec<Option<f64>>,
) -> std::fmt::Result {
    let range = value_range(data);
    let color = palette::color_at(&config.color_scheme, 0);

    let mut segments: Vec<Vec<(f64, f64)>> = vec![Vec::new()];
    for (x, y) in xs.into_iter().zip(data.y_values().iter().copied()) {
        match x {
            Some(x) if y.is_finite() => {
                if let Some(segment) = segments.last_mut() {
                    segment.push((x, plot.y(y, range)));
                }
            }
            _ => segments.push(Vec::new()),
        }
    }

    for segment in segments.iter().filter(|s| !s.is_empty()) {
        let points: Vec<String> = segment
            .iter()
            .map(|(x, y)| format!("{:.2},{:.2}", x, y))
            .collect();
        writeln!(
            out,
            r#"<polyline points="{}" fill="none" stroke="{color}" stroke-width="2"/>"#,
            points.join(" ")
        )?;
    }
    Ok(())
}

fn draw_pie(out: &mut String, data: &ChartData, config: &ChartConfig, plot: Plot) -> std::fmt::Result {
    let cx = plot.left + plot.width / 2.0;
    let cy = plot.top + plot.height / 2.0;
    let r = plot.width.min(plot.height) / 2.0;

    let total: f64 = data.y_values().iter().filter(|v| v.is_finite()).sum();
    if total <= 0.0 {
        return writeln!(out, r#"<circle cx="{cx:.2}" cy="{cy:.2}" r="{r:.2}" fill="{EMPTY_COLOR}"/>"#);
    }

    let mut angle = -TAU / 4.0;
    for (i, y) in data.y_values().iter().copied().enumerate() {
        if !y.is_finite() || y <= 0.0 {
            continue;
        }
        let color = palette::color_at(&config.color_scheme, i);
        let sweep = y / total * TAU;
        if sweep >= TAU - 1e-9 {
            writeln!(out, r#"<circle cx="{cx:.2}" cy="{cy:.2}" r="{r:.2}" fill="{color}"/>"#)?;
        } else {
            let (x0, y0) = (cx + r * angle.cos(), cy + r * angle.sin());
            let end = angle + sweep;
            let (x1, y1) = (cx + r * end.cos(), cy + r * end.sin());
            let large_arc = u8::from(sweep > TAU / 2.0);
            writeln!(
                out,
                r#"<path d="M{cx:.2},{cy:.2} L{x0:.2},{y0:.2} A{r:.2},{r:.2} 0 {large_arc} 1 {x1:.2},{y1:.2} Z" fill="{color}"/>"#
            )?;
        }
        angle += sweep;
    }
    Ok(())
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
