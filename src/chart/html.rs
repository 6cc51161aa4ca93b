//! Interactive backend: an embeddable `<div>` plus a JSON figure description.
//!
//! The figure follows the common `{data: [trace], layout}` shape understood
//! by browser charting libraries; the host page is responsible for loading
//! one and drawing into the div.

use crate::chart::backend::RenderBackend;
use crate::chart::error::RenderError;
use crate::chart::palette;
use crate::types::{ChartConfig, ChartData, ChartType, ChartValue};
use serde_json::{Value, json};

const NAME: &str = "interactive";

#[derive(Clone, Copy, Debug, Default)]
pub struct HtmlBackend;

impl RenderBackend for HtmlBackend {
    fn name(&self) -> &'static str {
        NAME
    }

    fn render(
        &self,
        data: &ChartData,
        config: &ChartConfig,
        chart_type: ChartType,
    ) -> Result<String, RenderError> {
        let figure = figure(data, config, chart_type);
        let payload = serde_json::to_string(&figure)
            .map_err(|e| RenderError::backend(NAME, e.to_string()))?
            .replace("</", "<\\/");

        let id = format!("chart-{}", uuid::Uuid::new_v4());
        Ok(format!(
            concat!(
                "<div id=\"{id}\" class=\"chartboard-chart\" data-chart-type=\"{kind}\" ",
                "style=\"width:{w}px;height:{h}px;\"></div>\n",
                "<script type=\"application/json\" data-for=\"{id}\">{payload}</script>\n"
            ),
            id = id,
            kind = chart_type.as_str(),
            w = config.width,
            h = config.height,
            payload = payload,
        ))
    }
}

/// Build the `{data, layout}` figure for one chart
pub fn figure(data: &ChartData, config: &ChartConfig, chart_type: ChartType) -> Value {
    let colors = palette::palette(&config.color_scheme);
    let point_colors: Vec<&str> = (0..data.len())
        .map(|i| colors[i % colors.len()])
        .collect();
    let y: Vec<Option<f64>> = data
        .y_values()
        .iter()
        .map(|v| v.is_finite().then_some(*v))
        .collect();
    let x: Vec<Option<String>> = data.x_values().iter().map(x_entry).collect();

    let trace = match chart_type {
        ChartType::Bar => json!({
            "type": "bar",
            "x": x,
            "y": y,
            "marker": { "color": point_colors },
        }),
        ChartType::Line => json!({
            "type": "scatter",
            "mode": "lines+markers",
            "x": x,
            "y": y,
            "line": { "color": colors[0] },
        }),
        ChartType::Pie => json!({
            "type": "pie",
            "labels": x,
            "values": y,
            "marker": { "colors": point_colors },
        }),
        ChartType::TimeSeries => json!({
            "type": "scatter",
            "mode": "lines",
            "x": x,
            "y": y,
            "line": { "color": colors[0] },
        }),
    };

    let mut layout = json!({
        "title": { "text": config.title },
        "width": config.width,
        "height": config.height,
        "colorway": colors,
    });
    if chart_type != ChartType::Pie {
        layout["xaxis"] = json!({ "title": { "text": config.x_label } });
        layout["yaxis"] = json!({ "title": { "text": config.y_label } });
    }
    if chart_type == ChartType::TimeSeries {
        layout["xaxis"]["type"] = json!("date");
    }

    json!({ "data": [trace], "layout": layout })
}

fn x_entry(value: &ChartValue) -> Option<String> {
    match value {
        ChartValue::Missing => None,
        ChartValue::Instant(t) => Some(t.format("%Y-%m-%dT%H:%M:%S").to_string()),
        other => Some(other.to_string()),
    }
}
