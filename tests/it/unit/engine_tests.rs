//! Unit tests for ChartEngine and the built-in backends.

use crate::helpers::day;
use chartboard::chart::{BackendKind, ChartEngine, RenderError};
use chartboard::types::{ChartConfig, ChartData, ChartType, ChartValue};

fn bar_data() -> ChartData {
    ChartData::from_pairs(["A", "B", "C"], [10.0, 25.0, 15.0]).unwrap()
}

#[test]
fn test_every_builder_tags_its_chart_type() {
    let engine = ChartEngine::default();
    let config = ChartConfig::new("Sales");

    let bar = engine.create_bar_chart(bar_data(), config.clone()).unwrap();
    let line = engine.create_line_chart(bar_data(), config.clone()).unwrap();
    let pie = engine.create_pie_chart(bar_data(), config.clone()).unwrap();
    let series = ChartData::from_pairs([day(1), day(2)], [1.0, 2.0]).unwrap();
    let ts = engine.create_time_series(series, config).unwrap();

    assert_eq!(bar.chart_type(), ChartType::Bar);
    assert_eq!(line.chart_type(), ChartType::Line);
    assert_eq!(pie.chart_type(), ChartType::Pie);
    assert_eq!(ts.chart_type(), ChartType::TimeSeries);
    for artifact in [&bar, &line, &pie, &ts] {
        assert!(!artifact.rendered_content().is_empty());
    }
}

#[test]
fn test_static_backend_renders_svg() {
    let engine = ChartEngine::from_kinds(BackendKind::Static, None);
    let chart = engine
        .create_line_chart(bar_data(), ChartConfig::default())
        .unwrap();
    assert!(chart.rendered_content().starts_with("<svg"));
    assert_eq!(engine.backend_name(), "static");
    assert_eq!(engine.fallback_name(), None);
}

#[test]
fn test_negative_pie_value_produces_no_artifact() {
    let data = ChartData::from_pairs(["A", "B", "C"], [1.0, 2.0, -0.5]).unwrap();
    let result = ChartEngine::default().create_pie_chart(data, ChartConfig::default());
    assert!(matches!(
        result,
        Err(RenderError::NegativeValue { index: 2, .. })
    ));
}

#[test]
fn test_time_series_tolerates_gaps() {
    let data = ChartData::new(
        vec![ChartValue::Instant(day(1)), ChartValue::Missing, ChartValue::Instant(day(3))],
        vec![1.0, 2.0, 3.0],
    )
    .unwrap();
    assert!(
        ChartEngine::default()
            .create_time_series(data, ChartConfig::default())
            .is_ok()
    );
}

#[test]
fn test_update_chart_config_is_copy_on_write() {
    let engine = ChartEngine::default();
    let original = engine
        .create_bar_chart(bar_data(), ChartConfig::new("v1"))
        .unwrap();
    let before = original.rendered_content().to_string();

    let cfg2 = ChartConfig::new("v2")
        .with_color_scheme("viridis")
        .with_size(1024, 768);
    let updated = engine.update_chart_config(&original, cfg2.clone()).unwrap();

    assert_eq!(updated.config(), &cfg2);
    assert!(updated.shares_data_with(&original));
    assert_eq!(updated.data(), original.data());
    assert_eq!(original.config().title, "v1");
    assert_eq!(original.rendered_content(), before);
}

#[test]
fn test_zero_dimensions_rejected() {
    let mut config = ChartConfig::default();
    config.width = 0;
    let err = ChartEngine::default()
        .create_bar_chart(bar_data(), config)
        .unwrap_err();
    assert_eq!(
        err,
        RenderError::InvalidDimensions {
            width: 0,
            height: 600
        }
    );
}
