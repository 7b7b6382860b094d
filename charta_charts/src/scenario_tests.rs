// Copyright 2026 the Charta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cross-chart behavior: domains, idempotent redraws, tooltip content and the end-to-end cases.

use core::f64::consts::TAU;

use approx::assert_relative_eq;
use charta_core::{Element, NodeId, Record, Sector, Surface, record};
use charta_stack::StackingType;
use kurbo::Point;
use serde_json::json;

use crate::{
    AxisConfig, BarChart, BarConfig, BarSeries, Chart, ChartProps, ColumnChart, ColumnConfig, LineChart, LineConfig,
    PieChart, PieConfig, ScatterConfig, ScatterPlot, SeriesConfig, StackedBarChart, StackedConfig, TooltipConfig,
    ZoomTransform, Zoomable, Zooming,
};

fn teams() -> Vec<Record> {
    vec![
        record([("team", json!("red")), ("gain", json!(12)), ("loss", json!(4))]),
        record([("team", json!("blue")), ("gain", json!(-5)), ("loss", json!(6))]),
        record([("team", json!("green")), ("gain", json!(30)), ("loss", json!(2))]),
    ]
}

/// Data-bound marks of a given element kind with their centers in surface coordinates.
fn bound_marks(surface: &Surface, pick: impl Fn(&Element) -> Option<Point>) -> Vec<(NodeId, Point)> {
    surface
        .descendants(surface.root())
        .into_iter()
        .filter_map(|id| {
            let node = surface.get(id)?;
            node.datum?;
            let local = pick(&node.element)?;
            Some((id, surface.world_transform(id) * local))
        })
        .collect()
}

fn bars(surface: &Surface) -> Vec<(NodeId, Point)> {
    bound_marks(surface, |e| match e {
        Element::Rect { rect, .. } => Some(rect.center()),
        _ => None,
    })
}

fn bar_chart(tooltip: Option<TooltipConfig>) -> BarChart {
    let series = BarSeries::from_axis(AxisConfig::new("gain").with_class_name("pos").with_class_name_negative("neg"));
    let Ok(chart) = BarChart::new(ChartProps::new("bars"), BarConfig::new("team", vec![series]), tooltip) else {
        panic!("valid config");
    };
    chart
}

#[test]
fn explicit_domain_ignores_the_data() {
    let Ok(axis) = AxisConfig::new("gain").with_domain(-100.0, 100.0) else {
        panic!("ordered domain");
    };
    let Ok(mut chart) =
        ColumnChart::new(ChartProps::new("cols"), ColumnConfig::new("team", vec![BarSeries::from_axis(axis)]), None)
    else {
        panic!("valid config");
    };
    chart.render(&teams());
    assert_eq!(chart.value_scale().map(|s| s.domain()), Some((-100.0, 100.0)));
}

#[test]
fn inferred_domain_shrinks_without_the_extreme_record() {
    let config = LineConfig::new(AxisConfig::new("t"), vec![SeriesConfig::new("v")]);
    let Ok(mut chart) = LineChart::new(ChartProps::new("line"), config, None) else {
        panic!("valid config");
    };
    let mut rows: Vec<Record> = [(0, 5), (1, 9), (2, 40)]
        .into_iter()
        .map(|(t, v)| record([("t", json!(t)), ("v", json!(v))]))
        .collect();
    chart.render(&rows);
    assert_eq!(chart.scales().and_then(|s| s.left).map(|s| s.domain()), Some((5.0, 40.0)));

    rows.pop();
    chart.render(&rows);
    assert_eq!(chart.scales().and_then(|s| s.left).map(|s| s.domain()), Some((5.0, 9.0)));
}

#[test]
fn rendering_twice_gives_the_same_marks() {
    let config = ScatterConfig::new(AxisConfig::new("gain"), AxisConfig::new("loss"));
    let Ok(mut chart) = ScatterPlot::new(ChartProps::new("scatter"), config, None) else {
        panic!("valid config");
    };
    chart.render(&teams());
    let first = chart.to_svg();
    let count = chart.surface().node_count();
    chart.render(&teams());
    assert_eq!(chart.surface().node_count(), count);
    assert_eq!(chart.to_svg(), first);
}

#[test]
fn tooltip_content_follows_html_then_keys_then_all_fields() {
    let cases = [
        (
            TooltipConfig::new().with_html(|d: &Record| format!("<b>{}</b>", d["team"].as_str().unwrap_or(""))),
            "<b>red</b>",
        ),
        (TooltipConfig::new().with_keys(["gain"]), "gain: 12"),
        (TooltipConfig::new(), "team: red<br/>gain: 12<br/>loss: 4"),
    ];
    for (tooltip, expected) in cases {
        let mut chart = bar_chart(Some(tooltip));
        chart.render(&teams());
        let Some((_, center)) = bars(chart.surface()).first().copied() else {
            panic!("bars drawn");
        };
        chart.pointer_over(center);
        assert_eq!(chart.tooltip().node().map(|n| n.content.as_str()), Some(expected));
    }
}

#[test]
fn full_stacking_fills_every_category() {
    let config = StackedConfig::columns("team", vec![BarSeries::new("gain"), BarSeries::new("loss")])
        .with_stacking(StackingType::Percent);
    let rows: Vec<Record> = teams()
        .into_iter()
        .map(|mut r| {
            r.insert("gain".into(), json!(r["gain"].as_f64().map_or(0.0, f64::abs)));
            r
        })
        .collect();
    let Ok(mut chart) = StackedBarChart::new(ChartProps::new("stacked"), config, None) else {
        panic!("valid config");
    };
    chart.render(&rows);
    let layout = chart.layout();
    for i in 0..rows.len() {
        let total: f64 = layout.iter().map(|s| s.points[i].upper - s.points[i].lower).sum();
        assert_relative_eq!(total, 1.0, epsilon = 1e-12);
    }
}

#[test]
fn pie_slices_run_largest_first_around_the_circle() {
    let rows: Vec<Record> = [("a", 10), ("b", 20), ("c", 30)]
        .into_iter()
        .map(|(n, v)| record([("name", json!(n)), ("value", json!(v))]))
        .collect();
    let Ok(mut chart) = PieChart::new(ChartProps::new("pie"), PieConfig::new("value"), None) else {
        panic!("valid config");
    };
    chart.render(&rows);
    let s = chart.surface();
    let sector = |name: &str| -> Sector {
        match s.find_by_test_id(name).and_then(|id| s.get(id)).map(|n| &n.element) {
            Some(Element::Sector(sector)) => *sector,
            _ => panic!("slice {name} drawn"),
        }
    };
    let (a, b, c) = (sector("a"), sector("b"), sector("c"));
    assert_relative_eq!(c.start_angle, 0.0);
    assert_relative_eq!(b.start_angle, c.end_angle, epsilon = 1e-12);
    assert_relative_eq!(a.start_angle, b.end_angle, epsilon = 1e-12);
    assert_relative_eq!(a.sweep() + b.sweep() + c.sweep(), TAU, epsilon = 1e-12);
}

#[test]
fn negative_bars_take_the_negative_class() {
    let mut chart = bar_chart(None);
    chart.render(&teams());
    let s = chart.surface();
    let classes: Vec<bool> = bars(s)
        .into_iter()
        .filter_map(|(id, _)| s.get(id).map(|n| n.attrs.has_class("neg")))
        .collect();
    assert_eq!(classes, vec![false, true, false]);
}

#[test]
fn line_zoom_remaps_x_and_leaves_y_alone() {
    let config = LineConfig::new(AxisConfig::new("t"), vec![SeriesConfig::new("v")]);
    let props = ChartProps::new("line").with_zooming(Zooming::enabled());
    let Ok(mut chart) = LineChart::new(props, config, None) else {
        panic!("valid config");
    };
    let rows: Vec<Record> =
        (0..5).map(|t| record([("t", json!(t)), ("v", json!(t * t))])).collect();
    chart.render(&rows);
    let Some(before) = chart.scales() else {
        panic!("rendered");
    };

    chart.zoom_to(ZoomTransform::new(2.0, -100.0, 0.0));
    let Some(after) = chart.scales() else {
        panic!("rendered");
    };
    let (r0, r1) = before.x.range();
    assert_eq!(after.x.range(), (2.0 * r0 - 100.0, 2.0 * r1 - 100.0));
    assert_eq!(after.left, before.left);
}

#[test]
fn charts_without_tooltips_never_create_one() {
    let mut chart = bar_chart(None);
    chart.render(&teams());
    let marks = bars(chart.surface());
    for (_, center) in &marks {
        chart.pointer_over(*center);
        chart.pointer_move(Point::new(center.x + 1.0, center.y + 1.0));
    }
    chart.pointer_leave();
    assert!(chart.tooltip().node().is_none());
    assert!(!marks.is_empty());
}

#[test]
fn empty_data_draws_the_shell() {
    let mut chart = bar_chart(Some(TooltipConfig::new()));
    chart.render(&[]);
    let s = chart.surface();
    assert!(s.find_by_test_id("x-axis").is_some());
    assert!(bars(s).is_empty());
}
