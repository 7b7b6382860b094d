// Copyright 2026 the Charta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Renders one of every chart family to SVG and writes an HTML gallery.
//!
//! Usage: `charta_demo [OUT_DIR]`, defaulting to `target/charta_demo`.

mod report;

use std::error::Error;
use std::path::PathBuf;

use charta_charts::{
    AreaChart, AreaConfig, AxisConfig, AxisLocation, BarChart, BarConfig, BarSeries, BoxConfig, BoxPlot, BulletChart,
    BulletConfig, Caption, Chart, ChartProps, ChartResult, ColumnChart, ColumnConfig, Curve, DataLabel, Dragging,
    Drawing, EdgeDef, EventShape, LineChart, LineConfig, LinearGauge, LinearGaugeConfig, LollipopChart,
    LollipopConfig, Metric, Network, NetworkConfig, NetworkData, NodeDef, PieChart, PieConfig, PizzaChart,
    PizzaConfig, RadarChart, RadarConfig, RangeAxis, RangeConfig, RangePlot, ReferenceLine, Region, RingGauge,
    RingGaugeConfig, RingLabelPosition, ScatterConfig, ScatterPlot, SeriesConfig,
    Speedometer, SpeedometerConfig, SpineChart, SpineConfig, SpineSeries, StackedBarChart, StackedConfig,
    SummaryAxis, TimeFormat, TimelineChart, TimelineConfig, TimelineEvents, TooltipConfig, Zooming,
};
use charta_core::{Record, SymbolShape, record};
use charta_stack::StackingType;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use report::{Section, render_report};

/// How far into the entry animation the midway frame is taken.
const MIDWAY_MS: f64 = 250.0;

fn main() -> Result<(), Box<dyn Error>> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .try_init();

    let out_dir = std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from("target/charta_demo"), PathBuf::from);
    std::fs::create_dir_all(&out_dir)?;

    let sections = vec![
        pie_demo()?,
        bar_demo()?,
        column_demo()?,
        stacked_demo()?,
        line_demo()?,
        area_demo()?,
        scatter_demo()?,
        lollipop_demo()?,
        spine_demo()?,
        range_demo()?,
        box_demo()?,
        timeline_demo()?,
        speedometer_demo()?,
        linear_gauge_demo()?,
        bullet_demo()?,
        pizza_demo()?,
        ring_gauge_demo()?,
        radar_demo()?,
        network_demo()?,
    ];

    for section in &sections {
        let path = out_dir.join(format!("{}.svg", section.name));
        std::fs::write(&path, &section.svg)?;
        tracing::debug!(path = %path.display(), "wrote chart");
    }
    let index = out_dir.join("index.html");
    std::fs::write(&index, render_report("charta gallery", &sections))?;
    tracing::info!(charts = sections.len(), path = %index.display(), "wrote gallery");
    Ok(())
}

fn section<C: Chart>(name: &'static str, chart: &C) -> Section {
    let animated = chart.base().props().drawing.is_some();
    Section {
        name,
        svg: chart.to_svg(),
        midway: animated.then(|| chart.surface().to_svg_at(MIDWAY_MS)),
    }
}

fn drawing() -> Drawing {
    Drawing::new(800.0).with_delay(40.0)
}

fn fruit() -> Vec<Record> {
    [("apples", 42, 12), ("pears", 17, 30), ("plums", 28, -8), ("figs", 9, 21)]
        .into_iter()
        .map(|(name, sold, margin)| {
            record([("name", json!(name)), ("sold", json!(sold)), ("margin", json!(margin))])
        })
        .collect()
}

fn weeks() -> Vec<Record> {
    (0..12)
        .map(|week| {
            let w = f64::from(week);
            record([
                ("week", json!(week)),
                ("visits", json!((w * 0.7).sin().mul_add(20.0, 60.0).round())),
                ("signups", json!((w * 0.4).cos().mul_add(8.0, 15.0).round())),
            ])
        })
        .collect()
}

fn pie_demo() -> ChartResult<Section> {
    let props = ChartProps::new("pie").with_size(400.0, 400.0).with_drawing(drawing());
    let config = PieConfig::new("sold")
        .with_name_key("name")
        .with_inner_radius(0.5)
        .with_padding_angle(1.0)
        .with_title(Caption::new("Fruit sold"));
    let mut chart = PieChart::new(props, config, Some(TooltipConfig::new().with_keys(["name", "sold"])))?;
    chart.render(&fruit());
    Ok(section("pie", &chart))
}

fn bar_demo() -> ChartResult<Section> {
    let series = BarSeries::from_axis(
        AxisConfig::new("margin")
            .with_class_name("fill-green-600")
            .with_class_name_negative("fill-red-600"),
    );
    let config = BarConfig::new("name", vec![series]).with_data_label(DataLabel::default());
    let mut chart = BarChart::new(ChartProps::new("bar").with_drawing(drawing()), config, None)?;
    chart.render(&fruit());
    Ok(section("bar", &chart))
}

fn column_demo() -> ChartResult<Section> {
    let config = ColumnConfig::new("name", vec![BarSeries::new("sold"), BarSeries::new("margin")])
        .with_reference_line(ReferenceLine::default())
        .with_whole_numbers();
    let mut chart = ColumnChart::new(ChartProps::new("column"), config, Some(TooltipConfig::new()))?;
    chart.render(&fruit());
    Ok(section("column", &chart))
}

fn stacked_demo() -> ChartResult<Section> {
    let config = StackedConfig::columns("week", vec![BarSeries::new("visits"), BarSeries::new("signups")])
        .with_stacking(StackingType::Percent);
    let mut chart = StackedBarChart::new(ChartProps::new("stacked"), config, Some(TooltipConfig::new()))?;
    chart.render(&weeks());
    Ok(section("stacked", &chart))
}

fn line_demo() -> ChartResult<Section> {
    let config = LineConfig::new(
        AxisConfig::new("week").with_label("Week"),
        vec![
            SeriesConfig::new("visits").with_curve(Curve::Rounded),
            SeriesConfig::new("signups")
                .with_symbol(SymbolShape::Circle)
                .with_location(AxisLocation::Right),
        ],
    )
    .with_guide_lines();
    let props = ChartProps::new("line").with_zooming(Zooming::enabled()).with_drawing(drawing());
    let mut chart = LineChart::new(props, config, Some(TooltipConfig::new()))?;
    chart.render(&weeks());
    Ok(section("line", &chart))
}

fn area_demo() -> ChartResult<Section> {
    let config = AreaConfig::new(
        AxisConfig::new("week"),
        vec![SeriesConfig::new("visits"), SeriesConfig::new("signups")],
    )
    .with_stacking(StackingType::Streamgraph);
    let mut chart = AreaChart::new(ChartProps::new("area"), config, None)?;
    chart.render(&weeks());
    Ok(section("area", &chart))
}

fn scatter_demo() -> ChartResult<Section> {
    let config = ScatterConfig::new(AxisConfig::new("sold"), AxisConfig::new("margin"))
        .with_size("sold", 40.0, 400.0)
        .with_shape("name", [("apples", "circle"), ("pears", "diamond"), ("plums", "star")]);
    let props = ChartProps::new("scatter").with_zooming(Zooming::enabled());
    let mut chart = ScatterPlot::new(props, config, Some(TooltipConfig::new()))?;
    chart.render(&fruit());
    Ok(section("scatter", &chart))
}

fn lollipop_demo() -> ChartResult<Section> {
    let config = LollipopConfig::horizontal(AxisConfig::new("name"), AxisConfig::new("sold"))
        .with_shape(SymbolShape::Diamond);
    let props = ChartProps::new("lollipop").with_drawing(drawing());
    let mut chart = LollipopChart::new(props, config, Some(TooltipConfig::new()))?;
    chart.render(&fruit());
    Ok(section("lollipop", &chart))
}

fn spine_demo() -> ChartResult<Section> {
    let rows: Vec<Record> = [
        ("0-17", 11, 3, 10, 4),
        ("18-39", 18, 9, 17, 11),
        ("40-64", 15, 12, 16, 14),
        ("65+", 6, 9, 8, 12),
    ]
    .into_iter()
    .map(|(age, mu, mr, fu, fr)| {
        record([
            ("age", json!(age)),
            ("male urban", json!(mu)),
            ("male rural", json!(mr)),
            ("female urban", json!(fu)),
            ("female rural", json!(fr)),
        ])
    })
    .collect();
    let config = SpineConfig::new(
        AxisConfig::new("age"),
        vec![
            SpineSeries::left("male urban"),
            SpineSeries::left("male rural"),
            SpineSeries::right("female urban"),
            SpineSeries::right("female rural"),
        ],
    );
    let props = ChartProps::new("spine").with_drawing(drawing());
    let mut chart = SpineChart::new(props, config, Some(TooltipConfig::new()))?;
    chart.render(&rows);
    Ok(section("spine", &chart))
}

fn range_demo() -> ChartResult<Section> {
    let rows: Vec<Record> = [("north", 12, 31), ("south", 18, 24), ("east", 5, 40)]
        .into_iter()
        .map(|(region, from, to)| record([("region", json!(region)), ("from", json!(from)), ("to", json!(to))]))
        .collect();
    let config = RangeConfig::new(RangeAxis::new("from", "to"), AxisConfig::new("region")).comets();
    let mut chart = RangePlot::new(ChartProps::new("range").with_drawing(drawing()), config, None)?;
    chart.render(&rows);
    Ok(section("range", &chart))
}

fn box_demo() -> ChartResult<Section> {
    let rows: Vec<Record> = [("a", [2, 5, 7, 9, 14]), ("b", [4, 6, 8, 11, 12]), ("c", [1, 3, 4, 6, 10])]
        .into_iter()
        .map(|(name, [min, q1, mid, q3, max])| {
            record([
                ("name", json!(name)),
                ("min", json!(min)),
                ("firstQuartile", json!(q1)),
                ("mid", json!(mid)),
                ("lastQuartile", json!(q3)),
                ("max", json!(max)),
            ])
        })
        .collect();
    let config = BoxConfig::horizontal(AxisConfig::new("name"), SummaryAxis::default());
    let mut chart = BoxPlot::new(ChartProps::new("box"), config, Some(TooltipConfig::new()))?;
    chart.render(&rows);
    Ok(section("box", &chart))
}

fn timeline_demo() -> ChartResult<Section> {
    let rows: Vec<Record> = [
        ("design", "2026-01-05", "2026-02-10", "span"),
        ("build", "2026-02-01", "2026-05-20", "span"),
        ("build", "2026-03-15", "2026-03-15", "milestone"),
        ("launch", "2026-06-01", "2026-06-01", "milestone"),
    ]
    .into_iter()
    .map(|(phase, start, end, kind)| {
        record([("phase", json!(phase)), ("start", json!(start)), ("end", json!(end)), ("kind", json!(kind))])
    })
    .collect();
    let events = TimelineEvents::new(AxisConfig::new("start").with_time(TimeFormat::default()))
        .with_end("end")
        .with_shapes("kind", [("span", EventShape::Rect), ("milestone", EventShape::Circle)]);
    let config = TimelineConfig::new(events).with_tracks("phase");
    let mut chart = TimelineChart::new(ChartProps::new("timeline").with_size(600.0, 200.0), config)?;
    chart.render(&rows);
    Ok(section("timeline", &chart))
}

fn speedometer_demo() -> ChartResult<Section> {
    let config = SpeedometerConfig::default()
        .with_region(Region::new(60.0, "fill-green-500"))
        .with_region(Region::new(85.0, "fill-yellow-500"))
        .with_region(Region::new(100.0, "fill-red-500"))
        .with_label(Caption::new("km/h"));
    let props = ChartProps::new("speedometer").with_size(300.0, 200.0).with_drawing(drawing());
    let mut chart = Speedometer::new(props, config, None)?;
    chart.render(&72.0);
    Ok(section("speedometer", &chart))
}

fn linear_gauge_demo() -> ChartResult<Section> {
    let config = LinearGaugeConfig {
        label: Some("Disk".to_string()),
        max: 500.0,
        ..LinearGaugeConfig::default()
    };
    let props = ChartProps::new("linear-gauge").with_size(300.0, 60.0);
    let mut chart = LinearGauge::new(props, config, Some(TooltipConfig::new()))?;
    chart.render(&320.0);
    Ok(section("linear-gauge", &chart))
}

fn bullet_demo() -> ChartResult<Section> {
    let config = BulletConfig::new(150.0, 225.0, 250.0, 300.0).with_label("Revenue");
    let props = ChartProps::new("bullet").with_size(500.0, 50.0).with_drawing(drawing());
    let mut chart = BulletChart::new(props, config)?;
    chart.render(&270.0);
    Ok(section("bullet", &chart))
}

fn pizza_demo() -> ChartResult<Section> {
    let metrics = [
        Metric::new("pace").with_classes("text-blue-700", "text-blue-100"),
        Metric::new("shooting"),
        Metric::new("passing"),
        Metric::new("defending"),
        Metric::new("physical"),
    ];
    let props = ChartProps::new("pizza").with_size(360.0, 360.0).with_drawing(drawing());
    let mut chart = PizzaChart::new(props, PizzaConfig::new(metrics), Some(TooltipConfig::new()))?;
    chart.render(&record([
        ("pace", json!(0.9)),
        ("shooting", json!(0.65)),
        ("passing", json!(0.8)),
        ("defending", json!(0.3)),
        ("physical", json!(0.55)),
    ]));
    Ok(section("pizza", &chart))
}

fn ring_gauge_demo() -> ChartResult<Section> {
    let config = RingGaugeConfig::new("name", "value", "target").with_label_position(RingLabelPosition::Bottom);
    let props = ChartProps::new("ring-gauge").with_size(300.0, 360.0).with_drawing(drawing());
    let mut chart = RingGauge::new(props, config, Some(TooltipConfig::new()))?;
    chart.render(&[
        record([("name", json!("Move")), ("value", json!(420)), ("target", json!(600)), ("className", json!("text-red-500"))]),
        record([("name", json!("Exercise")), ("value", json!(35)), ("target", json!(30)), ("className", json!("text-green-500"))]),
        record([("name", json!("Stand")), ("value", json!(8)), ("target", json!(12)), ("className", json!("text-sky-500"))]),
    ]);
    Ok(section("ring-gauge", &chart))
}

fn radar_demo() -> ChartResult<Section> {
    let metrics = ["attack", "defense", "speed", "stamina", "technique"].map(AxisConfig::new);
    let config = RadarConfig::new(AxisConfig::new("player"), metrics)
        .with_class("Alice", "text-blue-500")
        .with_class("Bob", "text-orange-500");
    let props = ChartProps::new("radar").with_size(420.0, 420.0).with_drawing(drawing());
    let mut chart = RadarChart::new(props, config, Some(TooltipConfig::new()))?;
    chart.render(&[
        record([
            ("player", json!("Alice")),
            ("attack", json!(80)),
            ("defense", json!(55)),
            ("speed", json!(90)),
            ("stamina", json!(70)),
            ("technique", json!(65)),
        ]),
        record([
            ("player", json!("Bob")),
            ("attack", json!(60)),
            ("defense", json!(85)),
            ("speed", json!(45)),
            ("stamina", json!(75)),
            ("technique", json!(50)),
        ]),
    ]);
    Ok(section("radar", &chart))
}

fn network_demo() -> ChartResult<Section> {
    let nodes = ["hub", "a", "b", "c", "d", "e"]
        .into_iter()
        .enumerate()
        .map(|(i, id)| {
            record([
                ("id", json!(id)),
                ("kind", json!(if i == 0 { "core" } else { "leaf" })),
                ("load", json!(i + 1)),
            ])
        })
        .collect();
    let edges = [("hub", "a", 1), ("hub", "b", 3), ("hub", "c", 2), ("c", "d", 1), ("c", "e", 4)]
        .into_iter()
        .map(|(source, target, weight)| {
            record([("source", json!(source)), ("target", json!(target)), ("weight", json!(weight))])
        })
        .collect();
    let node_def = NodeDef::new("id")
        .with_class_map("kind", [("core", "text-orange-500"), ("leaf", "text-slate-500")])
        .with_size("load", 64.0, 400.0)
        .with_tooltip(TooltipConfig::new().with_keys(["id", "load"]));
    let edge_def = EdgeDef::new("source", "target")
        .with_size("weight", 1.0, 4.0, 1.0)
        .with_tooltip(TooltipConfig::new().with_keys(["weight"]));
    let config = NetworkConfig::new(node_def, edge_def).with_dragging(Dragging {
        enabled: true,
        snap_to_new_position: false,
    });
    let mut chart = Network::new(ChartProps::new("network").with_zooming(Zooming::enabled()), config)?;
    chart.render(&NetworkData { nodes, edges });
    Ok(section("network", &chart))
}
