// Copyright 2026 the Charta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Radar charts: one closed polygon per record over radial metric spokes.

use core::f64::consts::TAU;

use indexmap::IndexMap;
use kurbo::Point;
use serde::{Deserialize, Serialize};

use charta_core::{Element, Paint, Record, TextAnchor, TextElement, Transform, TransitionFrom, number_at, text_at};

use crate::axis_config::AxisConfig;
use crate::chart::{Chart, ChartBase, ChartProps, animate, classes, listing_html};
use crate::error::{ChartError, ChartResult};
use crate::layout::Margin;
use crate::scale::ScaleLinear;
use crate::tooltip::TooltipConfig;

/// Radar chart settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RadarConfig {
    /// Field naming each record's polygon.
    pub label: AxisConfig,
    /// Spokes, clockwise from twelve o'clock.
    pub metrics: Vec<AxisConfig>,
    /// Value at the center.
    pub min: f64,
    /// Value at the rim.
    pub max: f64,
    /// Number of concentric grid rings.
    pub levels: usize,
    /// Extra polygon classes keyed by record label.
    pub class_name_map: IndexMap<String, String>,
}

impl Default for RadarConfig {
    fn default() -> Self {
        Self {
            label: AxisConfig::new("name"),
            metrics: Vec::new(),
            min: 0.0,
            max: 100.0,
            levels: 5,
            class_name_map: IndexMap::new(),
        }
    }
}

impl RadarConfig {
    /// Polygons named by `label` over `metrics`.
    pub fn new(label: AxisConfig, metrics: impl IntoIterator<Item = AxisConfig>) -> Self {
        Self {
            label,
            metrics: metrics.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Sets the value range spanned by each spoke.
    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    /// Adds a class for the polygon labelled `label`.
    pub fn with_class(mut self, label: impl Into<String>, class: impl Into<String>) -> Self {
        self.class_name_map.insert(label.into(), class.into());
        self
    }
}

/// Point at `radius` along the spoke at `angle` (clockwise from twelve o'clock).
fn polar(radius: f64, angle: f64) -> Point {
    Point::new(radius * angle.sin(), -radius * angle.cos())
}

/// A radar chart.
#[derive(Debug)]
pub struct RadarChart {
    base: ChartBase,
    config: RadarConfig,
}

impl RadarChart {
    /// Creates a radar chart.
    pub fn new(props: ChartProps, config: RadarConfig, tooltip: Option<TooltipConfig>) -> ChartResult<Self> {
        props.validate()?;
        if config.min > config.max {
            return Err(ChartError::InvalidDomain {
                key: "radar".to_string(),
                start: config.min,
                end: config.max,
            });
        }
        let html = listing_html(
            config.label.key.clone(),
            config.metrics.iter().map(|m| m.key.clone()).collect(),
        );
        Ok(Self {
            base: ChartBase::new(props, tooltip, Some(html), "radar-chart"),
            config,
        })
    }

    /// Spoke angles in radians.
    #[allow(clippy::cast_precision_loss, reason = "spoke counts are small")]
    fn angles(&self) -> Vec<f64> {
        let n = self.config.metrics.len();
        (0..n).map(|i| i as f64 * TAU / n as f64).collect()
    }
}

impl Chart for RadarChart {
    type Data = [Record];

    fn base(&self) -> &ChartBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ChartBase {
        &mut self.base
    }

    fn render(&mut self, data: &[Record]) {
        let angles = self.angles();
        let root = self.base.begin(data);
        let frame = self.base.frame(Margin::uniform(40.0));
        let plot = frame.plot_rect();
        let radius = (plot.width().min(plot.height()) / 2.0).max(0.0);
        let cfg = &self.config;
        let scale = ScaleLinear::new((cfg.min, cfg.max), (0.0, radius));
        let drawing = self.base.props.drawing;
        let delay = drawing.map_or(0.0, |d| d.delay_or(0.0));

        let surface = &mut self.base.surface;
        let center = plot.center();
        let g = surface
            .append(root, Element::Group)
            .with_transform(Transform::translate(center.x, center.y))
            .id();

        let grid = surface.append(g, Element::Group).with_class("radar-grid").id();
        if !angles.is_empty() {
            for level in 1..=cfg.levels {
                #[allow(clippy::cast_precision_loss, reason = "level counts are small")]
                let r = radius * level as f64 / cfg.levels as f64;
                surface
                    .append(grid, Element::Polygon(angles.iter().map(|a| polar(r, *a)).collect()))
                    .with_class("radar-level stroke-current opacity-25")
                    .with_fill(Paint::None)
                    .with_stroke(Paint::CurrentColor);
            }
        }
        for (metric, angle) in cfg.metrics.iter().zip(&angles) {
            surface
                .append(grid, Element::line(Point::ORIGIN, polar(radius, *angle)))
                .with_class("radar-spoke stroke-current opacity-25")
                .with_stroke(Paint::CurrentColor);
            let at = polar(radius + 12.0, *angle);
            // Labels on the left half grow leftwards, the rest rightwards.
            let anchor = match angle.sin() {
                s if s.abs() < 1e-6 => TextAnchor::Middle,
                s if s < 0.0 => TextAnchor::End,
                _ => TextAnchor::Start,
            };
            let text = metric.label().unwrap_or(&metric.key).to_string();
            surface
                .append(grid, Element::Text(TextElement::new(at, text).with_anchor(anchor)))
                .with_class("radar-label text-xs fill-current")
                .with_fill(Paint::CurrentColor);
        }

        let areas = surface.append(g, Element::Group).with_class("radar-areas").id();
        for (j, record) in data.iter().enumerate() {
            let points: Vec<Point> = cfg
                .metrics
                .iter()
                .zip(&angles)
                .map(|(m, a)| {
                    let v = number_at(record, &m.key).unwrap_or(cfg.min).clamp(cfg.min, cfg.max);
                    polar(scale.map(v), *a)
                })
                .collect();
            let collapsed = vec![Point::ORIGIN; points.len()];
            let name = text_at(record, &cfg.label.key).unwrap_or_default();
            let extra = cfg.class_name_map.get(&name).map_or("", String::as_str);
            #[allow(clippy::cast_precision_loss, reason = "record counts are small")]
            let at = j as f64 * delay;
            surface
                .append(areas, Element::Polygon(points))
                .with_class(classes(&["radar-area fill-current stroke-current fill-opacity-25", extra]))
                .with_fill(Paint::CurrentColor)
                .with_stroke(Paint::CurrentColor)
                .with_opacity(0.25)
                .with_datum(j)
                .with_transition(animate(drawing, TransitionFrom::Element(Element::Polygon(collapsed)), at));
        }

        self.base.finish("radar");
    }
}

#[cfg(test)]
mod tests {
    use charta_core::record;
    use serde_json::json;

    use super::*;
    use crate::chart::Drawing;

    fn config() -> RadarConfig {
        let metrics = ["speed", "power", "range", "comfort"].map(AxisConfig::new);
        RadarConfig::new(AxisConfig::new("name"), metrics).with_class("falcon", "text-red-500")
    }

    fn data() -> Vec<Record> {
        vec![
            record([
                ("name", json!("falcon")),
                ("speed", json!(100)),
                ("power", json!(50)),
                ("range", json!(0)),
                ("comfort", json!(150)),
            ]),
            record([("name", json!("heron")), ("speed", json!(25))]),
        ]
    }

    fn radar(props: ChartProps, tooltip: Option<TooltipConfig>) -> RadarChart {
        let Ok(c) = RadarChart::new(props, config(), tooltip) else {
            panic!("valid config");
        };
        c
    }

    fn areas(c: &RadarChart) -> Vec<Vec<Point>> {
        let s = c.surface();
        s.select_class("radar-area")
            .into_iter()
            .filter_map(|id| match s.get(id).map(|n| &n.element) {
                Some(Element::Polygon(points)) => Some(points.clone()),
                _ => None,
            })
            .collect()
    }

    fn assert_near(p: Point, x: f64, y: f64) {
        assert!((p.x - x).abs() < 1e-9 && (p.y - y).abs() < 1e-9, "{p:?} != ({x}, {y})");
    }

    #[test]
    fn vertices_sit_on_their_spokes() {
        let mut c = radar(ChartProps::new("radar").with_size(480.0, 480.0), None);
        c.render(&data());
        let areas = areas(&c);
        assert_eq!(areas.len(), 2);
        // 480 - 2 * 40 leaves a 200px radius.
        let falcon = &areas[0];
        assert_near(falcon[0], 0.0, -200.0);
        assert_near(falcon[1], 100.0, 0.0);
        assert_near(falcon[2], 0.0, 0.0);
        assert_near(falcon[3], -200.0, 0.0);
    }

    #[test]
    fn missing_values_sit_at_the_center() {
        let mut c = radar(ChartProps::new("radar").with_size(480.0, 480.0), None);
        c.render(&data());
        let heron = &areas(&c)[1];
        assert_near(heron[0], 0.0, -50.0);
        assert!(heron[1..].iter().all(|p| p.distance(Point::ORIGIN) < 1e-9));
    }

    #[test]
    fn grid_has_one_ring_per_level_and_a_spoke_per_metric() {
        let mut c = radar(ChartProps::new("radar"), None);
        c.render(&data());
        let s = c.surface();
        assert_eq!(s.select_class("radar-level").len(), 5);
        assert_eq!(s.select_class("radar-spoke").len(), 4);
        assert_eq!(s.select_class("radar-label").len(), 4);
        assert_eq!(s.select_class("text-red-500").len(), 1, "class map applies by label");
    }

    #[test]
    fn polygons_grow_from_the_center_in_turn() {
        let props = ChartProps::new("radar").with_drawing(Drawing::new(600.0).with_delay(100.0));
        let mut c = radar(props, None);
        c.render(&data());
        let s = c.surface();
        let delays: Vec<f64> = s
            .select_class("radar-area")
            .into_iter()
            .filter_map(|id| s.get(id).and_then(|n| n.transition.as_ref()).map(|t| t.delay_ms))
            .collect();
        assert_eq!(delays, vec![0.0, 100.0]);
    }

    #[test]
    fn tooltip_lists_every_metric() {
        let mut c = radar(ChartProps::new("radar").with_size(480.0, 480.0), Some(TooltipConfig::new()));
        c.render(&data());
        // Inside the falcon polygon, just below its top vertex.
        c.pointer_over(Point::new(240.0, 60.0));
        assert_eq!(
            c.tooltip().node().map(|n| n.content.as_str()),
            Some("falcon <br/> speed: 100<br/>power: 50<br/>range: 0<br/>comfort: 150")
        );
    }

    #[test]
    fn inverted_range_is_rejected() {
        let result = RadarChart::new(ChartProps::new("radar"), config().with_range(10.0, 0.0), None);
        assert!(matches!(result, Err(ChartError::InvalidDomain { .. })));
    }
}
