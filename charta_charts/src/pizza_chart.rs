// Copyright 2026 the Charta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pizza charts: equal slices whose radius encodes one metric each.

use core::f64::consts::TAU;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;

use charta_core::{Element, Paint, Record, Sector, Transform, TransitionFrom, number_at, record, text_at};

use crate::chart::{Chart, ChartBase, ChartProps, classes};
use crate::error::{ChartError, ChartResult};
use crate::layout::Margin;
use crate::pie_chart::pie_layout;
use crate::scale::ScaleLinear;
use crate::tooltip::TooltipConfig;

/// One slice of the pizza.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Metric {
    /// Field read from the data record.
    pub key: String,
    /// Class of the value slice.
    pub class_name: Option<String>,
    /// Class of the full-radius backdrop slice.
    pub class_name_background: Option<String>,
}

impl Metric {
    /// A metric over `key`.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    /// Sets the slice classes.
    pub fn with_classes(mut self, class_name: impl Into<String>, background: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self.class_name_background = Some(background.into());
        self
    }
}

/// Pizza chart settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PizzaConfig {
    /// Slices in clockwise order from 12 o'clock.
    pub metrics: Vec<Metric>,
    /// Value at the center.
    pub min: f64,
    /// Value at the full radius.
    pub max: f64,
    /// Gap between slices, in degrees.
    pub padding_angle: f64,
    /// Slice corner rounding.
    pub corner_radius: f64,
}

impl Default for PizzaConfig {
    fn default() -> Self {
        Self {
            metrics: Vec::new(),
            min: 0.0,
            max: 1.0,
            padding_angle: 2.0,
            corner_radius: 0.0,
        }
    }
}

impl PizzaConfig {
    /// A pizza over `metrics`.
    pub fn new(metrics: impl IntoIterator<Item = Metric>) -> Self {
        Self {
            metrics: metrics.into_iter().collect(),
            ..Self::default()
        }
    }
}

/// A pizza chart over one record.
#[derive(Debug)]
pub struct PizzaChart {
    base: ChartBase,
    config: PizzaConfig,
}

impl PizzaChart {
    /// Creates a pizza chart.
    pub fn new(props: ChartProps, config: PizzaConfig, tooltip: Option<TooltipConfig>) -> ChartResult<Self> {
        props.validate()?;
        if config.min > config.max {
            return Err(ChartError::InvalidDomain {
                key: "pizza".to_string(),
                start: config.min,
                end: config.max,
            });
        }
        let html = Arc::new(|d: &Record| {
            format!(
                "<div class=\"text-gray-800\">{} = {}</div>",
                text_at(d, "key").unwrap_or_default(),
                text_at(d, "value").unwrap_or_default()
            )
        });
        Ok(Self {
            base: ChartBase::new(props, tooltip, Some(html), "pizza-chart"),
            config,
        })
    }
}

impl Chart for PizzaChart {
    type Data = Record;

    fn base(&self) -> &ChartBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ChartBase {
        &mut self.base
    }

    fn render(&mut self, data: &Record) {
        let cfg = &self.config;
        // One row per slice so hovering either layer finds its metric.
        let rows: Vec<Record> = cfg
            .metrics
            .iter()
            .enumerate()
            .map(|(i, m)| {
                record([
                    ("index", json!(i)),
                    ("key", json!(m.key)),
                    ("value", data.get(&m.key).cloned().unwrap_or(serde_json::Value::Null)),
                ])
            })
            .collect();
        let root = self.base.begin(&rows);
        let frame = self.base.frame(Margin::uniform(20.0));
        let m = frame.margin;
        let area_w = frame.size.width - m.left - m.right;
        let area_h = frame.size.height - m.top - m.bottom;
        let max_radius = area_w.min(area_h).max(0.0) / 2.0;
        let radius = ScaleLinear::new((cfg.min, cfg.max), (0.0, max_radius));
        let pad = cfg.padding_angle.to_radians();
        let slices = pie_layout(&vec![1.0; cfg.metrics.len()], 0.0, TAU, pad, false);
        let delay = self.base.props.drawing.map_or(0.0, |d| d.delay_or(0.0));

        let transitions: Vec<_> = slices
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let from = Sector::new(0.0, 0.0, s.start_angle, s.end_angle)
                    .with_pad_angle(pad)
                    .with_corner_radius(cfg.corner_radius);
                #[allow(clippy::cast_precision_loss, reason = "slice counts are small")]
                let at = i as f64 * delay;
                self.base.transition(TransitionFrom::Element(Element::Sector(from)), at)
            })
            .collect();

        let surface = &mut self.base.surface;
        let g = surface
            .append(root, Element::Group)
            .with_transform(Transform::translate(m.left + area_w / 2.0, m.top + area_h / 2.0))
            .id();
        let backdrop = surface.append(g, Element::Group).with_class("pizza-background").id();
        let values = surface.append(g, Element::Group).with_class("pizza-values").id();
        for ((slice, metric), transition) in slices.iter().zip(&cfg.metrics).zip(transitions) {
            let sector = |outer: f64| {
                Sector::new(0.0, outer, slice.start_angle, slice.end_angle)
                    .with_pad_angle(pad)
                    .with_corner_radius(cfg.corner_radius)
            };
            surface
                .append(backdrop, Element::Sector(sector(max_radius)))
                .with_class(classes(&["fill-gray-200", metric.class_name_background.as_deref().unwrap_or("")]))
                .with_fill(Paint::CurrentColor)
                .with_datum(slice.index);
            let outer = number_at(data, &metric.key).map_or(0.0, |v| radius.map(v).max(0.0));
            surface
                .append(values, Element::Sector(sector(outer)))
                .with_class(classes(&["fill-gray-800", metric.class_name.as_deref().unwrap_or("")]))
                .with_fill(Paint::CurrentColor)
                .with_datum(slice.index)
                .with_transition(transition);
        }

        self.base.finish("pizza");
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Point;

    use super::*;
    use crate::chart::Drawing;

    fn pizza(props: ChartProps, tooltip: Option<TooltipConfig>) -> PizzaChart {
        let metrics = ["speed", "power", "range"].map(Metric::new);
        let Ok(c) = PizzaChart::new(props, PizzaConfig::new(metrics), tooltip) else {
            panic!("valid config");
        };
        c
    }

    fn data() -> Record {
        record([("speed", json!(0.5)), ("power", json!(1.0)), ("range", json!(0.25))])
    }

    fn value_sectors(c: &PizzaChart) -> Vec<Sector> {
        let s = c.surface();
        s.select_class("fill-gray-800")
            .into_iter()
            .filter_map(|id| match s.get(id).map(|n| &n.element) {
                Some(Element::Sector(sector)) => Some(*sector),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn slices_are_equal_and_radius_encodes_value() {
        let mut c = pizza(ChartProps::new("pizza").with_size(440.0, 440.0), None);
        c.render(&data());
        let sectors = value_sectors(&c);
        assert_eq!(sectors.len(), 3);
        let radii: Vec<f64> = sectors.iter().map(|s| s.outer_radius).collect();
        assert_eq!(radii, vec![100.0, 200.0, 50.0]);
        let sweeps: Vec<f64> = sectors.iter().map(|s| s.end_angle - s.start_angle).collect();
        assert!(sweeps.iter().all(|w| (w - TAU / 3.0).abs() < 1e-9));
        assert_eq!(c.surface().select_class("fill-gray-200").len(), 3);
    }

    #[test]
    fn slices_grow_with_staggered_delay() {
        let props = ChartProps::new("pizza").with_drawing(Drawing::new(1000.0).with_delay(50.0));
        let mut c = pizza(props, None);
        c.render(&data());
        let s = c.surface();
        let delays: Vec<f64> = s
            .select_class("fill-gray-800")
            .into_iter()
            .filter_map(|id| s.get(id).and_then(|n| n.transition.as_ref()).map(|t| t.delay_ms))
            .collect();
        assert_eq!(delays, vec![0.0, 50.0, 100.0]);
    }

    #[test]
    fn tooltip_names_the_metric() {
        let mut c = pizza(ChartProps::new("pizza").with_size(440.0, 440.0), Some(TooltipConfig::new()));
        c.render(&data());
        // Just right of 12 o'clock, inside the first slice's backdrop.
        c.pointer_over(Point::new(240.0, 100.0));
        assert_eq!(
            c.tooltip().node().map(|n| n.content.as_str()),
            Some("<div class=\"text-gray-800\">speed = 0.5</div>")
        );
    }

    #[test]
    fn missing_metric_draws_an_empty_slice() {
        let mut c = pizza(ChartProps::new("pizza").with_size(440.0, 440.0), None);
        c.render(&record([("speed", json!(0.5))]));
        let radii: Vec<f64> = value_sectors(&c).iter().map(|s| s.outer_radius).collect();
        assert_eq!(radii, vec![100.0, 0.0, 0.0]);
    }
}
