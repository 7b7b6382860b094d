// Copyright 2026 the Charta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lollipop charts: a stem and a symbol per category, sorted by value.

use std::sync::Arc;

use kurbo::Point;
use serde::{Deserialize, Serialize};

use charta_core::{Element, Paint, Record, SymbolShape, Transform, TransitionFrom, text_at};

use crate::axis::{AxisOptions, Orientation, draw_axis};
use crate::axis_config::AxisConfig;
use crate::chart::{Chart, ChartBase, ChartProps, animate, classes};
use crate::error::ChartResult;
use crate::layout::Margin;
use crate::scale::{AxisScale, ScaleBand, ScaleLinear, ScalePoint};
use crate::tooltip::TooltipConfig;

const SYMBOL_SIZE: f64 = 100.0;

/// Class hooks for the stems and heads.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LollipopClassNames {
    /// Added to both stems and heads.
    pub points: Option<String>,
    /// Added to stems.
    pub lines: Option<String>,
    /// Added to heads.
    pub symbols: Option<String>,
}

/// Lollipop chart settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LollipopConfig {
    /// `horizontal` runs stems along x.
    pub orientation: Orientation,
    /// Category axis.
    pub category: AxisConfig,
    /// Value axis.
    pub value: AxisConfig,
    /// Domain ceiling used when the value axis has no `end`.
    pub value_max: Option<f64>,
    /// Head shape.
    pub shape: SymbolShape,
    /// Class hooks.
    pub class_names: LollipopClassNames,
}

impl Default for LollipopConfig {
    fn default() -> Self {
        Self::vertical(AxisConfig::new("x"), AxisConfig::new("y"))
    }
}

impl LollipopConfig {
    /// Stems rising from a category x axis.
    pub fn vertical(category: AxisConfig, value: AxisConfig) -> Self {
        Self {
            orientation: Orientation::Vertical,
            category,
            value,
            value_max: None,
            shape: SymbolShape::Circle,
            class_names: LollipopClassNames::default(),
        }
    }

    /// Stems running right from a category y axis.
    pub fn horizontal(category: AxisConfig, value: AxisConfig) -> Self {
        Self {
            orientation: Orientation::Horizontal,
            ..Self::vertical(category, value)
        }
    }

    /// Sets the head shape.
    pub fn with_shape(mut self, shape: SymbolShape) -> Self {
        self.shape = shape;
        self
    }
}

/// A lollipop chart.
#[derive(Debug)]
pub struct LollipopChart {
    base: ChartBase,
    config: LollipopConfig,
    value_scale: Option<ScaleLinear>,
}

impl LollipopChart {
    /// Creates a lollipop chart.
    pub fn new(props: ChartProps, config: LollipopConfig, tooltip: Option<TooltipConfig>) -> ChartResult<Self> {
        props.validate()?;
        config.category.validate()?;
        config.value.validate()?;
        let (name, value) = (config.category.key.clone(), config.value.key.clone());
        let html = Arc::new(move |d: &Record| {
            format!(
                "{}: {}",
                text_at(d, &name).unwrap_or_default(),
                text_at(d, &value).unwrap_or_default()
            )
        });
        let test_id = match config.orientation {
            Orientation::Horizontal => "lollipop-h-chart",
            Orientation::Vertical => "lollipop-v-chart",
        };
        Ok(Self {
            base: ChartBase::new(props, tooltip, Some(html), test_id),
            config,
            value_scale: None,
        })
    }

    /// The value scale of the last render.
    pub fn value_scale(&self) -> Option<ScaleLinear> {
        self.value_scale
    }
}

impl Chart for LollipopChart {
    type Data = [Record];

    fn base(&self) -> &ChartBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ChartBase {
        &mut self.base
    }

    fn render(&mut self, data: &[Record]) {
        let root = self.base.begin(data);
        let cfg = &self.config;
        let horizontal = cfg.orientation == Orientation::Horizontal;
        let default_margin = if horizontal {
            Margin::new(40.0, 40.0, 40.0, 80.0)
        } else {
            Margin::uniform(40.0)
        };
        let frame = self.base.frame(default_margin);
        let plot = frame.plot_rect();

        // Largest first; datum indices still point into `data`.
        let mut order: Vec<(usize, f64)> =
            data.iter().enumerate().filter_map(|(i, r)| cfg.value.value(r).map(|v| (i, v))).collect();
        order.sort_by(|a, b| b.1.total_cmp(&a.1));

        let inferred = cfg.value.extent(data);
        let lo = cfg.value.start.or(inferred.map(|e| e.0)).unwrap_or(0.0);
        let hi = cfg.value.end.or(cfg.value_max).or(inferred.map(|e| e.1)).unwrap_or(1.0);
        let names: Vec<String> = order.iter().filter_map(|(i, _)| cfg.category.category(&data[*i])).collect();

        let (values, category_scale, position): (ScaleLinear, AxisScale, Box<dyn Fn(&str) -> Option<f64>>) =
            if horizontal {
                let values = ScaleLinear::new((lo, hi), (plot.x0, plot.x1));
                let points = ScalePoint::new(names, (plot.y0, plot.y1));
                let lookup = points.clone();
                (values, points.into(), Box::new(move |k: &str| lookup.position(k)))
            } else {
                let values = ScaleLinear::new((lo, hi), (plot.y1, plot.y0));
                let bands = ScaleBand::new(names, (plot.x0, plot.x1)).with_padding(frame.padding.bar_or(0.0));
                let lookup = bands.clone();
                let half = bands.band_width() / 2.0;
                (values, bands.into(), Box::new(move |k: &str| lookup.position(k).map(|p| p + half)))
            };
        // Maps (value px, category px) to surface coordinates.
        let at = |v: f64, c: f64| if horizontal { Point::new(v, c) } else { Point::new(c, v) };
        let baseline = if horizontal { plot.x0 } else { values.map(lo) };

        let drawing = self.base.props.drawing;
        let surface = &mut self.base.surface;
        let (value_orientation, category_orientation) = if horizontal {
            (Orientation::Horizontal, Orientation::Vertical)
        } else {
            (Orientation::Vertical, Orientation::Horizontal)
        };
        draw_axis(
            surface,
            root,
            &category_scale,
            &cfg.category,
            &AxisOptions::new(category_orientation, frame.size, frame.margin, frame.padding),
        );
        draw_axis(
            surface,
            root,
            &values.into(),
            &cfg.value,
            &AxisOptions::new(value_orientation, frame.size, frame.margin, frame.padding),
        );

        let names = &cfg.class_names;
        let (points, lines, symbols) = (
            names.points.as_deref().unwrap_or(""),
            names.lines.as_deref().unwrap_or(""),
            names.symbols.as_deref().unwrap_or(""),
        );
        let marks = surface.append(root, Element::Group).with_class("lollipops").id();
        for (i, v) in &order {
            let Some(c) = cfg.category.category(&data[*i]).and_then(|k| position(&k)) else {
                continue;
            };
            let (start, end) = (at(baseline, c), at(values.map(*v), c));
            let row = surface.append(marks, Element::Group).with_datum(*i).id();
            surface
                .append(row, Element::line(start, end))
                .with_class(classes(&["lollipop-line stroke-current", points, lines]))
                .with_stroke(Paint::CurrentColor)
                .with_stroke_width(2.0)
                .with_transition(animate(drawing, TransitionFrom::Element(Element::line(start, start)), 0.0));
            surface
                .append(row, Element::symbol(cfg.shape, SYMBOL_SIZE))
                .with_class(classes(&["lollipop-symbol fill-current", points, symbols]))
                .with_fill(Paint::CurrentColor)
                .with_transform(Transform::translate(end.x, end.y))
                .with_transition(animate(
                    drawing,
                    TransitionFrom::Transform(Transform::translate(start.x, start.y)),
                    0.0,
                ));
        }

        self.value_scale = Some(values);
        self.base.finish("lollipop");
    }
}

#[cfg(test)]
mod tests {
    use charta_core::record;
    use serde_json::json;

    use super::*;
    use crate::chart::Drawing;

    fn data() -> Vec<Record> {
        [("a", 3), ("b", 9), ("c", 5)]
            .into_iter()
            .map(|(x, y)| record([("x", json!(x)), ("y", json!(y))]))
            .collect()
    }

    fn chart(config: LollipopConfig, props: ChartProps, tooltip: Option<TooltipConfig>) -> LollipopChart {
        let Ok(c) = LollipopChart::new(props, config, tooltip) else {
            panic!("valid config");
        };
        c
    }

    fn heads(c: &LollipopChart) -> Vec<(usize, Point)> {
        let s = c.surface();
        s.select_class("lollipop-symbol")
            .into_iter()
            .filter_map(|id| Some((s.datum_of(id)?, s.world_transform(id) * Point::ORIGIN)))
            .collect()
    }

    #[test]
    fn vertical_heads_run_largest_first() {
        let mut c = chart(LollipopConfig::default(), ChartProps::new("pop"), None);
        c.render(&data());
        let heads = heads(&c);
        let order: Vec<usize> = heads.iter().map(|(i, _)| *i).collect();
        assert_eq!(order, vec![1, 2, 0], "sorted by value, descending");
        assert!(heads[0].1.x < heads[1].1.x, "first category is leftmost");
        assert!(heads[0].1.y < heads[1].1.y, "larger values sit higher");
        assert_eq!(c.value_scale().map(|s| s.domain()), Some((3.0, 9.0)));
    }

    #[test]
    fn value_max_raises_the_ceiling() {
        let config = LollipopConfig {
            value_max: Some(20.0),
            ..LollipopConfig::default()
        };
        let mut c = chart(config, ChartProps::new("pop"), None);
        c.render(&data());
        assert_eq!(c.value_scale().map(|s| s.domain()), Some((3.0, 20.0)));
    }

    #[test]
    fn horizontal_stems_start_at_the_plot_edge() {
        let config = LollipopConfig::horizontal(AxisConfig::new("x"), AxisConfig::new("y"));
        let props = ChartProps::new("pop").with_drawing(Drawing::new(1000.0));
        let mut c = chart(config, props, None);
        c.render(&data());
        let s = c.surface();
        let stems: Vec<_> = s
            .select_class("lollipop-line")
            .into_iter()
            .filter_map(|id| match s.get(id).map(|n| &n.element) {
                Some(Element::Line(line)) => Some(*line),
                _ => None,
            })
            .collect();
        assert_eq!(stems.len(), 3);
        assert!(stems.iter().all(|l| (l.p0.x - 80.0).abs() < 1e-9), "stems start at the left margin");
        assert!(stems.iter().all(|l| l.p0.y == l.p1.y), "horizontal stems");
        assert_eq!(s.test_id(), Some("lollipop-h-chart"));
        let animated = s.select_class("lollipop-symbol").into_iter().all(|id| {
            s.get(id).is_some_and(|n| n.transition.is_some())
        });
        assert!(animated, "heads slide out from the baseline");
    }

    #[test]
    fn tooltip_pairs_category_and_value() {
        let c = chart(LollipopConfig::default(), ChartProps::new("pop"), Some(TooltipConfig::new()));
        assert_eq!(c.tooltip().content_for(&data()[1]), "b: 9");
    }

    #[test]
    fn records_without_values_are_skipped() {
        let mut rows = data();
        rows.push(record([("x", json!("d"))]));
        let mut c = chart(LollipopConfig::default(), ChartProps::new("pop"), None);
        c.render(&rows);
        assert_eq!(heads(&c).len(), 3);
    }
}
