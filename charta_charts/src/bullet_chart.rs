// Copyright 2026 the Charta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bullet charts: a value bar over qualitative ranges with a target marker.

use kurbo::Rect;
use serde::{Deserialize, Serialize};
use serde_json::json;

use charta_core::{Element, FontSize, Paint, TextAnchor, TextElement, Transform, TransitionFrom, record};

use crate::axis::{AxisOptions, Orientation, draw_axis};
use crate::axis_config::AxisConfig;
use crate::chart::{Chart, ChartBase, ChartProps, animate, classes, finite_or_zero};
use crate::error::{ChartError, ChartResult};
use crate::layout::{Margin, Padding, Size};
use crate::scale::ScaleLinear;

/// Class hooks of each bullet layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BulletClassNames {
    /// The value bar.
    pub data: String,
    /// The `base` range.
    pub base: String,
    /// The target marker.
    pub target: String,
    /// The `threshold` range.
    pub threshold: String,
    /// The full range.
    pub max: String,
}

impl Default for BulletClassNames {
    fn default() -> Self {
        Self {
            data: "fill-blue-500 stroke-blue-500".to_string(),
            base: "fill-gray-300 dark:fill-gray-500 dark:stroke-gray-500".to_string(),
            target: "fill-black stroke-black dark:fill-white dark:stroke-white".to_string(),
            threshold: "fill-gray-200 stroke-gray-200 dark:fill-gray-600 dark:stroke-gray-600".to_string(),
            max: "fill-gray-100 stroke-grey-100 dark:fill-gray-700 dark:stroke-gray-700".to_string(),
        }
    }
}

/// Bullet chart settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BulletConfig {
    /// Layer classes.
    pub class_names: BulletClassNames,
    /// Caption left of the bar.
    pub label: String,
    /// Scale start.
    pub min: f64,
    /// Innermost range.
    pub base: f64,
    /// Target marker.
    pub target: f64,
    /// Middle range.
    pub threshold: f64,
    /// Scale end.
    pub max: f64,
    /// Room for the axis under the bar.
    pub axis_height: f64,
    /// Height of bar plus axis.
    pub height: f64,
}

impl Default for BulletConfig {
    fn default() -> Self {
        Self {
            class_names: BulletClassNames::default(),
            label: String::new(),
            min: 0.0,
            base: 0.0,
            target: 0.0,
            threshold: 0.0,
            max: 1.0,
            axis_height: 20.0,
            height: 50.0,
        }
    }
}

impl BulletConfig {
    /// Ranges `base <= threshold <= max` with a target.
    pub fn new(base: f64, threshold: f64, target: f64, max: f64) -> Self {
        Self {
            base,
            threshold,
            target,
            max,
            ..Self::default()
        }
    }

    /// Sets the caption.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    fn validate(&self) -> ChartResult<()> {
        if self.min > self.max {
            return Err(ChartError::InvalidDomain {
                key: "bullet".to_string(),
                start: self.min,
                end: self.max,
            });
        }
        Ok(())
    }
}

/// A bullet chart.
#[derive(Debug)]
pub struct BulletChart {
    base: ChartBase,
    config: BulletConfig,
    previous: f64,
}

impl BulletChart {
    /// Creates a bullet chart. Bullets have no tooltip.
    pub fn new(props: ChartProps, config: BulletConfig) -> ChartResult<Self> {
        props.validate()?;
        config.validate()?;
        Ok(Self {
            base: ChartBase::new(props, None, None, "bullet-chart"),
            config,
            previous: 0.0,
        })
    }
}

impl Chart for BulletChart {
    type Data = f64;

    fn base(&self) -> &ChartBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ChartBase {
        &mut self.base
    }

    fn render(&mut self, value: &f64) {
        let value = finite_or_zero(*value);
        let root = self.base.begin(&[record([("value", json!(value))])]);
        let cfg = &self.config;
        let frame = self.base.frame(Margin::new(10.0, 20.0, 0.0, 120.0));
        let m = frame.margin;
        let width = frame.size.width;
        let x = ScaleLinear::new((cfg.min, cfg.max), (0.0, width - m.left - m.right));
        let bar_height = cfg.height - cfg.axis_height;
        let span = |v: f64| Rect::new(x.map(cfg.min), 0.0, x.map(v), bar_height);

        let drawing = self.base.props.drawing;
        let surface = &mut self.base.surface;
        surface
            .append(
                root,
                Element::Text(
                    TextElement::new((m.left - 10.0, bar_height - 5.0), cfg.label.as_str())
                        .with_anchor(TextAnchor::End)
                        .with_font_size(FontSize::Em(0.8)),
                ),
            )
            .with_class(classes(&["fill-current stroke-current", self.base.props.class_name.as_deref().unwrap_or("")]))
            .with_fill(Paint::CurrentColor);

        let bullet = surface
            .append(root, Element::Group)
            .with_transform(Transform::translate(m.left, 0.0))
            .id();
        for (v, class) in [
            (cfg.max, &cfg.class_names.max),
            (cfg.threshold, &cfg.class_names.threshold),
            (cfg.base, &cfg.class_names.base),
        ] {
            surface
                .append(bullet, Element::rect(span(v)))
                .with_class(classes(&["fill-current stroke-current", class]))
                .with_fill(Paint::CurrentColor);
        }
        let tx = x.map(cfg.target);
        surface
            .append(bullet, Element::line((tx, 5.0), (tx, bar_height - 5.0)))
            .with_class(classes(&["stroke-1 stroke-current", &cfg.class_names.target]))
            .with_stroke(Paint::CurrentColor);
        let data_rect = |v: f64| Rect::new(x.map(cfg.min), m.top, x.map(v), bar_height - m.top);
        surface
            .append(bullet, Element::rect(data_rect(value)))
            .with_class(classes(&["data-bar fill-current stroke-current", &cfg.class_names.data]))
            .with_fill(Paint::CurrentColor)
            .with_transition(animate(drawing, TransitionFrom::Element(Element::rect(data_rect(self.previous))), 0.0));

        let axis_scale = ScaleLinear::new((cfg.min, cfg.max), (m.left, width - m.right));
        draw_axis(
            surface,
            root,
            &axis_scale.into(),
            &AxisConfig::default().with_ticks(5),
            &AxisOptions::new(
                Orientation::Horizontal,
                Size::new(width, bar_height),
                Margin::default(),
                Padding::default(),
            )
            .with_class_name("axis--x axis"),
        );

        self.previous = value;
        self.base.finish("bullet");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart(config: BulletConfig) -> BulletChart {
        let Ok(c) = BulletChart::new(ChartProps::new("bullet").with_size(600.0, 50.0), config) else {
            panic!("valid config");
        };
        c
    }

    fn rect_of(c: &BulletChart, class: &str) -> Option<Rect> {
        let s = c.surface();
        s.select_class(class).first().and_then(|id| match s.get(*id).map(|n| &n.element) {
            Some(Element::Rect { rect, .. }) => Some(*rect),
            _ => None,
        })
    }

    #[test]
    fn layers_scale_to_the_range() {
        let mut c = chart(BulletConfig::new(0.5, 0.75, 0.9, 1.0).with_label("Revenue"));
        c.render(&0.6);
        let full = 600.0 - 120.0 - 20.0;
        let width = |class: &str| rect_of(&c, class).map_or(f64::NAN, |r| r.width());
        assert!((width("fill-gray-100") - full).abs() < 1e-9);
        assert!((width("fill-gray-200") - full * 0.75).abs() < 1e-9);
        assert!((width("data-bar") - full * 0.6).abs() < 1e-9);
        assert!(c.to_svg().contains("Revenue"));
    }

    #[test]
    fn axis_sits_under_the_bar() {
        let mut c = chart(BulletConfig::new(0.5, 0.75, 0.9, 1.0));
        c.render(&0.6);
        let s = c.surface();
        let Some(axis) = s.find_by_test_id("x-axis").and_then(|id| s.get(id)) else {
            panic!("axis drawn");
        };
        assert_eq!(axis.attrs.transform, Transform::translate(0.0, 30.0));
    }

    #[test]
    fn inverted_range_is_rejected() {
        let cfg = BulletConfig {
            min: 2.0,
            ..BulletConfig::new(0.5, 0.75, 0.9, 1.0)
        };
        assert!(BulletChart::new(ChartProps::new("bullet"), cfg).is_err());
    }
}
