// Copyright 2026 the Charta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A horizontal progress gauge with an optional error segment at the far end.

use kurbo::Rect;
use serde::{Deserialize, Serialize};
use serde_json::json;

use charta_core::{Element, Paint, Record, TextAnchor, TextElement, TransitionFrom, format_number, record};

use crate::chart::{Chart, ChartBase, ChartProps, animate, classes, finite_or_zero};
use crate::error::ChartResult;
use crate::layout::Margin;
use crate::scale::ScaleLinear;
use crate::tooltip::TooltipConfig;

/// Uncertainty drawn from the top of the scale downward.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GaugeError {
    /// Size of the error in value units.
    pub data: f64,
    /// Class hook.
    pub class_name: Option<String>,
}

/// Linear gauge settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LinearGaugeConfig {
    /// Caption above the bar.
    pub label: Option<String>,
    /// Value at the right end.
    pub max: f64,
    /// Error segment.
    pub error: Option<GaugeError>,
    /// Bar thickness in pixels.
    pub gauge_height: f64,
    /// Class of the value bar.
    pub class_name_gauge: Option<String>,
    /// Class of the background bar.
    pub class_name_gauge_bg: Option<String>,
}

impl Default for LinearGaugeConfig {
    fn default() -> Self {
        Self {
            label: None,
            max: 1.0,
            error: None,
            gauge_height: 6.0,
            class_name_gauge: None,
            class_name_gauge_bg: None,
        }
    }
}

/// A linear gauge.
#[derive(Debug)]
pub struct LinearGauge {
    base: ChartBase,
    config: LinearGaugeConfig,
    previous: f64,
}

impl LinearGauge {
    /// Creates a linear gauge.
    pub fn new(props: ChartProps, config: LinearGaugeConfig, tooltip: Option<TooltipConfig>) -> ChartResult<Self> {
        props.validate()?;
        let html = std::sync::Arc::new(|d: &Record| {
            let text = |k: &str| charta_core::text_at(d, k).unwrap_or_default();
            format!("Data: {} <br/> Error: {}", text("value"), text("error"))
        });
        Ok(Self {
            base: ChartBase::new(props, tooltip, Some(html), "linear-gauge"),
            config,
            previous: 0.0,
        })
    }

    /// The value shown by the last render.
    pub fn value(&self) -> f64 {
        self.previous
    }
}

impl Chart for LinearGauge {
    type Data = f64;

    fn base(&self) -> &ChartBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ChartBase {
        &mut self.base
    }

    fn render(&mut self, value: &f64) {
        let value = finite_or_zero(*value);
        let cfg = &self.config;
        let error = cfg.error.as_ref().map_or(0.0, |e| finite_or_zero(e.data));
        let row = record([("value", json!(value)), ("error", json!(error))]);
        let root = self.base.begin(std::slice::from_ref(&row));
        let frame = self.base.frame(Margin::new(30.0, 40.0, 10.0, 40.0));
        let (width, height) = (frame.size.width, frame.size.height);
        let (left, right) = (frame.margin.left, width - frame.margin.right);
        let x = ScaleLinear::new((0.0, cfg.max), (left, right));
        let gh = cfg.gauge_height;
        let y0 = height - frame.margin.bottom - gh;
        let bar = |x0: f64, x1: f64| Element::Rect {
            rect: Rect::new(x0, y0, x1, y0 + gh),
            rx: gh / 2.0,
        };

        let drawing = self.base.props.drawing;
        let surface = &mut self.base.surface;
        let gauge = surface.append(root, Element::Group).id();
        if let Some(label) = cfg.label.as_deref() {
            surface
                .append(
                    gauge,
                    Element::Text(
                        TextElement::new((left + (right - left) / 2.0, height - frame.margin.top), label)
                            .with_anchor(TextAnchor::Middle),
                    ),
                )
                .with_class("fill-current text-lg")
                .with_fill(Paint::CurrentColor);
        }
        surface
            .append(gauge, bar(left, right))
            .with_class(classes(&[
                "fill-current stroke-current text-gray-300 dark:text-gray-700",
                cfg.class_name_gauge_bg.as_deref().unwrap_or(""),
            ]))
            .with_fill(Paint::CurrentColor)
            .with_datum(0);
        surface
            .append(gauge, bar(left, left + x.map(value) - x.map(0.0)))
            .with_class(classes(&[
                "data-rect fill-current stroke-current",
                cfg.class_name_gauge.as_deref().unwrap_or(""),
            ]))
            .with_fill(Paint::CurrentColor)
            .with_datum(0)
            .with_transition(animate(
                drawing,
                TransitionFrom::Element(bar(left, left + x.map(self.previous) - x.map(0.0))),
                0.0,
            ));
        if let Some(e) = cfg.error.as_ref().filter(|_| error != 0.0) {
            surface
                .append(gauge, bar(x.map(cfg.max - error), x.map(cfg.max)))
                .with_class(classes(&[
                    "data-rect fill-current stroke-current text-red-700",
                    e.class_name.as_deref().unwrap_or(""),
                ]))
                .with_fill(Paint::CurrentColor)
                .with_datum(0)
                .with_transition(animate(drawing, TransitionFrom::Element(bar(right, right)), 0.0));
        }

        tracing::trace!(value = %format_number(value), "linear gauge value");
        self.previous = value;
        self.base.finish("linear-gauge");
    }
}
