// Copyright 2026 the Charta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Half-circle speedometer gauge.
//!
//! Colored regions fill the dial up to their limits and a needle rotates to the value. The
//! needle animates from the value of the previous render.

use core::f64::consts::FRAC_PI_2;
use std::sync::Arc;

use kurbo::Circle;
use serde::{Deserialize, Serialize};
use serde_json::json;

use charta_core::{
    Element, Paint, Sector, SymbolShape, TextAnchor, TextElement, Transform, TransitionFrom,
    format_number, record,
};

use crate::chart::{Caption, Chart, ChartBase, ChartProps, animate, classes, finite_or_zero};
use crate::error::ChartResult;
use crate::layout::Margin;
use crate::scale::ScaleLinear;
use crate::tooltip::TooltipConfig;

/// A colored band of the dial, from zero up to `limit`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Region {
    /// Upper value of the band.
    pub limit: f64,
    /// Class hook.
    pub class_name: Option<String>,
}

impl Region {
    /// A band up to `limit`.
    pub fn new(limit: f64, class_name: impl Into<String>) -> Self {
        Self {
            limit,
            class_name: Some(class_name.into()),
        }
    }
}

/// Speedometer settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpeedometerConfig {
    /// Caption under the dial.
    pub label: Option<Caption>,
    /// Dial bands; the largest limit is the top of the scale.
    pub regions: Vec<Region>,
    /// Number of tick intervals.
    pub axis_ticks: usize,
    /// Needle length as a fraction of the dial radius.
    pub needle_radius: f64,
}

impl Default for SpeedometerConfig {
    fn default() -> Self {
        Self {
            label: None,
            regions: Vec::new(),
            axis_ticks: 5,
            needle_radius: 0.8,
        }
    }
}

impl SpeedometerConfig {
    /// Adds a band.
    pub fn with_region(mut self, region: Region) -> Self {
        self.regions.push(region);
        self
    }

    /// Sets the caption.
    pub fn with_label(mut self, label: Caption) -> Self {
        self.label = Some(label);
        self
    }

    fn max_value(&self) -> f64 {
        self.regions
            .iter()
            .map(|r| r.limit)
            .filter(|l| l.is_finite())
            .fold(None, |m: Option<f64>, l| Some(m.map_or(l, |m| m.max(l))))
            .filter(|m| *m != 0.0)
            .unwrap_or(1.0)
    }
}

/// A speedometer.
#[derive(Debug)]
pub struct Speedometer {
    base: ChartBase,
    config: SpeedometerConfig,
    previous: f64,
}

impl Speedometer {
    /// Creates a speedometer.
    pub fn new(props: ChartProps, config: SpeedometerConfig, tooltip: Option<TooltipConfig>) -> ChartResult<Self> {
        props.validate()?;
        let html = Arc::new(|d: &charta_core::Record| {
            format!("Value: {}", charta_core::text_at(d, "value").unwrap_or_default())
        });
        Ok(Self {
            base: ChartBase::new(props, tooltip, Some(html), "speedometer"),
            config,
            previous: 0.0,
        })
    }

    /// The needle angle in degrees for `value`: 0 at the start of the dial, 180 at the end.
    pub fn needle_angle(&self, value: f64) -> f64 {
        value / self.config.max_value() * 180.0
    }

    /// The value shown by the last render.
    pub fn value(&self) -> f64 {
        self.previous
    }
}

impl Chart for Speedometer {
    type Data = f64;

    fn render(&mut self, value: &f64) {
        let value = finite_or_zero(*value);
        let row = record([("value", json!(value))]);
        let root = self.base.begin(std::slice::from_ref(&row));
        let cfg = &self.config;
        let frame = self.base.frame(Margin::new(0.0, 40.0, 20.0, 40.0));
        let (width, height) = (frame.size.width, frame.size.height);
        let radius = (width - frame.margin.left - frame.margin.right) / 2.0;
        let scale = ScaleLinear::new((0.0, cfg.max_value()), (-FRAC_PI_2, FRAC_PI_2));
        let current = self.needle_angle(value);
        let previous = self.needle_angle(self.previous);

        let drawing = self.base.props.drawing;
        let surface = &mut self.base.surface;
        if let Some(g) = surface.edit(root) {
            g.with_transform(Transform::translate(width / 2.0, frame.margin.top + width / 2.0));
        }

        let levels = surface.append(root, Element::Group).with_class("gauge-levels").id();
        let mut regions = cfg.regions.clone();
        regions.sort_by(|a, b| b.limit.total_cmp(&a.limit));
        for region in &regions {
            let sector = Sector::new(radius * 0.7, radius, -FRAC_PI_2, scale.map(region.limit));
            surface
                .append(levels, Element::Sector(sector))
                .with_class(classes(&[
                    "gauge-level fill-current stroke-current",
                    region.class_name.as_deref().unwrap_or(""),
                ]))
                .with_fill(Paint::CurrentColor);
        }

        let needle = surface
            .append(root, Element::Group)
            .with_class("data-group")
            .with_transform(Transform::IDENTITY.with_rotate(current))
            .with_datum(0)
            .with_transition(animate(
                drawing,
                TransitionFrom::Transform(Transform::IDENTITY.with_rotate(previous)),
                0.0,
            ))
            .id();
        let tip = -radius * cfg.needle_radius;
        surface
            .append(needle, Element::Circle(Circle::new((0.0, 0.0), 3.0)))
            .with_class("fill-current stroke-current")
            .with_fill(Paint::CurrentColor);
        surface
            .append(needle, Element::line((0.0, 0.0), (tip, 0.0)))
            .with_class("fill-current stroke-current stroke-2")
            .with_stroke(Paint::CurrentColor)
            .with_stroke_width(2.0);
        surface
            .append(needle, Element::symbol(SymbolShape::Triangle, 50.0))
            .with_class("fill-current stroke-current stroke-2")
            .with_fill(Paint::CurrentColor)
            .with_transform(Transform::translate(tip, 0.0).with_rotate(-90.0));

        if let Some(label) = cfg.label.as_ref()
            && let Some(text) = label.text.as_deref()
        {
            let y = height - frame.margin.bottom - frame.margin.top - width / 2.0;
            surface
                .append(root, Element::Text(TextElement::new((0.0, y), text).with_anchor(TextAnchor::Middle)))
                .with_class(classes(&["fill-current", label.class_name.as_deref().unwrap_or("")]))
                .with_fill(Paint::CurrentColor);
        }

        let ticks = surface.append(root, Element::Group).with_class("gauge-axis").id();
        let (d0, d1) = scale.domain();
        #[allow(clippy::cast_precision_loss, reason = "tick counts are small")]
        let gap = (d1 - d0) / cfg.axis_ticks.max(1) as f64;
        for i in 0..=cfg.axis_ticks {
            #[allow(clippy::cast_precision_loss, reason = "tick counts are small")]
            let v = ((d0 + i as f64 * gap) * 10.0).round() / 10.0;
            let degrees = scale.map(v).to_degrees() - 90.0;
            let at = kurbo::Vec2::from_angle(degrees.to_radians()) * (radius * 0.7);
            let tick = surface
                .append(ticks, Element::Group)
                .with_transform(Transform::translate(at.x, at.y).with_rotate(degrees))
                .id();
            surface
                .append(tick, Element::line((4.0, 0.0), (-4.0, 0.0)))
                .with_class("axis-line stroke-current")
                .with_stroke(Paint::CurrentColor);
            surface
                .append(tick, Element::text((0.0, 0.0), format_number(v)))
                .with_class("text-xs fill-current")
                .with_fill(Paint::CurrentColor)
                .with_transform(Transform::translate(-16.0, 0.0).with_rotate(90.0));
        }

        // The remembered value is the start of the next needle transition.
        self.previous = value;
        self.base.finish("speedometer");
    }

    fn base(&self) -> &ChartBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ChartBase {
        &mut self.base
    }
}
