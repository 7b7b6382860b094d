// Copyright 2026 the Charta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ring gauges: concentric progress rings, one per record, each filled towards its target.
//!
//! The first record gets the outermost ring. A ring's sweep is `value / target` of the arc
//! between `start_angle` and `end_angle`, clamped to that arc.

use std::sync::Arc;

use hashbrown::HashMap;
use kurbo::Point;
use serde::{Deserialize, Serialize};

use charta_core::{Element, Paint, Record, Sector, TextAnchor, TextElement, Transform, TransitionFrom, number_at, text_at};

use crate::chart::{Chart, ChartBase, ChartProps, animate, classes};
use crate::error::{ChartError, ChartResult};
use crate::layout::Margin;
use crate::tooltip::TooltipConfig;

/// Vertical distance between stacked bottom labels.
const LABEL_LINE: f64 = 18.0;

/// Where ring names are written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RingLabelPosition {
    /// Beside the start of each ring.
    #[default]
    Start,
    /// Listed under the rings.
    Bottom,
}

/// Ring label settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RingLabels {
    /// Placement.
    pub position: RingLabelPosition,
    /// Class of every label.
    pub class_name: Option<String>,
}

/// Ring gauge settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RingGaugeConfig {
    /// Field naming each ring.
    pub label_key: String,
    /// Field holding the achieved value.
    pub data_key: String,
    /// Field holding the goal.
    pub target_key: String,
    /// Start of the track in degrees, clockwise from twelve o'clock.
    pub start_angle: f64,
    /// End of the track in degrees.
    pub end_angle: f64,
    /// Gap between neighbouring rings as a fraction of the ring pitch.
    pub ring_padding: f64,
    /// Labels.
    pub labels: RingLabels,
}

impl Default for RingGaugeConfig {
    fn default() -> Self {
        Self {
            label_key: "name".to_string(),
            data_key: "value".to_string(),
            target_key: "target".to_string(),
            start_angle: 0.0,
            end_angle: 360.0,
            ring_padding: 0.2,
            labels: RingLabels::default(),
        }
    }
}

impl RingGaugeConfig {
    /// Rings named by `label_key`, filled with `data_key` towards `target_key`.
    pub fn new(label_key: impl Into<String>, data_key: impl Into<String>, target_key: impl Into<String>) -> Self {
        Self {
            label_key: label_key.into(),
            data_key: data_key.into(),
            target_key: target_key.into(),
            ..Self::default()
        }
    }

    /// Sets the track extent in degrees.
    pub fn with_angles(mut self, start: f64, end: f64) -> Self {
        self.start_angle = start;
        self.end_angle = end;
        self
    }

    /// Moves the labels.
    pub fn with_label_position(mut self, position: RingLabelPosition) -> Self {
        self.labels.position = position;
        self
    }

    /// Fraction of the track a record has achieved, in `[0, 1]`.
    ///
    /// A missing or non-positive target counts as not started.
    pub fn progress(&self, record: &Record) -> f64 {
        let value = number_at(record, &self.data_key).unwrap_or(0.0);
        match number_at(record, &self.target_key) {
            Some(target) if target > 0.0 => (value / target).clamp(0.0, 1.0),
            _ => 0.0,
        }
    }
}

/// A ring gauge.
///
/// Each ring animates from the sweep it had on the previous render (matched by label), or from
/// an empty ring.
#[derive(Debug)]
pub struct RingGauge {
    base: ChartBase,
    config: RingGaugeConfig,
    previous: HashMap<String, f64>,
}

impl RingGauge {
    /// Creates a ring gauge.
    pub fn new(props: ChartProps, config: RingGaugeConfig, tooltip: Option<TooltipConfig>) -> ChartResult<Self> {
        props.validate()?;
        if config.start_angle > config.end_angle {
            return Err(ChartError::InvalidDomain {
                key: "angle".to_string(),
                start: config.start_angle,
                end: config.end_angle,
            });
        }
        let (label, value, target) = (
            config.label_key.clone(),
            config.data_key.clone(),
            config.target_key.clone(),
        );
        let html = Arc::new(move |d: &Record| {
            format!(
                "{}: {} / {}",
                text_at(d, &label).unwrap_or_default(),
                text_at(d, &value).unwrap_or_default(),
                text_at(d, &target).unwrap_or_default()
            )
        });
        Ok(Self {
            base: ChartBase::new(props, tooltip, Some(html), "ring-gauge"),
            config,
            previous: HashMap::new(),
        })
    }

    fn name_of(&self, record: &Record, index: usize) -> String {
        text_at(record, &self.config.label_key).unwrap_or_else(|| format!("ring-{index}"))
    }
}

impl Chart for RingGauge {
    type Data = [Record];

    fn base(&self) -> &ChartBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ChartBase {
        &mut self.base
    }

    fn render(&mut self, data: &[Record]) {
        let root = self.base.begin(data);
        let frame = self.base.frame(Margin::uniform(20.0));
        let plot = frame.plot_rect();
        let cfg = &self.config;
        let names: Vec<String> = data.iter().enumerate().map(|(i, r)| self.name_of(r, i)).collect();

        #[allow(clippy::cast_precision_loss, reason = "ring counts are small")]
        let n = data.len() as f64;
        let bottom = cfg.labels.position == RingLabelPosition::Bottom;
        let reserved = if bottom { n * LABEL_LINE } else { 0.0 };
        let radius = (plot.width().min(plot.height() - reserved) / 2.0).max(0.0);
        let center = if bottom {
            Point::new(plot.center().x, plot.y0 + radius)
        } else {
            plot.center()
        };
        let pitch = if n > 0.0 { radius / n } else { 0.0 };
        let thickness = pitch * (1.0 - cfg.ring_padding.clamp(0.0, 1.0));
        let (start, end) = (cfg.start_angle.to_radians(), cfg.end_angle.to_radians());
        let delay = self.base.props.drawing.map_or(0.0, |d| d.delay_or(0.0));
        let drawing = self.base.props.drawing;

        let surface = &mut self.base.surface;
        let g = surface
            .append(root, Element::Group)
            .with_transform(Transform::translate(center.x, center.y))
            .id();
        let tracks = surface.append(g, Element::Group).with_class("ring-tracks").id();
        let rings = surface.append(g, Element::Group).with_class("rings").id();
        let labels = surface.append(g, Element::Group).with_class("ring-labels").id();
        let mut drawn = HashMap::new();
        for (i, (record, name)) in data.iter().zip(&names).enumerate() {
            #[allow(clippy::cast_precision_loss, reason = "ring counts are small")]
            let outer = radius - i as f64 * pitch;
            let inner = outer - thickness;
            let ring = |to: f64| Sector::new(inner, outer, start, to).with_corner_radius(thickness / 2.0);
            let extra = text_at(record, "className").unwrap_or_default();

            surface
                .append(tracks, Element::Sector(ring(end)))
                .with_class(classes(&["ring-track fill-current opacity-20", extra.as_str()]))
                .with_fill(Paint::CurrentColor)
                .with_opacity(0.2)
                .with_datum(i);

            if !number_at(record, &cfg.target_key).is_some_and(|t| t > 0.0) {
                tracing::debug!(ring = %name, "no positive target, drawing an empty ring");
            }
            let sweep_end = start + cfg.progress(record) * (end - start);
            let from = self.previous.get(name).copied().unwrap_or(start);
            #[allow(clippy::cast_precision_loss, reason = "ring counts are small")]
            let at = i as f64 * delay;
            surface
                .append(rings, Element::Sector(ring(sweep_end)))
                .with_class(classes(&["ring fill-current", extra.as_str()]))
                .with_fill(Paint::CurrentColor)
                .with_datum(i)
                .with_transition(animate(drawing, TransitionFrom::Element(Element::Sector(ring(from))), at));
            drawn.insert(name.clone(), sweep_end);

            let label_class = classes(&["ring-label text-xs fill-current", cfg.labels.class_name.as_deref().unwrap_or("")]);
            let text = if bottom {
                #[allow(clippy::cast_precision_loss, reason = "ring counts are small")]
                let y = radius + (i + 1) as f64 * LABEL_LINE;
                TextElement::new((0.0, y), name.clone()).with_anchor(TextAnchor::Middle)
            } else {
                // Just before the ring's start, on its center line.
                let mid = (inner + outer) / 2.0;
                let edge = Point::new(mid * start.sin(), -mid * start.cos());
                TextElement::new((edge.x - 8.0, edge.y), name.clone()).with_anchor(TextAnchor::End)
            };
            surface
                .append(labels, Element::Text(text))
                .with_class(label_class)
                .with_fill(Paint::CurrentColor);
        }

        self.previous = drawn;
        self.base.finish("ring-gauge");
    }
}
