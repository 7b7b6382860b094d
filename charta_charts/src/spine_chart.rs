// Copyright 2026 the Charta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spine charts: back-to-back stacked bars sharing a category axis.
//!
//! Series with `direction: left` grow leftwards from the spine, the rest grow rightwards. Both
//! halves share one value domain `[0, largest row total on either side]`. Within a side, series
//! `i` is drawn as the running total of series `i..`, so earlier series sit underneath.

use kurbo::Rect;
use serde::{Deserialize, Serialize};

use charta_core::{Element, Paint, Record, TransitionFrom};

use crate::axis::{AxisOptions, Orientation, draw_axis};
use crate::axis_config::{AxisConfig, AxisLocation, extent};
use crate::bar_chart::BarDirection;
use crate::chart::{Chart, ChartBase, ChartProps, animate, categories, classes, joined_label, listing_html};
use crate::error::ChartResult;
use crate::layout::Margin;
use crate::scale::{ScaleBand, ScaleLinear};
use crate::tooltip::TooltipConfig;

/// One value series of a spine chart.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpineSeries {
    /// Field, label and class.
    #[serde(flatten)]
    pub axis: AxisConfig,
    /// Which side of the spine the series grows towards.
    pub direction: BarDirection,
}

impl SpineSeries {
    /// A series over `key`, growing to the right.
    pub fn right(key: impl Into<String>) -> Self {
        Self {
            axis: AxisConfig::new(key),
            direction: BarDirection::Right,
        }
    }

    /// A series over `key`, growing to the left.
    pub fn left(key: impl Into<String>) -> Self {
        Self {
            axis: AxisConfig::new(key),
            direction: BarDirection::Left,
        }
    }
}

/// Where the category axis sits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpineAxisLocation {
    /// At the left margin.
    Left,
    /// At the right margin.
    Right,
    /// In a gap between the two halves.
    #[default]
    Middle,
}

/// Spine chart settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpineConfig {
    /// Category axis.
    pub y: AxisConfig,
    /// Where the category axis is drawn.
    pub y_location: SpineAxisLocation,
    /// Value series.
    pub x: Vec<SpineSeries>,
    /// Band padding as a fraction of the step.
    pub padding_bar: f64,
    /// Width of the gap holding a middle category axis.
    pub middle: f64,
    /// Tick hint for both value axes.
    pub axis_ticks: usize,
    /// `top` or `bottom` for the value axes.
    pub x_axis: AxisLocation,
}

impl Default for SpineConfig {
    fn default() -> Self {
        Self {
            y: AxisConfig::default(),
            y_location: SpineAxisLocation::Middle,
            x: Vec::new(),
            padding_bar: 0.3,
            middle: 60.0,
            axis_ticks: 5,
            x_axis: AxisLocation::Bottom,
        }
    }
}

impl SpineConfig {
    /// Spine chart of `series` per category of `y`.
    pub fn new(y: AxisConfig, series: Vec<SpineSeries>) -> Self {
        Self {
            y,
            x: series,
            ..Self::default()
        }
    }

    /// Moves the category axis.
    pub fn with_y_location(mut self, location: SpineAxisLocation) -> Self {
        self.y_location = location;
        self
    }

    fn side(&self, direction: BarDirection) -> Vec<&SpineSeries> {
        self.x.iter().filter(|s| s.direction == direction).collect()
    }
}

/// Scales of the last render.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpineScales {
    /// Left half; zero sits at the spine.
    pub left: ScaleLinear,
    /// Right half; zero sits at the spine.
    pub right: ScaleLinear,
}

/// A spine chart.
#[derive(Debug)]
pub struct SpineChart {
    base: ChartBase,
    config: SpineConfig,
    scales: Option<SpineScales>,
}

impl SpineChart {
    /// Creates a spine chart.
    pub fn new(props: ChartProps, config: SpineConfig, tooltip: Option<TooltipConfig>) -> ChartResult<Self> {
        props.validate()?;
        config.y.validate()?;
        let html = listing_html(config.y.key.clone(), config.x.iter().map(|s| s.axis.key.clone()).collect());
        Ok(Self {
            base: ChartBase::new(props, tooltip, Some(html), "spine-chart"),
            config,
            scales: None,
        })
    }

    /// The value scales of the last render.
    pub fn scales(&self) -> Option<SpineScales> {
        self.scales
    }
}

/// Row total of `series`, counting missing cells as zero.
fn total(series: &[&SpineSeries], record: &Record) -> f64 {
    series.iter().filter_map(|s| s.axis.value(record)).sum()
}

impl Chart for SpineChart {
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
        let frame = self.base.frame(Margin::new(40.0, 20.0, 40.0, 40.0));
        let (m, p) = (frame.margin, frame.padding);
        let width = frame.size.width;
        let height = frame.size.height;

        let lefts = cfg.side(BarDirection::Left);
        let rights = cfg.side(BarDirection::Right);
        let extreme = extent(data.iter().flat_map(|r| [total(&lefts, r), total(&rights, r)]))
            .map_or(1.0, |e| e.1);
        let half = (width - p.left - m.left - p.right - m.right) / 2.0;
        let gap = if cfg.y_location == SpineAxisLocation::Middle { cfg.middle / 2.0 } else { 0.0 };
        let spine = p.left + m.left + half;
        let left = ScaleLinear::new((0.0, extreme), (spine - gap, p.left + m.left));
        let right = ScaleLinear::new((0.0, extreme), (spine + gap, width - m.right));
        let bands = ScaleBand::new(categories(&cfg.y, data), (m.top + p.top, height - p.bottom - m.bottom))
            .with_padding(cfg.padding_bar);

        let drawing = self.base.props.drawing;
        let surface = &mut self.base.surface;
        surface
            .append(root, Element::line((left.map(0.0), m.top), (left.map(0.0), height - m.bottom)))
            .with_class("spine stroke-current stroke-1")
            .with_stroke(Paint::CurrentColor);

        let bw = bands.band_width();
        for (side, scale) in [(&lefts, left), (&rights, right)] {
            let zero = scale.map(0.0);
            for i in 0..side.len() {
                let group = surface.append(root, Element::Group).id();
                let class = classes(&[side[i].axis.class_name.as_deref().unwrap_or(""), "fill-current"]);
                for (j, record) in data.iter().enumerate() {
                    let Some(y) = cfg.y.category(record).and_then(|c| bands.position(&c)) else {
                        continue;
                    };
                    let end = scale.map(total(&side[i..], record));
                    let rect = Rect::new(zero.min(end), y, zero.max(end), y + bw);
                    let collapsed = Rect::new(zero, y, zero, y + bw);
                    surface
                        .append(group, Element::rect(rect))
                        .with_class(class.clone())
                        .with_fill(Paint::CurrentColor)
                        .with_datum(j)
                        .with_transition(animate(
                            drawing,
                            TransitionFrom::Element(Element::rect(collapsed)),
                            0.0,
                        ));
                }
            }
        }

        let label_y = if cfg.x_axis == AxisLocation::Top { -20.0 } else { 30.0 };
        for (name, side, scale) in [("left-axis--x axis", &lefts, left), ("right-axis--x axis", &rights, right)] {
            let axis = AxisConfig::new("")
                .with_location(cfg.x_axis)
                .with_ticks(cfg.axis_ticks);
            let options = AxisOptions {
                label_text: Some(joined_label(side.iter().map(|s| &s.axis))),
                label_offset: Some(label_y),
                class_name: Some(name.to_string()),
                ..AxisOptions::new(Orientation::Horizontal, frame.size, m, p)
            };
            draw_axis(surface, root, &scale.into(), &axis, &options);
        }

        // A middle axis is drawn as a left axis whose margin ends at the gap.
        let (y_location, y_margin) = match cfg.y_location {
            SpineAxisLocation::Left => (AxisLocation::Left, m),
            SpineAxisLocation::Right => (AxisLocation::Right, m),
            SpineAxisLocation::Middle => (
                AxisLocation::Left,
                Margin {
                    left: m.left + half + cfg.middle / 2.0,
                    ..m
                },
            ),
        };
        let mut y_axis = cfg.y.clone();
        y_axis.axis.location = Some(y_location);
        let options = AxisOptions {
            class_name: Some("yAxis axis".to_string()),
            ..AxisOptions::new(Orientation::Vertical, frame.size, y_margin, p)
        };
        draw_axis(surface, root, &bands.into(), &y_axis, &options);

        self.scales = Some(SpineScales { left, right });
        self.base.finish("spine");
    }
}
