// Copyright 2026 the Charta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Horizontal grouped bar charts.

use kurbo::Rect;
use serde::{Deserialize, Serialize};

use charta_core::{Element, FontSize, Paint, Record, TextAnchor, TextElement, TransitionFrom, display_value};

use crate::axis::{AxisOptions, Orientation, draw_axis};
use crate::axis_config::{AxisConfig, AxisDisplay, AxisLocation, MissingPolicy, lenient_missing};
use crate::chart::{
    Chart, ChartBase, ChartProps, animate, categories, classes, joined_label, shared_domain,
};
use crate::error::ChartResult;
use crate::layout::Margin;
use crate::scale::{ScaleBand, ScaleLinear};
use crate::tooltip::TooltipConfig;

/// Which way bars grow from the value axis origin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarDirection {
    /// Bars grow leftwards; the category axis moves to the right edge.
    Left,
    /// Bars grow rightwards.
    #[default]
    Right,
}

/// One value series of a grouped bar or column chart.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BarSeries {
    /// The value axis of this series.
    #[serde(flatten)]
    pub axis: AxisConfig,
    /// Corner radius of each bar.
    pub rx: f64,
    /// Missing-value handling.
    #[serde(rename = "unknown", deserialize_with = "lenient_missing")]
    pub missing: MissingPolicy,
}

impl BarSeries {
    /// A series over `key`.
    pub fn new(key: impl Into<String>) -> Self {
        Self::from_axis(AxisConfig::new(key))
    }

    /// Wraps an axis configuration.
    pub fn from_axis(axis: AxisConfig) -> Self {
        Self {
            axis,
            ..Self::default()
        }
    }

    /// Sets the corner radius.
    pub fn with_rx(mut self, rx: f64) -> Self {
        self.rx = rx;
        self
    }

    /// Sets the missing-value policy.
    pub fn with_missing(mut self, missing: MissingPolicy) -> Self {
        self.missing = missing;
        self
    }

    /// The plotted value of `record` after the missing policy.
    pub fn value(&self, record: &Record) -> Option<f64> {
        match (self.axis.value(record), self.missing) {
            (Some(v), _) => Some(v),
            (None, MissingPolicy::Zero) => Some(0.0),
            (None, MissingPolicy::Skip) => None,
        }
    }
}

/// The categorical axis of a bar or column chart.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryAxis {
    /// Category field and decoration.
    #[serde(flatten)]
    pub axis: AxisConfig,
    /// Pixels trimmed from each bar's thickness.
    pub padding: f64,
}

impl CategoryAxis {
    /// Categories from `key`.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            axis: AxisConfig::new(key),
            padding: 0.0,
        }
    }
}

/// Value labels drawn at the end of each bar.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DataLabel {
    /// Class hook.
    pub class_name: Option<String>,
}

/// Bar chart settings.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BarConfig {
    /// Value series, drawn side by side within each band.
    pub x: Vec<BarSeries>,
    /// Category axis.
    pub y: CategoryAxis,
    /// Growth direction.
    pub direction: BarDirection,
    /// Value labels.
    pub data_label: Option<DataLabel>,
}

impl BarConfig {
    /// Bars for `series` over the categories in `category_key`.
    pub fn new(category_key: impl Into<String>, series: Vec<BarSeries>) -> Self {
        Self {
            x: series,
            y: CategoryAxis::new(category_key),
            ..Self::default()
        }
    }

    /// Sets the growth direction.
    pub fn with_direction(mut self, direction: BarDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Turns on value labels.
    pub fn with_data_label(mut self, label: DataLabel) -> Self {
        self.data_label = Some(label);
        self
    }

    fn validate(&self) -> ChartResult<()> {
        for s in &self.x {
            s.axis.validate()?;
        }
        self.y.axis.validate()
    }
}

/// Horizontal bars, one group per category and one bar per series.
///
/// Negative values grow the other way from zero and take `classNameNegative` when configured.
#[derive(Debug)]
pub struct BarChart {
    base: ChartBase,
    config: BarConfig,
    value_scale: Option<ScaleLinear>,
}

impl BarChart {
    /// Creates a bar chart.
    pub fn new(props: ChartProps, config: BarConfig, tooltip: Option<TooltipConfig>) -> ChartResult<Self> {
        props.validate()?;
        config.validate()?;
        Ok(Self {
            base: ChartBase::new(props, tooltip, None, "bar-chart"),
            config,
            value_scale: None,
        })
    }

    /// The value scale of the last render.
    pub fn value_scale(&self) -> Option<ScaleLinear> {
        self.value_scale
    }
}

impl Chart for BarChart {
    type Data = [Record];

    fn base(&self) -> &ChartBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ChartBase {
        &mut self.base
    }

    fn render(&mut self, data: &[Record]) {
        let g = self.base.begin(data);
        let cfg = &self.config;
        let at = |loc| cfg.x.iter().any(|s| s.axis.location() == Some(loc));
        let right = cfg.direction == BarDirection::Right;
        let frame = self.base.frame(Margin::new(
            if at(AxisLocation::Top) { 60.0 } else { 40.0 },
            if right { 20.0 } else { 40.0 },
            if at(AxisLocation::Bottom) { 60.0 } else { 40.0 },
            60.0,
        ));
        let plot = frame.plot_rect();
        let x_range = if right {
            (plot.x0, plot.x1)
        } else {
            (plot.x1, plot.x0)
        };
        let x = ScaleLinear::new(shared_domain(cfg.x.iter().map(|s| &s.axis), data, true), x_range);
        let y = ScaleBand::new(categories(&cfg.y.axis, data), (plot.y0, plot.y1))
            .with_padding(frame.padding.bar_or(0.1));

        let x_axis = AxisConfig {
            key: cfg.x.first().map(|s| s.axis.key.clone()).unwrap_or_default(),
            axis: AxisDisplay {
                location: Some(
                    cfg.x
                        .iter()
                        .find_map(|s| s.axis.location())
                        .unwrap_or(AxisLocation::Bottom),
                ),
                ticks: cfg.x.first().and_then(|s| s.axis.axis.ticks),
                label: Some(joined_label(cfg.x.iter().map(|s| &s.axis))),
            },
            ..AxisConfig::default()
        };
        let mut y_axis = cfg.y.axis.clone();
        y_axis.axis.location = Some(if right { AxisLocation::Left } else { AxisLocation::Right });

        let surface = &mut self.base.surface;
        draw_axis(
            surface,
            g,
            &x.into(),
            &x_axis,
            &AxisOptions::new(Orientation::Horizontal, frame.size, frame.margin, frame.padding),
        );
        draw_axis(
            surface,
            g,
            &y.clone().into(),
            &y_axis,
            &AxisOptions::new(Orientation::Vertical, frame.size, frame.margin, frame.padding),
        );

        let drawing = self.base.props.drawing;
        let stagger = drawing.map_or(100.0, |d| d.delay_or(100.0));
        #[allow(clippy::cast_precision_loss, reason = "series counts are small")]
        let n = cfg.x.len().max(1) as f64;
        let slot = y.band_width() / n;
        let zero = x.map(0.0);
        for (i, series) in cfg.x.iter().enumerate() {
            let bars = surface.append(g, Element::Group).id();
            for (j, record) in data.iter().enumerate() {
                let (Some(v), Some(band)) = (
                    series.value(record),
                    cfg.y.axis.category(record).and_then(|c| y.position(&c)),
                ) else {
                    continue;
                };
                #[allow(clippy::cast_precision_loss, reason = "indices are small")]
                let top = band + i as f64 * slot;
                let end = x.map(v);
                let rect = Rect::new(zero.min(end), top, zero.max(end), top + (slot - cfg.y.padding).max(0.0));
                #[allow(clippy::cast_precision_loss, reason = "indices are small")]
                let delay = i as f64 * stagger + j as f64 * 100.0;
                let transition = animate(
                    drawing,
                    TransitionFrom::Element(Element::Rect {
                        rect: Rect::new(zero, rect.y0, zero, rect.y1),
                        rx: series.rx,
                    }),
                    delay,
                );
                surface
                    .append(bars, Element::Rect { rect, rx: series.rx })
                    .with_class(classes(&["fill-current", series.axis.class_for(v)]))
                    .with_datum(j)
                    .with_transition(transition);

                if let Some(label) = &cfg.data_label {
                    let (dx, anchor) = if right {
                        (-2.0, TextAnchor::End)
                    } else {
                        (5.0, TextAnchor::Start)
                    };
                    let text = record
                        .get(&series.axis.key)
                        .map(display_value)
                        .unwrap_or_else(|| display_value(&serde_json::Value::from(v)));
                    surface
                        .append(
                            bars,
                            Element::Text(
                                TextElement::new((end + dx, top + slot - slot / 4.0), text)
                                    .with_anchor(anchor)
                                    .with_font_size(FontSize::Em(0.5)),
                            ),
                        )
                        .with_class(classes(&["fill-current", label.class_name.as_deref().unwrap_or("")]))
                        .with_test_id("label")
                        .with_fill(Paint::CurrentColor);
                }
            }
        }
        self.value_scale = Some(x);
        self.base.finish("bar");
    }
}

#[cfg(test)]
mod tests {
    use charta_core::record;
    use serde_json::json;

    use super::*;

    fn data() -> Vec<Record> {
        vec![
            record([("team", json!("a")), ("gain", json!(4))]),
            record([("team", json!("b")), ("gain", json!(-2))]),
            record([("team", json!("c"))]),
        ]
    }

    fn rects(chart: &BarChart) -> Vec<(Rect, String)> {
        let s = chart.surface();
        s.descendants(s.root())
            .into_iter()
            .filter_map(|id| {
                let n = s.get(id)?;
                match &n.element {
                    Element::Rect { rect, .. } => Some((*rect, n.attrs.class.clone())),
                    _ => None,
                }
            })
            .collect()
    }

    fn chart(series: BarSeries) -> BarChart {
        let cfg = BarConfig::new("team", vec![series]);
        let Ok(chart) = BarChart::new(ChartProps::new("bars"), cfg, None) else {
            panic!("valid config");
        };
        chart
    }

    #[test]
    fn negative_values_take_the_negative_class() {
        let series = BarSeries::from_axis(
            AxisConfig::new("gain")
                .with_class_name("pos")
                .with_class_name_negative("neg"),
        );
        let mut c = chart(series);
        c.render(&data());
        let bars = rects(&c);
        assert_eq!(bars.len(), 2, "the record without a value is skipped");
        assert_eq!(bars[0].1, "fill-current pos");
        assert_eq!(bars[1].1, "fill-current neg");
        let zero = c.value_scale().map(|s| s.map(0.0)).unwrap_or(f64::NAN);
        assert!((bars[1].0.x1 - zero).abs() < 1e-9, "negative bars end at zero");
    }

    #[test]
    fn missing_as_zero_draws_an_empty_bar() {
        let mut c = chart(BarSeries::new("gain").with_missing(MissingPolicy::Zero));
        c.render(&data());
        let bars = rects(&c);
        assert_eq!(bars.len(), 3);
        assert!(bars[2].0.width().abs() < 1e-9);
    }

    #[test]
    fn explicit_domain_is_used_verbatim() {
        let axis = AxisConfig::new("gain").with_domain(-10.0, 10.0);
        let Ok(axis) = axis else {
            panic!("ordered domain");
        };
        let mut c = chart(BarSeries::from_axis(axis));
        c.render(&data());
        assert_eq!(c.value_scale().map(|s| s.domain()), Some((-10.0, 10.0)));
    }

    #[test]
    fn left_direction_moves_category_axis() {
        let cfg = BarConfig::new("team", vec![BarSeries::new("gain")]).with_direction(BarDirection::Left);
        let Ok(mut c) = BarChart::new(ChartProps::new("bars"), cfg, None) else {
            panic!("valid config");
        };
        c.render(&data());
        let s = c.surface();
        let y_axis = s.find_by_test_id("y-axis").and_then(|id| s.get(id));
        assert_eq!(y_axis.map(|n| n.attrs.transform.translate.x), Some(600.0 - 40.0));
    }

    #[test]
    fn data_labels_are_tagged() {
        let cfg = BarConfig::new("team", vec![BarSeries::new("gain")]).with_data_label(DataLabel::default());
        let Ok(mut c) = BarChart::new(ChartProps::new("bars"), cfg, None) else {
            panic!("valid config");
        };
        c.render(&data());
        assert!(c.to_svg().contains("data-testid=\"label\""));
    }

    #[test]
    fn empty_data_draws_the_shell() {
        let mut c = chart(BarSeries::new("gain"));
        c.render(&[]);
        let s = c.surface();
        assert!(s.find_by_test_id("x-axis").is_some());
        assert!(rects(&c).is_empty());
    }
}
