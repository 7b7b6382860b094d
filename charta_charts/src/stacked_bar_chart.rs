// Copyright 2026 the Charta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stacked bars and columns.
//!
//! Series are stacked per category with [`charta_stack`], so every stacking preset
//! (`normal`, `100%`, `streamgraph`, `diverging`) works in both orientations. In waterfall
//! mode each series keeps its stacked offset but gets its own slice of the band, which turns
//! the stack into a staircase.

use kurbo::Rect;
use serde::{Deserialize, Deserializer, Serialize};

use charta_core::{Element, Record, TransitionFrom};
use charta_stack::{Stack, StackSeries, StackingType};

use crate::axis::{AxisOptions, Orientation, draw_axis};
use crate::axis_config::{AxisConfig, AxisDisplay, AxisLocation, extent};
use crate::bar_chart::{BarDirection, BarSeries};
use crate::chart::{
    Chart, ChartBase, ChartProps, ReferenceLine, animate, categories, classes,
    draw_horizontal_reference, draw_vertical_reference, joined_label, listing_html,
};
use crate::error::ChartResult;
use crate::layout::Margin;
use crate::scale::{ScaleBand, ScaleLinear};
use crate::tooltip::TooltipConfig;

/// Side-by-side placement of stacked series.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Waterfall {
    /// Pixels trimmed from each series' slice of the band.
    pub padding: f64,
}

fn lenient_waterfall<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Waterfall>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Flag(bool),
        Settings(Waterfall),
    }
    Ok(match Option::<Raw>::deserialize(d)? {
        Some(Raw::Flag(true)) => Some(Waterfall::default()),
        Some(Raw::Settings(w)) => Some(w),
        Some(Raw::Flag(false)) | None => None,
    })
}

/// Stacked chart settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StackedConfig {
    /// Bars (horizontal) or columns (vertical).
    pub orientation: Orientation,
    /// Category axis.
    pub category: AxisConfig,
    /// Stacked series, bottom first before ordering.
    pub series: Vec<BarSeries>,
    /// Stacking preset.
    #[serde(rename = "type")]
    pub stacking: StackingType,
    /// Growth direction of horizontal bars.
    pub direction: BarDirection,
    /// Give each series its own slice of the band.
    #[serde(deserialize_with = "lenient_waterfall")]
    pub waterfall: Option<Waterfall>,
    /// Reference lines on the value axis.
    pub reference_lines: Vec<ReferenceLine>,
}

impl Default for StackedConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::Vertical,
            category: AxisConfig::default(),
            series: Vec::new(),
            stacking: StackingType::Normal,
            direction: BarDirection::Right,
            waterfall: None,
            reference_lines: Vec::new(),
        }
    }
}

impl StackedConfig {
    /// Horizontal bars stacked left to right.
    pub fn bars(category_key: impl Into<String>, series: Vec<BarSeries>) -> Self {
        Self {
            orientation: Orientation::Horizontal,
            ..Self::columns(category_key, series)
        }
    }

    /// Vertical columns stacked bottom to top.
    pub fn columns(category_key: impl Into<String>, series: Vec<BarSeries>) -> Self {
        Self {
            category: AxisConfig::new(category_key),
            series,
            ..Self::default()
        }
    }

    /// Sets the stacking preset.
    pub fn with_stacking(mut self, stacking: StackingType) -> Self {
        self.stacking = stacking;
        self
    }

    /// Sets the growth direction of horizontal bars.
    pub fn with_direction(mut self, direction: BarDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Turns on waterfall placement.
    pub fn with_waterfall(mut self, waterfall: Waterfall) -> Self {
        self.waterfall = Some(waterfall);
        self
    }

    /// Adds a reference line.
    pub fn with_reference_line(mut self, line: ReferenceLine) -> Self {
        self.reference_lines.push(line);
        self
    }

    fn validate(&self) -> ChartResult<()> {
        self.category.validate()?;
        self.series.iter().try_for_each(|s| s.axis.validate())
    }

    fn horizontal(&self) -> bool {
        self.orientation == Orientation::Horizontal
    }
}

/// Stacked bars or columns.
#[derive(Debug)]
pub struct StackedBarChart {
    base: ChartBase,
    config: StackedConfig,
    layout: Vec<StackSeries>,
    value_scale: Option<ScaleLinear>,
}

impl StackedBarChart {
    /// Creates a stacked chart.
    pub fn new(props: ChartProps, config: StackedConfig, tooltip: Option<TooltipConfig>) -> ChartResult<Self> {
        props.validate()?;
        config.validate()?;
        let html = listing_html(
            config.category.key.clone(),
            config.series.iter().map(|s| s.axis.key.clone()).collect(),
        );
        let test_id = if config.horizontal() {
            "bar-chart-stacked"
        } else {
            "column-chart-stacked"
        };
        Ok(Self {
            base: ChartBase::new(props, tooltip, Some(html), test_id),
            config,
            layout: Vec::new(),
            value_scale: None,
        })
    }

    /// The stacked bands of the last render, in series order.
    pub fn layout(&self) -> &[StackSeries] {
        &self.layout
    }

    /// The value scale of the last render.
    pub fn value_scale(&self) -> Option<ScaleLinear> {
        self.value_scale
    }

    fn stack(&self, data: &[Record]) -> Vec<StackSeries> {
        let cfg = &self.config;
        Stack::new(cfg.series.iter().map(|s| s.axis.key.clone()))
            .with_type(cfg.stacking)
            .layout(data, |row, key| {
                cfg.series
                    .iter()
                    .find(|s| s.axis.key == key)
                    .and_then(|s| s.value(row))
                    .unwrap_or(f64::NAN)
            })
    }

    fn value_domain(&self, layout: &[StackSeries]) -> (f64, f64) {
        let stacked = extent(
            layout
                .iter()
                .flat_map(|s| s.points.iter().flat_map(|p| [p.lower, p.upper]))
                .chain([0.0]),
        )
        .unwrap_or((0.0, 1.0));
        let axes = self.config.series.iter().map(|s| &s.axis);
        let start = extent(axes.clone().filter_map(|a| a.start)).map(|e| e.0);
        let end = extent(axes.filter_map(|a| a.end)).map(|e| e.1);
        let hi = if stacked.1 > stacked.0 { stacked.1 } else { stacked.0 + 1.0 };
        (start.unwrap_or(stacked.0), end.unwrap_or(hi))
    }
}

impl Chart for StackedBarChart {
    type Data = [Record];

    fn base(&self) -> &ChartBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ChartBase {
        &mut self.base
    }

    fn render(&mut self, data: &[Record]) {
        let g = self.base.begin(data);
        let layout = self.stack(data);
        let domain = self.value_domain(&layout);
        let cfg = &self.config;
        let horizontal = cfg.horizontal();
        let frame = self.base.frame(if horizontal {
            Margin::new(20.0, 20.0, 40.0, 60.0)
        } else {
            Margin::uniform(40.0)
        });
        let plot = frame.plot_rect();
        let reversed = cfg.direction == BarDirection::Left;
        let (value_range, band_range) = if horizontal {
            let r = if reversed { (plot.x1, plot.x0) } else { (plot.x0, plot.x1) };
            (r, (plot.y0, plot.y1))
        } else {
            ((plot.y1, plot.y0), (plot.x0, plot.x1))
        };
        let value = ScaleLinear::new(domain, value_range);
        let band = ScaleBand::new(categories(&cfg.category, data), band_range)
            .with_padding(frame.padding.bar_or(if horizontal { 0.3 } else { 0.2 }));

        #[allow(clippy::cast_precision_loss, reason = "series counts are small")]
        let n = cfg.series.len().max(1) as f64;
        let drawing = self.base.props.drawing;
        let surface = &mut self.base.surface;
        for (series, stacked) in cfg.series.iter().zip(&layout) {
            let group = surface
                .append(g, Element::Group)
                .with_class(classes(&["series", series.axis.class_name.as_deref().unwrap_or("")]))
                .id();
            #[allow(clippy::cast_precision_loss, reason = "indices are small")]
            let slot = stacked.index as f64;
            let (offset, thickness) = match cfg.waterfall {
                Some(w) => (
                    band.band_width() / n * slot,
                    (band.band_width() / n - w.padding).max(0.0),
                ),
                None => (0.0, band.band_width()),
            };
            for (j, (record, point)) in data.iter().zip(&stacked.points).enumerate() {
                let (Some(v), Some(start)) = (
                    series.value(record),
                    cfg.category.category(record).and_then(|c| band.position(&c)),
                ) else {
                    continue;
                };
                let a = value.map(point.lower);
                let b = value.map(point.upper);
                let across = (start + offset, start + offset + thickness);
                let (rect, from) = if horizontal {
                    (
                        Rect::new(a.min(b), across.0, a.max(b), across.1),
                        Rect::new(a, across.0, a, across.1),
                    )
                } else {
                    (
                        Rect::new(across.0, a.min(b), across.1, a.max(b)),
                        Rect::new(across.0, a, across.1, a),
                    )
                };
                #[allow(clippy::cast_precision_loss, reason = "indices are small")]
                let delay = drawing.and_then(|d| d.delay).unwrap_or(0.0) * j as f64;
                surface
                    .append(group, Element::Rect { rect, rx: series.rx })
                    .with_class(classes(&["fill-current", series.axis.class_for(v)]))
                    .with_datum(j)
                    .with_transition(animate(
                        drawing,
                        TransitionFrom::Element(Element::Rect { rect: from, rx: series.rx }),
                        delay,
                    ));
            }
        }

        for line in &cfg.reference_lines {
            let at = line
                .y_left
                .or_else(|| line.x.as_ref().and_then(serde_json::Value::as_f64));
            let Some(v) = at else { continue };
            let caption = Some(charta_core::format_number(v));
            if horizontal {
                draw_vertical_reference(surface, g, line, value.map(v), (plot.y0, plot.y1), None);
            } else {
                draw_horizontal_reference(
                    surface,
                    g,
                    line,
                    value.map(v),
                    (frame.margin.left, frame.size.width - frame.margin.right),
                    None,
                    caption,
                );
            }
        }

        let (value_orientation, band_orientation) = if horizontal {
            (Orientation::Horizontal, Orientation::Vertical)
        } else {
            (Orientation::Vertical, Orientation::Horizontal)
        };
        let value_axis = AxisConfig {
            key: cfg.series.first().map(|s| s.axis.key.clone()).unwrap_or_default(),
            axis: AxisDisplay {
                location: cfg.series.iter().find_map(|s| s.axis.location()),
                ticks: cfg.series.first().and_then(|s| s.axis.axis.ticks),
                label: Some(joined_label(cfg.series.iter().map(|s| &s.axis))),
            },
            ..AxisConfig::default()
        };
        let mut band_axis = cfg.category.clone();
        if horizontal {
            band_axis.axis.location = Some(if reversed { AxisLocation::Right } else { AxisLocation::Left });
        }
        draw_axis(
            surface,
            g,
            &value.into(),
            &value_axis,
            &AxisOptions::new(value_orientation, frame.size, frame.margin, frame.padding),
        );
        draw_axis(
            surface,
            g,
            &band.into(),
            &band_axis,
            &AxisOptions::new(band_orientation, frame.size, frame.margin, frame.padding),
        );

        self.layout = layout;
        self.value_scale = Some(value);
        self.base.finish("stacked");
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use charta_core::record;
    use serde_json::json;

    use super::*;

    fn data() -> Vec<Record> {
        vec![
            record([("q", json!("q1")), ("a", json!(1)), ("b", json!(3))]),
            record([("q", json!("q2")), ("a", json!(2)), ("b", json!(2))]),
            record([("q", json!("q3")), ("a", json!(5)), ("b", json!(0))]),
        ]
    }

    fn chart(config: StackedConfig) -> StackedBarChart {
        let Ok(c) = StackedBarChart::new(ChartProps::new("stack"), config, None) else {
            panic!("valid config");
        };
        c
    }

    fn rects(c: &StackedBarChart) -> Vec<Rect> {
        let s = c.surface();
        s.descendants(s.root())
            .into_iter()
            .filter_map(|id| match s.get(id).map(|n| &n.element) {
                Some(Element::Rect { rect, .. }) => Some(*rect),
                _ => None,
            })
            .collect()
    }

    fn series() -> Vec<BarSeries> {
        vec![BarSeries::new("a"), BarSeries::new("b")]
    }

    #[test]
    fn normal_domain_is_zero_to_largest_total() {
        let mut c = chart(StackedConfig::columns("q", series()));
        c.render(&data());
        assert_eq!(c.value_scale().map(|s| s.domain()), Some((0.0, 5.0)));
    }

    #[test]
    fn percent_fractions_fill_each_category() {
        let mut c = chart(StackedConfig::columns("q", series()).with_stacking(StackingType::Percent));
        c.render(&data());
        for row in 0..3 {
            let total: f64 = c
                .layout()
                .iter()
                .map(|s| s.points[row].upper - s.points[row].lower)
                .sum();
            assert_relative_eq!(total, 1.0, epsilon = 1e-9);
        }
        let plot_height = 400.0 - 80.0;
        let all = rects(&c);
        let first_column: f64 = all
            .iter()
            .filter(|r| (r.x0 - all[0].x0).abs() < 1e-9)
            .map(Rect::height)
            .sum();
        assert_relative_eq!(first_column, plot_height, epsilon = 1e-6);
    }

    #[test]
    fn stacked_columns_touch() {
        let mut c = chart(StackedConfig::columns("q", series()));
        c.render(&data());
        let r = rects(&c);
        // a on q1 sits directly below b on q1.
        assert_relative_eq!(r[0].y0, r[3].y1, epsilon = 1e-9);
    }

    #[test]
    fn waterfall_splits_the_band() {
        let mut c = chart(StackedConfig::bars("q", series()).with_waterfall(Waterfall::default()));
        c.render(&data());
        let r = rects(&c);
        assert_relative_eq!(r[0].height(), r[3].height(), epsilon = 1e-9);
        assert!(r[3].y0 >= r[0].y1 - 1e-9);
        assert_relative_eq!(r[3].x0, r[0].x1, epsilon = 1e-9);
    }

    #[test]
    fn waterfall_accepts_a_flag() {
        let Ok(cfg) = serde_json::from_value::<StackedConfig>(json!({
            "category": {"key": "q"},
            "series": [{"key": "a"}],
            "waterfall": true,
            "type": "100%"
        })) else {
            panic!("config parses");
        };
        assert_eq!(cfg.waterfall, Some(Waterfall::default()));
        assert_eq!(cfg.stacking, StackingType::Percent);
    }

    #[test]
    fn diverging_splits_signs_around_zero() {
        let rows = vec![record([("q", json!("q1")), ("a", json!(-2)), ("b", json!(3))])];
        let mut c = chart(StackedConfig::bars("q", series()).with_stacking(StackingType::Diverging));
        c.render(&rows);
        assert_eq!(c.value_scale().map(|s| s.domain()), Some((-2.0, 3.0)));
    }

    #[test]
    fn tooltip_lists_the_stack() {
        let Ok(c) = StackedBarChart::new(
            ChartProps::new("stack"),
            StackedConfig::columns("q", series()),
            Some(TooltipConfig::new()),
        ) else {
            panic!("valid config");
        };
        assert_eq!(c.tooltip().content_for(&data()[1]), "q2 <br/> a: 2<br/>b: 2");
    }
}
