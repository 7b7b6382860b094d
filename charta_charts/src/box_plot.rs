// Copyright 2026 the Charta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Box plots from precomputed five-number summaries.

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

use charta_core::{Element, Paint, Record, TransitionFrom, text_at, value_at};

use crate::axis::{AxisOptions, Orientation, draw_axis};
use crate::axis_config::{AxisConfig, extent};
use crate::chart::{Chart, ChartBase, ChartProps, animate, categories, classes, listing_html};
use crate::error::ChartResult;
use crate::layout::Margin;
use crate::scale::{ScaleBand, ScaleLinear};
use crate::tooltip::TooltipConfig;

/// The value axis of a box plot and the fields of each summary.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SummaryAxis {
    /// Axis display and domain bounds.
    #[serde(flatten)]
    pub axis: AxisConfig,
    /// Lower whisker.
    pub min_key: String,
    /// Upper whisker.
    pub max_key: String,
    /// Median.
    pub mid_key: String,
    /// Lower edge of the box.
    pub box_start: String,
    /// Upper edge of the box.
    pub box_end: String,
    /// Domain floor, used when `start` is unset.
    pub min: Option<f64>,
    /// Domain ceiling, used when `end` is unset.
    pub max: Option<f64>,
    /// Extra class on every box.
    pub class_name_boxes: Option<String>,
}

impl Default for SummaryAxis {
    fn default() -> Self {
        Self {
            axis: AxisConfig::default(),
            min_key: "min".to_string(),
            max_key: "max".to_string(),
            mid_key: "mid".to_string(),
            box_start: "firstQuartile".to_string(),
            box_end: "lastQuartile".to_string(),
            min: None,
            max: None,
            class_name_boxes: None,
        }
    }
}

/// One row's summary in value units.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Summary {
    min: f64,
    box_start: f64,
    mid: f64,
    box_end: f64,
    max: f64,
}

impl SummaryAxis {
    fn read(&self, record: &Record, key: &str) -> Option<f64> {
        value_at(record, key).and_then(|v| self.axis.value_of(v))
    }

    fn summary(&self, record: &Record) -> Option<Summary> {
        Some(Summary {
            min: self.read(record, &self.min_key)?,
            box_start: self.read(record, &self.box_start)?,
            mid: self.read(record, &self.mid_key)?,
            box_end: self.read(record, &self.box_end)?,
            max: self.read(record, &self.max_key)?,
        })
    }

    fn keys(&self) -> Vec<String> {
        vec![
            self.min_key.clone(),
            self.box_start.clone(),
            self.mid_key.clone(),
            self.box_end.clone(),
            self.max_key.clone(),
        ]
    }
}

/// Box plot settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BoxConfig {
    /// `horizontal` puts values on x and categories on y.
    pub orientation: Orientation,
    /// Category axis.
    pub category: AxisConfig,
    /// Value axis and summary fields.
    pub summary: SummaryAxis,
}

impl Default for BoxConfig {
    fn default() -> Self {
        Self::horizontal(AxisConfig::default(), SummaryAxis::default())
    }
}

impl BoxConfig {
    /// Horizontal boxes per category.
    pub fn horizontal(category: AxisConfig, summary: SummaryAxis) -> Self {
        Self {
            orientation: Orientation::Horizontal,
            category,
            summary,
        }
    }

    /// Vertical boxes per category.
    pub fn vertical(category: AxisConfig, summary: SummaryAxis) -> Self {
        Self {
            orientation: Orientation::Vertical,
            category,
            summary,
        }
    }
}

/// A box plot.
#[derive(Debug)]
pub struct BoxPlot {
    base: ChartBase,
    config: BoxConfig,
    value_scale: Option<ScaleLinear>,
}

impl BoxPlot {
    /// Creates a box plot.
    pub fn new(props: ChartProps, config: BoxConfig, tooltip: Option<TooltipConfig>) -> ChartResult<Self> {
        props.validate()?;
        config.category.validate()?;
        config.summary.axis.validate()?;
        let html = listing_html(config.category.key.clone(), config.summary.keys());
        let test_id = match config.orientation {
            Orientation::Horizontal => "box-plot-h",
            Orientation::Vertical => "box-plot-v",
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

impl Chart for BoxPlot {
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
        let frame = self.base.frame(Margin::new(40.0, 20.0, 40.0, 40.0));
        let plot = frame.plot_rect();
        let summaries: Vec<Option<Summary>> = data.iter().map(|r| cfg.summary.summary(r)).collect();

        let s = &cfg.summary;
        let lo = s.axis.start.or(s.min).or_else(|| {
            extent(summaries.iter().flatten().map(|x| x.min)).map(|e| e.0)
        });
        let hi = s.axis.end.or(s.max).or_else(|| {
            extent(summaries.iter().flatten().map(|x| x.max)).map(|e| e.1)
        });
        let domain = (lo.unwrap_or(0.0), hi.unwrap_or(1.0));
        let (value_range, band_range) = if horizontal {
            ((plot.x0, plot.x1), (plot.y0, plot.y1))
        } else {
            ((plot.y1, plot.y0), (plot.x0, plot.x1))
        };
        let values = ScaleLinear::new(domain, value_range);
        let bands = ScaleBand::new(categories(&cfg.category, data), band_range).with_padding(frame.padding.bar_or(0.3));
        // Maps (value px, band px) to surface coordinates.
        let at = |v: f64, b: f64| if horizontal { Point::new(v, b) } else { Point::new(b, v) };

        let drawing = self.base.props.drawing;
        let surface = &mut self.base.surface;
        let (value_orientation, band_orientation) = if horizontal {
            (Orientation::Horizontal, Orientation::Vertical)
        } else {
            (Orientation::Vertical, Orientation::Horizontal)
        };
        draw_axis(
            surface,
            root,
            &values.into(),
            &s.axis,
            &AxisOptions::new(value_orientation, frame.size, frame.margin, frame.padding),
        );
        draw_axis(
            surface,
            root,
            &bands.clone().into(),
            &cfg.category,
            &AxisOptions::new(band_orientation, frame.size, frame.margin, frame.padding),
        );

        let boxes = surface.append(root, Element::Group).with_class("boxes").id();
        let bw = bands.band_width();
        for (j, (record, summary)) in data.iter().zip(&summaries).enumerate() {
            let (Some(sm), Some(b0)) = (
                summary,
                cfg.category.category(record).and_then(|c| bands.position(&c)),
            ) else {
                continue;
            };
            let (b1, bc) = (b0 + bw, b0 + bw / 2.0);
            let own = text_at(record, "className").unwrap_or_default();
            let row = surface.append(boxes, Element::Group).with_datum(j).id();
            surface
                .append(row, Element::line(at(values.map(sm.min), bc), at(values.map(sm.max), bc)))
                .with_class(classes(&["box-whisker stroke-current", &own]))
                .with_stroke(Paint::CurrentColor);
            for v in [sm.min, sm.max] {
                let p = values.map(v);
                surface
                    .append(row, Element::line(at(p, bc - bw / 4.0), at(p, bc + bw / 4.0)))
                    .with_class(classes(&["box-cap stroke-current", &own]))
                    .with_stroke(Paint::CurrentColor);
            }
            let rect = Rect::from_points(at(values.map(sm.box_start), b0), at(values.map(sm.box_end), b1));
            let mid = values.map(sm.mid);
            let collapsed = Rect::from_points(at(mid, b0), at(mid, b1));
            surface
                .append(row, Element::rect(rect))
                .with_class(classes(&[
                    "box fill-current stroke-current opacity-50",
                    s.class_name_boxes.as_deref().unwrap_or(""),
                    &own,
                ]))
                .with_fill(Paint::CurrentColor)
                .with_opacity(0.5)
                .with_transition(animate(drawing, TransitionFrom::Element(Element::rect(collapsed)), 0.0));
            surface
                .append(row, Element::line(at(mid, b0), at(mid, b1)))
                .with_class(classes(&["box-median stroke-current", &own]))
                .with_stroke(Paint::CurrentColor)
                .with_stroke_width(2.0);
        }

        self.value_scale = Some(values);
        self.base.finish("box");
    }
}

#[cfg(test)]
mod tests {
    use charta_core::record;
    use serde_json::json;

    use super::*;

    fn data() -> Vec<Record> {
        vec![
            record([
                ("name", json!("a")),
                ("min", json!(1)),
                ("firstQuartile", json!(3)),
                ("mid", json!(5)),
                ("lastQuartile", json!(6)),
                ("max", json!(9)),
            ]),
            record([
                ("name", json!("b")),
                ("min", json!(2)),
                ("firstQuartile", json!(4)),
                ("mid", json!(4.5)),
                ("lastQuartile", json!(7)),
                ("max", json!(12)),
            ]),
        ]
    }

    fn plot(config: BoxConfig, tooltip: Option<TooltipConfig>) -> BoxPlot {
        let Ok(p) = BoxPlot::new(ChartProps::new("box"), config, tooltip) else {
            panic!("valid config");
        };
        p
    }

    fn box_rects(p: &BoxPlot) -> Vec<Rect> {
        let s = p.surface();
        s.select_class("box")
            .into_iter()
            .filter_map(|id| match s.get(id).map(|n| &n.element) {
                Some(Element::Rect { rect, .. }) => Some(*rect),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn horizontal_boxes_span_the_quartiles() {
        let mut p = plot(BoxConfig::horizontal(AxisConfig::new("name"), SummaryAxis::default()), None);
        p.render(&data());
        let Some(x) = p.value_scale() else {
            panic!("rendered");
        };
        assert_eq!(x.domain(), (1.0, 12.0));
        let rects = box_rects(&p);
        assert_eq!(rects.len(), 2);
        assert!((rects[0].x0 - x.map(3.0)).abs() < 1e-9);
        assert!((rects[0].x1 - x.map(6.0)).abs() < 1e-9);
        assert_eq!(p.surface().select_class("box-median").len(), 2);
        assert_eq!(p.surface().select_class("box-cap").len(), 4);
    }

    #[test]
    fn vertical_boxes_use_the_y_axis_for_values() {
        let summary = SummaryAxis {
            min: Some(0.0),
            ..SummaryAxis::default()
        };
        let mut p = plot(BoxConfig::vertical(AxisConfig::new("name"), summary), None);
        p.render(&data());
        assert_eq!(p.value_scale().map(|s| s.domain()), Some((0.0, 12.0)));
        let rects = box_rects(&p);
        assert!(rects[0].height() > rects[0].width() / 10.0);
        assert_eq!(p.surface().test_id(), Some("box-plot-v"));
    }

    #[test]
    fn incomplete_summaries_are_skipped() {
        let mut rows = data();
        rows.push(record([("name", json!("c")), ("min", json!(0))]));
        let mut p = plot(BoxConfig::horizontal(AxisConfig::new("name"), SummaryAxis::default()), None);
        p.render(&rows);
        assert_eq!(box_rects(&p).len(), 2);
    }

    #[test]
    fn default_tooltip_lists_the_summary() {
        let p = plot(
            BoxConfig::horizontal(AxisConfig::new("name"), SummaryAxis::default()),
            Some(TooltipConfig::new()),
        );
        assert_eq!(
            p.tooltip().content_for(&data()[0]),
            "a <br/> min: 1<br/>firstQuartile: 3<br/>mid: 5<br/>lastQuartile: 6<br/>max: 9"
        );
    }
}
