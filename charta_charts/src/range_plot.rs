// Copyright 2026 the Charta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Range plots: one row per category spanning two values on a shared x axis.
//!
//! [`RangeMark::Dots`] draws a line with a dot at each end; [`RangeMark::Comet`] draws a
//! tapering tail from the first value to a head at the second, colored by direction.

use std::sync::Arc;

use kurbo::Point;
use serde::{Deserialize, Serialize};

use charta_core::{Element, NodeId, Paint, Record, Surface, SymbolShape, Transform, TransitionFrom, text_at, value_at};

use crate::axis::{AxisOptions, DrawnAxis, Orientation, draw_axis};
use crate::axis_config::{AxisConfig, AxisLocation, extent};
use crate::chart::{
    Chart, ChartBase, ChartProps, Drawing, Zoomable, animate, categories, classes, clip_rect,
    zoom_behavior_for,
};
use crate::error::ChartResult;
use crate::layout::Margin;
use crate::scale::{ScaleBand, ScaleLinear};
use crate::tooltip::TooltipConfig;
use crate::zoom::{ZoomBehavior, ZoomTransform};

/// Symbol area of the range ends.
pub const DEFAULT_DOT_SIZE: f64 = 100.0;

/// The value axis of a range plot: where each range starts and ends.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RangeAxis {
    /// Axis display and domain bounds.
    #[serde(flatten)]
    pub axis: AxisConfig,
    /// Field holding the start of the range.
    #[serde(alias = "fromKey")]
    pub min_key: String,
    /// Field holding the end of the range.
    #[serde(alias = "toKey")]
    pub max_key: String,
    /// Extra class on comet tails.
    pub class_name_tail: Option<String>,
    /// Extra class on comet heads.
    pub class_name_head: Option<String>,
}

impl RangeAxis {
    /// Ranges from `min_key` to `max_key`.
    pub fn new(min_key: impl Into<String>, max_key: impl Into<String>) -> Self {
        Self {
            min_key: min_key.into(),
            max_key: max_key.into(),
            ..Self::default()
        }
    }

    fn ends(&self, record: &Record) -> Option<(f64, f64)> {
        let read = |key: &str| value_at(record, key).and_then(|v| self.axis.value_of(v));
        Some((read(&self.min_key)?, read(&self.max_key)?))
    }
}

/// How each range is drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeMark {
    /// A line with a dot at each end.
    #[default]
    Dots,
    /// A tail widening toward a head at the end value.
    Comet,
}

/// Range plot settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RangeConfig {
    /// The value axis.
    pub x: RangeAxis,
    /// The category axis.
    pub y: AxisConfig,
    /// Mark style.
    pub mark: RangeMark,
    /// Shape of the dots and comet heads.
    pub shape: SymbolShape,
    /// Symbol area of the dots and heads.
    pub size: Option<f64>,
    /// Extra class on every dot-style mark.
    pub class_name_data: Option<String>,
}

impl Default for RangeConfig {
    fn default() -> Self {
        Self {
            x: RangeAxis::default(),
            y: AxisConfig::new("label").with_location(AxisLocation::Left),
            mark: RangeMark::Dots,
            shape: SymbolShape::Circle,
            size: None,
            class_name_data: None,
        }
    }
}

impl RangeConfig {
    /// Dot ranges of `x` per category of `y`.
    pub fn new(x: RangeAxis, y: AxisConfig) -> Self {
        Self {
            x,
            y,
            ..Self::default()
        }
    }

    /// Draws comets instead of dots.
    pub fn comets(mut self) -> Self {
        self.mark = RangeMark::Comet;
        self
    }

    /// Sets the end shape.
    pub fn with_shape(mut self, shape: SymbolShape) -> Self {
        self.shape = shape;
        self
    }

    /// Sets the symbol area.
    pub fn with_size(mut self, size: f64) -> Self {
        self.size = Some(size);
        self
    }

    fn validate(&self) -> ChartResult<()> {
        self.x.axis.validate()?;
        self.y.validate()
    }

    fn size(&self) -> f64 {
        self.size.unwrap_or(DEFAULT_DOT_SIZE)
    }
}

#[derive(Clone, Debug)]
struct Drawn {
    base_x: ScaleLinear,
    x: ScaleLinear,
    y: ScaleBand,
    x_axis: DrawnAxis,
    rows: NodeId,
    clip: String,
}

/// A range or comet plot.
#[derive(Debug)]
pub struct RangePlot {
    base: ChartBase,
    config: RangeConfig,
    drawn: Option<Drawn>,
    zoom: Option<ZoomBehavior>,
}

impl RangePlot {
    /// Creates a range plot.
    pub fn new(props: ChartProps, config: RangeConfig, tooltip: Option<TooltipConfig>) -> ChartResult<Self> {
        props.validate()?;
        config.validate()?;
        let (label, from, to) = (config.y.key.clone(), config.x.min_key.clone(), config.x.max_key.clone());
        let html = Arc::new(move |d: &Record| {
            let text = |k: &str| text_at(d, k).unwrap_or_default();
            format!("{}: {} to {}", text(&label), text(&from), text(&to))
        });
        let test_id = match config.mark {
            RangeMark::Dots => "range-plot",
            RangeMark::Comet => "comet-plot",
        };
        Ok(Self {
            base: ChartBase::new(props, tooltip, Some(html), test_id),
            config,
            drawn: None,
            zoom: None,
        })
    }

    /// The current value scale.
    pub fn value_scale(&self) -> Option<ScaleLinear> {
        self.drawn.as_ref().map(|d| d.x)
    }
}

fn draw_rows(surface: &mut Surface, drawn: &Drawn, config: &RangeConfig, data: &[Record], drawing: Option<Drawing>) {
    let size = config.size();
    let data_class = config.class_name_data.as_deref().unwrap_or("");
    for (j, record) in data.iter().enumerate() {
        let (Some((from, to)), Some(band)) = (
            config.x.ends(record),
            config.y.category(record).and_then(|c| drawn.y.position(&c)),
        ) else {
            continue;
        };
        let cy = band + drawn.y.band_width() / 2.0;
        let (x0, x1) = (drawn.x.map(from), drawn.x.map(to));
        let row = surface.append(drawn.rows, Element::Group).with_datum(j).id();
        match config.mark {
            RangeMark::Dots => {
                surface
                    .append(row, Element::line((x0, cy), (x1, cy)))
                    .with_class(classes(&["dot-plot-line stroke-current", data_class]))
                    .with_stroke(Paint::CurrentColor)
                    .with_clip(drawn.clip.clone())
                    .with_transition(animate(
                        drawing,
                        TransitionFrom::Element(Element::line((x0, cy), (x0, cy))),
                        0.0,
                    ));
                surface
                    .append(row, Element::symbol(config.shape, size))
                    .with_class(classes(&["start-dots fill-current", data_class]))
                    .with_fill(Paint::CurrentColor)
                    .with_transform(Transform::translate(x0, cy));
                surface
                    .append(row, Element::symbol(config.shape, size))
                    .with_class(classes(&["end-dots fill-current", data_class]))
                    .with_fill(Paint::CurrentColor)
                    .with_transform(Transform::translate(x1, cy))
                    .with_transition(animate(drawing, TransitionFrom::Transform(Transform::translate(x0, cy)), 0.0));
            }
            RangeMark::Comet => {
                let half = (size / 4.0).sqrt();
                let direction = config.x.axis.class_for(to - from);
                let own = text_at(record, "className").unwrap_or_default();
                let tail = vec![
                    Point::new(x0, cy),
                    Point::new(x1, cy - half),
                    Point::new(x1, cy + half),
                    Point::new(x0, cy),
                ];
                let collapsed = vec![
                    Point::new(x0, cy),
                    Point::new(x0, cy - half),
                    Point::new(x0, cy + half),
                    Point::new(x0, cy),
                ];
                surface
                    .append(row, Element::Polygon(tail))
                    .with_class(classes(&[
                        "comet-tail fill-current stroke-0",
                        direction,
                        &own,
                        config.x.class_name_tail.as_deref().unwrap_or(""),
                    ]))
                    .with_fill(Paint::CurrentColor)
                    .with_clip(drawn.clip.clone())
                    .with_transition(animate(drawing, TransitionFrom::Element(Element::Polygon(collapsed)), 0.0));
                surface
                    .append(row, Element::symbol(config.shape, size))
                    .with_class(classes(&[
                        "fill-current end-dots stroke-current stroke-0",
                        direction,
                        &own,
                        config.x.class_name_head.as_deref().unwrap_or(""),
                    ]))
                    .with_fill(Paint::CurrentColor)
                    .with_transform(Transform::translate(x1, cy))
                    .with_transition(animate(drawing, TransitionFrom::Transform(Transform::translate(x0, cy)), 0.0));
            }
        }
    }
}

impl Chart for RangePlot {
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
        let plot = frame.plot_rect();

        let lo = cfg.x.axis.start.or_else(|| {
            extent(data.iter().filter_map(|r| cfg.x.ends(r).map(|e| e.0))).map(|e| e.0)
        });
        let hi = cfg.x.axis.end.or_else(|| {
            extent(data.iter().filter_map(|r| cfg.x.ends(r).map(|e| e.1))).map(|e| e.1)
        });
        let x = ScaleLinear::new((lo.unwrap_or(0.0), hi.unwrap_or(1.0)), (plot.x0, plot.x1));
        let y = ScaleBand::new(categories(&cfg.y, data), (plot.y0, plot.y1));

        let surface = &mut self.base.surface;
        let mut y_config = cfg.y.clone();
        y_config.axis.location = Some(y_config.location().unwrap_or(AxisLocation::Left));
        draw_axis(
            surface,
            root,
            &y.clone().into(),
            &y_config,
            &AxisOptions::new(Orientation::Vertical, frame.size, frame.margin, frame.padding)
                .with_class_name("yAxis axis"),
        );
        let x_axis = draw_axis(
            surface,
            root,
            &x.into(),
            &cfg.x.axis,
            &AxisOptions::new(Orientation::Horizontal, frame.size, frame.margin, frame.padding)
                .with_class_name("axis--x axis"),
        );
        let clip = clip_rect(surface, root, &self.base.props.id, frame.axes_rect());
        let rows = surface
            .append(root, Element::Group)
            .with_class("data")
            .with_clip(clip.clone())
            .id();

        let drawn = Drawn {
            base_x: x,
            x,
            y,
            x_axis,
            rows,
            clip,
        };
        draw_rows(surface, &drawn, cfg, data, self.base.props.drawing);

        let previous = self.zoom.map(|z| z.transform());
        self.zoom = zoom_behavior_for(&self.base.props, &frame);
        self.drawn = Some(drawn);
        if let (Some(t), Some(z)) = (previous, self.zoom.as_mut()) {
            let t = z.transform_to(t);
            if t != ZoomTransform::IDENTITY {
                self.apply_zoom(t);
            }
        }
        self.base.finish("range");
    }
}

impl Zoomable for RangePlot {
    fn zoom_behavior(&mut self) -> Option<&mut ZoomBehavior> {
        self.zoom.as_mut()
    }

    fn apply_zoom(&mut self, transform: ZoomTransform) {
        let Some(drawn) = self.drawn.as_mut() else {
            return;
        };
        drawn.x = drawn.base_x.rescale_range(|r| transform.apply_x(r));
        let drawn = drawn.clone();
        let surface = &mut self.base.surface;
        drawn.x_axis.redraw(surface, &drawn.x.into());
        surface.clear_children(drawn.rows);
        draw_rows(surface, &drawn, &self.config, &self.base.data, None);
    }
}
