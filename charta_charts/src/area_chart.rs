// Copyright 2026 the Charta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stacked area charts.

use kurbo::Point;
use serde::{Deserialize, Serialize};

use charta_core::{Element, NodeId, Paint, Record, Surface, TransitionFrom};
use charta_stack::{Stack, StackSeries, StackingType};

use crate::axis::{AxisOptions, DrawnAxis, Orientation, draw_axis};
use crate::axis_config::{AxisConfig, AxisDisplay, AxisLocation, SeriesConfig, extent};
use crate::chart::{
    Chart, ChartBase, ChartProps, Drawing, Zoomable, animate, classes, clip_rect, listing_html,
    nearest_by_x, zoom_behavior_for,
};
use crate::error::ChartResult;
use crate::layout::{Frame, Margin};
use crate::scale::{ContinuousScale, ScaleLinear};
use crate::tooltip::TooltipConfig;
use crate::zoom::{ZoomBehavior, ZoomTransform};

/// Stacking settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stacking {
    /// Stacking preset.
    #[serde(rename = "type")]
    pub kind: StackingType,
}

/// Area chart settings.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AreaConfig {
    /// The x axis.
    pub x: AxisConfig,
    /// Stacked series, bottom first before ordering.
    pub y: Vec<SeriesConfig>,
    /// Stacking preset.
    pub stacking: Stacking,
}

impl AreaConfig {
    /// Areas for `series` over the x values in `x`.
    pub fn new(x: AxisConfig, series: Vec<SeriesConfig>) -> Self {
        Self {
            x,
            y: series,
            stacking: Stacking::default(),
        }
    }

    /// Sets the stacking preset.
    pub fn with_stacking(mut self, kind: StackingType) -> Self {
        self.stacking = Stacking { kind };
        self
    }

    fn validate(&self) -> ChartResult<()> {
        self.x.validate()?;
        self.y.iter().try_for_each(|s| s.axis.validate())
    }
}

#[derive(Clone, Debug)]
struct Drawn {
    base_x: ContinuousScale,
    x: ContinuousScale,
    y: ScaleLinear,
    x_axis: DrawnAxis,
    areas: NodeId,
    clip: String,
}

/// Stacked areas over a numeric or time x axis.
#[derive(Debug)]
pub struct AreaChart {
    base: ChartBase,
    config: AreaConfig,
    layout: Vec<StackSeries>,
    drawn: Option<Drawn>,
    zoom: Option<ZoomBehavior>,
}

impl AreaChart {
    /// Creates an area chart.
    pub fn new(props: ChartProps, config: AreaConfig, tooltip: Option<TooltipConfig>) -> ChartResult<Self> {
        props.validate()?;
        config.validate()?;
        let html = listing_html(
            config.x.key.clone(),
            config.y.iter().map(|s| s.key().to_string()).collect(),
        );
        Ok(Self {
            base: ChartBase::new(props, tooltip, Some(html), "area-chart"),
            config,
            layout: Vec::new(),
            drawn: None,
            zoom: None,
        })
    }

    /// The stacked bands of the last render, in series order.
    pub fn layout(&self) -> &[StackSeries] {
        &self.layout
    }

    /// The current x scale and the value scale.
    pub fn scales(&self) -> Option<(ContinuousScale, ScaleLinear)> {
        self.drawn.as_ref().map(|d| (d.x, d.y))
    }

    fn nearest(&self, p: Point) -> Option<usize> {
        let x = self.drawn.as_ref()?.x;
        nearest_by_x(&self.base.data, p.x, |r| self.config.x.value(r).map(|v| x.map(v)))
    }
}

fn draw_areas(
    surface: &mut Surface,
    drawn: &Drawn,
    config: &AreaConfig,
    layout: &[StackSeries],
    data: &[Record],
    drawing: Option<Drawing>,
) {
    for (series, stacked) in config.y.iter().zip(layout) {
        let (top, bottom): (Vec<Point>, Vec<Point>) = data
            .iter()
            .zip(&stacked.points)
            .filter_map(|(r, p)| {
                let x = drawn.x.map(config.x.value(r)?);
                Some((Point::new(x, drawn.y.map(p.upper)), Point::new(x, drawn.y.map(p.lower))))
            })
            .unzip();
        if top.is_empty() {
            continue;
        }
        let class = series.axis.class_name.as_deref().unwrap_or("");
        surface
            .append(drawn.areas, Element::Path(series.curve.area(&top, &bottom)))
            .with_class(classes(&["fill-current stroke-1 [fill-opacity:50%]", class]))
            .with_fill(Paint::CurrentColor)
            .with_opacity(0.5)
            .with_clip(drawn.clip.clone())
            .with_transition(animate(drawing, TransitionFrom::Opacity(0.0), 0.0));
    }
}

impl Chart for AreaChart {
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
        let frame: Frame = self.base.frame(Margin::new(20.0, 20.0, 20.0, 40.0));
        let plot = frame.plot_rect();

        let layout = Stack::new(cfg.y.iter().map(|s| s.key().to_string()))
            .with_type(cfg.stacking.kind)
            .layout(data, |row, key| {
                cfg.y
                    .iter()
                    .find(|s| s.key() == key)
                    .and_then(|s| s.value(row))
                    .unwrap_or(f64::NAN)
            });
        let (lo, hi) = extent(
            layout
                .iter()
                .flat_map(|s| s.points.iter().flat_map(|p| [p.lower, p.upper])),
        )
        .unwrap_or((0.0, 1.0));
        let x = ContinuousScale::new(cfg.x.is_time(), cfg.x.domain_or(data, (0.0, 1.0)), (plot.x0, plot.x1));
        let y = ScaleLinear::new((lo, hi), (plot.y1, plot.y0));

        let surface = &mut self.base.surface;
        let clip = clip_rect(surface, root, &self.base.props.id, frame.axes_rect());
        let mut x_config = cfg.x.clone();
        x_config.axis.location = Some(if cfg.x.location() == Some(AxisLocation::Top) {
            AxisLocation::Top
        } else {
            AxisLocation::Bottom
        });
        let x_axis = draw_axis(
            surface,
            root,
            &x.into(),
            &x_config,
            &AxisOptions::new(Orientation::Horizontal, frame.size, frame.margin, frame.padding)
                .with_class_name("axis--x axis"),
        );
        let y_config = AxisConfig {
            key: cfg.y.first().map(|s| s.key().to_string()).unwrap_or_default(),
            axis: AxisDisplay {
                location: Some(AxisLocation::Left),
                ticks: cfg.y.first().and_then(|s| s.axis.axis.ticks),
                label: cfg.y.first().and_then(|s| s.axis.label()).map(str::to_string),
            },
            ..AxisConfig::default()
        };
        draw_axis(
            surface,
            root,
            &y.into(),
            &y_config,
            &AxisOptions::new(Orientation::Vertical, frame.size, frame.margin, frame.padding)
                .with_class_name("axis--y axis"),
        );
        let areas = surface.append(root, Element::Group).with_class("area").id();

        let drawn = Drawn {
            base_x: x,
            x,
            y,
            x_axis,
            areas,
            clip,
        };
        draw_areas(surface, &drawn, cfg, &layout, data, self.base.props.drawing);

        self.layout = layout;
        self.drawn = Some(drawn);
        let previous = self.zoom.map(|z| z.transform());
        self.zoom = zoom_behavior_for(&self.base.props, &frame);
        if let (Some(t), Some(z)) = (previous, self.zoom.as_mut()) {
            let t = z.transform_to(t);
            if t != ZoomTransform::IDENTITY {
                self.apply_zoom(t);
            }
        }
        self.base.finish("area");
    }

    fn pointer_over(&mut self, p: Point) {
        let datum = self.nearest(p).and_then(|i| self.base.data.get(i)).cloned();
        if let Some(datum) = datum {
            self.base.tooltip.on_mouse_over(p, &datum);
        }
    }

    fn pointer_move(&mut self, p: Point) {
        let datum = self.nearest(p).and_then(|i| self.base.data.get(i)).cloned();
        self.base.tooltip.on_mouse_move(p, datum.as_ref());
    }
}

impl Zoomable for AreaChart {
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
        surface.clear_children(drawn.areas);
        draw_areas(surface, &drawn, &self.config, &self.layout, &self.base.data, None);
        tracing::trace!(k = transform.k, x = transform.x, "area chart zoomed");
    }
}
