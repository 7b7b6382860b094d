// Copyright 2026 the Charta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scatter plots.
//!
//! Each record becomes one symbol. Color, size and shape can each be driven by a record field;
//! zooming rescales both axes and moves the points without resizing them.

use std::sync::Arc;

use indexmap::IndexMap;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

use charta_core::{Element, NodeId, Paint, Record, Surface, SymbolShape, Transform, TransitionFrom, text_at};

use crate::axis::{AxisOptions, DrawnAxis, Orientation, draw_axis};
use crate::axis_config::{AxisConfig, extent};
use crate::chart::{
    Chart, ChartBase, ChartProps, Drawing, Zoomable, animate, classes, zoom_behavior_for,
};
use crate::curve::Curve;
use crate::error::ChartResult;
use crate::layout::{Margin, Padding};
use crate::scale::ScaleLinear;
use crate::tooltip::{HtmlFn, TooltipConfig};
use crate::zoom::{ZoomBehavior, ZoomTransform};

/// Symbol area used when no size encoding applies.
pub const DEFAULT_POINT_SIZE: f64 = 12.0;

/// Colors points by a field through a class map.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ColorEncoding {
    /// Field holding the color category.
    pub key: String,
    /// Category to class.
    pub class_name_map: IndexMap<String, String>,
}

/// Sizes points by a field.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeEncoding {
    /// Field holding the size value.
    pub key: String,
    /// Smallest symbol area; the size scale needs both bounds.
    pub min: Option<f64>,
    /// Largest symbol area.
    pub max: Option<f64>,
    /// Area used without a size scale.
    pub default: Option<f64>,
}

/// Picks point shapes by a field.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShapeEncoding {
    /// Field holding the shape category.
    pub key: String,
    /// Category to shape name (`circle`, `diamond`, ...).
    #[serde(alias = "map")]
    pub shape_map: IndexMap<String, String>,
}

/// Joins the points in data order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Connect {
    /// Draw the connecting line.
    pub enabled: bool,
    /// Class of the line.
    pub class_name: Option<String>,
}

/// Scatter plot settings.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScatterConfig {
    /// Horizontal axis.
    pub x: AxisConfig,
    /// Vertical axis.
    pub y: AxisConfig,
    /// Color encoding.
    pub color: Option<ColorEncoding>,
    /// Size encoding.
    pub size: Option<SizeEncoding>,
    /// Shape encoding.
    pub shape: Option<ShapeEncoding>,
    /// Connecting line.
    pub connect: Connect,
}

impl ScatterConfig {
    /// Points at `(x, y)`.
    pub fn new(x: AxisConfig, y: AxisConfig) -> Self {
        Self {
            x,
            y,
            ..Self::default()
        }
    }

    /// Colors points by `key`.
    pub fn with_color<I, K, V>(mut self, key: impl Into<String>, classes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.color = Some(ColorEncoding {
            key: key.into(),
            class_name_map: classes.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        });
        self
    }

    /// Sizes points by `key` between `min` and `max` square pixels.
    pub fn with_size(mut self, key: impl Into<String>, min: f64, max: f64) -> Self {
        self.size = Some(SizeEncoding {
            key: key.into(),
            min: Some(min),
            max: Some(max),
            default: None,
        });
        self
    }

    /// Picks shapes by `key`.
    pub fn with_shape<I, K, V>(mut self, key: impl Into<String>, shapes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.shape = Some(ShapeEncoding {
            key: key.into(),
            shape_map: shapes.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        });
        self
    }

    /// Joins the points with a line.
    pub fn connected(mut self, class_name: Option<String>) -> Self {
        self.connect = Connect {
            enabled: true,
            class_name,
        };
        self
    }

    fn validate(&self) -> ChartResult<()> {
        self.x.validate()?;
        self.y.validate()
    }

    fn default_html(&self) -> HtmlFn {
        let mut keys = vec![self.x.key.clone(), self.y.key.clone()];
        keys.extend(self.color.as_ref().map(|c| c.key.clone()));
        keys.extend(self.size.as_ref().map(|s| s.key.clone()));
        keys.extend(self.shape.as_ref().map(|s| s.key.clone()));
        Arc::new(move |d: &Record| {
            keys.iter()
                .map(|k| format!("{k} {}<br/>", text_at(d, k).unwrap_or_default()))
                .collect()
        })
    }

    fn shape_of(&self, record: &Record) -> SymbolShape {
        self.shape
            .as_ref()
            .and_then(|s| {
                let category = text_at(record, &s.key)?;
                SymbolShape::from_name(s.shape_map.get(&category)?)
            })
            .unwrap_or(SymbolShape::Circle)
    }

    fn class_of(&self, record: &Record) -> String {
        let mapped = self
            .color
            .as_ref()
            .and_then(|c| c.class_name_map.get(&text_at(record, &c.key)?).cloned())
            .unwrap_or_default();
        let own = text_at(record, "className").unwrap_or_default();
        classes(&["fill-current stroke-current", &own, &mapped])
    }
}

#[derive(Clone, Debug)]
struct Drawn {
    base: (ScaleLinear, ScaleLinear),
    x: ScaleLinear,
    y: ScaleLinear,
    x_axis: DrawnAxis,
    y_axis: DrawnAxis,
    points: NodeId,
    size: Option<ScaleLinear>,
}

/// A scatter plot.
#[derive(Debug)]
pub struct ScatterPlot {
    base: ChartBase,
    config: ScatterConfig,
    drawn: Option<Drawn>,
    zoom: Option<ZoomBehavior>,
}

impl ScatterPlot {
    /// Creates a scatter plot.
    pub fn new(props: ChartProps, config: ScatterConfig, tooltip: Option<TooltipConfig>) -> ChartResult<Self> {
        props.validate()?;
        config.validate()?;
        let html = config.default_html();
        Ok(Self {
            base: ChartBase::new(props, tooltip, Some(html), "scatter-plot"),
            config,
            drawn: None,
            zoom: None,
        })
    }

    /// The current x and y scales.
    pub fn scales(&self) -> Option<(ScaleLinear, ScaleLinear)> {
        self.drawn.as_ref().map(|d| (d.x, d.y))
    }
}

fn draw_points(
    surface: &mut Surface,
    drawn: &Drawn,
    config: &ScatterConfig,
    data: &[Record],
    drawing: Option<Drawing>,
) {
    let stagger = drawing.map_or(0.0, |d| d.delay_or(0.0));
    let mut line = Vec::new();
    for (j, record) in data.iter().enumerate() {
        let (Some(xv), Some(yv)) = (config.x.value(record), config.y.value(record)) else {
            tracing::trace!(row = j, "scatter point without coordinates skipped");
            continue;
        };
        let p = Point::new(drawn.x.map(xv), drawn.y.map(yv));
        line.push(p);
        let size = match (&config.size, drawn.size) {
            (Some(enc), Some(scale)) => charta_core::number_at(record, &enc.key)
                .map_or(DEFAULT_POINT_SIZE, |v| scale.map(v)),
            (Some(enc), None) => enc.default.unwrap_or(DEFAULT_POINT_SIZE),
            _ => DEFAULT_POINT_SIZE,
        };
        let shape = config.shape_of(record);
        #[allow(clippy::cast_precision_loss, reason = "row indices are small")]
        let delay = j as f64 * stagger;
        surface
            .append(drawn.points, Element::symbol(shape, size))
            .with_class(config.class_of(record))
            .with_fill(Paint::CurrentColor)
            .with_stroke(Paint::CurrentColor)
            .with_transform(Transform::translate(p.x, p.y))
            .with_datum(j)
            .with_transition(animate(drawing, TransitionFrom::Element(Element::symbol(shape, 0.0)), delay));
    }
    if config.connect.enabled && !line.is_empty() {
        surface
            .append(drawn.points, Element::Path(Curve::Line.line(&line)))
            .with_class(classes(&["stroke-current", config.connect.class_name.as_deref().unwrap_or("")]))
            .with_fill(Paint::None)
            .with_stroke(Paint::CurrentColor)
            .with_transition(animate(drawing, TransitionFrom::Reveal, 0.0));
    }
}

impl Chart for ScatterPlot {
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
        let frame = self
            .base
            .padded_frame(Margin::new(40.0, 20.0, 40.0, 40.0), Padding::new(10.0, 10.0, 10.0, 10.0));
        let plot = frame.plot_rect();
        let x = ScaleLinear::new(cfg.x.domain_or(data, (0.0, 1.0)), (plot.x0, plot.x1));
        let y = ScaleLinear::new(cfg.y.domain_or(data, (0.0, 1.0)), (plot.y1, plot.y0));
        let size = cfg.size.as_ref().and_then(|enc| {
            let (min, max) = (enc.min?, enc.max?);
            let domain = extent(data.iter().filter_map(|r| charta_core::number_at(r, &enc.key)))?;
            Some(ScaleLinear::new(domain, (min, max)))
        });

        let surface = &mut self.base.surface;
        let x_axis = draw_axis(
            surface,
            root,
            &x.into(),
            &cfg.x,
            &AxisOptions::new(Orientation::Horizontal, frame.size, frame.margin, frame.padding)
                .with_class_name("xAxis axis"),
        );
        let y_axis = draw_axis(
            surface,
            root,
            &y.into(),
            &cfg.y,
            &AxisOptions::new(Orientation::Vertical, frame.size, frame.margin, frame.padding)
                .with_class_name("yAxis axis"),
        );

        let clip_id = format!("{}-clip", self.base.props.id);
        let clip = Rect::new(
            frame.margin.left,
            frame.margin.top - frame.padding.top - 10.0,
            frame.size.width,
            frame.margin.top - frame.padding.top - 10.0 + frame.size.height + frame.padding.bottom + 8.0,
        );
        surface
            .append(root, Element::ClipRect(clip))
            .with_dom_id(clip_id.clone());
        let points = surface
            .append(root, Element::Group)
            .with_class("points")
            .with_clip(clip_id)
            .id();

        let drawn = Drawn {
            base: (x, y),
            x,
            y,
            x_axis,
            y_axis,
            points,
            size,
        };
        draw_points(surface, &drawn, cfg, data, self.base.props.drawing);

        let previous = self.zoom.map(|z| z.transform());
        self.zoom = zoom_behavior_for(&self.base.props, &frame);
        self.drawn = Some(drawn);
        if let (Some(t), Some(z)) = (previous, self.zoom.as_mut()) {
            let t = z.transform_to(t);
            if t != ZoomTransform::IDENTITY {
                self.apply_zoom(t);
            }
        }
        self.base.finish("scatter");
    }
}

impl Zoomable for ScatterPlot {
    fn zoom_behavior(&mut self) -> Option<&mut ZoomBehavior> {
        self.zoom.as_mut()
    }

    fn apply_zoom(&mut self, transform: ZoomTransform) {
        let Some(drawn) = self.drawn.as_mut() else {
            return;
        };
        drawn.x = drawn.base.0.rescale_range(|r| transform.apply_x(r));
        drawn.y = drawn.base.1.rescale_range(|r| transform.apply_y(r));
        let drawn = drawn.clone();
        let surface = &mut self.base.surface;
        drawn.x_axis.redraw(surface, &drawn.x.into());
        drawn.y_axis.redraw(surface, &drawn.y.into());
        surface.clear_children(drawn.points);
        draw_points(surface, &drawn, &self.config, &self.base.data, None);
    }
}

#[cfg(test)]
mod tests {
    use charta_core::record;
    use serde_json::json;

    use super::*;
    use crate::zoom::Zooming;

    fn data() -> Vec<Record> {
        vec![
            record([("x", json!(1)), ("y", json!(10)), ("kind", json!("a")), ("w", json!(1))]),
            record([("x", json!(2)), ("y", json!(30)), ("kind", json!("b")), ("w", json!(5))]),
            record([("x", json!(4)), ("y", json!(20)), ("kind", json!("a")), ("w", json!(3))]),
        ]
    }

    fn plot(config: ScatterConfig, props: ChartProps, tooltip: Option<TooltipConfig>) -> ScatterPlot {
        let Ok(p) = ScatterPlot::new(props, config, tooltip) else {
            panic!("valid config");
        };
        p
    }

    fn symbols(p: &ScatterPlot) -> Vec<(f64, SymbolShape, Transform)> {
        let s = p.surface();
        s.descendants(s.root())
            .into_iter()
            .filter_map(|id| {
                let node = s.get(id)?;
                match &node.element {
                    Element::Symbol(sym) => Some((sym.size, sym.shape, node.attrs.transform)),
                    _ => None,
                }
            })
            .collect()
    }

    #[test]
    fn domains_follow_the_data() {
        let mut p = plot(ScatterConfig::new(AxisConfig::new("x"), AxisConfig::new("y")), ChartProps::new("s"), None);
        p.render(&data());
        assert_eq!(p.scales().map(|(x, y)| (x.domain(), y.domain())), Some(((1.0, 4.0), (10.0, 30.0))));
        assert_eq!(symbols(&p).len(), 3);
    }

    #[test]
    fn encodings_pick_class_size_and_shape() {
        let cfg = ScatterConfig::new(AxisConfig::new("x"), AxisConfig::new("y"))
            .with_color("kind", [("a", "text-red-500")])
            .with_size("w", 10.0, 50.0)
            .with_shape("kind", [("b", "diamond")]);
        let mut p = plot(cfg, ChartProps::new("s"), None);
        p.render(&data());
        let syms = symbols(&p);
        assert_eq!(syms[0].0, 10.0);
        assert_eq!(syms[1].0, 50.0);
        assert_eq!(syms[1].1, SymbolShape::Diamond);
        assert_eq!(syms[0].1, SymbolShape::Circle);
        assert_eq!(p.surface().select_class("text-red-500").len(), 2);
    }

    #[test]
    fn connect_draws_one_line() {
        let cfg = ScatterConfig::new(AxisConfig::new("x"), AxisConfig::new("y")).connected(Some("link".into()));
        let mut p = plot(cfg, ChartProps::new("s"), None);
        p.render(&data());
        assert_eq!(p.surface().select_class("link").len(), 1);
    }

    #[test]
    fn hovering_a_point_shows_its_fields() {
        let cfg = ScatterConfig::new(AxisConfig::new("x"), AxisConfig::new("y"));
        let mut p = plot(cfg, ChartProps::new("s"), Some(TooltipConfig::new()));
        p.render(&data());
        let Some((x, y)) = p.scales() else {
            panic!("rendered");
        };
        p.pointer_over(Point::new(x.map(2.0), y.map(30.0)));
        let content = p.tooltip().node().map(|n| n.content.clone());
        assert_eq!(content.as_deref(), Some("x 2<br/>y 30<br/>"));
    }

    #[test]
    fn zoom_moves_points_on_both_axes() {
        let props = ChartProps::new("s").with_zooming(Zooming::enabled());
        let mut p = plot(ScatterConfig::new(AxisConfig::new("x"), AxisConfig::new("y")), props, None);
        p.render(&data());
        let before = symbols(&p);
        p.zoom_by(2.0, Point::new(300.0, 200.0));
        let after = symbols(&p);
        assert_eq!(before.len(), after.len());
        assert_ne!(before[0].2, after[0].2);
        assert_eq!(before[0].0, after[0].0, "symbols keep their size");
    }

    #[test]
    fn rows_without_coordinates_are_skipped() {
        let mut rows = data();
        rows.push(record([("x", json!(3))]));
        let mut p = plot(ScatterConfig::new(AxisConfig::new("x"), AxisConfig::new("y")), ChartProps::new("s"), None);
        p.render(&rows);
        assert_eq!(symbols(&p).len(), 3);
    }
}
