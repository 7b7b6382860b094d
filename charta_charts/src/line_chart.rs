// Copyright 2026 the Charta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Multi-series line charts with left and right value axes.
//!
//! Series anchored `right` share the right axis; every other series shares the left one. The
//! x axis may be numeric or time. With zooming enabled, gestures rescale only the x range:
//! the x axis ticks, the series and the reference lines are redrawn in place while the y
//! axes and the rest of the surface stay untouched.
//!
//! Hovering snaps to the record nearest the pointer along x, so the tooltip works anywhere
//! over the plot rather than only on the thin line strokes.

use kurbo::Point;
use serde::{Deserialize, Serialize};

use charta_core::{
    Ease, Element, NodeId, Paint, Record, Surface, TextAnchor, TextElement, Transform,
    TransitionFrom, format_number,
};

use crate::axis::{AxisOptions, DrawnAxis, Orientation, draw_axis};
use crate::axis_config::{AxisConfig, AxisDisplay, AxisLocation, LabelPosition, SeriesConfig};
use crate::chart::{
    Chart, ChartBase, ChartProps, Drawing, ReferenceLine, Zoomable, animate, classes, clip_rect,
    draw_horizontal_reference, draw_vertical_reference, joined_label, nearest_by_x,
    shared_domain, zoom_behavior_for,
};
use crate::error::ChartResult;
use crate::layout::{Frame, Margin};
use crate::scale::{ContinuousScale, ScaleLinear};
use crate::tooltip::{GUIDE_CLASS, TooltipConfig};
use crate::zoom::{ZoomBehavior, ZoomTransform};

/// Line chart settings.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LineConfig {
    /// The x axis.
    pub x: AxisConfig,
    /// Series; each picks its side with `axis.location`.
    pub y: Vec<SeriesConfig>,
    /// Caption for the left axis, replacing the joined series labels.
    pub y_left_label: Option<String>,
    /// Caption for the right axis, replacing the joined series labels.
    pub y_right_label: Option<String>,
    /// Draw dashed guides to the hovered record.
    pub show_guide_lines: bool,
    /// Flip the left axis so larger values sit lower.
    pub reverse: bool,
    /// Reference lines.
    pub reference_lines: Vec<ReferenceLine>,
}

impl LineConfig {
    /// Lines for `series` over the x values in `x`.
    pub fn new(x: AxisConfig, series: Vec<SeriesConfig>) -> Self {
        Self {
            x,
            y: series,
            ..Self::default()
        }
    }

    /// Adds a reference line.
    pub fn with_reference_line(mut self, line: ReferenceLine) -> Self {
        self.reference_lines.push(line);
        self
    }

    /// Turns on hover guides.
    pub fn with_guide_lines(mut self) -> Self {
        self.show_guide_lines = true;
        self
    }

    /// Flips the left axis.
    pub fn reversed(mut self) -> Self {
        self.reverse = true;
        self
    }

    fn validate(&self) -> ChartResult<()> {
        self.x.validate()?;
        self.y.iter().try_for_each(|s| s.axis.validate())
    }

    fn on_right(series: &SeriesConfig) -> bool {
        series.axis.location() == Some(AxisLocation::Right)
    }
}

/// The scales marks are drawn with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineScales {
    /// The x scale, zoomed if a zoom is active.
    pub x: ContinuousScale,
    /// The left value scale, if any series uses it.
    pub left: Option<ScaleLinear>,
    /// The right value scale, if any series uses it.
    pub right: Option<ScaleLinear>,
}

impl LineScales {
    fn for_series(&self, series: &SeriesConfig) -> Option<ScaleLinear> {
        if LineConfig::on_right(series) {
            self.right
        } else {
            self.left
        }
    }
}

/// Node handles kept between a render and later zoom redraws.
#[derive(Clone, Debug)]
struct Drawn {
    frame: Frame,
    base_x: ContinuousScale,
    scales: LineScales,
    x_axis: DrawnAxis,
    root: NodeId,
    left: NodeId,
    right: NodeId,
    references: NodeId,
    clip: String,
}

/// A line chart.
#[derive(Debug)]
pub struct LineChart {
    base: ChartBase,
    config: LineConfig,
    drawn: Option<Drawn>,
    zoom: Option<ZoomBehavior>,
}

impl LineChart {
    /// Creates a line chart.
    pub fn new(props: ChartProps, config: LineConfig, tooltip: Option<TooltipConfig>) -> ChartResult<Self> {
        props.validate()?;
        config.validate()?;
        Ok(Self {
            base: ChartBase::new(props, tooltip, None, "line-chart"),
            config,
            drawn: None,
            zoom: None,
        })
    }

    /// The scales of the current view.
    pub fn scales(&self) -> Option<LineScales> {
        self.drawn.as_ref().map(|d| d.scales)
    }

    fn x_px(&self, record: &Record) -> Option<f64> {
        let scales = self.drawn.as_ref()?.scales;
        self.config.x.value(record).map(|v| scales.x.map(v))
    }

    fn nearest(&self, p: Point) -> Option<usize> {
        nearest_by_x(&self.base.data, p.x, |r| self.x_px(r))
    }

    fn draw_guides(&mut self, index: usize) {
        let (Some(drawn), Some(record)) = (self.drawn.as_ref(), self.base.data.get(index)) else {
            return;
        };
        let Some(x) = self.config.x.value(record).map(|v| drawn.scales.x.map(v)) else {
            return;
        };
        let frame = drawn.frame;
        let bottom = frame.size.height - frame.margin.bottom;
        let mut left_values = Vec::new();
        let mut right_values = Vec::new();
        for series in &self.config.y {
            let (Some(v), Some(scale)) = (series.axis.value(record), drawn.scales.for_series(series)) else {
                continue;
            };
            if LineConfig::on_right(series) {
                right_values.push(scale.map(v));
            } else {
                left_values.push(scale.map(v));
            }
        }
        let top = left_values
            .iter()
            .chain(&right_values)
            .copied()
            .fold(bottom, f64::min);

        let surface = &mut self.base.surface;
        surface
            .append(drawn.root, Element::line((x, top), (x, bottom)))
            .with_class(classes(&[GUIDE_CLASS, "text-gray-200 stroke-current"]))
            .with_stroke(Paint::CurrentColor)
            .with_stroke_width(1.0)
            .with_dash(&[10.0, 7.0])
            .with_clip(drawn.clip.clone());
        let guide = |surface: &mut Surface, y: f64, (x0, x1): (f64, f64)| {
            surface
                .append(drawn.root, Element::line((x0, y), (x1, y)))
                .with_class(GUIDE_CLASS)
                .with_stroke(peniko::Color::from_rgb8(0xdd, 0xdd, 0xdd))
                .with_dash(&[10.0, 5.0])
                .with_clip(drawn.clip.clone());
        };
        for y in left_values {
            guide(surface, y, (frame.margin.left, x));
        }
        for y in right_values {
            guide(surface, y, (x, frame.size.width - frame.margin.right));
        }
    }

    fn clear_guides(&mut self) {
        for id in self.base.surface.select_class(GUIDE_CLASS) {
            self.base.surface.remove(id);
        }
    }
}

/// Draws every series into its side's group.
fn draw_series(
    surface: &mut Surface,
    drawn: &Drawn,
    config: &LineConfig,
    data: &[Record],
    drawing: Option<Drawing>,
) {
    let frame = drawn.frame;
    for series in &config.y {
        let Some(y) = drawn.scales.for_series(series) else {
            continue;
        };
        let (parent, side) = if LineConfig::on_right(series) {
            (drawn.right, "right")
        } else {
            (drawn.left, "left")
        };
        let points: Vec<(usize, Point)> = data
            .iter()
            .enumerate()
            .filter_map(|(j, r)| {
                let x = config.x.value(r)?;
                let v = series.value(r)?;
                Some((j, Point::new(drawn.scales.x.map(x), y.map(v))))
            })
            .collect();
        let class = series.axis.class_name.as_deref().unwrap_or("");
        let line_class = format!("{side}-series");
        let symbol_class = format!("{side}-circles");
        let group = surface.append(parent, Element::Group).with_class("group").id();
        let line: Vec<Point> = points.iter().map(|(_, p)| *p).collect();
        let reveal = animate(drawing, TransitionFrom::Reveal, 0.0).map(|t| t.with_ease(Ease::Linear));
        surface
            .append(group, Element::Path(series.curve.line(&line)))
            .with_class(classes(&[line_class.as_str(), "stroke-current", class]))
            .with_fill(Paint::None)
            .with_stroke(Paint::CurrentColor)
            .with_transition(reveal);

        if series.label.show
            && let Some(last) = line.last()
        {
            let (x, anchor) = match series.label.position {
                LabelPosition::Right => (
                    frame.size.width - frame.margin.right - frame.padding.right - 10.0,
                    TextAnchor::End,
                ),
                LabelPosition::Left => (frame.margin.left + frame.padding.left + 10.0, TextAnchor::Start),
            };
            surface
                .append(
                    group,
                    Element::Text(TextElement::new((x, last.y), series.key()).with_anchor(anchor)),
                )
                .with_class(classes(&[
                    "y-line-labels",
                    series.label.class_name.as_deref().unwrap_or(""),
                ]))
                .with_fill(Paint::CurrentColor);
        }

        if let Some(shape) = series.symbol {
            for (j, p) in &points {
                surface
                    .append(group, Element::symbol(shape, series.symbol_size()))
                    .with_class(classes(&[symbol_class.as_str(), class, "fill-current"]))
                    .with_transform(Transform::translate(p.x, p.y))
                    .with_fill(Paint::CurrentColor)
                    .with_datum(*j);
            }
        }
    }
}

/// Draws the reference lines into their group.
fn draw_references(surface: &mut Surface, drawn: &Drawn, config: &LineConfig) {
    let frame = drawn.frame;
    let span = (frame.margin.left, frame.size.width - frame.margin.right);
    for line in &config.reference_lines {
        if let Some(x) = line.x.as_ref().and_then(|v| config.x.value_of(v)) {
            draw_vertical_reference(
                surface,
                drawn.references,
                line,
                drawn.scales.x.map(x),
                (frame.margin.top, frame.size.height - frame.margin.bottom),
                Some(&drawn.clip),
            );
        }
        if let (Some(v), Some(y)) = (line.y_left, drawn.scales.left) {
            draw_horizontal_reference(
                surface,
                drawn.references,
                line,
                y.map(v),
                span,
                Some(&drawn.clip),
                Some(format!("y = {}", format_number(v))),
            );
        }
        if let (Some(v), Some(y)) = (line.y_right, drawn.scales.right) {
            draw_horizontal_reference(
                surface,
                drawn.references,
                line,
                y.map(v),
                span,
                Some(&drawn.clip),
                Some(format!("y = {}", format_number(v))),
            );
        }
    }
}

impl Chart for LineChart {
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
        let x_top = cfg.x.location() == Some(AxisLocation::Top);

        let x = ContinuousScale::new(cfg.x.is_time(), cfg.x.domain_or(data, (0.0, 1.0)), (plot.x0, plot.x1));
        let y_range = if x_top { (plot.y0, plot.y1) } else { (plot.y1, plot.y0) };
        let left_series: Vec<&SeriesConfig> = cfg.y.iter().filter(|s| !LineConfig::on_right(s)).collect();
        let right_series: Vec<&SeriesConfig> = cfg.y.iter().filter(|s| LineConfig::on_right(s)).collect();
        let left = (!left_series.is_empty()).then(|| {
            let (lo, hi) = shared_domain(left_series.iter().map(|s| &s.axis), data, false);
            let domain = if cfg.reverse { (hi, lo) } else { (lo, hi) };
            ScaleLinear::new(domain, y_range)
        });
        let right = (!right_series.is_empty()).then(|| {
            ScaleLinear::new(shared_domain(right_series.iter().map(|s| &s.axis), data, false), y_range)
        });

        let surface = &mut self.base.surface;
        let mut x_config = cfg.x.clone();
        x_config.axis.location = Some(if x_top { AxisLocation::Top } else { AxisLocation::Bottom });
        let x_axis = draw_axis(
            surface,
            root,
            &x.into(),
            &x_config,
            &AxisOptions::new(Orientation::Horizontal, frame.size, frame.margin, frame.padding)
                .with_class_name("axis--x axis"),
        );
        let label_y = if x_top {
            frame.size.height - frame.margin.bottom + 20.0
        } else {
            frame.margin.top - 15.0
        };
        for (series, scale, location, label, class) in [
            (&left_series, left, AxisLocation::Left, &cfg.y_left_label, "axis axis--left-y"),
            (&right_series, right, AxisLocation::Right, &cfg.y_right_label, "axis axis--right-y"),
        ] {
            let Some(scale) = scale else { continue };
            let axis = AxisConfig {
                key: series.first().map(|s| s.key().to_string()).unwrap_or_default(),
                axis: AxisDisplay {
                    location: Some(location),
                    ticks: series.iter().filter_map(|s| s.axis.axis.ticks).min(),
                    label: None,
                },
                ..AxisConfig::default()
            };
            let text = label
                .clone()
                .unwrap_or_else(|| joined_label(series.iter().map(|s| &s.axis)));
            draw_axis(
                surface,
                root,
                &scale.into(),
                &axis,
                &AxisOptions::new(Orientation::Vertical, frame.size, frame.margin, frame.padding)
                    .with_label_text(Some(text))
                    .with_label_offset(label_y)
                    .with_class_name(class),
            );
        }

        let clip = clip_rect(surface, root, &self.base.props.id, frame.axes_rect());
        let left_g = surface
            .append(root, Element::Group)
            .with_class("left-g")
            .with_clip(clip.clone())
            .id();
        let right_g = surface
            .append(root, Element::Group)
            .with_class("right-g")
            .with_clip(clip.clone())
            .id();
        let references = surface.append(root, Element::Group).with_class("references").id();

        let drawn = Drawn {
            frame,
            base_x: x,
            scales: LineScales { x, left, right },
            x_axis,
            root,
            left: left_g,
            right: right_g,
            references,
            clip,
        };
        draw_series(surface, &drawn, cfg, data, self.base.props.drawing);
        draw_references(surface, &drawn, cfg);

        // A zoom in progress survives re-renders.
        let previous = self.zoom.map(|z| z.transform());
        self.zoom = zoom_behavior_for(&self.base.props, &frame);
        self.drawn = Some(drawn);
        if let (Some(t), Some(z)) = (previous, self.zoom.as_mut()) {
            let t = z.transform_to(t);
            if t != ZoomTransform::IDENTITY {
                self.apply_zoom(t);
            }
        }
        self.base.finish("line");
    }

    fn pointer_over(&mut self, p: Point) {
        if !self.base.tooltip.is_enabled() {
            return;
        }
        let Some(datum) = self.nearest(p).and_then(|i| self.base.data.get(i)).cloned() else {
            return;
        };
        self.base.tooltip.on_mouse_over(p, &datum);
    }

    fn pointer_move(&mut self, p: Point) {
        if !self.base.tooltip.is_enabled() {
            return;
        }
        self.clear_guides();
        let Some(index) = self.nearest(p) else {
            return;
        };
        if self.config.show_guide_lines {
            self.draw_guides(index);
        }
        let datum = self.base.data.get(index).cloned();
        self.base.tooltip.on_mouse_move(p, datum.as_ref());
    }
}

impl Zoomable for LineChart {
    fn zoom_behavior(&mut self) -> Option<&mut ZoomBehavior> {
        self.zoom.as_mut()
    }

    fn apply_zoom(&mut self, transform: ZoomTransform) {
        let Some(drawn) = self.drawn.as_mut() else {
            return;
        };
        drawn.scales.x = drawn.base_x.rescale_range(|r| transform.apply_x(r));
        let drawn = drawn.clone();
        let surface = &mut self.base.surface;
        drawn.x_axis.redraw(surface, &drawn.scales.x.into());
        surface.clear_children(drawn.left);
        surface.clear_children(drawn.right);
        surface.clear_children(drawn.references);
        draw_series(surface, &drawn, &self.config, &self.base.data, None);
        draw_references(surface, &drawn, &self.config);
        tracing::trace!(k = transform.k, x = transform.x, "line chart zoomed");
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use charta_core::{SymbolShape, record};
    use serde_json::json;

    use super::*;
    use crate::axis_config::MissingPolicy;
    use crate::time::TimeFormat;
    use crate::zoom::Zooming;

    fn data() -> Vec<Record> {
        vec![
            record([("t", json!(0)), ("a", json!(10)), ("b", json!(100))]),
            record([("t", json!(5)), ("a", json!(null)), ("b", json!(300))]),
            record([("t", json!(10)), ("a", json!(30)), ("b", json!(200))]),
        ]
    }

    fn chart(config: LineConfig, props: ChartProps, tooltip: Option<TooltipConfig>) -> LineChart {
        let Ok(c) = LineChart::new(props, config, tooltip) else {
            panic!("valid config");
        };
        c
    }

    fn two_axes() -> LineConfig {
        LineConfig::new(
            AxisConfig::new("t"),
            vec![
                SeriesConfig::new("a").with_symbol(SymbolShape::Circle),
                SeriesConfig::new("b").with_location(AxisLocation::Right),
            ],
        )
    }

    fn subtree(surface: &Surface, id: NodeId) -> Vec<(Element, Transform)> {
        surface
            .descendants(id)
            .into_iter()
            .filter_map(|n| surface.get(n).map(|n| (n.element.clone(), n.attrs.transform)))
            .collect()
    }

    #[test]
    fn series_split_between_axes() {
        let mut c = chart(two_axes(), ChartProps::new("line"), None);
        c.render(&data());
        let Some(scales) = c.scales() else {
            panic!("rendered");
        };
        assert_eq!(scales.left.map(|s| s.domain()), Some((10.0, 30.0)));
        assert_eq!(scales.right.map(|s| s.domain()), Some((100.0, 300.0)));
        let s = c.surface();
        assert_eq!(s.select_class("left-series").len(), 1);
        assert_eq!(s.select_class("right-series").len(), 1);
        assert!(s.find_by_test_id("y-axis").is_some());
    }

    #[test]
    fn missing_points_follow_the_policy() {
        let mut c = chart(two_axes(), ChartProps::new("line"), None);
        c.render(&data());
        assert_eq!(c.surface().select_class("left-circles").len(), 2);

        let cfg = LineConfig::new(
            AxisConfig::new("t"),
            vec![
                SeriesConfig::new("a")
                    .with_symbol(SymbolShape::Square)
                    .with_missing(MissingPolicy::Zero),
            ],
        );
        let mut c = chart(cfg, ChartProps::new("line"), None);
        c.render(&data());
        assert_eq!(c.surface().select_class("left-circles").len(), 3);
        assert_eq!(c.scales().and_then(|s| s.left).map(|s| s.domain()), Some((10.0, 30.0)));
    }

    #[test]
    fn reverse_flips_the_left_domain() {
        let mut c = chart(two_axes().reversed(), ChartProps::new("line"), None);
        c.render(&data());
        assert_eq!(c.scales().and_then(|s| s.left).map(|s| s.domain()), Some((30.0, 10.0)));
    }

    #[test]
    fn zoom_rescales_only_x() {
        let props = ChartProps::new("line").with_zooming(Zooming::enabled());
        let mut c = chart(two_axes(), props, None);
        c.render(&data());
        let before = c.scales();
        let s = c.surface();
        let Some(y_axis) = s.select_class("axis--left-y").first().copied() else {
            panic!("left axis drawn");
        };
        let Some(x_axis) = s.find_by_test_id("x-axis") else {
            panic!("x axis drawn");
        };
        let y_before = subtree(s, y_axis);
        let x_before = subtree(s, x_axis);

        c.zoom_by(2.0, Point::new(300.0, 200.0));

        let after = c.scales();
        assert_ne!(before.map(|s| s.x.range()), after.map(|s| s.x.range()));
        assert_eq!(before.map(|s| s.left), after.map(|s| s.left));
        let s = c.surface();
        assert_eq!(subtree(s, y_axis), y_before, "y axis untouched");
        assert_ne!(subtree(s, x_axis), x_before, "x ticks redrawn");

        let Some(scales) = after else {
            panic!("rendered");
        };
        let (r0, r1) = scales.x.range();
        assert_relative_eq!(r1 - r0, 2.0 * (580.0 - 40.0), epsilon = 1e-9);
    }

    #[test]
    fn zoom_is_inert_when_disabled() {
        let mut c = chart(two_axes(), ChartProps::new("line"), None);
        c.render(&data());
        let before = c.scales();
        c.zoom_by(2.0, Point::new(300.0, 200.0));
        assert_eq!(before, c.scales());
    }

    #[test]
    fn reference_lines_and_caption() {
        let cfg = two_axes()
            .with_reference_line(ReferenceLine::vertical(5))
            .with_reference_line(ReferenceLine::horizontal(20.0).with_text());
        let mut c = chart(cfg, ChartProps::new("line"), None);
        c.render(&data());
        let svg = c.to_svg();
        assert_eq!(c.surface().select_class("reference-line").len(), 3, "two lines and a caption");
        assert!(svg.contains("y = 20"));
    }

    #[test]
    fn hover_snaps_to_nearest_x_and_draws_guides() {
        let mut c = chart(
            two_axes().with_guide_lines(),
            ChartProps::new("line"),
            Some(TooltipConfig::new().with_keys(["t", "b"])),
        );
        c.render(&data());
        c.pointer_move(Point::new(560.0, 100.0));
        let node = c.tooltip().node().map(|n| n.content.clone());
        assert_eq!(node.as_deref(), Some("t: 10<br/>b: 200"));
        assert_eq!(c.surface().select_class(GUIDE_CLASS).len(), 3);
        c.pointer_leave();
        assert!(c.surface().select_class(GUIDE_CLASS).is_empty());
        assert!(c.tooltip().node().is_some_and(|n| !n.is_visible()));
    }

    #[test]
    fn no_tooltip_means_no_guides() {
        let mut c = chart(two_axes().with_guide_lines(), ChartProps::new("line"), None);
        c.render(&data());
        c.pointer_move(Point::new(300.0, 100.0));
        assert!(c.surface().select_class(GUIDE_CLASS).is_empty());
        assert!(c.tooltip().node().is_none());
    }

    #[test]
    fn time_axis_reads_dates() {
        let rows = vec![
            record([("day", json!("2024-01-01")), ("v", json!(1))]),
            record([("day", json!("2024-01-31")), ("v", json!(2))]),
        ];
        let x = AxisConfig::new("day").with_time(TimeFormat::default());
        let mut c = chart(LineConfig::new(x, vec![SeriesConfig::new("v")]), ChartProps::new("line"), None);
        c.render(&rows);
        let Some(ContinuousScale::Time(t)) = c.scales().map(|s| s.x) else {
            panic!("time scale");
        };
        assert_relative_eq!(t.domain().1 - t.domain().0, 30.0 * 86_400_000.0);
    }

    #[test]
    fn drawing_reveals_the_stroke() {
        let props = ChartProps::new("line").with_drawing(Drawing::new(500.0));
        let mut c = chart(two_axes(), props, None);
        c.render(&data());
        let s = c.surface();
        let Some(path) = s.select_class("left-series").first().and_then(|id| s.get(*id)) else {
            panic!("series drawn");
        };
        assert_eq!(path.transition.as_ref().map(|t| t.from.clone()), Some(TransitionFrom::Reveal));
        assert!(!s.is_settled(100.0));
        assert!(s.is_settled(500.0));
    }
}
