// Copyright 2026 the Charta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared chart plumbing.
//!
//! Every chart owns a [`ChartBase`]: its props, its drawing [`Surface`], its [`Tooltip`] and the
//! rows of the last render. A render clears the surface and rebuilds every mark, so successive
//! renders never overlap and clearing implicitly cancels in-flight transitions.
//!
//! The [`Chart`] trait gives every chart the same outer shape: `render`, pointer dispatch to
//! the tooltip, and SVG output. Charts that can zoom also implement [`Zoomable`].

use std::sync::Arc;

use indexmap::IndexSet;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use charta_core::{
    Element, FontSize, NodeId, Paint, Record, Surface, TextElement, Transition, TransitionFrom,
    text_at,
};

use crate::axis_config::{AxisConfig, extent};
use crate::error::{ChartError, ChartResult};
use crate::layout::{Frame, Margin, Padding, Size};
use crate::tooltip::{HtmlFn, Tooltip, TooltipConfig};
use crate::zoom::{ZoomBehavior, ZoomTransform, Zooming};

/// Maps a record to display text (labels, captions).
pub type RecordText = Arc<dyn Fn(&Record) -> String + Send + Sync>;

/// A caption with a class hook.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Caption {
    /// Caption text; nothing is drawn without it.
    pub text: Option<String>,
    /// Class hook.
    pub class_name: Option<String>,
}

impl Caption {
    /// A caption reading `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            class_name: None,
        }
    }

    /// Sets the class hook.
    pub fn with_class_name(mut self, class: impl Into<String>) -> Self {
        self.class_name = Some(class.into());
        self
    }
}

/// Animation settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Drawing {
    /// Transition length in milliseconds.
    pub duration: f64,
    /// Stagger between series or marks, in milliseconds; each chart has its own default.
    pub delay: Option<f64>,
}

impl Drawing {
    /// Animates over `duration` milliseconds.
    pub fn new(duration: f64) -> Self {
        Self {
            duration,
            delay: None,
        }
    }

    /// Sets the stagger.
    pub fn with_delay(mut self, delay: f64) -> Self {
        self.delay = Some(delay);
        self
    }

    /// The stagger, or `default` when unset.
    pub fn delay_or(&self, default: f64) -> f64 {
        self.delay.unwrap_or(default)
    }
}

/// Props shared by every chart.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartProps {
    /// Chart id; the surface is tagged with it and the tooltip is `tooltip-<id>`.
    pub id: String,
    /// Surface size.
    pub size: Size,
    /// Margin; each chart supplies its own default.
    pub margin: Option<Margin>,
    /// Padding; defaults to none.
    pub padding: Option<Padding>,
    /// Animation; absent means marks are drawn at their end state.
    pub drawing: Option<Drawing>,
    /// Zoom and pan.
    pub zooming: Option<Zooming>,
    /// Extra class on the surface.
    pub class_name: Option<String>,
}

impl Default for ChartProps {
    fn default() -> Self {
        Self {
            id: "chart".to_string(),
            size: Size::default(),
            margin: None,
            padding: None,
            drawing: None,
            zooming: None,
            class_name: None,
        }
    }
}

impl ChartProps {
    /// Props for chart `id` with default size.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Decodes props from JSON and validates them.
    pub fn from_json(json: &str) -> ChartResult<Self> {
        let props: Self = serde_json::from_str(json)?;
        props.validate()?;
        Ok(props)
    }

    /// Sets the surface size.
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.size = Size::new(width, height);
        self
    }

    /// Sets the margin.
    pub fn with_margin(mut self, margin: Margin) -> Self {
        self.margin = Some(margin);
        self
    }

    /// Sets the padding.
    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = Some(padding);
        self
    }

    /// Enables animation.
    pub fn with_drawing(mut self, drawing: Drawing) -> Self {
        self.drawing = Some(drawing);
        self
    }

    /// Enables zooming.
    pub fn with_zooming(mut self, zooming: Zooming) -> Self {
        self.zooming = Some(zooming);
        self
    }

    /// Adds a surface class.
    pub fn with_class_name(mut self, class: impl Into<String>) -> Self {
        self.class_name = Some(class.into());
        self
    }

    /// Checks the size and zoom extent.
    pub fn validate(&self) -> ChartResult<()> {
        let Size { width, height } = self.size;
        if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
            return Err(ChartError::InvalidSize { width, height });
        }
        if let Some(z) = &self.zooming {
            z.validate()?;
        }
        Ok(())
    }

    /// Whether zooming is switched on.
    pub fn zoom_enabled(&self) -> bool {
        self.zooming.is_some_and(|z| z.enabled)
    }
}

/// State every chart owns.
#[derive(Debug)]
pub struct ChartBase {
    pub(crate) props: ChartProps,
    pub(crate) surface: Surface,
    pub(crate) tooltip: Tooltip,
    pub(crate) data: Vec<Record>,
    test_id: &'static str,
}

impl ChartBase {
    /// Creates the surface and tooltip for a chart.
    ///
    /// `test_id` tags the root surface so fixtures can find it.
    pub fn new(
        props: ChartProps,
        tooltip: Option<TooltipConfig>,
        default_html: Option<HtmlFn>,
        test_id: &'static str,
    ) -> Self {
        let surface = Self::make_surface(&props, test_id);
        let tooltip = Tooltip::new(props.id.clone(), tooltip, default_html);
        Self {
            props,
            surface,
            tooltip,
            data: Vec::new(),
            test_id,
        }
    }

    fn make_surface(props: &ChartProps, test_id: &str) -> Surface {
        let mut surface = Surface::new(props.id.clone(), props.size.width, props.size.height);
        let class = match &props.class_name {
            Some(c) if !c.is_empty() => format!("charta {c}"),
            _ => "charta".to_string(),
        };
        surface.set_class(class);
        surface.set_test_id(Some(test_id.to_string()));
        surface
    }

    /// The props.
    pub fn props(&self) -> &ChartProps {
        &self.props
    }

    /// The drawing surface.
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// The tooltip controller.
    pub fn tooltip(&self) -> &Tooltip {
        &self.tooltip
    }

    /// Rows of the last render.
    pub fn data(&self) -> &[Record] {
        &self.data
    }

    /// Re-keys the chart: a fresh surface, and the old tooltip node is removed.
    pub fn set_id(&mut self, id: impl Into<String>) {
        let id = id.into();
        if id == self.props.id {
            return;
        }
        self.props.id = id.clone();
        self.surface = Self::make_surface(&self.props, self.test_id);
        self.tooltip.set_id(id);
    }

    /// The box model with the chart's default margin.
    pub fn frame(&self, default_margin: Margin) -> Frame {
        Frame::new(
            self.props.size,
            self.props.margin.unwrap_or(default_margin),
            self.props.padding.unwrap_or_default(),
        )
    }

    /// The box model with the chart's default margin and padding.
    pub fn padded_frame(&self, default_margin: Margin, default_padding: Padding) -> Frame {
        Frame::new(
            self.props.size,
            self.props.margin.unwrap_or(default_margin),
            self.props.padding.unwrap_or(default_padding),
        )
    }

    /// Clears the surface, stores `data`, and returns the root group for new marks.
    pub(crate) fn begin(&mut self, data: &[Record]) -> NodeId {
        self.surface.clear();
        self.surface
            .set_size(self.props.size.width, self.props.size.height);
        self.data = data.to_vec();
        let root = self.surface.root();
        self.surface.append(root, Element::Group).id()
    }

    /// Logs the end of a render.
    pub(crate) fn finish(&self, kind: &str) {
        tracing::debug!(
            id = %self.props.id,
            kind,
            rows = self.data.len(),
            nodes = self.surface.node_count(),
            "chart rendered"
        );
    }

    /// A transition from `from`, or `None` when drawing is off.
    pub fn transition(&self, from: TransitionFrom, delay: f64) -> Option<Transition> {
        animate(self.props.drawing, from, delay)
    }

    /// Whether marks animate.
    pub fn animates(&self) -> bool {
        self.props.drawing.is_some_and(|d| d.duration > 0.0)
    }

    /// Index of the row bound to the topmost mark under `p`.
    pub fn datum_index_at(&self, p: Point) -> Option<usize> {
        let node = self.surface.hit_test(p)?;
        self.surface.datum_of(node)
    }

    /// Shows the tooltip for the mark under `p`.
    pub fn pointer_over(&mut self, p: Point) {
        let Some(datum) = self
            .datum_index_at(p)
            .and_then(|i| self.data.get(i))
            .cloned()
        else {
            return;
        };
        self.tooltip.on_mouse_over(p, &datum);
    }

    /// Moves the tooltip with the pointer.
    pub fn pointer_move(&mut self, p: Point) {
        let datum = self
            .datum_index_at(p)
            .and_then(|i| self.data.get(i))
            .cloned();
        self.tooltip.on_mouse_move(p, datum.as_ref());
    }

    /// Hides the tooltip.
    pub fn pointer_leave(&mut self) {
        self.tooltip.on_mouse_leave(&mut self.surface);
    }
}

/// The outer shape shared by every chart.
pub trait Chart {
    /// What one render consumes.
    type Data: ?Sized;

    /// Shared state.
    fn base(&self) -> &ChartBase;

    /// Shared state, mutably.
    fn base_mut(&mut self) -> &mut ChartBase;

    /// Clears the surface and draws `data`.
    fn render(&mut self, data: &Self::Data);

    /// The drawing surface.
    fn surface(&self) -> &Surface {
        &self.base().surface
    }

    /// The tooltip controller.
    fn tooltip(&self) -> &Tooltip {
        &self.base().tooltip
    }

    /// Pointer entered a mark.
    fn pointer_over(&mut self, p: Point) {
        self.base_mut().pointer_over(p);
    }

    /// Pointer moved.
    fn pointer_move(&mut self, p: Point) {
        self.base_mut().pointer_move(p);
    }

    /// Pointer left the chart.
    fn pointer_leave(&mut self) {
        self.base_mut().pointer_leave();
    }

    /// The settled SVG document.
    fn to_svg(&self) -> String {
        self.surface().to_svg()
    }
}

/// Charts whose x range follows a zoom transform.
pub trait Zoomable: Chart {
    /// The gesture state; `None` while zooming is disabled.
    fn zoom_behavior(&mut self) -> Option<&mut ZoomBehavior>;

    /// Redraws axes and marks for `transform` without touching the rest of the chart state.
    fn apply_zoom(&mut self, transform: ZoomTransform);

    /// Wheel gesture: scales by `factor` around `anchor`.
    fn zoom_by(&mut self, factor: f64, anchor: Point) {
        if let Some(t) = self.zoom_behavior().map(|z| z.scale_by(factor, anchor)) {
            self.apply_zoom(t);
        }
    }

    /// Drag gesture: pans by `(dx, dy)`.
    fn pan_by(&mut self, dx: f64, dy: f64) {
        if let Some(t) = self.zoom_behavior().map(|z| z.translate_by(dx, dy)) {
            self.apply_zoom(t);
        }
    }

    /// Programmatic zoom, clamped to the extents.
    fn zoom_to(&mut self, transform: ZoomTransform) {
        if let Some(t) = self.zoom_behavior().map(|z| z.transform_to(transform)) {
            self.apply_zoom(t);
        }
    }
}

/// A transition from `from` under `drawing`, or `None` when drawing is off.
///
/// Free-standing so marks can be built while the surface is borrowed.
pub(crate) fn animate(drawing: Option<Drawing>, from: TransitionFrom, delay: f64) -> Option<Transition> {
    let drawing = drawing?;
    Some(Transition::new(drawing.duration.max(0.0), from).with_delay(delay.max(0.0)))
}

/// Gauge values that are not finite numbers read as zero.
pub(crate) fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

/// A zoom behavior over the axes area of `frame`, if the props enable zooming.
pub(crate) fn zoom_behavior_for(props: &ChartProps, frame: &Frame) -> Option<ZoomBehavior> {
    let zooming = props.zooming.filter(|z| z.enabled)?;
    let extent = Rect::new(
        frame.margin.left,
        frame.margin.top,
        frame.size.width,
        frame.size.height,
    );
    Some(ZoomBehavior::new(extent).with_scale_extent(zooming.min, zooming.max))
}

/// Domain over several value axes sharing one scale.
///
/// The lower bound is the smallest explicit `start`, otherwise the smallest value in the data
/// (or zero when every value is positive and `zero_based` is set). The upper bound is the
/// largest explicit `end`, otherwise the largest value. Empty data gives `[0, 1]`.
pub(crate) fn shared_domain<'a>(
    axes: impl IntoIterator<Item = &'a AxisConfig> + Clone,
    data: &[Record],
    zero_based: bool,
) -> (f64, f64) {
    let data_extent = extent(
        axes.clone()
            .into_iter()
            .flat_map(|a| data.iter().filter_map(move |r| a.value(r))),
    );
    let start = extent(axes.clone().into_iter().filter_map(|a| a.start)).map(|e| e.0);
    let end = extent(axes.into_iter().filter_map(|a| a.end)).map(|e| e.1);
    let lo = start.unwrap_or_else(|| match data_extent {
        Some((min, _)) if zero_based && min > 0.0 => 0.0,
        Some((min, _)) => min,
        None => 0.0,
    });
    let hi = end.unwrap_or_else(|| data_extent.map_or(lo.max(0.0) + 1.0, |e| e.1));
    (lo, hi)
}

/// Distinct category names of `axis` across `data`, in first-appearance order.
pub(crate) fn categories(axis: &AxisConfig, data: &[Record]) -> Vec<String> {
    data.iter()
        .filter_map(|r| axis.category(r))
        .collect::<IndexSet<String>>()
        .into_iter()
        .collect()
}

/// Index of the record whose pixel x (from `px`) is closest to `x`.
pub(crate) fn nearest_by_x(data: &[Record], x: f64, px: impl Fn(&Record) -> Option<f64>) -> Option<usize> {
    data.iter()
        .enumerate()
        .filter_map(|(i, r)| px(r).map(|p| (i, (p - x).abs())))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

/// Tooltip content of the form `category <br/> key: value<br/>key: value`.
pub(crate) fn listing_html(head_key: String, keys: Vec<String>) -> HtmlFn {
    Arc::new(move |d: &Record| {
        let rows = keys
            .iter()
            .map(|k| format!("{k}: {}", text_at(d, k).unwrap_or_default()))
            .collect::<Vec<_>>()
            .join("<br/>");
        format!("{} <br/> {rows}", text_at(d, &head_key).unwrap_or_default())
    })
}

/// Joins the captions (or keys) of several axes with `", "`.
pub(crate) fn joined_label<'a>(axes: impl IntoIterator<Item = &'a AxisConfig>) -> String {
    axes.into_iter()
        .map(|a| a.label().unwrap_or(&a.key).to_string())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Joins space-separated classes, skipping empty parts.
pub(crate) fn classes(parts: &[&str]) -> String {
    parts
        .iter()
        .flat_map(|p| p.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Appends a clip rectangle under `parent` and returns its dom id.
pub(crate) fn clip_rect(surface: &mut Surface, parent: NodeId, chart_id: &str, rect: Rect) -> String {
    let dom_id = format!("{chart_id}-clip");
    surface
        .append(parent, Element::ClipRect(rect))
        .with_dom_id(dom_id.clone());
    dom_id
}

/// A horizontal or vertical reference line.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReferenceLine {
    /// Vertical line at this x value (a number, or a time string on time axes).
    pub x: Option<Value>,
    /// Horizontal line at this value on the (left) value axis.
    #[serde(alias = "y")]
    pub y_left: Option<f64>,
    /// Horizontal line at this value on the right value axis.
    pub y_right: Option<f64>,
    /// Class hook.
    pub class_name: Option<String>,
    /// Caption the line with its value.
    pub show_text: bool,
}

impl ReferenceLine {
    /// A horizontal line on the value axis.
    pub fn horizontal(y: f64) -> Self {
        Self {
            y_left: Some(y),
            ..Self::default()
        }
    }

    /// A vertical line at `x`.
    pub fn vertical(x: impl Into<Value>) -> Self {
        Self {
            x: Some(x.into()),
            ..Self::default()
        }
    }

    /// Sets the class hook.
    pub fn with_class_name(mut self, class: impl Into<String>) -> Self {
        self.class_name = Some(class.into());
        self
    }

    /// Captions the line.
    pub fn with_text(mut self) -> Self {
        self.show_text = true;
        self
    }

    pub(crate) fn class(&self) -> String {
        classes(&[self.class_name.as_deref().unwrap_or(""), "reference-line"])
    }
}

/// Draws a light horizontal reference line at pixel `y` from `x0` to `x1`.
pub(crate) fn draw_horizontal_reference(
    surface: &mut Surface,
    parent: NodeId,
    line: &ReferenceLine,
    y: f64,
    (x0, x1): (f64, f64),
    clip: Option<&str>,
    caption: Option<String>,
) {
    let mut node = surface
        .append(parent, Element::line((x0, y), (x1, y)))
        .with_class(classes(&["stroke-current", &line.class()]))
        .with_stroke(peniko::Color::from_rgb8(0xdd, 0xdd, 0xdd));
    if let Some(clip) = clip {
        node = node.with_clip(clip);
    }
    node.id();
    if let Some(text) = caption.filter(|_| line.show_text) {
        surface
            .append(
                parent,
                Element::Text(TextElement::new((x0 + 4.0, y - 4.0), text).with_font_size(FontSize::Em(0.7))),
            )
            .with_class(classes(&["fill-current", &line.class()]))
            .with_fill(Paint::CurrentColor);
    }
}

/// Draws a vertical reference line at pixel `x` from `y0` to `y1`.
pub(crate) fn draw_vertical_reference(
    surface: &mut Surface,
    parent: NodeId,
    line: &ReferenceLine,
    x: f64,
    (y0, y1): (f64, f64),
    clip: Option<&str>,
) {
    let mut node = surface
        .append(parent, Element::line((x, y0), (x, y1)))
        .with_class(line.class())
        .with_stroke(Paint::CurrentColor);
    if let Some(clip) = clip {
        node = node.with_clip(clip);
    }
    node.id();
}

#[cfg(test)]
mod tests {
    use charta_core::record;
    use serde_json::json;

    use super::*;

    #[test]
    fn props_reject_empty_surfaces() {
        assert!(ChartProps::new("c").with_size(0.0, 10.0).validate().is_err());
        assert!(ChartProps::new("c").validate().is_ok());
    }

    #[test]
    fn props_deserialize_from_camel_case() {
        let props = ChartProps::from_json(
            r#"{"id":"sales","size":{"width":300,"height":200},"drawing":{"duration":500},"zooming":{"enabled":true}}"#,
        );
        let props = props.unwrap_or_default();
        assert_eq!(props.id, "sales");
        assert_eq!(props.drawing.map(|d| d.duration), Some(500.0));
        assert!(props.zoom_enabled());
    }

    #[test]
    fn shared_domain_prefers_explicit_bounds() {
        let data = vec![record([("a", json!(5)), ("b", json!(-2))])];
        let a = AxisConfig::new("a").with_start(-10.0);
        let b = AxisConfig::new("b").with_end(20.0);
        assert_eq!(shared_domain([&a, &b], &data, true), (-10.0, 20.0));
    }

    #[test]
    fn shared_domain_starts_at_zero_for_positive_bars() {
        let data = vec![record([("a", json!(5))]), record([("a", json!(8))])];
        let a = AxisConfig::new("a");
        assert_eq!(shared_domain([&a], &data, true), (0.0, 8.0));
        assert_eq!(shared_domain([&a], &data, false), (5.0, 8.0));
        assert_eq!(shared_domain([&a], &[], true), (0.0, 1.0));
    }

    #[test]
    fn labels_fall_back_to_keys() {
        let a = AxisConfig::new("a").with_label("Alpha");
        let b = AxisConfig::new("b");
        assert_eq!(joined_label([&a, &b]), "Alpha, b");
    }

    #[test]
    fn begin_clears_previous_marks() {
        let mut base = ChartBase::new(ChartProps::new("c"), None, None, "chart");
        let g = base.begin(&[]);
        base.surface.append(g, Element::Group).with_class("mark");
        base.begin(&[]);
        assert!(base.surface().select_class("mark").is_empty());
    }

    #[test]
    fn set_id_rekeys_surface_and_tooltip() {
        let mut base = ChartBase::new(
            ChartProps::new("a"),
            Some(TooltipConfig::new()),
            None,
            "chart",
        );
        base.set_id("b");
        assert_eq!(base.surface().id(), "b");
        assert_eq!(base.tooltip().id(), "b");
    }
}
