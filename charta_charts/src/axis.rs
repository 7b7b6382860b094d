// Copyright 2026 the Charta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The axis renderer.
//!
//! [`draw_axis`] anchors an axis group to one edge of the chart, draws the domain line and
//! ticks for a scale, bridges configured padding with connector lines, and adds the caption.
//! It returns the group handle and an [`AxisGenerator`] so zooming charts can redraw the
//! ticks against a rescaled range without rebuilding the configuration.

use kurbo::BezPath;
use serde::{Deserialize, Serialize};

use charta_core::{Element, FontSize, NodeId, Paint, Surface, TextAnchor, TextElement, Transform};

use crate::axis_config::{AxisConfig, AxisLocation};
use crate::layout::{Margin, Padding, Size};
use crate::scale::AxisScale;

/// Whether an axis runs along x or y.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// An x axis.
    Horizontal,
    /// A y axis.
    Vertical,
}

/// Axis orientation, matching d3's `axisTop` .. `axisRight`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AxisOrient {
    /// A horizontal axis with ticks pointing up.
    Top,
    /// A horizontal axis with ticks pointing down.
    Bottom,
    /// A vertical axis with ticks pointing left.
    Left,
    /// A vertical axis with ticks pointing right.
    Right,
}

impl AxisOrient {
    /// Resolves the orient for an orientation and an optional configured edge.
    ///
    /// Edges that do not belong to the orientation fall back to bottom or left.
    pub fn resolve(orientation: Orientation, location: Option<AxisLocation>) -> Self {
        match (orientation, location) {
            (Orientation::Horizontal, Some(AxisLocation::Top)) => Self::Top,
            (Orientation::Horizontal, _) => Self::Bottom,
            (Orientation::Vertical, Some(AxisLocation::Right)) => Self::Right,
            (Orientation::Vertical, _) => Self::Left,
        }
    }

    fn is_horizontal(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }

    /// `+1` for ticks pointing down or right, `-1` otherwise.
    fn k(self) -> f64 {
        match self {
            Self::Top | Self::Left => -1.0,
            Self::Bottom | Self::Right => 1.0,
        }
    }
}

/// Layout inputs for [`draw_axis`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AxisOptions {
    /// Full chart size.
    pub dimensions: Size,
    /// Chart margin.
    pub margin: Margin,
    /// Chart padding; non-zero sides along the axis get connector lines.
    pub padding: Padding,
    /// Axis orientation.
    pub orientation: Option<Orientation>,
    /// Caption override; wins over the configured label.
    pub label_text: Option<String>,
    /// Caption y position override.
    pub label_offset: Option<f64>,
    /// Group class override.
    pub class_name: Option<String>,
}

impl AxisOptions {
    /// Options for an axis of `orientation` on a chart of the given box.
    pub fn new(orientation: Orientation, dimensions: Size, margin: Margin, padding: Padding) -> Self {
        Self {
            dimensions,
            margin,
            padding,
            orientation: Some(orientation),
            ..Self::default()
        }
    }

    /// Overrides the caption.
    pub fn with_label_text(mut self, text: Option<String>) -> Self {
        self.label_text = text;
        self
    }

    /// Overrides the caption y position.
    pub fn with_label_offset(mut self, offset: f64) -> Self {
        self.label_offset = Some(offset);
        self
    }

    /// Overrides the group class.
    pub fn with_class_name(mut self, class: impl Into<String>) -> Self {
        self.class_name = Some(class.into());
        self
    }
}

/// Tick and domain-line generator for one axis orient.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisGenerator {
    /// Orient the ticks are drawn for.
    pub orient: AxisOrient,
    /// Tick-count hint.
    pub tick_count: usize,
    /// Length of tick lines.
    pub tick_size_inner: f64,
    /// Length of the domain line end caps.
    pub tick_size_outer: f64,
    /// Gap between the tick line and its label.
    pub tick_padding: f64,
}

impl AxisGenerator {
    /// A generator with d3's default tick sizes.
    pub fn new(orient: AxisOrient, tick_count: usize) -> Self {
        Self {
            orient,
            tick_count,
            tick_size_inner: 6.0,
            tick_size_outer: 6.0,
            tick_padding: 3.0,
        }
    }

    /// Replaces the domain line and ticks inside `group` with ones drawn for `scale`.
    ///
    /// Other children of the group (caption, padding connectors) are left alone.
    pub fn render(&self, surface: &mut Surface, group: NodeId, scale: &AxisScale) {
        let stale: Vec<NodeId> = surface
            .children(group)
            .iter()
            .copied()
            .filter(|id| {
                surface
                    .get(*id)
                    .is_some_and(|n| n.attrs.has_class("domain") || n.attrs.has_class("tick"))
            })
            .collect();
        for id in stale {
            surface.remove(id);
        }

        let k = self.orient.k();
        let (r0, r1) = scale.range();
        let outer = k * self.tick_size_outer;
        let mut domain = BezPath::new();
        if self.orient.is_horizontal() {
            domain.move_to((r0, outer));
            domain.line_to((r0, 0.0));
            domain.line_to((r1, 0.0));
            domain.line_to((r1, outer));
        } else {
            domain.move_to((outer, r0));
            domain.line_to((0.0, r0));
            domain.line_to((0.0, r1));
            domain.line_to((outer, r1));
        }
        surface
            .append(group, Element::Path(domain))
            .with_class("domain")
            .with_stroke(Paint::CurrentColor)
            .with_fill(Paint::None);

        let spacing = self.tick_size_inner.max(0.0) + self.tick_padding;
        let inner = k * self.tick_size_inner;
        for tick in scale.ticks(self.tick_count) {
            let (transform, line_end, text) = match self.orient {
                AxisOrient::Bottom => (
                    Transform::translate(tick.position, 0.0),
                    (0.0, inner),
                    TextElement::new((0.0, spacing + 7.1), tick.label).with_anchor(TextAnchor::Middle),
                ),
                AxisOrient::Top => (
                    Transform::translate(tick.position, 0.0),
                    (0.0, inner),
                    TextElement::new((0.0, -spacing), tick.label).with_anchor(TextAnchor::Middle),
                ),
                AxisOrient::Left => (
                    Transform::translate(0.0, tick.position),
                    (inner, 0.0),
                    TextElement::new((-spacing, 3.2), tick.label).with_anchor(TextAnchor::End),
                ),
                AxisOrient::Right => (
                    Transform::translate(0.0, tick.position),
                    (inner, 0.0),
                    TextElement::new((spacing, 3.2), tick.label).with_anchor(TextAnchor::Start),
                ),
            };
            let g = surface
                .append(group, Element::Group)
                .with_class("tick")
                .with_transform(transform)
                .id();
            surface
                .append(g, Element::line((0.0, 0.0), line_end))
                .with_stroke(Paint::CurrentColor);
            surface
                .append(g, Element::Text(text.with_font_size(FontSize::Px(10.0))))
                .with_fill(Paint::CurrentColor);
        }
    }
}

/// An axis that has been drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawnAxis {
    /// The axis group.
    pub group: NodeId,
    /// The generator that drew its ticks.
    pub generator: AxisGenerator,
}

impl DrawnAxis {
    /// Redraws the ticks for a rescaled `scale`.
    pub fn redraw(&self, surface: &mut Surface, scale: &AxisScale) {
        self.generator.render(surface, self.group, scale);
    }
}

/// Draws an axis for `scale` into `parent`.
///
/// The group is translated to its anchor edge:
/// - horizontal bottom (default): `(0, height - margin.bottom)`
/// - horizontal top: `(0, margin.top)`
/// - vertical left (default): `(margin.left, 0)`
/// - vertical right: `(width - margin.right, 0)`
///
/// The caption sits at `(width / 2, ±30)` on x axes and `(0, margin.top - 15)` on y axes
/// unless [`AxisOptions::label_offset`] overrides the y position.
pub fn draw_axis(
    surface: &mut Surface,
    parent: NodeId,
    scale: &AxisScale,
    config: &AxisConfig,
    options: &AxisOptions,
) -> DrawnAxis {
    let orientation = options.orientation.unwrap_or(Orientation::Horizontal);
    let orient = AxisOrient::resolve(orientation, config.location());
    let Size { width, height } = options.dimensions;
    let m = options.margin;
    let p = options.padding;

    let (transform, label_x, default_label_y) = match orient {
        AxisOrient::Top => (Transform::translate(0.0, m.top), width / 2.0, -30.0),
        AxisOrient::Bottom => (Transform::translate(0.0, height - m.bottom), width / 2.0, 30.0),
        AxisOrient::Right => (Transform::translate(width - m.right, 0.0), 0.0, m.top - 15.0),
        AxisOrient::Left => (Transform::translate(m.left, 0.0), 0.0, m.top - 15.0),
    };
    let label_y = options.label_offset.unwrap_or(default_label_y);

    let class = options.class_name.clone().unwrap_or_else(|| {
        if orientation == Orientation::Horizontal {
            "axis axis--x".to_string()
        } else {
            "axis axis--y".to_string()
        }
    });
    let test_id = if orientation == Orientation::Horizontal {
        "x-axis"
    } else {
        "y-axis"
    };

    let group = surface
        .append(parent, Element::Group)
        .with_class(class)
        .with_test_id(test_id)
        .with_transform(transform)
        .id();

    let generator = AxisGenerator::new(orient, config.tick_count());
    generator.render(surface, group, scale);

    let mut connectors = Vec::new();
    if orientation == Orientation::Horizontal {
        if p.left > 0.0 {
            connectors.push(((m.left, 0.0), (m.left + p.left, 0.0)));
        }
        if p.right > 0.0 {
            connectors.push(((width - m.right - p.right, 0.0), (width - m.right, 0.0)));
        }
    } else {
        if p.bottom > 0.0 {
            connectors.push(((0.0, height - m.bottom - p.bottom), (0.0, height - m.bottom)));
        }
        if p.top > 0.0 {
            connectors.push(((0.0, m.top), (0.0, m.top + p.top)));
        }
    }
    for (a, b) in connectors {
        surface
            .append(group, Element::line(a, b))
            .with_class("padding-line")
            .with_stroke(Paint::CurrentColor);
    }

    let label = options
        .label_text
        .as_deref()
        .or_else(|| config.label())
        .filter(|l| !l.is_empty());
    if let Some(label) = label {
        surface
            .append(
                group,
                Element::Text(
                    TextElement::new((label_x, label_y), label)
                        .with_anchor(TextAnchor::Middle)
                        .with_font_size(FontSize::Em(1.1)),
                ),
            )
            .with_class("axis-label")
            .with_fill(Paint::CurrentColor);
    }

    tracing::trace!(?orient, test_id, "axis drawn");
    DrawnAxis { group, generator }
}

#[cfg(test)]
mod tests {
    use charta_core::Element;

    use super::*;
    use crate::scale::{ScaleBand, ScaleLinear};

    fn options(orientation: Orientation) -> AxisOptions {
        AxisOptions::new(
            orientation,
            Size::new(400.0, 300.0),
            Margin::new(40.0, 20.0, 40.0, 40.0),
            Padding::default(),
        )
    }

    fn translate_of(surface: &Surface, id: NodeId) -> (f64, f64) {
        let t = surface.get(id).map(|n| n.attrs.transform.translate);
        t.map(|v| (v.x, v.y)).unwrap_or((f64::NAN, f64::NAN))
    }

    #[test]
    fn default_edges_are_bottom_and_left() {
        let mut s = Surface::new("c", 400.0, 300.0);
        let root = s.root();
        let scale = AxisScale::Linear(ScaleLinear::new((0.0, 10.0), (40.0, 380.0)));
        let x = draw_axis(&mut s, root, &scale, &AxisConfig::new("x"), &options(Orientation::Horizontal));
        let y = draw_axis(&mut s, root, &scale, &AxisConfig::new("y"), &options(Orientation::Vertical));
        assert_eq!(translate_of(&s, x.group), (0.0, 260.0));
        assert_eq!(translate_of(&s, y.group), (40.0, 0.0));
        assert_eq!(x.generator.orient, AxisOrient::Bottom);
        assert_eq!(s.find_by_test_id("x-axis"), Some(x.group));
        assert_eq!(s.find_by_test_id("y-axis"), Some(y.group));
    }

    #[test]
    fn opposite_edges_use_the_margin() {
        let mut s = Surface::new("c", 400.0, 300.0);
        let root = s.root();
        let scale = AxisScale::Linear(ScaleLinear::new((0.0, 10.0), (260.0, 40.0)));
        let top = AxisConfig::new("x").with_location(AxisLocation::Top);
        let right = AxisConfig::new("y").with_location(AxisLocation::Right);
        let x = draw_axis(&mut s, root, &scale, &top, &options(Orientation::Horizontal));
        let y = draw_axis(&mut s, root, &scale, &right, &options(Orientation::Vertical));
        assert_eq!(translate_of(&s, x.group), (0.0, 40.0));
        assert_eq!(translate_of(&s, y.group), (380.0, 0.0));
    }

    #[test]
    fn mismatched_location_falls_back() {
        assert_eq!(
            AxisOrient::resolve(Orientation::Vertical, Some(AxisLocation::Top)),
            AxisOrient::Left
        );
    }

    #[test]
    fn tick_count_follows_hint() {
        let mut s = Surface::new("c", 400.0, 300.0);
        let root = s.root();
        let scale = AxisScale::Linear(ScaleLinear::new((0.0, 100.0), (0.0, 300.0)));
        let cfg = AxisConfig::new("v").with_ticks(2);
        let axis = draw_axis(&mut s, root, &scale, &cfg, &options(Orientation::Vertical));
        let ticks = s
            .children(axis.group)
            .iter()
            .filter(|id| s.get(**id).is_some_and(|n| n.attrs.has_class("tick")))
            .count();
        assert_eq!(ticks, 3, "0, 50, 100");
    }

    #[test]
    fn label_override_and_offset() {
        let mut s = Surface::new("c", 400.0, 300.0);
        let root = s.root();
        let scale = AxisScale::Band(ScaleBand::new(vec!["a".into()], (0.0, 100.0)));
        let cfg = AxisConfig::new("v").with_label("From config");
        let opts = options(Orientation::Horizontal)
            .with_label_text(Some("Override".into()))
            .with_label_offset(12.0);
        draw_axis(&mut s, root, &scale, &cfg, &opts);
        let label = s.select_class("axis-label");
        let Some(Element::Text(text)) = label.first().and_then(|id| s.get(*id)).map(|n| &n.element)
        else {
            panic!("label missing");
        };
        assert_eq!(text.text, "Override");
        assert_eq!((text.origin.x, text.origin.y), (200.0, 12.0));
    }

    #[test]
    fn padding_draws_connectors() {
        let mut s = Surface::new("c", 400.0, 300.0);
        let root = s.root();
        let scale = AxisScale::Linear(ScaleLinear::new((0.0, 1.0), (50.0, 370.0)));
        let mut opts = options(Orientation::Horizontal);
        opts.padding = Padding::new(0.0, 10.0, 0.0, 10.0);
        draw_axis(&mut s, root, &scale, &AxisConfig::new("x"), &opts);
        assert_eq!(s.select_class("padding-line").len(), 2);
    }

    #[test]
    fn redraw_replaces_ticks_and_keeps_label() {
        let mut s = Surface::new("c", 400.0, 300.0);
        let root = s.root();
        let scale = ScaleLinear::new((0.0, 10.0), (0.0, 100.0));
        let cfg = AxisConfig::new("x").with_label("x");
        let axis = draw_axis(&mut s, root, &scale.into(), &cfg, &options(Orientation::Horizontal));
        let before = s.select_class("tick").len();
        axis.redraw(&mut s, &scale.rescale_range(|r| r * 2.0).into());
        assert_eq!(s.select_class("tick").len(), before);
        assert_eq!(s.select_class("domain").len(), 1);
        assert_eq!(s.select_class("axis-label").len(), 1);
    }
}
