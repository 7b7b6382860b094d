// Copyright 2026 the Charta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drawable element kinds.
//!
//! Elements are stored in node-local coordinates; the owning node's
//! [`Transform`] places them on the surface.

use kurbo::{BezPath, Circle, Line, PathEl, Point, Rect, Shape, Vec2};

use crate::sector::Sector;
use crate::symbol::SymbolShape;

/// Horizontal text alignment, matching SVG `text-anchor`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextAnchor {
    /// Anchor at the start of the text.
    #[default]
    Start,
    /// Anchor at the middle of the text.
    Middle,
    /// Anchor at the end of the text.
    End,
}

impl TextAnchor {
    pub(crate) fn as_svg(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

/// Font size for text elements.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FontSize {
    /// Absolute size in pixels.
    Px(f64),
    /// Size relative to the inherited font size.
    Em(f64),
}

/// A text run anchored at a point.
#[derive(Clone, Debug, PartialEq)]
pub struct TextElement {
    /// Anchor point.
    pub origin: Point,
    /// Unshaped text content.
    pub text: String,
    /// Horizontal alignment around `origin`.
    pub anchor: TextAnchor,
    /// Optional font size override.
    pub font_size: Option<FontSize>,
}

impl TextElement {
    /// Creates a start-anchored text element.
    pub fn new(origin: impl Into<Point>, text: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            text: text.into(),
            anchor: TextAnchor::Start,
            font_size: None,
        }
    }

    /// Sets the text anchor.
    pub fn with_anchor(mut self, anchor: TextAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Sets the font size.
    pub fn with_font_size(mut self, size: FontSize) -> Self {
        self.font_size = Some(size);
        self
    }
}

/// A symbol centered on the node origin (position it with a translate transform).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SymbolElement {
    /// Symbol shape.
    pub shape: SymbolShape,
    /// Symbol area in square pixels.
    pub size: f64,
}

/// The geometry carried by a surface node.
#[derive(Clone, Debug, PartialEq)]
pub enum Element {
    /// A grouping node with no geometry of its own.
    Group,
    /// An axis-aligned rectangle with an optional corner radius.
    Rect {
        /// Rectangle bounds.
        rect: Rect,
        /// Corner radius.
        rx: f64,
    },
    /// A straight line segment.
    Line(Line),
    /// A closed polygon.
    Polygon(Vec<Point>),
    /// A circle.
    Circle(Circle),
    /// Free-form path.
    Path(BezPath),
    /// An annular sector.
    Sector(Sector),
    /// A symbol glyph.
    Symbol(SymbolElement),
    /// A text run.
    Text(TextElement),
    /// A clip rectangle, referenced by other nodes through its dom id.
    ClipRect(Rect),
}

impl Element {
    /// Convenience constructor for a square-cornered rectangle.
    pub fn rect(rect: Rect) -> Self {
        Self::Rect { rect, rx: 0.0 }
    }

    /// Convenience constructor for a line segment.
    pub fn line(p0: impl Into<Point>, p1: impl Into<Point>) -> Self {
        Self::Line(Line::new(p0, p1))
    }

    /// Convenience constructor for a symbol.
    pub fn symbol(shape: SymbolShape, size: f64) -> Self {
        Self::Symbol(SymbolElement { shape, size })
    }

    /// Convenience constructor for text.
    pub fn text(origin: impl Into<Point>, text: impl Into<String>) -> Self {
        Self::Text(TextElement::new(origin, text))
    }

    /// Returns the element outline as a path, if it has an area or a stroke.
    pub fn to_path(&self, tolerance: f64) -> Option<BezPath> {
        match self {
            Self::Group | Self::Text(_) | Self::ClipRect(_) => None,
            Self::Rect { rect, rx } => {
                if *rx > 0.0 {
                    Some(rect.to_rounded_rect(*rx).to_path(tolerance))
                } else {
                    Some(rect.to_path(tolerance))
                }
            }
            Self::Line(line) => Some(line.to_path(tolerance)),
            Self::Polygon(points) => Some(polygon_path(points)),
            Self::Circle(circle) => Some(circle.to_path(tolerance)),
            Self::Path(path) => Some(path.clone()),
            Self::Sector(sector) => Some(sector.to_path(tolerance)),
            Self::Symbol(symbol) => Some(symbol.shape.path(symbol.size)),
        }
    }

    /// Returns `true` when `point` (in element coordinates) hits this element.
    ///
    /// Lines are hit within `slop` pixels; filled shapes use the non-zero winding rule.
    pub fn contains(&self, point: Point, slop: f64) -> bool {
        match self {
            Self::Group | Self::Text(_) | Self::ClipRect(_) => false,
            Self::Rect { rect, .. } => rect.contains(point),
            Self::Circle(circle) => circle.contains(point),
            Self::Line(line) => {
                let v = line.p1 - line.p0;
                let len2 = v.hypot2();
                let t = if len2 == 0.0 {
                    0.0
                } else {
                    ((point - line.p0).dot(v) / len2).clamp(0.0, 1.0)
                };
                let nearest = line.p0 + v * t;
                (point - nearest).hypot() <= slop
            }
            _ => self
                .to_path(0.1)
                .is_some_and(|path| path.winding(point) != 0),
        }
    }

    /// Interpolates from `self` toward `to` at parameter `t` in `[0, 1]`.
    ///
    /// Returns `None` when the two elements are not interpolable (different kinds, or paths
    /// with different command structure); callers then snap to the end state.
    pub fn lerp(&self, to: &Self, t: f64) -> Option<Self> {
        Some(match (self, to) {
            (Self::Rect { rect: a, rx: ra }, Self::Rect { rect: b, rx: rb }) => Self::Rect {
                rect: Rect::new(
                    lerp(a.x0, b.x0, t),
                    lerp(a.y0, b.y0, t),
                    lerp(a.x1, b.x1, t),
                    lerp(a.y1, b.y1, t),
                ),
                rx: lerp(*ra, *rb, t),
            },
            (Self::Line(a), Self::Line(b)) => {
                Self::Line(Line::new(a.p0.lerp(b.p0, t), a.p1.lerp(b.p1, t)))
            }
            (Self::Polygon(a), Self::Polygon(b)) if a.len() == b.len() => {
                Self::Polygon(a.iter().zip(b).map(|(p, q)| p.lerp(*q, t)).collect())
            }
            (Self::Circle(a), Self::Circle(b)) => Self::Circle(Circle::new(
                a.center.lerp(b.center, t),
                lerp(a.radius, b.radius, t),
            )),
            (Self::Path(a), Self::Path(b)) => Self::Path(lerp_path(a, b, t)?),
            (Self::Sector(a), Self::Sector(b)) => Self::Sector(a.lerp(b, t)),
            (Self::Symbol(a), Self::Symbol(b)) => Self::Symbol(SymbolElement {
                shape: b.shape,
                size: lerp(a.size, b.size, t),
            }),
            (Self::Text(a), Self::Text(b)) => Self::Text(TextElement {
                origin: a.origin.lerp(b.origin, t),
                ..b.clone()
            }),
            _ => return None,
        })
    }
}

/// A translate/rotate/scale transform, serialized in that order.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Transform {
    /// Translation in parent coordinates.
    pub translate: Vec2,
    /// Clockwise rotation in degrees around the translated origin.
    pub rotate: f64,
    /// Optional non-uniform scale.
    pub scale: Option<(f64, f64)>,
}

impl Transform {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        translate: Vec2::ZERO,
        rotate: 0.0,
        scale: None,
    };

    /// A pure translation.
    pub fn translate(x: f64, y: f64) -> Self {
        Self {
            translate: Vec2::new(x, y),
            ..Self::IDENTITY
        }
    }

    /// Adds a rotation in degrees.
    pub fn with_rotate(mut self, degrees: f64) -> Self {
        self.rotate = degrees;
        self
    }

    /// Adds a scale.
    pub fn with_scale(mut self, sx: f64, sy: f64) -> Self {
        self.scale = Some((sx, sy));
        self
    }

    /// Returns `true` if this transform is the identity.
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Converts to a `kurbo::Affine`.
    pub fn to_affine(&self) -> kurbo::Affine {
        let mut affine = kurbo::Affine::translate(self.translate);
        if self.rotate != 0.0 {
            affine = affine * kurbo::Affine::rotate(self.rotate.to_radians());
        }
        if let Some((sx, sy)) = self.scale {
            affine = affine * kurbo::Affine::scale_non_uniform(sx, sy);
        }
        affine
    }

    /// Interpolates each component.
    pub fn lerp(&self, to: &Self, t: f64) -> Self {
        let scale = match (self.scale, to.scale) {
            (None, None) => None,
            (a, b) => {
                let (ax, ay) = a.unwrap_or((1.0, 1.0));
                let (bx, by) = b.unwrap_or((1.0, 1.0));
                Some((lerp(ax, bx, t), lerp(ay, by, t)))
            }
        };
        Self {
            translate: self.translate.lerp(to.translate, t),
            rotate: lerp(self.rotate, to.rotate, t),
            scale,
        }
    }
}

pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn polygon_path(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let mut iter = points.iter();
    if let Some(first) = iter.next() {
        path.move_to(*first);
        for p in iter {
            path.line_to(*p);
        }
        path.close_path();
    }
    path
}

fn lerp_path(a: &BezPath, b: &BezPath, t: f64) -> Option<BezPath> {
    let a = a.elements();
    let b = b.elements();
    if a.len() != b.len() {
        return None;
    }
    let mut out = BezPath::new();
    for (ea, eb) in a.iter().zip(b) {
        let el = match (ea, eb) {
            (PathEl::MoveTo(p), PathEl::MoveTo(q)) => PathEl::MoveTo(p.lerp(*q, t)),
            (PathEl::LineTo(p), PathEl::LineTo(q)) => PathEl::LineTo(p.lerp(*q, t)),
            (PathEl::QuadTo(p1, p2), PathEl::QuadTo(q1, q2)) => {
                PathEl::QuadTo(p1.lerp(*q1, t), p2.lerp(*q2, t))
            }
            (PathEl::CurveTo(p1, p2, p3), PathEl::CurveTo(q1, q2, q3)) => {
                PathEl::CurveTo(p1.lerp(*q1, t), p2.lerp(*q2, t), p3.lerp(*q3, t))
            }
            (PathEl::ClosePath, PathEl::ClosePath) => PathEl::ClosePath,
            _ => return None,
        };
        out.push(el);
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn rect_lerp_is_componentwise() {
        let a = Element::rect(Rect::new(0.0, 0.0, 0.0, 10.0));
        let b = Element::rect(Rect::new(0.0, 0.0, 100.0, 10.0));
        let Some(Element::Rect { rect, .. }) = a.lerp(&b, 0.25) else {
            panic!("expected a rect");
        };
        assert_relative_eq!(rect.x1, 25.0);
    }

    #[test]
    fn mismatched_kinds_do_not_interpolate() {
        let a = Element::rect(Rect::new(0.0, 0.0, 1.0, 1.0));
        let b = Element::line((0.0, 0.0), (1.0, 1.0));
        assert!(a.lerp(&b, 0.5).is_none(), "rect -> line has no interpolation");
    }

    #[test]
    fn line_hit_uses_slop() {
        let line = Element::line((0.0, 0.0), (10.0, 0.0));
        assert!(line.contains(Point::new(5.0, 2.0), 3.0), "within slop");
        assert!(!line.contains(Point::new(5.0, 4.0), 3.0), "outside slop");
    }

    #[test]
    fn transform_affine_applies_translate_then_rotate() {
        let t = Transform::translate(10.0, 0.0).with_rotate(90.0);
        let p = t.to_affine() * Point::new(1.0, 0.0);
        assert_relative_eq!(p.x, 10.0, epsilon = 1e-9);
        assert_relative_eq!(p.y, 1.0, epsilon = 1e-9);
    }
}
