// Copyright 2026 the Charta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! SVG serialization for [`Surface`].

use core::fmt::Write as _;

use peniko::Brush;

use crate::element::{Element, FontSize, Transform};
use crate::node::{Attrs, NodeId, Paint};
use crate::surface::{Frame, Surface};

impl Surface {
    /// Serializes the end state of every node.
    pub fn to_svg(&self) -> String {
        self.to_svg_at(f64::INFINITY)
    }

    /// Serializes the surface as it looks `elapsed_ms` after the last render.
    pub fn to_svg_at(&self, elapsed_ms: f64) -> String {
        let mut out = String::new();
        let _ = write!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" id="{}" width="{}" height="{}" viewBox="0 0 {} {}""#,
            escape_xml(self.id()),
            num(self.width()),
            num(self.height()),
            num(self.width()),
            num(self.height()),
        );
        if !self.class().is_empty() {
            let _ = write!(out, r#" class="{}""#, escape_xml(self.class()));
        }
        if let Some(test_id) = self.test_id() {
            let _ = write!(out, r#" data-testid="{}""#, escape_xml(test_id));
        }
        out.push_str(">\n");
        for child in self.children(self.root()) {
            self.write_node(&mut out, *child, elapsed_ms, 1);
        }
        out.push_str("</svg>\n");
        out
    }

    fn write_node(&self, out: &mut String, id: NodeId, elapsed_ms: f64, depth: usize) {
        let (Some(node), Some(frame)) = (self.get(id), self.sample(id, elapsed_ms)) else {
            return;
        };
        let indent = "  ".repeat(depth);
        out.push_str(&indent);
        let attrs = &node.attrs;
        match &frame.element {
            Element::Group => {
                out.push_str("<g");
                write_attrs(out, attrs, &frame);
                if node.children().is_empty() {
                    out.push_str("/>\n");
                    return;
                }
                out.push_str(">\n");
                for child in node.children() {
                    self.write_node(out, *child, elapsed_ms, depth + 1);
                }
                out.push_str(&indent);
                out.push_str("</g>\n");
                return;
            }
            Element::ClipRect(rect) => {
                out.push_str("<clipPath");
                write_attrs(out, attrs, &frame);
                let _ = writeln!(
                    out,
                    r#"><rect x="{}" y="{}" width="{}" height="{}"/></clipPath>"#,
                    num(rect.x0),
                    num(rect.y0),
                    num(rect.width()),
                    num(rect.height()),
                );
                return;
            }
            Element::Rect { rect, rx } => {
                let _ = write!(
                    out,
                    r#"<rect x="{}" y="{}" width="{}" height="{}""#,
                    num(rect.x0),
                    num(rect.y0),
                    num(rect.width().abs()),
                    num(rect.height().abs()),
                );
                if *rx > 0.0 {
                    let _ = write!(out, r#" rx="{}""#, num(*rx));
                }
            }
            Element::Line(line) => {
                let _ = write!(
                    out,
                    r#"<line x1="{}" y1="{}" x2="{}" y2="{}""#,
                    num(line.p0.x),
                    num(line.p0.y),
                    num(line.p1.x),
                    num(line.p1.y),
                );
            }
            Element::Polygon(points) => {
                out.push_str(r#"<polygon points=""#);
                for (i, p) in points.iter().enumerate() {
                    if i > 0 {
                        out.push(' ');
                    }
                    let _ = write!(out, "{},{}", num(p.x), num(p.y));
                }
                out.push('"');
            }
            Element::Circle(circle) => {
                let _ = write!(
                    out,
                    r#"<circle cx="{}" cy="{}" r="{}""#,
                    num(circle.center.x),
                    num(circle.center.y),
                    num(circle.radius),
                );
            }
            Element::Path(_) | Element::Sector(_) | Element::Symbol(_) => {
                let d = frame
                    .element
                    .to_path(0.1)
                    .map(|p| p.to_svg())
                    .unwrap_or_default();
                let _ = write!(out, r#"<path d="{d}""#);
            }
            Element::Text(text) => {
                let _ = write!(
                    out,
                    r#"<text x="{}" y="{}" text-anchor="{}""#,
                    num(text.origin.x),
                    num(text.origin.y),
                    text.anchor.as_svg(),
                );
                match text.font_size {
                    Some(FontSize::Px(px)) => {
                        let _ = write!(out, r#" font-size="{}""#, num(px));
                    }
                    Some(FontSize::Em(em)) => {
                        let _ = write!(out, r#" style="font-size: {}em""#, num(em));
                    }
                    None => {}
                }
                write_attrs(out, attrs, &frame);
                let _ = writeln!(out, ">{}</text>", escape_xml(&text.text));
                return;
            }
        }
        write_attrs(out, attrs, &frame);
        out.push_str("/>\n");
    }
}

fn write_attrs(out: &mut String, attrs: &Attrs, frame: &Frame) {
    if let Some(dom_id) = &attrs.dom_id {
        let _ = write!(out, r#" id="{}""#, escape_xml(dom_id));
    }
    if !attrs.class.is_empty() {
        let _ = write!(out, r#" class="{}""#, escape_xml(&attrs.class));
    }
    if let Some(test_id) = &attrs.test_id {
        let _ = write!(out, r#" data-testid="{}""#, escape_xml(test_id));
    }
    if !frame.transform.is_identity() {
        let _ = write!(out, r#" transform="{}""#, transform_attr(&frame.transform));
    }
    if let Some(fill) = &attrs.fill {
        write_paint_attr(out, "fill", fill);
    }
    if let Some(stroke) = &attrs.stroke {
        write_paint_attr(out, "stroke", stroke);
    }
    if let Some(width) = attrs.stroke_width {
        let _ = write!(out, r#" stroke-width="{}""#, num(width));
    }
    if let Some(opacity) = frame.opacity {
        let _ = write!(out, r#" opacity="{}""#, num(opacity));
    }
    if let Some(revealed) = frame.reveal {
        // The dash trick needs the path length; approximate with a normalized length.
        let _ = write!(
            out,
            r#" pathLength="1" stroke-dasharray="{},1""#,
            num(revealed)
        );
    } else if let Some(dash) = &attrs.dash {
        let parts: Vec<String> = dash.iter().map(|d| num(*d)).collect();
        let _ = write!(out, r#" stroke-dasharray="{}""#, parts.join(","));
    }
    if let Some(clip) = &attrs.clip {
        let _ = write!(out, r#" clip-path="url(#{})""#, escape_xml(clip));
    }
}

fn transform_attr(t: &Transform) -> String {
    let mut out = String::new();
    if t.translate.x != 0.0 || t.translate.y != 0.0 {
        let _ = write!(out, "translate({},{})", num(t.translate.x), num(t.translate.y));
    }
    if t.rotate != 0.0 {
        if !out.is_empty() {
            out.push(' ');
        }
        let _ = write!(out, "rotate({})", num(t.rotate));
    }
    if let Some((sx, sy)) = t.scale {
        if !out.is_empty() {
            out.push(' ');
        }
        let _ = write!(out, "scale({},{})", num(sx), num(sy));
    }
    out
}

fn svg_paint(brush: &Brush) -> (String, Option<f64>) {
    match brush {
        Brush::Solid(color) => {
            let rgba = color.to_rgba8();
            let fill = format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b);
            let fill_opacity = if rgba.a == 255 {
                None
            } else {
                Some(f64::from(rgba.a) / 255.0)
            };
            (fill, fill_opacity)
        }
        _ => ("none".to_string(), None),
    }
}

fn write_paint_attr(out: &mut String, name: &str, paint: &Paint) {
    match paint {
        Paint::None => {
            let _ = write!(out, r#" {name}="none""#);
        }
        Paint::CurrentColor => {
            let _ = write!(out, r#" {name}="currentColor""#);
        }
        Paint::Brush(brush) => {
            let (value, opacity) = svg_paint(brush);
            let _ = write!(out, r#" {name}="{value}""#);
            if let Some(o) = opacity {
                let _ = write!(out, r#" {name}-opacity="{}""#, num(o));
            }
        }
    }
}

/// Formats a coordinate with at most three decimals and no trailing zeros.
fn num(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let rounded = (v * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    format!("{rounded}")
}

pub(crate) fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use kurbo::Rect;
    use peniko::color::palette::css;

    use super::*;
    use crate::transition::{Ease, Transition, TransitionFrom};

    #[test]
    fn svg_carries_ids_classes_and_test_ids() {
        let mut surface = Surface::new("sales", 200.0, 100.0);
        let root = surface.root();
        surface
            .append(root, Element::Group)
            .with_class("axis axis--x")
            .with_test_id("x-axis")
            .with_transform(Transform::translate(0.0, 60.0));
        let svg = surface.to_svg();
        assert!(svg.contains(r#"id="sales""#), "{svg}");
        assert!(svg.contains(r#"class="axis axis--x""#), "{svg}");
        assert!(svg.contains(r#"data-testid="x-axis""#), "{svg}");
        assert!(svg.contains(r#"transform="translate(0,60)""#), "{svg}");
    }

    #[test]
    fn mid_transition_frame_differs_from_end_state() {
        let mut surface = Surface::new("bars", 100.0, 100.0);
        let root = surface.root();
        surface
            .append(root, Element::rect(Rect::new(0.0, 0.0, 80.0, 10.0)))
            .with_fill(css::STEEL_BLUE)
            .with_transition(Some(
                Transition::new(
                    100.0,
                    TransitionFrom::Element(Element::rect(Rect::new(0.0, 0.0, 0.0, 10.0))),
                )
                .with_ease(Ease::Linear),
            ));
        assert!(surface.to_svg().contains(r#"width="80""#), "end state");
        assert!(surface.to_svg_at(50.0).contains(r#"width="40""#), "half way");
    }

    #[test]
    fn text_is_escaped() {
        let mut surface = Surface::new("t", 10.0, 10.0);
        let root = surface.root();
        surface.append(root, Element::text((0.0, 0.0), "a < b & c"));
        assert!(surface.to_svg().contains("a &lt; b &amp; c"), "escaped text");
    }

    #[test]
    fn numbers_are_trimmed() {
        assert_eq!(num(1.0), "1");
        assert_eq!(num(0.12345), "0.123");
        assert_eq!(num(-0.0001), "0");
    }
}
