// Copyright 2026 the Charta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Line and area path generation.

use kurbo::{BezPath, Point};
use serde::{Deserialize, Serialize};

/// Interpolation between consecutive points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Curve {
    /// Straight segments.
    #[default]
    #[serde(rename = "line")]
    Line,
    /// Horizontal-vertical steps switching at the midpoint.
    #[serde(rename = "step")]
    Step,
    /// Centripetal Catmull-Rom spline through every point.
    #[serde(rename = "rounded")]
    Rounded,
    /// Cubic bumps with horizontal tangents at every point.
    #[serde(rename = "bumpX")]
    BumpX,
}

impl Curve {
    /// Parses a curve name; unknown names give straight segments.
    pub fn from_name(name: &str) -> Self {
        match name {
            "step" => Self::Step,
            "rounded" => Self::Rounded,
            "bumpX" => Self::BumpX,
            _ => Self::Line,
        }
    }

    /// Builds an open path through `points`.
    pub fn line(self, points: &[Point]) -> BezPath {
        let mut path = BezPath::new();
        if let Some(first) = points.first() {
            path.move_to(*first);
            self.extend(&mut path, points);
        }
        path
    }

    /// Builds a closed band between `top` (drawn forward) and `bottom` (drawn backward).
    pub fn area(self, top: &[Point], bottom: &[Point]) -> BezPath {
        let mut path = self.line(top);
        if top.is_empty() {
            return path;
        }
        let reversed: Vec<Point> = bottom.iter().rev().copied().collect();
        if let Some(first) = reversed.first() {
            path.line_to(*first);
            self.extend(&mut path, &reversed);
        }
        path.close_path();
        path
    }

    /// Appends segments from `points[0]` (already the current point) through the rest.
    fn extend(self, path: &mut BezPath, points: &[Point]) {
        match self {
            Self::Line => {
                for p in &points[1..] {
                    path.line_to(*p);
                }
            }
            Self::Step => {
                for w in points.windows(2) {
                    let mid = (w[0].x + w[1].x) / 2.0;
                    path.line_to((mid, w[0].y));
                    path.line_to((mid, w[1].y));
                }
                if points.len() > 1
                    && let Some(last) = points.last()
                {
                    path.line_to(*last);
                }
            }
            Self::BumpX => {
                for w in points.windows(2) {
                    let mid = (w[0].x + w[1].x) / 2.0;
                    path.curve_to((mid, w[0].y), (mid, w[1].y), w[1].into());
                }
            }
            Self::Rounded => {
                if points.len() < 3 {
                    Self::Line.extend(path, points);
                    return;
                }
                for i in 0..points.len() - 1 {
                    let p1 = points[i];
                    let p2 = points[i + 1];
                    let p0 = if i == 0 { p1 } else { points[i - 1] };
                    let p3 = points.get(i + 2).copied().unwrap_or(p2);
                    let (c1, c2) = catmull_rom_controls(p0, p1, p2, p3);
                    path.curve_to(c1, c2, p2);
                }
            }
        }
    }
}

/// Bezier control points for the centripetal (alpha = 0.5) segment `p1 -> p2`.
fn catmull_rom_controls(p0: Point, p1: Point, p2: Point, p3: Point) -> (Point, Point) {
    const EPS: f64 = 1e-12;
    let l01_2a = (p1 - p0).hypot();
    let l12_2a = (p2 - p1).hypot();
    let l23_2a = (p3 - p2).hypot();
    let (l01_a, l12_a, l23_a) = (l01_2a.sqrt(), l12_2a.sqrt(), l23_2a.sqrt());

    let mut c1 = p1;
    if l01_a > EPS {
        let a = 2.0 * l01_2a + 3.0 * l01_a * l12_a + l12_2a;
        let n = 3.0 * l01_a * (l01_a + l12_a);
        c1 = Point::new(
            (p1.x * a - p0.x * l12_2a + p2.x * l01_2a) / n,
            (p1.y * a - p0.y * l12_2a + p2.y * l01_2a) / n,
        );
    }
    let mut c2 = p2;
    if l23_a > EPS {
        let b = 2.0 * l23_2a + 3.0 * l23_a * l12_a + l12_2a;
        let m = 3.0 * l23_a * (l23_a + l12_a);
        c2 = Point::new(
            (p2.x * b + p1.x * l23_2a - p3.x * l12_2a) / m,
            (p2.y * b + p1.y * l23_2a - p3.y * l12_2a) / m,
        );
    }
    (c1, c2)
}

#[cfg(test)]
mod tests {
    use kurbo::{PathEl, Shape};

    use super::*;

    fn pts() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(20.0, 0.0),
        ]
    }

    #[test]
    fn line_visits_every_point() {
        let path = Curve::Line.line(&pts());
        assert_eq!(path.elements().len(), 3);
    }

    #[test]
    fn step_switches_at_midpoints() {
        let path = Curve::Step.line(&pts());
        assert_eq!(path.elements()[1], PathEl::LineTo(Point::new(5.0, 0.0)));
        assert_eq!(path.elements()[2], PathEl::LineTo(Point::new(5.0, 10.0)));
        assert_eq!(path.elements().last(), Some(&PathEl::LineTo(Point::new(20.0, 0.0))));
    }

    #[test]
    fn rounded_passes_through_points() {
        let path = Curve::Rounded.line(&pts());
        let ends: Vec<Point> = path
            .elements()
            .iter()
            .filter_map(|el| match el {
                PathEl::CurveTo(_, _, p) => Some(*p),
                _ => None,
            })
            .collect();
        assert_eq!(ends, [Point::new(10.0, 10.0), Point::new(20.0, 0.0)]);
    }

    #[test]
    fn area_closes_over_baseline() {
        let top = pts();
        let bottom: Vec<Point> = top.iter().map(|p| Point::new(p.x, 0.0)).collect();
        let path = Curve::Line.area(&top, &bottom);
        assert_eq!(path.elements().last(), Some(&PathEl::ClosePath));
        assert!((path.area().abs() - 100.0).abs() < 1e-9, "triangle of base 20 and height 10");
    }

    #[test]
    fn empty_input_gives_empty_path() {
        assert!(Curve::BumpX.line(&[]).elements().is_empty());
    }
}
