// Copyright 2026 the Charta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Symbol glyphs for point-like marks.
//!
//! Sizes are areas in square pixels, so a circle and a square of the same
//! size cover roughly the same ink.

use core::f64::consts::{PI, TAU};

use kurbo::{BezPath, Circle, Shape};
use serde::{Deserialize, Serialize};

/// The supported symbol shapes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolShape {
    /// A circle.
    #[default]
    Circle,
    /// A plus sign with thick arms.
    Cross,
    /// A rhombus taller than it is wide.
    Diamond,
    /// An axis-aligned square.
    Square,
    /// A five-pointed star.
    Star,
    /// An upward-pointing triangle.
    Triangle,
    /// A three-armed "Y".
    Wye,
}

impl SymbolShape {
    /// Parses a shape name, returning `None` for unknown names (including `"none"`).
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "circle" => Self::Circle,
            "cross" => Self::Cross,
            "diamond" => Self::Diamond,
            "square" => Self::Square,
            "star" => Self::Star,
            "triangle" => Self::Triangle,
            "wye" => Self::Wye,
            _ => return None,
        })
    }

    /// Returns the outline of this symbol centered at the origin with the given area.
    pub fn path(self, size: f64) -> BezPath {
        let size = size.max(0.0);
        match self {
            Self::Circle => {
                let r = (size / PI).sqrt();
                Circle::new((0.0, 0.0), r).to_path(0.1)
            }
            Self::Cross => cross_path(size),
            Self::Diamond => diamond_path(size),
            Self::Square => {
                let w = size.sqrt();
                let h = 0.5 * w;
                polygon(&[(-h, -h), (h, -h), (h, h), (-h, h)])
            }
            Self::Star => star_path(size),
            Self::Triangle => triangle_path(size),
            Self::Wye => wye_path(size),
        }
    }
}

fn polygon(points: &[(f64, f64)]) -> BezPath {
    let mut path = BezPath::new();
    for (i, p) in points.iter().enumerate() {
        if i == 0 {
            path.move_to(*p);
        } else {
            path.line_to(*p);
        }
    }
    path.close_path();
    path
}

fn cross_path(size: f64) -> BezPath {
    let r = 0.5 * (size / 5.0).sqrt();
    polygon(&[
        (-3.0 * r, -r),
        (-r, -r),
        (-r, -3.0 * r),
        (r, -3.0 * r),
        (r, -r),
        (3.0 * r, -r),
        (3.0 * r, r),
        (r, r),
        (r, 3.0 * r),
        (-r, 3.0 * r),
        (-r, r),
        (-3.0 * r, r),
    ])
}

fn diamond_path(size: f64) -> BezPath {
    let tan30 = (1.0_f64 / 3.0).sqrt();
    let y = (size / (2.0 * tan30)).sqrt();
    let x = y * tan30;
    polygon(&[(0.0, -y), (x, 0.0), (0.0, y), (-x, 0.0)])
}

fn star_path(size: f64) -> BezPath {
    const KA: f64 = 0.890_813_091_529_285_2;
    let kr = (PI / 10.0).sin() / (7.0 * PI / 10.0).sin();
    let kx = (TAU / 10.0).sin() * kr;
    let ky = -(TAU / 10.0).cos() * kr;
    let r = (size * KA).sqrt();
    let x = kx * r;
    let y = ky * r;
    let mut points = vec![(0.0, -r), (x, y)];
    for i in 1..5 {
        let a = TAU * f64::from(i) / 5.0;
        let (s, c) = a.sin_cos();
        points.push((s * r, -c * r));
        points.push((c * x - s * y, s * x + c * y));
    }
    polygon(&points)
}

fn triangle_path(size: f64) -> BezPath {
    let sqrt3 = 3.0_f64.sqrt();
    let y = -(size / (sqrt3 * 3.0)).sqrt();
    polygon(&[(0.0, 2.0 * y), (-sqrt3 * y, -y), (sqrt3 * y, -y)])
}

fn wye_path(size: f64) -> BezPath {
    let c = -0.5;
    let s = 3.0_f64.sqrt() / 2.0;
    let k = 1.0 / 12.0_f64.sqrt();
    let a = (k / 2.0 + 1.0) * 3.0;
    let r = (size / a).sqrt();
    let (x0, y0) = (r / 2.0, r * k);
    let (x1, y1) = (x0, r * k + r);
    let (x2, y2) = (-x1, y1);
    polygon(&[
        (x0, y0),
        (x1, y1),
        (x2, y2),
        (c * x0 - s * y0, s * x0 + c * y0),
        (c * x1 - s * y1, s * x1 + c * y1),
        (c * x2 - s * y2, s * x2 + c * y2),
        (c * x0 + s * y0, c * y0 - s * x0),
        (c * x1 + s * y1, c * y1 - s * x1),
        (c * x2 + s * y2, c * y2 - s * x2),
    ])
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn square_area_matches_size() {
        let area = SymbolShape::Square.path(64.0).area().abs();
        assert_relative_eq!(area, 64.0, epsilon = 1e-9);
    }

    #[test]
    fn every_shape_has_roughly_the_requested_area() {
        for shape in [
            SymbolShape::Circle,
            SymbolShape::Cross,
            SymbolShape::Diamond,
            SymbolShape::Square,
            SymbolShape::Star,
            SymbolShape::Triangle,
            SymbolShape::Wye,
        ] {
            let area = shape.path(100.0).area().abs();
            assert!(
                (area - 100.0).abs() < 25.0,
                "{shape:?} area {area} far from 100"
            );
        }
    }

    #[test]
    fn unknown_names_are_none() {
        assert_eq!(SymbolShape::from_name("none"), None);
        assert_eq!(SymbolShape::from_name("wye"), Some(SymbolShape::Wye));
    }
}
