// Copyright 2026 the Charta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Annular sectors (pie and donut slices, gauge arcs).
//!
//! Angles are in radians measured clockwise from twelve o'clock, the
//! convention pie layouts use. Conversion to `kurbo`'s x-axis based angles
//! happens only when the outline is built.

use core::f64::consts::FRAC_PI_2;

use kurbo::{Arc, BezPath, Point, Vec2};

use crate::element::lerp;

/// An annular sector centered on `center`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sector {
    /// Center point.
    pub center: Point,
    /// Inner radius (0 for a pie slice).
    pub inner_radius: f64,
    /// Outer radius.
    pub outer_radius: f64,
    /// Start angle.
    pub start_angle: f64,
    /// End angle.
    pub end_angle: f64,
    /// Angular padding split evenly between both edges.
    pub pad_angle: f64,
    /// Corner rounding radius.
    pub corner_radius: f64,
}

impl Sector {
    /// Creates a sector around the origin.
    pub fn new(inner_radius: f64, outer_radius: f64, start_angle: f64, end_angle: f64) -> Self {
        Self {
            center: Point::ORIGIN,
            inner_radius,
            outer_radius,
            start_angle,
            end_angle,
            pad_angle: 0.0,
            corner_radius: 0.0,
        }
    }

    /// Sets the pad angle.
    pub fn with_pad_angle(mut self, pad_angle: f64) -> Self {
        self.pad_angle = pad_angle.max(0.0);
        self
    }

    /// Sets the corner radius.
    pub fn with_corner_radius(mut self, corner_radius: f64) -> Self {
        self.corner_radius = corner_radius.max(0.0);
        self
    }

    /// Returns the swept angle.
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    /// Returns the midpoint of the sector's angular and radial extent.
    pub fn centroid(&self) -> Point {
        let r = 0.5 * (self.inner_radius + self.outer_radius);
        let a = 0.5 * (self.start_angle + self.end_angle);
        self.polar(r, a)
    }

    /// Interpolates every field.
    pub fn lerp(&self, to: &Self, t: f64) -> Self {
        Self {
            center: self.center.lerp(to.center, t),
            inner_radius: lerp(self.inner_radius, to.inner_radius, t),
            outer_radius: lerp(self.outer_radius, to.outer_radius, t),
            start_angle: lerp(self.start_angle, to.start_angle, t),
            end_angle: lerp(self.end_angle, to.end_angle, t),
            pad_angle: lerp(self.pad_angle, to.pad_angle, t),
            corner_radius: lerp(self.corner_radius, to.corner_radius, t),
        }
    }

    fn polar(&self, r: f64, a: f64) -> Point {
        self.center + Vec2::new(r * a.sin(), -r * a.cos())
    }

    /// Builds the sector outline.
    pub fn to_path(&self, tolerance: f64) -> BezPath {
        let mut path = BezPath::new();
        let r0 = self.inner_radius.max(0.0).min(self.outer_radius.max(0.0));
        let r1 = self.outer_radius.max(0.0);
        let (a0, a1) = if self.end_angle >= self.start_angle {
            (self.start_angle, self.end_angle)
        } else {
            (self.end_angle, self.start_angle)
        };
        if r1 <= 0.0 || a1 - a0 <= 0.0 {
            return path;
        }

        // Pad angles are applied at the pad radius, which keeps the gap width constant along
        // the slice edge.
        let half_pad = 0.5 * self.pad_angle;
        let pad_radius = (r0 * r0 + r1 * r1).sqrt();
        let pad_at = |r: f64| {
            if half_pad <= 0.0 || r <= 0.0 {
                0.0
            } else {
                (pad_radius / r * half_pad.sin()).clamp(-1.0, 1.0).asin()
            }
        };
        let (o0, o1) = shrink(a0, a1, pad_at(r1));
        let (i0, i1) = shrink(a0, a1, pad_at(r0));

        let corner = self
            .corner_radius
            .min(0.5 * (r1 - r0))
            .min(0.5 * r1 * (o1 - o0));
        if corner > 0.0 {
            self.rounded_outline(&mut path, r0, r1, (o0, o1), (i0, i1), corner, tolerance);
            return path;
        }

        path.move_to(self.polar(r1, o0));
        self.append_arc(&mut path, r1, o0, o1, tolerance);
        if r0 > 0.0 {
            path.line_to(self.polar(r0, i1));
            self.append_arc(&mut path, r0, i1, i0, tolerance);
        } else {
            path.line_to(self.center);
        }
        path.close_path();
        path
    }

    fn rounded_outline(
        &self,
        path: &mut BezPath,
        r0: f64,
        r1: f64,
        (o0, o1): (f64, f64),
        (i0, i1): (f64, f64),
        corner: f64,
        tolerance: f64,
    ) {
        let outer_step = corner / r1;
        path.move_to(self.polar(r1 - corner, o0));
        path.quad_to(self.polar(r1, o0), self.polar(r1, o0 + outer_step));
        self.append_arc(path, r1, o0 + outer_step, o1 - outer_step, tolerance);
        path.quad_to(self.polar(r1, o1), self.polar(r1 - corner, o1));
        if r0 > 0.0 {
            let inner_corner = corner.min(0.5 * r0 * (i1 - i0).max(0.0));
            let inner_step = if inner_corner > 0.0 {
                inner_corner / r0
            } else {
                0.0
            };
            path.line_to(self.polar(r0 + inner_corner, i1));
            path.quad_to(self.polar(r0, i1), self.polar(r0, i1 - inner_step));
            self.append_arc(path, r0, i1 - inner_step, i0 + inner_step, tolerance);
            path.quad_to(self.polar(r0, i0), self.polar(r0 + inner_corner, i0));
        } else {
            path.line_to(self.center);
        }
        path.close_path();
    }

    fn append_arc(&self, path: &mut BezPath, r: f64, from: f64, to: f64, tolerance: f64) {
        let arc = Arc {
            center: self.center,
            radii: Vec2::new(r, r),
            start_angle: from - FRAC_PI_2,
            sweep_angle: to - from,
            x_rotation: 0.0,
        };
        path.extend(arc.append_iter(tolerance));
    }
}

fn shrink(a0: f64, a1: f64, by: f64) -> (f64, f64) {
    if a1 - a0 > 2.0 * by {
        (a0 + by, a1 - by)
    } else {
        let mid = 0.5 * (a0 + a1);
        (mid, mid)
    }
}

#[cfg(test)]
mod tests {
    use core::f64::consts::PI;

    use approx::assert_relative_eq;
    use kurbo::Shape;

    use super::*;

    #[test]
    fn quarter_slice_lies_in_upper_right_quadrant() {
        let sector = Sector::new(0.0, 10.0, 0.0, PI / 2.0);
        let bounds = sector.to_path(0.1).bounding_box();
        assert!(bounds.x0 >= -1e-6, "slice starts at twelve o'clock: {bounds:?}");
        assert!(bounds.y1 <= 1e-6, "slice stays above the center: {bounds:?}");
        assert_relative_eq!(bounds.x1, 10.0, epsilon = 1e-6);
    }

    #[test]
    fn centroid_of_half_donut_is_on_the_right() {
        let sector = Sector::new(10.0, 20.0, 0.0, PI);
        let c = sector.centroid();
        assert_relative_eq!(c.x, 15.0, epsilon = 1e-9);
        assert_relative_eq!(c.y, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn empty_sweep_produces_empty_path() {
        let sector = Sector::new(0.0, 10.0, 1.0, 1.0);
        assert!(sector.to_path(0.1).elements().is_empty(), "no geometry for zero sweep");
    }

    #[test]
    fn rounded_corners_stay_within_outer_radius() {
        let sector = Sector::new(5.0, 20.0, 0.0, PI / 2.0).with_corner_radius(4.0);
        let bounds = sector.to_path(0.1).bounding_box();
        assert!(bounds.x1 <= 20.0 + 1e-6, "corner rounding must not bulge: {bounds:?}");
    }
}
