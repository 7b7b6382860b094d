// Copyright 2026 the Charta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Zoom and pan transforms.
//!
//! [`ZoomBehavior`] turns wheel and drag gestures into a [`ZoomTransform`], clamped to a scale
//! extent and kept inside a translate extent, the same way d3-zoom does. Charts apply the
//! transform to the pixel range of their x scale and redraw.

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};
use crate::scale::{ScaleLinear, ScaleTime};

/// A uniform scale followed by a translation: `p -> p * k + (x, y)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomTransform {
    /// Scale factor.
    pub k: f64,
    /// Horizontal translation.
    pub x: f64,
    /// Vertical translation.
    pub y: f64,
}

impl Default for ZoomTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ZoomTransform {
    /// No zoom.
    pub const IDENTITY: Self = Self {
        k: 1.0,
        x: 0.0,
        y: 0.0,
    };

    /// Creates a transform.
    pub const fn new(k: f64, x: f64, y: f64) -> Self {
        Self { k, x, y }
    }

    /// Maps an x coordinate.
    pub fn apply_x(&self, x: f64) -> f64 {
        x * self.k + self.x
    }

    /// Maps a y coordinate.
    pub fn apply_y(&self, y: f64) -> f64 {
        y * self.k + self.y
    }

    /// Maps a point.
    pub fn apply(&self, p: Point) -> Point {
        Point::new(self.apply_x(p.x), self.apply_y(p.y))
    }

    /// Inverse of [`apply_x`](Self::apply_x).
    pub fn invert_x(&self, x: f64) -> f64 {
        (x - self.x) / self.k
    }

    /// Inverse of [`apply_y`](Self::apply_y).
    pub fn invert_y(&self, y: f64) -> f64 {
        (y - self.y) / self.k
    }

    /// Inverse of [`apply`](Self::apply).
    pub fn invert(&self, p: Point) -> Point {
        Point::new(self.invert_x(p.x), self.invert_y(p.y))
    }

    /// Translates by `(dx, dy)` in the untransformed space.
    pub fn translate(self, dx: f64, dy: f64) -> Self {
        Self::new(self.k, self.x + self.k * dx, self.y + self.k * dy)
    }

    /// A copy of `scale` whose range has been pushed through the transform.
    pub fn apply_to_range(&self, scale: ScaleLinear) -> ScaleLinear {
        scale.rescale_range(|r| self.apply_x(r))
    }

    /// A copy of `scale` whose domain covers what is visible after the transform.
    pub fn rescale_x(&self, scale: ScaleLinear) -> ScaleLinear {
        let (r0, r1) = scale.range();
        let d0 = scale.invert(self.invert_x(r0));
        let d1 = scale.invert(self.invert_x(r1));
        scale.with_domain((d0, d1))
    }

    /// Time counterpart of [`rescale_x`](Self::rescale_x).
    pub fn rescale_x_time(&self, scale: ScaleTime) -> ScaleTime {
        let (r0, r1) = scale.range();
        ScaleTime::new(
            (scale.invert(self.invert_x(r0)), scale.invert(self.invert_x(r1))),
            (r0, r1),
        )
    }
}

/// User-facing zoom switch.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Zooming {
    /// Whether gestures zoom the chart.
    pub enabled: bool,
    /// Smallest scale factor.
    pub min: f64,
    /// Largest scale factor.
    pub max: f64,
}

impl Default for Zooming {
    fn default() -> Self {
        Self {
            enabled: false,
            min: 1.0,
            max: 4.0,
        }
    }
}

impl Zooming {
    /// Zooming enabled with the default `[1, 4]` extent.
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }

    /// Zooming enabled with a custom scale extent.
    pub fn with_extent(min: f64, max: f64) -> ChartResult<Self> {
        let z = Self {
            enabled: true,
            min,
            max,
        };
        z.validate()?;
        Ok(z)
    }

    /// Checks that `0 < min <= max`.
    pub fn validate(&self) -> ChartResult<()> {
        if !(self.min > 0.0 && self.min <= self.max) || !self.max.is_finite() {
            return Err(ChartError::InvalidZoomExtent {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Gesture state for one zoomable chart.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomBehavior {
    /// Allowed scale factors.
    pub scale_extent: (f64, f64),
    /// The viewport, in chart pixels.
    pub extent: Rect,
    /// Region the viewport may not leave.
    pub translate_extent: Rect,
    transform: ZoomTransform,
}

impl ZoomBehavior {
    /// A behavior over `extent` that keeps the viewport inside it, with the default `[1, 4]`
    /// scale extent.
    pub fn new(extent: Rect) -> Self {
        Self {
            scale_extent: (1.0, 4.0),
            extent,
            translate_extent: extent,
            transform: ZoomTransform::IDENTITY,
        }
    }

    /// Sets the allowed scale factors.
    pub fn with_scale_extent(mut self, min: f64, max: f64) -> Self {
        self.scale_extent = (min, max);
        self
    }

    /// The current transform.
    pub fn transform(&self) -> ZoomTransform {
        self.transform
    }

    /// Replaces the transform, clamping it to the extents.
    pub fn transform_to(&mut self, transform: ZoomTransform) -> ZoomTransform {
        let k = transform.k.clamp(self.scale_extent.0, self.scale_extent.1);
        self.transform = self.constrain(ZoomTransform::new(k, transform.x, transform.y));
        self.transform
    }

    /// Multiplies the scale by `factor`, keeping `anchor` fixed on screen.
    pub fn scale_by(&mut self, factor: f64, anchor: Point) -> ZoomTransform {
        let t = self.transform;
        let k = (t.k * factor).clamp(self.scale_extent.0, self.scale_extent.1);
        let p1 = t.invert(anchor);
        let next = ZoomTransform::new(k, anchor.x - p1.x * k, anchor.y - p1.y * k);
        self.transform = self.constrain(next);
        self.transform
    }

    /// Pans by `(dx, dy)` screen pixels.
    pub fn translate_by(&mut self, dx: f64, dy: f64) -> ZoomTransform {
        let t = self.transform;
        self.transform = self.constrain(t.translate(dx / t.k, dy / t.k));
        self.transform
    }

    /// Back to the identity transform.
    pub fn reset(&mut self) {
        self.transform = ZoomTransform::IDENTITY;
    }

    fn constrain(&self, t: ZoomTransform) -> ZoomTransform {
        let e = self.extent;
        let te = self.translate_extent;
        let dx0 = t.invert_x(e.x0) - te.x0;
        let dx1 = t.invert_x(e.x1) - te.x1;
        let dy0 = t.invert_y(e.y0) - te.y0;
        let dy1 = t.invert_y(e.y1) - te.y1;
        let tx = if dx1 > dx0 {
            (dx0 + dx1) / 2.0
        } else if dx0 < 0.0 {
            dx0
        } else {
            dx1.max(0.0)
        };
        let ty = if dy1 > dy0 {
            (dy0 + dy1) / 2.0
        } else if dy0 < 0.0 {
            dy0
        } else {
            dy1.max(0.0)
        };
        t.translate(tx, ty)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn behavior() -> ZoomBehavior {
        ZoomBehavior::new(Rect::new(40.0, 40.0, 600.0, 400.0))
    }

    #[test]
    fn scale_is_clamped() {
        let mut z = behavior();
        assert_relative_eq!(z.scale_by(10.0, Point::new(300.0, 200.0)).k, 4.0);
        assert_relative_eq!(z.scale_by(0.01, Point::new(300.0, 200.0)).k, 1.0);
    }

    #[test]
    fn anchor_stays_fixed() {
        let mut z = behavior();
        let anchor = Point::new(320.0, 220.0);
        let t = z.scale_by(2.0, anchor);
        let p = t.apply(anchor);
        let back = t.invert(anchor);
        assert_relative_eq!(t.apply(back).x, anchor.x, epsilon = 1e-9);
        assert!(p.x.is_finite());
    }

    #[test]
    fn viewport_stays_inside_translate_extent() {
        let mut z = behavior();
        z.scale_by(2.0, Point::new(320.0, 220.0));
        let t = z.translate_by(10_000.0, 0.0);
        assert!(t.invert_x(40.0) >= 40.0 - 1e-9);
        let t = z.translate_by(-100_000.0, 0.0);
        assert!(t.invert_x(600.0) <= 600.0 + 1e-9);
    }

    #[test]
    fn identity_cannot_pan() {
        let mut z = behavior();
        assert_eq!(z.translate_by(50.0, 50.0), ZoomTransform::IDENTITY);
    }

    #[test]
    fn range_and_domain_rescaling_agree() {
        let scale = ScaleLinear::new((0.0, 100.0), (0.0, 200.0));
        let t = ZoomTransform::new(2.0, -100.0, 0.0);
        let by_range = t.apply_to_range(scale);
        let by_domain = t.rescale_x(scale);
        for v in [25.0, 50.0, 75.0] {
            assert_relative_eq!(by_range.map(v), by_domain.map(v), epsilon = 1e-9);
        }
    }

    #[test]
    fn zooming_extent_is_validated() {
        assert!(Zooming::with_extent(2.0, 1.0).is_err());
        assert!(Zooming::with_extent(0.0, 1.0).is_err());
        assert!(Zooming::with_extent(1.0, 1.2).is_ok());
    }
}
