// Copyright 2026 the Charta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart box model: size, margin and padding.
//!
//! A chart's drawing area is its [`Size`] minus the [`Margin`] (room for axes and labels)
//! minus the [`Padding`] (room between the axes and the first marks). Axes are drawn
//! against the margin edge; marks are placed inside the padding.

use kurbo::Rect;
use serde::{Deserialize, Serialize};

/// A width/height pair in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Size {
    /// Creates a size.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::new(600.0, 400.0)
    }
}

/// Space reserved around the plot for axes and captions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margin {
    /// Top margin.
    pub top: f64,
    /// Right margin.
    pub right: f64,
    /// Bottom margin.
    pub bottom: f64,
    /// Left margin.
    pub left: f64,
}

impl Margin {
    /// Creates a margin from CSS-ordered sides.
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// The same margin on every side.
    pub const fn uniform(v: f64) -> Self {
        Self::new(v, v, v, v)
    }
}

/// Space between the axes and the marks, plus the band padding for categorical charts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Padding {
    /// Top padding.
    pub top: f64,
    /// Right padding.
    pub right: f64,
    /// Bottom padding.
    pub bottom: f64,
    /// Left padding.
    pub left: f64,
    /// Band padding for bar-like marks, as a fraction of the band step.
    pub bar: Option<f64>,
}

impl Padding {
    /// Creates padding from CSS-ordered sides.
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
            bar: None,
        }
    }

    /// Sets the band padding.
    pub const fn with_bar(mut self, bar: f64) -> Self {
        self.bar = Some(bar);
        self
    }

    /// The band padding, or `default` when unset.
    pub fn bar_or(&self, default: f64) -> f64 {
        self.bar.unwrap_or(default)
    }
}

/// The pixel rectangles derived from a size, margin and padding.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    /// Full surface size.
    pub size: Size,
    /// Margin around the axes.
    pub margin: Margin,
    /// Padding inside the axes.
    pub padding: Padding,
}

impl Frame {
    /// Creates a frame.
    pub fn new(size: Size, margin: Margin, padding: Padding) -> Self {
        Self {
            size,
            margin,
            padding,
        }
    }

    /// Area bounded by the axes (size minus margin).
    pub fn axes_rect(&self) -> Rect {
        Rect::new(
            self.margin.left,
            self.margin.top,
            (self.size.width - self.margin.right).max(self.margin.left),
            (self.size.height - self.margin.bottom).max(self.margin.top),
        )
    }

    /// Area where marks are placed (axes area minus padding).
    pub fn plot_rect(&self) -> Rect {
        let axes = self.axes_rect();
        let x0 = axes.x0 + self.padding.left;
        let y0 = axes.y0 + self.padding.top;
        Rect::new(
            x0,
            y0,
            (axes.x1 - self.padding.right).max(x0),
            (axes.y1 - self.padding.bottom).max(y0),
        )
    }

    /// Horizontal pixel range for marks, left to right.
    pub fn x_range(&self) -> (f64, f64) {
        let r = self.plot_rect();
        (r.x0, r.x1)
    }

    /// Vertical pixel range for marks, bottom to top (so larger values sit higher).
    pub fn y_range(&self) -> (f64, f64) {
        let r = self.plot_rect();
        (r.y1, r.y0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plot_rect_subtracts_margin_and_padding() {
        let frame = Frame::new(
            Size::new(200.0, 100.0),
            Margin::new(10.0, 20.0, 30.0, 40.0),
            Padding::new(1.0, 2.0, 3.0, 4.0),
        );
        assert_eq!(frame.plot_rect(), Rect::new(44.0, 11.0, 178.0, 67.0));
        assert_eq!(frame.y_range(), (67.0, 11.0));
    }

    #[test]
    fn tiny_surfaces_collapse_instead_of_inverting() {
        let frame = Frame::new(Size::new(10.0, 10.0), Margin::uniform(20.0), Padding::default());
        let r = frame.plot_rect();
        assert!(r.width() >= 0.0 && r.height() >= 0.0);
    }

    #[test]
    fn margins_deserialize_with_defaults() {
        let m: Margin = serde_json::from_str(r#"{"left": 60}"#).unwrap_or_default();
        assert_eq!(m, Margin::new(0.0, 0.0, 0.0, 60.0));
    }
}
