// Copyright 2026 the Charta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node transitions.
//!
//! A transition records where a node *starts*; the node's own element and
//! attributes are always the end state. Hosts drive animation by sampling the
//! surface at an elapsed time, so nothing here owns a timer.

use crate::element::{Element, Transform};

/// Easing curve applied to normalized transition time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Ease {
    /// Constant speed.
    Linear,
    /// Symmetric cubic ease-in-out.
    #[default]
    CubicInOut,
}

impl Ease {
    /// Applies the curve to `t` in `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::CubicInOut => {
                let t2 = t * 2.0;
                if t2 <= 1.0 {
                    0.5 * t2 * t2 * t2
                } else {
                    let u = t2 - 2.0;
                    0.5 * (u * u * u + 2.0)
                }
            }
        }
    }
}

/// The start state of a transition.
#[derive(Clone, Debug, PartialEq)]
pub enum TransitionFrom {
    /// Start geometry; interpolated toward the node's element.
    Element(Element),
    /// Start transform; interpolated toward the node's transform.
    Transform(Transform),
    /// Start opacity; interpolated toward the node's opacity (or 1).
    Opacity(f64),
    /// Stroke reveal: the dash pattern grows from `0,L` to `L,L` along the path length.
    Reveal,
}

/// A delayed, eased interpolation from a start state to the node's end state.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    /// Delay before the transition starts.
    pub delay_ms: f64,
    /// Transition duration.
    pub duration_ms: f64,
    /// Easing curve.
    pub ease: Ease,
    /// Start state.
    pub from: TransitionFrom,
}

impl Transition {
    /// Creates a transition with the default easing and no delay.
    pub fn new(duration_ms: f64, from: TransitionFrom) -> Self {
        Self {
            delay_ms: 0.0,
            duration_ms: duration_ms.max(0.0),
            ease: Ease::default(),
            from,
        }
    }

    /// Sets the delay.
    pub fn with_delay(mut self, delay_ms: f64) -> Self {
        self.delay_ms = delay_ms.max(0.0);
        self
    }

    /// Sets the easing curve.
    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    /// Time at which the transition reaches its end state.
    pub fn end_ms(&self) -> f64 {
        self.delay_ms + self.duration_ms
    }

    /// Eased progress at `elapsed_ms`, in `[0, 1]`.
    pub fn progress(&self, elapsed_ms: f64) -> f64 {
        if elapsed_ms <= self.delay_ms {
            return 0.0;
        }
        if self.duration_ms <= 0.0 || elapsed_ms >= self.end_ms() {
            return 1.0;
        }
        self.ease
            .apply((elapsed_ms - self.delay_ms) / self.duration_ms)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn progress_respects_delay_and_duration() {
        let t = Transition::new(100.0, TransitionFrom::Opacity(0.0))
            .with_delay(50.0)
            .with_ease(Ease::Linear);
        assert_relative_eq!(t.progress(0.0), 0.0);
        assert_relative_eq!(t.progress(100.0), 0.5);
        assert_relative_eq!(t.progress(500.0), 1.0);
    }

    #[test]
    fn cubic_is_symmetric() {
        let e = Ease::CubicInOut;
        assert_relative_eq!(e.apply(0.5), 0.5);
        assert_relative_eq!(e.apply(0.25) + e.apply(0.75), 1.0, epsilon = 1e-12);
    }
}
