// Copyright 2026 the Charta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scale utilities.
//!
//! Continuous scales ([`ScaleLinear`], [`ScaleTime`]) map a numeric domain onto a pixel
//! range; discrete scales ([`ScaleBand`], [`ScalePoint`]) map category names onto evenly
//! spaced positions. [`AxisScale`] wraps any of them for the axis renderer.

use crate::format;
use crate::time;

/// A linear mapping from a continuous domain to a continuous range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleLinear {
    domain: (f64, f64),
    range: (f64, f64),
}

impl ScaleLinear {
    /// Creates a new scale mapping `domain` values to `range` values.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Maps a value from domain space into range space.
    pub fn map(&self, x: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let denom = d1 - d0;
        if denom == 0.0 {
            return (r0 + r1) / 2.0;
        }
        let t = (x - d0) / denom;
        r0 + t * (r1 - r0)
    }

    /// Maps a range position back into the domain.
    pub fn invert(&self, y: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let denom = r1 - r0;
        if denom == 0.0 {
            return d0;
        }
        d0 + (y - r0) / denom * (d1 - d0)
    }

    /// The domain as authored.
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// The output range.
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Returns the minimum of the configured domain (as authored).
    pub fn domain_min(&self) -> f64 {
        self.domain.0
    }

    /// Returns the maximum of the configured domain (as authored).
    pub fn domain_max(&self) -> f64 {
        self.domain.1
    }

    /// Returns a copy with a new domain.
    pub fn with_domain(mut self, domain: (f64, f64)) -> Self {
        self.domain = domain;
        self
    }

    /// Returns a copy with a new range.
    pub fn with_range(mut self, range: (f64, f64)) -> Self {
        self.range = range;
        self
    }

    /// Returns a copy whose range has been remapped by `f`, as zoom does.
    pub fn rescale_range(self, f: impl Fn(f64) -> f64) -> Self {
        self.with_range((f(self.range.0), f(self.range.1)))
    }

    /// Returns "nice" tick values that fall inside the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        inner_ticks(self.domain.0, self.domain.1, count)
    }

    /// The step between consecutive ticks for `count`.
    pub fn tick_step(&self, count: usize) -> f64 {
        tick_step(self.domain.0, self.domain.1, count)
    }

    /// Extends the domain outward to round tick values.
    pub fn nice(self, count: usize) -> Self {
        let ticks = nice_ticks(self.domain.0, self.domain.1, count);
        match (ticks.first(), ticks.last()) {
            (Some(first), Some(last)) if ticks.len() >= 2 => {
                if self.domain.0 <= self.domain.1 {
                    self.with_domain((*first, *last))
                } else {
                    self.with_domain((*last, *first))
                }
            }
            _ => self,
        }
    }
}

/// A time scale over epoch milliseconds (UTC).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleTime {
    inner: ScaleLinear,
}

impl ScaleTime {
    /// Creates a new time scale.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            inner: ScaleLinear::new(domain, range),
        }
    }

    /// Maps a timestamp into range space.
    pub fn map(&self, t: f64) -> f64 {
        self.inner.map(t)
    }

    /// Maps a range position back to a timestamp.
    pub fn invert(&self, y: f64) -> f64 {
        self.inner.invert(y)
    }

    /// Calendar-aligned tick timestamps.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        time::time_ticks(self.inner.domain_min(), self.inner.domain_max(), count)
    }

    /// The domain in epoch milliseconds.
    pub fn domain(&self) -> (f64, f64) {
        self.inner.domain()
    }

    /// The output range.
    pub fn range(&self) -> (f64, f64) {
        self.inner.range()
    }

    /// Returns a copy whose range has been remapped by `f`.
    pub fn rescale_range(self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            inner: self.inner.rescale_range(f),
        }
    }

    /// The underlying linear mapping.
    pub fn as_linear(&self) -> ScaleLinear {
        self.inner
    }
}

/// A continuous x scale: numeric or time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ContinuousScale {
    /// Numeric values.
    Linear(ScaleLinear),
    /// Epoch milliseconds.
    Time(ScaleTime),
}

impl ContinuousScale {
    /// A numeric or time scale, depending on `time`.
    pub fn new(time: bool, domain: (f64, f64), range: (f64, f64)) -> Self {
        if time {
            Self::Time(ScaleTime::new(domain, range))
        } else {
            Self::Linear(ScaleLinear::new(domain, range))
        }
    }

    /// Maps a value into range space.
    pub fn map(&self, v: f64) -> f64 {
        match self {
            Self::Linear(s) => s.map(v),
            Self::Time(s) => s.map(v),
        }
    }

    /// Maps a range position back into the domain.
    pub fn invert(&self, px: f64) -> f64 {
        match self {
            Self::Linear(s) => s.invert(px),
            Self::Time(s) => s.invert(px),
        }
    }

    /// The domain.
    pub fn domain(&self) -> (f64, f64) {
        match self {
            Self::Linear(s) => s.domain(),
            Self::Time(s) => s.domain(),
        }
    }

    /// The output range.
    pub fn range(&self) -> (f64, f64) {
        match self {
            Self::Linear(s) => s.range(),
            Self::Time(s) => s.range(),
        }
    }

    /// Returns a copy whose range has been remapped by `f`.
    pub fn rescale_range(self, f: impl Fn(f64) -> f64) -> Self {
        match self {
            Self::Linear(s) => Self::Linear(s.rescale_range(f)),
            Self::Time(s) => Self::Time(s.rescale_range(f)),
        }
    }
}

impl From<ContinuousScale> for AxisScale {
    fn from(value: ContinuousScale) -> Self {
        match value {
            ContinuousScale::Linear(s) => Self::Linear(s),
            ContinuousScale::Time(s) => Self::Time(s),
        }
    }
}

/// A discrete band scale for categorical charts.
///
/// Padding is expressed as a fraction of the step between band starts.
#[derive(Clone, Debug, PartialEq)]
pub struct ScaleBand {
    domain: Vec<String>,
    range: (f64, f64),
    padding_inner: f64,
    padding_outer: f64,
}

impl ScaleBand {
    /// Creates a band scale with inner and outer padding of `0.1`.
    pub fn new(domain: Vec<String>, range: (f64, f64)) -> Self {
        Self {
            domain,
            range,
            padding_inner: 0.1,
            padding_outer: 0.1,
        }
    }

    /// Sets inner and outer padding to the same fraction.
    pub fn with_padding(self, padding: f64) -> Self {
        self.with_padding_inner(padding).with_padding_outer(padding)
    }

    /// Sets the gap between bands as a fraction of the step.
    pub fn with_padding_inner(mut self, padding: f64) -> Self {
        self.padding_inner = padding.clamp(0.0, 1.0);
        self
    }

    /// Sets the gap before the first and after the last band.
    pub fn with_padding_outer(mut self, padding: f64) -> Self {
        self.padding_outer = padding.max(0.0);
        self
    }

    /// Returns a copy with a new range.
    pub fn with_range(mut self, range: (f64, f64)) -> Self {
        self.range = range;
        self
    }

    /// Category names in position order.
    pub fn domain(&self) -> &[String] {
        &self.domain
    }

    /// The output range.
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Returns the number of bands.
    pub fn count(&self) -> usize {
        self.domain.len()
    }

    /// Distance between the starts of adjacent bands.
    pub fn step(&self) -> f64 {
        let n = self.domain.len() as f64;
        let (r0, r1) = self.range;
        (r1 - r0).abs() / (n - self.padding_inner + 2.0 * self.padding_outer).max(1.0)
    }

    /// Returns the computed band width.
    pub fn band_width(&self) -> f64 {
        self.step() * (1.0 - self.padding_inner)
    }

    /// Returns the start position of the band at `index`.
    pub fn x(&self, index: usize) -> f64 {
        let n = self.domain.len();
        let (r0, r1) = self.range;
        let (lo, hi) = if r1 >= r0 { (r0, r1) } else { (r1, r0) };
        let step = self.step();
        let start = lo + (hi - lo - step * (n as f64 - self.padding_inner)) * 0.5;
        let slot = if r1 >= r0 {
            index
        } else {
            n.saturating_sub(1).saturating_sub(index)
        };
        start + step * slot as f64
    }

    /// Index of `key` in the domain.
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.domain.iter().position(|d| d == key)
    }

    /// Start position of the band for `key`; `None` for unknown categories.
    pub fn position(&self, key: &str) -> Option<f64> {
        self.index_of(key).map(|i| self.x(i))
    }
}

/// A discrete point scale (a band scale with zero-width bands).
#[derive(Clone, Debug, PartialEq)]
pub struct ScalePoint {
    domain: Vec<String>,
    range: (f64, f64),
    padding: f64,
}

impl ScalePoint {
    /// Creates a new point scale with outer padding `0.5`.
    pub fn new(domain: Vec<String>, range: (f64, f64)) -> Self {
        Self {
            domain,
            range,
            padding: 0.5,
        }
    }

    /// Sets the outer padding in point steps.
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding.max(0.0);
        self
    }

    /// Category names in position order.
    pub fn domain(&self) -> &[String] {
        &self.domain
    }

    /// The output range.
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Distance between adjacent points.
    pub fn step(&self) -> f64 {
        let n = self.domain.len() as f64;
        let (r0, r1) = self.range;
        let denom = (n - 1.0 + 2.0 * self.padding).max(1.0);
        (r1 - r0).abs() / denom
    }

    /// Returns the position of the point at `index`.
    pub fn x(&self, index: usize) -> f64 {
        let n = self.domain.len();
        let (r0, r1) = self.range;
        let (lo, hi) = if r1 >= r0 { (r0, r1) } else { (r1, r0) };
        let step = self.step();
        let start = lo + (hi - lo - step * (n as f64 - 1.0)) * 0.5;
        let slot = if r1 >= r0 {
            index
        } else {
            n.saturating_sub(1).saturating_sub(index)
        };
        start + step * slot as f64
    }

    /// Position of `key`; `None` for unknown categories.
    pub fn position(&self, key: &str) -> Option<f64> {
        self.domain.iter().position(|d| d == key).map(|i| self.x(i))
    }
}

/// Any scale an axis can be drawn for.
#[derive(Clone, Debug, PartialEq)]
pub enum AxisScale {
    /// Continuous numeric axis.
    Linear(ScaleLinear),
    /// Continuous time axis.
    Time(ScaleTime),
    /// Categorical axis with bands; ticks sit at band centers.
    Band(ScaleBand),
    /// Categorical axis with points.
    Point(ScalePoint),
}

/// One tick: its pixel position along the axis and its label.
#[derive(Clone, Debug, PartialEq)]
pub struct Tick {
    /// Position in range space.
    pub position: f64,
    /// Formatted label.
    pub label: String,
}

impl AxisScale {
    /// The output range.
    pub fn range(&self) -> (f64, f64) {
        match self {
            Self::Linear(s) => s.range(),
            Self::Time(s) => s.range(),
            Self::Band(s) => s.range(),
            Self::Point(s) => s.range(),
        }
    }

    /// Generates ticks for a count hint.
    pub fn ticks(&self, count: usize) -> Vec<Tick> {
        match self {
            Self::Linear(s) => {
                let step = s.tick_step(count);
                s.ticks(count)
                    .into_iter()
                    .map(|v| Tick {
                        position: s.map(v),
                        label: format::format_tick(v, step),
                    })
                    .collect()
            }
            Self::Time(s) => s
                .ticks(count)
                .into_iter()
                .map(|t| Tick {
                    position: s.map(t),
                    label: time::format_time_tick(t),
                })
                .collect(),
            Self::Band(s) => {
                let half = s.band_width() / 2.0;
                s.domain()
                    .iter()
                    .enumerate()
                    .map(|(i, key)| Tick {
                        position: s.x(i) + half,
                        label: key.clone(),
                    })
                    .collect()
            }
            Self::Point(s) => s
                .domain()
                .iter()
                .enumerate()
                .map(|(i, key)| Tick {
                    position: s.x(i),
                    label: key.clone(),
                })
                .collect(),
        }
    }
}

impl From<ScaleLinear> for AxisScale {
    fn from(value: ScaleLinear) -> Self {
        Self::Linear(value)
    }
}

impl From<ScaleTime> for AxisScale {
    fn from(value: ScaleTime) -> Self {
        Self::Time(value)
    }
}

impl From<ScaleBand> for AxisScale {
    fn from(value: ScaleBand) -> Self {
        Self::Band(value)
    }
}

impl From<ScalePoint> for AxisScale {
    fn from(value: ScalePoint) -> Self {
        Self::Point(value)
    }
}

/// Tick step for a domain and count hint; `0` for degenerate inputs.
pub(crate) fn tick_step(a: f64, b: f64, count: usize) -> f64 {
    if count == 0 || !a.is_finite() || !b.is_finite() || a == b {
        return 0.0;
    }
    nice_step((b - a).abs() / count as f64)
}

/// Ticks covering `[min, max]`, extended outward to the enclosing multiples of the step.
fn nice_ticks(mut min: f64, mut max: f64, count: usize) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }
    if min == max {
        return vec![min];
    }
    if min > max {
        core::mem::swap(&mut min, &mut max);
    }
    let step = tick_step(min, max, count);
    if step == 0.0 {
        return vec![min, max];
    }
    let first = (min / step).floor();
    let last = (max / step).ceil();
    multiples(first, last, step)
}

/// Ticks at multiples of the step that lie inside `[min, max]`.
fn inner_ticks(a: f64, b: f64, count: usize) -> Vec<f64> {
    if count == 0 || !a.is_finite() || !b.is_finite() {
        return Vec::new();
    }
    if a == b {
        return vec![a];
    }
    let (min, max) = if a < b { (a, b) } else { (b, a) };
    let step = tick_step(min, max, count);
    if step == 0.0 {
        return Vec::new();
    }
    // A small epsilon keeps endpoints that are exact multiples despite rounding.
    let eps = step * 1e-10;
    let first = ((min - eps) / step).ceil();
    let last = ((max + eps) / step).floor();
    multiples(first, last, step)
}

fn multiples(first: f64, last: f64, step: f64) -> Vec<f64> {
    let n_f = last - first;
    if !n_f.is_finite() || n_f < 0.0 {
        return Vec::new();
    }
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "guarded by finite/non-negative checks and capped at 10k"
    )]
    let n = n_f.min(10_000.0) as u64;
    // Dividing by the inverse avoids artifacts like 0.30000000000000004 for fractional steps.
    let inverse = if step < 1.0 { (1.0 / step).round() } else { 0.0 };
    (0..=n)
        .map(|i| {
            let k = first + i as f64;
            if inverse > 0.0 { k / inverse } else { k * step }
        })
        .collect()
}

fn nice_step(step: f64) -> f64 {
    if !step.is_finite() || step <= 0.0 {
        return 0.0;
    }
    let power = step.log10().floor();
    let base = 10_f64.powf(power);
    let error = step / base;
    // Thresholds sit at the geometric means of neighbouring nice steps.
    let nice = if error >= 50_f64.sqrt() {
        10.0
    } else if error >= 10_f64.sqrt() {
        5.0
    } else if error >= core::f64::consts::SQRT_2 {
        2.0
    } else {
        1.0
    };
    nice * base
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    use super::*;

    fn keys(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("k{i}")).collect()
    }

    #[test]
    fn step_rounds_at_geometric_means() {
        assert_eq!(tick_step(0.0, 72.0, 10), 10.0, "7.2 is above sqrt(50)");
        assert_eq!(tick_step(0.0, 70.0, 10), 5.0, "7.0 is below sqrt(50)");
        assert_eq!(tick_step(0.0, 32.0, 10), 5.0, "3.2 is above sqrt(10)");
        assert_eq!(tick_step(0.0, 14.5, 10), 2.0, "1.45 is above sqrt(2)");
        assert_eq!(tick_step(0.0, 14.0, 10), 1.0, "1.4 is below sqrt(2)");
    }

    #[test]
    fn linear_maps_and_inverts() {
        let s = ScaleLinear::new((0.0, 10.0), (100.0, 0.0));
        assert_relative_eq!(s.map(2.5), 75.0);
        assert_relative_eq!(s.invert(75.0), 2.5);
    }

    #[test]
    fn ticks_stay_inside_the_domain() {
        let s = ScaleLinear::new((0.3, 9.7), (0.0, 1.0));
        let ticks = s.ticks(5);
        assert_eq!(ticks, [2.0, 4.0, 6.0, 8.0]);
    }

    #[test]
    fn fractional_ticks_are_clean() {
        let s = ScaleLinear::new((0.0, 1.0), (0.0, 1.0));
        assert_eq!(s.ticks(5), [0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
    }

    #[test]
    fn nice_extends_the_domain() {
        let s = ScaleLinear::new((0.3, 9.7), (0.0, 1.0)).nice(5);
        assert_eq!(s.domain(), (0.0, 10.0));
    }

    #[test]
    fn band_scale_matches_padding_formula() {
        // step = 100 / (4 - 0.1 + 0.2)
        let s = ScaleBand::new(keys(4), (0.0, 100.0));
        let step = 100.0 / 4.1;
        assert_relative_eq!(s.step(), step);
        assert_relative_eq!(s.band_width(), step * 0.9);
        assert_relative_eq!(s.x(0), step * 0.1);
        assert_relative_eq!(s.x(3) + s.band_width() + step * 0.1, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn reversed_band_range_puts_first_key_at_the_end() {
        let s = ScaleBand::new(keys(3), (90.0, 0.0)).with_padding(0.0);
        assert_relative_eq!(s.x(0), 60.0);
        assert_relative_eq!(s.x(2), 0.0);
    }

    #[test]
    fn point_scale_positions_are_monotonic() {
        let scale = ScalePoint::new(keys(5), (0.0, 100.0));
        let a = scale.x(0);
        let b = scale.x(1);
        let c = scale.x(2);
        assert!(a < b);
        assert!(b < c);
        assert_relative_eq!(a, 10.0);
    }

    #[test]
    fn band_ticks_sit_at_centers() {
        let s = AxisScale::Band(ScaleBand::new(keys(2), (0.0, 100.0)).with_padding(0.0));
        let ticks = s.ticks(5);
        assert_eq!(ticks[0].position, 25.0);
        assert_eq!(ticks[1].label, "k1");
    }

    proptest! {
        #[test]
        fn linear_ticks_are_within_domain(a in -1e6_f64..1e6, span in 1e-3_f64..1e6, count in 1_usize..12) {
            let s = ScaleLinear::new((a, a + span), (0.0, 1.0));
            let tol = 1e-9 * (a.abs() + span);
            for t in s.ticks(count) {
                prop_assert!(t >= a - tol && t <= a + span + tol);
            }
        }
    }
}
