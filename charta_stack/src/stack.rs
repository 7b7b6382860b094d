// Copyright 2026 the Charta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The stack layout itself.

use crate::policy::{StackOffset, StackOrder, StackingType};

/// One stacked value: the band `[lower, upper]` a row occupies within a series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackPoint {
    /// Baseline of the band.
    pub lower: f64,
    /// Topline of the band.
    pub upper: f64,
    /// The input value (non-finite inputs are read as `0`).
    pub value: f64,
}

/// A stacked series, one [`StackPoint`] per input row.
#[derive(Debug, Clone, PartialEq)]
pub struct StackSeries {
    /// The key this series was read from.
    pub key: String,
    /// Stack position, `0` being the bottom-most series.
    pub index: usize,
    /// Bands in row order.
    pub points: Vec<StackPoint>,
}

/// A configured stack layout over a fixed list of keys.
///
/// ```
/// use charta_stack::{Stack, StackingType};
///
/// let rows = [[1.0, 3.0], [2.0, 2.0]];
/// let keys = ["a", "b"];
/// let series = Stack::new(keys).with_type(StackingType::Percent).layout(&rows, |row, key| {
///     row[keys.iter().position(|k| *k == key).unwrap_or(0)]
/// });
/// assert_eq!(series[1].points[0].upper, 1.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Stack {
    keys: Vec<String>,
    order: StackOrder,
    offset: StackOffset,
}

impl Stack {
    /// Creates a zero-offset, input-ordered stack over `keys`.
    pub fn new<K: Into<String>>(keys: impl IntoIterator<Item = K>) -> Self {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            order: StackOrder::None,
            offset: StackOffset::Zero,
        }
    }

    /// Sets the stacking order.
    pub fn with_order(mut self, order: StackOrder) -> Self {
        self.order = order;
        self
    }

    /// Sets the baseline offset.
    pub fn with_offset(mut self, offset: StackOffset) -> Self {
        self.offset = offset;
        self
    }

    /// Applies a preset's order and offset.
    pub fn with_type(self, stacking: StackingType) -> Self {
        let (offset, order) = stacking.policies();
        self.with_offset(offset).with_order(order)
    }

    /// The stacked keys.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Lays out `rows`, reading each key's value with `value`.
    ///
    /// Series are returned in key order; [`StackSeries::index`] gives their stack position.
    pub fn layout<R>(&self, rows: &[R], value: impl Fn(&R, &str) -> f64) -> Vec<StackSeries> {
        let mut series: Vec<StackSeries> = self
            .keys
            .iter()
            .map(|key| StackSeries {
                key: key.clone(),
                index: 0,
                points: rows
                    .iter()
                    .map(|row| {
                        let v = value(row, key);
                        let v = if v.is_finite() { v } else { 0.0 };
                        StackPoint {
                            lower: 0.0,
                            upper: v,
                            value: v,
                        }
                    })
                    .collect(),
            })
            .collect();
        let order = self.order.resolve(&series);
        for (position, &i) in order.iter().enumerate() {
            series[i].index = position;
        }
        match self.offset {
            StackOffset::Zero => offset_zero(&mut series, &order),
            StackOffset::Expand => offset_expand(&mut series, &order),
            StackOffset::Wiggle => offset_wiggle(&mut series, &order),
            StackOffset::Diverging => offset_diverging(&mut series, &order),
        }
        series
    }
}

impl StackOrder {
    /// Returns series indices from bottom to top.
    fn resolve(self, series: &[StackSeries]) -> Vec<usize> {
        let natural: Vec<usize> = (0..series.len()).collect();
        match self {
            Self::None => natural,
            Self::Reverse => natural.into_iter().rev().collect(),
            Self::InsideOut => inside_out(series),
        }
    }
}

fn inside_out(series: &[StackSeries]) -> Vec<usize> {
    let sums: Vec<f64> = series
        .iter()
        .map(|s| s.points.iter().map(|p| p.upper).sum())
        .collect();
    let mut appearance: Vec<usize> = (0..series.len()).collect();
    let peaks: Vec<usize> = series.iter().map(peak).collect();
    appearance.sort_by_key(|&i| peaks[i]);

    let (mut top, mut bottom) = (0.0, 0.0);
    let mut tops = Vec::new();
    let mut bottoms = Vec::new();
    for i in appearance {
        if top < bottom {
            top += sums[i];
            tops.push(i);
        } else {
            bottom += sums[i];
            bottoms.push(i);
        }
    }
    bottoms.reverse();
    bottoms.extend(tops);
    bottoms
}

/// Row index of the first maximum.
fn peak(series: &StackSeries) -> usize {
    let mut best = f64::NEG_INFINITY;
    let mut at = 0;
    for (i, p) in series.points.iter().enumerate() {
        if p.upper > best {
            best = p.upper;
            at = i;
        }
    }
    at
}

fn offset_zero(series: &mut [StackSeries], order: &[usize]) {
    for w in order.windows(2) {
        let (below, above) = (w[0], w[1]);
        for j in 0..series[above].points.len() {
            let base = series[below].points[j].upper;
            let p = &mut series[above].points[j];
            p.lower = base;
            p.upper += base;
        }
    }
}

fn offset_expand(series: &mut [StackSeries], order: &[usize]) {
    let rows = series.first().map_or(0, |s| s.points.len());
    for j in 0..rows {
        let total: f64 = series.iter().map(|s| s.points[j].upper).sum();
        if total != 0.0 {
            for s in series.iter_mut() {
                s.points[j].upper /= total;
            }
        }
    }
    offset_zero(series, order);
}

fn offset_diverging(series: &mut [StackSeries], order: &[usize]) {
    let rows = series.first().map_or(0, |s| s.points.len());
    for j in 0..rows {
        let (mut positive, mut negative) = (0.0, 0.0);
        for &i in order {
            let p = &mut series[i].points[j];
            let dy = p.upper - p.lower;
            if dy > 0.0 {
                p.lower = positive;
                positive += dy;
                p.upper = positive;
            } else if dy < 0.0 {
                p.upper = negative;
                negative += dy;
                p.lower = negative;
            } else {
                p.lower = 0.0;
                p.upper = dy;
            }
        }
    }
}

fn offset_wiggle(series: &mut [StackSeries], order: &[usize]) {
    let Some(&first) = order.first() else {
        return;
    };
    let rows = series[first].points.len();
    if rows == 0 {
        return;
    }
    let mut baseline = 0.0;
    for j in 1..rows {
        let (mut weight, mut weighted) = (0.0, 0.0);
        for (i, &si) in order.iter().enumerate() {
            let now = series[si].points[j].upper;
            let before = series[si].points[j - 1].upper;
            let mut slope = (now - before) / 2.0;
            for &sk in &order[..i] {
                slope += series[sk].points[j].upper - series[sk].points[j - 1].upper;
            }
            weight += now;
            weighted += slope * now;
        }
        let p = &mut series[first].points[j - 1];
        p.lower = baseline;
        p.upper += baseline;
        if weight != 0.0 {
            baseline -= weighted / weight;
        }
    }
    let p = &mut series[first].points[rows - 1];
    p.lower = baseline;
    p.upper += baseline;
    offset_zero(series, order);
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    use super::*;

    fn stack(rows: &[Vec<f64>], keys: &[&str], stacking: StackingType) -> Vec<StackSeries> {
        Stack::new(keys.iter().copied())
            .with_type(stacking)
            .layout(rows, |row, key| {
                let i = keys.iter().position(|k| *k == key).unwrap_or(0);
                row[i]
            })
    }

    #[test]
    fn zero_offset_accumulates_in_key_order() {
        let rows = vec![vec![1.0, 2.0, 3.0], vec![4.0, 0.0, 1.0]];
        let s = stack(&rows, &["a", "b", "c"], StackingType::Normal);
        assert_eq!(s[0].points[0], StackPoint { lower: 0.0, upper: 1.0, value: 1.0 });
        assert_eq!(s[1].points[0].lower, 1.0);
        assert_eq!(s[2].points[0].upper, 6.0);
        assert_eq!(s[2].points[1].lower, 4.0);
        assert_eq!(s.iter().map(|s| s.index).collect::<Vec<_>>(), [0, 1, 2]);
    }

    #[test]
    fn non_finite_values_read_as_zero() {
        let rows = vec![vec![f64::NAN, 2.0]];
        let s = stack(&rows, &["a", "b"], StackingType::Normal);
        assert_eq!(s[0].points[0].value, 0.0);
        assert_eq!(s[1].points[0].upper, 2.0);
    }

    #[test]
    fn percent_fills_unit_range() {
        let rows = vec![vec![1.0, 3.0]];
        let s = stack(&rows, &["a", "b"], StackingType::Percent);
        assert_relative_eq!(s[0].points[0].upper, 0.25);
        assert_relative_eq!(s[1].points[0].upper, 1.0);
    }

    #[test]
    fn all_zero_row_stays_at_zero_under_percent() {
        let rows = vec![vec![0.0, 0.0]];
        let s = stack(&rows, &["a", "b"], StackingType::Percent);
        assert_eq!(s[1].points[0].upper, 0.0);
    }

    #[test]
    fn diverging_splits_signs_around_zero() {
        let rows = vec![vec![2.0, -3.0, 1.0]];
        let s = stack(&rows, &["a", "b", "c"], StackingType::Diverging);
        // Reverse order: c is stacked first, then b, then a.
        assert_eq!((s[2].points[0].lower, s[2].points[0].upper), (0.0, 1.0));
        assert_eq!((s[0].points[0].lower, s[0].points[0].upper), (1.0, 3.0));
        assert_eq!((s[1].points[0].lower, s[1].points[0].upper), (-3.0, 0.0));
        assert_eq!(s[2].index, 0);
    }

    #[test]
    fn inside_out_puts_early_peaks_in_the_middle() {
        // Peaks at rows 2, 0, 1 respectively.
        let rows = vec![vec![0.0, 5.0, 0.0], vec![0.0, 1.0, 4.0], vec![3.0, 0.0, 0.0]];
        let series: Vec<StackSeries> = Stack::new(["a", "b", "c"])
            .layout(&rows, |row, key| row[usize::from(key.as_bytes()[0] - b'a')]);
        let order = StackOrder::InsideOut.resolve(&series);
        // b peaks first and takes the bottom; c and a then balance onto the top.
        assert_eq!(order, [1, 2, 0]);
    }

    #[test]
    fn wiggle_keeps_band_thickness() {
        let rows = vec![vec![1.0, 2.0], vec![3.0, 1.0], vec![2.0, 2.0]];
        let s = stack(&rows, &["a", "b"], StackingType::Streamgraph);
        for series in &s {
            for p in &series.points {
                assert_relative_eq!(p.upper - p.lower, p.value, epsilon = 1e-9);
            }
        }
        let first = s.iter().find(|s| s.index == 0).map(|s| s.points[0].lower);
        assert_eq!(first, Some(0.0), "wiggle starts at zero");
    }

    #[test]
    fn empty_input_is_empty_output() {
        let rows: Vec<Vec<f64>> = Vec::new();
        let s = stack(&rows, &["a"], StackingType::Streamgraph);
        assert!(s[0].points.is_empty());
        let s = stack(&rows, &[], StackingType::Normal);
        assert!(s.is_empty());
    }

    proptest! {
        #[test]
        fn percent_toplines_sum_to_one(values in proptest::collection::vec(0.1_f64..1000.0, 1..6)) {
            let keys: Vec<String> = (0..values.len()).map(|i| format!("k{i}")).collect();
            let rows = vec![values.clone()];
            let series = Stack::new(keys.iter().cloned())
                .with_type(StackingType::Percent)
                .layout(&rows, |row, key| {
                    let i = keys.iter().position(|k| k == key).unwrap_or(0);
                    row[i]
                });
            let top = series.iter().map(|s| s.points[0].upper).fold(f64::MIN, f64::max);
            prop_assert!((top - 1.0).abs() < 1e-9);
        }

        #[test]
        fn diverging_bands_never_cross_zero(values in proptest::collection::vec(-100.0_f64..100.0, 1..6)) {
            let keys: Vec<String> = (0..values.len()).map(|i| format!("k{i}")).collect();
            let rows = vec![values.clone()];
            let series = Stack::new(keys.iter().cloned())
                .with_type(StackingType::Diverging)
                .layout(&rows, |row, key| {
                    let i = keys.iter().position(|k| k == key).unwrap_or(0);
                    row[i]
                });
            for s in &series {
                let p = s.points[0];
                prop_assert!(p.lower >= 0.0 || p.upper <= 0.0);
            }
        }
    }
}
