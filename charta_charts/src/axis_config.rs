// Copyright 2026 the Charta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The axis configuration model.
//!
//! An [`AxisConfig`] says which record field feeds a dimension, how raw values become
//! numbers (plain, converted, or parsed as time), the optional explicit domain, and how the
//! axis is decorated. Multi-series charts use [`SeriesConfig`], which adds line styling and
//! the explicit [`MissingPolicy`].
//!
//! Both types deserialize from the same camelCase JSON the chart fixtures use:
//!
//! ```
//! use charta_charts::{AxisConfig, AxisLocation};
//!
//! let cfg = AxisConfig::from_json(
//!     r#"{"key": "sales", "start": 0, "axis": {"location": "right", "ticks": 4}}"#,
//! )
//! .unwrap();
//! assert_eq!(cfg.location(), Some(AxisLocation::Right));
//! assert_eq!(cfg.tick_count(), 4);
//! ```

use core::fmt;
use std::sync::Arc;

use charta_core::{Record, SymbolShape, number_at, text_at, value_at};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::curve::Curve;
use crate::error::{ChartError, ChartResult};
use crate::time::TimeFormat;

/// Default tick-count hint.
pub const DEFAULT_TICKS: usize = 5;

/// A pure function turning a raw field value into a number.
pub type Converter = Arc<dyn Fn(&Value) -> Option<f64> + Send + Sync>;

/// How raw values on an axis are interpreted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalingFunction {
    /// Values are numbers.
    #[default]
    Linear,
    /// Values are instants parsed with the axis [`TimeFormat`].
    Time,
}

/// The chart edge an axis is anchored to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisLocation {
    /// Above the plot.
    Top,
    /// Below the plot.
    Bottom,
    /// Left of the plot.
    Left,
    /// Right of the plot.
    Right,
}

impl AxisLocation {
    /// Parses a location name; unknown names are `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "top" => Some(Self::Top),
            "bottom" => Some(Self::Bottom),
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            _ => None,
        }
    }
}

fn lenient_location<'de, D: Deserializer<'de>>(d: D) -> Result<Option<AxisLocation>, D::Error> {
    let name: Option<String> = Option::deserialize(d)?;
    Ok(name.as_deref().and_then(AxisLocation::from_name))
}

/// Axis decoration settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisDisplay {
    /// Anchor edge. Unknown names fall back to the orientation's default edge.
    #[serde(deserialize_with = "lenient_location")]
    pub location: Option<AxisLocation>,
    /// Tick-count hint.
    pub ticks: Option<usize>,
    /// Caption text.
    pub label: Option<String>,
}

/// One dimension's data-to-screen mapping.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AxisConfig {
    /// Record field supplying this axis's raw values.
    pub key: String,
    /// Explicit lower domain bound.
    pub start: Option<f64>,
    /// Explicit upper domain bound.
    pub end: Option<f64>,
    /// Numeric or time interpretation of raw values.
    pub scaling_function: ScalingFunction,
    /// Parse settings for time axes.
    pub time: TimeFormat,
    /// Optional transform applied to raw values before anything else.
    #[serde(skip)]
    pub convert: Option<Converter>,
    /// Decoration settings.
    pub axis: AxisDisplay,
    /// Class hook for marks on this axis.
    pub class_name: Option<String>,
    /// Class hook for marks with negative values.
    pub class_name_negative: Option<String>,
}

impl fmt::Debug for AxisConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AxisConfig")
            .field("key", &self.key)
            .field("start", &self.start)
            .field("end", &self.end)
            .field("scaling_function", &self.scaling_function)
            .field("time", &self.time)
            .field("convert", &self.convert.as_ref().map(|_| "<fn>"))
            .field("axis", &self.axis)
            .field("class_name", &self.class_name)
            .field("class_name_negative", &self.class_name_negative)
            .finish()
    }
}

impl AxisConfig {
    /// Creates a linear axis over `key`.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    /// Decodes a JSON fixture and validates it.
    pub fn from_json(json: &str) -> ChartResult<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Sets both explicit bounds.
    pub fn with_domain(mut self, start: f64, end: f64) -> ChartResult<Self> {
        self.start = Some(start);
        self.end = Some(end);
        self.validate()?;
        Ok(self)
    }

    /// Sets the lower bound.
    pub fn with_start(mut self, start: f64) -> Self {
        self.start = Some(start);
        self
    }

    /// Sets the upper bound.
    pub fn with_end(mut self, end: f64) -> Self {
        self.end = Some(end);
        self
    }

    /// Switches to a time axis parsed with `format`.
    pub fn with_time(mut self, format: TimeFormat) -> Self {
        self.scaling_function = ScalingFunction::Time;
        self.time = format;
        self
    }

    /// Sets a raw-value converter.
    pub fn with_convert(
        mut self,
        f: impl Fn(&Value) -> Option<f64> + Send + Sync + 'static,
    ) -> Self {
        self.convert = Some(Arc::new(f));
        self
    }

    /// Sets the anchor edge.
    pub fn with_location(mut self, location: AxisLocation) -> Self {
        self.axis.location = Some(location);
        self
    }

    /// Sets the tick-count hint.
    pub fn with_ticks(mut self, ticks: usize) -> Self {
        self.axis.ticks = Some(ticks);
        self
    }

    /// Sets the caption.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.axis.label = Some(label.into());
        self
    }

    /// Sets the mark class hook.
    pub fn with_class_name(mut self, class: impl Into<String>) -> Self {
        self.class_name = Some(class.into());
        self
    }

    /// Sets the negative-value class hook.
    pub fn with_class_name_negative(mut self, class: impl Into<String>) -> Self {
        self.class_name_negative = Some(class.into());
        self
    }

    /// Checks that explicit bounds are ordered.
    pub fn validate(&self) -> ChartResult<()> {
        if let (Some(start), Some(end)) = (self.start, self.end)
            && start > end
        {
            return Err(ChartError::InvalidDomain {
                key: self.key.clone(),
                start,
                end,
            });
        }
        Ok(())
    }

    /// The configured anchor edge.
    pub fn location(&self) -> Option<AxisLocation> {
        self.axis.location
    }

    /// The tick hint; zero or unset means the default of five.
    pub fn tick_count(&self) -> usize {
        self.axis.ticks.filter(|t| *t > 0).unwrap_or(DEFAULT_TICKS)
    }

    /// The caption, if any.
    pub fn label(&self) -> Option<&str> {
        self.axis.label.as_deref().filter(|l| !l.is_empty())
    }

    /// Returns `true` for time axes.
    pub fn is_time(&self) -> bool {
        self.scaling_function == ScalingFunction::Time
    }

    /// The record's value on this axis, as a finite number.
    pub fn value(&self, record: &Record) -> Option<f64> {
        let raw = value_at(record, &self.key);
        let v = if let Some(convert) = &self.convert {
            convert(raw.unwrap_or(&Value::Null))
        } else if self.is_time() {
            raw.and_then(|v| self.time.parse(v))
        } else {
            number_at(record, &self.key)
        };
        v.filter(|v| v.is_finite())
    }

    /// Converts a bare value (such as a reference line position) the same way as a field.
    pub fn value_of(&self, raw: &Value) -> Option<f64> {
        let v = if let Some(convert) = &self.convert {
            convert(raw)
        } else if self.is_time() {
            self.time.parse(raw)
        } else {
            raw.as_f64()
        };
        v.filter(|v| v.is_finite())
    }

    /// The record's value on this axis as a category name.
    pub fn category(&self, record: &Record) -> Option<String> {
        text_at(record, &self.key)
    }

    /// `[min, max]` of the mapped values, skipping records without one.
    pub fn extent(&self, data: &[Record]) -> Option<(f64, f64)> {
        extent(data.iter().filter_map(|r| self.value(r)))
    }

    /// Explicit bounds where given, inferred bounds otherwise.
    ///
    /// `None` when a bound is missing and the data has no usable values.
    pub fn resolve_domain(&self, data: &[Record]) -> Option<(f64, f64)> {
        let inferred = if self.start.is_some() && self.end.is_some() {
            None
        } else {
            self.extent(data)
        };
        let start = self.start.or(inferred.map(|e| e.0))?;
        let end = self.end.or(inferred.map(|e| e.1))?;
        Some((start, end))
    }

    /// [`resolve_domain`](Self::resolve_domain), falling back to `default` for empty data.
    pub fn domain_or(&self, data: &[Record], default: (f64, f64)) -> (f64, f64) {
        self.resolve_domain(data).unwrap_or((
            self.start.unwrap_or(default.0),
            self.end.unwrap_or(default.1),
        ))
    }

    /// Class for a mark of `value`: the negative hook for negative values when configured.
    pub fn class_for(&self, value: f64) -> &str {
        match (&self.class_name_negative, &self.class_name) {
            (Some(neg), _) if value < 0.0 => neg,
            (_, Some(class)) => class,
            _ => "",
        }
    }
}

/// `[min, max]` of finite values.
pub(crate) fn extent(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        if v.is_finite() {
            min = min.min(v);
            max = max.max(v);
        }
    }
    (min <= max).then_some((min, max))
}

/// What a series does with records lacking a finite value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingPolicy {
    /// Drop the record from the series.
    #[default]
    Skip,
    /// Plot the record at zero.
    Zero,
}

pub(crate) fn lenient_missing<'de, D: Deserializer<'de>>(d: D) -> Result<MissingPolicy, D::Error> {
    let v = Value::deserialize(d)?;
    Ok(match v {
        Value::String(s) if s == "zero" => MissingPolicy::Zero,
        Value::Number(n) if n.as_f64() == Some(0.0) => MissingPolicy::Zero,
        _ => MissingPolicy::Skip,
    })
}

/// Where a series' end label sits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelPosition {
    /// Left of the plot.
    Left,
    /// Right of the plot.
    #[default]
    Right,
}

/// End-of-series label settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SeriesLabel {
    /// Draw the label.
    pub show: bool,
    /// Label side.
    pub position: LabelPosition,
    /// Class hook for the label.
    pub class_name: Option<String>,
}

/// An axis configuration for one series of a line or area chart.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SeriesConfig {
    /// The series' value axis.
    #[serde(flatten)]
    pub axis: AxisConfig,
    /// Interpolation between points.
    pub curve: Curve,
    /// Point symbol; `None` draws no symbols.
    #[serde(deserialize_with = "lenient_symbol")]
    pub symbol: Option<SymbolShape>,
    /// Symbol area in square pixels.
    pub size: Option<f64>,
    /// End label settings.
    pub label: SeriesLabel,
    /// Missing-value handling.
    #[serde(rename = "unknown", deserialize_with = "lenient_missing")]
    pub missing: MissingPolicy,
}

fn lenient_symbol<'de, D: Deserializer<'de>>(d: D) -> Result<Option<SymbolShape>, D::Error> {
    let name: Option<String> = Option::deserialize(d)?;
    Ok(name.as_deref().and_then(SymbolShape::from_name))
}

impl SeriesConfig {
    /// Creates a linear series over `key` that skips missing values.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            axis: AxisConfig::new(key),
            ..Self::default()
        }
    }

    /// Wraps an existing axis configuration.
    pub fn from_axis(axis: AxisConfig) -> Self {
        Self {
            axis,
            ..Self::default()
        }
    }

    /// The data key.
    pub fn key(&self) -> &str {
        &self.axis.key
    }

    /// Sets the interpolation.
    pub fn with_curve(mut self, curve: Curve) -> Self {
        self.curve = curve;
        self
    }

    /// Sets the point symbol.
    pub fn with_symbol(mut self, symbol: SymbolShape) -> Self {
        self.symbol = Some(symbol);
        self
    }

    /// Sets the symbol size.
    pub fn with_size(mut self, size: f64) -> Self {
        self.size = Some(size);
        self
    }

    /// Shows the end label.
    pub fn with_end_label(mut self, class_name: Option<String>) -> Self {
        self.label = SeriesLabel {
            show: true,
            position: LabelPosition::Right,
            class_name,
        };
        self
    }

    /// Sets the missing-value policy.
    pub fn with_missing(mut self, missing: MissingPolicy) -> Self {
        self.missing = missing;
        self
    }

    /// Sets the anchor edge.
    pub fn with_location(mut self, location: AxisLocation) -> Self {
        self.axis.axis.location = Some(location);
        self
    }

    /// Sets the class hook.
    pub fn with_class_name(mut self, class: impl Into<String>) -> Self {
        self.axis.class_name = Some(class.into());
        self
    }

    /// The record's plotted value after applying the missing policy.
    pub fn value(&self, record: &Record) -> Option<f64> {
        match (self.axis.value(record), self.missing) {
            (Some(v), _) => Some(v),
            (None, MissingPolicy::Zero) => Some(0.0),
            (None, MissingPolicy::Skip) => None,
        }
    }

    /// Symbol area, defaulting to 16.
    pub fn symbol_size(&self) -> f64 {
        self.size.filter(|s| *s > 0.0).unwrap_or(16.0)
    }
}

#[cfg(test)]
mod tests {
    use charta_core::record;
    use serde_json::json;

    use super::*;

    fn rows(values: &[f64]) -> Vec<Record> {
        values.iter().map(|v| record([("v", json!(v))])).collect()
    }

    #[test]
    fn explicit_bounds_win() {
        let cfg = AxisConfig::new("v").with_domain(-5.0, 5.0);
        let domain = cfg.ok().and_then(|c| c.resolve_domain(&rows(&[1.0, 100.0])));
        assert_eq!(domain, Some((-5.0, 5.0)));
    }

    #[test]
    fn reversed_bounds_are_rejected() {
        let err = AxisConfig::new("v").with_domain(5.0, 1.0);
        assert!(matches!(err, Err(ChartError::InvalidDomain { .. })));
    }

    #[test]
    fn inferred_domain_tracks_data() {
        let cfg = AxisConfig::new("v");
        assert_eq!(cfg.resolve_domain(&rows(&[3.0, 1.0, 7.0])), Some((1.0, 7.0)));
        assert_eq!(cfg.resolve_domain(&rows(&[3.0, 1.0])), Some((1.0, 3.0)));
        assert_eq!(cfg.resolve_domain(&[]), None);
        assert_eq!(cfg.domain_or(&[], (0.0, 1.0)), (0.0, 1.0));
    }

    #[test]
    fn half_explicit_domain_mixes_sources() {
        let cfg = AxisConfig::new("v").with_start(0.0);
        assert_eq!(cfg.resolve_domain(&rows(&[3.0, 7.0])), Some((0.0, 7.0)));
    }

    #[test]
    fn converter_sees_raw_values() {
        let cfg = AxisConfig::new("v").with_convert(|v| v.as_str().and_then(|s| s.parse().ok()));
        let r = record([("v", json!("42"))]);
        assert_eq!(cfg.value(&r), Some(42.0));
    }

    #[test]
    fn time_axis_parses_strings() {
        let cfg = AxisConfig::new("d").with_time(TimeFormat::default());
        let r = record([("d", json!("1970-01-02"))]);
        assert_eq!(cfg.value(&r), Some(86_400_000.0));
    }

    #[test]
    fn negative_class_applies_only_below_zero() {
        let cfg = AxisConfig::new("v")
            .with_class_name("fill-blue")
            .with_class_name_negative("fill-red");
        assert_eq!(cfg.class_for(-1.0), "fill-red");
        assert_eq!(cfg.class_for(0.0), "fill-blue");
    }

    #[test]
    fn unknown_location_falls_back_to_none() {
        let cfg = AxisConfig::from_json(r#"{"key": "v", "axis": {"location": "middle"}}"#);
        assert!(cfg.is_ok_and(|c| c.location().is_none()));
    }

    #[test]
    fn series_fixture_reads_missing_policy() {
        let s: SeriesConfig =
            serde_json::from_str(r#"{"key": "v", "unknown": "zero", "symbol": "star"}"#)
                .unwrap_or_default();
        assert_eq!(s.missing, MissingPolicy::Zero);
        assert_eq!(s.symbol, Some(SymbolShape::Star));
        assert_eq!(s.value(&record([("v", Value::Null)])), Some(0.0));
        assert_eq!(SeriesConfig::new("v").value(&record([("w", json!(1))])), None);
    }
}
