// Copyright 2026 the Charta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Time parsing, tick generation and tick formatting.
//!
//! Times are epoch milliseconds in UTC. Ticks snap to calendar boundaries (whole minutes,
//! midnights, first of the month, ...) chosen from a fixed ladder of intervals so that
//! roughly `count` ticks cover the domain. Labels use a multi-scale format that prints
//! only the most significant field that changes at a tick.

use chrono::{
    DateTime, Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike,
    Utc,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const SECOND: f64 = 1_000.0;
const MINUTE: f64 = 60.0 * SECOND;
const HOUR: f64 = 60.0 * MINUTE;
const DAY: f64 = 24.0 * HOUR;
const WEEK: f64 = 7.0 * DAY;
const MONTH: f64 = 30.0 * DAY;
const YEAR: f64 = 365.0 * DAY;

/// How string values on a time axis are parsed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimeFormat {
    /// A `strftime`-style pattern.
    pub format: String,
    /// Parse values as ISO-8601 / RFC 3339 instead of using `format`.
    #[serde(rename = "isISO")]
    pub iso: bool,
}

impl Default for TimeFormat {
    fn default() -> Self {
        Self {
            format: "%Y-%m-%d".to_string(),
            iso: false,
        }
    }
}

impl TimeFormat {
    /// A pattern-based format.
    pub fn pattern(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            iso: false,
        }
    }

    /// ISO-8601 parsing.
    pub fn iso() -> Self {
        Self {
            iso: true,
            ..Self::default()
        }
    }

    /// Parses a raw value into epoch milliseconds.
    ///
    /// Numbers are taken as epoch milliseconds already. Date-only patterns resolve to UTC
    /// midnight. Unparseable values return `None`.
    pub fn parse(&self, value: &Value) -> Option<f64> {
        match value {
            Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
            Value::String(s) => {
                let s = s.trim();
                if self.iso {
                    parse_iso(s)
                } else {
                    parse_pattern(s, &self.format)
                }
            }
            _ => None,
        }
    }
}

fn to_ms(dt: DateTime<Utc>) -> f64 {
    dt.timestamp_millis() as f64
}

fn parse_iso(s: &str) -> Option<f64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(to_ms(dt.with_timezone(&Utc)));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(to_ms(Utc.from_utc_datetime(&naive)));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|d| to_ms(Utc.from_utc_datetime(&d.and_time(NaiveTime::MIN))))
}

fn parse_pattern(s: &str, format: &str) -> Option<f64> {
    if let Ok(dt) = DateTime::parse_from_str(s, format) {
        return Some(to_ms(dt.with_timezone(&Utc)));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
        return Some(to_ms(Utc.from_utc_datetime(&naive)));
    }
    NaiveDate::parse_from_str(s, format)
        .ok()
        .map(|d| to_ms(Utc.from_utc_datetime(&d.and_time(NaiveTime::MIN))))
}

fn from_ms(ms: f64) -> Option<DateTime<Utc>> {
    if !ms.is_finite() {
        return None;
    }
    #[allow(
        clippy::cast_possible_truncation,
        reason = "finite timestamps outside chrono's range are rejected below"
    )]
    let ms = ms.round() as i64;
    DateTime::from_timestamp_millis(ms)
}

/// A calendar interval used to step between ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Interval {
    Second(u32),
    Minute(u32),
    Hour(u32),
    Day(u32),
    Week,
    Month(u32),
    Year(i32),
}

impl Interval {
    fn approx_ms(self) -> f64 {
        match self {
            Self::Second(k) => f64::from(k) * SECOND,
            Self::Minute(k) => f64::from(k) * MINUTE,
            Self::Hour(k) => f64::from(k) * HOUR,
            Self::Day(k) => f64::from(k) * DAY,
            Self::Week => WEEK,
            Self::Month(k) => f64::from(k) * MONTH,
            Self::Year(k) => f64::from(k) * YEAR,
        }
    }

    /// Latest boundary at or before `t`.
    fn floor(self, t: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let midnight = |d: NaiveDate| Utc.from_utc_datetime(&d.and_time(NaiveTime::MIN));
        let date = t.date_naive();
        Some(match self {
            Self::Second(k) => {
                let s = t.second() - t.second() % k;
                t.with_nanosecond(0)?.with_second(s)?
            }
            Self::Minute(k) => {
                let m = t.minute() - t.minute() % k;
                t.with_nanosecond(0)?.with_second(0)?.with_minute(m)?
            }
            Self::Hour(k) => {
                let h = t.hour() - t.hour() % k;
                midnight(date).with_hour(h)?
            }
            Self::Day(k) => {
                let d = t.day() - (t.day() - 1) % k;
                midnight(date.with_day(d)?)
            }
            Self::Week => {
                let back = u64::from(date.weekday().num_days_from_sunday());
                midnight(date.checked_sub_days(Days::new(back))?)
            }
            Self::Month(k) => {
                let m0 = t.month0() - t.month0() % k;
                midnight(NaiveDate::from_ymd_opt(t.year(), m0 + 1, 1)?)
            }
            Self::Year(k) => {
                let y = t.year() - t.year().rem_euclid(k.max(1));
                midnight(NaiveDate::from_ymd_opt(y, 1, 1)?)
            }
        })
    }

    /// The next boundary after the boundary `t`.
    fn next(self, t: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let stepped = match self {
            Self::Second(k) => t + chrono::Duration::seconds(i64::from(k)),
            Self::Minute(k) => t + chrono::Duration::minutes(i64::from(k)),
            Self::Hour(k) => t + chrono::Duration::hours(i64::from(k)),
            Self::Day(k) => t.checked_add_days(Days::new(u64::from(k)))?,
            Self::Week => t.checked_add_days(Days::new(7))?,
            Self::Month(k) => t.checked_add_months(Months::new(k))?,
            Self::Year(k) => t.with_year(t.year() + k)?,
        };
        self.floor(stepped)
    }
}

const LADDER: [Interval; 18] = [
    Interval::Second(1),
    Interval::Second(5),
    Interval::Second(15),
    Interval::Second(30),
    Interval::Minute(1),
    Interval::Minute(5),
    Interval::Minute(15),
    Interval::Minute(30),
    Interval::Hour(1),
    Interval::Hour(3),
    Interval::Hour(6),
    Interval::Hour(12),
    Interval::Day(1),
    Interval::Day(2),
    Interval::Week,
    Interval::Month(1),
    Interval::Month(3),
    Interval::Year(1),
];

fn choose_interval(span: f64, count: usize) -> Option<Interval> {
    let target = span / count as f64;
    let i = LADDER.partition_point(|iv| iv.approx_ms() <= target);
    if i == 0 {
        return None;
    }
    if i == LADDER.len() {
        let years = crate::scale::tick_step(0.0, span / YEAR, count).max(1.0);
        #[allow(
            clippy::cast_possible_truncation,
            reason = "year steps are small positive integers"
        )]
        return Some(Interval::Year(years.min(10_000.0) as i32));
    }
    let below = LADDER[i - 1];
    let above = LADDER[i];
    Some(if target / below.approx_ms() < above.approx_ms() / target {
        below
    } else {
        above
    })
}

/// Calendar-aligned tick timestamps inside `[a, b]`.
pub fn time_ticks(a: f64, b: f64, count: usize) -> Vec<f64> {
    if count == 0 || !a.is_finite() || !b.is_finite() {
        return Vec::new();
    }
    let (min, max) = if a <= b { (a, b) } else { (b, a) };
    if min == max {
        return vec![min];
    }
    let Some(interval) = choose_interval(max - min, count) else {
        // Sub-second spans fall back to plain numeric ticks.
        return crate::scale::ScaleLinear::new((min, max), (0.0, 1.0)).ticks(count);
    };
    let (Some(start), Some(end)) = (from_ms(min), from_ms(max)) else {
        return Vec::new();
    };
    let Some(mut t) = interval.floor(start) else {
        return Vec::new();
    };
    let mut out = Vec::new();
    if t < start {
        match interval.next(t) {
            Some(n) => t = n,
            None => return out,
        }
    }
    while t <= end && out.len() < 10_000 {
        out.push(to_ms(t));
        match interval.next(t) {
            Some(n) if n > t => t = n,
            _ => break,
        }
    }
    out
}

/// Formats a tick by its most significant non-zero calendar field.
pub fn format_time_tick(ms: f64) -> String {
    let Some(t) = from_ms(ms) else {
        return String::new();
    };
    let pattern = if t.timestamp_subsec_millis() != 0 {
        ".%3f"
    } else if t.second() != 0 {
        ":%S"
    } else if t.minute() != 0 {
        "%I:%M"
    } else if t.hour() != 0 {
        "%I %p"
    } else if t.day() != 1 {
        if t.weekday() == chrono::Weekday::Sun {
            "%b %d"
        } else {
            "%a %d"
        }
    } else if t.month() != 1 {
        "%B"
    } else {
        "%Y"
    };
    t.format(pattern).to_string()
}

/// Formats epoch milliseconds with a `strftime` pattern.
pub fn format_time(ms: f64, pattern: &str) -> String {
    from_ms(ms)
        .map(|t| t.format(pattern).to_string())
        .unwrap_or_default()
}
