// Copyright 2026 the Charta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Timelines: point and span events laid out on tracks.

use indexmap::{IndexMap, IndexSet};
use kurbo::{Circle, Rect};
use serde::{Deserialize, Serialize};

use charta_core::{Element, Paint, Record, number_at, text_at, value_at};

use crate::axis::{AxisOptions, Orientation, draw_axis};
use crate::axis_config::{AxisConfig, extent};
use crate::chart::{Chart, ChartBase, ChartProps, classes};
use crate::error::ChartResult;
use crate::layout::Margin;
use crate::scale::{AxisScale, ScaleBand, ScaleLinear, ScaleTime};

/// Default circle radius.
pub const DEFAULT_EVENT_RADIUS: f64 = 5.0;

/// Track used when events have no track field.
const SINGLE_TRACK: &str = "1";

/// How an event is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventShape {
    /// A dot at the start.
    Circle,
    /// A bar from start to end.
    Rect,
    /// A tick across the track at the start.
    Line,
}

/// Which fields describe an event.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimelineEvents {
    /// Start field; its scaling decides between a time and a numeric axis.
    #[serde(flatten)]
    pub start: AxisConfig,
    /// End field for spans.
    pub end_key: Option<String>,
    /// Field looked up in `shape_mapping`.
    pub shape_key: Option<String>,
    /// Shape per value of `shape_key`.
    pub shape_mapping: IndexMap<String, EventShape>,
    /// Field looked up in `class_name_mapping`.
    pub class_name_key: Option<String>,
    /// Class per value of `class_name_key`.
    pub class_name_mapping: IndexMap<String, String>,
    /// Field holding circle radii.
    pub size_key: Option<String>,
}

impl Default for TimelineEvents {
    fn default() -> Self {
        Self::new(AxisConfig::new("start"))
    }
}

impl TimelineEvents {
    /// Events starting at `start`.
    pub fn new(start: AxisConfig) -> Self {
        Self {
            start,
            end_key: None,
            shape_key: None,
            shape_mapping: IndexMap::new(),
            class_name_key: None,
            class_name_mapping: IndexMap::new(),
            size_key: None,
        }
    }

    /// Turns events into spans ending at `key`.
    pub fn with_end(mut self, key: impl Into<String>) -> Self {
        self.end_key = Some(key.into());
        self
    }

    /// Picks shapes by `key`.
    pub fn with_shapes<I, K>(mut self, key: impl Into<String>, shapes: I) -> Self
    where
        I: IntoIterator<Item = (K, EventShape)>,
        K: Into<String>,
    {
        self.shape_key = Some(key.into());
        self.shape_mapping = shapes.into_iter().map(|(k, v)| (k.into(), v)).collect();
        self
    }

    /// Picks classes by `key`.
    pub fn with_classes<I, K, V>(mut self, key: impl Into<String>, classes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.class_name_key = Some(key.into());
        self.class_name_mapping = classes.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self
    }

    fn end(&self, record: &Record) -> Option<f64> {
        let key = self.end_key.as_deref()?;
        value_at(record, key).and_then(|v| self.start.value_of(v))
    }

    fn shape(&self, record: &Record) -> EventShape {
        let mapped = self
            .shape_key
            .as_deref()
            .and_then(|k| text_at(record, k))
            .and_then(|v| self.shape_mapping.get(&v).copied());
        match (mapped, &self.end_key) {
            (Some(shape), _) => shape,
            (None, Some(_)) => EventShape::Rect,
            (None, None) => EventShape::Circle,
        }
    }

    fn class(&self, record: &Record) -> &str {
        self.class_name_key
            .as_deref()
            .and_then(|k| text_at(record, k))
            .and_then(|v| self.class_name_mapping.get(&v))
            .map_or("", String::as_str)
    }
}

/// The track axis of a timeline.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimelineTracks {
    /// Field naming each event's track; one shared track when unset.
    pub key: Option<String>,
    /// Class of every track background.
    pub class_name: Option<String>,
}

/// Timeline settings.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimelineConfig {
    /// Track axis.
    pub y: TimelineTracks,
    /// Event fields.
    pub events: TimelineEvents,
}

impl TimelineConfig {
    /// A timeline of `events` on one track.
    pub fn new(events: TimelineEvents) -> Self {
        Self {
            y: TimelineTracks::default(),
            events,
        }
    }

    /// Splits events into tracks by `key`.
    pub fn with_tracks(mut self, key: impl Into<String>) -> Self {
        self.y.key = Some(key.into());
        self
    }
}

/// A timeline.
#[derive(Debug)]
pub struct TimelineChart {
    base: ChartBase,
    config: TimelineConfig,
    domain: Option<(f64, f64)>,
}

impl TimelineChart {
    /// Creates a timeline.
    pub fn new(props: ChartProps, config: TimelineConfig) -> ChartResult<Self> {
        props.validate()?;
        config.events.start.validate()?;
        Ok(Self {
            base: ChartBase::new(props, None, None, "timeline-chart"),
            config,
            domain: None,
        })
    }

    /// The time (or value) domain of the last render.
    pub fn domain(&self) -> Option<(f64, f64)> {
        self.domain
    }
}

impl Chart for TimelineChart {
    type Data = [Record];

    fn base(&self) -> &ChartBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ChartBase {
        &mut self.base
    }

    fn render(&mut self, data: &[Record]) {
        let root = self.base.begin(data);
        let cfg = &self.config;
        let ev = &cfg.events;
        // Without a start field only the tracks and the axis are drawn.
        let rows = if ev.start.key.is_empty() { &[][..] } else { data };
        let frame = self.base.frame(Margin::uniform(20.0));
        let plot = frame.plot_rect();

        let starts = rows.iter().filter_map(|r| ev.start.value(r));
        let ends = rows.iter().filter_map(|r| ev.end(r));
        let inferred = extent(starts.chain(ends));
        let domain = (
            ev.start.start.or(inferred.map(|e| e.0)).unwrap_or(0.0),
            ev.start.end.or(inferred.map(|e| e.1)).unwrap_or(1.0),
        );
        let x = ScaleLinear::new(domain, (plot.x0, plot.x1));
        let axis_scale: AxisScale = if ev.start.is_time() {
            ScaleTime::new(domain, (plot.x0, plot.x1)).into()
        } else {
            x.into()
        };

        let track_of = |r: &Record| match &cfg.y.key {
            Some(k) => text_at(r, k),
            None => Some(SINGLE_TRACK.to_string()),
        };
        let tracks: Vec<String> = data.iter().filter_map(track_of).collect::<IndexSet<_>>().into_iter().collect();
        let bands = ScaleBand::new(tracks, (plot.y0, plot.y1)).with_padding(frame.padding.bar_or(0.1));
        let bw = bands.band_width();

        let surface = &mut self.base.surface;
        let backdrop = surface.append(root, Element::Group).with_class("tracks").id();
        for track in bands.domain() {
            let Some(y) = bands.position(track) else {
                continue;
            };
            surface
                .append(backdrop, Element::rect(Rect::new(plot.x0, y, plot.x1, y + bw)))
                .with_class(classes(&["track", cfg.y.class_name.as_deref().unwrap_or("")]));
        }

        let events = surface.append(root, Element::Group).with_class("events").id();
        for (j, record) in rows.iter().enumerate() {
            let (Some(start), Some(y)) = (
                ev.start.value(record),
                track_of(record).and_then(|t| bands.position(&t)),
            ) else {
                tracing::debug!(index = j, "timeline event without start or track skipped");
                continue;
            };
            let x0 = x.map(start);
            let element = match ev.shape(record) {
                EventShape::Rect => {
                    let x1 = ev.end(record).map_or(x0, |e| x.map(e));
                    Element::rect(Rect::new(x0.min(x1), y + bw / 4.0, x0.max(x1), y + bw * 3.0 / 4.0))
                }
                EventShape::Circle => {
                    let r = ev
                        .size_key
                        .as_deref()
                        .and_then(|k| number_at(record, k))
                        .unwrap_or(DEFAULT_EVENT_RADIUS);
                    Element::Circle(Circle::new((x0, y + bw / 2.0), r.max(0.0)))
                }
                EventShape::Line => Element::line((x0, y), (x0, y + bw)),
            };
            surface
                .append(events, element)
                .with_class(classes(&["event fill-current stroke-current", ev.class(record)]))
                .with_fill(Paint::CurrentColor)
                .with_datum(j);
        }

        draw_axis(
            surface,
            root,
            &axis_scale,
            &ev.start,
            &AxisOptions::new(Orientation::Horizontal, frame.size, frame.margin, frame.padding),
        );

        self.domain = Some(domain);
        self.base.finish("timeline");
    }
}

#[cfg(test)]
mod tests {
    use charta_core::record;
    use serde_json::json;

    use super::*;
    use crate::time::TimeFormat;

    fn chart(config: TimelineConfig) -> TimelineChart {
        let Ok(c) = TimelineChart::new(ChartProps::new("timeline"), config) else {
            panic!("valid config");
        };
        c
    }

    fn events(c: &TimelineChart) -> Vec<Element> {
        let s = c.surface();
        s.select_class("event")
            .into_iter()
            .filter_map(|id| s.get(id).map(|n| n.element.clone()))
            .collect()
    }

    #[test]
    fn spans_run_from_start_to_end() {
        let rows = vec![
            record([("start", json!(0)), ("end", json!(50))]),
            record([("start", json!(25)), ("end", json!(100))]),
        ];
        let mut c = chart(TimelineConfig::new(TimelineEvents::default().with_end("end")));
        c.render(&rows);
        assert_eq!(c.domain(), Some((0.0, 100.0)), "domain covers the latest end");
        let events = events(&c);
        let [Element::Rect { rect: a, .. }, Element::Rect { rect: b, .. }] = events.as_slice() else {
            panic!("two spans drawn");
        };
        assert!((a.x0 - 20.0).abs() < 1e-9, "first span starts at the plot edge");
        assert!((b.x1 - 580.0).abs() < 1e-9, "last span ends at the plot edge");
        assert!((a.width() - 280.0).abs() < 1e-9, "half the domain is half the width");
    }

    #[test]
    fn point_events_are_circles_sized_by_field() {
        let rows = vec![
            record([("start", json!(1)), ("r", json!(8))]),
            record([("start", json!(2))]),
        ];
        let events_cfg = TimelineEvents {
            size_key: Some("r".into()),
            ..TimelineEvents::default()
        };
        let mut c = chart(TimelineConfig::new(events_cfg));
        c.render(&rows);
        let radii: Vec<f64> = events(&c)
            .iter()
            .filter_map(|e| match e {
                Element::Circle(circle) => Some(circle.radius),
                _ => None,
            })
            .collect();
        assert_eq!(radii, vec![8.0, DEFAULT_EVENT_RADIUS]);
    }

    #[test]
    fn tracks_split_by_field_and_shapes_by_mapping() {
        let rows = vec![
            record([("start", json!(1)), ("who", json!("ann")), ("kind", json!("tick"))]),
            record([("start", json!(2)), ("who", json!("bob")), ("kind", json!("dot"))]),
            record([("start", json!(3)), ("who", json!("ann")), ("kind", json!("dot"))]),
        ];
        let events_cfg = TimelineEvents::default()
            .with_shapes("kind", [("tick", EventShape::Line), ("dot", EventShape::Circle)])
            .with_classes("who", [("ann", "text-red-500")]);
        let mut c = chart(TimelineConfig::new(events_cfg).with_tracks("who"));
        c.render(&rows);
        let s = c.surface();
        assert_eq!(s.select_class("track").len(), 2, "one track per distinct value");
        assert_eq!(s.select_class("text-red-500").len(), 2, "mapped classes");
        assert!(matches!(events(&c)[0], Element::Line(_)), "mapped shape");
    }

    #[test]
    fn time_axes_parse_dates() {
        let rows = vec![
            record([("start", json!("2024-01-01"))]),
            record([("start", json!("2024-01-11"))]),
        ];
        let start = AxisConfig::new("start").with_time(TimeFormat::default());
        let mut c = chart(TimelineConfig::new(TimelineEvents::new(start)));
        c.render(&rows);
        let Some((a, b)) = c.domain() else {
            panic!("rendered");
        };
        assert_eq!(b - a, 10.0 * 86_400_000.0, "ten days apart");
        assert!(c.surface().find_by_test_id("x-axis").is_some(), "time axis drawn");
    }

    #[test]
    fn empty_start_key_draws_only_the_shell() {
        let rows = vec![record([("start", json!(1))]), record([("start", json!(2))])];
        let mut c = chart(TimelineConfig::new(TimelineEvents::new(AxisConfig::new(""))));
        c.render(&rows);
        let s = c.surface();
        assert!(events(&c).is_empty(), "no events without a start field");
        assert_eq!(s.select_class("track").len(), 1, "the single track is still drawn");
        assert!(s.find_by_test_id("x-axis").is_some(), "axis drawn");
        assert_eq!(c.domain(), Some((0.0, 1.0)), "default domain");
    }
}
