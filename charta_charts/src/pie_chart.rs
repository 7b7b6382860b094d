// Copyright 2026 the Charta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pie and donut charts.

use core::f64::consts::PI;
use std::fmt;
use std::sync::Arc;

use hashbrown::HashMap;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use charta_core::{
    Element, FontSize, Paint, Record, Sector, TextAnchor, TextElement, Transform, TransitionFrom,
    display_value, number_at, text_at,
};

use crate::chart::{Caption, Chart, ChartBase, ChartProps, RecordText, classes};
use crate::error::ChartResult;
use crate::layout::Margin;
use crate::tooltip::{HtmlFn, TooltipConfig};

/// Arc label settings.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PieLabels {
    /// Label radius as a fraction of the pie radius; labels are drawn only when set.
    pub radius: Option<f64>,
    /// Label text; defaults to the slice name.
    #[serde(skip)]
    pub text: Option<RecordText>,
    /// Class of every label.
    pub class_name: Option<String>,
    /// Extra class per slice name.
    pub class_name_map: IndexMap<String, String>,
}

impl fmt::Debug for PieLabels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PieLabels")
            .field("radius", &self.radius)
            .field("text", &self.text.as_ref().map(|_| "<fn>"))
            .field("class_name", &self.class_name)
            .field("class_name_map", &self.class_name_map)
            .finish()
    }
}

/// Pie chart settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PieConfig {
    /// Field naming each slice.
    pub name_key: String,
    /// Field holding each slice's value.
    pub value_key: String,
    /// Extra class per slice name.
    pub class_name_map: IndexMap<String, String>,
    /// Gap between slices, in degrees.
    pub padding_angle: f64,
    /// Slice corner rounding.
    pub corner_radius: f64,
    /// Start angle in degrees, clockwise from twelve o'clock.
    pub start_angle: f64,
    /// End angle in degrees; defaults to a full turn after the start.
    pub end_angle: Option<f64>,
    /// Inner radius as a fraction of the pie radius; records may override with `innerRadius`.
    pub inner_radius: f64,
    /// Outer radius as a fraction of the pie radius; records may override with `outerRadius`.
    pub outer_radius: f64,
    /// Arc labels.
    pub labels: Option<PieLabels>,
    /// Centered title.
    pub title: Option<Caption>,
    /// Centered subtitle.
    pub subtitle: Option<Caption>,
    /// Order slices by descending value.
    pub sort: bool,
}

impl Default for PieConfig {
    fn default() -> Self {
        Self {
            name_key: "name".to_string(),
            value_key: "value".to_string(),
            class_name_map: IndexMap::new(),
            padding_angle: 2.0,
            corner_radius: 0.0,
            start_angle: 0.0,
            end_angle: None,
            inner_radius: 0.0,
            outer_radius: 1.0,
            labels: None,
            title: None,
            subtitle: None,
            sort: true,
        }
    }
}

impl PieConfig {
    /// A pie over `value_key`, naming slices by `name`.
    pub fn new(value_key: impl Into<String>) -> Self {
        Self {
            value_key: value_key.into(),
            ..Self::default()
        }
    }

    /// Sets the name field.
    pub fn with_name_key(mut self, key: impl Into<String>) -> Self {
        self.name_key = key.into();
        self
    }

    /// Sets the angular extent in degrees.
    pub fn with_angles(mut self, start: f64, end: f64) -> Self {
        self.start_angle = start;
        self.end_angle = Some(end);
        self
    }

    /// Sets the slice gap in degrees.
    pub fn with_padding_angle(mut self, degrees: f64) -> Self {
        self.padding_angle = degrees;
        self
    }

    /// Turns the pie into a donut.
    pub fn with_inner_radius(mut self, fraction: f64) -> Self {
        self.inner_radius = fraction;
        self
    }

    /// Keeps data order instead of sorting by value.
    pub fn unsorted(mut self) -> Self {
        self.sort = false;
        self
    }

    /// Sets arc labels.
    pub fn with_labels(mut self, labels: PieLabels) -> Self {
        self.labels = Some(labels);
        self
    }

    /// Sets the title.
    pub fn with_title(mut self, title: Caption) -> Self {
        self.title = Some(title);
        self
    }

    /// Sets the subtitle.
    pub fn with_subtitle(mut self, subtitle: Caption) -> Self {
        self.subtitle = Some(subtitle);
        self
    }

    /// Adds a class for one slice.
    pub fn with_slice_class(mut self, name: impl Into<String>, class: impl Into<String>) -> Self {
        self.class_name_map.insert(name.into(), class.into());
        self
    }

    fn end_angle(&self) -> f64 {
        self.end_angle.unwrap_or(self.start_angle + 360.0)
    }
}

/// One laid-out slice.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PieSlice {
    /// Index of the record.
    pub index: usize,
    /// Slice value.
    pub value: f64,
    /// Start angle in radians.
    pub start_angle: f64,
    /// End angle in radians (including the slice's share of padding).
    pub end_angle: f64,
}

/// Lays out slices over `[start, end]` radians.
///
/// Slices are visited in descending value order when `sort` is set, otherwise in input order;
/// each receives `pad` radians plus its share of the remaining sweep. Non-positive values get
/// only their padding. The returned slices are in input order.
pub fn pie_layout(values: &[f64], start: f64, end: f64, pad: f64, sort: bool) -> Vec<PieSlice> {
    let n = values.len();
    if n == 0 {
        return Vec::new();
    }
    let da = (end - start).clamp(-2.0 * PI, 2.0 * PI);
    #[allow(clippy::cast_precision_loss, reason = "slice counts are small")]
    let nf = n as f64;
    let pa = (da.abs() / nf).min(pad.max(0.0));
    let sum: f64 = values.iter().filter(|v| **v > 0.0).sum();
    let k = if sum > 0.0 { (da - nf * pa) / sum } else { 0.0 };

    let mut order: Vec<usize> = (0..n).collect();
    if sort {
        order.sort_by(|a, b| values[*b].total_cmp(&values[*a]));
    }

    let mut slices = vec![
        PieSlice {
            index: 0,
            value: 0.0,
            start_angle: start,
            end_angle: start,
        };
        n
    ];
    let mut a0 = start;
    for j in order {
        let v = values[j];
        let a1 = a0 + (if v > 0.0 { v * k } else { 0.0 }) + pa;
        slices[j] = PieSlice {
            index: j,
            value: v,
            start_angle: a0,
            end_angle: a1,
        };
        a0 = a1;
    }
    slices
}

/// A pie or donut chart.
///
/// Slices animate from the angles they had when the last transition ended (matched by name),
/// or from a zero-width wedge at the start angle for new slices. A render that interrupts a
/// running transition therefore starts from the same angles as the interrupted one.
#[derive(Debug)]
pub struct PieChart {
    base: ChartBase,
    config: PieConfig,
    previous: HashMap<String, (f64, f64)>,
    pending: Option<HashMap<String, (f64, f64)>>,
}

impl PieChart {
    /// Creates a pie chart.
    pub fn new(
        props: ChartProps,
        config: PieConfig,
        tooltip: Option<TooltipConfig>,
    ) -> ChartResult<Self> {
        props.validate()?;
        let name_key = config.name_key.clone();
        let value_key = config.value_key.clone();
        let default_html: HtmlFn = Arc::new(move |d: &Record| {
            format!(
                "{} = {}",
                text_at(d, &name_key).unwrap_or_default(),
                d.get(&value_key).map(display_value).unwrap_or_default()
            )
        });
        Ok(Self {
            base: ChartBase::new(props, tooltip, Some(default_html), "pie-chart"),
            config,
            previous: HashMap::new(),
            pending: None,
        })
    }

    /// Tells the chart `elapsed_ms` have passed since the last render.
    ///
    /// Once every slice transition has ended, the drawn angles become the start of the next
    /// render's transitions.
    pub fn advance(&mut self, elapsed_ms: f64) {
        if self.base.surface().is_settled(elapsed_ms)
            && let Some(drawn) = self.pending.take()
        {
            self.previous = drawn;
        }
    }

    /// The configuration.
    pub fn config(&self) -> &PieConfig {
        &self.config
    }

    fn name_of(&self, record: &Record, index: usize) -> String {
        text_at(record, &self.config.name_key).unwrap_or_else(|| format!("slice-{index}"))
    }
}

impl Chart for PieChart {
    type Data = [Record];

    fn base(&self) -> &ChartBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ChartBase {
        &mut self.base
    }

    fn render(&mut self, data: &[Record]) {
        let g = self.base.begin(data);
        let frame = self.base.frame(Margin::uniform(40.0));
        let (m, p) = (frame.margin, frame.padding);
        let (width, height) = (frame.size.width, frame.size.height);
        let cfg = &self.config;

        let start = cfg.start_angle.to_radians();
        let end = cfg.end_angle().to_radians();
        let semicircle = cfg.end_angle() - cfg.start_angle <= 180.0;
        let area_w = (width - m.left - m.right).max(0.0);
        let area_h = (height - m.top - m.bottom).max(0.0);
        let radius = if semicircle {
            (area_w / 2.0).min(area_h)
        } else {
            (area_w / 2.0).min(area_h / 2.0)
        };
        let center_y = if semicircle {
            height - m.bottom - p.bottom
        } else {
            m.top + p.top + area_h / 2.0
        };

        let values: Vec<f64> = data
            .iter()
            .enumerate()
            .map(|(i, r)| {
                number_at(r, &cfg.value_key).unwrap_or_else(|| {
                    tracing::warn!(index = i, key = %cfg.value_key, "pie record without a value");
                    0.0
                })
            })
            .collect();
        // The layout pads by `degrees / 180` radians while each arc is trimmed by the full angle.
        let layout_pad = cfg.padding_angle / 180.0;
        let pad = cfg.padding_angle.to_radians();
        let slices = pie_layout(&values, start, end, layout_pad, cfg.sort);

        let names: Vec<String> = data
            .iter()
            .enumerate()
            .map(|(i, r)| self.name_of(r, i))
            .collect();
        let sectors: Vec<Sector> = slices
            .iter()
            .map(|s| {
                let record = &data[s.index];
                let inner = number_at(record, "innerRadius").unwrap_or(cfg.inner_radius);
                let outer = number_at(record, "outerRadius").unwrap_or(cfg.outer_radius);
                Sector::new(inner * radius, outer * radius, s.start_angle, s.end_angle)
                    .with_pad_angle(pad)
                    .with_corner_radius(cfg.corner_radius)
            })
            .collect();

        let transitions: Vec<_> = sectors
            .iter()
            .zip(&names)
            .map(|(sector, name)| {
                let (a0, a1) = self.previous.get(name).copied().unwrap_or((start, start));
                let mut from = *sector;
                from.start_angle = a0;
                from.end_angle = a1;
                self.base
                    .transition(TransitionFrom::Element(Element::Sector(from)), 0.0)
            })
            .collect();

        let surface = &mut self.base.surface;
        let slices_g = surface
            .append(g, Element::Group)
            .with_transform(Transform::translate(
                p.left + m.left + area_w / 2.0,
                center_y,
            ))
            .id();
        for (i, ((sector, name), transition)) in
            sectors.iter().zip(&names).zip(transitions).enumerate()
        {
            let extra = cfg.class_name_map.get(name).map_or("", String::as_str);
            surface
                .append(slices_g, Element::Sector(*sector))
                .with_dom_id(name.clone())
                .with_test_id(name.clone())
                .with_class(classes(&["fill-black", extra]))
                .with_datum(i)
                .with_transition(transition);
        }

        if let Some(labels) = &cfg.labels
            && let Some(label_radius) = labels.radius
        {
            let labels_g = surface
                .append(slices_g, Element::Group)
                .with_class("labels")
                .id();
            for (slice, sector) in slices.iter().zip(&sectors) {
                let name = &names[slice.index];
                let mut at = *sector;
                at.inner_radius = radius * label_radius;
                at.outer_radius = radius * label_radius;
                let text = match &labels.text {
                    Some(f) => f(&data[slice.index]),
                    None => name.clone(),
                };
                let class = classes(&[
                    labels.class_name.as_deref().unwrap_or(""),
                    labels.class_name_map.get(name).map_or("", String::as_str),
                    "fill-current",
                ]);
                let c = at.centroid();
                surface
                    .append(
                        labels_g,
                        Element::Text(TextElement::new((0.0, 0.0), text).with_anchor(TextAnchor::Middle)),
                    )
                    .with_transform(Transform::translate(c.x, c.y))
                    .with_class(class)
                    .with_fill(Paint::CurrentColor);
            }
        }

        let captions = [
            (&cfg.title, -10.0, "text-center text-base font-bold", None),
            (
                &cfg.subtitle,
                10.0,
                "text-center text-sm font-normal",
                Some(FontSize::Px(12.0)),
            ),
        ];
        let fade = self.base.transition(TransitionFrom::Opacity(0.0), 0.0);
        for (caption, dy, default_class, font_size) in captions {
            let Some(text) = caption.as_ref().and_then(|c| c.text.clone()) else {
                continue;
            };
            let class = caption
                .as_ref()
                .and_then(|c| c.class_name.clone())
                .unwrap_or_else(|| default_class.to_string());
            let mut el = TextElement::new((width / 2.0, height / 2.0 + dy), text)
                .with_anchor(TextAnchor::Middle);
            if let Some(size) = font_size {
                el = el.with_font_size(size);
            }
            self.base
                .surface
                .append(g, Element::Text(el))
                .with_class(class)
                .with_fill(Paint::CurrentColor)
                .with_opacity(1.0)
                .with_transition(fade.clone());
        }

        let drawn = names
            .into_iter()
            .zip(&slices)
            .map(|(name, s)| (name, (s.start_angle, s.end_angle)))
            .collect();
        if self.base.animates() {
            self.pending = Some(drawn);
        } else {
            self.previous = drawn;
            self.pending = None;
        }
        self.base.finish("pie");
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use charta_core::record;
    use serde_json::json;

    use super::*;

    fn rows(values: &[(&str, f64)]) -> Vec<Record> {
        values
            .iter()
            .map(|(n, v)| record([("name", json!(n)), ("value", json!(v))]))
            .collect()
    }

    fn sectors(chart: &PieChart) -> Vec<Sector> {
        let s = chart.surface();
        s.descendants(s.root())
            .into_iter()
            .filter_map(|id| match s.get(id).map(|n| &n.element) {
                Some(Element::Sector(sector)) => Some(*sector),
                _ => None,
            })
            .collect()
    }

    fn start_of(chart: &PieChart, name: &str) -> Option<Sector> {
        let s = chart.surface();
        let node = s.find_by_test_id(name).and_then(|id| s.get(id))?;
        match node.transition.as_ref().map(|t| &t.from) {
            Some(TransitionFrom::Element(Element::Sector(from))) => Some(*from),
            _ => None,
        }
    }

    #[test]
    fn layout_covers_the_sweep() {
        let slices = pie_layout(&[10.0, 20.0, 30.0], 0.0, 2.0 * PI, 0.0, true);
        let total: f64 = slices.iter().map(|s| s.end_angle - s.start_angle).sum();
        assert_relative_eq!(total, 2.0 * PI, epsilon = 1e-12);
        assert_relative_eq!(slices[2].start_angle, 0.0);
        assert!(slices[1].start_angle < slices[0].start_angle, "20 comes before 10");
    }

    #[test]
    fn unsorted_layout_keeps_input_order() {
        let slices = pie_layout(&[10.0, 20.0, 30.0], 0.0, 2.0 * PI, 0.0, false);
        assert_relative_eq!(slices[0].start_angle, 0.0);
        assert!(slices[0].end_angle <= slices[1].start_angle + 1e-12);
    }

    #[test]
    fn padding_is_shared_evenly() {
        let slices = pie_layout(&[1.0, 1.0], 0.0, 2.0 * PI, 0.1, false);
        assert_relative_eq!(slices[0].end_angle - slices[0].start_angle, PI, epsilon = 1e-12);
    }

    #[test]
    fn rerender_starts_from_previous_angles() {
        let props = ChartProps::new("pie").with_drawing(crate::chart::Drawing::new(300.0));
        let Ok(mut chart) = PieChart::new(props, PieConfig::new("value"), None) else {
            panic!("valid props");
        };
        chart.render(&rows(&[("a", 1.0), ("b", 1.0)]));
        let first = sectors(&chart);
        chart.advance(300.0);
        chart.render(&rows(&[("a", 3.0), ("b", 1.0)]));
        let Some(from) = start_of(&chart, "a") else {
            panic!("slice a animates");
        };
        assert_relative_eq!(from.end_angle, first[0].end_angle);
    }

    #[test]
    fn interrupted_transition_keeps_its_start() {
        let props = ChartProps::new("pie").with_drawing(crate::chart::Drawing::new(300.0));
        let Ok(mut chart) = PieChart::new(props, PieConfig::new("value"), None) else {
            panic!("valid props");
        };
        chart.render(&rows(&[("a", 1.0), ("b", 1.0)]));
        chart.advance(100.0);
        chart.render(&rows(&[("a", 3.0), ("b", 1.0)]));
        let Some(from) = start_of(&chart, "a") else {
            panic!("slice a animates");
        };
        assert_eq!((from.start_angle, from.end_angle), (0.0, 0.0), "first transition never ended");
    }

    #[test]
    fn layout_padding_is_a_fraction_of_the_arc_padding() {
        let cfg = PieConfig::new("value").unsorted().with_padding_angle(18.0);
        let Ok(mut chart) = PieChart::new(ChartProps::new("pie"), cfg, None) else {
            panic!("valid props");
        };
        chart.render(&rows(&[("a", 1.0), ("b", 3.0)]));
        let first = sectors(&chart)[0];
        assert_relative_eq!(first.pad_angle, 18.0_f64.to_radians(), epsilon = 1e-12);
        // 0.1 rad of layout padding per slice, the rest shared by value.
        let share = (2.0 * PI - 0.2) / 4.0;
        assert_relative_eq!(first.sweep(), share + 0.1, epsilon = 1e-12);
    }

    #[test]
    fn labels_follow_their_own_record() {
        let cfg = PieConfig::new("value").unsorted().with_labels(PieLabels {
            radius: Some(0.8),
            text: Some(Arc::new(|r| display_value(&r["value"]))),
            ..PieLabels::default()
        });
        let Ok(mut chart) = PieChart::new(ChartProps::new("pie"), cfg, None) else {
            panic!("valid props");
        };
        chart.render(&rows(&[("twin", 1.0), ("twin", 2.0)]));
        let s = chart.surface();
        let texts: Vec<String> = s
            .select_class("fill-current")
            .into_iter()
            .filter_map(|id| match s.get(id).map(|n| &n.element) {
                Some(Element::Text(t)) => Some(t.text.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec!["1", "2"]);
    }

    #[test]
    fn semicircle_sits_on_the_bottom_margin() {
        let props = ChartProps::new("pie").with_size(200.0, 200.0);
        let Ok(mut chart) = PieChart::new(props, PieConfig::new("value").with_angles(-90.0, 90.0), None)
        else {
            panic!("valid props");
        };
        chart.render(&rows(&[("a", 1.0)]));
        let s = chart.surface();
        let group = s
            .find_by_test_id("a")
            .and_then(|id| s.get(id))
            .and_then(|n| n.parent());
        let y = group.and_then(|g| s.get(g)).map(|n| n.attrs.transform.translate.y);
        assert_eq!(y, Some(160.0));
    }

    #[test]
    fn labels_and_titles_are_drawn() {
        let cfg = PieConfig::new("value")
            .with_labels(PieLabels {
                radius: Some(0.8),
                text: Some(Arc::new(|r| format!("{}!", display_value(&r["name"])))),
                ..PieLabels::default()
            })
            .with_title(Caption::new("Total"));
        let Ok(mut chart) = PieChart::new(ChartProps::new("pie"), cfg, None) else {
            panic!("valid props");
        };
        chart.render(&rows(&[("a", 1.0), ("b", 2.0)]));
        let svg = chart.to_svg();
        assert!(svg.contains("a!"));
        assert!(svg.contains("Total"));
    }
}
