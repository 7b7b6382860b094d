// Copyright 2026 the Charta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vertical grouped column charts.

use kurbo::Rect;
use serde::{Deserialize, Serialize};

use charta_core::{Element, Record, TransitionFrom};

use crate::axis::{AxisOptions, Orientation, draw_axis};
use crate::axis_config::{AxisConfig, AxisDisplay, AxisLocation, DEFAULT_TICKS};
use crate::bar_chart::BarSeries;
use crate::chart::{
    Chart, ChartBase, ChartProps, ReferenceLine, animate, categories, classes,
    draw_horizontal_reference, joined_label, listing_html, shared_domain,
};
use crate::error::ChartResult;
use crate::layout::Margin;
use crate::scale::{ScaleBand, ScaleLinear};
use crate::tooltip::TooltipConfig;

/// Column chart settings.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ColumnConfig {
    /// Category axis.
    pub x: AxisConfig,
    /// Value series, drawn side by side within each band.
    pub y: Vec<BarSeries>,
    /// Horizontal reference lines on the value axis.
    pub reference_lines: Vec<ReferenceLine>,
    /// Use the largest value as the tick count when it is below ten, so ticks land on integers.
    pub whole_numbers: bool,
}

impl ColumnConfig {
    /// Columns for `series` over the categories in `category_key`.
    pub fn new(category_key: impl Into<String>, series: Vec<BarSeries>) -> Self {
        Self {
            x: AxisConfig::new(category_key),
            y: series,
            ..Self::default()
        }
    }

    /// Adds a reference line.
    pub fn with_reference_line(mut self, line: ReferenceLine) -> Self {
        self.reference_lines.push(line);
        self
    }

    /// Turns on integer ticks for small values.
    pub fn with_whole_numbers(mut self) -> Self {
        self.whole_numbers = true;
        self
    }

    fn validate(&self) -> ChartResult<()> {
        self.x.validate()?;
        self.y.iter().try_for_each(|s| s.axis.validate())
    }
}

/// Columns, one group per category and one column per series.
#[derive(Debug)]
pub struct ColumnChart {
    base: ChartBase,
    config: ColumnConfig,
    value_scale: Option<ScaleLinear>,
}

impl ColumnChart {
    /// Creates a column chart.
    pub fn new(props: ChartProps, config: ColumnConfig, tooltip: Option<TooltipConfig>) -> ChartResult<Self> {
        props.validate()?;
        config.validate()?;
        let html = listing_html(
            config.x.key.clone(),
            config.y.iter().map(|s| s.axis.key.clone()).collect(),
        );
        Ok(Self {
            base: ChartBase::new(props, tooltip, Some(html), "column-chart"),
            config,
            value_scale: None,
        })
    }

    /// The value scale of the last render.
    pub fn value_scale(&self) -> Option<ScaleLinear> {
        self.value_scale
    }
}

impl Chart for ColumnChart {
    type Data = [Record];

    fn base(&self) -> &ChartBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ChartBase {
        &mut self.base
    }

    fn render(&mut self, data: &[Record]) {
        let g = self.base.begin(data);
        let cfg = &self.config;
        let frame = self.base.frame(Margin::uniform(40.0));
        let plot = frame.plot_rect();
        let x = ScaleBand::new(categories(&cfg.x, data), (plot.x0, plot.x1))
            .with_padding(frame.padding.bar_or(0.2));
        let domain = shared_domain(cfg.y.iter().map(|s| &s.axis), data, false);
        let y = ScaleLinear::new(domain, (plot.y1, plot.y0));
        let baseline = y.map(0.0_f64.clamp(domain.0.min(domain.1), domain.0.max(domain.1)));

        let ticks = cfg.y.first().and_then(|s| s.axis.axis.ticks).or_else(|| {
            #[allow(
                clippy::cast_possible_truncation,
                clippy::cast_sign_loss,
                reason = "only taken for maxima in (0, 10)"
            )]
            let small = (cfg.whole_numbers && domain.1 > 0.0 && domain.1 < 10.0)
                .then(|| domain.1.ceil() as usize);
            small.or(Some(DEFAULT_TICKS))
        });
        let y_axis = AxisConfig {
            key: cfg.y.first().map(|s| s.axis.key.clone()).unwrap_or_default(),
            axis: AxisDisplay {
                location: Some(
                    cfg.y
                        .iter()
                        .find_map(|s| s.axis.location())
                        .unwrap_or(AxisLocation::Left),
                ),
                ticks,
                label: Some(joined_label(cfg.y.iter().map(|s| &s.axis))),
            },
            ..AxisConfig::default()
        };

        let drawing = self.base.props.drawing;
        let surface = &mut self.base.surface;
        #[allow(clippy::cast_precision_loss, reason = "series counts are small")]
        let n = cfg.y.len().max(1) as f64;
        let slot = x.band_width() / n;
        for (i, series) in cfg.y.iter().enumerate() {
            let columns = surface.append(g, Element::Group).id();
            for (j, record) in data.iter().enumerate() {
                let (Some(v), Some(band)) = (
                    series.value(record),
                    cfg.x.category(record).and_then(|c| x.position(&c)),
                ) else {
                    continue;
                };
                #[allow(clippy::cast_precision_loss, reason = "indices are small")]
                let left = band + i as f64 * slot;
                let top = y.map(v);
                let rect = Rect::new(left, top.min(baseline), left + slot, top.max(baseline));
                let from = Element::Rect {
                    rect: Rect::new(rect.x0, baseline, rect.x1, baseline),
                    rx: series.rx,
                };
                let delay = drawing.and_then(|d| d.delay).unwrap_or(0.0);
                #[allow(clippy::cast_precision_loss, reason = "indices are small")]
                let delay = delay * j as f64;
                surface
                    .append(columns, Element::Rect { rect, rx: series.rx })
                    .with_class(classes(&["fill-current", series.axis.class_for(v)]))
                    .with_datum(j)
                    .with_transition(animate(drawing, TransitionFrom::Element(from), delay));
            }
        }

        for line in &cfg.reference_lines {
            let Some(v) = line.y_left else { continue };
            draw_horizontal_reference(
                surface,
                g,
                line,
                y.map(v),
                (frame.margin.left, frame.size.width - frame.margin.right),
                None,
                Some(charta_core::format_number(v)),
            );
        }

        draw_axis(
            surface,
            g,
            &x.into(),
            &cfg.x,
            &AxisOptions::new(Orientation::Horizontal, frame.size, frame.margin, frame.padding),
        );
        draw_axis(
            surface,
            g,
            &y.into(),
            &y_axis,
            &AxisOptions::new(Orientation::Vertical, frame.size, frame.margin, frame.padding),
        );

        self.value_scale = Some(y);
        self.base.finish("column");
    }
}
