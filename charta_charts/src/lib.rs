// Copyright 2026 the Charta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart renderers for `charta_core` surfaces.
//!
//! The crate is built in three layers:
//! - **Scales and axes.** [`AxisConfig`] describes a data field and how it is shown;
//!   [`draw_axis`] turns a scale plus that config into tick, label and connector marks.
//! - **Shared chart state.** Every chart owns a [`ChartBase`]: props, a [`Surface`], and a
//!   [`Tooltip`] controller that follows pointer events over data-bound marks.
//! - **Chart families.** Pie, bar, column, stacked bar, spine, lollipop, line, area, scatter,
//!   range, box, timeline, radar, gauge, ring gauge, bullet, pizza and network charts each
//!   implement [`Chart`]; the ones with a continuous x axis also implement [`Zoomable`].
//!
//! Rendering is synchronous and clears the surface first, so re-rendering with the same data
//! and config produces the same tree. Animations are described, not run: marks carry a
//! [`charta_core::Transition`] and hosts sample the surface over time.
//!
//! Configurations deserialize from camelCase JSON, so fixtures written for a web front end can
//! be loaded as they are.
//!
//! [`Surface`]: charta_core::Surface

mod area_chart;
mod axis;
mod axis_config;
mod bar_chart;
mod box_plot;
mod bullet_chart;
mod chart;
mod column_chart;
mod curve;
mod error;
mod force;
mod format;
mod layout;
mod line_chart;
mod linear_gauge;
mod lollipop_chart;
mod network;
mod pie_chart;
mod pizza_chart;
mod radar_chart;
mod range_plot;
mod ring_gauge;
mod scale;
#[cfg(test)]
mod scenario_tests;
mod scatter_plot;
mod speedometer;
mod spine_chart;
mod stacked_bar_chart;
mod time;
mod timeline_chart;
mod tooltip;
mod zoom;

pub use area_chart::{AreaChart, AreaConfig, Stacking};
pub use axis::{AxisGenerator, AxisOptions, AxisOrient, DrawnAxis, Orientation, draw_axis};
pub use axis_config::{
    AxisConfig, AxisDisplay, AxisLocation, Converter, DEFAULT_TICKS, LabelPosition, MissingPolicy,
    ScalingFunction, SeriesConfig, SeriesLabel,
};
pub use bar_chart::{BarChart, BarConfig, BarDirection, BarSeries, CategoryAxis, DataLabel};
pub use box_plot::{BoxConfig, BoxPlot, SummaryAxis};
pub use bullet_chart::{BulletChart, BulletClassNames, BulletConfig};
pub use chart::{Caption, Chart, ChartBase, ChartProps, Drawing, RecordText, ReferenceLine, Zoomable};
pub use column_chart::{ColumnChart, ColumnConfig};
pub use curve::Curve;
pub use error::{ChartError, ChartResult};
pub use force::{ForceLayout, Pin};
pub use format::{format_grouped, format_tick, precision_for_step};
pub use layout::{Frame, Margin, Padding, Size};
pub use line_chart::{LineChart, LineConfig, LineScales};
pub use linear_gauge::{GaugeError, LinearGauge, LinearGaugeConfig};
pub use lollipop_chart::{LollipopChart, LollipopClassNames, LollipopConfig};
pub use network::{DEFAULT_NODE_SIZE, Dragging, EdgeDef, Network, NetworkConfig, NetworkData, NodeDef};
pub use pie_chart::{PieChart, PieConfig, PieLabels, PieSlice, pie_layout};
pub use pizza_chart::{Metric, PizzaChart, PizzaConfig};
pub use radar_chart::{RadarChart, RadarConfig};
pub use range_plot::{DEFAULT_DOT_SIZE, RangeAxis, RangeConfig, RangeMark, RangePlot};
pub use ring_gauge::{RingGauge, RingGaugeConfig, RingLabelPosition, RingLabels};
pub use scale::{AxisScale, ContinuousScale, ScaleBand, ScaleLinear, ScalePoint, ScaleTime, Tick};
pub use scatter_plot::{
    ColorEncoding, Connect, DEFAULT_POINT_SIZE, ScatterConfig, ScatterPlot, ShapeEncoding, SizeEncoding,
};
pub use speedometer::{Region, Speedometer, SpeedometerConfig};
pub use spine_chart::{SpineAxisLocation, SpineChart, SpineConfig, SpineScales, SpineSeries};
pub use stacked_bar_chart::{StackedBarChart, StackedConfig, Waterfall};
pub use time::{TimeFormat, format_time, format_time_tick, time_ticks};
pub use timeline_chart::{
    DEFAULT_EVENT_RADIUS, EventShape, TimelineChart, TimelineConfig, TimelineEvents, TimelineTracks,
};
pub use tooltip::{GUIDE_CLASS, HIDDEN_LEFT, HtmlFn, POINTER_OFFSET, Tooltip, TooltipConfig, TooltipNode};
pub use zoom::{ZoomBehavior, ZoomTransform, Zooming};
