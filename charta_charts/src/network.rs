// Copyright 2026 the Charta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node-link diagrams.
//!
//! Nodes are placed by [`ForceLayout`]; a node coordinate read from the data pins it on a linear
//! scale instead, and a pinned axis with a `location` also gets a drawn axis. Edges are bound
//! to their endpoint records under `source` and `target`, so tooltips can list `source.name`.
//!
//! Nodes and edges carry separate tooltip settings. Rows `0..nodes` of the chart data are the
//! nodes and the rest are the edges that resolved to two known nodes.

use hashbrown::HashMap;
use indexmap::IndexMap;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use charta_core::{Element, NodeId, Paint, Record, Surface, SymbolShape, Transform, TransitionFrom, number_at, text_at};

use crate::axis::{AxisOptions, DrawnAxis, Orientation, draw_axis};
use crate::axis_config::{AxisConfig, extent};
use crate::chart::{Chart, ChartBase, ChartProps, Zoomable, classes, zoom_behavior_for};
use crate::error::ChartResult;
use crate::force::{ForceLayout, Pin};
use crate::layout::Margin;
use crate::scale::ScaleLinear;
use crate::scatter_plot::{ShapeEncoding, SizeEncoding};
use crate::tooltip::TooltipConfig;
use crate::zoom::{ZoomBehavior, ZoomTransform};

/// Symbol area of a node without a size encoding.
pub const DEFAULT_NODE_SIZE: f64 = 64.0;

/// How node records are read.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NodeDef {
    /// Field holding the node id that edges refer to.
    pub id_key: String,
    /// Class of every node.
    pub class_name: Option<String>,
    /// Field selecting an entry of `class_name_map`.
    pub class_name_key: Option<String>,
    /// Category to class.
    pub class_name_map: IndexMap<String, String>,
    /// Symbol area by a field.
    pub size: Option<SizeEncoding>,
    /// Symbol shape by a field.
    pub shape: Option<ShapeEncoding>,
    /// Pins x to a field.
    pub x: Option<AxisConfig>,
    /// Pins y to a field.
    pub y: Option<AxisConfig>,
    /// Tooltip over nodes.
    pub tooltip: Option<TooltipConfig>,
}

impl Default for NodeDef {
    fn default() -> Self {
        Self {
            id_key: "id".to_string(),
            class_name: None,
            class_name_key: None,
            class_name_map: IndexMap::new(),
            size: None,
            shape: None,
            x: None,
            y: None,
            tooltip: None,
        }
    }
}

impl NodeDef {
    /// Nodes identified by `id_key`.
    pub fn new(id_key: impl Into<String>) -> Self {
        Self {
            id_key: id_key.into(),
            ..Self::default()
        }
    }

    /// Classes nodes by the category in `key`.
    pub fn with_class_map<I, K, V>(mut self, key: impl Into<String>, classes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.class_name_key = Some(key.into());
        self.class_name_map = classes.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self
    }

    /// Scales node areas from `min` to `max` over `key`.
    pub fn with_size(mut self, key: impl Into<String>, min: f64, max: f64) -> Self {
        self.size = Some(SizeEncoding {
            key: key.into(),
            min: Some(min),
            max: Some(max),
            default: None,
        });
        self
    }

    /// Pins node positions to fields.
    pub fn with_position(mut self, x: Option<AxisConfig>, y: Option<AxisConfig>) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Enables node tooltips.
    pub fn with_tooltip(mut self, tooltip: TooltipConfig) -> Self {
        self.tooltip = Some(tooltip);
        self
    }

    fn validate(&self) -> ChartResult<()> {
        for axis in self.x.iter().chain(&self.y) {
            axis.validate()?;
        }
        Ok(())
    }

    fn class_of(&self, record: &Record) -> String {
        let mapped = self
            .class_name_key
            .as_ref()
            .and_then(|k| self.class_name_map.get(&text_at(record, k)?))
            .map_or("", String::as_str);
        classes(&["node fill-current stroke-current", self.class_name.as_deref().unwrap_or(""), mapped])
    }

    fn shape_of(&self, record: &Record) -> SymbolShape {
        self.shape
            .as_ref()
            .and_then(|s| SymbolShape::from_name(s.shape_map.get(&text_at(record, &s.key)?)?))
            .unwrap_or(SymbolShape::Circle)
    }
}

/// How edge records are read.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EdgeDef {
    /// Field holding the source node id.
    pub source_key: String,
    /// Field holding the target node id.
    pub target_key: String,
    /// Class of every edge.
    pub class_name: Option<String>,
    /// Field selecting an entry of `class_name_map`.
    pub class_name_key: Option<String>,
    /// Category to class.
    pub class_name_map: IndexMap<String, String>,
    /// Stroke width by a field.
    pub size: Option<SizeEncoding>,
    /// Tooltip over edges.
    pub tooltip: Option<TooltipConfig>,
}

impl Default for EdgeDef {
    fn default() -> Self {
        Self {
            source_key: "source".to_string(),
            target_key: "target".to_string(),
            class_name: None,
            class_name_key: None,
            class_name_map: IndexMap::new(),
            size: None,
            tooltip: None,
        }
    }
}

impl EdgeDef {
    /// Edges from `source_key` to `target_key`.
    pub fn new(source_key: impl Into<String>, target_key: impl Into<String>) -> Self {
        Self {
            source_key: source_key.into(),
            target_key: target_key.into(),
            ..Self::default()
        }
    }

    /// Scales stroke widths from `min` to `max` over `key`; edges without it use `default`.
    pub fn with_size(mut self, key: impl Into<String>, min: f64, max: f64, default: f64) -> Self {
        self.size = Some(SizeEncoding {
            key: key.into(),
            min: Some(min),
            max: Some(max),
            default: Some(default),
        });
        self
    }

    /// Enables edge tooltips.
    pub fn with_tooltip(mut self, tooltip: TooltipConfig) -> Self {
        self.tooltip = Some(tooltip);
        self
    }

    fn class_of(&self, record: &Record) -> String {
        let mapped = self
            .class_name_key
            .as_ref()
            .and_then(|k| self.class_name_map.get(&text_at(record, k)?))
            .map_or("", String::as_str);
        classes(&["edge stroke-current", self.class_name.as_deref().unwrap_or(""), mapped])
    }
}

/// Node dragging.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Dragging {
    /// Nodes follow the pointer.
    pub enabled: bool,
    /// A released node stays where it was dropped instead of returning.
    pub snap_to_new_position: bool,
}

/// Network settings.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NetworkConfig {
    /// Node reading.
    pub node_def: NodeDef,
    /// Edge reading.
    pub edge_def: EdgeDef,
    /// Node dragging.
    pub dragging: Dragging,
}

impl NetworkConfig {
    /// A network with the given node and edge reading.
    pub fn new(node_def: NodeDef, edge_def: EdgeDef) -> Self {
        Self {
            node_def,
            edge_def,
            dragging: Dragging::default(),
        }
    }

    /// Sets dragging.
    pub fn with_dragging(mut self, dragging: Dragging) -> Self {
        self.dragging = dragging;
        self
    }
}

/// Nodes and the edges between them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkData {
    /// Node records.
    pub nodes: Vec<Record>,
    /// Edge records.
    pub edges: Vec<Record>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Target {
    Node,
    Edge,
}

#[derive(Clone, Debug)]
struct Drawn {
    graph: NodeId,
    nodes: Vec<NodeId>,
    edges: Vec<(NodeId, usize, usize)>,
    settled: Vec<Point>,
    positions: Vec<Point>,
    axes: Vec<(DrawnAxis, ScaleLinear, Orientation)>,
}

/// A network diagram.
#[derive(Debug)]
pub struct Network {
    base: ChartBase,
    config: NetworkConfig,
    node_count: usize,
    active: Target,
    drawn: Option<Drawn>,
    zoom: Option<ZoomBehavior>,
}

impl Network {
    /// Creates a network.
    pub fn new(props: ChartProps, config: NetworkConfig) -> ChartResult<Self> {
        props.validate()?;
        config.node_def.validate()?;
        let tooltip = config.node_def.tooltip.clone();
        Ok(Self {
            base: ChartBase::new(props, tooltip, None, "network"),
            config,
            node_count: 0,
            active: Target::Node,
            drawn: None,
            zoom: None,
        })
    }

    /// Node positions of the last render, in graph coordinates.
    pub fn positions(&self) -> &[Point] {
        self.drawn.as_ref().map_or(&[], |d| &d.positions)
    }

    /// Moves node `index` under the pointer at `to`.
    ///
    /// Returns whether the node moved; nothing moves while dragging is disabled.
    pub fn drag_node(&mut self, index: usize, to: Point) -> bool {
        if !self.config.dragging.enabled {
            return false;
        }
        let to = self.zoom.map_or(to, |z| z.transform().invert(to));
        let Some(drawn) = self.drawn.as_mut() else {
            return false;
        };
        let Some(p) = drawn.positions.get_mut(index) else {
            return false;
        };
        *p = to;
        place(&mut self.base.surface, drawn);
        tracing::trace!(index, x = to.x, y = to.y, "node dragged");
        true
    }

    /// Releases node `index`; it returns to its laid-out position unless drops snap.
    pub fn drag_end(&mut self, index: usize) {
        if self.config.dragging.snap_to_new_position {
            return;
        }
        let Some(drawn) = self.drawn.as_mut() else {
            return;
        };
        if let (Some(p), Some(home)) = (drawn.positions.get_mut(index), drawn.settled.get(index)) {
            *p = *home;
            place(&mut self.base.surface, drawn);
        }
    }

    fn activate(&mut self, p: Point) {
        let Some(i) = self.base.datum_index_at(p) else {
            return;
        };
        let target = if i < self.node_count { Target::Node } else { Target::Edge };
        if target != self.active {
            self.active = target;
            let config = match target {
                Target::Node => self.config.node_def.tooltip.clone(),
                Target::Edge => self.config.edge_def.tooltip.clone(),
            };
            self.base.tooltip.set_config(config);
        }
    }
}

/// Moves node symbols and edge endpoints to `drawn.positions`.
fn place(surface: &mut Surface, drawn: &Drawn) {
    for (id, p) in drawn.nodes.iter().zip(&drawn.positions) {
        if let Some(node) = surface.get_mut(*id) {
            node.attrs.transform = Transform::translate(p.x, p.y);
        }
    }
    for (id, s, t) in &drawn.edges {
        if let (Some(node), Some(a), Some(b)) = (surface.get_mut(*id), drawn.positions.get(*s), drawn.positions.get(*t))
        {
            node.element = Element::line(*a, *b);
        }
    }
}

/// A linear scale from the extent of `key` onto `range`, when any node has a value.
fn pin_scale(axis: &AxisConfig, nodes: &[Record], range: (f64, f64)) -> Option<ScaleLinear> {
    let domain = axis.resolve_domain(nodes)?;
    Some(ScaleLinear::new(domain, range))
}

fn size_scale(enc: &SizeEncoding, records: &[Record]) -> Option<ScaleLinear> {
    let (min, max) = (enc.min?, enc.max?);
    let domain = extent(records.iter().filter_map(|r| number_at(r, &enc.key)))?;
    Some(ScaleLinear::new(domain, (min, max)))
}

impl Chart for Network {
    type Data = NetworkData;

    fn base(&self) -> &ChartBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ChartBase {
        &mut self.base
    }

    fn render(&mut self, data: &NetworkData) {
        let cfg = &self.config;
        let nd = &cfg.node_def;
        let ed = &cfg.edge_def;

        let index: HashMap<String, usize> = data
            .nodes
            .iter()
            .enumerate()
            .filter_map(|(i, r)| Some((text_at(r, &nd.id_key)?, i)))
            .collect();
        let mut links = Vec::new();
        let mut rows = data.nodes.clone();
        for (j, edge) in data.edges.iter().enumerate() {
            let ends = text_at(edge, &ed.source_key)
                .and_then(|s| index.get(&s))
                .zip(text_at(edge, &ed.target_key).and_then(|t| index.get(&t)));
            let Some((s, t)) = ends.map(|(s, t)| (*s, *t)) else {
                tracing::debug!(edge = j, "edge with an unknown endpoint skipped");
                continue;
            };
            let mut row = edge.clone();
            row.insert("source".to_string(), Value::Object(data.nodes[s].clone()));
            row.insert("target".to_string(), Value::Object(data.nodes[t].clone()));
            links.push((s, t, row));
        }
        let edge_rows: Vec<Record> = links.iter().map(|(_, _, r)| r.clone()).collect();
        rows.extend(edge_rows.iter().cloned());
        let root = self.base.begin(&rows);
        self.node_count = data.nodes.len();

        let frame = self.base.frame(Margin::new(20.0, 20.0, 30.0, 40.0));
        let (width, height) = (frame.size.width, frame.size.height);
        let m = frame.margin;
        let x_pin = nd.x.as_ref().and_then(|a| pin_scale(a, &data.nodes, (m.left, width - m.right)));
        let y_pin = nd.y.as_ref().and_then(|a| pin_scale(a, &data.nodes, (height - m.bottom, m.top)));
        let pins: Vec<Pin> = data
            .nodes
            .iter()
            .map(|r| Pin {
                x: x_pin.zip(nd.x.as_ref()).and_then(|(s, a)| a.value(r).map(|v| s.map(v))),
                y: y_pin.zip(nd.y.as_ref()).and_then(|(s, a)| a.value(r).map(|v| s.map(v))),
            })
            .collect();
        let pairs: Vec<(usize, usize)> = links.iter().map(|(s, t, _)| (*s, *t)).collect();
        let positions = ForceLayout::default()
            .with_center(Point::new(
                m.left + (width - m.left - m.right) / 2.0,
                m.top + (height - m.top - m.bottom) / 2.0,
            ))
            .run(&pins, &pairs);

        let fade = self.base.transition(TransitionFrom::Opacity(0.0), 0.0);
        let surface = &mut self.base.surface;
        let mut axes = Vec::new();
        for (axis, scale, orientation) in [
            (nd.x.as_ref(), x_pin, Orientation::Horizontal),
            (nd.y.as_ref(), y_pin, Orientation::Vertical),
        ] {
            let (Some(axis), Some(scale)) = (axis, scale) else {
                continue;
            };
            if axis.location().is_none() {
                continue;
            }
            let drawn = draw_axis(
                surface,
                root,
                &scale.into(),
                axis,
                &AxisOptions::new(orientation, frame.size, m, frame.padding),
            );
            axes.push((drawn, scale, orientation));
        }

        let graph = surface.append(root, Element::Group).with_class("network").id();
        let edges_g = surface.append(graph, Element::Group).with_class("edges").id();
        let nodes_g = surface.append(graph, Element::Group).with_class("nodes").id();

        let edge_width = ed.size.as_ref().and_then(|enc| size_scale(enc, &edge_rows));
        let mut edges = Vec::new();
        for (k, (s, t, row)) in links.iter().enumerate() {
            let width = match (&ed.size, edge_width) {
                (Some(enc), Some(scale)) => number_at(row, &enc.key)
                    .map_or(enc.default.unwrap_or(1.0), |v| scale.map(v)),
                (Some(enc), None) => enc.default.unwrap_or(1.0),
                _ => 1.0,
            };
            let id = surface
                .append(edges_g, Element::line(positions[*s], positions[*t]))
                .with_class(ed.class_of(row))
                .with_stroke(Paint::CurrentColor)
                .with_stroke_width(width)
                .with_datum(self.node_count + k)
                .with_transition(fade.clone())
                .id();
            edges.push((id, *s, *t));
        }

        let node_size = nd.size.as_ref().and_then(|enc| size_scale(enc, &data.nodes));
        let mut nodes = Vec::new();
        for (i, (record, p)) in data.nodes.iter().zip(&positions).enumerate() {
            let size = match (&nd.size, node_size) {
                (Some(enc), Some(scale)) => {
                    number_at(record, &enc.key).map_or(DEFAULT_NODE_SIZE, |v| scale.map(v))
                }
                (Some(enc), None) => enc.default.unwrap_or(DEFAULT_NODE_SIZE),
                _ => DEFAULT_NODE_SIZE,
            };
            let mut node = surface
                .append(nodes_g, Element::symbol(nd.shape_of(record), size))
                .with_class(nd.class_of(record))
                .with_fill(Paint::CurrentColor)
                .with_transform(Transform::translate(p.x, p.y))
                .with_datum(i)
                .with_transition(fade.clone());
            if let Some(id) = text_at(record, &nd.id_key) {
                node = node.with_test_id(id);
            }
            nodes.push(node.id());
        }

        let previous = self.zoom.map(|z| z.transform());
        self.zoom = zoom_behavior_for(&self.base.props, &frame);
        self.drawn = Some(Drawn {
            graph,
            nodes,
            edges,
            settled: positions.clone(),
            positions,
            axes,
        });
        if let (Some(t), Some(z)) = (previous, self.zoom.as_mut()) {
            let t = z.transform_to(t);
            if t != ZoomTransform::IDENTITY {
                self.apply_zoom(t);
            }
        }
        self.base.finish("network");
    }

    fn pointer_over(&mut self, p: Point) {
        self.activate(p);
        self.base.pointer_over(p);
    }

    fn pointer_move(&mut self, p: Point) {
        self.activate(p);
        self.base.pointer_move(p);
    }
}

impl Zoomable for Network {
    fn zoom_behavior(&mut self) -> Option<&mut ZoomBehavior> {
        self.zoom.as_mut()
    }

    fn apply_zoom(&mut self, transform: ZoomTransform) {
        let Some(drawn) = self.drawn.as_ref() else {
            return;
        };
        let surface = &mut self.base.surface;
        if let Some(g) = surface.get_mut(drawn.graph) {
            g.attrs.transform = Transform::translate(transform.x, transform.y).with_scale(transform.k, transform.k);
        }
        for (axis, scale, orientation) in &drawn.axes {
            let scale = match orientation {
                Orientation::Horizontal => scale.rescale_range(|r| transform.apply_x(r)),
                Orientation::Vertical => scale.rescale_range(|r| transform.apply_y(r)),
            };
            axis.redraw(surface, &scale.into());
        }
    }
}

#[cfg(test)]
mod tests {
    use charta_core::record;
    use serde_json::json;

    use super::*;
    use crate::axis_config::AxisLocation;
    use crate::zoom::Zooming;

    fn data() -> NetworkData {
        NetworkData {
            nodes: vec![
                record([("name", json!("ann")), ("gender", json!("female")), ("age", json!(30)), ("xValue", json!(1))]),
                record([("name", json!("bob")), ("gender", json!("male")), ("age", json!(50)), ("xValue", json!(3))]),
                record([("name", json!("cy")), ("gender", json!("male")), ("age", json!(40)), ("xValue", json!(2))]),
            ],
            edges: vec![
                record([("from", json!("ann")), ("to", json!("bob")), ("value", json!(2))]),
                record([("from", json!("bob")), ("to", json!("cy")), ("value", json!(4))]),
                record([("from", json!("cy")), ("to", json!("nobody"))]),
            ],
        }
    }

    fn network(config: NetworkConfig, props: ChartProps) -> Network {
        let Ok(n) = Network::new(props, config) else {
            panic!("valid config");
        };
        n
    }

    fn defs() -> NetworkConfig {
        NetworkConfig::new(NodeDef::new("name"), EdgeDef::new("from", "to"))
    }

    fn line_of(n: &Network, id: NodeId) -> Option<(Point, Point)> {
        match n.surface().get(id).map(|node| &node.element) {
            Some(Element::Line(l)) => Some((l.p0, l.p1)),
            _ => None,
        }
    }

    #[test]
    fn edges_with_unknown_nodes_are_skipped() {
        let mut n = network(defs(), ChartProps::new("net"));
        n.render(&data());
        let s = n.surface();
        assert_eq!(s.select_class("node").len(), 3);
        assert_eq!(s.select_class("edge").len(), 2);
        assert_eq!(n.base().data().len(), 5);
        assert!(s.find_by_test_id("bob").is_some());
    }

    #[test]
    fn edges_join_their_nodes() {
        let mut n = network(defs(), ChartProps::new("net"));
        n.render(&data());
        let Some(drawn) = n.drawn.as_ref() else {
            panic!("rendered");
        };
        let (id, s, t) = drawn.edges[0];
        assert_eq!(line_of(&n, id), Some((n.positions()[s], n.positions()[t])));
    }

    #[test]
    fn classes_and_sizes_follow_the_encodings() {
        let node_def = NodeDef::new("name")
            .with_class_map("gender", [("male", "fill-blue-800"), ("female", "fill-pink-400")])
            .with_size("age", 40.0, 100.0);
        let edge_def = EdgeDef::new("from", "to").with_size("value", 1.0, 3.0, 1.0);
        let mut n = network(NetworkConfig::new(node_def, edge_def), ChartProps::new("net"));
        n.render(&data());
        let s = n.surface();
        assert_eq!(s.select_class("fill-blue-800").len(), 2);
        let sizes: Vec<f64> = s
            .select_class("node")
            .into_iter()
            .filter_map(|id| match s.get(id).map(|n| &n.element) {
                Some(Element::Symbol(sym)) => Some(sym.size),
                _ => None,
            })
            .collect();
        assert_eq!(sizes, vec![40.0, 100.0, 70.0]);
        let widths: Vec<Option<f64>> =
            s.select_class("edge").into_iter().map(|id| s.get(id).and_then(|n| n.attrs.stroke_width)).collect();
        assert_eq!(widths, vec![Some(1.0), Some(3.0)]);
    }

    #[test]
    fn pinned_x_follows_the_field_and_draws_an_axis() {
        let x = AxisConfig::new("xValue").with_location(AxisLocation::Bottom);
        let cfg = NetworkConfig::new(NodeDef::new("name").with_position(Some(x), None), EdgeDef::new("from", "to"));
        let mut n = network(cfg, ChartProps::new("net"));
        n.render(&data());
        let xs: Vec<f64> = n.positions().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![40.0, 580.0, 310.0]);
        assert!(n.surface().find_by_test_id("x-axis").is_some());
    }

    #[test]
    fn node_and_edge_tooltips_are_separate() {
        let node_def = NodeDef::new("name").with_tooltip(TooltipConfig::new().with_keys(["name"]));
        let edge_def =
            EdgeDef::new("from", "to").with_tooltip(TooltipConfig::new().with_keys(["source.name", "target.name"]));
        let mut n = network(NetworkConfig::new(node_def, edge_def), ChartProps::new("net"));
        n.render(&data());
        let bob = n.positions()[1];
        n.pointer_over(bob);
        assert_eq!(n.tooltip().node().map(|t| t.content.as_str()), Some("name: bob"));

        let (a, b) = (n.positions()[0], n.positions()[1]);
        n.pointer_over(a.midpoint(b));
        assert_eq!(
            n.tooltip().node().map(|t| t.content.as_str()),
            Some("source.name: ann<br/>target.name: bob")
        );
    }

    #[test]
    fn dragging_moves_a_node_and_its_edges() {
        let cfg = defs().with_dragging(Dragging {
            enabled: true,
            snap_to_new_position: false,
        });
        let mut n = network(cfg, ChartProps::new("net"));
        n.render(&data());
        let home = n.positions()[0];
        assert!(n.drag_node(0, Point::new(10.0, 10.0)));
        let Some((id, _, _)) = n.drawn.as_ref().map(|d| d.edges[0]) else {
            panic!("rendered");
        };
        assert_eq!(line_of(&n, id).map(|(p0, _)| p0), Some(Point::new(10.0, 10.0)));
        n.drag_end(0);
        assert_eq!(n.positions()[0], home);
    }

    #[test]
    fn dragging_is_off_by_default() {
        let mut n = network(defs(), ChartProps::new("net"));
        n.render(&data());
        assert!(!n.drag_node(0, Point::new(10.0, 10.0)));
    }

    #[test]
    fn zoom_scales_the_graph_group() {
        let props = ChartProps::new("net").with_zooming(Zooming::enabled());
        let mut n = network(defs(), props);
        n.render(&data());
        n.zoom_to(ZoomTransform::new(2.0, -100.0, -50.0));
        let s = n.surface();
        let Some(graph) = s.select_class("network").first().and_then(|id| s.get(*id)) else {
            panic!("graph group drawn");
        };
        assert_eq!(graph.attrs.transform, Transform::translate(-100.0, -50.0).with_scale(2.0, 2.0));
    }

    #[test]
    fn network_config_reads_camel_case_json() {
        let Ok(cfg) = serde_json::from_str::<NetworkConfig>(
            r#"{"nodeDef":{"idKey":"name","shape":{"key":"isMarried","map":{"yes":"square"}}},
                "edgeDef":{"sourceKey":"from","targetKey":"to","tooltip":{}},
                "dragging":{"enabled":true,"snapToNewPosition":true}}"#,
        ) else {
            panic!("valid json");
        };
        assert_eq!(cfg.node_def.id_key, "name");
        assert_eq!(cfg.node_def.shape.map(|s| s.shape_map.len()), Some(1));
        assert!(cfg.edge_def.tooltip.is_some());
        assert!(cfg.dragging.snap_to_new_position);
    }
}
