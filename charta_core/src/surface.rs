// Copyright 2026 the Charta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The retained drawing surface.
//!
//! A [`Surface`] is an arena of [`Node`]s forming a single tree under a root
//! group. Each chart instance owns exactly one surface and rebuilds it from
//! scratch on every render.

use hashbrown::HashMap;
use kurbo::{Affine, Point};
use smallvec::SmallVec;

use crate::element::{Element, Transform};
use crate::node::{Attrs, Node, NodeId, Paint};
use crate::transition::{Transition, TransitionFrom};

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// A retained tree of drawable nodes, tagged with a caller-supplied id.
#[derive(Clone, Debug)]
pub struct Surface {
    id: String,
    width: f64,
    height: f64,
    class: String,
    test_id: Option<String>,
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: NodeId,
    dom_ids: HashMap<String, NodeId>,
}

impl Surface {
    /// Creates an empty surface of the given pixel size.
    pub fn new(id: impl Into<String>, width: f64, height: f64) -> Self {
        let mut surface = Self {
            id: id.into(),
            width: width.max(0.0),
            height: height.max(0.0),
            class: String::new(),
            test_id: None,
            slots: Vec::new(),
            free: Vec::new(),
            root: NodeId {
                index: 0,
                generation: 0,
            },
            dom_ids: HashMap::new(),
        };
        surface.root = surface.alloc(Node::new(Element::Group, None));
        surface
    }

    /// The surface id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Surface width in pixels.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Surface height in pixels.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Resizes the surface. Existing nodes are not re-laid out.
    pub fn set_size(&mut self, width: f64, height: f64) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
    }

    /// Root element classes.
    pub fn class(&self) -> &str {
        &self.class
    }

    /// Sets the root element classes.
    pub fn set_class(&mut self, class: impl Into<String>) {
        self.class = class.into();
    }

    /// Root element test id.
    pub fn test_id(&self) -> Option<&str> {
        self.test_id.as_deref()
    }

    /// Sets the root element test id.
    pub fn set_test_id(&mut self, test_id: Option<String>) {
        self.test_id = test_id;
    }

    /// The root group.
    pub fn root(&self) -> NodeId {
        self.root
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            NodeId {
                index,
                generation: slot.generation,
            }
        } else {
            let index = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            NodeId {
                index,
                generation: 0,
            }
        }
    }

    /// Resolves a handle.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref()
    }

    /// Resolves a handle mutably.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_mut()
    }

    /// Returns `true` if the handle still resolves.
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Appends a new child to `parent` and returns a builder for its attributes.
    ///
    /// A stale `parent` falls back to the root so that a late callback never loses marks.
    pub fn append(&mut self, parent: NodeId, element: Element) -> NodeMut<'_> {
        let parent = if self.contains(parent) {
            parent
        } else {
            tracing::warn!(surface = %self.id, "append to a stale node; using the root group");
            self.root
        };
        let id = self.alloc(Node::new(element, Some(parent)));
        if let Some(p) = self.get_mut(parent) {
            p.children.push(id);
        }
        NodeMut { surface: self, id }
    }

    /// Returns a builder for an existing node.
    pub fn edit(&mut self, id: NodeId) -> Option<NodeMut<'_>> {
        self.contains(id).then_some(NodeMut { surface: self, id })
    }

    /// Children of `id` in paint order (empty for stale handles).
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(Node::children).unwrap_or(&[])
    }

    /// Removes a node and its subtree. The root cannot be removed, only emptied.
    pub fn remove(&mut self, id: NodeId) {
        if id == self.root {
            self.clear_children(id);
            return;
        }
        let Some(parent) = self.get(id).and_then(Node::parent) else {
            return;
        };
        if let Some(p) = self.get_mut(parent) {
            p.children.retain(|c| *c != id);
        }
        self.release_subtree(id);
    }

    /// Removes every child of `id`.
    pub fn clear_children(&mut self, id: NodeId) {
        let children: SmallVec<[NodeId; 4]> = match self.get_mut(id) {
            Some(node) => core::mem::take(&mut node.children),
            None => return,
        };
        for child in children {
            self.release_subtree(child);
        }
    }

    fn release_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            let Some(slot) = self.slots.get_mut(next.index as usize) else {
                continue;
            };
            if slot.generation != next.generation {
                continue;
            }
            let Some(node) = slot.node.take() else {
                continue;
            };
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(next.index);
            if let Some(dom_id) = &node.attrs.dom_id
                && self.dom_ids.get(dom_id) == Some(&next)
            {
                self.dom_ids.remove(dom_id);
            }
            stack.extend(node.children.iter().copied());
        }
    }

    /// Tears down every node, including in-flight transitions, and starts a fresh root.
    pub fn clear(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.node.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(u32::try_from(index).unwrap_or(u32::MAX));
            }
        }
        self.dom_ids.clear();
        self.root = self.alloc(Node::new(Element::Group, None));
    }

    /// Number of live nodes, including the root.
    pub fn node_count(&self) -> usize {
        self.slots.iter().filter(|s| s.node.is_some()).count()
    }

    /// Pre-order traversal of the subtree rooted at `id`, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Finds the first node (in paint order) with the given `data-testid`.
    pub fn find_by_test_id(&self, test_id: &str) -> Option<NodeId> {
        self.descendants(self.root).into_iter().find(|id| {
            self.get(*id)
                .is_some_and(|n| n.attrs.test_id.as_deref() == Some(test_id))
        })
    }

    /// Finds the node carrying a dom id.
    pub fn find_by_dom_id(&self, dom_id: &str) -> Option<NodeId> {
        self.dom_ids
            .get(dom_id)
            .copied()
            .filter(|id| self.contains(*id))
    }

    /// All nodes (in paint order) whose class list contains `class`.
    pub fn select_class(&self, class: &str) -> Vec<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .filter(|id| self.get(*id).is_some_and(|n| n.attrs.has_class(class)))
            .collect()
    }

    /// The datum bound to `id` or to its nearest bound ancestor.
    pub fn datum_of(&self, id: NodeId) -> Option<usize> {
        let mut current = Some(id);
        while let Some(next) = current {
            let node = self.get(next)?;
            if node.datum.is_some() {
                return node.datum;
            }
            current = node.parent;
        }
        None
    }

    /// Accumulated end-state transform from the surface origin to `id`'s local space.
    pub fn world_transform(&self, id: NodeId) -> Affine {
        let mut chain = Vec::new();
        let mut current = Some(id);
        while let Some(next) = current {
            let Some(node) = self.get(next) else {
                break;
            };
            chain.push(node.attrs.transform.to_affine());
            current = node.parent;
        }
        chain
            .into_iter()
            .rev()
            .fold(Affine::IDENTITY, |acc, t| acc * t)
    }

    /// Returns the topmost data-bound node under `point` (surface coordinates).
    ///
    /// The returned handle is the node that carries the datum, which may be a group around
    /// the shape actually hit.
    pub fn hit_test(&self, point: Point) -> Option<NodeId> {
        let order = self.descendants(self.root);
        for id in order.into_iter().rev() {
            let Some(node) = self.get(id) else {
                continue;
            };
            if matches!(node.element, Element::Group) {
                continue;
            }
            let local = self.world_transform(id).inverse() * point;
            let slop = node.attrs.stroke_width.unwrap_or(1.0).max(3.0);
            if node.element.contains(local, slop) {
                let mut current = Some(id);
                while let Some(next) = current {
                    let n = self.get(next)?;
                    if n.datum.is_some() {
                        return Some(next);
                    }
                    current = n.parent;
                }
            }
        }
        None
    }

    /// Returns `true` when every transition has reached its end state by `elapsed_ms`.
    pub fn is_settled(&self, elapsed_ms: f64) -> bool {
        self.slots
            .iter()
            .filter_map(|s| s.node.as_ref())
            .filter_map(|n| n.transition.as_ref())
            .all(|t| elapsed_ms >= t.end_ms())
    }

    /// Latest time at which any transition ends.
    pub fn settle_time(&self) -> f64 {
        self.slots
            .iter()
            .filter_map(|s| s.node.as_ref())
            .filter_map(|n| n.transition.as_ref())
            .map(Transition::end_ms)
            .fold(0.0, f64::max)
    }

    /// Evaluates a node at `elapsed_ms`, resolving its transition.
    pub fn sample(&self, id: NodeId, elapsed_ms: f64) -> Option<Frame> {
        let node = self.get(id)?;
        let mut frame = Frame {
            element: node.element.clone(),
            transform: node.attrs.transform,
            opacity: node.attrs.opacity,
            reveal: None,
        };
        let Some(transition) = &node.transition else {
            return Some(frame);
        };
        let t = transition.progress(elapsed_ms);
        match &transition.from {
            TransitionFrom::Element(from) => {
                if let Some(el) = from.lerp(&node.element, t) {
                    frame.element = el;
                }
            }
            TransitionFrom::Transform(from) => {
                frame.transform = from.lerp(&node.attrs.transform, t);
            }
            TransitionFrom::Opacity(from) => {
                let to = node.attrs.opacity.unwrap_or(1.0);
                frame.opacity = Some(from + (to - from) * t);
            }
            TransitionFrom::Reveal => {
                if t < 1.0 {
                    frame.reveal = Some(t);
                }
            }
        }
        Some(frame)
    }
}

/// A node's resolved state at a point in time.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Interpolated geometry.
    pub element: Element,
    /// Interpolated transform.
    pub transform: Transform,
    /// Interpolated opacity.
    pub opacity: Option<f64>,
    /// Fraction of the stroke revealed, when a reveal is in flight.
    pub reveal: Option<f64>,
}

/// A short-lived builder for a node's attributes.
#[derive(Debug)]
pub struct NodeMut<'a> {
    surface: &'a mut Surface,
    id: NodeId,
}

impl NodeMut<'_> {
    /// The node handle.
    pub fn id(&self) -> NodeId {
        self.id
    }

    fn attrs(&mut self) -> Option<&mut Attrs> {
        self.surface.get_mut(self.id).map(|n| &mut n.attrs)
    }

    /// Sets the class list.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        if let Some(a) = self.attrs() {
            a.class = class.into();
        }
        self
    }

    /// Sets the dom id and indexes it for lookup.
    pub fn with_dom_id(mut self, dom_id: impl Into<String>) -> Self {
        let dom_id = dom_id.into();
        let id = self.id;
        if let Some(a) = self.attrs() {
            a.dom_id = Some(dom_id.clone());
        }
        self.surface.dom_ids.insert(dom_id, id);
        self
    }

    /// Sets the `data-testid` hook.
    pub fn with_test_id(mut self, test_id: impl Into<String>) -> Self {
        if let Some(a) = self.attrs() {
            a.test_id = Some(test_id.into());
        }
        self
    }

    /// Sets the transform.
    pub fn with_transform(mut self, transform: Transform) -> Self {
        if let Some(a) = self.attrs() {
            a.transform = transform;
        }
        self
    }

    /// Sets the fill paint.
    pub fn with_fill(mut self, fill: impl Into<Paint>) -> Self {
        if let Some(a) = self.attrs() {
            a.fill = Some(fill.into());
        }
        self
    }

    /// Sets the stroke paint.
    pub fn with_stroke(mut self, stroke: impl Into<Paint>) -> Self {
        if let Some(a) = self.attrs() {
            a.stroke = Some(stroke.into());
        }
        self
    }

    /// Sets the stroke width.
    pub fn with_stroke_width(mut self, width: f64) -> Self {
        if let Some(a) = self.attrs() {
            a.stroke_width = Some(width);
        }
        self
    }

    /// Sets the opacity.
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        if let Some(a) = self.attrs() {
            a.opacity = Some(opacity.clamp(0.0, 1.0));
        }
        self
    }

    /// Sets a dash pattern.
    pub fn with_dash(mut self, dash: &[f64]) -> Self {
        if let Some(a) = self.attrs() {
            a.dash = Some(dash.iter().copied().collect());
        }
        self
    }

    /// Clips the node with a clip node referenced by dom id.
    pub fn with_clip(mut self, clip_dom_id: impl Into<String>) -> Self {
        if let Some(a) = self.attrs() {
            a.clip = Some(clip_dom_id.into());
        }
        self
    }

    /// Binds the node to a data record index.
    pub fn with_datum(mut self, datum: usize) -> Self {
        if let Some(n) = self.surface.get_mut(self.id) {
            n.datum = Some(datum);
        }
        self
    }

    /// Attaches a transition; `None` leaves the node static.
    pub fn with_transition(mut self, transition: Option<Transition>) -> Self {
        if let Some(n) = self.surface.get_mut(self.id) {
            n.transition = transition;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Rect;

    use super::*;
    use crate::transition::Ease;

    #[test]
    fn clear_invalidates_old_handles() {
        let mut surface = Surface::new("chart", 100.0, 100.0);
        let root = surface.root();
        let bar = surface
            .append(root, Element::rect(Rect::new(0.0, 0.0, 1.0, 1.0)))
            .id();
        assert!(surface.contains(bar), "fresh handle resolves");
        surface.clear();
        assert!(!surface.contains(bar), "handle is stale after clear");
        assert_eq!(surface.node_count(), 1, "only the new root remains");
    }

    #[test]
    fn remove_drops_subtree_and_dom_index() {
        let mut surface = Surface::new("chart", 100.0, 100.0);
        let root = surface.root();
        let g = surface.append(root, Element::Group).id();
        let clip = surface
            .append(g, Element::ClipRect(Rect::new(0.0, 0.0, 10.0, 10.0)))
            .with_dom_id("clip")
            .id();
        surface.remove(g);
        assert!(!surface.contains(clip), "children are released");
        assert!(surface.find_by_dom_id("clip").is_none(), "dom id unindexed");
        assert!(surface.children(root).is_empty(), "parent link removed");
    }

    #[test]
    fn hit_test_returns_bound_ancestor() {
        let mut surface = Surface::new("chart", 100.0, 100.0);
        let root = surface.root();
        let row = surface
            .append(root, Element::Group)
            .with_transform(Transform::translate(10.0, 10.0))
            .with_datum(3)
            .id();
        surface.append(row, Element::rect(Rect::new(0.0, 0.0, 20.0, 20.0)));
        assert_eq!(surface.hit_test(Point::new(15.0, 15.0)), Some(row));
        assert_eq!(surface.hit_test(Point::new(5.0, 5.0)), None);
        assert_eq!(surface.datum_of(row), Some(3));
    }

    #[test]
    fn sample_interpolates_geometry() {
        let mut surface = Surface::new("chart", 100.0, 100.0);
        let root = surface.root();
        let from = Element::rect(Rect::new(0.0, 0.0, 0.0, 10.0));
        let bar = surface
            .append(root, Element::rect(Rect::new(0.0, 0.0, 80.0, 10.0)))
            .with_transition(Some(
                Transition::new(100.0, TransitionFrom::Element(from)).with_ease(Ease::Linear),
            ))
            .id();
        let Some(Frame {
            element: Element::Rect { rect, .. },
            ..
        }) = surface.sample(bar, 50.0)
        else {
            panic!("expected a rect frame");
        };
        assert!((rect.x1 - 40.0).abs() < 1e-9, "half way: {rect:?}");
        assert!(!surface.is_settled(50.0), "still animating");
        assert!(surface.is_settled(100.0), "done at the end");
    }

    #[test]
    fn select_class_matches_tokens() {
        let mut surface = Surface::new("chart", 100.0, 100.0);
        let root = surface.root();
        surface
            .append(root, Element::Group)
            .with_class("axis axis--x");
        surface.append(root, Element::Group).with_class("axis-x");
        assert_eq!(surface.select_class("axis--x").len(), 1);
        assert_eq!(surface.select_class("axis").len(), 1);
    }
}
