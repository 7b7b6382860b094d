// Copyright 2026 the Charta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Surface nodes, handles and presentation attributes.

use peniko::Brush;
use smallvec::SmallVec;

use crate::element::{Element, Transform};
use crate::transition::Transition;

/// A generational handle to a node in a [`Surface`](crate::Surface).
///
/// Handles from before a [`Surface::clear`](crate::Surface::clear) no longer resolve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

/// Fill or stroke paint.
#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    /// Explicitly unpainted.
    None,
    /// Inherit the host's text color.
    CurrentColor,
    /// A concrete brush.
    Brush(Brush),
}

impl From<Brush> for Paint {
    fn from(value: Brush) -> Self {
        Self::Brush(value)
    }
}

impl From<peniko::Color> for Paint {
    fn from(value: peniko::Color) -> Self {
        Self::Brush(Brush::Solid(value))
    }
}

/// Presentation attributes shared by every element kind.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Attrs {
    /// Space-separated style classes.
    pub class: String,
    /// Document id (used for clip references and lookups).
    pub dom_id: Option<String>,
    /// Stable test hook, serialized as `data-testid`.
    pub test_id: Option<String>,
    /// Placement relative to the parent.
    pub transform: Transform,
    /// Fill paint.
    pub fill: Option<Paint>,
    /// Stroke paint.
    pub stroke: Option<Paint>,
    /// Stroke width.
    pub stroke_width: Option<f64>,
    /// Opacity in `[0, 1]`.
    pub opacity: Option<f64>,
    /// Stroke dash pattern.
    pub dash: Option<SmallVec<[f64; 2]>>,
    /// Dom id of a clip node applied to this node.
    pub clip: Option<String>,
}

impl Attrs {
    /// Returns `true` if `class` is one of this node's class tokens.
    pub fn has_class(&self, class: &str) -> bool {
        self.class.split_whitespace().any(|c| c == class)
    }
}

/// A node in the surface tree.
#[derive(Clone, Debug)]
pub struct Node {
    /// The node's geometry (its end state when a transition is attached).
    pub element: Element,
    /// Presentation attributes.
    pub attrs: Attrs,
    /// Optional transition toward the current end state.
    pub transition: Option<Transition>,
    /// Index of the data record this node is bound to.
    pub datum: Option<usize>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: SmallVec<[NodeId; 4]>,
}

impl Node {
    pub(crate) fn new(element: Element, parent: Option<NodeId>) -> Self {
        Self {
            element,
            attrs: Attrs::default(),
            transition: None,
            datum: None,
            parent,
            children: SmallVec::new(),
        }
    }

    /// Returns the parent handle, if any.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Returns the child handles in paint order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}
