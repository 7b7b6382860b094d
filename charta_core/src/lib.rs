// Copyright 2026 the Charta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Retained drawing surface for `charta` charts.
//!
//! This crate is the layer chart renderers draw into:
//! - A [`Surface`] owns a tree of [`Node`]s addressed by generational [`NodeId`]s.
//! - Each node carries an [`Element`] (its geometry), presentation [`Attrs`], an optional
//!   data binding, and an optional [`Transition`] describing where it animates from.
//! - The surface serializes to SVG either at its end state or at any elapsed time, so hosts
//!   drive animation by sampling rather than by running timers here.
//!
//! Data rows are plain JSON objects ([`Record`]) with helpers for dotted-key access.

mod element;
mod node;
mod record;
mod sector;
mod surface;
mod svg;
mod symbol;
mod transition;

pub use element::{Element, FontSize, SymbolElement, TextAnchor, TextElement, Transform};
pub use node::{Attrs, Node, NodeId, Paint};
pub use record::{
    Record, display_value, format_number, is_truthy, number_at, record, text_at, value_at,
};
pub use sector::Sector;
pub use surface::{Frame, NodeMut, Surface};
pub use symbol::SymbolShape;
pub use transition::{Ease, Transition, TransitionFrom};
