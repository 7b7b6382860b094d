// Copyright 2026 the Charta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stack ordering and offset policies.

use serde::{Deserialize, Serialize};

/// The order in which series are stacked, bottom first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum StackOrder {
    /// Series order as given.
    #[default]
    None,
    /// Series order reversed.
    Reverse,
    /// Largest series in the middle, smaller ones alternating outward.
    ///
    /// Series are ranked by the index of their peak value, then assigned to whichever side
    /// (top or bottom) currently has the smaller running total. Used by streamgraphs.
    InsideOut,
}

/// Baseline offset applied after series values are accumulated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum StackOffset {
    /// Baseline at zero; each series sits on top of the previous one.
    #[default]
    Zero,
    /// Normalize each category so the topline is 1.
    Expand,
    /// Shift the baseline to minimize weighted slope changes.
    Wiggle,
    /// Positive values stack upward from zero, negative values downward.
    Diverging,
}

/// The stacked-layout presets exposed on chart configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StackingType {
    /// Plain stacking.
    #[default]
    #[serde(rename = "normal")]
    Normal,
    /// Every category fills the full range.
    #[serde(rename = "100%")]
    Percent,
    /// Wiggle offset with inside-out ordering.
    #[serde(rename = "streamgraph")]
    Streamgraph,
    /// Diverging offset with reversed ordering.
    #[serde(rename = "diverging")]
    Diverging,
}

impl StackingType {
    /// Returns the `(offset, order)` pair implementing this preset.
    pub fn policies(self) -> (StackOffset, StackOrder) {
        match self {
            Self::Normal => (StackOffset::Zero, StackOrder::None),
            Self::Percent => (StackOffset::Expand, StackOrder::None),
            Self::Streamgraph => (StackOffset::Wiggle, StackOrder::InsideOut),
            Self::Diverging => (StackOffset::Diverging, StackOrder::Reverse),
        }
    }

    /// Parses the configuration spelling (`"normal"`, `"100%"`, `"streamgraph"`, `"diverging"`).
    ///
    /// Unknown names fall back to [`StackingType::Normal`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "100%" => Self::Percent,
            "streamgraph" => Self::Streamgraph,
            "diverging" => Self::Diverging,
            _ => Self::Normal,
        }
    }
}
