// Copyright 2026 the Charta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stack layout for stacked bar and area charts.
//!
//! A [`Stack`] turns a table of rows by keys into one [`StackSeries`] per key, where every
//! row is a `[lower, upper]` band. Two policies shape the result:
//! - [`StackOrder`] picks which series sits at the bottom.
//! - [`StackOffset`] picks the baseline: zero, normalized, streamgraph wiggle, or diverging
//!   around zero.
//!
//! [`StackingType`] names the four combinations charts expose in configuration.

mod policy;
mod stack;

pub use policy::{StackOffset, StackOrder, StackingType};
pub use stack::{Stack, StackPoint, StackSeries};
