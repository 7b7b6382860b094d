// Copyright 2026 the Charta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configuration errors.
//!
//! Rendering itself never fails; only building or validating a configuration does.

use thiserror::Error;

/// Result alias for configuration construction.
pub type ChartResult<T> = Result<T, ChartError>;

/// A configuration that cannot be rendered as given.
#[derive(Debug, Error)]
pub enum ChartError {
    /// Explicit domain bounds are reversed.
    #[error("invalid domain for `{key}`: start={start} is greater than end={end}")]
    InvalidDomain {
        /// Data key of the offending axis.
        key: String,
        /// Configured start.
        start: f64,
        /// Configured end.
        end: f64,
    },

    /// The drawing surface has no usable area.
    #[error("invalid chart size: width={width}, height={height}")]
    InvalidSize {
        /// Requested width.
        width: f64,
        /// Requested height.
        height: f64,
    },

    /// Zoom scale extent is empty or non-positive.
    #[error("invalid zoom extent: min={min}, max={max}")]
    InvalidZoomExtent {
        /// Minimum zoom factor.
        min: f64,
        /// Maximum zoom factor.
        max: f64,
    },

    /// A JSON fixture could not be decoded.
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
}
