#![forbid(unsafe_code)]

//! Grid layout engine for dashboard panels.
//!
//! # Role in dashgrid
//! `dashgrid-layout` arranges rectangular panels on a 12-column integer grid.
//! A dashboard editor keeps the panel list in its own state, calls
//! [`compact`] after every drag, resize or deletion, and replaces its state
//! with the result.
//!
//! # Primary responsibilities
//! - **compact**: resolve overlaps around a just-moved panel, then let every
//!   other panel float up until nothing can move.
//! - **Geometry**: [`rects_overlap`], [`grid_to_pixel`], [`calc_col_w`],
//!   [`container_height`] and friends, parameterized by [`GridMetrics`].
//!
//! The crate holds no state and performs no I/O. Inputs are never mutated.
//!
//! ```
//! use dashgrid_layout::{LayoutItem, compact};
//!
//! let a = LayoutItem::new("a", 0, 0, 4, 2);
//! let b = LayoutItem::new("b", 0, 0, 4, 2);
//! let out = compact(&[a, b], Some("a"));
//! assert_eq!(out[1].y, 2);
//! ```

pub mod compact;
pub mod item;
pub mod metrics;

pub use compact::{CompactReport, compact, compact_with_report};
pub use item::{LayoutItem, PixelRect, bottom_row, has_overlaps, rects_overlap};
pub use metrics::{
    COLS, GAP, GridMetrics, MIN_H, MIN_W, ROW_H, calc_col_w, clamp_to_minimums,
    container_height, grid_to_pixel, pixel_to_grid,
};
