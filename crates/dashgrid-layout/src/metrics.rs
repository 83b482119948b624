#![forbid(unsafe_code)]

//! Grid metrics and grid↔pixel conversions.
//!
//! The grid has a fixed column count; column width is derived from the
//! container width, while row height and the gap between cells are fixed
//! pixel values. A panel spanning `n` cells covers `n` cell extents plus the
//! `n - 1` gaps between them.
//!
//! # Invariants
//!
//! 1. `calc_col_w(w)` solves `w = cols·col_w + (cols-1)·gap` for `col_w`.
//! 2. `grid_to_pixel` is affine in the item's coordinates.
//! 3. `container_height` is never smaller than one row.
//!
//! # Failure Modes
//!
//! None. All functions are total; degenerate metrics (zero columns) yield
//! zero-sized results instead of dividing by zero.

use serde::{Deserialize, Serialize};

use crate::item::{LayoutItem, PixelRect};

/// Number of grid columns.
pub const COLS: u32 = 12;
/// Row height in pixels.
pub const ROW_H: u32 = 60;
/// Gap between adjacent cells in pixels.
pub const GAP: u32 = 16;
/// Minimum panel width in columns (enforced by callers, not by `compact`).
pub const MIN_W: u32 = 2;
/// Minimum panel height in rows (enforced by callers, not by `compact`).
pub const MIN_H: u32 = 2;

/// Pixel geometry of the dashboard grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridMetrics {
    /// Number of columns.
    pub cols: u32,
    /// Row height in pixels.
    pub row_h: u32,
    /// Gap between cells in pixels.
    pub gap: u32,
}

impl Default for GridMetrics {
    fn default() -> Self {
        Self {
            cols: COLS,
            row_h: ROW_H,
            gap: GAP,
        }
    }
}

impl GridMetrics {
    /// Vertical pitch of one row including its trailing gap.
    #[inline]
    #[must_use]
    pub fn row_pitch(&self) -> f64 {
        f64::from(self.row_h) + f64::from(self.gap)
    }

    /// Column width for a container of the given pixel width.
    #[must_use]
    pub fn calc_col_w(&self, container_width: f64) -> f64 {
        if self.cols == 0 {
            return 0.0;
        }
        let gaps = f64::from(self.cols - 1) * f64::from(self.gap);
        (container_width - gaps) / f64::from(self.cols)
    }

    /// Project a grid item into pixel space for a given column width.
    #[must_use]
    pub fn grid_to_pixel(&self, item: &LayoutItem, col_w: f64) -> PixelRect {
        let gap = f64::from(self.gap);
        let row_h = f64::from(self.row_h);
        PixelRect {
            left: f64::from(item.x) * (col_w + gap),
            top: f64::from(item.y) * (row_h + gap),
            width: f64::from(item.w) * col_w + f64::from(item.w.saturating_sub(1)) * gap,
            height: f64::from(item.h) * row_h + f64::from(item.h.saturating_sub(1)) * gap,
        }
    }

    /// Snap a pixel position to the nearest grid cell for an item `w` columns wide.
    ///
    /// The column is clamped so the item stays inside the grid; rows are
    /// clamped at 0 but unbounded below.
    #[must_use]
    pub fn pixel_to_grid(&self, left: f64, top: f64, w: u32, col_w: f64) -> (u32, u32) {
        let col_pitch = col_w + f64::from(self.gap);
        let max_x = self.cols.saturating_sub(w);
        let x = if col_pitch > 0.0 {
            snap(left / col_pitch).min(max_x)
        } else {
            0
        };
        let row_pitch = self.row_pitch();
        let y = if row_pitch > 0.0 {
            snap(top / row_pitch)
        } else {
            0
        };
        (x, y)
    }

    /// Pixel height needed to render every item.
    ///
    /// Based on the bottom-most occupied row; an empty layout still reserves
    /// one row.
    #[must_use]
    pub fn container_height(&self, items: &[LayoutItem]) -> f64 {
        let rows = crate::item::bottom_row(items).max(1);
        f64::from(rows) * self.row_pitch()
    }

    /// Apply the minimum panel size and keep the panel inside the grid width.
    #[must_use]
    pub fn clamp_to_minimums(&self, item: &LayoutItem) -> LayoutItem {
        let w = item.w.max(MIN_W).min(self.cols.max(MIN_W));
        let h = item.h.max(MIN_H);
        let x = item.x.min(self.cols.saturating_sub(w));
        LayoutItem {
            id: item.id.clone(),
            x,
            y: item.y,
            w,
            h,
        }
    }
}

/// Round to the nearest cell, saturating negatives and NaN to 0.
fn snap(cells: f64) -> u32 {
    let rounded = cells.round();
    if rounded.is_nan() || rounded <= 0.0 {
        0
    } else {
        rounded as u32
    }
}

/// [`GridMetrics::grid_to_pixel`] with the default metrics.
#[must_use]
pub fn grid_to_pixel(item: &LayoutItem, col_w: f64) -> PixelRect {
    GridMetrics::default().grid_to_pixel(item, col_w)
}

/// [`GridMetrics::calc_col_w`] with the default metrics.
#[must_use]
pub fn calc_col_w(container_width: f64) -> f64 {
    GridMetrics::default().calc_col_w(container_width)
}

/// [`GridMetrics::container_height`] with the default metrics.
#[must_use]
pub fn container_height(items: &[LayoutItem]) -> f64 {
    GridMetrics::default().container_height(items)
}

/// [`GridMetrics::pixel_to_grid`] with the default metrics.
#[must_use]
pub fn pixel_to_grid(left: f64, top: f64, w: u32, col_w: f64) -> (u32, u32) {
    GridMetrics::default().pixel_to_grid(left, top, w, col_w)
}

/// [`GridMetrics::clamp_to_minimums`] with the default metrics.
#[must_use]
pub fn clamp_to_minimums(item: &LayoutItem) -> LayoutItem {
    GridMetrics::default().clamp_to_minimums(item)
}
