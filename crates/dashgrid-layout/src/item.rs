#![forbid(unsafe_code)]

//! Grid rectangles and their pixel projections.

use serde::{Deserialize, Serialize};

/// A dashboard panel placed on the integer grid.
///
/// Coordinates are grid cells with the origin at the top-left. `x`/`y` are
/// the column and row of the top-left cell; `w`/`h` are the extent in cells.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayoutItem {
    /// Opaque identifier, stable across layout calls.
    pub id: String,
    /// Left column (inclusive).
    pub x: u32,
    /// Top row (inclusive).
    pub y: u32,
    /// Width in columns.
    pub w: u32,
    /// Height in rows.
    pub h: u32,
}

impl LayoutItem {
    /// Create a new item.
    pub fn new(id: impl Into<String>, x: u32, y: u32, w: u32, h: u32) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            w,
            h,
        }
    }

    /// Right edge (exclusive).
    #[inline]
    #[must_use]
    pub const fn right(&self) -> u32 {
        self.x.saturating_add(self.w)
    }

    /// Bottom edge (exclusive).
    #[inline]
    #[must_use]
    pub const fn bottom(&self) -> u32 {
        self.y.saturating_add(self.h)
    }

    /// Whether the rectangles of `self` and `other` share at least one cell.
    ///
    /// Ids are ignored; see [`rects_overlap`] for the id-aware test.
    #[inline]
    #[must_use]
    pub const fn intersects(&self, other: &LayoutItem) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Copy of this item with `y` replaced.
    #[must_use]
    pub fn with_y(&self, y: u32) -> Self {
        Self {
            y,
            ..self.clone()
        }
    }
}

/// Strict axis-aligned overlap test between two panels.
///
/// Touching edges do not overlap, and an item never overlaps an item with
/// the same id (itself).
#[must_use]
pub fn rects_overlap(a: &LayoutItem, b: &LayoutItem) -> bool {
    a.id != b.id && a.intersects(b)
}

/// Whether any two distinct items in `items` overlap.
#[must_use]
pub fn has_overlaps(items: &[LayoutItem]) -> bool {
    items
        .iter()
        .enumerate()
        .any(|(i, a)| items[i + 1..].iter().any(|b| rects_overlap(a, b)))
}

/// Bottom-most occupied row (exclusive), or 0 for an empty layout.
#[must_use]
pub fn bottom_row(items: &[LayoutItem]) -> u32 {
    items.iter().map(LayoutItem::bottom).max().unwrap_or(0)
}

/// A panel's placement in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}
