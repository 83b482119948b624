#![forbid(unsafe_code)]

//! Collision resolution and gravity compaction.
//!
//! [`compact`] turns a possibly-overlapping set of panels into a valid
//! layout in two phases:
//!
//! 1. **Collision resolution.** When a moved item is named, every panel it
//!    covers is pushed straight down to its bottom edge. The remaining panels
//!    are then settled in ascending `(y, x)` order: each one is pushed below
//!    any already-settled panel it still overlaps until it is clear.
//! 2. **Gravity.** Every panel except the moved one is pulled up, in `(y, x)`
//!    order, onto the nearest panel above it in its columns (or row 0), until
//!    a full pass makes no change.
//!
//! # Invariants
//!
//! 1. No two items with different ids overlap in the output.
//! 2. The moved item (if present) is returned unchanged.
//! 3. Only `y` changes; `x`, `w`, `h` and the item order are preserved.
//! 4. No non-moved item can move up one row without colliding.
//! 5. Compacting an already compacted layout is the identity.
//!
//! # Failure Modes
//!
//! None. An unknown moved id behaves as if no id was given.

use tracing::field::Empty;

use crate::item::{LayoutItem, rects_overlap};

/// Result of a compaction run with diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompactReport {
    /// The compacted layout, in input order.
    pub items: Vec<LayoutItem>,
    /// Gravity passes run, including the final pass that made no change.
    pub passes: usize,
    /// Items pushed down during collision resolution.
    pub displaced: usize,
}

/// Resolve overlaps and pull panels upward until they settle.
///
/// `moved_id` names the panel the user just dropped or resized; its position
/// is authoritative. Returns new values; `items` is left untouched.
#[must_use]
pub fn compact(items: &[LayoutItem], moved_id: Option<&str>) -> Vec<LayoutItem> {
    compact_with_report(items, moved_id).items
}

/// [`compact`] with pass and displacement counts.
#[must_use]
pub fn compact_with_report(items: &[LayoutItem], moved_id: Option<&str>) -> CompactReport {
    let span = tracing::debug_span!(
        target: "dashgrid.layout",
        "layout.compact",
        items = items.len(),
        moved = moved_id.unwrap_or(""),
        passes = Empty,
        displaced = Empty,
    )
    .entered();

    let mut out = items.to_vec();
    let moved = moved_id.and_then(|id| out.iter().position(|item| item.id == id));
    if let (Some(id), None) = (moved_id, moved) {
        tracing::debug!(target: "dashgrid.layout", moved = id, "moved id not in layout, plain gravity pass");
    }

    let mut displaced = vec![false; out.len()];
    if let Some(m) = moved {
        push_below_moved(&mut out, m, &mut displaced);
    }
    settle(&mut out, moved, &mut displaced);
    let passes = gravity(&mut out, moved);

    let displaced = displaced.iter().filter(|&&d| d).count();
    span.record("passes", passes);
    span.record("displaced", displaced);
    tracing::trace!(target: "dashgrid.layout", passes, displaced, "layout compacted");

    CompactReport {
        items: out,
        passes,
        displaced,
    }
}

/// Push every panel the moved item covers to the moved item's bottom edge.
fn push_below_moved(items: &mut [LayoutItem], moved: usize, displaced: &mut [bool]) {
    let anchor = items[moved].clone();
    for (i, item) in items.iter_mut().enumerate() {
        if i != moved && rects_overlap(item, &anchor) {
            item.y = anchor.bottom();
            displaced[i] = true;
        }
    }
}

/// Settle non-moved items in `(y, x)` order against everything settled before.
///
/// The moved item is settled first. Each pushed item lands on the deepest
/// bottom edge among the settled items it overlaps; since `y` only grows the
/// loop terminates.
fn settle(items: &mut [LayoutItem], moved: Option<usize>, displaced: &mut [bool]) {
    let order = scan_order(items, moved);
    let mut settled: Vec<usize> = Vec::with_capacity(items.len());
    settled.extend(moved);

    for i in order {
        loop {
            let blocker = settled
                .iter()
                .filter(|&&s| rects_overlap(&items[s], &items[i]))
                .map(|&s| items[s].bottom())
                .max();
            let Some(bottom) = blocker else { break };
            items[i].y = bottom;
            displaced[i] = true;
        }
        settled.push(i);
    }
}

/// Lift non-moved items to their resting row until a pass moves nothing.
///
/// Each visited item drops straight to the deepest bottom edge of the
/// column-sharing items above it (or row 0), which is where repeated one-row
/// steps would stop. Pass count therefore depends on the number of items,
/// not on how far down they start.
fn gravity(items: &mut [LayoutItem], moved: Option<usize>) -> usize {
    let mut passes = 0;
    loop {
        passes += 1;
        let mut changed = false;
        for i in scan_order(items, moved) {
            let y = items[i].y;
            let floor = resting_row(items, i);
            if floor < y && !collides_at(items, i, floor) {
                items[i].y = floor;
                changed = true;
            }
        }
        if !changed {
            return passes;
        }
    }
}

/// Lowest row item `i` can rise to without passing through another item.
fn resting_row(items: &[LayoutItem], i: usize) -> u32 {
    let item = &items[i];
    items
        .iter()
        .enumerate()
        .filter(|&(j, other)| {
            j != i
                && other.id != item.id
                && item.x < other.right()
                && other.x < item.right()
                && other.bottom() <= item.y
        })
        .map(|(_, other)| other.bottom())
        .max()
        .unwrap_or(0)
}

/// Indices of all non-moved items, ascending by `(y, x)`, ties by input order.
fn scan_order(items: &[LayoutItem], moved: Option<usize>) -> Vec<usize> {
    let mut order: Vec<usize> = (0..items.len()).filter(|&i| Some(i) != moved).collect();
    order.sort_by_key(|&i| (items[i].y, items[i].x));
    order
}

/// Whether item `i` placed at row `y` would overlap any other item.
fn collides_at(items: &[LayoutItem], i: usize, y: u32) -> bool {
    let item = &items[i];
    let bottom = y.saturating_add(item.h);
    items.iter().enumerate().any(|(j, other)| {
        j != i
            && other.id != item.id
            && item.x < other.right()
            && other.x < item.right()
            && y < other.bottom()
            && other.y < bottom
    })
}
