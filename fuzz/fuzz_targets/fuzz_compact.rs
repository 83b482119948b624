#![no_main]

use arbitrary::Arbitrary;
use dashgrid_layout::{COLS, LayoutItem, compact_with_report, has_overlaps};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Panel {
    x: u8,
    y: u32,
    w: u8,
    h: u8,
}

#[derive(Debug, Arbitrary)]
struct Input {
    panels: Vec<Panel>,
    moved: Option<u8>,
}

fuzz_target!(|input: Input| {
    if input.panels.len() > 64 {
        return;
    }
    let items: Vec<LayoutItem> = input
        .panels
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let w = u32::from(p.w) % COLS + 1;
            let x = u32::from(p.x) % (COLS - w + 1);
            let h = u32::from(p.h) % 8 + 1;
            LayoutItem::new(format!("p{i}"), x, p.y >> 1, w, h)
        })
        .collect();
    let moved = input
        .moved
        .map(|m| format!("p{}", usize::from(m) % items.len().max(1)));

    let report = compact_with_report(&items, moved.as_deref());
    let out = &report.items;

    assert_eq!(out.len(), items.len(), "item count changed");
    assert!(!has_overlaps(out), "overlap after compact");
    for (before, after) in items.iter().zip(out) {
        assert_eq!(before.id, after.id, "order changed");
        assert_eq!((before.x, before.w, before.h), (after.x, after.w, after.h));
    }
    if let Some(id) = moved.as_deref() {
        if let Some(i) = items.iter().position(|item| item.id == id) {
            assert_eq!(items[i], out[i], "moved panel was altered");
        }
    }
});
