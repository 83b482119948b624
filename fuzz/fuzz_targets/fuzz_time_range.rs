#![no_main]

use dashgrid_timerange::{
    RangeKind, RelativeToken, decode_absolute_dashboard_range, format_dashboard_time_range_label,
    normalize_relative, parse_date_time, to_dashboard_time_range_payload,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if text.len() > 1024 {
        return;
    }

    let payload = to_dashboard_time_range_payload(text);
    assert!(!payload.from.is_empty() && !payload.to.is_empty());
    if payload.kind == RangeKind::Relative {
        assert!(RelativeToken::parse(&payload.from).is_some(), "from {:?}", payload.from);
        assert!(RelativeToken::parse(&payload.to).is_some(), "to {:?}", payload.to);
    }

    let _ = format_dashboard_time_range_label(text);
    let _ = parse_date_time(text);

    let once = normalize_relative(text, "1h");
    assert_eq!(normalize_relative(&once, "1h"), once);

    if let Some(range) = decode_absolute_dashboard_range(text) {
        assert!(text.starts_with("abs:"));
        assert!(!range.from.is_empty() && !range.to.is_empty());
    }
});
