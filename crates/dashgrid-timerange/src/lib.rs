#![forbid(unsafe_code)]

//! Dashboard time-range normalization.
//!
//! # Role in dashgrid
//! Chart and query components receive time ranges as free-form strings,
//! often straight from an editable URL. This crate turns them into a
//! [`DashboardTimeRangePayload`] the query layer can rely on, encodes and
//! decodes absolute ranges as `abs:<from>|<to>`, and renders labels such as
//! `Last 1h`.
//!
//! # Primary responsibilities
//! - **Payloads**: [`to_dashboard_time_range_payload`] classifies a string as
//!   relative or absolute and normalizes unit spellings.
//! - **Absolute encoding**: [`encode_absolute_dashboard_range`] /
//!   [`decode_absolute_dashboard_range`].
//! - **Labels**: [`format_dashboard_time_range_label`].
//! - **Resolution**: [`DashboardTimeRangePayload::resolve`] turns a payload
//!   into concrete instants.
//!
//! Nothing here panics or returns an error; malformed input resolves to the
//! defaults in [`TimeRangeOptions`].
//!
//! ```
//! use dashgrid_timerange::{RangeKind, to_dashboard_time_range_payload};
//!
//! let payload = to_dashboard_time_range_payload("now-15 minutes");
//! assert_eq!(payload.kind, RangeKind::Relative);
//! assert_eq!(payload.from, "now-15m");
//! assert_eq!(payload.to, "now");
//! ```

pub mod absolute;
pub mod payload;
pub mod token;

pub use absolute::{
    ABSOLUTE_PREFIX, AbsoluteRange, decode_absolute_dashboard_range,
    encode_absolute_dashboard_range, parse_date_time, to_iso_string,
};
pub use payload::{
    DEFAULT_FROM, DEFAULT_LABEL_FORMAT, DEFAULT_TO, DashboardTimeRangePayload, QUICK_RANGES,
    RangeKind, TimeRangeNormalizer, TimeRangeOptions, format_dashboard_time_range_label,
    to_dashboard_time_range_payload,
};
pub use token::{NOW, RelativeToken, TimeUnit, normalize_relative};
