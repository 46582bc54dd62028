//! Civil time in the ordering API's home timezone (fixed UTC+8)

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};

const UTC_OFFSET_SECS: i32 = 8 * 3600;

/// Format of the `last_update` catalog field
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Date format the API expects in `orderDate` style request fields
pub const ORDER_DATE_FORMAT: &str = "%Y/%m/%d";

/// Returns the fixed UTC+8 offset
pub fn offset() -> FixedOffset {
    // 8 hours is always within the valid offset range
    FixedOffset::east_opt(UTC_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

/// Current instant expressed in UTC+8
pub fn now() -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&offset())
}

/// Today's civil date in UTC+8
pub fn today() -> NaiveDate {
    now().date_naive()
}

/// Formats a date the way request bodies carry it (`YYYY/MM/DD`)
pub fn order_date(date: NaiveDate) -> String {
    date.format(ORDER_DATE_FORMAT).to_string()
}

/// Formats a timestamp for the catalog's `last_update` field
pub fn timestamp(at: DateTime<FixedOffset>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}
