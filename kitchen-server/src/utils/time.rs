//! Local Calendar-Day Handling
//!
//! Every date-keyed operation (menu lookup, the cooking/bagging/payment
//! views, bagging batch updates) works on **local** calendar days. Naive
//! UTC-based derivation shifts orders placed near midnight into the wrong
//! day in negative-UTC-offset zones, so the local normalization here is
//! load-bearing, not cosmetic.
//!
//! Timestamps are stored as epoch milliseconds; a service day is the
//! half-open millisecond range `[local midnight, next local midnight)`.

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};

use super::error::AppError;

/// Parse a `YYYY-MM-DD` request parameter.
pub fn parse_date(input: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("invalid date: {input:?} (expected YYYY-MM-DD)")))
}

/// Format a date back to `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Millisecond instant of local midnight on `date`.
///
/// Fails only for dates outside the representable local range (including
/// the rare DST gap that swallows midnight).
pub fn local_midnight_millis(date: NaiveDate) -> Result<i64, AppError> {
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| AppError::validation(format!("invalid date: {date}")))?;
    Local
        .from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.timestamp_millis())
        .ok_or_else(|| AppError::validation(format!("date not representable locally: {date}")))
}

/// Half-open millisecond bounds `[start, end)` of the local service day.
pub fn local_day_bounds(date: NaiveDate) -> Result<(i64, i64), AppError> {
    let start = local_midnight_millis(date)?;
    let next = date
        .succ_opt()
        .ok_or_else(|| AppError::validation(format!("date out of range: {date}")))?;
    let end = local_midnight_millis(next)?;
    Ok((start, end))
}

/// Local calendar date of a stored millisecond instant.
pub fn local_date_of(millis: i64) -> Option<NaiveDate> {
    DateTime::<Utc>::from_timestamp_millis(millis).map(|dt| dt.with_timezone(&Local).date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn parses_and_formats_dates() {
        let date = parse_date("2025-03-09").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2025, 3, 9));
        assert_eq!(format_date(date), "2025-03-09");
        assert!(parse_date("03/09/2025").is_err());
        assert!(parse_date("2025-13-01").is_err());
    }

    #[test]
    fn day_bounds_are_half_open_and_contiguous() {
        let a = parse_date("2025-06-01").unwrap();
        let b = parse_date("2025-06-02").unwrap();
        let (start_a, end_a) = local_day_bounds(a).unwrap();
        let (start_b, _) = local_day_bounds(b).unwrap();
        assert!(start_a < end_a);
        assert_eq!(end_a, start_b);
    }

    #[test]
    fn stored_midnight_maps_back_to_its_day() {
        let date = parse_date("2025-06-01").unwrap();
        let millis = local_midnight_millis(date).unwrap();
        assert_eq!(local_date_of(millis), Some(date));
        // One millisecond before local midnight belongs to the previous day
        assert_eq!(local_date_of(millis - 1), date.pred_opt());
    }
}
