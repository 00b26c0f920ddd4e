//! ISO-8601 helpers for feed queries.
//!
//! The cloud feed expects `start_time` as `YYYY-MM-DDTHH:MM:SSZ` and returns
//! `created_at` values with optional fractional seconds and offsets.  Both
//! are handled as naive UTC wall-clock times: offsets and fractions are
//! dropped, not applied.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{PortalError, Result};

const DATE_FMT: &str = "%Y-%m-%d";
const TIME_FMT: &str = "%H:%M:%S";

/// Parse `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM:SS[.fff][Z|±hh:mm]`.
///
/// A bare date resolves to midnight.
pub fn parse_iso8601(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();
    let malformed = || PortalError::Malformed(format!("timestamp '{s}'"));

    let (date_part, time_part) = match s.split_once('T') {
        Some((d, t)) => (d, Some(t)),
        None => (s, None),
    };

    let date = NaiveDate::parse_from_str(date_part, DATE_FMT).map_err(|_| malformed())?;

    let Some(time_part) = time_part else {
        return Ok(date.and_time(NaiveTime::MIN));
    };

    // Strip the zone designator, then any fractional seconds.
    let clock = time_part
        .split(['Z', 'z', '+', '-'])
        .next()
        .unwrap_or_default();
    let clock = clock.split('.').next().unwrap_or_default();

    let time = NaiveTime::parse_from_str(clock, TIME_FMT).map_err(|_| malformed())?;
    Ok(date.and_time(time))
}

/// Format as `YYYY-MM-DDTHH:MM:SSZ`.
#[must_use]
pub fn format_iso8601(t: NaiveDateTime) -> String {
    t.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Start of a history window reaching `hours` back from `now`.
#[must_use]
pub fn hours_before(now: NaiveDateTime, hours: u32) -> NaiveDateTime {
    now - Duration::hours(i64::from(hours))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn parse_zulu() {
        assert_eq!(
            parse_iso8601("2021-03-04T05:06:07Z").unwrap(),
            at(2021, 3, 4, 5, 6, 7)
        );
    }

    #[test]
    fn parse_offset_and_fraction_are_dropped() {
        assert_eq!(
            parse_iso8601("2021-03-04T05:06:07.123+02:00").unwrap(),
            at(2021, 3, 4, 5, 6, 7)
        );
        assert_eq!(
            parse_iso8601("2021-03-04T05:06:07-05:00").unwrap(),
            at(2021, 3, 4, 5, 6, 7)
        );
    }

    #[test]
    fn parse_date_only() {
        assert_eq!(parse_iso8601("2021-12-31").unwrap(), at(2021, 12, 31, 0, 0, 0));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(matches!(parse_iso8601("yesterday"), Err(PortalError::Malformed(_))));
        assert!(parse_iso8601("2021-13-01").is_err());
        assert!(parse_iso8601("2021-01-01T25:00:00Z").is_err());
        assert!(parse_iso8601("").is_err());
    }

    #[test]
    fn format_pads_fields() {
        assert_eq!(format_iso8601(at(2021, 1, 2, 3, 4, 5)), "2021-01-02T03:04:05Z");
    }

    #[test]
    fn hours_before_crosses_midnight() {
        let now = at(2021, 3, 1, 1, 30, 0);
        assert_eq!(hours_before(now, 24), at(2021, 2, 28, 1, 30, 0));
        assert_eq!(format_iso8601(hours_before(now, 2)), "2021-02-28T23:30:00Z");
    }

    #[test]
    fn format_then_parse_is_stable() {
        let t = at(2024, 2, 29, 23, 59, 59);
        assert_eq!(parse_iso8601(&format_iso8601(t)).unwrap(), t);
    }
}
