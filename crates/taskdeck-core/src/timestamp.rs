//! Timestamp parsing shared by ordering and due-state checks.

use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime};

const DATE_TIME_FORMATS: &[&[BorrowedFormatItem<'static>]] = &[
    format_description!("[year]-[month]-[day] [hour]:[minute]"),
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    format_description!("[year]-[month]-[day]T[hour]:[minute]"),
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
];

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Parse a stored timestamp leniently.
///
/// Accepts RFC 3339 plus the offset-less `YYYY-MM-DD[ HH:MM[:SS]]` shapes used
/// for due dates; offset-less values are read as UTC. Returns `None` for
/// anything else so callers can order it as the oldest instant.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(parsed);
    }
    if let Some(parsed) = DATE_TIME_FORMATS
        .iter()
        .find_map(|format| PrimitiveDateTime::parse(raw, format).ok())
    {
        return Some(parsed.assume_utc());
    }
    Date::parse(raw, DATE_FORMAT)
        .ok()
        .map(|date| date.midnight().assume_utc())
}

/// Render a timestamp as RFC 3339.
///
/// # Errors
/// Returns an error when the timestamp is outside the range RFC 3339 can express.
pub fn format_rfc3339(ts: OffsetDateTime) -> Result<String, time::error::Format> {
    ts.format(&Rfc3339)
}

/// Current UTC time rendered as RFC 3339.
///
/// # Errors
/// Returns an error when the clock is outside the range RFC 3339 can express.
pub fn now_rfc3339() -> Result<String, time::error::Format> {
    format_rfc3339(OffsetDateTime::now_utc())
}

/// Combine the editable date and time parts into the stored `day` value.
#[must_use]
pub fn join_day(date: &str, time: &str) -> String {
    format!("{date} {time}").trim().to_owned()
}

/// Split a stored `day` value into its date and time parts.
#[must_use]
pub fn split_day(day: &str) -> (String, String) {
    let mut parts = day.split(' ');
    let date = parts.next().unwrap_or_default().to_owned();
    let time = parts.next().unwrap_or_default().to_owned();
    (date, time)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn parses_due_day_format() {
        assert_eq!(parse_timestamp("2024-03-05 14:30"), Some(datetime!(2024-03-05 14:30 UTC)));
    }

    #[test]
    fn parses_rfc3339_with_fraction_and_offset() {
        assert_eq!(
            parse_timestamp("2024-01-02T09:00:00.000+09:00"),
            Some(datetime!(2024-01-02 00:00 UTC))
        );
    }

    #[test]
    fn parses_bare_date_as_midnight() {
        assert_eq!(parse_timestamp("2024-01-01"), Some(datetime!(2024-01-01 0:00 UTC)));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("tomorrow"), None);
        assert_eq!(parse_timestamp("2024-13-01 10:00"), None);
    }

    #[test]
    fn join_trims_missing_parts() {
        assert_eq!(join_day("2024-01-01", "10:00"), "2024-01-01 10:00");
        assert_eq!(join_day("2024-01-01", ""), "2024-01-01");
        assert_eq!(join_day("", ""), "");
    }

    #[test]
    fn split_tolerates_missing_time() {
        assert_eq!(
            split_day("2024-01-01 10:00"),
            ("2024-01-01".to_owned(), "10:00".to_owned())
        );
        assert_eq!(split_day("2024-01-01"), ("2024-01-01".to_owned(), String::new()));
        assert_eq!(split_day(""), (String::new(), String::new()));
    }

    #[test]
    fn rfc3339_output_parses_back() {
        let ts = datetime!(2024-06-01 08:15:00 UTC);
        let rendered = format_rfc3339(ts).unwrap_or_else(|err| panic!("must format: {err}"));
        assert_eq!(rendered, "2024-06-01T08:15:00Z");
        assert_eq!(parse_timestamp(&rendered), Some(ts));
    }
}
