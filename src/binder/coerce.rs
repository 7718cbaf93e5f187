//! Type coercion of raw string values

use crate::types::{AppError, BoundValue, Result, ValueKind};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

/// Date-only formats, bound at midnight
pub const DATE_FORMATS: &[&str] = &["%Y/%m/%d", "%Y-%m-%d"];

/// Date and time formats
pub const DATE_TIME_FORMATS: &[&str] = &[
    "%Y/%m/%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

/// Coerce a scalar value; compound kinds are assembled by the binder, not here
pub fn coerce(kind: ValueKind, key: &str, raw: &str) -> Result<BoundValue> {
    match kind {
        ValueKind::Text => Ok(BoundValue::Text(raw.to_string())),
        ValueKind::Integer => integer(key, raw).map(BoundValue::Integer),
        ValueKind::Boolean => boolean(key, raw).map(BoundValue::Boolean),
        ValueKind::DateTime => date_time(key, raw).map(BoundValue::DateTime),
        ValueKind::Mapping | ValueKind::Sequence | ValueKind::Nested(_) => {
            Err(AppError::unsupported_nested(key))
        }
    }
}

/// Decimal integer, surrounding whitespace ignored
pub fn integer(key: &str, raw: &str) -> Result<i32> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| AppError::bind(key, ValueKind::Integer.type_name(), raw))
}

/// `true` or `false` in any letter case
pub fn boolean(key: &str, raw: &str) -> Result<bool> {
    let value = raw.trim();
    if value.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(AppError::bind(key, ValueKind::Boolean.type_name(), raw))
    }
}

/// A date or date/time in one of the recognized formats, or RFC 3339 (taken as UTC)
pub fn date_time(key: &str, raw: &str) -> Result<NaiveDateTime> {
    let value = raw.trim();

    for format in DATE_TIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(parsed);
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Ok(date.and_time(NaiveTime::MIN));
        }
    }

    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.naive_utc())
        .map_err(|_| AppError::bind(key, ValueKind::DateTime.type_name(), raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer() {
        assert_eq!(integer("person.age", "18").unwrap(), 18);
        assert_eq!(integer("person.age", " -3 ").unwrap(), -3);
        assert_eq!(integer("person.age", "+7").unwrap(), 7);

        let err = integer("person.age", "eighteen").unwrap_err();
        assert_eq!(
            err,
            AppError::bind("person.age", "integer", "eighteen")
        );
        assert!(integer("person.age", "99999999999").is_err());
        assert!(integer("person.age", "").is_err());
    }

    #[test]
    fn test_boolean() {
        assert!(boolean("person.boss", "true").unwrap());
        assert!(boolean("person.boss", "TRUE").unwrap());
        assert!(!boolean("person.boss", "False").unwrap());
        assert!(boolean("person.boss", "yes").is_err());
        assert!(boolean("person.boss", "1").is_err());
    }

    #[test]
    fn test_date_formats() {
        let midnight = NaiveDate::from_ymd_opt(2017, 12, 12).unwrap().and_hms_opt(0, 0, 0).unwrap();
        assert_eq!(date_time("person.birth", "2017/12/12").unwrap(), midnight);
        assert_eq!(date_time("person.birth", "2017-12-12").unwrap(), midnight);

        let evening = NaiveDate::from_ymd_opt(2017, 12, 12).unwrap().and_hms_opt(18, 30, 5).unwrap();
        assert_eq!(date_time("person.birth", "2017/12/12 18:30:05").unwrap(), evening);
        assert_eq!(date_time("person.birth", "2017-12-12T18:30:05").unwrap(), evening);
        assert_eq!(date_time("person.birth", "2017-12-12T20:30:05+02:00").unwrap(), evening);
    }

    #[test]
    fn test_malformed_date() {
        let err = date_time("person.birth", "12.12.2017").unwrap_err();
        assert_eq!(err.key(), Some("person.birth"));
        assert!(date_time("person.birth", "2017/13/40").is_err());
    }

    #[test]
    fn test_coerce_dispatch() {
        assert_eq!(coerce(ValueKind::Text, "k", " a ").unwrap(), BoundValue::Text(" a ".to_string()));
        assert_eq!(coerce(ValueKind::Integer, "k", "5").unwrap(), BoundValue::Integer(5));
        assert_eq!(coerce(ValueKind::Boolean, "k", "TRUE").unwrap(), BoundValue::Boolean(true));
        assert!(matches!(
            coerce(ValueKind::Mapping, "k", "v"),
            Err(AppError::UnsupportedNestedAccess { .. })
        ));
    }
}
