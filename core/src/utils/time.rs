/**
 * Every artifact family stores time differently:
 *   Chromium (WebKit): microseconds since 1601-01-01
 *   Firefox (Mozilla): microseconds since 1970-01-01
 *   Registry: FILETIME (100 nanosecond intervals since 1601-01-01)
 *   EventLogs: ISO8601 string
 *
 * All of them are converted to `DateTime<Utc>`. Missing or zero values become the sentinel `DateTime::<Utc>::MIN_UTC`
 */
use chrono::{DateTime, NaiveDateTime, Utc};
use log::warn;

/// Seconds between 1601-01-01 and 1970-01-01
const SECONDS_TO_UNIX: i64 = 11644473600;

/// The canonical "timestamp unknown" value
pub fn sentinel_time() -> DateTime<Utc> {
    DateTime::<Utc>::MIN_UTC
}

/// Check if a timestamp is the "timestamp unknown" value
pub fn is_sentinel(timestamp: &DateTime<Utc>) -> bool {
    *timestamp == DateTime::<Utc>::MIN_UTC
}

/// Convert WebKit time (microseconds since 1601) to `DateTime<Utc>`
pub fn webkit_to_datetime(webkit_time: i64) -> DateTime<Utc> {
    if webkit_time <= 0 {
        return sentinel_time();
    }
    let micro = 1000000;
    let nano_adjust = 1000;

    let seconds = webkit_time / micro - SECONDS_TO_UNIX;
    let nanos = (webkit_time % micro) * nano_adjust;

    DateTime::from_timestamp(seconds, nanos as u32).unwrap_or_else(sentinel_time)
}

/// Convert Mozilla time (microseconds since 1970) to `DateTime<Utc>`
pub fn mozilla_to_datetime(mozilla_time: i64) -> DateTime<Utc> {
    if mozilla_time <= 0 {
        return sentinel_time();
    }
    let micro = 1000000;
    let nano_adjust = 1000;

    // Euclidean division keeps the seconds from being rounded across a day boundary
    let seconds = mozilla_time.div_euclid(micro);
    let nanos = mozilla_time.rem_euclid(micro) * nano_adjust;

    DateTime::from_timestamp(seconds, nanos as u32).unwrap_or_else(sentinel_time)
}

/// Convert Windows FILETIME values (Registry last write times) to `DateTime<Utc>`
pub fn filetime_to_datetime(filetime: u64) -> DateTime<Utc> {
    if filetime == 0 {
        return sentinel_time();
    }
    let windows_nano = 10000000;
    let nano_adjust = 100;

    // We should not overflow because of the division.
    let seconds = (filetime / windows_nano) as i64 - SECONDS_TO_UNIX;
    let nanos = (filetime % windows_nano) * nano_adjust;

    DateTime::from_timestamp(seconds, nanos as u32).unwrap_or_else(sentinel_time)
}

/// Parse an ISO8601 timestamp such as `2023-10-25T12:00:00.000000Z`. A trailing `Z` is treated as `+00:00`
/// Timestamps without any offset are assumed to be UTC
pub fn iso8601_to_datetime(timestamp: &str) -> Option<DateTime<Utc>> {
    let value = timestamp.trim();
    let normalized = match value.strip_suffix('Z').or_else(|| value.strip_suffix('z')) {
        Some(without_zulu) => format!("{without_zulu}+00:00"),
        None => value.to_string(),
    };

    if let Ok(result) = DateTime::parse_from_rfc3339(&normalized) {
        return Some(result.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Parse an ISO8601 timestamp. If the value is malformed the current time is returned instead
/// and the second value is `true` so the record can be flagged as estimated
pub fn iso8601_or_now(timestamp: &str) -> (DateTime<Utc>, bool) {
    match iso8601_to_datetime(timestamp) {
        Some(result) => (result, false),
        None => {
            warn!("[time] Could not parse timestamp {timestamp:?}, using extraction time");
            (Utc::now(), true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        filetime_to_datetime, is_sentinel, iso8601_or_now, iso8601_to_datetime,
        mozilla_to_datetime, sentinel_time, webkit_to_datetime,
    };
    use chrono::{Datelike, NaiveDate, TimeZone, Timelike, Utc};

    #[test]
    fn test_webkit_to_datetime() {
        let result = webkit_to_datetime(13253952000000000);
        assert_eq!(
            result.date_naive(),
            NaiveDate::from_ymd_opt(2021, 1, 1).unwrap()
        );
        assert_eq!(result.timestamp(), 1609478400);
    }

    #[test]
    fn test_webkit_to_datetime_microseconds() {
        // 2021-01-01T00:00:00.250000Z
        let result = webkit_to_datetime(13253932800250000);
        assert_eq!(result, Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap() + chrono::Duration::milliseconds(250));
    }

    #[test]
    fn test_webkit_to_datetime_zero() {
        assert_eq!(webkit_to_datetime(0), sentinel_time());
        assert!(is_sentinel(&webkit_to_datetime(0)));
        assert!(is_sentinel(&webkit_to_datetime(-5)));
    }

    #[test]
    fn test_mozilla_to_datetime() {
        let result = mozilla_to_datetime(1672531200000000);
        assert_eq!(result, Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_mozilla_to_datetime_truncation() {
        // One microsecond before midnight must stay on the previous day
        let result = mozilla_to_datetime(1672531199999999);
        assert_eq!(result.year(), 2022);
        assert_eq!(result.day(), 31);
        assert_eq!(result.nanosecond(), 999999000);
        assert!(is_sentinel(&mozilla_to_datetime(0)));
    }

    #[test]
    fn test_filetime_to_datetime() {
        // 2019-11-27T01:54:06Z
        let result = filetime_to_datetime(132192932460000000);
        assert_eq!(result, Utc.with_ymd_and_hms(2019, 11, 27, 1, 54, 6).unwrap());
        assert!(is_sentinel(&filetime_to_datetime(0)));
    }

    #[test]
    fn test_iso8601_to_datetime() {
        let result = iso8601_to_datetime("2023-10-25T12:00:00.000000Z").unwrap();
        assert_eq!(result, Utc.with_ymd_and_hms(2023, 10, 25, 12, 0, 0).unwrap());

        let result = iso8601_to_datetime("2019-03-08T23:14:20.5324112Z").unwrap();
        assert_eq!(result.second(), 20);

        let result = iso8601_to_datetime("2023-10-25T14:00:00+02:00").unwrap();
        assert_eq!(result, Utc.with_ymd_and_hms(2023, 10, 25, 12, 0, 0).unwrap());

        let result = iso8601_to_datetime("2023-10-25T12:00:00").unwrap();
        assert_eq!(result, Utc.with_ymd_and_hms(2023, 10, 25, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_iso8601_to_datetime_bad() {
        assert_eq!(iso8601_to_datetime("yesterday"), None);
        assert_eq!(iso8601_to_datetime(""), None);
    }

    #[test]
    fn test_iso8601_or_now_fallback() {
        let before = Utc::now();
        let (result, estimated) = iso8601_or_now("not a time");
        assert!(estimated);
        assert!(result >= before);

        let (result, estimated) = iso8601_or_now("2023-10-25T12:00:00.000000Z");
        assert!(!estimated);
        assert_eq!(result, Utc.with_ymd_and_hms(2023, 10, 25, 12, 0, 0).unwrap());
    }
}
