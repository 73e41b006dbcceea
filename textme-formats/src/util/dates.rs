/*!
 This module contains logic to convert between the intermediary timestamp pair
 and each platform's native time representation
*/

use chrono::DateTime;

/// Seconds between the Windows epoch (1601-01-01) and the Unix epoch
pub const WINDOWS_EPOCH_OFFSET: i64 = 11_644_473_600;

const MILLIS_PER_SECOND: i64 = 1_000;
const NANOS_PER_MILLI: u32 = 1_000_000;
const TICKS_PER_SECOND: i64 = 10_000_000;
const NANOS_PER_TICK: u32 = 100;

/// Split Android epoch milliseconds into whole seconds and a nanosecond
/// remainder
pub fn from_millis(millis: i64) -> (i64, u32) {
    (
        millis.div_euclid(MILLIS_PER_SECOND),
        millis.rem_euclid(MILLIS_PER_SECOND) as u32 * NANOS_PER_MILLI,
    )
}

/// Merge a timestamp pair back into Android epoch milliseconds
///
/// Sub-millisecond precision is truncated; Android stores nothing finer.
pub fn to_millis(timestamp: i64, timestamp_ns: u32) -> i64 {
    timestamp * MILLIS_PER_SECOND + (timestamp_ns / NANOS_PER_MILLI) as i64
}

/// Split Windows FILETIME-style ticks, 100 ns intervals counted from
/// 1601-01-01, into whole seconds and a nanosecond remainder
pub fn from_ticks(ticks: i64) -> (i64, u32) {
    (
        ticks.div_euclid(TICKS_PER_SECOND) - WINDOWS_EPOCH_OFFSET,
        ticks.rem_euclid(TICKS_PER_SECOND) as u32 * NANOS_PER_TICK,
    )
}

/// Merge a timestamp pair back into Windows FILETIME-style ticks
pub fn to_ticks(timestamp: i64, timestamp_ns: u32) -> i64 {
    (timestamp + WINDOWS_EPOCH_OFFSET) * TICKS_PER_SECOND + (timestamp_ns / NANOS_PER_TICK) as i64
}

/// Format a message timestamp for reading
///
/// # Example:
///
/// ```
/// use textme_formats::util::dates::format;
///
/// let date = format(1640995200);
/// println!("{date}");
/// ```
pub fn format(timestamp: i64) -> String {
    match DateTime::from_timestamp(timestamp, 0) {
        Some(date) => date.format("%b %d, %Y %l:%M:%S %p").to_string(),
        None => String::from("Invalid date"),
    }
}

#[cfg(test)]
mod tests {
    use crate::util::dates::{format, from_millis, from_ticks, to_millis, to_ticks};

    #[test]
    fn can_split_millis() {
        assert_eq!(from_millis(1640995200123), (1640995200, 123_000_000));
        assert_eq!(from_millis(1640995260500), (1640995260, 500_000_000));
    }

    #[test]
    fn can_merge_millis() {
        assert_eq!(to_millis(1640995200, 123_000_000), 1640995200123);
        assert_eq!(to_millis(1641081600, 0), 1641081600000);
    }

    #[test]
    fn can_truncate_sub_millisecond() {
        assert_eq!(to_millis(1640995200, 123_456_789), 1640995200123);
    }

    #[test]
    fn can_split_ticks() {
        assert_eq!(from_ticks(132854688001230000), (1640995200, 123_000_000));
        assert_eq!(from_ticks(132855552000000000), (1641081600, 0));
    }

    #[test]
    fn can_merge_ticks() {
        assert_eq!(to_ticks(1640995200, 123_000_000), 132854688001230000);
        assert_eq!(to_ticks(1641081660, 250_000_000), 132855552602500000);
    }

    #[test]
    fn can_roundtrip_ticks_to_100ns() {
        for (timestamp, timestamp_ns) in [
            (0, 0),
            (1, 999_999_900),
            (1640995200, 123_456_700),
            (4102444800, 100),
        ] {
            let ticks = to_ticks(timestamp, timestamp_ns);
            assert_eq!(from_ticks(ticks), (timestamp, timestamp_ns));
        }
    }

    #[test]
    fn can_roundtrip_millis() {
        for millis in [0, 1, 999, 1000, 1640995200123] {
            let (timestamp, timestamp_ns) = from_millis(millis);
            assert_eq!(to_millis(timestamp, timestamp_ns), millis);
        }
    }

    #[test]
    fn can_format_date() {
        assert_eq!(format(1640995200), "Jan 01, 2022 12:00:00 AM");
        assert_eq!(format(1641042000), "Jan 01, 2022  1:00:00 PM");
    }
}
