//! Timestamp rendering in the reader's time zone.

use std::fmt;

use jiff::{Timestamp, tz::TimeZone};

/// Renders a UTC [`Timestamp`] in the system time zone as
/// `YYYY-MM-DD HH:MM:SS TZ`.
///
/// Plans store UTC; only display converts.
pub struct LocalDateTime<'a>(pub &'a Timestamp);

impl LocalDateTime<'_> {
    fn in_zone(&self, tz: TimeZone) -> String {
        self.0.to_zoned(tz).strftime("%Y-%m-%d %H:%M:%S %Z").to_string()
    }
}

impl fmt::Display for LocalDateTime<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.in_zone(TimeZone::system()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utc_rendering() {
        let ts = Timestamp::from_second(1640995200).unwrap(); // 2022-01-01 00:00:00 UTC
        let rendered = LocalDateTime(&ts).in_zone(TimeZone::UTC);
        assert_eq!(rendered, "2022-01-01 00:00:00 UTC");
    }
}
