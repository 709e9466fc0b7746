//! Query timestamps and configured time windows.
//!
//! Queries carry an optional `YYYY-MM-DDThh:mm` timestamp. Rule windows are
//! written in 12-hour clock notation (`"6:00AM - 9:00AM"`) and only their
//! clock time is compared against the query, on the query's own date.

use chrono::{Datelike, NaiveDateTime, NaiveTime, Weekday};
use std::fmt;

/// Format of query timestamps.
pub const QUERY_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Format of each bound of a rule window.
const WINDOW_BOUND_FORMAT: &str = "%I:%M%p";

/// Separator between the two bounds of a rule window.
const WINDOW_SEPARATOR: &str = " - ";

/// Error returned when parsing a timestamp or a time window.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimeError {
    /// Query timestamp is not `YYYY-MM-DDThh:mm`
    #[error("invalid timestamp {0:?}: expected YYYY-MM-DDThh:mm")]
    InvalidTimestamp(String),

    /// Configured window is not `<h:mmAM> - <h:mmPM>`
    #[error("invalid time window {window:?}: {reason}")]
    InvalidTimeWindow {
        window: String,
        reason: &'static str,
    },
}

/// A validated query timestamp, minute precision.
///
/// # Examples
///
/// ```
/// use route_server::domain::QueryTime;
///
/// let at = QueryTime::parse("2019-01-31T08:00").unwrap();
/// assert_eq!(at.weekday_name(), "Thursday");
/// assert!(QueryTime::parse("2019-01-31 08:00").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryTime(NaiveDateTime);

impl QueryTime {
    /// Parse a timestamp in `YYYY-MM-DDThh:mm` format.
    pub fn parse(s: &str) -> Result<Self, TimeError> {
        // Reject unpadded fields, which chrono would otherwise accept
        if s.len() != 16 {
            return Err(TimeError::InvalidTimestamp(s.to_string()));
        }

        NaiveDateTime::parse_from_str(s, QUERY_TIME_FORMAT)
            .map(Self)
            .map_err(|_| TimeError::InvalidTimestamp(s.to_string()))
    }

    /// The clock time of the query.
    pub fn time(&self) -> NaiveTime {
        self.0.time()
    }

    /// The day of week of the query.
    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    /// Full English name of the query's weekday, as rule tables spell it.
    pub fn weekday_name(&self) -> &'static str {
        weekday_name(self.weekday())
    }
}

impl fmt::Debug for QueryTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QueryTime({})", self)
    }
}

impl fmt::Display for QueryTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(QUERY_TIME_FORMAT))
    }
}

/// Full English weekday name.
///
/// chrono's own `Display` abbreviates (`Mon`), while rule tables use full names.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Returns true if `name` is a full English weekday name.
pub fn is_weekday_name(name: &str) -> bool {
    [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ]
    .into_iter()
    .any(|d| weekday_name(d) == name)
}

/// A clock-time window, inclusive at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: NaiveTime,
    end: NaiveTime,
}

impl TimeWindow {
    /// Create a window from its bounds.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Parse a window like `"6:00AM - 9:00AM"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use route_server::domain::TimeWindow;
    /// use chrono::NaiveTime;
    ///
    /// let night = TimeWindow::parse("12:00AM - 6:00AM").unwrap();
    /// assert_eq!(night.start(), NaiveTime::from_hms_opt(0, 0, 0).unwrap());
    /// assert_eq!(night.end(), NaiveTime::from_hms_opt(6, 0, 0).unwrap());
    ///
    /// assert!(TimeWindow::parse("06:00-09:00").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, TimeError> {
        let (start, end) = s
            .split_once(WINDOW_SEPARATOR)
            .ok_or_else(|| TimeError::InvalidTimeWindow {
                window: s.to_string(),
                reason: "expected \"<start> - <end>\"",
            })?;

        let start = parse_bound(s, start)?;
        let end = parse_bound(s, end)?;

        Ok(Self { start, end })
    }

    /// Start of the window.
    pub fn start(&self) -> NaiveTime {
        self.start
    }

    /// End of the window.
    pub fn end(&self) -> NaiveTime {
        self.end
    }

    /// Returns true if the query's clock time lies within the window.
    ///
    /// Only the time of day is compared; a window whose end precedes its
    /// start never matches.
    pub fn contains(&self, at: &QueryTime) -> bool {
        let t = at.time();
        self.start <= t && t <= self.end
    }

    /// Returns true if the two windows share at least one minute.
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.start.format("%-I:%M%p"),
            WINDOW_SEPARATOR,
            self.end.format("%-I:%M%p")
        )
    }
}

fn parse_bound(window: &str, bound: &str) -> Result<NaiveTime, TimeError> {
    NaiveTime::parse_from_str(bound.trim(), WINDOW_BOUND_FORMAT).map_err(|_| {
        TimeError::InvalidTimeWindow {
            window: window.to_string(),
            reason: "bounds must look like 6:00AM",
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn at(s: &str) -> QueryTime {
        QueryTime::parse(s).unwrap()
    }

    #[test]
    fn parse_query_time() {
        let t = at("2019-01-31T17:05");
        assert_eq!(t.time(), hm(17, 5));
        assert_eq!(t.weekday(), Weekday::Thu);
        assert_eq!(t.to_string(), "2019-01-31T17:05");
    }

    #[test]
    fn reject_malformed_query_time() {
        assert!(QueryTime::parse("").is_err());
        assert!(QueryTime::parse("2019-01-31").is_err());
        assert!(QueryTime::parse("2019-01-31T8:00").is_err());
        assert!(QueryTime::parse("2019-01-31 08:00").is_err());
        assert!(QueryTime::parse("2019-13-01T08:00").is_err());
        assert!(QueryTime::parse("2019-01-31T24:00").is_err());
        assert!(QueryTime::parse("2019-01-31T08:00:00").is_err());
    }

    #[test]
    fn timestamp_error_message() {
        let err = QueryTime::parse("yesterday").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid timestamp \"yesterday\": expected YYYY-MM-DDThh:mm"
        );
    }

    #[test]
    fn weekday_names_are_full() {
        assert_eq!(weekday_name(Weekday::Mon), "Monday");
        assert_eq!(weekday_name(Weekday::Sun), "Sunday");
        assert!(is_weekday_name("Friday"));
        assert!(!is_weekday_name("Fri"));
        assert!(!is_weekday_name("friday"));
    }

    #[test]
    fn parse_windows() {
        let peak = TimeWindow::parse("6:00AM - 9:00AM").unwrap();
        assert_eq!(peak.start(), hm(6, 0));
        assert_eq!(peak.end(), hm(9, 0));

        let late = TimeWindow::parse("10:00PM - 11:59PM").unwrap();
        assert_eq!(late.start(), hm(22, 0));
        assert_eq!(late.end(), hm(23, 59));

        let midnight = TimeWindow::parse("12:00AM - 6:00AM").unwrap();
        assert_eq!(midnight.start(), hm(0, 0));
    }

    #[test]
    fn reject_malformed_windows() {
        assert!(TimeWindow::parse("default").is_err());
        assert!(TimeWindow::parse("6:00AM-9:00AM").is_err());
        assert!(TimeWindow::parse("6:00 - 9:00").is_err());
        assert!(TimeWindow::parse("13:00PM - 2:00PM").is_err());
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let peak = TimeWindow::parse("6:00AM - 9:00AM").unwrap();
        assert!(peak.contains(&at("2019-01-31T06:00")));
        assert!(peak.contains(&at("2019-01-31T08:00")));
        assert!(peak.contains(&at("2019-01-31T09:00")));
        assert!(!peak.contains(&at("2019-01-31T09:01")));
        assert!(!peak.contains(&at("2019-01-31T05:59")));
    }

    #[test]
    fn window_ignores_date() {
        let evening = TimeWindow::parse("6:00PM - 9:00PM").unwrap();
        assert!(evening.contains(&at("2001-06-15T19:30")));
        assert!(evening.contains(&at("2030-12-31T19:30")));
    }

    #[test]
    fn overlapping_windows() {
        let a = TimeWindow::new(hm(6, 0), hm(9, 0));
        let b = TimeWindow::new(hm(8, 0), hm(10, 0));
        let c = TimeWindow::new(hm(18, 0), hm(21, 0));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn window_display() {
        let w = TimeWindow::parse("6:00PM - 9:00PM").unwrap();
        assert_eq!(w.to_string(), "6:00PM - 9:00PM");
    }
}
