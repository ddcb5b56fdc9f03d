//! Timestamps, parsed with a named layout.

use chrono::format::{self, Parsed, StrftimeItems};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

/// Hint key that selects a layout from [`LAYOUTS`].
pub const TIME_FORMAT_HINT: &str = "timeFormat";

/// Errors from [`parse_timestamp`].
#[derive(Debug, thiserror::Error)]
pub enum TimestampError {
    /// The `timeFormat` hint holds something other than a string.
    #[error("timeFormat parser hint must be a string")]
    HintNotString,

    /// The `timeFormat` hint names no known layout.
    #[error("unknown timeFormat provided: {0:?}")]
    UnknownFormat(String),

    /// A layout with a zone abbreviation was given input without one.
    #[error("missing time zone abbreviation in {0:?}")]
    MissingZone(String),

    /// Input does not match the layout.
    #[error("parsing time {input:?} as {layout}: {source}")]
    Parse {
        /// Raw input
        input: String,
        /// Layout name
        layout: &'static str,
        /// Parser failure
        source: chrono::ParseError,
    },
}

/// How much of a timestamp a layout carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    /// RFC 3339, fractional seconds allowed.
    Rfc3339,
    /// Date, time, and numeric offset.
    Zoned,
    /// Date and time, read as UTC.
    Naive,
    /// Date and time with an alphabetic zone name at word `index`, read as UTC.
    NamedZone(usize),
    /// Month, day, and time; year 0, UTC.
    NoYear,
    /// Calendar date at midnight UTC.
    Date,
    /// Time of day on year 0 January 1, UTC.
    Time,
}

/// A named timestamp layout.
#[derive(Debug, Clone, Copy)]
pub struct Layout {
    name: &'static str,
    pattern: &'static str,
    shape: Shape,
}

impl Layout {
    /// Name used in the `timeFormat` hint.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// `strftime`-style pattern, with any zone-name word removed.
    pub fn pattern(&self) -> &'static str {
        self.pattern
    }

    fn parse(&self, input: &str) -> Result<DateTime<FixedOffset>, TimestampError> {
        let fail = |source: chrono::ParseError| TimestampError::Parse {
            input: input.to_string(),
            layout: self.name,
            source,
        };
        let utc = |naive: NaiveDateTime| Utc.from_utc_datetime(&naive).fixed_offset();

        match self.shape {
            Shape::Rfc3339 => DateTime::parse_from_rfc3339(input).map_err(fail),
            Shape::Zoned => fields(input, self.pattern)
                .and_then(|parsed| parsed.to_datetime())
                .map_err(fail),
            Shape::Naive => fields(input, self.pattern)
                .and_then(|parsed| parsed.to_naive_datetime_with_offset(0))
                .map(utc)
                .map_err(fail),
            Shape::NamedZone(index) => {
                let mut words: Vec<&str> = input.split_whitespace().collect();
                let zone_is_name = words
                    .get(index)
                    .is_some_and(|w| w.len() >= 3 && w.chars().all(|c| c.is_ascii_alphabetic()));
                if !zone_is_name {
                    return Err(TimestampError::MissingZone(input.to_string()));
                }
                words.remove(index);
                fields(&words.join(" "), self.pattern)
                    .and_then(|parsed| parsed.to_naive_datetime_with_offset(0))
                    .map(utc)
                    .map_err(fail)
            }
            Shape::NoYear => {
                let with_year = format!("0000 {}", input.trim_start());
                let pattern = format!("%Y {}", self.pattern);
                NaiveDateTime::parse_from_str(&with_year, &pattern)
                    .map(utc)
                    .map_err(fail)
            }
            Shape::Date => NaiveDate::parse_from_str(input, self.pattern)
                .map(|date| utc(date.and_time(NaiveTime::MIN)))
                .map_err(fail),
            Shape::Time => NaiveTime::parse_from_str(input, self.pattern)
                .map(|time| utc(year_zero().and_time(time)))
                .map_err(fail),
        }
    }
}

/// Parse `input` against `pattern`, keeping the weekday name as syntax only.
fn fields(input: &str, pattern: &str) -> Result<Parsed, chrono::ParseError> {
    let mut parsed = Parsed::new();
    format::parse(&mut parsed, input, StrftimeItems::new(pattern))?;
    parsed.weekday = None;
    Ok(parsed)
}

/// Layouts selectable through the `timeFormat` hint.
pub const LAYOUTS: &[Layout] = &[
    Layout { name: "Layout", pattern: "%m/%d %I:%M:%S%p '%y %z", shape: Shape::Zoned },
    Layout { name: "ANSIC", pattern: "%a %b %e %H:%M:%S %Y", shape: Shape::Naive },
    Layout { name: "UnixDate", pattern: "%a %b %e %H:%M:%S %Y", shape: Shape::NamedZone(4) },
    Layout { name: "RubyDate", pattern: "%a %b %d %H:%M:%S %z %Y", shape: Shape::Zoned },
    Layout { name: "RFC822", pattern: "%d %b %y %H:%M", shape: Shape::NamedZone(4) },
    Layout { name: "RFC822Z", pattern: "%d %b %y %H:%M %z", shape: Shape::Zoned },
    Layout { name: "RFC850", pattern: "%A, %d-%b-%y %H:%M:%S", shape: Shape::NamedZone(3) },
    Layout { name: "RFC1123", pattern: "%a, %d %b %Y %H:%M:%S", shape: Shape::NamedZone(5) },
    Layout { name: "RFC1123Z", pattern: "%a, %d %b %Y %H:%M:%S %z", shape: Shape::Zoned },
    Layout { name: "RFC3339", pattern: "%Y-%m-%dT%H:%M:%S%:z", shape: Shape::Rfc3339 },
    Layout { name: "RFC3339Nano", pattern: "%Y-%m-%dT%H:%M:%S%.f%:z", shape: Shape::Rfc3339 },
    Layout { name: "Kitchen", pattern: "%I:%M%p", shape: Shape::Time },
    Layout { name: "Stamp", pattern: "%b %e %H:%M:%S", shape: Shape::NoYear },
    Layout { name: "StampMilli", pattern: "%b %e %H:%M:%S%.3f", shape: Shape::NoYear },
    Layout { name: "StampMicro", pattern: "%b %e %H:%M:%S%.6f", shape: Shape::NoYear },
    Layout { name: "StampNano", pattern: "%b %e %H:%M:%S%.9f", shape: Shape::NoYear },
    Layout { name: "DateTime", pattern: "%Y-%m-%d %H:%M:%S", shape: Shape::Naive },
    Layout { name: "DateOnly", pattern: "%Y-%m-%d", shape: Shape::Date },
    Layout { name: "TimeOnly", pattern: "%H:%M:%S", shape: Shape::Time },
];

/// Layout used when no hint is given.
pub const DEFAULT_LAYOUT: &str = "RFC3339";

/// Look up a layout by name.
pub fn layout(name: &str) -> Option<&'static Layout> {
    LAYOUTS.iter().find(|layout| layout.name == name)
}

fn year_zero() -> NaiveDate {
    NaiveDate::from_ymd_opt(0, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// The zero timestamp, `0001-01-01T00:00:00Z`, returned alongside failures.
pub fn zero_timestamp() -> DateTime<FixedOffset> {
    let date = NaiveDate::from_ymd_opt(1, 1, 1).unwrap_or(NaiveDate::MIN);
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
        .fixed_offset()
}

/// Parse `input` with the layout named `format`, or RFC 3339 when `None`.
pub fn parse_timestamp(
    input: &str,
    format: Option<&str>,
) -> Result<DateTime<FixedOffset>, TimestampError> {
    let name = format.unwrap_or(DEFAULT_LAYOUT);
    let layout = layout(name).ok_or_else(|| TimestampError::UnknownFormat(name.to_string()))?;
    layout.parse(input)
}
