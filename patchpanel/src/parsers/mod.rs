//! Built-in parser functions and helpers for building new ones.
//!
//! | Type | Accepts |
//! |---|---|
//! | `String` | anything, unchanged |
//! | `bool` | `1 t T TRUE true True 0 f F FALSE false False` |
//! | `i64` | base-10 signed integers |
//! | `chrono::TimeDelta` | `5m`, `-1h30m`, `500ms`, ... |
//! | [`std::time::Duration`] | the same, non-negative only |
//! | `chrono::DateTime<FixedOffset>` | RFC 3339, or the layout named by the `timeFormat` hint |

mod duration;
mod timestamp;

pub use duration::{parse_duration, parse_std_duration, DurationError};
pub use timestamp::{
    layout, parse_timestamp, zero_timestamp, Layout, TimestampError, DEFAULT_LAYOUT, LAYOUTS,
    TIME_FORMAT_HINT,
};

use crate::error::{BoxError, ParseError};
use crate::hints::Hints;
use crate::value::{TypeKey, Value};
use chrono::{DateTime, FixedOffset, TimeDelta};
use serde::de::DeserializeOwned;
use std::any::Any;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// A parser function: raw tag string plus hints in, coerced value out.
pub type Parser = Arc<dyn Fn(&str, &Hints) -> Result<Value, ParseError> + Send + Sync>;

/// Box a typed parsing closure as a [`Parser`].
pub fn typed<T, F>(parse: F) -> Parser
where
    T: Any + Send + Sync,
    F: Fn(&str, &Hints) -> Result<T, ParseError> + Send + Sync + 'static,
{
    Arc::new(move |raw: &str, hints: &Hints| parse(raw, hints).map(Value::new))
}

/// Parser for any `T: FromStr`, ignoring hints.
pub fn from_str<T>() -> Parser
where
    T: FromStr + Any + Send + Sync,
    T::Err: Into<BoxError>,
{
    typed(|raw, _| raw.parse::<T>().map_err(ParseError::new))
}

/// Parser that reads the raw string as JSON into `T`.
///
/// Useful for list and map fields, e.g. `#[tag(default = r#"["a","b"]"#)]`.
pub fn json<T>() -> Parser
where
    T: DeserializeOwned + Any + Send + Sync,
{
    typed(|raw, _| serde_json::from_str::<T>(raw).map_err(ParseError::new))
}

/// Invalid boolean token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid boolean {0:?}")]
pub struct BoolError(pub String);

/// Parse the canonical boolean tokens.
pub fn parse_bool(raw: &str) -> Result<bool, BoolError> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(BoolError(raw.to_string())),
    }
}

fn parse_text(raw: &str, _: &Hints) -> Result<String, ParseError> {
    Ok(raw.to_string())
}

fn parse_flag(raw: &str, _: &Hints) -> Result<bool, ParseError> {
    parse_bool(raw).map_err(|e| ParseError::new(e).with_partial(false))
}

fn parse_integer(raw: &str, _: &Hints) -> Result<i64, ParseError> {
    raw.parse::<i64>()
        .map_err(|e| ParseError::new(e).with_partial(0i64))
}

fn parse_span(raw: &str, _: &Hints) -> Result<TimeDelta, ParseError> {
    parse_duration(raw).map_err(|e| ParseError::new(e).with_partial(TimeDelta::zero()))
}

fn parse_std_span(raw: &str, _: &Hints) -> Result<Duration, ParseError> {
    parse_std_duration(raw).map_err(|e| ParseError::new(e).with_partial(Duration::ZERO))
}

fn parse_instant(raw: &str, hints: &Hints) -> Result<DateTime<FixedOffset>, ParseError> {
    let fail = |e: TimestampError| ParseError::new(e).with_partial(zero_timestamp());
    let format = match hints.get(TIME_FORMAT_HINT) {
        None => None,
        Some(hint) => Some(
            hint.downcast_ref::<String>()
                .map(String::as_str)
                .ok_or_else(|| fail(TimestampError::HintNotString))?,
        ),
    };
    parse_timestamp(raw, format).map_err(fail)
}

/// The parsers every [`PatchPanel`](crate::PatchPanel) starts with.
pub fn builtins() -> Vec<(TypeKey, Parser)> {
    vec![
        (TypeKey::of::<String>(), typed(parse_text)),
        (TypeKey::of::<bool>(), typed(parse_flag)),
        (TypeKey::of::<i64>(), typed(parse_integer)),
        (TypeKey::of::<TimeDelta>(), typed(parse_span)),
        (TypeKey::of::<Duration>(), typed(parse_std_span)),
        (TypeKey::of::<DateTime<FixedOffset>>(), typed(parse_instant)),
    ]
}
