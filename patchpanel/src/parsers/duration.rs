//! Composite duration strings such as `5m`, `-1h30m`, or `1.5s`.

use chrono::TimeDelta;
use std::time::Duration;

/// Errors from [`parse_duration`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DurationError {
    /// Input does not follow the `[-+]number unit ...` grammar.
    #[error("invalid duration {0:?}")]
    Invalid(String),

    /// A number is not followed by a unit.
    #[error("missing unit in duration {0:?}")]
    MissingUnit(String),

    /// A unit suffix is not one of `ns us µs μs ms s m h`.
    #[error("unknown unit {unit:?} in duration {input:?}")]
    UnknownUnit {
        /// Offending unit
        unit: String,
        /// Whole input
        input: String,
    },

    /// A negative duration was read into an unsigned [`Duration`].
    #[error("negative duration {0:?}")]
    Negative(String),

    /// The duration does not fit in a signed 64-bit nanosecond count.
    #[error("duration {0:?} out of range")]
    Overflow(String),
}

const NANOS_PER_SEC: u128 = 1_000_000_000;
const MAX_NANOS: u128 = i64::MAX as u128;
// One more than `MAX_NANOS`: the magnitude of `i64::MIN`.
const MAX_NEGATIVE_NANOS: u128 = MAX_NANOS + 1;

fn unit_nanos(unit: &str) -> Option<u128> {
    Some(match unit {
        "ns" => 1,
        "us" | "µs" | "μs" => 1_000,
        "ms" => 1_000_000,
        "s" => NANOS_PER_SEC,
        "m" => 60 * NANOS_PER_SEC,
        "h" => 3_600 * NANOS_PER_SEC,
        _ => return None,
    })
}

/// Parse a signed duration made of one or more `number[.fraction]unit` groups.
///
/// `"0"` is accepted without a unit, and a leading `+` or `-` applies to the
/// whole duration. The result must fit in a signed 64-bit nanosecond count.
pub fn parse_duration(input: &str) -> Result<TimeDelta, DurationError> {
    let invalid = || DurationError::Invalid(input.to_string());
    let overflow = || DurationError::Overflow(input.to_string());

    let (negative, mut rest) = match input.as_bytes().first() {
        Some(b'-') => (true, &input[1..]),
        Some(b'+') => (false, &input[1..]),
        _ => (false, input),
    };
    if rest == "0" {
        return Ok(TimeDelta::zero());
    }
    if rest.is_empty() {
        return Err(invalid());
    }
    let limit = if negative { MAX_NEGATIVE_NANOS } else { MAX_NANOS };

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let int_len = rest.bytes().take_while(u8::is_ascii_digit).count();
        let int_digits = &rest[..int_len];
        rest = &rest[int_len..];

        let mut frac_digits = "";
        if let Some(after_dot) = rest.strip_prefix('.') {
            let frac_len = after_dot.bytes().take_while(u8::is_ascii_digit).count();
            frac_digits = &after_dot[..frac_len];
            rest = &after_dot[frac_len..];
        }
        if int_digits.is_empty() && frac_digits.is_empty() {
            return Err(invalid());
        }

        let unit_len = rest
            .char_indices()
            .find(|(_, c)| *c == '.' || c.is_ascii_digit())
            .map_or(rest.len(), |(i, _)| i);
        if unit_len == 0 {
            return Err(DurationError::MissingUnit(input.to_string()));
        }
        let unit = &rest[..unit_len];
        rest = &rest[unit_len..];
        let scale = unit_nanos(unit).ok_or_else(|| DurationError::UnknownUnit {
            unit: unit.to_string(),
            input: input.to_string(),
        })?;

        let whole = if int_digits.is_empty() {
            0
        } else {
            int_digits.parse::<u128>().map_err(|_| overflow())?
        };
        let mut nanos = whole.checked_mul(scale).ok_or_else(overflow)?;

        // Digits beyond nanosecond precision cannot change the result.
        let frac_digits = &frac_digits[..frac_digits.len().min(18)];
        if !frac_digits.is_empty() {
            let frac = frac_digits.parse::<u128>().map_err(|_| invalid())?;
            let denom = 10u128.pow(frac_digits.len() as u32);
            nanos += frac * scale / denom;
        }

        total = total.checked_add(nanos).ok_or_else(overflow)?;
        if total > limit {
            return Err(overflow());
        }
    }

    let signed = if negative {
        -(total as i128)
    } else {
        total as i128
    };
    let nanos = i64::try_from(signed).map_err(|_| overflow())?;
    Ok(TimeDelta::nanoseconds(nanos))
}

/// Parse a duration that must not be negative.
///
/// Same grammar as [`parse_duration`]; `-0` and `-0s` are still zero.
pub fn parse_std_duration(input: &str) -> Result<Duration, DurationError> {
    parse_duration(input)?
        .to_std()
        .map_err(|_| DurationError::Negative(input.to_string()))
}
