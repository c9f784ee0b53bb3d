//! Duration text format
//!
//! Durations are written as `[-]d` (whole days) or `[-][d.]hh:mm[:ss[.fffffff]]`.
//! Hours run 0-23, minutes and seconds 0-59, and the fraction carries at most
//! seven digits (100 ns ticks).

use chrono::TimeDelta;
use serde::{Deserialize, Deserializer};

const MAX_FRACTION_DIGITS: usize = 7;

/// Parse a duration in the standard text format
pub fn parse_duration(s: &str) -> Option<TimeDelta> {
    let trimmed = s.trim();
    let (negative, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    if body.is_empty() {
        return None;
    }

    let magnitude = if body.contains(':') {
        parse_clock(body)?
    } else {
        TimeDelta::try_days(parse_digits(body)?)?
    };

    Some(if negative { -magnitude } else { magnitude })
}

/// `[d.]hh:mm[:ss[.fffffff]]`
fn parse_clock(body: &str) -> Option<TimeDelta> {
    let first_colon = body.find(':')?;
    let (days, clock) = match body[..first_colon].find('.') {
        Some(dot) => (parse_digits(&body[..dot])?, &body[dot + 1..]),
        None => (0, body),
    };

    let mut parts = clock.split(':');
    let hours = parse_bounded(parts.next()?, 23)?;
    let minutes = parse_bounded(parts.next()?, 59)?;
    let (seconds, nanos) = match parts.next() {
        Some(sec) => parse_seconds(sec)?,
        None => (0, 0),
    };
    if parts.next().is_some() {
        return None;
    }

    let total_secs = days
        .checked_mul(86_400)?
        .checked_add(hours * 3_600 + minutes * 60 + seconds)?;
    TimeDelta::new(total_secs, nanos)
}

/// `ss[.fffffff]`
fn parse_seconds(s: &str) -> Option<(i64, u32)> {
    let (whole, fraction) = match s.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (s, None),
    };
    let seconds = parse_bounded(whole, 59)?;
    let nanos = match fraction {
        Some(f) if !f.is_empty() && f.len() <= MAX_FRACTION_DIGITS => {
            let digits: u32 = f.parse().ok().filter(|_| is_digits(f))?;
            digits * 10u32.pow(9 - f.len() as u32)
        }
        Some(_) => return None,
        None => 0,
    };
    Some((seconds, nanos))
}

fn parse_bounded(s: &str, max: i64) -> Option<i64> {
    parse_digits(s).filter(|v| *v <= max)
}

fn parse_digits(s: &str) -> Option<i64> {
    if !is_digits(s) {
        return None;
    }
    s.parse().ok()
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Serde helper for duration fields written in the text format
pub fn deserialize_duration<'de, D>(deserializer: D) -> Result<TimeDelta, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_duration(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid duration: {}", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_integer_is_days() {
        assert_eq!(parse_duration("123"), Some(TimeDelta::days(123)));
        assert_eq!(parse_duration("0"), Some(TimeDelta::zero()));
    }

    #[test]
    fn test_hours_minutes() {
        assert_eq!(
            parse_duration("01:02"),
            Some(TimeDelta::hours(1) + TimeDelta::minutes(2))
        );
    }

    #[test]
    fn test_hours_minutes_seconds() {
        assert_eq!(
            parse_duration("01:02:03"),
            Some(TimeDelta::hours(1) + TimeDelta::minutes(2) + TimeDelta::seconds(3))
        );
    }

    #[test]
    fn test_days_and_fraction() {
        let expected = TimeDelta::days(1)
            + TimeDelta::hours(2)
            + TimeDelta::minutes(3)
            + TimeDelta::seconds(4)
            + TimeDelta::milliseconds(500);
        assert_eq!(parse_duration("1.02:03:04.5"), Some(expected));
    }

    #[test]
    fn test_seven_digit_fraction() {
        assert_eq!(
            parse_duration("00:00:00.0000001"),
            Some(TimeDelta::nanoseconds(100))
        );
        assert_eq!(parse_duration("00:00:00.00000001"), None);
    }

    #[test]
    fn test_negative() {
        assert_eq!(parse_duration("-00:00:01"), Some(TimeDelta::seconds(-1)));
        assert_eq!(parse_duration("-2"), Some(TimeDelta::days(-2)));
    }

    #[test]
    fn test_surrounding_whitespace() {
        assert_eq!(parse_duration("  00:01 "), Some(TimeDelta::minutes(1)));
    }

    #[test]
    fn test_rejects_out_of_range_components() {
        assert_eq!(parse_duration("24:00"), None);
        assert_eq!(parse_duration("00:60"), None);
        assert_eq!(parse_duration("00:00:60"), None);
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(parse_duration("abc"), None);
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("-"), None);
        assert_eq!(parse_duration("1.5"), None);
        assert_eq!(parse_duration("00:00:00:00"), None);
        assert_eq!(parse_duration("00:00:01."), None);
        assert_eq!(parse_duration("+1"), None);
    }

    #[test]
    fn test_deserialize_duration() {
        #[derive(Deserialize)]
        struct Wrapper {
            #[serde(deserialize_with = "deserialize_duration")]
            duration: TimeDelta,
        }

        let w: Wrapper = serde_json::from_str(r#"{"duration": "00:00:01.250"}"#).unwrap();
        assert_eq!(w.duration, TimeDelta::milliseconds(1250));

        let bad: Result<Wrapper, _> = serde_json::from_str(r#"{"duration": "soon"}"#);
        assert!(bad.is_err());
    }
}
