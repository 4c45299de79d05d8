//! Duration units shared by the task grammar, the milestone grammar and the
//! progress rollups.
//!
//! A normalized duration always reads `"<number> <unit>"`, where the unit is
//! one of `minute`, `hour`, `day`, `week` (plural unless the number is exactly 1).
//! Tasks store that string verbatim; the rollups in [`crate::stats`] read it
//! back with [`parse_duration_to_days`].

use std::fmt;
use std::sync::OnceLock;

use chrono::TimeDelta;
use regex::Regex;

/// Every unit spelling the shorthand accepts, longest spelling first so a
/// leftmost-first match consumes the whole word.
pub(crate) const UNIT_PATTERN: &str =
    "minutes|minute|min|m|hours|hour|hr|h|days|day|d|weeks|week|w";

const MINUTE_MS: i64 = 60 * 1000;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;
const WEEK_MS: i64 = 7 * DAY_MS;

static STORED_RE: OnceLock<Regex> = OnceLock::new();

fn stored_re() -> &'static Regex {
    STORED_RE.get_or_init(|| {
        Regex::new(&format!(r"(?i)([0-9]+(?:\.[0-9]+)?)\s*({UNIT_PATTERN})")).unwrap()
    })
}

/// Unit of a duration. Dispatch only ever looks at the first letter of the
/// spelled unit, so `w`, `week` and `weeks` are all weeks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationUnit {
    Minute,
    Hour,
    Day,
    Week,
}

impl DurationUnit {
    /// Resolve a spelled unit by its first letter.
    pub fn from_word(word: &str) -> Option<Self> {
        match word.chars().next()?.to_ascii_lowercase() {
            'w' => Some(DurationUnit::Week),
            'd' => Some(DurationUnit::Day),
            'h' => Some(DurationUnit::Hour),
            'm' => Some(DurationUnit::Minute),
            _ => None,
        }
    }

    pub fn singular(self) -> &'static str {
        match self {
            DurationUnit::Minute => "minute",
            DurationUnit::Hour => "hour",
            DurationUnit::Day => "day",
            DurationUnit::Week => "week",
        }
    }

    pub fn plural(self) -> &'static str {
        match self {
            DurationUnit::Minute => "minutes",
            DurationUnit::Hour => "hours",
            DurationUnit::Day => "days",
            DurationUnit::Week => "weeks",
        }
    }

    /// Unit name agreeing with `value`: singular for exactly 1, plural otherwise.
    pub fn name_for(self, value: f64) -> &'static str {
        if value == 1.0 {
            self.singular()
        } else {
            self.plural()
        }
    }

    /// Letter used when writing the unit back as shorthand (`in:3d`).
    pub fn letter(self) -> char {
        match self {
            DurationUnit::Minute => 'm',
            DurationUnit::Hour => 'h',
            DurationUnit::Day => 'd',
            DurationUnit::Week => 'w',
        }
    }

    /// Convert `value` of this unit into 24-hour days.
    pub fn to_days(self, value: f64) -> f64 {
        match self {
            DurationUnit::Minute => value / 1440.0,
            DurationUnit::Hour => value / 24.0,
            DurationUnit::Day => value,
            DurationUnit::Week => value * 7.0,
        }
    }

    /// Length of one unit in milliseconds.
    pub fn millis(self) -> i64 {
        match self {
            DurationUnit::Minute => MINUTE_MS,
            DurationUnit::Hour => HOUR_MS,
            DurationUnit::Day => DAY_MS,
            DurationUnit::Week => WEEK_MS,
        }
    }
}

/// A number of units, displayed in the canonical `"<number> <unit>"` form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedDuration {
    pub value: f64,
    pub unit: DurationUnit,
}

impl NormalizedDuration {
    pub fn new(value: f64, unit: DurationUnit) -> Self {
        Self { value, unit }
    }

    /// Build from the raw number and unit captured by a shorthand tag.
    /// Returns `None` when the unit spelling is not recognised or the number
    /// does not fit in an `f64`.
    pub fn from_parts(value: &str, unit_word: &str) -> Option<Self> {
        let value: f64 = value.parse().ok()?;
        if !value.is_finite() {
            return None;
        }
        let unit = DurationUnit::from_word(unit_word)?;
        Some(Self::new(value, unit))
    }

    /// Read the first `<number> <unit>` occurrence out of a stored duration.
    pub fn parse(s: &str) -> Option<Self> {
        let caps = stored_re().captures(s)?;
        Self::from_parts(&caps[1], &caps[2])
    }

    pub fn to_days(self) -> f64 {
        self.unit.to_days(self.value)
    }

    /// The span of time this duration covers, or `None` when it does not fit
    /// in a `TimeDelta`. Sub-millisecond remainders are truncated.
    pub fn to_time_delta(self) -> Option<TimeDelta> {
        let ms = (self.value * self.unit.millis() as f64).trunc();
        if !ms.is_finite() || ms.abs() >= i64::MAX as f64 {
            return None;
        }
        TimeDelta::try_milliseconds(ms as i64)
    }

    /// Shorthand spelling used to prefill an edit, e.g. `in:2.5d`.
    pub fn shorthand(self) -> String {
        format!("in:{}{}", self.value, self.unit.letter())
    }
}

impl fmt::Display for NormalizedDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit.name_for(self.value))
    }
}

/// Day-equivalent of a stored duration string. Absent or unparseable values
/// count as zero so a bad record never blocks the rollups.
pub fn parse_duration_to_days(duration: Option<&str>) -> f64 {
    duration
        .and_then(NormalizedDuration::parse)
        .map(NormalizedDuration::to_days)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_dispatch_uses_first_letter() {
        assert_eq!(DurationUnit::from_word("weeks"), Some(DurationUnit::Week));
        assert_eq!(DurationUnit::from_word("D"), Some(DurationUnit::Day));
        assert_eq!(DurationUnit::from_word("hr"), Some(DurationUnit::Hour));
        assert_eq!(DurationUnit::from_word("min"), Some(DurationUnit::Minute));
        assert_eq!(DurationUnit::from_word("years"), None);
        assert_eq!(DurationUnit::from_word(""), None);
    }

    #[test]
    fn test_display_pluralises_on_exactly_one() {
        assert_eq!(NormalizedDuration::new(1.0, DurationUnit::Week).to_string(), "1 week");
        assert_eq!(NormalizedDuration::new(2.0, DurationUnit::Day).to_string(), "2 days");
        assert_eq!(NormalizedDuration::new(0.5, DurationUnit::Hour).to_string(), "0.5 hours");
        assert_eq!(NormalizedDuration::new(0.0, DurationUnit::Minute).to_string(), "0 minutes");
    }

    #[test]
    fn test_from_parts_drops_trailing_zeros() {
        let d = NormalizedDuration::from_parts("2.50", "d").unwrap();
        assert_eq!(d.to_string(), "2.5 days");
        let d = NormalizedDuration::from_parts("1.0", "w").unwrap();
        assert_eq!(d.to_string(), "1 week");
    }

    #[test]
    fn test_from_parts_rejects_overflowing_numbers() {
        let huge = "9".repeat(400);
        assert_eq!(NormalizedDuration::from_parts(&huge, "d"), None);
        assert_eq!(parse_duration_to_days(Some(format!("{huge} days").as_str())), 0.0);
    }

    #[test]
    fn test_parse_duration_to_days() {
        assert_eq!(parse_duration_to_days(Some("3 days")), 3.0);
        assert_eq!(parse_duration_to_days(Some("1 week")), 7.0);
        assert_eq!(parse_duration_to_days(Some("12 hours")), 0.5);
        assert_eq!(parse_duration_to_days(Some("1440 minutes")), 1.0);
        assert!((parse_duration_to_days(Some("0.5 hour")) - 1.0 / 48.0).abs() < 1e-12);
    }

    #[test]
    fn test_parse_duration_accepts_abbreviations_and_case() {
        assert_eq!(parse_duration_to_days(Some("2w")), 14.0);
        assert_eq!(parse_duration_to_days(Some("3 DAYS")), 3.0);
        assert_eq!(parse_duration_to_days(Some("6hr")), 0.25);
    }

    #[test]
    fn test_parse_duration_takes_first_occurrence() {
        assert_eq!(parse_duration_to_days(Some("2 days then 3 weeks")), 2.0);
    }

    #[test]
    fn test_bad_durations_count_as_zero() {
        assert_eq!(parse_duration_to_days(None), 0.0);
        assert_eq!(parse_duration_to_days(Some("")), 0.0);
        assert_eq!(parse_duration_to_days(Some("soon")), 0.0);
        assert_eq!(parse_duration_to_days(Some("3 years")), 0.0);
    }

    #[test]
    fn test_normalized_strings_survive_reparse() {
        for s in ["1 day", "3 days", "1 week", "2 weeks", "5 hours", "1 minute", "2.5 days"] {
            let parsed = NormalizedDuration::parse(s).unwrap();
            assert_eq!(parsed.to_string(), s);
        }
    }

    #[test]
    fn test_time_delta() {
        let d = NormalizedDuration::new(2.0, DurationUnit::Week);
        assert_eq!(d.to_time_delta(), Some(TimeDelta::days(14)));
        let d = NormalizedDuration::new(1.5, DurationUnit::Minute);
        assert_eq!(d.to_time_delta(), Some(TimeDelta::seconds(90)));
        let huge = NormalizedDuration::new(1e300, DurationUnit::Week);
        assert_eq!(huge.to_time_delta(), None);
    }

    #[test]
    fn test_shorthand_spelling() {
        assert_eq!(NormalizedDuration::new(2.5, DurationUnit::Day).shorthand(), "in:2.5d");
        assert_eq!(NormalizedDuration::new(30.0, DurationUnit::Minute).shorthand(), "in:30m");
    }
}
