//! Human-readable formatting of remaining cooldown time.

use crate::types::DurationMs;

/// Verbosity of remaining-time messages.
///
/// Short = `3m 3s`, Medium = `3 min 3 sec`, Full = `3 minutes 3 seconds`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DisplayFormat {
    Short,
    #[default]
    Medium,
    Full,
}

const SECS_PER_MINUTE: u64 = 60;
const SECS_PER_HOUR: u64 = 3_600;
const SECS_PER_DAY: u64 = 86_400;

/// Formats a remaining duration for operator-facing messages.
///
/// Sub-second remainders round up, so a live cooldown never reads as zero.
pub fn format_remaining(remaining: DurationMs, format: DisplayFormat) -> String {
    let total_secs = remaining.div_ceil(1_000);

    let days = total_secs / SECS_PER_DAY;
    let hours = (total_secs % SECS_PER_DAY) / SECS_PER_HOUR;
    let minutes = (total_secs % SECS_PER_HOUR) / SECS_PER_MINUTE;
    let seconds = total_secs % SECS_PER_MINUTE;

    let mut parts = Vec::new();
    for (value, unit) in [
        (days, Unit::Day),
        (hours, Unit::Hour),
        (minutes, Unit::Minute),
        (seconds, Unit::Second),
    ] {
        if value > 0 {
            parts.push(unit.render(value, format));
        }
    }

    if parts.is_empty() {
        return Unit::Second.render(0, format);
    }
    parts.join(" ")
}

#[derive(Clone, Copy)]
enum Unit {
    Day,
    Hour,
    Minute,
    Second,
}

impl Unit {
    fn render(self, value: u64, format: DisplayFormat) -> String {
        match format {
            DisplayFormat::Short => {
                let label = match self {
                    Self::Day => "d",
                    Self::Hour => "h",
                    Self::Minute => "m",
                    Self::Second => "s",
                };
                format!("{value}{label}")
            }
            DisplayFormat::Medium => {
                let label = match self {
                    Self::Day => "day",
                    Self::Hour => "hr",
                    Self::Minute => "min",
                    Self::Second => "sec",
                };
                format!("{value} {label}")
            }
            DisplayFormat::Full => {
                let singular = match self {
                    Self::Day => "day",
                    Self::Hour => "hour",
                    Self::Minute => "minute",
                    Self::Second => "second",
                };
                if value == 1 {
                    format!("{value} {singular}")
                } else {
                    format!("{value} {singular}s")
                }
            }
        }
    }
}
