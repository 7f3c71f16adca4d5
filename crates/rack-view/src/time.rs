//! Human-readable elapsed time.
//!
//! The unit is picked from a fixed ladder (year down to second) by the first
//! unit whose length the absolute elapsed time exceeds; `second` always
//! accepts. Rendering goes through a [`RelativeFormatter`] strategy chosen
//! once at startup by [`FormatterCapability::probe`].

use chrono::{DateTime, FixedOffset, Local, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use rack_types::TimeSettings;

use crate::error::ViewError;

const SECOND_MS: i64 = 1000;
const MINUTE_MS: i64 = 60 * SECOND_MS;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;
const YEAR_MS: i64 = 365 * DAY_MS;
const MONTH_MS: i64 = YEAR_MS / 12;

/// Unit of a relative time label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

impl TimeUnit {
    /// Units from largest to smallest.
    pub const LADDER: [TimeUnit; 6] = [
        TimeUnit::Year,
        TimeUnit::Month,
        TimeUnit::Day,
        TimeUnit::Hour,
        TimeUnit::Minute,
        TimeUnit::Second,
    ];

    /// Length of the unit in milliseconds.
    pub fn millis(&self) -> i64 {
        match self {
            TimeUnit::Year => YEAR_MS,
            TimeUnit::Month => MONTH_MS,
            TimeUnit::Day => DAY_MS,
            TimeUnit::Hour => HOUR_MS,
            TimeUnit::Minute => MINUTE_MS,
            TimeUnit::Second => SECOND_MS,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeUnit::Year => "year",
            TimeUnit::Month => "month",
            TimeUnit::Day => "day",
            TimeUnit::Hour => "hour",
            TimeUnit::Minute => "minute",
            TimeUnit::Second => "second",
        }
    }
}

impl std::fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Elapsed time reduced to a signed count of one unit.
///
/// Negative `diff` means the target lies in the past.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelativeTime {
    pub diff: i64,
    pub unit: TimeUnit,
}

impl RelativeTime {
    /// Relative position of `target` as seen from `reference`.
    pub fn between(target: DateTime<Utc>, reference: DateTime<Utc>) -> Self {
        Self::from_elapsed_ms((target - reference).num_milliseconds())
    }

    pub fn from_elapsed_ms(elapsed: i64) -> Self {
        let magnitude = elapsed.unsigned_abs();
        let unit = TimeUnit::LADDER
            .into_iter()
            .find(|u| *u == TimeUnit::Second || magnitude > u.millis() as u64)
            .unwrap_or(TimeUnit::Second);

        Self {
            diff: round_half_up(elapsed, unit.millis()),
            unit,
        }
    }
}

/// `elapsed / unit` rounded to the nearest integer, halves toward +inf.
fn round_half_up(elapsed: i64, unit: i64) -> i64 {
    let elapsed = elapsed as i128;
    let unit = unit as i128;
    (2 * elapsed + unit).div_euclid(2 * unit) as i64
}

/// Strategy turning a `(diff, unit)` pair into text.
pub trait RelativeFormatter: Send + Sync {
    fn format(&self, diff: i64, unit: TimeUnit) -> String;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}

/// English rendering with idiomatic wording near zero ("yesterday", "now").
#[derive(Debug, Clone, Copy, Default)]
pub struct PlatformRelativeFormatter;

impl RelativeFormatter for PlatformRelativeFormatter {
    fn format(&self, diff: i64, unit: TimeUnit) -> String {
        match (unit, diff) {
            (TimeUnit::Second, 0) => "now".to_string(),
            (TimeUnit::Day, -1) => "yesterday".to_string(),
            (TimeUnit::Day, 0) => "today".to_string(),
            (TimeUnit::Day, 1) => "tomorrow".to_string(),
            (TimeUnit::Month | TimeUnit::Year, -1) => format!("last {}", unit),
            (TimeUnit::Month | TimeUnit::Year, 1) => format!("next {}", unit),
            (_, 0) => format!("this {}", unit),
            _ => {
                let count = diff.unsigned_abs();
                let plural = if count == 1 { "" } else { "s" };
                if diff < 0 {
                    format!("{} {}{} ago", count, unit, plural)
                } else {
                    format!("in {} {}{}", count, unit, plural)
                }
            }
        }
    }

    fn name(&self) -> &'static str {
        "platform"
    }
}

/// Fallback when no locale-aware formatter is available.
///
/// Zero renders as "in 0 second"; kept as-is to match the listing's
/// long-standing output without the locale formatter.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualRelativeFormatter;

impl RelativeFormatter for ManualRelativeFormatter {
    fn format(&self, diff: i64, unit: TimeUnit) -> String {
        let count = diff.unsigned_abs();
        let plural = if count > 1 { "s" } else { "" };
        if diff < 0 {
            format!("{} {}{} ago", count, unit, plural)
        } else {
            format!("in {} {}{}", diff, unit, plural)
        }
    }

    fn name(&self) -> &'static str {
        "manual"
    }
}

/// Which relative formatter the environment supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatterCapability {
    Platform,
    Manual,
}

impl FormatterCapability {
    /// Decide once at startup which formatter to use.
    pub fn probe(settings: &TimeSettings) -> Self {
        let capability = if settings.locale_formatting {
            FormatterCapability::Platform
        } else {
            FormatterCapability::Manual
        };
        info!(capability = ?capability, "Selected relative time formatter");
        capability
    }

    pub fn formatter(&self) -> Box<dyn RelativeFormatter> {
        match self {
            FormatterCapability::Platform => Box::new(PlatformRelativeFormatter),
            FormatterCapability::Manual => Box::new(ManualRelativeFormatter),
        }
    }
}

/// Relative and absolute date rendering.
pub struct TimeFormatter {
    relative: Box<dyn RelativeFormatter>,
    offset: Option<FixedOffset>,
}

impl TimeFormatter {
    /// `offset` None renders absolute dates in the local zone.
    pub fn new(capability: FormatterCapability, offset: Option<FixedOffset>) -> Self {
        Self {
            relative: capability.formatter(),
            offset,
        }
    }

    pub fn with_formatter(relative: Box<dyn RelativeFormatter>, offset: Option<FixedOffset>) -> Self {
        Self { relative, offset }
    }

    pub fn from_settings(settings: &TimeSettings) -> Result<Self, ViewError> {
        let offset = settings
            .utc_offset_minutes
            .map(|minutes| {
                minutes
                    .checked_mul(60)
                    .and_then(FixedOffset::east_opt)
                    .ok_or(ViewError::InvalidOffset(minutes))
            })
            .transpose()?;
        Ok(Self::new(FormatterCapability::probe(settings), offset))
    }

    /// Time of `target` relative to `reference`, e.g. "7 days ago".
    pub fn format(&self, target: DateTime<Utc>, reference: DateTime<Utc>) -> String {
        let relative = RelativeTime::between(target, reference);
        self.relative.format(relative.diff, relative.unit)
    }

    /// Time of `target` relative to the current instant.
    pub fn format_now(&self, target: DateTime<Utc>) -> String {
        self.format(target, Utc::now())
    }

    /// Absolute date-time, e.g. "1/8/2024, 12:00:00 AM".
    pub fn format_absolute(&self, target: DateTime<Utc>) -> String {
        const PATTERN: &str = "%-m/%-d/%Y, %-I:%M:%S %p";
        match self.offset {
            Some(offset) => target.with_timezone(&offset).format(PATTERN).to_string(),
            None => target.with_timezone(&Local).format(PATTERN).to_string(),
        }
    }

    pub fn strategy_name(&self) -> &'static str {
        self.relative.name()
    }
}

impl std::fmt::Debug for TimeFormatter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimeFormatter")
            .field("relative", &self.relative.name())
            .field("offset", &self.offset)
            .finish()
    }
}
