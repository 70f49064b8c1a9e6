//! Calendar recurrence rules for recurring tasks.
//!
//! A [`RecurrenceConfig`] holds the form state for every recurrence type at
//! once; [`RecurrenceConfig::rule`] picks one type, validates it and yields a
//! [`RecurrenceRule`], which expands lazily into occurrence dates.

pub mod occurrences;
pub mod preset;

pub use occurrences::{BoundedOccurrences, EndCondition, Occurrences};
pub use preset::RecurrencePreset;

use crate::error::RecurrenceError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Day-of-week labels indexed 0 = Sunday .. 6 = Saturday.
pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceType {
    Daily,
    Weekly,
    Monthly,
}

impl RecurrenceType {
    pub fn as_str(self) -> &'static str {
        match self {
            RecurrenceType::Daily => "daily",
            RecurrenceType::Weekly => "weekly",
            RecurrenceType::Monthly => "monthly",
        }
    }
}

impl fmt::Display for RecurrenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecurrenceType {
    type Err = RecurrenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(RecurrenceType::Daily),
            "weekly" => Ok(RecurrenceType::Weekly),
            "monthly" => Ok(RecurrenceType::Monthly),
            _ => Err(RecurrenceError::UnknownRecurrenceType {
                name: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyConfig {
    pub interval: u32,
}

impl Default for DailyConfig {
    fn default() -> Self {
        Self { interval: 1 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyConfig {
    pub interval: u32,
    /// 0 = Sunday .. 6 = Saturday.
    pub days_of_week: BTreeSet<u8>,
}

impl Default for WeeklyConfig {
    fn default() -> Self {
        Self {
            interval: 1,
            days_of_week: BTreeSet::from([1]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyConfig {
    pub interval: u32,
    /// 1..=31; months without that day use their last day.
    pub day_of_month: u32,
}

impl Default for MonthlyConfig {
    fn default() -> Self {
        Self {
            interval: 1,
            day_of_month: 1,
        }
    }
}

/// A single, validated-at-the-boundary recurrence shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceRule {
    Daily(DailyConfig),
    Weekly(WeeklyConfig),
    Monthly(MonthlyConfig),
}

impl RecurrenceRule {
    pub fn daily(interval: u32) -> Self {
        RecurrenceRule::Daily(DailyConfig { interval })
    }

    pub fn weekly<I>(interval: u32, days_of_week: I) -> Self
    where
        I: IntoIterator<Item = u8>,
    {
        RecurrenceRule::Weekly(WeeklyConfig {
            interval,
            days_of_week: days_of_week.into_iter().collect(),
        })
    }

    pub fn monthly(interval: u32, day_of_month: u32) -> Self {
        RecurrenceRule::Monthly(MonthlyConfig {
            interval,
            day_of_month,
        })
    }

    pub fn recurrence_type(&self) -> RecurrenceType {
        match self {
            RecurrenceRule::Daily(_) => RecurrenceType::Daily,
            RecurrenceRule::Weekly(_) => RecurrenceType::Weekly,
            RecurrenceRule::Monthly(_) => RecurrenceType::Monthly,
        }
    }

    pub fn interval(&self) -> u32 {
        match self {
            RecurrenceRule::Daily(config) => config.interval,
            RecurrenceRule::Weekly(config) => config.interval,
            RecurrenceRule::Monthly(config) => config.interval,
        }
    }

    pub fn validate(&self) -> Result<(), RecurrenceError> {
        if self.interval() == 0 {
            return Err(RecurrenceError::ZeroInterval);
        }
        match self {
            RecurrenceRule::Daily(_) => Ok(()),
            RecurrenceRule::Weekly(config) => {
                if config.days_of_week.is_empty() {
                    return Err(RecurrenceError::EmptyDaysOfWeek);
                }
                match config.days_of_week.iter().find(|&&day| day > 6) {
                    Some(&day) => Err(RecurrenceError::WeekdayOutOfRange { day }),
                    None => Ok(()),
                }
            }
            RecurrenceRule::Monthly(config) => {
                if !(1..=31).contains(&config.day_of_month) {
                    return Err(RecurrenceError::DayOfMonthOutOfRange {
                        day: config.day_of_month,
                    });
                }
                Ok(())
            }
        }
    }

    /// Unbounded, lazily generated occurrences on or after `start`.
    ///
    /// An invalid rule yields no occurrences.
    pub fn occurrences(&self, start: NaiveDate) -> Occurrences {
        Occurrences::new(self.clone(), start)
    }

    /// Occurrences bounded by `end`; whichever limit is reached first wins.
    pub fn occurrences_until(
        &self,
        start: NaiveDate,
        end: &EndCondition,
    ) -> BoundedOccurrences {
        end.bound(self.occurrences(start))
    }

    /// Short human-readable summary, e.g. "Every 2 weeks on Mon, Fri".
    pub fn describe(&self) -> String {
        match self {
            RecurrenceRule::Daily(config) => match config.interval {
                1 => "Every day".to_string(),
                n => format!("Every {n} days"),
            },
            RecurrenceRule::Weekly(config) => {
                let days = config
                    .days_of_week
                    .iter()
                    .filter_map(|&day| WEEKDAY_LABELS.get(usize::from(day)).copied())
                    .collect::<Vec<_>>()
                    .join(", ");
                match config.interval {
                    1 => format!("Every week on {days}"),
                    n => format!("Every {n} weeks on {days}"),
                }
            }
            RecurrenceRule::Monthly(config) => match config.interval {
                1 => format!("Monthly on day {}", config.day_of_month),
                n => format!("Every {n} months on day {}", config.day_of_month),
            },
        }
    }
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Form state holding a sub-config for every recurrence type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecurrenceConfig {
    pub daily: DailyConfig,
    pub weekly: WeeklyConfig,
    pub monthly: MonthlyConfig,
}

impl RecurrenceConfig {
    /// Validated rule for `recurrence_type`.
    pub fn rule(&self, recurrence_type: RecurrenceType) -> Result<RecurrenceRule, RecurrenceError> {
        let rule = match recurrence_type {
            RecurrenceType::Daily => RecurrenceRule::Daily(self.daily.clone()),
            RecurrenceType::Weekly => RecurrenceRule::Weekly(self.weekly.clone()),
            RecurrenceType::Monthly => RecurrenceRule::Monthly(self.monthly.clone()),
        };
        rule.validate()?;
        Ok(rule)
    }

    /// Replaces the whole sub-config targeted by `preset` and returns its type.
    pub fn apply_preset(&mut self, preset: RecurrencePreset) -> RecurrenceType {
        self.set_rule(preset.expand())
    }

    /// Stores `rule` as the sub-config for its type.
    pub fn set_rule(&mut self, rule: RecurrenceRule) -> RecurrenceType {
        match rule {
            RecurrenceRule::Daily(config) => {
                self.daily = config;
                RecurrenceType::Daily
            }
            RecurrenceRule::Weekly(config) => {
                self.weekly = config;
                RecurrenceType::Weekly
            }
            RecurrenceRule::Monthly(config) => {
                self.monthly = config;
                RecurrenceType::Monthly
            }
        }
    }
}

/// The first `count` occurrences on or after `start` for the chosen type.
pub fn next_occurrences(
    start: NaiveDate,
    recurrence_type: RecurrenceType,
    config: &RecurrenceConfig,
    count: usize,
) -> Result<Vec<NaiveDate>, RecurrenceError> {
    let rule = config.rule(recurrence_type)?;
    Ok(rule.occurrences(start).take(count).collect())
}

/// Parses "sun", "Sunday", "0" and the like into 0 = Sunday numbering.
pub fn weekday_from_name(name: &str) -> Result<u8, RecurrenceError> {
    const NAMES: [&str; 7] = [
        "sunday",
        "monday",
        "tuesday",
        "wednesday",
        "thursday",
        "friday",
        "saturday",
    ];
    let lower = name.trim().to_ascii_lowercase();
    if let Ok(day) = lower.parse::<u8>() {
        return if day <= 6 {
            Ok(day)
        } else {
            Err(RecurrenceError::WeekdayOutOfRange { day })
        };
    }
    NAMES
        .iter()
        .position(|full| lower == *full || lower == full[..3])
        .map(|idx| idx as u8)
        .ok_or_else(|| RecurrenceError::UnknownWeekday {
            name: name.to_string(),
        })
}
