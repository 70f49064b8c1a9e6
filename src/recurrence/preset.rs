use super::RecurrenceRule;
use crate::error::RecurrenceError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named shortcuts offered by the recurring-task form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurrencePreset {
    Daily,
    EveryWeekday,
    EveryWeekend,
    EverySunday,
    EveryMonday,
    EveryTuesday,
    EveryWednesday,
    EveryThursday,
    EveryFriday,
    EverySaturday,
    BiweeklyMonday,
    MonthlyFirst,
    MonthlyFifteenth,
    MonthlyLast,
}

impl RecurrencePreset {
    pub const ALL: [RecurrencePreset; 14] = [
        RecurrencePreset::Daily,
        RecurrencePreset::EveryWeekday,
        RecurrencePreset::EveryWeekend,
        RecurrencePreset::EverySunday,
        RecurrencePreset::EveryMonday,
        RecurrencePreset::EveryTuesday,
        RecurrencePreset::EveryWednesday,
        RecurrencePreset::EveryThursday,
        RecurrencePreset::EveryFriday,
        RecurrencePreset::EverySaturday,
        RecurrencePreset::BiweeklyMonday,
        RecurrencePreset::MonthlyFirst,
        RecurrencePreset::MonthlyFifteenth,
        RecurrencePreset::MonthlyLast,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RecurrencePreset::Daily => "daily",
            RecurrencePreset::EveryWeekday => "every_weekday",
            RecurrencePreset::EveryWeekend => "every_weekend",
            RecurrencePreset::EverySunday => "every_sunday",
            RecurrencePreset::EveryMonday => "every_monday",
            RecurrencePreset::EveryTuesday => "every_tuesday",
            RecurrencePreset::EveryWednesday => "every_wednesday",
            RecurrencePreset::EveryThursday => "every_thursday",
            RecurrencePreset::EveryFriday => "every_friday",
            RecurrencePreset::EverySaturday => "every_saturday",
            RecurrencePreset::BiweeklyMonday => "biweekly_monday",
            RecurrencePreset::MonthlyFirst => "monthly_first",
            RecurrencePreset::MonthlyFifteenth => "monthly_fifteenth",
            RecurrencePreset::MonthlyLast => "monthly_last",
        }
    }

    /// The concrete rule this preset stands for.
    pub fn expand(self) -> RecurrenceRule {
        match self {
            RecurrencePreset::Daily => RecurrenceRule::daily(1),
            RecurrencePreset::EveryWeekday => RecurrenceRule::weekly(1, [1, 2, 3, 4, 5]),
            RecurrencePreset::EveryWeekend => RecurrenceRule::weekly(1, [0, 6]),
            RecurrencePreset::EverySunday => RecurrenceRule::weekly(1, [0]),
            RecurrencePreset::EveryMonday => RecurrenceRule::weekly(1, [1]),
            RecurrencePreset::EveryTuesday => RecurrenceRule::weekly(1, [2]),
            RecurrencePreset::EveryWednesday => RecurrenceRule::weekly(1, [3]),
            RecurrencePreset::EveryThursday => RecurrenceRule::weekly(1, [4]),
            RecurrencePreset::EveryFriday => RecurrenceRule::weekly(1, [5]),
            RecurrencePreset::EverySaturday => RecurrenceRule::weekly(1, [6]),
            RecurrencePreset::BiweeklyMonday => RecurrenceRule::weekly(2, [1]),
            RecurrencePreset::MonthlyFirst => RecurrenceRule::monthly(1, 1),
            RecurrencePreset::MonthlyFifteenth => RecurrenceRule::monthly(1, 15),
            // Day 31 clamps to the last day of every shorter month.
            RecurrencePreset::MonthlyLast => RecurrenceRule::monthly(1, 31),
        }
    }
}

impl fmt::Display for RecurrencePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RecurrencePreset {
    type Err = RecurrenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        RecurrencePreset::ALL
            .into_iter()
            .find(|preset| preset.name() == normalized)
            .ok_or_else(|| RecurrenceError::UnknownPreset {
                name: s.to_string(),
            })
    }
}
