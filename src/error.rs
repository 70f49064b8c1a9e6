use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown view mode '{input}' (expected day, week, month or quarter)")]
pub struct ParseViewModeError {
    pub input: String,
}

/// Rejections raised when a recurrence configuration is turned into a rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecurrenceError {
    #[error("recurrence interval must be at least 1")]
    ZeroInterval,
    #[error("weekly recurrence requires at least one day of week")]
    EmptyDaysOfWeek,
    #[error("day of month {day} is outside 1..=31")]
    DayOfMonthOutOfRange { day: u32 },
    #[error("day of week {day} is outside 0..=6 (0 = Sunday)")]
    WeekdayOutOfRange { day: u8 },
    #[error("unknown recurrence preset '{name}'")]
    UnknownPreset { name: String },
    #[error("unknown recurrence type '{name}' (expected daily, weekly or monthly)")]
    UnknownRecurrenceType { name: String },
    #[error("unknown weekday '{name}'")]
    UnknownWeekday { name: String },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("dependency cycle detected between items: {}", ids.join(" -> "))]
    DependencyCycle { ids: Vec<String> },
    #[error("row height must be a positive finite number (got {value})")]
    InvalidRowHeight { value: f64 },
    #[cfg(feature = "cli")]
    #[error("item import failed: {0}")]
    Import(String),
}
