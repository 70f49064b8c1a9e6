use crate::error::ParseViewModeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Zoom granularity of the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Day,
    Week,
    Month,
    Quarter,
}

impl ViewMode {
    pub const ALL: [ViewMode; 4] = [
        ViewMode::Day,
        ViewMode::Week,
        ViewMode::Month,
        ViewMode::Quarter,
    ];

    /// Pixels per calendar day at this zoom level.
    pub fn day_width(self) -> f64 {
        match self {
            ViewMode::Day => 40.0,
            ViewMode::Week => 20.0,
            ViewMode::Month => 8.0,
            ViewMode::Quarter => 3.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ViewMode::Day => "day",
            ViewMode::Week => "week",
            ViewMode::Month => "month",
            ViewMode::Quarter => "quarter",
        }
    }
}

/// Free-function form of [`ViewMode::day_width`].
pub fn day_width(view_mode: ViewMode) -> f64 {
    view_mode.day_width()
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = ParseViewModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(ViewMode::Day),
            "week" => Ok(ViewMode::Week),
            "month" => Ok(ViewMode::Month),
            "quarter" => Ok(ViewMode::Quarter),
            _ => Err(ParseViewModeError {
                input: s.to_string(),
            }),
        }
    }
}
