pub mod error;
pub mod graph;
#[cfg(feature = "cli")]
pub mod import;
pub mod item;
pub mod layout;
pub mod recurrence;
pub mod timeline;
pub mod view_mode;

pub use error::{LayoutError, ParseViewModeError, RecurrenceError};
pub use graph::{DanglingReference, DependencyGraph};
pub use item::{GENERAL_CATEGORY, ScheduleItem};
pub use layout::{GanttLayout, LayoutConfig, LayoutRow};
pub use recurrence::{
    BoundedOccurrences, DailyConfig, EndCondition, MonthlyConfig, Occurrences, RecurrenceConfig,
    RecurrencePreset, RecurrenceRule, RecurrenceType, WeeklyConfig, next_occurrences,
};
pub use timeline::{
    CategoryGroup, DependencyLine, DependencyType, HeaderSegment, TaskPosition, TimelineRange,
    days_between, dependency_line, group_by_category, is_overlapping, snap_to_grid, task_position,
    timeline_headers, timeline_range,
};
pub use view_mode::{ViewMode, day_width};
