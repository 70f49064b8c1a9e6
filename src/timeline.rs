use crate::item::ScheduleItem;
use crate::view_mode::ViewMode;
use chrono::{DateTime, Datelike, Days, Duration, Months, NaiveDate, NaiveTime, Utc};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const MILLIS_PER_DAY: i64 = 86_400_000;

/// Seed window around the reference instant, before item-derived padding.
pub const SEED_DAYS_BEFORE: i64 = 7;
pub const SEED_DAYS_AFTER: i64 = 30;

/// Padding applied to the final bounds.
pub const PAD_DAYS_BEFORE: i64 = 7;
pub const PAD_DAYS_AFTER: i64 = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimelineRange {
    pub fn days(&self) -> i64 {
        days_between(self.start, self.end)
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }

    /// Total pixel width of the range at `day_width`.
    pub fn width(&self, day_width: f64) -> f64 {
        self.days() as f64 * day_width
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaskPosition {
    pub left: f64,
    pub width: f64,
}

impl TaskPosition {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyType {
    #[default]
    FinishToStart,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyLine {
    pub from_id: String,
    pub to_id: String,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    #[serde(rename = "type")]
    pub kind: DependencyType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderSegment {
    pub label: String,
    /// First instant of the grid cell.
    pub date: DateTime<Utc>,
    /// Offset from the range start; the first segment may begin before it.
    pub left: f64,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryGroup<'a> {
    pub category: &'a str,
    pub items: Vec<&'a ScheduleItem>,
}

/// Whole days from `start` to `end`, rounded away from zero.
///
/// Negative when `end` precedes `start`, and always the exact negation of the
/// reversed call.
pub fn days_between(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let millis = (end - start).num_milliseconds();
    let days = millis.unsigned_abs().div_ceil(MILLIS_PER_DAY as u64) as i64;
    if millis < 0 { -days } else { days }
}

/// Computes the shared horizontal range for `items`.
///
/// The range starts as `reference - 7d ..= reference + 30d`, grows to cover
/// every item, then gains another 7 days of lead and 14 days of trail.
/// `view_mode` does not influence the padding.
pub fn timeline_range(
    items: &[ScheduleItem],
    view_mode: ViewMode,
    reference: DateTime<Utc>,
) -> TimelineRange {
    let mut start = shift_days(reference, -SEED_DAYS_BEFORE);
    let mut end = shift_days(reference, SEED_DAYS_AFTER);

    for item in items {
        if let Some(item_start) = item.resolved_start() {
            start = start.min(item_start);
            // an end before the start still renders as a bar at the start
            end = end.max(item_start);
        }
        if let Some(item_end) = item.resolved_end() {
            end = end.max(item_end);
        }
    }

    let range = TimelineRange {
        start: shift_days(start, -PAD_DAYS_BEFORE),
        end: shift_days(end, PAD_DAYS_AFTER),
    };
    debug!(
        "timeline range for {} items ({view_mode}): {} .. {}",
        items.len(),
        range.start,
        range.end
    );
    range
}

/// Pixel placement of `item`, or `None` when it has no resolvable start.
pub fn task_position(
    item: &ScheduleItem,
    timeline_start: DateTime<Utc>,
    day_width: f64,
) -> Option<TaskPosition> {
    let (start, end) = item.resolved_span()?;
    let left = days_between(timeline_start, start) as f64 * day_width;
    let duration = days_between(start, end).max(1);
    let width = (duration as f64 * day_width).max(day_width);
    trace!("item {} positioned at left={left} width={width}", item.id);
    Some(TaskPosition { left, width })
}

/// Rounds `date` down to the start of its grid cell (UTC midnight).
///
/// Weeks begin on Sunday; quarters begin in January, April, July and October.
pub fn snap_to_grid(date: DateTime<Utc>, view_mode: ViewMode) -> DateTime<Utc> {
    let day = date.date_naive();
    let snapped = match view_mode {
        ViewMode::Day => day,
        ViewMode::Week => day
            .checked_sub_days(Days::new(u64::from(day.weekday().num_days_from_sunday())))
            .unwrap_or(NaiveDate::MIN),
        ViewMode::Month => first_of_month(day),
        ViewMode::Quarter => {
            let first = first_of_month(day);
            first
                .checked_sub_months(Months::new(day.month0() % 3))
                .unwrap_or(first)
        }
    };
    at_midnight(snapped)
}

/// Finish-to-start arrow from the right-center of `from` to the left-center
/// of `to`.
///
/// Returns `None` when either item cannot be positioned or has no row.
pub fn dependency_line<F>(
    from: &ScheduleItem,
    to: &ScheduleItem,
    timeline_start: DateTime<Utc>,
    day_width: f64,
    row_height: f64,
    row_index_of: F,
) -> Option<DependencyLine>
where
    F: Fn(&str) -> Option<usize>,
{
    let from_pos = task_position(from, timeline_start, day_width)?;
    let to_pos = task_position(to, timeline_start, day_width)?;
    let from_row = row_index_of(&from.id)?;
    let to_row = row_index_of(&to.id)?;

    Some(DependencyLine {
        from_id: from.id.clone(),
        to_id: to.id.clone(),
        x1: from_pos.right(),
        y1: row_center(from_row, row_height),
        x2: to_pos.left,
        y2: row_center(to_row, row_height),
        kind: DependencyType::FinishToStart,
    })
}

/// Vertical center of row `row`.
pub fn row_center(row: usize, row_height: f64) -> f64 {
    row as f64 * row_height + row_height / 2.0
}

/// Strict interval overlap on the resolved spans of `a` and `b`.
pub fn is_overlapping(a: &ScheduleItem, b: &ScheduleItem) -> bool {
    match (a.resolved_span(), b.resolved_span()) {
        (Some((start1, end1)), Some((start2, end2))) => start1 < end2 && start2 < end1,
        _ => false,
    }
}

/// Groups items by category, keeping first-seen category order and input
/// order within each group. Uncategorised items land in `GENERAL`.
pub fn group_by_category(items: &[ScheduleItem]) -> Vec<CategoryGroup<'_>> {
    let mut groups: Vec<CategoryGroup<'_>> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for item in items {
        let category = item.category_or_default();
        let slot = *index.entry(category).or_insert_with(|| {
            groups.push(CategoryGroup {
                category,
                items: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].items.push(item);
    }
    groups
}

/// One header segment per grid cell from the cell containing `range.start`
/// until the walk passes `range.end`.
pub fn timeline_headers(range: &TimelineRange, view_mode: ViewMode) -> Vec<HeaderSegment> {
    let day_width = view_mode.day_width();
    let mut segments = Vec::new();
    let mut cursor = snap_to_grid(range.start, view_mode).date_naive();

    while at_midnight(cursor) <= range.end {
        let Some(next) = advance_cell(cursor, view_mode) else {
            break;
        };
        let anchor = at_midnight(cursor);
        segments.push(HeaderSegment {
            label: header_label(cursor, view_mode),
            date: anchor,
            left: days_between(range.start, anchor) as f64 * day_width,
            width: (next - cursor).num_days() as f64 * day_width,
        });
        cursor = next;
    }
    segments
}

fn advance_cell(cursor: NaiveDate, view_mode: ViewMode) -> Option<NaiveDate> {
    match view_mode {
        ViewMode::Day => cursor.succ_opt(),
        ViewMode::Week => cursor.checked_add_signed(Duration::days(7)),
        ViewMode::Month => cursor.checked_add_months(Months::new(1)),
        ViewMode::Quarter => cursor.checked_add_months(Months::new(3)),
    }
}

fn header_label(cursor: NaiveDate, view_mode: ViewMode) -> String {
    match view_mode {
        ViewMode::Day => cursor.format("%b %-d").to_string(),
        // Sunday-anchored weeks take the ISO number of the Monday that follows.
        ViewMode::Week => {
            let monday = cursor.succ_opt().unwrap_or(cursor);
            format!("W{}", monday.iso_week().week())
        }
        ViewMode::Month => cursor.format("%b %Y").to_string(),
        ViewMode::Quarter => format!("Q{} {}", cursor.month0() / 3 + 1, cursor.year()),
    }
}

/// `instant` moved by `days`, clamped to the representable range.
fn shift_days(instant: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    instant
        .checked_add_signed(Duration::days(days))
        .unwrap_or(if days < 0 {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        })
}

fn first_of_month(day: NaiveDate) -> NaiveDate {
    day.with_day(1).unwrap_or(day)
}

fn at_midnight(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}
