use crate::error::LayoutError;
use crate::graph::DependencyGraph;
use crate::item::ScheduleItem;
use crate::timeline::{
    self, DependencyLine, HeaderSegment, TaskPosition, TimelineRange, group_by_category,
};
use crate::view_mode::ViewMode;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_ROW_HEIGHT: f64 = 40.0;

/// Renderer-supplied layout settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub view_mode: ViewMode,
    pub row_height: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            view_mode: ViewMode::Day,
            row_height: DEFAULT_ROW_HEIGHT,
        }
    }
}

impl LayoutConfig {
    pub fn new(view_mode: ViewMode) -> Self {
        Self {
            view_mode,
            ..Self::default()
        }
    }

    pub fn with_row_height(mut self, row_height: f64) -> Self {
        self.row_height = row_height;
        self
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        if !self.row_height.is_finite() || self.row_height <= 0.0 {
            return Err(LayoutError::InvalidRowHeight {
                value: self.row_height,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutRow {
    pub id: String,
    pub category: String,
    pub row: usize,
    /// `None` for items without a resolvable start.
    pub position: Option<TaskPosition>,
}

/// Everything a Gantt renderer needs to paint one chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GanttLayout {
    pub view_mode: ViewMode,
    pub day_width: f64,
    pub row_height: f64,
    pub range: TimelineRange,
    pub rows: Vec<LayoutRow>,
    pub dependency_lines: Vec<DependencyLine>,
    pub headers: Vec<HeaderSegment>,
    pub total_width: f64,
}

impl GanttLayout {
    /// Lays out `items` against the injected `reference` instant.
    ///
    /// Rows follow category grouping order, then input order. Dependencies on
    /// unknown ids are skipped; cycles are drawn as-is and only logged.
    pub fn compute(
        items: &[ScheduleItem],
        config: &LayoutConfig,
        reference: DateTime<Utc>,
    ) -> Result<Self, LayoutError> {
        config.validate()?;
        let view_mode = config.view_mode;
        let day_width = view_mode.day_width();
        let range = timeline::timeline_range(items, view_mode, reference);

        let mut rows = Vec::with_capacity(items.len());
        let mut row_index: HashMap<&str, usize> = HashMap::with_capacity(items.len());
        let mut by_id: HashMap<&str, &ScheduleItem> = HashMap::with_capacity(items.len());
        for group in group_by_category(items) {
            for item in group.items {
                let row = rows.len();
                row_index.entry(item.id.as_str()).or_insert(row);
                by_id.entry(item.id.as_str()).or_insert(item);
                rows.push(LayoutRow {
                    id: item.id.clone(),
                    category: group.category.to_string(),
                    row,
                    position: timeline::task_position(item, range.start, day_width),
                });
            }
        }

        let graph = DependencyGraph::build(items);
        for dangling in &graph.dangling {
            warn!(
                "item {} depends on unknown item {}; skipping",
                dangling.item_id, dangling.missing_id
            );
        }
        if let Err(err) = graph.check_acyclic() {
            warn!("{err}");
        }

        let dependency_lines: Vec<DependencyLine> = graph
            .edges()
            .into_iter()
            .filter_map(|(from_id, to_id)| {
                let from = by_id.get(from_id)?;
                let to = by_id.get(to_id)?;
                timeline::dependency_line(
                    from,
                    to,
                    range.start,
                    day_width,
                    config.row_height,
                    |id| row_index.get(id).copied(),
                )
            })
            .collect();

        let headers = timeline::timeline_headers(&range, view_mode);
        let total_width = range.width(day_width);
        debug!(
            "laid out {} rows, {} dependency lines, {} headers, width {total_width}",
            rows.len(),
            dependency_lines.len(),
            headers.len()
        );

        Ok(Self {
            view_mode,
            day_width,
            row_height: config.row_height,
            range,
            rows,
            dependency_lines,
            headers,
            total_width,
        })
    }

    pub fn row(&self, id: &str) -> Option<&LayoutRow> {
        self.rows.iter().find(|row| row.id == id)
    }

    pub fn position(&self, id: &str) -> Option<TaskPosition> {
        self.row(id).and_then(|row| row.position)
    }

    pub fn total_height(&self) -> f64 {
        self.rows.len() as f64 * self.row_height
    }
}
