use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category used when an item carries no category label.
pub const GENERAL_CATEGORY: &str = "GENERAL";

/// A schedulable record as seen by the layout engine.
///
/// Built fresh from externally owned task data on every layout pass; nothing
/// in this crate mutates or stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleItem {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
    /// Single-point date used when neither `start` nor `end` is known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Predecessor ids (finish-to-start).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
}

impl ScheduleItem {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            start: None,
            end: None,
            due_date: None,
            category: None,
            depends_on: Vec::new(),
        }
    }

    pub fn with_span(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    pub fn with_start(mut self, start: DateTime<Utc>) -> Self {
        self.start = Some(start);
        self
    }

    pub fn with_end(mut self, end: DateTime<Utc>) -> Self {
        self.end = Some(end);
        self
    }

    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_dependencies<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends_on.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Start used for rendering: the explicit start, otherwise the due date.
    ///
    /// An item that only has an `end` has no resolvable start and is not
    /// rendered.
    pub fn resolved_start(&self) -> Option<DateTime<Utc>> {
        self.start.or_else(|| {
            if self.end.is_none() {
                self.due_date
            } else {
                None
            }
        })
    }

    /// End used for rendering: `end`, then `start`, then the due date.
    pub fn resolved_end(&self) -> Option<DateTime<Utc>> {
        self.end.or(self.start).or(self.due_date)
    }

    /// Both resolved bounds, when the item has a resolvable start.
    pub fn resolved_span(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let start = self.resolved_start()?;
        let end = self.resolved_end().unwrap_or(start);
        Some((start, end))
    }

    pub fn category_or_default(&self) -> &str {
        match self.category.as_deref() {
            Some(category) if !category.trim().is_empty() => category,
            _ => GENERAL_CATEGORY,
        }
    }
}
