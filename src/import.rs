//! Reading item lists handed over by the host application.
//!
//! Only readers are accepted; opening files is left to the caller.

use crate::error::LayoutError;
use crate::item::ScheduleItem;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemFormat {
    Json,
    Csv,
}

impl ItemFormat {
    /// Guesses the format from a file extension, defaulting to JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => ItemFormat::Csv,
            _ => ItemFormat::Json,
        }
    }
}

impl FromStr for ItemFormat {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ItemFormat::Json),
            "csv" => Ok(ItemFormat::Csv),
            other => Err(LayoutError::Import(format!("unsupported item format '{other}'"))),
        }
    }
}

pub fn read_items<R: Read>(reader: R, format: ItemFormat) -> Result<Vec<ScheduleItem>, LayoutError> {
    match format {
        ItemFormat::Json => read_items_json(reader),
        ItemFormat::Csv => read_items_csv(reader),
    }
}

/// A JSON array of items.
pub fn read_items_json<R: Read>(reader: R) -> Result<Vec<ScheduleItem>, LayoutError> {
    serde_json::from_reader(reader).map_err(|err| LayoutError::Import(err.to_string()))
}

#[derive(Deserialize)]
struct ItemCsvRecord {
    id: String,
    #[serde(default)]
    start: String,
    #[serde(default)]
    end: String,
    #[serde(default)]
    due_date: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    depends_on: String,
}

impl ItemCsvRecord {
    fn into_item(self) -> Result<ScheduleItem, LayoutError> {
        let id = self.id.trim().to_string();
        if id.is_empty() {
            return Err(LayoutError::Import("item row is missing an id".into()));
        }
        let mut item = ScheduleItem::new(id);
        item.start = parse_instant(&self.start)?;
        item.end = parse_instant(&self.end)?;
        item.due_date = parse_instant(&self.due_date)?;
        item.category = parse_string_option(self.category);
        item.depends_on = split_ids(&self.depends_on);
        Ok(item)
    }
}

/// CSV with header `id,start,end,due_date,category,depends_on`.
pub fn read_items_csv<R: Read>(reader: R) -> Result<Vec<ScheduleItem>, LayoutError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut items = Vec::new();
    for record in reader.deserialize::<ItemCsvRecord>() {
        let record = record.map_err(|err| LayoutError::Import(err.to_string()))?;
        items.push(record.into_item()?);
    }
    Ok(items)
}

/// RFC 3339 instant or plain `YYYY-MM-DD` date (midnight UTC). Empty is `None`.
pub fn parse_instant(value: &str) -> Result<Option<DateTime<Utc>>, LayoutError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(Some(instant.with_timezone(&Utc)));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(|date| Some(date.and_time(NaiveTime::MIN).and_utc()))
        .map_err(|err| LayoutError::Import(format!("invalid date '{trimmed}': {err}")))
}

fn parse_string_option(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn split_ids(value: &str) -> Vec<String> {
    value
        .split(';')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}
