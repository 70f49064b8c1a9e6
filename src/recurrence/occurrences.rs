use super::RecurrenceRule;
use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Lazy, strictly increasing sequence of dates produced by a rule.
///
/// Restarting from the same rule and start reproduces the same sequence. The
/// iterator only ends when date arithmetic leaves chrono's supported range,
/// or immediately when the rule is invalid.
#[derive(Debug, Clone)]
pub struct Occurrences {
    rule: RecurrenceRule,
    start: NaiveDate,
    /// Anchor of period 0: `start` itself, the Sunday of its week, or the
    /// first of its month.
    anchor: NaiveDate,
    /// Sorted weekday offsets for weekly rules.
    weekdays: Vec<u8>,
    period: u64,
    slot: usize,
    done: bool,
}

impl Occurrences {
    pub(crate) fn new(rule: RecurrenceRule, start: NaiveDate) -> Self {
        let (anchor, weekdays) = match &rule {
            RecurrenceRule::Daily(_) => (Some(start), Vec::new()),
            RecurrenceRule::Weekly(config) => (
                start.checked_sub_days(Days::new(u64::from(
                    start.weekday().num_days_from_sunday(),
                ))),
                config.days_of_week.iter().copied().collect(),
            ),
            RecurrenceRule::Monthly(_) => (Some(first_of_month(start)), Vec::new()),
        };
        // a week whose Sunday precedes the earliest date cannot be walked
        let done = rule.validate().is_err() || anchor.is_none();
        Self {
            rule,
            start,
            anchor: anchor.unwrap_or(start),
            weekdays,
            period: 0,
            slot: 0,
            done,
        }
    }

    pub fn rule(&self) -> &RecurrenceRule {
        &self.rule
    }

    fn candidate(&mut self) -> Option<NaiveDate> {
        let interval = u64::from(self.rule.interval());
        match &self.rule {
            RecurrenceRule::Daily(_) => {
                let offset = self.period.checked_mul(interval)?;
                self.period += 1;
                self.anchor.checked_add_days(Days::new(offset))
            }
            RecurrenceRule::Weekly(_) => {
                if self.slot >= self.weekdays.len() {
                    self.slot = 0;
                    self.period += 1;
                }
                let offset = self.period.checked_mul(7 * interval)?;
                let window = self.anchor.checked_add_days(Days::new(offset))?;
                let day = u64::from(self.weekdays[self.slot]);
                self.slot += 1;
                window.checked_add_days(Days::new(day))
            }
            RecurrenceRule::Monthly(config) => {
                let months = u32::try_from(self.period.checked_mul(interval)?).ok()?;
                self.period += 1;
                let month_start = self.anchor.checked_add_months(Months::new(months))?;
                Some(clamp_to_month(month_start, config.day_of_month))
            }
        }
    }
}

impl Iterator for Occurrences {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        while !self.done {
            match self.candidate() {
                Some(date) if date < self.start => continue,
                Some(date) => return Some(date),
                None => self.done = true,
            }
        }
        None
    }
}

impl std::iter::FusedIterator for Occurrences {}

/// Caller-side limits on a recurrence. Neither set means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndCondition {
    /// Last permitted date, inclusive.
    pub until: Option<NaiveDate>,
    pub max_occurrences: Option<usize>,
}

impl EndCondition {
    pub fn until(date: NaiveDate) -> Self {
        Self {
            until: Some(date),
            max_occurrences: None,
        }
    }

    pub fn count(max_occurrences: usize) -> Self {
        Self {
            until: None,
            max_occurrences: Some(max_occurrences),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.until.is_none() && self.max_occurrences.is_none()
    }

    pub fn bound(&self, occurrences: Occurrences) -> BoundedOccurrences {
        BoundedOccurrences {
            inner: occurrences,
            until: self.until,
            remaining: self.max_occurrences,
        }
    }
}

/// [`Occurrences`] cut off by an [`EndCondition`].
#[derive(Debug, Clone)]
pub struct BoundedOccurrences {
    inner: Occurrences,
    until: Option<NaiveDate>,
    remaining: Option<usize>,
}

impl Iterator for BoundedOccurrences {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        if self.remaining == Some(0) {
            return None;
        }
        let date = self.inner.next()?;
        if self.until.is_some_and(|until| date > until) {
            self.remaining = Some(0);
            return None;
        }
        if let Some(remaining) = self.remaining.as_mut() {
            *remaining -= 1;
        }
        Some(date)
    }
}

impl std::iter::FusedIterator for BoundedOccurrences {}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Day `day_of_month` of the month starting at `month_start`, or that
/// month's last day when the month is shorter.
fn clamp_to_month(month_start: NaiveDate, day_of_month: u32) -> NaiveDate {
    let last_day = days_in_month(month_start);
    let day = day_of_month.clamp(1, last_day);
    month_start
        .checked_add_days(Days::new(u64::from(day - 1)))
        .unwrap_or(month_start)
}

fn days_in_month(month_start: NaiveDate) -> u32 {
    match month_start.checked_add_months(Months::new(1)) {
        Some(next) => (next - month_start).num_days() as u32,
        None => 31,
    }
}
