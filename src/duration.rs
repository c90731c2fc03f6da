//! Task duration derivation from schedule dates or the original estimate.

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::calendar::WorkCalendar;
use crate::task::TaskRecord;

pub const DEFAULT_HOURS_PER_WORKDAY: f64 = 8.0;
const SECONDS_PER_HOUR: f64 = 3600.0;

/// Inclusive date window a task occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct DurationResolver {
    calendar: WorkCalendar,
    hours_per_workday: f64,
}

impl Default for DurationResolver {
    fn default() -> Self {
        Self::new(WorkCalendar::default(), DEFAULT_HOURS_PER_WORKDAY)
    }
}

impl DurationResolver {
    pub fn new(calendar: WorkCalendar, hours_per_workday: f64) -> Self {
        Self {
            calendar,
            hours_per_workday,
        }
    }

    pub fn calendar(&self) -> &WorkCalendar {
        &self.calendar
    }

    pub fn hours_per_workday(&self) -> f64 {
        self.hours_per_workday
    }

    /// Duration in hours, or `None` when neither a date window nor a positive
    /// estimate is available.
    pub fn resolve(&self, task: &TaskRecord) -> Option<f64> {
        let key = task.key().unwrap_or("<no key>");

        if let Some(window) = self.window(task) {
            let days = self.calendar.count_available_days(window.start, window.end);
            let hours = days as f64 * self.hours_per_workday;
            debug!(task = key, days, hours, "duration from schedule dates");
            return Some(hours);
        }

        if let Some(seconds) = task.estimate_seconds() {
            let hours = seconds as f64 / SECONDS_PER_HOUR;
            debug!(task = key, hours, "duration from original estimate");
            return Some(hours);
        }

        warn!(task = key, "unable to resolve task duration");
        None
    }

    /// Start is the later of plan/actual start; end prefers an actual end that does
    /// not precede the start, falling back to the planned end.
    pub fn window(&self, task: &TaskRecord) -> Option<TaskWindow> {
        let key = task.key().unwrap_or("<no key>");
        let plan_start = parse_task_date(task.plan_start.as_deref(), key, "plan_start");
        let actual_start = parse_task_date(task.actual_start.as_deref(), key, "actual_start");

        let start = match (plan_start, actual_start) {
            (Some(plan), Some(actual)) => plan.max(actual),
            (Some(plan), None) => plan,
            (None, Some(actual)) => actual,
            (None, None) => return None,
        };

        let plan_end = parse_task_date(task.plan_end.as_deref(), key, "plan_end");
        let actual_end = parse_task_date(task.actual_end.as_deref(), key, "actual_end");

        let end = match (plan_end, actual_end) {
            (Some(plan), Some(actual)) => {
                if actual >= start {
                    actual
                } else {
                    plan
                }
            }
            (Some(plan), None) => plan,
            (None, Some(actual)) => actual,
            (None, None) => return None,
        };

        Some(TaskWindow { start, end })
    }
}

/// Parse the date portion of a timestamp such as `2025-06-02` or `2025-06-02T17:00:00`.
/// Blank input is absent; unparsable input is logged and treated as absent.
pub fn parse_task_date(raw: Option<&str>, task_key: &str, field: &str) -> Option<NaiveDate> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    let date_part = raw.split('T').next().unwrap_or(raw).trim();
    match NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(err) => {
            warn!(task = task_key, field, value = raw, %err, "failed to parse date");
            None
        }
    }
}
