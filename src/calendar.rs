use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Statutory public holidays observed by the upstream project-management system.
const STATUTORY_HOLIDAYS: &[(i32, u32, u32)] = &[
    // 2024
    (2024, 1, 1),
    (2024, 2, 10),
    (2024, 2, 11),
    (2024, 2, 12),
    (2024, 2, 13),
    (2024, 2, 14),
    (2024, 2, 15),
    (2024, 2, 16),
    (2024, 4, 4),
    (2024, 4, 5),
    (2024, 4, 6),
    (2024, 5, 1),
    (2024, 5, 2),
    (2024, 5, 3),
    (2024, 5, 4),
    (2024, 6, 8),
    (2024, 6, 9),
    (2024, 6, 10),
    (2024, 9, 15),
    (2024, 9, 16),
    (2024, 9, 17),
    (2024, 10, 1),
    (2024, 10, 2),
    (2024, 10, 3),
    (2024, 10, 4),
    (2024, 10, 5),
    (2024, 10, 6),
    // 2025
    (2025, 1, 1),
    (2025, 1, 28),
    (2025, 1, 29),
    (2025, 1, 30),
    (2025, 1, 31),
    (2025, 2, 1),
    (2025, 2, 2),
    (2025, 2, 3),
    (2025, 4, 4),
    (2025, 4, 5),
    (2025, 4, 6),
    (2025, 5, 1),
    (2025, 5, 2),
    (2025, 5, 3),
    (2025, 6, 7),
    (2025, 6, 8),
    (2025, 6, 9),
    (2025, 9, 15),
    (2025, 9, 16),
    (2025, 9, 17),
    (2025, 10, 1),
    (2025, 10, 2),
    (2025, 10, 3),
    (2025, 10, 4),
    (2025, 10, 5),
    (2025, 10, 6),
    (2025, 10, 7),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkCalendar {
    holidays: HashSet<NaiveDate>,
    non_working_days: HashSet<Weekday>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkCalendarConfig {
    working_days: Vec<Weekday>,
    holidays: Vec<NaiveDate>,
}

impl Default for WorkCalendar {
    fn default() -> Self {
        Self::custom(
            [
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ],
            Self::statutory_holidays(),
        )
    }
}

impl WorkCalendar {
    const ALL_WEEKDAYS: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    /// Built-in holiday table used by [`WorkCalendar::default`].
    pub fn statutory_holidays() -> Vec<NaiveDate> {
        STATUTORY_HOLIDAYS
            .iter()
            .filter_map(|&(y, m, d)| NaiveDate::from_ymd_opt(y, m, d))
            .collect()
    }

    pub fn custom<I, J>(working_days: I, holidays: J) -> Self
    where
        I: IntoIterator<Item = Weekday>,
        J: IntoIterator<Item = NaiveDate>,
    {
        let config = WorkCalendarConfig::new(working_days, holidays);
        Self::from_config(&config)
    }

    /// Build a calendar from its config. A config without working days falls back to
    /// Monday through Friday.
    pub fn from_config(config: &WorkCalendarConfig) -> Self {
        let working_set: HashSet<Weekday> = if config.working_days.is_empty() {
            tracing::warn!("calendar config has no working days, using Monday-Friday");
            Self::ALL_WEEKDAYS[..5].iter().copied().collect()
        } else {
            config.working_days.iter().copied().collect()
        };
        let non_working_days = Self::ALL_WEEKDAYS
            .iter()
            .copied()
            .filter(|day| !working_set.contains(day))
            .collect();

        Self {
            holidays: config.holidays.iter().copied().collect(),
            non_working_days,
        }
    }

    pub fn to_config(&self) -> WorkCalendarConfig {
        WorkCalendarConfig::from(self)
    }

    /// Add a single holiday
    pub fn add_holiday(&mut self, date: NaiveDate) {
        self.holidays.insert(date);
    }

    /// Add multiple holidays at once
    pub fn add_holidays(&mut self, dates: &[NaiveDate]) {
        self.holidays.extend(dates);
    }

    /// Set custom working days (e.g., Mon-Sat for 6-day weeks)
    pub fn set_working_days(&mut self, days: Vec<Weekday>) {
        self.non_working_days.clear();
        for day in Self::ALL_WEEKDAYS {
            if !days.contains(&day) {
                self.non_working_days.insert(day);
            }
        }
    }

    pub fn holiday_count(&self) -> usize {
        self.holidays.len()
    }

    /// Check if a date is a working day
    pub fn is_available(&self, date: NaiveDate) -> bool {
        !self.holidays.contains(&date) && !self.non_working_days.contains(&date.weekday())
    }

    /// Count working days in `start..=end`; zero when `end` precedes `start`.
    ///
    /// Whole weeks are counted arithmetically, so the cost does not grow with the
    /// length of the window.
    pub fn count_available_days(&self, start: NaiveDate, end: NaiveDate) -> i64 {
        if end < start {
            return 0;
        }
        let total_days = end.signed_duration_since(start).num_days() + 1;
        let working_per_week = (7 - self.non_working_days.len()) as i64;
        let mut count = (total_days / 7) * working_per_week;

        // Leftover days sit at the tail of the window, walking back from `end`.
        let mut current = end;
        for _ in 0..total_days % 7 {
            if !self.non_working_days.contains(&current.weekday()) {
                count += 1;
            }
            match current.pred_opt() {
                Some(prev) => current = prev,
                None => break,
            }
        }

        let holidays_in_range = self
            .holidays
            .iter()
            .filter(|day| **day >= start && **day <= end)
            .filter(|day| !self.non_working_days.contains(&day.weekday()))
            .count() as i64;
        count - holidays_in_range
    }
}

impl WorkCalendarConfig {
    pub fn new<I, J>(working_days: I, holidays: J) -> Self
    where
        I: IntoIterator<Item = Weekday>,
        J: IntoIterator<Item = NaiveDate>,
    {
        let mut working: Vec<Weekday> = working_days.into_iter().collect();
        working.sort_by_key(|wd| wd.num_days_from_monday());
        working.dedup_by(|a, b| a.num_days_from_monday() == b.num_days_from_monday());

        let mut holidays: Vec<NaiveDate> = holidays.into_iter().collect();
        holidays.sort();
        holidays.dedup();

        Self {
            working_days: working,
            holidays,
        }
    }

    pub fn working_days(&self) -> &[Weekday] {
        &self.working_days
    }

    pub fn holidays(&self) -> &[NaiveDate] {
        &self.holidays
    }
}

impl Default for WorkCalendarConfig {
    fn default() -> Self {
        WorkCalendarConfig::from(&WorkCalendar::default())
    }
}

impl From<&WorkCalendar> for WorkCalendarConfig {
    fn from(calendar: &WorkCalendar) -> Self {
        let working = WorkCalendar::ALL_WEEKDAYS
            .iter()
            .copied()
            .filter(|day| !calendar.non_working_days.contains(day))
            .collect::<Vec<_>>();

        let mut holidays: Vec<NaiveDate> = calendar.holidays.iter().copied().collect();
        holidays.sort();

        Self {
            working_days: working,
            holidays,
        }
    }
}
