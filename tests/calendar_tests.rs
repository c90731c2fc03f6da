use chrono::{NaiveDate, Weekday};
use critical_path_tool::{WorkCalendar, WorkCalendarConfig};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn default_calendar_skips_weekends_and_statutory_holidays() {
    let calendar = WorkCalendar::default();

    assert!(calendar.is_available(d(2026, 3, 2)));
    assert!(!calendar.is_available(d(2026, 3, 7)));
    assert!(!calendar.is_available(d(2026, 3, 8)));
    assert!(!calendar.is_available(d(2025, 10, 1)));
    assert!(!calendar.is_available(d(2024, 5, 1)));
    assert_eq!(
        calendar.holiday_count(),
        WorkCalendar::statutory_holidays().len()
    );
}

#[test]
fn counting_is_inclusive() {
    let calendar = WorkCalendar::default();
    assert_eq!(calendar.count_available_days(d(2026, 3, 2), d(2026, 3, 2)), 1);
    assert_eq!(calendar.count_available_days(d(2026, 3, 2), d(2026, 3, 13)), 10);
    assert_eq!(calendar.count_available_days(d(2026, 3, 7), d(2026, 3, 8)), 0);
    assert_eq!(calendar.count_available_days(d(2026, 3, 13), d(2026, 3, 2)), 0);
}

#[test]
fn added_holidays_are_excluded() {
    let mut calendar = WorkCalendar::default();
    calendar.add_holiday(d(2026, 3, 3));
    calendar.add_holidays(&[d(2026, 3, 4), d(2026, 3, 4)]);

    assert!(!calendar.is_available(d(2026, 3, 3)));
    assert_eq!(calendar.count_available_days(d(2026, 3, 2), d(2026, 3, 6)), 3);
}

#[test]
fn working_days_can_be_changed() {
    let mut calendar = WorkCalendar::custom([Weekday::Mon], Vec::new());
    assert_eq!(calendar.count_available_days(d(2026, 3, 2), d(2026, 3, 15)), 2);

    calendar.set_working_days(vec![Weekday::Sat, Weekday::Sun]);
    assert!(calendar.is_available(d(2026, 3, 7)));
    assert!(!calendar.is_available(d(2026, 3, 2)));
}

#[test]
fn config_round_trip_is_sorted_and_deduplicated() {
    let config = WorkCalendarConfig::new(
        [Weekday::Fri, Weekday::Mon, Weekday::Mon],
        [d(2026, 5, 1), d(2026, 1, 1), d(2026, 5, 1)],
    );
    assert_eq!(config.working_days(), &[Weekday::Mon, Weekday::Fri]);
    assert_eq!(config.holidays(), &[d(2026, 1, 1), d(2026, 5, 1)]);

    let calendar = WorkCalendar::from_config(&config);
    assert_eq!(calendar.to_config(), config);
}

#[test]
fn empty_working_days_fall_back_to_weekdays() {
    let config = WorkCalendarConfig::new(Vec::new(), Vec::new());
    let calendar = WorkCalendar::from_config(&config);
    assert!(calendar.is_available(d(2026, 3, 2)));
    assert!(!calendar.is_available(d(2026, 3, 7)));
}

#[test]
fn calendar_config_deserializes_with_defaults() {
    let config: WorkCalendarConfig =
        serde_json::from_str(r#"{"working_days":["Mon","Tue"]}"#).unwrap();
    assert_eq!(config.working_days(), &[Weekday::Mon, Weekday::Tue]);
    assert_eq!(config.holidays(), WorkCalendarConfig::default().holidays());
}

#[test]
fn week_arithmetic_matches_a_day_by_day_count() {
    let mut calendar = WorkCalendar::default();
    calendar.set_working_days(vec![Weekday::Mon, Weekday::Tue, Weekday::Thu, Weekday::Sat]);
    calendar.add_holiday(d(2024, 3, 5));

    let start = d(2023, 12, 27);
    for end in start.iter_days().take(800).step_by(37) {
        let expected = start
            .iter_days()
            .take_while(|day| *day <= end)
            .filter(|day| calendar.is_available(*day))
            .count() as i64;
        assert_eq!(calendar.count_available_days(start, end), expected, "end {end}");
    }
}
