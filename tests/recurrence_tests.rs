use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::collections::BTreeSet;
use timeline_engine::recurrence::weekday_from_name;
use timeline_engine::{
    EndCondition, RecurrenceConfig, RecurrenceError, RecurrencePreset, RecurrenceRule,
    RecurrenceType, WeeklyConfig, next_occurrences,
};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn weekly_config(interval: u32, days: &[u8]) -> RecurrenceConfig {
    RecurrenceConfig {
        weekly: WeeklyConfig {
            interval,
            days_of_week: days.iter().copied().collect(),
        },
        ..RecurrenceConfig::default()
    }
}

#[test]
fn daily_from_monday_yields_consecutive_days() {
    let monday = d(2025, 3, 10);
    assert_eq!(monday.weekday(), Weekday::Mon);
    let dates =
        next_occurrences(monday, RecurrenceType::Daily, &RecurrenceConfig::default(), 5).unwrap();
    let expected: Vec<NaiveDate> = (0..5).map(|i| monday + Duration::days(i)).collect();
    assert_eq!(dates, expected);
}

#[test]
fn daily_interval_skips_days() {
    let mut config = RecurrenceConfig::default();
    config.daily.interval = 3;
    let dates = next_occurrences(d(2025, 3, 10), RecurrenceType::Daily, &config, 3).unwrap();
    assert_eq!(dates, vec![d(2025, 3, 10), d(2025, 3, 13), d(2025, 3, 16)]);
}

#[test]
fn weekly_yields_only_selected_days_in_order() {
    let config = weekly_config(1, &[1, 3, 5]);
    let dates = next_occurrences(d(2025, 3, 10), RecurrenceType::Weekly, &config, 6).unwrap();
    assert_eq!(
        dates,
        vec![
            d(2025, 3, 10),
            d(2025, 3, 12),
            d(2025, 3, 14),
            d(2025, 3, 17),
            d(2025, 3, 19),
            d(2025, 3, 21),
        ]
    );
    assert!(dates.iter().all(|date| matches!(
        date.weekday(),
        Weekday::Mon | Weekday::Wed | Weekday::Fri
    )));
    assert!(dates.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn weekly_skips_days_before_start_in_first_week() {
    let config = weekly_config(1, &[1, 3, 5]);
    let dates = next_occurrences(d(2025, 3, 13), RecurrenceType::Weekly, &config, 3).unwrap();
    assert_eq!(dates, vec![d(2025, 3, 14), d(2025, 3, 17), d(2025, 3, 19)]);
}

#[test]
fn weekly_interval_uses_whole_week_windows() {
    // Window of the start week begins Sunday Mar 9; its Monday precedes the start.
    let config = weekly_config(2, &[1]);
    let dates = next_occurrences(d(2025, 3, 12), RecurrenceType::Weekly, &config, 3).unwrap();
    assert_eq!(dates, vec![d(2025, 3, 24), d(2025, 4, 7), d(2025, 4, 21)]);
}

#[test]
fn weekly_sunday_is_day_zero() {
    let config = weekly_config(1, &[0, 6]);
    let dates = next_occurrences(d(2025, 3, 10), RecurrenceType::Weekly, &config, 4).unwrap();
    assert_eq!(
        dates,
        vec![d(2025, 3, 15), d(2025, 3, 16), d(2025, 3, 22), d(2025, 3, 23)]
    );
}

#[test]
fn monthly_day_31_clamps_to_short_months() {
    let mut config = RecurrenceConfig::default();
    config.monthly.day_of_month = 31;
    let dates = next_occurrences(d(2025, 1, 31), RecurrenceType::Monthly, &config, 3).unwrap();
    assert_eq!(dates, vec![d(2025, 1, 31), d(2025, 2, 28), d(2025, 3, 31)]);

    let leap = next_occurrences(d(2024, 1, 1), RecurrenceType::Monthly, &config, 4).unwrap();
    assert_eq!(
        leap,
        vec![d(2024, 1, 31), d(2024, 2, 29), d(2024, 3, 31), d(2024, 4, 30)]
    );
}

#[test]
fn monthly_skips_current_month_when_day_already_passed() {
    let mut config = RecurrenceConfig::default();
    config.monthly.day_of_month = 15;
    let dates = next_occurrences(d(2025, 1, 20), RecurrenceType::Monthly, &config, 2).unwrap();
    assert_eq!(dates, vec![d(2025, 2, 15), d(2025, 3, 15)]);
}

#[test]
fn monthly_interval_advances_whole_months() {
    let mut config = RecurrenceConfig::default();
    config.monthly.interval = 2;
    let dates = next_occurrences(d(2025, 11, 1), RecurrenceType::Monthly, &config, 3).unwrap();
    assert_eq!(dates, vec![d(2025, 11, 1), d(2026, 1, 1), d(2026, 3, 1)]);
}

#[test]
fn occurrences_are_restartable() {
    let config = weekly_config(2, &[2, 4]);
    let start = d(2025, 6, 3);
    let first = next_occurrences(start, RecurrenceType::Weekly, &config, 10).unwrap();
    let second = next_occurrences(start, RecurrenceType::Weekly, &config, 10).unwrap();
    assert_eq!(first, second);

    let rule = config.rule(RecurrenceType::Weekly).unwrap();
    let prefix: Vec<NaiveDate> = rule.occurrences(start).take(4).collect();
    assert_eq!(prefix, first[..4]);
}

#[test]
fn zero_count_yields_nothing() {
    let dates =
        next_occurrences(d(2025, 3, 10), RecurrenceType::Daily, &RecurrenceConfig::default(), 0)
            .unwrap();
    assert!(dates.is_empty());
}

#[test]
fn invalid_configs_are_rejected() {
    let empty = weekly_config(1, &[]);
    assert_eq!(
        next_occurrences(d(2025, 3, 10), RecurrenceType::Weekly, &empty, 3),
        Err(RecurrenceError::EmptyDaysOfWeek)
    );

    let mut zero = RecurrenceConfig::default();
    zero.daily.interval = 0;
    assert_eq!(
        zero.rule(RecurrenceType::Daily),
        Err(RecurrenceError::ZeroInterval)
    );

    let mut day_32 = RecurrenceConfig::default();
    day_32.monthly.day_of_month = 32;
    assert_eq!(
        day_32.rule(RecurrenceType::Monthly),
        Err(RecurrenceError::DayOfMonthOutOfRange { day: 32 })
    );

    assert_eq!(
        weekly_config(1, &[1, 7]).rule(RecurrenceType::Weekly),
        Err(RecurrenceError::WeekdayOutOfRange { day: 7 })
    );
}

#[test]
fn invalid_rule_iterates_to_nothing() {
    let rule = RecurrenceRule::weekly(1, []);
    assert_eq!(rule.occurrences(d(2025, 3, 10)).next(), None);
    let rule = RecurrenceRule::daily(0);
    assert_eq!(rule.occurrences(d(2025, 3, 10)).count(), 0);
}

#[test]
fn end_date_is_inclusive() {
    let rule = RecurrenceRule::daily(1);
    let dates: Vec<NaiveDate> = rule
        .occurrences_until(d(2025, 3, 10), &EndCondition::until(d(2025, 3, 13)))
        .collect();
    assert_eq!(dates.len(), 4);
    assert_eq!(dates.last(), Some(&d(2025, 3, 13)));
}

#[test]
fn max_occurrences_stops_generation() {
    let rule = RecurrenceRule::monthly(1, 10);
    let dates: Vec<NaiveDate> = rule
        .occurrences_until(d(2025, 1, 1), &EndCondition::count(2))
        .collect();
    assert_eq!(dates, vec![d(2025, 1, 10), d(2025, 2, 10)]);
}

#[test]
fn first_end_condition_reached_wins() {
    let rule = RecurrenceRule::daily(1);
    let start = d(2025, 3, 10);

    let count_first = EndCondition {
        until: Some(d(2025, 3, 20)),
        max_occurrences: Some(3),
    };
    assert_eq!(rule.occurrences_until(start, &count_first).count(), 3);

    let date_first = EndCondition {
        until: Some(d(2025, 3, 11)),
        max_occurrences: Some(5),
    };
    assert_eq!(rule.occurrences_until(start, &date_first).count(), 2);
}

#[test]
fn unbounded_end_condition_supports_arbitrary_prefixes() {
    let end = EndCondition::default();
    assert!(end.is_unbounded());
    let rule = RecurrenceRule::weekly(1, [1, 2, 3, 4, 5]);
    let dates: Vec<NaiveDate> = rule.occurrences_until(d(2025, 1, 1), &end).take(250).collect();
    assert_eq!(dates.len(), 250);
    assert!(dates.windows(2).all(|w| w[0] < w[1]));
    assert!(dates
        .iter()
        .all(|date| !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)));
}

#[test]
fn applying_a_preset_replaces_that_types_config() {
    let mut config = weekly_config(3, &[0, 6]);
    config.daily.interval = 4;

    let kind = config.apply_preset(RecurrencePreset::EveryWeekday);
    assert_eq!(kind, RecurrenceType::Weekly);
    assert_eq!(config.weekly.interval, 1);
    assert_eq!(config.weekly.days_of_week, BTreeSet::from([1, 2, 3, 4, 5]));
    assert_eq!(config.daily.interval, 4);

    let kind = config.apply_preset(RecurrencePreset::MonthlyLast);
    assert_eq!(kind, RecurrenceType::Monthly);
    let dates = next_occurrences(d(2025, 2, 1), kind, &config, 2).unwrap();
    assert_eq!(dates, vec![d(2025, 2, 28), d(2025, 3, 31)]);
}

#[test]
fn every_preset_expands_to_a_valid_rule() {
    for preset in RecurrencePreset::ALL {
        let rule = preset.expand();
        assert!(rule.validate().is_ok(), "{preset}");
        assert_eq!(preset.name().parse::<RecurrencePreset>().unwrap(), preset);
    }
    assert_eq!(
        "Every-Monday".parse::<RecurrencePreset>().unwrap(),
        RecurrencePreset::EveryMonday
    );
    assert!(matches!(
        "every_blue_moon".parse::<RecurrencePreset>(),
        Err(RecurrenceError::UnknownPreset { .. })
    ));
}

#[test]
fn biweekly_preset_alternates_weeks() {
    let rule = RecurrencePreset::BiweeklyMonday.expand();
    let dates: Vec<NaiveDate> = rule.occurrences(d(2025, 3, 10)).take(3).collect();
    assert_eq!(dates, vec![d(2025, 3, 10), d(2025, 3, 24), d(2025, 4, 7)]);
}

#[test]
fn rules_describe_themselves() {
    assert_eq!(RecurrenceRule::daily(1).describe(), "Every day");
    assert_eq!(RecurrenceRule::daily(2).describe(), "Every 2 days");
    assert_eq!(
        RecurrenceRule::weekly(1, [5, 1, 3]).describe(),
        "Every week on Mon, Wed, Fri"
    );
    assert_eq!(RecurrenceRule::weekly(2, [0]).to_string(), "Every 2 weeks on Sun");
    assert_eq!(RecurrenceRule::monthly(1, 15).describe(), "Monthly on day 15");
    assert_eq!(RecurrenceRule::monthly(3, 31).describe(), "Every 3 months on day 31");
}

#[test]
fn rule_json_uses_tagged_shape() {
    let rule: RecurrenceRule =
        serde_json::from_str(r#"{"weekly":{"interval":1,"days_of_week":[1,3,5]}}"#).unwrap();
    assert_eq!(rule, RecurrenceRule::weekly(1, [1, 3, 5]));
    assert_eq!(rule.recurrence_type(), RecurrenceType::Weekly);
}

#[test]
fn recurrence_type_and_weekday_names_parse() {
    assert_eq!("Weekly".parse::<RecurrenceType>().unwrap(), RecurrenceType::Weekly);
    assert!(matches!(
        "yearly".parse::<RecurrenceType>(),
        Err(RecurrenceError::UnknownRecurrenceType { .. })
    ));
    assert_eq!(weekday_from_name("sun").unwrap(), 0);
    assert_eq!(weekday_from_name("Wednesday").unwrap(), 3);
    assert_eq!(weekday_from_name("6").unwrap(), 6);
    assert_eq!(
        weekday_from_name("9"),
        Err(RecurrenceError::WeekdayOutOfRange { day: 9 })
    );
    assert!(matches!(
        weekday_from_name("funday"),
        Err(RecurrenceError::UnknownWeekday { .. })
    ));
}

#[test]
fn occurrences_stop_quietly_at_the_calendar_limits() {
    assert_eq!(
        RecurrenceRule::daily(1).occurrences(NaiveDate::MAX).collect::<Vec<_>>(),
        vec![NaiveDate::MAX]
    );
    assert_eq!(
        RecurrenceRule::monthly(1, 31).occurrences(NaiveDate::MAX).collect::<Vec<_>>(),
        vec![NaiveDate::MAX]
    );

    let earliest: Vec<NaiveDate> = RecurrenceRule::weekly(1, [0, 3, 6])
        .occurrences(NaiveDate::MIN)
        .take(6)
        .collect();
    assert!(earliest.iter().all(|date| *date >= NaiveDate::MIN));
    assert!(earliest.windows(2).all(|pair| pair[0] < pair[1]));
}
