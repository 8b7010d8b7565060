use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use pawlog_core::{
    filter_entries, recent_entries, Category, CategoryFilter, Entry, EntryDraft, EntryId,
    FilterCriteria, Period,
};

fn zone() -> FixedOffset {
    FixedOffset::east_opt(2 * 3600).unwrap()
}

/// 2025-06-15 10:00 at UTC+2.
fn now() -> DateTime<FixedOffset> {
    zone().with_ymd_and_hms(2025, 6, 15, 10, 0, 0).unwrap()
}

fn local(month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    zone()
        .with_ymd_and_hms(2025, month, day, hour, minute, 0)
        .unwrap()
        .with_timezone(&Utc)
}

fn entry(id: i64, category: Category, food: Option<&str>, created_at: DateTime<Utc>) -> Entry {
    let mut draft = EntryDraft::new(45.0 + id as f64 * 0.01, 9.0, Some(category));
    draft.food = food.map(str::to_string);
    Entry::from_draft(EntryId(id), draft, created_at).unwrap()
}

fn ids(entries: &[Entry]) -> Vec<i64> {
    entries.iter().map(|entry| entry.id.0).collect()
}

fn sample_log() -> Vec<Entry> {
    vec![
        entry(1, Category::Healthy, Some("kibble"), local(5, 14, 20, 0)),
        entry(2, Category::Soft, None, local(5, 15, 9, 0)),
        entry(3, Category::Healthy, Some("rice"), local(6, 7, 23, 0)),
        entry(4, Category::Diarrhea, Some("kibble"), local(6, 8, 0, 30)),
        entry(5, Category::Healthy, Some("kibble"), local(6, 14, 23, 30)),
        entry(6, Category::Blood, None, local(6, 15, 0, 10)),
        entry(7, Category::Healthy, Some("rice"), local(6, 15, 9, 45)),
    ]
}

fn by_period(period: &str) -> Vec<i64> {
    ids(&filter_entries(
        &sample_log(),
        &FilterCriteria::from_keys(period, "all", "all"),
        &now(),
    ))
}

#[test]
fn identity_criteria_return_full_log_in_order() {
    let log = sample_log();
    let filtered = filter_entries(&log, &FilterCriteria::default(), &now());
    assert_eq!(filtered, log);
}

#[test]
fn today_and_yesterday_follow_local_calendar_days() {
    // Entry 6 is still June 14 in UTC but June 15 locally.
    assert_eq!(by_period("today"), vec![6, 7]);
    assert_eq!(by_period("yesterday"), vec![5]);
}

#[test]
fn week_starts_at_local_midnight_seven_days_back() {
    assert_eq!(by_period("week"), vec![4, 5, 6, 7]);
}

#[test]
fn month_starts_at_same_day_previous_month() {
    assert_eq!(by_period("month"), vec![2, 3, 4, 5, 6, 7]);
}

#[test]
fn unknown_period_behaves_like_all() {
    assert_eq!(by_period("decade"), vec![1, 2, 3, 4, 5, 6, 7]);
    assert_eq!(Period::parse("decade"), Period::All);
}

#[test]
fn category_and_food_criteria_are_combined() {
    let log = sample_log();

    let healthy = filter_entries(&log, &FilterCriteria::from_keys("all", "healthy", ""), &now());
    assert_eq!(ids(&healthy), vec![1, 3, 5, 7]);

    let kibble = filter_entries(&log, &FilterCriteria::from_keys("all", "all", "kibble"), &now());
    assert_eq!(ids(&kibble), vec![1, 4, 5]);

    let criteria = FilterCriteria {
        period: Period::Week,
        category: CategoryFilter::Only(Category::Healthy),
        food: Some("kibble".to_string()),
    };
    assert_eq!(ids(&filter_entries(&log, &criteria, &now())), vec![5]);
}

#[test]
fn unknown_category_key_matches_nothing() {
    let log = sample_log();
    let criteria = FilterCriteria::from_keys("all", "diarhea", "all");

    assert!(!criteria.is_identity());
    assert!(filter_entries(&log, &criteria, &now()).is_empty());
}

#[test]
fn filtering_does_not_touch_input() {
    let log = sample_log();
    let snapshot = log.clone();
    let _ = filter_entries(&log, &FilterCriteria::from_keys("today", "blood", ""), &now());
    assert_eq!(log, snapshot);
}

#[test]
fn recent_entries_are_newest_first_and_capped() {
    let log = sample_log();
    assert_eq!(ids(&recent_entries(&log, 3)), vec![7, 6, 5]);
    assert_eq!(recent_entries(&log, 50).len(), log.len());
    assert!(recent_entries(&[], 10).is_empty());
}
