//! Aggregate statistics.
//!
//! # Responsibility
//! - Count entries per category and per adverse subset.
//! - Build the dense daily series used by the timeline chart.
//! - Correlate foods with adverse outcomes.
//!
//! # Invariants
//! - Empty input produces zero-valued output, never an error.
//! - `daily_histogram` returns exactly `window_days` buckets.
//! - `tag_correlation` groups always have `total > 0`.

use crate::model::entry::{Category, Entry};
use chrono::{DateTime, Days, NaiveDate, TimeZone};
use serde::Serialize;
use std::collections::HashMap;

/// Days covered by the timeline chart.
pub const DEFAULT_HISTOGRAM_DAYS: usize = 30;
/// Foods shown in the correlation chart.
pub const DEFAULT_TOP_TAGS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: Category,
    pub count: usize,
}

/// Headline counters for a list of entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub healthy: usize,
    /// Entries in an adverse category.
    pub problems: usize,
    /// One row per category in `Category::ALL` order, zeros included.
    pub by_category: Vec<CategoryCount>,
}

impl Summary {
    pub fn from_entries(entries: &[Entry]) -> Self {
        let mut counts = [0usize; Category::ALL.len()];
        for entry in entries {
            counts[category_index(entry.category)] += 1;
        }

        let by_category = Category::ALL
            .iter()
            .zip(counts)
            .map(|(&category, count)| CategoryCount { category, count })
            .collect();

        Self {
            total: entries.len(),
            healthy: counts[category_index(Category::Healthy)],
            problems: entries.iter().filter(|entry| entry.is_adverse()).count(),
            by_category,
        }
    }

    pub fn category_count(&self, category: Category) -> usize {
        self.by_category
            .iter()
            .find(|row| row.category == category)
            .map_or(0, |row| row.count)
    }

    /// Share of healthy entries, rounded to a whole percent.
    pub fn healthy_percentage(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        (self.healthy as f64 / self.total as f64 * 100.0).round() as u32
    }
}

/// Counts for one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyBucket {
    pub date: NaiveDate,
    pub total: usize,
    pub problems: usize,
}

/// Per-day totals for the last `window_days` days, today included.
///
/// Buckets are oldest first and zero-filled; days are evaluated in the time
/// zone of `now`.
pub fn daily_histogram<Tz: TimeZone>(
    entries: &[Entry],
    window_days: usize,
    now: &DateTime<Tz>,
) -> Vec<DailyBucket> {
    let today = now.date_naive();
    let Some(first_day) = window_days
        .checked_sub(1)
        .and_then(|back| today.checked_sub_days(Days::new(back as u64)))
    else {
        return Vec::new();
    };

    let mut buckets: Vec<DailyBucket> = first_day
        .iter_days()
        .take(window_days)
        .map(|date| DailyBucket {
            date,
            total: 0,
            problems: 0,
        })
        .collect();

    let zone = now.timezone();
    for entry in entries {
        let day = entry.timestamp.with_timezone(&zone).date_naive();
        let offset = (day - first_day).num_days();
        let Ok(index) = usize::try_from(offset) else {
            continue;
        };
        if let Some(bucket) = buckets.get_mut(index) {
            bucket.total += 1;
            if entry.is_adverse() {
                bucket.problems += 1;
            }
        }
    }

    buckets
}

/// Outcome statistics for one food value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagCorrelation {
    pub tag: String,
    pub total: usize,
    pub problems: usize,
    /// `problems / total` as a percentage.
    pub problem_rate: f64,
}

/// Groups entries by food and returns the `top_k` most frequent groups.
///
/// Ties keep the order in which each food first appeared.
pub fn tag_correlation(entries: &[Entry], top_k: usize) -> Vec<TagCorrelation> {
    let mut groups: Vec<(String, usize, usize)> = Vec::new();
    let mut index_by_tag: HashMap<&str, usize> = HashMap::new();

    for entry in entries {
        let Some(tag) = entry.food.as_deref().map(str::trim).filter(|tag| !tag.is_empty()) else {
            continue;
        };
        let index = *index_by_tag.entry(tag).or_insert_with(|| {
            groups.push((tag.to_string(), 0, 0));
            groups.len() - 1
        });
        let group = &mut groups[index];
        group.1 += 1;
        if entry.is_adverse() {
            group.2 += 1;
        }
    }

    groups.sort_by(|left, right| right.1.cmp(&left.1));
    groups
        .into_iter()
        .take(top_k)
        .map(|(tag, total, problems)| TagCorrelation {
            problem_rate: problems as f64 / total as f64 * 100.0,
            tag,
            total,
            problems,
        })
        .collect()
}

fn category_index(category: Category) -> usize {
    Category::ALL
        .iter()
        .position(|known| *known == category)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::{daily_histogram, tag_correlation, Summary};
    use crate::model::entry::{Category, Entry, EntryDraft, EntryId};
    use chrono::{FixedOffset, TimeZone, Utc};

    fn entry(id: i64, category: Category, food: Option<&str>, at_ms: i64) -> Entry {
        let mut draft = EntryDraft::new(45.0, 9.0, Some(category));
        draft.food = food.map(str::to_string);
        Entry::from_draft(
            EntryId(id),
            draft,
            Utc.timestamp_millis_opt(at_ms).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn summary_counts_categories_and_problems() {
        let entries = vec![
            entry(1, Category::Healthy, None, 0),
            entry(2, Category::Diarrhea, None, 0),
            entry(3, Category::Healthy, None, 0),
        ];

        let summary = Summary::from_entries(&entries);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.problems, 1);
        assert_eq!(summary.category_count(Category::Healthy), 2);
        assert_eq!(summary.category_count(Category::Mucus), 0);
        assert_eq!(summary.by_category.len(), 6);
        assert_eq!(summary.healthy_percentage(), 67);
    }

    #[test]
    fn summary_of_empty_list_is_zeroed() {
        let summary = Summary::from_entries(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.problems, 0);
        assert_eq!(summary.healthy_percentage(), 0);
        assert!(summary.by_category.iter().all(|row| row.count == 0));
    }

    #[test]
    fn histogram_is_dense_even_when_empty() {
        let now = Utc.with_ymd_and_hms(2025, 5, 20, 12, 0, 0).unwrap();
        let buckets = daily_histogram(&[], 30, &now);
        assert_eq!(buckets.len(), 30);
        assert!(buckets.iter().all(|b| b.total == 0 && b.problems == 0));
        assert_eq!(buckets[29].date, now.date_naive());
        assert!(daily_histogram(&[], 0, &now).is_empty());
    }

    #[test]
    fn histogram_buckets_by_local_day_and_ignores_old_entries() {
        let zone = FixedOffset::east_opt(2 * 3600).unwrap();
        let now = zone.with_ymd_and_hms(2025, 5, 20, 9, 0, 0).unwrap();
        // 2025-05-19T23:30Z is already the 20th at UTC+2.
        let late_utc = Utc
            .with_ymd_and_hms(2025, 5, 19, 23, 30, 0)
            .unwrap()
            .timestamp_millis();
        let old = Utc
            .with_ymd_and_hms(2025, 3, 1, 12, 0, 0)
            .unwrap()
            .timestamp_millis();
        let entries = vec![
            entry(1, Category::Blood, None, late_utc),
            entry(2, Category::Healthy, None, old),
        ];

        let buckets = daily_histogram(&entries, 30, &now);
        let today = buckets.last().unwrap();
        assert_eq!(today.total, 1);
        assert_eq!(today.problems, 1);
        assert_eq!(buckets.iter().map(|b| b.total).sum::<usize>(), 1);
    }

    #[test]
    fn correlation_sorts_by_total_and_keeps_first_seen_order_on_ties() {
        let entries = vec![
            entry(1, Category::Healthy, Some("rice"), 0),
            entry(2, Category::Diarrhea, Some("fish"), 0),
            entry(3, Category::Healthy, Some("kibble"), 0),
            entry(4, Category::Mucus, Some("kibble"), 0),
            entry(5, Category::Healthy, None, 0),
            entry(6, Category::Healthy, Some("  "), 0),
        ];

        let groups = tag_correlation(&entries, 5);
        let tags: Vec<_> = groups.iter().map(|g| g.tag.as_str()).collect();
        assert_eq!(tags, ["kibble", "rice", "fish"]);
        assert_eq!(groups[0].total, 2);
        assert!((groups[0].problem_rate - 50.0).abs() < f64::EPSILON);
        assert!((groups[2].problem_rate - 100.0).abs() < f64::EPSILON);
        assert!(groups.iter().all(|g| g.total > 0));
    }

    #[test]
    fn correlation_truncates_to_top_k() {
        let entries: Vec<_> = (0..8)
            .map(|i| entry(i, Category::Healthy, Some(&format!("food-{i}")), 0))
            .collect();
        assert_eq!(tag_correlation(&entries, 5).len(), 5);
        assert!(tag_correlation(&[], 5).is_empty());
    }
}
