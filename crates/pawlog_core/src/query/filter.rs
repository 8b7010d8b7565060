//! Filter engine for the entry log.
//!
//! # Responsibility
//! - Apply period, category and food criteria as a conjunction.
//! - Provide the newest-first "recent entries" slice.
//!
//! # Invariants
//! - Pure: input is never mutated, relative order is preserved.
//! - Calendar days are evaluated in the time zone of the supplied `now`.
//! - Unknown period keys behave like `all`; unknown category keys match
//!   nothing.

use crate::model::entry::{normalize_label, Category, Entry};
use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};

/// Default size of the recent-entries list.
pub const RECENT_ENTRIES_LIMIT: usize = 10;

/// Time window applied by the filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Period {
    #[default]
    All,
    Today,
    Yesterday,
    /// From the start of the day seven days ago.
    Week,
    /// From the start of the same day one month ago.
    Month,
}

impl Period {
    /// Parses a period key; anything unrecognized is treated as `All`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "today" => Self::Today,
            "yesterday" => Self::Yesterday,
            "week" | "last-7-days" | "last_7_days" => Self::Week,
            "month" | "last-30-days" | "last_30_days" => Self::Month,
            _ => Self::All,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Today => "today",
            Self::Yesterday => "yesterday",
            Self::Week => "week",
            Self::Month => "month",
        }
    }
}

impl From<String> for Period {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

/// Category criterion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
    /// Key outside the category set; matches no entry.
    Unmatched(String),
}

impl CategoryFilter {
    /// Parses a select-box key; `all` or blank disables the criterion.
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "" | "all" => Self::All,
            key => Category::parse(key)
                .map_or_else(|| Self::Unmatched(key.to_string()), Self::Only),
        }
    }

    pub fn matches(&self, category: Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => *expected == category,
            Self::Unmatched(_) => false,
        }
    }
}

impl From<Category> for CategoryFilter {
    fn from(value: Category) -> Self {
        Self::Only(value)
    }
}

/// Transient filter selection. `None` food means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub period: Period,
    pub category: CategoryFilter,
    /// Compared against the normalized entry food.
    pub food: Option<String>,
}

impl FilterCriteria {
    /// Builds criteria from select-box keys, where `all` (or blank) disables
    /// a criterion.
    pub fn from_keys(period: &str, category: &str, food: &str) -> Self {
        Self {
            period: Period::parse(period),
            category: CategoryFilter::parse(category),
            food: match food.trim() {
                "" | "all" => None,
                value => normalize_label(value),
            },
        }
    }

    /// Whether every criterion is disabled.
    pub fn is_identity(&self) -> bool {
        self.period == Period::All && self.category == CategoryFilter::All && self.food.is_none()
    }
}

/// Returns matching entries in their original order.
pub fn filter_entries<Tz: TimeZone>(
    entries: &[Entry],
    criteria: &FilterCriteria,
    now: &DateTime<Tz>,
) -> Vec<Entry> {
    if criteria.is_identity() {
        return entries.to_vec();
    }

    let window = PeriodWindow::new(criteria.period, now);
    entries
        .iter()
        .filter(|entry| window.contains(entry))
        .filter(|entry| criteria.category.matches(entry.category))
        .filter(|entry| match criteria.food.as_deref() {
            Some(food) => entry.food.as_deref() == Some(food),
            None => true,
        })
        .cloned()
        .collect()
}

/// Last `limit` entries, newest first.
pub fn recent_entries(entries: &[Entry], limit: usize) -> Vec<Entry> {
    entries.iter().rev().take(limit).cloned().collect()
}

struct PeriodWindow<Tz: TimeZone> {
    period: Period,
    zone: Tz,
    today: NaiveDate,
}

impl<Tz: TimeZone> PeriodWindow<Tz> {
    fn new(period: Period, now: &DateTime<Tz>) -> Self {
        Self {
            period,
            zone: now.timezone(),
            today: now.date_naive(),
        }
    }

    fn contains(&self, entry: &Entry) -> bool {
        if self.period == Period::All {
            return true;
        }
        let local = entry.timestamp.with_timezone(&self.zone).naive_local();
        match self.period {
            Period::All => true,
            Period::Today => local.date() == self.today,
            Period::Yesterday => self.today.pred_opt() == Some(local.date()),
            Period::Week => is_on_or_after(local, self.today.checked_sub_days(Days::new(7))),
            Period::Month => is_on_or_after(local, month_before(self.today)),
        }
    }
}

fn is_on_or_after(local: NaiveDateTime, start_day: Option<NaiveDate>) -> bool {
    start_day.map_or(true, |day| local >= day.and_time(NaiveTime::MIN))
}

/// Same day-of-month one month earlier, rolling overflow forward
/// (Mar 31 -> Mar 3 in a non-leap year).
pub(crate) fn month_before(day: NaiveDate) -> Option<NaiveDate> {
    let (year, month) = if day.month() == 1 {
        (day.year() - 1, 12)
    } else {
        (day.year(), day.month() - 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)?.checked_add_days(Days::new(u64::from(day.day() - 1)))
}
