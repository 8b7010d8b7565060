//! Care reminder calculator.
//!
//! # Responsibility
//! - Turn the next due dates of recurring care into ranked reminders.
//!
//! # Invariants
//! - Only dates at most `REMINDER_HORIZON_DAYS` away (or overdue) are kept.
//! - Output is sorted by urgency rank, then by ascending `days_left`.

use crate::model::profile::CareSchedule;
use chrono::NaiveDate;
use serde::Serialize;

/// Reminders further out than this are omitted.
pub const REMINDER_HORIZON_DAYS: i64 = 30;
const URGENT_MAX_DAYS: i64 = 7;
const WARNING_MAX_DAYS: i64 = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CareKind {
    Vaccination,
    Antiparasitic,
    FleaTick,
}

/// Ordered from most to least pressing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Urgent,
    Warning,
    Ok,
}

impl Urgency {
    fn for_days_left(days_left: i64) -> Self {
        if days_left <= URGENT_MAX_DAYS {
            Self::Urgent
        } else if days_left <= WARNING_MAX_DAYS {
            Self::Warning
        } else {
            Self::Ok
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Reminder {
    pub kind: CareKind,
    pub date: NaiveDate,
    /// Whole days from today; negative when overdue.
    pub days_left: i64,
    pub urgency: Urgency,
}

impl Reminder {
    pub fn is_overdue(&self) -> bool {
        self.days_left < 0
    }
}

/// Computes ranked reminders for every scheduled date relative to `today`.
pub fn upcoming_reminders(schedule: &CareSchedule, today: NaiveDate) -> Vec<Reminder> {
    let mut reminders: Vec<Reminder> = [
        (CareKind::Vaccination, schedule.next_vaccination),
        (CareKind::Antiparasitic, schedule.next_antiparasitic),
        (CareKind::FleaTick, schedule.next_flea_tick),
    ]
    .into_iter()
    .filter_map(|(kind, date)| {
        let date = date?;
        let days_left = (date - today).num_days();
        (days_left <= REMINDER_HORIZON_DAYS).then(|| Reminder {
            kind,
            date,
            days_left,
            urgency: Urgency::for_days_left(days_left),
        })
    })
    .collect();

    reminders.sort_by_key(|reminder| (reminder.urgency, reminder.days_left));
    reminders
}

#[cfg(test)]
mod tests {
    use super::{upcoming_reminders, CareKind, Urgency};
    use crate::model::profile::CareSchedule;
    use chrono::{Days, NaiveDate};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 10).unwrap()
    }

    fn in_days(days: i64) -> Option<NaiveDate> {
        if days >= 0 {
            today().checked_add_days(Days::new(days as u64))
        } else {
            today().checked_sub_days(Days::new(days.unsigned_abs()))
        }
    }

    fn single(days: i64) -> Vec<super::Reminder> {
        let schedule = CareSchedule {
            next_vaccination: in_days(days),
            ..CareSchedule::default()
        };
        upcoming_reminders(&schedule, today())
    }

    #[test]
    fn urgency_boundaries() {
        assert_eq!(single(7)[0].urgency, Urgency::Urgent);
        assert_eq!(single(8)[0].urgency, Urgency::Warning);
        assert_eq!(single(14)[0].urgency, Urgency::Warning);
        assert_eq!(single(15)[0].urgency, Urgency::Ok);
        assert_eq!(single(30)[0].urgency, Urgency::Ok);
        assert!(single(31).is_empty());
    }

    #[test]
    fn past_dates_are_urgent_and_overdue() {
        let reminders = single(-400);
        assert_eq!(reminders.len(), 1);
        assert_eq!(reminders[0].urgency, Urgency::Urgent);
        assert_eq!(reminders[0].days_left, -400);
        assert!(reminders[0].is_overdue());
    }

    #[test]
    fn sorted_by_urgency_then_days_left() {
        let schedule = CareSchedule {
            next_vaccination: in_days(20),
            next_antiparasitic: in_days(5),
            next_flea_tick: in_days(-2),
        };
        let reminders = upcoming_reminders(&schedule, today());
        let kinds: Vec<_> = reminders.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            [CareKind::FleaTick, CareKind::Antiparasitic, CareKind::Vaccination]
        );
    }

    #[test]
    fn empty_schedule_has_no_reminders() {
        assert!(upcoming_reminders(&CareSchedule::default(), today()).is_empty());
    }
}
