//! Printable health report.
//!
//! # Responsibility
//! - Assemble the read-only data handed to the document export collaborator:
//!   identity, medical and vet rows, headline statistics and recent history.
//!
//! # Invariants
//! - Building a report never mutates profile or entries.
//! - Identity rows are always present (`N/A` for blanks); medical and vet
//!   rows only for filled-in fields.
//! - History holds at most `REPORT_HISTORY_LIMIT` entries, newest first.

use crate::model::entry::{Category, Entry, Size, Smell, StoolColor};
use crate::model::profile::Profile;
use crate::query::filter::recent_entries;
use crate::stats::aggregate::Summary;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const REPORT_HISTORY_LIMIT: usize = 50;
pub const REPORT_NOTE_CHARS: usize = 25;
const NOT_AVAILABLE: &str = "N/A";
const FALLBACK_NAME: &str = "Dog";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    /// There is nothing to export.
    NoEntries,
}

impl Display for ReportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoEntries => write!(f, "no entries to export"),
        }
    }
}

impl Error for ReportError {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportStatistics {
    pub total: usize,
    pub healthy: usize,
    pub healthy_percentage: u32,
    pub problems: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportHistoryRow {
    pub timestamp: DateTime<Utc>,
    pub category: Category,
    pub size: Option<Size>,
    pub color: Option<StoolColor>,
    pub smell: Option<Smell>,
    pub food: Option<String>,
    /// Truncated to `REPORT_NOTE_CHARS` characters plus `...`.
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthReport {
    pub title_name: String,
    pub generated_on: NaiveDate,
    pub identity: Vec<ReportRow>,
    pub health: Vec<ReportRow>,
    pub vet: Vec<ReportRow>,
    pub statistics: ReportStatistics,
    pub history: Vec<ReportHistoryRow>,
}

impl HealthReport {
    /// Builds the report for `profile` and the full entry log.
    ///
    /// # Errors
    /// - `NoEntries` when the log is empty.
    pub fn build(
        profile: &Profile,
        entries: &[Entry],
        generated_on: NaiveDate,
    ) -> Result<Self, ReportError> {
        if entries.is_empty() {
            return Err(ReportError::NoEntries);
        }

        let summary = Summary::from_entries(entries);
        Ok(Self {
            title_name: profile.display_name().unwrap_or(FALLBACK_NAME).to_string(),
            generated_on,
            identity: identity_rows(profile),
            health: filled_rows(&[
                ("Chronic diseases", &profile.chronic_diseases),
                ("Food allergies", &profile.food_allergies),
                ("Medicine allergies", &profile.medicine_allergies),
                ("Current medicine", &profile.current_medicine),
                ("Surgeries", &profile.surgeries),
            ]),
            vet: filled_rows(&[
                ("Name", &profile.vet_name),
                ("Phone", &profile.vet_phone),
                ("Email", &profile.vet_email),
                ("Address", &profile.vet_address),
            ]),
            statistics: ReportStatistics {
                total: summary.total,
                healthy: summary.healthy,
                healthy_percentage: summary.healthy_percentage(),
                problems: summary.problems,
            },
            history: recent_entries(entries, REPORT_HISTORY_LIMIT)
                .into_iter()
                .map(history_row)
                .collect(),
        })
    }
}

impl Display for HealthReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Health report - {}", self.title_name)?;
        writeln!(f, "Generated on: {}", self.generated_on)?;
        write_section(f, "Dog", &self.identity)?;
        write_section(f, "Health", &self.health)?;
        write_section(f, "Veterinarian", &self.vet)?;

        writeln!(f)?;
        writeln!(f, "Statistics")?;
        writeln!(f, "  Total: {}", self.statistics.total)?;
        writeln!(
            f,
            "  Healthy: {} ({}%)",
            self.statistics.healthy, self.statistics.healthy_percentage
        )?;
        writeln!(f, "  Problems: {}", self.statistics.problems)?;

        writeln!(f)?;
        writeln!(f, "Recent history")?;
        for row in &self.history {
            writeln!(
                f,
                "  {} | {} | {} | {}",
                row.timestamp.format("%Y-%m-%d %H:%M"),
                row.category.key(),
                row.food.as_deref().unwrap_or(NOT_AVAILABLE),
                row.notes
            )?;
        }
        Ok(())
    }
}

fn write_section(f: &mut Formatter<'_>, title: &str, rows: &[ReportRow]) -> std::fmt::Result {
    if rows.is_empty() {
        return Ok(());
    }
    writeln!(f)?;
    writeln!(f, "{title}")?;
    for row in rows {
        writeln!(f, "  {}: {}", row.label, row.value)?;
    }
    Ok(())
}

fn identity_rows(profile: &Profile) -> Vec<ReportRow> {
    let or_na = |value: &str| {
        let value = value.trim();
        if value.is_empty() {
            NOT_AVAILABLE.to_string()
        } else {
            value.to_string()
        }
    };

    vec![
        row("Name", or_na(&profile.name)),
        row("Breed", or_na(&profile.breed)),
        row(
            "Gender",
            profile
                .gender
                .map_or(NOT_AVAILABLE.to_string(), |gender| gender.key().to_string()),
        ),
        row(
            "Birthdate",
            profile
                .birthdate
                .map_or(NOT_AVAILABLE.to_string(), |date| date.to_string()),
        ),
        row(
            "Weight",
            profile
                .weight
                .map_or(NOT_AVAILABLE.to_string(), |kg| format!("{kg} kg")),
        ),
        row("Color", or_na(&profile.color)),
        row("Microchip", or_na(&profile.microchip)),
    ]
}

fn filled_rows(fields: &[(&'static str, &String)]) -> Vec<ReportRow> {
    fields
        .iter()
        .filter(|(_, value)| !value.trim().is_empty())
        .map(|(label, value)| row(*label, value.trim().to_string()))
        .collect()
}

fn row(label: &'static str, value: String) -> ReportRow {
    ReportRow { label, value }
}

fn history_row(entry: Entry) -> ReportHistoryRow {
    ReportHistoryRow {
        timestamp: entry.timestamp,
        category: entry.category,
        size: entry.size,
        color: entry.color,
        smell: entry.smell,
        food: entry.food,
        notes: entry
            .notes
            .as_deref()
            .map(|notes| truncate_chars(notes, REPORT_NOTE_CHARS))
            .unwrap_or_default(),
    }
}

fn truncate_chars(value: &str, max_chars: usize) -> String {
    let mut truncated: String = value.chars().take(max_chars).collect();
    if value.chars().count() > max_chars {
        truncated.push_str("...");
    }
    truncated
}
