//! Entry domain model.
//!
//! # Responsibility
//! - Define one logged event: location, creation time, category and the
//!   descriptive health fields attached to it.
//! - Validate caller input before an entry exists.
//!
//! # Invariants
//! - `lat`/`lng` are finite numbers.
//! - `category` is always present; the other descriptive fields may be blank.
//! - Free-text labels are trimmed; blank labels are stored as `None`.

use crate::model::lenient::{self, WireKey};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Stable entry identifier derived from creation time in epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub i64);

impl Display for EntryId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stool condition recorded for one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Healthy,
    Soft,
    Diarrhea,
    Hard,
    Blood,
    Mucus,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 6] = [
        Category::Healthy,
        Category::Soft,
        Category::Diarrhea,
        Category::Hard,
        Category::Blood,
        Category::Mucus,
    ];

    /// Returns the wire key (`healthy`, `soft`, ...).
    pub fn key(self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Soft => "soft",
            Self::Diarrhea => "diarrhea",
            Self::Hard => "hard",
            Self::Blood => "blood",
            Self::Mucus => "mucus",
        }
    }

    /// Parses a wire key; unknown or blank input yields `None`.
    pub fn parse(value: &str) -> Option<Self> {
        <Self as WireKey>::from_key(value)
    }

    /// Whether this category counts as a health concern.
    pub fn is_adverse(self) -> bool {
        matches!(self, Self::Diarrhea | Self::Blood | Self::Mucus)
    }
}

impl WireKey for Category {
    const ALL: &'static [Self] = &Category::ALL;

    fn key(self) -> &'static str {
        Category::key(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Size {
    Small,
    Medium,
    Large,
}

impl WireKey for Size {
    const ALL: &'static [Self] = &[Size::Small, Size::Medium, Size::Large];

    fn key(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

impl Size {
    pub fn parse(value: &str) -> Option<Self> {
        <Self as WireKey>::from_key(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoolColor {
    Normal,
    Light,
    Dark,
    Green,
    Yellow,
    Red,
}

impl WireKey for StoolColor {
    const ALL: &'static [Self] = &[
        StoolColor::Normal,
        StoolColor::Light,
        StoolColor::Dark,
        StoolColor::Green,
        StoolColor::Yellow,
        StoolColor::Red,
    ];

    fn key(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Light => "light",
            Self::Dark => "dark",
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Red => "red",
        }
    }
}

impl StoolColor {
    pub fn parse(value: &str) -> Option<Self> {
        <Self as WireKey>::from_key(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Smell {
    Normal,
    Strong,
    Unusual,
}

impl WireKey for Smell {
    const ALL: &'static [Self] = &[Smell::Normal, Smell::Strong, Smell::Unusual];

    fn key(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Strong => "strong",
            Self::Unusual => "unusual",
        }
    }
}

impl Smell {
    pub fn parse(value: &str) -> Option<Self> {
        <Self as WireKey>::from_key(value)
    }
}

/// Planar map coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Validation errors for entry input.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryValidationError {
    /// The required category select was left empty.
    MissingCategory,
    /// `lat` or `lng` is NaN or infinite.
    NonFiniteCoordinate { axis: &'static str, value: f64 },
}

impl Display for EntryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingCategory => write!(f, "entry category is required"),
            Self::NonFiniteCoordinate { axis, value } => {
                write!(f, "entry {axis} must be a finite number, got {value}")
            }
        }
    }
}

impl Error for EntryValidationError {}

impl EntryValidationError {
    /// Stable identifier for log lines; never carries input values.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingCategory => "missing_category",
            Self::NonFiniteCoordinate { axis: "lat", .. } => "non_finite_lat",
            Self::NonFiniteCoordinate { .. } => "non_finite_lng",
        }
    }
}

/// Caller input for a new entry, before id and timestamp are assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryDraft {
    pub lat: f64,
    pub lng: f64,
    pub category: Option<Category>,
    pub size: Option<Size>,
    pub color: Option<StoolColor>,
    pub smell: Option<Smell>,
    pub food: Option<String>,
    pub hours_since_meal: Option<f64>,
    pub notes: Option<String>,
}

impl EntryDraft {
    /// Creates a draft with only location and category set.
    pub fn new(lat: f64, lng: f64, category: Option<Category>) -> Self {
        Self {
            lat,
            lng,
            category,
            size: None,
            color: None,
            smell: None,
            food: None,
            hours_since_meal: None,
            notes: None,
        }
    }

    /// Checks required fields without consuming the draft.
    pub fn validate(&self) -> Result<Category, EntryValidationError> {
        validate_coordinate(self.lat, self.lng)?;
        self.category.ok_or(EntryValidationError::MissingCategory)
    }
}

/// One logged event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: EntryId,
    pub lat: f64,
    pub lng: f64,
    /// Creation instant, RFC 3339 on the wire.
    pub timestamp: DateTime<Utc>,
    /// Serialized as `type` to match the stored snapshot shape.
    #[serde(rename = "type")]
    pub category: Category,
    #[serde(default, deserialize_with = "lenient::optional_key")]
    pub size: Option<Size>,
    #[serde(default, deserialize_with = "lenient::optional_key")]
    pub color: Option<StoolColor>,
    #[serde(default, deserialize_with = "lenient::optional_key")]
    pub smell: Option<Smell>,
    /// Food eaten before the event; doubles as the secondary filter tag.
    #[serde(default, deserialize_with = "lenient::optional_label")]
    pub food: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_number")]
    pub hours_since_meal: Option<f64>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub notes: Option<String>,
}

impl Entry {
    /// Builds an entry from validated draft input.
    ///
    /// # Errors
    /// - `MissingCategory` when the draft has no category.
    /// - `NonFiniteCoordinate` when either coordinate is NaN or infinite.
    pub fn from_draft(
        id: EntryId,
        draft: EntryDraft,
        created_at: DateTime<Utc>,
    ) -> Result<Self, EntryValidationError> {
        let category = draft.validate()?;
        Ok(Self {
            id,
            lat: draft.lat,
            lng: draft.lng,
            timestamp: created_at,
            category,
            size: draft.size,
            color: draft.color,
            smell: draft.smell,
            food: draft.food.as_deref().and_then(normalize_label),
            hours_since_meal: draft.hours_since_meal.filter(|hours| hours.is_finite()),
            notes: draft.notes.as_deref().and_then(lenient::non_blank),
        })
    }

    /// Re-checks invariants on data that did not come through `from_draft`.
    pub fn validate(&self) -> Result<(), EntryValidationError> {
        validate_coordinate(self.lat, self.lng)
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }

    pub fn is_adverse(&self) -> bool {
        self.category.is_adverse()
    }
}

/// Trims a free-text label and collapses inner whitespace runs.
///
/// Returns `None` for blank input.
pub fn normalize_label(value: &str) -> Option<String> {
    let collapsed = WHITESPACE_RE.replace_all(value.trim(), " ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed.into_owned())
    }
}

fn validate_coordinate(lat: f64, lng: f64) -> Result<(), EntryValidationError> {
    if !lat.is_finite() {
        return Err(EntryValidationError::NonFiniteCoordinate {
            axis: "lat",
            value: lat,
        });
    }
    if !lng.is_finite() {
        return Err(EntryValidationError::NonFiniteCoordinate {
            axis: "lng",
            value: lng,
        });
    }
    Ok(())
}
