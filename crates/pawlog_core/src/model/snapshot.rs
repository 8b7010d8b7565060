//! Persisted snapshot shape.
//!
//! # Responsibility
//! - Define the single object written to and read from local storage.
//! - Decode stored payloads field by field so one bad part never discards
//!   the rest.
//!
//! # Invariants
//! - Decoding never fails; unusable parts fall back to empty defaults and
//!   are reported as `LoadIssue`s.
//! - Encoding always writes `isFirstTime = false`.

use crate::model::entry::Entry;
use crate::model::profile::Profile;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::{Display, Formatter};

/// Whole application state as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(rename = "poops", alias = "entries")]
    pub entries: Vec<Entry>,
    #[serde(rename = "dogProfile")]
    pub profile: Profile,
    /// Opaque image payload (usually a data URL).
    pub dog_photo: Option<String>,
    pub saved_notes: Vec<String>,
    pub food_history: Vec<String>,
    pub is_first_time: bool,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            profile: Profile::default(),
            dog_photo: None,
            saved_notes: Vec::new(),
            food_history: Vec::new(),
            is_first_time: true,
        }
    }
}

/// One recovered problem found while restoring a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadIssue {
    /// The storage adapter failed; the session starts from defaults.
    StorageUnavailable(String),
    /// Payload is not a JSON object at all.
    MalformedPayload(String),
    /// A top-level field had the wrong shape and was reset.
    InvalidField { field: &'static str, message: String },
    /// One element of the entry list could not be decoded and was skipped.
    InvalidEntry { index: usize, message: String },
    /// A decoded entry broke a store invariant and was skipped.
    RejectedEntry { id: i64, reason: String },
}

impl Display for LoadIssue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StorageUnavailable(message) => write!(f, "snapshot storage unavailable: {message}"),
            Self::MalformedPayload(message) => write!(f, "malformed snapshot: {message}"),
            Self::InvalidField { field, message } => {
                write!(f, "invalid snapshot field `{field}`: {message}")
            }
            Self::InvalidEntry { index, message } => {
                write!(f, "invalid entry at index {index}: {message}")
            }
            Self::RejectedEntry { id, reason } => write!(f, "rejected entry {id}: {reason}"),
        }
    }
}

/// Decoded snapshot plus everything that had to be repaired.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SnapshotLoad {
    pub snapshot: Snapshot,
    pub issues: Vec<LoadIssue>,
}

impl Snapshot {
    /// Encodes the snapshot for storage, marking the user as returning.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let mut persisted = self.clone();
        persisted.is_first_time = false;
        serde_json::to_string(&persisted)
    }

    /// Decodes a stored payload, substituting defaults per field.
    ///
    /// `None` (nothing stored yet) yields a fresh first-time snapshot.
    pub fn from_json_lenient(payload: Option<&str>) -> SnapshotLoad {
        let Some(payload) = payload else {
            return SnapshotLoad::default();
        };

        let root = match serde_json::from_str::<Value>(payload) {
            Ok(Value::Object(root)) => root,
            Ok(other) => {
                return SnapshotLoad {
                    snapshot: Snapshot::default(),
                    issues: vec![LoadIssue::MalformedPayload(format!(
                        "expected object, got {}",
                        json_kind(&other)
                    ))],
                };
            }
            Err(err) => {
                return SnapshotLoad {
                    snapshot: Snapshot::default(),
                    issues: vec![LoadIssue::MalformedPayload(err.to_string())],
                };
            }
        };

        let mut issues = Vec::new();
        let entries = decode_entries(&root, &mut issues);
        let profile = decode_field::<Profile>(&root, "dogProfile", &mut issues).unwrap_or_default();
        let dog_photo = decode_field::<Option<String>>(&root, "dogPhoto", &mut issues)
            .flatten()
            .filter(|photo| !photo.is_empty());
        let saved_notes =
            decode_field::<Vec<String>>(&root, "savedNotes", &mut issues).unwrap_or_default();
        let food_history =
            decode_field::<Vec<String>>(&root, "foodHistory", &mut issues).unwrap_or_default();
        // Anything other than an explicit `false` keeps the first-run flow.
        let is_first_time = !matches!(root.get("isFirstTime"), Some(Value::Bool(false)));

        SnapshotLoad {
            snapshot: Snapshot {
                entries,
                profile,
                dog_photo,
                saved_notes,
                food_history,
                is_first_time,
            },
            issues,
        }
    }
}

fn decode_field<T: DeserializeOwned>(
    root: &Map<String, Value>,
    field: &'static str,
    issues: &mut Vec<LoadIssue>,
) -> Option<T> {
    match root.get(field) {
        None | Some(Value::Null) => None,
        Some(value) => match serde_json::from_value::<T>(value.clone()) {
            Ok(decoded) => Some(decoded),
            Err(err) => {
                issues.push(LoadIssue::InvalidField {
                    field,
                    message: err.to_string(),
                });
                None
            }
        },
    }
}

fn decode_entries(root: &Map<String, Value>, issues: &mut Vec<LoadIssue>) -> Vec<Entry> {
    let items = match root.get("poops").or_else(|| root.get("entries")) {
        None | Some(Value::Null) => return Vec::new(),
        Some(Value::Array(items)) => items,
        Some(other) => {
            issues.push(LoadIssue::InvalidField {
                field: "poops",
                message: format!("expected array, got {}", json_kind(other)),
            });
            return Vec::new();
        }
    };

    let mut entries = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match serde_json::from_value::<Entry>(item.clone()) {
            Ok(entry) => entries.push(entry),
            Err(err) => issues.push(LoadIssue::InvalidEntry {
                index,
                message: err.to_string(),
            }),
        }
    }
    entries
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
