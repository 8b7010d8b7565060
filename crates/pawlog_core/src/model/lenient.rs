//! Tolerant field decoders for persisted snapshot data.
//!
//! Snapshots written by older front ends store optional selects as `""`,
//! numbers as strings, and dates as `YYYY-MM-DD` text. These helpers map
//! anything unusable to `None` (or an empty string) instead of failing the
//! whole record.

use crate::model::entry::normalize_label;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Closed set of lowercase wire keys.
pub(crate) trait WireKey: Sized + Copy + 'static {
    const ALL: &'static [Self];

    fn key(self) -> &'static str;

    fn from_key(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL.iter().copied().find(|item| item.key() == value)
    }
}

pub(crate) fn optional_key<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: WireKey,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::String(value)) => T::from_key(&value),
        _ => None,
    })
}

pub(crate) fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::String(value)) => non_blank(&value),
        _ => None,
    })
}

/// Like `optional_text`, but also collapses inner whitespace runs so stored
/// labels compare equal to freshly recorded ones.
pub(crate) fn optional_label<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::String(value)) => normalize_label(&value),
        _ => None,
    })
}

pub(crate) fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_text(deserializer)?.unwrap_or_default())
}

pub(crate) fn optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    let number = match raw {
        Some(Value::Number(value)) => value.as_f64(),
        Some(Value::String(value)) => value.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(number.filter(|value| value.is_finite()))
}

pub(crate) fn optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::String(value)) => parse_date(&value),
        _ => None,
    })
}

/// Parses `YYYY-MM-DD`, also accepting a full RFC 3339 timestamp.
pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok().or_else(|| {
        chrono::DateTime::parse_from_rfc3339(value)
            .ok()
            .map(|ts| ts.date_naive())
    })
}

pub(crate) fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::parse_date;
    use chrono::NaiveDate;

    #[test]
    fn parse_date_accepts_plain_and_rfc3339_forms() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 9);
        assert_eq!(parse_date("2025-03-09"), expected);
        assert_eq!(parse_date(" 2025-03-09T08:30:00Z "), expected);
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("09/03/2025"), None);
    }
}
