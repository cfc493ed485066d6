//! Core dashboard record types.
//!
//! This module defines the JSON shape shared by the bundled base document,
//! the locally persisted override, and the export file.

use std::collections::{BTreeMap, HashSet};
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Today's three meal lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MealPlan {
    /// Breakfast menu text.
    pub breakfast: String,
    /// Lunch menu text.
    pub lunch: String,
    /// Dinner menu text.
    pub dinner: String,
}

/// A scheduled activity.
///
/// `date` and `time` are kept as the zero-padded strings found in the JSON
/// document so that string order is chronological order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Stable id, unique within a record.
    pub id: String,
    /// Local date as `YYYY-MM-DD`.
    pub date: String,
    /// Local 24-hour time as `HH:MM`.
    pub time: String,
    /// What is happening.
    pub title: String,
    /// Where it happens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Extra detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A slideshow photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    /// Image location.
    pub url: String,
    /// Accessible description.
    pub alt: String,
}

/// The full dashboard record.
///
/// Missing `meals`, `events` or `photos` keys deserialize as empty, so the
/// three sub-collections are always present. Top-level keys this crate does
/// not know about are carried in `extra` and written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardRecord {
    /// Today's meals.
    #[serde(default)]
    pub meals: MealPlan,
    /// All known events, in no particular order.
    #[serde(default)]
    pub events: Vec<Event>,
    /// Slideshow photos, in display order.
    #[serde(default)]
    pub photos: Vec<Photo>,
    /// When the record was last saved by an admin.
    ///
    /// A value that is not an RFC 3339 timestamp reads as `None`.
    #[serde(
        rename = "updatedAt",
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
    /// Unrecognised top-level keys.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Meal lines present in an override. Absent fields fall back to the base.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialMealPlan {
    /// Breakfast override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakfast: Option<String>,
    /// Lunch override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lunch: Option<String>,
    /// Dinner override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dinner: Option<String>,
}

/// A partial record persisted by the admin editor.
///
/// Every field is optional. A JSON `null` reads the same as a missing key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordOverride {
    /// Meal overrides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meals: Option<PartialMealPlan>,
    /// Replacement event list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<Event>>,
    /// Replacement photo list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photos: Option<Vec<Photo>>,
    /// Save timestamp.
    #[serde(
        rename = "updatedAt",
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
    /// Other top-level keys.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl From<DashboardRecord> for RecordOverride {
    fn from(record: DashboardRecord) -> Self {
        Self {
            meals: Some(PartialMealPlan {
                breakfast: Some(record.meals.breakfast),
                lunch: Some(record.meals.lunch),
                dinner: Some(record.meals.dinner),
            }),
            events: Some(record.events),
            photos: Some(record.photos),
            updated_at: record.updated_at,
            extra: record.extra,
        }
    }
}

/// Read `updatedAt` without failing the whole record on an odd value.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(Value::as_str)
        .and_then(|text| DateTime::parse_from_rfc3339(text).ok())
        .map(|stamp| stamp.with_timezone(&Utc)))
}

fn date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\d{4}-(0[1-9]|1[0-2])-(0[1-9]|[12]\d|3[01])$").expect("valid date regex")
    })
}

fn time_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").expect("valid time regex"))
}

/// Check that `date` is a zero-padded `YYYY-MM-DD` string.
#[must_use]
pub fn is_date_key(date: &str) -> bool {
    date_pattern().is_match(date)
}

/// Check that `time` is a zero-padded 24-hour `HH:MM` string.
#[must_use]
pub fn is_time_key(time: &str) -> bool {
    time_pattern().is_match(time)
}

impl Event {
    /// The `(date, time)` key events are ordered by.
    #[must_use]
    pub fn sort_key(&self) -> (&str, &str) {
        (&self.date, &self.time)
    }
}

impl DashboardRecord {
    /// Parse a record from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a JSON object of the record shape.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Serialize with two-space indentation, the export format.
    ///
    /// # Errors
    ///
    /// Returns an error if an `extra` value cannot be serialized.
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Find an event by id.
    #[must_use]
    pub fn event(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    /// All events ordered by `(date, time)`.
    #[must_use]
    pub fn sorted_events(&self) -> Vec<&Event> {
        let mut events: Vec<&Event> = self.events.iter().collect();
        events.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        events
    }

    /// Collect every problem that would break ordering or id lookups.
    ///
    /// An empty result means the record is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        let mut seen = HashSet::new();

        for event in &self.events {
            if !seen.insert(event.id.as_str()) {
                issues.push(format!("duplicate event id '{}'", event.id));
            }
            if !is_date_key(&event.date) {
                issues.push(format!(
                    "event '{}' has date '{}', expected YYYY-MM-DD",
                    event.id, event.date
                ));
            }
            if !is_time_key(&event.time) {
                issues.push(format!(
                    "event '{}' has time '{}', expected HH:MM",
                    event.id, event.time
                ));
            }
        }

        issues
    }
}
