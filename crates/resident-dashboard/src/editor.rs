//! Admin editing operations.
//!
//! Each operation edits a merged [`DashboardRecord`] in memory. The caller
//! saves the whole record as the override afterwards. An edit that would
//! introduce a new validation problem is rejected and leaves the record
//! untouched.

use std::collections::HashSet;

use chrono::Local;
use tracing::debug;

use crate::error::{Error, Result};
use crate::record::{DashboardRecord, Event, Photo};
use crate::selector::today_key;

/// Default time for a new event.
pub const DEFAULT_EVENT_TIME: &str = "10:00";

/// Default title for a new event.
pub const DEFAULT_EVENT_TITLE: &str = "New Activity";

/// Default location for a new event.
pub const DEFAULT_EVENT_LOCATION: &str = "Community Room";

/// Clock inputs an edit needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditContext {
    /// Local date key used as the default event date.
    pub today: String,
    /// Unix milliseconds used to mint event ids.
    pub millis: i64,
}

impl EditContext {
    /// Context for the current moment.
    #[must_use]
    pub fn now() -> Self {
        let now = Local::now();
        Self {
            today: today_key(now.naive_local()),
            millis: now.timestamp_millis(),
        }
    }
}

/// Fields for a new event. Missing fields get the editor defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDraft {
    /// `YYYY-MM-DD`, default today.
    pub date: Option<String>,
    /// `HH:MM`, default `10:00`.
    pub time: Option<String>,
    /// Default `New Activity`.
    pub title: Option<String>,
    /// Default `Community Room`.
    pub location: Option<String>,
    /// Default empty.
    pub description: Option<String>,
}

/// Changes to an existing event. `None` leaves a field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventPatch {
    /// New date.
    pub date: Option<String>,
    /// New time.
    pub time: Option<String>,
    /// New title.
    pub title: Option<String>,
    /// New location.
    pub location: Option<String>,
    /// New description.
    pub description: Option<String>,
}

/// Changes to an existing photo.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhotoPatch {
    /// New URL.
    pub url: Option<String>,
    /// New alt text.
    pub alt: Option<String>,
}

/// Replace the given meal lines.
pub fn set_meals(
    record: &mut DashboardRecord,
    breakfast: Option<String>,
    lunch: Option<String>,
    dinner: Option<String>,
) {
    if let Some(text) = breakfast {
        record.meals.breakfast = text;
    }
    if let Some(text) = lunch {
        record.meals.lunch = text;
    }
    if let Some(text) = dinner {
        record.meals.dinner = text;
    }
}

fn new_event_id(record: &DashboardRecord, millis: i64) -> String {
    let base = format!("evt-{millis}");
    if record.event(&base).is_none() {
        return base;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{base}-{n}");
        if record.event(&candidate).is_none() {
            return candidate;
        }
        n += 1;
    }
}

/// Add an event and return its id.
///
/// # Errors
///
/// Returns [`Error::InvalidRecord`] if the draft has a malformed date or time.
pub fn add_event(record: &mut DashboardRecord, draft: EventDraft, ctx: &EditContext) -> Result<String> {
    let id = new_event_id(record, ctx.millis);
    let event = Event {
        id: id.clone(),
        date: draft.date.unwrap_or_else(|| ctx.today.clone()),
        time: draft.time.unwrap_or_else(|| DEFAULT_EVENT_TIME.to_string()),
        title: draft.title.unwrap_or_else(|| DEFAULT_EVENT_TITLE.to_string()),
        location: Some(
            draft
                .location
                .unwrap_or_else(|| DEFAULT_EVENT_LOCATION.to_string()),
        ),
        description: Some(draft.description.unwrap_or_default()),
    };

    let mut edited = record.clone();
    edited.events.push(event);
    commit(record, edited)?;

    debug!("Added event {}", id);
    Ok(id)
}

/// Apply `patch` to the event with `id`.
///
/// # Errors
///
/// Returns [`Error::EventNotFound`] for an unknown id, or
/// [`Error::InvalidRecord`] if the patch introduces a malformed date or time.
pub fn update_event(record: &mut DashboardRecord, id: &str, patch: EventPatch) -> Result<()> {
    let mut edited = record.clone();
    let event = edited
        .events
        .iter_mut()
        .find(|e| e.id == id)
        .ok_or_else(|| Error::EventNotFound { id: id.to_string() })?;

    if let Some(date) = patch.date {
        event.date = date;
    }
    if let Some(time) = patch.time {
        event.time = time;
    }
    if let Some(title) = patch.title {
        event.title = title;
    }
    if let Some(location) = patch.location {
        event.location = Some(location);
    }
    if let Some(description) = patch.description {
        event.description = Some(description);
    }

    commit(record, edited)
}

/// Remove the event with `id` and return it.
///
/// # Errors
///
/// Returns [`Error::EventNotFound`] for an unknown id.
pub fn remove_event(record: &mut DashboardRecord, id: &str) -> Result<Event> {
    let position = record
        .events
        .iter()
        .position(|e| e.id == id)
        .ok_or_else(|| Error::EventNotFound { id: id.to_string() })?;
    Ok(record.events.remove(position))
}

/// Append a photo.
pub fn add_photo(record: &mut DashboardRecord, url: String, alt: String) {
    record.photos.push(Photo { url, alt });
}

/// Apply `patch` to the photo at `index`.
///
/// # Errors
///
/// Returns [`Error::PhotoOutOfRange`] if there is no such photo.
pub fn update_photo(record: &mut DashboardRecord, index: usize, patch: PhotoPatch) -> Result<()> {
    let len = record.photos.len();
    let photo = record
        .photos
        .get_mut(index)
        .ok_or(Error::PhotoOutOfRange { index, len })?;

    if let Some(url) = patch.url {
        photo.url = url;
    }
    if let Some(alt) = patch.alt {
        photo.alt = alt;
    }
    Ok(())
}

/// Remove the photo at `index` and return it.
///
/// # Errors
///
/// Returns [`Error::PhotoOutOfRange`] if there is no such photo.
pub fn remove_photo(record: &mut DashboardRecord, index: usize) -> Result<Photo> {
    let len = record.photos.len();
    if index >= len {
        return Err(Error::PhotoOutOfRange { index, len });
    }
    Ok(record.photos.remove(index))
}

/// Replace `record` with `edited` unless the edit adds validation problems.
///
/// Problems already present in `record` (for example in a hand-written base
/// document) do not block unrelated edits.
fn commit(record: &mut DashboardRecord, edited: DashboardRecord) -> Result<()> {
    let existing: HashSet<String> = record.validate().into_iter().collect();
    let issues: Vec<String> = edited
        .validate()
        .into_iter()
        .filter(|issue| !existing.contains(issue))
        .collect();

    if !issues.is_empty() {
        return Err(Error::InvalidRecord { issues });
    }

    *record = edited;
    Ok(())
}
