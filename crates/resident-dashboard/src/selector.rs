//! What the dashboard shows right now.
//!
//! Every function here is a pure derivation from a merged
//! [`DashboardRecord`] and the local wall-clock time. Surfaces call them on
//! every clock tick.

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::record::{DashboardRecord, Event, MealPlan, Photo};

/// Local calendar date of `now` as zero-padded `YYYY-MM-DD`.
///
/// This is the format event dates are stored in, so plain string equality
/// selects a day's events.
#[must_use]
pub fn today_key(now: NaiveDateTime) -> String {
    now.format("%Y-%m-%d").to_string()
}

/// Events whose date is exactly `date_key`, in record order.
#[must_use]
pub fn events_on<'a>(record: &'a DashboardRecord, date_key: &str) -> Vec<&'a Event> {
    record.events.iter().filter(|e| e.date == date_key).collect()
}

/// The event to highlight as "next up".
///
/// Events are ordered by their `HH:MM` time. The first one at or after the
/// current minute is returned; when the whole day is behind us the earliest
/// event is returned instead.
#[must_use]
pub fn next_upcoming<'a>(events: &[&'a Event], now: NaiveDateTime) -> Option<&'a Event> {
    let mut sorted = events.to_vec();
    sorted.sort_by(|a, b| a.time.cmp(&b.time));

    let now_hhmm = now.format("%H:%M").to_string();
    sorted
        .iter()
        .find(|e| e.time.as_str() >= now_hhmm.as_str())
        .or_else(|| sorted.first())
        .copied()
}

/// The calendar day whose events are on screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayDay<'a> {
    /// Date key of the day shown.
    pub date: String,
    /// That day's events ordered by time.
    pub events: Vec<&'a Event>,
    /// `true` when today had nothing and a later day is shown instead.
    pub is_fallback: bool,
}

/// Choose the day to display.
///
/// Today is shown when it has events. Otherwise the earliest date on or after
/// today that has any events is shown, flagged as a fallback. With nothing
/// upcoming, today is shown empty.
#[must_use]
pub fn fallback_day<'a>(record: &'a DashboardRecord, today: &str) -> DisplayDay<'a> {
    let mut todays = events_on(record, today);
    if !todays.is_empty() {
        todays.sort_by(|a, b| a.time.cmp(&b.time));
        return DisplayDay {
            date: today.to_string(),
            events: todays,
            is_fallback: false,
        };
    }

    let upcoming = record
        .sorted_events()
        .into_iter()
        .find(|e| e.date.as_str() >= today);

    match upcoming {
        Some(first) => {
            let mut events = events_on(record, &first.date);
            events.sort_by(|a, b| a.time.cmp(&b.time));
            DisplayDay {
                date: first.date.clone(),
                events,
                is_fallback: true,
            }
        }
        None => DisplayDay {
            date: today.to_string(),
            events: Vec::new(),
            is_fallback: false,
        },
    }
}

/// Which meal line a hint refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Meal {
    /// Breakfast.
    Breakfast,
    /// Lunch.
    Lunch,
    /// Dinner.
    Dinner,
}

impl std::fmt::Display for Meal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Breakfast => write!(f, "Breakfast"),
            Self::Lunch => write!(f, "Lunch"),
            Self::Dinner => write!(f, "Dinner"),
        }
    }
}

/// Hour cutoffs for the forward-looking meal hint.
///
/// Before `dinner_from` the lunch line is shown, from `dinner_from` until
/// `breakfast_from` the dinner line, and from `breakfast_from` on the next
/// morning's breakfast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MealBands {
    /// First hour that hints at dinner.
    pub dinner_from: u32,
    /// First hour that hints at breakfast.
    pub breakfast_from: u32,
}

impl Default for MealBands {
    fn default() -> Self {
        Self {
            dinner_from: 11,
            breakfast_from: 16,
        }
    }
}

/// A meal line picked for the current time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MealHint<'a> {
    /// The meal referred to.
    pub meal: Meal,
    /// Its menu text.
    pub text: &'a str,
}

/// Pick the upcoming meal line for the current hour.
#[must_use]
pub fn meal_hint(meals: &MealPlan, now: NaiveDateTime, bands: MealBands) -> MealHint<'_> {
    let hour = now.hour();
    if hour < bands.dinner_from {
        MealHint {
            meal: Meal::Lunch,
            text: &meals.lunch,
        }
    } else if hour < bands.breakfast_from {
        MealHint {
            meal: Meal::Dinner,
            text: &meals.dinner,
        }
    } else {
        MealHint {
            meal: Meal::Breakfast,
            text: &meals.breakfast,
        }
    }
}

/// Slideshow position after `elapsed_ms` of rotation.
///
/// Rotation is disabled (index 0) with fewer than two photos or a zero
/// interval.
#[must_use]
pub fn rotation_index(count: usize, elapsed_ms: u64, interval_ms: u64) -> usize {
    if count <= 1 || interval_ms == 0 {
        return 0;
    }
    let count_u64 = u64::try_from(count).unwrap_or(u64::MAX);
    usize::try_from((elapsed_ms / interval_ms) % count_u64).unwrap_or(0)
}

/// Clock strings shown on every surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClockText {
    /// e.g. `3:05 PM`.
    pub time: String,
    /// e.g. `Sunday, October 18, 2026`.
    pub date: String,
}

impl ClockText {
    /// Format `now` for display.
    #[must_use]
    pub fn at(now: NaiveDateTime) -> Self {
        Self {
            time: now.format("%-I:%M %p").to_string(),
            date: now.format("%A, %B %-d, %Y").to_string(),
        }
    }
}

/// Everything a surface renders for one tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardView<'a> {
    /// Clock strings.
    pub clock: ClockText,
    /// Today's date key.
    pub today: String,
    /// Day whose events are listed.
    pub day: DisplayDay<'a>,
    /// Id of the highlighted event.
    pub next_up: Option<&'a str>,
    /// Upcoming meal line.
    pub meal_hint: MealHint<'a>,
    /// All three meal lines.
    pub meals: &'a MealPlan,
    /// Photo currently on screen.
    pub photo: Option<&'a Photo>,
    /// Zero-based index of `photo`.
    pub photo_index: usize,
    /// Number of photos in rotation.
    pub photo_count: usize,
    /// Single contextual line for the photo-frame surface.
    pub info_line: String,
}

impl<'a> DashboardView<'a> {
    /// Derive the view for `now`.
    ///
    /// `elapsed_ms` is the time since the surface started rotating photos.
    #[must_use]
    pub fn build(
        record: &'a DashboardRecord,
        now: NaiveDateTime,
        elapsed_ms: u64,
        interval_ms: u64,
        bands: MealBands,
    ) -> Self {
        let today = today_key(now);
        let day = fallback_day(record, &today);
        // On a later day the first event is next.
        let next = if day.is_fallback {
            day.events.first().copied()
        } else {
            next_upcoming(&day.events, now)
        };
        let hint = meal_hint(&record.meals, now, bands);

        let photo_count = record.photos.len();
        let photo_index = rotation_index(photo_count, elapsed_ms, interval_ms);

        let info_line = match next {
            Some(event) if day.is_fallback => {
                format!("Next: {} on {} at {}", event.title, day.date, event.time)
            }
            Some(event) => format!("Next: {} at {}", event.title, event.time),
            None => format!("{}: {}", hint.meal, hint.text),
        };

        Self {
            clock: ClockText::at(now),
            today,
            next_up: next.map(|e| e.id.as_str()),
            day,
            meal_hint: hint,
            meals: &record.meals,
            photo: record.photos.get(photo_index),
            photo_index,
            photo_count,
            info_line,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(date: &str, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn event(id: &str, date: &str, time: &str) -> Event {
        Event {
            id: id.to_string(),
            date: date.to_string(),
            time: time.to_string(),
            title: format!("Event {id}"),
            location: None,
            description: None,
        }
    }

    fn record_with(events: Vec<Event>) -> DashboardRecord {
        DashboardRecord {
            meals: MealPlan {
                breakfast: "Pancakes".to_string(),
                lunch: "Soup".to_string(),
                dinner: "Roast".to_string(),
            },
            events,
            ..DashboardRecord::default()
        }
    }

    #[test]
    fn test_today_key_zero_padded() {
        assert_eq!(today_key(at("2026-01-05", 8, 0)), "2026-01-05");
    }

    #[test]
    fn test_today_key_changes_at_midnight() {
        let late = NaiveDate::from_ymd_opt(2026, 10, 18)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap();
        let early = at("2026-10-18", 0, 0);
        let next = at("2026-10-19", 0, 0);

        assert_eq!(today_key(early), today_key(late));
        assert_ne!(today_key(late), today_key(next));
        assert_eq!(today_key(next), "2026-10-19");
    }

    #[test]
    fn test_events_on_filters_by_date() {
        let record = record_with(vec![
            event("a", "2026-10-18", "09:00"),
            event("b", "2026-10-19", "09:00"),
            event("c", "2026-10-18", "14:00"),
        ]);
        let ids: Vec<&str> = events_on(&record, "2026-10-18")
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_next_upcoming_picks_later_event() {
        let morning = event("m", "2026-10-18", "09:00");
        let afternoon = event("a", "2026-10-18", "14:00");
        let events = vec![&afternoon, &morning];

        let next = next_upcoming(&events, at("2026-10-18", 10, 0)).unwrap();
        assert_eq!(next.id, "a");
    }

    #[test]
    fn test_next_upcoming_wraps_to_earliest() {
        let morning = event("m", "2026-10-18", "09:00");
        let afternoon = event("a", "2026-10-18", "14:00");
        let events = vec![&morning, &afternoon];

        let next = next_upcoming(&events, at("2026-10-18", 20, 0)).unwrap();
        assert_eq!(next.id, "m");
    }

    #[test]
    fn test_next_upcoming_includes_current_minute() {
        let e = event("now", "2026-10-18", "10:00");
        let events = vec![&e];
        assert_eq!(
            next_upcoming(&events, at("2026-10-18", 10, 0)).unwrap().id,
            "now"
        );
    }

    #[test]
    fn test_next_upcoming_empty() {
        assert!(next_upcoming(&[], at("2026-10-18", 10, 0)).is_none());
    }

    #[test]
    fn test_fallback_day_uses_today_when_present() {
        let record = record_with(vec![
            event("t2", "2026-10-18", "15:00"),
            event("t1", "2026-10-18", "08:00"),
            event("f", "2026-10-20", "09:00"),
        ]);
        let day = fallback_day(&record, "2026-10-18");
        assert_eq!(day.date, "2026-10-18");
        assert!(!day.is_fallback);
        let ids: Vec<&str> = day.events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["t1", "t2"]);
    }

    #[test]
    fn test_fallback_day_selects_future_date() {
        let record = record_with(vec![
            event("past", "2026-10-10", "09:00"),
            event("later", "2026-10-25", "09:00"),
            event("f2", "2026-10-21", "16:00"),
            event("f1", "2026-10-21", "10:00"),
        ]);
        let day = fallback_day(&record, "2026-10-18");
        assert_eq!(day.date, "2026-10-21");
        assert!(day.is_fallback);
        let ids: Vec<&str> = day.events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["f1", "f2"]);
    }

    #[test]
    fn test_fallback_day_nothing_upcoming() {
        let record = record_with(vec![event("past", "2026-10-10", "09:00")]);
        let day = fallback_day(&record, "2026-10-18");
        assert_eq!(day.date, "2026-10-18");
        assert!(day.events.is_empty());
        assert!(!day.is_fallback);
    }

    #[test]
    fn test_meal_hint_bands() {
        let meals = record_with(Vec::new()).meals;
        let bands = MealBands::default();

        assert_eq!(meal_hint(&meals, at("2026-10-18", 7, 0), bands).meal, Meal::Lunch);
        assert_eq!(meal_hint(&meals, at("2026-10-18", 10, 59), bands).text, "Soup");
        assert_eq!(meal_hint(&meals, at("2026-10-18", 11, 0), bands).meal, Meal::Dinner);
        assert_eq!(meal_hint(&meals, at("2026-10-18", 15, 59), bands).text, "Roast");
        assert_eq!(
            meal_hint(&meals, at("2026-10-18", 16, 0), bands).meal,
            Meal::Breakfast
        );
        assert_eq!(meal_hint(&meals, at("2026-10-18", 23, 0), bands).text, "Pancakes");
    }

    #[test]
    fn test_meal_hint_custom_bands() {
        let meals = record_with(Vec::new()).meals;
        let bands = MealBands {
            dinner_from: 13,
            breakfast_from: 19,
        };
        assert_eq!(meal_hint(&meals, at("2026-10-18", 12, 0), bands).meal, Meal::Lunch);
        assert_eq!(meal_hint(&meals, at("2026-10-18", 18, 0), bands).meal, Meal::Dinner);
    }

    #[test]
    fn test_rotation_index() {
        assert_eq!(rotation_index(3, 0, 1000), 0);
        assert_eq!(rotation_index(3, 1500, 1000), 1);
        assert_eq!(rotation_index(3, 2999, 1000), 2);
        assert_eq!(rotation_index(3, 3500, 1000), 0);
        assert_eq!(rotation_index(1, 987_654, 1000), 0);
        assert_eq!(rotation_index(0, 5000, 1000), 0);
        assert_eq!(rotation_index(4, 5000, 0), 0);
    }

    #[test]
    fn test_clock_text() {
        let clock = ClockText::at(at("2026-10-18", 15, 5));
        assert_eq!(clock.time, "3:05 PM");
        assert_eq!(clock.date, "Sunday, October 18, 2026");
    }

    #[test]
    fn test_view_highlights_next_event() {
        let mut record = record_with(vec![
            event("m", "2026-10-18", "09:00"),
            event("a", "2026-10-18", "14:00"),
        ]);
        record.photos = vec![
            Photo {
                url: "/1.jpg".to_string(),
                alt: "One".to_string(),
            },
            Photo {
                url: "/2.jpg".to_string(),
                alt: "Two".to_string(),
            },
        ];

        let view = DashboardView::build(
            &record,
            at("2026-10-18", 10, 0),
            9_500,
            9_000,
            MealBands::default(),
        );
        assert_eq!(view.today, "2026-10-18");
        assert_eq!(view.next_up, Some("a"));
        assert_eq!(view.meal_hint.meal, Meal::Lunch);
        assert_eq!(view.photo_index, 1);
        assert_eq!(view.photo.unwrap().alt, "Two");
        assert_eq!(view.info_line, "Next: Event a at 14:00");
    }

    #[test]
    fn test_view_fallback_info_line() {
        let record = record_with(vec![event("f", "2026-10-21", "10:00")]);
        let view = DashboardView::build(
            &record,
            at("2026-10-18", 12, 0),
            0,
            9_000,
            MealBands::default(),
        );
        assert!(view.day.is_fallback);
        assert_eq!(view.info_line, "Next: Event f on 2026-10-21 at 10:00");
    }

    #[test]
    fn test_view_fallback_highlights_first_event_of_that_day() {
        let record = record_with(vec![
            event("late", "2026-10-21", "15:00"),
            event("early", "2026-10-21", "09:00"),
        ]);
        let view = DashboardView::build(
            &record,
            at("2026-10-18", 12, 0),
            0,
            9_000,
            MealBands::default(),
        );
        assert_eq!(view.next_up, Some("early"));
        assert_eq!(view.info_line, "Next: Event early on 2026-10-21 at 09:00");
    }

    #[test]
    fn test_view_without_events_shows_meal() {
        let record = record_with(Vec::new());
        let view = DashboardView::build(
            &record,
            at("2026-10-18", 17, 0),
            0,
            9_000,
            MealBands::default(),
        );
        assert!(view.next_up.is_none());
        assert!(view.photo.is_none());
        assert_eq!(view.info_line, "Breakfast: Pancakes");
    }
}
