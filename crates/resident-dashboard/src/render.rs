//! Plain-text rendering of a [`DashboardView`] for terminal surfaces.

use std::fmt::Write as _;

use crate::selector::DashboardView;
use crate::surface::Surface;

/// ANSI sequence that clears the screen and homes the cursor.
pub const CLEAR_SCREEN: &str = "\x1B[2J\x1B[H";

/// Render a view for the given surface.
#[must_use]
pub fn render_text(view: &DashboardView<'_>, surface: Surface) -> String {
    match surface {
        Surface::Frame => render_frame(view),
        Surface::Hero | Surface::Slideshow => render_board(view),
    }
}

fn render_frame(view: &DashboardView<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", view.clock.time);
    let _ = writeln!(out, "{}", view.clock.date);
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", view.info_line);
    let _ = writeln!(out);
    out.push_str(&photo_line(view));
    out
}

fn render_board(view: &DashboardView<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}  {}", view.clock.time, view.clock.date);
    let _ = writeln!(out);

    let _ = writeln!(out, "Today's Meals");
    let _ = writeln!(out, "  Breakfast: {}", view.meals.breakfast);
    let _ = writeln!(out, "  Lunch:     {}", view.meals.lunch);
    let _ = writeln!(out, "  Dinner:    {}", view.meals.dinner);
    let _ = writeln!(out, "  Coming up: {} - {}", view.meal_hint.meal, view.meal_hint.text);
    let _ = writeln!(out);

    if view.day.is_fallback {
        let _ = writeln!(out, "Upcoming Events ({})", view.day.date);
    } else {
        let _ = writeln!(out, "Today's Events & Activities");
    }

    if view.day.events.is_empty() {
        let _ = writeln!(out, "  No events scheduled for today.");
    }
    for event in &view.day.events {
        let marker = if view.next_up == Some(event.id.as_str()) {
            "  <- Next up"
        } else {
            ""
        };
        let _ = writeln!(out, "  {}  {}{}", event.time, event.title, marker);

        let detail = match (&event.location, &event.description) {
            (Some(loc), Some(desc)) if !loc.is_empty() && !desc.is_empty() => {
                format!("{loc} \u{2022} {desc}")
            }
            (Some(loc), _) if !loc.is_empty() => loc.clone(),
            (_, Some(desc)) if !desc.is_empty() => desc.clone(),
            _ => String::new(),
        };
        if !detail.is_empty() {
            let _ = writeln!(out, "         {detail}");
        }
    }
    let _ = writeln!(out);

    out.push_str(&photo_line(view));
    out
}

fn photo_line(view: &DashboardView<'_>) -> String {
    match view.photo {
        Some(photo) if view.photo_count > 1 => format!(
            "Photo {} / {}: {} ({})\n",
            view.photo_index + 1,
            view.photo_count,
            photo.alt,
            photo.url
        ),
        Some(photo) => format!("Photo: {} ({})\n", photo.alt, photo.url),
        None => "No photos yet\n".to_string(),
    }
}
