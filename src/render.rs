//! Plain-text rendering for the terminal front-end

use crate::ai::{DetailOutcome, SuggestionOutcome};
use crate::filter::{ALL_THEMES_VALUE, ALL_TOURS_VALUE};
use crate::map::Viewport;
use crate::models::Location;
use crate::selection::DetailSlot;
use crate::session::{Session, SuggestionSlot};
use std::fmt::Write;

pub fn location_list(session: &Session) -> String {
    let visible = session.visible();
    let mut out = format!(
        "Locations ({}, {}):\n",
        visible.len(),
        session.selection().active_filter()
    );
    if visible.is_empty() {
        out.push_str("  (no locations match)\n");
    }
    for location in visible {
        let _ = writeln!(out, "  [{}] {} ({})", location.id, location.name, location.theme);
    }
    out
}

pub fn map_summary(session: &Session) -> String {
    format!(
        "Map: {} pins, {}\n",
        session.pins().len(),
        viewport(&session.viewport())
    )
}

pub fn viewport(viewport: &Viewport) -> String {
    match viewport {
        Viewport::Center { center, zoom } => {
            format!("centered on {} at zoom {zoom}", center.format_coordinates())
        }
        Viewport::Fit {
            south_west,
            north_east,
            max_zoom,
            ..
        } => format!(
            "fitted to {} .. {} (max zoom {max_zoom})",
            south_west.format_coordinates(),
            north_east.format_coordinates()
        ),
    }
}

pub fn pickers(session: &Session) -> String {
    let mut out = String::from("Themes:\n");
    let _ = writeln!(out, "  {ALL_THEMES_VALUE}");
    for theme in session.catalog().themes() {
        let _ = writeln!(out, "  {theme}");
    }
    out.push_str("Tours:\n");
    let _ = writeln!(out, "  {ALL_TOURS_VALUE}");
    for tour in session.catalog().tours() {
        let _ = writeln!(out, "  [{}] {}", tour.id, tour.name);
        if let Some(description) = &tour.description {
            let _ = writeln!(out, "      {description}");
        }
    }
    out
}

/// The detail overlay, or `None` when it is closed
pub fn detail(session: &Session) -> Option<String> {
    let location = session.selected_location()?;
    let mut out = format!(
        "== {} ({}) ==\n{}\n",
        location.name, location.theme, location.description
    );
    for fact in &location.facts {
        let _ = writeln!(out, "  * {fact}");
    }
    let _ = writeln!(out, "  Image: {}", location.image);
    if let Some(audio) = &location.audio {
        let _ = writeln!(out, "  Audio narration: {audio}");
    }
    if let Some(ar_asset) = &location.ar_asset {
        let _ = writeln!(out, "  AR model: {ar_asset}");
    }

    match session.selection().detail() {
        DetailSlot::Empty => {
            if let Some(reason) = session.ai().unavailable_reason() {
                let _ = writeln!(out, "  {reason}");
            }
        }
        DetailSlot::Pending => out.push_str("  Asking the AI...\n"),
        DetailSlot::Ready(outcome) => out.push_str(&detail_outcome(outcome)),
    }
    Some(out)
}

/// Simulated AR activation for a location
pub fn ar_message(location: &Location) -> String {
    format!(
        "AR for {} would activate now! Asset: {}. Audio: {}.",
        location.name,
        location.ar_asset.as_deref().unwrap_or("Generic model"),
        location.audio.as_deref().unwrap_or("None")
    )
}

pub fn detail_outcome(outcome: &DetailOutcome) -> String {
    match outcome {
        DetailOutcome::Text(text) => format!("\n{text}\n"),
        DetailOutcome::TextWithCitations { text, citations } => {
            let mut out = format!("\n{text}\nSources:\n");
            for citation in citations {
                let _ = writeln!(out, "  - {} <{}>", citation.label(), citation.uri);
            }
            out
        }
        DetailOutcome::Failed(message) => format!("\n{message}\n"),
    }
}

pub fn suggestion(session: &Session) -> Option<String> {
    match session.suggestion() {
        SuggestionSlot::Empty => None,
        SuggestionSlot::Pending => Some("Thinking of a new tour...\n".to_string()),
        SuggestionSlot::Ready(SuggestionOutcome::Idea(idea)) => {
            let mut out = String::from("AI tour idea:\n");
            if let Some(name) = &idea.name {
                let _ = writeln!(out, "  {name}");
            }
            let _ = writeln!(out, "  {}", idea.description);
            Some(out)
        }
        SuggestionSlot::Ready(SuggestionOutcome::Failed(message)) => Some(format!("{message}\n")),
    }
}
