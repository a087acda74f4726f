//! A visitor's session: catalog, selection state and AI access
//!
//! Intents from the presentation layer are applied one at a time. Intents
//! that need the AI collaborator return an [`Effect`] describing the call to
//! launch; the caller runs it asynchronously and reports the result back via
//! [`Session::on_detail`] or [`Session::on_suggestion`].

use crate::ai::{AiService, DetailOutcome, SuggestionOutcome};
use crate::catalog::Catalog;
use crate::map::{self, MapPin, Viewport};
use crate::models::{Coordinates, Location};
use crate::selection::{FetchTicket, SelectionState};
use rand::RngExt;
use tracing::{debug, info};

const SESSION_ID_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const SESSION_ID_LEN: usize = 9;

/// Something the visitor asked for
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// Theme picker choice, `all_themes` to reset
    SelectTheme(String),
    /// Tour picker choice, `all_tours` to reset
    SelectTour(String),
    /// List item or map pin, by location id
    Pick(String),
    Dismiss,
    /// Ask the AI for more about the open location
    TellMeMore,
    /// Ask the AI for a new tour idea
    SuggestTour,
}

/// Work the caller must start after an intent was applied
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    FetchDetails {
        ticket: FetchTicket,
        location_name: String,
        known_facts: Vec<String>,
    },
    SuggestTour {
        ticket: SuggestionTicket,
        themes: Vec<String>,
        tour_names: Vec<String>,
    },
    /// The intent could not be acted on; the message is for the user
    Rejected(String),
}

/// Identifies a tour idea request; only the newest one is stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuggestionTicket(u64);

/// Tour idea request state, independent of the selection
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SuggestionSlot {
    #[default]
    Empty,
    Pending,
    Ready(SuggestionOutcome),
}

pub struct Session {
    id: String,
    catalog: Catalog,
    selection: SelectionState,
    ai: AiService,
    suggestion: SuggestionSlot,
    suggestion_generation: u64,
}

/// Random `anonymousUser-xxxxxxxxx` identifier
#[must_use]
pub fn generate_session_id() -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..SESSION_ID_LEN)
        .map(|_| SESSION_ID_CHARS[rng.random_range(0..SESSION_ID_CHARS.len())] as char)
        .collect();
    format!("anonymousUser-{suffix}")
}

impl Session {
    #[must_use]
    pub fn new(catalog: Catalog, ai: AiService) -> Self {
        let id = generate_session_id();
        info!(
            "Session {} started with {} locations and {} tours",
            id,
            catalog.locations().len(),
            catalog.tours().len()
        );
        Self {
            id,
            catalog,
            selection: SelectionState::new(),
            ai,
            suggestion: SuggestionSlot::Empty,
            suggestion_generation: 0,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    #[must_use]
    pub fn ai(&self) -> &AiService {
        &self.ai
    }

    #[must_use]
    pub fn suggestion(&self) -> &SuggestionSlot {
        &self.suggestion
    }

    #[must_use]
    pub fn visible(&self) -> Vec<&Location> {
        self.selection.visible(&self.catalog)
    }

    #[must_use]
    pub fn selected_location(&self) -> Option<&Location> {
        self.selection.selected_location(&self.catalog)
    }

    #[must_use]
    pub fn pins(&self) -> Vec<MapPin> {
        map::pins(&self.visible())
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        map::viewport(&self.pins())
    }

    /// Closest visible location to `position`
    #[must_use]
    pub fn nearest(&self, position: &Coordinates) -> Option<(&Location, f64)> {
        map::nearest(&self.visible(), position)
    }

    /// Apply one intent
    pub fn handle(&mut self, intent: Intent) -> Effect {
        debug!("Handling intent {:?}", intent);
        match intent {
            Intent::SelectTheme(choice) => {
                self.selection.select_theme(&choice);
                Effect::None
            }
            Intent::SelectTour(choice) => {
                self.selection.select_tour(&choice);
                Effect::None
            }
            Intent::Pick(id) => match map::resolve_pin_click(&self.catalog, &id) {
                Some(location) => {
                    self.selection.pick_location(location);
                    Effect::None
                }
                None => Effect::Rejected(format!("Unknown location '{id}'")),
            },
            Intent::Dismiss => {
                self.selection.dismiss();
                Effect::None
            }
            Intent::TellMeMore => self.request_details(),
            Intent::SuggestTour => self.request_suggestion(),
        }
    }

    fn request_details(&mut self) -> Effect {
        if let Some(reason) = self.ai.unavailable_reason() {
            return Effect::Rejected(reason.to_string());
        }
        let Some(location) = self.selection.selected_location(&self.catalog) else {
            return Effect::Rejected("Open a location first".to_string());
        };
        let location_name = location.name.clone();
        let known_facts = location.facts.clone();

        match self.selection.begin_detail_fetch() {
            Some(ticket) => Effect::FetchDetails {
                ticket,
                location_name,
                known_facts,
            },
            None => Effect::Rejected("Open a location first".to_string()),
        }
    }

    fn request_suggestion(&mut self) -> Effect {
        if let Some(reason) = self.ai.unavailable_reason() {
            return Effect::Rejected(reason.to_string());
        }
        self.suggestion_generation += 1;
        self.suggestion = SuggestionSlot::Pending;
        Effect::SuggestTour {
            ticket: SuggestionTicket(self.suggestion_generation),
            themes: self.catalog.themes(),
            tour_names: self.catalog.tour_names(),
        }
    }

    /// Deliver a detail result; stale results are dropped
    pub fn on_detail(&mut self, ticket: &FetchTicket, outcome: DetailOutcome) -> bool {
        self.selection.apply_detail(ticket, outcome)
    }

    /// Deliver a tour idea; answers to replaced requests are dropped
    pub fn on_suggestion(&mut self, ticket: SuggestionTicket, outcome: SuggestionOutcome) -> bool {
        let current = ticket == SuggestionTicket(self.suggestion_generation);
        if current {
            self.suggestion = SuggestionSlot::Ready(outcome);
        } else {
            debug!("Discarding stale tour suggestion");
        }
        current
    }
}
