//! Selection state: active filter, open location, and the AI detail slot
//!
//! The view is either `Idle` or `Viewing` one location. Detail requests are
//! tagged with a [`FetchTicket`] taken when they are launched; a result is
//! only stored if its ticket still matches the current view. Every
//! `pick_location`, `dismiss` and detail request advances the
//! generation, so late answers for an earlier view or a replaced request are
//! dropped on arrival.

use crate::ai::DetailOutcome;
use crate::catalog::Catalog;
use crate::filter::{ActiveFilter, compute_visible};
use crate::models::Location;
use tracing::debug;

/// Whether a location's detail overlay is open
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Idle,
    /// Holds the id of the open location
    Viewing(String),
}

/// Identifies the view a detail request was launched from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    location_id: String,
}

impl FetchTicket {
    #[must_use]
    pub fn location_id(&self) -> &str {
        &self.location_id
    }
}

/// AI detail result for the open location
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DetailSlot {
    #[default]
    Empty,
    Pending,
    Ready(DetailOutcome),
}

/// Per-session selection state
#[derive(Debug, Default)]
pub struct SelectionState {
    active_filter: ActiveFilter,
    view: ViewState,
    generation: u64,
    detail: DetailSlot,
}

impl SelectionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn active_filter(&self) -> &ActiveFilter {
        &self.active_filter
    }

    #[must_use]
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    #[must_use]
    pub fn detail(&self) -> &DetailSlot {
        &self.detail
    }

    #[must_use]
    pub fn modal_open(&self) -> bool {
        matches!(self.view, ViewState::Viewing(_))
    }

    #[must_use]
    pub fn selected_location_id(&self) -> Option<&str> {
        match &self.view {
            ViewState::Viewing(id) => Some(id),
            ViewState::Idle => None,
        }
    }

    /// Resolve the open location against the catalog
    #[must_use]
    pub fn selected_location<'a>(&self, catalog: &'a Catalog) -> Option<&'a Location> {
        self.selected_location_id()
            .and_then(|id| catalog.location(id))
    }

    /// Restrict by theme; the reset value `all_themes` removes the restriction.
    /// Any tour restriction is cleared. The view is untouched.
    pub fn select_theme(&mut self, choice: &str) {
        self.active_filter = ActiveFilter::from_theme_choice(choice);
        debug!("Active filter is now {}", self.active_filter);
    }

    /// Restrict by tour; the reset value `all_tours` removes the restriction.
    /// Any theme restriction is cleared. The view is untouched.
    pub fn select_tour(&mut self, choice: &str) {
        self.active_filter = ActiveFilter::from_tour_choice(choice);
        debug!("Active filter is now {}", self.active_filter);
    }

    /// Open a location's detail, replacing whatever was open
    pub fn pick_location(&mut self, location: &Location) {
        self.begin_view(ViewState::Viewing(location.id.clone()));
        debug!("Viewing {}", location.id);
    }

    /// Close the detail overlay
    pub fn dismiss(&mut self) {
        self.begin_view(ViewState::Idle);
        debug!("Detail dismissed");
    }

    fn begin_view(&mut self, view: ViewState) {
        self.view = view;
        self.generation += 1;
        self.detail = DetailSlot::Empty;
    }

    /// Mark a detail request as pending for the open location.
    ///
    /// Tickets from earlier requests for the same view stop matching.
    /// Returns `None` when nothing is open.
    pub fn begin_detail_fetch(&mut self) -> Option<FetchTicket> {
        let location_id = self.selected_location_id()?.to_string();
        self.generation += 1;
        self.detail = DetailSlot::Pending;
        Some(FetchTicket {
            generation: self.generation,
            location_id,
        })
    }

    /// Store a detail result if its ticket still matches the current view.
    ///
    /// Returns whether the result was applied.
    pub fn apply_detail(&mut self, ticket: &FetchTicket, outcome: DetailOutcome) -> bool {
        let current = ticket.generation == self.generation
            && self.selected_location_id() == Some(ticket.location_id.as_str());
        if current {
            self.detail = DetailSlot::Ready(outcome);
        } else {
            debug!(
                "Discarding stale detail result for {}",
                ticket.location_id
            );
        }
        current
    }

    /// Locations visible under the active filter
    #[must_use]
    pub fn visible<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Location> {
        compute_visible(catalog, &self.active_filter)
    }
}
