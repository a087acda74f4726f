//! `TourGuide` - historical points of interest explorer
//!
//! This library provides the static location catalog, theme and tour
//! filtering, the selection state behind the detail overlay, and AI
//! narration through a hosted language model.

pub mod ai;
pub mod catalog;
pub mod config;
pub mod error;
pub mod filter;
pub mod logging;
pub mod map;
pub mod models;
pub mod render;
pub mod selection;
pub mod session;

// Re-export core types for public API
pub use ai::{AiService, Citation, DetailOutcome, GeminiClient, NarrativeProvider, TourIdea};
pub use catalog::Catalog;
pub use config::GuideConfig;
pub use error::{API_KEY_ERROR_MESSAGE, GuideError};
pub use filter::{ActiveFilter, compute_visible};
pub use models::{Coordinates, Location, Tour};
pub use selection::{DetailSlot, FetchTicket, SelectionState, ViewState};
pub use session::{Effect, Intent, Session, SuggestionTicket};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, GuideError>;
