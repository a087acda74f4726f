//! Static catalog of locations and tours
//!
//! The catalog is loaded once at startup (built-in London data or a JSON
//! file) and never mutated afterwards. Construction validates identifiers
//! and tour references so the rest of the crate can rely on them.

use crate::models::{Coordinates, Location, Tour};
use crate::{GuideError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::path::Path;
use tracing::{debug, info};

/// Immutable list of locations and the tours that reference them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    locations: Vec<Location>,
    tours: Vec<Tour>,
}

impl Catalog {
    /// Build a validated catalog
    pub fn new(locations: Vec<Location>, tours: Vec<Tour>) -> Result<Self> {
        let catalog = Self { locations, tours };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load and validate a catalog from a JSON document
    /// `{ "locations": [...], "tours": [...] }`
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading catalog from {}", path.display());

        let raw = std::fs::read_to_string(path)?;
        let catalog: Catalog = serde_json::from_str(&raw).map_err(|e| {
            GuideError::validation(format!("Malformed catalog file {}: {e}", path.display()))
        })?;
        catalog.validate()?;

        info!(
            "Loaded {} locations and {} tours from {}",
            catalog.locations.len(),
            catalog.tours.len(),
            path.display()
        );
        Ok(catalog)
    }

    fn validate(&self) -> Result<()> {
        let mut location_ids = HashSet::new();
        for location in &self.locations {
            if !location_ids.insert(location.id.as_str()) {
                return Err(GuideError::validation(format!(
                    "Duplicate location id '{}'",
                    location.id
                )));
            }
            if !location.coords.is_valid() {
                return Err(GuideError::validation(format!(
                    "Location '{}' has out-of-range coordinates ({})",
                    location.id,
                    location.coords.format_coordinates()
                )));
            }
        }

        let mut tour_ids = HashSet::new();
        for tour in &self.tours {
            if !tour_ids.insert(tour.id.as_str()) {
                return Err(GuideError::validation(format!(
                    "Duplicate tour id '{}'",
                    tour.id
                )));
            }
            if let Some(missing) = tour
                .locations
                .iter()
                .find(|id| !location_ids.contains(id.as_str()))
            {
                return Err(GuideError::validation(format!(
                    "Tour '{}' references unknown location '{missing}'",
                    tour.id
                )));
            }
        }

        Ok(())
    }

    #[must_use]
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    #[must_use]
    pub fn tours(&self) -> &[Tour] {
        &self.tours
    }

    #[must_use]
    pub fn location(&self, id: &str) -> Option<&Location> {
        self.locations.iter().find(|location| location.id == id)
    }

    #[must_use]
    pub fn tour(&self, id: &str) -> Option<&Tour> {
        self.tours.iter().find(|tour| tour.id == id)
    }

    /// Distinct theme labels, sorted
    #[must_use]
    pub fn themes(&self) -> Vec<String> {
        self.locations
            .iter()
            .map(|location| location.theme.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    #[must_use]
    pub fn tour_names(&self) -> Vec<String> {
        self.tours.iter().map(|tour| tour.name.clone()).collect()
    }

    /// Built-in catalog of historical London
    #[must_use]
    pub fn london() -> Self {
        let locations = vec![
            Location::new("loc1", "Tower of London", "Medieval", Coordinates::new(51.5081, -0.0759))
                .with_description(
                    "A historic castle located on the north bank of the River Thames...",
                )
                .with_facts([
                    "Built by William the Conqueror in 1078",
                    "Former royal residence and infamous prison",
                    "Houses the Crown Jewels of England",
                ])
                .with_image("https://picsum.photos/seed/tower/600/400")
                .with_audio("sounds/tower_speech.mp3")
                .with_ar_asset("tower_model.glb"),
            Location::new("loc2", "Roman Amphitheatre", "Roman", Coordinates::new(51.5155, -0.0919))
                .with_description("Remains of London's Roman amphitheatre, discovered in 1988...")
                .with_facts([
                    "Site of gladiatorial games",
                    "Could hold up to 7,000 spectators",
                    "Rediscovered during building work",
                ])
                .with_image("https://picsum.photos/seed/roman/600/400"),
            Location::new(
                "loc3",
                "Shakespeare's Globe",
                "Shakespearean",
                Coordinates::new(51.5081, -0.0972),
            )
                .with_description("A reconstruction of the original Globe Theatre...")
                .with_facts([
                    "Original Globe burned down in 1613",
                    "Associated with William Shakespeare",
                    "Features a thatched roof",
                ])
                .with_image("https://picsum.photos/seed/globe/600/400")
                .with_ar_asset("globe_model.glb"),
            Location::new("loc4", "Churchill War Rooms", "WWII", Coordinates::new(51.5022, -0.1290))
                .with_description("The secret underground WWII headquarters...")
                .with_facts([
                    "Operational from 1939-1945",
                    "Includes Cabinet War Room",
                    "Preserved almost exactly as left",
                ])
                .with_image("https://picsum.photos/seed/churchill/600/400")
                .with_audio("sounds/churchill_speech.mp3"),
            Location::new("loc5", "British Museum", "Culture", Coordinates::new(51.5194, -0.1270))
                .with_description(
                    "A public institution dedicated to human history, art and culture...",
                )
                .with_facts([
                    "Established in 1753",
                    "Home to Rosetta Stone",
                    "Over 8 million works",
                ])
                .with_image("https://picsum.photos/seed/museum/600/400"),
            Location::new("loc6", "Buckingham Palace", "Royal", Coordinates::new(51.5014, -0.1419))
                .with_description("The London residence of the monarch...")
                .with_facts([
                    "Originally Buckingham House",
                    "Official royal palace since 1837",
                    "Has 775 rooms",
                ])
                .with_image("https://picsum.photos/seed/palace/600/400"),
            Location::new("loc7", "Westminster Abbey", "Royal", Coordinates::new(51.4994, -0.1273))
                .with_description("A large, mainly Gothic abbey church...")
                .with_facts([
                    "Coronation and burial site for monarchs",
                    "Site of royal weddings",
                    "UNESCO World Heritage Site",
                ])
                .with_image("https://picsum.photos/seed/abbey/600/400"),
        ];

        let tours = vec![
            Tour::new("tour1", "Roman Ruins Expedition", ["loc2"])
                .with_description("Discover the ancient Roman presence in London."),
            Tour::new("tour2", "Medieval London Walk", ["loc1"])
                .with_description("Explore the castles and stories of medieval London."),
            Tour::new("tour3", "Literary & Cultural Highlights", ["loc3", "loc5"])
                .with_description("A journey through London's rich literary and cultural past."),
            Tour::new("tour4", "Royal London Experience", ["loc6", "loc7"])
                .with_description("Visit iconic royal landmarks and learn their history."),
        ];

        Self { locations, tours }
    }
}
