//! Curated tour model

use serde::{Deserialize, Serialize};

/// A named, ordered subset of catalog locations
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Tour {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Location ids, in tour order
    pub locations: Vec<String>,
}

impl Tour {
    #[must_use]
    pub fn new<I, S>(id: impl Into<String>, name: impl Into<String>, locations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            locations: locations.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Whether the tour visits the given location
    #[must_use]
    pub fn includes(&self, location_id: &str) -> bool {
        self.locations.iter().any(|id| id == location_id)
    }
}
