//! Location model for points of interest and their coordinates

use serde::{Deserialize, Serialize};

/// Geographic coordinate of a point of interest
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    /// Latitude in decimal degrees
    pub lat: f64,
    /// Longitude in decimal degrees
    pub lng: f64,
}

impl Coordinates {
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Whether both components fall inside the valid WGS84 ranges
    #[must_use]
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }

    /// Great-circle distance in kilometers
    #[must_use]
    pub fn distance_km(&self, other: &Coordinates) -> f64 {
        haversine::distance(
            haversine::Location {
                latitude: self.lat,
                longitude: self.lng,
            },
            haversine::Location {
                latitude: other.lat,
                longitude: other.lng,
            },
            haversine::Units::Kilometers,
        )
    }

    /// Format as a "lat, lng" string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.lat, self.lng)
    }
}

/// A historical point of interest
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: String,
    pub name: String,
    /// Free-text category label, e.g. "Roman"
    pub theme: String,
    pub description: String,
    pub facts: Vec<String>,
    pub coords: Coordinates,
    /// URL for the location image
    pub image: String,
    /// URL for audio narration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,
    /// Identifier or URL for an AR asset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ar_asset: Option<String>,
}

impl Location {
    /// Create a location without audio or AR media
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        theme: impl Into<String>,
        coords: Coordinates,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            theme: theme.into(),
            description: String::new(),
            facts: Vec::new(),
            coords,
            image: String::new(),
            audio: None,
            ar_asset: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_facts<I, S>(mut self, facts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.facts = facts.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    #[must_use]
    pub fn with_audio(mut self, audio: impl Into<String>) -> Self {
        self.audio = Some(audio.into());
        self
    }

    #[must_use]
    pub fn with_ar_asset(mut self, ar_asset: impl Into<String>) -> Self {
        self.ar_asset = Some(ar_asset.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_validity() {
        assert!(Coordinates::new(51.5081, -0.0759).is_valid());
        assert!(!Coordinates::new(91.0, 0.0).is_valid());
        assert!(!Coordinates::new(0.0, -181.0).is_valid());
    }

    #[test]
    fn test_distance_km() {
        let tower = Coordinates::new(51.5081, -0.0759);
        let globe = Coordinates::new(51.5081, -0.0972);
        let distance = tower.distance_km(&globe);
        // roughly 1.5 km along the river
        assert!(distance > 1.0 && distance < 2.0);
    }

    #[test]
    fn test_location_json_shape() {
        let coords = Coordinates::new(51.5081, -0.0759);
        let location = Location::new("loc1", "Tower of London", "Medieval", coords)
            .with_ar_asset("tower_model.glb");

        let json = serde_json::to_value(&location).unwrap();
        assert_eq!(json["arAsset"], "tower_model.glb");
        assert_eq!(json["coords"]["lng"], -0.0759);
        assert!(json.get("audio").is_none());

        let parsed: Location = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, location);
    }
}
