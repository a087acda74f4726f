//! Data handed to the map widget, and pin clicks coming back from it

use crate::catalog::Catalog;
use crate::models::{Coordinates, Location};
use serde::Serialize;

/// Default view when no pins are shown: central London
pub const DEFAULT_CENTER: Coordinates = Coordinates {
    lat: 51.505,
    lng: -0.09,
};
pub const DEFAULT_ZOOM: u8 = 12;
/// Padding around fitted bounds, in pixels
pub const FIT_PADDING_PX: u16 = 50;
/// Fitting bounds never zooms in further than this
pub const FIT_MAX_ZOOM: u8 = 15;
/// Zoom used when centering on the user's own position
pub const USER_ZOOM: u8 = 15;

/// One marker on the map
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPin {
    pub id: String,
    pub name: String,
    pub coords: Coordinates,
}

impl From<&Location> for MapPin {
    fn from(location: &Location) -> Self {
        Self {
            id: location.id.clone(),
            name: location.name.clone(),
            coords: location.coords,
        }
    }
}

/// How the map should frame the current pins
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Viewport {
    Center { center: Coordinates, zoom: u8 },
    Fit {
        south_west: Coordinates,
        north_east: Coordinates,
        padding_px: u16,
        max_zoom: u8,
    },
}

#[must_use]
pub fn pins(visible: &[&Location]) -> Vec<MapPin> {
    visible.iter().map(|location| MapPin::from(*location)).collect()
}

/// Frame all pins, or fall back to the default view when there are none
#[must_use]
pub fn viewport(pins: &[MapPin]) -> Viewport {
    let Some(first) = pins.first() else {
        return Viewport::Center {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
        };
    };

    let (south_west, north_east) = pins.iter().skip(1).fold(
        (first.coords, first.coords),
        |(sw, ne), pin| {
            (
                Coordinates::new(sw.lat.min(pin.coords.lat), sw.lng.min(pin.coords.lng)),
                Coordinates::new(ne.lat.max(pin.coords.lat), ne.lng.max(pin.coords.lng)),
            )
        },
    );

    Viewport::Fit {
        south_west,
        north_east,
        padding_px: FIT_PADDING_PX,
        max_zoom: FIT_MAX_ZOOM,
    }
}

/// Center the map on the user's position
#[must_use]
pub fn user_view(position: Coordinates) -> Viewport {
    Viewport::Center {
        center: position,
        zoom: USER_ZOOM,
    }
}

/// Resolve a pin click to its location; unknown ids are ignored
#[must_use]
pub fn resolve_pin_click<'a>(catalog: &'a Catalog, pin_id: &str) -> Option<&'a Location> {
    catalog.location(pin_id)
}

/// Closest visible location to the user's position, with its distance in km
#[must_use]
pub fn nearest<'a>(
    visible: &[&'a Location],
    position: &Coordinates,
) -> Option<(&'a Location, f64)> {
    visible
        .iter()
        .map(|location| (*location, location.coords.distance_km(position)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{ActiveFilter, compute_visible};

    #[test]
    fn test_pins_follow_visible_list() {
        let catalog = Catalog::london();
        let visible = compute_visible(&catalog, &ActiveFilter::Tour("tour3".into()));
        let pins = pins(&visible);
        assert_eq!(pins.len(), 2);
        assert_eq!(pins[0].id, "loc3");
        assert_eq!(pins[1].name, "British Museum");
    }

    #[test]
    fn test_empty_viewport_is_default_view() {
        assert_eq!(
            viewport(&[]),
            Viewport::Center {
                center: DEFAULT_CENTER,
                zoom: DEFAULT_ZOOM
            }
        );
    }

    #[test]
    fn test_viewport_fits_bounds() {
        let catalog = Catalog::london();
        let visible = compute_visible(&catalog, &ActiveFilter::Theme("Royal".into()));
        let Viewport::Fit {
            south_west,
            north_east,
            padding_px,
            max_zoom,
        } = viewport(&pins(&visible))
        else {
            panic!("expected fitted viewport");
        };

        assert_eq!(south_west, Coordinates::new(51.4994, -0.1419));
        assert_eq!(north_east, Coordinates::new(51.5014, -0.1273));
        assert_eq!(padding_px, 50);
        assert_eq!(max_zoom, 15);
    }

    #[test]
    fn test_resolve_pin_click() {
        let catalog = Catalog::london();
        assert_eq!(resolve_pin_click(&catalog, "loc4").unwrap().theme, "WWII");
        assert!(resolve_pin_click(&catalog, "nope").is_none());
    }

    #[test]
    fn test_nearest_location() {
        let catalog = Catalog::london();
        let visible = compute_visible(&catalog, &ActiveFilter::AllThemes);
        // standing at Trafalgar Square
        let trafalgar = Coordinates::new(51.5080, -0.1281);
        let (location, distance) = nearest(&visible, &trafalgar).unwrap();
        assert_eq!(location.id, "loc4");
        assert!(distance < 1.0);

        assert!(nearest(&[], &DEFAULT_CENTER).is_none());
    }

    #[test]
    fn test_user_view_centers_on_position() {
        let position = Coordinates::new(51.5080, -0.1281);
        assert_eq!(
            user_view(position),
            Viewport::Center {
                center: position,
                zoom: 15
            }
        );
    }
}
