//! Filter engine: which catalog locations are visible for the active filter

use crate::catalog::Catalog;
use crate::models::Location;
use std::fmt;
use tracing::debug;

/// Picker value that resets the theme restriction
pub const ALL_THEMES_VALUE: &str = "all_themes";
/// Picker value that resets the tour restriction
pub const ALL_TOURS_VALUE: &str = "all_tours";

/// The single restriction applied to the catalog.
///
/// Theme and tour selection share one value, so selecting either one
/// replaces the other.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ActiveFilter {
    #[default]
    AllThemes,
    Theme(String),
    AllTours,
    Tour(String),
}

impl ActiveFilter {
    /// Filter for a theme picker choice, mapping the reset value to `AllThemes`
    #[must_use]
    pub fn from_theme_choice(choice: &str) -> Self {
        if choice == ALL_THEMES_VALUE {
            Self::AllThemes
        } else {
            Self::Theme(choice.to_string())
        }
    }

    /// Filter for a tour picker choice, mapping the reset value to `AllTours`
    #[must_use]
    pub fn from_tour_choice(choice: &str) -> Self {
        if choice == ALL_TOURS_VALUE {
            Self::AllTours
        } else {
            Self::Tour(choice.to_string())
        }
    }

    #[must_use]
    pub fn active_theme(&self) -> Option<&str> {
        match self {
            Self::Theme(name) => Some(name),
            _ => None,
        }
    }

    #[must_use]
    pub fn active_tour(&self) -> Option<&str> {
        match self {
            Self::Tour(id) => Some(id),
            _ => None,
        }
    }
}

impl fmt::Display for ActiveFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllThemes => write!(f, "all themes"),
            Self::Theme(name) => write!(f, "theme '{name}'"),
            Self::AllTours => write!(f, "all tours"),
            Self::Tour(id) => write!(f, "tour '{id}'"),
        }
    }
}

/// Locations visible under `filter`, in catalog order.
///
/// An unknown tour id applies no restriction.
#[must_use]
pub fn compute_visible<'a>(catalog: &'a Catalog, filter: &ActiveFilter) -> Vec<&'a Location> {
    let locations = catalog.locations();

    match filter {
        ActiveFilter::Tour(id) => match catalog.tour(id) {
            Some(tour) => locations
                .iter()
                .filter(|location| tour.includes(&location.id))
                .collect(),
            None => {
                debug!("Tour '{}' not found, showing full catalog", id);
                locations.iter().collect()
            }
        },
        ActiveFilter::Theme(name) => locations
            .iter()
            .filter(|location| location.theme == *name)
            .collect(),
        ActiveFilter::AllThemes | ActiveFilter::AllTours => locations.iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coordinates, Tour};
    use rstest::rstest;

    fn ids(visible: &[&Location]) -> Vec<String> {
        visible.iter().map(|location| location.id.clone()).collect()
    }

    #[rstest]
    #[case::royal_theme(ActiveFilter::Theme("Royal".into()), &["loc6", "loc7"])]
    #[case::roman_theme(ActiveFilter::Theme("Roman".into()), &["loc2"])]
    #[case::royal_tour(ActiveFilter::Tour("tour4".into()), &["loc6", "loc7"])]
    #[case::literary_tour(ActiveFilter::Tour("tour3".into()), &["loc3", "loc5"])]
    #[case::unknown_tour(
        ActiveFilter::Tour("tourX".into()),
        &["loc1", "loc2", "loc3", "loc4", "loc5", "loc6", "loc7"]
    )]
    #[case::all_themes(
        ActiveFilter::AllThemes,
        &["loc1", "loc2", "loc3", "loc4", "loc5", "loc6", "loc7"]
    )]
    #[case::all_tours(
        ActiveFilter::AllTours,
        &["loc1", "loc2", "loc3", "loc4", "loc5", "loc6", "loc7"]
    )]
    #[case::case_sensitive_theme(ActiveFilter::Theme("royal".into()), &[])]
    fn test_london_scenarios(#[case] filter: ActiveFilter, #[case] expected: &[&str]) {
        let catalog = Catalog::london();
        let visible = compute_visible(&catalog, &filter);
        assert_eq!(ids(&visible), expected);
    }

    #[test]
    fn test_tour_results_follow_catalog_order() {
        let locations = ["a", "b", "c"]
            .iter()
            .map(|id| Location::new(*id, *id, "X", Coordinates::new(0.0, 0.0)))
            .collect();
        let tours = vec![Tour::new("reverse", "Backwards", ["c", "a"])];
        let catalog = Catalog::new(locations, tours).unwrap();

        let visible = compute_visible(&catalog, &ActiveFilter::Tour("reverse".into()));
        assert_eq!(ids(&visible), vec!["a", "c"]);
    }

    #[test]
    fn test_theme_filter_is_idempotent() {
        let catalog = Catalog::london();
        let filter = ActiveFilter::Theme("Royal".into());
        let first = compute_visible(&catalog, &filter);
        let second = compute_visible(&catalog, &filter);
        assert_eq!(first, second);
    }

    #[test]
    fn test_every_theme_partitions_catalog() {
        let catalog = Catalog::london();
        let total: usize = catalog
            .themes()
            .into_iter()
            .map(|theme| compute_visible(&catalog, &ActiveFilter::Theme(theme)).len())
            .sum();
        assert_eq!(total, catalog.locations().len());
    }

    #[test]
    fn test_tour_result_bounded_by_tour_length() {
        let catalog = Catalog::london();
        for tour in catalog.tours() {
            let visible = compute_visible(&catalog, &ActiveFilter::Tour(tour.id.clone()));
            assert!(visible.len() <= tour.locations.len());
            assert!(visible.iter().all(|location| tour.includes(&location.id)));
        }
    }

    #[rstest]
    #[case(ALL_THEMES_VALUE, ActiveFilter::AllThemes)]
    #[case("Roman", ActiveFilter::Theme("Roman".into()))]
    fn test_from_theme_choice(#[case] choice: &str, #[case] expected: ActiveFilter) {
        assert_eq!(ActiveFilter::from_theme_choice(choice), expected);
    }

    #[rstest]
    #[case(ALL_TOURS_VALUE, ActiveFilter::AllTours)]
    #[case("tour1", ActiveFilter::Tour("tour1".into()))]
    fn test_from_tour_choice(#[case] choice: &str, #[case] expected: ActiveFilter) {
        assert_eq!(ActiveFilter::from_tour_choice(choice), expected);
    }
}
