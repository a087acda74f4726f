//! Data models for the tour guide
//!
//! - Location: points of interest and their coordinates
//! - Tour: curated, ordered selections of locations

pub mod location;
pub mod tour;

pub use location::{Coordinates, Location};
pub use tour::Tour;
