//! Locations are the places where people cross paths and transmission can happen. The pool
//! of venues is fixed for a whole run: each category gets between [`MIN_VENUES_PER_CATEGORY`]
//! and [`MAX_VENUES_PER_CATEGORY`] concrete venues, numbered from zero within their category.
//! Every day each person is sent to one venue drawn uniformly from the whole pool, so
//! categories with more venues absorb proportionally more visits.

use std::fmt;

use strum::{EnumIter, IntoEnumIterator};

use crate::context::Context;
use crate::define_data_plugin;
use crate::define_rng;
use crate::log::trace;
use crate::random::ContextRandomExt;

/// Fewest venues a category can have
pub const MIN_VENUES_PER_CATEGORY: usize = 1;
/// Most venues a category can have
pub const MAX_VENUES_PER_CATEGORY: usize = 5;

define_rng!(LocationsRng);

/// The kinds of places a person can spend their day in. The declaration order is the
/// order venue categories sort in, which fixes the ordering of the daily output.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, EnumIter)]
pub enum LocationCategory {
    LivingRoom,
    RestaurantTable,
    IndoorParty,
    ConferenceRoom,
    Classroom,
    OutdoorHike,
}

impl fmt::Display for LocationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LocationCategory::LivingRoom => "living_room",
            LocationCategory::RestaurantTable => "restaurant_table",
            LocationCategory::IndoorParty => "indoor_party",
            LocationCategory::ConferenceRoom => "conference_room",
            LocationCategory::Classroom => "classroom",
            LocationCategory::OutdoorHike => "outdoor_hike",
        };
        write!(f, "{name}")
    }
}

/// One concrete venue: a category plus an instance number that is only unique within
/// the category. Displays as the place label used in the output, e.g. `living_room 2`.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct LocationId {
    pub category: LocationCategory,
    pub instance: usize,
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.category, self.instance)
    }
}

struct LocationsData {
    venues: Vec<LocationId>,
}

define_data_plugin!(
    LocationsPlugin,
    LocationsData,
    LocationsData { venues: Vec::new() }
);

pub trait ContextLocationsExt {
    /// Creates the venue pool for this run: a random number of venues per category.
    fn generate_locations(&mut self);

    fn venue_count(&self) -> usize;

    /// All venues, ordered by category and then instance.
    fn venues(&self) -> &[LocationId];

    /// Draws the venue one person visits on one day, uniformly over the whole pool.
    fn sample_venue(&self) -> LocationId;
}

impl ContextLocationsExt for Context {
    fn generate_locations(&mut self) {
        let mut venues = Vec::new();
        for category in LocationCategory::iter() {
            let venue_count =
                self.sample_range(LocationsRng, MIN_VENUES_PER_CATEGORY..=MAX_VENUES_PER_CATEGORY);
            for instance in 0..venue_count {
                venues.push(LocationId { category, instance });
            }
        }
        trace!("generated {} venues", venues.len());
        self.get_data_container_mut(LocationsPlugin).venues = venues;
    }

    fn venue_count(&self) -> usize {
        self.get_data_container(LocationsPlugin)
            .map_or(0, |data| data.venues.len())
    }

    fn venues(&self) -> &[LocationId] {
        let data = self
            .get_data_container(LocationsPlugin)
            .expect("Locations have not been generated");
        &data.venues
    }

    fn sample_venue(&self) -> LocationId {
        let venues = self.venues();
        venues[self.sample_range(LocationsRng, 0..venues.len())]
    }
}
