//! The infection probability model.
//!
//! The chance that a susceptible visitor picks up the infection during one visit is a pure
//! function of where the visit happened, how many infected people attended the same venue,
//! and whether the visitor wore a mask or kept their distance. Outdoor venues never
//! transmit, and neither does a venue with no infected attendees.

use crate::locations::LocationCategory;

/// Computes the probability that a susceptible person is infected during a single visit.
///
/// Three factors are blended: a per-category crowding factor, a mask factor, and a social
/// distancing factor. The blend is then scaled up by how many infected people attended,
/// saturating at ten. The result is always well inside the unit interval.
#[must_use]
pub fn infection_probability(
    category: LocationCategory,
    infected_count: usize,
    wearing_mask: bool,
    social_distancing: bool,
) -> f64 {
    if infected_count == 0 || category == LocationCategory::OutdoorHike {
        return 0.0;
    }

    let location_factor = match category {
        LocationCategory::LivingRoom => 0.4,
        LocationCategory::RestaurantTable => 0.3,
        LocationCategory::IndoorParty => 0.25,
        LocationCategory::ConferenceRoom => 0.2,
        LocationCategory::Classroom => 0.15,
        // Outdoor visits returned zero above
        LocationCategory::OutdoorHike => unreachable!("no transmission factor for {category}"),
    };

    let mask_factor = if wearing_mask { 0.03 } else { 0.9 };
    let social_distancing_factor = if social_distancing { 0.05 } else { 0.7 };

    // Risk grows with the number of infected attendees but saturates at ten of them
    let crowding = 1.0 + infected_count.min(10) as f64 / 10.0 * 0.5;

    (0.5 * location_factor + 0.3 * mask_factor + 0.2 * social_distancing_factor) * crowding / 4.0
}
