//! Day-by-day transmission through the population.
//!
//! Each simulated day every person visits one venue drawn from the pool. Within a venue the
//! number of infected attendees is counted first, then every attendee rolls their protective
//! behavior for the visit and, if susceptible, rolls against the infection probability model.
//! People who catch the infection stay infected for the rest of the run; the infected set
//! only ever grows.
//!
//! A day produces one [`PersonDay`] record per person, sorted by venue and then person, which
//! is exactly one row of the contact tracing log.

use std::collections::BTreeMap;

use serde::ser::Serializer;
use serde::Serialize;

use crate::context::Context;
use crate::define_data_plugin;
use crate::define_report;
use crate::define_rng;
use crate::hashing::{HashSet, HashSetExt};
use crate::infection::infection_probability;
use crate::locations::{ContextLocationsExt, LocationId};
use crate::log::debug;
use crate::params::ContextParamsExt;
use crate::people::{ContextPeopleExt, PersonId};
use crate::random::ContextRandomExt;

define_rng!(TransmissionRng);

/// One row of the contact tracing log: one person's visit on one day.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct PersonDay {
    pub day: u32,
    #[serde(serialize_with = "person_label")]
    pub person: PersonId,
    #[serde(serialize_with = "place_label")]
    pub place: LocationId,
    #[serde(
        rename = "pre-visit covid positive",
        serialize_with = "title_case_bool"
    )]
    pub pre_visit_infected: bool,
    #[serde(
        rename = "post-visit covid positive",
        serialize_with = "title_case_bool"
    )]
    pub post_visit_infected: bool,
    #[serde(rename = "mask", serialize_with = "title_case_bool")]
    pub wore_mask: bool,
    #[serde(rename = "social distancing", serialize_with = "title_case_bool")]
    pub social_distanced: bool,
}

define_report!(
    PersonDay,
    [
        "day",
        "person",
        "place",
        "pre-visit covid positive",
        "post-visit covid positive",
        "mask",
        "social distancing",
    ]
);

// People are written as "person 12" rather than a bare id
fn person_label<S: Serializer>(person: &PersonId, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&format_args!("person {person}"))
}

fn place_label<S: Serializer>(place: &LocationId, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(place)
}

// Booleans are written as "True"/"False" in the log
fn title_case_bool<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(if *value { "True" } else { "False" })
}

struct TransmissionData {
    day: u32,
    infected: HashSet<PersonId>,
}

define_data_plugin!(
    TransmissionPlugin,
    TransmissionData,
    TransmissionData {
        day: 0,
        infected: HashSet::new(),
    }
);

pub trait ContextTransmissionExt {
    /// Infects the initial share of the population given by the infection rate parameter,
    /// drawn without replacement. The count is rounded down.
    fn seed_initial_infections(&mut self);

    fn infected_count(&self) -> usize;

    fn is_infected(&self, person_id: PersonId) -> bool;

    /// The next day to be simulated, starting at zero.
    fn current_day(&self) -> u32;

    /// Simulates one day: sends everyone to a venue, spreads the infection within each
    /// venue, and advances the day counter. Returns one record per person, sorted by
    /// venue and then person.
    fn simulate_day(&mut self) -> Vec<PersonDay>;
}

impl ContextTransmissionExt for Context {
    fn seed_initial_infections(&mut self) {
        let params = self.get_params();
        let population_size = self.get_population_size();
        let initial_count = (population_size as f64 * params.initial_infection_rate) as usize;

        let seeds = self.sample(TransmissionRng, |rng| {
            rand::seq::index::sample(rng, population_size, initial_count)
        });
        let data = self.get_data_container_mut(TransmissionPlugin);
        for index in seeds {
            data.infected.insert(PersonId(index));
        }
        debug!("seeded {initial_count} initial infections");
    }

    fn infected_count(&self) -> usize {
        self.get_data_container(TransmissionPlugin)
            .map_or(0, |data| data.infected.len())
    }

    fn is_infected(&self, person_id: PersonId) -> bool {
        self.get_data_container(TransmissionPlugin)
            .is_some_and(|data| data.infected.contains(&person_id))
    }

    fn current_day(&self) -> u32 {
        self.get_data_container(TransmissionPlugin)
            .map_or(0, |data| data.day)
    }

    fn simulate_day(&mut self) -> Vec<PersonDay> {
        let day = self.current_day();
        let population_size = self.get_population_size();

        // Who goes where today. A sorted map fixes the order venues are processed in.
        let mut groups: BTreeMap<LocationId, Vec<PersonId>> = BTreeMap::new();
        for id in 0..population_size {
            let venue = self.sample_venue();
            groups.entry(venue).or_default().push(PersonId(id));
        }

        // Take the infected set out of its container so it can be updated while the
        // behavior and infection draws still borrow `self`
        let mut infected =
            std::mem::take(&mut self.get_data_container_mut(TransmissionPlugin).infected);

        let mut summary = Vec::with_capacity(population_size);
        for (venue, attendees) in &groups {
            // The exposure everyone in this venue faces is the count of infected
            // attendees at the start of the day
            let infected_attendees = attendees
                .iter()
                .filter(|person| infected.contains(*person))
                .count();

            for &person in attendees {
                let wore_mask = self.will_wear_mask(person);
                let social_distanced = self.will_social_distance(person);

                let (pre_visit_infected, post_visit_infected) = if infected.contains(&person) {
                    (true, true)
                } else if infected_attendees == 0 {
                    (false, false)
                } else {
                    let p = infection_probability(
                        venue.category,
                        infected_attendees,
                        wore_mask,
                        social_distanced,
                    );
                    (false, self.sample_bool(TransmissionRng, p))
                };

                if post_visit_infected {
                    infected.insert(person);
                }

                summary.push(PersonDay {
                    day,
                    person,
                    place: *venue,
                    pre_visit_infected,
                    post_visit_infected,
                    wore_mask,
                    social_distanced,
                });
            }
        }

        let data = self.get_data_container_mut(TransmissionPlugin);
        data.infected = infected;
        data.day += 1;

        summary.sort_by_key(|person_day| (person_day.place, person_day.person));
        debug!("day {day}: {} people infected", self.infected_count());
        summary
    }
}
