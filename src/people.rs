//! The synthetic population.
//!
//! Each person is assigned, once at creation, a propensity toward wearing a mask and a
//! propensity toward keeping their distance. Propensities come in two tiers; the share of
//! the population landing in the high tier is controlled by the corresponding rate
//! parameter. Whether a person actually engages in a protective behavior on a given visit
//! is a fresh Bernoulli draw against their propensity, so the same person can behave
//! differently from one visit to the next.

use std::fmt;

use crate::context::Context;
use crate::define_data_plugin;
use crate::define_rng;
use crate::log::trace;
use crate::params::ContextParamsExt;
use crate::random::ContextRandomExt;

/// Mask wearing propensity of people in the high tier
pub const HIGH_MASK_WEARING_PROPENSITY: f64 = 0.7;
/// Mask wearing propensity of people in the low tier
pub const LOW_MASK_WEARING_PROPENSITY: f64 = 0.2;
/// Social distancing propensity of people in the high tier
pub const HIGH_SOCIAL_DISTANCING_PROPENSITY: f64 = 0.6;
/// Social distancing propensity of people in the low tier
pub const LOW_SOCIAL_DISTANCING_PROPENSITY: f64 = 0.1;

define_rng!(PeopleRng);

/// A person identifier, dense from zero up to the population size.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PersonId(pub(crate) usize);

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Person {}", self.0)
    }
}

/// A member of the population with their fixed behavioral propensities.
#[derive(Clone, Debug)]
pub struct PersonProfile {
    pub id: PersonId,
    mask_wearing_propensity: f64,
    social_distancing_propensity: f64,
}

struct PeopleData {
    people: Vec<PersonProfile>,
}

define_data_plugin!(
    PeoplePlugin,
    PeopleData,
    PeopleData { people: Vec::new() }
);

pub trait ContextPeopleExt {
    /// Creates the population described by the run parameters. Each person draws a high
    /// or low tier independently for each behavior.
    fn generate_population(&mut self);

    fn get_population_size(&self) -> usize;

    /// Converts a raw index to a `PersonId`. Panics if no such person exists.
    fn get_person_id(&self, person_id: usize) -> PersonId;

    fn get_person(&self, person_id: PersonId) -> &PersonProfile;

    /// Draws whether this person wears a mask on one particular visit.
    fn will_wear_mask(&self, person_id: PersonId) -> bool;

    /// Draws whether this person keeps their distance on one particular visit.
    fn will_social_distance(&self, person_id: PersonId) -> bool;
}

impl ContextPeopleExt for Context {
    fn generate_population(&mut self) {
        let params = self.get_params();
        trace!("generating population of {}", params.population_size);

        let mut people = Vec::with_capacity(params.population_size);
        for id in 0..params.population_size {
            let mask_wearing_propensity =
                if self.sample_bool(PeopleRng, params.mask_wearing_rate) {
                    HIGH_MASK_WEARING_PROPENSITY
                } else {
                    LOW_MASK_WEARING_PROPENSITY
                };
            let social_distancing_propensity =
                if self.sample_bool(PeopleRng, params.social_distancing_rate) {
                    HIGH_SOCIAL_DISTANCING_PROPENSITY
                } else {
                    LOW_SOCIAL_DISTANCING_PROPENSITY
                };
            people.push(PersonProfile {
                id: PersonId(id),
                mask_wearing_propensity,
                social_distancing_propensity,
            });
        }

        self.get_data_container_mut(PeoplePlugin).people = people;
    }

    fn get_population_size(&self) -> usize {
        self.get_data_container(PeoplePlugin)
            .map_or(0, |data| data.people.len())
    }

    fn get_person_id(&self, person_id: usize) -> PersonId {
        assert!(
            person_id < self.get_population_size(),
            "Person {person_id} does not exist"
        );
        PersonId(person_id)
    }

    fn get_person(&self, person_id: PersonId) -> &PersonProfile {
        let data = self
            .get_data_container(PeoplePlugin)
            .expect("Population has not been generated");
        &data.people[person_id.0]
    }

    fn will_wear_mask(&self, person_id: PersonId) -> bool {
        let propensity = self.get_person(person_id).mask_wearing_propensity;
        self.sample_bool(PeopleRng, propensity)
    }

    fn will_social_distance(&self, person_id: PersonId) -> bool {
        let propensity = self.get_person(person_id).social_distancing_propensity;
        self.sample_bool(PeopleRng, propensity)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::params::Params;

    fn setup(params: Params, seed: u64) -> Context {
        let mut context = Context::new();
        context.set_params(params).unwrap();
        context.init_random(seed);
        context.generate_population();
        context
    }

    #[test]
    fn person_id_formats() {
        assert_eq!(format!("{}", PersonId(3)), "3");
        assert_eq!(format!("{:?}", PersonId(3)), "Person 3");
    }

    #[test]
    fn generates_the_requested_population() {
        let context = setup(
            Params {
                population_size: 100,
                ..Default::default()
            },
            42,
        );
        assert_eq!(context.get_population_size(), 100);
        for id in 0..100 {
            let person = context.get_person(context.get_person_id(id));
            assert_eq!(person.id, PersonId(id));
            assert!(
                person.mask_wearing_propensity == HIGH_MASK_WEARING_PROPENSITY
                    || person.mask_wearing_propensity == LOW_MASK_WEARING_PROPENSITY
            );
            assert!(
                person.social_distancing_propensity == HIGH_SOCIAL_DISTANCING_PROPENSITY
                    || person.social_distancing_propensity == LOW_SOCIAL_DISTANCING_PROPENSITY
            );
        }
    }

    #[test]
    fn rate_one_forces_high_tier() {
        let context = setup(
            Params {
                population_size: 50,
                mask_wearing_rate: 1.0,
                social_distancing_rate: 1.0,
                ..Default::default()
            },
            42,
        );
        for id in 0..50 {
            let person = context.get_person(PersonId(id));
            assert_eq!(person.mask_wearing_propensity, HIGH_MASK_WEARING_PROPENSITY);
            assert_eq!(
                person.social_distancing_propensity,
                HIGH_SOCIAL_DISTANCING_PROPENSITY
            );
        }
    }

    #[test]
    fn rate_zero_forces_low_tier() {
        let context = setup(
            Params {
                population_size: 50,
                mask_wearing_rate: 0.0,
                social_distancing_rate: 0.0,
                ..Default::default()
            },
            42,
        );
        for id in 0..50 {
            let person = context.get_person(PersonId(id));
            assert_eq!(person.mask_wearing_propensity, LOW_MASK_WEARING_PROPENSITY);
            assert_eq!(
                person.social_distancing_propensity,
                LOW_SOCIAL_DISTANCING_PROPENSITY
            );
        }
    }

    #[test]
    fn behavior_draws_vary_between_visits() {
        let context = setup(
            Params {
                population_size: 1,
                mask_wearing_rate: 1.0,
                ..Default::default()
            },
            42,
        );
        let person = context.get_person_id(0);
        let mut saw_mask = false;
        let mut saw_no_mask = false;
        for _ in 0..200 {
            if context.will_wear_mask(person) {
                saw_mask = true;
            } else {
                saw_no_mask = true;
            }
        }
        assert!(saw_mask);
        assert!(saw_no_mask);
    }

    #[test]
    #[should_panic(expected = "Person 5 does not exist")]
    fn get_person_id_out_of_range() {
        let context = setup(
            Params {
                population_size: 5,
                ..Default::default()
            },
            42,
        );
        context.get_person_id(5);
    }

    #[test]
    #[should_panic(expected = "Population has not been generated")]
    fn get_person_before_generation() {
        let context = Context::new();
        context.get_person(PersonId(0));
    }
}
