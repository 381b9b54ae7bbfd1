//! A synthetic contact tracing data generator
//!
//! Episynth simulates the spread of an infectious disease through a small
//! synthetic world and writes out the kind of contact tracing log a public
//! health department might collect: one csv row per person per day, recording
//! where they went, whether they took precautions, and whether they were
//! infected before and after the visit.
//!
//! The central object of a run is the [`Context`], which owns all simulation
//! state. Simulation logic lives in modules that store their data in the
//! `Context` and expose their operations as trait extensions on it:
//! * `people` creates the population and models each person's propensity
//!   toward masks and social distancing.
//! * `locations` creates the pool of venues people visit each day.
//! * `infection` is the probability model for transmission during one visit.
//! * `transmission` runs the day loop: it assigns everyone a venue, spreads
//!   the infection within each venue, and emits one record per person.
//! * `generator` wires the modules together and writes the csv log.
//!
//! Runs are fully deterministic: the same seed and parameters always produce
//! a byte-identical log.

pub mod context;
pub mod error;
pub mod generator;
pub mod hashing;
pub mod infection;
pub mod locations;
pub mod log;
pub mod params;
pub mod people;
pub mod random;
pub mod report;
pub mod runner;
pub mod transmission;

pub use context::Context;
pub use error::EpisynthError;
pub use hashing::{HashMap, HashMapExt, HashSet, HashSetExt};
pub use locations::{ContextLocationsExt, LocationCategory, LocationId};
pub use params::{ContextParamsExt, Params};
pub use people::{ContextPeopleExt, PersonId};
pub use random::{ContextRandomExt, RngId};
pub use report::{ContextReportExt, Report};
pub use transmission::{ContextTransmissionExt, PersonDay};

pub use crate::log::{
    debug, disable_logging, enable_logging, error, info, set_log_level, set_module_filter,
    set_module_filters, trace, warn,
};
