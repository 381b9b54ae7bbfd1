//! The tunable inputs of a generator run.
//!
//! Parameters can be installed programmatically with [`ContextParamsExt::set_params`] or
//! loaded from a json file with [`ContextParamsExt::load_params`]. Fields missing from the
//! json keep their default values. Parameters are validated before they are installed, so
//! a bad configuration fails before any simulation work happens.

use std::fs;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::context::Context;
use crate::define_data_plugin;
use crate::error::EpisynthError;
use crate::log::trace;

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Params {
    /// Number of people in the synthetic population
    pub population_size: usize,
    /// Fraction of the population infected before the first simulated day
    pub initial_infection_rate: f64,
    /// Number of days to simulate
    pub days: u32,
    /// Fraction of people with a high propensity to wear a mask
    pub mask_wearing_rate: f64,
    /// Fraction of people with a high propensity to keep their distance
    pub social_distancing_rate: f64,
}

impl Default for Params {
    fn default() -> Self {
        Params {
            population_size: 1500,
            initial_infection_rate: 0.03,
            days: 7,
            mask_wearing_rate: 0.7,
            social_distancing_rate: 0.5,
        }
    }
}

impl Params {
    fn validate(&self) -> Result<(), EpisynthError> {
        validate_rate(self.initial_infection_rate, "initial_infection_rate")?;
        validate_rate(self.mask_wearing_rate, "mask_wearing_rate")?;
        validate_rate(self.social_distancing_rate, "social_distancing_rate")?;
        Ok(())
    }
}

fn validate_rate(value: f64, name: &str) -> Result<(), EpisynthError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(EpisynthError::EpisynthError(format!(
            "{name} must be a probability between 0 and 1, got {value}"
        )));
    }
    Ok(())
}

define_data_plugin!(ParamsPlugin, Params, Params::default());

pub trait ContextParamsExt {
    /// Validates and installs the given parameters.
    ///
    /// # Errors
    ///
    /// Returns an `EpisynthError` if any rate parameter is not a probability.
    fn set_params(&mut self, params: Params) -> Result<(), EpisynthError>;

    /// Gets the parameters for this run. Returns the defaults if none were installed.
    fn get_params(&self) -> Params;

    /// Reads parameters from a json file and installs them. Fields missing from the
    /// json keep their default values.
    ///
    /// # Errors
    ///
    /// Returns an `EpisynthError` if the file cannot be read, does not parse as json,
    /// or contains an invalid parameter value.
    fn load_params(&mut self, path: &Path) -> Result<(), EpisynthError>;
}

impl ContextParamsExt for Context {
    fn set_params(&mut self, params: Params) -> Result<(), EpisynthError> {
        params.validate()?;
        trace!("installing parameters {params:?}");
        *self.get_data_container_mut(ParamsPlugin) = params;
        Ok(())
    }

    fn get_params(&self) -> Params {
        self.get_data_container(ParamsPlugin)
            .cloned()
            .unwrap_or_default()
    }

    fn load_params(&mut self, path: &Path) -> Result<(), EpisynthError> {
        trace!("loading parameters from {path:?}");
        let config_file = fs::File::open(path)?;
        let reader = BufReader::new(config_file);
        let params: Params = serde_json::from_reader(reader)?;
        self.set_params(params)
    }
}
