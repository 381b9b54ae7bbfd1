//! The driver for a complete generation run.

use std::path::Path;

use crate::context::Context;
use crate::error::EpisynthError;
use crate::locations::ContextLocationsExt;
use crate::log::info;
use crate::params::ContextParamsExt;
use crate::people::ContextPeopleExt;
use crate::report::ContextReportExt;
use crate::transmission::{ContextTransmissionExt, PersonDay};

/// Builds the synthetic world from the installed parameters and writes the contact
/// tracing log to `csv_path`, one row per person per simulated day.
///
/// # Errors
///
/// Returns an `EpisynthError` if the output file cannot be created or written to.
pub fn run(context: &mut Context, csv_path: &Path) -> Result<(), EpisynthError> {
    let params = context.get_params();
    info!(
        "simulating {} people over {} days",
        params.population_size, params.days
    );

    context.generate_population();
    context.generate_locations();
    context.seed_initial_infections();

    context.add_report::<PersonDay>(csv_path)?;
    for _ in 0..params.days {
        for person_day in context.simulate_day() {
            context.send_report(person_day)?;
        }
    }

    info!("wrote contact tracing log to {}", csv_path.display());
    Ok(())
}
