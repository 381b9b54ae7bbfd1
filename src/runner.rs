use std::path::Path;

use clap::{Args, Command, FromArgMatches as _};

use crate::context::Context;
use crate::error::EpisynthError;
use crate::log::{set_log_level, LevelFilter};
use crate::params::ContextParamsExt;
use crate::random::ContextRandomExt;

/// Default cli arguments for the episynth runner
#[derive(Args, Debug)]
pub struct BaseArgs {
    /// Random seed
    #[arg(short, long, default_value = "0")]
    pub random_seed: u64,

    /// Optional path for a parameters config file
    #[arg(short, long, default_value = "")]
    pub config: String,

    /// Optional path for the csv output
    #[arg(short, long, default_value = "")]
    pub output: String,

    /// Enable logging at the given level
    #[arg(short, long)]
    pub log_level: Option<LevelFilter>,
}

#[derive(Args)]
pub struct PlaceholderCustom {}

fn create_episynth_cli() -> Command {
    let cli = Command::new("episynth");
    BaseArgs::augment_args(cli)
}

/// Runs a generation with custom cli arguments.
///
/// This function allows you to define custom arguments and a setup function
///
/// # Parameters
/// - `setup_fn`: A function that takes a mutable reference to a `Context`, a `BaseArgs` struct,
///    a `Option<A>` where A is the custom cli arguments struct
///
/// # Errors
/// Returns an error if argument parsing or the setup function fails
pub fn run_with_custom_args<A, F>(setup_fn: F) -> Result<Context, Box<dyn std::error::Error>>
where
    A: Args,
    F: Fn(&mut Context, BaseArgs, Option<A>) -> Result<(), EpisynthError>,
{
    let mut cli = create_episynth_cli();
    cli = A::augment_args(cli);
    let matches = cli.get_matches();

    let base_args_matches = BaseArgs::from_arg_matches(&matches)?;
    let custom_matches = A::from_arg_matches(&matches)?;
    run_with_args_internal(base_args_matches, Some(custom_matches), setup_fn)
}

/// Runs a generation with default cli arguments
///
/// This function parses command line arguments and allows you to define a setup function
///
/// # Parameters
/// - `setup_fn`: A function that takes a mutable reference to a `Context` and `BaseArgs` struct
///
/// # Errors
/// Returns an error if argument parsing or the setup function fails
pub fn run_with_args<F>(setup_fn: F) -> Result<Context, Box<dyn std::error::Error>>
where
    F: Fn(&mut Context, BaseArgs, Option<PlaceholderCustom>) -> Result<(), EpisynthError>,
{
    let cli = create_episynth_cli();
    let matches = cli.get_matches();

    let base_args_matches = BaseArgs::from_arg_matches(&matches)?;
    run_with_args_internal(base_args_matches, None, setup_fn)
}

fn run_with_args_internal<A, F>(
    args: BaseArgs,
    custom_args: Option<A>,
    setup_fn: F,
) -> Result<Context, Box<dyn std::error::Error>>
where
    F: Fn(&mut Context, BaseArgs, Option<A>) -> Result<(), EpisynthError>,
{
    // Instantiate a context
    let mut context = Context::new();

    // Optionally enable logging
    if let Some(level) = args.log_level {
        set_log_level(level);
    }

    // Optionally set parameters from a file
    if !args.config.is_empty() {
        let config_path = Path::new(&args.config);
        context.load_params(config_path)?;
    }

    context.init_random(args.random_seed);

    // Run the provided Fn
    setup_fn(&mut context, args, custom_args)?;

    Ok(context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::define_rng;

    #[derive(Args, Debug)]
    struct CustomArgs {
        #[arg(short, long, default_value = "0")]
        field: u32,
    }

    #[test]
    fn test_run_with_custom_args() {
        let result = run_with_custom_args(|_, _, _: Option<CustomArgs>| Ok(()));
        assert!(result.is_ok());
    }

    #[test]
    fn test_cli_invocation_with_custom_args() {
        // Note this target is defined in the bin section of Cargo.toml
        // and the entry point is in tests/bin/runner_test_custom_args
        assert_cmd::Command::cargo_bin("runner_test_custom_args")
            .unwrap()
            .args(["--field", "42"])
            .assert()
            .success()
            .stdout("42\n");
    }

    #[test]
    fn test_run_with_args() {
        let result = run_with_args(|_, _, _| Ok(()));
        assert!(result.is_ok());
    }

    #[test]
    fn test_run_with_random_seed() {
        let test_args = BaseArgs {
            random_seed: 42,
            config: String::new(),
            output: String::new(),
            log_level: None,
        };

        // Use a comparison context to verify the random seed was set
        let mut compare_ctx = Context::new();
        compare_ctx.init_random(42);
        define_rng!(TestRng);
        let result = run_with_args_internal(test_args, None, |ctx, _, _: Option<()>| {
            assert_eq!(
                ctx.sample_range(TestRng, 0..100),
                compare_ctx.sample_range(TestRng, 0..100)
            );
            Ok(())
        });
        assert!(result.is_ok());
    }

    #[test]
    fn test_run_with_config_path() {
        let test_args = BaseArgs {
            random_seed: 42,
            config: "tests/data/params_runner.json".to_string(),
            output: String::new(),
            log_level: None,
        };
        let result = run_with_args_internal(test_args, None, |ctx, _, _: Option<()>| {
            let params = ctx.get_params();
            assert_eq!(params.population_size, 25);
            assert_eq!(params.days, 2);
            Ok(())
        });
        assert!(result.is_ok());
    }

    #[test]
    fn test_output_arg_reaches_setup() {
        let test_args = BaseArgs {
            random_seed: 42,
            config: String::new(),
            output: "data/out.csv".to_string(),
            log_level: None,
        };
        let result = run_with_args_internal(test_args, None, |_, args, _: Option<()>| {
            assert_eq!(args.output, "data/out.csv");
            Ok(())
        });
        assert!(result.is_ok());
    }

    #[test]
    fn test_run_with_custom() {
        let test_args = BaseArgs {
            random_seed: 42,
            config: String::new(),
            output: String::new(),
            log_level: None,
        };
        let custom = CustomArgs { field: 42 };
        let result = run_with_args_internal(test_args, Some(custom), |_, _, c| {
            assert_eq!(c.unwrap().field, 42);
            Ok(())
        });
        assert!(result.is_ok());
    }
}
