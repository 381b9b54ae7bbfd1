use std::path::PathBuf;

use episynth::generator;
use episynth::runner::run_with_args;

fn main() {
    run_with_args(|context, args, _| {
        let output = if args.output.is_empty() {
            PathBuf::from("contact_tracing.csv")
        } else {
            PathBuf::from(&args.output)
        };
        generator::run(context, &output)
    })
    .unwrap();
}
