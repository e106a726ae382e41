//! vue-tsx-auto-props: attach type-derived `props` metadata to Vue
//! `defineComponent` calls in TSX files.

mod cli;
mod logging;
mod orchestrator;
mod output;

use clap::Parser;
use cli::Args;
use miette::Result;

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_tracing(args.verbose);

    let summary = orchestrator::run(&args)?;
    let report = summary
        .format(args.output)
        .map_err(orchestrator::CliError::from)?;

    // Rewritten code owns stdout unless it went to files.
    if args.prints_code() {
        eprintln!("{report}");
    } else {
        println!("{report}");
    }

    if summary.is_failure() {
        std::process::exit(1);
    }
    Ok(())
}
