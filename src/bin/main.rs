use std::process;

use clap::Parser;
use logger::Logger;

#[macro_use]
extern crate log;

/// Parse command line arguments and dispatch the requested subcommand.
fn main() {
    // ----------------------------- Run CLI Parser
    let cli = parser::Cli::parse();

    // ----------------------------- Init logger.
    Logger::init(cli.verbose + u8::from(!cli.quiet));

    // ----------------------------- Serialize command line arguments
    if let Err(e) = cli.serialize() {
        warn!("{e}");
    }

    // ----------------------------- Run.
    if let Err(e) = oligo_design::run(cli) {
        error!("{e:?}");
        process::exit(1);
    }
}
