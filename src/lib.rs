use anyhow::Result;
use parser::{Cli, Commands};

/// Dispatch the parsed command line onto the requested engine.
pub fn run(cli: Cli) -> Result<()> {
    match &cli.commands {
        Commands::SetCover {cover} => {
            set_cover::run(cover)
        },
        Commands::CodonSampling {sampling} => {
            codon_sampling::run(sampling)
        },
        Commands::Collapse {collapse: args} => {
            collapse::run(args)
        },
    }
}
