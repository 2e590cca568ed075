use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, info};

use kmers::{Blosum, Neighborhood};
use oligo_io::{
    parse::{create_parent_directory, tag_output_path},
    read::{count_fasta_records, FastaReader, Sequence},
    write::GenericWriter,
};
use parser::{Expansion, SetCover};
use xoroshiro::Xoroshiro128;

mod engine;
pub use engine::{CoverEngine, IterationStats};

/// Main set-cover runner.
///
/// Indexes the query proteome, runs the requested number of greedy restart
/// iterations and persists the best design to `{output}_R_{redundancy}`.
///
/// # Errors
/// On out-of-range parameters, an unreadable input or matrix file, or a
/// write failure on the output path.
pub fn run(cover: &SetCover) -> Result<()> {
    cover.validate()?;

    // ----------------------------- Read inputs.
    info!("Reading input sequences from '{}'...", cover.query.display());
    let sequences = FastaReader::new(&cover.query)?.read_sequences()?;
    info!("{} input sequences.", sequences.len());

    let pre_designed = match &cover.pre_designed {
        Some(path) => {
            info!("Reading pre-designed peptides from '{}'...", path.display());
            FastaReader::new(path)?.read_sequences()?
        }
        None => Vec::new(),
    };

    let neighborhood = build_neighborhood(&cover.expansion())?;

    // ----------------------------- Initialize RNG and worker pool.
    let mut rng = match cover.seed {
        Some(seed) => Xoroshiro128::with_seed(seed),
        None       => Xoroshiro128::new(),
    };
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(cover.threads)
        .build()
        .context("While building the worker pool")?;

    // ----------------------------- Index the coverage universe.
    let mut engine = CoverEngine::new(
        &sequences,
        &pre_designed,
        cover.xmer_window_size,
        cover.ymer_window_size,
        cover.min_xmer_coverage,
        neighborhood,
    );
    info!("{} distinct xmers to cover.", engine.total_xmers());

    let output = tag_output_path(&cover.output, cover.redundancy);
    create_parent_directory(&output)?;

    // ----------------------------- Greedy loop, with restarts.
    let mut best: Option<usize> = None;
    let bar = logger::Logger::progress_bar(u64::from(cover.iterations));
    for iteration in 1..=cover.iterations {
        let (design, stats) = engine.run_iteration(&mut rng, &pool);
        info!(
            "Iteration {iteration}: {} ymers, {:.2}% xmer coverage",
            design.len(),
            stats.fraction() * 100.0
        );
        if best.map_or(true, |previous| design.len() < previous) {
            best = Some(design.len());
            persist_design(&design, &output)?;
        }
        bar.inc(1);
    }
    bar.finish_and_clear();
    Ok(())
}

fn build_neighborhood(expansion: &Expansion) -> Result<Neighborhood> {
    Ok(match expansion {
        Expansion::None             => Neighborhood::None,
        Expansion::FunctionalGroups => Neighborhood::FunctionalGroups,
        Expansion::Blosum{name, cutoff} => Neighborhood::Blosum{
            matrix: Blosum::from_name_or_path(name)?,
            cutoff: *cutoff,
        },
    })
}

/// Write the design, unless a strictly smaller one from a previous run is
/// already sitting at `path`. This keeps the on-disk design monotone in
/// quality across restarts and across process invocations.
fn persist_design(design: &[Sequence], path: &Path) -> Result<()> {
    let on_disk = count_fasta_records(path);
    if on_disk > 0 && on_disk <= design.len() {
        debug!("Keeping the {on_disk}-ymer design already present at '{}'", path.display());
        return Ok(())
    }
    GenericWriter::new(Some(path))?
        .write_fastas(design.iter())
        .with_context(|| format!("While persisting the design to '{}'", path.display()))
}
