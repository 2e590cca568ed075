use anyhow::{Context, Result};
use log::info;

use oligo_io::{
    parse::create_parent_directory,
    read::FastaReader,
    write::GenericWriter,
};
use parser::Collapse;

mod representatives;
pub use representatives::Representatives;

/// Main collapse runner.
///
/// Drops every sequence that occurs as a substring of a longer (or equal)
/// input sequence, keeping one representative per containment chain.
/// Optionally writes a map of which records were collapsed under which
/// representative.
///
/// # Errors
/// On an unreadable input or a write failure on either output.
pub fn run(collapse: &Collapse) -> Result<()> {
    // ----------------------------- Read input.
    info!("Reading input sequences from '{}'...", collapse.fasta.display());
    let sequences = FastaReader::new(&collapse.fasta)?.read_sequences()?;
    info!("Num Seqs: {}", sequences.len());

    // ----------------------------- Collapse.
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(collapse.threads)
        .build()
        .context("While building the worker pool")?;
    let representatives = Representatives::resolve(sequences, &pool);
    info!("Output seqs: {}", representatives.kept().len());

    // ----------------------------- Write outputs.
    let output = collapse.output_path();
    create_parent_directory(&output)?;
    GenericWriter::new(Some(&output))?
        .write_fastas(representatives.kept().iter().copied())
        .with_context(|| format!("While writing collapsed sequences to '{}'", output.display()))?;

    if let Some(map) = &collapse.map {
        create_parent_directory(map)?;
        GenericWriter::new(Some(map))?
            .write_iter(representatives.map_lines())
            .with_context(|| format!("While writing the collapse map to '{}'", map.display()))?;
    }
    Ok(())
}
