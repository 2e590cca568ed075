use anyhow::{Context, Result};
use log::info;

use oligo_io::{
    parse::create_parent_directory,
    read::{ResidueReader, Sequence},
    write::GenericWriter,
};
use parser::CodonSampling;
use xoroshiro::Xoroshiro128;

pub mod table;
pub use table::{Codon, CodonTable};

pub mod encoding;
pub use encoding::Encoding;

pub mod sampler;
pub use sampler::Sampler;

pub mod fmt;

mod error;
pub use error::TableError;

/// The 20 standard amino acids, in ratio-output column order.
pub const AMINO_ACIDS: [char; 20] = [
    'A', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'K', 'L',
    'M', 'N', 'P', 'Q', 'R', 'S', 'T', 'V', 'W', 'Y',
];

/// Number of fields of one ratio-output row: 4 nucleotide fractions, 20
/// amino-acid fractions, 64 codon fractions.
pub const RATIO_FIELDS: usize = table::NUM_NUCLEOTIDES + AMINO_ACIDS.len() + table::NUM_CODONS;

/// Main codon-sampling runner.
///
/// Back-translates every input sequence `trials` times, ranks the encodings
/// by absolute GC-target deviation and streams the best `subsample` of each
/// to the two output files.
///
/// # Errors
/// On out-of-range parameters, an unreadable input, or a write failure.
pub fn run(sampling: &CodonSampling) -> Result<()> {
    sampling.validate()?;

    // ----------------------------- Load the probability table.
    info!("Loading codon probabilities from '{}'...", sampling.probabilities.display());
    let table = CodonTable::from_path(&sampling.probabilities)?;

    // ----------------------------- Read input sequences.
    info!("Reading residues from '{}'...", sampling.input.display());
    let sequences = ResidueReader::new(&sampling.input, sampling.max_line_length).read_sequences()?;
    info!("{} sequences to encode.", sequences.len());

    // ----------------------------- Initialize RNG and worker pool.
    let mut rng = match sampling.seed {
        Some(seed) => Xoroshiro128::with_seed(seed),
        None       => Xoroshiro128::new(),
    };
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(sampling.threads)
        .build()
        .context("While building the worker pool")?;

    // ----------------------------- Open outputs.
    create_parent_directory(&sampling.seq_output)?;
    create_parent_directory(&sampling.ratio_output)?;
    let mut seq_writer = GenericWriter::new(Some(&sampling.seq_output))?;
    let mut ratio_writer = GenericWriter::new(Some(&sampling.ratio_output))?;

    // ----------------------------- Sample.
    let sampler = Sampler {
        table    : &table,
        trials   : sampling.trials,
        subsample: sampling.subsample,
        gc_target: sampling.gc_target_ratio,
    };
    let digits = num_digits(sampling.trials);

    for sequence in &sequences {
        let best = sampler.sample(sequence, &mut rng, &pool);
        let (aa_counts, aa_total) = amino_acid_counts(&sequence.residues);

        seq_writer.write_iter(
            best.iter()
                .enumerate()
                .map(|(index, encoding)| sequence_row(sequence, encoding, index + 1, digits)),
        )?;
        ratio_writer.write_iter(
            best.iter().map(|encoding| ratio_row(encoding, &aa_counts, aa_total)),
        )?;
    }
    Ok(())
}

/// Number of decimal digits of `n`, used to zero-pad the trial-rank suffix.
fn num_digits(n: usize) -> usize {
    (n.checked_ilog10().unwrap_or(0) + 1) as usize
}

/// Tally how often each of the 20 standard amino acids occurs. The total is
/// the full residue count, so unknown letters lower the summed fractions
/// rather than skewing them.
fn amino_acid_counts(residues: &str) -> ([u64; 20], u64) {
    let mut counts = [0u64; 20];
    for residue in residues.chars() {
        if let Some(position) = AMINO_ACIDS.iter().position(|&aa| aa == residue) {
            counts[position] += 1;
        }
    }
    (counts, residues.len() as u64)
}

/// `{name}_{rank},{residues},{nucleotides},{gc_ratio},{gc_dist_abs}` with a
/// zero-padded 1-based rank.
fn sequence_row(sequence: &Sequence, encoding: &Encoding, rank: usize, digits: usize) -> String {
    format!(
        "{}_{:0digits$},{},{},{:.6},{:.6}",
        sequence.name, rank, sequence.residues, encoding.nucleotides,
        encoding.gc_ratio, encoding.gc_dist_abs,
    )
}

/// The 88 comma-separated `%.4g` fractions of one encoding.
fn ratio_row(encoding: &Encoding, aa_counts: &[u64; 20], aa_total: u64) -> String {
    let mut fields = Vec::with_capacity(RATIO_FIELDS);
    let total_nucleotides = encoding.total_nucleotides() as f64;
    let total_codons = encoding.total_codons() as f64;

    for count in encoding.nucleotide_counts {
        fields.push(fmt::format_g4(count as f64 / total_nucleotides));
    }
    for &count in aa_counts {
        fields.push(fmt::format_g4(count as f64 / aa_total as f64));
    }
    for count in encoding.codon_counts {
        fields.push(fmt::format_g4(count as f64 / total_codons));
    }
    fields.join(",")
}
