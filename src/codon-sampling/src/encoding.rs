use crate::table::{Codon, CODON_SIZE, C_INDEX, G_INDEX, NUM_CODONS, NUM_NUCLEOTIDES};

/// One Monte-Carlo back-translation of a protein sequence.
///
/// # Invariants
/// - `nucleotides.len() == 3 * total_codons()`
/// - `nucleotide_counts` sums to `nucleotides.len()`
/// - `codon_counts` sums to `total_codons()`
#[derive(Debug, Clone, PartialEq)]
pub struct Encoding {
    pub nucleotides      : String,
    pub nucleotide_counts: [u64; NUM_NUCLEOTIDES],
    pub codon_counts     : [u64; NUM_CODONS],
    pub gc_ratio         : f64,
    pub gc_dist_abs      : f64,
}

impl Encoding {
    pub fn with_capacity(residues: usize) -> Self {
        Self {
            nucleotides      : String::with_capacity(residues * CODON_SIZE),
            nucleotide_counts: [0; NUM_NUCLEOTIDES],
            codon_counts     : [0; NUM_CODONS],
            gc_ratio         : 0.0,
            gc_dist_abs      : 0.0,
        }
    }

    /// Append one sampled codon and update the counters.
    pub fn push(&mut self, codon: &Codon) {
        self.nucleotides.push_str(&codon.triplet);
        for (count, &observed) in self.nucleotide_counts.iter_mut().zip(codon.nucleotides.iter()) {
            *count += u64::from(observed);
        }
        self.codon_counts[codon.index as usize] += 1;
    }

    /// Compute `gc_ratio` and its absolute deviation from `gc_target`.
    pub fn finalize(&mut self, gc_target: f64) {
        let g_and_c: u64 = self.nucleotide_counts[G_INDEX] + self.nucleotide_counts[C_INDEX];
        let total: u64 = self.nucleotide_counts.iter().sum();
        self.gc_ratio = g_and_c as f64 / total as f64;
        self.gc_dist_abs = (self.gc_ratio - gc_target).abs();
    }

    pub fn total_nucleotides(&self) -> u64 {
        self.nucleotide_counts.iter().sum()
    }

    pub fn total_codons(&self) -> u64 {
        self.codon_counts.iter().sum()
    }
}
