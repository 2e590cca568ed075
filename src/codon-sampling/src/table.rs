use std::{fs::File, io::{BufRead, BufReader}, path::Path};

use anyhow::{Context, Result};
use log::{trace, warn};

use crate::error::TableError;

pub const CODON_SIZE: usize      = 3;
pub const NUM_CODONS: usize      = 64;
pub const NUM_NUCLEOTIDES: usize = 4;

pub const A_INDEX: usize = 0;
pub const C_INDEX: usize = 1;
pub const G_INDEX: usize = 2;
pub const T_INDEX: usize = 3;

/// Index of a DNA base within the nucleotide count vectors.
pub fn nucleotide_index(base: char) -> Option<usize> {
    match base {
        'A' => Some(A_INDEX),
        'C' => Some(C_INDEX),
        'G' => Some(G_INDEX),
        'T' => Some(T_INDEX),
        _   => None,
    }
}

/// One codon of the probability table.
///
/// After table construction, `weight` holds the per-amino-acid normalized
/// probability and `nucleotides` the base counts of the triplet (summing to
/// 3).
#[derive(Debug, Clone, PartialEq)]
pub struct Codon {
    pub triplet    : String,
    pub weight     : f64,
    pub index      : u8,
    pub nucleotides: [u8; NUM_NUCLEOTIDES],
}

/// Codon probability table: an ordered codon list per amino-acid letter.
///
/// Codons keep their file order, so sampling is reproducible for a fixed
/// seed. Letters without any codon yield an empty list.
#[derive(Debug, Clone, Default)]
pub struct CodonTable {
    rows: Vec<Vec<Codon>>,
}

impl CodonTable {
    /// Parse a probability file of `{amino_acid},{codon},{weight},{codon_index}`
    /// records, then normalize weights per amino acid.
    ///
    /// Unparseable records are logged and skipped; EOF terminates.
    ///
    /// # Errors
    /// If the file cannot be opened or read.
    ///
    /// # Panics
    /// If a non-empty row normalizes to a non-finite or non-positive weight
    /// sum. That is a table-construction bug, not an input condition.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|source| TableError::OpenFile{path: path.to_path_buf(), source})
            .context("While opening the codon probability file")?;

        let mut rows = vec![Vec::new(); 26];
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let lineno = index + 1;
            let line = line
                .map_err(|source| TableError::ReadLine{path: path.to_path_buf(), source})?;
            match Self::parse_record(&line) {
                Some((letter, codon)) => {
                    trace!("Read {} with weight {} for {letter} (index {})", codon.triplet, codon.weight, codon.index);
                    rows[letter as usize - 'A' as usize].push(codon);
                }
                None => warn!("Unable to read codon data from line {lineno}, skipping..."),
            }
        }

        let mut table = Self { rows };
        table.normalize();
        Ok(table)
    }

    /// Validate and split one `A,TGC,0.374,12` record.
    fn parse_record(line: &str) -> Option<(char, Codon)> {
        let mut fields = line.trim().split(',');

        let letter = fields.next().and_then(|field| {
            let mut chars = field.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii_uppercase() => Some(c),
                _ => None,
            }
        })?;
        let triplet = fields.next().filter(|t| {
            t.len() == CODON_SIZE && t.chars().all(|c| nucleotide_index(c).is_some())
        })?;
        let weight: f64 = fields.next()?.parse::<f64>().ok().filter(|w| w.is_finite() && *w > 0.0)?;
        let index: u8 = fields.next()?.parse().ok().filter(|i| *i < NUM_CODONS as u8)?;
        if fields.next().is_some() {
            return None
        }

        let mut nucleotides = [0u8; NUM_NUCLEOTIDES];
        for base in triplet.chars() {
            nucleotides[nucleotide_index(base).expect("Triplet bases were validated")] += 1;
        }
        Some((letter, Codon { triplet: triplet.to_string(), weight, index, nucleotides }))
    }

    /// Divide each codon's weight by the sum of its amino acid's weights.
    fn normalize(&mut self) {
        for row in &mut self.rows {
            if row.is_empty() {
                continue
            }
            let total: f64 = row.iter().map(|codon| codon.weight).sum();
            assert!(
                total.is_finite() && total > 0.0,
                "Codon weight normalization produced an invalid sum ({total})"
            );
            for codon in row.iter_mut() {
                codon.weight /= total;
            }
        }
    }

    /// The ordered codon list for an amino-acid letter. Empty for unknown
    /// letters.
    pub fn codons(&self, residue: char) -> &[Codon] {
        if residue.is_ascii_uppercase() {
            &self.rows[residue as usize - 'A' as usize]
        } else {
            &[]
        }
    }
}
