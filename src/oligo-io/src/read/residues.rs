use std::{fs::File, io::{BufRead, BufReader}, path::{Path, PathBuf}};

use anyhow::{Context, Result};
use log::{info, warn};

use super::{error::ReadError, Sequence};

/// Ambiguity codes that disqualify a record from codon back-translation.
const AMBIGUOUS: [char; 5] = ['B', 'J', 'O', 'U', 'Z'];

/// Reader for the codon-sampler residue input: one `{name},{residues}`
/// record per line.
///
/// Records carrying an ambiguity code are skipped with a notice; lines with
/// any other non A-Z residue are reported with their line number and skipped.
/// A line longer than `max_line_length` aborts the read.
pub struct ResidueReader {
    path           : PathBuf,
    max_line_length: usize,
}

impl ResidueReader {
    pub fn new(path: impl AsRef<Path>, max_line_length: usize) -> Self {
        Self { path: path.as_ref().to_path_buf(), max_line_length }
    }

    /// Read every acceptable record, in input order.
    ///
    /// # Errors
    /// If the file cannot be opened, a line cannot be read, or a line
    /// overflows `max_line_length`.
    pub fn read_sequences(&self) -> Result<Vec<Sequence>> {
        let file = File::open(&self.path)
            .map_err(|source| ReadError::OpenFile{path: self.path.clone(), source})
            .context("While attempting to open the residues input")?;

        let mut sequences = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let lineno = index + 1;
            let line = line
                .map_err(|source| ReadError::ReadLine{path: self.path.clone(), source})?;
            if line.len() > self.max_line_length {
                let name = line.split(',').next().unwrap_or("").to_string();
                return Err(ReadError::LineOverflow{lineno, name, max: self.max_line_length})
                    .context("While reading the residues input")
            }
            if let Some(sequence) = Self::parse_line(&line, lineno) {
                sequences.push(sequence);
            }
        }
        Ok(sequences)
    }

    /// Validate and split one `{name},{residues}` line.
    fn parse_line(line: &str, lineno: usize) -> Option<Sequence> {
        let Some((name, residues)) = line.split_once(',') else {
            warn!("Line {lineno}: {line} is invalid and will be skipped.");
            return None
        };
        if residues.contains(&AMBIGUOUS[..]) {
            info!("Skipping oligo with ambiguous code (B, J, O, U or Z): {residues}.");
            return None
        }
        if name.is_empty() || residues.is_empty() || !residues.chars().all(|c| c.is_ascii_uppercase()) {
            warn!("Line {lineno}: {line} is invalid and will be skipped.");
            return None
        }
        Some(Sequence::new(name, residues))
    }
}
