use std::{fs::File, io::{BufRead, BufReader, Read}, path::{Path, PathBuf}};

use anyhow::{Context, Result};
use log::warn;

use super::{error::ReadError, Sequence};

/// FASTA reader.
///
/// Records are introduced by a '>' header line; every subsequent line is
/// appended to the record's residues, stripped of ASCII whitespace.
pub struct FastaReader<'a> {
    source: Box<dyn BufRead + 'a>,
    path  : PathBuf,
}

impl<'a> FastaReader<'a> {
    /// Open a FASTA file.
    ///
    /// # Errors
    /// If `path` targets an invalid location (`FileNotFound` or `PermissionDenied`).
    pub fn new(path: impl AsRef<Path>) -> Result<FastaReader<'a>> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)
            .map_err(|source| ReadError::OpenFile{path: path.clone(), source})
            .context("While attempting to open a FASTA input")?;
        Ok(Self { source: Box::new(BufReader::new(file)), path })
    }

    /// Read every record in the file, in input order.
    ///
    /// Residue lines appearing before the first header are reported and
    /// ignored.
    ///
    /// # Errors
    /// On any underlying I/O failure.
    pub fn read_sequences(mut self) -> Result<Vec<Sequence>> {
        let mut sequences: Vec<Sequence> = Vec::new();
        for (lineno, line) in (&mut self.source).lines().enumerate() {
            let line = line
                .map_err(|source| ReadError::ReadLine{path: self.path.clone(), source})?;
            let line = line.trim();
            if line.is_empty() {
                continue
            }
            if let Some(name) = line.strip_prefix('>') {
                sequences.push(Sequence::new(name.trim(), ""));
                continue
            }
            match sequences.last_mut() {
                Some(sequence) => {
                    // Concatenate verbatim, minus any stray inner whitespace.
                    sequence.residues.extend(line.chars().filter(|c| !c.is_ascii_whitespace()));
                }
                None => warn!("Line {}: residues found before any '>' header. Skipping.", lineno + 1),
            }
        }
        Ok(sequences)
    }
}

/// Count the records of a FASTA file without materializing them.
///
/// Returns 0 for a missing file: callers use this to compare a fresh design
/// against whatever a previous run may have left on disk.
pub fn count_fasta_records(path: impl AsRef<Path>) -> usize {
    let Ok(file) = File::open(path.as_ref()) else {
        return 0
    };
    let mut count = 0;
    let mut reader = BufReader::new(file);
    let mut buf = [0u8; 8192];
    let mut at_line_start = true;
    while let Ok(n) = reader.read(&mut buf) {
        if n == 0 {
            break
        }
        for &byte in &buf[..n] {
            if at_line_start && byte == b'>' {
                count += 1;
            }
            at_line_start = byte == b'\n';
        }
    }
    count
}
