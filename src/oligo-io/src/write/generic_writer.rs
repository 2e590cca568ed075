use std::{fs::File, io::{BufWriter, Write}, path::Path};

use anyhow::{Context, Result};

use super::error::WriterError;
use crate::read::Sequence;

/// A generic line-oriented file writer.
/// - source: Boxed `BufWriter` (can either handle file-writing, or stdout).
pub struct GenericWriter<'a> {
    source: BufWriter<Box<dyn Write + 'a>>,
}

impl<'a> GenericWriter<'a> {
    /// Instantiate a new writer, linked to a file, or to stdout when `path`
    /// is `None`.
    ///
    /// # Errors
    /// If `path` is either an invalid file, or the user does not have the
    /// proper permissions to write at this location.
    pub fn new(path: Option<impl AsRef<Path>>) -> Result<GenericWriter<'a>> {
        use WriterError::IOError;
        Ok(GenericWriter{ source: match path {
            Some(path) => {
                let file = File::create(path).map_err(IOError).context("While creating file")?;
                BufWriter::new(Box::new(file))
            }
            None => BufWriter::new(Box::new(std::io::stdout())),
        }})
    }

    /// Write the contents of a generic iterator. One iteration step = one line.
    ///
    /// # Errors
    /// If any of the items within `iter` fails to get written.
    pub fn write_iter<T, I>(&mut self, iter: T) -> Result<()>
    where
        T: IntoIterator<Item = I>,
        I: std::fmt::Display,
    {
        for item in iter {
            writeln!(self.source, "{item}")
                .map_err(WriterError::IOError)
                .context("While writing contents into file")?;
        }
        self.source.flush().context("While flushing buffer contents of writer")
    }

    /// Serialize records as FASTA: `>name` followed by the residues, one
    /// record per pair of lines, no wrapping.
    ///
    /// # Errors
    /// If any record fails to get written.
    pub fn write_fastas<'s>(&mut self, sequences: impl IntoIterator<Item = &'s Sequence>) -> Result<()> {
        self.write_iter(sequences)
    }
}
