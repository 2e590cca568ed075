use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TableError {
    #[error("Failed to open the codon probability file '{}'", path.display())]
    OpenFile{path: PathBuf, #[source] source: std::io::Error},

    #[error("Failed to read a line from '{}'", path.display())]
    ReadLine{path: PathBuf, #[source] source: std::io::Error},
}
