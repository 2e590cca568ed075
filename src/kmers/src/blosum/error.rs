use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BlosumError {
    #[error("Failed to open substitution matrix '{}'", path.display())]
    OpenFile{path: PathBuf, #[source] source: std::io::Error},

    #[error("Substitution matrix contains no alphabet row")]
    MissingAlphabet,

    #[error("Substitution matrix row {lineno} is malformed: {reason}")]
    MalformedRow{lineno: usize, reason: String},
}
