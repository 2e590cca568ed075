use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReadError {
    #[error("Failed to open '{}'", path.display())]
    OpenFile{path: PathBuf, #[source] source: std::io::Error},

    #[error("Failed to read a line from '{}'", path.display())]
    ReadLine{path: PathBuf, #[source] source: std::io::Error},

    #[error("Line {lineno}: record '{name}' exceeds the maximum line length ({max} characters)")]
    LineOverflow{lineno: usize, name: String, max: usize},
}
