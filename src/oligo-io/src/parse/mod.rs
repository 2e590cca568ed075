use std::{fs, path::Path};

use anyhow::{Context, Result};

mod error;
pub use error::ParseError;

/// Attempt to create the parent directories of a path (if needed) and return
/// an error if it failed.
pub fn create_parent_directory(path: &Path) -> Result<()> {
    use ParseError::CreateParentDirectory;
    let parent_dir = path.parent().unwrap_or(path);
    fs::create_dir_all(parent_dir)
        .map_err(CreateParentDirectory)
        .with_context(|| format!("While attempting to create output directory '{}'", path.display()))?;
    Ok(())
}

/// Append the redundancy tag to an output base name: `{base}_R_{redundancy}`.
pub fn tag_output_path(base: &Path, redundancy: u32) -> std::path::PathBuf {
    let mut tagged = base.as_os_str().to_os_string();
    tagged.push(format!("_R_{redundancy}"));
    std::path::PathBuf::from(tagged)
}
