//! Writing rendered notes to disk.

use crate::constants::NOTE_EXTENSION;
use crate::{GessoError, GessoResult};
use std::path::{Path, PathBuf};

/// File name of the note for `title`.
///
/// Path separators are replaced with `-` so the note always lands directly in the output
/// directory.
pub fn note_filename(title: &str) -> String {
    let name: String = title
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '-' } else { c })
        .collect();
    format!("{name}.{NOTE_EXTENSION}")
}

/// Writes `content` to `output_dir/filename`, creating the directory tree if needed.
///
/// # Errors
///
/// Returns `GessoError::OutputDirCreation` if the directory cannot be created and
/// `GessoError::FileWrite` if the file cannot be written.
pub fn write_output(output_dir: &Path, filename: &str, content: &str) -> GessoResult<PathBuf> {
    std::fs::create_dir_all(output_dir).map_err(GessoError::OutputDirCreation)?;

    let path = output_dir.join(filename);
    std::fs::write(&path, content).map_err(GessoError::FileWrite)?;

    Ok(path)
}
