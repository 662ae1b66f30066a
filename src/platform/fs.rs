// RosterSleuth - platform/fs.rs
//
// Scoped file access for roster persistence.
//
// Saves are atomic: content goes to a sibling temp file which is renamed
// over the target only after a successful write and flush. A failure at any
// point leaves the previous file untouched and removes the temp file.
// Handles are owned by the functions here and dropped on every exit path.

use crate::util::constants::TEMP_FILE_SUFFIX;
use crate::util::error::PersistError;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

fn io_err(path: &Path) -> impl Fn(std::io::Error) -> PersistError + '_ {
    move |source| PersistError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Open `path` for buffered reading.
pub fn open_reader(path: &Path) -> Result<BufReader<File>, PersistError> {
    let file = File::open(path).map_err(io_err(path))?;
    Ok(BufReader::new(file))
}

/// Sibling path used while `path` is being written.
pub fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".");
    name.push(TEMP_FILE_SUFFIX);
    path.with_file_name(name)
}

/// Write `path` atomically through `write`, returning whatever it returns.
///
/// Parent directories are created as needed.
pub fn write_atomic<T, F>(path: &Path, write: F) -> Result<T, PersistError>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<T, PersistError>,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err(parent))?;
    }

    let tmp = temp_path(path);
    let result = write_then_rename(&tmp, path, write);
    if result.is_err() {
        // Secondary errors are irrelevant; the primary one is returned.
        let _ = std::fs::remove_file(&tmp);
    }
    result
}

fn write_then_rename<T, F>(tmp: &Path, path: &Path, write: F) -> Result<T, PersistError>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<T, PersistError>,
{
    let file = File::create(tmp).map_err(io_err(tmp))?;
    let mut writer = BufWriter::new(file);
    let value = write(&mut writer)?;
    writer.flush().map_err(io_err(tmp))?;
    drop(writer);

    std::fs::rename(tmp, path).map_err(io_err(path))?;
    tracing::debug!(path = %path.display(), "File written");
    Ok(value)
}
