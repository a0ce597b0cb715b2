//! File-system primitives shared by the organizer and the scanner.
//!
//! - Root path validation
//! - Listing the regular files directly inside a directory
//! - Moving a single file with all-or-nothing semantics

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// The path handed to an operation is missing, empty, or not a directory.
#[derive(Debug, Error)]
#[error("Invalid path '{}': {reason}", .path.display())]
pub struct InvalidPathError {
    /// The path as supplied by the caller (after trimming).
    pub path: PathBuf,
    /// Why the path was rejected.
    pub reason: &'static str,
}

impl InvalidPathError {
    /// Message shown to the user when a path is rejected.
    pub const USER_MESSAGE: &'static str = "Por favor, ingresa una ruta válida.";
}

/// Errors that can occur while moving one file into the organization tree.
#[derive(Debug, Error)]
pub enum MoveError {
    /// Another file already occupies the destination.
    #[error("Destination already exists: {}", .destination.display())]
    DestinationExists { destination: PathBuf },

    /// The underlying link, copy or delete failed.
    #[error("Failed to move {} to {}: {source}", .from.display(), .to.display())]
    Io {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Validates a root directory supplied as text.
///
/// Surrounding whitespace is ignored. The path must be non-empty, exist and be
/// a directory.
///
/// # Examples
///
/// ```
/// use orgafile::fs_ops::resolve_root;
///
/// assert!(resolve_root("   ").is_err());
/// assert!(resolve_root("/definitely/not/here").is_err());
/// ```
pub fn resolve_root(input: &str) -> Result<PathBuf, InvalidPathError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(InvalidPathError {
            path: PathBuf::new(),
            reason: "no path given",
        });
    }
    let path = PathBuf::from(trimmed);
    ensure_directory(&path)?;
    Ok(path)
}

/// Checks that `path` exists and is a directory.
pub fn ensure_directory(path: &Path) -> Result<(), InvalidPathError> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(InvalidPathError {
            path: path.to_path_buf(),
            reason: "not a directory",
        }),
        Err(_) => Err(InvalidPathError {
            path: path.to_path_buf(),
            reason: "path does not exist",
        }),
    }
}

/// Lists the regular files directly inside `dir`, sorted by file name.
///
/// Symbolic links are judged by their target, so a link to a file is listed
/// and a link to a directory is not. Subdirectories and anything else that is
/// not a regular file are left out. The listing is not recursive. Entries that
/// cannot be inspected are logged and skipped.
pub fn list_direct_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!("skipping unreadable entry in {}: {}", dir.display(), e);
                continue;
            }
        };
        let path = entry.path();
        match fs::metadata(&path) {
            Ok(meta) if meta.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => debug!("skipping {}: {}", path.display(), e),
        }
    }

    files.sort();
    Ok(files)
}

/// Moves `from` to `to` without ever overwriting an existing file.
///
/// On one volume the file is hard-linked into place and the source link
/// removed; linking fails instead of replacing an existing destination. If
/// linking is not possible (another volume, a file system without hard links)
/// the file is copied into a freshly created destination and the source
/// deleted. A symbolic link is moved as a link, not as its target.
///
/// On any failure the destination is cleaned up, so the file ends up either
/// at `from` or at `to`, never both and never neither.
pub fn move_file(from: &Path, to: &Path) -> Result<(), MoveError> {
    if fs::symlink_metadata(to).is_ok() {
        return Err(MoveError::DestinationExists {
            destination: to.to_path_buf(),
        });
    }

    link_then_remove(from, to)
}

fn io_error(from: &Path, to: &Path, source: io::Error) -> MoveError {
    if source.kind() == io::ErrorKind::AlreadyExists {
        return MoveError::DestinationExists {
            destination: to.to_path_buf(),
        };
    }
    MoveError::Io {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    }
}

/// Same-volume move. `hard_link` refuses an existing destination; any other
/// link failure except a missing source falls back to copying.
fn link_then_remove(from: &Path, to: &Path) -> Result<(), MoveError> {
    match fs::hard_link(from, to) {
        Ok(()) => remove_source(from, to),
        Err(e) if matches!(e.kind(), io::ErrorKind::NotFound | io::ErrorKind::AlreadyExists) => {
            Err(io_error(from, to, e))
        }
        Err(e) => {
            debug!("hard link {} failed ({}), copying instead", from.display(), e);
            copy_then_remove(from, to)
        }
    }
}

/// Deletes the source once `to` holds the file, undoing `to` if that fails.
fn remove_source(from: &Path, to: &Path) -> Result<(), MoveError> {
    match fs::remove_file(from) {
        Ok(()) => Ok(()),
        // Already gone: `to` is now the only copy and must stay.
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => {
            let _ = fs::remove_file(to);
            Err(io_error(from, to, e))
        }
    }
}

/// Cross-volume move: copy into a new file, keep the modification time and
/// permissions, then delete the source.
fn copy_then_remove(from: &Path, to: &Path) -> Result<(), MoveError> {
    #[cfg(unix)]
    {
        let is_link = fs::symlink_metadata(from)
            .map(|meta| meta.file_type().is_symlink())
            .unwrap_or(false);
        if is_link {
            return relink_then_remove(from, to);
        }
    }

    let mut source = File::open(from).map_err(|e| io_error(from, to, e))?;
    let source_meta = source.metadata().map_err(|e| io_error(from, to, e))?;

    let mut destination = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(to)
        .map_err(|e| io_error(from, to, e))?;

    if let Err(e) = io::copy(&mut source, &mut destination) {
        drop(destination);
        let _ = fs::remove_file(to);
        return Err(io_error(from, to, e));
    }

    if let Ok(modified) = source_meta.modified() {
        if let Err(e) = destination.set_modified(modified) {
            debug!("could not keep mtime of {}: {}", from.display(), e);
        }
    }
    if let Err(e) = destination.set_permissions(source_meta.permissions()) {
        debug!("could not keep permissions of {}: {}", from.display(), e);
    }
    drop(destination);
    drop(source);

    remove_source(from, to)
}

/// Recreates a symbolic link at `to` pointing where `from` points.
#[cfg(unix)]
fn relink_then_remove(from: &Path, to: &Path) -> Result<(), MoveError> {
    let target = fs::read_link(from).map_err(|e| io_error(from, to, e))?;
    std::os::unix::fs::symlink(&target, to).map_err(|e| io_error(from, to, e))?;

    remove_source(from, to)
}
