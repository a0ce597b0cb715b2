//! Heavy-file scanning.
//!
//! Walks a directory tree and ranks the files it finds by size. Entries whose
//! size cannot be read are skipped; a partial ranking is more useful than
//! none.

use crate::config::DEFAULT_SCAN_LIMIT;
use crate::fs_ops::{self, InvalidPathError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// A file and its size at scan time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Full path to the file.
    pub path: PathBuf,
    /// File size in bytes.
    pub size: u64,
}

impl FileEntry {
    /// The file's base name.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// The directory containing the file.
    pub fn parent_dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }

    /// Size in mebibytes (`bytes / (1024 * 1024)`).
    pub fn size_mb(&self) -> f64 {
        self.size as f64 / BYTES_PER_MB
    }
}

/// The largest files of a tree, biggest first.
#[derive(Debug, Clone, Default)]
pub struct RankedResult {
    entries: Vec<FileEntry>,
    files_scanned: usize,
    unreadable: usize,
}

impl RankedResult {
    /// The ranked entries, sizes non-increasing.
    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// How many files had their size read, ranked or not.
    pub fn files_scanned(&self) -> usize {
        self.files_scanned
    }

    /// How many entries were skipped because their size could not be read.
    pub fn unreadable(&self) -> usize {
        self.unreadable
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FileEntry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a RankedResult {
    type Item = &'a FileEntry;
    type IntoIter = std::slice::Iter<'a, FileEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Returns the `limit` largest files under `root`, biggest first.
///
/// The walk descends into every subdirectory without following symbolic
/// links, visiting siblings in file-name order. A symlink to a file is
/// measured by its target. Ties keep the order in which files were
/// discovered.
///
/// # Errors
///
/// Returns `InvalidPathError` if `root` is missing or not a directory.
///
/// # Examples
///
/// ```no_run
/// use orgafile::heavy_files::find_heaviest;
/// use std::path::Path;
///
/// let result = find_heaviest(Path::new("/home/me"), 10).unwrap();
/// for entry in &result {
///     println!("{} - {:.2} MB", entry.file_name(), entry.size_mb());
/// }
/// ```
pub fn find_heaviest(root: &Path, limit: usize) -> Result<RankedResult, InvalidPathError> {
    fs_ops::ensure_directory(root)?;
    info!("scanning {} for the {} largest files", root.display(), limit);

    let mut entries = Vec::new();
    let mut unreadable = 0;

    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!("skipping unreadable entry: {}", e);
                unreadable += 1;
                continue;
            }
        };
        if entry.file_type().is_dir() {
            continue;
        }

        match fs::metadata(entry.path()) {
            Ok(meta) if meta.is_file() => entries.push(FileEntry {
                path: entry.into_path(),
                size: meta.len(),
            }),
            Ok(_) => debug!("skipping {} (not a regular file)", entry.path().display()),
            Err(e) => {
                debug!("skipping {}: {}", entry.path().display(), e);
                unreadable += 1;
            }
        }
    }

    let files_scanned = entries.len();
    // sort_by is stable, so equal sizes stay in discovery order
    entries.sort_by(|a, b| b.size.cmp(&a.size));
    entries.truncate(limit);

    info!(
        files_scanned,
        unreadable,
        reported = entries.len(),
        "scan finished"
    );

    Ok(RankedResult {
        entries,
        files_scanned,
        unreadable,
    })
}

/// `find_heaviest` with the default limit of ten files.
pub fn find_heaviest_default(root: &Path) -> Result<RankedResult, InvalidPathError> {
    find_heaviest(root, DEFAULT_SCAN_LIMIT)
}
