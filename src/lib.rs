//! orgafile - folder organization and heavy-file finding
//!
//! This library sorts the files of a folder into a dated tree of category
//! subfolders (`Organización_YYYY-MM-DD/Documentos`, `.../Imágenes`, ...)
//! based on their file extension, and scans a directory tree to find its
//! largest files.

pub mod cli;
pub mod config;
pub mod file_category;
pub mod file_organizer;
pub mod fs_ops;
pub mod heavy_files;
pub mod output;

pub use config::{CompiledFilters, Config, ConfigError};
pub use file_category::{Category, CategoryTable};
pub use file_organizer::{FileOrganizer, OrganizationRun, OrganizeError, OrganizeReport, organize};
pub use fs_ops::{InvalidPathError, MoveError};
pub use heavy_files::{FileEntry, RankedResult, find_heaviest};

pub use cli::{Cli, Command, run_cli};
