//! File organization into a dated tree of category folders.
//!
//! An organization run creates `Organización_YYYY-MM-DD` inside the chosen
//! folder, with one subfolder per category, and moves every regular file
//! found directly in the chosen folder into the subfolder of its category.
//! A file that cannot be moved is recorded and the run carries on.

use crate::config::CompiledFilters;
use crate::file_category::{Category, CategoryTable};
use crate::fs_ops::{self, InvalidPathError, MoveError};
use chrono::{DateTime, Local, NaiveDate};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Prefix of the destination folder created inside the organized directory.
pub const DESTINATION_PREFIX: &str = "Organización_";

/// Outcome message when every file was moved.
pub const SUCCESS_MESSAGE: &str = "Archivos organizados correctamente.";

/// Errors that stop an organization run before any file is moved.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// The directory to organize is missing or not a directory.
    #[error(transparent)]
    InvalidPath(#[from] InvalidPathError),

    /// Failed to create the destination root or a category folder.
    #[error("Failed to create directory {}: {source}", .path.display())]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to list the directory being organized.
    #[error("Failed to read directory {}: {source}", .path.display())]
    ReadDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl OrganizeError {
    /// Message suitable for showing to the user as-is.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidPath(_) => InvalidPathError::USER_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// A single file relocation, planned or performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMove {
    /// Where the file was before organization.
    pub original_path: PathBuf,
    /// Where the file ends up.
    pub new_path: PathBuf,
    /// The category the file was resolved to.
    pub category: Category,
}

/// A file that could not be moved, with the reason.
#[derive(Debug)]
pub struct MoveFailure {
    pub path: PathBuf,
    pub category: Category,
    pub error: MoveError,
}

/// One invocation of the organizer.
///
/// Constructing a run creates the destination root and every category folder.
/// Creation is idempotent, so starting a second run on the same day reuses the
/// existing folders.
#[derive(Debug, Clone)]
pub struct OrganizationRun {
    source: PathBuf,
    created: DateTime<Local>,
    destination_root: PathBuf,
    category_dirs: Vec<(Category, PathBuf)>,
}

impl OrganizationRun {
    /// Name of the destination folder for a given day.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use orgafile::file_organizer::OrganizationRun;
    ///
    /// let day = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
    /// assert_eq!(OrganizationRun::folder_name(day), "Organización_2024-03-09");
    /// ```
    pub fn folder_name(date: NaiveDate) -> String {
        format!("{}{}", DESTINATION_PREFIX, date.format("%Y-%m-%d"))
    }

    /// Creates the destination tree under `source` and returns the run.
    pub fn start(
        source: &Path,
        created: DateTime<Local>,
        table: &CategoryTable,
    ) -> OrganizeResult<Self> {
        let destination_root = source.join(Self::folder_name(created.date_naive()));

        let category_dirs: Vec<(Category, PathBuf)> = table
            .categories()
            .map(|category| (category, destination_root.join(category.dir_name())))
            .collect();

        for (_, dir) in &category_dirs {
            fs::create_dir_all(dir).map_err(|e| OrganizeError::DirectoryCreationFailed {
                path: dir.clone(),
                source: e,
            })?;
        }
        debug!("destination tree ready at {}", destination_root.display());

        Ok(Self {
            source: source.to_path_buf(),
            created,
            destination_root,
            category_dirs,
        })
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn created(&self) -> DateTime<Local> {
        self.created
    }

    pub fn destination_root(&self) -> &Path {
        &self.destination_root
    }

    /// The category folders created for this run, in table order.
    pub fn category_dirs(&self) -> &[(Category, PathBuf)] {
        &self.category_dirs
    }
}

/// What happened during one organization pass.
#[derive(Debug)]
pub struct OrganizeReport {
    /// When the run started; its date names the destination folder.
    pub created: DateTime<Local>,
    /// The dated folder files were moved into.
    pub destination_root: PathBuf,
    /// Files that reached their category folder.
    pub moved: Vec<FileMove>,
    /// Files that stayed where they were because the move failed.
    pub failed: Vec<MoveFailure>,
    /// Files left alone because a configured filter excluded them.
    pub skipped: Vec<PathBuf>,
}

impl OrganizeReport {
    /// Returns true if no move failed.
    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Human-readable status of the run.
    pub fn outcome_message(&self) -> String {
        if self.is_complete_success() {
            SUCCESS_MESSAGE.to_string()
        } else {
            let moved = match self.moved.len() {
                1 => "Se organizó 1 archivo".to_string(),
                n => format!("Se organizaron {} archivos", n),
            };
            let failed = match self.failed.len() {
                1 => "1 no se pudo mover".to_string(),
                n => format!("{} no se pudieron mover", n),
            };
            format!("{}; {}.", moved, failed)
        }
    }

    /// Number of moved files per category.
    pub fn category_counts(&self) -> BTreeMap<Category, usize> {
        count_by_category(&self.moved)
    }
}

/// Counts moves per category, in category order.
pub fn count_by_category(moves: &[FileMove]) -> BTreeMap<Category, usize> {
    let mut counts = BTreeMap::new();
    for file_move in moves {
        *counts.entry(file_move.category).or_insert(0) += 1;
    }
    counts
}

/// Sorts the files of a directory into category folders.
#[derive(Debug, Clone)]
pub struct FileOrganizer {
    table: CategoryTable,
    filters: CompiledFilters,
}

impl FileOrganizer {
    /// Creates an organizer that only touches files admitted by `filters`.
    pub fn new(filters: CompiledFilters) -> Self {
        Self {
            table: CategoryTable::default(),
            filters,
        }
    }

    /// Organizes `root` into today's destination folder.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use orgafile::file_organizer::FileOrganizer;
    /// use std::path::Path;
    ///
    /// let report = FileOrganizer::default()
    ///     .organize(Path::new("/home/me/Descargas"))
    ///     .expect("organization failed");
    /// println!("{}", report.outcome_message());
    /// ```
    pub fn organize(&self, root: &Path) -> OrganizeResult<OrganizeReport> {
        self.organize_at(root, Local::now())
    }

    /// Organizes `root` using `created` to name the destination folder.
    ///
    /// The path is validated before anything is created. Each file is moved
    /// independently; a failure is recorded in the report and the remaining
    /// files are still processed.
    pub fn organize_at(
        &self,
        root: &Path,
        created: DateTime<Local>,
    ) -> OrganizeResult<OrganizeReport> {
        fs_ops::ensure_directory(root)?;
        info!("organizing contents of {}", root.display());

        let run = OrganizationRun::start(root, created, &self.table)?;
        let (planned, skipped) = self.collect_moves(root, run.destination_root())?;

        let mut moved = Vec::with_capacity(planned.len());
        let mut failed = Vec::new();

        for file_move in planned {
            match fs_ops::move_file(&file_move.original_path, &file_move.new_path) {
                Ok(()) => {
                    debug!(
                        "moved {} -> {}",
                        file_move.original_path.display(),
                        file_move.new_path.display()
                    );
                    moved.push(file_move);
                }
                Err(error) => {
                    warn!("{}", error);
                    failed.push(MoveFailure {
                        path: file_move.original_path,
                        category: file_move.category,
                        error,
                    });
                }
            }
        }

        info!(
            moved = moved.len(),
            failed = failed.len(),
            skipped = skipped.len(),
            "organization finished"
        );

        Ok(OrganizeReport {
            created: run.created(),
            destination_root: run.destination_root().to_path_buf(),
            moved,
            failed,
            skipped,
        })
    }

    /// Works out what `organize` would do today, without touching anything.
    pub fn plan(&self, root: &Path) -> OrganizeResult<Vec<FileMove>> {
        self.plan_at(root, Local::now().date_naive())
    }

    /// Works out what `organize` would do on `date`. No folders are created
    /// and no files are moved. Files excluded by filters are left out.
    pub fn plan_at(&self, root: &Path, date: NaiveDate) -> OrganizeResult<Vec<FileMove>> {
        fs_ops::ensure_directory(root)?;
        let destination_root = root.join(OrganizationRun::folder_name(date));
        let (planned, _) = self.collect_moves(root, &destination_root)?;
        Ok(planned)
    }

    /// Lists the direct files of `root` and pairs each admitted file with its
    /// destination. Returns the planned moves and the filtered-out paths.
    fn collect_moves(
        &self,
        root: &Path,
        destination_root: &Path,
    ) -> OrganizeResult<(Vec<FileMove>, Vec<PathBuf>)> {
        let files = fs_ops::list_direct_files(root).map_err(|e| OrganizeError::ReadDirFailed {
            path: root.to_path_buf(),
            source: e,
        })?;

        let mut planned = Vec::new();
        let mut skipped = Vec::new();

        for path in files {
            if !self.filters.should_include(&path) {
                debug!("skipping {} (excluded by filters)", path.display());
                skipped.push(path);
                continue;
            }

            let Some(file_name) = path.file_name() else {
                continue;
            };
            let category = self.table.resolve(&file_name.to_string_lossy());
            let new_path = destination_root.join(category.dir_name()).join(file_name);

            planned.push(FileMove {
                original_path: path,
                new_path,
                category,
            });
        }

        Ok((planned, skipped))
    }
}

impl Default for FileOrganizer {
    fn default() -> Self {
        Self::new(CompiledFilters::allow_all())
    }
}

/// Organizes `root` with the standard categories and no filters.
pub fn organize(root: &Path) -> OrganizeResult<OrganizeReport> {
    FileOrganizer::default().organize(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ExcludeRules, FilterRules, IncludeRules};
    use chrono::TimeZone;
    use std::fs;
    use tempfile::TempDir;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 1, 31, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_start_creates_every_category_folder() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let table = CategoryTable::default();

        let run = OrganizationRun::start(temp_dir.path(), fixed_time(), &table)
            .expect("Failed to start run");

        assert_eq!(
            run.destination_root(),
            temp_dir.path().join("Organización_2024-01-31")
        );
        for name in [
            "Documentos",
            "Imágenes",
            "Videos",
            "Comprimidos",
            "Programas",
            "Otros",
        ] {
            assert!(run.destination_root().join(name).is_dir(), "{}", name);
        }
        assert_eq!(run.category_dirs().len(), 6);
    }

    #[test]
    fn test_start_is_idempotent() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let table = CategoryTable::default();

        OrganizationRun::start(temp_dir.path(), fixed_time(), &table).expect("first run");
        OrganizationRun::start(temp_dir.path(), fixed_time(), &table).expect("second run");
    }

    #[test]
    fn test_organize_moves_into_categories() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        fs::write(base_path.join("a.pdf"), "0123456789").unwrap();
        fs::write(base_path.join("b.unknownext"), "01234").unwrap();
        fs::write(base_path.join("c.png"), "01234567890123456789").unwrap();

        let report = FileOrganizer::default()
            .organize_at(base_path, fixed_time())
            .expect("Failed to organize");

        let dest = base_path.join("Organización_2024-01-31");
        assert!(dest.join("Documentos").join("a.pdf").is_file());
        assert!(dest.join("Otros").join("b.unknownext").is_file());
        assert!(dest.join("Imágenes").join("c.png").is_file());
        assert_eq!(report.moved.len(), 3);
        assert_eq!(report.created, fixed_time());
        assert!(report.is_complete_success());
        assert_eq!(report.outcome_message(), SUCCESS_MESSAGE);
        assert!(fs_ops::list_direct_files(base_path).unwrap().is_empty());
    }

    #[test]
    fn test_organize_invalid_path_creates_nothing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let missing = temp_dir.path().join("missing");

        let err = FileOrganizer::default()
            .organize_at(&missing, fixed_time())
            .unwrap_err();

        assert!(matches!(err, OrganizeError::InvalidPath(_)));
        assert_eq!(err.user_message(), "Por favor, ingresa una ruta válida.");
        assert!(!missing.exists());
    }

    #[test]
    fn test_organize_collision_is_reported_and_run_continues() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        let docs = base_path.join("Organización_2024-01-31").join("Documentos");
        fs::create_dir_all(&docs).unwrap();
        fs::write(docs.join("a.pdf"), "already here").unwrap();
        fs::write(base_path.join("a.pdf"), "incoming").unwrap();
        fs::write(base_path.join("z.zip"), "zip").unwrap();

        let report = FileOrganizer::default()
            .organize_at(base_path, fixed_time())
            .expect("Run should complete");

        assert_eq!(report.failed.len(), 1);
        assert!(matches!(
            report.failed[0].error,
            MoveError::DestinationExists { .. }
        ));
        assert_eq!(report.moved.len(), 1);
        assert_eq!(report.moved[0].category, Category::Archive);
        assert_eq!(
            fs::read_to_string(docs.join("a.pdf")).unwrap(),
            "already here"
        );
        assert_eq!(
            fs::read_to_string(base_path.join("a.pdf")).unwrap(),
            "incoming"
        );
        assert_eq!(
            report.outcome_message(),
            "Se organizó 1 archivo; 1 no se pudo mover."
        );
    }

    #[test]
    fn test_partial_failure_message_plural() {
        let failure = |name: &str| MoveFailure {
            path: PathBuf::from(name),
            category: Category::Other,
            error: MoveError::DestinationExists {
                destination: PathBuf::from(name),
            },
        };
        let mut report = OrganizeReport {
            created: fixed_time(),
            destination_root: PathBuf::from("x"),
            moved: Vec::new(),
            failed: vec![failure("a"), failure("b")],
            skipped: Vec::new(),
        };
        assert_eq!(
            report.outcome_message(),
            "Se organizaron 0 archivos; 2 no se pudieron mover."
        );

        report.moved = vec![
            FileMove {
                original_path: PathBuf::from("c.pdf"),
                new_path: PathBuf::from("x/Documentos/c.pdf"),
                category: Category::Document,
            };
            3
        ];
        report.failed.truncate(1);
        assert_eq!(
            report.outcome_message(),
            "Se organizaron 3 archivos; 1 no se pudo mover."
        );
    }

    #[test]
    fn test_plan_does_not_touch_disk() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        fs::write(base_path.join("movie.mkv"), "v").unwrap();
        let day = fixed_time().date_naive();

        let plan = FileOrganizer::default()
            .plan_at(base_path, day)
            .expect("Failed to plan");

        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].category, Category::Video);
        assert_eq!(
            plan[0].new_path,
            base_path
                .join("Organización_2024-01-31")
                .join("Videos")
                .join("movie.mkv")
        );
        assert!(base_path.join("movie.mkv").exists());
        assert!(!base_path.join("Organización_2024-01-31").exists());
    }

    #[test]
    fn test_filters_leave_excluded_files_in_place() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        fs::write(base_path.join("keep.tmp"), "t").unwrap();
        fs::write(base_path.join("doc.txt"), "d").unwrap();

        let rules = FilterRules {
            enable_hidden_files: true,
            exclude: ExcludeRules {
                extensions: vec!["tmp".to_string()],
                ..Default::default()
            },
            include: IncludeRules::default(),
        };
        let organizer = FileOrganizer::new(CompiledFilters::new(&rules).unwrap());

        let report = organizer
            .organize_at(base_path, fixed_time())
            .expect("Failed to organize");

        assert_eq!(report.skipped, vec![base_path.join("keep.tmp")]);
        assert_eq!(report.moved.len(), 1);
        assert!(base_path.join("keep.tmp").exists());
    }

    #[test]
    fn test_category_counts() {
        let moves = vec![
            FileMove {
                original_path: PathBuf::from("a.pdf"),
                new_path: PathBuf::from("x/Documentos/a.pdf"),
                category: Category::Document,
            },
            FileMove {
                original_path: PathBuf::from("b.txt"),
                new_path: PathBuf::from("x/Documentos/b.txt"),
                category: Category::Document,
            },
            FileMove {
                original_path: PathBuf::from("c"),
                new_path: PathBuf::from("x/Otros/c"),
                category: Category::Other,
            },
        ];

        let counts = count_by_category(&moves);
        assert_eq!(counts.get(&Category::Document), Some(&2));
        assert_eq!(counts.get(&Category::Other), Some(&1));
        assert_eq!(counts.get(&Category::Image), None);
    }
}
