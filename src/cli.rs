//! Command-line interface module for orgafile.
//!
//! This module handles all CLI-related functionality including:
//! - Argument parsing
//! - Configuration loading
//! - Organization and dry-run orchestration
//! - Heavy-file listing

use crate::config::Config;
use crate::file_organizer::{FileOrganizer, OrganizeError, count_by_category};
use crate::fs_ops::{self, InvalidPathError};
use crate::heavy_files::find_heaviest;
use crate::output::{ListingStyle, OutputFormatter};
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;

/// Organize a folder by file type and find its heaviest files.
#[derive(Debug, Parser)]
#[command(name = "orgafile", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file to use instead of the discovered one
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log every file operation to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Represents a CLI command to execute.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Move the files of a folder into dated category folders
    Organize {
        /// Folder whose files should be organized
        path: String,

        /// Show what would be moved without changing anything
        #[arg(long)]
        dry_run: bool,
    },
    /// List the largest files anywhere under a folder
    Heavy {
        /// Folder to scan recursively
        path: String,

        /// Number of files to list [default: from config, else 10]
        #[arg(short, long)]
        limit: Option<usize>,

        /// Print without colours
        #[arg(long, conflicts_with = "json")]
        plain: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

/// How a command ended, mapped to the process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Everything went through.
    Success,
    /// The command ran but some files could not be moved.
    PartialFailure,
    /// The given path was rejected before anything happened.
    InvalidPath,
}

impl Outcome {
    pub fn exit_code(self) -> ExitCode {
        match self {
            Outcome::Success => ExitCode::SUCCESS,
            Outcome::PartialFailure => ExitCode::from(1),
            Outcome::InvalidPath => ExitCode::from(2),
        }
    }
}

/// Runs a command, loading configuration from `config_path` or the usual
/// locations.
///
/// # Examples
///
/// ```no_run
/// use orgafile::cli::{run_cli, Command};
///
/// let command = Command::Organize { path: "/home/me/Descargas".into(), dry_run: true };
/// match run_cli(&command, None) {
///     Ok(outcome) => println!("{:?}", outcome),
///     Err(e) => eprintln!("Error: {:#}", e),
/// }
/// ```
pub fn run_cli(command: &Command, config_path: Option<&Path>) -> anyhow::Result<Outcome> {
    let config = Config::load(config_path).context("Error loading configuration")?;
    run_cli_with_config(command, &config)
}

/// Runs a command with an already loaded configuration.
pub fn run_cli_with_config(command: &Command, config: &Config) -> anyhow::Result<Outcome> {
    match command {
        Command::Organize { path, dry_run } => {
            let Some(root) = validated_root(path) else {
                return Ok(Outcome::InvalidPath);
            };
            if *dry_run {
                organize_directory_dry_run(&root, config)
            } else {
                organize_directory(&root, config)
            }
        }
        Command::Heavy {
            path,
            limit,
            plain,
            json,
        } => {
            let Some(root) = validated_root(path) else {
                return Ok(Outcome::InvalidPath);
            };
            let style = if *json {
                ListingStyle::Json
            } else if *plain {
                ListingStyle::Plain
            } else {
                ListingStyle::Styled
            };
            list_heavy_files(&root, limit.unwrap_or(config.scan.limit), style)
        }
    }
}

fn validated_root(input: &str) -> Option<PathBuf> {
    match fs_ops::resolve_root(input) {
        Ok(root) => Some(root),
        Err(e) => {
            debug!("{}", e);
            OutputFormatter::error(InvalidPathError::USER_MESSAGE);
            None
        }
    }
}

/// Organizes files in a directory into today's category folders.
///
/// Prints one line per file, the outcome message, and a summary table.
pub fn organize_directory(base_path: &Path, config: &Config) -> anyhow::Result<Outcome> {
    let filters = config
        .compile_filters()
        .context("Error compiling filters")?;
    let organizer = FileOrganizer::new(filters);

    OutputFormatter::info(&format!("Organizing contents of: {}", base_path.display()));

    let report = match organizer.organize(base_path) {
        Ok(report) => report,
        Err(OrganizeError::InvalidPath(e)) => {
            debug!("{}", e);
            OutputFormatter::error(InvalidPathError::USER_MESSAGE);
            return Ok(Outcome::InvalidPath);
        }
        Err(e) => return Err(e.into()),
    };

    for file_move in &report.moved {
        OutputFormatter::success(&format!(
            "{} → {}/",
            file_move
                .original_path
                .file_name()
                .unwrap_or_default()
                .to_string_lossy(),
            file_move.category.dir_name()
        ));
    }
    for failure in &report.failed {
        OutputFormatter::error(&failure.error.to_string());
    }
    if !report.skipped.is_empty() {
        OutputFormatter::info(&format!(
            "{} file(s) left in place by filters",
            report.skipped.len()
        ));
    }

    OutputFormatter::summary_table(&report.category_counts(), report.moved.len());
    OutputFormatter::plain(&format!(
        "\nDestination: {} (run at {})",
        report.destination_root.display(),
        report.created.format("%H:%M:%S")
    ));

    if report.is_complete_success() {
        OutputFormatter::success(&report.outcome_message());
        Ok(Outcome::Success)
    } else {
        OutputFormatter::warning(&report.outcome_message());
        Ok(Outcome::PartialFailure)
    }
}

/// Shows what `organize_directory` would do without making any changes.
pub fn organize_directory_dry_run(base_path: &Path, config: &Config) -> anyhow::Result<Outcome> {
    let filters = config
        .compile_filters()
        .context("Error compiling filters")?;
    let organizer = FileOrganizer::new(filters);

    OutputFormatter::dry_run_notice(&format!("Analyzing contents of: {}", base_path.display()));

    let plan = organizer.plan(base_path)?;
    if plan.is_empty() {
        OutputFormatter::plain("No files found to organize.");
        return Ok(Outcome::Success);
    }

    for file_move in &plan {
        OutputFormatter::plain(&format!(
            " - {}\n   → Would move to {}",
            file_move.original_path.display(),
            file_move.new_path.display()
        ));
    }

    OutputFormatter::summary_table(&count_by_category(&plan), plan.len());
    OutputFormatter::success("Dry run complete. No files were modified.");

    Ok(Outcome::Success)
}

/// Prints the `limit` largest files under `root`.
pub fn list_heavy_files(root: &Path, limit: usize, style: ListingStyle) -> anyhow::Result<Outcome> {
    let result = find_heaviest(root, limit)?;
    print!("{}", OutputFormatter::heavy_files(&result, style));
    if style == ListingStyle::Json {
        println!();
    }
    if result.unreadable() > 0 && style != ListingStyle::Json {
        OutputFormatter::warning(&format!(
            "{} entries could not be read and were skipped",
            result.unreadable()
        ));
    }
    Ok(Outcome::Success)
}
