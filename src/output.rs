//! Output formatting and styling module.
//!
//! Everything the command line prints goes through here. The core modules
//! return structured results; this module turns them into text, either plain,
//! coloured, or JSON.

use crate::file_category::Category;
use crate::heavy_files::RankedResult;
use colored::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Heading printed above the heavy-file listing.
pub const HEAVY_FILES_HEADER: &str = "Archivos más pesados en la carpeta:";

/// How a heavy-file listing should be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingStyle {
    /// Bare text, no escape codes.
    Plain,
    /// Bold names and coloured sizes/locations.
    Styled,
    /// Machine-readable JSON.
    Json,
}

/// Manages all CLI output with consistent styling and formatting.
///
/// This struct provides methods for:
/// - Success messages (green with ✓)
/// - Error messages (red with ✗)
/// - Warning messages (yellow with ⚠)
/// - Info messages (cyan)
/// - Summary tables with statistics
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use orgafile::output::OutputFormatter;
    /// OutputFormatter::success("Archivos organizados correctamente.");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a regular message without styling.
    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }

    /// Prints a summary table with file counts by category.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use orgafile::file_category::Category;
    /// use orgafile::output::OutputFormatter;
    /// use std::collections::BTreeMap;
    ///
    /// let mut counts = BTreeMap::new();
    /// counts.insert(Category::Document, 15);
    /// counts.insert(Category::Image, 8);
    /// OutputFormatter::summary_table(&counts, 23);
    /// ```
    pub fn summary_table(category_counts: &BTreeMap<Category, usize>, total_files: usize) {
        Self::header("SUMMARY");

        let max_category_len = category_counts
            .keys()
            .map(|category| category.dir_name().chars().count())
            .max()
            .unwrap_or(0)
            .max(8); // At least "Category" width

        println!(
            "{:<width$} | {}",
            "Category".bold(),
            "Files".bold(),
            width = max_category_len
        );
        println!("{}", "-".repeat(max_category_len + 10));

        for (category, count) in category_counts {
            println!(
                "{:<width$} | {} {}",
                category.dir_name(),
                count.to_string().green(),
                plural_files(*count),
                width = max_category_len
            );
        }

        println!("{}", "-".repeat(max_category_len + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total_files.to_string().green().bold(),
            plural_files(total_files),
            width = max_category_len
        );
    }

    /// Renders a heavy-file listing in the requested style.
    pub fn heavy_files(result: &RankedResult, style: ListingStyle) -> String {
        match style {
            ListingStyle::Plain => heavy_files_plain(result),
            ListingStyle::Styled => heavy_files_styled(result),
            ListingStyle::Json => heavy_files_json(result),
        }
    }
}

fn plural_files(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}

/// Formats a byte count as megabytes with two decimals.
///
/// # Examples
///
/// ```
/// use orgafile::output::format_size_mb;
///
/// assert_eq!(format_size_mb(0), "0.00 MB");
/// assert_eq!(format_size_mb(1024 * 1024), "1.00 MB");
/// assert_eq!(format_size_mb(1536 * 1024), "1.50 MB");
/// ```
pub fn format_size_mb(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
}

/// Plain-text listing: name and size on one line, location on the next.
pub fn heavy_files_plain(result: &RankedResult) -> String {
    let mut out = format!("{}\n\n", HEAVY_FILES_HEADER);
    for entry in result {
        let _ = writeln!(out, "{} - {}", entry.file_name(), format_size_mb(entry.size));
        let _ = writeln!(out, "Ubicación: {}\n", entry.parent_dir().display());
    }
    out
}

/// Coloured listing for terminals.
pub fn heavy_files_styled(result: &RankedResult) -> String {
    let mut out = format!("{}\n\n", HEAVY_FILES_HEADER.bold());
    for entry in result {
        let _ = writeln!(
            out,
            "{} {}",
            entry.file_name().bold(),
            format!("- {}", format_size_mb(entry.size)).yellow()
        );
        let _ = writeln!(
            out,
            "{}\n",
            format!("Ubicación: {}", entry.parent_dir().display()).cyan()
        );
    }
    out
}

#[derive(Serialize)]
struct JsonEntry {
    name: String,
    size_bytes: u64,
    size_mb: String,
    location: String,
}

#[derive(Serialize)]
struct JsonListing {
    files: Vec<JsonEntry>,
    files_scanned: usize,
    unreadable: usize,
}

/// JSON listing with name, bytes, megabytes and location per entry.
pub fn heavy_files_json(result: &RankedResult) -> String {
    let listing = JsonListing {
        files: result
            .iter()
            .map(|entry| JsonEntry {
                name: entry.file_name(),
                size_bytes: entry.size,
                size_mb: format!("{:.2}", entry.size_mb()),
                location: entry.parent_dir().to_string_lossy().into_owned(),
            })
            .collect(),
        files_scanned: result.files_scanned(),
        unreadable: result.unreadable(),
    };

    serde_json::to_string_pretty(&listing).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heavy_files::find_heaviest;
    use std::fs;
    use tempfile::TempDir;

    fn sample_result() -> (TempDir, RankedResult) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(temp_dir.path().join("big.iso"), vec![0u8; 3 * 1024 * 1024]).unwrap();
        fs::write(temp_dir.path().join("small.txt"), vec![0u8; 10]).unwrap();
        let result = find_heaviest(temp_dir.path(), 10).expect("Scan failed");
        (temp_dir, result)
    }

    #[test]
    fn test_format_size_mb_rounds_to_two_decimals() {
        assert_eq!(format_size_mb(10), "0.00 MB");
        assert_eq!(format_size_mb(500 * 1024 * 1024), "500.00 MB");
        assert_eq!(format_size_mb(1_234_567), "1.18 MB");
    }

    #[test]
    fn test_heavy_files_plain_layout() {
        let (temp_dir, result) = sample_result();
        let text = heavy_files_plain(&result);

        let expected = format!(
            "Archivos más pesados en la carpeta:\n\n\
             big.iso - 3.00 MB\nUbicación: {dir}\n\n\
             small.txt - 0.00 MB\nUbicación: {dir}\n\n",
            dir = temp_dir.path().display()
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn test_heavy_files_plain_empty() {
        let text = heavy_files_plain(&RankedResult::default());
        assert_eq!(text, "Archivos más pesados en la carpeta:\n\n");
    }

    #[test]
    fn test_heavy_files_json_is_structured() {
        let (_temp_dir, result) = sample_result();
        let text = OutputFormatter::heavy_files(&result, ListingStyle::Json);

        let value: serde_json::Value = serde_json::from_str(&text).expect("Invalid JSON");
        assert_eq!(value["files"][0]["name"], "big.iso");
        assert_eq!(value["files"][0]["size_bytes"], 3 * 1024 * 1024);
        assert_eq!(value["files"][0]["size_mb"], "3.00");
        assert_eq!(value["files_scanned"], 2);
    }

    #[test]
    fn test_heavy_files_styled_contains_plain_content() {
        colored::control::set_override(false);
        let (_temp_dir, result) = sample_result();
        let styled = heavy_files_styled(&result);
        assert_eq!(styled, heavy_files_plain(&result));
        colored::control::unset_override();
    }
}
