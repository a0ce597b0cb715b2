//! Extension-based file categorization.
//!
//! This module maps a file name to one of the fixed categories used to build
//! the organization tree. Matching is a plain, case-sensitive suffix test
//! against the file name, evaluated in table order, with `Otros` as the
//! catch-all.
//!
//! # Examples
//!
//! ```
//! use orgafile::file_category::{Category, CategoryTable};
//!
//! let table = CategoryTable::default();
//! assert_eq!(table.resolve("report.pdf"), Category::Document);
//! assert_eq!(table.resolve("holiday.png"), Category::Image);
//! assert_eq!(table.resolve("notes.unknownext"), Category::Other);
//! ```

/// Represents one of the folders files are sorted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Documents (PDF, DOCX, TXT, XLSX)
    Document,
    /// Images (JPG, PNG, GIF, BMP)
    Image,
    /// Videos (MP4, AVI, MKV, MOV)
    Video,
    /// Compressed archives (ZIP, RAR, 7Z, TAR)
    Archive,
    /// Installers and executables (EXE, MSI, DMG, APK)
    Program,
    /// Anything that matched no other category
    Other,
}

impl Category {
    /// Returns the folder name for this category.
    ///
    /// # Examples
    ///
    /// ```
    /// use orgafile::file_category::Category;
    ///
    /// assert_eq!(Category::Document.dir_name(), "Documentos");
    /// assert_eq!(Category::Image.dir_name(), "Imágenes");
    /// assert_eq!(Category::Other.dir_name(), "Otros");
    /// ```
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Document => "Documentos",
            Category::Image => "Imágenes",
            Category::Video => "Videos",
            Category::Archive => "Comprimidos",
            Category::Program => "Programas",
            Category::Other => "Otros",
        }
    }

    /// Whether this is the category used when no extension matches.
    pub fn is_catch_all(&self) -> bool {
        matches!(self, Category::Other)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Declaration order matters: the first rule whose suffix matches wins, and
/// the catch-all must stay last with no extensions.
const STANDARD_RULES: &[(Category, &[&str])] = &[
    (Category::Document, &[".pdf", ".docx", ".txt", ".xlsx"]),
    (Category::Image, &[".jpg", ".png", ".gif", ".bmp"]),
    (Category::Video, &[".mp4", ".avi", ".mkv", ".mov"]),
    (Category::Archive, &[".zip", ".rar", ".7z", ".tar"]),
    (Category::Program, &[".exe", ".msi", ".dmg", ".apk"]),
    (Category::Other, &[]),
];

/// Ordered mapping from category to the file-name suffixes it claims.
///
/// The table is fixed; there is no way to add or change rules at runtime.
#[derive(Debug, Clone, Copy)]
pub struct CategoryTable {
    rules: &'static [(Category, &'static [&'static str])],
}

impl CategoryTable {
    /// Creates the standard table.
    pub fn new() -> Self {
        Self {
            rules: STANDARD_RULES,
        }
    }

    /// Iterates over every category in declaration order, catch-all last.
    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.rules.iter().map(|(category, _)| *category)
    }

    /// Returns the suffixes claimed by a category. Empty for the catch-all.
    pub fn extensions(&self, category: Category) -> &'static [&'static str] {
        self.rules
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, exts)| *exts)
            .unwrap_or(&[])
    }

    /// Resolves the category of a file name (not a path).
    ///
    /// The test is `file_name.ends_with(ext)` for each rule in order. It is
    /// case-sensitive and looks at trailing characters only, so
    /// `report.docx.bak` and `photo.PNG` both end up in the catch-all.
    ///
    /// # Examples
    ///
    /// ```
    /// use orgafile::file_category::{Category, CategoryTable};
    ///
    /// let table = CategoryTable::default();
    /// assert_eq!(table.resolve("backup.tar"), Category::Archive);
    /// assert_eq!(table.resolve("setup.exe"), Category::Program);
    /// assert_eq!(table.resolve("photo.PNG"), Category::Other);
    /// ```
    pub fn resolve(&self, file_name: &str) -> Category {
        self.rules
            .iter()
            .find(|(_, exts)| exts.iter().any(|ext| file_name.ends_with(ext)))
            .map(|(category, _)| *category)
            .unwrap_or(Category::Other)
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_dir_names() {
        assert_eq!(Category::Document.dir_name(), "Documentos");
        assert_eq!(Category::Image.dir_name(), "Imágenes");
        assert_eq!(Category::Video.dir_name(), "Videos");
        assert_eq!(Category::Archive.dir_name(), "Comprimidos");
        assert_eq!(Category::Program.dir_name(), "Programas");
        assert_eq!(Category::Other.dir_name(), "Otros");
    }

    #[test]
    fn test_categories_in_declaration_order() {
        let table = CategoryTable::default();
        let order: Vec<_> = table.categories().collect();
        assert_eq!(
            order,
            vec![
                Category::Document,
                Category::Image,
                Category::Video,
                Category::Archive,
                Category::Program,
                Category::Other,
            ]
        );
    }

    #[test]
    fn test_exactly_one_catch_all_with_no_extensions() {
        let table = CategoryTable::default();
        let catch_all: Vec<_> = table.categories().filter(|c| c.is_catch_all()).collect();
        assert_eq!(catch_all, vec![Category::Other]);
        assert!(table.extensions(Category::Other).is_empty());
    }

    #[test]
    fn test_resolve_every_declared_extension() {
        let table = CategoryTable::default();
        for category in table.categories() {
            for ext in table.extensions(category) {
                let name = format!("file{}", ext);
                assert_eq!(table.resolve(&name), category, "{}", name);
            }
        }
    }

    #[test]
    fn test_resolve_unknown_goes_to_other() {
        let table = CategoryTable::default();
        assert_eq!(table.resolve("b.unknownext"), Category::Other);
        assert_eq!(table.resolve("Makefile"), Category::Other);
        assert_eq!(table.resolve(""), Category::Other);
    }

    #[test]
    fn test_resolve_is_case_sensitive() {
        let table = CategoryTable::default();
        assert_eq!(table.resolve("scan.PDF"), Category::Other);
        assert_eq!(table.resolve("scan.pdf"), Category::Document);
    }

    #[test]
    fn test_resolve_uses_trailing_characters_only() {
        let table = CategoryTable::default();
        assert_eq!(table.resolve("report.docx.bak"), Category::Other);
        assert_eq!(table.resolve("archive.tar.gz"), Category::Other);
        assert_eq!(table.resolve("old.report.docx"), Category::Document);
    }

    #[test]
    fn test_resolve_suffix_without_dot_separator() {
        // ".txt" is matched as a suffix, so a bare name ending in it still counts
        let table = CategoryTable::default();
        assert_eq!(table.resolve(".txt"), Category::Document);
    }
}
