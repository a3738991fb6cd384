//! File filtering by extension suffix and excluded directory names.

use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::path::Path;

/// Extensions scanned when none are configured.
pub const DEFAULT_EXTENSIONS: &[&str] = &[".java", ".xml"];

/// Build, output, and dependency folders that are never descended into.
pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &["target", ".idea", ".mvn", "node_modules", "build"];

/// Case-sensitive suffix filter over file names.
///
/// Suffixes are compared verbatim against the end of the file name, so
/// `.java` matches `Main.java` but not `Main.JAVA`, and `Makefile` can be
/// listed as a suffix to pick up files with no extension at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionFilter {
    suffixes: BTreeSet<String>,
}

impl Default for ExtensionFilter {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSIONS.iter().copied())
    }
}

impl ExtensionFilter {
    /// Create a filter from a set of suffixes.
    pub fn new<I, S>(suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            suffixes: suffixes
                .into_iter()
                .map(Into::into)
                .filter(|s: &String| !s.is_empty())
                .collect(),
        }
    }

    /// Parse user-supplied extensions, adding a leading dot when missing.
    ///
    /// `"rs"` and `".rs"` both become `.rs`.
    pub fn from_user<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(extensions.into_iter().filter_map(|ext| {
            let ext = ext.as_ref().trim();
            if ext.is_empty() {
                None
            } else if ext.starts_with('.') {
                Some(ext.to_string())
            } else {
                Some(format!(".{ext}"))
            }
        }))
    }

    /// Configured suffixes, sorted.
    pub fn suffixes(&self) -> impl Iterator<Item = &str> {
        self.suffixes.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.suffixes.is_empty()
    }

    /// Check whether a file name ends with one of the suffixes.
    pub fn matches_name(&self, name: &str) -> bool {
        self.suffixes.iter().any(|suffix| name.ends_with(suffix.as_str()))
    }

    /// Check a path by its final component.
    pub fn matches(&self, path: &Path) -> bool {
        path.file_name()
            .map(|name| self.matches_name(&name.to_string_lossy()))
            .unwrap_or(false)
    }
}

/// Set of directory names pruned from traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcludedDirs {
    names: BTreeSet<String>,
}

impl Default for ExcludedDirs {
    fn default() -> Self {
        Self::new(DEFAULT_EXCLUDED_DIRS.iter().copied())
    }
}

impl ExcludedDirs {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// No exclusions at all.
    pub fn none() -> Self {
        Self {
            names: BTreeSet::new(),
        }
    }

    /// Add more names to the set.
    pub fn extend<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names.extend(names.into_iter().map(Into::into));
    }

    /// Check whether a directory name is excluded (exact match).
    pub fn contains(&self, name: &OsStr) -> bool {
        self.names.contains(name.to_string_lossy().as_ref())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}
