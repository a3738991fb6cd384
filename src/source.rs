//! Collected source files.
//!
//! A [`Document`] is the ordered list of files the walker picked up, each
//! held as a [`FileSection`] of raw text lines.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// One collected file: its path and its lines without line terminators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileSection {
    pub path: PathBuf,
    pub lines: Vec<String>,
}

impl FileSection {
    pub fn new(path: impl Into<PathBuf>, lines: Vec<String>) -> Self {
        Self {
            path: path.into(),
            lines,
        }
    }

    /// Build a section by splitting already-decoded text into lines.
    pub fn from_text(path: impl Into<PathBuf>, text: &str) -> Self {
        Self::new(path, split_lines(text))
    }

    /// Read a file from disk, decoding it leniently.
    pub fn read(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        Ok(Self::from_text(path, &decode_lossy(&bytes)))
    }

    /// Path as shown in page headers.
    pub fn display_path(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

/// Ordered collection of file sections, in traversal order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Document {
    sections: Vec<FileSection>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, section: FileSection) {
        self.sections.push(section);
    }

    pub fn sections(&self) -> &[FileSection] {
        &self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Total number of lines across all files.
    pub fn line_count(&self) -> usize {
        self.sections.iter().map(|s| s.lines.len()).sum()
    }

    /// Order sections by path.
    pub fn sort_by_path(&mut self) {
        self.sections.sort_by(|a, b| a.path.cmp(&b.path));
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.sections.iter().map(|s| s.path.as_path())
    }
}

impl FromIterator<FileSection> for Document {
    fn from_iter<I: IntoIterator<Item = FileSection>>(iter: I) -> Self {
        Self {
            sections: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Document {
    type Item = FileSection;
    type IntoIter = std::vec::IntoIter<FileSection>;

    fn into_iter(self) -> Self::IntoIter {
        self.sections.into_iter()
    }
}

/// Decode bytes as UTF-8, replacing invalid sequences with U+FFFD.
pub fn decode_lossy(bytes: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(bytes)
}

/// Split text into lines, dropping `\n` and `\r\n` terminators.
///
/// A trailing terminator does not produce an extra empty line.
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines().map(str::to_owned).collect()
}
