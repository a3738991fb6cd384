//! Directory traversal and source collection.
//!
//! Uses the `ignore` crate to walk directories. By default every file is
//! visited (hidden files included, ignore files not consulted) except the
//! contents of excluded directories, which are pruned before descent.
//! Gitignore-style filtering is opt-in through [`WalkOptions`].

use std::io;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use thiserror::Error;

use crate::filter::{ExcludedDirs, ExtensionFilter};
use crate::source::{Document, FileSection};

/// Name of the optional ignore file read from the scan root.
pub const IGNORE_FILE: &str = ".codepressignore";

/// Errors that can occur during directory walking.
#[derive(Debug, Error)]
pub enum WalkError {
    #[error("path not found: {path}")]
    NotFound { path: PathBuf },

    #[error("permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("symlink loop detected: {path}")]
    SymlinkLoop { path: PathBuf },
}

impl WalkError {
    /// Path the error refers to.
    pub fn path(&self) -> &Path {
        match self {
            WalkError::NotFound { path }
            | WalkError::PermissionDenied { path }
            | WalkError::Io { path, .. }
            | WalkError::SymlinkLoop { path } => path,
        }
    }
}

/// Options for directory walking.
#[derive(Debug, Clone)]
pub struct WalkOptions {
    /// Maximum depth to recurse (None = unlimited).
    pub max_depth: Option<usize>,
    /// Follow symbolic links.
    pub follow_symlinks: bool,
    /// Include hidden files and directories.
    pub include_hidden: bool,
    /// Respect .gitignore patterns and the root `.codepressignore`.
    pub respect_gitignore: bool,
    /// Directory names whose subtrees are never visited.
    pub excluded_dirs: ExcludedDirs,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            max_depth: None,
            follow_symlinks: false,
            include_hidden: true,
            respect_gitignore: false,
            excluded_dirs: ExcludedDirs::default(),
        }
    }
}

impl WalkOptions {
    /// Options that skip hidden files and honour ignore files.
    pub fn gitignore_aware() -> Self {
        Self {
            include_hidden: false,
            respect_gitignore: true,
            ..Default::default()
        }
    }

    /// Set maximum depth.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Replace the excluded directory set.
    pub fn excluded_dirs(mut self, excluded: ExcludedDirs) -> Self {
        self.excluded_dirs = excluded;
        self
    }
}

/// Entry from directory walk.
#[derive(Debug, Clone)]
pub struct WalkEntry {
    /// Path to the entry.
    pub path: PathBuf,
    /// Depth from root (root = 0).
    pub depth: usize,
    /// Whether this is a file or directory.
    pub is_file: bool,
}

/// Walk a directory tree with default options, yielding entries.
pub fn walk(root: &Path) -> impl Iterator<Item = Result<WalkEntry, WalkError>> {
    walk_with_options(root, &WalkOptions::default())
}

/// Walk a directory tree with custom options.
///
/// # Examples
///
/// ```no_run
/// use codepress::walker::{walk_with_options, WalkOptions};
/// use std::path::Path;
///
/// for entry in walk_with_options(Path::new("."), &WalkOptions::default()).flatten() {
///     println!("{}", entry.path.display());
/// }
/// ```
pub fn walk_with_options(
    root: &Path,
    options: &WalkOptions,
) -> impl Iterator<Item = Result<WalkEntry, WalkError>> {
    let root = root.to_path_buf();

    if !root.exists() {
        return itertools_lite::Either::Left(std::iter::once(Err(WalkError::NotFound {
            path: root,
        })));
    }

    let mut builder = WalkBuilder::new(&root);

    builder
        .standard_filters(false)
        .hidden(!options.include_hidden)
        .git_ignore(options.respect_gitignore)
        .git_global(options.respect_gitignore)
        .git_exclude(options.respect_gitignore)
        .ignore(options.respect_gitignore)
        .parents(options.respect_gitignore)
        .follow_links(options.follow_symlinks)
        .max_depth(options.max_depth);

    if options.respect_gitignore {
        let ignore_file = root.join(IGNORE_FILE);
        if ignore_file.exists() {
            builder.add_ignore(&ignore_file);
        }
    }

    let excluded = options.excluded_dirs.clone();
    builder.filter_entry(move |entry| {
        let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
        !(entry.depth() > 0 && is_dir && excluded.contains(entry.file_name()))
    });

    itertools_lite::Either::Right(builder.build().filter_map(|result| match result {
        Ok(entry) => Some(Ok(WalkEntry {
            path: entry.path().to_path_buf(),
            depth: entry.depth(),
            is_file: entry.file_type().is_some_and(|ft| ft.is_file()),
        })),
        Err(e) => convert_error(e, None).map(Err),
    }))
}

/// Convert an `ignore` error, keeping the innermost path it carries.
///
/// Non-IO errors (like gitignore parse errors) are dropped.
fn convert_error(err: ignore::Error, path: Option<PathBuf>) -> Option<WalkError> {
    match err {
        ignore::Error::WithPath { path, err } => convert_error(*err, Some(path)),
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            convert_error(*err, path)
        }
        ignore::Error::Loop { child, .. } => Some(WalkError::SymlinkLoop { path: child }),
        ignore::Error::Io(source) => {
            let path = path.unwrap_or_else(|| PathBuf::from("<walk error>"));
            if source.kind() == io::ErrorKind::PermissionDenied {
                Some(WalkError::PermissionDenied { path })
            } else {
                Some(WalkError::Io { path, source })
            }
        }
        _ => None,
    }
}

/// Progress notifications emitted while collecting.
#[derive(Debug)]
pub enum ScanEvent<'a> {
    /// A matching file was read and added to the document.
    Included { path: &'a Path },
    /// A matching file could not be read and was skipped.
    Failed { path: &'a Path, error: &'a io::Error },
    /// The walker could not enter part of the tree.
    WalkFailed { error: &'a WalkError },
}

/// A file that matched the filter but was left out.
#[derive(Debug)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub error: io::Error,
}

/// Result of a collection run.
#[derive(Debug, Default)]
pub struct Collected {
    /// Files read successfully, in traversal order.
    pub document: Document,
    /// Matching files that could not be read.
    pub skipped: Vec<SkippedFile>,
    /// Parts of the tree the walker could not visit.
    pub walk_errors: Vec<WalkError>,
}

/// Collect all files under `root` accepted by `filter`.
///
/// Per-file read failures are reported through `on_event` and recorded in
/// [`Collected::skipped`]; they never abort the scan. Only a missing root
/// is returned as an error.
pub fn collect_sources<F>(
    root: &Path,
    options: &WalkOptions,
    filter: &ExtensionFilter,
    mut on_event: F,
) -> Result<Collected, WalkError>
where
    F: FnMut(ScanEvent<'_>),
{
    if !root.exists() {
        return Err(WalkError::NotFound {
            path: root.to_path_buf(),
        });
    }

    let mut collected = Collected::default();

    for result in walk_with_options(root, options) {
        let entry = match result {
            Ok(entry) => entry,
            Err(error) => {
                log::warn!("walk error: {error}");
                on_event(ScanEvent::WalkFailed { error: &error });
                collected.walk_errors.push(error);
                continue;
            }
        };

        if !entry.is_file || !filter.matches(&entry.path) {
            continue;
        }

        match FileSection::read(&entry.path) {
            Ok(section) => {
                log::debug!("read {} ({} lines)", entry.path.display(), section.lines.len());
                on_event(ScanEvent::Included { path: &entry.path });
                collected.document.push(section);
            }
            Err(error) => {
                log::warn!("skipping {}: {error}", entry.path.display());
                on_event(ScanEvent::Failed {
                    path: &entry.path,
                    error: &error,
                });
                collected.skipped.push(SkippedFile {
                    path: entry.path,
                    error,
                });
            }
        }
    }

    log::info!(
        "collected {} files ({} skipped) under {}",
        collected.document.len(),
        collected.skipped.len(),
        root.display()
    );

    Ok(collected)
}

/// Simple Either type to avoid adding itertools dependency.
mod itertools_lite {
    pub enum Either<L, R> {
        Left(L),
        Right(R),
    }

    impl<L, R, T> Iterator for Either<L, R>
    where
        L: Iterator<Item = T>,
        R: Iterator<Item = T>,
    {
        type Item = T;

        fn next(&mut self) -> Option<Self::Item> {
            match self {
                Either::Left(l) => l.next(),
                Either::Right(r) => r.next(),
            }
        }
    }
}
