//! Fluent builder API for codepress.
//!
//! Composes collection, pagination, and PDF output.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::errors::CodepressError;
use crate::filter::{ExcludedDirs, ExtensionFilter};
use crate::layout::{paginate, Page, PageSetup};
use crate::output::{write_pdf, PdfOptions};
use crate::walker::{collect_sources, Collected, ScanEvent, WalkOptions};

/// Builder for rendering a codebase to PDF.
///
/// # Examples
///
/// ```no_run
/// use codepress::builder::Codepress;
///
/// let result = Codepress::new("./project")
///     .extensions(["rs", "toml"])
///     .sort(true)
///     .build()
///     .unwrap();
///
/// result.write_pdf("project.pdf").unwrap();
/// println!("{} files on {} pages", result.collected.document.len(), result.pages.len());
/// ```
pub struct Codepress {
    root: PathBuf,
    filter: ExtensionFilter,
    walk_options: WalkOptions,
    setup: PageSetup,
    pdf_options: PdfOptions,
    sort: bool,
}

impl Codepress {
    /// Create a new builder for the given root path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            filter: ExtensionFilter::default(),
            walk_options: WalkOptions::default(),
            setup: PageSetup::default(),
            pdf_options: PdfOptions::default(),
            sort: false,
        }
    }

    /// Only include files ending with these suffixes (leading dot optional).
    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.filter = ExtensionFilter::from_user(extensions);
        self
    }

    /// Prune these directory names in addition to the defaults.
    pub fn exclude<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.walk_options.excluded_dirs.extend(names);
        self
    }

    /// Replace the excluded directory set entirely.
    pub fn excluded_dirs(mut self, excluded: ExcludedDirs) -> Self {
        self.walk_options.excluded_dirs = excluded;
        self
    }

    /// Include hidden files (default: true).
    pub fn include_hidden(mut self, include: bool) -> Self {
        self.walk_options.include_hidden = include;
        self
    }

    /// Honour .gitignore and .codepressignore files.
    pub fn respect_gitignore(mut self, respect: bool) -> Self {
        self.walk_options.respect_gitignore = respect;
        self
    }

    /// Follow symbolic links.
    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.walk_options.follow_symlinks = follow;
        self
    }

    /// Set maximum directory depth.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.walk_options.max_depth = Some(depth);
        self
    }

    /// Sort files by path instead of keeping traversal order.
    pub fn sort(mut self, sort: bool) -> Self {
        self.sort = sort;
        self
    }

    /// Page geometry and fonts.
    pub fn page_setup(mut self, setup: PageSetup) -> Self {
        self.setup = setup;
        self
    }

    /// Title stored in the PDF metadata.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.pdf_options.title = Some(title.into());
        self
    }

    /// Collect files only (no layout).
    pub fn collect(&self) -> Result<Collected, CodepressError> {
        self.collect_with(|_| {})
    }

    /// Collect files, reporting progress through `on_event`.
    pub fn collect_with<F>(&self, on_event: F) -> Result<Collected, CodepressError>
    where
        F: FnMut(ScanEvent<'_>),
    {
        if !self.root.exists() {
            return Err(CodepressError::PathNotFound(self.root.clone()));
        }

        let mut collected = collect_sources(&self.root, &self.walk_options, &self.filter, on_event)?;
        if self.sort {
            collected.document.sort_by_path();
        }
        Ok(collected)
    }

    /// Collect and lay out.
    pub fn build(self) -> Result<CodepressResult, CodepressError> {
        self.build_with(|_| {})
    }

    /// Collect and lay out, reporting collection progress through `on_event`.
    ///
    /// The page setup is checked before anything is read.
    pub fn build_with<F>(self, on_event: F) -> Result<CodepressResult, CodepressError>
    where
        F: FnMut(ScanEvent<'_>),
    {
        self.setup.validate()?;
        let collected = self.collect_with(on_event)?;
        let pages = paginate(&collected.document, &self.setup);

        Ok(CodepressResult {
            collected,
            pages,
            setup: self.setup,
            pdf_options: self.pdf_options,
        })
    }
}

/// Result of a codepress run.
#[derive(Debug)]
pub struct CodepressResult {
    /// Collected files and skipped ones.
    pub collected: Collected,
    /// Laid-out pages.
    pub pages: Vec<Page>,
    setup: PageSetup,
    pdf_options: PdfOptions,
}

impl CodepressResult {
    /// Layout used for the pages.
    pub fn setup(&self) -> &PageSetup {
        &self.setup
    }

    /// Write the pages as a PDF, returning the number of bytes written.
    pub fn write_pdf(&self, path: impl AsRef<Path>) -> Result<u64, CodepressError> {
        Ok(write_pdf(path.as_ref(), &self.pages, &self.setup, &self.pdf_options)?)
    }

    /// Machine-readable summary of the run.
    pub fn summary(&self, output: Option<&Path>) -> RunSummary {
        RunSummary {
            output: output.map(|p| p.display().to_string()),
            files: self
                .collected
                .document
                .sections()
                .iter()
                .map(|s| FileSummary {
                    path: s.path.display().to_string(),
                    lines: s.lines.len(),
                })
                .collect(),
            skipped: self
                .collected
                .skipped
                .iter()
                .map(|s| SkippedSummary {
                    path: s.path.display().to_string(),
                    error: s.error.to_string(),
                })
                .collect(),
            unvisited: self
                .collected
                .walk_errors
                .iter()
                .map(|e| SkippedSummary {
                    path: e.path().display().to_string(),
                    error: e.to_string(),
                })
                .collect(),
            pages: self.pages.len(),
            total_lines: self.collected.document.line_count(),
            setup: self.setup,
        }
    }
}

/// Summary printed by `--json`.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    pub files: Vec<FileSummary>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedSummary>,
    /// Directories the walker could not enter.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unvisited: Vec<SkippedSummary>,
    pub pages: usize,
    pub total_lines: usize,
    pub setup: PageSetup,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileSummary {
    pub path: String,
    pub lines: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedSummary {
    pub path: String,
    pub error: String,
}

// ============================================================================
// Functional API
// ============================================================================

/// Render every default-extension file under `root` into a PDF at `output`.
///
/// # Examples
///
/// ```no_run
/// use codepress::builder::pdf_from_path;
///
/// let pages = pdf_from_path("./project", "project.pdf").unwrap();
/// println!("{pages} pages");
/// ```
pub fn pdf_from_path(
    root: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> Result<usize, CodepressError> {
    let result = Codepress::new(root.as_ref()).build()?;
    result.write_pdf(output)?;
    Ok(result.pages.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutError;
    use crate::metrics::{FontSpec, StandardFont};
    use crate::walker::WalkError;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_project() -> TempDir {
        let dir = TempDir::new().unwrap();

        fs::create_dir_all(dir.path().join("src/main/java")).unwrap();
        fs::write(
            dir.path().join("src/main/java/App.java"),
            r#"
public class App {
    public static void main(String[] args) {
        System.out.println("Hello");
    }
}
"#,
        )
        .unwrap();
        fs::write(dir.path().join("pom.xml"), "<project/>\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "not included\n").unwrap();
        fs::create_dir_all(dir.path().join("target")).unwrap();
        fs::write(dir.path().join("target/Gen.java"), "class Gen {}").unwrap();

        dir
    }

    #[test]
    fn test_builder_defaults() {
        let dir = create_test_project();

        let result = Codepress::new(dir.path()).build().unwrap();

        assert_eq!(result.collected.document.len(), 2);
        assert_eq!(result.pages.len(), 1);
        assert!(!result.pages[0].runs.is_empty());
    }

    #[test]
    fn test_builder_extensions() {
        let dir = create_test_project();

        let collected = Codepress::new(dir.path()).extensions(["txt"]).collect().unwrap();
        let paths: Vec<_> = collected.document.paths().collect();
        assert_eq!(paths.len(), 1);
        assert!(paths[0].ends_with("notes.txt"));
    }

    #[test]
    fn test_builder_extra_exclusions() {
        let dir = create_test_project();

        let collected = Codepress::new(dir.path()).exclude(["src"]).collect().unwrap();
        let paths: Vec<_> = collected.document.paths().collect();
        assert_eq!(paths.len(), 1);
        assert!(paths[0].ends_with("pom.xml"));
    }

    #[test]
    fn test_builder_no_exclusions() {
        let dir = create_test_project();

        let collected = Codepress::new(dir.path())
            .excluded_dirs(ExcludedDirs::none())
            .collect()
            .unwrap();
        assert_eq!(collected.document.len(), 3);
    }

    #[test]
    fn test_builder_sorted() {
        let dir = create_test_project();

        let collected = Codepress::new(dir.path()).sort(true).collect().unwrap();
        let paths: Vec<_> = collected.document.paths().collect();
        let mut sorted = paths.clone();
        sorted.sort();
        assert_eq!(paths, sorted);
    }

    #[test]
    fn test_builder_missing_root() {
        let result = Codepress::new("/nonexistent/project").build();
        assert!(matches!(result, Err(CodepressError::PathNotFound(_))));
    }

    #[test]
    fn test_write_and_summary() {
        let dir = create_test_project();
        let out = dir.path().join("out.pdf");

        let result = Codepress::new(dir.path()).title("test").build().unwrap();
        let bytes = result.write_pdf(&out).unwrap();
        assert!(bytes > 0);
        assert!(out.exists());

        let summary = result.summary(Some(&out));
        assert_eq!(summary.files.len(), 2);
        assert_eq!(summary.pages, 1);
        assert!(summary.skipped.is_empty());
        assert_eq!(
            summary.total_lines,
            summary.files.iter().map(|f| f.lines).sum::<usize>()
        );

        let json = serde_json::to_value(&summary).unwrap();
        assert!(json.get("skipped").is_none());
        assert!(json.get("unvisited").is_none());
        assert_eq!(json["pages"], 1);
    }

    #[test]
    fn test_invalid_setup_rejected_before_collecting() {
        let setup = PageSetup {
            line_height: -10.0,
            ..PageSetup::default()
        };
        let result = Codepress::new("/nonexistent/project").page_setup(setup).build();
        assert!(matches!(
            result,
            Err(CodepressError::Layout(LayoutError::LineHeight(_)))
        ));
    }

    #[test]
    fn test_oversized_margin_rejected() {
        let dir = create_test_project();
        let mut setup = PageSetup::default();
        setup.margin = 0.6 * setup.width;

        let err = Codepress::new(dir.path()).page_setup(setup).build().unwrap_err();
        assert!(matches!(
            err,
            CodepressError::Layout(LayoutError::NoPrintableWidth { .. })
        ));
        assert_eq!(crate::errors::exit_code(&err), 2);
    }

    #[test]
    fn test_summary_reports_setup_and_unvisited_dirs() {
        let mut collected = Collected::default();
        collected.walk_errors.push(WalkError::PermissionDenied {
            path: PathBuf::from("/project/locked"),
        });
        let setup = PageSetup {
            body_font: FontSpec::new(StandardFont::CourierBold, 9.0),
            ..PageSetup::default()
        };
        let result = CodepressResult {
            collected,
            pages: Vec::new(),
            setup,
            pdf_options: PdfOptions::default(),
        };

        let summary = result.summary(None);
        assert_eq!(summary.unvisited.len(), 1);
        assert_eq!(summary.unvisited[0].path, "/project/locked");
        assert!(summary.unvisited[0].error.contains("permission denied"));

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["setup"]["line_height"], 10.0);
        assert_eq!(json["setup"]["body_font"]["font"], "CourierBold");
        assert_eq!(json["setup"]["body_font"]["size"], 9.0);
    }

    #[test]
    fn test_functional_api() {
        let dir = create_test_project();
        let out = dir.path().join("fn.pdf");

        let pages = pdf_from_path(dir.path(), &out).unwrap();
        assert_eq!(pages, 1);
        assert!(fs::read(&out).unwrap().starts_with(b"%PDF-"));
    }
}
