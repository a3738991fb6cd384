//! Codepress - Render a codebase into a printable PDF.
//!
//! Codepress walks a directory tree, picks up source files by suffix, and
//! lays their contents out as monospaced text on fixed-size pages, with a
//! `File: <path>` header above each file and long lines wrapped to fit.
//!
//! # Quick Start
//!
//! ```no_run
//! use codepress::builder::Codepress;
//!
//! let result = Codepress::new("./my-project")
//!     .extensions(["java", "xml"])
//!     .build()
//!     .unwrap();
//!
//! result.write_pdf("my-project.pdf").unwrap();
//! println!("{} pages", result.pages.len());
//! ```
//!
//! # Modules
//!
//! - [`filter`] - Extension suffixes and excluded directory names
//! - [`walker`] - Directory traversal and source collection
//! - [`source`] - Collected files as lines of text
//! - [`text`] - Transcoding into the single-byte page encoding
//! - [`metrics`] - Standard font widths
//! - [`wrap`] - Word, character, and path wrapping
//! - [`layout`] - Pagination
//! - [`output`] - PDF serialization
//! - [`builder`] - Fluent API tying it together

pub mod filter;
pub mod errors;
pub mod source;
pub mod walker;
pub mod text;
pub mod metrics;
pub mod wrap;
pub mod layout;
pub mod output;
pub mod builder;

// Re-export key types at crate root for convenience
pub use builder::{Codepress, CodepressResult, RunSummary};
pub use errors::CodepressError;
pub use filter::{ExcludedDirs, ExtensionFilter};
pub use layout::{LayoutError, Page, PageSetup, PageSize, Paginator, TextRun, TextStyle};
pub use metrics::{FontSpec, StandardFont, TextMeasure};
pub use output::{OutputError, PdfOptions};
pub use source::{Document, FileSection};
pub use walker::{Collected, ScanEvent, WalkError, WalkOptions};
