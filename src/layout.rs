//! Pagination of collected files into fixed-size pages.
//!
//! The [`Paginator`] owns the layout state: the page being filled and a
//! [`LayoutCursor`] tracking the vertical position on it. Text is placed
//! top-down at the left margin, one line height per run, and a new page is
//! started whenever the cursor drops below the bottom margin.

use serde::Serialize;
use thiserror::Error;

use crate::metrics::{FontSpec, StandardFont};
use crate::source::{Document, FileSection};
use crate::text;
use crate::wrap;

/// Points per millimetre.
pub const MM: f32 = 72.0 / 25.4;

/// Paper sizes, in points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    #[default]
    A4,
    Letter,
}

impl PageSize {
    /// Width and height in points.
    pub fn dimensions(self) -> (f32, f32) {
        match self {
            PageSize::A4 => (210.0 * MM, 297.0 * MM),
            PageSize::Letter => (8.5 * 72.0, 11.0 * 72.0),
        }
    }
}

/// Geometry that cannot hold a single line of text.
#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
    #[error("line height must be a positive number, got {0}")]
    LineHeight(f32),

    #[error("{style} font size must be a positive number, got {size}")]
    FontSize { style: &'static str, size: f32 },

    #[error("margin must be a non-negative number, got {0}")]
    Margin(f32),

    #[error("margins of {margin} leave no printable width on a {width} wide page")]
    NoPrintableWidth { margin: f32, width: f32 },

    #[error("margins of {margin} leave no room for a {line_height} high line on a {height} high page")]
    NoPrintableHeight {
        margin: f32,
        line_height: f32,
        height: f32,
    },
}

/// Geometry and fonts used to lay out pages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageSetup {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
    pub line_height: f32,
    pub header_font: FontSpec,
    pub body_font: FontSpec,
    /// Columns per tab stop; 0 turns each tab into a single space.
    pub tab_width: usize,
}

impl Default for PageSetup {
    fn default() -> Self {
        Self::for_size(PageSize::A4)
    }
}

impl PageSetup {
    /// Default layout on the given paper: 20 mm margins, 10 pt lines,
    /// 10 pt Helvetica-Bold headers over 8 pt Courier.
    pub fn for_size(size: PageSize) -> Self {
        let (width, height) = size.dimensions();
        Self {
            width,
            height,
            margin: 20.0 * MM,
            line_height: 10.0,
            header_font: FontSpec::new(StandardFont::HelveticaBold, 10.0),
            body_font: FontSpec::new(StandardFont::Courier, 8.0),
            tab_width: 4,
        }
    }

    /// Width available for text between the side margins.
    pub fn printable_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    /// Baseline of the first line on a page.
    pub fn top(&self) -> f32 {
        self.height - self.margin
    }

    /// Font for a style.
    pub fn font(&self, style: TextStyle) -> FontSpec {
        match style {
            TextStyle::Header => self.header_font,
            TextStyle::Body => self.body_font,
        }
    }

    /// Check that at least one line fits between the margins.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if !(self.line_height.is_finite() && self.line_height > 0.0) {
            return Err(LayoutError::LineHeight(self.line_height));
        }
        for (style, font) in [("header", self.header_font), ("body", self.body_font)] {
            if !(font.size.is_finite() && font.size > 0.0) {
                return Err(LayoutError::FontSize {
                    style,
                    size: font.size,
                });
            }
        }
        if !(self.margin.is_finite() && self.margin >= 0.0) {
            return Err(LayoutError::Margin(self.margin));
        }
        if self.printable_width() <= 0.0 {
            return Err(LayoutError::NoPrintableWidth {
                margin: self.margin,
                width: self.width,
            });
        }
        if self.top() - self.margin < self.line_height {
            return Err(LayoutError::NoPrintableHeight {
                margin: self.margin,
                line_height: self.line_height,
                height: self.height,
            });
        }
        Ok(())
    }
}

/// The two text styles on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextStyle {
    Header,
    Body,
}

/// A string drawn at a fixed position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextRun {
    pub x: f32,
    pub y: f32,
    pub style: TextStyle,
    pub text: String,
}

/// A finished page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    /// Zero-based page index.
    pub index: usize,
    pub width: f32,
    pub height: f32,
    pub runs: Vec<TextRun>,
}

impl Page {
    fn blank(index: usize, setup: &PageSetup) -> Self {
        Self {
            index,
            width: setup.width,
            height: setup.height,
            runs: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

/// Current page index and vertical position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutCursor {
    pub page: usize,
    pub y: f32,
}

/// Lays out file sections onto pages.
///
/// # Examples
///
/// ```
/// use codepress::layout::{PageSetup, Paginator};
/// use codepress::source::FileSection;
///
/// let mut paginator = Paginator::new(PageSetup::default());
/// paginator.add_section(&FileSection::from_text("src/Main.java", "class Main {}\n"));
/// let pages = paginator.finish();
/// assert_eq!(pages.len(), 1);
/// assert_eq!(pages[0].runs[0].text, "File: src/Main.java");
/// ```
#[derive(Debug)]
pub struct Paginator {
    setup: PageSetup,
    finished: Vec<Page>,
    page: Page,
    cursor: LayoutCursor,
    separator: char,
}

impl Paginator {
    pub fn new(setup: PageSetup) -> Self {
        Self {
            page: Page::blank(0, &setup),
            cursor: LayoutCursor {
                page: 0,
                y: setup.top(),
            },
            finished: Vec::new(),
            separator: std::path::MAIN_SEPARATOR,
            setup,
        }
    }

    /// Use a different path separator when wrapping headers.
    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    pub fn cursor(&self) -> LayoutCursor {
        self.cursor
    }

    /// Lay out every section of a document.
    pub fn add_document(&mut self, document: &Document) {
        for section in document.sections() {
            self.add_section(section);
        }
    }

    /// Lay out one file: header, body lines, then a blank separating line.
    pub fn add_section(&mut self, section: &FileSection) {
        // Keep the header off the last line of a page.
        if self.cursor.y < self.setup.margin + 2.0 * self.setup.line_height {
            self.start_page();
        }

        self.place_header(&section.display_path());

        let max_width = self.setup.printable_width();
        let body = self.setup.body_font;
        for raw in &section.lines {
            let line = text::prepare_line(raw, self.setup.tab_width);
            let runs = wrap::wrap_line(&line, max_width, &body);
            if runs.is_empty() {
                self.advance();
            }
            for run in runs {
                self.draw(TextStyle::Body, run);
            }
            self.ensure_room();
        }

        self.advance();
    }

    fn place_header(&mut self, path: &str) {
        let path = text::to_encodable(path);
        let header = self.setup.header_font;
        let lines = wrap::wrap_path(&path, self.separator, self.setup.printable_width(), &header);
        for line in lines {
            self.draw(TextStyle::Header, line);
        }
    }

    /// Draw at the cursor and move down one line.
    fn draw(&mut self, style: TextStyle, text: String) {
        self.ensure_room();
        self.page.runs.push(TextRun {
            x: self.setup.margin,
            y: self.cursor.y,
            style,
            text,
        });
        self.advance();
    }

    fn advance(&mut self) {
        self.cursor.y -= self.setup.line_height;
    }

    /// Start a new page if the cursor is below the bottom margin.
    fn ensure_room(&mut self) {
        if self.cursor.y < self.setup.margin {
            self.start_page();
        }
    }

    /// Finalize the current page and reset the cursor to the top of a fresh one.
    fn start_page(&mut self) {
        let next = Page::blank(self.cursor.page + 1, &self.setup);
        let done = std::mem::replace(&mut self.page, next);
        log::debug!("page {} finished with {} runs", done.index + 1, done.runs.len());
        self.finished.push(done);
        self.cursor = LayoutCursor {
            page: self.cursor.page + 1,
            y: self.setup.top(),
        };
    }

    /// Finalize the last page and return all pages.
    ///
    /// A trailing page that never received a run is dropped unless it is
    /// the only page.
    pub fn finish(mut self) -> Vec<Page> {
        if self.page.is_empty() && !self.finished.is_empty() {
            return self.finished;
        }
        self.finished.push(self.page);
        self.finished
    }
}

/// Lay out a whole document with the given setup.
pub fn paginate(document: &Document, setup: &PageSetup) -> Vec<Page> {
    let mut paginator = Paginator::new(*setup);
    paginator.add_document(document);
    paginator.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::TextMeasure;

    /// Small page: top at 180, bottom margin 20, 10 pt lines.
    fn small_setup() -> PageSetup {
        PageSetup {
            width: 300.0,
            height: 200.0,
            margin: 20.0,
            line_height: 10.0,
            header_font: FontSpec::new(StandardFont::HelveticaBold, 10.0),
            body_font: FontSpec::new(StandardFont::Courier, 8.0),
            tab_width: 4,
        }
    }

    fn numbered(count: usize) -> String {
        (0..count).map(|i| format!("line {i}\n")).collect()
    }

    fn assert_within_margins(pages: &[Page], setup: &PageSetup) {
        for page in pages {
            for run in &page.runs {
                assert!(
                    run.y >= setup.margin && run.y <= setup.top(),
                    "run {:?} on page {} outside margins",
                    run.text,
                    page.index
                );
                assert_eq!(run.x, setup.margin);
            }
        }
    }

    #[test]
    fn test_default_setup_is_a4() {
        let setup = PageSetup::default();
        assert!((setup.width - 595.2756).abs() < 0.01);
        assert!((setup.height - 841.8898).abs() < 0.01);
        assert!((setup.margin - 56.6929).abs() < 0.01);
        assert!((setup.printable_width() - (setup.width - 2.0 * setup.margin)).abs() < 1e-4);
    }

    #[test]
    fn test_default_setups_are_valid() {
        assert_eq!(PageSetup::for_size(PageSize::A4).validate(), Ok(()));
        assert_eq!(PageSetup::for_size(PageSize::Letter).validate(), Ok(()));
        assert_eq!(small_setup().validate(), Ok(()));
    }

    #[test]
    fn test_non_positive_line_height_rejected() {
        for line_height in [0.0, -10.0, f32::NAN] {
            let setup = PageSetup {
                line_height,
                ..small_setup()
            };
            assert!(matches!(setup.validate(), Err(LayoutError::LineHeight(_))));
        }
    }

    #[test]
    fn test_margins_wider_than_page_rejected() {
        // 0.6 of the width on each side.
        let setup = PageSetup {
            margin: 180.0,
            ..small_setup()
        };
        assert!(matches!(
            setup.validate(),
            Err(LayoutError::NoPrintableWidth { .. })
        ));

        let negative = PageSetup {
            margin: -1.0,
            ..small_setup()
        };
        assert_eq!(negative.validate(), Err(LayoutError::Margin(-1.0)));
    }

    #[test]
    fn test_line_taller_than_printable_height_rejected() {
        // 160 pt between the margins.
        let setup = PageSetup {
            line_height: 161.0,
            ..small_setup()
        };
        assert!(matches!(
            setup.validate(),
            Err(LayoutError::NoPrintableHeight { .. })
        ));

        let exact = PageSetup {
            line_height: 160.0,
            ..small_setup()
        };
        assert_eq!(exact.validate(), Ok(()));
    }

    #[test]
    fn test_zero_font_size_rejected() {
        let setup = PageSetup {
            body_font: FontSpec::new(StandardFont::Courier, 0.0),
            ..small_setup()
        };
        let err = setup.validate().unwrap_err();
        assert_eq!(
            err,
            LayoutError::FontSize {
                style: "body",
                size: 0.0
            }
        );
        assert!(err.to_string().contains("body font size"));
    }

    #[test]
    fn test_short_file_advances() {
        let setup = PageSetup::default();
        let mut paginator = Paginator::new(setup);
        let start = paginator.cursor().y;

        paginator.add_section(&FileSection::from_text("A.java", "one\n\nthree\nfour\n"));

        let cursor = paginator.cursor();
        // Header, three drawn lines, one blank, one separator.
        let advances = ((start - cursor.y) / setup.line_height).round() as usize;
        assert_eq!(advances, 1 + 4 + 1);
        assert_eq!(cursor.page, 0);

        let pages = paginator.finish();
        assert_eq!(pages.len(), 1);
        let body: Vec<_> = pages[0]
            .runs
            .iter()
            .filter(|r| r.style == TextStyle::Body)
            .map(|r| r.text.as_str())
            .collect();
        assert_eq!(body, vec!["one", "three", "four"]);
    }

    #[test]
    fn test_blank_line_keeps_spacing() {
        let setup = PageSetup::default();
        let pages = paginate(
            &vec![FileSection::from_text("A.java", "a\n\nb\n")].into_iter().collect(),
            &setup,
        );
        let runs = &pages[0].runs;
        // header, a, (blank), b
        assert_eq!(runs.len(), 3);
        assert!((runs[1].y - runs[2].y - 2.0 * setup.line_height).abs() < 1e-3);
    }

    #[test]
    fn test_header_first_then_body() {
        let pages = paginate(
            &vec![FileSection::from_text("src/App.java", "class App {}")].into_iter().collect(),
            &PageSetup::default(),
        );
        let runs = &pages[0].runs;
        assert_eq!(runs[0].style, TextStyle::Header);
        assert!(runs[0].text.starts_with("File: "));
        assert!(runs[0].text.ends_with("App.java"));
        assert_eq!(runs[1].style, TextStyle::Body);
        assert_eq!(runs[1].text, "class App {}");
        assert!(runs[0].y > runs[1].y);
    }

    #[test]
    fn test_page_break_on_overflow() {
        let setup = small_setup();
        let doc: Document = vec![FileSection::from_text("A.java", &numbered(40))]
            .into_iter()
            .collect();
        let pages = paginate(&doc, &setup);

        assert!(pages.len() >= 2);
        assert_within_margins(&pages, &setup);

        // First page: header at 180, body from 170 down to exactly the margin.
        let first = &pages[0];
        assert_eq!(first.runs.len(), 17);
        assert_eq!(first.runs.last().unwrap().y, setup.margin);

        // Second page starts back at the top.
        let second = &pages[1];
        assert_eq!(second.runs[0].y, setup.top());
        assert_eq!(second.runs[0].text, "line 16");
        assert_eq!(second.index, 1);
    }

    #[test]
    fn test_all_lines_kept_across_pages() {
        let setup = small_setup();
        let doc: Document = vec![FileSection::from_text("A.java", &numbered(100))]
            .into_iter()
            .collect();
        let pages = paginate(&doc, &setup);

        let body: Vec<_> = pages
            .iter()
            .flat_map(|p| p.runs.iter())
            .filter(|r| r.style == TextStyle::Body)
            .map(|r| r.text.clone())
            .collect();
        let expected: Vec<_> = (0..100).map(|i| format!("line {i}")).collect();
        assert_eq!(body, expected);

        for (i, page) in pages.iter().enumerate() {
            assert_eq!(page.index, i);
            for pair in page.runs.windows(2) {
                assert!(pair[0].y > pair[1].y);
            }
        }
    }

    #[test]
    fn test_header_not_orphaned() {
        let setup = small_setup();
        // 14 lines leave the cursor at 20 after the separator: under the
        // two-line threshold, so the next header moves to a new page.
        let doc: Document = vec![
            FileSection::from_text("A.java", &numbered(14)),
            FileSection::from_text("B.java", "b\n"),
        ]
        .into_iter()
        .collect();
        let pages = paginate(&doc, &setup);

        assert_eq!(pages.len(), 2);
        let header = &pages[1].runs[0];
        assert_eq!(header.style, TextStyle::Header);
        assert!(header.text.ends_with("B.java"));
        assert_eq!(header.y, setup.top());
    }

    #[test]
    fn test_separator_line_between_files() {
        let setup = PageSetup::default();
        let doc: Document = vec![
            FileSection::from_text("A.java", "a"),
            FileSection::from_text("B.java", "b"),
        ]
        .into_iter()
        .collect();
        let runs = &paginate(&doc, &setup)[0].runs;
        // a at top-10, blank separator, header B at top-30.
        assert!((runs[1].y - runs[2].y - 2.0 * setup.line_height).abs() < 1e-3);
    }

    #[test]
    fn test_long_line_wrapped_within_width() {
        let setup = small_setup();
        let line = "word ".repeat(60);
        let doc: Document = vec![FileSection::from_text("A.java", &line)].into_iter().collect();
        let pages = paginate(&doc, &setup);

        let body: Vec<_> = pages[0]
            .runs
            .iter()
            .filter(|r| r.style == TextStyle::Body)
            .collect();
        assert!(body.len() > 1);
        for run in &body {
            assert!(setup.body_font.text_width(&run.text) <= setup.printable_width());
        }
        let rejoined: Vec<_> = body.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(rejoined.join(" "), line.trim_end());
    }

    #[test]
    fn test_500_char_word_wraps_by_character() {
        let setup = small_setup();
        let word: String = "abcdefghij".repeat(50);
        let doc: Document = vec![FileSection::from_text("A.java", &word)].into_iter().collect();
        let pages = paginate(&doc, &setup);

        let body: Vec<_> = pages
            .iter()
            .flat_map(|p| p.runs.iter())
            .filter(|r| r.style == TextStyle::Body)
            .collect();
        assert!(body.len() > 1);
        for run in &body {
            assert!(setup.body_font.text_width(&run.text) <= setup.printable_width());
        }
        let rejoined: String = body.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(rejoined, word);
        assert_within_margins(&pages, &setup);
    }

    #[test]
    fn test_wrapped_line_breaks_mid_line() {
        let setup = small_setup();
        // 14 body lines fill down to 40; the wrapped line needs more room.
        let mut text = numbered(14);
        text.push_str(&"z".repeat(400));
        let doc: Document = vec![FileSection::from_text("A.java", &text)].into_iter().collect();
        let pages = paginate(&doc, &setup);

        assert!(pages.len() >= 2);
        assert_within_margins(&pages, &setup);
        let rejoined: String = pages
            .iter()
            .flat_map(|p| p.runs.iter())
            .filter(|r| r.text.starts_with('z'))
            .map(|r| r.text.as_str())
            .collect();
        assert_eq!(rejoined, "z".repeat(400));
    }

    #[test]
    fn test_long_path_header_lines() {
        let setup = small_setup();
        let path = "/very/deeply/nested/source/tree/with/many/levels/of/packages/Component.java";
        let doc: Document = vec![FileSection::from_text(path, "x")].into_iter().collect();
        let mut paginator = Paginator::new(setup).with_separator('/');
        paginator.add_document(&doc);
        let pages = paginator.finish();

        let headers: Vec<_> = pages[0]
            .runs
            .iter()
            .filter(|r| r.style == TextStyle::Header)
            .map(|r| r.text.clone())
            .collect();
        assert!(headers.len() > 1);
        assert!(headers[0].starts_with("File: "));
        assert!(headers[1..].iter().all(|h| !h.starts_with("File: ")));

        let joined = headers.join("/");
        assert_eq!(&joined["File: ".len()..], path);

        // Each header line takes its own line height.
        for pair in pages[0].runs.windows(2) {
            assert!((pair[0].y - pair[1].y - setup.line_height).abs() < 1e-4);
        }
    }

    #[test]
    fn test_non_latin_text_substituted() {
        let pages = paginate(
            &vec![FileSection::from_text("A.java", "// héllo → 世界")].into_iter().collect(),
            &PageSetup::default(),
        );
        assert_eq!(pages[0].runs[1].text, "// héllo ? ??");
    }

    #[test]
    fn test_tabs_expanded() {
        let pages = paginate(
            &vec![FileSection::from_text("A.java", "\treturn;")].into_iter().collect(),
            &PageSetup::default(),
        );
        assert_eq!(pages[0].runs[1].text, "    return;");
    }

    #[test]
    fn test_tabs_without_expansion_become_spaces() {
        let setup = PageSetup {
            tab_width: 0,
            ..PageSetup::default()
        };
        let pages = paginate(
            &vec![FileSection::from_text("A.java", "\treturn;")].into_iter().collect(),
            &setup,
        );
        assert_eq!(pages[0].runs[1].text, " return;");
    }

    #[test]
    fn test_empty_document_single_blank_page() {
        let pages = paginate(&Document::new(), &PageSetup::default());
        assert_eq!(pages.len(), 1);
        assert!(pages[0].is_empty());
    }

    #[test]
    fn test_no_trailing_blank_page() {
        let setup = small_setup();
        // Header plus 16 lines end exactly at the margin and break the page.
        let doc: Document = vec![FileSection::from_text("A.java", &numbered(16))]
            .into_iter()
            .collect();
        let pages = paginate(&doc, &setup);
        assert_eq!(pages.len(), 1);
        assert!(pages.iter().all(|p| !p.is_empty()));
    }

    #[test]
    fn test_many_files_stay_within_margins() {
        let setup = small_setup();
        let doc: Document = (0..25)
            .map(|i| FileSection::from_text(format!("src/F{i}.java"), &numbered(i % 7)))
            .collect();
        let pages = paginate(&doc, &setup);
        assert!(pages.len() > 1);
        assert_within_margins(&pages, &setup);
    }
}
