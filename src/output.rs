//! PDF serialization of laid-out pages.
//!
//! Pages are written with `pdf-writer`. Text uses the standard Type1 fonts
//! with `WinAnsiEncoding`, so nothing is embedded; content streams are
//! deflate-compressed.

use std::path::{Path, PathBuf};

use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, Str, TextStr};
use thiserror::Error;

use crate::layout::{Page, PageSetup, TextStyle};
use crate::metrics::StandardFont;
use crate::text::to_win_ansi;

/// Default name of the generated document.
pub const DEFAULT_OUTPUT: &str = "codebase.pdf";

const PRODUCER: &str = concat!("codepress ", env!("CARGO_PKG_VERSION"));

/// Errors that can occur while writing the document.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Options for the generated PDF.
#[derive(Debug, Clone, Default)]
pub struct PdfOptions {
    /// Document title stored in the info dictionary.
    pub title: Option<String>,
    /// Skip stream compression (useful for inspecting output).
    pub uncompressed: bool,
}

/// Sequential object id allocator.
struct RefAlloc(i32);

impl RefAlloc {
    fn next(&mut self) -> Ref {
        self.0 += 1;
        Ref::new(self.0)
    }
}

/// Font resource used for a text style.
struct FontResource {
    style: TextStyle,
    font: StandardFont,
    name: &'static [u8],
    id: Ref,
}

/// Serialize pages to PDF bytes.
pub fn render_pdf(pages: &[Page], setup: &PageSetup, options: &PdfOptions) -> Vec<u8> {
    let mut alloc = RefAlloc(0);
    let catalog_id = alloc.next();
    let tree_id = alloc.next();
    let info_id = alloc.next();

    let fonts = [
        FontResource {
            style: TextStyle::Header,
            font: setup.header_font.font,
            name: b"F1",
            id: alloc.next(),
        },
        FontResource {
            style: TextStyle::Body,
            font: setup.body_font.font,
            name: b"F2",
            id: alloc.next(),
        },
    ];

    let page_ids: Vec<Ref> = pages.iter().map(|_| alloc.next()).collect();
    let content_ids: Vec<Ref> = pages.iter().map(|_| alloc.next()).collect();

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(tree_id);
    pdf.pages(tree_id)
        .kids(page_ids.iter().copied())
        .count(page_ids.len() as i32);

    {
        let mut info = pdf.document_info(info_id);
        info.producer(TextStr(PRODUCER));
        if let Some(title) = &options.title {
            info.title(TextStr(title.as_str()));
        }
    }

    for resource in &fonts {
        pdf.type1_font(resource.id)
            .base_font(Name(resource.font.base_name().as_bytes()))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
    }

    for ((page, &page_id), &content_id) in pages.iter().zip(&page_ids).zip(&content_ids) {
        {
            let mut writer = pdf.page(page_id);
            writer
                .media_box(Rect::new(0.0, 0.0, page.width, page.height))
                .parent(tree_id)
                .contents(content_id);
            let mut resources = writer.resources();
            let mut font_dict = resources.fonts();
            for resource in &fonts {
                font_dict.pair(Name(resource.name), resource.id);
            }
        }

        let raw = page_content(page, setup, &fonts);
        if options.uncompressed {
            pdf.stream(content_id, &raw);
        } else {
            let compressed = miniz_oxide::deflate::compress_to_vec_zlib(&raw, 6);
            pdf.stream(content_id, &compressed).filter(Filter::FlateDecode);
        }
    }

    log::debug!("serialized {} pages", pages.len());
    pdf.finish()
}

fn page_content(page: &Page, setup: &PageSetup, fonts: &[FontResource]) -> Vec<u8> {
    let mut content = Content::new();
    for run in &page.runs {
        let Some(resource) = fonts.iter().find(|f| f.style == run.style) else {
            continue;
        };
        let size = setup.font(run.style).size;
        content
            .begin_text()
            .set_font(Name(resource.name), size)
            .next_line(run.x, run.y)
            .show(Str(&to_win_ansi(&run.text)))
            .end_text();
    }
    content.finish()
}

/// Render pages and write them to `path`.
pub fn write_pdf(
    path: &Path,
    pages: &[Page],
    setup: &PageSetup,
    options: &PdfOptions,
) -> Result<u64, OutputError> {
    let bytes = render_pdf(pages, setup, options);
    std::fs::write(path, &bytes).map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("wrote {} bytes to {}", bytes.len(), path.display());
    Ok(bytes.len() as u64)
}
