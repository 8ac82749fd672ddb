//! PDF rendering via an embedded Typst compiler.
//!
//! Documents are Typst sources produced by filling the templates in
//! `templates/` with escaped field values, then compiled in-memory; no
//! external binary or network access is involved.

mod documents;

pub use documents::{inspection_report_source, quotation_source};

use std::sync::LazyLock;

use typst::diag::{FileError, FileResult};
use typst::foundations::{Bytes, Datetime};
use typst::syntax::{FileId, Source, VirtualPath};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};
use typst_kit::fonts::{FontSearcher, FontSlot, Fonts};

use crate::errors::ServiceError;

static LIBRARY: LazyLock<LazyHash<Library>> =
    LazyLock::new(|| LazyHash::new(Library::builder().build()));

// Font discovery walks the filesystem; do it once per process.
static FONTS: LazyLock<Fonts> =
    LazyLock::new(|| FontSearcher::new().include_system_fonts(true).search());

/// Compilation environment for a single in-memory document. The main
/// source is the whole world: templates are self-contained and pull in
/// no packages or local files.
struct DocumentWorld {
    source: Source,
    main_id: FileId,
    book: LazyHash<FontBook>,
    fonts: &'static [FontSlot],
}

impl DocumentWorld {
    fn new(source_text: String) -> Self {
        let main_id = FileId::new(None, VirtualPath::new("document.typ"));
        let source = Source::new(main_id, source_text);

        Self {
            source,
            main_id,
            book: LazyHash::new(FONTS.book.clone()),
            fonts: &FONTS.fonts,
        }
    }
}

impl World for DocumentWorld {
    fn library(&self) -> &LazyHash<Library> {
        &LIBRARY
    }

    fn book(&self) -> &LazyHash<FontBook> {
        &self.book
    }

    fn main(&self) -> FileId {
        self.main_id
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main_id {
            Ok(self.source.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
    }

    fn font(&self, index: usize) -> Option<Font> {
        self.fonts[index].get()
    }

    fn today(&self, _offset: Option<i64>) -> Option<Datetime> {
        let today = chrono::Utc::now().date_naive();
        use chrono::Datelike;
        Datetime::from_ymd(
            today.year(),
            today.month() as u8,
            today.day() as u8,
        )
    }
}

/// Compiles a Typst source into PDF bytes.
pub fn render_pdf(source_text: String) -> Result<Vec<u8>, ServiceError> {
    let world = DocumentWorld::new(source_text);

    let result = typst::compile(&world);
    let document = result
        .output
        .map_err(|errors| ServiceError::PdfError(format!("compilation failed: {errors:?}")))?;

    let pdf_data = typst_pdf::pdf(&document, &typst_pdf::PdfOptions::default())
        .map_err(|e| ServiceError::PdfError(format!("export failed: {e:?}")))?;

    Ok(pdf_data)
}
