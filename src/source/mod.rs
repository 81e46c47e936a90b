//! Path validation and size-guarded loading

pub mod resolver;

pub use resolver::{
    has_pdf_extension, is_within_dirs, load_document, stat_document, validate_path,
    DocumentHandle, ResolvedPdf, MAX_FILE_BYTES,
};
