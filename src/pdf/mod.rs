//! PDF processing layer
//!
//! Text and metadata extraction on top of lopdf, plus metadata normalization.

pub mod metadata;
mod reader;

#[cfg(test)]
#[path = "../../tests/common/mod.rs"]
pub(crate) mod fixtures;

pub use metadata::{normalize, DocumentMetadata, MetadataField, RawMetadata, UNKNOWN};
pub use reader::{decode_text_string, parse_page_range, PageSelection, PdfReader};
