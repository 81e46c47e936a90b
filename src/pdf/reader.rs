//! PDF reader built on lopdf

use crate::error::{Error, Result};
use crate::pdf::metadata::{MetadataField, RawMetadata};
use lopdf::{Document, Object};
use std::path::Path;

/// Which pages to extract
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageSelection {
    All,
    Pages(Vec<u32>),
}

impl PageSelection {
    /// Parse a page spec (`"all"`, `"1-5,10"`) against a document's page count.
    /// A missing or blank spec selects every page.
    pub fn parse(spec: Option<&str>, max_pages: u32) -> Result<Self> {
        match spec.map(str::trim) {
            None | Some("") => Ok(PageSelection::All),
            Some(s) if s.eq_ignore_ascii_case("all") => Ok(PageSelection::All),
            Some(s) => {
                let pages = parse_page_range(s, max_pages)?;
                if pages.is_empty() {
                    return Err(Error::InvalidPageRange {
                        range: s.to_string(),
                    });
                }
                Ok(PageSelection::Pages(pages))
            }
        }
    }

    /// Short description for response headers
    pub fn describe(&self) -> String {
        match self {
            PageSelection::All => "all".to_string(),
            PageSelection::Pages(pages) => pages
                .iter()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// PDF reader using lopdf
///
/// All data is extracted when the reader is opened; the parsed document
/// itself is dropped afterwards.
#[derive(Debug)]
pub struct PdfReader {
    page_count: u32,
    metadata: RawMetadata,
    page_texts: Vec<String>,
}

impl PdfReader {
    /// Open a PDF from a file path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(Error::NotFound {
                path: path.display().to_string(),
            });
        }

        let data = std::fs::read(path)?;
        Self::open_bytes(&data)
    }

    /// Open a PDF from bytes
    pub fn open_bytes(data: &[u8]) -> Result<Self> {
        let document = Self::load(data)?;

        let page_count = document.get_pages().len() as u32;
        let metadata = Self::extract_metadata(&document);
        let page_texts = Self::extract_all_page_texts(&document)?;

        Ok(Self {
            page_count,
            metadata,
            page_texts,
        })
    }

    /// Open a PDF from bytes, extracting only metadata (no text extraction for performance)
    pub fn open_bytes_metadata_only(data: &[u8]) -> Result<Self> {
        let document = Self::load(data)?;

        Ok(Self {
            page_count: document.get_pages().len() as u32,
            metadata: Self::extract_metadata(&document),
            page_texts: Vec::new(),
        })
    }

    fn load(data: &[u8]) -> Result<Document> {
        if data.len() < 4 || &data[0..4] != b"%PDF" {
            return Err(Error::load_failure("Not a valid PDF file"));
        }

        Document::load_mem(data).map_err(Error::load_failure)
    }

    fn extract_metadata(document: &Document) -> RawMetadata {
        let mut metadata = RawMetadata::new();

        let info = match document.trailer.get(b"Info") {
            Ok(Object::Reference(id)) => document.get_object(*id).ok(),
            Ok(obj) => Some(obj),
            Err(_) => None,
        };

        if let Some(Object::Dictionary(dict)) = info {
            for field in MetadataField::DESCRIPTIVE {
                let Some(key) = field.info_key() else {
                    continue;
                };
                let value = match dict.get(key) {
                    Ok(Object::Reference(id)) => document.get_object(*id).ok(),
                    Ok(obj) => Some(obj),
                    Err(_) => None,
                };
                match value {
                    Some(Object::String(bytes, _)) => metadata.set(field, decode_text_string(bytes)),
                    Some(Object::Name(name)) => {
                        metadata.set(field, String::from_utf8_lossy(name).to_string())
                    }
                    _ => {}
                }
            }
        }

        metadata.set(MetadataField::Version, document.version.clone());
        // `encryption_state` survives decryption with the empty user password
        metadata.set_encrypted(document.is_encrypted() || document.encryption_state.is_some());

        metadata
    }

    fn extract_all_page_texts(document: &Document) -> Result<Vec<String>> {
        let pages = document.get_pages();
        let mut texts = Vec::with_capacity(pages.len());

        for page_num in pages.keys() {
            let text = document
                .extract_text(&[*page_num])
                .map_err(|e| Error::load_failure(format!("page {}: {}", page_num, e)))?;
            texts.push(text.trim_end().to_string());
        }

        Ok(texts)
    }

    /// Get the number of pages
    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    /// Get the raw (sparse) metadata record
    pub fn metadata(&self) -> &RawMetadata {
        &self.metadata
    }

    /// Extract text from a specific page (1-indexed)
    pub fn extract_page_text(&self, page_num: u32) -> Result<&str> {
        if page_num < 1 || page_num as usize > self.page_texts.len() {
            return Err(Error::InvalidPageRange {
                range: page_num.to_string(),
            });
        }

        Ok(&self.page_texts[(page_num - 1) as usize])
    }

    /// Extract text from specified pages
    pub fn extract_pages_text(&self, pages: &[u32]) -> Result<Vec<(u32, &str)>> {
        pages
            .iter()
            .map(|&page_num| Ok((page_num, self.extract_page_text(page_num)?)))
            .collect()
    }

    /// Text of the selected pages, joined in page order with one line break
    pub fn text(&self, selection: &PageSelection) -> Result<String> {
        match selection {
            PageSelection::All => Ok(self.page_texts.join("\n")),
            PageSelection::Pages(pages) => Ok(self
                .extract_pages_text(pages)?
                .into_iter()
                .map(|(_, text)| text)
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    /// Full document text
    pub fn full_text(&self) -> String {
        self.page_texts.join("\n")
    }
}

/// Decode a PDF text string: UTF-16 with a byte order mark, otherwise UTF-8
/// with a PDFDocEncoding fallback.
pub fn decode_text_string(bytes: &[u8]) -> String {
    match bytes {
        [0xFE, 0xFF, rest @ ..] => decode_utf16(rest, u16::from_be_bytes),
        [0xFF, 0xFE, rest @ ..] => decode_utf16(rest, u16::from_le_bytes),
        [0xEF, 0xBB, 0xBF, rest @ ..] => String::from_utf8_lossy(rest).to_string(),
        _ => String::from_utf8(bytes.to_vec())
            .unwrap_or_else(|_| bytes.iter().map(|&b| pdf_doc_char(b)).collect()),
    }
}

/// PDFDocEncoding agrees with Latin-1 except for 0x80-0xA0.
fn pdf_doc_char(byte: u8) -> char {
    const HIGH: [char; 32] = [
        '\u{2022}', '\u{2020}', '\u{2021}', '\u{2026}', '\u{2014}', '\u{2013}', '\u{0192}',
        '\u{2044}', '\u{2039}', '\u{203A}', '\u{2212}', '\u{2030}', '\u{201E}', '\u{201C}',
        '\u{201D}', '\u{2018}', '\u{2019}', '\u{201A}', '\u{2122}', '\u{FB01}', '\u{FB02}',
        '\u{0141}', '\u{0152}', '\u{0160}', '\u{0178}', '\u{017D}', '\u{0131}', '\u{0142}',
        '\u{0153}', '\u{0161}', '\u{017E}', char::REPLACEMENT_CHARACTER,
    ];
    match byte {
        0x80..=0x9F => HIGH[usize::from(byte - 0x80)],
        0xA0 => '\u{20AC}',
        _ => char::from(byte),
    }
}

fn decode_utf16(bytes: &[u8], to_unit: fn([u8; 2]) -> u16) -> String {
    let units = bytes.chunks_exact(2).map(|pair| to_unit([pair[0], pair[1]]));
    char::decode_utf16(units)
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

/// Parse page range string (e.g., "1-5,10,15-20")
pub fn parse_page_range(range: &str, max_pages: u32) -> Result<Vec<u32>> {
    let mut pages = Vec::new();
    let invalid = || Error::InvalidPageRange {
        range: range.to_string(),
    };

    for part in range.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        if let Some((start, end)) = part.split_once('-') {
            let start: u32 = start.trim().parse().map_err(|_| invalid())?;
            let end: u32 = end.trim().parse().map_err(|_| invalid())?;

            if start < 1 || end > max_pages || start > end {
                return Err(invalid());
            }

            pages.extend(start..=end);
        } else {
            let page: u32 = part.parse().map_err(|_| invalid())?;

            if page < 1 || page > max_pages {
                return Err(invalid());
            }

            pages.push(page);
        }
    }

    // Remove duplicates and sort
    pages.sort_unstable();
    pages.dedup();

    Ok(pages)
}
