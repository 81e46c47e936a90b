//! Document metadata: the fixed field set and its normalization

use std::collections::BTreeMap;

/// Placeholder for absent metadata values
pub const UNKNOWN: &str = "Unknown";

/// The fixed set of metadata fields reported for every document
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MetadataField {
    Title,
    Author,
    Subject,
    Creator,
    Producer,
    CreationDate,
    ModificationDate,
    Keywords,
    Encrypted,
    Version,
}

impl MetadataField {
    /// All fields, in display order
    pub const ALL: [MetadataField; 10] = [
        MetadataField::Title,
        MetadataField::Author,
        MetadataField::Subject,
        MetadataField::Creator,
        MetadataField::Producer,
        MetadataField::CreationDate,
        MetadataField::ModificationDate,
        MetadataField::Keywords,
        MetadataField::Encrypted,
        MetadataField::Version,
    ];

    /// Descriptive fields taken from the document information dictionary
    pub const DESCRIPTIVE: [MetadataField; 8] = [
        MetadataField::Title,
        MetadataField::Author,
        MetadataField::Subject,
        MetadataField::Creator,
        MetadataField::Producer,
        MetadataField::CreationDate,
        MetadataField::ModificationDate,
        MetadataField::Keywords,
    ];

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            MetadataField::Title => "Title",
            MetadataField::Author => "Author",
            MetadataField::Subject => "Subject",
            MetadataField::Creator => "Creator",
            MetadataField::Producer => "Producer",
            MetadataField::CreationDate => "Creation Date",
            MetadataField::ModificationDate => "Modification Date",
            MetadataField::Keywords => "Keywords",
            MetadataField::Encrypted => "Encrypted",
            MetadataField::Version => "PDF Version",
        }
    }

    /// Key in the PDF `Info` dictionary, if the field lives there
    pub fn info_key(self) -> Option<&'static [u8]> {
        match self {
            MetadataField::Title => Some(b"Title"),
            MetadataField::Author => Some(b"Author"),
            MetadataField::Subject => Some(b"Subject"),
            MetadataField::Creator => Some(b"Creator"),
            MetadataField::Producer => Some(b"Producer"),
            MetadataField::CreationDate => Some(b"CreationDate"),
            MetadataField::ModificationDate => Some(b"ModDate"),
            MetadataField::Keywords => Some(b"Keywords"),
            MetadataField::Encrypted | MetadataField::Version => None,
        }
    }
}

/// Sparse metadata as reported by the parser
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawMetadata {
    values: BTreeMap<MetadataField, String>,
    encrypted: Option<bool>,
}

impl RawMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a string value. `Encrypted` is a flag and is set through
    /// [`RawMetadata::set_encrypted`] instead; string values for it are ignored.
    pub fn set(&mut self, field: MetadataField, value: impl Into<String>) {
        if field != MetadataField::Encrypted {
            self.values.insert(field, value.into());
        }
    }

    pub fn with(mut self, field: MetadataField, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn set_encrypted(&mut self, encrypted: bool) {
        self.encrypted = Some(encrypted);
    }

    pub fn get(&self, field: MetadataField) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    pub fn encrypted(&self) -> Option<bool> {
        self.encrypted
    }
}

/// Complete metadata record: every field has a value
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentMetadata {
    pub title: String,
    pub author: String,
    pub subject: String,
    pub creator: String,
    pub producer: String,
    pub creation_date: String,
    pub modification_date: String,
    pub keywords: String,
    pub encrypted: bool,
    pub version: String,
}

impl DocumentMetadata {
    /// Display value of a field
    pub fn display_value(&self, field: MetadataField) -> &str {
        match field {
            MetadataField::Title => &self.title,
            MetadataField::Author => &self.author,
            MetadataField::Subject => &self.subject,
            MetadataField::Creator => &self.creator,
            MetadataField::Producer => &self.producer,
            MetadataField::CreationDate => &self.creation_date,
            MetadataField::ModificationDate => &self.modification_date,
            MetadataField::Keywords => &self.keywords,
            MetadataField::Encrypted => {
                if self.encrypted {
                    "Yes"
                } else {
                    "No"
                }
            }
            MetadataField::Version => &self.version,
        }
    }
}

/// Fill every field of `raw`, substituting [`UNKNOWN`] for absent or blank
/// strings and `false` for an unknown encryption flag.
pub fn normalize(raw: &RawMetadata) -> DocumentMetadata {
    let value = |field: MetadataField| -> String {
        raw.get(field)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(UNKNOWN)
            .to_string()
    };

    DocumentMetadata {
        title: value(MetadataField::Title),
        author: value(MetadataField::Author),
        subject: value(MetadataField::Subject),
        creator: value(MetadataField::Creator),
        producer: value(MetadataField::Producer),
        creation_date: value(MetadataField::CreationDate),
        modification_date: value(MetadataField::ModificationDate),
        keywords: value(MetadataField::Keywords),
        encrypted: raw.encrypted().unwrap_or(false),
        version: value(MetadataField::Version),
    }
}
