//! Human-readable rendering of tool results

use crate::error::Error;
use crate::pdf::{DocumentMetadata, MetadataField};
use crate::source::DocumentHandle;
use crate::text::SearchOutcome;
use std::fmt::Write;

/// Everything the `extract` tool reports
pub struct ExtractionReport<'a> {
    pub handle: &'a DocumentHandle,
    pub page_count: u32,
    pub pages_extracted: String,
    pub metadata: Option<&'a DocumentMetadata>,
    pub text: &'a str,
}

/// Everything the `search` tool reports
pub struct SearchReport<'a> {
    pub handle: &'a DocumentHandle,
    pub query: &'a str,
    pub outcome: &'a SearchOutcome,
    pub display_limit: usize,
}

fn write_file_header(out: &mut String, handle: &DocumentHandle, page_count: u32) {
    let _ = writeln!(out, "File size: {:.2} MB", handle.size_mb());
    let _ = writeln!(out, "Pages: {}", page_count);
}

fn write_metadata_block(out: &mut String, metadata: &DocumentMetadata, fields: &[MetadataField]) {
    out.push_str("Metadata:\n");
    for field in fields {
        let _ = writeln!(out, "- {}: {}", field.label(), metadata.display_value(*field));
    }
}

pub fn format_extraction(report: &ExtractionReport<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Successfully extracted text from PDF: {}\n",
        report.handle.file_name()
    );
    write_file_header(&mut out, report.handle, report.page_count);
    let _ = writeln!(out, "Pages extracted: {}\n", report.pages_extracted);

    if let Some(metadata) = report.metadata {
        write_metadata_block(&mut out, metadata, &MetadataField::DESCRIPTIVE);
        out.push('\n');
    }

    out.push_str("Extracted Text:\n");
    out.push_str(report.text);
    out
}

pub fn format_metadata(
    handle: &DocumentHandle,
    page_count: u32,
    metadata: &DocumentMetadata,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "PDF metadata: {}\n", handle.file_name());
    write_file_header(&mut out, handle, page_count);
    out.push('\n');
    write_metadata_block(&mut out, metadata, &MetadataField::ALL);
    out.trim_end().to_string()
}

pub fn format_search(report: &SearchReport<'_>) -> String {
    let outcome = report.outcome;
    let name = report.handle.file_name();

    if outcome.is_empty() {
        return format!("No matches found for \"{}\" in {}", report.query, name);
    }

    let mut out = String::new();
    let _ = writeln!(out, "Search results for \"{}\" in {}\n", report.query, name);
    let _ = writeln!(
        out,
        "Found {} {} on {} {}\n",
        outcome.total_matches,
        plural(outcome.total_matches, "match", "matches"),
        outcome.matching_lines(),
        plural(outcome.matching_lines(), "line", "lines"),
    );

    for m in outcome.displayed(report.display_limit) {
        let _ = writeln!(
            out,
            "Line {} ({} {}): {}",
            m.line,
            m.count,
            plural(m.count, "match", "matches"),
            m.content
        );
    }

    let omitted = outcome.omitted(report.display_limit);
    if omitted > 0 {
        let _ = writeln!(
            out,
            "\n... and {} more matching {} not shown",
            omitted,
            plural(omitted, "line", "lines")
        );
    }

    out.trim_end().to_string()
}

pub fn format_error(error: &Error) -> String {
    format!("Error: {}", error.client_message())
}

fn plural<'a>(n: usize, one: &'a str, many: &'a str) -> &'a str {
    if n == 1 {
        one
    } else {
        many
    }
}
