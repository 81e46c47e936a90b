//! Whitespace and line-break normalization of extracted text

/// Collapse the layout noise left by text extraction.
///
/// Paragraphs are separated by one or more whitespace-only lines. Inside a
/// paragraph every whitespace run, line breaks included, becomes a single
/// space. Paragraphs are rejoined with exactly one blank line, and the result
/// carries no leading or trailing whitespace.
///
/// Line numbers of the cleaned text do not correspond to the original.
pub fn clean_text(text: &str) -> String {
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join(" "));
                current.clear();
            }
        } else {
            current.extend(line.split_whitespace());
        }
    }

    if !current.is_empty() {
        paragraphs.push(current.join(" "));
    }

    paragraphs.join("\n\n")
}

/// Apply [`clean_text`] when `clean` is set, otherwise return the text as is.
pub fn post_process(text: String, clean: bool) -> String {
    if clean {
        clean_text(&text)
    } else {
        text
    }
}
