//! Line-indexed search over extracted text

use crate::error::{Error, Result};
use regex::Regex;

/// Number of matching lines shown to the caller
pub const DEFAULT_DISPLAY_LIMIT: usize = 20;

/// Matching policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchOptions {
    pub case_sensitive: bool,
    pub whole_word: bool,
}

/// A line containing at least one match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMatch {
    /// Line number (1-indexed)
    pub line: usize,
    /// Trimmed line content, original case
    pub content: String,
    /// Non-overlapping matches on this line
    pub count: usize,
}

/// Every matching line of a document, in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOutcome {
    pub matches: Vec<SearchMatch>,
    /// Sum of per-line counts over all matching lines
    pub total_matches: usize,
}

impl SearchOutcome {
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn matching_lines(&self) -> usize {
        self.matches.len()
    }

    /// The first `limit` matching lines
    pub fn displayed(&self, limit: usize) -> &[SearchMatch] {
        &self.matches[..self.matches.len().min(limit)]
    }

    /// Matching lines left out by [`SearchOutcome::displayed`]
    pub fn omitted(&self, limit: usize) -> usize {
        self.matches.len().saturating_sub(limit)
    }
}

/// Build the literal pattern for `query`. Every regex metacharacter is
/// escaped; whole-word queries are anchored on word boundaries.
pub fn build_pattern(query: &str, options: SearchOptions) -> Result<Regex> {
    if query.is_empty() {
        return Err(Error::InvalidQuery {
            reason: "query must not be empty".to_string(),
        });
    }

    let needle = if options.case_sensitive {
        query.to_string()
    } else {
        query.to_lowercase()
    };
    let escaped = regex::escape(&needle);

    let pattern = if options.whole_word {
        format!(r"\b{}\b", escaped)
    } else {
        escaped
    };

    Regex::new(&pattern).map_err(|e| Error::InvalidQuery {
        reason: e.to_string(),
    })
}

/// Search `text` line by line.
///
/// Lines are split on `\n` and numbered from 1. Unless `case_sensitive` is
/// set, line and query are both lowercased before matching.
pub fn search_text(text: &str, query: &str, options: SearchOptions) -> Result<SearchOutcome> {
    let pattern = build_pattern(query, options)?;
    Ok(search_with_pattern(text, &pattern, options.case_sensitive))
}

/// Search with a pattern from [`build_pattern`]. `case_sensitive` must match
/// the options the pattern was built with.
pub fn search_with_pattern(text: &str, pattern: &Regex, case_sensitive: bool) -> SearchOutcome {
    let mut outcome = SearchOutcome::default();

    for (index, line) in text.split('\n').enumerate() {
        let count = if case_sensitive {
            pattern.find_iter(line).count()
        } else {
            pattern.find_iter(&line.to_lowercase()).count()
        };

        if count > 0 {
            outcome.total_matches += count;
            outcome.matches.push(SearchMatch {
                line: index + 1,
                content: line.trim().to_string(),
                count,
            });
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn opts(case_sensitive: bool, whole_word: bool) -> SearchOptions {
        SearchOptions {
            case_sensitive,
            whole_word,
        }
    }

    #[test]
    fn test_search_reports_line_numbers() {
        let outcome = search_text("Revenue up.\nCosts down.", "down", opts(false, false)).unwrap();
        assert_eq!(
            outcome.matches,
            vec![SearchMatch {
                line: 2,
                content: "Costs down.".to_string(),
                count: 1,
            }]
        );
        assert_eq!(outcome.total_matches, 1);
    }

    #[test]
    fn test_search_counts_non_overlapping() {
        let outcome = search_text("aaaa\nbanana", "aa", opts(false, false)).unwrap();
        assert_eq!(outcome.matches[0].count, 2);
        assert_eq!(outcome.matching_lines(), 1);

        let outcome = search_text("banana", "ana", opts(false, false)).unwrap();
        assert_eq!(outcome.total_matches, 1);
    }

    #[test]
    fn test_search_trims_content_but_keeps_case() {
        let outcome = search_text("   The Quick Fox   ", "quick", opts(false, false)).unwrap();
        assert_eq!(outcome.matches[0].content, "The Quick Fox");
    }

    #[rstest]
    #[case("TRACE", "trace monkey", false, 1)]
    #[case("trace", "TRACE MONKEY", false, 1)]
    #[case("Trace", "trace monkey", true, 0)]
    #[case("trace", "trace monkey", true, 1)]
    fn test_case_sensitivity(
        #[case] query: &str,
        #[case] text: &str,
        #[case] case_sensitive: bool,
        #[case] expected: usize,
    ) {
        let outcome = search_text(text, query, opts(case_sensitive, false)).unwrap();
        assert_eq!(outcome.total_matches, expected);
    }

    #[rstest]
    #[case("a cat sat", 1)]
    #[case("category", 0)]
    #[case("cat, cat. (cat)", 3)]
    #[case("concatenate", 0)]
    fn test_whole_word(#[case] line: &str, #[case] expected: usize) {
        let outcome = search_text(line, "cat", opts(false, true)).unwrap();
        assert_eq!(outcome.total_matches, expected);
    }

    #[test]
    fn test_substring_matches_inside_words() {
        let outcome = search_text("category", "cat", opts(false, false)).unwrap();
        assert_eq!(outcome.total_matches, 1);
    }

    #[rstest]
    #[case("a.b", "axb a.b", 1)]
    #[case("(x)", "f(x) + (x)", 2)]
    #[case("$5*2", "cost $5*2", 1)]
    #[case("[a-z]+", "abc [a-z]+", 1)]
    fn test_metacharacters_are_literal(
        #[case] query: &str,
        #[case] text: &str,
        #[case] expected: usize,
    ) {
        let outcome = search_text(text, query, opts(true, false)).unwrap();
        assert_eq!(outcome.total_matches, expected);
    }

    #[test]
    fn test_whole_word_escapes_metacharacters() {
        let outcome = search_text("v1.2 and v1x2", "v1.2", opts(false, true)).unwrap();
        assert_eq!(outcome.total_matches, 1);
    }

    #[test]
    fn test_empty_query_rejected() {
        let result = search_text("anything", "", SearchOptions::default());
        assert!(matches!(result, Err(Error::InvalidQuery { .. })));
    }

    #[test]
    fn test_no_matches_is_empty_outcome() {
        let outcome = search_text("nothing here", "absent", SearchOptions::default()).unwrap();
        assert!(outcome.is_empty());
        assert_eq!(outcome.total_matches, 0);
        assert_eq!(outcome.omitted(DEFAULT_DISPLAY_LIMIT), 0);
    }

    #[test]
    fn test_truncation_keeps_totals() {
        let text = (1..=25)
            .map(|i| format!("line {} hit hit", i))
            .collect::<Vec<_>>()
            .join("\n");
        let outcome = search_text(&text, "hit", SearchOptions::default()).unwrap();

        assert_eq!(outcome.matching_lines(), 25);
        assert_eq!(outcome.total_matches, 50);
        assert_eq!(
            outcome.total_matches,
            outcome.matches.iter().map(|m| m.count).sum::<usize>()
        );

        let shown = outcome.displayed(DEFAULT_DISPLAY_LIMIT);
        assert_eq!(shown.len(), 20);
        assert_eq!(shown.first().unwrap().line, 1);
        assert_eq!(shown.last().unwrap().line, 20);
        assert_eq!(outcome.omitted(DEFAULT_DISPLAY_LIMIT), 5);
    }

    #[test]
    fn test_matches_in_document_order() {
        let outcome = search_text("x\ny\nx\n\nx", "x", SearchOptions::default()).unwrap();
        let lines: Vec<usize> = outcome.matches.iter().map(|m| m.line).collect();
        assert_eq!(lines, vec![1, 3, 5]);
    }
}
