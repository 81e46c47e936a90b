//! Post-processing and search over extracted text

pub mod clean;
pub mod search;

pub use clean::{clean_text, post_process};
pub use search::{
    build_pattern, search_text, search_with_pattern, SearchMatch, SearchOptions, SearchOutcome,
    DEFAULT_DISPLAY_LIMIT,
};
