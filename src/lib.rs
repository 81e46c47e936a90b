//! PDF Reader MCP Server Library
//!
//! This crate provides MCP tools for reading PDFs:
//! - `extract`: Extract text content and metadata from a PDF
//! - `search`: Line-indexed search for text within a PDF
//! - `metadata`: Read document metadata, page count, and PDF version

pub mod error;
pub mod format;
pub mod pdf;
pub mod server;
pub mod source;
pub mod text;

pub use error::{Error, Result};
pub use server::{
    run_server, run_server_with_config, ExtractParams, MetadataParams, PdfServer, SearchParams,
    ServerConfig,
};
