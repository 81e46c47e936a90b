//! MCP Server implementation using rmcp

use crate::error::Error;
use crate::format::{
    format_error, format_extraction, format_metadata, format_search, ExtractionReport,
    SearchReport,
};
use crate::pdf::{normalize, PageSelection, PdfReader};
use crate::source::{
    has_pdf_extension, is_within_dirs, load_document, DocumentHandle, ResolvedPdf, MAX_FILE_BYTES,
};
use crate::text::{
    build_pattern, post_process, search_with_pattern, SearchOptions, DEFAULT_DISPLAY_LIMIT,
};
use anyhow::Result;
use rmcp::{
    handler::server::tool::ToolRouter, handler::server::wrapper::Parameters, model::*,
    schemars::JsonSchema, service::RequestContext, tool, tool_handler, tool_router, RoleServer,
    ServerHandler, ServiceExt,
};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

/// Environment variable holding the resource directories (platform path-list syntax)
pub const ENV_RESOURCE_DIRS: &str = "PDF_READER_RESOURCE_DIRS";
/// Environment variable overriding the size ceiling, in whole MiB
pub const ENV_MAX_FILE_MB: &str = "PDF_READER_MAX_FILE_MB";

/// Configuration for the PDF Reader MCP Server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Directories to expose as PDF resources. When non-empty, tools only
    /// accept files inside them.
    pub resource_dirs: Vec<String>,
    /// Size ceiling in bytes (default: 50MB)
    pub max_file_bytes: u64,
    /// Matching lines shown by `search` (default: 20)
    pub max_displayed_matches: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            resource_dirs: Vec::new(),
            max_file_bytes: MAX_FILE_BYTES,
            max_displayed_matches: DEFAULT_DISPLAY_LIMIT,
        }
    }
}

impl ServerConfig {
    /// Build a configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dirs) = lookup(ENV_RESOURCE_DIRS) {
            config.resource_dirs = std::env::split_paths(&dirs)
                .filter(|p| !p.as_os_str().is_empty())
                .map(|p| p.to_string_lossy().to_string())
                .collect();
        }

        if let Some(raw) = lookup(ENV_MAX_FILE_MB) {
            match raw.trim().parse::<u64>() {
                Ok(mb) if mb > 0 => config.max_file_bytes = mb * 1024 * 1024,
                _ => tracing::warn!(
                    value = %raw,
                    "ignoring invalid {}, using default",
                    ENV_MAX_FILE_MB
                ),
            }
        }

        config
    }
}

/// PDF Reader MCP Server
#[derive(Clone)]
pub struct PdfServer {
    tool_router: ToolRouter<Self>,
    /// Server configuration
    config: Arc<ServerConfig>,
}

// ============================================================================
// Request types
// ============================================================================

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ExtractParams {
    /// Path to the PDF file to extract text from
    pub file: String,
    /// Pages to extract: "all" or a selection such as "1-5,10"
    #[serde(default = "default_pages")]
    pub pages: String,
    /// Include PDF metadata
    #[serde(default = "default_true")]
    pub include_metadata: bool,
    /// Collapse whitespace and blank lines in the extracted text
    #[serde(default)]
    pub clean_text: bool,
}

fn default_pages() -> String {
    "all".to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchParams {
    /// Path to the PDF file to search
    pub file: String,
    /// Text to search for (matched literally)
    pub query: String,
    /// Case-sensitive search
    #[serde(default)]
    pub case_sensitive: bool,
    /// Only match whole words
    #[serde(default)]
    pub whole_word: bool,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct MetadataParams {
    /// Path to the PDF file
    pub file: String,
}

// ============================================================================
// Tool implementations
// ============================================================================

#[tool_router]
impl PdfServer {
    pub fn new() -> Self {
        Self::with_config(ServerConfig::default())
    }

    /// Create a new PdfServer with full configuration
    pub fn with_config(config: ServerConfig) -> Self {
        Self {
            tool_router: Self::tool_router(),
            config: Arc::new(config),
        }
    }

    /// Extract text content from a PDF file
    #[tool(
        description = "Extract text content and metadata from a PDF file.

Options:
- pages: \"all\" (default) or a selection such as \"1-5,10\"
- include_metadata: include title, author, dates, etc. (default: true)
- clean_text: collapse whitespace and blank lines (default: false)"
    )]
    async fn extract(&self, Parameters(params): Parameters<ExtractParams>) -> String {
        Self::into_payload("extract", self.process_extract(&params).await)
    }

    /// Search for text within a PDF file
    #[tool(
        description = "Search for text within a PDF file. Returns matching lines with line numbers and per-line match counts (first 20 lines shown).

Matching is case-insensitive by default. Set whole_word to only match complete words."
    )]
    async fn search(&self, Parameters(params): Parameters<SearchParams>) -> String {
        Self::into_payload("search", self.process_search(&params).await)
    }

    /// Read metadata from a PDF file
    #[tool(
        description = "Get metadata from a PDF file: title, author, subject, creator, producer, dates, keywords, page count, encryption flag, and PDF version."
    )]
    async fn metadata(&self, Parameters(params): Parameters<MetadataParams>) -> String {
        Self::into_payload("metadata", self.process_metadata(&params).await)
    }
}

impl PdfServer {
    /// Turn an operation result into the text payload sent to the client.
    /// Failures become an `Error: ...` message; they never surface as
    /// protocol errors.
    pub fn into_payload(tool: &str, result: crate::error::Result<String>) -> String {
        result.unwrap_or_else(|e| {
            tracing::warn!(tool, error = %e, "tool call failed");
            format_error(&e)
        })
    }

    /// Validate, load and parse a document
    async fn open_document(
        &self,
        file: &str,
        metadata_only: bool,
    ) -> crate::error::Result<(DocumentHandle, PdfReader)> {
        let ResolvedPdf { handle, data } = load_document(
            file,
            &self.config.resource_dirs,
            self.config.max_file_bytes,
        )
        .await?;

        let reader = tokio::task::spawn_blocking(move || {
            if metadata_only {
                PdfReader::open_bytes_metadata_only(&data)
            } else {
                PdfReader::open_bytes(&data)
            }
        })
        .await
        .map_err(|e| Error::load_failure(format!("parser task failed: {}", e)))??;

        tracing::debug!(
            file = %handle.path.display(),
            pages = reader.page_count(),
            "parsed PDF"
        );

        Ok((handle, reader))
    }

    pub async fn process_extract(&self, params: &ExtractParams) -> crate::error::Result<String> {
        let (handle, reader) = self.open_document(&params.file, false).await?;

        let selection = PageSelection::parse(Some(&params.pages), reader.page_count())?;
        let text = post_process(reader.text(&selection)?, params.clean_text);
        let metadata = params
            .include_metadata
            .then(|| normalize(reader.metadata()));

        Ok(format_extraction(&ExtractionReport {
            handle: &handle,
            page_count: reader.page_count(),
            pages_extracted: selection.describe(),
            metadata: metadata.as_ref(),
            text: &text,
        }))
    }

    pub async fn process_search(&self, params: &SearchParams) -> crate::error::Result<String> {
        let options = SearchOptions {
            case_sensitive: params.case_sensitive,
            whole_word: params.whole_word,
        };
        // A bad query fails before the file is read
        let pattern = build_pattern(&params.query, options)?;

        let (handle, reader) = self.open_document(&params.file, false).await?;
        let outcome =
            search_with_pattern(&reader.full_text(), &pattern, options.case_sensitive);

        tracing::debug!(
            query = %params.query,
            lines = outcome.matching_lines(),
            total = outcome.total_matches,
            "search complete"
        );

        Ok(format_search(&SearchReport {
            handle: &handle,
            query: &params.query,
            outcome: &outcome,
            display_limit: self.config.max_displayed_matches,
        }))
    }

    pub async fn process_metadata(&self, params: &MetadataParams) -> crate::error::Result<String> {
        let (handle, reader) = self.open_document(&params.file, true).await?;
        let metadata = normalize(reader.metadata());
        Ok(format_metadata(&handle, reader.page_count(), &metadata))
    }

    /// All PDF files below the configured resource directories, sorted by path
    pub fn list_resource_files(&self) -> Vec<(std::path::PathBuf, std::fs::Metadata)> {
        let mut files = Vec::new();
        for dir in &self.config.resource_dirs {
            Self::collect_pdfs(Path::new(dir), &mut files);
        }
        files.sort_by(|a, b| a.0.cmp(&b.0));
        files.dedup_by(|a, b| a.0 == b.0);
        files
    }

    fn collect_pdfs(dir: &Path, files: &mut Vec<(std::path::PathBuf, std::fs::Metadata)>) {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!(dir = %dir.display(), error = %e, "skipping unreadable directory");
                return;
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                Self::collect_pdfs(&path, files);
            } else if path.is_file() && has_pdf_extension(&path) {
                if let Ok(metadata) = std::fs::metadata(&path) {
                    files.push((path, metadata));
                }
            }
        }
    }

    fn is_resource_path_allowed(&self, path: &str) -> bool {
        if self.config.resource_dirs.is_empty() {
            return true;
        }
        std::fs::canonicalize(path)
            .map(|canonical| is_within_dirs(&canonical, &self.config.resource_dirs))
            .unwrap_or(false)
    }
}

impl Default for PdfServer {
    fn default() -> Self {
        Self::new()
    }
}

fn describe_resource(metadata: &std::fs::Metadata) -> String {
    let modified = metadata
        .modified()
        .ok()
        .map(chrono::DateTime::<chrono::Utc>::from)
        .map(|dt| format!(", modified: {}", dt.to_rfc3339()))
        .unwrap_or_default();
    format!("PDF file ({} bytes){}", metadata.len(), modified)
}

/// Resource entry for a PDF; `size` is left out when it does not fit in u32
fn pdf_resource(path: &Path, metadata: &std::fs::Metadata) -> Annotated<RawResource> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let mut resource = RawResource::new(format!("file://{}", path.display()), name);
    resource.mime_type = Some("application/pdf".to_string());
    resource.description = Some(describe_resource(metadata));
    resource.size = u32::try_from(metadata.len()).ok();

    Annotated {
        raw: resource,
        annotations: None,
    }
}

#[tool_handler]
impl ServerHandler for PdfServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "PDF Reader provides tools for extracting text and metadata from PDF files \
                 and searching their content line by line. PDF files in configured \
                 directories are also exposed as resources."
                    .into(),
            ),
        }
    }

    /// List available PDF resources from configured directories
    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, ErrorData> {
        let resources = self
            .list_resource_files()
            .into_iter()
            .map(|(path, metadata)| pdf_resource(&path, &metadata))
            .collect();

        Ok(ListResourcesResult {
            resources,
            next_cursor: None,
            meta: Default::default(),
        })
    }

    /// Read a PDF resource and return its text content
    async fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, ErrorData> {
        let uri = &request.uri;

        let Some(path) = uri.strip_prefix("file://") else {
            return Err(ErrorData::invalid_params(
                "Only file:// URIs are supported",
                None,
            ));
        };

        if !self.is_resource_path_allowed(path) {
            return Err(ErrorData::invalid_params(
                "Resource not found in configured directories",
                None,
            ));
        }

        match self.open_document(path, false).await {
            Ok((_, reader)) => Ok(ReadResourceResult {
                contents: vec![ResourceContents::TextResourceContents {
                    uri: uri.clone(),
                    mime_type: Some("text/plain".to_string()),
                    text: reader.full_text(),
                    meta: Default::default(),
                }],
            }),
            Err(e) => {
                tracing::warn!(error = %e, "read_resource failed");
                Err(ErrorData::internal_error(e.client_message(), None))
            }
        }
    }
}

/// Run the MCP server with default configuration
pub async fn run_server() -> Result<()> {
    run_server_with_config(ServerConfig::default()).await
}

/// Run the MCP server with full configuration
pub async fn run_server_with_config(config: ServerConfig) -> Result<()> {
    tracing::info!(
        resource_dirs = ?config.resource_dirs,
        max_file_bytes = config.max_file_bytes,
        "PDF Reader MCP Server ready, waiting for connections..."
    );

    let server = PdfServer::with_config(config);
    let service = server.serve(rmcp::transport::io::stdio()).await?;
    service.waiting().await?;

    Ok(())
}
