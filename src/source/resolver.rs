//! Path validation and size-guarded loading of PDF files

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Default size ceiling: 50 MiB
pub const MAX_FILE_BYTES: u64 = 50 * 1024 * 1024;

const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;

/// A validated path together with its size on disk
#[derive(Debug, Clone)]
pub struct DocumentHandle {
    pub path: PathBuf,
    pub size: u64,
}

impl DocumentHandle {
    /// File name without directories, as shown to the caller
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Size in MiB
    pub fn size_mb(&self) -> f64 {
        self.size as f64 / BYTES_PER_MIB
    }
}

/// Raw bytes of a loaded PDF
pub struct ResolvedPdf {
    pub handle: DocumentHandle,
    pub data: Vec<u8>,
}

/// Check that `path` is an existing `.pdf` file, and that it lies inside one
/// of `resource_dirs` when any are configured.
///
/// Only the existence probe touches the filesystem before the extension
/// check runs.
pub fn validate_path(path: &str, resource_dirs: &[String]) -> Result<PathBuf> {
    let candidate = Path::new(path);

    if !candidate.is_file() {
        return Err(Error::NotFound {
            path: path.to_string(),
        });
    }

    if !has_pdf_extension(candidate) {
        return Err(Error::InvalidExtension {
            path: path.to_string(),
        });
    }

    if resource_dirs.is_empty() {
        return Ok(candidate.to_path_buf());
    }

    let canonical = std::fs::canonicalize(candidate).map_err(|_| Error::PathAccessDenied {
        path: path.to_string(),
    })?;

    if is_within_dirs(&canonical, resource_dirs) {
        Ok(canonical)
    } else {
        Err(Error::PathAccessDenied {
            path: path.to_string(),
        })
    }
}

/// Case-insensitive `.pdf` suffix check
pub fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

/// Whether an already canonicalized path lies inside one of `dirs`
pub fn is_within_dirs(canonical: &Path, dirs: &[String]) -> bool {
    dirs.iter().any(|dir| {
        std::fs::canonicalize(dir)
            .map(|cd| canonical.starts_with(&cd))
            .unwrap_or(false)
    })
}

/// Stat a validated path and reject it if it exceeds `max_bytes`.
pub async fn stat_document(path: PathBuf, max_bytes: u64) -> Result<DocumentHandle> {
    let metadata = tokio::fs::metadata(&path).await?;
    let size = metadata.len();

    if size > max_bytes {
        return Err(Error::TooLarge {
            size_mb: size as f64 / BYTES_PER_MIB,
            max_mb: max_bytes / (1024 * 1024),
        });
    }

    Ok(DocumentHandle { path, size })
}

/// Validate, size-check and read a PDF file.
pub async fn load_document(
    path: &str,
    resource_dirs: &[String],
    max_bytes: u64,
) -> Result<ResolvedPdf> {
    let validated = validate_path(path, resource_dirs)?;
    let handle = stat_document(validated, max_bytes).await?;

    tracing::debug!(path = %handle.path.display(), size = handle.size, "reading PDF");

    let data = tokio::fs::read(&handle.path)
        .await
        .map_err(Error::load_failure)?;

    Ok(ResolvedPdf { handle, data })
}
