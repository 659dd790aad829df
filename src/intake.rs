//! File Intake
//!
//! Turns whatever the user hands us (a typed path, a path dropped onto the
//! terminal, or the server's sample asset) into a single [`UploadedFile`].

use crate::models::UploadedFile;
use crate::types::AppResult;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// File name given to the sample asset once fetched
pub const SAMPLE_FILE_NAME: &str = "sample_data.csv";

/// Content type of the sample asset
pub const SAMPLE_CONTENT_TYPE: &str = "text/csv";

/// Where an intake file came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntakeSource {
    Selected,
    Dropped,
    Sample,
}

/// Normalize a path delivered by a terminal drag-and-drop (bracketed paste).
///
/// Only the first dropped file is kept. Returns `None` when nothing usable
/// was pasted.
pub fn normalize_dropped_path(raw: &str) -> Option<PathBuf> {
    let first = raw.lines().map(str::trim).find(|l| !l.is_empty())?;

    let unquoted = strip_quotes(first);
    let without_scheme = unquoted.strip_prefix("file://").unwrap_or(unquoted);
    let unescaped = without_scheme.replace("\\ ", " ");
    let trimmed = unescaped.trim();

    if trimmed.is_empty() {
        None
    } else {
        Some(PathBuf::from(trimmed))
    }
}

/// Normalize a path typed into the intake input
pub fn normalize_selected_path(raw: &str) -> Option<PathBuf> {
    let trimmed = strip_quotes(raw.trim()).trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(PathBuf::from(trimmed))
    }
}

fn strip_quotes(s: &str) -> &str {
    for quote in ['\'', '"'] {
        if s.len() >= 2 && s.starts_with(quote) && s.ends_with(quote) {
            return &s[1..s.len() - 1];
        }
    }
    s
}

/// Read a local file into memory
pub async fn read_local_file(path: &Path) -> AppResult<UploadedFile> {
    let bytes = fs::read(path).await?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let content_type = mime_guess::from_path(path)
        .first_or(mime::APPLICATION_OCTET_STREAM)
        .essence_str()
        .to_string();

    info!("Read {} ({} bytes, {})", name, bytes.len(), content_type);
    Ok(UploadedFile::new(name, content_type, bytes))
}

/// Wrap the fetched sample asset as an uploadable file
pub fn sample_file(bytes: impl Into<bytes::Bytes>) -> UploadedFile {
    let file = UploadedFile::new(SAMPLE_FILE_NAME, SAMPLE_CONTENT_TYPE, bytes);
    debug!("Sample data wrapped ({} bytes)", file.len());
    file
}
