//! Loading image files from disk.

use std::path::Path;
use std::time::UNIX_EPOCH;

use anyhow::{Context, Result};
use batchquery_core::{ImageHandle, ImageMetadata};

/// Read `path` into an [`ImageHandle`].
///
/// The MIME type is guessed from the extension only. Whether it is
/// acceptable is decided later by intake.
pub async fn load_image(path: &Path) -> Result<ImageHandle> {
    let metadata = tokio::fs::metadata(path)
        .await
        .with_context(|| format!("Failed to stat {}", path.display()))?;
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let last_modified_ms = metadata
        .modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0);

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let mime_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();

    Ok(ImageHandle::new(
        ImageMetadata {
            name,
            byte_size: bytes.len() as u64,
            last_modified_ms,
            mime_type,
        },
        bytes,
    ))
}
