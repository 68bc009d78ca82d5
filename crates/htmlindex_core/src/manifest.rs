//! Vendor resource manifests.
//!
//! A manifest is a plain text file listing one resource path per line,
//! written by the resource resolution step that runs before index
//! generation. A missing or empty manifest means there are no vendor
//! resources of that kind; a manifest that exists but cannot be read means
//! the earlier step is broken, and is reported as a fatal error.

use std::io::ErrorKind;
use std::path::Path;

use tracing::{debug, error};

use crate::error::{IndexError, IndexResult};
use crate::tags::{tag_block, Marker, TagFiller};

/// Read the resource paths listed in a manifest, in file order.
pub async fn read_manifest(path: &Path) -> IndexResult<Vec<String>> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("No manifest at {:?}", path);
            return Ok(Vec::new());
        }
        Err(source) => {
            error!("Failed to read manifest {:?}: {}", path, source);
            return Err(IndexError::ManifestRead {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    Ok(parse_manifest(&content))
}

/// Split manifest text into entries, ignoring blank lines.
pub fn parse_manifest(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Replace `marker` with one tag per manifest entry.
///
/// The marker is stripped when the manifest lists nothing.
pub async fn fill_from_manifest(
    filler: &TagFiller,
    content: &str,
    marker: Marker,
    manifest: &Path,
    tag: fn(&str) -> String,
) -> IndexResult<String> {
    let entries = read_manifest(manifest).await?;
    debug!(
        "Filling {} with {} entries from {:?}",
        marker.comment(),
        entries.len(),
        manifest
    );

    let block = tag_block(&entries, tag);
    Ok(filler.fill_marker(content, marker, &block))
}
