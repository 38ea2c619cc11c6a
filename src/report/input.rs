//! Input table loading
//!
//! The input CSV comes out of a dependency scanner; its coordinate headers
//! contain spaces ("old groupId" etc.), preserved here via serde renames.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::warn;

/// One flagged source-code reference to a library being upgraded
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UpgradeRow {
    pub file_path: String,
    pub line_content: String,
    #[serde(rename = "old groupId")]
    pub old_group_id: String,
    #[serde(rename = "old artifactId")]
    pub old_artifact_id: String,
    #[serde(rename = "old versionId")]
    pub old_version_id: String,
    #[serde(rename = "target groupId")]
    pub target_group_id: String,
    #[serde(rename = "target artifactId")]
    pub target_artifact_id: String,
    #[serde(rename = "target versionId")]
    pub target_version_id: String,
}

/// A row plus the (bounded) content of the file it points at
#[derive(Debug, Clone)]
pub struct LoadedFile {
    /// Source root joined with the row's file_path
    pub full_path: PathBuf,

    pub row: UpgradeRow,

    /// First `content_limit` characters of the file, None if unreadable
    pub content: Option<String>,
}

/// Load the input table and the file content for each row
///
/// A malformed table aborts with an error; an unreadable source file only
/// costs that row its content.
pub fn load_rows(
    csv_path: &Path,
    source_root: &Path,
    content_limit: usize,
) -> Result<Vec<LoadedFile>> {
    let mut reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("opening {}", csv_path.display()))?;

    let mut files = Vec::new();
    for (index, record) in reader.deserialize().enumerate() {
        let row: UpgradeRow =
            record.with_context(|| format!("parsing row {} of {}", index + 1, csv_path.display()))?;

        let full_path = source_root.join(&row.file_path);
        let content = read_capped(&full_path, content_limit);
        if content.is_none() {
            warn!("file not found: {}", full_path.display());
        }

        files.push(LoadedFile {
            full_path,
            row,
            content,
        });
    }

    Ok(files)
}

/// Read a file as text, truncated to `limit` characters
///
/// The read itself is bounded, not just the result: at most 4 bytes per
/// character are pulled off disk, which guarantees `limit` complete
/// characters without ever loading a huge file whole. A character split at
/// the byte budget becomes a trailing replacement character, which the
/// char-boundary truncation then drops.
fn read_capped(path: &Path, limit: usize) -> Option<String> {
    let budget = (limit as u64).saturating_mul(4);
    let file = std::fs::File::open(path).ok()?;

    let mut bytes = Vec::new();
    file.take(budget).read_to_end(&mut bytes).ok()?;
    let text = String::from_utf8_lossy(&bytes);

    match text.char_indices().nth(limit) {
        Some((byte_offset, _)) => Some(text[..byte_offset].to_string()),
        None => Some(text.into_owned()),
    }
}
