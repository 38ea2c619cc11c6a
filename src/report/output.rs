//! Output report writing
//!
//! The report is append-only: the header goes out once before any row is
//! processed, and each result row is written (and flushed) as soon as it
//! succeeds, so partial progress survives a mid-run crash.

use super::UpgradeRow;
use crate::invoker::ChangeAssessment;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

const HEADER: [&str; 11] = [
    "file_path",
    "line_content",
    "old_groupid",
    "old_artifactid",
    "old_versionid",
    "target_groupid",
    "target_artifactid",
    "target_versionid",
    "change_type",
    "change_description",
    "explanation",
];

/// Derive the report path: a sibling of the input with an `_out` suffix
pub fn output_path(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let out_name = match name.strip_suffix(".csv") {
        Some(stem) => format!("{}_out.csv", stem),
        None => format!("{}_out.csv", name),
    };

    input.with_file_name(out_name)
}

/// Incremental CSV report writer
///
/// The file handle is not held open across rows; each append reopens the
/// file, writes one record and closes it.
pub struct ReportWriter {
    path: PathBuf,
}

impl ReportWriter {
    /// Create the report file next to the input and write the header
    pub fn create(input_path: &Path) -> Result<Self> {
        let writer = Self {
            path: output_path(input_path),
        };
        writer.write_header()?;
        Ok(writer)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_header(&self) -> Result<()> {
        let file = std::fs::File::create(&self.path)
            .with_context(|| format!("creating {}", self.path.display()))?;
        let mut wtr = csv::Writer::from_writer(file);
        wtr.write_record(HEADER)?;
        wtr.flush()?;
        Ok(())
    }

    /// Append one result row
    pub fn append(&self, row: &UpgradeRow, assessment: &ChangeAssessment) -> Result<()> {
        let file = std::fs::OpenOptions::new()
            .append(true)
            .open(&self.path)
            .with_context(|| format!("opening {}", self.path.display()))?;

        let mut wtr = csv::Writer::from_writer(file);
        wtr.write_record([
            row.file_path.as_str(),
            row.line_content.as_str(),
            row.old_group_id.as_str(),
            row.old_artifact_id.as_str(),
            row.old_version_id.as_str(),
            row.target_group_id.as_str(),
            row.target_artifact_id.as_str(),
            row.target_version_id.as_str(),
            assessment.change_type.as_str(),
            assessment.change_description.as_str(),
            assessment.explanation.as_str(),
        ])?;
        wtr.flush()?;
        Ok(())
    }
}
