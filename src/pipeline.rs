//! Row processing: bounded retry around the fallback chain

use crate::invoker::FallbackChain;
use crate::prompt;
use crate::report::{LoadedFile, ReportWriter};
use tracing::{error, info, warn};

/// Counts for the end-of-run log line
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Rows written to the report
    pub written: usize,

    /// Rows that exhausted their attempt budget
    pub skipped: usize,

    /// Assessments that were produced but could not be appended
    pub write_failures: usize,
}

/// Process rows in input order, appending each success immediately
///
/// Every attempt re-runs the full fallback chain from the first backend.
/// A row that fails all its attempts is skipped; nothing here aborts the
/// run, including a failed append.
pub async fn process_rows(
    files: &[LoadedFile],
    chain: &FallbackChain,
    writer: &ReportWriter,
    max_attempts: u32,
) -> RunSummary {
    let mut summary = RunSummary::default();

    for file in files {
        let instruction = prompt::build_instruction(&file.row, file.content.as_deref());
        let mut resolved = false;

        for attempt in 1..=max_attempts {
            match chain.assess(&instruction).await {
                Ok((assessment, backend)) => {
                    info!(
                        backend = %backend,
                        change_type = %assessment.change_type,
                        "{}: {}",
                        file.row.file_path,
                        assessment.change_description
                    );

                    match writer.append(&file.row, &assessment) {
                        Ok(()) => summary.written += 1,
                        Err(e) => {
                            error!("failed to append row for {}: {:#}", file.row.file_path, e);
                            summary.write_failures += 1;
                        }
                    }

                    resolved = true;
                    break;
                }
                Err(e) => {
                    warn!(
                        attempt,
                        max_attempts,
                        "no assessment for {}: {}",
                        file.full_path.display(),
                        e
                    );
                }
            }
        }

        if !resolved {
            warn!(
                "giving up on {} after {} attempts",
                file.full_path.display(),
                max_attempts
            );
            summary.skipped += 1;
        }
    }

    summary
}
