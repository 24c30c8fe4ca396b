//! Bulk import: parsed candidates through the upsert pipeline.

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::parser::InputFormat;
use crate::traits::store::DirectoryStore;
use crate::types::{CandidateRecord, ContributorId, SkippedLine, Submission};

use super::directory::Directory;

/// Aggregate statistics for one import.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportSummary {
    /// Candidates attempted (parser-skipped lines are not counted).
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub created: usize,
    pub updated: usize,
    /// Lines the parser could not turn into a candidate.
    pub skipped: usize,
    /// One message per failed candidate, naming its input line.
    pub errors: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped_lines: Vec<SkippedLine>,
}

impl<S: DirectoryStore> Directory<S> {
    /// Upsert every candidate in order. A failing candidate is counted and
    /// reported; the rest of the batch still runs.
    #[instrument(skip(self, candidates), fields(count = candidates.len()))]
    pub async fn import(
        &self,
        candidates: &[CandidateRecord],
        contributor_id: ContributorId,
    ) -> ImportSummary {
        let mut summary = ImportSummary {
            total: candidates.len(),
            ..Default::default()
        };

        for candidate in candidates {
            let mut submission = Submission::new(candidate.platform, candidate.raw_handle.clone())
                .with_contributor(contributor_id);
            submission.name = candidate.candidate_name.clone();

            match self.upsert_with_outcome(submission).await {
                Ok(outcome) => {
                    summary.succeeded += 1;
                    if outcome.is_created() {
                        summary.created += 1;
                    } else {
                        summary.updated += 1;
                    }
                }
                Err(e) => {
                    warn!(
                        line_number = candidate.line_number,
                        error = %e,
                        "Import candidate failed"
                    );
                    summary.failed += 1;
                    summary.errors.push(format!(
                        "line {} ({:?}): {}",
                        candidate.line_number, candidate.original_input_line, e
                    ));
                }
            }
        }

        info!(
            total = summary.total,
            created = summary.created,
            updated = summary.updated,
            failed = summary.failed,
            "Import finished"
        );
        summary
    }

    /// Parse `text` in the given format and import the candidates.
    pub async fn import_text(
        &self,
        text: &str,
        format: InputFormat,
        contributor_id: ContributorId,
    ) -> ImportSummary {
        let outcome = self.parser.parse(text, format);
        let mut summary = self.import(&outcome.candidates, contributor_id).await;
        summary.skipped = outcome.skipped.len();
        summary.skipped_lines = outcome.skipped;
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::MemoryStore;
    use crate::testing::FailingStore;
    use crate::types::{Confidence, Platform, SkipReason};

    fn candidate(platform: Platform, handle: &str, name: Option<&str>, line: usize) -> CandidateRecord {
        CandidateRecord {
            platform,
            raw_handle: handle.to_string(),
            original_input_line: format!("input {}", line),
            line_number: line,
            confidence: Confidence::High,
            candidate_name: name.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn counts_created_updated_and_failed() {
        let directory = Directory::new(MemoryStore::new());
        let candidates = vec![
            candidate(Platform::Instagram, "nike", Some("Nike"), 1),
            candidate(Platform::Instagram, "NIKE", None, 2),
            candidate(Platform::TwitterX, "way_too_long_for_twitter", None, 3),
            candidate(Platform::TwitterX, "nike", Some("Nike Inc"), 4),
        ];

        let summary = directory.import(&candidates, ContributorId::new()).await;
        assert_eq!(summary.total, 4);
        assert_eq!(summary.succeeded, 3);
        assert_eq!(summary.created, 2);
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.errors.len(), 1);
        assert!(summary.errors[0].contains("input 3"));
        assert_eq!(directory.store().len(), 2);
    }

    #[tokio::test]
    async fn store_failures_do_not_abort_the_batch() {
        let directory = Directory::new(FailingStore::new("connection refused"));
        let candidates = vec![
            candidate(Platform::Instagram, "nike", None, 1),
            candidate(Platform::Instagram, "adidas", None, 2),
        ];
        let summary = directory.import(&candidates, ContributorId::nil()).await;
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.succeeded, 0);
        assert!(summary.errors[1].starts_with("line 2"));
    }

    #[tokio::test]
    async fn text_import_reports_skipped_lines() {
        let directory = Directory::new(MemoryStore::new());
        let text = "Nike - @nike\nnothing here\nTesla | https://twitter.com/tesla\n";
        let summary = directory
            .import_text(text, InputFormat::Lines, ContributorId::nil())
            .await;
        assert_eq!(summary.total, 2);
        assert_eq!(summary.created, 2);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.skipped_lines[0].line_number, 2);
        assert_eq!(summary.skipped_lines[0].reason, SkipReason::UnrecognizedPattern);
    }

    #[tokio::test]
    async fn empty_batch() {
        let directory = Directory::new(MemoryStore::new());
        let summary = directory.import(&[], ContributorId::nil()).await;
        assert_eq!(summary, ImportSummary::default());
    }
}
