use serde::{Deserialize, Serialize};

use super::platform::{Confidence, Platform};

/// A parsed, not-yet-persisted handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub platform: Platform,
    /// Bare handle extracted from the input (no URL, no leading `@`).
    pub raw_handle: String,
    pub original_input_line: String,
    /// 1-based line (or table row) number in the source text.
    pub line_number: usize,
    pub confidence: Confidence,
    pub candidate_name: Option<String>,
}

/// Why a line produced no candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// No platform recognizer matched
    UnrecognizedPattern,
    /// Table row whose platform column was set but whose handle cell was empty
    MissingHandle,
    /// Row the delimited-table reader could not decode
    MalformedRow,
}

/// A line dropped by the parser, kept so callers can see what was lost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedLine {
    pub line_number: usize,
    pub line: String,
    pub reason: SkipReason,
}

/// Parser output: recognized candidates plus the lines that were dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParseOutcome {
    pub candidates: Vec<CandidateRecord>,
    pub skipped: Vec<SkippedLine>,
}

impl ParseOutcome {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub(crate) fn skip(&mut self, line_number: usize, line: &str, reason: SkipReason) {
        self.skipped.push(SkippedLine {
            line_number,
            line: line.to_string(),
            reason,
        });
    }
}
