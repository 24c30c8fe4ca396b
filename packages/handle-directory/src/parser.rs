//! Raw contributor text → candidate records.
//!
//! Two input shapes are understood: free text with one entry per line
//! (`Nike - @nike`, bare URLs, bare handles) and delimited tables with an
//! optional header row. Parsing never fails as a whole; lines that yield no
//! candidate are reported in [`ParseOutcome::skipped`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::patterns::{Detection, PatternLibrary};
use crate::types::{CandidateRecord, ParseOutcome, Platform, SkipReason};

/// Separators tried, in order, between a name and a handle on one line.
const NAME_SEPARATORS: &[char] = &[',', '-', '|'];

/// Header cells that mark the first table row as column titles.
const HEADER_TOKENS: &[&str] = &["name", "platform"];

/// Delimiters considered for tables, in tie-break order.
const TABLE_DELIMITERS: &[u8] = b"\t;,";

/// Shape of bulk input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    #[default]
    Lines,
    Table,
}

impl std::str::FromStr for InputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lines" | "text" | "txt" => Ok(InputFormat::Lines),
            "table" | "csv" | "tsv" => Ok(InputFormat::Table),
            other => Err(format!("unknown input format: {}", other)),
        }
    }
}

/// Turns pasted text into [`CandidateRecord`]s using a [`PatternLibrary`].
#[derive(Debug, Clone, Default)]
pub struct HandleParser {
    patterns: PatternLibrary,
}

impl HandleParser {
    pub fn new(patterns: PatternLibrary) -> Self {
        Self { patterns }
    }

    pub fn patterns(&self) -> &PatternLibrary {
        &self.patterns
    }

    pub fn parse(&self, text: &str, format: InputFormat) -> ParseOutcome {
        match format {
            InputFormat::Lines => self.parse_lines(text),
            InputFormat::Table => self.parse_table(text),
        }
    }

    /// Parse one entry per line. Empty lines are ignored.
    pub fn parse_lines(&self, text: &str) -> ParseOutcome {
        let mut outcome = ParseOutcome::default();
        for (index, line) in text.lines().enumerate() {
            let line_number = index + 1;
            if line.trim().is_empty() {
                continue;
            }
            match self.parse_line(line, line, line_number) {
                Some(candidate) => outcome.candidates.push(candidate),
                None => outcome.skip(line_number, line, SkipReason::UnrecognizedPattern),
            }
        }
        debug!(
            candidates = outcome.candidates.len(),
            skipped = outcome.skipped.len(),
            "Parsed line input"
        );
        outcome
    }

    /// Parse a delimited table (tab, semicolon or comma; auto-detected).
    ///
    /// Rows starting with a platform name are read as
    /// `platform, handle[, name]`; other rows are treated like a free-text
    /// line built from their cells.
    pub fn parse_table(&self, text: &str) -> ParseOutcome {
        let mut outcome = ParseOutcome::default();
        let lines: Vec<&str> = text.lines().collect();
        let delimiter = detect_delimiter(text);

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());

        let mut first_row = true;
        for row in reader.records() {
            let row = match row {
                Ok(row) => row,
                Err(e) => {
                    let line_number = e.position().map(|p| p.line() as usize).unwrap_or(0);
                    let line = source_line(&lines, line_number);
                    debug!(line_number, error = %e, "Skipping malformed table row");
                    outcome.skip(line_number, line, SkipReason::MalformedRow);
                    first_row = false;
                    continue;
                }
            };
            let line_number = row.position().map(|p| p.line() as usize).unwrap_or(0);
            let original = source_line(&lines, line_number);
            let cells: Vec<&str> = row.iter().filter(|c| !c.is_empty()).collect();
            if cells.is_empty() {
                continue;
            }
            if std::mem::take(&mut first_row) && is_header(&cells) {
                continue;
            }

            if let Some(platform) = Platform::from_label(cells[0]) {
                match self.explicit_row(platform, &cells, original, line_number) {
                    Some(candidate) => outcome.candidates.push(candidate),
                    None => outcome.skip(line_number, original, SkipReason::MissingHandle),
                }
                continue;
            }

            let joined = cells.join(", ");
            match self.parse_line(&joined, original, line_number) {
                Some(candidate) => outcome.candidates.push(candidate),
                None => outcome.skip(line_number, original, SkipReason::UnrecognizedPattern),
            }
        }
        debug!(
            candidates = outcome.candidates.len(),
            skipped = outcome.skipped.len(),
            delimiter = ?(delimiter as char),
            "Parsed table input"
        );
        outcome
    }

    /// `name <sep> value`, else the whole line as a value.
    fn parse_line(&self, line: &str, original: &str, line_number: usize) -> Option<CandidateRecord> {
        let trimmed = line.trim();

        for separator in NAME_SEPARATORS {
            // rightmost first so names may contain the separator ("Coca-Cola - @cocacola")
            for (position, _) in trimmed.rmatch_indices(*separator) {
                let name = trimmed[..position].trim();
                let value = trimmed[position + separator.len_utf8()..].trim();
                if name.is_empty() || value.is_empty() {
                    continue;
                }
                if let Some(detection) = self.patterns.detect(value) {
                    return Some(candidate(detection, Some(name), original, line_number));
                }
            }
        }

        self.patterns
            .detect(trimmed)
            .map(|detection| candidate(detection, None, original, line_number))
    }

    fn explicit_row(
        &self,
        platform: Platform,
        cells: &[&str],
        original: &str,
        line_number: usize,
    ) -> Option<CandidateRecord> {
        // blank cells are already dropped: platform, handle, name
        let handle = *cells.get(1)?;
        let name = cells.get(2).copied();

        let detection = self
            .patterns
            .detect_for(platform, handle)
            .unwrap_or_else(|| Detection {
                platform,
                confidence: self.patterns.confidence_of(platform),
                handle: handle.to_string(),
            });
        Some(candidate(detection, name, original, line_number))
    }
}

fn candidate(
    detection: Detection,
    name: Option<&str>,
    original: &str,
    line_number: usize,
) -> CandidateRecord {
    CandidateRecord {
        platform: detection.platform,
        raw_handle: detection.handle,
        original_input_line: original.to_string(),
        line_number,
        confidence: detection.confidence,
        candidate_name: name.map(str::to_string),
    }
}

fn source_line<'a>(lines: &[&'a str], line_number: usize) -> &'a str {
    line_number
        .checked_sub(1)
        .and_then(|i| lines.get(i))
        .copied()
        .unwrap_or("")
}

/// Pick the delimiter that appears most often on the first non-empty line.
fn detect_delimiter(text: &str) -> u8 {
    let first = text.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
    let mut best = b',';
    let mut best_count = 0;
    for delimiter in TABLE_DELIMITERS {
        let count = first.bytes().filter(|b| b == delimiter).count();
        if count > best_count {
            best = *delimiter;
            best_count = count;
        }
    }
    best
}

fn is_header(cells: &[&str]) -> bool {
    cells.iter().any(|cell| {
        cell.split(|c: char| !c.is_alphanumeric())
            .any(|word| HEADER_TOKENS.contains(&word.to_lowercase().as_str()))
    })
}
