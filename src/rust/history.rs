use std::fs::File;
use std::io;
use std::path::Path;

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::classifier::ClassificationResult;

/// Texts longer than this are cut when stored in the log.
pub const SNIPPET_CHARS: usize = 120;
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One saved analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryRecord {
    pub timestamp: String,
    pub text: String,
    pub prediction: String,
    pub confidence: String,
}

impl HistoryRecord {
    pub fn new(text: &str, result: &ClassificationResult) -> Self {
        Self::at(Local::now(), text, result)
    }

    pub fn at(when: DateTime<Local>, text: &str, result: &ClassificationResult) -> Self {
        Self {
            timestamp: when.format(TIMESTAMP_FORMAT).to_string(),
            text: snippet(text),
            prediction: result.label().name().to_string(),
            confidence: result.confidence_string(),
        }
    }
}

/// First [`SNIPPET_CHARS`] characters, with `…` appended when cut.
pub fn snippet(text: &str) -> String {
    match text.char_indices().nth(SNIPPET_CHARS) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.to_string(),
    }
}

/// Append-only log of analyses for one interactive session. Owned by the
/// caller; nothing is persisted unless exported.
#[derive(Debug, Clone, Default)]
pub struct SessionLog {
    records: Vec<HistoryRecord>,
}

impl SessionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, text: &str, result: &ClassificationResult) -> &HistoryRecord {
        self.push(HistoryRecord::new(text, result))
    }

    pub fn push(&mut self, record: HistoryRecord) -> &HistoryRecord {
        self.records.push(record);
        &self.records[self.records.len() - 1]
    }

    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Writes the log as CSV with a `timestamp,text,prediction,confidence`
    /// header.
    pub fn export_csv<W: io::Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        if self.records.is_empty() {
            csv_writer.write_record(["timestamp", "text", "prediction", "confidence"])?;
        }
        for record in &self.records {
            csv_writer.serialize(record)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    pub fn export_path(&self, path: impl AsRef<Path>) -> Result<(), csv::Error> {
        self.export_csv(File::create(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn result() -> ClassificationResult {
        ClassificationResult::from_logits(&[0.0, 0.0, 4.0, 0.0, 0.0, 0.0, 0.0]).unwrap()
    }

    #[test]
    fn test_snippet_cuts_at_120_chars() {
        let short = "a".repeat(120);
        assert_eq!(snippet(&short), short);

        let long = "é".repeat(121);
        let cut = snippet(&long);
        assert_eq!(cut.chars().count(), 121);
        assert!(cut.ends_with('…'));
    }

    #[test]
    fn test_record_fields() {
        let when = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        let record = HistoryRecord::at(when, "I feel empty", &result());
        assert_eq!(record.timestamp, "2024-03-09 14:05:07");
        assert_eq!(record.prediction, "Depression");
        assert_eq!(record.confidence, result().confidence_string());
    }

    #[test]
    fn test_log_append_and_clear() {
        let mut log = SessionLog::new();
        assert!(log.is_empty());
        log.append("first", &result());
        log.append("second", &result());
        assert_eq!(log.len(), 2);
        assert_eq!(log.records()[1].text, "second");

        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn test_export_csv() {
        let when = Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let mut log = SessionLog::new();
        log.push(HistoryRecord::at(when, "so tired, again", &result()));

        let mut out = Vec::new();
        log.export_csv(&mut out).unwrap();
        let csv = String::from_utf8(out).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("timestamp,text,prediction,confidence"));
        assert_eq!(
            lines.next().map(String::from),
            Some(format!("2024-01-02 03:04:05,\"so tired, again\",Depression,{}", result().confidence_string()))
        );
    }

    #[test]
    fn test_export_empty_log_writes_header() {
        let mut out = Vec::new();
        SessionLog::new().export_csv(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "timestamp,text,prediction,confidence\n");
    }
}
