use std::collections::BTreeMap;
use std::fs::File;
use std::io;
use std::path::Path;

use rayon::prelude::*;

use crate::classifier::{ClassificationResult, Classifier, ClassifierError};
use crate::labels::Label;

/// Prediction written for rows that could not be classified.
pub const ERROR_PREDICTION: &str = "error";
pub const PREDICTION_COLUMN: &str = "prediction";
pub const CONFIDENCE_COLUMN: &str = "confidence";

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("No column containing 'text' found (columns: {0})")]
    MissingTextColumn(String),
    #[error("Row {row} has {found} fields but the header has {expected}")]
    RaggedRow { row: usize, expected: usize, found: usize },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Classifies every text in order. One result per input; a failing item
/// never stops the rest.
pub fn classify_batch<S: AsRef<str>>(
    classifier: &Classifier,
    texts: &[S],
) -> Vec<Result<ClassificationResult, ClassifierError>> {
    texts.iter().map(|text| classifier.classify(text.as_ref())).collect()
}

/// Same as [`classify_batch`], spreading rows over the rayon thread pool.
/// Output order matches input order.
pub fn classify_batch_parallel<S: AsRef<str> + Sync>(
    classifier: &Classifier,
    texts: &[S],
) -> Vec<Result<ClassificationResult, ClassifierError>> {
    texts.par_iter().map(|text| classifier.classify(text.as_ref())).collect()
}

/// Index of the first header that contains `text`, ignoring case.
pub fn find_text_column<S: AsRef<str>>(headers: &[S]) -> Option<usize> {
    headers
        .iter()
        .position(|header| header.as_ref().to_lowercase().contains("text"))
}

/// Outcome counts of a [`BatchTable::run`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub failed: usize,
    pub label_counts: BTreeMap<Label, usize>,
}

impl BatchSummary {
    pub fn succeeded(&self) -> usize {
        self.total - self.failed
    }
}

/// An uploaded CSV held in memory: a header row plus string records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl BatchTable {
    /// Short rows are padded with empty fields; fields past the header
    /// width are dropped.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let mut table = Self { headers, rows };
        let width = table.headers.len();
        for (index, row) in table.rows.iter_mut().enumerate() {
            if row.len() > width {
                log::warn!("Row {} has {} fields, keeping the first {}", index + 1, row.len(), width);
                row.truncate(width);
            }
        }
        table.pad_rows();
        table
    }

    /// Reads a header row and records. Short records are padded, but a
    /// record with more fields than the header is rejected.
    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self, BatchError> {
        let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let headers: Vec<String> = csv_reader.headers()?.iter().map(String::from).collect();
        let mut rows = Vec::new();
        for (index, record) in csv_reader.records().enumerate() {
            let record = record?;
            if record.len() > headers.len() {
                return Err(BatchError::RaggedRow {
                    row: index + 1,
                    expected: headers.len(),
                    found: record.len(),
                });
            }
            rows.push(record.iter().map(String::from).collect());
        }
        Ok(Self::new(headers, rows))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, BatchError> {
        Self::from_reader(File::open(path)?)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn text_column(&self) -> Result<usize, BatchError> {
        find_text_column(&self.headers)
            .ok_or_else(|| BatchError::MissingTextColumn(self.headers.join(", ")))
    }

    /// Classifies the text column and fills `prediction` and `confidence`,
    /// adding the columns if they are missing. Rows that fail get
    /// [`ERROR_PREDICTION`] and an empty confidence.
    pub fn run(&mut self, classifier: &Classifier, parallel: bool) -> Result<BatchSummary, BatchError> {
        let column = self.text_column()?;
        let texts: Vec<&str> = self.rows.iter().map(|row| row[column].as_str()).collect();

        log::info!(
            "Classifying {} rows from column '{}'{}",
            texts.len(),
            self.headers[column],
            if parallel { " in parallel" } else { "" }
        );
        let results = if parallel {
            classify_batch_parallel(classifier, &texts)
        } else {
            classify_batch(classifier, &texts)
        };

        let prediction_column = self.ensure_column(PREDICTION_COLUMN);
        let confidence_column = self.ensure_column(CONFIDENCE_COLUMN);

        let mut summary = BatchSummary {
            total: results.len(),
            ..Default::default()
        };
        for (index, (row, result)) in self.rows.iter_mut().zip(results).enumerate() {
            match result {
                Ok(result) => {
                    *summary.label_counts.entry(result.label()).or_insert(0) += 1;
                    row[prediction_column] = result.label().name().to_string();
                    row[confidence_column] = result.confidence_string();
                }
                Err(e) => {
                    log::warn!("Row {} could not be classified: {}", index + 1, e);
                    summary.failed += 1;
                    row[prediction_column] = ERROR_PREDICTION.to_string();
                    row[confidence_column].clear();
                }
            }
        }
        Ok(summary)
    }

    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<(), BatchError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(&self.headers)?;
        for row in &self.rows {
            csv_writer.write_record(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    pub fn write_path(&self, path: impl AsRef<Path>) -> Result<(), BatchError> {
        self.write_csv(File::create(path)?)
    }

    pub fn to_csv_string(&self) -> Result<String, BatchError> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer)?;
        String::from_utf8(buffer).map_err(|e| BatchError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
    }

    fn ensure_column(&mut self, name: &str) -> usize {
        match self.headers.iter().position(|header| header == name) {
            Some(index) => index,
            None => {
                self.headers.push(name.to_string());
                self.pad_rows();
                self.headers.len() - 1
            }
        }
    }

    fn pad_rows(&mut self) {
        let width = self.headers.len();
        for row in &mut self.rows {
            if row.len() < width {
                row.resize(width, String::new());
            }
        }
    }
}
