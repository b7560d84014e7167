use std::path::PathBuf;
use std::sync::Arc;

use ndarray::Array1;

use super::encoder::FixedLengthEncoder;
use super::error::ClassifierError;
use super::result::ClassificationResult;
use super::scorer::ScorerHandle;
use crate::labels::Label;
use crate::text::normalize;

/// A thread-safe mental-health text classifier.
///
/// # Thread Safety
///
/// This type is automatically `Send + Sync`: the encoder and scorer are
/// shared through `Arc` and only ever used through `&self`.
///
/// Multi-thread usage:
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use mindscan::Classifier;
/// use std::sync::Arc;
/// use std::thread;
///
/// let classifier = Arc::new(Classifier::builder()
///     .with_model_dir("models/mental-bert")?
///     .build()?);
///
/// let classifier_clone = Arc::clone(&classifier);
/// thread::spawn(move || {
///     classifier_clone.classify("I can't stop worrying").unwrap();
/// });
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Classifier {
    pub(crate) model_path: Option<PathBuf>,
    pub(crate) tokenizer_path: Option<PathBuf>,
    pub(crate) encoder: Arc<FixedLengthEncoder>,
    pub(crate) scorer: ScorerHandle,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<Classifier>();
    }
};

impl Classifier {
    /// Creates a new ClassifierBuilder for fluent construction
    pub fn builder() -> super::builder::ClassifierBuilder {
        super::builder::ClassifierBuilder::new()
    }

    /// Returns information about the classifier's configuration
    pub fn info(&self) -> super::ClassifierInfo {
        super::ClassifierInfo {
            model_path: self.model_path.clone(),
            tokenizer_path: self.tokenizer_path.clone(),
            num_classes: Label::ALL.len(),
            class_labels: Label::ALL.iter().map(|label| label.name().to_string()).collect(),
            max_length: self.encoder.max_length(),
        }
    }

    pub fn max_length(&self) -> usize {
        self.encoder.max_length()
    }

    /// Normalizes and classifies raw text.
    ///
    /// # Errors
    /// - `ValidationError` if the text is blank or nothing is left after cleaning
    /// - `TokenizerError`, `ModelError` or `PredictionError` from the pipeline
    ///
    /// # Example
    /// ```no_run
    /// # use mindscan::Classifier;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// # let classifier = Classifier::builder().with_model_dir("models/mental-bert")?.build()?;
    /// let result = classifier.classify("I haven't slept in days and everything feels pointless")?;
    /// println!("{} ({})", result.label(), result.confidence_string());
    /// # Ok(())
    /// # }
    /// ```
    pub fn classify(&self, text: &str) -> Result<ClassificationResult, ClassifierError> {
        if text.trim().is_empty() {
            return Err(ClassifierError::ValidationError("Input text cannot be empty".into()));
        }

        let normalized = normalize(text);
        if normalized.is_empty() {
            return Err(ClassifierError::ValidationError(
                "Input text is empty after cleaning".into(),
            ));
        }
        log::debug!("Normalized input: {}", normalized);

        self.classify_normalized(&normalized)
    }

    /// Classifies text that has already been through [`normalize`].
    pub fn classify_normalized(&self, normalized: &str) -> Result<ClassificationResult, ClassifierError> {
        if normalized.trim().is_empty() {
            return Err(ClassifierError::ValidationError("Input text cannot be empty".into()));
        }

        let encoded = self.encoder.encode(normalized)?;
        let logits = self.scorer.score(&encoded)?;
        let result = ClassificationResult::from_logits(&logits)?;

        log::debug!(
            "Predicted {} with {} over {} real tokens",
            result.label(),
            result.confidence_string(),
            encoded.real_tokens()
        );
        Ok(result)
    }

    /// Raw model scores for normalized text, before softmax.
    pub fn logits(&self, normalized: &str) -> Result<Array1<f32>, ClassifierError> {
        let encoded = self.encoder.encode(normalized)?;
        Ok(Array1::from_vec(self.scorer.score(&encoded)?))
    }

    /// Number of token positions the normalized text occupies, special
    /// tokens included and capped at [`max_length`](Self::max_length).
    pub fn count_tokens(&self, text: &str) -> Result<usize, ClassifierError> {
        self.encoder.count_tokens(&normalize(text))
    }
}
