use std::path::PathBuf;

mod builder;
mod classifier;
mod encoder;
mod error;
mod result;
mod scorer;
mod utils;

pub use builder::ClassifierBuilder;
pub use classifier::Classifier;
pub use encoder::{EncodedInput, FixedLengthEncoder, DEFAULT_MAX_LENGTH, MAX_SUPPORTED_LENGTH};
pub use error::ClassifierError;
pub use result::ClassificationResult;
pub use scorer::{OnnxScorer, ScorerHandle, SequenceScorer};

/// Information about the configuration of a built classifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierInfo {
    /// Path to the ONNX model file, if the model was loaded from disk
    pub model_path: Option<PathBuf>,
    /// Path to the tokenizer file, if the tokenizer was loaded from disk
    pub tokenizer_path: Option<PathBuf>,
    /// Number of classes the model predicts
    pub num_classes: usize,
    /// Label names in index order
    pub class_labels: Vec<String>,
    /// Fixed sequence length every input is padded or truncated to
    pub max_length: usize,
}
