//! Mental-health text classification with a fine-tuned BERT model served
//! through ONNX Runtime.
//!
//! Raw text is cleaned and lemmatized, encoded to a fixed 128 tokens and
//! scored into one of seven categories: Anxiety, Bipolar, Depression,
//! Normal, Personality Disorder, Stress and Suicidal. The result carries the
//! full probability distribution and a confidence percentage. Predictions
//! are not a diagnosis.
//!
//! # Basic Usage
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use mindscan::Classifier;
//!
//! let classifier = Classifier::builder()
//!     .with_model_dir("models/mental-bert")?
//!     .build()?;
//!
//! let result = classifier.classify("I can't stop worrying about everything")?;
//! println!("{} ({})", result.label(), result.confidence_string());
//! if result.label().is_crisis() {
//!     for line in mindscan::CRISIS_LINES {
//!         println!("{}: {}", line.name, line.instruction);
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! The classifier is `Send + Sync` and can be shared across threads using
//! `Arc`, or handed to [`classify_batch_parallel`]:
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use mindscan::{classify_batch_parallel, Classifier};
//!
//! let classifier = Classifier::builder()
//!     .with_model_dir("models/mental-bert")?
//!     .build()?;
//!
//! let texts = ["I feel great today", "Nothing matters anymore"];
//! for result in classify_batch_parallel(&classifier, &texts) {
//!     match result {
//!         Ok(result) => println!("{}", result.label()),
//!         Err(e) => eprintln!("{}", e),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod classifier;
pub mod history;
pub mod labels;
pub mod model_manager;
pub mod models;
mod runtime;
pub mod text;

pub use batch::{classify_batch, classify_batch_parallel, find_text_column, BatchError, BatchSummary, BatchTable};
pub use classifier::{
    ClassificationResult, Classifier, ClassifierBuilder, ClassifierError, ClassifierInfo, EncodedInput,
    FixedLengthEncoder, OnnxScorer, ScorerHandle, SequenceScorer, DEFAULT_MAX_LENGTH,
};
pub use history::{HistoryRecord, SessionLog};
pub use labels::{
    label_color, label_description, label_icon, label_name, label_resources, CrisisLine, Label, Resources,
    CRISIS_LINES, CRISIS_TITLE, NUM_LABELS,
};
pub use model_manager::{ModelError, ModelManager};
pub use models::{ModelCharacteristics, ModelInfo, DEFAULT_MODEL_NAME};
pub use runtime::{create_session_builder, OptimizationLevel, RuntimeConfig};
pub use text::{analyze_stats, normalize, QualityHint, TextStats};

pub fn init_logger() {
    env_logger::init();
}
