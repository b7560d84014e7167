use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{error, info};
use tokenizers::Tokenizer;

use super::classifier::Classifier;
use super::encoder::{FixedLengthEncoder, DEFAULT_MAX_LENGTH};
use super::error::ClassifierError;
use super::scorer::{OnnxScorer, ScorerHandle};
use crate::labels::NUM_LABELS;
use crate::model_manager::ModelManager;
use crate::models::ModelInfo;
use crate::runtime::RuntimeConfig;

/// Text used for the one inference run at build time that checks the size
/// of the classification head.
const SAMPLE_TEXT: &str = "i feel fine today";

/// A builder for constructing a Classifier with a fluent interface.
///
/// Nothing is loaded until [`build`](Self::build), so options can be set in
/// any order.
#[derive(Debug)]
pub struct ClassifierBuilder {
    model_path: Option<PathBuf>,
    tokenizer_path: Option<PathBuf>,
    tokenizer: Option<Tokenizer>,
    scorer: Option<ScorerHandle>,
    max_length: usize,
    runtime_config: RuntimeConfig,
}

impl Default for ClassifierBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassifierBuilder {
    /// Creates a new empty ClassifierBuilder instance with default configuration
    ///
    /// # Example
    /// ```
    /// use mindscan::ClassifierBuilder;
    ///
    /// let builder = ClassifierBuilder::new();
    /// ```
    pub fn new() -> Self {
        Self {
            model_path: None,
            tokenizer_path: None,
            tokenizer: None,
            scorer: None,
            max_length: DEFAULT_MAX_LENGTH,
            runtime_config: RuntimeConfig::default(),
        }
    }

    /// Sets the runtime configuration for ONNX model execution
    ///
    /// # Example
    /// ```
    /// use mindscan::{ClassifierBuilder, RuntimeConfig};
    ///
    /// let builder = ClassifierBuilder::new()
    ///     .with_runtime_config(RuntimeConfig { intra_threads: 2, ..Default::default() });
    /// ```
    pub fn with_runtime_config(mut self, config: RuntimeConfig) -> Self {
        self.runtime_config = config;
        self
    }

    /// Overrides the fixed sequence length (128 by default). Checked at build.
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    /// Uses a model that was fetched into the default cache by
    /// [`ModelManager`].
    ///
    /// # Errors
    /// `BuildError` if paths are already set or the model is not downloaded.
    pub fn with_model(self, info: &ModelInfo) -> Result<Self, ClassifierError> {
        let manager = ModelManager::new_default()
            .map_err(|e| ClassifierError::BuildError(format!("Failed to create model manager: {}", e)))?;

        if !manager.is_model_downloaded(&info.name) {
            return Err(ClassifierError::BuildError(format!(
                "Model '{}' is not downloaded. Run `mindscan download` first",
                info.name
            )));
        }
        self.with_model_dir(manager.get_model_dir(&info.name))
    }

    /// Uses `model.onnx` and `tokenizer.json` from `dir`.
    pub fn with_model_dir(self, dir: impl AsRef<Path>) -> Result<Self, ClassifierError> {
        let dir = dir.as_ref();
        self.with_custom_model(dir.join("model.onnx"), dir.join("tokenizer.json"))
    }

    /// Sets explicit model and tokenizer files.
    ///
    /// # Errors
    /// `BuildError` if either path is empty, missing on disk, or already set.
    ///
    /// # Example
    /// ```no_run
    /// use mindscan::ClassifierBuilder;
    ///
    /// let builder = ClassifierBuilder::new()
    ///     .with_custom_model("path/to/model.onnx", "path/to/tokenizer.json");
    /// ```
    pub fn with_custom_model(
        mut self,
        model_path: impl AsRef<Path>,
        tokenizer_path: impl AsRef<Path>,
    ) -> Result<Self, ClassifierError> {
        let model_path = model_path.as_ref();
        let tokenizer_path = tokenizer_path.as_ref();

        if model_path.as_os_str().is_empty() || tokenizer_path.as_os_str().is_empty() {
            return Err(ClassifierError::BuildError("Model and tokenizer paths cannot be empty".to_string()));
        }
        if self.model_path.is_some() || self.tokenizer_path.is_some() {
            return Err(ClassifierError::BuildError("Model and tokenizer paths already set".to_string()));
        }
        if !model_path.exists() {
            return Err(ClassifierError::BuildError(format!("Model file not found: {}", model_path.display())));
        }
        if !tokenizer_path.exists() {
            return Err(ClassifierError::BuildError(format!(
                "Tokenizer file not found: {}",
                tokenizer_path.display()
            )));
        }

        self.model_path = Some(model_path.to_path_buf());
        self.tokenizer_path = Some(tokenizer_path.to_path_buf());
        Ok(self)
    }

    /// Uses an already loaded tokenizer instead of reading `tokenizer.json`.
    pub fn with_tokenizer(mut self, tokenizer: Tokenizer) -> Self {
        self.tokenizer = Some(tokenizer);
        self
    }

    /// Uses the given scorer instead of loading the ONNX model.
    pub fn with_scorer(mut self, scorer: ScorerHandle) -> Self {
        self.scorer = Some(scorer);
        self
    }

    /// Loads the tokenizer and model and returns the final Classifier.
    ///
    /// # Errors
    /// - `BuildError` if no tokenizer or no model source was configured
    /// - `TokenizerError` / `ModelError` if loading fails
    /// - `ModelError` if the model does not produce one score per label
    ///
    /// # Example
    /// ```no_run
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// use mindscan::Classifier;
    ///
    /// let classifier = Classifier::builder()
    ///     .with_model_dir("models/mental-bert")?
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn build(self) -> Result<Classifier, ClassifierError> {
        let encoder = match (self.tokenizer, &self.tokenizer_path) {
            (Some(tokenizer), _) => FixedLengthEncoder::new(tokenizer, self.max_length)?,
            (None, Some(path)) => FixedLengthEncoder::from_file(path, self.max_length)?,
            (None, None) => {
                return Err(ClassifierError::BuildError("A tokenizer or tokenizer path must be set".to_string()))
            }
        };

        let scorer: ScorerHandle = match (self.scorer, &self.model_path) {
            (Some(scorer), _) => scorer,
            (None, Some(path)) => {
                let sample = encoder.encode(SAMPLE_TEXT)?;
                Arc::new(OnnxScorer::from_file(path, &self.runtime_config, &sample)?)
            }
            (None, None) => {
                return Err(ClassifierError::BuildError("A scorer or model path must be set".to_string()))
            }
        };

        if scorer.num_labels() != NUM_LABELS {
            error!(
                "Model produces {} scores, classifier needs {}",
                scorer.num_labels(),
                NUM_LABELS
            );
            return Err(ClassifierError::ModelError(format!(
                "Model output has {} labels, expected {}",
                scorer.num_labels(),
                NUM_LABELS
            )));
        }

        info!(
            "Classifier ready ({} labels, max length {})",
            NUM_LABELS,
            encoder.max_length()
        );

        Ok(Classifier {
            model_path: self.model_path,
            tokenizer_path: self.tokenizer_path,
            encoder: Arc::new(encoder),
            scorer,
        })
    }
}
