use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ndarray::Array2;
use ort::session::Session;
use ort::value::Tensor;

use super::encoder::EncodedInput;
use super::error::ClassifierError;
use crate::runtime::{create_session_builder, RuntimeConfig};

/// Produces one raw score (logit) per class for an encoded text.
///
/// Implementations must be safe to call from several threads at once; the
/// classifier only ever needs shared access.
pub trait SequenceScorer: Send + Sync + fmt::Debug {
    /// Number of logits returned by [`score`](Self::score).
    fn num_labels(&self) -> usize;

    fn score(&self, input: &EncodedInput) -> Result<Vec<f32>, ClassifierError>;
}

/// Shared handle to the scorer, built once at startup.
pub type ScorerHandle = Arc<dyn SequenceScorer>;

/// Sequence-classification scorer backed by an ONNX Runtime session.
///
/// # Model Input Format
/// - input_ids: Token IDs [batch_size=1, sequence_length]
/// - attention_mask: 1 for real tokens, 0 for padding [batch_size=1, sequence_length]
/// - token_type_ids: only fed when the graph declares it
///
/// # Model Output Format
/// - First output holds the logits, shape [batch_size=1, num_labels]
#[derive(Debug)]
pub struct OnnxScorer {
    session: Session,
    model_path: PathBuf,
    feeds_token_types: bool,
    num_labels: usize,
}

impl OnnxScorer {
    /// Loads the model and runs `sample` once to learn the size of the
    /// classification head.
    pub fn from_file(
        model_path: impl AsRef<Path>,
        config: &RuntimeConfig,
        sample: &EncodedInput,
    ) -> Result<Self, ClassifierError> {
        let model_path = model_path.as_ref();
        let session = create_session_builder(config)?
            .commit_from_file(model_path)
            .map_err(|e| {
                log::error!("Failed to load model from {:?}: {}", model_path, e);
                ClassifierError::BuildError(format!("Failed to load model: {}", e))
            })?;

        Self::validate_model(&session)?;
        let feeds_token_types = session.inputs.iter().any(|input| input.name == "token_type_ids");

        let mut scorer = Self {
            session,
            model_path: model_path.to_path_buf(),
            feeds_token_types,
            num_labels: 0,
        };
        scorer.num_labels = scorer.run(sample)?.len();
        log::info!(
            "Model loaded from {:?} ({} labels, token_type_ids: {})",
            scorer.model_path,
            scorer.num_labels,
            scorer.feeds_token_types
        );
        Ok(scorer)
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    /// Validates that the model has the expected input/output structure
    fn validate_model(session: &Session) -> Result<(), ClassifierError> {
        for required in ["input_ids", "attention_mask"] {
            if !session.inputs.iter().any(|input| input.name == required) {
                return Err(ClassifierError::ModelError(format!(
                    "Model is missing the '{}' input (found: {})",
                    required,
                    session.inputs.iter().map(|i| i.name.as_str()).collect::<Vec<_>>().join(", ")
                )));
            }
        }
        if session.outputs.is_empty() {
            return Err(ClassifierError::ModelError(
                "Model must have at least 1 output for logits".to_string(),
            ));
        }
        Ok(())
    }

    fn tensor(values: &[i64], name: &str) -> Result<Tensor<i64>, ClassifierError> {
        let array = Array2::from_shape_vec((1, values.len()), values.to_vec())
            .map_err(|e| ClassifierError::ModelError(format!("Failed to create {} array: {}", name, e)))?;
        Tensor::from_array(array)
            .map_err(|e| ClassifierError::ModelError(format!("Failed to create {} tensor: {}", name, e)))
    }

    fn run(&self, input: &EncodedInput) -> Result<Vec<f32>, ClassifierError> {
        let mut input_tensors = HashMap::new();
        input_tensors.insert("input_ids", Self::tensor(&input.input_ids, "input_ids")?);
        input_tensors.insert("attention_mask", Self::tensor(&input.attention_mask, "attention_mask")?);
        if self.feeds_token_types {
            input_tensors.insert("token_type_ids", Self::tensor(&input.token_type_ids, "token_type_ids")?);
        }

        let outputs = self
            .session
            .run(input_tensors)
            .map_err(|e| ClassifierError::ModelError(format!("Failed to run model: {}", e)))?;
        let logits = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| ClassifierError::ModelError(format!("Failed to extract output tensor: {}", e)))?;

        match logits.shape() {
            [1, n] if *n > 0 => Ok(logits.iter().copied().collect()),
            shape => Err(ClassifierError::ModelError(format!(
                "Expected logits of shape [1, num_labels], got {:?}",
                shape
            ))),
        }
    }
}

impl SequenceScorer for OnnxScorer {
    fn num_labels(&self) -> usize {
        self.num_labels
    }

    fn score(&self, input: &EncodedInput) -> Result<Vec<f32>, ClassifierError> {
        self.run(input)
    }
}
