use serde::Serialize;

use crate::classifier::DEFAULT_MAX_LENGTH;
use crate::labels::NUM_LABELS;

/// Directory name used for the fine-tuned model inside the cache.
pub const DEFAULT_MODEL_NAME: &str = "mental-bert";

/// Where to fetch a model artifact from and, optionally, what it should
/// hash to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelInfo {
    pub name: String,
    pub model_url: String,
    pub tokenizer_url: String,
    /// Hex SHA-256 of `model.onnx`. Without it a downloaded file is only
    /// checked for size.
    pub model_hash: Option<String>,
    pub tokenizer_hash: Option<String>,
}

impl ModelInfo {
    pub fn new(
        name: impl Into<String>,
        model_url: impl Into<String>,
        tokenizer_url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            model_url: model_url.into(),
            tokenizer_url: tokenizer_url.into(),
            model_hash: None,
            tokenizer_hash: None,
        }
    }

    pub fn with_hashes(mut self, model_hash: Option<String>, tokenizer_hash: Option<String>) -> Self {
        self.model_hash = model_hash.map(|h| h.to_lowercase());
        self.tokenizer_hash = tokenizer_hash.map(|h| h.to_lowercase());
        self
    }

    /// Whether both download URLs are configured.
    pub fn has_source(&self) -> bool {
        !self.model_url.trim().is_empty() && !self.tokenizer_url.trim().is_empty()
    }
}

/// Fixed properties of the fine-tuned classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelCharacteristics {
    pub num_labels: usize,
    pub max_sequence_length: usize,
    pub base_model: &'static str,
}

impl ModelCharacteristics {
    pub const fn mental_bert() -> Self {
        Self {
            num_labels: NUM_LABELS,
            max_sequence_length: DEFAULT_MAX_LENGTH,
            base_model: "bert-base-uncased",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_source() {
        assert!(ModelInfo::new("m", "https://host/model.onnx", "https://host/tokenizer.json").has_source());
        assert!(!ModelInfo::new("m", "", "https://host/tokenizer.json").has_source());
        assert!(!ModelInfo::new("m", "https://host/model.onnx", "  ").has_source());
    }

    #[test]
    fn test_hashes_are_lowercased() {
        let info = ModelInfo::new("m", "a", "b").with_hashes(Some("ABCDEF".into()), None);
        assert_eq!(info.model_hash.as_deref(), Some("abcdef"));
        assert_eq!(info.tokenizer_hash, None);
    }

    #[test]
    fn test_characteristics() {
        let c = ModelCharacteristics::mental_bert();
        assert_eq!(c.num_labels, 7);
        assert_eq!(c.max_sequence_length, 128);
    }
}
