use std::path::Path;

use tokenizers::{PaddingParams, PaddingStrategy, Tokenizer, TruncationParams};

use super::error::ClassifierError;

/// Sequence length the model artifact was fine-tuned with.
pub const DEFAULT_MAX_LENGTH: usize = 128;

/// Largest sequence length a BERT-base position table supports.
pub const MAX_SUPPORTED_LENGTH: usize = 512;

const PAD_CANDIDATES: &[&str] = &["[PAD]", "<pad>"];

/// Model inputs for one text, always exactly `max_length` long.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedInput {
    pub input_ids: Vec<i64>,
    pub attention_mask: Vec<i64>,
    pub token_type_ids: Vec<i64>,
}

impl EncodedInput {
    pub fn len(&self) -> usize {
        self.input_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.input_ids.is_empty()
    }

    /// Number of non-padding positions, special tokens included.
    pub fn real_tokens(&self) -> usize {
        self.attention_mask.iter().filter(|&&m| m != 0).count()
    }
}

/// Wraps a pretrained tokenizer so every encoding is padded or truncated to
/// a fixed length. Truncation drops trailing tokens.
#[derive(Debug, Clone)]
pub struct FixedLengthEncoder {
    tokenizer: Tokenizer,
    max_length: usize,
}

impl FixedLengthEncoder {
    pub fn new(mut tokenizer: Tokenizer, max_length: usize) -> Result<Self, ClassifierError> {
        if max_length == 0 || max_length > MAX_SUPPORTED_LENGTH {
            return Err(ClassifierError::ValidationError(format!(
                "Sequence length must be between 1 and {} (got {})",
                MAX_SUPPORTED_LENGTH, max_length
            )));
        }

        let (pad_id, pad_token) = PAD_CANDIDATES
            .iter()
            .find_map(|&token| tokenizer.token_to_id(token).map(|id| (id, token.to_string())))
            .unwrap_or_else(|| (0, PAD_CANDIDATES[0].to_string()));

        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length,
                ..Default::default()
            }))
            .map_err(|e| ClassifierError::TokenizerError(format!("Failed to configure truncation: {}", e)))?;
        tokenizer.with_padding(Some(PaddingParams {
            strategy: PaddingStrategy::Fixed(max_length),
            pad_id,
            pad_token,
            ..Default::default()
        }));

        Ok(Self { tokenizer, max_length })
    }

    /// Loads a `tokenizer.json` file and configures it for `max_length`.
    pub fn from_file(path: impl AsRef<Path>, max_length: usize) -> Result<Self, ClassifierError> {
        let path = path.as_ref();
        let tokenizer = Tokenizer::from_file(path).map_err(|e| {
            log::error!("Failed to load tokenizer from {:?}: {}", path, e);
            ClassifierError::TokenizerError(format!("Failed to load tokenizer: {}", e))
        })?;
        log::info!("Tokenizer loaded from {:?}", path);
        Self::new(tokenizer, max_length)
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Encodes text with special tokens, padded/truncated to `max_length`.
    ///
    /// # Errors
    /// - `TokenizerError` if the text cannot be encoded
    /// - `TokenizerError` if the tokenizer did not honor the fixed length
    pub fn encode(&self, text: &str) -> Result<EncodedInput, ClassifierError> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| ClassifierError::TokenizerError(e.to_string()))?;

        let input_ids: Vec<i64> = encoding.get_ids().iter().map(|&id| i64::from(id)).collect();
        if input_ids.len() != self.max_length {
            return Err(ClassifierError::TokenizerError(format!(
                "Tokenizer produced {} tokens (expected {})",
                input_ids.len(),
                self.max_length
            )));
        }

        Ok(EncodedInput {
            input_ids,
            attention_mask: encoding.get_attention_mask().iter().map(|&m| i64::from(m)).collect(),
            token_type_ids: encoding.get_type_ids().iter().map(|&t| i64::from(t)).collect(),
        })
    }

    /// Counts the positions text occupies after truncation, special tokens
    /// included. Never exceeds `max_length`.
    pub fn count_tokens(&self, text: &str) -> Result<usize, ClassifierError> {
        self.encode(text).map(|encoded| encoded.real_tokens())
    }
}
