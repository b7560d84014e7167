#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use env_logger::{Builder, Env};
use mindscan::{Classifier, ClassifierError, EncodedInput, Label, SequenceScorer};
use tokenizers::Tokenizer;

pub const TOKENIZER_FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/tokenizer.json");

// Initialize test logger
pub fn init() {
    let _ = Builder::from_env(Env::default().default_filter_or("warn"))
        .is_test(true)
        .try_init();
}

pub fn test_tokenizer() -> Tokenizer {
    Tokenizer::from_file(TOKENIZER_FIXTURE).expect("tokenizer fixture should load")
}

/// Scores by keyword: each listed word adds to its label's logit, and every
/// text leans slightly towards Normal.
#[derive(Debug)]
pub struct KeywordScorer {
    keywords: HashMap<i64, Label>,
    fail_on: Option<i64>,
    num_labels: usize,
    calls: AtomicUsize,
}

impl KeywordScorer {
    pub fn new(tokenizer: &Tokenizer) -> Self {
        let table = [
            ("hopeless", Label::Depression),
            ("worry", Label::Anxiety),
            ("manic", Label::Bipolar),
            ("happy", Label::Normal),
            ("stress", Label::Stress),
            ("live", Label::Suicidal),
        ];
        let keywords = table
            .iter()
            .map(|(word, label)| (i64::from(tokenizer.token_to_id(word).expect("fixture vocab")), *label))
            .collect();
        Self {
            keywords,
            fail_on: None,
            num_labels: Label::ALL.len(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Makes scoring fail for any text containing `word`.
    pub fn failing_on(mut self, tokenizer: &Tokenizer, word: &str) -> Self {
        self.fail_on = tokenizer.token_to_id(word).map(i64::from);
        self
    }

    pub fn with_num_labels(mut self, num_labels: usize) -> Self {
        self.num_labels = num_labels;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SequenceScorer for KeywordScorer {
    fn num_labels(&self) -> usize {
        self.num_labels
    }

    fn score(&self, input: &EncodedInput) -> Result<Vec<f32>, ClassifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut logits = vec![0.0; self.num_labels];
        if let Some(normal) = logits.get_mut(Label::Normal.index()) {
            *normal = 0.5;
        }
        for (&id, &mask) in input.input_ids.iter().zip(&input.attention_mask) {
            if mask == 0 {
                continue;
            }
            if Some(id) == self.fail_on {
                return Err(ClassifierError::ModelError("scorer refused input".into()));
            }
            if let Some(label) = self.keywords.get(&id) {
                logits[label.index()] += 3.0;
            }
        }
        Ok(logits)
    }
}

pub fn classifier_with(scorer: Arc<KeywordScorer>) -> Classifier {
    Classifier::builder()
        .with_tokenizer(test_tokenizer())
        .with_scorer(scorer)
        .build()
        .expect("classifier should build")
}

pub fn test_classifier() -> Classifier {
    classifier_with(Arc::new(KeywordScorer::new(&test_tokenizer())))
}
