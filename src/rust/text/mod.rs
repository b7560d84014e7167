//! Text normalization and statistics.
//!
//! [`normalize`] turns noisy social-media text into the cleaned, lemmatized
//! form the classifier was trained on; [`analyze_stats`] gives feedback on
//! whether an input carries enough context.

mod lemmatizer;
mod normalizer;
mod stats;
mod tagger;
mod tokenize;

pub use lemmatizer::Lexicon;
pub use normalizer::{clean_text, decode_html_entities, normalize, redecode_latin1};
pub use stats::{analyze_stats, QualityHint, TextStats, MIN_DETAILED_WORDS, MIN_GOOD_WORDS};
pub use tagger::{tag, PosTag};
pub use tokenize::word_tokenize;
