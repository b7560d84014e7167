use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::fmt;

lazy_static! {
    static ref SENTENCE_BREAK: Regex = Regex::new(r"[.!?]+").unwrap();
}

/// Inputs shorter than this many words are flagged as too short.
pub const MIN_GOOD_WORDS: usize = 8;
/// Inputs with at least this many words are flagged as detailed.
pub const MIN_DETAILED_WORDS: usize = 50;

/// Qualitative feedback on how much context an input carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum QualityHint {
    TooShort,
    GoodLength,
    GreatDetail,
}

impl QualityHint {
    pub fn for_word_count(word_count: usize) -> Self {
        if word_count < MIN_GOOD_WORDS {
            Self::TooShort
        } else if word_count < MIN_DETAILED_WORDS {
            Self::GoodLength
        } else {
            Self::GreatDetail
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TooShort => "too short",
            Self::GoodLength => "good length",
            Self::GreatDetail => "great detail",
        }
    }
}

impl fmt::Display for QualityHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Word and sentence statistics of a raw (un-normalized) input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextStats {
    pub word_count: usize,
    pub sentence_count: usize,
    pub avg_words_per_sentence: f64,
    pub quality: QualityHint,
}

impl TextStats {
    pub fn quality_hint(&self) -> &'static str {
        self.quality.as_str()
    }
}

/// Rounds to one decimal from the exact binary value: 1/20 is stored just
/// above 0.05 and becomes 0.1, while an exact 0.25 ties to 0.2.
fn round_one_decimal(value: f64) -> f64 {
    format!("{:.1}", value).parse().unwrap_or(value)
}

/// Computes statistics over raw text.
///
/// A text without terminal punctuation counts as one sentence, and so does
/// an empty one.
///
/// # Example
/// ```
/// use mindscan::text::analyze_stats;
///
/// let stats = analyze_stats("I can't sleep. Everything feels heavy!");
/// assert_eq!(stats.word_count, 6);
/// assert_eq!(stats.sentence_count, 2);
/// assert_eq!(stats.avg_words_per_sentence, 3.0);
/// assert_eq!(stats.quality_hint(), "too short");
/// ```
pub fn analyze_stats(text: &str) -> TextStats {
    let word_count = text.split_whitespace().count();
    let sentence_count = SENTENCE_BREAK
        .split(text)
        .filter(|fragment| !fragment.trim().is_empty())
        .count()
        .max(1);

    let avg_words_per_sentence = round_one_decimal(word_count as f64 / sentence_count as f64);

    TextStats {
        word_count,
        sentence_count,
        avg_words_per_sentence,
        quality: QualityHint::for_word_count(word_count),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_boundaries() {
        let seven = analyze_stats("one two three four five six seven");
        assert_eq!(seven.word_count, 7);
        assert_eq!(seven.quality_hint(), "too short");

        let eight = analyze_stats("one two three four five six seven eight");
        assert_eq!(eight.quality_hint(), "good length");

        let forty_nine = vec!["word"; 49].join(" ");
        assert_eq!(analyze_stats(&forty_nine).quality, QualityHint::GoodLength);

        let fifty = vec!["word"; 50].join(" ");
        assert_eq!(analyze_stats(&fifty).quality, QualityHint::GreatDetail);
    }

    #[test]
    fn test_sentence_count_floor() {
        let stats = analyze_stats("no punctuation at all");
        assert_eq!(stats.sentence_count, 1);
        assert_eq!(stats.avg_words_per_sentence, 4.0);

        let empty = analyze_stats("");
        assert_eq!(empty.word_count, 0);
        assert_eq!(empty.sentence_count, 1);
        assert_eq!(empty.avg_words_per_sentence, 0.0);
    }

    #[test]
    fn test_repeated_terminators_split_once() {
        let stats = analyze_stats("Why?!? I don't know... Help!!!");
        assert_eq!(stats.sentence_count, 3);
        assert_eq!(stats.word_count, 5);
        assert_eq!(stats.avg_words_per_sentence, 1.7);
    }

    #[test]
    fn test_average_rounds_half_to_even() {
        // one word, four sentences
        let quarter = analyze_stats("a.b.c.d");
        assert_eq!(quarter.word_count, 1);
        assert_eq!(quarter.sentence_count, 4);
        assert_eq!(quarter.avg_words_per_sentence, 0.2);

        let lone_periods = analyze_stats("one. . . .");
        assert_eq!(lone_periods.word_count, 4);
        assert_eq!(lone_periods.sentence_count, 1);
    }

    #[test]
    fn test_average_rounds_exact_binary_value() {
        let one_in_twenty = analyze_stats(&"a.".repeat(20));
        assert_eq!(one_in_twenty.word_count, 1);
        assert_eq!(one_in_twenty.sentence_count, 20);
        assert_eq!(one_in_twenty.avg_words_per_sentence, 0.1);

        // 21 words over 20 sentences
        let text = format!("{}b c.", "a. ".repeat(19));
        let stats = analyze_stats(&text);
        assert_eq!(stats.word_count, 21);
        assert_eq!(stats.sentence_count, 20);
        assert_eq!(stats.avg_words_per_sentence, 1.1);

        assert_eq!(round_one_decimal(0.25), 0.2);
        assert_eq!(round_one_decimal(0.35), 0.3);
    }
}
