//! Coarse part-of-speech tagging for lemmatization.
//!
//! Only the four classes the lemmatizer distinguishes are produced. The
//! tagger is deterministic: a closed-class word list, the embedded lexicon,
//! suffix shapes and the previous token decide the tag, and anything
//! unrecognized is a noun.

use super::lemmatizer::Lexicon;

/// Part-of-speech classes understood by the lemmatizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PosTag {
    Noun,
    Verb,
    Adjective,
    Adverb,
}

impl PosTag {
    /// Parses the short codes used by the embedded exception list.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "noun" => Some(Self::Noun),
            "verb" => Some(Self::Verb),
            "adj" => Some(Self::Adjective),
            "adv" => Some(Self::Adverb),
            _ => None,
        }
    }
}

impl Default for PosTag {
    fn default() -> Self {
        Self::Noun
    }
}

const FUNCTION_WORDS: &[&str] = &[
    "i", "me", "my", "mine", "myself", "you", "your", "yours", "yourself", "he", "him", "his",
    "himself", "she", "her", "hers", "herself", "it", "its", "itself", "we", "us", "our", "ours",
    "ourselves", "they", "them", "their", "theirs", "themselves", "this", "that", "these",
    "those", "a", "an", "the", "and", "but", "or", "nor", "for", "of", "in", "on", "at", "by",
    "with", "from", "into", "onto", "above", "below", "under", "over", "between", "through",
    "during", "before", "after", "since", "until", "than", "as", "if", "because", "while",
    "though", "although", "whether", "which", "who", "whom", "whose", "what", "when", "where",
    "why", "how", "to", "will", "would", "can", "could", "should", "shall", "may", "might",
    "must", "ca", "wo", "nothing", "everything", "something", "anything", "someone", "everyone",
    "anyone", "nobody", "somebody", "everybody",
];

const DETERMINERS: &[&str] = &[
    "a", "an", "the", "my", "your", "his", "her", "our", "their", "its", "this", "that",
    "these", "those", "some", "any", "no", "every", "each",
];

/// Words after which a verb form is expected.
const VERB_TRIGGERS: &[&str] = &[
    "i", "you", "we", "they", "he", "she", "it", "to", "will", "would", "can", "could",
    "should", "shall", "may", "might", "must", "ca", "wo", "do", "does", "did", "n't", "not",
    "never", "always", "just", "really", "also", "often", "sometimes", "still", "even",
    "barely", "cannot",
];

/// Words that are always followed by a bare verb.
const INFINITIVE_MARKERS: &[&str] = &[
    "to", "will", "would", "can", "could", "should", "shall", "may", "might", "must", "ca", "wo",
];

/// Subjects that take a third-person `-s` verb.
const THIRD_PERSON_SUBJECTS: &[&str] = &[
    "he", "she", "it", "this", "that", "nothing", "everything", "something", "anything",
    "someone", "everyone", "anyone", "nobody", "somebody", "everybody", "life", "work",
];

/// Words after which an adjective is expected.
const ADJECTIVE_TRIGGERS: &[&str] = &[
    "am", "is", "are", "was", "were", "be", "been", "being", "'m", "'re", "'s", "feel",
    "feels", "felt", "feeling", "seem", "seems", "seemed", "look", "looks", "looked", "get",
    "gets", "got", "getting", "become", "becomes", "became", "so", "very", "too", "really",
    "extremely", "completely", "totally", "quite", "pretty", "more", "most", "less", "super",
];

const ADJECTIVE_SUFFIXES: &[&str] = &["ous", "ful", "less", "ive", "able", "ible", "ic", "ish"];

/// Tags every token with a coarse part of speech.
pub fn tag(tokens: &[String]) -> Vec<PosTag> {
    let lexicon = Lexicon::global();
    let lowered: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();

    lowered
        .iter()
        .enumerate()
        .map(|(i, word)| {
            let prev = i.checked_sub(1).map(|p| lowered[p].as_str());
            tag_word(lexicon, word, prev)
        })
        .collect()
}

fn tag_word(lexicon: &Lexicon, word: &str, prev: Option<&str>) -> PosTag {
    let prev_in = |list: &[&str]| prev.is_some_and(|p| list.contains(&p));

    if word == "n't" {
        return PosTag::Adverb;
    }
    if !word.starts_with(|c: char| c.is_alphabetic()) || FUNCTION_WORDS.contains(&word) {
        return PosTag::Noun;
    }
    let after_determiner = prev_in(DETERMINERS);

    if lexicon.exception(PosTag::Adjective, word).is_some() {
        return PosTag::Adjective;
    }
    if lexicon.contains(PosTag::Adjective, word) && prev_in(ADJECTIVE_TRIGGERS) {
        return PosTag::Adjective;
    }
    // "the ground" is a noun even though "ground" is a past form of "grind"
    if lexicon.exception(PosTag::Verb, word).is_some() && !after_determiner {
        return PosTag::Verb;
    }

    let is_adjective = lexicon.contains(PosTag::Adjective, word);
    let is_noun = lexicon.contains(PosTag::Noun, word);
    let is_verb = lexicon.contains(PosTag::Verb, word);

    if lexicon.contains(PosTag::Adverb, word) && !is_adjective && !is_noun && !is_verb {
        return PosTag::Adverb;
    }
    if word.len() > 4 && word.ends_with("ly") && !is_adjective && !is_noun {
        return PosTag::Adverb;
    }

    let verb_form = is_verb || lexicon.resolves(word, PosTag::Verb);
    if verb_form && prev_in(INFINITIVE_MARKERS) {
        return PosTag::Verb;
    }
    if verb_form && prev_in(VERB_TRIGGERS) && !is_adjective {
        return PosTag::Verb;
    }
    let noun_after_determiner = is_noun && after_determiner;
    if (word.ends_with("ing") || word.ends_with("ed")) && verb_form && !is_adjective && !noun_after_determiner {
        return PosTag::Verb;
    }

    if is_adjective
        || (!is_noun && lexicon.resolves(word, PosTag::Adjective))
        || (!is_noun && ADJECTIVE_SUFFIXES.iter().any(|s| word.len() > s.len() + 2 && word.ends_with(s)))
    {
        return PosTag::Adjective;
    }

    if word.ends_with('s') && verb_form && prev_in(THIRD_PERSON_SUBJECTS) {
        return PosTag::Verb;
    }
    if is_verb && !is_noun && !after_determiner {
        return PosTag::Verb;
    }

    PosTag::Noun
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags_of(text: &str) -> Vec<PosTag> {
        let tokens: Vec<String> = text.split_whitespace().map(String::from).collect();
        tag(&tokens)
    }

    #[test]
    fn test_subject_then_verb() {
        assert_eq!(tags_of("I feel"), vec![PosTag::Noun, PosTag::Verb]);
    }

    #[test]
    fn test_linking_verb_then_adjective() {
        assert_eq!(tags_of("feel lost")[1], PosTag::Adjective);
        assert_eq!(tags_of("was exhausted")[1], PosTag::Adjective);
    }

    #[test]
    fn test_adverbs() {
        assert_eq!(tags_of("completely")[0], PosTag::Adverb);
        assert_eq!(tags_of("n't")[0], PosTag::Adverb);
        assert_eq!(tags_of("anxiously")[0], PosTag::Adverb);
    }

    #[test]
    fn test_progressive_verb() {
        assert_eq!(tags_of("running")[0], PosTag::Verb);
    }

    #[test]
    fn test_third_person_verb() {
        assert_eq!(tags_of("nothing brings")[1], PosTag::Verb);
    }

    #[test]
    fn test_comparative_adjective() {
        assert_eq!(tags_of("happier")[0], PosTag::Adjective);
    }

    #[test]
    fn test_determiner_forces_noun() {
        assert_eq!(tags_of("the cry")[1], PosTag::Noun);
    }

    #[test]
    fn test_irregular_past_after_determiner_is_a_noun() {
        assert_eq!(tags_of("the ground")[1], PosTag::Noun);
        assert_eq!(tags_of("they ground")[1], PosTag::Verb);
    }

    #[test]
    fn test_infinitive_marker_beats_adjective_reading() {
        assert_eq!(tags_of("to live")[1], PosTag::Verb);
        assert_eq!(tags_of("so live")[1], PosTag::Adjective);
    }

    #[test]
    fn test_nouns_are_not_read_as_comparatives() {
        assert_eq!(tags_of("number")[0], PosTag::Noun);
        assert_eq!(tags_of("my liver")[1], PosTag::Noun);
        assert_eq!(tags_of("lower")[0], PosTag::Adjective);
    }

    #[test]
    fn test_unknown_defaults_to_noun() {
        assert_eq!(tags_of("zzyzx")[0], PosTag::Noun);
        assert_eq!(tags_of("42")[0], PosTag::Noun);
    }
}
