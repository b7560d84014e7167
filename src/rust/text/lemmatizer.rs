//! Dictionary-validated lemmatization.
//!
//! Works the way WordNet's morphy does: irregular forms come from an
//! exception list, regular forms are produced by stripping inflectional
//! suffixes, and a candidate is only accepted when it is a known base form
//! for the requested part of speech. Among the accepted forms the shortest
//! wins. Lookups are case-sensitive against the lowercase lexicon, so words
//! that cannot be resolved (capitalized ones included) are returned as
//! they are.

use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;

use super::tagger::PosTag;

const NOUNS: &str = include_str!("data/nouns.txt");
const VERBS: &str = include_str!("data/verbs.txt");
const ADJECTIVES: &str = include_str!("data/adjectives.txt");
const ADVERBS: &str = include_str!("data/adverbs.txt");
const EXCEPTIONS: &str = include_str!("data/exceptions.txt");

const NOUN_RULES: &[(&str, &str)] = &[
    ("s", ""),
    ("ses", "s"),
    ("ves", "f"),
    ("ves", "fe"),
    ("xes", "x"),
    ("zes", "z"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("men", "man"),
    ("ies", "y"),
];

const VERB_RULES: &[(&str, &str)] = &[
    ("s", ""),
    ("ies", "y"),
    ("es", "e"),
    ("es", ""),
    ("ed", "e"),
    ("ed", ""),
    ("ied", "y"),
    ("ing", "e"),
    ("ing", ""),
];

const ADJECTIVE_RULES: &[(&str, &str)] = &[
    ("er", ""),
    ("est", ""),
    ("er", "e"),
    ("est", "e"),
    ("ier", "y"),
    ("iest", "y"),
];

lazy_static! {
    static ref LEXICON: Lexicon = Lexicon::embedded();
}

/// Base-form word lists and irregular forms, one set per part of speech.
#[derive(Debug)]
pub struct Lexicon {
    nouns: HashSet<&'static str>,
    verbs: HashSet<&'static str>,
    adjectives: HashSet<&'static str>,
    adverbs: HashSet<&'static str>,
    exceptions: HashMap<(PosTag, &'static str), &'static str>,
}

fn parse_words(source: &'static str) -> HashSet<&'static str> {
    source
        .lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .flat_map(str::split_whitespace)
        .collect()
}

fn parse_exceptions(source: &'static str) -> HashMap<(PosTag, &'static str), &'static str> {
    source
        .lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let pos = PosTag::from_code(fields.next()?)?;
            let form = fields.next()?;
            let base = fields.next()?;
            Some(((pos, form), base))
        })
        .collect()
}

fn is_consonant(c: char) -> bool {
    c.is_ascii_alphabetic() && !matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

impl Lexicon {
    fn embedded() -> Self {
        let lexicon = Self {
            nouns: parse_words(NOUNS),
            verbs: parse_words(VERBS),
            adjectives: parse_words(ADJECTIVES),
            adverbs: parse_words(ADVERBS),
            exceptions: parse_exceptions(EXCEPTIONS),
        };
        log::debug!(
            "Loaded lexicon: {} nouns, {} verbs, {} adjectives, {} adverbs, {} exceptions",
            lexicon.nouns.len(),
            lexicon.verbs.len(),
            lexicon.adjectives.len(),
            lexicon.adverbs.len(),
            lexicon.exceptions.len()
        );
        lexicon
    }

    /// Returns the process-wide lexicon, parsing it on first use.
    pub fn global() -> &'static Lexicon {
        &LEXICON
    }

    fn words(&self, pos: PosTag) -> &HashSet<&'static str> {
        match pos {
            PosTag::Noun => &self.nouns,
            PosTag::Verb => &self.verbs,
            PosTag::Adjective => &self.adjectives,
            PosTag::Adverb => &self.adverbs,
        }
    }

    fn rules(pos: PosTag) -> &'static [(&'static str, &'static str)] {
        match pos {
            PosTag::Noun => NOUN_RULES,
            PosTag::Verb => VERB_RULES,
            PosTag::Adjective => ADJECTIVE_RULES,
            PosTag::Adverb => &[],
        }
    }

    /// Whether `word` (lowercase) is a base form for `pos`.
    pub fn contains(&self, pos: PosTag, word: &str) -> bool {
        self.words(pos).contains(word)
    }

    /// Irregular base form of `word` (lowercase) for `pos`, if listed.
    pub fn exception(&self, pos: PosTag, word: &str) -> Option<&'static str> {
        self.exceptions.get(&(pos, word)).copied()
    }

    /// Whether `word` (lowercase) is an inflection of a known `pos` base form.
    pub fn resolves(&self, word: &str, pos: PosTag) -> bool {
        self.exception(pos, word).is_some() || self.detach(word, pos).is_some()
    }

    /// Reduces `word` to its base form for the given part of speech.
    ///
    /// # Example
    /// ```
    /// use mindscan::text::{Lexicon, PosTag};
    ///
    /// let lexicon = Lexicon::global();
    /// assert_eq!(lexicon.lemmatize("running", PosTag::Verb), "run");
    /// assert_eq!(lexicon.lemmatize("happier", PosTag::Adjective), "happy");
    /// assert_eq!(lexicon.lemmatize("zzyzx", PosTag::Noun), "zzyzx");
    /// ```
    pub fn lemmatize(&self, word: &str, pos: PosTag) -> String {
        if let Some(base) = self.exception(pos, word) {
            return base.to_string();
        }
        match self.detach(word, pos) {
            Some(base) if !self.contains(pos, word) || base.len() < word.len() => base,
            _ => word.to_string(),
        }
    }

    /// Applies suffix detachment rules and keeps the shortest known candidate.
    fn detach(&self, word: &str, pos: PosTag) -> Option<String> {
        let mut best: Option<String> = None;
        let mut consider = |candidate: String| {
            if self.contains(pos, &candidate)
                && best.as_ref().map_or(true, |b| candidate.len() < b.len())
            {
                best = Some(candidate);
            }
        };

        for &(suffix, replacement) in Self::rules(pos) {
            let Some(stem) = word.strip_suffix(suffix) else {
                continue;
            };
            if stem.is_empty() {
                continue;
            }
            consider(format!("{}{}", stem, replacement));

            // running -> runn -> run, saddest -> sadd -> sad
            if replacement.is_empty() && matches!(pos, PosTag::Verb | PosTag::Adjective) {
                let mut tail = stem.chars().rev();
                if let (Some(a), Some(b)) = (tail.next(), tail.next()) {
                    if a == b && is_consonant(a) {
                        consider(stem[..stem.len() - a.len_utf8()].to_string());
                    }
                }
            }
        }
        best
    }
}
