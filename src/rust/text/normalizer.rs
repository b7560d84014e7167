use std::borrow::Cow;
use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use super::lemmatizer::Lexicon;
use super::tagger::tag;
use super::tokenize::word_tokenize;

const ENTITIES: &str = include_str!("data/entities.txt");

const REPLACEMENT: &str = "\u{fffd}";

lazy_static! {
    static ref CHAR_REF: Regex = Regex::new(r"&(#[0-9]+;?|#[xX][0-9a-fA-F]+;?|[^\t\n\x0C <&#;]{1,32};?)").unwrap();
    static ref NAMED_REFS: HashMap<&'static str, String> = parse_entities(ENTITIES);
    static ref RETWEET: Regex = Regex::new(r"\bRT\b").unwrap();
    static ref MENTION: Regex = Regex::new(r"@\w+").unwrap();
    static ref URL: Regex = Regex::new(r"http\S+|www\S+").unwrap();
    static ref HASHTAG: Regex = Regex::new(r"#(\w+)").unwrap();
    static ref DISALLOWED: Regex = Regex::new(r"[^a-zA-Z0-9\s.,!?']").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

fn parse_entities(source: &'static str) -> HashMap<&'static str, String> {
    source
        .lines()
        .filter(|line| !line.starts_with('#'))
        .filter_map(|line| {
            let (name, points) = line.split_once(' ')?;
            let decoded = points
                .split('+')
                .map(|point| u32::from_str_radix(point, 16).ok().and_then(char::from_u32))
                .collect::<Option<String>>()?;
            Some((name, decoded))
        })
        .collect()
}

/// Code points a numeric reference may not produce; they decode to nothing.
fn is_forbidden_code_point(code: u32) -> bool {
    matches!(code, 0x1..=0x8 | 0xb | 0xe..=0x1f | 0x7f | 0xfdd0..=0xfdef) || code & 0xfffe == 0xfffe
}

fn numeric_reference(reference: &str) -> String {
    let digits = reference.trim_end_matches(';');
    let parsed = match digits.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => digits.parse::<u32>(),
    };
    // only overflow can fail here, which is out of range anyway
    let Ok(code) = parsed else {
        return REPLACEMENT.to_string();
    };

    match code {
        0 => REPLACEMENT.to_string(),
        0x0d => "\r".to_string(),
        // C1 controls are read as Windows-1252, the way browsers do
        0x80..=0x9f => encoding_rs::WINDOWS_1252
            .decode_without_bom_handling(&[code as u8])
            .0
            .into_owned(),
        0xd800..=0xdfff => REPLACEMENT.to_string(),
        _ if code > 0x10ffff => REPLACEMENT.to_string(),
        _ if is_forbidden_code_point(code) => String::new(),
        _ => char::from_u32(code).map_or_else(|| REPLACEMENT.to_string(), String::from),
    }
}

fn named_reference(name: &str) -> String {
    if let Some(decoded) = NAMED_REFS.get(name) {
        return decoded.clone();
    }
    // longest legacy prefix: "&notit;" reads as "¬" followed by "it;"
    for end in (2..name.len()).rev() {
        if let Some(decoded) = name.get(..end).and_then(|prefix| NAMED_REFS.get(prefix)) {
            return format!("{}{}", decoded, &name[end..]);
        }
    }
    format!("&{}", name)
}

/// Decodes HTML5 character references: every named reference (including
/// the legacy forms written without `;`) and decimal or hex numeric ones.
///
/// Unknown names are left as they are.
pub fn decode_html_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }
    CHAR_REF.replace_all(text, |caps: &Captures| {
        let body = &caps[1];
        match body.strip_prefix('#') {
            Some(reference) => numeric_reference(reference),
            None => named_reference(body),
        }
    })
}

/// Repairs text whose UTF-8 bytes were decoded as Latin-1 (`cafÃ©` becomes
/// `café`).
///
/// The text is only replaced when every character fits in one byte and the
/// bytes form valid UTF-8; anything else comes back unchanged.
pub fn redecode_latin1(text: &str) -> Cow<'_, str> {
    if text.is_ascii() {
        return Cow::Borrowed(text);
    }
    let mut bytes = Vec::with_capacity(text.len());
    for c in text.chars() {
        match u8::try_from(u32::from(c)) {
            Ok(byte) => bytes.push(byte),
            Err(_) => return Cow::Borrowed(text),
        }
    }
    match encoding_rs::UTF_8.decode_without_bom_handling_and_without_replacement(&bytes) {
        Some(decoded) => Cow::Owned(decoded.into_owned()),
        None => Cow::Borrowed(text),
    }
}

/// Runs the cleaning half of normalization: entity decoding, mojibake
/// repair, social-media markup removal and character filtering.
///
/// The result only contains ASCII letters, digits, single spaces and
/// `. , ! ? '`.
pub fn clean_text(text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }
    let decoded = decode_html_entities(text);
    let repaired = redecode_latin1(&decoded);

    let stripped = RETWEET.replace_all(&repaired, "");
    let stripped = MENTION.replace_all(&stripped, "");
    let stripped = URL.replace_all(&stripped, "");
    let stripped = HASHTAG.replace_all(&stripped, "$1");
    let filtered = DISALLOWED.replace_all(&stripped, " ");

    WHITESPACE.replace_all(&filtered, " ").trim().to_string()
}

/// Normalizes raw text into the lemmatized form fed to the tokenizer.
///
/// Pure and deterministic. Returns an empty string when the input is blank
/// or nothing survives cleaning.
///
/// # Example
/// ```
/// use mindscan::text::normalize;
///
/// assert_eq!(normalize("RT @friend: I'm running &amp; running... #tired"), "I 'm run run ... tired");
/// assert_eq!(normalize("   "), "");
/// ```
pub fn normalize(text: &str) -> String {
    let cleaned = clean_text(text);
    if cleaned.is_empty() {
        return cleaned;
    }

    let tokens = word_tokenize(&cleaned);
    let tags = tag(&tokens);
    let lexicon = Lexicon::global();

    tokens
        .iter()
        .zip(tags)
        .map(|(token, pos)| lexicon.lemmatize(token, pos))
        .collect::<Vec<_>>()
        .join(" ")
}
