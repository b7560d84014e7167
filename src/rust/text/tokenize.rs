//! Treebank-style word tokenization for cleaned text.
//!
//! Sentence punctuation (`. , ! ?`) is split into its own tokens, runs of
//! periods stay together as an ellipsis, and English clitics are detached
//! from their host word (`don't` becomes `do` + `n't`).

const CLITICS: &[&str] = &["n't", "'ll", "'re", "'ve", "'m", "'s", "'d"];

fn is_split_punct(c: char) -> bool {
    matches!(c, '.' | ',' | '!' | '?')
}

/// Splits text into word and punctuation tokens.
///
/// # Example
/// ```
/// use mindscan::text::word_tokenize;
///
/// let tokens = word_tokenize("I don't know, really.");
/// assert_eq!(tokens, vec!["I", "do", "n't", "know", ",", "really", "."]);
/// ```
pub fn word_tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for chunk in text.split_whitespace() {
        split_chunk(chunk, &mut tokens);
    }
    tokens
}

fn split_chunk(chunk: &str, out: &mut Vec<String>) {
    let mut rest = chunk;

    // Leading punctuation
    while let Some(c) = rest.chars().next() {
        if c == '.' {
            let run = rest.len() - rest.trim_start_matches('.').len();
            out.push(rest[..run].to_string());
            rest = &rest[run..];
        } else if is_split_punct(c) {
            out.push(c.to_string());
            rest = &rest[c.len_utf8()..];
        } else {
            break;
        }
    }

    // Trailing punctuation, collected back to front
    let mut trailing = Vec::new();
    while let Some(c) = rest.chars().last() {
        if c == '.' {
            let kept = rest.trim_end_matches('.');
            trailing.push(rest[kept.len()..].to_string());
            rest = kept;
        } else if is_split_punct(c) || (c == '\'' && rest.len() > 1) {
            trailing.push(c.to_string());
            rest = &rest[..rest.len() - c.len_utf8()];
        } else {
            break;
        }
    }

    for piece in split_internal(rest) {
        split_clitic(piece, out);
    }
    out.extend(trailing.into_iter().rev());
}

/// Splits on `!`/`?` anywhere and on commas that are not digit separators.
fn split_internal(word: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = word.char_indices().collect();
    let mut pieces = Vec::new();
    let mut start = 0;

    for (i, &(idx, c)) in chars.iter().enumerate() {
        let splits = match c {
            '!' | '?' => true,
            ',' => {
                let before = i > 0 && chars[i - 1].1.is_ascii_digit();
                let after = chars.get(i + 1).is_some_and(|&(_, n)| n.is_ascii_digit());
                !(before && after)
            }
            _ => false,
        };
        if splits {
            if start < idx {
                pieces.push(&word[start..idx]);
            }
            pieces.push(&word[idx..idx + c.len_utf8()]);
            start = idx + c.len_utf8();
        }
    }
    if start < word.len() {
        pieces.push(&word[start..]);
    }
    pieces
}

fn split_clitic(word: &str, out: &mut Vec<String>) {
    if is_split_punct(word.chars().next().unwrap_or(' ')) && word.chars().count() == 1 {
        out.push(word.to_string());
        return;
    }
    let lower = word.to_ascii_lowercase();
    for clitic in CLITICS {
        if lower.ends_with(clitic) && word.len() > clitic.len() {
            let split = word.len() - clitic.len();
            out.push(word[..split].to_string());
            out.push(word[split..].to_string());
            return;
        }
    }
    out.push(word.to_string());
}
