//! Text preparation for classification and lookup.

use ahash::AHashSet;

/// Lowercase `word` and join whitespace runs with single underscores,
/// the form multi-word lemmas take in the index files.
pub fn normalize(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut in_run = false;
    for ch in word.chars() {
        if ch.is_whitespace() {
            if !in_run {
                out.push('_');
                in_run = true;
            }
        } else {
            in_run = false;
            for low in ch.to_lowercase() {
                out.push(low);
            }
        }
    }
    out
}

/// Split `text` into word tokens on any run of characters outside
/// `[A-Za-z0-9_]`, dropping empty pieces.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            current.push(ch);
        } else if !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Order-preserving dedup.
pub fn uniq(words: Vec<String>) -> Vec<String> {
    let mut seen = AHashSet::with_capacity(words.len());
    words.into_iter().filter(|w| seen.insert(w.clone())).collect()
}
