//! Sentence segmentation for overlap checking.
//!
//! Splits extracted document text into an ordered sentence sequence with
//! boundary detection that is aware of abbreviations, initials, and decimal
//! numbers. The abbreviation set is built lazily, once per process.

use std::collections::HashSet;

use once_cell::sync::Lazy;

/// Abbreviations whose trailing period does not end a sentence.
static ABBREVIATIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "dr", "mr", "mrs", "ms", "prof", "sr", "jr", "st", "etc", "vs", "cf",
        "al", "eq", "fig", "sec", "vol", "no", "pp", "i.e", "e.g", "ph.d",
        "inc", "corp", "ltd", "dept", "univ", "approx",
    ]
    .into_iter()
    .collect()
});

/// The result of segmenting a document: ordered sentences plus the
/// whitespace-token word count of the whole text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segmentation {
    pub sentences: Vec<String>,
    pub word_count: usize,
}

impl Segmentation {
    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }
}

/// Split `text` into ordered sentences and count its words.
///
/// Sentences are trimmed; empty fragments are dropped. Order follows the
/// original text and is stable across calls.
pub fn segment(text: &str) -> Segmentation {
    let word_count = text.split_whitespace().count();
    let sentences = split_sentences(text);
    Segmentation {
        sentences,
        word_count,
    }
}

/// True when the last word of `buf` (which ends just before a period) is a
/// known abbreviation or a single uppercase initial.
fn ends_with_abbreviation(buf: &str) -> bool {
    let word = buf
        .rsplit(|c: char| c.is_whitespace())
        .next()
        .unwrap_or("")
        .trim_matches(|c: char| matches!(c, '(' | ')' | '[' | ']' | '"' | '\''));

    if word.is_empty() {
        return false;
    }

    let mut chars = word.chars();
    if let (Some(first), None) = (chars.next(), chars.next()) {
        if first.is_uppercase() {
            // Single-letter initial, e.g. "J. K. Rowling".
            return true;
        }
    }

    ABBREVIATIONS.contains(word.to_lowercase().as_str())
}

fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let chars: Vec<char> = text.chars().collect();

    for (i, &ch) in chars.iter().enumerate() {
        current.push(ch);

        if ch != '.' && ch != '!' && ch != '?' {
            continue;
        }

        let next = chars.get(i + 1).copied();
        let prev = if i > 0 { chars.get(i - 1).copied() } else { None };

        if ch == '.' {
            // "3.14" is one token, not a boundary.
            let is_decimal = prev.is_some_and(|c| c.is_ascii_digit())
                && next.is_some_and(|c| c.is_ascii_digit());
            if is_decimal {
                continue;
            }
            let before_period = &current[..current.len() - 1];
            if ends_with_abbreviation(before_period) {
                continue;
            }
        }

        let at_end = next.is_none();
        let next_is_break = next.is_some_and(|c| c.is_whitespace());
        if at_end || next_is_break {
            flush(&mut current, &mut sentences);
        }
    }

    flush(&mut current, &mut sentences);
    sentences
}

fn flush(current: &mut String, sentences: &mut Vec<String>) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }
    current.clear();
}
