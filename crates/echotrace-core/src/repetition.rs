//! Self-repetition scan: sentences that occur more than once in the document.

use std::collections::HashMap;

use crate::types::{normalize_sentence, word_count, MatchRecord, MatchSource};
use crate::SELF_REPETITION_MIN_WORDS;

/// Scan the full ordered sentence sequence for repeated sentences.
///
/// Sentences with more than [`SELF_REPETITION_MIN_WORDS`] words are grouped
/// by normalized form; every group with two or more occurrences yields one
/// record carrying the occurrence count and the 1-based position of each
/// occurrence in ascending order. The representative text is the first
/// original sentence in the document with that normalized form.
///
/// Pure function of the input; cannot fail. Output follows first-occurrence
/// order, which keeps repeated runs byte-identical.
pub fn find_repeated_sentences(sentences: &[String]) -> Vec<MatchRecord> {
    let mut groups: HashMap<String, Vec<usize>> = HashMap::new();
    let mut key_order: Vec<String> = Vec::new();

    for (i, sentence) in sentences.iter().enumerate() {
        if word_count(sentence) <= SELF_REPETITION_MIN_WORDS {
            continue;
        }
        let key = normalize_sentence(sentence);
        let positions = groups.entry(key.clone()).or_insert_with(|| {
            key_order.push(key);
            Vec::new()
        });
        positions.push(i + 1);
    }

    key_order
        .into_iter()
        .filter_map(|key| {
            let positions = groups.remove(&key)?;
            if positions.len() < 2 {
                return None;
            }
            let first = positions[0];
            Some(MatchRecord {
                sentence_text: sentences[first - 1].clone(),
                source: MatchSource::Repetition {
                    count: positions.len(),
                },
                positions,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|s| s.to_string()).collect()
    }

    const LONG_A: &str = "This exact long sentence appears twice in this very document for testing.";
    const LONG_B: &str = "Another sufficiently long sentence that is used as filler in these tests.";

    #[test]
    fn repeated_long_sentence_yields_one_record_with_all_positions() {
        let sentences = doc(&[LONG_A, LONG_B, LONG_A, LONG_A]);
        let records = find_repeated_sentences(&sentences);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].positions, vec![1, 3, 4]);
        assert_eq!(
            records[0].source,
            MatchSource::Repetition { count: 3 }
        );
        assert_eq!(records[0].sentence_text, LONG_A);
    }

    #[test]
    fn positions_are_strictly_increasing() {
        let sentences = doc(&[LONG_B, LONG_A, LONG_B, LONG_A, LONG_B]);
        for record in find_repeated_sentences(&sentences) {
            assert!(record.positions.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn short_sentences_are_never_flagged() {
        // 5 words, well under the threshold, duplicated three times.
        let sentences = doc(&[
            "This is a short test.",
            "This is a short test.",
            "This is a short test.",
        ]);
        assert!(find_repeated_sentences(&sentences).is_empty());
    }

    #[test]
    fn threshold_is_strict() {
        // Exactly 8 words: not eligible.
        let eight = "one two three four five six seven eight";
        assert_eq!(word_count(eight), 8);
        let sentences = doc(&[eight, eight]);
        assert!(find_repeated_sentences(&sentences).is_empty());

        // Nine words: eligible.
        let nine = "one two three four five six seven eight nine";
        let sentences = doc(&[nine, nine]);
        assert_eq!(find_repeated_sentences(&sentences).len(), 1);
    }

    #[test]
    fn grouping_is_case_insensitive_and_trim_insensitive() {
        let upper = "THIS EXACT LONG SENTENCE APPEARS TWICE IN THIS VERY DOCUMENT FOR TESTING.";
        let padded = format!("  {LONG_A}  ");
        let sentences = doc(&[&padded, upper]);
        let records = find_repeated_sentences(&sentences);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].positions, vec![1, 2]);
        // Representative is the first original form, casing preserved.
        assert_eq!(records[0].sentence_text, padded);
    }

    #[test]
    fn unique_sentences_produce_no_records() {
        let sentences = doc(&[LONG_A, LONG_B]);
        assert!(find_repeated_sentences(&sentences).is_empty());
    }

    #[test]
    fn empty_input_produces_no_records() {
        assert!(find_repeated_sentences(&[]).is_empty());
    }
}
