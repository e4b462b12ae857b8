//! Inline highlighted rendering of the analyzed document.

use std::collections::HashSet;

use echotrace_core::{normalize_sentence, MatchRecord};

/// Markers wrapped around flagged sentences and the separator between
/// sentences. Defaults to Markdown emphasis; the CLI substitutes ANSI codes
/// when color is on.
#[derive(Debug, Clone)]
pub struct HighlightOptions {
    pub open: String,
    pub close: String,
    pub separator: String,
}

impl Default for HighlightOptions {
    fn default() -> Self {
        Self {
            open: "**".to_string(),
            close: "**".to_string(),
            separator: " ".to_string(),
        }
    }
}

/// Re-walk the original sentence sequence, wrapping every sentence flagged by
/// the analysis in the configured markers.
///
/// Membership is decided on normalized (trimmed, case-folded) text, the same
/// key the aggregator deduplicates on, so case-differing occurrences of a
/// flagged sentence are highlighted too.
pub fn render_highlighted(
    sentences: &[String],
    matches: &[MatchRecord],
    opts: &HighlightOptions,
) -> String {
    let flagged: HashSet<String> = matches
        .iter()
        .map(|m| normalize_sentence(&m.sentence_text))
        .collect();

    let mut out = String::new();
    for sentence in sentences {
        if !out.is_empty() {
            out.push_str(&opts.separator);
        }
        let trimmed = sentence.trim();
        if flagged.contains(&normalize_sentence(sentence)) {
            out.push_str(&opts.open);
            out.push_str(trimmed);
            out.push_str(&opts.close);
        } else {
            out.push_str(trimmed);
        }
    }
    out
}
