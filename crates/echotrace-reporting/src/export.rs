//! Flat plain-text export of an analysis run.
//!
//! The format is stable and parseable line-by-line: a title line, the
//! generation timestamp, summary key/value lines, then one numbered section
//! per match record. Downstream tooling greps these lines; changing them is a
//! breaking change.

use std::fmt::Write;

use chrono::{DateTime, Utc};
use echotrace_core::{Analysis, MatchSource};

/// Render the export document for one finished analysis.
///
/// `generated_at` is passed in rather than read from the clock so the output
/// is a pure function of its inputs.
pub fn render_export(
    document_name: &str,
    analysis: &Analysis,
    generated_at: DateTime<Utc>,
) -> String {
    let mut out = String::new();
    let s = &analysis.summary;

    // Writes to a String cannot fail.
    let _ = writeln!(out, "Echotrace Overlap Report");
    let _ = writeln!(
        out,
        "Generated: {}",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    let _ = writeln!(out, "Document: {document_name}");
    let _ = writeln!(out);
    let _ = writeln!(out, "Total sentences: {}", s.total_sentences);
    let _ = writeln!(out, "Total words: {}", s.total_words);
    let _ = writeln!(out, "Matches found: {}", s.matches);
    let _ = writeln!(out, "Similarity: {:.1}%", s.similarity_pct);
    let _ = writeln!(out, "Originality: {:.1}%", s.originality_pct);
    let _ = writeln!(out);

    if analysis.matches.is_empty() {
        let _ = writeln!(out, "No overlapping content detected.");
        return out;
    }

    for (n, record) in analysis.matches.iter().enumerate() {
        match &record.source {
            MatchSource::Repetition { count } => {
                let _ = writeln!(out, "{}. Repeated sentence ({count} occurrences)", n + 1);
                let _ = writeln!(out, "   Sentence: \"{}\"", record.sentence_text.trim());
                let _ = writeln!(out, "   Lines: {}", join_positions(&record.positions));
            }
            MatchSource::Academic(paper) => {
                let _ = writeln!(out, "{}. Academic match", n + 1);
                let _ = writeln!(out, "   Sentence: \"{}\"", record.sentence_text.trim());
                let _ = writeln!(out, "   Line: {}", join_positions(&record.positions));
                let _ = writeln!(out, "   Title: {}", paper.title);
                let _ = writeln!(out, "   Authors: {}", paper.authors);
                if let Some(ref url) = paper.url {
                    let _ = writeln!(out, "   URL: {url}");
                }
            }
            MatchSource::Web { url } => {
                let _ = writeln!(out, "{}. Web match", n + 1);
                let _ = writeln!(out, "   Sentence: \"{}\"", record.sentence_text.trim());
                let _ = writeln!(out, "   Line: {}", join_positions(&record.positions));
                let _ = writeln!(out, "   URL: {url}");
            }
        }
        let _ = writeln!(out);
    }

    out
}

fn join_positions(positions: &[usize]) -> String {
    positions
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
