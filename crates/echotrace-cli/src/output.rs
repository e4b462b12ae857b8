//! Console rendering for the CLI: staged results, summary, and the color
//! handling around them.

use std::io::Write;

use echotrace_core::{Analysis, AnalysisSummary, MatchKind, MatchSource};
use echotrace_reporting::HighlightOptions;
use owo_colors::OwoColorize;

/// Whether to emit ANSI colors. Off when writing to a file or --no-color.
#[derive(Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(self) -> bool {
        self.0
    }
}

pub fn print_load_banner(
    w: &mut dyn Write,
    document_name: &str,
    sentences: usize,
    words: usize,
    color: ColorMode,
) -> std::io::Result<()> {
    let msg = format!("Loaded {document_name} ({sentences} sentences, {words} words)");
    if color.enabled() {
        writeln!(w, "{}", msg.bold())?;
    } else {
        writeln!(w, "{msg}")?;
    }
    writeln!(w)
}

/// Print every match record, repetition stage first, then external matches.
pub fn print_results(w: &mut dyn Write, analysis: &Analysis, color: ColorMode) -> std::io::Result<()> {
    if analysis.matches.is_empty() {
        let msg = "No significant overlap found.";
        if color.enabled() {
            writeln!(w, "{}", msg.green().bold())?;
        } else {
            writeln!(w, "{msg}")?;
        }
        return Ok(());
    }

    for (n, record) in analysis.matches.iter().enumerate() {
        let heading = format!("{}. {}", n + 1, record.kind().label());
        if color.enabled() {
            match record.kind() {
                MatchKind::SelfRepetition => writeln!(w, "{}", heading.yellow().bold())?,
                _ => writeln!(w, "{}", heading.red().bold())?,
            }
        } else {
            writeln!(w, "{heading}")?;
        }

        writeln!(w, "   \"{}\"", record.sentence_text.trim())?;
        match &record.source {
            MatchSource::Repetition { count } => {
                let positions = record
                    .positions
                    .iter()
                    .map(|p| p.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                writeln!(w, "   Found {count} times (sentences {positions})")?;
            }
            MatchSource::Academic(paper) => {
                writeln!(w, "   Source: '{}' by {}", paper.title, paper.authors)?;
                if let Some(ref url) = paper.url {
                    writeln!(w, "   {url}")?;
                }
            }
            MatchSource::Web { url } => {
                writeln!(w, "   Source: {url}")?;
            }
        }
        writeln!(w)?;
    }
    Ok(())
}

pub fn print_summary(
    w: &mut dyn Write,
    summary: &AnalysisSummary,
    color: ColorMode,
) -> std::io::Result<()> {
    writeln!(w, "Sentences checked: {}", summary.total_sentences)?;
    writeln!(w, "Matches found: {}", summary.matches)?;
    let similarity = format!("Similarity: {:.1}%", summary.similarity_pct);
    let originality = format!("Originality: {:.1}%", summary.originality_pct);
    if color.enabled() {
        if summary.matches > 0 {
            writeln!(w, "{}", similarity.red())?;
        } else {
            writeln!(w, "{similarity}")?;
        }
        writeln!(w, "{}", originality.green())?;
    } else {
        writeln!(w, "{similarity}")?;
        writeln!(w, "{originality}")?;
    }
    Ok(())
}

/// Highlight markers for the inline view: ANSI reverse video when color is
/// on, Markdown emphasis otherwise.
pub fn highlight_options(color: ColorMode) -> HighlightOptions {
    if color.enabled() {
        HighlightOptions {
            open: "\x1b[7m".to_string(),
            close: "\x1b[0m".to_string(),
            separator: " ".to_string(),
        }
    } else {
        HighlightOptions::default()
    }
}
