//! Result-set data model shared across the analysis pipeline.

/// Normalized form of a sentence: trimmed and case-folded. This is the one
/// deduplication key: self-repetition grouping, the aggregator's result map,
/// and highlight membership all agree on it.
pub fn normalize_sentence(sentence: &str) -> String {
    sentence.trim().to_lowercase()
}

/// Whitespace-token word count of a sentence.
pub fn word_count(sentence: &str) -> usize {
    sentence.split_whitespace().count()
}

/// What flagged a sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    SelfRepetition,
    AcademicMatch,
    WebMatch,
}

impl MatchKind {
    pub fn label(self) -> &'static str {
        match self {
            MatchKind::SelfRepetition => "Repeated sentence",
            MatchKind::AcademicMatch => "Academic match",
            MatchKind::WebMatch => "Web match",
        }
    }
}

/// Best academic candidate for a sentence, as returned by the paper-search
/// service: title, display-joined author list, optional canonical link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperMatch {
    pub title: String,
    pub authors: String,
    pub url: Option<String>,
}

/// Kind-specific evidence attached to a match record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchSource {
    /// The sentence occurs `count` times in the document.
    Repetition { count: usize },
    Academic(PaperMatch),
    Web { url: String },
}

/// One entry of the result set: at most one per distinct normalized sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    /// Original (non-normalized) representative sentence text.
    pub sentence_text: String,
    /// 1-based sentence indices, strictly increasing, never empty. Holds all
    /// occurrences for repetition matches and the single flagged occurrence
    /// for external matches.
    pub positions: Vec<usize>,
    pub source: MatchSource,
}

impl MatchRecord {
    pub fn kind(&self) -> MatchKind {
        match self.source {
            MatchSource::Repetition { .. } => MatchKind::SelfRepetition,
            MatchSource::Academic(_) => MatchKind::AcademicMatch,
            MatchSource::Web { .. } => MatchKind::WebMatch,
        }
    }
}

/// Derived statistics for one analysis run. Recomputed each run, never
/// persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSummary {
    pub total_sentences: usize,
    pub total_words: usize,
    pub matches: usize,
    pub similarity_pct: f64,
    pub originality_pct: f64,
}

impl AnalysisSummary {
    pub fn compute(total_sentences: usize, total_words: usize, matches: usize) -> Self {
        let similarity_pct = if total_sentences == 0 {
            0.0
        } else {
            matches as f64 / total_sentences as f64 * 100.0
        };
        Self {
            total_sentences,
            total_words,
            matches,
            similarity_pct,
            originality_pct: 100.0 - similarity_pct,
        }
    }
}

/// Finished output of one analysis run: the ordered result set plus its
/// summary. Immutable once produced; the report renderer only reads it.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub matches: Vec<MatchRecord>,
    pub summary: AnalysisSummary,
}
