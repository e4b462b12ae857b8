//! Match aggregation: one ordered, deduplicated result set per run.

use std::collections::HashSet;

use tokio_util::sync::CancellationToken;

use crate::detector::{AcademicDetector, WebDetector};
use crate::progress::ProgressEvent;
use crate::repetition::find_repeated_sentences;
use crate::types::{
    normalize_sentence, word_count, Analysis, AnalysisSummary, MatchRecord, MatchSource,
};
use crate::EXTERNAL_MIN_WORDS;

/// Run the full analysis over an ordered sentence sequence.
///
/// Seeds the result set from the self-repetition scan, then walks sentences
/// in ascending order invoking the academic detector first and the web
/// detector only when the academic one found nothing. A sentence whose
/// normalized text is already in the result set is never re-queried, so each
/// distinct sentence yields at most one record with priority repetition >
/// academic > web.
///
/// This function cannot fail: detector errors are logged and degrade to "no
/// match" for that sentence. Cancellation is honored between sentences; a
/// cancelled run returns whatever was aggregated up to that boundary, with
/// the summary computed over it.
pub async fn analyze(
    sentences: &[String],
    total_words: usize,
    academic: &dyn AcademicDetector,
    web: &dyn WebDetector,
    mut progress: impl FnMut(ProgressEvent),
    cancel: &CancellationToken,
) -> Analysis {
    let mut records = find_repeated_sentences(sentences);
    let mut resolved: HashSet<String> = records
        .iter()
        .map(|r| normalize_sentence(&r.sentence_text))
        .collect();
    progress(ProgressEvent::RepetitionScanDone {
        found: records.len(),
    });

    let total = sentences.len();
    for (i, sentence) in sentences.iter().enumerate() {
        if cancel.is_cancelled() {
            tracing::info!(checked = i, total, "analysis cancelled at sentence boundary");
            break;
        }
        let index = i + 1;
        progress(ProgressEvent::CheckingSentence { index, total });

        let trimmed = sentence.trim();
        if word_count(trimmed) < EXTERNAL_MIN_WORDS {
            continue;
        }
        let key = normalize_sentence(sentence);
        if resolved.contains(&key) {
            continue;
        }

        match academic.lookup(trimmed).await {
            Ok(Some(paper)) => {
                records.push(MatchRecord {
                    sentence_text: trimmed.to_string(),
                    positions: vec![index],
                    source: MatchSource::Academic(paper),
                });
                resolved.insert(key);
                progress(ProgressEvent::MatchFound {
                    kind: crate::MatchKind::AcademicMatch,
                    index,
                });
                // Academic evidence suppresses the web lookup for this sentence.
                continue;
            }
            Ok(None) => {}
            Err(e) => {
                tracing::debug!(detector = academic.name(), error = %e, index,
                    "lookup failed, treated as no match");
            }
        }

        match web.lookup(trimmed).await {
            Ok(Some(url)) => {
                records.push(MatchRecord {
                    sentence_text: trimmed.to_string(),
                    positions: vec![index],
                    source: MatchSource::Web { url },
                });
                resolved.insert(key);
                progress(ProgressEvent::MatchFound {
                    kind: crate::MatchKind::WebMatch,
                    index,
                });
            }
            Ok(None) => {}
            Err(e) => {
                tracing::debug!(detector = web.name(), error = %e, index,
                    "lookup failed, treated as no match");
            }
        }
    }

    let summary = AnalysisSummary::compute(total, total_words, records.len());
    Analysis {
        matches: records,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::{DetectorError, DetectorFuture};
    use crate::types::{MatchKind, PaperMatch};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubAcademic {
        result: Result<Option<PaperMatch>, String>,
        calls: AtomicUsize,
    }

    impl StubAcademic {
        fn not_found() -> Self {
            Self {
                result: Ok(None),
                calls: AtomicUsize::new(0),
            }
        }

        fn found(paper: PaperMatch) -> Self {
            Self {
                result: Ok(Some(paper)),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                result: Err("connection reset".to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl AcademicDetector for StubAcademic {
        fn name(&self) -> &str {
            "stub academic"
        }

        fn lookup<'a>(&'a self, _sentence: &'a str) -> DetectorFuture<'a, PaperMatch> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let result = match &self.result {
                Ok(v) => Ok(v.clone()),
                Err(e) => Err(DetectorError::Request(e.clone())),
            };
            Box::pin(async move { result })
        }
    }

    struct StubWeb {
        result: Result<Option<String>, String>,
        calls: AtomicUsize,
    }

    impl StubWeb {
        fn not_found() -> Self {
            Self {
                result: Ok(None),
                calls: AtomicUsize::new(0),
            }
        }

        fn found(url: &str) -> Self {
            Self {
                result: Ok(Some(url.to_string())),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                result: Err("HTTP 503".to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl WebDetector for StubWeb {
        fn name(&self) -> &str {
            "stub web"
        }

        fn lookup<'a>(&'a self, _sentence: &'a str) -> DetectorFuture<'a, String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let result = match &self.result {
                Ok(v) => Ok(v.clone()),
                Err(e) => Err(DetectorError::Request(e.clone())),
            };
            Box::pin(async move { result })
        }
    }

    fn doc(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|s| s.to_string()).collect()
    }

    fn paper() -> PaperMatch {
        PaperMatch {
            title: "T".to_string(),
            authors: "A".to_string(),
            url: Some("U".to_string()),
        }
    }

    const QUALIFYING: &str =
        "This qualifying sentence easily has more than ten words in it overall.";

    #[tokio::test]
    async fn repeated_sentence_scenario_yields_single_repetition_record() {
        let sentences = doc(&[
            "This is a short test.",
            "This exact long sentence appears twice in this very document for testing.",
            "Some other unrelated content goes here for padding purposes.",
            "This exact long sentence appears twice in this very document for testing.",
        ]);
        let academic = StubAcademic::not_found();
        let web = StubWeb::not_found();
        let cancel = CancellationToken::new();

        let analysis = analyze(&sentences, 38, &academic, &web, |_| {}, &cancel).await;

        assert_eq!(analysis.matches.len(), 1);
        let rec = &analysis.matches[0];
        assert_eq!(rec.kind(), MatchKind::SelfRepetition);
        assert_eq!(rec.positions, vec![2, 4]);
        assert_eq!(rec.source, MatchSource::Repetition { count: 2 });
        assert_eq!(analysis.summary.similarity_pct, 25.0);
        assert_eq!(analysis.summary.originality_pct, 75.0);
        // Sentence 1 is too short, 3 is 9 words, 2 and 4 are already flagged:
        // no external lookup at all.
        assert_eq!(academic.calls(), 0);
        assert_eq!(web.calls(), 0);
    }

    #[tokio::test]
    async fn academic_match_suppresses_web_lookup() {
        let sentences = doc(&[QUALIFYING]);
        let academic = StubAcademic::found(paper());
        let web = StubWeb::found("https://example.com");
        let cancel = CancellationToken::new();

        let analysis = analyze(&sentences, 12, &academic, &web, |_| {}, &cancel).await;

        assert_eq!(analysis.matches.len(), 1);
        assert_eq!(analysis.matches[0].kind(), MatchKind::AcademicMatch);
        assert_eq!(analysis.matches[0].positions, vec![1]);
        assert_eq!(
            analysis.matches[0].source,
            MatchSource::Academic(paper())
        );
        assert_eq!(academic.calls(), 1);
        assert_eq!(web.calls(), 0);
    }

    #[tokio::test]
    async fn web_is_consulted_when_academic_finds_nothing() {
        let sentences = doc(&[QUALIFYING]);
        let academic = StubAcademic::not_found();
        let web = StubWeb::found("https://example.com/source");
        let cancel = CancellationToken::new();

        let analysis = analyze(&sentences, 12, &academic, &web, |_| {}, &cancel).await;

        assert_eq!(analysis.matches.len(), 1);
        assert_eq!(analysis.matches[0].kind(), MatchKind::WebMatch);
        assert_eq!(
            analysis.matches[0].source,
            MatchSource::Web {
                url: "https://example.com/source".to_string()
            }
        );
        assert_eq!(academic.calls(), 1);
        assert_eq!(web.calls(), 1);
    }

    #[tokio::test]
    async fn detector_failures_degrade_to_no_match() {
        let sentences = doc(&[QUALIFYING]);
        let academic = StubAcademic::failing();
        let web = StubWeb::failing();
        let cancel = CancellationToken::new();

        let analysis = analyze(&sentences, 12, &academic, &web, |_| {}, &cancel).await;

        assert!(analysis.matches.is_empty());
        assert_eq!(analysis.summary.matches, 0);
        assert_eq!(analysis.summary.originality_pct, 100.0);
        assert_eq!(academic.calls(), 1);
        assert_eq!(web.calls(), 1);
    }

    #[tokio::test]
    async fn academic_failure_still_allows_web_match() {
        let sentences = doc(&[QUALIFYING]);
        let academic = StubAcademic::failing();
        let web = StubWeb::found("https://example.com/found");
        let cancel = CancellationToken::new();

        let analysis = analyze(&sentences, 12, &academic, &web, |_| {}, &cancel).await;

        assert_eq!(analysis.matches.len(), 1);
        assert_eq!(analysis.matches[0].kind(), MatchKind::WebMatch);
    }

    #[tokio::test]
    async fn self_repetition_takes_priority_over_external_detection() {
        // Both occurrences qualify for external detection, but the repetition
        // scan resolves them first.
        let sentences = doc(&[QUALIFYING, QUALIFYING]);
        let academic = StubAcademic::found(paper());
        let web = StubWeb::found("https://example.com");
        let cancel = CancellationToken::new();

        let analysis = analyze(&sentences, 24, &academic, &web, |_| {}, &cancel).await;

        assert_eq!(analysis.matches.len(), 1);
        assert_eq!(analysis.matches[0].kind(), MatchKind::SelfRepetition);
        assert_eq!(academic.calls(), 0);
        assert_eq!(web.calls(), 0);
    }

    #[tokio::test]
    async fn short_sentences_never_reach_external_detectors() {
        let sentences = doc(&["Nine words exactly in this sentence right here now."]);
        assert_eq!(word_count(&sentences[0]), 9);
        let academic = StubAcademic::found(paper());
        let web = StubWeb::found("https://example.com");
        let cancel = CancellationToken::new();

        let analysis = analyze(&sentences, 9, &academic, &web, |_| {}, &cancel).await;

        assert!(analysis.matches.is_empty());
        assert_eq!(academic.calls(), 0);
        assert_eq!(web.calls(), 0);
    }

    #[tokio::test]
    async fn rerun_with_deterministic_stubs_is_idempotent() {
        let sentences = doc(&[
            QUALIFYING,
            "This exact long sentence appears twice in this very document for testing.",
            "This exact long sentence appears twice in this very document for testing.",
        ]);
        let cancel = CancellationToken::new();

        let first = analyze(
            &sentences,
            36,
            &StubAcademic::found(paper()),
            &StubWeb::not_found(),
            |_| {},
            &cancel,
        )
        .await;
        let second = analyze(
            &sentences,
            36,
            &StubAcademic::found(paper()),
            &StubWeb::not_found(),
            |_| {},
            &cancel,
        )
        .await;

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn repetition_records_come_before_external_matches() {
        let repeated =
            "This exact long sentence appears twice in this very document for testing.";
        let sentences = doc(&[QUALIFYING, repeated, repeated]);
        let academic = StubAcademic::found(paper());
        let web = StubWeb::not_found();
        let cancel = CancellationToken::new();

        let analysis = analyze(&sentences, 36, &academic, &web, |_| {}, &cancel).await;

        assert_eq!(analysis.matches.len(), 2);
        assert_eq!(analysis.matches[0].kind(), MatchKind::SelfRepetition);
        assert_eq!(analysis.matches[1].kind(), MatchKind::AcademicMatch);
    }

    #[tokio::test]
    async fn cancelled_run_stops_at_sentence_boundary_but_keeps_repetitions() {
        let repeated =
            "This exact long sentence appears twice in this very document for testing.";
        let sentences = doc(&[repeated, repeated, QUALIFYING]);
        let academic = StubAcademic::found(paper());
        let web = StubWeb::not_found();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let analysis = analyze(&sentences, 36, &academic, &web, |_| {}, &cancel).await;

        assert_eq!(analysis.matches.len(), 1);
        assert_eq!(analysis.matches[0].kind(), MatchKind::SelfRepetition);
        assert_eq!(academic.calls(), 0);
    }

    #[tokio::test]
    async fn progress_events_cover_every_sentence() {
        let sentences = doc(&["Short one.", QUALIFYING]);
        let academic = StubAcademic::not_found();
        let web = StubWeb::not_found();
        let cancel = CancellationToken::new();
        let mut events = Vec::new();

        analyze(
            &sentences,
            13,
            &academic,
            &web,
            |e| events.push(e),
            &cancel,
        )
        .await;

        assert_eq!(
            events[0],
            ProgressEvent::RepetitionScanDone { found: 0 }
        );
        assert!(events.contains(&ProgressEvent::CheckingSentence { index: 1, total: 2 }));
        assert!(events.contains(&ProgressEvent::CheckingSentence { index: 2, total: 2 }));
    }
}
