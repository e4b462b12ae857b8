//! Core analysis engine: detectors, rate limiting, and match aggregation.
//!
//! The aggregator in [`aggregate`] orchestrates one pass of the
//! self-repetition scan plus per-sentence external lookups (academic first,
//! then web) into a single deduplicated, ordered result set with summary
//! statistics. External detector failures are absorbed here and degrade to
//! "no match"; the only fatal failure in the pipeline is upstream document
//! reading, which never reaches this crate.

pub mod aggregate;
pub mod detector;
pub mod progress;
pub mod rate_limit;
pub mod repetition;
mod types;

pub use aggregate::analyze;
pub use detector::{AcademicDetector, DetectorError, WebDetector};
pub use progress::ProgressEvent;
pub use rate_limit::Pacer;
pub use types::{
    Analysis, AnalysisSummary, MatchKind, MatchRecord, MatchSource, PaperMatch,
    normalize_sentence, word_count,
};

use std::time::Duration;

/// A sentence must have strictly more words than this to take part in the
/// self-repetition scan. Suppresses false positives on short common phrases.
pub const SELF_REPETITION_MIN_WORDS: usize = 8;

/// A sentence must have at least this many words to be sent to external
/// detectors.
pub const EXTERNAL_MIN_WORDS: usize = 10;

/// Default timeout for a single academic lookup.
pub const DEFAULT_ACADEMIC_TIMEOUT: Duration = Duration::from_secs(10);

/// Default minimum interval between successive web search calls. This is the
/// provider's use-policy floor, not a tuning knob.
pub const DEFAULT_WEB_PACING: Duration = Duration::from_secs(2);
