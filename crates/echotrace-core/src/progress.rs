//! Progress events emitted by the aggregator during a run.
//!
//! Consumers (the CLI progress bar, tests) receive these through a plain
//! callback; the aggregator never blocks on them.

use crate::types::MatchKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// The self-repetition scan finished with `found` records.
    RepetitionScanDone { found: usize },
    /// The external phase reached sentence `index` of `total` (1-based).
    CheckingSentence { index: usize, total: usize },
    /// An external detector flagged sentence `index`.
    MatchFound { kind: MatchKind, index: usize },
}
