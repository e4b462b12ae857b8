//! Report rendering: two independent pure projections of a finished
//! [`Analysis`](echotrace_core::Analysis), an inline highlighted view of the
//! document and a flat, line-oriented export document. Neither mutates the
//! result set.

mod export;
mod highlight;

pub use export::render_export;
pub use highlight::{render_highlighted, HighlightOptions};
