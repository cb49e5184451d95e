//! Viewport tree walk: finds the quote lines to replace.
//!
//! Each visible range is walked on its own. Within a range, quote state is
//! threaded through the quote node callbacks in document order; other
//! nodes leave it untouched:
//!
//! ```text
//!                   quote, prev NotQuote          quote, depth not deeper
//!   NotQuote ─────────────────────────► Beginning ───────────────────────► Within
//!                                          ▲                                 │
//!                                          └──── quote, depth increased ─────┘
//! ```
//!
//! Only a node that lands in `BeginningOfQuote` can produce a candidate, so
//! the trigger is honoured on the first quote line of a range and on the
//! first line of each deeper nested quote, never on continuation lines.

use log::trace;
use relative_path::RelativePath;

use super::classify::{is_formatting, is_quote_block, quote_depth};
use super::selection::overlaps;
use super::trigger::matches_trigger;
use crate::host::{EditorView, SyntaxNode};
use crate::rope::Span;

/// Where the walk is relative to the current quote run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuoteState {
    #[default]
    NotQuote,
    BeginningOfQuote,
    WithinQuote,
}

/// Walk-local state for one visible range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraversalContext {
    pub state: QuoteState,
    pub depth: u32,
}

impl TraversalContext {
    /// Steps the state machine for a quote node at `depth`.
    pub fn enter_quote(&mut self, depth: u32) -> QuoteState {
        let deeper = depth > self.depth;
        self.state = if self.state == QuoteState::NotQuote || deeper {
            QuoteState::BeginningOfQuote
        } else {
            QuoteState::WithinQuote
        };
        self.depth = depth;
        self.state
    }
}

/// A span eligible for replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateRegion {
    pub span: Span,
    /// Trimmed source text of the span.
    pub raw_text: String,
}

/// Walks every visible range of `view` and returns the candidate regions in
/// ascending offset order.
///
/// Nothing is found without an active file.
pub fn find_candidates(
    view: &dyn EditorView,
    active_file: Option<&RelativePath>,
) -> Vec<CandidateRegion> {
    if active_file.is_none() {
        trace!("no active file, skipping walk");
        return vec![];
    }

    let selection = view.selection();
    let mut out = vec![];

    for range in view.visible_ranges() {
        let mut ctx = TraversalContext::default();
        view.syntax_tree().iterate(range, &mut |node: &dyn SyntaxNode| {
            let name = node.type_name();
            if is_formatting(name) {
                return;
            }

            let span = node.span();
            // One past the end so a caret right after the node counts.
            if overlaps(selection, span.start, span.end + 1) {
                trace!("{name}@{span:?} touches the selection");
                return;
            }

            if !is_quote_block(name) {
                return;
            }

            let Some(child) = node.last_child() else {
                return;
            };
            let original = view.slice(child);
            let original = original.trim();

            let state = ctx.enter_quote(quote_depth(name));
            if state != QuoteState::BeginningOfQuote || !matches_trigger(original) {
                return;
            }

            out.push(CandidateRegion {
                span: child,
                raw_text: original.to_string(),
            });
        });
    }

    out
}
