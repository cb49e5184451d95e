//! # Host Abstraction
//!
//! The decoration engine never owns a document. Everything it reads comes
//! from the editor that mounts it, through the traits in this module:
//!
//! - [`SyntaxTree`] / [`SyntaxNode`]: read-only, pre-order iteration of the
//!   host parser's tree restricted to an offset range
//! - [`Selection`]: the caret and any selected ranges
//! - [`EditorView`]: visible ranges, document text, selection, rendering
//!   mode, and the two write-backs a widget needs (coordinate lookup and
//!   caret placement)
//!
//! [`MarkdownView`] is a complete host built on an `xi_rope::Rope` and a
//! line-oriented syntax tree ([`LineSyntaxTree`]). The terminal binary and
//! the tests both mount the engine on it.

pub mod block_quote;
pub mod line_tree;
pub mod view;

pub use block_quote::BlockQuote;
pub use line_tree::LineSyntaxTree;
pub use view::MarkdownView;

use crate::rope::Span;

/// A node of the host's syntax tree, as seen during iteration.
pub trait SyntaxNode {
    /// Classification label, e.g. `HyperMD-quote_HyperMD-quote-2`.
    fn type_name(&self) -> &str;
    fn span(&self) -> Span;
    fn first_child(&self) -> Option<Span>;
    fn last_child(&self) -> Option<Span>;
}

/// Read-only access to the host's parse of the document.
pub trait SyntaxTree {
    /// Calls `enter` for every node intersecting `range`, parents before
    /// children, in document order.
    fn iterate(&self, range: Span, enter: &mut dyn FnMut(&dyn SyntaxNode));
}

/// One selected range. `from == to` is a bare caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionRange {
    pub from: usize,
    pub to: usize,
}

impl SelectionRange {
    /// Builds a range from anchor and head in either order.
    pub fn new(anchor: usize, head: usize) -> Self {
        Self {
            from: anchor.min(head),
            to: anchor.max(head),
        }
    }

    pub fn cursor(pos: usize) -> Self {
        Self { from: pos, to: pos }
    }

    pub fn is_empty(&self) -> bool {
        self.from == self.to
    }
}

/// The editor selection: ordered ranges, possibly several, possibly none.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ranges: Vec<SelectionRange>,
}

impl Selection {
    pub fn new(mut ranges: Vec<SelectionRange>) -> Self {
        ranges.sort_by_key(|r| (r.from, r.to));
        Self { ranges }
    }

    pub fn cursor(pos: usize) -> Self {
        Self {
            ranges: vec![SelectionRange::cursor(pos)],
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn ranges(&self) -> &[SelectionRange] {
        &self.ranges
    }

    /// The first range's head, if any range exists.
    pub fn main_caret(&self) -> Option<usize> {
        self.ranges.first().map(|r| r.to)
    }
}

/// What changed in the view since the previous notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateFlags {
    pub doc_changed: bool,
    pub viewport_changed: bool,
    pub selection_set: bool,
}

impl UpdateFlags {
    pub const NONE: UpdateFlags = UpdateFlags {
        doc_changed: false,
        viewport_changed: false,
        selection_set: false,
    };

    pub fn any(self) -> bool {
        self.doc_changed || self.viewport_changed || self.selection_set
    }

    /// Combines notifications that were batched before delivery.
    pub fn merge(self, other: UpdateFlags) -> UpdateFlags {
        UpdateFlags {
            doc_changed: self.doc_changed || other.doc_changed,
            viewport_changed: self.viewport_changed || other.viewport_changed,
            selection_set: self.selection_set || other.selection_set,
        }
    }
}

/// An editor view the engine can be mounted on.
pub trait EditorView {
    /// Disjoint, ordered ranges currently rendered on screen.
    fn visible_ranges(&self) -> Vec<Span>;
    fn syntax_tree(&self) -> &dyn SyntaxTree;
    /// Document text for `span`; out-of-range spans are clamped.
    fn slice(&self, span: Span) -> String;
    fn selection(&self) -> &Selection;
    /// True in live preview, false in raw source mode.
    fn is_live_preview(&self) -> bool;
    /// Resolves screen coordinates to a document offset.
    fn pos_at_coords(&self, x: f32, y: f32) -> Option<usize>;
    /// Collapses the selection to a caret at `offset`.
    fn set_cursor(&mut self, offset: usize);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_range_orders_anchor_and_head() {
        let r = SelectionRange::new(9, 3);
        assert_eq!((r.from, r.to), (3, 9));
        assert!(!r.is_empty());
        assert!(SelectionRange::cursor(4).is_empty());
    }

    #[test]
    fn selection_sorts_ranges() {
        let sel = Selection::new(vec![SelectionRange::new(10, 12), SelectionRange::cursor(2)]);
        assert_eq!(sel.ranges()[0], SelectionRange::cursor(2));
        assert_eq!(sel.main_caret(), Some(2));
        assert_eq!(Selection::empty().main_caret(), None);
    }
}
