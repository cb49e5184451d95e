pub mod dom;
pub mod engine;
pub mod host;
pub mod io;
pub mod reading;
pub mod rope;
pub mod vault;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use engine::{
    CandidateRegion, ControllerState, Decoration, DecorationSet, QuotePreview, QuoteWidget,
    TRIGGER, ViewUpdate, WIDGET_LABEL, WidgetEvent, PointerEvent, find_candidates,
    render_decorations,
};
pub use host::{
    BlockQuote, EditorView, LineSyntaxTree, MarkdownView, Selection, SelectionRange, SyntaxNode,
    SyntaxTree, UpdateFlags,
};
pub use io::*;
pub use reading::{enhance_quotes, render_reading_view};
pub use rope::Span;
pub use vault::{FileIndex, FileInfo, VaultError, is_kgar_frontmatter};
