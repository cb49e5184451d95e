use std::ops::Range;

use xi_rope::Rope;

use super::{EditorView, LineSyntaxTree, Selection, SelectionRange, SyntaxTree, UpdateFlags};
use crate::rope::{LineRef, Span, lines_with_spans, slice_to_string};

const DEFAULT_VIEWPORT_HEIGHT: usize = 40;

/// A self-contained editor view over a markdown document.
///
/// Holds the text in a rope, re-derives the line syntax tree on every edit,
/// and models a scrolled viewport (with optional folds) plus a selection.
/// Every mutating method reports what changed as [`UpdateFlags`], ready to
/// be handed to the decoration controller.
#[derive(Debug, Clone)]
pub struct MarkdownView {
    rope: Rope,
    lines: Vec<LineRef>,
    tree: LineSyntaxTree,
    selection: Selection,
    live_preview: bool,
    scroll_line: usize,
    viewport_height: usize,
    /// Folded line ranges; the first line of each stays visible.
    folds: Vec<Range<usize>>,
}

impl MarkdownView {
    pub fn new(source: &str) -> Self {
        let rope = Rope::from(source);
        let lines = lines_with_spans(&rope).collect();
        let tree = LineSyntaxTree::parse(&rope);
        Self {
            rope,
            lines,
            tree,
            selection: Selection::cursor(0),
            live_preview: true,
            scroll_line: 0,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            folds: vec![],
        }
    }

    pub fn text(&self) -> String {
        self.rope.slice_to_cow(..).into_owned()
    }

    pub fn len(&self) -> usize {
        self.rope.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len() == 0
    }

    pub fn lines(&self) -> &[LineRef] {
        &self.lines
    }

    pub fn tree(&self) -> &LineSyntaxTree {
        &self.tree
    }

    pub fn scroll_line(&self) -> usize {
        self.scroll_line
    }

    pub fn viewport_height(&self) -> usize {
        self.viewport_height
    }

    /// Indices of the lines currently on screen, top to bottom.
    pub fn visible_lines(&self) -> Vec<usize> {
        (self.scroll_line..self.lines.len())
            .filter(|&i| !self.is_hidden(i))
            .take(self.viewport_height)
            .collect()
    }

    /// Index of the line containing `offset`. Offsets past the end map to
    /// the last line.
    pub fn line_of_offset(&self, offset: usize) -> usize {
        self.lines
            .iter()
            .position(|l| offset < l.span.end)
            .unwrap_or(self.lines.len().saturating_sub(1))
    }

    fn is_hidden(&self, line: usize) -> bool {
        self.folds
            .iter()
            .any(|f| f.start < line && line < f.end)
    }

    fn reparse(&mut self) {
        self.lines = lines_with_spans(&self.rope).collect();
        self.tree = LineSyntaxTree::parse(&self.rope);
        let last = self.lines.len().saturating_sub(1);
        self.scroll_line = self.scroll_line.min(last);
        self.folds.retain(|f| f.end <= self.lines.len());
    }

    fn clamp_offset(&self, offset: usize) -> usize {
        let mut offset = offset.min(self.rope.len());
        // Snap back to a char boundary.
        if let Some(lr) = self.lines.get(self.line_of_offset(offset)) {
            while offset > lr.span.start
                && offset - lr.span.start < lr.text.len()
                && !lr.text.is_char_boundary(offset - lr.span.start)
            {
                offset -= 1;
            }
        }
        offset
    }

    /// Inserts `text` at `at` and shifts selection ranges behind it.
    pub fn insert(&mut self, at: usize, text: &str) -> UpdateFlags {
        let at = self.clamp_offset(at);
        if text.is_empty() {
            return UpdateFlags::NONE;
        }
        self.rope.edit(at..at, text);
        let shift = |pos: usize| if pos >= at { pos + text.len() } else { pos };
        self.selection = Selection::new(
            self.selection
                .ranges()
                .iter()
                .map(|r| SelectionRange::new(shift(r.from), shift(r.to)))
                .collect(),
        );
        self.reparse();
        UpdateFlags {
            doc_changed: true,
            viewport_changed: false,
            selection_set: true,
        }
    }

    /// Deletes `span` and collapses selection ranges inside it.
    pub fn delete(&mut self, span: Span) -> UpdateFlags {
        let span = Span::new(self.clamp_offset(span.start), self.clamp_offset(span.end));
        if span.is_empty() {
            return UpdateFlags::NONE;
        }
        self.rope.edit(span.start..span.end, "");
        let map = |pos: usize| {
            if pos >= span.end {
                pos - span.len()
            } else {
                pos.min(span.start)
            }
        };
        self.selection = Selection::new(
            self.selection
                .ranges()
                .iter()
                .map(|r| SelectionRange::new(map(r.from), map(r.to)))
                .collect(),
        );
        self.reparse();
        UpdateFlags {
            doc_changed: true,
            viewport_changed: false,
            selection_set: true,
        }
    }

    /// Deletes the character before the main caret.
    pub fn backspace(&mut self) -> UpdateFlags {
        let Some(caret) = self.selection.main_caret() else {
            return UpdateFlags::NONE;
        };
        match self.rope.prev_codepoint_offset(caret) {
            Some(prev) => self.delete(Span::new(prev, caret)),
            None => UpdateFlags::NONE,
        }
    }

    /// Deletes the character under the main caret.
    pub fn delete_forward(&mut self) -> UpdateFlags {
        let Some(caret) = self.selection.main_caret() else {
            return UpdateFlags::NONE;
        };
        match self.rope.next_codepoint_offset(caret) {
            Some(next) => self.delete(Span::new(caret, next)),
            None => UpdateFlags::NONE,
        }
    }

    pub fn set_selection(&mut self, selection: Selection) -> UpdateFlags {
        let clamped = Selection::new(
            selection
                .ranges()
                .iter()
                .map(|r| SelectionRange::new(self.clamp_offset(r.from), self.clamp_offset(r.to)))
                .collect(),
        );
        if clamped == self.selection {
            return UpdateFlags::NONE;
        }
        self.selection = clamped;
        UpdateFlags {
            selection_set: true,
            ..UpdateFlags::NONE
        }
    }

    /// Moves the main caret by `delta` characters.
    pub fn move_caret(&mut self, delta: isize) -> UpdateFlags {
        let mut pos = self.selection.main_caret().unwrap_or(0);
        for _ in 0..delta.unsigned_abs() {
            let next = if delta < 0 {
                self.rope.prev_codepoint_offset(pos)
            } else {
                self.rope.next_codepoint_offset(pos)
            };
            match next {
                Some(n) => pos = n,
                None => break,
            }
        }
        self.set_selection(Selection::cursor(pos))
    }

    /// Moves the main caret `delta` lines up or down, keeping the column
    /// where the target line is long enough.
    pub fn move_caret_lines(&mut self, delta: isize) -> UpdateFlags {
        if self.lines.is_empty() {
            return UpdateFlags::NONE;
        }
        let caret = self.selection.main_caret().unwrap_or(0);
        let line = self.line_of_offset(caret);
        let column = caret.saturating_sub(self.lines[line].span.start);
        let target = line
            .saturating_add_signed(delta)
            .min(self.lines.len() - 1);
        let target_span = self.lines[target].content_span();
        let pos = (target_span.start + column).min(target_span.end);
        let mut flags = self.set_selection(Selection::cursor(pos));
        flags = flags.merge(self.scroll_into_view(target));
        flags
    }

    pub fn scroll_to(&mut self, line: usize) -> UpdateFlags {
        let line = line.min(self.lines.len().saturating_sub(1));
        if line == self.scroll_line {
            return UpdateFlags::NONE;
        }
        self.scroll_line = line;
        UpdateFlags {
            viewport_changed: true,
            ..UpdateFlags::NONE
        }
    }

    /// Scrolls by `delta` lines.
    pub fn scroll_by(&mut self, delta: isize) -> UpdateFlags {
        self.scroll_to(self.scroll_line.saturating_add_signed(delta))
    }

    fn scroll_into_view(&mut self, line: usize) -> UpdateFlags {
        if line < self.scroll_line {
            self.scroll_to(line)
        } else if line >= self.scroll_line + self.viewport_height {
            self.scroll_to(line + 1 - self.viewport_height)
        } else {
            UpdateFlags::NONE
        }
    }

    pub fn set_viewport_height(&mut self, height: usize) -> UpdateFlags {
        let height = height.max(1);
        if height == self.viewport_height {
            return UpdateFlags::NONE;
        }
        self.viewport_height = height;
        UpdateFlags {
            viewport_changed: true,
            ..UpdateFlags::NONE
        }
    }

    /// Folds `lines`: every line after the first in the range is hidden.
    pub fn fold(&mut self, lines: Range<usize>) -> UpdateFlags {
        if lines.end <= lines.start + 1 || lines.end > self.lines.len() {
            return UpdateFlags::NONE;
        }
        self.folds.push(lines);
        UpdateFlags {
            viewport_changed: true,
            ..UpdateFlags::NONE
        }
    }

    /// Switches between live preview and source mode. The view is laid out
    /// again, which hosts report as a viewport change.
    pub fn set_live_preview(&mut self, live: bool) -> UpdateFlags {
        if live == self.live_preview {
            return UpdateFlags::NONE;
        }
        self.live_preview = live;
        UpdateFlags {
            viewport_changed: true,
            ..UpdateFlags::NONE
        }
    }
}

impl EditorView for MarkdownView {
    fn visible_ranges(&self) -> Vec<Span> {
        let mut ranges: Vec<Span> = vec![];
        let mut previous: Option<usize> = None;

        for i in self.visible_lines() {
            let span = self.lines[i].content_span();
            match (ranges.last_mut(), previous) {
                (Some(last), Some(p)) if p + 1 == i => last.end = span.end,
                _ => ranges.push(span),
            }
            previous = Some(i);
        }
        ranges
    }

    fn syntax_tree(&self) -> &dyn SyntaxTree {
        &self.tree
    }

    fn slice(&self, span: Span) -> String {
        slice_to_string(&self.rope, span)
    }

    fn selection(&self) -> &Selection {
        &self.selection
    }

    fn is_live_preview(&self) -> bool {
        self.live_preview
    }

    /// `x` is a column in characters, `y` a row counted from the top of the
    /// viewport.
    fn pos_at_coords(&self, x: f32, y: f32) -> Option<usize> {
        if x < 0.0 || y < 0.0 {
            return None;
        }
        let line = *self.visible_lines().get(y as usize)?;
        let lr = &self.lines[line];
        let column = lr
            .text
            .char_indices()
            .nth(x as usize)
            .map(|(i, _)| i)
            .unwrap_or(lr.text.len());
        Some(lr.span.start + column)
    }

    fn set_cursor(&mut self, offset: usize) {
        self.selection = Selection::cursor(self.clamp_offset(offset));
    }
}
