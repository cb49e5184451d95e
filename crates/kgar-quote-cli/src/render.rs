//! Turns one source line plus its decorations into terminal text, and maps
//! clicks on that text back to source positions.

use kgar_quote_engine::{Decoration, DecorationSet, Span as DocSpan};
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

/// A run of rendered cells on one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Source text from `span`, shown as is.
    Text(DocSpan),
    /// A widget shown in place of its span.
    Widget(&'a Decoration),
}

/// Splits `content` (a line's text without its newline) into plain and
/// decorated runs.
pub fn segments(content: DocSpan, decorations: &DecorationSet) -> Vec<Segment<'_>> {
    let mut out = vec![];
    let mut cursor = content.start;

    for decoration in decorations
        .iter()
        .filter(|d| d.span.start >= content.start && d.span.end <= content.end)
    {
        if decoration.span.start > cursor {
            out.push(Segment::Text(DocSpan::new(cursor, decoration.span.start)));
        }
        out.push(Segment::Widget(decoration));
        cursor = decoration.span.end;
    }
    if cursor < content.end {
        out.push(Segment::Text(DocSpan::new(cursor, content.end)));
    }
    out
}

fn local<'t>(text: &'t str, content: DocSpan, span: DocSpan) -> &'t str {
    let from = span.start - content.start;
    let to = span.end - content.start;
    text.get(from..to).unwrap_or_default()
}

/// Styled terminal line for `text`, which starts at `content.start`.
pub fn render_line(
    text: &str,
    content: DocSpan,
    decorations: &DecorationSet,
    caret: Option<usize>,
) -> Line<'static> {
    let caret_style = Style::default().add_modifier(Modifier::REVERSED);
    let widget_style = Style::default().add_modifier(Modifier::BOLD);
    let mut spans = vec![];

    for segment in segments(content, decorations) {
        match segment {
            Segment::Widget(decoration) => {
                spans.push(Span::styled(decoration.widget.label(), widget_style));
            }
            Segment::Text(span) => {
                let run = local(text, content, span);
                match caret.filter(|&c| span.start <= c && c < span.end) {
                    Some(c) => {
                        let (before, rest) = run.split_at(c - span.start);
                        let width = rest.chars().next().map_or(0, char::len_utf8);
                        let (under, after) = rest.split_at(width);
                        spans.push(Span::raw(before.to_string()));
                        spans.push(Span::styled(under.to_string(), caret_style));
                        spans.push(Span::raw(after.to_string()));
                    }
                    None => spans.push(Span::raw(run.to_string())),
                }
            }
        }
    }

    if caret == Some(content.end) {
        spans.push(Span::styled(" ", caret_style));
    }
    Line::from(spans)
}

/// What a click at a rendered column landed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hit<'a> {
    /// Source text, with the matching source column.
    Text { column: usize },
    /// A widget; `column` is the source column under the click.
    Widget {
        decoration: &'a Decoration,
        column: usize,
    },
}

/// Maps a rendered column back to the source column beneath it. Clicks past
/// the end of the line land on its last column.
pub fn hit_test<'d>(
    text: &str,
    content: DocSpan,
    decorations: &'d DecorationSet,
    rendered_column: usize,
) -> Hit<'d> {
    let mut rendered = 0;
    let mut source = 0;

    for segment in segments(content, decorations) {
        match segment {
            Segment::Text(span) => {
                let chars = local(text, content, span).chars().count();
                if rendered_column < rendered + chars {
                    return Hit::Text {
                        column: source + rendered_column - rendered,
                    };
                }
                rendered += chars;
                source += chars;
            }
            Segment::Widget(decoration) => {
                let width = decoration.widget.label().chars().count();
                let chars = local(text, content, decoration.span).chars().count();
                if rendered_column < rendered + width {
                    let into = (rendered_column - rendered).min(chars.saturating_sub(1));
                    return Hit::Widget {
                        decoration,
                        column: source + into,
                    };
                }
                rendered += width;
                source += chars;
            }
        }
    }

    Hit::Text { column: source }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kgar_quote_engine::{Decoration, QuoteWidget};

    fn decorated(span: DocSpan) -> DecorationSet {
        DecorationSet::build(vec![Decoration::replace(span, QuoteWidget::new("$kgar"))])
    }

    fn plain(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn widget_replaces_its_span() {
        let content = DocSpan::new(10, 17);
        let line = render_line("> $kgar", content, &decorated(DocSpan::new(12, 17)), None);
        assert_eq!(plain(&line), "> kgar 🌟");
        assert!(line.spans[1].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn caret_is_highlighted() {
        let content = DocSpan::new(0, 3);
        let line = render_line("abc", content, &DecorationSet::none(), Some(1));
        assert_eq!(line.spans[1].content, "b");
        assert!(line.spans[1].style.add_modifier.contains(Modifier::REVERSED));

        let at_end = render_line("abc", content, &DecorationSet::none(), Some(3));
        assert_eq!(plain(&at_end), "abc ");
    }

    #[test]
    fn hits_map_through_the_widget() {
        let text = "> $kgar tail";
        let content = DocSpan::new(0, text.len());
        let decorations = decorated(DocSpan::new(2, 7));

        assert_eq!(hit_test(text, content, &decorations, 1), Hit::Text { column: 1 });
        assert!(matches!(
            hit_test(text, content, &decorations, 3),
            Hit::Widget { column: 3, .. }
        ));
        // Six label characters over a five character span.
        assert!(matches!(
            hit_test(text, content, &decorations, 7),
            Hit::Widget { column: 6, .. }
        ));
        assert_eq!(hit_test(text, content, &decorations, 8), Hit::Text { column: 7 });
        assert_eq!(hit_test(text, content, &decorations, 50), Hit::Text { column: 12 });
    }
}
