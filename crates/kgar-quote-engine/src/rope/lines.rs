use xi_rope::Rope;

use super::span::Span;

/// A reference to a single line in the rope with its byte span.
#[derive(Debug, Clone)]
pub struct LineRef {
    /// Byte span of this line in the rope, newline included if present.
    pub span: Span,
    /// Line text with the trailing `\n` / `\r\n` removed.
    pub text: String,
}

impl LineRef {
    /// Span of the line content, newline excluded.
    pub fn content_span(&self) -> Span {
        Span::new(self.span.start, self.span.start + self.text.len())
    }
}

/// Returns an iterator over lines with their byte spans.
///
/// Uses `lines_raw` so spans include line endings and stay contiguous.
pub fn lines_with_spans(rope: &Rope) -> impl Iterator<Item = LineRef> + '_ {
    let mut offset = 0usize;
    rope.lines_raw(..).map(move |line| {
        let start = offset;
        offset += line.len();
        LineRef {
            span: Span { start, end: offset },
            text: line.trim_end_matches(['\r', '\n']).to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn spans_are_contiguous_and_cover_the_rope() {
        let rope = Rope::from("> a\n\nb\r\nc");
        let lines: Vec<_> = lines_with_spans(&rope).collect();

        let spans: Vec<_> = lines.iter().map(|l| l.span).collect();
        assert_eq!(
            spans,
            vec![
                Span::new(0, 4),
                Span::new(4, 5),
                Span::new(5, 8),
                Span::new(8, 9)
            ]
        );
        assert_eq!(lines[2].text, "b");
        assert_eq!(lines[2].content_span(), Span::new(5, 6));
    }

    #[test]
    fn empty_rope_has_no_lines() {
        let rope = Rope::from("");
        assert_eq!(lines_with_spans(&rope).count(), 0);
    }
}
