/// Blockquote line syntax: the `>` prefix and the node labels the host
/// parser gives quote lines.
///
/// All blockquote-related syntax knowledge of the reference host lives here.
pub struct BlockQuote;

/// Result of stripping blockquote prefixes from one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotePrefix {
    /// Number of `>` prefixes found (0 if not a blockquote line).
    pub depth: u8,
    /// Byte length of the prefix run, trailing space included.
    pub len: usize,
}

impl BlockQuote {
    /// The blockquote prefix character.
    pub const PREFIX: char = '>';

    /// Strips blockquote prefixes from a line.
    ///
    /// Handles `> text`, `>> nested` and `> > spaced nested`; up to three
    /// spaces of indentation are allowed before each `>`.
    pub fn strip_prefixes(s: &str) -> QuotePrefix {
        let b = s.as_bytes();
        let mut i = 0usize;
        let mut depth = 0u8;

        loop {
            let mut j = i;
            while j < b.len() && j - i < 3 && b[j] == b' ' {
                j += 1;
            }
            if j < b.len() && b[j] == (Self::PREFIX as u8) {
                depth = depth.saturating_add(1);
                i = j + 1;
                if i < b.len() && b[i] == b' ' {
                    i += 1;
                }
            } else {
                break;
            }
        }
        QuotePrefix { depth, len: i }
    }

    /// Label of a quote line node at `depth`.
    pub fn line_node_name(depth: u8) -> String {
        format!("HyperMD-quote_HyperMD-quote-{depth}")
    }

    /// Label of the `> ` marker token at `depth`.
    pub fn marker_token_name(depth: u8) -> String {
        format!("formatting_formatting-quote_formatting-quote-{depth}_quote_quote-{depth}")
    }

    /// Label of the quoted content token at `depth`.
    pub fn content_token_name(depth: u8) -> String {
        format!("quote_quote-{depth}")
    }
}
