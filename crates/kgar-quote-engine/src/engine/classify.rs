//! Quote depth classification from host node labels.
//!
//! The host parser labels one node per quote line and suffixes the nesting
//! level onto the label: `HyperMD-quote_HyperMD-quote-2` is a depth-2 line.

/// Substring that marks a quote-block construct in a node label.
pub const QUOTE_MARKER: &str = "quote_";
/// Substring that marks pure formatting tokens such as the `>` prefixes.
pub const FORMATTING_MARKER: &str = "formatting";
/// Separator before the numeric depth suffix.
pub const DEPTH_SEPARATOR: char = '-';

pub fn is_quote_block(type_name: &str) -> bool {
    type_name.contains(QUOTE_MARKER)
}

pub fn is_formatting(type_name: &str) -> bool {
    type_name.contains(FORMATTING_MARKER)
}

/// Parses the nesting depth from the text after the last `-` in the label.
///
/// Labels without a separator, or whose suffix isn't a number, have depth 0.
pub fn quote_depth(type_name: &str) -> u32 {
    let suffix = match type_name.rfind(DEPTH_SEPARATOR) {
        Some(i) => &type_name[i + DEPTH_SEPARATOR.len_utf8()..],
        None => type_name,
    };
    suffix.trim().parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("HyperMD-quote_HyperMD-quote-1", true)]
    #[case("quote_quote-3", true)]
    #[case("HyperMD-codeblock", false)]
    #[case("Document", false)]
    #[case("quote", false)]
    fn quote_block_detection(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(is_quote_block(name), expected);
    }

    #[rstest]
    #[case("HyperMD-quote_HyperMD-quote-1", 1)]
    #[case("HyperMD-quote_HyperMD-quote-12", 12)]
    #[case("quote_quote-x", 0)]
    #[case("quote_quote-", 0)]
    #[case("7", 7)]
    #[case("Document", 0)]
    #[case("quote_quote-999", 999)]
    #[case("quote_quote-99999999999", 0)]
    fn depth_from_suffix(#[case] name: &str, #[case] expected: u32) {
        assert_eq!(quote_depth(name), expected);
    }

    #[test]
    fn formatting_tokens_are_recognised() {
        assert!(is_formatting(
            "formatting_formatting-quote_formatting-quote-1_quote_quote-1"
        ));
        assert!(!is_formatting("quote_quote-1"));
    }
}
