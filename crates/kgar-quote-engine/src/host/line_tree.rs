use xi_rope::Rope;

use super::{BlockQuote, SyntaxNode, SyntaxTree};
use crate::rope::{Span, lines_with_spans};

/// Label of the root node.
pub const DOCUMENT: &str = "Document";
/// Label of a line that is not part of a blockquote.
pub const PLAIN_LINE: &str = "line";

/// A node of [`LineSyntaxTree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    name: String,
    span: Span,
    children: Vec<TreeNode>,
}

impl TreeNode {
    fn leaf(name: String, span: Span) -> Self {
        Self {
            name,
            span,
            children: vec![],
        }
    }

    pub fn children(&self) -> &[TreeNode] {
        &self.children
    }

    fn walk(&self, range: Span, enter: &mut dyn FnMut(&dyn SyntaxNode)) {
        if !self.span.touches(range) {
            return;
        }
        enter(self);
        for child in &self.children {
            child.walk(range, enter);
        }
    }
}

impl SyntaxNode for TreeNode {
    fn type_name(&self) -> &str {
        &self.name
    }

    fn span(&self) -> Span {
        self.span
    }

    fn first_child(&self) -> Option<Span> {
        self.children.first().map(|c| c.span)
    }

    fn last_child(&self) -> Option<Span> {
        self.children.last().map(|c| c.span)
    }
}

/// A shallow, line-oriented syntax tree in the shape live-preview markdown
/// editors expose: one node per line, quote lines labelled with their
/// nesting depth and split into a marker token and a content token.
///
/// ```text
/// Document
/// ├── HyperMD-quote_HyperMD-quote-1        "> $kgar"
/// │   ├── formatting_..._quote_quote-1     "> "
/// │   └── quote_quote-1                    "$kgar"
/// └── line                                 "plain"
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineSyntaxTree {
    root: TreeNode,
}

impl LineSyntaxTree {
    pub fn parse(rope: &Rope) -> Self {
        let mut lines = vec![];

        for lr in lines_with_spans(rope) {
            let content = lr.content_span();
            let prefix = BlockQuote::strip_prefixes(&lr.text);

            if prefix.depth == 0 {
                lines.push(TreeNode::leaf(PLAIN_LINE.to_string(), content));
                continue;
            }

            let split = content.start + prefix.len;
            let mut children = vec![TreeNode::leaf(
                BlockQuote::marker_token_name(prefix.depth),
                Span::new(content.start, split),
            )];
            if split < content.end {
                children.push(TreeNode::leaf(
                    BlockQuote::content_token_name(prefix.depth),
                    Span::new(split, content.end),
                ));
            }

            lines.push(TreeNode {
                name: BlockQuote::line_node_name(prefix.depth),
                span: content,
                children,
            });
        }

        Self {
            root: TreeNode {
                name: DOCUMENT.to_string(),
                span: Span::new(0, rope.len()),
                children: lines,
            },
        }
    }

    pub fn root(&self) -> &TreeNode {
        &self.root
    }
}

impl SyntaxTree for LineSyntaxTree {
    fn iterate(&self, range: Span, enter: &mut dyn FnMut(&dyn SyntaxNode)) {
        self.root.walk(range, enter);
    }
}
