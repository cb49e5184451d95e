//! A small element tree for reading-mode rendering.
//!
//! Reading mode works on rendered output rather than on source lines, so
//! markdown is turned into [`Element`]s with `pulldown-cmark` and serialised
//! back to HTML once enhanced.

use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};

/// Coarse classification of an element, for code that only cares whether
/// it's looking at a paragraph, a quote, or something else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockClass {
    Paragraph,
    Quote,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
    BlockQuote,
    Paragraph,
    Span,
    Strong,
    /// Any other element, by tag name.
    Other(String),
}

impl ElementKind {
    pub fn class(&self) -> BlockClass {
        match self {
            ElementKind::BlockQuote => BlockClass::Quote,
            ElementKind::Paragraph => BlockClass::Paragraph,
            _ => BlockClass::Other,
        }
    }

    pub fn tag_name(&self) -> &str {
        match self {
            ElementKind::BlockQuote => "blockquote",
            ElementKind::Paragraph => "p",
            ElementKind::Span => "span",
            ElementKind::Strong => "strong",
            ElementKind::Other(name) => name,
        }
    }

    fn other(name: &str) -> Self {
        ElementKind::Other(name.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub kind: ElementKind,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(kind: ElementKind, children: Vec<Node>) -> Self {
        Self { kind, children }
    }

    pub fn class(&self) -> BlockClass {
        self.kind.class()
    }

    /// First child that is an element, skipping text nodes.
    pub fn first_element_child(&self) -> Option<&Element> {
        self.children.iter().find_map(Node::as_element)
    }

    pub fn first_element_child_mut(&mut self) -> Option<&mut Element> {
        self.children.iter_mut().find_map(Node::as_element_mut)
    }

    /// Concatenated text of this element and its descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        let mut stack: Vec<&Node> = self.children.iter().rev().collect();
        while let Some(node) = stack.pop() {
            match node {
                Node::Text(t) => out.push_str(t),
                Node::Element(e) => stack.extend(e.children.iter().rev()),
            }
        }
        out
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        let tag = self.kind.tag_name();
        out.push('<');
        out.push_str(tag);
        out.push('>');
        for child in &self.children {
            match child {
                Node::Text(t) => out.push_str(&html_escape::encode_text(t)),
                Node::Element(e) => e.write_html(out),
            }
        }
        out.push_str("</");
        out.push_str(tag);
        out.push('>');
    }

    fn push_text(&mut self, text: &str) {
        if let Some(Node::Text(last)) = self.children.last_mut() {
            last.push_str(text);
        } else {
            self.children.push(Node::text(text));
        }
    }
}

fn kind_for(tag: &Tag<'_>) -> ElementKind {
    match tag {
        Tag::BlockQuote(_) => ElementKind::BlockQuote,
        Tag::Paragraph => ElementKind::Paragraph,
        Tag::Strong => ElementKind::Strong,
        Tag::Emphasis => ElementKind::other("em"),
        Tag::Strikethrough => ElementKind::other("del"),
        Tag::Heading { level, .. } => ElementKind::other(match level {
            HeadingLevel::H1 => "h1",
            HeadingLevel::H2 => "h2",
            HeadingLevel::H3 => "h3",
            HeadingLevel::H4 => "h4",
            HeadingLevel::H5 => "h5",
            HeadingLevel::H6 => "h6",
        }),
        Tag::List(Some(_)) => ElementKind::other("ol"),
        Tag::List(None) => ElementKind::other("ul"),
        Tag::Item => ElementKind::other("li"),
        Tag::CodeBlock(_) => ElementKind::other("pre"),
        Tag::Link { .. } => ElementKind::other("a"),
        _ => ElementKind::other("div"),
    }
}

/// Renders markdown into an element tree rooted at a `div`.
pub fn parse_markdown(source: &str) -> Element {
    let mut stack = vec![Element::new(ElementKind::other("div"), vec![])];

    for event in Parser::new(source) {
        match event {
            Event::Start(tag) => stack.push(Element::new(kind_for(&tag), vec![])),
            Event::End(end) => {
                // Images carry alt text as children; the root is never popped.
                if stack.len() > 1
                    && let Some(done) = stack.pop()
                    && let Some(parent) = stack.last_mut()
                    && !matches!(end, TagEnd::Image)
                {
                    parent.children.push(Node::Element(done));
                }
            }
            Event::Text(text) | Event::Html(text) | Event::InlineHtml(text) => {
                if let Some(top) = stack.last_mut() {
                    top.push_text(&text);
                }
            }
            Event::Code(code) => {
                if let Some(top) = stack.last_mut() {
                    top.children.push(Node::Element(Element::new(
                        ElementKind::other("code"),
                        vec![Node::text(&*code)],
                    )));
                }
            }
            // Soft breaks render as line breaks, as in the note app's
            // reading view, so a paragraph's first text node is its first line.
            Event::SoftBreak | Event::HardBreak => {
                if let Some(top) = stack.last_mut() {
                    top.children
                        .push(Node::Element(Element::new(ElementKind::other("br"), vec![])));
                }
            }
            Event::Rule => {
                if let Some(top) = stack.last_mut() {
                    top.children
                        .push(Node::Element(Element::new(ElementKind::other("hr"), vec![])));
                }
            }
            _ => {}
        }
    }

    // Fold anything still open into its parent.
    while stack.len() > 1 {
        if let Some(done) = stack.pop()
            && let Some(parent) = stack.last_mut()
        {
            parent.children.push(Node::Element(done));
        }
    }
    stack.pop().unwrap_or_else(|| Element::new(ElementKind::other("div"), vec![]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn quote_with_paragraph() {
        let root = parse_markdown("> $kgar\n> more\n");
        let quote = root.first_element_child().unwrap();
        assert_eq!(quote.class(), BlockClass::Quote);
        let para = quote.first_element_child().unwrap();
        assert_eq!(para.class(), BlockClass::Paragraph);
        assert_eq!(
            para.children,
            vec![
                Node::text("$kgar"),
                Node::Element(Element::new(ElementKind::other("br"), vec![])),
                Node::text("more"),
            ]
        );
    }

    #[test]
    fn nested_quotes_nest_elements() {
        let root = parse_markdown("> outer\n>\n> > inner\n");
        let outer = root.first_element_child().unwrap();
        let kinds: Vec<_> = outer
            .children
            .iter()
            .filter_map(Node::as_element)
            .map(|e| e.class())
            .collect();
        assert_eq!(kinds, vec![BlockClass::Paragraph, BlockClass::Quote]);
    }

    #[test]
    fn html_escapes_text() {
        let root = parse_markdown("a < b & c\n");
        insta::assert_snapshot!(root.to_html(), @"<div><p>a &lt; b &amp; c</p></div>");
    }

    #[test]
    fn text_content_flattens_descendants() {
        let root = parse_markdown("# Title\n\nsome **bold** text\n");
        assert_eq!(root.text_content(), "Titlesome bold text");
    }

    #[test]
    fn class_of_other_elements() {
        assert_eq!(ElementKind::Span.class(), BlockClass::Other);
        assert_eq!(ElementKind::other("li").tag_name(), "li");
    }
}
