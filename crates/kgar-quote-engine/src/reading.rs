//! Reading-mode enhancement: a one-shot rewrite of rendered output.
//!
//! Unlike the live preview engine there is no selection and no state
//! machine. A quote whose first paragraph starts with a `$kgar` text line
//! gets that text swapped for the widget element.

use log::debug;

use crate::dom::{BlockClass, Element, Node, parse_markdown};
use crate::engine::{QuoteWidget, TRIGGER};

/// Enhances the quotes directly under `root` and the quotes nested directly
/// inside those, parents before children. Returns how many lines were
/// replaced.
pub fn enhance_quotes(root: &mut Element) -> usize {
    let mut replaced = 0;
    let mut pending: Vec<&mut Element> = quote_children(root);

    while let Some(quote) = pending.pop() {
        if enhance_first_line(quote) {
            replaced += 1;
        }
        pending.extend(quote_children(quote));
    }

    debug!("reading view: replaced {replaced} quote lines");
    replaced
}

/// Child quotes in reverse order, so popping visits them in document order.
fn quote_children(element: &mut Element) -> Vec<&mut Element> {
    element
        .children
        .iter_mut()
        .rev()
        .filter_map(Node::as_element_mut)
        .filter(|e| e.class() == BlockClass::Quote)
        .collect()
}

fn enhance_first_line(quote: &mut Element) -> bool {
    let Some(para) = quote.first_element_child_mut() else {
        return false;
    };
    if para.class() != BlockClass::Paragraph {
        return false;
    }
    let Some(first) = para.children.first_mut() else {
        return false;
    };
    let Node::Text(text) = first else {
        return false;
    };
    if text.trim().to_lowercase() != TRIGGER {
        return false;
    }
    *first = Node::Element(QuoteWidget::new(text.trim()).to_dom());
    true
}

/// Renders `source` to HTML with quote enhancement applied.
pub fn render_reading_view(source: &str) -> String {
    let mut root = parse_markdown(source);
    enhance_quotes(&mut root);
    root.to_html()
}
