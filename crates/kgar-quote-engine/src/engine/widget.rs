use log::trace;

use super::trigger::WIDGET_LABEL;
use crate::dom::{Element, ElementKind, Node};
use crate::host::EditorView;

/// Pointer state shared by the pointer events a widget receives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub x: f32,
    pub y: f32,
    /// The "extend selection" modifier.
    pub shift: bool,
}

/// Interaction events the rendering layer forwards to a widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WidgetEvent {
    /// Primary button pressed.
    PointerDown(PointerEvent),
    PointerUp(PointerEvent),
    Click(PointerEvent),
    KeyDown,
    Focus,
}

/// Replacement rendered in place of a quote's `$kgar` line.
///
/// Two widgets are equal iff they were made from the same raw text, so the
/// rendering layer keeps the existing element when a rebuilt decoration set
/// carries an equal widget, even if its offsets moved.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuoteWidget {
    raw_text: String,
}

impl QuoteWidget {
    pub fn new(raw_text: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
        }
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    /// Plain-text form of the widget.
    pub fn label(&self) -> &'static str {
        WIDGET_LABEL
    }

    /// The element that replaces the span: `<span><strong>kgar 🌟</strong></span>`.
    pub fn to_dom(&self) -> Element {
        Element::new(
            ElementKind::Span,
            vec![Node::Element(Element::new(
                ElementKind::Strong,
                vec![Node::text(WIDGET_LABEL)],
            ))],
        )
    }

    /// Returns true when the editor should ignore `event`.
    ///
    /// The widget is inert to plain clicks. A shift+press places the caret
    /// at the pressed position and lets the editor handle the press, so the
    /// source under the widget can be reached deliberately.
    pub fn ignore_event(&self, event: &WidgetEvent, view: &mut dyn EditorView) -> bool {
        let WidgetEvent::PointerDown(pointer) = event else {
            return true;
        };
        if !pointer.shift {
            return true;
        }
        if let Some(pos) = view.pos_at_coords(pointer.x, pointer.y) {
            trace!("shift-press on widget, caret to {pos}");
            view.set_cursor(pos);
        }
        false
    }
}
