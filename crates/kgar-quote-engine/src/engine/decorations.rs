use std::sync::Arc;

use log::debug;

use super::walker::CandidateRegion;
use super::widget::QuoteWidget;
use crate::rope::Span;

/// Replace `span` with `widget`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoration {
    pub span: Span,
    pub widget: QuoteWidget,
    /// Whether text typed at the edges extends the decoration.
    pub inclusive: bool,
    /// Whether the widget is laid out as a block rather than inline.
    pub block: bool,
}

impl Decoration {
    /// An inline, non-inclusive replacement.
    pub fn replace(span: Span, widget: QuoteWidget) -> Self {
        Self {
            span,
            widget,
            inclusive: false,
            block: false,
        }
    }
}

/// Immutable, offset-sorted, non-overlapping decorations for one view.
///
/// Cloning shares the underlying storage; [`DecorationSet::ptr_eq`] tells
/// whether two handles are the same build.
#[derive(Debug, Clone)]
pub struct DecorationSet {
    decorations: Arc<[Decoration]>,
}

impl DecorationSet {
    /// The explicit empty set.
    pub fn none() -> Self {
        Self {
            decorations: Arc::from(Vec::new()),
        }
    }

    /// Builds a set from decorations in any order.
    ///
    /// Decorations are sorted by span. One that starts before the previous
    /// one ends is dropped, keeping the earlier decoration.
    pub fn build(mut decorations: Vec<Decoration>) -> Self {
        decorations.sort_by_key(|d| (d.span.start, d.span.end));

        let mut kept: Vec<Decoration> = Vec::with_capacity(decorations.len());
        for decoration in decorations {
            if let Some(last) = kept.last()
                && decoration.span.start < last.span.end
            {
                debug!(
                    "dropping decoration at {:?}, overlaps {:?}",
                    decoration.span, last.span
                );
                continue;
            }
            kept.push(decoration);
        }

        Self {
            decorations: Arc::from(kept),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Decoration> {
        self.decorations.iter()
    }

    pub fn len(&self) -> usize {
        self.decorations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decorations.is_empty()
    }

    pub fn spans(&self) -> Vec<Span> {
        self.decorations.iter().map(|d| d.span).collect()
    }

    /// The decoration covering `offset`, if any.
    pub fn at(&self, offset: usize) -> Option<&Decoration> {
        let idx = self
            .decorations
            .partition_point(|d| d.span.end <= offset);
        self.decorations
            .get(idx)
            .filter(|d| d.span.start <= offset)
    }

    /// True when both handles share the same storage.
    pub fn ptr_eq(&self, other: &DecorationSet) -> bool {
        Arc::ptr_eq(&self.decorations, &other.decorations)
    }
}

impl FromIterator<CandidateRegion> for DecorationSet {
    fn from_iter<I: IntoIterator<Item = CandidateRegion>>(iter: I) -> Self {
        Self::build(
            iter.into_iter()
                .map(|c| Decoration::replace(c.span, QuoteWidget::new(c.raw_text)))
                .collect(),
        )
    }
}

impl Default for DecorationSet {
    fn default() -> Self {
        Self::none()
    }
}

/// Content equality: same spans with equal widgets.
impl PartialEq for DecorationSet {
    fn eq(&self, other: &Self) -> bool {
        self.decorations == other.decorations
    }
}

impl Eq for DecorationSet {}

impl<'a> IntoIterator for &'a DecorationSet {
    type Item = &'a Decoration;
    type IntoIter = std::slice::Iter<'a, Decoration>;

    fn into_iter(self) -> Self::IntoIter {
        self.decorations.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn deco(start: usize, end: usize) -> Decoration {
        Decoration::replace(Span::new(start, end), QuoteWidget::new("$kgar"))
    }

    #[test]
    fn empty_set_is_a_value() {
        let set = DecorationSet::none();
        assert!(set.is_empty());
        assert_eq!(set, DecorationSet::build(vec![]));
    }

    #[test]
    fn build_sorts_by_offset() {
        let set = DecorationSet::build(vec![deco(20, 25), deco(2, 7)]);
        assert_eq!(set.spans(), vec![Span::new(2, 7), Span::new(20, 25)]);
    }

    #[test]
    fn overlapping_decorations_keep_the_first() {
        let set = DecorationSet::build(vec![deco(2, 7), deco(5, 9), deco(7, 10)]);
        assert_eq!(set.spans(), vec![Span::new(2, 7), Span::new(7, 10)]);
    }

    #[test]
    fn replace_is_inline_and_non_inclusive() {
        let d = deco(0, 1);
        assert!(!d.inclusive);
        assert!(!d.block);
    }

    #[test]
    fn lookup_by_offset() {
        let set = DecorationSet::build(vec![deco(2, 7), deco(20, 25)]);
        assert_eq!(set.at(2).map(|d| d.span), Some(Span::new(2, 7)));
        assert_eq!(set.at(6).map(|d| d.span), Some(Span::new(2, 7)));
        assert_eq!(set.at(7), None);
        assert_eq!(set.at(21).map(|d| d.span), Some(Span::new(20, 25)));
        assert_eq!(set.at(30), None);
    }

    #[test]
    fn collects_from_candidates() {
        let set: DecorationSet = vec![CandidateRegion {
            span: Span::new(2, 7),
            raw_text: "$KGAR".to_string(),
        }]
        .into_iter()
        .collect();
        let only = set.iter().next().unwrap();
        assert_eq!(only.span, Span::new(2, 7));
        assert_eq!(only.widget.raw_text(), "$KGAR");
    }

    #[test]
    fn clones_share_storage() {
        let set = DecorationSet::build(vec![deco(2, 7)]);
        let rebuilt = DecorationSet::build(vec![deco(2, 7)]);
        assert!(set.ptr_eq(&set.clone()));
        assert!(!set.ptr_eq(&rebuilt));
        assert_eq!(set, rebuilt);
    }
}
