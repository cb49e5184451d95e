use crate::host::Selection;

/// True iff any selected range touches `[range_from, range_to]`.
///
/// Both ends are inclusive: a caret sitting right at either edge counts as
/// overlapping, so text next to the caret is never replaced.
pub fn overlaps(selection: &Selection, range_from: usize, range_to: usize) -> bool {
    selection
        .ranges()
        .iter()
        .any(|r| r.from <= range_to && r.to >= range_from)
}
