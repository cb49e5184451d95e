use log::debug;
use relative_path::RelativePath;

use super::decorations::DecorationSet;
use super::walker::find_candidates;
use crate::host::{EditorView, UpdateFlags};

/// A notification from the host that something in the view changed.
pub struct ViewUpdate<'a> {
    pub view: &'a dyn EditorView,
    /// The document the view is showing, if the host has one open.
    pub active_file: Option<&'a RelativePath>,
    pub flags: UpdateFlags,
}

/// Whether the controller is currently decorating its view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Active,
    Inactive,
}

/// Walks the view and builds a fresh decoration set.
pub fn render_decorations(
    view: &dyn EditorView,
    active_file: Option<&RelativePath>,
) -> DecorationSet {
    find_candidates(view, active_file).into_iter().collect()
}

/// Per-view decoration state.
///
/// Created when a view mounts the engine and dropped with the view. The
/// decoration set is always replaced wholesale, never patched.
#[derive(Debug, Clone)]
pub struct QuotePreview {
    decorations: DecorationSet,
    state: ControllerState,
}

impl QuotePreview {
    /// Mounts on `view`, decorating it right away unless it is in source
    /// mode.
    pub fn new(view: &dyn EditorView, active_file: Option<&RelativePath>) -> Self {
        let decorations = if view.is_live_preview() {
            render_decorations(view, active_file)
        } else {
            DecorationSet::none()
        };
        let state = if decorations.is_empty() {
            ControllerState::Inactive
        } else {
            ControllerState::Active
        };
        debug!("mounted with {} decorations", decorations.len());
        Self { decorations, state }
    }

    pub fn decorations(&self) -> &DecorationSet {
        &self.decorations
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Source mode clears everything. In live preview, a document,
    /// viewport or selection change triggers a full rebuild; any other
    /// notification leaves the current set in place.
    pub fn update(&mut self, update: &ViewUpdate<'_>) {
        if !update.view.is_live_preview() {
            if self.state == ControllerState::Active || !self.decorations.is_empty() {
                debug!("source mode, clearing decorations");
            }
            self.state = ControllerState::Inactive;
            self.decorations = DecorationSet::none();
            return;
        }

        if !update.flags.any() {
            return;
        }

        self.decorations = render_decorations(update.view, update.active_file);
        self.state = ControllerState::Active;
        debug!(
            "rebuilt {} decorations ({:?})",
            self.decorations.len(),
            update.flags
        );
    }
}
