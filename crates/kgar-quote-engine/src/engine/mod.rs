//! # Live Preview Decoration Engine
//!
//! Replaces the first line of a quote reading `$kgar` with a widget while
//! the document is shown in live preview.
//!
//! ```text
//! ViewUpdate ─► QuotePreview ─┬─ source mode ──────────────► DecorationSet::none()
//!                             └─ doc/viewport/selection ──► find_candidates
//!                                                              │  classify + selection guard
//!                                                              ▼
//!                                          CandidateRegion ─► QuoteWidget ─► DecorationSet
//! ```
//!
//! ## Modules
//!
//! - **`classify`**: quote detection and depth from host node labels
//! - **`selection`**: the inclusive selection overlap check
//! - **`trigger`**: normalisation and comparison against `$kgar`
//! - **`walker`**: per-visible-range tree walk and quote state machine
//! - **`widget`**: the replacement widget, its equality and event filter
//! - **`decorations`**: sorted, non-overlapping decoration sets
//! - **`controller`**: per-view recompute-or-clear decisions

pub mod classify;
pub mod controller;
pub mod decorations;
pub mod selection;
pub mod trigger;
pub mod walker;
pub mod widget;

pub use controller::{ControllerState, QuotePreview, ViewUpdate, render_decorations};
pub use decorations::{Decoration, DecorationSet};
pub use trigger::{TRIGGER, WIDGET_LABEL, matches_trigger};
pub use walker::{CandidateRegion, QuoteState, TraversalContext, find_candidates};
pub use widget::{PointerEvent, QuoteWidget, WidgetEvent};
