//! Application mode enum for the editor state machine.

use crate::state::preview::PreviewState;

/// High-level modes driven by `GlobalState`.
pub(super) enum AppMode {
    /// Scene editing: sidebar plus parallax viewport.
    Edit,
    /// Scene editing with the story graph as the main surface.
    Graph,
    /// Playable walk through the story.
    Preview(PreviewState),
}
