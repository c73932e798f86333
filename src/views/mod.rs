//! egui views drawn by the render thread.
//!
//! Views are pure functions of the latest snapshot: they read it, paint,
//! and push `EditorAction`s for the logic thread. No view ever mutates
//! editor state directly.

pub mod graph;
pub mod playback;
pub mod sidebar;
pub mod viewport;

use crate::input::events::ItemKind;

/// egui drag payload for managed items (dialogue lines, image items).
///
/// Only identity travels with the pointer; addresses are rebuilt from the
/// snapshot by whatever slot the pointer is over.
#[derive(Clone, Debug)]
pub struct DragPayload {
    pub kind: ItemKind,
    pub item_id: String,
}

/// egui drag payload for palette assets (not yet managed items).
#[derive(Clone, Debug)]
pub struct AssetPayload {
    pub url: String,
    pub name: String,
}
