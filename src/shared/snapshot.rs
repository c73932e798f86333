//! Render snapshots for inter-thread communication.
//!
//! Snapshots are immutable captures of editor state sent from the logic
//! thread to the render thread; the UI only ever draws these, never the
//! live store.

use std::collections::HashSet;
use std::sync::Arc;

use crate::input::events::{ItemKind, SectionId};
use crate::models::assets::AssetCatalog;
use crate::models::graph::StoryGraph;
use crate::models::scene::{Scene, SceneId, SceneMap};

/// High-level render state for the current editor mode.
#[derive(Clone, Debug)]
pub enum RenderState {
    /// Initial empty state, before the logic thread's first snapshot.
    Empty,
    /// The editing surface (sidebar + viewport or graph).
    Editor(EditorSnapshot),
    /// Playable story preview.
    Preview(PreviewSnapshot),
}

/// What the drag currently holds, for overlay/styling only. The state
/// machine itself stays on the logic thread.
#[derive(Clone, Debug)]
pub struct DragSnapshot {
    pub kind: ItemKind,
    pub item_id: String,
}

#[derive(Clone, Debug)]
pub struct EditorSnapshot {
    pub project_name: String,
    pub scenes: SceneMap,
    /// Scene ids in sidebar order.
    pub display_order: Vec<SceneId>,
    pub selected_scene: Option<SceneId>,
    pub graph_mode: bool,
    pub graph: StoryGraph,
    pub open_sections: HashSet<SectionId>,
    pub drag: Option<DragSnapshot>,
    /// Shared, not cloned: asset bytes are large.
    pub assets: Arc<AssetCatalog>,
    pub speakers: Vec<String>,
    pub status: Option<String>,
}

#[derive(Clone, Debug)]
pub struct PreviewSnapshot {
    pub scene: Scene,
    /// Current dialogue line, or the scene's choices once past the end.
    pub line: usize,
    pub at_choices: bool,
    pub assets: Arc<AssetCatalog>,
}
