use std::path::PathBuf;

use crate::models::scene::{LayerKind, SceneId};

/// Which kind of draggable item an address refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Dialogue,
    Image,
}

/// Full address of one slot in an ordered list.
///
/// `layer` is `Some` for image items and `None` for dialogue; the drag
/// state machine rejects addresses where that does not hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemAddress {
    pub scene_id: SceneId,
    pub layer: Option<LayerKind>,
    pub index: usize,
}

impl ItemAddress {
    pub fn dialogue(scene_id: &str, index: usize) -> Self {
        Self {
            scene_id: scene_id.to_string(),
            layer: None,
            index,
        }
    }

    pub fn image(scene_id: &str, layer: LayerKind, index: usize) -> Self {
        Self {
            scene_id: scene_id.to_string(),
            layer: Some(layer),
            index,
        }
    }

    /// Same ordered list, ignoring the index.
    pub fn same_collection(&self, other: &ItemAddress) -> bool {
        self.scene_id == other.scene_id && self.layer == other.layer
    }
}

/// Which collapsible part of a scene a section id names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionPart {
    Dialogue,
    Images,
    Layer(LayerKind),
}

/// Composite key for the sidebar's collapsible sections.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SectionId {
    pub scene_id: SceneId,
    pub part: SectionPart,
}

impl SectionId {
    pub fn dialogue(scene_id: &str) -> Self {
        Self {
            scene_id: scene_id.to_string(),
            part: SectionPart::Dialogue,
        }
    }

    pub fn images(scene_id: &str) -> Self {
        Self {
            scene_id: scene_id.to_string(),
            part: SectionPart::Images,
        }
    }

    pub fn layer(scene_id: &str, kind: LayerKind) -> Self {
        Self {
            scene_id: scene_id.to_string(),
            part: SectionPart::Layer(kind),
        }
    }
}

/// Normalized drag protocol: the UI reduces every widget-level gesture to
/// one of these, carrying nothing but addresses, so the transfer state
/// machine never sees the widget library.
#[derive(Debug, Clone, PartialEq)]
pub enum DragEvent {
    /// User picked up a concrete item.
    Pickup {
        kind: ItemKind,
        item_id: String,
        from: ItemAddress,
    },
    /// Pointer is over the slot of an existing item of the same kind.
    Hover { at: ItemAddress },
    /// Pointer entered a section's drop zone.
    EnterSection(SectionId),
    /// Pointer left a section's drop zone.
    LeaveSection(SectionId),
    /// Released over an item slot; the hovered position is final.
    Drop {
        copy: bool,
        section: Option<SectionId>,
    },
    /// Released over a container (section or layer body) rather than an
    /// item slot.
    DropOnContainer {
        scene_id: SceneId,
        layer: Option<LayerKind>,
        copy: bool,
        section: Option<SectionId>,
    },
    /// Released outside any valid target.
    Cancel,
}

/// Everything the render thread can ask of the logic thread.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorAction {
    // Project
    SetProjectName(String),
    NewProject,
    ImportProject(PathBuf),
    ExportProject(PathBuf),

    // Scenes
    AddScene { name: String },
    SelectScene(SceneId),

    // Dialogue
    AddDialogue {
        scene_id: SceneId,
        speaker: String,
        text: String,
    },
    UpsertDialogue {
        scene_id: SceneId,
        dialogue_id: String,
        speaker: String,
        text: String,
    },

    // Items
    DeleteItem {
        kind: ItemKind,
        scene_id: SceneId,
        item_id: String,
        layer: Option<LayerKind>,
    },
    MoveImage {
        scene_id: SceneId,
        layer: LayerKind,
        item_id: String,
        x: f32,
        y: f32,
    },
    /// Place an asset from the palette onto a layer.
    PlaceAsset {
        scene_id: SceneId,
        layer: LayerKind,
        url: String,
        name: String,
    },

    // Choices / graph
    AddChoice {
        scene_id: SceneId,
        label: String,
        next_scene_id: SceneId,
    },
    DeleteChoice {
        scene_id: SceneId,
        choice_id: String,
    },
    MoveNode {
        scene_id: SceneId,
        x: f32,
        y: f32,
    },
    ConnectNodes {
        from: SceneId,
        to: SceneId,
    },

    // Sections and drag
    ToggleSection(SectionId),
    Drag(DragEvent),

    // Assets
    IngestAsset { name: String, bytes: Vec<u8> },

    // Modes
    SetGraphMode(bool),
    EnterPreview,
    ExitPreview,
    PreviewAdvance,
    PreviewChoose(String),
}
