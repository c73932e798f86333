//! Scene data model.
//!
//! A story is a flat map of scenes. Each scene owns three parallax layers
//! of image items, an ordered dialogue list, and the outgoing choices that
//! wire scenes together into a directed story graph.

use rand::Rng;
use rand::distr::Alphanumeric;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Stable scene identifier. Generated once, never reused.
pub type SceneId = String;

/// Top-level collection: scene id -> scene.
///
/// Map order is *not* the display order; the sidebar derives display order
/// from scene names (see [`display_order`]).
pub type SceneMap = BTreeMap<SceneId, Scene>;

/// Default logical width of a freshly created scene.
pub const DEFAULT_SCENE_WIDTH: f32 = 2000.0;

const ID_LEN: usize = 12;

/// Generates a fresh random alphanumeric id.
pub fn fresh_id() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(ID_LEN)
        .map(char::from)
        .collect()
}

/// The closed set of parallax layers every scene carries.
///
/// Layer identity is not freely assignable: there are exactly three kinds,
/// and their ordering (background first) is the compositing order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum LayerKind {
    #[serde(rename = "bg")]
    Background,
    #[serde(rename = "mid")]
    Mid,
    #[serde(rename = "fg")]
    Foreground,
}

impl LayerKind {
    /// All kinds in compositing order.
    pub const ALL: [LayerKind; 3] = [LayerKind::Background, LayerKind::Mid, LayerKind::Foreground];

    pub fn label(self) -> &'static str {
        match self {
            LayerKind::Background => "Background",
            LayerKind::Mid => "Mid",
            LayerKind::Foreground => "Foreground",
        }
    }

    /// Scroll multiplier used when the layer has no explicit factor.
    pub fn default_parallax(self) -> f32 {
        match self {
            LayerKind::Background => 0.5,
            LayerKind::Mid => 0.8,
            LayerKind::Foreground => 1.2,
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An image placed on a parallax layer.
///
/// Owned by exactly one layer of one scene at any instant; the mutation
/// operations in [`crate::state::store`] preserve that exclusivity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageItem {
    pub id: String,
    pub name: String,
    /// Literal path or an opaque `asset-…` reference resolved by the
    /// asset catalog.
    pub url: String,
    pub x: f32,
    pub y: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoom_factor: Option<f32>,
}

impl ImageItem {
    pub fn new(name: &str, url: &str) -> Self {
        Self {
            id: fresh_id(),
            name: name.to_string(),
            url: url.to_string(),
            x: 0.0,
            y: 0.0,
            zoom_factor: None,
        }
    }

    pub fn zoom(&self) -> f32 {
        self.zoom_factor.unwrap_or(1.0)
    }
}

/// One parallax depth of a scene, holding an ordered item list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    /// Serialized as `id` to stay readable next to the item ids.
    #[serde(rename = "id")]
    pub kind: LayerKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallax_factor: Option<f32>,
    #[serde(default)]
    pub items: Vec<ImageItem>,
}

impl Layer {
    pub fn new(kind: LayerKind) -> Self {
        Self {
            kind,
            name: None,
            parallax_factor: Some(kind.default_parallax()),
            items: Vec::new(),
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.kind.label())
    }

    pub fn parallax(&self) -> f32 {
        self.parallax_factor.unwrap_or(self.kind.default_parallax())
    }
}

/// One line of dialogue. Order within the owning scene is playback order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dialogue {
    pub id: String,
    pub speaker: String,
    pub text: String,
}

impl Dialogue {
    pub fn new(speaker: &str, text: &str) -> Self {
        Self {
            id: fresh_id(),
            speaker: speaker.to_string(),
            text: text.to_string(),
        }
    }
}

/// A labeled directed edge to another scene.
///
/// `next_scene_id` may dangle (point at a deleted or not-yet-imported
/// scene); the model permits it and the UI flags it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Choice {
    pub id: String,
    pub label: String,
    pub next_scene_id: SceneId,
}

/// A named unit of content: layers, dialogue and outgoing choices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub id: SceneId,
    pub name: String,
    #[serde(default = "default_width")]
    pub width: f32,
    #[serde(default)]
    pub layers: Vec<Layer>,
    #[serde(default)]
    pub dialogue: Vec<Dialogue>,
    #[serde(default)]
    pub choices: Vec<Choice>,
    /// Node position in the graph view, persisted with the scene.
    #[serde(default)]
    pub graph_x: f32,
    #[serde(default)]
    pub graph_y: f32,
}

fn default_width() -> f32 {
    DEFAULT_SCENE_WIDTH
}

impl Scene {
    pub fn new(name: &str) -> Self {
        let mut scene = Self {
            id: fresh_id(),
            name: name.to_string(),
            width: DEFAULT_SCENE_WIDTH,
            layers: Vec::new(),
            dialogue: Vec::new(),
            choices: Vec::new(),
            graph_x: 0.0,
            graph_y: 0.0,
        };
        scene.ensure_layers();
        scene
    }

    /// Adds any missing canonical layer and restores compositing order.
    ///
    /// Idempotent and order-stable: calling it on a scene that already has
    /// all three layers changes nothing.
    pub fn ensure_layers(&mut self) {
        for kind in LayerKind::ALL {
            if !self.layers.iter().any(|l| l.kind == kind) {
                self.layers.push(Layer::new(kind));
            }
        }
        self.layers.sort_by_key(|l| l.kind);
    }

    pub fn layer(&self, kind: LayerKind) -> Option<&Layer> {
        self.layers.iter().find(|l| l.kind == kind)
    }

    pub fn layer_mut(&mut self, kind: LayerKind) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.kind == kind)
    }
}

/// Scene ids sorted for the sidebar: by case-folded name, then id as the
/// tiebreaker so equal names keep a stable order.
pub fn display_order(scenes: &SceneMap) -> Vec<SceneId> {
    let mut ids: Vec<&Scene> = scenes.values().collect();
    ids.sort_by(|a, b| {
        (a.name.to_lowercase(), &a.id).cmp(&(b.name.to_lowercase(), &b.id))
    });
    ids.into_iter().map(|s| s.id.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_id_shape() {
        let id = fresh_id();
        assert_eq!(id.len(), 12);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(fresh_id(), fresh_id());
    }

    #[test]
    fn test_ensure_layers_is_idempotent_and_ordered() {
        let mut scene = Scene {
            id: "s1".into(),
            name: "Test".into(),
            width: DEFAULT_SCENE_WIDTH,
            // Deliberately partial and out of order.
            layers: vec![Layer::new(LayerKind::Foreground)],
            dialogue: Vec::new(),
            choices: Vec::new(),
            graph_x: 0.0,
            graph_y: 0.0,
        };
        scene.ensure_layers();
        let kinds: Vec<LayerKind> = scene.layers.iter().map(|l| l.kind).collect();
        assert_eq!(kinds, LayerKind::ALL.to_vec());

        let before = scene.clone();
        scene.ensure_layers();
        assert_eq!(scene, before);
    }

    #[test]
    fn test_display_order_sorts_by_name_then_id() {
        let mut scenes = SceneMap::new();
        for (id, name) in [("b", "Ruins"), ("a", "forest"), ("c", "Forest")] {
            let mut scene = Scene::new(name);
            scene.id = id.to_string();
            scenes.insert(id.to_string(), scene);
        }
        assert_eq!(display_order(&scenes), vec!["a", "c", "b"]);
    }
}
