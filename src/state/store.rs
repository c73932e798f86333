//! The story store: every mutation of the scene collection goes through
//! this service object.
//!
//! Each operation validates its full source/target address up front and is
//! a silent no-op on any miss, so an in-flight drag can always reach a
//! clean terminal state. The store also owns the single snapshot slot that
//! makes drag gestures atomic: capture on pickup, restore on cancel,
//! discard on commit.

use crate::input::events::ItemKind;
use crate::models::scene::{
    Choice, Dialogue, ImageItem, LayerKind, Scene, SceneId, SceneMap, fresh_id,
};

pub struct StoryStore {
    scenes: SceneMap,
    snapshot: Option<SceneMap>,
}

impl StoryStore {
    pub fn new(mut scenes: SceneMap) -> Self {
        for scene in scenes.values_mut() {
            scene.ensure_layers();
        }
        Self {
            scenes,
            snapshot: None,
        }
    }

    pub fn scenes(&self) -> &SceneMap {
        &self.scenes
    }

    pub fn scene(&self, id: &str) -> Option<&Scene> {
        self.scenes.get(id)
    }

    /// Swaps in a freshly imported collection, dropping any snapshot.
    pub fn replace(&mut self, scenes: SceneMap) {
        self.scenes = scenes;
        self.snapshot = None;
    }

    // ------------------------------------------------------------------
    // Snapshot slot
    // ------------------------------------------------------------------

    /// Deep-copies the whole collection into the slot. An outstanding
    /// snapshot is silently overwritten; nested drags are unsupported.
    pub fn create_snapshot(&mut self) {
        self.snapshot = Some(self.scenes.clone());
    }

    /// Replaces the live collection with the slot content. No-op when the
    /// slot is empty.
    pub fn restore_snapshot(&mut self) {
        if let Some(scenes) = self.snapshot.take() {
            self.scenes = scenes;
        }
    }

    /// Discards the slot without applying it.
    pub fn clear_snapshot(&mut self) {
        self.snapshot = None;
    }

    pub fn has_snapshot(&self) -> bool {
        self.snapshot.is_some()
    }

    // ------------------------------------------------------------------
    // Scenes
    // ------------------------------------------------------------------

    /// Creates a scene with structural defaults and returns its id.
    pub fn add_scene(&mut self, name: &str) -> SceneId {
        let scene = Scene::new(name);
        let id = scene.id.clone();
        self.scenes.insert(id.clone(), scene);
        id
    }

    pub fn set_graph_position(&mut self, scene_id: &str, x: f32, y: f32) {
        if let Some(scene) = self.scenes.get_mut(scene_id) {
            scene.graph_x = x;
            scene.graph_y = y;
        }
    }

    // ------------------------------------------------------------------
    // Item transfer
    // ------------------------------------------------------------------

    /// Moves one item between ordered lists.
    ///
    /// `target_index` is clamped to the target list; an empty target list
    /// appends regardless of the requested index. A move whose source and
    /// target address are identical (same scene, same layer, item already
    /// at the requested index) is a true no-op: hover retriggers during a
    /// drag must not thrash the list.
    #[allow(clippy::too_many_arguments)]
    pub fn move_item(
        &mut self,
        kind: ItemKind,
        source_scene: &str,
        target_scene: &str,
        item_id: &str,
        target_index: usize,
        source_layer: Option<LayerKind>,
        target_layer: Option<LayerKind>,
    ) {
        match kind {
            ItemKind::Dialogue => {
                let Some(source_index) = self
                    .scenes
                    .get(source_scene)
                    .and_then(|s| s.dialogue.iter().position(|d| d.id == item_id))
                else {
                    return;
                };
                if !self.scenes.contains_key(target_scene) {
                    return;
                }
                if source_scene == target_scene && source_index == target_index {
                    return;
                }

                let Some(item) = self
                    .scenes
                    .get_mut(source_scene)
                    .map(|s| s.dialogue.remove(source_index))
                else {
                    return;
                };
                let Some(target) = self.scenes.get_mut(target_scene) else {
                    return;
                };
                insert_clamped(&mut target.dialogue, target_index, item);
            }
            ItemKind::Image => {
                let (Some(src_kind), Some(dst_kind)) = (source_layer, target_layer) else {
                    return;
                };
                let Some(source_index) = self
                    .scenes
                    .get(source_scene)
                    .and_then(|s| s.layer(src_kind))
                    .and_then(|l| l.items.iter().position(|i| i.id == item_id))
                else {
                    return;
                };
                if self
                    .scenes
                    .get(target_scene)
                    .and_then(|s| s.layer(dst_kind))
                    .is_none()
                {
                    return;
                }
                if source_scene == target_scene
                    && src_kind == dst_kind
                    && source_index == target_index
                {
                    return;
                }

                let Some(item) = self
                    .scenes
                    .get_mut(source_scene)
                    .and_then(|s| s.layer_mut(src_kind))
                    .map(|l| l.items.remove(source_index))
                else {
                    return;
                };
                let Some(layer) = self
                    .scenes
                    .get_mut(target_scene)
                    .and_then(|s| s.layer_mut(dst_kind))
                else {
                    return;
                };
                insert_clamped(&mut layer.items, target_index, item);
            }
        }
    }

    /// Clones an item into the target list under a fresh collection-unique
    /// id, leaving the source untouched. Indexing policy as [`move_item`].
    #[allow(clippy::too_many_arguments)]
    pub fn copy_item(
        &mut self,
        kind: ItemKind,
        source_scene: &str,
        target_scene: &str,
        item_id: &str,
        target_index: usize,
        source_layer: Option<LayerKind>,
        target_layer: Option<LayerKind>,
    ) {
        match kind {
            ItemKind::Dialogue => {
                let Some(source) = self
                    .scenes
                    .get(source_scene)
                    .and_then(|s| s.dialogue.iter().find(|d| d.id == item_id))
                else {
                    return;
                };
                let mut clone = source.clone();
                clone.id = self.unique_id();
                let Some(target) = self.scenes.get_mut(target_scene) else {
                    return;
                };
                insert_clamped(&mut target.dialogue, target_index, clone);
            }
            ItemKind::Image => {
                let (Some(src_kind), Some(dst_kind)) = (source_layer, target_layer) else {
                    return;
                };
                let Some(source) = self
                    .scenes
                    .get(source_scene)
                    .and_then(|s| s.layer(src_kind))
                    .and_then(|l| l.items.iter().find(|i| i.id == item_id))
                else {
                    return;
                };
                let mut clone = source.clone();
                clone.id = self.unique_id();
                let Some(layer) = self
                    .scenes
                    .get_mut(target_scene)
                    .and_then(|s| s.layer_mut(dst_kind))
                else {
                    return;
                };
                insert_clamped(&mut layer.items, target_index, clone);
            }
        }
    }

    /// Moves the element at `old_index` to `new_index` within one list.
    pub fn reorder_item(
        &mut self,
        kind: ItemKind,
        scene_id: &str,
        old_index: usize,
        new_index: usize,
        layer: Option<LayerKind>,
    ) {
        if old_index == new_index {
            return;
        }
        match kind {
            ItemKind::Dialogue => {
                let Some(list) = self.scenes.get_mut(scene_id).map(|s| &mut s.dialogue) else {
                    return;
                };
                reinsert(list, old_index, new_index);
            }
            ItemKind::Image => {
                let Some(kind) = layer else { return };
                let Some(list) = self
                    .scenes
                    .get_mut(scene_id)
                    .and_then(|s| s.layer_mut(kind))
                    .map(|l| &mut l.items)
                else {
                    return;
                };
                reinsert(list, old_index, new_index);
            }
        }
    }

    pub fn delete_item(
        &mut self,
        kind: ItemKind,
        scene_id: &str,
        item_id: &str,
        layer: Option<LayerKind>,
    ) {
        match kind {
            ItemKind::Dialogue => {
                if let Some(scene) = self.scenes.get_mut(scene_id) {
                    scene.dialogue.retain(|d| d.id != item_id);
                }
            }
            ItemKind::Image => {
                let Some(kind) = layer else { return };
                if let Some(layer) = self
                    .scenes
                    .get_mut(scene_id)
                    .and_then(|s| s.layer_mut(kind))
                {
                    layer.items.retain(|i| i.id != item_id);
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Insertion and edits
    // ------------------------------------------------------------------

    /// Appends an image item to a layer; assigns a fresh id when the
    /// caller left it empty.
    pub fn add_image(&mut self, scene_id: &str, kind: LayerKind, mut item: ImageItem) {
        if item.url.is_empty() {
            return;
        }
        if item.id.is_empty() {
            item.id = self.unique_id();
        }
        if let Some(layer) = self
            .scenes
            .get_mut(scene_id)
            .and_then(|s| s.layer_mut(kind))
        {
            layer.items.push(item);
        }
    }

    /// Appends a dialogue line and returns its id.
    pub fn add_dialogue(&mut self, scene_id: &str, speaker: &str, text: &str) -> Option<String> {
        let line = Dialogue {
            id: self.unique_id(),
            speaker: speaker.to_string(),
            text: text.to_string(),
        };
        let id = line.id.clone();
        let scene = self.scenes.get_mut(scene_id)?;
        scene.dialogue.push(line);
        Some(id)
    }

    /// Updates a line in place, or appends it when the id is new.
    pub fn upsert_dialogue(&mut self, scene_id: &str, dialogue_id: &str, speaker: &str, text: &str) {
        let Some(scene) = self.scenes.get_mut(scene_id) else {
            return;
        };
        if let Some(line) = scene.dialogue.iter_mut().find(|d| d.id == dialogue_id) {
            line.speaker = speaker.to_string();
            line.text = text.to_string();
        } else {
            scene.dialogue.push(Dialogue {
                id: dialogue_id.to_string(),
                speaker: speaker.to_string(),
                text: text.to_string(),
            });
        }
    }

    pub fn move_image(&mut self, scene_id: &str, kind: LayerKind, item_id: &str, x: f32, y: f32) {
        if let Some(item) = self
            .scenes
            .get_mut(scene_id)
            .and_then(|s| s.layer_mut(kind))
            .and_then(|l| l.items.iter_mut().find(|i| i.id == item_id))
        {
            item.x = x;
            item.y = y;
        }
    }

    pub fn add_choice(&mut self, scene_id: &str, choice: Choice) {
        if let Some(scene) = self.scenes.get_mut(scene_id) {
            scene.choices.push(choice);
        }
    }

    pub fn delete_choice(&mut self, scene_id: &str, choice_id: &str) {
        if let Some(scene) = self.scenes.get_mut(scene_id) {
            scene.choices.retain(|c| c.id != choice_id);
        }
    }

    /// Distinct speaker names across the whole story, for autocomplete.
    pub fn all_speakers(&self) -> Vec<String> {
        let mut speakers: Vec<String> = self
            .scenes
            .values()
            .flat_map(|s| s.dialogue.iter())
            .map(|d| d.speaker.clone())
            .filter(|s| !s.is_empty())
            .collect();
        speakers.sort();
        speakers.dedup();
        speakers
    }

    /// A fresh id guaranteed to collide with nothing in the collection.
    fn unique_id(&self) -> String {
        loop {
            let id = fresh_id();
            if !self.id_in_use(&id) {
                return id;
            }
        }
    }

    fn id_in_use(&self, id: &str) -> bool {
        self.scenes.values().any(|scene| {
            scene.id == id
                || scene.dialogue.iter().any(|d| d.id == id)
                || scene.choices.iter().any(|c| c.id == id)
                || scene
                    .layers
                    .iter()
                    .any(|l| l.items.iter().any(|i| i.id == id))
        })
    }
}

/// Insert clamped to the list; empty lists append by policy.
fn insert_clamped<T>(list: &mut Vec<T>, index: usize, item: T) {
    if list.is_empty() {
        list.push(item);
    } else {
        let index = index.min(list.len());
        list.insert(index, item);
    }
}

fn reinsert<T>(list: &mut Vec<T>, old_index: usize, new_index: usize) {
    if old_index >= list.len() {
        return;
    }
    let item = list.remove(old_index);
    let new_index = new_index.min(list.len());
    list.insert(new_index, item);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> StoryStore {
        let mut scenes = SceneMap::new();

        let mut a = Scene::new("Scene A");
        a.id = "A".into();
        a.dialogue = vec![
            Dialogue {
                id: "d1".into(),
                speaker: "Wren".into(),
                text: "First line.".into(),
            },
            Dialogue {
                id: "d2".into(),
                speaker: "Wren".into(),
                text: "Second line.".into(),
            },
        ];
        for (id, name) in [("i1", "Reeds"), ("i2", "Stone")] {
            let mut item = ImageItem::new(name, "assets/x.png");
            item.id = id.into();
            a.layer_mut(LayerKind::Foreground).unwrap().items.push(item);
        }

        let mut b = Scene::new("Scene B");
        b.id = "B".into();
        b.dialogue = vec![Dialogue {
            id: "d3".into(),
            speaker: "Narrator".into(),
            text: "Elsewhere.".into(),
        }];

        scenes.insert("A".into(), a);
        scenes.insert("B".into(), b);
        StoryStore::new(scenes)
    }

    fn dialogue_ids(store: &StoryStore, scene: &str) -> Vec<String> {
        store.scene(scene).unwrap().dialogue.iter().map(|d| d.id.clone()).collect()
    }

    fn item_ids(store: &StoryStore, scene: &str, kind: LayerKind) -> Vec<String> {
        store
            .scene(scene)
            .unwrap()
            .layer(kind)
            .unwrap()
            .items
            .iter()
            .map(|i| i.id.clone())
            .collect()
    }

    fn count_id(store: &StoryStore, id: &str) -> usize {
        store
            .scenes()
            .values()
            .map(|s| {
                s.dialogue.iter().filter(|d| d.id == id).count()
                    + s.layers
                        .iter()
                        .map(|l| l.items.iter().filter(|i| i.id == id).count())
                        .sum::<usize>()
            })
            .sum()
    }

    #[test]
    fn test_cross_scene_dialogue_move() {
        let mut store = store();
        store.move_item(ItemKind::Dialogue, "A", "B", "d2", 0, None, None);
        assert_eq!(dialogue_ids(&store, "A"), vec!["d1"]);
        assert_eq!(dialogue_ids(&store, "B"), vec!["d2", "d3"]);
    }

    #[test]
    fn test_move_preserves_exclusive_ownership() {
        let mut store = store();
        store.move_item(
            ItemKind::Image,
            "A",
            "B",
            "i1",
            3,
            Some(LayerKind::Foreground),
            Some(LayerKind::Background),
        );
        assert_eq!(count_id(&store, "i1"), 1);
        // Empty target appended regardless of the requested index.
        assert_eq!(item_ids(&store, "B", LayerKind::Background), vec!["i1"]);
        assert_eq!(item_ids(&store, "A", LayerKind::Foreground), vec!["i2"]);
    }

    #[test]
    fn test_same_address_move_is_a_no_op() {
        let mut store = store();
        let before = store.scenes().clone();
        store.move_item(
            ItemKind::Image,
            "A",
            "A",
            "i2",
            1,
            Some(LayerKind::Foreground),
            Some(LayerKind::Foreground),
        );
        assert_eq!(*store.scenes(), before);
    }

    #[test]
    fn test_missing_address_is_a_silent_no_op() {
        let mut store = store();
        let before = store.scenes().clone();
        store.move_item(ItemKind::Dialogue, "A", "ghost", "d1", 0, None, None);
        store.move_item(ItemKind::Dialogue, "A", "B", "ghost", 0, None, None);
        store.reorder_item(ItemKind::Dialogue, "A", 7, 0, None);
        store.delete_item(ItemKind::Dialogue, "ghost", "d1", None);
        assert_eq!(*store.scenes(), before);
    }

    #[test]
    fn test_copy_generates_fresh_identity() {
        let mut store = store();
        let original = store.scene("A").unwrap().dialogue[0].clone();
        store.copy_item(ItemKind::Dialogue, "A", "B", "d1", 0, None, None);

        // Source untouched.
        assert_eq!(store.scene("A").unwrap().dialogue[0], original);
        // Clone is first in B, equal in all fields but the id.
        let clone = &store.scene("B").unwrap().dialogue[0];
        assert_ne!(clone.id, original.id);
        assert_eq!(clone.speaker, original.speaker);
        assert_eq!(clone.text, original.text);
        assert_eq!(count_id(&store, "d1"), 1);
        assert_eq!(count_id(&store, &clone.id), 1);
    }

    #[test]
    fn test_move_and_copy_keep_total_counts() {
        let mut store = store();
        let total = |s: &StoryStore| {
            s.scenes()
                .values()
                .map(|sc| {
                    sc.dialogue.len()
                        + sc.layers.iter().map(|l| l.items.len()).sum::<usize>()
                })
                .sum::<usize>()
        };
        let before = total(&store);

        store.move_item(ItemKind::Dialogue, "A", "B", "d1", 1, None, None);
        store.reorder_item(ItemKind::Image, "A", 0, 1, Some(LayerKind::Foreground));
        assert_eq!(total(&store), before);

        store.copy_item(
            ItemKind::Image,
            "A",
            "A",
            "i1",
            0,
            Some(LayerKind::Foreground),
            Some(LayerKind::Mid),
        );
        assert_eq!(total(&store), before + 1);
    }

    #[test]
    fn test_reorder_within_layer() {
        let mut store = store();
        store.reorder_item(ItemKind::Image, "A", 0, 1, Some(LayerKind::Foreground));
        assert_eq!(item_ids(&store, "A", LayerKind::Foreground), vec!["i2", "i1"]);
    }

    #[test]
    fn test_snapshot_restores_exactly() {
        let mut store = store();
        let before = store.scenes().clone();

        store.create_snapshot();
        store.reorder_item(ItemKind::Image, "A", 0, 1, Some(LayerKind::Foreground));
        store.move_item(ItemKind::Dialogue, "A", "B", "d2", 0, None, None);
        store.delete_item(ItemKind::Dialogue, "B", "d3", None);
        store.restore_snapshot();

        assert_eq!(*store.scenes(), before);
        assert!(!store.has_snapshot());
    }

    #[test]
    fn test_restore_without_snapshot_is_a_no_op() {
        let mut store = store();
        let before = store.scenes().clone();
        store.restore_snapshot();
        assert_eq!(*store.scenes(), before);
    }

    #[test]
    fn test_add_dialogue_appends_with_fresh_id() {
        let mut store = store();
        let id = store.add_dialogue("A", "Wren", "A new thought.").unwrap();
        let dialogue = &store.scene("A").unwrap().dialogue;
        assert_eq!(dialogue.last().unwrap().id, id);
        assert!(store.add_dialogue("ghost", "x", "y").is_none());
    }

    #[test]
    fn test_add_image_requires_url() {
        let mut store = store();
        store.add_image("A", LayerKind::Mid, ImageItem::new("Empty", ""));
        assert!(item_ids(&store, "A", LayerKind::Mid).is_empty());

        store.add_image("A", LayerKind::Mid, ImageItem::new("Shrine", "assets/shrine.png"));
        assert_eq!(item_ids(&store, "A", LayerKind::Mid).len(), 1);
    }
}
