//! Drag transfer state machine.
//!
//! One `DragSession` value exists per in-flight gesture; Idle is simply
//! the absence of a session. The session consumes normalized address
//! events and drives the store: speculative reorders/moves on hover for
//! live feedback, then exactly one of {terminal move, terminal copy, full
//! rollback} when the gesture ends. The snapshot slot is empty whenever
//! the machine is idle.
//!
//! Commit strategy: the last hover mutation stands, and a plain drop issues
//! no additional terminal mutation. The copy branch instead rolls back
//! every speculative move and performs a single copy from the untouched
//! origin to the final target.

use crate::input::events::{ItemAddress, ItemKind};
use crate::models::scene::LayerKind;
use crate::state::store::StoryStore;

#[derive(Debug, Clone)]
pub struct DragSession {
    pub kind: ItemKind,
    pub item_id: String,
    /// Where the item was picked up. Never changes.
    pub origin: ItemAddress,
    /// Where the item currently sits after speculative hover mutations.
    pub current: ItemAddress,
}

impl DragSession {
    /// Pickup: captures addressing and freezes the pre-drag state.
    pub fn begin(store: &mut StoryStore, kind: ItemKind, item_id: String, from: ItemAddress) -> Self {
        store.create_snapshot();
        Self {
            kind,
            item_id,
            origin: from.clone(),
            current: from,
        }
    }

    /// Speculatively places the dragged item at `at` so the list order
    /// tracks the pointer. Re-hovering the current position, or an address
    /// whose shape does not match the dragged kind, does nothing.
    pub fn hover(&mut self, store: &mut StoryStore, at: ItemAddress) {
        if !self.accepts(&at) || at == self.current {
            return;
        }

        if at.same_collection(&self.current) {
            store.reorder_item(
                self.kind,
                &at.scene_id,
                self.current.index,
                at.index,
                at.layer,
            );
        } else {
            store.move_item(
                self.kind,
                &self.current.scene_id,
                &at.scene_id,
                &self.item_id,
                at.index,
                self.current.layer,
                at.layer,
            );
        }
        self.current = at;
    }

    /// Drop over an item slot. The hover mutations already put the item at
    /// `current`; a plain drop only clears the snapshot, a copy drop rolls
    /// everything back and clones from the origin instead.
    pub fn drop_on_item(self, store: &mut StoryStore, copy: bool) {
        if copy {
            store.restore_snapshot();
            store.copy_item(
                self.kind,
                &self.origin.scene_id,
                &self.current.scene_id,
                &self.item_id,
                self.current.index,
                self.origin.layer,
                self.current.layer,
            );
        }
        store.clear_snapshot();
    }

    /// Drop over a container body instead of an item slot: a different
    /// collection places at its head, the item's own collection is a plain
    /// commit.
    pub fn drop_on_container(
        self,
        store: &mut StoryStore,
        scene_id: &str,
        layer: Option<LayerKind>,
        copy: bool,
    ) {
        let target = ItemAddress {
            scene_id: scene_id.to_string(),
            layer,
            index: 0,
        };
        if !self.accepts(&target) {
            // Wrong-kind container: the gesture still has to terminate.
            return self.cancel(store);
        }

        let same_collection = target.same_collection(&self.current);
        if copy {
            store.restore_snapshot();
            let index = if same_collection {
                self.current.index
            } else {
                target.index
            };
            store.copy_item(
                self.kind,
                &self.origin.scene_id,
                &target.scene_id,
                &self.item_id,
                index,
                self.origin.layer,
                target.layer,
            );
        } else if !same_collection {
            store.move_item(
                self.kind,
                &self.current.scene_id,
                &target.scene_id,
                &self.item_id,
                target.index,
                self.current.layer,
                target.layer,
            );
        }
        store.clear_snapshot();
    }

    /// Full rollback: every speculative mutation is discarded.
    pub fn cancel(self, store: &mut StoryStore) {
        store.restore_snapshot();
    }

    /// Address shape must match the dragged kind: dialogue has no layer,
    /// images always do.
    fn accepts(&self, at: &ItemAddress) -> bool {
        match self.kind {
            ItemKind::Dialogue => at.layer.is_none(),
            ItemKind::Image => at.layer.is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::scene::{Dialogue, ImageItem, Scene, SceneMap};

    fn store() -> StoryStore {
        let mut scenes = SceneMap::new();

        let mut a = Scene::new("Scene A");
        a.id = "A".into();
        for (id, text) in [("d1", "one"), ("d2", "two")] {
            a.dialogue.push(Dialogue {
                id: id.into(),
                speaker: "Wren".into(),
                text: text.into(),
            });
        }
        for id in ["i1", "i2"] {
            let mut item = ImageItem::new(id, "assets/x.png");
            item.id = id.into();
            a.layer_mut(LayerKind::Foreground).unwrap().items.push(item);
        }

        let mut b = Scene::new("Scene B");
        b.id = "B".into();

        scenes.insert("A".into(), a);
        scenes.insert("B".into(), b);
        StoryStore::new(scenes)
    }

    fn fg_ids(store: &StoryStore, scene: &str) -> Vec<String> {
        store
            .scene(scene)
            .unwrap()
            .layer(LayerKind::Foreground)
            .unwrap()
            .items
            .iter()
            .map(|i| i.id.clone())
            .collect()
    }

    #[test]
    fn test_cancelled_drag_restores_exactly() {
        let mut store = store();
        let before = store.scenes().clone();

        let mut session = DragSession::begin(
            &mut store,
            ItemKind::Image,
            "i1".into(),
            ItemAddress::image("A", LayerKind::Foreground, 0),
        );
        session.hover(&mut store, ItemAddress::image("A", LayerKind::Foreground, 1));
        assert_eq!(fg_ids(&store, "A"), vec!["i2", "i1"]);

        session.cancel(&mut store);
        assert_eq!(*store.scenes(), before);
        assert!(!store.has_snapshot());
    }

    #[test]
    fn test_plain_drop_lets_the_last_hover_stand() {
        let mut store = store();

        let mut session = DragSession::begin(
            &mut store,
            ItemKind::Dialogue,
            "d2".into(),
            ItemAddress::dialogue("A", 1),
        );
        session.hover(&mut store, ItemAddress::dialogue("A", 0));
        session.hover(&mut store, ItemAddress::dialogue("B", 0));
        session.drop_on_item(&mut store, false);

        let a: Vec<_> = store.scene("A").unwrap().dialogue.iter().map(|d| d.id.as_str()).collect();
        let b: Vec<_> = store.scene("B").unwrap().dialogue.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(a, vec!["d1"]);
        assert_eq!(b, vec!["d2"]);
        assert!(!store.has_snapshot());
    }

    #[test]
    fn test_copy_drop_leaves_the_origin_untouched() {
        let mut store = store();
        let original = store.scene("A").unwrap().layer(LayerKind::Foreground).unwrap().items[0].clone();

        let mut session = DragSession::begin(
            &mut store,
            ItemKind::Image,
            "i1".into(),
            ItemAddress::image("A", LayerKind::Foreground, 0),
        );
        session.hover(&mut store, ItemAddress::image("A", LayerKind::Background, 0));
        session.drop_on_item(&mut store, true);

        // Origin list back in its pre-drag state.
        assert_eq!(fg_ids(&store, "A"), vec!["i1", "i2"]);
        let fg_item = &store.scene("A").unwrap().layer(LayerKind::Foreground).unwrap().items[0];
        assert_eq!(*fg_item, original);

        // Background holds a clone differing only by id.
        let bg = &store.scene("A").unwrap().layer(LayerKind::Background).unwrap().items;
        assert_eq!(bg.len(), 1);
        assert_ne!(bg[0].id, original.id);
        assert_eq!(bg[0].name, original.name);
        assert_eq!(bg[0].url, original.url);
        assert!(!store.has_snapshot());
    }

    #[test]
    fn test_repeated_hover_does_not_thrash() {
        let mut store = store();

        let mut session = DragSession::begin(
            &mut store,
            ItemKind::Image,
            "i1".into(),
            ItemAddress::image("A", LayerKind::Foreground, 0),
        );
        session.hover(&mut store, ItemAddress::image("A", LayerKind::Foreground, 1));
        let after_first = store.scenes().clone();

        for _ in 0..5 {
            session.hover(&mut store, ItemAddress::image("A", LayerKind::Foreground, 1));
        }
        assert_eq!(*store.scenes(), after_first);
    }

    #[test]
    fn test_kind_mismatched_hover_is_ignored() {
        let mut store = store();

        let mut session = DragSession::begin(
            &mut store,
            ItemKind::Dialogue,
            "d1".into(),
            ItemAddress::dialogue("A", 0),
        );
        let before = store.scenes().clone();
        // An image-shaped address must never move a dialogue line.
        session.hover(&mut store, ItemAddress::image("A", LayerKind::Foreground, 0));
        assert_eq!(*store.scenes(), before);
        assert_eq!(session.current, ItemAddress::dialogue("A", 0));
        session.cancel(&mut store);
    }

    #[test]
    fn test_container_drop_places_at_head_of_other_collection() {
        let mut store = store();

        let session = DragSession::begin(
            &mut store,
            ItemKind::Image,
            "i2".into(),
            ItemAddress::image("A", LayerKind::Foreground, 1),
        );
        session.drop_on_container(&mut store, "B", Some(LayerKind::Mid), false);

        assert_eq!(fg_ids(&store, "A"), vec!["i1"]);
        let mid: Vec<_> = store
            .scene("B")
            .unwrap()
            .layer(LayerKind::Mid)
            .unwrap()
            .items
            .iter()
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(mid, vec!["i2"]);
        assert!(!store.has_snapshot());
    }

    #[test]
    fn test_container_drop_on_own_collection_is_a_plain_commit() {
        let mut store = store();
        let before = store.scenes().clone();

        let session = DragSession::begin(
            &mut store,
            ItemKind::Image,
            "i1".into(),
            ItemAddress::image("A", LayerKind::Foreground, 0),
        );
        session.drop_on_container(&mut store, "A", Some(LayerKind::Foreground), false);
        assert_eq!(*store.scenes(), before);
        assert!(!store.has_snapshot());
    }
}
