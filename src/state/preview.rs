//! Playable preview of the story graph.
//!
//! Walks one scene's dialogue in order, then offers its choices; picking
//! one jumps to the target scene. Strictly a reader of the store.

use crate::models::scene::{Choice, Scene, SceneId};
use crate::state::store::StoryStore;

#[derive(Debug, Clone, PartialEq)]
pub struct PreviewState {
    pub scene_id: SceneId,
    /// Index of the dialogue line currently shown.
    pub line: usize,
}

impl PreviewState {
    pub fn new(scene_id: SceneId) -> Self {
        Self { scene_id, line: 0 }
    }

    pub fn scene<'a>(&self, store: &'a StoryStore) -> Option<&'a Scene> {
        store.scene(&self.scene_id)
    }

    /// True once every dialogue line has been shown and the choices (if
    /// any) should be offered.
    pub fn at_choices(&self, store: &StoryStore) -> bool {
        self.scene(store)
            .map(|s| self.line >= s.dialogue.len())
            .unwrap_or(true)
    }

    /// Advances to the next line, stopping at the choice point.
    pub fn advance(&mut self, store: &StoryStore) {
        if let Some(scene) = self.scene(store)
            && self.line < scene.dialogue.len()
        {
            self.line += 1;
        }
    }

    /// Follows a choice to its target scene. A dangling target is refused
    /// and reported back so the editor can show it.
    pub fn choose(&mut self, store: &StoryStore, choice_id: &str) -> Result<(), String> {
        let Some(choice) = self
            .scene(store)
            .and_then(|s| s.choices.iter().find(|c| c.id == choice_id))
            .cloned()
        else {
            return Err(format!("unknown choice {choice_id:?}"));
        };
        let Choice { next_scene_id, .. } = choice;
        if store.scene(&next_scene_id).is_none() {
            return Err(format!("choice leads to missing scene {next_scene_id:?}"));
        }
        self.scene_id = next_scene_id;
        self.line = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sample;

    fn store() -> StoryStore {
        let (_, scenes) = sample::starter_story();
        StoryStore::new(scenes)
    }

    #[test]
    fn test_advance_walks_dialogue_then_stops() {
        let store = store();
        let mut preview = PreviewState::new("scene-glade".into());
        let lines = store.scene("scene-glade").unwrap().dialogue.len();

        for _ in 0..lines {
            assert!(!preview.at_choices(&store));
            preview.advance(&store);
        }
        assert!(preview.at_choices(&store));

        // Further advances stay at the choice point.
        preview.advance(&store);
        assert_eq!(preview.line, lines);
    }

    #[test]
    fn test_choose_follows_the_edge() {
        let store = store();
        let mut preview = PreviewState::new("scene-glade".into());
        preview.choose(&store, "choice-descend").unwrap();
        assert_eq!(preview.scene_id, "scene-undercroft");
        assert_eq!(preview.line, 0);
    }

    #[test]
    fn test_dangling_choice_is_refused() {
        let (_, mut scenes) = sample::starter_story();
        scenes
            .get_mut("scene-glade")
            .unwrap()
            .choices[0]
            .next_scene_id = "scene-ghost".into();
        let store = StoryStore::new(scenes);

        let mut preview = PreviewState::new("scene-glade".into());
        assert!(preview.choose(&store, "choice-descend").is_err());
        assert_eq!(preview.scene_id, "scene-glade");
    }
}
