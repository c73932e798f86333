//! Scene, dialogue, item, choice and graph mutations.

use crate::input::events::EditorAction;
use crate::models::scene::{Choice, ImageItem, fresh_id};
use crate::state::global::GlobalState;

pub fn apply(state: &mut GlobalState, action: EditorAction) {
    match action {
        EditorAction::AddScene { name } => {
            let id = state.store.add_scene(&name);
            state.selected_scene = Some(id);
        }

        EditorAction::SelectScene(id) => {
            if state.store.scene(&id).is_some() {
                state.selected_scene = Some(id);
            }
        }

        EditorAction::AddDialogue {
            scene_id,
            speaker,
            text,
        } => {
            state.store.add_dialogue(&scene_id, &speaker, &text);
        }

        EditorAction::UpsertDialogue {
            scene_id,
            dialogue_id,
            speaker,
            text,
        } => {
            state
                .store
                .upsert_dialogue(&scene_id, &dialogue_id, &speaker, &text);
        }

        EditorAction::DeleteItem {
            kind,
            scene_id,
            item_id,
            layer,
        } => {
            state.store.delete_item(kind, &scene_id, &item_id, layer);
        }

        EditorAction::MoveImage {
            scene_id,
            layer,
            item_id,
            x,
            y,
        } => {
            state.store.move_image(&scene_id, layer, &item_id, x, y);
        }

        EditorAction::PlaceAsset {
            scene_id,
            layer,
            url,
            name,
        } => {
            state.store.add_image(&scene_id, layer, ImageItem::new(&name, &url));
        }

        EditorAction::AddChoice {
            scene_id,
            label,
            next_scene_id,
        } => {
            state.store.add_choice(
                &scene_id,
                Choice {
                    id: fresh_id(),
                    label,
                    next_scene_id,
                },
            );
        }

        EditorAction::DeleteChoice {
            scene_id,
            choice_id,
        } => {
            state.store.delete_choice(&scene_id, &choice_id);
        }

        EditorAction::MoveNode { scene_id, x, y } => {
            state.store.set_graph_position(&scene_id, x, y);
        }

        EditorAction::ConnectNodes { from, to } => connect(state, &from, &to),

        EditorAction::ToggleSection(id) => state.sections.toggle_user(id),

        _ => {}
    }
}

/// Graph-view edge creation. Self-edges and duplicate edges are refused,
/// matching what the choice picker offers.
fn connect(state: &mut GlobalState, from: &str, to: &str) {
    if from == to {
        return;
    }
    let Some(target) = state.store.scene(to) else {
        return;
    };
    let label = target.name.clone();
    let already_wired = state
        .store
        .scene(from)
        .is_some_and(|s| s.choices.iter().any(|c| c.next_scene_id == to));
    if already_wired {
        return;
    }
    state.store.add_choice(
        from,
        Choice {
            id: fresh_id(),
            label,
            next_scene_id: to.to_string(),
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::settings::EditorSettings;

    fn state() -> GlobalState {
        GlobalState::new(EditorSettings::default())
    }

    #[test]
    fn test_add_scene_selects_it() {
        let mut state = state();
        state.handle_action(EditorAction::AddScene {
            name: "Harbor".into(),
        });
        let selected = state.selected_scene.clone().unwrap();
        assert_eq!(state.store.scene(&selected).unwrap().name, "Harbor");
    }

    #[test]
    fn test_connect_refuses_duplicates_and_self_edges() {
        let mut state = state();
        let before = state.store.scene("scene-glade").unwrap().choices.len();

        state.handle_action(EditorAction::ConnectNodes {
            from: "scene-glade".into(),
            to: "scene-glade".into(),
        });
        // Glade already has a choice into the undercroft.
        state.handle_action(EditorAction::ConnectNodes {
            from: "scene-glade".into(),
            to: "scene-undercroft".into(),
        });
        assert_eq!(state.store.scene("scene-glade").unwrap().choices.len(), before);

        state.handle_action(EditorAction::ConnectNodes {
            from: "scene-undercroft".into(),
            to: "scene-glade".into(),
        });
        let undercroft = state.store.scene("scene-undercroft").unwrap();
        // Already wired in the sample; still exactly one edge per target.
        let into_glade = undercroft
            .choices
            .iter()
            .filter(|c| c.next_scene_id == "scene-glade")
            .count();
        assert_eq!(into_glade, 1);
    }

    #[test]
    fn test_connect_labels_edge_with_target_name() {
        let mut state = state();
        state.handle_action(EditorAction::AddScene { name: "Harbor".into() });
        let harbor = state.selected_scene.clone().unwrap();

        state.handle_action(EditorAction::ConnectNodes {
            from: "scene-glade".into(),
            to: harbor.clone(),
        });
        let glade = state.store.scene("scene-glade").unwrap();
        let edge = glade
            .choices
            .iter()
            .find(|c| c.next_scene_id == harbor)
            .unwrap();
        assert_eq!(edge.label, "Harbor");
    }
}
