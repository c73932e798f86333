//! Mode switches and preview playback.

use crate::input::events::EditorAction;
use crate::models::scene::display_order;
use crate::state::global::GlobalState;
use crate::state::global::app_state::AppMode;
use crate::state::preview::PreviewState;

pub fn apply(state: &mut GlobalState, action: EditorAction) {
    match action {
        EditorAction::SetGraphMode(on) => {
            if !matches!(state.mode, AppMode::Preview(_)) {
                state.mode = if on { AppMode::Graph } else { AppMode::Edit };
            }
        }

        EditorAction::EnterPreview => {
            let start = state
                .selected_scene
                .clone()
                .or_else(|| display_order(state.store.scenes()).into_iter().next());
            if let Some(scene_id) = start {
                state.mode = AppMode::Preview(PreviewState::new(scene_id));
            } else {
                state.status = Some("Nothing to preview yet".to_string());
            }
        }

        EditorAction::ExitPreview => {
            if let AppMode::Preview(preview) = &state.mode {
                // Come back editing whatever was being previewed.
                if state.store.scene(&preview.scene_id).is_some() {
                    state.selected_scene = Some(preview.scene_id.clone());
                }
                state.mode = AppMode::Edit;
            }
        }

        EditorAction::PreviewAdvance => {
            if let AppMode::Preview(preview) = &mut state.mode {
                preview.advance(&state.store);
            }
        }

        EditorAction::PreviewChoose(choice_id) => {
            if let AppMode::Preview(preview) = &mut state.mode
                && let Err(e) = preview.choose(&state.store, &choice_id)
            {
                state.status = Some(e);
            }
        }

        _ => {}
    }
}
