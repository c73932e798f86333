//! Drag protocol handling: feeds normalized events into the session and
//! keeps the section coordinator in step with the gesture.

use std::time::Instant;

use crate::input::events::DragEvent;
use crate::state::drag::DragSession;
use crate::state::global::GlobalState;

pub fn apply(state: &mut GlobalState, event: DragEvent) {
    let now = Instant::now();

    match event {
        DragEvent::Pickup {
            kind,
            item_id,
            from,
        } => {
            if state.drag.is_some() {
                // Not reachable through the UI; the stale session's
                // rollback data is overwritten by design.
                log::warn!("LOGIC: Pickup while a drag is already in flight");
            }
            state.drag = Some(DragSession::begin(&mut state.store, kind, item_id, from));
        }

        DragEvent::Hover { at } => {
            if let Some(session) = state.drag.as_mut() {
                session.hover(&mut state.store, at);
            }
        }

        DragEvent::EnterSection(id) => state.sections.drag_enter(id, now),
        DragEvent::LeaveSection(id) => state.sections.drag_leave(id, now),

        DragEvent::Drop { copy, section } => {
            if let Some(session) = state.drag.take() {
                session.drop_on_item(&mut state.store, copy);
                state.sections.drop_into(section.as_ref());
            }
        }

        DragEvent::DropOnContainer {
            scene_id,
            layer,
            copy,
            section,
        } => {
            if let Some(session) = state.drag.take() {
                session.drop_on_container(&mut state.store, &scene_id, layer, copy);
                state.sections.drop_into(section.as_ref());
            }
        }

        DragEvent::Cancel => {
            if let Some(session) = state.drag.take() {
                session.cancel(&mut state.store);
            }
            state.sections.drag_ended();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::events::{EditorAction, ItemAddress, ItemKind, SectionId};
    use crate::models::scene::LayerKind;
    use crate::models::settings::EditorSettings;

    fn state() -> GlobalState {
        // Default settings resolve to the built-in story.
        GlobalState::new(EditorSettings::default())
    }

    fn drag(state: &mut GlobalState, event: DragEvent) {
        state.handle_action(EditorAction::Drag(event));
    }

    #[test]
    fn test_full_gesture_commit_then_idle() {
        let mut state = state();
        let fg = |s: &GlobalState| -> Vec<String> {
            s.store
                .scene("scene-glade")
                .unwrap()
                .layer(LayerKind::Foreground)
                .unwrap()
                .items
                .iter()
                .map(|i| i.id.clone())
                .collect()
        };
        let items = fg(&state);
        assert_eq!(items.len(), 2);

        drag(
            &mut state,
            DragEvent::Pickup {
                kind: ItemKind::Image,
                item_id: items[0].clone(),
                from: ItemAddress::image("scene-glade", LayerKind::Foreground, 0),
            },
        );
        assert!(state.store.has_snapshot());

        drag(
            &mut state,
            DragEvent::Hover {
                at: ItemAddress::image("scene-glade", LayerKind::Foreground, 1),
            },
        );
        drag(
            &mut state,
            DragEvent::Drop {
                copy: false,
                section: Some(SectionId::layer("scene-glade", LayerKind::Foreground)),
            },
        );

        assert_eq!(fg(&state), vec![items[1].clone(), items[0].clone()]);
        assert!(state.drag.is_none());
        assert!(!state.store.has_snapshot());
        // The drop target section sticks open.
        assert!(
            state
                .sections
                .is_open(&SectionId::layer("scene-glade", LayerKind::Foreground))
        );
    }

    #[test]
    fn test_cancel_rolls_the_whole_gesture_back() {
        let mut state = state();
        let before = state.store.scenes().clone();
        let first_line = before["scene-glade"].dialogue[0].id.clone();

        drag(
            &mut state,
            DragEvent::Pickup {
                kind: ItemKind::Dialogue,
                item_id: first_line,
                from: ItemAddress::dialogue("scene-glade", 0),
            },
        );
        drag(
            &mut state,
            DragEvent::Hover {
                at: ItemAddress::dialogue("scene-undercroft", 0),
            },
        );
        assert_ne!(*state.store.scenes(), before);

        drag(&mut state, DragEvent::Cancel);
        assert_eq!(*state.store.scenes(), before);
        assert!(state.drag.is_none());
        assert!(!state.store.has_snapshot());
    }

    #[test]
    fn test_stray_events_without_a_session_are_harmless() {
        let mut state = state();
        let before = state.store.scenes().clone();
        drag(
            &mut state,
            DragEvent::Hover {
                at: ItemAddress::dialogue("scene-glade", 0),
            },
        );
        drag(&mut state, DragEvent::Drop { copy: false, section: None });
        drag(&mut state, DragEvent::Cancel);
        assert_eq!(*state.store.scenes(), before);
    }
}
