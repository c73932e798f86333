//! Global editor state owned by the logic thread.
//!
//! `GlobalState` is the single owner of the story store, the in-flight
//! drag session, the section coordinator and the current mode; every
//! action drained from the bus lands in [`GlobalState::handle_action`]
//! and is applied synchronously before the next one is read.

mod actions;
mod app_state;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use app_state::AppMode;

use crate::input::events::EditorAction;
use crate::models::assets::AssetCatalog;
use crate::models::graph;
use crate::models::project::Project;
use crate::models::sample;
use crate::models::scene::{SceneId, display_order};
use crate::models::settings::EditorSettings;
use crate::shared::snapshot::{
    DragSnapshot, EditorSnapshot, PreviewSnapshot, RenderState,
};
use crate::state::drag::DragSession;
use crate::state::sections::SectionCoordinator;
use crate::state::store::StoryStore;

pub struct GlobalState {
    store: StoryStore,
    project_name: String,
    project_path: Option<PathBuf>,
    assets: Arc<AssetCatalog>,
    drag: Option<DragSession>,
    sections: SectionCoordinator,
    mode: AppMode,
    selected_scene: Option<SceneId>,
    settings: EditorSettings,
    status: Option<String>,
    revision: u64,
}

impl GlobalState {
    /// Reopens the last project when it still exists, otherwise starts
    /// with the built-in story.
    pub fn new(settings: EditorSettings) -> Self {
        log::info!("LOGIC: Initializing editor state");

        let reopened = settings
            .last_project
            .as_ref()
            .filter(|path| path.exists())
            .and_then(|path| match Project::load(path) {
                Ok(project) => Some((project, path.clone())),
                Err(e) => {
                    log::warn!("LOGIC: Could not reopen {path:?}: {e}");
                    None
                }
            });

        let (project_name, scenes, assets, project_path) = match reopened {
            Some((project, path)) => (
                project.name,
                project.scenes,
                project.assets,
                Some(path),
            ),
            None => {
                let (name, scenes) = sample::starter_story();
                (name, scenes, AssetCatalog::new(), None)
            }
        };

        let selected_scene = display_order(&scenes).into_iter().next();
        let sections = SectionCoordinator::new(settings.enter_delay(), settings.leave_delay());

        Self {
            store: StoryStore::new(scenes),
            project_name,
            project_path,
            assets: Arc::new(assets),
            drag: None,
            sections,
            mode: AppMode::Edit,
            selected_scene,
            settings,
            status: None,
            revision: 0,
        }
    }

    /// Applies one action. Everything is synchronous: by the time this
    /// returns, the store, drag session and sections are consistent.
    pub fn handle_action(&mut self, action: EditorAction) {
        self.revision += 1;

        use EditorAction::*;
        match action {
            Drag(event) => actions::drag::apply(self, event),

            SetProjectName(_) | NewProject | ImportProject(_) | ExportProject(_)
            | IngestAsset { .. } => actions::project::apply(self, action),

            SetGraphMode(_) | EnterPreview | ExitPreview | PreviewAdvance
            | PreviewChoose(_) => actions::preview::apply(self, action),

            other => actions::story::apply(self, other),
        }
    }

    /// Advances the section debounce timers.
    pub fn tick(&mut self, now: Instant) {
        if self.sections.tick(now) {
            self.revision += 1;
        }
    }

    /// Monotonic change counter; the logic loop sends a fresh snapshot
    /// whenever it moves.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn shutdown(&mut self) {
        self.settings.last_project = self.project_path.clone();
        if let Err(e) = self.settings.save() {
            log::error!("LOGIC: Could not save settings: {e}");
        }
    }

    pub fn create_snapshot(&self) -> RenderState {
        match &self.mode {
            AppMode::Preview(preview) => match preview.scene(&self.store) {
                Some(scene) => RenderState::Preview(PreviewSnapshot {
                    scene: scene.clone(),
                    line: preview.line,
                    at_choices: preview.at_choices(&self.store),
                    assets: self.assets.clone(),
                }),
                // Scene vanished under the preview; fall back to editing.
                None => RenderState::Editor(self.editor_snapshot(false)),
            },
            AppMode::Edit => RenderState::Editor(self.editor_snapshot(false)),
            AppMode::Graph => RenderState::Editor(self.editor_snapshot(true)),
        }
    }

    fn editor_snapshot(&self, graph_mode: bool) -> EditorSnapshot {
        let scenes = self.store.scenes();
        EditorSnapshot {
            project_name: self.project_name.clone(),
            scenes: scenes.clone(),
            display_order: display_order(scenes),
            selected_scene: self.selected_scene.clone(),
            graph_mode,
            graph: graph::project(scenes),
            open_sections: self.sections.open_sections(),
            drag: self.drag.as_ref().map(|session| DragSnapshot {
                kind: session.kind,
                item_id: session.item_id.clone(),
            }),
            assets: self.assets.clone(),
            speakers: self.store.all_speakers(),
            status: self.status.clone(),
        }
    }
}
