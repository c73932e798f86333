//! Project lifecycle: new, import, export, asset ingestion.

use std::sync::Arc;

use crate::input::events::EditorAction;
use crate::models::assets::AssetCatalog;
use crate::models::project::Project;
use crate::models::scene::{Scene, SceneMap, display_order};
use crate::state::global::GlobalState;

pub fn apply(state: &mut GlobalState, action: EditorAction) {
    match action {
        EditorAction::SetProjectName(name) => state.project_name = name,

        EditorAction::NewProject => {
            let mut scenes = SceneMap::new();
            let scene = Scene::new("Opening");
            let id = scene.id.clone();
            scenes.insert(id.clone(), scene);

            state.store.replace(scenes);
            state.assets = Arc::new(AssetCatalog::new());
            state.project_name = "Untitled Story".to_string();
            state.project_path = None;
            state.selected_scene = Some(id);
            state.drag = None;
            state.sections.drag_ended();
            state.status = Some("Started a new story".to_string());
        }

        EditorAction::ImportProject(path) => match Project::load(&path) {
            Ok(project) => {
                log::info!("LOGIC: Imported project from {path:?}");
                state.selected_scene = display_order(&project.scenes).into_iter().next();
                state.store.replace(project.scenes);
                state.assets = Arc::new(project.assets);
                state.project_name = project.name;
                state.project_path = Some(path);
                state.drag = None;
                state.sections.drag_ended();
                state.status = Some(format!("Imported {:?}", state.project_name));
            }
            // Live state stays exactly as it was; the user is told why.
            Err(e) => {
                log::error!("LOGIC: Import failed: {e}");
                state.status = Some(format!("Import failed: {e}"));
            }
        },

        EditorAction::ExportProject(path) => {
            match Project::save(&path, &state.project_name, state.store.scenes(), &state.assets) {
                Ok(()) => {
                    log::info!("LOGIC: Exported project to {path:?}");
                    state.project_path = Some(path);
                    state.status = Some("Exported".to_string());
                }
                Err(e) => {
                    log::error!("LOGIC: Export failed: {e}");
                    state.status = Some(format!("Export failed: {e}"));
                }
            }
        }

        EditorAction::IngestAsset { name, bytes } => {
            match Arc::make_mut(&mut state.assets).ingest(&name, bytes) {
                Ok(reference) => {
                    log::info!("LOGIC: Ingested {name} as {reference}");
                    state.status = Some(format!("Added asset {name}"));
                }
                Err(e) => {
                    log::warn!("LOGIC: Rejected dropped file: {e}");
                    state.status = Some(e);
                }
            }
        }

        _ => {}
    }
}
