//! Project persistence: a whole story round-trips through one JSON file.
//!
//! Import is all-or-nothing: the document is parsed and validated in full
//! before any live state is replaced, so a malformed file can never leave
//! the editor holding a half-loaded story.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::models::assets::AssetCatalog;
use crate::models::scene::{SceneId, SceneMap};

/// Why an import was rejected.
#[derive(Debug)]
pub enum ProjectError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for ProjectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectError::Io(e) => write!(f, "io error: {e}"),
            ProjectError::Parse(e) => write!(f, "not a valid project file: {e}"),
            ProjectError::Invalid(msg) => write!(f, "inconsistent project: {msg}"),
        }
    }
}

impl std::error::Error for ProjectError {}

impl From<std::io::Error> for ProjectError {
    fn from(e: std::io::Error) -> Self {
        ProjectError::Io(e)
    }
}

impl From<serde_json::Error> for ProjectError {
    fn from(e: serde_json::Error) -> Self {
        ProjectError::Parse(e)
    }
}

/// On-disk shape of a project.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectFile {
    name: String,
    scenes: SceneMap,
    #[serde(default)]
    assets: BTreeMap<String, String>,
}

/// A fully loaded project, ready to replace live state.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub name: String,
    pub scenes: SceneMap,
    pub assets: AssetCatalog,
}

impl Project {
    /// Reads, parses and validates a project file.
    pub fn load(path: &Path) -> Result<Self, ProjectError> {
        let text = fs::read_to_string(path)?;
        let file: ProjectFile = serde_json::from_str(&text)?;
        validate(&file)?;

        let assets = AssetCatalog::from_portable(&file.assets).map_err(ProjectError::Invalid)?;
        let mut scenes = file.scenes;
        for scene in scenes.values_mut() {
            scene.ensure_layers();
        }

        Ok(Self {
            name: file.name,
            scenes,
            assets,
        })
    }

    /// Writes the project as pretty-printed JSON.
    pub fn save(
        path: &Path,
        name: &str,
        scenes: &SceneMap,
        assets: &AssetCatalog,
    ) -> Result<(), ProjectError> {
        let file = ProjectFile {
            name: name.to_string(),
            scenes: scenes.clone(),
            assets: assets.to_portable(),
        };
        let text = serde_json::to_string_pretty(&file)?;
        fs::write(path, text)?;
        Ok(())
    }
}

/// Semantic checks beyond what the typed parse enforces: map keys must
/// agree with scene ids, and no item or dialogue id may be owned twice.
fn validate(file: &ProjectFile) -> Result<(), ProjectError> {
    let mut seen: BTreeMap<&str, &SceneId> = BTreeMap::new();

    for (key, scene) in &file.scenes {
        if *key != scene.id {
            return Err(ProjectError::Invalid(format!(
                "scene key {key:?} does not match scene id {:?}",
                scene.id
            )));
        }

        for dialogue in &scene.dialogue {
            if let Some(owner) = seen.insert(&dialogue.id, key) {
                return Err(ProjectError::Invalid(format!(
                    "dialogue id {:?} owned by both {owner:?} and {key:?}",
                    dialogue.id
                )));
            }
        }
        for layer in &scene.layers {
            for item in &layer.items {
                if let Some(owner) = seen.insert(&item.id, key) {
                    return Err(ProjectError::Invalid(format!(
                        "item id {:?} owned by both {owner:?} and {key:?}",
                        item.id
                    )));
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sample;
    use crate::models::scene::{Dialogue, LayerKind};

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("fabler-test-{name}-{}.json", std::process::id()))
    }

    #[test]
    fn test_save_load_round_trip_preserves_everything() {
        let (name, scenes) = sample::starter_story();
        let assets = AssetCatalog::new();
        let path = temp_path("roundtrip");

        Project::save(&path, &name, &scenes, &assets).unwrap();
        let loaded = Project::load(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(loaded.name, name);
        assert_eq!(loaded.scenes, scenes);
    }

    #[test]
    fn test_malformed_document_is_rejected() {
        let path = temp_path("malformed");
        fs::write(&path, "{ \"name\": 3 }").unwrap();
        let result = Project::load(&path);
        fs::remove_file(&path).ok();
        assert!(matches!(result, Err(ProjectError::Parse(_))));
    }

    #[test]
    fn test_mismatched_scene_key_is_rejected() {
        let (name, mut scenes) = sample::starter_story();
        // Corrupt one key without touching the scene's own id.
        let (key, scene) = scenes.pop_first().unwrap();
        scenes.insert(format!("{key}-moved"), scene);

        let assets = AssetCatalog::new();
        let path = temp_path("badkey");
        Project::save(&path, &name, &scenes, &assets).unwrap();
        let result = Project::load(&path);
        fs::remove_file(&path).ok();
        assert!(matches!(result, Err(ProjectError::Invalid(_))));
    }

    #[test]
    fn test_double_owned_id_is_rejected() {
        let (name, mut scenes) = sample::starter_story();
        let duplicated = Dialogue {
            id: scenes
                .values()
                .next()
                .unwrap()
                .dialogue
                .first()
                .unwrap()
                .id
                .clone(),
            speaker: "Echo".into(),
            text: "I should not exist twice.".into(),
        };
        scenes.values_mut().last().unwrap().dialogue.push(duplicated);

        let assets = AssetCatalog::new();
        let path = temp_path("dupid");
        Project::save(&path, &name, &scenes, &assets).unwrap();
        let result = Project::load(&path);
        fs::remove_file(&path).ok();
        assert!(matches!(result, Err(ProjectError::Invalid(_))));
    }

    #[test]
    fn test_loaded_scenes_get_canonical_layers() {
        let (name, mut scenes) = sample::starter_story();
        scenes.values_mut().next().unwrap().layers.clear();

        let assets = AssetCatalog::new();
        let path = temp_path("layers");
        Project::save(&path, &name, &scenes, &assets).unwrap();
        let loaded = Project::load(&path).unwrap();
        fs::remove_file(&path).ok();

        let scene = loaded.scenes.values().next().unwrap();
        let kinds: Vec<LayerKind> = scene.layers.iter().map(|l| l.kind).collect();
        assert_eq!(kinds, LayerKind::ALL.to_vec());
    }
}
