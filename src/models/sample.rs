//! Built-in starter story shown on first launch.

use crate::models::scene::{Choice, Dialogue, ImageItem, LayerKind, Scene, SceneMap};

/// Two small connected scenes so every editor feature has something to
/// chew on before the user imports a real project.
pub fn starter_story() -> (String, SceneMap) {
    let mut scenes = SceneMap::new();

    let mut glade = Scene::new("Moonlit Glade");
    glade.id = "scene-glade".into();
    glade.width = 2400.0;
    place(&mut glade, LayerKind::Background, "Far treeline", "assets/glade_far.png", 200.0, 80.0);
    place(&mut glade, LayerKind::Mid, "Old shrine", "assets/shrine.png", 900.0, 240.0);
    place(&mut glade, LayerKind::Foreground, "Reeds", "assets/reeds.png", 0.0, 420.0);
    place(&mut glade, LayerKind::Foreground, "Mossy stone", "assets/stone.png", 520.0, 480.0);
    glade.dialogue = vec![
        Dialogue::new("Narrator", "Mist folds over the glade as the moon climbs."),
        Dialogue::new("Wren", "The shrine... it's older than the maps say."),
    ];
    glade.choices = vec![
        Choice {
            id: "choice-descend".into(),
            label: "Follow the stair under the shrine".into(),
            next_scene_id: "scene-undercroft".into(),
        },
    ];

    let mut undercroft = Scene::new("Undercroft");
    undercroft.id = "scene-undercroft".into();
    undercroft.width = 1800.0;
    undercroft.graph_x = 320.0;
    undercroft.graph_y = 60.0;
    place(&mut undercroft, LayerKind::Background, "Vaulted dark", "assets/vault.png", 0.0, 0.0);
    place(&mut undercroft, LayerKind::Foreground, "Broken pillar", "assets/pillar.png", 300.0, 210.0);
    undercroft.dialogue = vec![
        Dialogue::new("Narrator", "The air below tastes of iron and rain."),
        Dialogue::new("Wren", "Someone lit these lamps. Recently."),
    ];
    undercroft.choices = vec![
        Choice {
            id: "choice-return".into(),
            label: "Climb back to the glade".into(),
            next_scene_id: "scene-glade".into(),
        },
    ];

    scenes.insert(glade.id.clone(), glade);
    scenes.insert(undercroft.id.clone(), undercroft);

    ("The Shrine Under the Glade".to_string(), scenes)
}

fn place(scene: &mut Scene, kind: LayerKind, name: &str, url: &str, x: f32, y: f32) {
    let mut item = ImageItem::new(name, url);
    item.x = x;
    item.y = y;
    if let Some(layer) = scene.layer_mut(kind) {
        layer.items.push(item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starter_story_is_structurally_sound() {
        let (_, scenes) = starter_story();
        assert_eq!(scenes.len(), 2);
        for scene in scenes.values() {
            let kinds: Vec<LayerKind> = scene.layers.iter().map(|l| l.kind).collect();
            assert_eq!(kinds, LayerKind::ALL.to_vec());
            assert!(!scene.dialogue.is_empty());
        }
        // The two scenes reference each other.
        let glade = &scenes["scene-glade"];
        assert_eq!(glade.choices[0].next_scene_id, "scene-undercroft");
    }
}
