//! Projection of scene choices into the graph view's nodes and edges.
//!
//! The graph is never stored; it is recomputed from the scene map after
//! every mutation. Node positions live on the scenes themselves so they
//! survive the round trip through the project file.

use crate::models::scene::{SceneId, SceneMap};

/// One scene as a graph node.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub id: SceneId,
    pub label: String,
    pub x: f32,
    pub y: f32,
}

/// One choice as a directed labeled edge.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphEdge {
    /// `<scene id>-<choice id>`, unique because choice ids are.
    pub id: String,
    pub source: SceneId,
    pub target: SceneId,
    pub label: String,
    /// True when the target scene does not exist.
    pub dangling: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoryGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// Builds the graph for the current scene map.
pub fn project(scenes: &SceneMap) -> StoryGraph {
    let nodes = scenes
        .values()
        .map(|scene| GraphNode {
            id: scene.id.clone(),
            label: scene.name.clone(),
            x: scene.graph_x,
            y: scene.graph_y,
        })
        .collect();

    let mut edges = Vec::new();
    for scene in scenes.values() {
        for choice in &scene.choices {
            edges.push(GraphEdge {
                id: format!("{}-{}", scene.id, choice.id),
                source: scene.id.clone(),
                target: choice.next_scene_id.clone(),
                label: choice.label.clone(),
                dangling: !scenes.contains_key(&choice.next_scene_id),
            });
        }
    }

    StoryGraph { nodes, edges }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::scene::{Choice, Scene};

    fn scene_with_choice(id: &str, target: &str) -> Scene {
        let mut scene = Scene::new(id);
        scene.id = id.to_string();
        scene.choices.push(Choice {
            id: format!("c-{target}"),
            label: format!("go to {target}"),
            next_scene_id: target.to_string(),
        });
        scene
    }

    #[test]
    fn test_every_choice_becomes_one_edge() {
        let mut scenes = SceneMap::new();
        scenes.insert("a".into(), scene_with_choice("a", "b"));
        let mut b = Scene::new("b");
        b.id = "b".into();
        scenes.insert("b".into(), b);

        let graph = project(&scenes);
        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.edges.len(), 1);
        let edge = &graph.edges[0];
        assert_eq!(edge.source, "a");
        assert_eq!(edge.target, "b");
        assert!(!edge.dangling);
    }

    #[test]
    fn test_missing_target_is_flagged_dangling() {
        let mut scenes = SceneMap::new();
        scenes.insert("a".into(), scene_with_choice("a", "ghost"));
        let graph = project(&scenes);
        assert!(graph.edges[0].dangling);
    }

    #[test]
    fn test_node_positions_come_from_the_scene() {
        let mut scenes = SceneMap::new();
        let mut scene = Scene::new("a");
        scene.id = "a".into();
        scene.graph_x = 120.0;
        scene.graph_y = -40.0;
        scenes.insert("a".into(), scene);

        let graph = project(&scenes);
        assert_eq!((graph.nodes[0].x, graph.nodes[0].y), (120.0, -40.0));
    }
}
