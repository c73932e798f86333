//! Story graph view: scenes as draggable nodes, choices as labeled edges.
//!
//! Wiring flow: click a node to arm it as the edge source, click a second
//! node to connect. Node drags persist back into the scene's graph
//! coordinates when the drag ends.

use std::collections::HashMap;

use crate::input::events::EditorAction;
use crate::models::scene::SceneId;
use crate::shared::snapshot::EditorSnapshot;

const NODE_SIZE: egui::Vec2 = egui::Vec2::new(140.0, 44.0);

pub struct GraphView {
    /// Armed edge source, highlighted until the second click.
    connect_from: Option<SceneId>,
    /// Live drag offsets per node, applied on release.
    pending_moves: HashMap<SceneId, egui::Vec2>,
}

impl GraphView {
    pub fn new() -> Self {
        Self {
            connect_from: None,
            pending_moves: HashMap::new(),
        }
    }

    pub fn show(
        &mut self,
        ctx: &egui::Context,
        snap: &EditorSnapshot,
        out: &mut Vec<EditorAction>,
    ) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.strong("Story graph");
                match &self.connect_from {
                    Some(from) => {
                        let name = snap
                            .scenes
                            .get(from)
                            .map(|s| s.name.as_str())
                            .unwrap_or(from.as_str());
                        ui.weak(format!("connecting from {name} — click a target"));
                        if ui.small_button("cancel").clicked() {
                            self.connect_from = None;
                        }
                    }
                    None => {
                        ui.weak("click a node to start a connection, drag to move");
                    }
                }
            });

            let (rect, _) =
                ui.allocate_exact_size(ui.available_size(), egui::Sense::hover());
            let painter = ui.painter_at(rect);
            painter.rect_filled(rect, egui::CornerRadius::same(4), egui::Color32::from_rgb(14, 16, 20));
            let origin = rect.left_top() + egui::Vec2::new(40.0, 40.0);

            let node_rect = |x: f32, y: f32, pending: egui::Vec2| {
                egui::Rect::from_min_size(
                    origin + egui::Vec2::new(x, y) + pending,
                    NODE_SIZE,
                )
            };

            // Edges under the nodes.
            for edge in &snap.graph.edges {
                let Some(source) = snap.graph.nodes.iter().find(|n| n.id == edge.source) else {
                    continue;
                };
                let source_pending = self
                    .pending_moves
                    .get(&edge.source)
                    .copied()
                    .unwrap_or(egui::Vec2::ZERO);
                let from = node_rect(source.x, source.y, source_pending).right_center();

                let to = match snap.graph.nodes.iter().find(|n| n.id == edge.target) {
                    Some(target) => {
                        let pending = self
                            .pending_moves
                            .get(&edge.target)
                            .copied()
                            .unwrap_or(egui::Vec2::ZERO);
                        node_rect(target.x, target.y, pending).left_center()
                    }
                    // Dangling edge: a stub pointing nowhere.
                    None => from + egui::Vec2::new(60.0, 0.0),
                };

                let color = if edge.dangling {
                    egui::Color32::LIGHT_RED
                } else {
                    egui::Color32::from_gray(140)
                };
                painter.line_segment([from, to], egui::Stroke::new(1.5, color));
                // Arrowhead.
                let dir = (to - from).normalized();
                let normal = egui::Vec2::new(-dir.y, dir.x);
                painter.line_segment(
                    [to, to - dir * 8.0 + normal * 4.0],
                    egui::Stroke::new(1.5, color),
                );
                painter.line_segment(
                    [to, to - dir * 8.0 - normal * 4.0],
                    egui::Stroke::new(1.5, color),
                );
                painter.text(
                    from.lerp(to, 0.5) + egui::Vec2::new(0.0, -8.0),
                    egui::Align2::CENTER_BOTTOM,
                    &edge.label,
                    egui::FontId::proportional(10.0),
                    color,
                );
            }

            for node in &snap.graph.nodes {
                let pending = self
                    .pending_moves
                    .get(&node.id)
                    .copied()
                    .unwrap_or(egui::Vec2::ZERO);
                let node_rect = node_rect(node.x, node.y, pending);

                let selected = snap.selected_scene.as_deref() == Some(node.id.as_str());
                let armed = self.connect_from.as_deref() == Some(node.id.as_str());
                let fill = if armed {
                    egui::Color32::from_rgb(90, 70, 30)
                } else if selected {
                    egui::Color32::from_rgb(40, 60, 90)
                } else {
                    egui::Color32::from_gray(45)
                };
                painter.rect_filled(node_rect, egui::CornerRadius::same(6), fill);
                painter.text(
                    node_rect.center(),
                    egui::Align2::CENTER_CENTER,
                    &node.label,
                    egui::FontId::proportional(13.0),
                    egui::Color32::WHITE,
                );

                let response = ui.interact(
                    node_rect,
                    egui::Id::new(("graph-node", &node.id)),
                    egui::Sense::click_and_drag(),
                );
                if response.dragged() {
                    let entry = self.pending_moves.entry(node.id.clone()).or_default();
                    *entry += response.drag_delta();
                }
                if response.drag_stopped() {
                    if let Some(delta) = self.pending_moves.remove(&node.id) {
                        out.push(EditorAction::MoveNode {
                            scene_id: node.id.clone(),
                            x: node.x + delta.x,
                            y: node.y + delta.y,
                        });
                    }
                }
                if response.clicked() {
                    match self.connect_from.take() {
                        Some(from) if from != node.id => {
                            out.push(EditorAction::ConnectNodes {
                                from,
                                to: node.id.clone(),
                            });
                        }
                        Some(_) => {} // clicked the armed node again: disarm
                        None => {
                            self.connect_from = Some(node.id.clone());
                            out.push(EditorAction::SelectScene(node.id.clone()));
                        }
                    }
                }
            }

            if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                self.connect_from = None;
            }
        });
    }
}
