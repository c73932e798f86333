//! Parallax viewport: draws the selected scene's layers and lets items be
//! nudged around with the pointer.
//!
//! A pure consumer of the snapshot: layer order, item positions and zoom
//! are read, never written; edits go back as `MoveImage` actions when a
//! drag ends.

use std::collections::HashMap;

use crate::input::events::EditorAction;
use crate::models::assets::AssetCatalog;
use crate::models::scene::Scene;
use crate::render::textures::TextureCache;
use crate::shared::snapshot::EditorSnapshot;

/// Logical scene height mapped onto the viewport.
const SCENE_HEIGHT: f32 = 600.0;
/// Fallback size for items whose image is not resolvable.
const PLACEHOLDER_SIZE: egui::Vec2 = egui::Vec2::new(96.0, 64.0);

pub struct ViewportView {
    /// Horizontal camera position in scene units.
    scroll: f32,
    /// Accumulated drag offsets per item, applied on release.
    pending_moves: HashMap<String, egui::Vec2>,
}

impl ViewportView {
    pub fn new() -> Self {
        Self {
            scroll: 0.0,
            pending_moves: HashMap::new(),
        }
    }

    pub fn show(
        &mut self,
        ctx: &egui::Context,
        snap: &EditorSnapshot,
        textures: &mut TextureCache,
        out: &mut Vec<EditorAction>,
    ) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(scene) = snap
                .selected_scene
                .as_ref()
                .and_then(|id| snap.scenes.get(id))
            else {
                ui.centered_and_justified(|ui| {
                    ui.weak("Select a scene to edit it here.");
                });
                return;
            };

            ui.horizontal(|ui| {
                ui.strong(&scene.name);
                let max_scroll = (scene.width - 100.0).max(0.0);
                ui.add(
                    egui::Slider::new(&mut self.scroll, 0.0..=max_scroll)
                        .text("scroll")
                        .show_value(false),
                );
            });

            let (rect, _) =
                ui.allocate_exact_size(ui.available_size(), egui::Sense::hover());
            self.draw_scene(ui, rect, scene, &snap.assets, textures, true, out);
        });
    }

    /// Paints one scene into `rect`. With `editable` set, items respond to
    /// drags and report their final position.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_scene(
        &mut self,
        ui: &mut egui::Ui,
        rect: egui::Rect,
        scene: &Scene,
        assets: &AssetCatalog,
        textures: &mut TextureCache,
        editable: bool,
        out: &mut Vec<EditorAction>,
    ) {
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, egui::CornerRadius::same(4), egui::Color32::from_rgb(18, 20, 26));
        let scale = rect.height() / SCENE_HEIGHT;

        for layer in &scene.layers {
            let offset = self.scroll * layer.parallax();
            for item in &layer.items {
                let pending = self
                    .pending_moves
                    .get(&item.id)
                    .copied()
                    .unwrap_or(egui::Vec2::ZERO);

                let size = match assets.resolve(&item.url) {
                    Some(entry) => {
                        egui::Vec2::new(entry.width as f32, entry.height as f32) * item.zoom()
                    }
                    None => PLACEHOLDER_SIZE * item.zoom(),
                };
                let pos = egui::Pos2::new(
                    rect.left() + (item.x - offset) * scale + pending.x,
                    rect.top() + item.y * scale + pending.y,
                );
                let item_rect = egui::Rect::from_min_size(pos, size * scale);
                if !rect.intersects(item_rect) {
                    continue;
                }

                match textures.get(ui.ctx(), assets, &item.url) {
                    Some(texture) => {
                        painter.image(
                            texture,
                            item_rect,
                            egui::Rect::from_min_max(
                                egui::Pos2::ZERO,
                                egui::Pos2::new(1.0, 1.0),
                            ),
                            egui::Color32::WHITE,
                        );
                    }
                    None => {
                        painter.rect_filled(
                            item_rect,
                            egui::CornerRadius::same(2),
                            egui::Color32::from_gray(60),
                        );
                        painter.text(
                            item_rect.center(),
                            egui::Align2::CENTER_CENTER,
                            &item.name,
                            egui::FontId::proportional(12.0),
                            egui::Color32::from_gray(200),
                        );
                    }
                }

                if !editable {
                    continue;
                }
                let response = ui.interact(
                    item_rect,
                    egui::Id::new(("viewport-item", &item.id)),
                    egui::Sense::drag(),
                );
                if response.dragged() {
                    let entry = self.pending_moves.entry(item.id.clone()).or_default();
                    *entry += response.drag_delta();
                }
                if response.drag_stopped() {
                    if let Some(delta) = self.pending_moves.remove(&item.id) {
                        out.push(EditorAction::MoveImage {
                            scene_id: scene.id.clone(),
                            layer: layer.kind,
                            item_id: item.id.clone(),
                            x: item.x + delta.x / scale,
                            y: item.y + delta.y / scale,
                        });
                    }
                }
            }
        }
    }
}
