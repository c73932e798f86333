//! Playable preview: the scene drawn full-window with a dialogue box over
//! it, advancing line by line and branching on choices.

use crate::input::events::EditorAction;
use crate::render::textures::TextureCache;
use crate::shared::snapshot::PreviewSnapshot;
use crate::views::viewport::ViewportView;

pub struct PlaybackView {
    /// Reuses the viewport painter in read-only mode.
    stage: ViewportView,
}

impl PlaybackView {
    pub fn new() -> Self {
        Self {
            stage: ViewportView::new(),
        }
    }

    pub fn show(
        &mut self,
        ctx: &egui::Context,
        snap: &PreviewSnapshot,
        textures: &mut TextureCache,
        out: &mut Vec<EditorAction>,
    ) {
        egui::TopBottomPanel::bottom("dialogue-box")
            .min_height(110.0)
            .show(ctx, |ui| {
                if snap.at_choices {
                    self.choices(ui, snap, out);
                } else {
                    self.dialogue(ui, snap, out);
                }
                if ui.small_button("Stop preview").clicked()
                    || ui.input(|i| i.key_pressed(egui::Key::Escape))
                {
                    out.push(EditorAction::ExitPreview);
                }
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.strong(&snap.scene.name);
            let (rect, _) =
                ui.allocate_exact_size(ui.available_size(), egui::Sense::hover());
            self.stage
                .draw_scene(ui, rect, &snap.scene, &snap.assets, textures, false, out);
        });
    }

    fn dialogue(&self, ui: &mut egui::Ui, snap: &PreviewSnapshot, out: &mut Vec<EditorAction>) {
        match snap.scene.dialogue.get(snap.line) {
            Some(line) => {
                if !line.speaker.is_empty() {
                    ui.strong(&line.speaker);
                }
                ui.label(&line.text);
                if ui.button("Next").clicked()
                    || ui.input(|i| i.key_pressed(egui::Key::Space))
                {
                    out.push(EditorAction::PreviewAdvance);
                }
            }
            None => {
                // Empty scene: jump straight to choices next snapshot.
                if ui.button("Continue").clicked() {
                    out.push(EditorAction::PreviewAdvance);
                }
            }
        }
    }

    fn choices(&self, ui: &mut egui::Ui, snap: &PreviewSnapshot, out: &mut Vec<EditorAction>) {
        if snap.scene.choices.is_empty() {
            ui.weak("The story ends here.");
            return;
        }
        ui.weak("What happens next?");
        for choice in &snap.scene.choices {
            if ui.button(&choice.label).clicked() {
                out.push(EditorAction::PreviewChoose(choice.id.clone()));
            }
        }
    }
}
