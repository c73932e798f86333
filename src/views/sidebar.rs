//! Scene tree sidebar: the editing surface for dialogue, image items and
//! choices, and the source/target of every drag gesture.
//!
//! Dialogue and image rows are drag sources and drop slots; section frames
//! are container drop zones. Widget gestures are reduced to normalized
//! [`DragEvent`]s here; the state machine on the logic thread never sees
//! egui. Overlapping release targets may each emit a terminal event; the
//! logic thread lets the first one win, so no deduplication happens here.

use std::collections::HashMap;

use crate::input::events::{
    DragEvent, EditorAction, ItemAddress, ItemKind, SectionId,
};
use crate::models::scene::{Dialogue, ImageItem, Layer, LayerKind, Scene};
use crate::shared::snapshot::EditorSnapshot;
use crate::views::{AssetPayload, DragPayload};

struct DraftDialogue {
    scene_id: String,
    /// `Some` when editing an existing line.
    dialogue_id: Option<String>,
    speaker: String,
    text: String,
}

pub struct SidebarView {
    draft_scene: Option<String>,
    draft_dialogue: Option<DraftDialogue>,
    project_name: String,
    path_field: String,
    assets_open: bool,
    /// Previous-frame hover per section, for enter/leave transitions.
    section_hover: HashMap<SectionId, bool>,
}

impl SidebarView {
    pub fn new() -> Self {
        Self {
            draft_scene: None,
            draft_dialogue: None,
            project_name: String::new(),
            path_field: "story.json".to_string(),
            assets_open: false,
            section_hover: HashMap::new(),
        }
    }

    pub fn show(
        &mut self,
        ctx: &egui::Context,
        snap: &EditorSnapshot,
        out: &mut Vec<EditorAction>,
    ) {
        egui::SidePanel::left("sidebar")
            .default_width(340.0)
            .show(ctx, |ui| {
                self.header(ui, snap, out);
                ui.separator();

                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.asset_palette(ui, snap, out);
                    ui.separator();
                    self.scene_list(ui, snap, out);
                });

                ui.separator();
                self.footer(ui, snap, out);
            });
    }

    fn header(&mut self, ui: &mut egui::Ui, snap: &EditorSnapshot, out: &mut Vec<EditorAction>) {
        // Local echo of the name so typing is not fighting the snapshot.
        if !ui.memory(|m| m.has_focus(egui::Id::new("project-name"))) {
            self.project_name = snap.project_name.clone();
        }
        let name_edit = egui::TextEdit::singleline(&mut self.project_name)
            .id(egui::Id::new("project-name"))
            .hint_text("Story name");
        if ui.add(name_edit).changed() {
            out.push(EditorAction::SetProjectName(self.project_name.clone()));
        }

        ui.horizontal(|ui| {
            let mut graph_mode = snap.graph_mode;
            if ui.checkbox(&mut graph_mode, "Graph mode").changed() {
                out.push(EditorAction::SetGraphMode(graph_mode));
            }
            if ui.button("Play").clicked() {
                out.push(EditorAction::EnterPreview);
            }
        });
    }

    // ------------------------------------------------------------------
    // Asset palette
    // ------------------------------------------------------------------

    fn asset_palette(
        &mut self,
        ui: &mut egui::Ui,
        snap: &EditorSnapshot,
        _out: &mut Vec<EditorAction>,
    ) {
        let label = format!("Assets ({})", snap.assets.len());
        if ui.selectable_label(self.assets_open, label).clicked() {
            self.assets_open = !self.assets_open;
        }
        if !self.assets_open {
            return;
        }

        if snap.assets.is_empty() {
            ui.weak("Drop image files on the window to add assets.");
            return;
        }
        for (reference, entry) in snap.assets.iter() {
            let payload = AssetPayload {
                url: reference.clone(),
                name: entry.name.clone(),
            };
            ui.dnd_drag_source(egui::Id::new(("asset", reference)), payload, |ui| {
                ui.horizontal(|ui| {
                    ui.label(&entry.name);
                    ui.weak(format!("{}x{}", entry.width, entry.height));
                });
            });
        }
        ui.weak("Drag an asset onto a layer to place it.");
    }

    // ------------------------------------------------------------------
    // Scenes
    // ------------------------------------------------------------------

    fn scene_list(&mut self, ui: &mut egui::Ui, snap: &EditorSnapshot, out: &mut Vec<EditorAction>) {
        ui.horizontal(|ui| {
            ui.strong("Scenes");
            if ui.small_button("+").clicked() && self.draft_scene.is_none() {
                self.draft_scene = Some(String::new());
            }
        });

        let mut committed = None;
        let mut cancelled = false;
        if let Some(name) = &mut self.draft_scene {
            let response = ui.add(
                egui::TextEdit::singleline(name)
                    .hint_text("Scene name")
                    .desired_width(f32::INFINITY),
            );
            if name.is_empty() && !response.has_focus() {
                response.request_focus();
            }
            let confirmed =
                response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if confirmed && !name.trim().is_empty() {
                committed = Some(name.trim().to_string());
            } else if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                cancelled = true;
            }
        }
        if let Some(name) = committed {
            out.push(EditorAction::AddScene { name });
            self.draft_scene = None;
        } else if cancelled {
            self.draft_scene = None;
        }

        for scene_id in &snap.display_order {
            let Some(scene) = snap.scenes.get(scene_id) else {
                continue;
            };
            let selected = snap.selected_scene.as_deref() == Some(scene_id.as_str());
            if ui.selectable_label(selected, &scene.name).clicked() {
                out.push(EditorAction::SelectScene(scene_id.clone()));
            }
            ui.indent(egui::Id::new(("scene", scene_id)), |ui| {
                self.dialogue_section(ui, scene, snap, out);
                self.images_section(ui, scene, snap, out);
                self.choices_section(ui, scene, snap, out);
            });
        }
    }

    // ------------------------------------------------------------------
    // Dialogue section
    // ------------------------------------------------------------------

    fn dialogue_section(
        &mut self,
        ui: &mut egui::Ui,
        scene: &Scene,
        snap: &EditorSnapshot,
        out: &mut Vec<EditorAction>,
    ) {
        let sid = SectionId::dialogue(&scene.id);
        let open = snap.open_sections.contains(&sid);

        let frame = egui::Frame::group(ui.style());
        let response = frame
            .show(ui, |ui| {
                if section_header(ui, open, &format!("Dialogue ({})", scene.dialogue.len())) {
                    out.push(EditorAction::ToggleSection(sid.clone()));
                }
                if !open {
                    return;
                }

                if scene.dialogue.is_empty() {
                    ui.weak("Drop dialogue here");
                }
                for (index, line) in scene.dialogue.iter().enumerate() {
                    self.dialogue_row(ui, scene, line, index, snap, out);
                }
                self.dialogue_draft(ui, scene, snap, out);
            })
            .response;

        self.track_section_hover(&response, &sid, ItemKind::Dialogue, out);

        if released_payload(&response, ItemKind::Dialogue).is_some() {
            out.push(EditorAction::Drag(DragEvent::DropOnContainer {
                scene_id: scene.id.clone(),
                layer: None,
                copy: copy_held(ui),
                section: Some(sid),
            }));
        }
    }

    fn dialogue_row(
        &mut self,
        ui: &mut egui::Ui,
        scene: &Scene,
        line: &Dialogue,
        index: usize,
        snap: &EditorSnapshot,
        out: &mut Vec<EditorAction>,
    ) {
        let dragged = snap
            .drag
            .as_ref()
            .is_some_and(|d| d.kind == ItemKind::Dialogue && d.item_id == line.id);
        let payload = DragPayload {
            kind: ItemKind::Dialogue,
            item_id: line.id.clone(),
        };

        let response = ui
            .dnd_drag_source(egui::Id::new(("dlg", &scene.id, &line.id)), payload, |ui| {
                ui.horizontal(|ui| {
                    let speaker = if line.speaker.is_empty() { "—" } else { &line.speaker };
                    ui.label(egui::RichText::new(speaker).strong());
                    ui.label(shorten(&line.text, 36));
                    if ui.small_button("edit").clicked() {
                        self.draft_dialogue = Some(DraftDialogue {
                            scene_id: scene.id.clone(),
                            dialogue_id: Some(line.id.clone()),
                            speaker: line.speaker.clone(),
                            text: line.text.clone(),
                        });
                    }
                    if ui.small_button("🗑").clicked() {
                        out.push(EditorAction::DeleteItem {
                            kind: ItemKind::Dialogue,
                            scene_id: scene.id.clone(),
                            item_id: line.id.clone(),
                            layer: None,
                        });
                    }
                });
            })
            .response;

        if response.drag_started() {
            out.push(EditorAction::Drag(DragEvent::Pickup {
                kind: ItemKind::Dialogue,
                item_id: line.id.clone(),
                from: ItemAddress::dialogue(&scene.id, index),
            }));
        }
        if !dragged
            && let Some(hovered) = response.dnd_hover_payload::<DragPayload>()
            && hovered.kind == ItemKind::Dialogue
            && hovered.item_id != line.id
        {
            out.push(EditorAction::Drag(DragEvent::Hover {
                at: ItemAddress::dialogue(&scene.id, index),
            }));
        }
        if released_payload(&response, ItemKind::Dialogue).is_some() {
            out.push(EditorAction::Drag(DragEvent::Drop {
                copy: copy_held(ui),
                section: Some(SectionId::dialogue(&scene.id)),
            }));
        }
    }

    fn dialogue_draft(
        &mut self,
        ui: &mut egui::Ui,
        scene: &Scene,
        snap: &EditorSnapshot,
        out: &mut Vec<EditorAction>,
    ) {
        let editing_here = self
            .draft_dialogue
            .as_ref()
            .is_some_and(|d| d.scene_id == scene.id);

        if !editing_here {
            if ui.small_button("+ add dialogue").clicked() {
                self.draft_dialogue = Some(DraftDialogue {
                    scene_id: scene.id.clone(),
                    dialogue_id: None,
                    speaker: String::new(),
                    text: String::new(),
                });
            }
            return;
        }

        let mut done = false;
        if let Some(draft) = self.draft_dialogue.as_mut() {
            ui.horizontal(|ui| {
                ui.add(
                    egui::TextEdit::singleline(&mut draft.speaker)
                        .hint_text("Speaker")
                        .desired_width(90.0),
                );
                if !snap.speakers.is_empty() {
                    egui::ComboBox::from_id_salt(("speaker-pick", &scene.id))
                        .selected_text("…")
                        .width(24.0)
                        .show_ui(ui, |ui| {
                            for speaker in &snap.speakers {
                                if ui.selectable_label(false, speaker).clicked() {
                                    draft.speaker = speaker.clone();
                                }
                            }
                        });
                }
                ui.add(egui::TextEdit::singleline(&mut draft.text).hint_text("Line"));
            });
            let (save, cancel) = ui
                .horizontal(|ui| {
                    (
                        ui.small_button("Save").clicked()
                            || ui.input(|i| i.key_pressed(egui::Key::Enter)),
                        ui.small_button("Cancel").clicked()
                            || ui.input(|i| i.key_pressed(egui::Key::Escape)),
                    )
                })
                .inner;

            if save && !draft.text.trim().is_empty() {
                match &draft.dialogue_id {
                    Some(dialogue_id) => out.push(EditorAction::UpsertDialogue {
                        scene_id: draft.scene_id.clone(),
                        dialogue_id: dialogue_id.clone(),
                        speaker: draft.speaker.clone(),
                        text: draft.text.clone(),
                    }),
                    None => out.push(EditorAction::AddDialogue {
                        scene_id: draft.scene_id.clone(),
                        speaker: draft.speaker.clone(),
                        text: draft.text.clone(),
                    }),
                }
                done = true;
            } else if cancel {
                done = true;
            }
        }
        if done {
            self.draft_dialogue = None;
        }
    }

    // ------------------------------------------------------------------
    // Image sections
    // ------------------------------------------------------------------

    fn images_section(
        &mut self,
        ui: &mut egui::Ui,
        scene: &Scene,
        snap: &EditorSnapshot,
        out: &mut Vec<EditorAction>,
    ) {
        let sid = SectionId::images(&scene.id);
        let open = snap.open_sections.contains(&sid);
        let count: usize = scene.layers.iter().map(|l| l.items.len()).sum();

        let frame = egui::Frame::group(ui.style());
        let response = frame
            .show(ui, |ui| {
                if section_header(ui, open, &format!("Image Assets ({count})")) {
                    out.push(EditorAction::ToggleSection(sid.clone()));
                }
                if !open {
                    return;
                }
                for layer in &scene.layers {
                    self.layer_section(ui, scene, layer, snap, out);
                }
            })
            .response;

        self.track_section_hover(&response, &sid, ItemKind::Image, out);
        // Releases land on the inner layer frames; the outer section only
        // coordinates open/close.
    }

    fn layer_section(
        &mut self,
        ui: &mut egui::Ui,
        scene: &Scene,
        layer: &Layer,
        snap: &EditorSnapshot,
        out: &mut Vec<EditorAction>,
    ) {
        let sid = SectionId::layer(&scene.id, layer.kind);
        let open = snap.open_sections.contains(&sid);

        let frame = egui::Frame::group(ui.style());
        let response = frame
            .show(ui, |ui| {
                let title = format!("{} ({})", layer.display_name(), layer.items.len());
                if section_header(ui, open, &title) {
                    out.push(EditorAction::ToggleSection(sid.clone()));
                }
                if !open {
                    return;
                }
                if layer.items.is_empty() {
                    ui.weak("Drop images here");
                }
                for (index, item) in layer.items.iter().enumerate() {
                    self.image_row(ui, scene, layer.kind, item, index, snap, out);
                }
            })
            .response;

        self.track_section_hover(&response, &sid, ItemKind::Image, out);

        if released_payload(&response, ItemKind::Image).is_some() {
            out.push(EditorAction::Drag(DragEvent::DropOnContainer {
                scene_id: scene.id.clone(),
                layer: Some(layer.kind),
                copy: copy_held(ui),
                section: Some(sid.clone()),
            }));
        }
        // Palette assets become fresh items on release.
        if let Some(asset) = response.dnd_release_payload::<AssetPayload>() {
            out.push(EditorAction::PlaceAsset {
                scene_id: scene.id.clone(),
                layer: layer.kind,
                url: asset.url.clone(),
                name: asset.name.clone(),
            });
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn image_row(
        &mut self,
        ui: &mut egui::Ui,
        scene: &Scene,
        kind: LayerKind,
        item: &ImageItem,
        index: usize,
        snap: &EditorSnapshot,
        out: &mut Vec<EditorAction>,
    ) {
        let dragged = snap
            .drag
            .as_ref()
            .is_some_and(|d| d.kind == ItemKind::Image && d.item_id == item.id);
        let payload = DragPayload {
            kind: ItemKind::Image,
            item_id: item.id.clone(),
        };

        let response = ui
            .dnd_drag_source(egui::Id::new(("img", &scene.id, &item.id)), payload, |ui| {
                ui.horizontal(|ui| {
                    let label = if item.name.is_empty() { &item.url } else { &item.name };
                    ui.label(shorten(label, 28));
                    ui.weak(format!("({:.0}, {:.0})", item.x, item.y));
                    if ui.small_button("🗑").clicked() {
                        out.push(EditorAction::DeleteItem {
                            kind: ItemKind::Image,
                            scene_id: scene.id.clone(),
                            item_id: item.id.clone(),
                            layer: Some(kind),
                        });
                    }
                });
            })
            .response;

        if response.drag_started() {
            out.push(EditorAction::Drag(DragEvent::Pickup {
                kind: ItemKind::Image,
                item_id: item.id.clone(),
                from: ItemAddress::image(&scene.id, kind, index),
            }));
        }
        if !dragged
            && let Some(hovered) = response.dnd_hover_payload::<DragPayload>()
            && hovered.kind == ItemKind::Image
            && hovered.item_id != item.id
        {
            out.push(EditorAction::Drag(DragEvent::Hover {
                at: ItemAddress::image(&scene.id, kind, index),
            }));
        }
        if released_payload(&response, ItemKind::Image).is_some() {
            out.push(EditorAction::Drag(DragEvent::Drop {
                copy: copy_held(ui),
                section: Some(SectionId::layer(&scene.id, kind)),
            }));
        }
    }

    // ------------------------------------------------------------------
    // Choices
    // ------------------------------------------------------------------

    fn choices_section(
        &mut self,
        ui: &mut egui::Ui,
        scene: &Scene,
        snap: &EditorSnapshot,
        out: &mut Vec<EditorAction>,
    ) {
        egui::CollapsingHeader::new(format!("Choices ({})", scene.choices.len()))
            .id_salt(("choices", &scene.id))
            .show(ui, |ui| {
                for choice in &scene.choices {
                    let target_name = snap
                        .scenes
                        .get(&choice.next_scene_id)
                        .map(|s| s.name.clone());
                    ui.horizontal(|ui| {
                        match target_name {
                            Some(name) => {
                                ui.label(format!("{} → {name}", choice.label));
                            }
                            None => {
                                ui.colored_label(
                                    egui::Color32::LIGHT_RED,
                                    format!("{} → {} (missing)", choice.label, choice.next_scene_id),
                                );
                            }
                        }
                        if ui.small_button("🗑").clicked() {
                            out.push(EditorAction::DeleteChoice {
                                scene_id: scene.id.clone(),
                                choice_id: choice.id.clone(),
                            });
                        }
                    });
                }

                // Scenes not already wired and not this one.
                egui::ComboBox::from_id_salt(("add-choice", &scene.id))
                    .selected_text("Add choice...")
                    .show_ui(ui, |ui| {
                        for target_id in &snap.display_order {
                            if target_id == &scene.id
                                || scene.choices.iter().any(|c| &c.next_scene_id == target_id)
                            {
                                continue;
                            }
                            let Some(target) = snap.scenes.get(target_id) else {
                                continue;
                            };
                            if ui.selectable_label(false, &target.name).clicked() {
                                out.push(EditorAction::AddChoice {
                                    scene_id: scene.id.clone(),
                                    label: target.name.clone(),
                                    next_scene_id: target_id.clone(),
                                });
                            }
                        }
                    });
            });
    }

    // ------------------------------------------------------------------
    // Footer
    // ------------------------------------------------------------------

    fn footer(&mut self, ui: &mut egui::Ui, snap: &EditorSnapshot, out: &mut Vec<EditorAction>) {
        ui.horizontal(|ui| {
            ui.add(
                egui::TextEdit::singleline(&mut self.path_field)
                    .hint_text("story.json")
                    .desired_width(160.0),
            );
            if ui.button("Import").clicked() {
                out.push(EditorAction::ImportProject(self.path_field.clone().into()));
            }
            if ui.button("Export").clicked() {
                out.push(EditorAction::ExportProject(self.path_field.clone().into()));
            }
        });
        if ui.button("New story").clicked() {
            out.push(EditorAction::NewProject);
        }
        if let Some(status) = &snap.status {
            ui.weak(status);
        }
    }

    /// Emits debounced-upstream enter/leave events on hover transitions.
    fn track_section_hover(
        &mut self,
        response: &egui::Response,
        sid: &SectionId,
        accepts: ItemKind,
        out: &mut Vec<EditorAction>,
    ) {
        let hovering = response
            .dnd_hover_payload::<DragPayload>()
            .is_some_and(|p| p.kind == accepts);
        let was_hovering = self
            .section_hover
            .insert(sid.clone(), hovering)
            .unwrap_or(false);
        if hovering && !was_hovering {
            out.push(EditorAction::Drag(DragEvent::EnterSection(sid.clone())));
        } else if !hovering && was_hovering {
            out.push(EditorAction::Drag(DragEvent::LeaveSection(sid.clone())));
        }
    }
}

/// Clickable section header; returns true when toggled.
fn section_header(ui: &mut egui::Ui, open: bool, title: &str) -> bool {
    let arrow = if open { "▼" } else { "▶" };
    ui.selectable_label(false, format!("{arrow} {title}")).clicked()
}

fn copy_held(ui: &egui::Ui) -> bool {
    ui.input(|i| i.modifiers.alt)
}

/// Release of a matching managed-item payload over this response.
fn released_payload(
    response: &egui::Response,
    accepts: ItemKind,
) -> Option<std::sync::Arc<DragPayload>> {
    response
        .dnd_release_payload::<DragPayload>()
        .filter(|p| p.kind == accepts)
}

fn shorten(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{cut}…")
    }
}
