//! High-level rendering pipeline orchestrating the egui views.

use std::sync::Arc;

use winit::event::WindowEvent;
use winit::window::Window;

use crate::input::events::{DragEvent, EditorAction};
use crate::render::context::RenderContext;
use crate::render::textures::TextureCache;
use crate::render::ui::UiLayer;
use crate::shared::snapshot::RenderState;
use crate::views::graph::GraphView;
use crate::views::playback::PlaybackView;
use crate::views::sidebar::SidebarView;
use crate::views::viewport::ViewportView;

pub struct Renderer {
    pub ctx: RenderContext,
    ui: UiLayer,
    textures: TextureCache,
    current_state: RenderState,
    sidebar: SidebarView,
    viewport: ViewportView,
    graph: GraphView,
    playback: PlaybackView,
}

impl Renderer {
    pub async fn new(window: Arc<Window>) -> Self {
        let ctx = RenderContext::new(window.clone()).await;
        let ui = UiLayer::new(window, &ctx.device, ctx.config.format);

        Self {
            ctx,
            ui,
            textures: TextureCache::new(),
            current_state: RenderState::Empty,
            sidebar: SidebarView::new(),
            viewport: ViewportView::new(),
            graph: GraphView::new(),
            playback: PlaybackView::new(),
        }
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.ctx.resize(new_size);
    }

    pub fn handle_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        self.ui.handle_input(window, event)
    }

    pub fn update_state(&mut self, new_state: RenderState) {
        // An import may have replaced the catalog; drop stale textures.
        if let RenderState::Editor(snap) = &new_state {
            self.textures.retain_known(&snap.assets);
        }
        self.current_state = new_state;
    }

    pub fn render(&mut self, window: &Window) -> Result<Vec<EditorAction>, wgpu::SurfaceError> {
        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Main Encoder"),
            });

        self.ui.begin_frame(window);
        let ctx_egui = self.ui.ctx.clone();
        let mut actions = Vec::new();

        match &self.current_state {
            RenderState::Empty => {}
            RenderState::Editor(snap) => {
                self.sidebar.show(&ctx_egui, snap, &mut actions);
                if snap.graph_mode {
                    self.graph.show(&ctx_egui, snap, &mut actions);
                } else {
                    self.viewport
                        .show(&ctx_egui, snap, &mut self.textures, &mut actions);
                }

                // A release outside every drop target ends the gesture as
                // a cancel; any zone that took the release already queued
                // its terminal event above.
                let released = ctx_egui.input(|i| i.pointer.any_released());
                if released
                    && egui::DragAndDrop::has_any_payload(&ctx_egui)
                    && !actions.iter().any(is_terminal_drag_event)
                {
                    actions.push(EditorAction::Drag(DragEvent::Cancel));
                }
            }
            RenderState::Preview(snap) => {
                self.playback
                    .show(&ctx_egui, snap, &mut self.textures, &mut actions);
            }
        }

        self.ui.end_frame_and_draw(&self.ctx, &mut encoder, &view);
        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(actions)
    }
}

fn is_terminal_drag_event(action: &EditorAction) -> bool {
    matches!(
        action,
        EditorAction::Drag(
            DragEvent::Drop { .. } | DragEvent::DropOnContainer { .. } | DragEvent::Cancel
        )
    )
}
