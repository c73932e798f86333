//! Thin layer wrapping egui input collection and draw submission.
//!
//! The whole editor is egui; this module only owns the plumbing between
//! winit events, the egui context and the wgpu pass that paints it.

use egui_wgpu::{Renderer as EguiRenderer, RendererOptions};
use egui_winit::State as EguiState;
use std::sync::Arc;
use wgpu::{Device, TextureFormat};
use winit::event::WindowEvent;
use winit::window::Window;

use crate::render::context::RenderContext;

pub struct UiLayer {
    pub ctx: egui::Context,
    state: EguiState,
    renderer: EguiRenderer,
}

impl UiLayer {
    pub fn new(window: Arc<Window>, device: &Device, output_format: TextureFormat) -> Self {
        let ctx = egui::Context::default();
        let state = EguiState::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        let renderer = EguiRenderer::new(
            device,
            output_format,
            RendererOptions {
                depth_stencil_format: None,
                ..Default::default()
            },
        );

        Self {
            ctx,
            state,
            renderer,
        }
    }

    pub fn handle_input(&mut self, window: &Window, event: &WindowEvent) -> bool {
        self.state.on_window_event(window, event).consumed
    }

    pub fn begin_frame(&mut self, window: &Window) {
        let raw_input = self.state.take_egui_input(window);
        self.ctx.begin_pass(raw_input);
    }

    pub fn end_frame_and_draw(
        &mut self,
        ctx: &RenderContext,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
    ) {
        let full_output = self.ctx.end_pass();

        self.state
            .handle_platform_output(&ctx.window, full_output.platform_output);

        let tris = self
            .ctx
            .tessellate(full_output.shapes, ctx.window.scale_factor() as f32);

        for (id, image) in &full_output.textures_delta.set {
            self.renderer
                .update_texture(&ctx.device, &ctx.queue, *id, image);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [ctx.config.width, ctx.config.height],
            pixels_per_point: ctx.window.scale_factor() as f32,
        };

        self.renderer
            .update_buffers(&ctx.device, &ctx.queue, encoder, &tris, &screen_descriptor);

        let mut render_pass = encoder
            .begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Egui Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        // There is no layer beneath the UI; clear to the
                        // workspace background.
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.06,
                            g: 0.06,
                            b: 0.08,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            })
            .forget_lifetime();

        self.renderer
            .render(&mut render_pass, &tris, &screen_descriptor);
        drop(render_pass);

        for id in &full_output.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }
}
