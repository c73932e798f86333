//! Application window and event loop handler.
//!
//! This module manages the main window and bridges winit events to the
//! editor's internal bus.

use std::sync::Arc;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowId};

use crate::input::events::EditorAction;
use crate::render::renderer::Renderer;
use crate::system::bus::{EditorBus, SystemEvent};

/// Main application struct handling window events.
pub struct App {
    bus: EditorBus,
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
}

impl App {
    /// Creates a new application instance.
    pub fn new(bus: EditorBus) -> Self {
        Self {
            bus,
            window: None,
            renderer: None,
        }
    }

    /// Runs the application event loop (blocking).
    pub fn run(bus: EditorBus) {
        let event_loop = winit::event_loop::EventLoop::new().unwrap();
        event_loop.set_control_flow(winit::event_loop::ControlFlow::Poll);

        let mut app = App::new(bus);
        let _ = event_loop.run_app(&mut app);
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            log::info!("RENDER: Creating window...");
            let win_attr = winit::window::Window::default_attributes()
                .with_title("fabler")
                .with_inner_size(winit::dpi::LogicalSize::new(1440.0, 860.0));

            let window = Arc::new(event_loop.create_window(win_attr).unwrap());
            self.window = Some(window.clone());

            log::info!("RENDER: Initializing WGPU...");
            let renderer = pollster::block_on(Renderer::new(window.clone()));
            self.renderer = Some(renderer);

            window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(renderer) = self.renderer.as_mut()
            && let Some(window) = self.window.as_ref()
            && renderer.handle_event(window, &event)
        {
            return;
        }

        match event {
            // Files dropped on the window become catalog assets. Reading
            // happens here so the logic thread only ever sees bytes.
            WindowEvent::DroppedFile(path) => match std::fs::read(&path) {
                Ok(bytes) => {
                    let name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| "dropped".to_string());
                    let _ = self
                        .bus
                        .action_tx
                        .send(EditorAction::IngestAsset { name, bytes });
                }
                Err(e) => log::warn!("RENDER: Could not read dropped file {path:?}: {e}"),
            },
            WindowEvent::CloseRequested => {
                log::info!("RENDER: Close requested");
                let _ = self.bus.sys_tx.send(SystemEvent::Quit);
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.resize(physical_size);
                }
                let _ = self.bus.sys_tx.send(SystemEvent::Resize {
                    width: physical_size.width,
                    height: physical_size.height,
                });
            }
            WindowEvent::RedrawRequested => {
                if let Some(window) = self.window.as_ref() {
                    // Latest snapshot from the logic thread.
                    if let Some(snapshot) = self.bus.render_rx.try_iter().last()
                        && let Some(renderer) = self.renderer.as_mut()
                    {
                        renderer.update_state(snapshot);
                    }

                    // Render and forward UI actions to logic.
                    if let Some(renderer) = self.renderer.as_mut() {
                        match renderer.render(window) {
                            Ok(actions) => {
                                for action in actions {
                                    let _ = self.bus.action_tx.send(action);
                                }
                            }
                            // Surface lost or outdated - reconfigure
                            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                                renderer.resize(window.inner_size());
                            }
                            Err(wgpu::SurfaceError::OutOfMemory) => {
                                log::error!("Render error: Out of memory!");
                                event_loop.exit();
                            }
                            Err(wgpu::SurfaceError::Timeout) => {
                                log::warn!("Render timeout - frame dropped");
                            }
                            #[allow(unreachable_patterns)]
                            Err(e) => log::error!("Render error: {e:?}"),
                        }
                    }
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}
