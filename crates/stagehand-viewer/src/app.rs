//! Main viewer application: wgpu surface, egui panels and the viewport overlay

use crate::context::RenderContext;
use crate::overlay::{clear_color, paint_frame};
use crate::panels::{operations_panel, LightsPanel, OperationAction, OperationsView};
use crate::screenshot;
use anyhow::{Context, Result};
use stagehand_interact::frame::BACKGROUND;
use stagehand_interact::{PointerButton, PointerKind, ViewerConfig, Viewport};
use stagehand_scene::{SceneGraph, SceneMetadata};
use std::sync::Arc;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowId};

/// Open a window on the scene and run until it is closed
pub fn run(graph: SceneGraph, metadata: SceneMetadata, config: ViewerConfig) -> Result<()> {
    let size = [config.window.width as f32, config.window.height as f32];
    log::info!("opening viewer on scene '{}'", metadata.name);
    let viewport = Viewport::with_orbit_controls(graph, metadata, config, size)
        .context("Failed to set up the viewport")?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = ViewerApp::new(viewport);
    event_loop.run_app(&mut app)?;

    Ok(())
}

struct ViewerApp {
    viewport: Viewport,
    window: Option<Arc<Window>>,
    render_context: Option<RenderContext>,

    cursor: [f32; 2],

    egui_ctx: egui::Context,
    egui_winit: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,

    show_panels: bool,
    lights_panel: LightsPanel,
    last_screenshot: Option<String>,
}

impl ViewerApp {
    fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            window: None,
            render_context: None,
            cursor: [0.0, 0.0],
            egui_ctx: egui::Context::default(),
            egui_winit: None,
            egui_renderer: None,
            show_panels: true,
            lights_panel: LightsPanel::new(),
            last_screenshot: None,
        }
    }

    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let settings = &self.viewport.config().window;
        let window_attrs = Window::default_attributes()
            .with_title(settings.title.clone())
            .with_inner_size(PhysicalSize::new(settings.width, settings.height));

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .context("Failed to create viewer window")?,
        );
        self.window = Some(window.clone());

        let render_context = pollster::block_on(RenderContext::new(window.clone()))
            .context("Failed to initialize viewer render context")?;
        self.viewport
            .resize(render_context.size.width as f32, render_context.size.height as f32);

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        let egui_renderer = egui_wgpu::Renderer::new(
            &render_context.device,
            render_context.config.format,
            None,
            1,
            false,
        );

        self.render_context = Some(render_context);
        self.egui_winit = Some(egui_winit);
        self.egui_renderer = Some(egui_renderer);

        Ok(())
    }

    fn render(&mut self) {
        let (Some(window), Some(context), Some(egui_winit)) =
            (self.window.clone(), self.render_context.as_ref(), self.egui_winit.as_mut())
        else {
            return;
        };

        let output = match context.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => return,
            Err(e) => {
                log::warn!("surface error: {:?}", e);
                return;
            }
        };
        let target_view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let raw_input = egui_winit.take_egui_input(&window);

        // Snapshot what the panels show so the closure only borrows disjoint fields
        let frame = self.viewport.frame();
        let active_camera = self.viewport.rigs().active().name.clone();
        let rig_yaw = self.viewport.rig_yaw();
        let last_screenshot = self.last_screenshot.clone();
        let show_panels = self.show_panels;

        let viewport = &mut self.viewport;
        let lights_panel = &mut self.lights_panel;
        let mut light_edits = Vec::new();
        let mut actions = Vec::new();

        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            let painter = ctx.layer_painter(egui::LayerId::new(
                egui::Order::Background,
                egui::Id::new("scene_overlay"),
            ));
            paint_frame(&painter, &frame, ctx.pixels_per_point());

            if !show_panels {
                return;
            }

            egui::SidePanel::left("lights_panel")
                .default_width(240.0)
                .resizable(true)
                .show(ctx, |ui| {
                    light_edits = lights_panel.ui(ui, viewport.graph());
                });

            egui::SidePanel::right("operations_panel")
                .default_width(220.0)
                .resizable(true)
                .show(ctx, |ui| {
                    let view = OperationsView {
                        active_camera: &active_camera,
                        rig_yaw,
                        last_screenshot: last_screenshot.as_deref(),
                    };
                    actions = operations_panel(ui, viewport.selection_mut(), &view);
                });
        });

        egui_winit.handle_platform_output(&window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [context.config.width, context.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        let Some(mut egui_renderer) = self.egui_renderer.take() else {
            return;
        };

        let mut encoder = context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui Encoder"),
            });

        for (id, image_delta) in &full_output.textures_delta.set {
            egui_renderer.update_texture(&context.device, &context.queue, *id, image_delta);
        }

        egui_renderer.update_buffers(
            &context.device,
            &context.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Viewer Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color(BACKGROUND)),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            let mut render_pass = render_pass.forget_lifetime();
            egui_renderer.render(&mut render_pass, &paint_jobs, &screen_descriptor);
        }

        context.queue.submit(std::iter::once(encoder.finish()));

        for id in &full_output.textures_delta.free {
            egui_renderer.free_texture(id);
        }
        self.egui_renderer = Some(egui_renderer);

        output.present();

        // Panel results are applied after the frame to keep egui's borrows short
        for (light, edit) in light_edits {
            if let Err(e) = self.viewport.edit_light(light, edit) {
                log::warn!("light edit rejected: {}", e);
            }
        }
        for action in actions {
            self.apply_action(action);
        }
    }

    fn apply_action(&mut self, action: OperationAction) {
        match action {
            OperationAction::CycleCamera => self.viewport.cycle_camera(),
            OperationAction::RotateRig(yaw) => {
                if let Err(e) = self.viewport.set_rig_yaw(yaw) {
                    log::warn!("could not rotate camera rig: {}", e);
                }
            }
            OperationAction::Screenshot => {
                match screenshot::capture(&self.viewport, &self.viewport.config().screenshot) {
                    Ok(path) => self.last_screenshot = Some(path.display().to_string()),
                    Err(e) => log::error!("screenshot failed: {}", e),
                }
            }
        }
    }
}

fn pointer_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Primary),
        MouseButton::Right => Some(PointerButton::Secondary),
        MouseButton::Middle => Some(PointerButton::Middle),
        _ => None,
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.initialize(event_loop) {
                log::error!("Failed to initialize viewer: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // Let egui handle the event first
        if let (Some(egui_winit), Some(window)) = (&mut self.egui_winit, &self.window) {
            let response = egui_winit.on_window_event(window, &event);
            if response.consumed && !self.viewport.drag().is_dragging() {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                self.viewport.dispose();
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                if let Some(context) = &mut self.render_context {
                    context.resize(new_size);
                    self.viewport
                        .resize(context.size.width as f32, context.size.height as f32);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed || event.repeat {
                    return;
                }
                match &event.logical_key {
                    Key::Named(NamedKey::Escape) => {
                        self.viewport.dispose();
                        event_loop.exit();
                    }
                    Key::Named(NamedKey::Tab) => {
                        self.show_panels = !self.show_panels;
                    }
                    Key::Character(text) => {
                        if let Some(key) = text.chars().next() {
                            self.viewport.key_pressed(key);
                        }
                    }
                    _ => {}
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = [position.x as f32, position.y as f32];
                let [x, y] = self.cursor;
                self.viewport
                    .dispatch(PointerKind::Move, PointerButton::Primary, x, y);
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let Some(button) = pointer_button(button) else {
                    return;
                };
                let kind = match state {
                    ElementState::Pressed => PointerKind::Down,
                    ElementState::Released => PointerKind::Up,
                };
                let [x, y] = self.cursor;
                self.viewport.dispatch(kind, button, x, y);
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                };
                self.viewport.wheel(lines);
            }

            WindowEvent::RedrawRequested => {
                self.render();
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}
