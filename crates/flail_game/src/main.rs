//! Flail Demo -- main loop and application entry point.
//!
//! Architecture: winit drives the event loop via `ApplicationHandler`; all
//! per-frame work runs inside `RedrawRequested`:
//!
//!   1. `FrameClock::begin_frame()` -- measure the wall-clock delta
//!   2. fold pending input into quit events and the pointer position
//!   3. `DemoWorld::update(dt, mouse)` -- advance the flail, re-aim the weapon
//!   4. rebuild the quad mesh (crosshair, chain, two sprites), stream it
//!      into GPU buffers, render, present
//!
//! Simulation is variable-timestep on purpose: both bodies derive their
//! placement from closed-form angle math, so there is nothing a fixed step
//! would stabilize.
//!
//! The demo config is watched via mtime polling and reloaded at frame
//! boundaries; a reload rebuilds both bodies from the new tunables.

mod assets;
mod mesh;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use glam::Vec2;
use wgpu::util::DeviceExt;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use assets::{AssetTable, SPIKEBALL_ASSET, WEAPON_ASSET, WHITE_ASSET};
use flail_core::config::{load_config_from_path, ConfigWatcher, DemoConfig};
use flail_core::input::{InputState, Key};
use flail_core::time::FrameClock;
use flail_core::world::{DemoWorld, WorldEvent, SCREEN_SIZE};
use flail_platform::window::PlatformConfig;
use flail_render::{GpuContext, ScreenCamera, SpritePipeline, SpriteVertex};
use mesh::{DrawCall, SceneMesh};

const CONFIG_PATH: &str = "assets/config/flail_demo.json";

const SPRITE_TINT: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
const CROSSHAIR_COLOR: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
const CHAIN_OUTER_COLOR: [f32; 4] = [0.66, 0.66, 0.66, 1.0];
const CHAIN_INNER_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
const CHAIN_OUTER_WIDTH: f32 = 3.0;
const CHAIN_INNER_WIDTH: f32 = 1.0;
const CROSSHAIR_WIDTH: f32 = 1.0;

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 1.0,
};

/// All mutable demo state. Constructed lazily in
/// `ApplicationHandler::resumed` once the window and GPU surface exist.
struct DemoState {
    window: Arc<Window>,
    gpu: GpuContext,
    clock: FrameClock,
    input: InputState,
    camera: ScreenCamera,
    sprite_pipeline: SpritePipeline,
    assets: AssetTable,

    config_path: PathBuf,
    config_watcher: ConfigWatcher,
    config: DemoConfig,
    world: DemoWorld,

    // The quad mesh is rebuilt on the CPU each frame, then streamed into
    // these buffers. Buffers grow (power-of-two) but never shrink.
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    mesh_vertex_capacity: usize,
    mesh_index_capacity: usize,
    draw_calls: Vec<DrawCall>,
}

impl DemoState {
    fn new(window: Arc<Window>, config: DemoConfig) -> Self {
        let gpu = GpuContext::new(window.clone());
        let clock = FrameClock::new();
        let input = InputState::new();
        let sprite_pipeline = SpritePipeline::new(&gpu.device, gpu.surface_format);
        let camera = ScreenCamera::new(SCREEN_SIZE.x, SCREEN_SIZE.y);

        let assets = AssetTable::load(&gpu.device, &gpu.queue, &sprite_pipeline, &config)
            .unwrap_or_else(|err| panic!("Failed to load startup sprites: {err}"));
        let world = build_world(&config, &assets);

        let camera_uniform = camera.build_uniform();
        let camera_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Uniform Buffer"),
                contents: bytemuck::cast_slice(&[camera_uniform]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let camera_bind_group =
            sprite_pipeline.create_camera_bind_group(&gpu.device, &camera_buffer);
        let vertex_buffer = create_vertex_buffer(&gpu.device, 1);
        let index_buffer = create_index_buffer(&gpu.device, 1);

        let config_path = PathBuf::from(CONFIG_PATH);
        let config_watcher = ConfigWatcher::new(config_path.clone());

        Self {
            window,
            gpu,
            clock,
            input,
            camera,
            sprite_pipeline,
            assets,
            config_path,
            config_watcher,
            config,
            world,
            vertex_buffer,
            index_buffer,
            camera_buffer,
            camera_bind_group,
            mesh_vertex_capacity: 0,
            mesh_index_capacity: 0,
            draw_calls: Vec::new(),
        }
    }

    fn reload_config(&mut self, reason: &str) {
        match load_config_from_path(&self.config_path) {
            Ok(config) => {
                if config.spikeball_texture != self.config.spikeball_texture
                    || config.weapon_texture != self.config.weapon_texture
                {
                    log::warn!("Texture path changes take effect on restart, not reload.");
                }
                self.world = build_world(&config, &self.assets);
                self.config = config;
                log::info!("Config reloaded ({reason}); bodies rebuilt from new tunables.");
            }
            Err(err) => {
                log::error!("Config reload failed ({reason}): {err}");
            }
        }
    }

    /// Pointer position in screen coordinates, rescaled from the window's
    /// physical pixels onto the 192x108 logical surface.
    fn mouse_screen_position(&self) -> Vec2 {
        let (mx, my) = self.input.mouse_position;
        Vec2::new(
            mx as f32 * SCREEN_SIZE.x / self.gpu.size.0 as f32,
            my as f32 * SCREEN_SIZE.y / self.gpu.size.1 as f32,
        )
    }

    fn build_frame_mesh(&self) -> SceneMesh {
        // Crosshair + 2 chain segments + 2 sprites.
        let mut mesh = SceneMesh::with_capacity(6);

        // Static reference crosshair through the screen center.
        mesh.push_line(
            WHITE_ASSET,
            Vec2::new(SCREEN_SIZE.x * 0.5, 0.0),
            Vec2::new(SCREEN_SIZE.x * 0.5, SCREEN_SIZE.y),
            CROSSHAIR_WIDTH,
            CROSSHAIR_COLOR,
        );
        mesh.push_line(
            WHITE_ASSET,
            Vec2::new(0.0, SCREEN_SIZE.y * 0.5),
            Vec2::new(SCREEN_SIZE.x, SCREEN_SIZE.y * 0.5),
            CROSSHAIR_WIDTH,
            CROSSHAIR_COLOR,
        );

        // Chain: a wide gray segment under a thin black one, then the ball.
        let flail = self.world.flail.placement();
        let pivot = self.world.flail.pivot();
        mesh.push_line(
            WHITE_ASSET,
            pivot,
            flail.center,
            CHAIN_OUTER_WIDTH,
            CHAIN_OUTER_COLOR,
        );
        mesh.push_line(
            WHITE_ASSET,
            pivot,
            flail.center,
            CHAIN_INNER_WIDTH,
            CHAIN_INNER_COLOR,
        );
        mesh.push_sprite(
            SPIKEBALL_ASSET,
            flail.center,
            self.world.flail.sprite_size(),
            flail.angle_deg,
            flail.mirrored,
            SPRITE_TINT,
        );

        let weapon = self.world.weapon.placement();
        mesh.push_sprite(
            WEAPON_ASSET,
            weapon.center,
            self.world.weapon.sprite_size(),
            weapon.angle_deg,
            weapon.mirrored,
            SPRITE_TINT,
        );

        mesh
    }

    fn upload_mesh(&mut self, mesh: SceneMesh) {
        self.ensure_mesh_capacity(mesh.vertices.len(), mesh.indices.len());
        self.draw_calls = mesh.draw_calls;

        if !mesh.vertices.is_empty() {
            self.gpu.queue.write_buffer(
                &self.vertex_buffer,
                0,
                bytemuck::cast_slice(&mesh.vertices),
            );
        }
        if !mesh.indices.is_empty() {
            self.gpu
                .queue
                .write_buffer(&self.index_buffer, 0, bytemuck::cast_slice(&mesh.indices));
        }
    }

    fn ensure_mesh_capacity(&mut self, vertex_count: usize, index_count: usize) {
        let needed_vertices = vertex_count.max(1);
        if needed_vertices > self.mesh_vertex_capacity {
            self.mesh_vertex_capacity = needed_vertices.next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(&self.gpu.device, self.mesh_vertex_capacity);
        }

        let needed_indices = index_count.max(1);
        if needed_indices > self.mesh_index_capacity {
            self.mesh_index_capacity = needed_indices.next_power_of_two();
            self.index_buffer = create_index_buffer(&self.gpu.device, self.mesh_index_capacity);
        }
    }

    fn render(&mut self) {
        let camera_uniform = self.camera.build_uniform();
        self.gpu.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[camera_uniform]),
        );

        let Some((output, view)) = self.gpu.begin_frame() else {
            return;
        };

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });

            render_pass.set_pipeline(&self.sprite_pipeline.render_pipeline);
            render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

            let mut last_bound_texture_key: Option<&Arc<str>> = None;
            for draw in &self.draw_calls {
                let Some(texture) = self.assets.get(&draw.texture_key) else {
                    log::warn!("Skipping draw call with missing texture '{}'", draw.texture_key);
                    continue;
                };
                let need_rebind = match last_bound_texture_key {
                    Some(last) => **last != *draw.texture_key,
                    None => true,
                };
                if need_rebind {
                    render_pass.set_bind_group(1, &texture.bind_group, &[]);
                    last_bound_texture_key = Some(&draw.texture_key);
                }
                render_pass.draw_indexed(
                    draw.index_start..(draw.index_start + draw.index_count),
                    0,
                    0..1,
                );
            }
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}

fn build_world(config: &DemoConfig, assets: &AssetTable) -> DemoWorld {
    // Both lookups follow a successful AssetTable::load, which inserts them.
    let flail_sprite = assets
        .sprite_size(SPIKEBALL_ASSET)
        .expect("asset table is missing the spikeball sprite");
    let weapon_sprite = assets
        .sprite_size(WEAPON_ASSET)
        .expect("asset table is missing the weapon sprite");
    DemoWorld::new(config, flail_sprite, weapon_sprite)
}

fn create_vertex_buffer(device: &wgpu::Device, vertex_capacity: usize) -> wgpu::Buffer {
    let byte_len = (vertex_capacity * std::mem::size_of::<SpriteVertex>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Scene Vertex Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_index_buffer(device: &wgpu::Device, index_capacity: usize) -> wgpu::Buffer {
    let byte_len = (index_capacity * std::mem::size_of::<u32>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Scene Index Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn map_key(key_code: KeyCode) -> Option<Key> {
    match key_code {
        KeyCode::Escape => Some(Key::Escape),
        _ => None,
    }
}

struct App {
    config: DemoConfig,
    state: Option<DemoState>,
}

impl App {
    fn new(config: DemoConfig) -> Self {
        Self {
            config,
            state: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let platform = PlatformConfig {
            title: self.config.window_title.clone(),
            width: SCREEN_SIZE.x as u32 * self.config.window_scale,
            height: SCREEN_SIZE.y as u32 * self.config.window_scale,
            resizable: false,
        };
        let window = flail_platform::window::create_window(event_loop, &platform);
        log::info!("Window created: {}x{}", platform.width, platform.height);
        self.state = Some(DemoState::new(window, self.config.clone()));
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let state = match self.state.as_mut() {
            Some(s) => s,
            None => return,
        };

        match event {
            WindowEvent::CloseRequested => {
                state.world.handle_event(WorldEvent::QuitRequested);
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                // The window itself is fixed-size; this still fires on
                // creation and on scale-factor changes.
                let w = physical_size.width;
                let h = physical_size.height;
                if w > 0 && h > 0 {
                    state.gpu.resize(w, h);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    if let Some(demo_key) = map_key(key_code) {
                        match event.state {
                            ElementState::Pressed => state.input.key_down(demo_key),
                            ElementState::Released => state.input.key_up(demo_key),
                        }
                    }
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                state.input.mouse_position = (position.x, position.y);
            }

            WindowEvent::RedrawRequested => {
                if state.gpu.size.0 == 0 || state.gpu.size.1 == 0 {
                    return;
                }

                let dt = state.clock.begin_frame() as f32;
                state.window.set_title(&format!(
                    "{} | FPS: {:.0}",
                    state.config.window_title, state.clock.smoothed_fps
                ));

                if state.config_watcher.should_reload() {
                    state.reload_config("file watcher");
                }

                if state.input.is_just_pressed(Key::Escape) {
                    state.world.handle_event(WorldEvent::CancelPressed);
                }
                if !state.world.is_running() {
                    // Terminal state: no further update or draw.
                    event_loop.exit();
                    return;
                }

                let mouse = state.mouse_screen_position();
                state.world.update(dt, mouse);

                let mesh = state.build_frame_mesh();
                state.upload_mesh(mesh);
                state.render();

                state.input.end_frame();
            }

            _ => {}
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Flail Demo starting...");

    let config = match load_config_from_path(Path::new(CONFIG_PATH)) {
        Ok(config) => config,
        Err(err) => {
            log::warn!("{err}; running on built-in defaults");
            DemoConfig::default()
        }
    };

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app).expect("Event loop error");
}
