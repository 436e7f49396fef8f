mod keys;
mod settings;

use anyhow::Result;
use arena_common::LightId;
use arena_input::{
    ControlError, ControlStateMachine, FirstPersonCamera, LockCapability, MovementController,
    PointerLockHost, PressOutcome,
};
use arena_overlay::{BackgroundAnimator, InMemoryOverlay, OverlayError, OverlayHost};
use arena_render::{EnvironmentContext, PlacedScene, RecordingBackend, ShadowRegistry};
use arena_world::{GeometryConfig, Layout, SeededSource, ThreadSource, generate};
use clap::Parser;
use keys::key_name;
use settings::Settings;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowId};

#[derive(Parser)]
#[command(name = "arena-desktop", about = "Walled arena desktop host")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Settings file (YAML); defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// Pointer lock backed by winit's cursor grab.
struct WindowLockHost<'a> {
    window: &'a Window,
    mode: CursorGrabMode,
}

impl PointerLockHost for WindowLockHost<'_> {
    fn request_pointer_lock(&mut self) -> Result<(), ControlError> {
        self.window
            .set_cursor_grab(self.mode)
            .map_err(|e| ControlError::TransientHostDenial(e.to_string()))?;
        self.window.set_cursor_visible(false);
        Ok(())
    }

    fn release_pointer_lock(&mut self) {
        if let Err(e) = self.window.set_cursor_grab(CursorGrabMode::None) {
            tracing::debug!("cursor ungrab failed: {e}");
        }
        self.window.set_cursor_visible(true);
    }
}

/// Scene, controls and overlay for one run.
struct Session {
    backend: RecordingBackend,
    scene: PlacedScene,
    camera: FirstPersonCamera,
    movement: MovementController,
    control: ControlStateMachine,
    grab: LockCapability<CursorGrabMode>,
    overlay: BackgroundAnimator<InMemoryOverlay>,
    last_frame: Instant,
}

impl Session {
    /// Generate and hand off the environment. Runs to completion before any
    /// control or overlay work.
    fn new(settings: Settings) -> Result<Self> {
        let layout = build_layout(&settings.geometry, settings.seed)?;

        let mut camera = FirstPersonCamera::from_config(&settings.camera);
        camera.set_colliders(layout.colliders());

        let mut backend = RecordingBackend::new();
        let scene = EnvironmentContext::new(&mut backend, &settings.geometry).instantiate(layout);
        let casters = ShadowRegistry::new().register_casters(&mut backend, &scene, LightId(0));
        tracing::info!(meshes = scene.len(), casters, "scene ready");

        Ok(Self {
            backend,
            scene,
            camera,
            movement: MovementController::new(settings.bindings),
            control: ControlStateMachine::new(false),
            grab: LockCapability::Unavailable,
            // The container only exists once the window does.
            overlay: BackgroundAnimator::new(None, settings.overlay),
            last_frame: Instant::now(),
        })
    }

    fn lock_host<'a>(&self, window: &'a Window) -> WindowLockHost<'a> {
        WindowLockHost {
            window,
            mode: self.grab.mode().unwrap_or(CursorGrabMode::None),
        }
    }

    fn attach(&mut self, window: &Window) {
        self.grab = keys::probe_cursor_grab(|mode| window.set_cursor_grab(mode));
        self.control = ControlStateMachine::from_capability(&self.grab);

        let config = self.overlay.config().clone();
        self.overlay = BackgroundAnimator::new(Some(InMemoryOverlay::new()), config);
        let size = window.inner_size();
        self.overlay.request_rebuild(size.width, size.height);
    }

    fn primary_press(&mut self, window: &Window) {
        let mut host = self.lock_host(window);
        match self.control.on_primary_press(&mut host) {
            // Cursor grab is granted synchronously.
            Ok(PressOutcome::Requested) => {
                self.control.on_lock_acquired();
            }
            Ok(PressOutcome::AlreadyLocked) => {}
            Err(e) => tracing::debug!("pointer lock not acquired: {e}"),
        }
    }

    fn release_lock(&mut self, window: &Window) {
        if !self.control.is_locked() {
            return;
        }
        self.lock_host(window).release_pointer_lock();
        self.control.on_lock_released();
    }

    fn key(&mut self, window: &Window, code: KeyCode, state: ElementState, repeat: bool) {
        let pressed = state == ElementState::Pressed;
        let bound = key_name(code).is_some_and(|name| self.movement.on_key(name, pressed));
        if bound || !pressed || repeat {
            return;
        }
        match code {
            KeyCode::Escape => self.release_lock(window),
            KeyCode::F1 => self.overlay.refresh(),
            _ => {}
        }
    }

    fn frame(&mut self) {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32().min(0.1);
        self.last_frame = now;

        self.movement.forward_to(&mut self.camera, dt);

        match self.overlay.flush() {
            Ok(Some(grid)) => tracing::debug!(
                cells = grid.cell_count(),
                cell_width = grid.cell_width,
                cell_height = grid.cell_height,
                "overlay refreshed"
            ),
            Ok(None) | Err(OverlayError::MissingContainer) => {}
            Err(e) => tracing::error!("overlay rebuild failed: {e}"),
        }
    }

    fn title(&self) -> String {
        let p = self.camera.position;
        let cells = self.overlay.host().map_or(0, |h| h.cell_count());
        let hint = if self.control.is_locked() {
            "Esc to release"
        } else if self.control.lock_supported() {
            "click to look"
        } else {
            "mouse look unavailable"
        };
        format!(
            "Arena | {} meshes | {cells} cells | ({:.1}, {:.1}, {:.1}) | {hint}",
            self.scene.len(),
            p.x,
            p.y,
            p.z
        )
    }
}

fn build_layout(config: &GeometryConfig, seed: Option<u64>) -> Result<Layout> {
    let layout = match seed {
        Some(seed) => generate(config, &mut SeededSource::new(seed)),
        None => generate(config, &mut ThreadSource::new()),
    }?;
    Ok(layout)
}

struct DesktopApp {
    session: Session,
    window: Option<Window>,
    last_title: String,
}

impl DesktopApp {
    fn new(session: Session) -> Self {
        Self {
            session,
            window: None,
            last_title: String::new(),
        }
    }

    fn update_title(&mut self) {
        let Some(window) = &self.window else {
            return;
        };
        let title = self.session.title();
        if title != self.last_title {
            window.set_title(&title);
            self.last_title = title;
        }
    }
}

impl ApplicationHandler for DesktopApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title("Arena")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = match event_loop.create_window(attrs) {
            Ok(w) => w,
            Err(e) => {
                tracing::error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        self.session.attach(&window);
        tracing::info!(
            lock = ?self.session.grab.mode(),
            recorded_calls = self.session.backend.calls().len(),
            "window attached"
        );
        self.window = Some(window);
        self.update_title();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = &self.window else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                self.session.overlay.request_rebuild(size.width, size.height);
            }
            WindowEvent::Focused(false) => {
                self.session.movement.clear();
                self.session.release_lock(window);
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: ElementState::Pressed,
                ..
            } => {
                self.session.primary_press(window);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        repeat,
                        ..
                    },
                ..
            } => {
                self.session.key(window, code, state, repeat);
            }
            WindowEvent::RedrawRequested => {
                self.session.frame();
                self.update_title();
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.session
                .control
                .forward_look(&mut self.session.camera, delta.0 as f32, delta.1 as f32);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("arena-desktop starting");

    let settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let session = Session::new(settings)?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = DesktopApp::new(session);
    event_loop.run_app(&mut app)?;

    Ok(())
}
