//! A minimal "window that clears" smoke test for the loader crate.
//!
//! Opens a double buffered RGBA window with a depth buffer, loads the core
//! profile function table through the display, and then clears every frame
//! to mid-gray for as long as the window stays open.

use std::error::Error;
use std::ffi::CStr;
use std::num::NonZeroU32;

use log::{info, warn};
use raw_window_handle::HasWindowHandle;
use winit::application::ApplicationHandler;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowAttributes};

use glutin::config::{Config, ConfigTemplateBuilder};
use glutin::context::{
    ContextAttributesBuilder, GlProfile, NotCurrentContext, PossiblyCurrentContext,
};
use glutin::display::GetGlDisplay;
use glutin::prelude::*;
use glutin::surface::{Surface, SwapInterval, WindowSurface};

use glutin_winit::{DisplayBuilder, GlWindow};

use puregl::gl;

/// Initial inner size of the window.
const WINDOW_SIZE: PhysicalSize<u32> = PhysicalSize::new(500, 500);

/// Initial outer position of the window.
const WINDOW_POSITION: PhysicalPosition<i32> = PhysicalPosition::new(100, 100);

const WINDOW_TITLE: &str = "PureGL";

/// Every frame and every resize reset the clear state to the same mid-gray.
const CLEAR_COLOR: [gl::types::GLfloat; 4] = [0.5, 0.5, 0.5, 1.0];
const CLEAR_DEPTH: gl::types::GLdouble = 1.0;

pub fn run(event_loop: EventLoop<()>) -> Result<(), Box<dyn Error>> {
    // The template will match only the configurations that can render to a
    // window with an alpha channel and a depth buffer; double buffering is
    // the template default.
    let template = ConfigTemplateBuilder::new().with_alpha_size(8).with_depth_size(24);

    let display_builder = DisplayBuilder::new().with_window_attributes(Some(window_attributes()));

    let mut app = App::new(template, display_builder);
    event_loop.run_app(&mut app)?;

    app.exit_state()
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        self.transition(event_loop, |state| match state {
            AppState::Uninitialized(state) => state.initialize(event_loop).map(AppState::Running),
            AppState::Running(state) => Ok(AppState::Running(state)),
        });
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::Resized(size) => {
                self.transition(event_loop, |state| {
                    if let AppState::Running(state) = &state {
                        state.resize(size.width as i32, size.height as i32);
                    }
                    Ok(state)
                });
            },
            WindowEvent::RedrawRequested => {
                self.transition(event_loop, |state| {
                    if let AppState::Running(state) = &state {
                        state.present()?;
                    }
                    Ok(state)
                });
            },
            WindowEvent::CloseRequested => event_loop.exit(),
            _ => (),
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        // Surface and context go before the window they were created from;
        // the field order of the running state takes care of it.
        self.state.take();
    }
}

fn window_attributes() -> WindowAttributes {
    Window::default_attributes()
        .with_title(WINDOW_TITLE)
        .with_inner_size(WINDOW_SIZE)
        .with_position(WINDOW_POSITION)
}

fn create_gl_context(
    window: &Window,
    gl_config: &Config,
) -> Result<NotCurrentContext, Box<dyn Error>> {
    let raw_window_handle = window.window_handle().ok().map(|wh| wh.as_raw());

    // Only the core profile table ever gets loaded, so there is no
    // compatibility or GLES fallback worth trying.
    let context_attributes =
        ContextAttributesBuilder::new().with_profile(GlProfile::Core).build(raw_window_handle);

    let gl_context =
        unsafe { gl_config.display().create_context(gl_config, &context_attributes)? };
    Ok(gl_context)
}

fn create_gl_surface(
    window: &Window,
    gl_config: &Config,
) -> Result<Surface<WindowSurface>, Box<dyn Error>> {
    let attrs = window.build_surface_attributes(Default::default())?;
    let gl_surface = unsafe { gl_config.display().create_window_surface(gl_config, &attrs)? };
    Ok(gl_surface)
}

fn set_uncapped_presentation(
    gl_surface: &Surface<WindowSurface>,
    gl_context: &PossiblyCurrentContext,
) {
    // Continuous redraw wants frames pushed as fast as the loop can go.
    if let Err(res) = gl_surface.set_swap_interval(gl_context, SwapInterval::DontWait) {
        warn!("error disabling vsync: {res:?}");
    }
}

struct App {
    state: Option<AppState>,
    exit_state: Result<(), Box<dyn Error>>,
}

impl App {
    fn new(template_builder: ConfigTemplateBuilder, display_builder: DisplayBuilder) -> Self {
        Self {
            state: Some(AppState::Uninitialized(AppStateUninitialized {
                template_builder,
                display_builder,
            })),
            exit_state: Ok(()),
        }
    }

    fn exit_state(self) -> Result<(), Box<dyn Error>> {
        debug_assert!(self.state.is_none());
        self.exit_state
    }

    fn transition<F: FnOnce(AppState) -> Result<AppState, Box<dyn Error>>>(
        &mut self,
        event_loop: &ActiveEventLoop,
        f: F,
    ) {
        // Events can still drain after a failed transition took the state
        // down; they have nothing left to run against.
        let Some(state) = self.state.take() else { return };

        match f(state) {
            Ok(state) => self.state = Some(state),
            Err(error) => {
                event_loop.exit();
                self.exit_state = Err(error);
            },
        }
    }
}

enum AppState {
    Uninitialized(AppStateUninitialized),
    Running(AppStateRunning),
}

struct AppStateUninitialized {
    template_builder: ConfigTemplateBuilder,
    display_builder: DisplayBuilder,
}

impl AppStateUninitialized {
    fn initialize(self, event_loop: &ActiveEventLoop) -> Result<AppStateRunning, Box<dyn Error>> {
        let Self { template_builder, display_builder } = self;
        let (window, gl_config) =
            display_builder.build(event_loop, template_builder, gl_config_picker)?;
        let window = window.ok_or("failed to create window")?;
        info!("picked a config with {} depth bits", gl_config.depth_size());

        let gl_context = create_gl_context(&window, &gl_config)?;
        let gl_surface = create_gl_surface(&window, &gl_config)?;
        let gl_context = gl_context.make_current(&gl_surface)?;
        set_uncapped_presentation(&gl_surface, &gl_context);

        let renderer = Renderer::new(&gl_config.display())?;

        // Not every platform delivers a resize event before the first frame,
        // so the viewport and clear state have to be established here.
        let size = window.inner_size();
        renderer.resize(size.width as i32, size.height as i32);

        window.request_redraw();

        Ok(AppStateRunning { gl_context, renderer, gl_surface, window })
    }
}

struct AppStateRunning {
    gl_context: PossiblyCurrentContext,
    renderer: Renderer,
    // NOTE: Window should be dropped after all resources created using its
    // raw-window-handle.
    gl_surface: Surface<WindowSurface>,
    window: Window,
}

impl AppStateRunning {
    fn resize(&self, width: i32, height: i32) {
        let (width, height) = effective_viewport(width, height);

        // Some platforms like EGL require resizing the GL surface along with
        // the window; on the others this is a no-op.
        if let (Some(w), Some(h)) = (NonZeroU32::new(width as u32), NonZeroU32::new(height as u32))
        {
            self.gl_surface.resize(&self.gl_context, w, h);
        }

        self.renderer.resize(width, height);
    }

    fn present(&self) -> Result<(), Box<dyn Error>> {
        self.window.pre_present_notify();
        self.renderer.draw();
        self.gl_surface.swap_buffers(&self.gl_context)?;

        // One swap, one follow-up redraw request: the continuous loop.
        self.window.request_redraw();
        Ok(())
    }
}

// Find the config with the deepest depth buffer among the ones matching the
// template.
pub fn gl_config_picker(configs: Box<dyn Iterator<Item = Config> + '_>) -> Config {
    configs
        .reduce(|accum, config| {
            if config.depth_size() > accum.depth_size() {
                config
            } else {
                accum
            }
        })
        .unwrap()
}

/// Clear-only renderer; the whole point is proving the table works.
pub struct Renderer {
    gl: gl::Gl,
}

impl Renderer {
    pub fn new<D: GlDisplay>(gl_display: &D) -> Result<Self, puregl::Error> {
        let gl = puregl::load_with(|symbol| gl_display.get_proc_address(symbol))?;

        if let Some(renderer) = get_gl_string(&gl, gl::RENDERER) {
            info!("running on {}", renderer.to_string_lossy());
        }
        if let Some(version) = get_gl_string(&gl, gl::VERSION) {
            info!("OpenGL version {}", version.to_string_lossy());
        }
        if let Some(shaders_version) = get_gl_string(&gl, gl::SHADING_LANGUAGE_VERSION) {
            info!("shaders version {}", shaders_version.to_string_lossy());
        }

        Ok(Self { gl })
    }

    /// Clear color and depth buffers to the fixed values.
    pub fn draw(&self) {
        unsafe {
            self.gl.ClearColor(CLEAR_COLOR[0], CLEAR_COLOR[1], CLEAR_COLOR[2], CLEAR_COLOR[3]);
            self.gl.Clear(gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT);
        }
    }

    /// Reset the viewport and clear state for a new window size.
    ///
    /// Dimensions are clamped to at least one pixel in each axis.
    pub fn resize(&self, width: i32, height: i32) {
        let (width, height) = effective_viewport(width, height);
        unsafe {
            self.gl.Viewport(0, 0, width, height);
            self.gl.ClearDepth(CLEAR_DEPTH);
            self.gl.ClearColor(CLEAR_COLOR[0], CLEAR_COLOR[1], CLEAR_COLOR[2], CLEAR_COLOR[3]);
            self.gl.Enable(gl::DEPTH_TEST);
        }
    }
}

/// Viewport dimensions actually used for a requested window size.
fn effective_viewport(width: i32, height: i32) -> (gl::types::GLsizei, gl::types::GLsizei) {
    (width.max(1), height.max(1))
}

fn get_gl_string(gl: &gl::Gl, variant: gl::types::GLenum) -> Option<&'static CStr> {
    unsafe {
        let s = gl.GetString(variant);
        (!s.is_null()).then(|| CStr::from_ptr(s.cast()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::{Position, Size};

    #[test]
    fn viewport_clamps_non_positive_dimensions() {
        assert_eq!(effective_viewport(0, -5), (1, 1));
        assert_eq!(effective_viewport(-1, 0), (1, 1));
        assert_eq!(effective_viewport(0, 600), (1, 600));
    }

    #[test]
    fn viewport_passes_positive_dimensions_through() {
        assert_eq!(effective_viewport(800, 600), (800, 600));
        assert_eq!(effective_viewport(1, 1), (1, 1));
    }

    #[test]
    fn clear_values_are_fixed_mid_gray() {
        assert_eq!(CLEAR_COLOR, [0.5, 0.5, 0.5, 1.0]);
        assert_eq!(CLEAR_DEPTH, 1.0);
    }

    #[test]
    fn window_opens_at_fixed_size_and_position() {
        let attrs = window_attributes();
        assert_eq!(attrs.title, WINDOW_TITLE);
        assert_eq!(attrs.inner_size, Some(Size::Physical(WINDOW_SIZE)));
        assert_eq!(attrs.position, Some(Position::Physical(WINDOW_POSITION)));
    }
}
