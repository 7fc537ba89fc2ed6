use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{Duration, Instant};
use softbuffer::Surface;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::keyboard::Key;
use winit::window::{Window, WindowId};

use crate::error::ViewerError;
use crate::loader::Resources;
use crate::ui::render::{FrameBuffer, render_frame};
use crate::ui::state::ViewerState;

pub mod font;
pub mod render;
pub mod state;

/// 60 frames per second.
const FRAME_INTERVAL: Duration = Duration::from_micros(16_667);

// ---------------------------------------------------------------------------
// Application handler (winit 0.30 style)
// ---------------------------------------------------------------------------

pub struct App {
    pub state: ViewerState,
    pub resources: Option<Resources>,
    pub window: Option<Arc<Window>>,
    pub context: Option<softbuffer::Context<Arc<Window>>>,
    pub surface: Option<Surface<Arc<Window>, Arc<Window>>>,
    pub next_frame: Instant,
    /// Set when the window could not be brought up; reported after the loop exits.
    pub error: Option<ViewerError>,
}

impl App {
    pub fn new(state: ViewerState, resources: Resources) -> Self {
        Self {
            state,
            resources: Some(resources),
            window: None,
            context: None,
            surface: None,
            next_frame: Instant::now(),
            error: None,
        }
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<(), ViewerError> {
        let monitor = event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next())
            .map(|m| {
                let size = m.size();
                (size.width, size.height)
            });

        let (w, h) = match self.resources.as_mut() {
            Some(res) => res.fit_to_monitor(monitor),
            None => return Ok(()),
        };
        log::info!("window {}x{} (monitor {:?})", w, h, monitor);

        let attrs = Window::default_attributes()
            .with_title("liv")
            .with_resizable(true)
            .with_inner_size(PhysicalSize::new(w, h))
            .with_min_inner_size(PhysicalSize::new(w, h));
        let window = Arc::new(event_loop.create_window(attrs)?);
        let context = softbuffer::Context::new(Arc::clone(&window))?;
        let mut surface = Surface::new(&context, Arc::clone(&window))?;
        if let (Some(nw), Some(nh)) = (NonZeroU32::new(w), NonZeroU32::new(h)) {
            surface.resize(nw, nh)?;
        }

        window.request_redraw();
        self.window = Some(window);
        self.context = Some(context);
        self.surface = Some(surface);
        self.next_frame = Instant::now() + FRAME_INTERVAL;
        Ok(())
    }

    /// Update, render and present one frame. Returns true to quit.
    fn frame(&mut self) -> bool {
        let Some(window) = self.window.as_ref() else { return false };
        let size = window.inner_size();
        let fb_w = size.width.max(1);
        let fb_h = size.height.max(1);

        if self.state.update(fb_w, fb_h) {
            return true;
        }

        let Some(resources) = self.resources.as_mut() else { return false };
        let filter = self.state.filter_mode();
        if let Some(texture) = resources.texture_mut() {
            if texture.filter() != filter {
                log::debug!("texture filter {:?}", filter);
            }
            texture.set_filter(filter);
        }

        if let Some(ref mut surface) = self.surface {
            match surface.buffer_mut() {
                Ok(mut buffer) => {
                    let mut canvas = FrameBuffer::new(&mut buffer, fb_w, fb_h);
                    render_frame(&mut canvas, resources, &self.state);
                    if let Err(e) = buffer.present() {
                        log::warn!("present failed: {}", e);
                    }
                }
                Err(e) => log::warn!("could not get frame buffer: {}", e),
            }
        }
        false
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.create_window(event_loop) {
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if let (Some(surface), Some(w), Some(h)) =
                    (&mut self.surface, NonZeroU32::new(width), NonZeroU32::new(height))
                {
                    if let Err(e) = surface.resize(w, h) {
                        log::warn!("surface resize to {}x{} failed: {}", width, height, e);
                    }
                }
            }

            WindowEvent::Focused(false) => {
                self.state.input.release_all();
            }

            WindowEvent::ModifiersChanged(mods) => {
                self.state.input.shift_down = mods.state().shift_key();
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let Key::Character(s) = &event.logical_key {
                    if let Some(c) = s.chars().next() {
                        match event.state {
                            ElementState::Pressed => self.state.input.press(c, event.repeat),
                            ElementState::Released => self.state.input.release(c),
                        }
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                if self.frame() {
                    event_loop.exit();
                }
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(ref window) = self.window else { return };
        let now = Instant::now();
        if now >= self.next_frame {
            window.request_redraw();
            // Skip missed ticks instead of bursting to catch up.
            while self.next_frame <= now {
                self.next_frame += FRAME_INTERVAL;
            }
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_frame));
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(resources) = self.resources.take() {
            resources.close();
        }
        self.surface = None;
        self.context = None;
        self.window = None;
        log::debug!("window closed");
    }
}
