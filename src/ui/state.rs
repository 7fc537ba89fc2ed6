use std::collections::HashSet;

use crate::loader::FilterMode;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const ZOOM_STEP: f32 = 0.25;
pub const MIN_ZOOM: f32 = 0.25;
pub const MAX_ZOOM: f32 = 3.0;
pub const ROTATION_STEP: f32 = 90.0;
const FULL_TURN: f32 = 360.0;
/// Pan distance per held frame is `ZOOM_STEP * zoom * PAN_SPEED`.
const PAN_SPEED: f32 = 20.0;

// Key bindings. Characters are lowercased before they reach the input state.
const KEY_QUIT: char = 'q';
const KEY_HUD: char = 'h';
const KEY_ROTATE_LEFT: char = 'e';
const KEY_ROTATE_RIGHT: char = 'r';
const KEY_ZOOM_OUT: char = 'z';
const KEY_ZOOM_IN: char = 'x';
const KEY_PAN_LEFT: char = 'h';
const KEY_PAN_DOWN: char = 'j';
const KEY_PAN_UP: char = 'k';
const KEY_PAN_RIGHT: char = 'l';
const KEY_ANTIALIAS: char = 'a';

// ---------------------------------------------------------------------------
// View data
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewConfig {
    pub zoom: f32,
    /// Degrees, clockwise on screen.
    pub rotation: f32,
    pub hide_hud: bool,
    pub antialiasing: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            rotation: 0.0,
            hide_hud: false,
            antialiasing: true,
        }
    }
}

/// 2D camera: world point `target` is drawn at screen point `offset`, scaled by `zoom`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub offset: Vec2,
    pub target: Vec2,
    pub zoom: f32,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            target: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl CameraState {
    pub fn world_to_screen(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            (p.x - self.target.x) * self.zoom + self.offset.x,
            (p.y - self.target.y) * self.zoom + self.offset.y,
        )
    }

    pub fn screen_to_world(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            (p.x - self.offset.x) / self.zoom + self.target.x,
            (p.y - self.offset.y) / self.zoom + self.target.y,
        )
    }
}

// ---------------------------------------------------------------------------
// Input snapshot
// ---------------------------------------------------------------------------

/// Keys held right now, and keys that went down since the last frame.
#[derive(Debug, Default)]
pub struct InputState {
    pub chars_down: HashSet<char>,
    pub chars_pressed: HashSet<char>,
    pub shift_down: bool,
}

impl InputState {
    /// Record a key-down. Auto-repeat events keep the key held but never
    /// count as a fresh press.
    pub fn press(&mut self, c: char, repeat: bool) {
        let c = c.to_ascii_lowercase();
        if !repeat && !self.chars_down.contains(&c) {
            self.chars_pressed.insert(c);
        }
        self.chars_down.insert(c);
    }

    pub fn release(&mut self, c: char) {
        self.chars_down.remove(&c.to_ascii_lowercase());
    }

    pub fn is_char_pressed(&self, c: char) -> bool {
        self.chars_pressed.contains(&c)
    }

    pub fn is_char_down(&self, c: char) -> bool {
        self.chars_down.contains(&c)
    }

    /// Window lost focus; release events for held keys will never arrive.
    pub fn release_all(&mut self) {
        self.chars_down.clear();
        self.shift_down = false;
    }

    fn end_frame(&mut self) {
        self.chars_pressed.clear();
    }
}

// ---------------------------------------------------------------------------
// Viewer state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct ViewerState {
    pub config: ViewConfig,
    pub camera: CameraState,
    pub input: InputState,
}

impl ViewerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the per-frame logic against the current input snapshot.
    /// Returns true if the app should quit.
    pub fn update(&mut self, window_w: u32, window_h: u32) -> bool {
        if self.input.is_char_pressed(KEY_QUIT) {
            self.input.end_frame();
            return true;
        }

        self.toggle_hud();
        self.rotate();
        self.zoom();
        self.pan(window_w, window_h);
        self.toggle_antialiasing();

        self.input.end_frame();
        false
    }

    /// Sampling the texture should use this frame.
    pub fn filter_mode(&self) -> FilterMode {
        if self.config.antialiasing {
            FilterMode::Bilinear
        } else {
            FilterMode::Point
        }
    }

    fn toggle_hud(&mut self) {
        if self.input.shift_down && self.input.is_char_pressed(KEY_HUD) {
            self.config.hide_hud = !self.config.hide_hud;
            log::debug!("hud hidden: {}", self.config.hide_hud);
        }
    }

    fn rotate(&mut self) {
        if self.config.rotation.abs() >= FULL_TURN {
            self.config.rotation = 0.0;
        }
        if self.input.is_char_pressed(KEY_ROTATE_LEFT) {
            self.config.rotation -= ROTATION_STEP;
            log::debug!("rotation {}", self.config.rotation);
        }
        if self.input.is_char_pressed(KEY_ROTATE_RIGHT) {
            self.config.rotation += ROTATION_STEP;
            log::debug!("rotation {}", self.config.rotation);
        }
    }

    fn zoom(&mut self) {
        if self.input.is_char_pressed(KEY_ZOOM_OUT) && self.config.zoom > MIN_ZOOM {
            self.config.zoom -= ZOOM_STEP;
            log::debug!("zoom {:.2}", self.config.zoom);
        }
        if self.input.is_char_pressed(KEY_ZOOM_IN) && self.config.zoom < MAX_ZOOM {
            self.config.zoom += ZOOM_STEP;
            log::debug!("zoom {:.2}", self.config.zoom);
        }
        self.camera.zoom = self.config.zoom;
    }

    fn pan(&mut self, window_w: u32, window_h: u32) {
        self.camera.offset = Vec2::new(window_w as f32 / 2.0, window_h as f32 / 2.0);

        if self.config.zoom <= 1.0 {
            self.camera.target = Vec2::ZERO;
            return;
        }

        let step = ZOOM_STEP * self.config.zoom * PAN_SPEED;
        if self.input.is_char_down(KEY_PAN_LEFT) {
            self.camera.target.x -= step;
        }
        if self.input.is_char_down(KEY_PAN_RIGHT) {
            self.camera.target.x += step;
        }
        if self.input.is_char_down(KEY_PAN_UP) {
            self.camera.target.y -= step;
        }
        if self.input.is_char_down(KEY_PAN_DOWN) {
            self.camera.target.y += step;
        }
    }

    fn toggle_antialiasing(&mut self) {
        if self.input.is_char_pressed(KEY_ANTIALIAS) {
            self.config.antialiasing = !self.config.antialiasing;
            log::debug!("antialiasing: {}", self.config.antialiasing);
        }
    }
}
