use crate::loader::{DisplayGeometry, HUD_BAR_SIZE_Y, Resources, Texture};
use crate::ui::font::{GLYPH_HEIGHT, HudFont};
use crate::ui::state::{CameraState, Vec2, ViewConfig, ViewerState};

/// RGBA, alpha 255 = opaque.
pub type Color = (u8, u8, u8, u8);

pub const BG_COLOR: Color = (80, 80, 80, 255);
pub const HUD_BAR_COLOR: Color = (0, 0, 0, 255);
pub const TEXT_COLOR: Color = (255, 255, 255, 255);
const TEXT_MARGIN: i32 = 5;

/// An image quad centered on the world origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureQuad {
    pub width: f32,
    pub height: f32,
    /// Degrees, clockwise on screen.
    pub rotation: f32,
}

impl TextureQuad {
    pub fn new(geometry: DisplayGeometry, config: &ViewConfig) -> Self {
        Self {
            width: geometry.dst_width as f32,
            height: geometry.dst_height as f32,
            rotation: config.rotation,
        }
    }
}

/// The drawing operations one frame needs.
pub trait Canvas {
    fn size(&self) -> (u32, u32);
    fn clear(&mut self, color: Color);
    fn draw_texture(&mut self, texture: &Texture, quad: &TextureQuad, camera: &CameraState);
    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color);
    fn draw_text(&mut self, font: &HudFont, text: &str, x: i32, y: i32, color: Color);
}

pub fn status_line(path: &str, width: u32, height: u32, zoom: f32) -> String {
    format!("{} | {}x{} | [{:.0}%]", path, width, height, zoom * 100.0)
}

pub fn directory_line(path: &str) -> String {
    format!("Viewing directory: {}", path)
}

/// Draw one frame of the viewer.
pub fn render_frame<C: Canvas>(canvas: &mut C, resources: &Resources, state: &ViewerState) {
    canvas.clear(BG_COLOR);

    match resources {
        Resources::File { path, image, texture, geometry, font } => {
            let quad = TextureQuad::new(*geometry, &state.config);
            canvas.draw_texture(texture, &quad, &state.camera);

            if !state.config.hide_hud {
                let (w, h) = canvas.size();
                let bar_y = h as i32 - HUD_BAR_SIZE_Y as i32;
                canvas.fill_rect(0, bar_y, w, HUD_BAR_SIZE_Y, HUD_BAR_COLOR);

                let text = status_line(path, image.width, image.height, state.config.zoom);
                let text_y = bar_y + (HUD_BAR_SIZE_Y.saturating_sub(font.line_height()) / 2) as i32;
                canvas.draw_text(font, &text, TEXT_MARGIN, text_y, TEXT_COLOR);
            }
        }
        Resources::Directory { path, font } => {
            canvas.draw_text(font, &directory_line(path), TEXT_MARGIN, TEXT_MARGIN, TEXT_COLOR);
        }
    }
}

// ---------------------------------------------------------------------------
// Software framebuffer
// ---------------------------------------------------------------------------

/// Pack RGB into softbuffer u32 format: 0x00RRGGBB.
pub fn rgb(r: u8, g: u8, b: u8) -> u32 {
    (r as u32) << 16 | (g as u32) << 8 | b as u32
}

fn unpack_rgb(v: u32) -> (u8, u8, u8) {
    ((v >> 16) as u8, (v >> 8) as u8, v as u8)
}

fn blend(dst: u32, color: Color) -> u32 {
    let a = color.3 as u32;
    match a {
        255 => rgb(color.0, color.1, color.2),
        0 => dst,
        _ => {
            let (dr, dg, db) = unpack_rgb(dst);
            let r = ((color.0 as u32 * a + dr as u32 * (255 - a)) / 255) as u8;
            let g = ((color.1 as u32 * a + dg as u32 * (255 - a)) / 255) as u8;
            let b = ((color.2 as u32 * a + db as u32 * (255 - a)) / 255) as u8;
            rgb(r, g, b)
        }
    }
}

fn rotate(p: Vec2, degrees: f32) -> Vec2 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Vec2::new(p.x * cos - p.y * sin, p.x * sin + p.y * cos)
}

/// A softbuffer frame (u32 per pixel, row-major, `width` pixels per row).
pub struct FrameBuffer<'a> {
    buf: &'a mut [u32],
    width: u32,
    height: u32,
}

impl<'a> FrameBuffer<'a> {
    /// A buffer shorter than `width * height` (surface not yet resized)
    /// only exposes its complete rows.
    pub fn new(buf: &'a mut [u32], width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.min((buf.len() / width as usize) as u32);
        Self { buf, width, height }
    }

    fn put(&mut self, x: i32, y: i32, color: Color) {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return;
        }
        let off = (y as u32 * self.width + x as u32) as usize;
        self.buf[off] = blend(self.buf[off], color);
    }

    fn draw_char(&mut self, font: &HudFont, ch: char, px: i32, py: i32, color: Color) {
        let Some(glyph) = font.glyph(ch) else { return };
        let scale = font.scale;
        for col in 0..5u32 {
            let bits = glyph[col as usize];
            for row in 0..GLYPH_HEIGHT {
                if bits & (1 << row) == 0 {
                    continue;
                }
                for sy in 0..scale {
                    for sx in 0..scale {
                        self.put(
                            px + (col * scale + sx) as i32,
                            py + (row * scale + sy) as i32,
                            color,
                        );
                    }
                }
            }
        }
    }
}

impl Canvas for FrameBuffer<'_> {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self, color: Color) {
        let px = rgb(color.0, color.1, color.2);
        let n = (self.width * self.height) as usize;
        self.buf[..n].fill(px);
    }

    fn draw_texture(&mut self, texture: &Texture, quad: &TextureQuad, camera: &CameraState) {
        if texture.width == 0 || texture.height == 0 || quad.width <= 0.0 || quad.height <= 0.0 {
            return;
        }
        let hw = quad.width / 2.0;
        let hh = quad.height / 2.0;

        // Screen-space bounding box of the rotated quad.
        let corners = [(-hw, -hh), (hw, -hh), (hw, hh), (-hw, hh)]
            .map(|(x, y)| camera.world_to_screen(rotate(Vec2::new(x, y), quad.rotation)));
        let min_x = corners.iter().map(|c| c.x).fold(f32::INFINITY, f32::min);
        let max_x = corners.iter().map(|c| c.x).fold(f32::NEG_INFINITY, f32::max);
        let min_y = corners.iter().map(|c| c.y).fold(f32::INFINITY, f32::min);
        let max_y = corners.iter().map(|c| c.y).fold(f32::NEG_INFINITY, f32::max);

        let dx_start = min_x.floor().max(0.0) as u32;
        let dy_start = min_y.floor().max(0.0) as u32;
        let dx_end = (max_x.ceil().max(0.0) as u32).min(self.width);
        let dy_end = (max_y.ceil().max(0.0) as u32).min(self.height);

        let u_scale = texture.width as f32 / quad.width;
        let v_scale = texture.height as f32 / quad.height;

        for dy in dy_start..dy_end {
            for dx in dx_start..dx_end {
                // Map the pixel center back into quad-local space.
                let world = camera.screen_to_world(Vec2::new(dx as f32 + 0.5, dy as f32 + 0.5));
                let local = rotate(world, -quad.rotation);
                if local.x < -hw || local.x >= hw || local.y < -hh || local.y >= hh {
                    continue;
                }
                let [r, g, b, a] = texture.sample((local.x + hw) * u_scale, (local.y + hh) * v_scale);
                let off = (dy * self.width + dx) as usize;
                self.buf[off] = blend(self.buf[off], (r, g, b, a));
            }
        }
    }

    fn fill_rect(&mut self, rx: i32, ry: i32, rw: u32, rh: u32, color: Color) {
        for row in 0..rh as i32 {
            for col in 0..rw as i32 {
                self.put(rx + col, ry + row, color);
            }
        }
    }

    fn draw_text(&mut self, font: &HudFont, text: &str, px: i32, py: i32, color: Color) {
        let mut x = px;
        for ch in text.chars() {
            self.draw_char(font, ch, x, py, color);
            x += font.advance() as i32;
        }
    }
}
