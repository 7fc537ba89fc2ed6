use std::path::Path;

use crate::error::ViewerError;
use crate::files::PathKind;
use crate::ui::font::HudFont;

// ---------------------------------------------------------------------------
// Window sizing
// ---------------------------------------------------------------------------

/// Images up to this size are shown 1:1; larger ones at half size.
pub const MIN_SIZE_X: u32 = 800;
pub const MIN_SIZE_Y: u32 = 640;

pub const HUD_BAR_SIZE_Y: u32 = 24;
pub const HUD_FONT_SIZE: u32 = HUD_BAR_SIZE_Y - 8;

/// On-screen size of the image at zoom 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayGeometry {
    pub dst_width: u32,
    pub dst_height: u32,
}

impl DisplayGeometry {
    pub fn from_image_size(width: u32, height: u32) -> Self {
        Self {
            dst_width: if width <= MIN_SIZE_X { width } else { width / 2 },
            dst_height: if height <= MIN_SIZE_Y { height } else { height / 2 },
        }
    }

    pub fn clamped_to(self, monitor: (u32, u32)) -> Self {
        Self {
            dst_width: self.dst_width.min(monitor.0),
            dst_height: self.dst_height.min(monitor.1),
        }
    }
}

// ---------------------------------------------------------------------------
// Decoded image data (CPU side, before texture upload)
// ---------------------------------------------------------------------------

pub struct DecodedImage {
    pub rgba_bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl DecodedImage {
    pub fn from_dynamic(img: image::DynamicImage) -> Self {
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self {
            rgba_bytes: rgba.into_raw(),
            width,
            height,
        }
    }
}

fn decode_image(path: &Path) -> Result<DecodedImage, ViewerError> {
    let img = image::open(path).map_err(|source| ViewerError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(DecodedImage::from_dynamic(img))
}

// ---------------------------------------------------------------------------
// Texture
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    Bilinear,
    Point,
}

/// Renderable copy of an image's pixels with its sampling mode.
pub struct Texture {
    rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
    filter: FilterMode,
}

impl Texture {
    pub fn upload(image: &DecodedImage) -> Self {
        Self {
            rgba: image.rgba_bytes.clone(),
            width: image.width,
            height: image.height,
            filter: FilterMode::Bilinear,
        }
    }

    pub fn filter(&self) -> FilterMode {
        self.filter
    }

    pub fn set_filter(&mut self, filter: FilterMode) {
        self.filter = filter;
    }

    fn texel(&self, x: u32, y: u32) -> [f32; 4] {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let p = &self.rgba[i..i + 4];
        [p[0] as f32, p[1] as f32, p[2] as f32, p[3] as f32]
    }

    /// Sample at texel-space coordinates (0..width, 0..height) using the
    /// current filter. Coordinates outside the texture clamp to the edge.
    pub fn sample(&self, u: f32, v: f32) -> [u8; 4] {
        if self.width == 0 || self.height == 0 {
            return [0; 4];
        }
        let max_x = (self.width - 1) as f32;
        let max_y = (self.height - 1) as f32;

        let px = match self.filter {
            FilterMode::Point => {
                self.texel(u.floor().clamp(0.0, max_x) as u32, v.floor().clamp(0.0, max_y) as u32)
            }
            FilterMode::Bilinear => {
                // Texel centers sit at +0.5.
                let xf = (u - 0.5).clamp(0.0, max_x);
                let yf = (v - 0.5).clamp(0.0, max_y);
                let x0 = xf.floor() as u32;
                let y0 = yf.floor() as u32;
                let x1 = (x0 + 1).min(self.width - 1);
                let y1 = (y0 + 1).min(self.height - 1);
                let tx = xf - x0 as f32;
                let ty = yf - y0 as f32;

                let (a, b, c, d) = (self.texel(x0, y0), self.texel(x1, y0), self.texel(x0, y1), self.texel(x1, y1));
                let mut out = [0.0f32; 4];
                for ch in 0..4 {
                    let top = a[ch] + (b[ch] - a[ch]) * tx;
                    let bottom = c[ch] + (d[ch] - c[ch]) * tx;
                    out[ch] = top + (bottom - top) * ty;
                }
                out
            }
        };
        px.map(|c| c.round().clamp(0.0, 255.0) as u8)
    }
}

// ---------------------------------------------------------------------------
// Resources acquired for one run
// ---------------------------------------------------------------------------

/// A released resource, reported by [`Resources::close`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    Image,
    Texture,
    Font,
}

pub enum Resources {
    File {
        path: String,
        image: DecodedImage,
        texture: Texture,
        geometry: DisplayGeometry,
        font: HudFont,
    },
    Directory {
        path: String,
        font: HudFont,
    },
}

impl Resources {
    /// Acquire everything the viewer needs for `path`. Nothing is acquired for
    /// an invalid path.
    pub fn open(path: &Path, kind: PathKind) -> Result<Self, ViewerError> {
        match kind {
            PathKind::File => {
                let image = decode_image(path)?;
                log::info!("decoded {:?}: {}x{}", path, image.width, image.height);
                Ok(Self::from_image(path.display().to_string(), image))
            }
            PathKind::Directory => Ok(Self::Directory {
                path: path.display().to_string(),
                font: HudFont::load(HUD_FONT_SIZE),
            }),
            PathKind::Invalid => Err(ViewerError::InvalidPath(path.to_path_buf())),
        }
    }

    pub fn from_image(path: String, image: DecodedImage) -> Self {
        let geometry = DisplayGeometry::from_image_size(image.width, image.height);
        let texture = Texture::upload(&image);
        Self::File {
            path,
            image,
            texture,
            geometry,
            font: HudFont::load(HUD_FONT_SIZE),
        }
    }

    /// Size the window against the monitor, if one is known, and return the
    /// inner size to request. Directory mode always uses the minimum size.
    pub fn fit_to_monitor(&mut self, monitor: Option<(u32, u32)>) -> (u32, u32) {
        match self {
            Self::File { geometry, .. } => {
                if let Some(m) = monitor {
                    *geometry = geometry.clamped_to(m);
                }
                (geometry.dst_width.max(1), geometry.dst_height.max(1))
            }
            Self::Directory { .. } => (MIN_SIZE_X, MIN_SIZE_Y),
        }
    }

    pub fn texture_mut(&mut self) -> Option<&mut Texture> {
        match self {
            Self::File { texture, .. } => Some(texture),
            Self::Directory { .. } => None,
        }
    }

    /// Release everything `open` acquired, in acquisition order.
    pub fn close(self) -> Vec<Handle> {
        let released = match self {
            Self::File { image, texture, font, .. } => {
                drop(image);
                drop(texture);
                drop(font);
                vec![Handle::Image, Handle::Texture, Handle::Font]
            }
            Self::Directory { font, .. } => {
                drop(font);
                vec![Handle::Font]
            }
        };
        for handle in &released {
            log::debug!("released {:?}", handle);
        }
        released
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgba, RgbaImage};
    use std::fs;

    fn solid(width: u32, height: u32, px: [u8; 4]) -> DecodedImage {
        DecodedImage::from_dynamic(DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba(px))))
    }

    #[test]
    fn large_images_are_halved() {
        let g = DisplayGeometry::from_image_size(1600, 1200);
        assert_eq!(g, DisplayGeometry { dst_width: 800, dst_height: 600 });
    }

    #[test]
    fn small_images_are_kept_and_thresholds_are_inclusive() {
        assert_eq!(
            DisplayGeometry::from_image_size(800, 640),
            DisplayGeometry { dst_width: 800, dst_height: 640 }
        );
        assert_eq!(
            DisplayGeometry::from_image_size(801, 100),
            DisplayGeometry { dst_width: 400, dst_height: 100 }
        );
        assert_eq!(
            DisplayGeometry::from_image_size(10, 641),
            DisplayGeometry { dst_width: 10, dst_height: 320 }
        );
    }

    #[test]
    fn geometry_clamps_to_monitor() {
        let g = DisplayGeometry::from_image_size(8000, 1000).clamped_to((1920, 1080));
        assert_eq!(g, DisplayGeometry { dst_width: 1920, dst_height: 500 });
    }

    #[test]
    fn fit_to_monitor_per_mode() {
        let mut file = Resources::from_image("big.png".into(), solid(1700, 1300, [0, 0, 0, 255]));
        assert_eq!(file.fit_to_monitor(None), (850, 650));
        assert_eq!(file.fit_to_monitor(Some((800, 600))), (800, 600));
        match &file {
            Resources::File { geometry, .. } => {
                assert_eq!(*geometry, DisplayGeometry { dst_width: 800, dst_height: 600 })
            }
            Resources::Directory { .. } => panic!("expected file resources"),
        }

        let mut dir = Resources::Directory { path: ".".into(), font: HudFont::load(HUD_FONT_SIZE) };
        assert_eq!(dir.fit_to_monitor(Some((640, 480))), (800, 640));
    }

    #[test]
    fn open_and_close_file() {
        let dir = std::env::temp_dir().join(format!("liv-loader-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("photo.png");
        RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 255])).save(&path).unwrap();

        let mut res = Resources::open(&path, PathKind::File).unwrap();
        match &res {
            Resources::File { image, texture, geometry, .. } => {
                assert_eq!((image.width, image.height), (3, 2));
                assert_eq!((texture.width, texture.height), (3, 2));
                assert_eq!(texture.filter(), FilterMode::Bilinear);
                assert_eq!(*geometry, DisplayGeometry { dst_width: 3, dst_height: 2 });
            }
            Resources::Directory { .. } => panic!("expected file resources"),
        }
        assert!(res.texture_mut().is_some());
        assert_eq!(res.close(), vec![Handle::Image, Handle::Texture, Handle::Font]);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn directory_never_acquires_a_texture() {
        let mut res = Resources::open(&std::env::temp_dir(), PathKind::Directory).unwrap();
        assert!(res.texture_mut().is_none());
        assert_eq!(res.close(), vec![Handle::Font]);
    }

    #[test]
    fn invalid_path_acquires_nothing() {
        let err = Resources::open(Path::new("./notanimage.txt"), PathKind::Invalid).err().unwrap();
        assert!(matches!(err, ViewerError::InvalidPath(_)));
    }

    #[test]
    fn undecodable_file_is_reported() {
        let dir = std::env::temp_dir().join(format!("liv-loader-bad-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("broken.png");
        fs::write(&path, b"definitely not a png").unwrap();

        let err = Resources::open(&path, PathKind::File).err().unwrap();
        assert!(matches!(err, ViewerError::Decode { .. }));
        assert!(err.to_string().contains("broken.png"));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn point_sampling_picks_the_covering_texel() {
        let mut img = RgbaImage::from_pixel(2, 1, Rgba([0, 0, 0, 255]));
        img.put_pixel(1, 0, Rgba([200, 100, 50, 255]));
        let mut tex = Texture::upload(&DecodedImage::from_dynamic(DynamicImage::ImageRgba8(img)));
        tex.set_filter(FilterMode::Point);
        assert_eq!(tex.sample(0.9, 0.5), [0, 0, 0, 255]);
        assert_eq!(tex.sample(1.1, 0.5), [200, 100, 50, 255]);
        assert_eq!(tex.sample(-4.0, 9.0), [0, 0, 0, 255]);
    }

    #[test]
    fn bilinear_sampling_blends_neighbours() {
        let mut img = RgbaImage::from_pixel(2, 1, Rgba([0, 0, 0, 255]));
        img.put_pixel(1, 0, Rgba([200, 100, 50, 255]));
        let tex = Texture::upload(&DecodedImage::from_dynamic(DynamicImage::ImageRgba8(img)));
        // Halfway between the two texel centers.
        assert_eq!(tex.sample(1.0, 0.5), [100, 50, 25, 255]);
        // At a texel center there is nothing to blend.
        assert_eq!(tex.sample(0.5, 0.5), [0, 0, 0, 255]);
    }
}
