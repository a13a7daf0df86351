use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, Pixel, Rgba, RgbaImage};

/// Axis-aligned rectangle in surface coordinates.
///
/// Coordinates are `f64` because cell boundaries rarely land on whole
/// pixels; shapes answer containment at fractional positions and the
/// surface decides pixel by pixel. Rectangles are half-open on the right
/// and bottom, so rectangles that share an edge tile without overlap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Square of side `side` centered in an `outer × outer` surface.
    pub fn centered(side: f64, outer: f64) -> Self {
        let offset = (outer - side) / 2.0;
        Self::new(offset, offset, side, side)
    }

    /// Grow the rectangle by `pad` on each side.
    /// # Example
    /// ```
    /// use qrink_raster::Rect;
    /// let rect = Rect::new(10.0, 10.0, 20.0, 20.0).expanded(5.0);
    /// assert_eq!(rect, Rect::new(5.0, 5.0, 30.0, 30.0));
    /// ```
    pub fn expanded(&self, pad: f64) -> Self {
        Self::new(self.x - pad, self.y - pad, self.w + 2.0 * pad, self.h + 2.0 * pad)
    }

    /// Whether point `(px, py)` lies inside the rectangle.
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px < self.x + self.w && py >= self.y && py < self.y + self.h
    }

    /// Whether point `(px, py)` lies inside the rectangle with its corners
    /// rounded by `radius`. The radius is clamped to half the rectangle's
    /// sides, so a square with `radius >= side / 2` degenerates to a circle.
    pub fn contains_rounded(&self, px: f64, py: f64, radius: f64) -> bool {
        if !self.contains(px, py) {
            return false;
        }
        let radius = radius.min(self.w / 2.0).min(self.h / 2.0).max(0.0);
        if radius == 0.0 {
            return true;
        }
        // Distance from the rectangle inset by the radius; points farther
        // than the radius fall outside the corner arcs.
        let dx = (self.x + radius - px).max(px - (self.x + self.w - radius)).max(0.0);
        let dy = (self.y + radius - py).max(py - (self.y + self.h - radius)).max(0.0);
        dx * dx + dy * dy <= radius * radius
    }
}

/// Pixels whose center may fall inside `rect`, clamped to the surface.
fn pixels_under(size: u32, rect: Rect) -> impl Iterator<Item = (u32, u32)> {
    let x0 = rect.x.floor().max(0.0) as u32;
    let y0 = rect.y.floor().max(0.0) as u32;
    let x1 = (rect.x + rect.w).ceil().clamp(0.0, size as f64) as u32;
    let y1 = (rect.y + rect.h).ceil().clamp(0.0, size as f64) as u32;
    (y0..y1).flat_map(move |py| (x0..x1).map(move |px| (px, py)))
}

/// A square RGBA pixel buffer with filled-shape drawing.
///
/// A shape paints a pixel exactly when the pixel's center lies inside it.
/// All shapes, circles included, answer containment through
/// [`Rect::contains_rounded`], and clipping is an argument of the blit
/// rather than surface state, so one draw call can never affect the next.
#[derive(Debug)]
pub struct Surface {
    pixels: RgbaImage,
}

impl Surface {
    /// Create a `size × size` surface filled with `background`.
    pub fn new(size: u32, background: Rgba<u8>) -> Self {
        Self {
            pixels: RgbaImage::from_pixel(size, size, background),
        }
    }

    /// Side of the surface, in pixels.
    pub fn size(&self) -> u32 {
        self.pixels.width()
    }

    /// Overwrite every pixel with `color`.
    pub fn fill(&mut self, color: Rgba<u8>) {
        for pixel in self.pixels.pixels_mut() {
            *pixel = color;
        }
    }

    /// Paint a filled rectangle.
    pub fn fill_rect(&mut self, rect: Rect, color: Rgba<u8>) {
        self.fill_rounded_rect(rect, 0.0, color);
    }

    /// Paint a filled circle.
    pub fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Rgba<u8>) {
        let bounds = Rect::new(cx - radius, cy - radius, 2.0 * radius, 2.0 * radius);
        self.fill_rounded_rect(bounds, radius, color);
    }

    /// Paint a filled rectangle with corners rounded by `radius`.
    pub fn fill_rounded_rect(&mut self, rect: Rect, radius: f64, color: Rgba<u8>) {
        for (px, py) in pixels_under(self.size(), rect) {
            let (cx, cy) = (px as f64 + 0.5, py as f64 + 0.5);
            if rect.contains_rounded(cx, cy, radius) {
                self.pixels.put_pixel(px, py, color);
            }
        }
    }

    /// Blit `source` stretched over `rect`, keeping only the pixels inside
    /// the rectangle's corners rounded by `corner_radius`. Source pixels are
    /// alpha-blended over the surface.
    pub fn blit_clipped(&mut self, source: &RgbaImage, rect: Rect, corner_radius: f64) {
        if rect.w <= 0.0 || rect.h <= 0.0 {
            return;
        }
        for (px, py) in pixels_under(self.size(), rect) {
            let (cx, cy) = (px as f64 + 0.5, py as f64 + 0.5);
            if !rect.contains_rounded(cx, cy, corner_radius) {
                continue;
            }
            let sx = ((cx - rect.x) / rect.w * source.width() as f64)
                .floor()
                .clamp(0.0, (source.width() - 1) as f64) as u32;
            let sy = ((cy - rect.y) / rect.h * source.height() as f64)
                .floor()
                .clamp(0.0, (source.height() - 1) as f64) as u32;
            let mut blended = *self.pixels.get_pixel(px, py);
            blended.blend(source.get_pixel(sx, sy));
            self.pixels.put_pixel(px, py, blended);
        }
    }

    /// Get the pixel at `(x, y)`.
    /// # Panics
    /// Panics if `(x, y)` is outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.pixels.get_pixel(x, y)
    }

    /// Borrow the underlying image.
    pub fn as_image(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Take the underlying image.
    pub fn into_image(self) -> RgbaImage {
        self.pixels
    }

    /// Encode the surface as an in-memory PNG.
    pub fn encode_png(&self) -> Result<Vec<u8>, image::ImageError> {
        let mut bytes = Cursor::new(Vec::new());
        self.pixels.write_to(&mut bytes, ImageFormat::Png)?;
        Ok(bytes.into_inner())
    }

    /// Write the surface to `path` as a PNG, regardless of the extension.
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), image::ImageError> {
        self.pixels.save_with_format(path, ImageFormat::Png)
    }
}
