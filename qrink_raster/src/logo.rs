use std::path::Path;

use image::{imageops::FilterType, DynamicImage, GenericImageView, Rgba, RgbaImage};

use crate::raster::RasterError;
use crate::surface::{Rect, Surface};

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// A decoded logo image, ready to be composited onto a rendered grid.
///
/// The logo is decoded once and scaled at composite time; the rasterizer
/// never retains it between calls.
#[derive(Debug)]
pub struct Logo {
    image: DynamicImage,
}

impl Logo {
    /// Read and decode the image at `path`.
    ///
    /// Reading is asynchronous; compositing must be sequenced after this
    /// completes. A file that cannot be read fails with
    /// [`RasterError::LogoRead`], one that cannot be decoded with
    /// [`RasterError::LogoDecode`].
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self, RasterError> {
        let bytes = tokio::fs::read(path).await?;
        Self::from_bytes(&bytes)
    }

    /// Decode a logo from its encoded `bytes` (PNG, JPEG, ...).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RasterError> {
        Ok(Self {
            image: image::load_from_memory(bytes)?,
        })
    }

    /// Wrap an already decoded image.
    pub fn from_image(image: DynamicImage) -> Self {
        Self { image }
    }

    /// Width and height of the decoded image, in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Scale the logo to exactly `side × side`.
    fn scaled(&self, side: u32) -> RgbaImage {
        self.image
            .resize_exact(side, side, FilterType::Lanczos3)
            .to_rgba8()
    }
}

/// Compositor placing a [`Logo`] at the center of a rendered surface.
///
/// The logo sits on an opaque white rounded "halo" that restores local
/// contrast over whatever modules it covers, and is blitted inside a rounded
/// clip. Covered modules are lost; the symbol stays decodable only as far as
/// the encoder's error correction allows, which the compositor does not
/// check.
pub struct LogoComposer {
    logo_size: u32,
    padding: u32,
    halo_radius: f64,
    clip_radius: f64,
    halo_color: Rgba<u8>,
}

impl LogoComposer {
    /// Construct a new [LogoComposer] with a 120px logo, a 10px halo and
    /// corner radii sized for a 600px surface.
    pub fn new() -> Self {
        Self {
            logo_size: 120,
            padding: 10,
            halo_radius: 20.0,
            clip_radius: 16.0,
            halo_color: WHITE,
        }
    }

    /// Set the side of the composited logo, in pixels.
    pub fn with_logo_size(mut self, logo_size: u32) -> Self {
        self.logo_size = logo_size;
        self
    }

    /// Set the halo padding around the logo, in pixels.
    pub fn with_padding(mut self, padding: u32) -> Self {
        self.padding = padding;
        self
    }

    /// Set the corner radius of the halo.
    pub fn with_halo_radius(mut self, radius: f64) -> Self {
        self.halo_radius = radius;
        self
    }

    /// Set the corner radius of the logo clip.
    pub fn with_clip_radius(mut self, radius: f64) -> Self {
        self.clip_radius = radius;
        self
    }

    /// Set the halo color.
    pub fn with_halo_color(mut self, color: Rgba<u8>) -> Self {
        self.halo_color = color;
        self
    }

    /// Peek at the configured logo side.
    pub fn logo_size(&self) -> u32 {
        self.logo_size
    }

    /// Peek at the configured halo padding.
    pub fn padding(&self) -> u32 {
        self.padding
    }

    /// Composite `logo` at the center of `surface`.
    ///
    /// Fails with [`RasterError::LogoDoesNotFit`] before touching the
    /// surface when the padded logo would not fit, so the grid-only render
    /// remains valid. The clip is local to the blit; nothing painted later
    /// is affected by it.
    pub fn composite(&self, surface: &mut Surface, logo: &Logo) -> Result<(), RasterError> {
        let size = surface.size();
        if self.logo_size + 2 * self.padding > size {
            return Err(RasterError::LogoDoesNotFit(self.logo_size, self.padding, size));
        }
        tracing::debug!(
            logo_size = self.logo_size,
            padding = self.padding,
            "compositing logo"
        );
        let region = Rect::centered(self.logo_size as f64, size as f64);
        surface.fill_rounded_rect(
            region.expanded(self.padding as f64),
            self.halo_radius,
            self.halo_color,
        );
        let scaled = logo.scaled(self.logo_size);
        surface.blit_clipped(&scaled, region, self.clip_radius);
        Ok(())
    }
}

impl Default for LogoComposer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::raster::Rasterizer;
    use image::ImageFormat;
    use qrink_core::{Module, ModuleGrid};
    use std::io::Cursor;

    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

    fn red_logo() -> Logo {
        Logo::from_image(DynamicImage::ImageRgba8(RgbaImage::from_pixel(64, 64, RED)))
    }

    fn rendered_grid() -> Surface {
        let grid = ModuleGrid::filled(21, Module::Dark);
        Rasterizer::new().render(&grid).unwrap()
    }

    fn png_bytes() -> Vec<u8> {
        let image = RgbaImage::from_pixel(8, 8, RED);
        let mut bytes = Cursor::new(Vec::new());
        image.write_to(&mut bytes, ImageFormat::Png).unwrap();
        bytes.into_inner()
    }

    #[test]
    fn test_from_bytes_decodes_png() {
        let logo = Logo::from_bytes(&png_bytes()).unwrap();
        assert_eq!(logo.dimensions(), (8, 8));
    }

    #[test]
    fn test_from_bytes_rejects_garbage() {
        let err = Logo::from_bytes(b"not an image").unwrap_err();
        assert!(matches!(err, RasterError::LogoDecode(_)));
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let path = std::env::temp_dir().join("qrink_logo_load_test.png");
        std::fs::write(&path, png_bytes()).unwrap();
        let logo = Logo::load(&path).await.unwrap();
        assert_eq!(logo.dimensions(), (8, 8));
        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let path = std::env::temp_dir().join("qrink_logo_that_does_not_exist.png");
        let err = Logo::load(&path).await.unwrap_err();
        assert!(matches!(err, RasterError::LogoRead(_)));
    }

    #[test]
    fn test_composite_default_geometry() {
        // 600px surface, 120px logo, 10px padding: logo region [240, 360),
        // halo [230, 370) with radius 20, clip radius 16.
        let mut surface = rendered_grid();
        LogoComposer::new().composite(&mut surface, &red_logo()).unwrap();
        // Logo center.
        assert_eq!(surface.pixel(300, 300), RED);
        // Inside the halo but outside the clip: opaque white.
        assert_eq!(surface.pixel(236, 300), WHITE);
        // Logo region corner is cut by the clip and shows the halo.
        assert_eq!(surface.pixel(241, 241), WHITE);
        // Outside the halo's rounded corner the modules survive.
        assert_eq!(surface.pixel(232, 232), BLACK);
        // Far from the logo nothing changes.
        assert_eq!(surface.pixel(100, 100), BLACK);
    }

    #[test]
    fn test_composite_inside_clip_edge() {
        let mut surface = rendered_grid();
        LogoComposer::new().composite(&mut surface, &red_logo()).unwrap();
        // Mid-height left edge of the clip region is part of the logo.
        assert_eq!(surface.pixel(241, 300), RED);
    }

    #[test]
    fn test_composite_does_not_fit() {
        let grid = ModuleGrid::filled(21, Module::Dark);
        let mut surface = Rasterizer::new()
            .with_size(100)
            .with_margin(10)
            .render(&grid)
            .unwrap();
        let before = surface.as_image().as_raw().clone();
        let err = LogoComposer::new()
            .composite(&mut surface, &red_logo())
            .unwrap_err();
        assert!(matches!(err, RasterError::LogoDoesNotFit(120, 10, 100)));
        assert_eq!(surface.as_image().as_raw(), &before);
    }

    #[test]
    fn test_composite_fits_exactly() {
        // logo_size + 2 * padding == size must succeed.
        let grid = ModuleGrid::filled(21, Module::Dark);
        let mut surface = Rasterizer::new()
            .with_size(140)
            .with_margin(10)
            .render(&grid)
            .unwrap();
        LogoComposer::new().composite(&mut surface, &red_logo()).unwrap();
        assert_eq!(surface.pixel(70, 70), RED);
    }

    #[test]
    fn test_composite_is_idempotent() {
        let compose = || {
            let mut surface = rendered_grid();
            LogoComposer::new()
                .composite(&mut surface, &red_logo())
                .unwrap();
            surface
        };
        let a = compose();
        let b = compose();
        assert_eq!(a.as_image().as_raw(), b.as_image().as_raw());
    }
}
