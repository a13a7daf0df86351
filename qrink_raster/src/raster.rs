use image::Rgba;

use qrink_core::{ModuleSource, RenderStyle};

use crate::surface::{Rect, Surface};

/// Extra side length given to square modules; adjacent squares overlap by
/// this much so no hairline of background survives between them.
const SQUARE_BLEED: f64 = 0.5;
/// Dot radius as a fraction of the cell size (90% of the half-cell).
const DOT_RADIUS_RATIO: f64 = 0.45;
/// Corner radius of rounded modules as a fraction of the cell size.
const CORNER_RADIUS_RATIO: f64 = 0.4;

const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Rasterizer for QR module grids.
///
/// Maps any [`ModuleSource`] to a freshly reset [`Surface`], painting one
/// shape per dark module under the configured [`RenderStyle`]. Rendering is
/// a pure function of the grid and the configuration; no state survives
/// between calls.
pub struct Rasterizer {
    style: RenderStyle,
    size: u32,
    margin: u32,
    dark: Rgba<u8>,
    light: Rgba<u8>,
}

impl Rasterizer {
    /// Construct a new [Rasterizer] painting black square modules on a white
    /// 600px surface with a 40px margin.
    pub fn new() -> Self {
        Self {
            style: RenderStyle::Square,
            size: 600,
            margin: 40,
            dark: BLACK,
            light: WHITE,
        }
    }

    /// Set the module `style` to be used when rendering.
    pub fn with_style(mut self, style: RenderStyle) -> Self {
        self.style = style;
        self
    }

    /// Set the surface side, in pixels.
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    /// Set the margin around the grid, in pixels.
    pub fn with_margin(mut self, margin: u32) -> Self {
        self.margin = margin;
        self
    }

    /// Set the color of dark modules.
    pub fn with_dark_color(mut self, color: Rgba<u8>) -> Self {
        self.dark = color;
        self
    }

    /// Set the background color.
    pub fn with_light_color(mut self, color: Rgba<u8>) -> Self {
        self.light = color;
        self
    }

    /// Peek at the configured style.
    pub fn style(&self) -> RenderStyle {
        self.style
    }

    /// Peek at the configured surface side.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Peek at the configured margin.
    pub fn margin(&self) -> u32 {
        self.margin
    }

    /// Render `grid` onto a fresh surface.
    ///
    /// Each dark module is painted at
    /// `(margin + col * cell, margin + row * cell)` where
    /// `cell = (size - 2 * margin) / grid.size()`, kept fractional so the
    /// grid always spans the full drawing area. Light modules show the
    /// background.
    pub fn render<G: ModuleSource>(&self, grid: &G) -> Result<Surface, RasterError> {
        let modules = grid.size();
        if modules == 0 || self.size <= 2 * self.margin {
            return Err(RasterError::InvalidGeometry(modules, self.size, self.margin));
        }
        let cell = (self.size - 2 * self.margin) as f64 / modules as f64;
        tracing::debug!(modules, cell, style = %self.style, "rasterizing grid");
        let mut surface = Surface::new(self.size, self.light);
        for row in 0..modules {
            for col in 0..modules {
                if !grid.get(row, col) {
                    continue;
                }
                let x = self.margin as f64 + col as f64 * cell;
                let y = self.margin as f64 + row as f64 * cell;
                match self.style {
                    RenderStyle::Square => surface.fill_rect(
                        Rect::new(x, y, cell + SQUARE_BLEED, cell + SQUARE_BLEED),
                        self.dark,
                    ),
                    RenderStyle::Dots => surface.fill_circle(
                        x + cell / 2.0,
                        y + cell / 2.0,
                        cell * DOT_RADIUS_RATIO,
                        self.dark,
                    ),
                    RenderStyle::Rounded => surface.fill_rounded_rect(
                        Rect::new(x, y, cell, cell),
                        cell * CORNER_RADIUS_RATIO,
                        self.dark,
                    ),
                }
            }
        }
        Ok(surface)
    }
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error("cannot rasterize a grid of side {0} into {1}px with a {2}px margin")]
    InvalidGeometry(usize, u32, u32),
    #[error("cannot fit a {0}px logo with {1}px padding into a {2}px surface")]
    LogoDoesNotFit(u32, u32, u32),
    #[error("cannot read logo: {0}")]
    LogoRead(#[from] std::io::Error),
    #[error("cannot decode logo: {0}")]
    LogoDecode(#[from] image::ImageError),
}
