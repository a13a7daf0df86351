//! Styled rasterization of QR module grids.
//!
//! `qrink` consumes an already-encoded QR module grid (any type implementing
//! [`ModuleSource`], typically obtained from a third-party encoder) and paints
//! it onto a pixel surface under a [`RenderStyle`], optionally compositing a
//! centered logo, for export as a PNG image.

pub use qrink_core::{GridParseError, Module, ModuleGrid, ModuleSource, ParseStyleError, RenderStyle};
pub use qrink_raster::{AsciiRenderer, Logo, LogoComposer, RasterError, Rasterizer, Rect, Surface};
