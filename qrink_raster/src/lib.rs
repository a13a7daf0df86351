mod ascii;
mod logo;
mod raster;
mod surface;

pub use ascii::AsciiRenderer;
pub use logo::{Logo, LogoComposer};
pub use raster::{RasterError, Rasterizer};
pub use surface::{Rect, Surface};
