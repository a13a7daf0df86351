mod grid;
mod style;

pub use grid::{GridParseError, Module, ModuleGrid, ModuleSource};
pub use style::{ParseStyleError, RenderStyle};
