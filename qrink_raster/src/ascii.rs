use std::io::Write;

use qrink_core::ModuleSource;

/// Terminal preview of a module grid.
///
/// Renders any [`ModuleSource`] as text, one pattern per module. The raster
/// pipeline is the real output; this is the quick look before exporting.
pub struct AsciiRenderer {
    light_pattern: Box<str>,
    dark_pattern: Box<str>,
}

impl AsciiRenderer {
    /// Construct a new [AsciiRenderer] that uses "██" to render dark modules and "  " to print light ones.
    pub fn new() -> Self {
        Self {
            light_pattern: "  ".into(),
            dark_pattern: "██".into(),
        }
    }

    /// Set the light module `pattern` to be used when rendering.
    pub fn with_light_pattern(mut self, pattern: &str) -> Self {
        self.light_pattern = pattern.into();
        self
    }

    /// Set the dark module `pattern` to be used when rendering.
    pub fn with_dark_pattern(mut self, pattern: &str) -> Self {
        self.dark_pattern = pattern.into();
        self
    }

    /// Invert the light and dark patterns.
    pub fn inverted(mut self) -> Self {
        std::mem::swap(&mut self.light_pattern, &mut self.dark_pattern);
        self
    }

    /// Peek at the pattern used to render light modules.
    pub fn light_pattern(&self) -> &str {
        self.light_pattern.as_ref()
    }

    /// Peek at the pattern used to render dark modules.
    pub fn dark_pattern(&self) -> &str {
        self.dark_pattern.as_ref()
    }

    /// Render `grid` into `output`.
    pub fn render<G, W>(&self, output: &mut W, grid: &G) -> std::io::Result<()>
    where
        G: ModuleSource,
        W: Write,
    {
        for row in 0..grid.size() {
            for col in 0..grid.size() {
                let pattern = match grid.get(row, col) {
                    true => self.dark_pattern(),
                    false => self.light_pattern(),
                };
                write!(output, "{}", pattern)?;
            }
            writeln!(output)?;
        }
        Ok(())
    }
}

impl Default for AsciiRenderer {
    fn default() -> Self {
        Self::new()
    }
}
