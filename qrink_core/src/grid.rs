use std::fmt;

use bitvec::vec::BitVec;

/// Module (aka, a pixel) of a QR code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Module {
    Light,
    Dark,
}

impl Module {
    /// Get the inverted module.
    /// # Example
    /// ```
    /// use qrink_core::Module;
    /// assert_eq!(Module::Dark.inverted(), Module::Light);
    /// assert_eq!(Module::Light.inverted(), Module::Dark);
    /// ```
    pub fn inverted(&self) -> Self {
        match self {
            Module::Dark => Module::Light,
            Module::Light => Module::Dark,
        }
    }
}

impl From<bool> for Module {
    fn from(value: bool) -> Self {
        match value {
            true => Module::Dark,
            false => Module::Light,
        }
    }
}

impl From<Module> for bool {
    fn from(value: Module) -> Self {
        match value {
            Module::Dark => true,
            Module::Light => false,
        }
    }
}

/// Source of modules consumed by a renderer.
///
/// This is the contract between an external QR encoder and this crate: a
/// square grid of side [`size`](ModuleSource::size) answering whether the
/// module at `(row, col)` is dark. Implement it for the matrix type of
/// whichever encoder produced the symbol; renderers never validate the grid
/// as a QR code, they consume the booleans faithfully.
pub trait ModuleSource {
    /// Side of the square grid, in modules.
    fn size(&self) -> usize;

    /// Whether the module at `(row, col)` is dark. Positions outside the
    /// grid are light.
    fn get(&self, row: usize, col: usize) -> bool;
}

/// A square matrix of bits.
#[derive(Debug)]
struct BitMatrix {
    data: BitVec,
    size: usize,
}

impl BitMatrix {
    /// Return a matrix of size `size` filled with `value`.
    pub fn filled(size: usize, value: bool) -> Self {
        Self {
            data: BitVec::repeat(value, size * size),
            size,
        }
    }

    /// Get the size of the matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Get the 1D index of the data array corresponding to position `(i, j)`, checking for validity.
    #[inline]
    fn linearized_index(&self, i: usize, j: usize) -> Option<usize> {
        if i < self.size && j < self.size {
            Some(self.size * i + j)
        } else {
            None
        }
    }

    /// Get the bit at position `(i, j)`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> Option<bool> {
        self.data
            .get(self.linearized_index(i, j)?)
            .map(|bit| (*bit))
    }

    /// Set the bit at position `(i, j)`.
    /// # Panics
    /// Panics if position `(i, j)` is out of bounds.
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: bool) {
        let index = self.linearized_index(i, j).unwrap_or_else(|| {
            panic!(
                "index out of bounds: the size is {} but the index is ({}, {})",
                self.size, i, j
            )
        });
        self.data.set(index, value)
    }
}

/// An owned square grid of modules.
///
/// This is the crate's own [`ModuleSource`], used when the symbol arrives in
/// textual form (see [`ModuleGrid::parse`]) or is built module by module in
/// tests. Grids produced by a foreign encoder don't need to be converted to
/// it; implementing [`ModuleSource`] on the foreign type is enough.
#[derive(Debug)]
pub struct ModuleGrid {
    matrix: BitMatrix,
}

impl ModuleGrid {
    /// Return a grid of side `size` filled with `module`.
    #[inline]
    pub fn filled(size: usize, module: Module) -> Self {
        Self {
            matrix: BitMatrix::filled(size, module.into()),
        }
    }

    /// Get the side of the grid.
    #[inline]
    pub fn size(&self) -> usize {
        self.matrix.size()
    }

    /// Get the module at position `(row, col)`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<Module> {
        self.matrix.get(row, col).map(Module::from)
    }

    /// Set the module at position `(row, col)`.
    /// # Panics
    /// Panics if position `(row, col)` is out of bounds.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: Module) {
        self.matrix.set(row, col, value.into())
    }

    /// Iterate over the positions of all dark modules, row-major.
    pub fn dark_modules(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let size = self.size();
        (0..size)
            .flat_map(move |row| (0..size).map(move |col| (row, col)))
            .filter(|&(row, col)| self.matrix.get(row, col) == Some(true))
    }

    /// Parse a grid from its textual form: one row per line, `#`, `1` or `█`
    /// for dark modules and `.`, `0` or a space for light ones. Rows shorter
    /// than the grid side are padded with light modules, so stripped
    /// trailing whitespace does not change the symbol.
    /// # Example
    /// ```
    /// use qrink_core::{Module, ModuleGrid};
    /// let grid = ModuleGrid::parse("#.\n.#").unwrap();
    /// assert_eq!(grid.size(), 2);
    /// assert_eq!(grid.get(0, 0), Some(Module::Dark));
    /// assert_eq!(grid.get(0, 1), Some(Module::Light));
    /// ```
    pub fn parse(text: &str) -> Result<Self, GridParseError> {
        let mut lines: Vec<&str> = text.lines().collect();
        while lines.last().is_some_and(|line| line.trim().is_empty()) {
            lines.pop();
        }
        let size = lines.len();
        let mut grid = Self::filled(size, Module::Light);
        for (row, line) in lines.iter().enumerate() {
            for (col, ch) in line.chars().enumerate() {
                if col >= size {
                    return Err(GridParseError::NotSquare(
                        size,
                        row,
                        line.chars().count(),
                    ));
                }
                match ch {
                    '#' | '1' | '█' => grid.set(row, col, Module::Dark),
                    '.' | '0' | ' ' => {}
                    invalid => return Err(GridParseError::InvalidCharacter(invalid, row, col)),
                }
            }
        }
        Ok(grid)
    }
}

impl ModuleSource for ModuleGrid {
    fn size(&self) -> usize {
        self.size()
    }

    fn get(&self, row: usize, col: usize) -> bool {
        self.get(row, col).map(bool::from).unwrap_or(false)
    }
}

impl fmt::Display for ModuleGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.size() {
            for col in 0..self.size() {
                let ch = match self.get(row, col) {
                    Some(Module::Dark) => '#',
                    _ => '.',
                };
                write!(f, "{}", ch)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GridParseError {
    #[error("grid has {0} rows but row {1} has {2} modules")]
    NotSquare(usize, usize, usize),
    #[error("invalid module character {0:?} at row {1}, column {2}")]
    InvalidCharacter(char, usize, usize),
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_filled_grid() {
        let grid = ModuleGrid::filled(3, Module::Dark);
        assert_eq!(grid.size(), 3);
        for row in 0..3 {
            for col in 0..3 {
                assert_eq!(grid.get(row, col), Some(Module::Dark));
            }
        }
    }

    #[test]
    fn test_out_of_bounds_get_is_none() {
        let grid = ModuleGrid::filled(2, Module::Light);
        assert_eq!(grid.get(2, 0), None);
        assert_eq!(grid.get(0, 2), None);
        assert!(!ModuleSource::get(&grid, 5, 5));
    }

    #[test]
    fn test_set_and_get() {
        let mut grid = ModuleGrid::filled(4, Module::Light);
        grid.set(1, 2, Module::Dark);
        assert_eq!(grid.get(1, 2), Some(Module::Dark));
        assert_eq!(grid.get(2, 1), Some(Module::Light));
    }

    #[test]
    fn test_dark_modules_iteration() {
        let mut grid = ModuleGrid::filled(3, Module::Light);
        grid.set(0, 0, Module::Dark);
        grid.set(2, 1, Module::Dark);
        let dark: Vec<_> = grid.dark_modules().collect();
        assert_eq!(dark, vec![(0, 0), (2, 1)]);
    }

    #[test]
    fn test_parse_accepts_all_aliases() {
        let grid = ModuleGrid::parse("#10\n.# \n0.█").unwrap();
        assert_eq!(grid.size(), 3);
        let dark: Vec<_> = grid.dark_modules().collect();
        assert_eq!(dark, vec![(0, 0), (0, 1), (1, 1), (2, 2)]);
    }

    #[test]
    fn test_parse_pads_short_rows() {
        let grid = ModuleGrid::parse("##\n#\n").unwrap();
        assert_eq!(grid.size(), 2);
        assert_eq!(grid.get(1, 1), Some(Module::Light));
    }

    #[test]
    fn test_parse_rejects_wide_rows() {
        assert_eq!(
            ModuleGrid::parse("###\n###").unwrap_err(),
            GridParseError::NotSquare(2, 0, 3)
        );
    }

    #[test]
    fn test_parse_rejects_unknown_characters() {
        assert_eq!(
            ModuleGrid::parse("#.\n.x").unwrap_err(),
            GridParseError::InvalidCharacter('x', 1, 1)
        );
    }

    #[test]
    fn test_parse_empty_text() {
        let grid = ModuleGrid::parse("").unwrap();
        assert_eq!(grid.size(), 0);
    }

    #[test]
    fn test_display_parse_round_trip() {
        let text = "#.#\n.#.\n#..\n";
        let grid = ModuleGrid::parse(text).unwrap();
        assert_eq!(grid.to_string(), text);
    }
}
