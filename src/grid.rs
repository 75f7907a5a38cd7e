//! The boolean module grid produced by the external QR encoder.
//!
//! This crate never computes codewords or error correction itself. The
//! [`qrcode`] crate does that, and [`ModuleGrid`] is the read-only view the
//! renderer consumes.

use qrcode::{EcLevel, QrCode};

use crate::error::{Error, Result};

/// A square matrix of QR modules, `true` meaning dark.
///
/// The side length is `4 * version + 17` for standard symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleGrid {
    size: usize,
    modules: Vec<bool>,
}

impl ModuleGrid {
    /// Creates a grid from row-major module values.
    ///
    /// Returns `None` if `modules.len() != size * size`.
    pub fn new(size: usize, modules: Vec<bool>) -> Option<Self> {
        (modules.len() == size * size).then_some(Self { size, modules })
    }

    /// Builds a grid by evaluating `f(col, row)` for every module.
    pub fn from_fn(size: usize, mut f: impl FnMut(usize, usize) -> bool) -> Self {
        let mut modules = Vec::with_capacity(size * size);
        for row in 0..size {
            for col in 0..size {
                modules.push(f(col, row));
            }
        }
        Self { size, modules }
    }

    /// Encodes `content` at error-correction level H.
    ///
    /// Level H is always used so that a centered logo can obscure part of the
    /// symbol without breaking it.
    pub fn encode(content: &str) -> Result<Self> {
        Self::encode_with_level(content, EcLevel::H)
    }

    /// Encodes `content` at the given error-correction level.
    pub fn encode_with_level(content: &str, level: EcLevel) -> Result<Self> {
        if content.is_empty() {
            return Err(Error::EmptyInput);
        }
        let code = QrCode::with_error_correction_level(content.as_bytes(), level)?;
        Ok(Self::from_qr(&code))
    }

    /// Copies the module colors out of an encoded symbol.
    pub fn from_qr(code: &QrCode) -> Self {
        let modules = code
            .to_colors()
            .into_iter()
            .map(|c| c == qrcode::Color::Dark)
            .collect();
        Self {
            size: code.width(),
            modules,
        }
    }

    /// Side length `N` of the grid in modules.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the symbol version implied by the side length, if standard.
    pub fn version(&self) -> Option<usize> {
        let body = self.size.checked_sub(17)?;
        (body % 4 == 0 && body > 0).then_some(body / 4)
    }

    /// Returns true if the module at `(col, row)` is dark.
    ///
    /// Coordinates outside the grid read as light.
    pub fn get(&self, col: usize, row: usize) -> bool {
        if col >= self.size || row >= self.size {
            return false;
        }
        self.modules[row * self.size + col]
    }

    /// Iterates over the `(col, row)` coordinates of dark modules in
    /// row-major order.
    pub fn dark_modules(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let size = self.size;
        self.modules
            .iter()
            .enumerate()
            .filter(|(_, dark)| **dark)
            .map(move |(i, _)| (i % size, i / size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_checks_length() {
        assert!(ModuleGrid::new(2, vec![true; 4]).is_some());
        assert!(ModuleGrid::new(2, vec![true; 3]).is_none());
    }

    #[test]
    fn get_is_column_then_row() {
        let grid = ModuleGrid::from_fn(3, |col, row| col == 2 && row == 0);
        assert!(grid.get(2, 0));
        assert!(!grid.get(0, 2));
        assert!(!grid.get(5, 5));
    }

    #[test]
    fn encode_uses_standard_sizes() {
        let grid = ModuleGrid::encode("https://example.com").unwrap();
        assert_eq!((grid.size() - 17) % 4, 0);
        assert!(grid.version().is_some());
        // Top-left finder corner is always dark.
        assert!(grid.get(0, 0));
        assert!(grid.get(6, 6));
        assert!(!grid.get(1, 1));
    }

    #[test]
    fn encode_rejects_empty() {
        assert!(matches!(ModuleGrid::encode(""), Err(Error::EmptyInput)));
    }

    #[test]
    fn encode_reports_oversized_payload() {
        let huge = "x".repeat(4000);
        assert!(matches!(ModuleGrid::encode(&huge), Err(Error::Encoding(_))));
    }

    #[test]
    fn dark_modules_row_major() {
        let grid = ModuleGrid::from_fn(2, |col, row| col != row);
        let dark: Vec<_> = grid.dark_modules().collect();
        assert_eq!(dark, vec![(1, 0), (0, 1)]);
    }
}
